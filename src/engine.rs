//=========================================================================
// Aetheric Stage
//
// Frame driver: builds the game, owns the scene manager and drives it one
// frame at a time.
//
// Architecture:
// ```text
//     GameBuilder  ──build(presenter)──>  Game  ──run()──>  [tick loop]
//         │                                │
//         ├─ with_fps()                    ├─ init(|scenes| ...)
//         ├─ with_window_size()            ├─ start()  (reset to main scene)
//         └─ with_main_scene()             └─ tick(dt)
//                                                │
//     EventQueue ──drain──► SceneManager::process_event (each)
//                           SceneManager::process_update
//                           SceneManager::process_draw ──► Presenter
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use crate::config::StageConfig;
use crate::core::input::{Event, EventQueue, EventSender};
use crate::core::render::{Color, Size};
use crate::core::scene::SceneManager;
use crate::error::StageError;
use crate::platform::{Presenter, WindowHost};

//=== GameBuilder =========================================================

/// Builder for configuring and constructing a [`Game`].
///
/// # Default Values
///
/// Those of [`StageConfig::default`]: 60 fps, 560x480 window, main scene
/// `"main"`, black background.
///
/// # Examples
///
/// ```no_run
/// use aetheric_stage::prelude::*;
///
/// let game = GameBuilder::new()
///     .with_fps(30)
///     .with_window_size(288, 512)
///     .with_main_scene("title")
///     .build(HeadlessPresenter::new());
/// # let _ = game;
/// ```
#[derive(Debug, Clone, Default)]
pub struct GameBuilder {
    config: StageConfig,
}

impl GameBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from loaded settings.
    ///
    /// # Panics
    ///
    /// Panics if `config` has a zero fps or a zero-area window. Use
    /// [`StageConfig::validate`] first to handle that as an error.
    pub fn from_config(config: StageConfig) -> Self {
        assert!(config.fps > 0, "FPS must be positive");
        assert!(!config.window_size.is_empty(), "Window size must be non-zero");
        Self { config }
    }

    /// Sets the target frames per second.
    ///
    /// Default: 60
    ///
    /// # Panics
    ///
    /// Panics if `fps == 0`.
    pub fn with_fps(mut self, fps: u32) -> Self {
        assert!(fps > 0, "FPS must be positive, got {}", fps);
        self.config.fps = fps;
        self
    }

    /// Sets the initial window size, which is also the size new scenes
    /// are created with.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        let size = Size::new(width, height);
        assert!(!size.is_empty(), "Window size must be non-zero, got {}x{}", width, height);
        self.config.window_size = size;
        self
    }

    /// Scene the stack is reset to by [`Game::start`].
    pub fn with_main_scene(mut self, name: impl Into<String>) -> Self {
        self.config.main_scene = name.into();
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.config.background = color;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Builds the game around `presenter`.
    pub fn build<P: Presenter>(self, presenter: P) -> Game<P> {
        info!(
            "Building game (FPS: {}, window: {}x{}, main scene: {:?})",
            self.config.fps,
            self.config.window_size.width,
            self.config.window_size.height,
            self.config.main_scene
        );

        let scenes =
            SceneManager::new(self.config.window_size).with_background(self.config.background);

        Game {
            config: self.config,
            scenes,
            events: EventQueue::new(),
            presenter,
            started: false,
            frames: 0,
        }
    }
}

//=== FrameControl ========================================================

/// Whether the driver should keep going after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Exit,
}

//=== Game ================================================================

/// Stage runtime.
///
/// Owns the [`SceneManager`], the pending-event queue and the presenter.
/// Create via [`GameBuilder`].
///
/// Each [`tick`](Game::tick):
/// 1. Drains the event queue, forwarding every event to the current scene
/// 2. Updates the current scene once, then applies queued scene commands
/// 3. Draws the current scene once
/// 4. Presents its canvas
///
/// Errors are fatal: they propagate out of `tick` and stop `run`.
pub struct Game<P: Presenter> {
    config: StageConfig,
    scenes: SceneManager,
    events: EventQueue,
    presenter: P,
    started: bool,
    frames: u64,
}

impl<P: Presenter> Game<P> {
    //--- Initialization ---------------------------------------------------

    /// Configures the scene manager before the game starts: register
    /// scenes and entity factories here.
    ///
    /// ```no_run
    /// # use aetheric_stage::prelude::*;
    /// # #[derive(Default)]
    /// # struct Bird { state: PhaseFlags }
    /// # impl Logical for Bird {
    /// #     fn update_state(&self) -> &PhaseFlags { &self.state }
    /// #     fn update_state_mut(&mut self) -> &mut PhaseFlags { &mut self.state }
    /// #     fn perform_update(&mut self, _: f32) -> HookResult { Ok(()) }
    /// # }
    /// # impl Entity for Bird {
    /// #     fn as_logical(&mut self) -> Option<&mut dyn Logical> { Some(self) }
    /// # }
    /// # struct Level { state: SceneState }
    /// # impl Scene for Level {
    /// #     fn state(&self) -> &SceneState { &self.state }
    /// #     fn state_mut(&mut self) -> &mut SceneState { &mut self.state }
    /// #     fn generate_objects(&mut self, objects: &ObjectRegistry) -> Result<Vec<Spawn>, ObjectError> {
    /// #         Ok(vec![objects.get_object("bird")?.into()])
    /// #     }
    /// # }
    /// let game = GameBuilder::new()
    ///     .with_main_scene("level")
    ///     .build(HeadlessPresenter::new())
    ///     .init(|scenes| {
    ///         scenes.objects_mut().register_type::<Bird>("bird")?;
    ///         scenes.register("level", |ctx| Box::new(Level { state: SceneState::from_context(ctx) }))?;
    ///         Ok(())
    ///     })?;
    /// game.run()?;
    /// # Ok::<(), StageError>(())
    /// ```
    pub fn init<F>(mut self, init_fn: F) -> Result<Self, StageError>
    where
        F: FnOnce(&mut SceneManager) -> Result<(), StageError>,
    {
        info!("Initializing stage systems");
        init_fn(&mut self.scenes)?;
        info!(
            "Stage initialization complete ({} scenes, {} object types)",
            self.scenes.list_scenes().len(),
            self.scenes.objects().len()
        );
        Ok(self)
    }

    /// Resets the scene stack to the configured main scene.
    ///
    /// # Errors
    ///
    /// Unknown main scene, failed setup, or a failing command queued by
    /// the main scene on entry.
    pub fn start(&mut self) -> Result<(), StageError> {
        info!("Starting with main scene {:?}", self.config.main_scene);
        self.scenes.reset_to(&self.config.main_scene)?;
        self.scenes.process_commands()?;
        self.started = true;
        Ok(())
    }

    //--- Accessors --------------------------------------------------------

    /// Producer handle for the event queue.
    pub fn sender(&self) -> EventSender {
        self.events.sender()
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Frames ticked so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    //--- Frame ------------------------------------------------------------

    /// Runs one frame. `delta_time` is in seconds.
    ///
    /// Returns [`FrameControl::Exit`] once a [`Event::Quit`] has been
    /// forwarded; the rest of that frame still runs.
    pub fn tick(&mut self, delta_time: f32) -> Result<FrameControl, StageError> {
        let mut control = FrameControl::Continue;

        //--- 1. Events ----------------------------------------------------
        for event in self.events.drain() {
            self.scenes.process_event(&event)?;
            if event == Event::Quit {
                control = FrameControl::Exit;
            }
        }

        //--- 2. Update ----------------------------------------------------
        self.scenes.process_update(delta_time)?;

        //--- 3. Draw + present --------------------------------------------
        if let Some(frame) = self.scenes.process_draw()? {
            self.presenter.present(frame).map_err(StageError::Present)?;
        }

        self.frames += 1;
        Ok(control)
    }

    //--- Execution --------------------------------------------------------

    /// Starts the game if needed and ticks it at the configured frame rate
    /// until it exits. No window is opened; events come only from
    /// [`sender`](Game::sender) handles.
    pub fn run(mut self) -> Result<Self, StageError> {
        if !self.started {
            self.start()?;
        }
        info!("Starting frame loop (FPS: {})", self.config.fps);

        let mut clock = FrameClock::new(self.config.fps);
        loop {
            let delta_time = clock.tick();
            match self.tick(delta_time) {
                Ok(FrameControl::Continue) => {}
                Ok(FrameControl::Exit) => break,
                Err(err) => {
                    error!("Frame {} failed: {}", self.frames, err);
                    return Err(err);
                }
            }
        }

        info!("Frame loop exited after {} frames", self.frames);
        Ok(self)
    }

    /// Runs the game in a Winit window until it is closed.
    ///
    /// Must be called on the main thread.
    pub fn run_windowed(self) -> Result<Self, StageError> {
        WindowHost::new(self).run()
    }
}

//=== FrameClock ==========================================================

/// Frame pacing from a target fps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame: Duration,
    last: Instant,
}

impl FrameClock {
    /// # Panics
    ///
    /// Panics if `fps == 0`.
    pub fn new(fps: u32) -> Self {
        assert!(fps > 0, "FPS must be positive");
        Self {
            frame: Duration::from_secs(1) / fps,
            last: Instant::now(),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// When the next frame is due.
    pub fn next_deadline(&self) -> Instant {
        self.last + self.frame
    }

    /// Seconds since the previous lap; starts a new one.
    pub fn lap(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last);
        self.last = now;
        delta.as_secs_f32()
    }

    /// Sleeps out the rest of the current frame, then laps.
    pub fn tick(&mut self) -> f32 {
        let elapsed = self.last.elapsed();
        if elapsed < self.frame {
            thread::sleep(self.frame - elapsed);
        } else {
            debug!("Frame overran by {:?}", elapsed - self.frame);
        }
        self.lap()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
