//=========================================================================
// Platform Layer
//=========================================================================
//
// Window and presentation integration.
//
// Responsibilities:
// - `Presenter`: hands each finished scene `Canvas` to a backend
// - `EventTranslator`: Winit `WindowEvent` → stage `Event`
// - `WindowHost`: runs a `Game` inside the Winit event loop
//
// Architecture:
// ```text
//   Winit EventLoop (main thread)
//        │ WindowEvent
//        ▼
//   EventTranslator ──Event──► EventSender ──► EventQueue
//                                                  │
//   about_to_wait (frame deadline) ──► Game::tick ◄┘
//                                          │
//                                          └─► Presenter::present(&Canvas)
// ```
//
// The window host paces frames with `ControlFlow::WaitUntil` on the
// game's `FrameClock` rather than sleeping, so the event loop stays
// responsive between frames.
//
//=========================================================================

//=== Module Declarations =================================================

mod event_mapper;
mod headless;

//=== Public API ==========================================================

pub use event_mapper::EventTranslator;
pub use headless::{HeadlessPresenter, DEFAULT_FRAME_LIMIT};

//=== External Dependencies ===============================================

use log::{debug, error, info, trace};
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    error::{EventLoopError, OsError},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{Event, EventSender};
use crate::core::render::Canvas;
use crate::engine::{FrameClock, FrameControl, Game};
use crate::error::{HookResult, StageError};

//=== Presenter ===========================================================

/// Backend that puts a finished frame on screen.
///
/// The stage never rasterizes. A presenter receives the current scene's
/// canvas once per frame and turns its draw ops into pixels (or records
/// them, see [`HeadlessPresenter`]).
pub trait Presenter {
    fn present(&mut self, frame: &Canvas) -> HookResult;
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn present(&mut self, frame: &Canvas) -> HookResult {
        (**self).present(frame)
    }
}

//=== PlatformError =======================================================

/// Window and event loop failures. Always fatal.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] EventLoopError),

    #[error("window creation failed: {0}")]
    WindowCreation(#[source] OsError),
}

//=== WindowHost ==========================================================

/// Runs a [`Game`] in a Winit window.
///
/// Must be run on the main thread (Winit requirement on macOS/iOS).
pub struct WindowHost<P: Presenter> {
    game: Game<P>,
    sender: EventSender,
    translator: EventTranslator,
    clock: FrameClock,
    window: Option<Window>,
    failure: Option<StageError>,
}

impl<P: Presenter> WindowHost<P> {
    //--- Construction -----------------------------------------------------

    /// Wraps a built game. The window is created lazily in `resumed()`.
    pub fn new(game: Game<P>) -> Self {
        let sender = game.sender();
        let clock = FrameClock::new(game.config().fps);
        Self {
            game,
            sender,
            translator: EventTranslator::new(),
            clock,
            window: None,
            failure: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Starts the game unless it already runs, then blocks in the event
    /// loop until it exits.
    ///
    /// # Errors
    ///
    /// Event loop failures, window creation failures and any error
    /// escaping a frame.
    pub fn run(mut self) -> Result<Game<P>, StageError> {
        self.ensure_started()?;

        debug!(target: "platform", "Starting Winit event loop");
        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)?;

        info!(target: "platform", "Event loop exited");
        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(self.game),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// A started game keeps its stack.
    fn ensure_started(&mut self) -> Result<(), StageError> {
        if !self.game.is_started() {
            self.game.start()?;
        }
        Ok(())
    }

    fn window_attributes(&self) -> WindowAttributes {
        let config = self.game.config();
        let mut attrs = WindowAttributes::default()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_size.width,
                config.window_size.height,
            ));
        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        attrs
    }

    /// Runs one game frame and stops the loop on exit or failure.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let delta_time = self.clock.lap();
        match self.game.tick(delta_time) {
            Ok(FrameControl::Continue) => {}
            Ok(FrameControl::Exit) => {
                info!(target: "platform", "Game requested exit");
                event_loop.exit();
            }
            Err(err) => {
                error!(target: "platform", "Frame failed: {}", err);
                self.failure = Some(err);
                event_loop.exit();
            }
        }
    }
}

//=== Winit Integration ===================================================

impl<P: Presenter> ApplicationHandler for WindowHost<P> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        match event_loop.create_window(self.window_attributes()) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.failure = Some(PlatformError::WindowCreation(e).into());
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if matches!(event, WindowEvent::RedrawRequested) {
            self.frame(event_loop);
            return;
        }

        let Some(event) = self.translator.translate(&event) else {
            return;
        };

        let quit = event == Event::Quit;
        trace!(target: "platform::input", "Queued {:?}", event);
        self.sender.send(event);

        // Let scenes see Quit before the loop stops.
        if quit {
            info!(target: "platform", "Window close requested");
            self.frame(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let deadline = self.clock.next_deadline();
        if std::time::Instant::now() >= deadline {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{Color, Size, Surface};
    use crate::core::object::{ObjectRegistry, Spawn};
    use crate::core::scene::{Scene, SceneState};
    use crate::engine::GameBuilder;
    use crate::error::ObjectError;

    //--- Test Helpers -----------------------------------------------------

    struct Failing;

    struct Blank {
        state: SceneState,
    }

    impl Scene for Blank {
        fn state(&self) -> &SceneState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut SceneState {
            &mut self.state
        }
        fn generate_objects(&mut self, _: &ObjectRegistry) -> Result<Vec<Spawn>, ObjectError> {
            Ok(Vec::new())
        }
    }

    fn blank_game() -> Game<HeadlessPresenter> {
        GameBuilder::new()
            .with_main_scene("blank")
            .build(HeadlessPresenter::new())
            .init(|scenes| {
                scenes.register("blank", |ctx| {
                    Box::new(Blank {
                        state: SceneState::from_context(ctx),
                    })
                })?;
                Ok(())
            })
            .unwrap()
    }

    impl Presenter for Failing {
        fn present(&mut self, _frame: &Canvas) -> HookResult {
            Err("device lost".into())
        }
    }

    #[test]
    fn boxed_presenter_delegates() {
        let mut presenter: Box<dyn Presenter> = Box::new(HeadlessPresenter::new());
        let mut canvas = Canvas::new(Size::new(2, 2));
        canvas.fill(Color::WHITE);
        assert!(presenter.present(&canvas).is_ok());

        let mut failing: Box<dyn Presenter> = Box::new(Failing);
        assert_eq!(failing.present(&canvas).unwrap_err().to_string(), "device lost");
    }

    #[test]
    fn host_takes_window_settings_from_config() {
        let game = GameBuilder::new()
            .with_window_size(320, 240)
            .with_fps(30)
            .build(HeadlessPresenter::new());
        let host = WindowHost::new(game);

        assert!(host.window.is_none(), "Window should be created lazily");
        assert_eq!(host.clock.frame_duration(), std::time::Duration::from_secs(1) / 30);
    }

    #[test]
    fn host_starts_unstarted_game() {
        let mut host = WindowHost::new(blank_game());
        host.ensure_started().unwrap();

        assert!(host.game.is_started());
        assert_eq!(host.game.scenes().len(), 1);
    }

    #[test]
    fn host_keeps_stack_of_started_game() {
        let mut game = blank_game();
        game.start().unwrap();
        game.scenes_mut().push("blank").unwrap();

        let mut host = WindowHost::new(game);
        host.ensure_started().unwrap();

        assert_eq!(host.game.scenes().len(), 2);
    }

    #[test]
    fn platform_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PlatformError>();
    }
}
