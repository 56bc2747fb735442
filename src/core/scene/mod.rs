//=========================================================================
// Scene System
//=========================================================================
//
// Scenes and the stack-based manager that selects the current one.
//
// Architecture:
//   SceneManager
//     ├─ factories: HashMap<String, SceneFactory>
//     ├─ stack: Vec<Box<dyn Scene>>       (top = current)
//     ├─ objects: ObjectRegistry          (handed to scene setup)
//     └─ fade: Option<FadeTransition>     (outgoing → pending)
//
// Scene lifecycle:
//   never entered → first_enter → active ⇄ paused
//                → exit → dormant → enter → active ...
//                → last_exit → dropped
//
// Hooks are overridden by the scene type. Callbacks are closures attached
// to a scene's state from outside and run right after the matching hook.
//
// Scenes never reach the manager directly. Navigation requests are queued
// as `SceneCommand`s on the scene's own state and applied by the manager
// at the tick boundary.
//
//=========================================================================

//=== Module Declarations =================================================

mod callbacks;
mod commands;
mod fade;
mod manager;

//=== Public API ==========================================================

pub use callbacks::{DrawCallback, LifecycleCallback, SceneCallbacks, UpdateCallback};
pub use commands::{SceneCommand, SceneCommands};
pub use fade::{FadeTransition, TransitionKind};
pub use manager::{SceneFactory, SceneManager};

//=== External Dependencies ===============================================

use std::any::type_name;
use std::time::{Duration, Instant};

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::capability::{PhaseError, PhaseResult};
use crate::core::input::Event;
use crate::core::object::{AsAny, ObjectRegistry, Objects, Spawn};
use crate::core::render::{Canvas, Color, Size, Surface};
use crate::error::ObjectError;

//=== SceneContext ========================================================

/// What a scene factory gets to build a scene with.
#[derive(Debug, Clone, Copy)]
pub struct SceneContext<'a> {
    /// Current window size.
    pub size: Size,

    /// Default background color.
    pub background: Color,

    /// Entity factories by name.
    pub objects: &'a ObjectRegistry,
}

//=== SceneState ==========================================================

/// State shared by every scene: objects, render surface and flags.
#[derive(Debug)]
pub struct SceneState {
    objects: Objects,
    surface: Canvas,
    background: Color,
    paused: bool,
    first_entered: bool,
    current: bool,
    started_at: Instant,
    commands: SceneCommands,
    callbacks: SceneCallbacks,
}

impl SceneState {
    pub fn new(size: Size, background: Color) -> Self {
        Self {
            objects: Objects::new(),
            surface: Canvas::new(size),
            background,
            paused: false,
            first_entered: false,
            current: false,
            started_at: Instant::now(),
            commands: SceneCommands::new(),
            callbacks: SceneCallbacks::new(),
        }
    }

    /// State sized and colored from the factory context.
    pub fn from_context(context: &SceneContext<'_>) -> Self {
        Self::new(context.size, context.background)
    }

    //--- Objects ----------------------------------------------------------

    pub fn objects(&self) -> &Objects {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut Objects {
        &mut self.objects
    }

    //--- Surface ----------------------------------------------------------

    pub fn surface(&self) -> &Canvas {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Canvas {
        &mut self.surface
    }

    pub fn size(&self) -> Size {
        self.surface.size()
    }

    pub fn resize(&mut self, size: Size) {
        if self.surface.size() != size {
            debug!("Scene surface resized to {}x{}", size.width, size.height);
            self.surface.resize(size);
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    //--- Flags ------------------------------------------------------------

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// True once the scene has been entered for the first time.
    pub fn has_entered(&self) -> bool {
        self.first_entered
    }

    /// True between entering the scene and leaving it.
    pub fn is_current(&self) -> bool {
        self.current
    }

    /// Time since the scene was created.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    //--- Commands ---------------------------------------------------------

    pub fn commands(&self) -> &SceneCommands {
        &self.commands
    }

    /// Queue for navigation requests, applied at the next tick boundary.
    pub fn commands_mut(&mut self) -> &mut SceneCommands {
        &mut self.commands
    }

    //--- Callbacks --------------------------------------------------------

    pub fn callbacks(&self) -> &SceneCallbacks {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut SceneCallbacks {
        &mut self.callbacks
    }

    /// Runs `callback` each time the scene becomes current.
    pub fn add_on_enter(&mut self, callback: impl FnMut() + 'static) {
        self.callbacks.add_on_enter(callback);
    }

    /// Runs `callback` each time the scene stops being current.
    pub fn add_on_exit(&mut self, callback: impl FnMut() + 'static) {
        self.callbacks.add_on_exit(callback);
    }

    /// Runs `callback` on every unpaused update, before the objects.
    pub fn add_on_update(&mut self, callback: impl FnMut(f32) + 'static) {
        self.callbacks.add_on_update(callback);
    }

    /// Runs `callback` on every draw, between the background fill and the
    /// objects.
    pub fn add_on_draw(&mut self, callback: impl FnMut(&mut dyn Surface) + 'static) {
        self.callbacks.add_on_draw(callback);
    }
}

//=== Scene Trait =========================================================

/// A stage holding one object collection and one render surface.
///
/// Only `state`, `state_mut` and `generate_objects` are required.
/// Lifecycle hooks default to doing nothing.
///
/// ```rust
/// # use aetheric_stage::prelude::*;
/// struct Title {
///     state: SceneState,
/// }
///
/// impl Scene for Title {
///     fn state(&self) -> &SceneState { &self.state }
///     fn state_mut(&mut self) -> &mut SceneState { &mut self.state }
///
///     fn generate_objects(&mut self, objects: &ObjectRegistry) -> Result<Vec<Spawn>, ObjectError> {
///         Ok(vec![objects.get_object("logo")?.into()])
///     }
///
///     fn on_event(&mut self, event: &Event) {
///         if *event == Event::key_down(KeyCode::Enter) {
///             self.state_mut().commands_mut().push_scene("level_1");
///         }
///     }
/// }
/// ```
pub trait Scene: AsAny {
    fn state(&self) -> &SceneState;
    fn state_mut(&mut self) -> &mut SceneState;

    /// Entities the scene starts with. Called on every `setup`.
    fn generate_objects(&mut self, objects: &ObjectRegistry) -> Result<Vec<Spawn>, ObjectError>;

    /// Name used in logs and errors.
    fn scene_name(&self) -> &'static str {
        type_name::<Self>()
    }

    //--- Lifecycle Hooks --------------------------------------------------

    /// Called when the scene becomes current again.
    fn on_enter(&mut self) {}

    /// Called when another scene is pushed on top of this one.
    fn on_exit(&mut self) {}

    /// Called the first time the scene becomes current, instead of `on_enter`.
    fn on_first_enter(&mut self) {}

    /// Called when the scene leaves the stack for good.
    fn on_last_exit(&mut self) {}

    fn on_pause(&mut self) {}
    fn on_resume(&mut self) {}

    /// Scene-level logic, run before the objects update. Skipped while paused.
    fn on_update(&mut self, _delta_time: f32) {}

    /// Scene-level input, run before the objects see the event. Skipped
    /// while paused.
    fn on_event(&mut self, _event: &Event) {}

    //--- Provided ---------------------------------------------------------

    /// Rebuilds the object collection from `generate_objects`.
    fn setup(&mut self, objects: &ObjectRegistry) -> Result<(), ObjectError> {
        self.state_mut().objects.clear();
        let spawns = self.generate_objects(objects)?;
        self.state_mut().objects.extend(spawns)?;
        debug!(
            "Scene {} set up with {} objects",
            self.scene_name(),
            self.state().objects.len()
        );
        Ok(())
    }

    /// Runs `on_update`, the update callbacks, then the objects. Skipped
    /// while paused.
    fn update_scene(&mut self, delta_time: f32) -> PhaseResult {
        if self.state().paused {
            return Ok(());
        }
        self.on_update(delta_time);
        let state = self.state_mut();
        state.callbacks.fire_update(delta_time);
        state.objects.update(delta_time)
    }

    /// Renders background, draw callbacks and objects, paused or not.
    fn draw_scene(&mut self) -> Result<&Canvas, PhaseError> {
        let state = self.state_mut();
        state.surface.fill(state.background);
        state.callbacks.fire_draw(&mut state.surface);
        state.objects.draw(&mut state.surface)?;
        Ok(&state.surface)
    }

    /// Adopts resize events, then forwards the event unless paused.
    fn handle_scene(&mut self, event: &Event) -> PhaseResult {
        if let Some(size) = event.size() {
            self.state_mut().resize(size);
        }
        if self.state().paused {
            return Ok(());
        }
        self.on_event(event);
        self.state_mut().objects.handle(event)
    }

    fn is_paused(&self) -> bool {
        self.state().paused
    }

    /// Pauses the scene. No-op if already paused.
    fn pause(&mut self) {
        if !self.state().paused {
            self.state_mut().paused = true;
            self.on_pause();
        }
    }

    /// Resumes the scene. No-op if not paused.
    fn resume(&mut self) {
        if self.state().paused {
            self.state_mut().paused = false;
            self.on_resume();
        }
    }

    fn toggle_pause(&mut self) {
        if self.state().paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Makes the scene current: `on_first_enter` on the first call,
    /// `on_enter` afterwards, then the enter callbacks.
    fn enter(&mut self) {
        if self.state().first_entered {
            self.on_enter();
        } else {
            self.state_mut().first_entered = true;
            self.on_first_enter();
        }
        let state = self.state_mut();
        state.current = true;
        state.callbacks.fire_enter();
    }

    /// Covers the scene: `on_exit`, then the exit callbacks.
    fn exit(&mut self) {
        self.on_exit();
        let state = self.state_mut();
        state.current = false;
        state.callbacks.fire_exit();
    }

    /// Removes the scene for good: `on_last_exit`, then the exit callbacks
    /// if the scene was still current.
    fn last_exit(&mut self) {
        self.on_last_exit();
        let state = self.state_mut();
        if state.current {
            state.current = false;
            state.callbacks.fire_exit();
        }
    }
}

impl<'a> dyn Scene + 'a {
    pub fn is<T: Scene>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Scene>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Scene>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
