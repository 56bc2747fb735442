//=========================================================================
// Scene Manager
//=========================================================================
//
// Manages scene registration, stack operations, and lifecycle.
//
// Scene types are registered by name as factories. Navigating to a name
// builds a fresh instance; the stack owns live instances, so a scene
// keeps its state while dormant below the top.
//
// Lifecycle ordering:
//   append  exit(top) → push → setup(new) → first_enter | enter
//   pop     last_exit(top) → remove → enter(new top)
//   reset   last_exit(all, bottom up) → replace stack → setup → first_enter
//   reload  last_exit(top) → setup(top) → enter(top)
//
// Each hook above is followed by the scene's matching callbacks.
// Only the top of the stack receives event, update and draw traffic.
//
// A pending fade is cancelled by every later navigation (append, push,
// reset, clear, another transition). The scene it was fading to never
// entered, so it is dropped without hooks.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{FadeTransition, Scene, SceneCommand, SceneContext, TransitionKind};
use crate::core::capability::{PhaseError, PhaseResult};
use crate::core::input::Event;
use crate::core::object::ObjectRegistry;
use crate::core::render::{Canvas, Color, Size, Surface};
use crate::error::{SceneError, StageError};

//=== Constants ===========================================================

/// Upper bound on command rounds per tick boundary.
///
/// Each round applies everything queued so far; commands queued by the
/// hooks those commands trigger run in the next round.
const MAX_COMMAND_ROUNDS: usize = 64;

//=== Scene Factory =======================================================

/// Builds a fresh scene instance.
pub type SceneFactory = fn(&SceneContext<'_>) -> Box<dyn Scene>;

//=== Scene Manager =======================================================

/// Manages scene lifecycle and stack-based scene switching.
///
/// Scenes are registered once by name and instantiated on navigation.
/// The topmost scene is current and receives all frame traffic.
pub struct SceneManager {
    factories: HashMap<String, SceneFactory>,
    stack: Vec<Box<dyn Scene>>,
    objects: ObjectRegistry,
    fade: Option<FadeTransition>,
    window_size: Size,
    background: Color,
}

impl SceneManager {
    //--- Construction -----------------------------------------------------

    /// Creates a manager with an empty registry and stack.
    pub fn new(window_size: Size) -> Self {
        Self {
            factories: HashMap::new(),
            stack: Vec::new(),
            objects: ObjectRegistry::new(),
            fade: None,
            window_size,
            background: Color::BLACK,
        }
    }

    /// Background handed to new scenes through their context.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    /// Entity registry used during scene setup.
    pub fn objects_mut(&mut self) -> &mut ObjectRegistry {
        &mut self.objects
    }

    pub fn window_size(&self) -> Size {
        self.window_size
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene factory under `name`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use aetheric_stage::prelude::*;
    /// # struct Menu { state: SceneState }
    /// # impl Scene for Menu {
    /// #     fn state(&self) -> &SceneState { &self.state }
    /// #     fn state_mut(&mut self) -> &mut SceneState { &mut self.state }
    /// #     fn generate_objects(&mut self, _: &ObjectRegistry) -> Result<Vec<Spawn>, ObjectError> {
    /// #         Ok(Vec::new())
    /// #     }
    /// # }
    /// let mut manager = SceneManager::new(Size::new(560, 480));
    /// manager
    ///     .register("menu", |ctx| Box::new(Menu { state: SceneState::from_context(ctx) }))
    ///     .unwrap();
    /// manager.push("menu").unwrap();
    /// assert_eq!(manager.len(), 1);
    /// ```
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: SceneFactory,
    ) -> Result<(), SceneError> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            warn!("Scene {:?} is already registered", name);
            return Err(SceneError::AlreadyRegistered(name));
        }

        debug!("Registered scene {:?}", name);
        self.factories.insert(name, factory);
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> Option<SceneFactory> {
        let removed = self.factories.remove(name);
        if removed.is_none() {
            warn!("Cannot unregister unknown scene {:?}", name);
        }
        removed
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Factory registered under `name`.
    pub fn get_scene(&self, name: &str) -> Result<SceneFactory, SceneError> {
        self.factories
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::UnknownScene(name.to_owned()))
    }

    /// Registered scene names, sorted.
    pub fn list_scenes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Builds a new instance of the scene registered under `name`.
    pub fn spawn(&self, name: &str) -> Result<Box<dyn Scene>, SceneError> {
        let factory = self.get_scene(name)?;
        let context = SceneContext {
            size: self.window_size,
            background: self.background,
            objects: &self.objects,
        };
        Ok(factory(&context))
    }

    //--- Stack Operations -------------------------------------------------

    /// Pushes `scene` and makes it current.
    ///
    /// If setup fails the new scene is discarded and the previous top is
    /// entered again. Cancels a pending fade.
    pub fn append(&mut self, mut scene: Box<dyn Scene>) -> Result<(), SceneError> {
        self.cancel_fade();
        if let Some(top) = self.stack.last_mut() {
            top.exit();
        }

        debug!("Pushing scene {} onto stack", scene.scene_name());
        scene.state_mut().resize(self.window_size);

        if let Err(source) = scene.setup(&self.objects) {
            warn!("Setup of scene {} failed: {}", scene.scene_name(), source);
            if let Some(top) = self.stack.last_mut() {
                top.enter();
            }
            return Err(SceneError::Setup {
                scene: scene.scene_name().to_owned(),
                source,
            });
        }

        scene.enter();
        self.stack.push(scene);
        Ok(())
    }

    /// Pushes a new instance of the scene registered under `name`.
    pub fn push(&mut self, name: &str) -> Result<(), SceneError> {
        let scene = self.spawn(name)?;
        self.append(scene)
    }

    /// Removes and returns the current scene, re-entering the one below.
    pub fn pop(&mut self) -> Option<Box<dyn Scene>> {
        let Some(top) = self.stack.last_mut() else {
            warn!("Cannot pop scene: stack is empty");
            return None;
        };

        top.last_exit();
        let popped = self.stack.pop();

        if let Some(scene) = &popped {
            debug!("Popped scene {} from stack", scene.scene_name());
        }
        if let Some(top) = self.stack.last_mut() {
            top.enter();
        }
        popped
    }

    /// Replaces the whole stack with `scene`.
    ///
    /// Every live scene gets `on_last_exit`, bottom first. If setup of the
    /// new scene fails the stack is left empty. Cancels a pending fade.
    pub fn reset(&mut self, mut scene: Box<dyn Scene>) -> Result<(), SceneError> {
        self.cancel_fade();
        debug!(
            "Resetting stack of {} scene(s) to {}",
            self.stack.len(),
            scene.scene_name()
        );
        for live in self.stack.iter_mut() {
            live.last_exit();
        }
        self.stack.clear();

        scene.state_mut().resize(self.window_size);
        if let Err(source) = scene.setup(&self.objects) {
            warn!("Setup of scene {} failed: {}", scene.scene_name(), source);
            return Err(SceneError::Setup {
                scene: scene.scene_name().to_owned(),
                source,
            });
        }

        scene.enter();
        self.stack.push(scene);
        Ok(())
    }

    /// Replaces the whole stack with a new instance of `name`.
    pub fn reset_to(&mut self, name: &str) -> Result<(), SceneError> {
        let scene = self.spawn(name)?;
        self.reset(scene)
    }

    /// Moves to `scene` with the given effect.
    ///
    /// `Fade` keeps drawing the current scene under a darkening overlay for
    /// `duration` seconds of update time, then pushes `scene`. `Cut`, an
    /// empty stack or a non-positive duration push immediately. Either way
    /// a fade already in progress is cancelled.
    pub fn transition_to(
        &mut self,
        scene: Box<dyn Scene>,
        kind: TransitionKind,
        duration: f32,
    ) -> Result<(), SceneError> {
        if kind == TransitionKind::Cut || self.stack.is_empty() || duration <= 0.0 {
            return self.append(scene);
        }

        self.cancel_fade();
        debug!("Fading to scene {} over {}s", scene.scene_name(), duration);
        self.fade = Some(FadeTransition::new(scene, duration));
        Ok(())
    }

    /// Rebuilds the current scene in place.
    pub fn reload_current(&mut self) -> Result<(), SceneError> {
        let Some(top) = self.stack.last_mut() else {
            warn!("Cannot reload: stack is empty");
            return Ok(());
        };

        debug!("Reloading scene {}", top.scene_name());
        top.last_exit();
        if let Err(source) = top.setup(&self.objects) {
            return Err(SceneError::Setup {
                scene: top.scene_name().to_owned(),
                source,
            });
        }
        top.enter();
        Ok(())
    }

    /// Drops every scene, firing `on_last_exit` top first, and cancels any
    /// pending fade.
    pub fn clear(&mut self) {
        debug!("Clearing all scenes from stack");
        while let Some(mut scene) = self.stack.pop() {
            scene.last_exit();
        }
        self.cancel_fade();
    }

    /// Drops the pending fade, if any.
    fn cancel_fade(&mut self) {
        if let Some(fade) = self.fade.take() {
            warn!("Fade to {} cancelled", fade.pending().scene_name());
        }
    }

    //--- Queries ----------------------------------------------------------

    /// The scene receiving frame traffic.
    pub fn current(&self) -> Option<&dyn Scene> {
        self.stack.last().map(|scene| &**scene as &dyn Scene)
    }

    pub fn current_mut(&mut self) -> Option<&mut dyn Scene> {
        self.stack
            .last_mut()
            .map(|scene| &mut **scene as &mut dyn Scene)
    }

    /// Scene names from bottom to top.
    pub fn stack_names(&self) -> Vec<&'static str> {
        self.stack.iter().map(|scene| scene.scene_name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn is_transitioning(&self) -> bool {
        self.fade.is_some()
    }

    //--- Frame Forwarding -------------------------------------------------

    /// Forwards `event` to the current scene.
    ///
    /// Resize events also update the window size handed to new scenes.
    /// While fading, only resize events get through.
    pub fn process_event(&mut self, event: &Event) -> PhaseResult {
        if let Some(size) = event.size() {
            self.window_size = size;
        }
        if self.fade.is_some() && event.size().is_none() {
            return Ok(());
        }

        match self.stack.last_mut() {
            Some(top) => top.handle_scene(event),
            None => Ok(()),
        }
    }

    /// Updates the current scene, then applies queued commands.
    ///
    /// While fading, the fade advances instead and the outgoing scene is
    /// not updated.
    pub fn process_update(&mut self, delta_time: f32) -> Result<(), StageError> {
        match self.fade.as_mut() {
            Some(fade) => {
                if fade.advance(delta_time) {
                    if let Some(fade) = self.fade.take() {
                        self.append(fade.into_scene())?;
                    }
                }
            }
            None => {
                if let Some(top) = self.stack.last_mut() {
                    top.update_scene(delta_time)?;
                }
            }
        }

        self.process_commands()?;
        Ok(())
    }

    /// Draws the current scene and returns its surface.
    pub fn process_draw(&mut self) -> Result<Option<&Canvas>, PhaseError> {
        let alpha = self.fade.as_ref().map(FadeTransition::alpha);
        let Some(top) = self.stack.last_mut() else {
            return Ok(None);
        };

        top.draw_scene()?;
        if let Some(alpha) = alpha {
            top.state_mut().surface_mut().overlay(Color::BLACK, alpha);
        }
        Ok(Some(top.state().surface()))
    }

    //--- Command Processing -----------------------------------------------

    /// Applies commands queued by live scenes.
    ///
    /// Queues are drained bottom to top, each in FIFO order. Commands
    /// queued while applying a round run in the next one. The first
    /// failing command aborts the rest of its round.
    pub fn process_commands(&mut self) -> Result<(), SceneError> {
        for _ in 0..MAX_COMMAND_ROUNDS {
            let batch: Vec<SceneCommand> = self
                .stack
                .iter_mut()
                .flat_map(|scene| scene.state_mut().commands_mut().take())
                .collect();

            if batch.is_empty() {
                return Ok(());
            }

            for command in batch {
                self.apply(command)?;
            }
        }

        warn!(
            "Scene commands still pending after {} rounds; deferring to next tick",
            MAX_COMMAND_ROUNDS
        );
        Ok(())
    }

    fn apply(&mut self, command: SceneCommand) -> Result<(), SceneError> {
        debug!("Applying scene command {:?}", command);
        match command {
            SceneCommand::Push(name) => self.push(&name),
            SceneCommand::Pop => {
                self.pop();
                Ok(())
            }
            SceneCommand::Reset(name) => self.reset_to(&name),
            SceneCommand::Transition {
                scene,
                kind,
                duration,
            } => {
                let scene = self.spawn(&scene)?;
                self.transition_to(scene, kind, duration)
            }
            SceneCommand::Reload => self.reload_current(),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
