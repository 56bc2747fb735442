//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_stage::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Frame driver
pub use crate::engine::{FrameClock, FrameControl, Game, GameBuilder};

// Configuration and logging
pub use crate::config::{ConfigError, StageConfig};
pub use crate::logging::{init_logging, LoggingConfig};

// Errors
pub use crate::error::{BoxError, HookResult, ObjectError, SceneError, StageError};

// Capabilities
pub use crate::core::capability::{
    Capabilities, DrawState, Drawable, EventState, Eventful, Logical, PhaseError, PhaseFlags,
    PhaseResult,
};

// Objects
pub use crate::core::object::{
    AnimationSet, Animator, Direction, Entity, EntityFactory, ObjectRegistry, Objects, Spawn,
};

// Scenes
pub use crate::core::scene::{
    Scene, SceneCallbacks, SceneCommand, SceneCommands, SceneContext, SceneManager, SceneState,
    TransitionKind,
};

// Input
pub use crate::core::input::{Event, EventKind, EventSender, KeyCode, Modifiers, MouseButton};

// Rendering
pub use crate::core::render::{Canvas, Color, DrawOp, Image, Point, Rect, Size, Surface};

// Platform
pub use crate::platform::{HeadlessPresenter, Presenter};
