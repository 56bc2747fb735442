//=========================================================================
// Aetheric Stage — Library Root
//
// A retained-mode 2D scene and object runtime.
//
// Responsibilities:
// - Dispatch update, draw and event traffic to heterogeneous entities by
//   capability (`core::capability`, `core::object`)
// - Keep a stack of scenes with well-defined lifecycle hooks and fade
//   transitions (`core::scene`)
// - Drive frames and hand finished canvases to a presenter (`Game`)
//
// Typical usage:
// ```no_run
// use aetheric_stage::prelude::*;
//
// fn main() -> Result<(), StageError> {
//     init_logging(LoggingConfig::default());
//     GameBuilder::new()
//         .build(HeadlessPresenter::new())
//         .init(|scenes| { /* register scenes and objects */ Ok(()) })?
//         .run_windowed()?;
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the scene, object, capability, input and render systems.
// `platform` holds Winit integration and presenters.
//
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod platform;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------

mod engine;

//--- Public Exports ------------------------------------------------------

pub use config::{ConfigError, StageConfig};
pub use engine::{FrameClock, FrameControl, Game, GameBuilder};
pub use error::{BoxError, HookResult, ObjectError, SceneError, StageError};
