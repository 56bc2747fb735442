//=========================================================================
// Stage Errors
//=========================================================================
//
// Error taxonomy:
// - Construction errors (ObjectError, SceneError): incompatible entities,
//   duplicate or unknown registry names. Raised synchronously.
// - Runtime phase errors (PhaseError): failures inside a capability's
//   before/perform/after sequence, routed through the error hook.
// - Driver errors (StageError): umbrella type returned by the frame loop.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::config::ConfigError;
use crate::core::capability::{Capabilities, PhaseError};
use crate::platform::PlatformError;

//=== Hook Results ========================================================

/// Error type returned by user-supplied hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by user-supplied hooks.
pub type HookResult = Result<(), BoxError>;

//=== ObjectError =========================================================

/// Entity collection and entity registry errors.
#[derive(Debug, Error)]
pub enum ObjectError {
    /// Value implements none of the allowed capabilities.
    #[error("object `{name}` implements none of {allowed:?}")]
    Incompatible {
        name: &'static str,
        allowed: Capabilities,
    },

    #[error("object `{0}` is already registered")]
    AlreadyRegistered(String),

    #[error("`{0}` is not a registered object")]
    UnknownObject(String),
}

//=== SceneError ==========================================================

/// Scene registry and scene setup errors.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene `{0}` is already registered")]
    AlreadyRegistered(String),

    #[error("`{0}` is not a registered scene")]
    UnknownScene(String),

    /// Object generation failed while setting a scene up.
    #[error("setup of scene `{scene}` failed")]
    Setup {
        scene: String,
        #[source]
        source: ObjectError,
    },
}

//=== StageError ==========================================================

/// Umbrella error for the frame driver.
///
/// Any of these escaping `Game::tick` is treated as fatal by `Game::run`.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Phase(#[from] PhaseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The presenter failed to show a frame.
    #[error("presenting frame failed")]
    Present(#[source] BoxError),
}

//=========================================================================
// Unit Tests
//=========================================================================
