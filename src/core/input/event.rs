//=========================================================================
// Stage Event Types
//
// Defines the engine-side representation of window and input events.
//
// This module abstracts away platform-specific input (e.g. Winit, SDL)
// into a unified format consumed by scenes and eventful entities.
//
// Responsibilities:
// - Represent keyboard, mouse and window events in a portable way
// - Expose a fieldless `EventKind` used to key type-specific handlers
// - Carry the new window size on resize events
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    EventQueue (crossbeam)
//         ↓
//    SceneManager::process_event
//         ↓
//    Scene::handle_scene → Objects::handle → Eventful::handle
// ```
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::render::{Point, Size};

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button (side buttons, thumb buttons, macro keys).
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// For example, `KeyA` is always the same physical key regardless of
/// keyboard layout (QWERTY vs AZERTY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Keys the platform reported but the stage does not name.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Left and right variants are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    /// Shift key held (either left or right).
    pub shift: bool,

    /// Ctrl key held (either left or right, Command on macOS).
    pub ctrl: bool,

    /// Alt key held (either left or right, Option on macOS).
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    /// Ctrl only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    /// Alt only.
    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
}

//=== EventKind ===========================================================

/// Fieldless event discriminant.
///
/// Used as the key for type-specific handlers bound on eventful entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Quit,
    Resize,
    KeyDown,
    KeyUp,
    MouseButtonDown,
    MouseButtonUp,
    MouseMoved,
    Focus,
    User,
    Unidentified,
}

//=== Event ===============================================================

/// Window or input event delivered to the current scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Window close requested by user or OS.
    Quit,

    /// Window resized. Carries the new dimensions.
    ///
    /// Scenes adopt the new size even while paused.
    Resize { size: Size },

    /// Key pressed down.
    KeyDown { key: KeyCode, modifiers: Modifiers },

    /// Key released.
    KeyUp { key: KeyCode, modifiers: Modifiers },

    /// Mouse button pressed at the cursor position.
    MouseButtonDown {
        button: MouseButton,
        position: Point,
        modifiers: Modifiers,
    },

    /// Mouse button released at the cursor position.
    MouseButtonUp {
        button: MouseButton,
        position: Point,
        modifiers: Modifiers,
    },

    /// Cursor moved (screen space, top-left origin).
    MouseMoved { position: Point },

    /// Window gained (`true`) or lost (`false`) focus.
    Focus(bool),

    /// Application-defined event.
    User { code: u32 },

    /// Unrecognized or unsupported platform event.
    Unidentified,
}

impl Event {
    /// Returns the event's discriminant.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Quit => EventKind::Quit,
            Self::Resize { .. } => EventKind::Resize,
            Self::KeyDown { .. } => EventKind::KeyDown,
            Self::KeyUp { .. } => EventKind::KeyUp,
            Self::MouseButtonDown { .. } => EventKind::MouseButtonDown,
            Self::MouseButtonUp { .. } => EventKind::MouseButtonUp,
            Self::MouseMoved { .. } => EventKind::MouseMoved,
            Self::Focus(_) => EventKind::Focus,
            Self::User { .. } => EventKind::User,
            Self::Unidentified => EventKind::Unidentified,
        }
    }

    /// New window size for resize events, `None` otherwise.
    pub fn size(&self) -> Option<Size> {
        match self {
            Self::Resize { size } => Some(*size),
            _ => None,
        }
    }

    /// Shorthand for a key press without modifiers.
    pub fn key_down(key: KeyCode) -> Self {
        Self::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn resize(width: u32, height: u32) -> Self {
        Self::Resize {
            size: Size::new(width, height),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
