//=========================================================================
// Event Mapper
//=========================================================================
//
// Converts Winit window events into stage `Event`s.
//
// Architecture:
//   WindowEvent → EventTranslator → Event (stage type) → EventSender
//
// Stateful tracking: modifier state from `ModifiersChanged` and the last
// cursor position from `CursorMoved` are cached and stamped onto every
// later key and mouse-button event. Keys the stage does not name arrive
// as `KeyCode::Unidentified`; window events it has no use for are
// dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;
use winit::{
    event::{ElementState, MouseButton as WinitMouseButton, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{Event, KeyCode, Modifiers, MouseButton};
use crate::core::render::{Point, Size};

//=== EventTranslator =====================================================

/// Maps Winit events onto the stage event model.
#[derive(Debug, Default)]
pub struct EventTranslator {
    modifiers: Modifiers,
    cursor: Point,
}

impl EventTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Cached State -----------------------------------------------------

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Last reported cursor position.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    //--- Translation ------------------------------------------------------

    /// Translates one window event.
    ///
    /// Returns `None` for events that only update cached state
    /// (`ModifiersChanged`) and for events the stage ignores (redraws,
    /// scale changes, IME, touch).
    pub fn translate(&mut self, event: &WindowEvent) -> Option<Event> {
        match event {
            WindowEvent::CloseRequested => Some(Event::Quit),

            WindowEvent::Resized(size) => Some(Event::Resize {
                size: Size::new(size.width, size.height),
            }),

            WindowEvent::Focused(focused) => Some(Event::Focus(*focused)),

            WindowEvent::ModifiersChanged(state) => {
                self.set_modifiers(state.state());
                None
            }

            WindowEvent::CursorMoved { position, .. } => {
                Some(self.cursor_moved(position.x, position.y))
            }

            WindowEvent::KeyboardInput { event, .. } => {
                Some(self.key(event.physical_key, event.state))
            }

            WindowEvent::MouseInput { state, button, .. } => {
                Some(self.mouse_button(*button, *state))
            }

            WindowEvent::RedrawRequested
            | WindowEvent::ScaleFactorChanged { .. }
            | WindowEvent::Moved(_)
            | WindowEvent::Occluded(_) => None,

            other => {
                trace!(target: "platform::input", "Unmapped window event: {:?}", other);
                Some(Event::Unidentified)
            }
        }
    }

    //--- Building Blocks --------------------------------------------------

    pub fn set_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers::from(state);
    }

    /// Records the cursor position (rounded to whole pixels).
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> Event {
        self.cursor = Point::new(x.round() as i32, y.round() as i32);
        Event::MouseMoved {
            position: self.cursor,
        }
    }

    pub fn key(&self, physical_key: PhysicalKey, state: ElementState) -> Event {
        let key = match physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            PhysicalKey::Unidentified(_) => KeyCode::Unidentified,
        };

        match state {
            ElementState::Pressed => Event::KeyDown {
                key,
                modifiers: self.modifiers,
            },
            ElementState::Released => Event::KeyUp {
                key,
                modifiers: self.modifiers,
            },
        }
    }

    /// Button event at the last known cursor position.
    pub fn mouse_button(&self, button: WinitMouseButton, state: ElementState) -> Event {
        let button = MouseButton::from(button);
        match state {
            ElementState::Pressed => Event::MouseButtonDown {
                button,
                position: self.cursor,
                modifiers: self.modifiers,
            },
            ElementState::Released => Event::MouseButtonUp {
                button,
                position: self.cursor,
                modifiers: self.modifiers,
            },
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Winit normalizes platform keys (macOS Cmd → Ctrl, Option → Alt).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Converts Winit physical key codes to stage key codes.
///
/// Maps A-Z, 0-9, arrows, and common editing keys. Everything else
/// (function keys, numpad, media keys) becomes `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Editing ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,

            _ => KeyCode::Unidentified,
        }
    }
}

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
