//=========================================================================
// Input
//
// Event model and the pending-event queue feeding the frame driver.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod queue;

//=== Public API ==========================================================

pub use event::{Event, EventKind, KeyCode, Modifiers, MouseButton};
pub use queue::{EventQueue, EventSender};
