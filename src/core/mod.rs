//=========================================================================
// Core Systems
//
// Platform-independent heart of the stage.
//
// Responsibilities:
// - `render`: geometry, colors, image handles and the recording `Canvas`
// - `input`: the stage event model and the pending-event queue
// - `capability`: Logical / Drawable / Eventful contracts and the phase
//   executor wrapping them
// - `object`: entities, the `Objects` collection, the entity registry and
//   frame animation
// - `scene`: scenes and the stack-based `SceneManager`
//
// Dependency direction (no cycles):
//   scene → object → capability → input, render
//
//=========================================================================

pub mod capability;
pub mod input;
pub mod object;
pub mod render;
pub mod scene;
