//=========================================================================
// Scene Callbacks
//=========================================================================
//
// Closures attached to a scene from outside its type.
//
// Each list runs in registration order, after the matching scene hook:
//   enter  → every time the scene becomes current
//   exit   → every time the scene stops being current
//   update → each unpaused update, before the objects
//   draw   → each draw, after the background fill, before the objects
//
//=========================================================================

use std::fmt;

use crate::core::render::Surface;

//=== Callback Types ======================================================

pub type LifecycleCallback = Box<dyn FnMut()>;
pub type UpdateCallback = Box<dyn FnMut(f32)>;
pub type DrawCallback = Box<dyn FnMut(&mut dyn Surface)>;

//=== SceneCallbacks ======================================================

/// Per-scene callback lists.
#[derive(Default)]
pub struct SceneCallbacks {
    enter: Vec<LifecycleCallback>,
    exit: Vec<LifecycleCallback>,
    update: Vec<UpdateCallback>,
    draw: Vec<DrawCallback>,
}

impl SceneCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    pub fn add_on_enter(&mut self, callback: impl FnMut() + 'static) {
        self.enter.push(Box::new(callback));
    }

    pub fn add_on_exit(&mut self, callback: impl FnMut() + 'static) {
        self.exit.push(Box::new(callback));
    }

    pub fn add_on_update(&mut self, callback: impl FnMut(f32) + 'static) {
        self.update.push(Box::new(callback));
    }

    pub fn add_on_draw(&mut self, callback: impl FnMut(&mut dyn Surface) + 'static) {
        self.draw.push(Box::new(callback));
    }

    /// Drops every registered callback.
    pub fn clear(&mut self) {
        self.enter.clear();
        self.exit.clear();
        self.update.clear();
        self.draw.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty() && self.update.is_empty() && self.draw.is_empty()
    }

    //--- Dispatch ---------------------------------------------------------

    pub(crate) fn fire_enter(&mut self) {
        for callback in &mut self.enter {
            callback();
        }
    }

    pub(crate) fn fire_exit(&mut self) {
        for callback in &mut self.exit {
            callback();
        }
    }

    pub(crate) fn fire_update(&mut self, delta_time: f32) {
        for callback in &mut self.update {
            callback(delta_time);
        }
    }

    pub(crate) fn fire_draw(&mut self, target: &mut dyn Surface) {
        for callback in &mut self.draw {
            callback(target);
        }
    }
}

impl fmt::Debug for SceneCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneCallbacks")
            .field("enter", &self.enter.len())
            .field("exit", &self.exit.len())
            .field("update", &self.update.len())
            .field("draw", &self.draw.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{Canvas, Color, DrawOp, Size};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn lists_fire_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut callbacks = SceneCallbacks::new();
        for tag in ["a", "b"] {
            let log = Rc::clone(&seen);
            callbacks.add_on_enter(move || log.borrow_mut().push(tag));
        }

        callbacks.fire_enter();
        callbacks.fire_exit();
        assert_eq!(*seen.borrow(), ["a", "b"]);
    }

    #[test]
    fn update_and_draw_receive_arguments() {
        let deltas = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&deltas);
        let mut callbacks = SceneCallbacks::new();
        callbacks.add_on_update(move |dt| log.borrow_mut().push(dt));
        callbacks.add_on_draw(|target| target.overlay(Color::BLACK, 10));

        callbacks.fire_update(0.25);
        let mut canvas = Canvas::new(Size::new(2, 2));
        callbacks.fire_draw(&mut canvas);

        assert_eq!(*deltas.borrow(), [0.25]);
        assert_eq!(canvas.ops(), [DrawOp::Overlay { color: Color::BLACK, alpha: 10 }]);
    }

    #[test]
    fn clear_and_debug_report_counts() {
        let mut callbacks = SceneCallbacks::new();
        assert!(callbacks.is_empty());
        callbacks.add_on_exit(|| {});
        assert_eq!(
            format!("{:?}", callbacks),
            "SceneCallbacks { enter: 0, exit: 1, update: 0, draw: 0 }"
        );
        callbacks.clear();
        assert!(callbacks.is_empty());
    }
}
