//=========================================================================
// Entity Capabilities
//=========================================================================
//
// The three capability contracts an entity can implement:
//
//   Logical   per-tick update         perform_update(dt)
//   Drawable  per-frame render        perform_draw(target)
//   Eventful  input dispatch          handle_event(event)
//
// Each contract provides an outer entry point (`update`, `draw`,
// `handle`) that wraps the mandatory override in the phase executor:
// enable gate, before/after hooks, error hook, profiling hook.
//
// Capability state lives in the implementing type and is reached through
// the `*_state` accessors, so the provided methods can consult it.
//
//=========================================================================

//=== Module Declarations =================================================

mod handlers;
pub mod phase;

//=== Public API ==========================================================

pub use handlers::{EventFilter, EventHandler, EventHandlers};
pub use phase::{execute, Phase, PhaseError, PhaseFlags, PhaseResult, Step};

//=== External Dependencies ===============================================

use std::time::Duration;

use bitflags::bitflags;
use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::input::Event;
use crate::core::render::Surface;
use crate::error::HookResult;

//=== Capabilities ========================================================

bitflags! {
    /// Set of capabilities an entity implements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const LOGICAL = 0b001;
        const DRAWABLE = 0b010;
        const EVENTFUL = 0b100;
    }
}

//=== Capability State ====================================================

/// Drawable-side state: phase switches, visibility and draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawState {
    pub flags: PhaseFlags,

    /// Invisible entities are skipped before any hook runs.
    pub visible: bool,

    /// Draw order key. Lower values are drawn first.
    pub z_index: i32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            flags: PhaseFlags::default(),
            visible: true,
            z_index: 0,
        }
    }
}

impl DrawState {
    pub fn with_z_index(z_index: i32) -> Self {
        Self {
            z_index,
            ..Self::default()
        }
    }
}

/// Eventful-side state: phase switches plus bound handlers and filters.
#[derive(Debug, Default)]
pub struct EventState {
    pub flags: PhaseFlags,
    pub handlers: EventHandlers,
}

//=== Logical =============================================================

/// Entity updated once per tick.
///
/// `delta_time` is the time since the previous tick in seconds.
pub trait Logical {
    fn update_state(&self) -> &PhaseFlags;
    fn update_state_mut(&mut self) -> &mut PhaseFlags;

    /// Update logic. Must be implemented.
    fn perform_update(&mut self, delta_time: f32) -> HookResult;

    fn before_update(&mut self, _delta_time: f32) -> HookResult {
        Ok(())
    }

    fn after_update(&mut self, _delta_time: f32) -> HookResult {
        Ok(())
    }

    /// Receives failures from the update sequence. Propagates by default.
    fn on_update_error(&mut self, error: PhaseError) -> PhaseResult {
        Err(error)
    }

    fn on_update_profile(&mut self, elapsed: Duration) {
        trace!(target: "profile", "update took {:?}", elapsed);
    }

    fn enable_update(&mut self) {
        self.update_state_mut().enabled = true;
    }

    fn disable_update(&mut self) {
        self.update_state_mut().enabled = false;
    }

    fn set_update_profiling(&mut self, profiling: bool) {
        self.update_state_mut().profiling = profiling;
    }

    /// Runs the update phase.
    fn update(&mut self, delta_time: f32) -> PhaseResult {
        let flags = *self.update_state();
        execute(
            self,
            Phase::Update,
            flags,
            |this, step| match step {
                Step::Before => this.before_update(delta_time),
                Step::Perform => this.perform_update(delta_time),
                Step::After => this.after_update(delta_time),
            },
            |this, error| this.on_update_error(error),
            |this, elapsed| this.on_update_profile(elapsed),
        )
    }
}

//=== Drawable ============================================================

/// Entity rendered once per frame.
pub trait Drawable {
    fn draw_state(&self) -> &DrawState;
    fn draw_state_mut(&mut self) -> &mut DrawState;

    /// Drawing logic. Must be implemented.
    fn perform_draw(&mut self, target: &mut dyn Surface) -> HookResult;

    fn before_draw(&mut self, _target: &mut dyn Surface) -> HookResult {
        Ok(())
    }

    fn after_draw(&mut self, _target: &mut dyn Surface) -> HookResult {
        Ok(())
    }

    /// Receives failures from the draw sequence. Propagates by default.
    fn on_draw_error(&mut self, error: PhaseError) -> PhaseResult {
        Err(error)
    }

    fn on_draw_profile(&mut self, elapsed: Duration) {
        trace!(target: "profile", "draw took {:?}", elapsed);
    }

    fn z_index(&self) -> i32 {
        self.draw_state().z_index
    }

    fn set_z_index(&mut self, z_index: i32) {
        self.draw_state_mut().z_index = z_index;
    }

    fn is_visible(&self) -> bool {
        self.draw_state().visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.draw_state_mut().visible = visible;
    }

    fn set_draw_enabled(&mut self, enabled: bool) {
        self.draw_state_mut().flags.enabled = enabled;
    }

    fn set_draw_profiling(&mut self, profiling: bool) {
        self.draw_state_mut().flags.profiling = profiling;
    }

    /// Runs the draw phase. Invisible entities are skipped outright.
    fn draw(&mut self, target: &mut dyn Surface) -> PhaseResult {
        let state = *self.draw_state();
        if !state.visible {
            return Ok(());
        }

        execute(
            self,
            Phase::Draw,
            state.flags,
            |this, step| match step {
                Step::Before => this.before_draw(&mut *target),
                Step::Perform => this.perform_draw(&mut *target),
                Step::After => this.after_draw(&mut *target),
            },
            |this, error| this.on_draw_error(error),
            |this, elapsed| this.on_draw_profile(elapsed),
        )
    }
}

//=== Eventful ============================================================

/// Entity receiving input events.
pub trait Eventful {
    fn event_state(&self) -> &EventState;
    fn event_state_mut(&mut self) -> &mut EventState;

    /// Main event handler. Must be implemented.
    fn handle_event(&mut self, event: &Event) -> HookResult;

    fn before_event(&mut self, _event: &Event) -> HookResult {
        Ok(())
    }

    fn after_event(&mut self, _event: &Event) -> HookResult {
        Ok(())
    }

    /// Receives failures from the event sequence. Propagates by default.
    fn on_event_error(&mut self, error: PhaseError) -> PhaseResult {
        Err(error)
    }

    fn on_event_profile(&mut self, elapsed: Duration) {
        trace!(target: "profile", "event took {:?}", elapsed);
    }

    fn enable_event(&mut self) {
        self.event_state_mut().flags.enabled = true;
    }

    fn disable_event(&mut self) {
        self.event_state_mut().flags.enabled = false;
    }

    fn set_event_profiling(&mut self, profiling: bool) {
        self.event_state_mut().flags.profiling = profiling;
    }

    /// Runs the event phase.
    ///
    /// Rejected events (any filter returning false) skip every hook,
    /// profiling included.
    fn handle(&mut self, event: &Event) -> PhaseResult {
        let state = self.event_state();
        let flags = state.flags;
        if !flags.enabled || !state.handlers.accepts(event) {
            return Ok(());
        }

        execute(
            self,
            Phase::Event,
            flags,
            |this, step| match step {
                Step::Before => this.before_event(event),
                Step::Perform => {
                    this.handle_event(event)?;
                    this.event_state_mut().handlers.dispatch(event)
                }
                Step::After => this.after_event(event),
            },
            |this, error| this.on_event_error(error),
            |this, elapsed| this.on_event_profile(elapsed),
        )
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{EventKind, KeyCode};
    use crate::core::render::{Canvas, Size};
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    type Journal = Rc<RefCell<Vec<String>>>;

    #[derive(Default)]
    struct Probe {
        journal: Journal,
        update: PhaseFlags,
        draw: DrawState,
        event: EventState,
        fail_perform: bool,
        swallow: bool,
    }

    impl Probe {
        fn note(&self, entry: &str) {
            self.journal.borrow_mut().push(entry.to_owned());
        }

        fn entries(&self) -> Vec<String> {
            self.journal.borrow().clone()
        }

        fn fail(&self) -> HookResult {
            if self.fail_perform {
                Err("perform failed".into())
            } else {
                Ok(())
            }
        }
    }

    impl Logical for Probe {
        fn update_state(&self) -> &PhaseFlags {
            &self.update
        }
        fn update_state_mut(&mut self) -> &mut PhaseFlags {
            &mut self.update
        }
        fn before_update(&mut self, _dt: f32) -> HookResult {
            self.note("before_update");
            Ok(())
        }
        fn perform_update(&mut self, dt: f32) -> HookResult {
            self.note(&format!("update:{dt}"));
            self.fail()
        }
        fn after_update(&mut self, _dt: f32) -> HookResult {
            self.note("after_update");
            Ok(())
        }
        fn on_update_error(&mut self, error: PhaseError) -> PhaseResult {
            self.note("update_error");
            if self.swallow {
                Ok(())
            } else {
                Err(error)
            }
        }
        fn on_update_profile(&mut self, _elapsed: Duration) {
            self.note("update_profile");
        }
    }

    impl Drawable for Probe {
        fn draw_state(&self) -> &DrawState {
            &self.draw
        }
        fn draw_state_mut(&mut self) -> &mut DrawState {
            &mut self.draw
        }
        fn perform_draw(&mut self, target: &mut dyn Surface) -> HookResult {
            self.note(&format!("draw:{}", target.size().width));
            self.fail()
        }
        fn on_draw_profile(&mut self, _elapsed: Duration) {
            self.note("draw_profile");
        }
    }

    impl Eventful for Probe {
        fn event_state(&self) -> &EventState {
            &self.event
        }
        fn event_state_mut(&mut self) -> &mut EventState {
            &mut self.event
        }
        fn before_event(&mut self, _event: &Event) -> HookResult {
            self.note("before_event");
            Ok(())
        }
        fn handle_event(&mut self, event: &Event) -> HookResult {
            self.note(&format!("handle:{:?}", event.kind()));
            self.fail()
        }
        fn after_event(&mut self, _event: &Event) -> HookResult {
            self.note("after_event");
            Ok(())
        }
        fn on_event_profile(&mut self, _elapsed: Duration) {
            self.note("event_profile");
        }
    }

    //--- Logical ----------------------------------------------------------

    #[test]
    fn update_runs_hooks_around_perform() {
        let mut probe = Probe::default();
        probe.update(0.5).unwrap();
        assert_eq!(probe.entries(), ["before_update", "update:0.5", "after_update"]);
    }

    #[test]
    fn disabled_update_is_silent() {
        let mut probe = Probe::default();
        probe.set_update_profiling(true);
        probe.disable_update();
        probe.update(0.1).unwrap();
        assert!(probe.entries().is_empty());

        probe.enable_update();
        probe.update(0.1).unwrap();
        assert_eq!(probe.entries().len(), 4);
    }

    #[test]
    fn update_error_propagates_through_default_path() {
        let mut probe = Probe {
            fail_perform: true,
            ..Default::default()
        };
        let err = probe.update(1.0).unwrap_err();
        assert_eq!(err.phase, Phase::Update);
        assert_eq!(err.step, Step::Perform);
        assert_eq!(probe.entries(), ["before_update", "update:1", "update_error"]);
    }

    #[test]
    fn update_error_hook_can_recover_and_profile_still_fires() {
        let mut probe = Probe {
            fail_perform: true,
            swallow: true,
            ..Default::default()
        };
        probe.set_update_profiling(true);
        probe.update(1.0).unwrap();
        assert_eq!(
            probe.entries(),
            ["before_update", "update:1", "update_error", "update_profile"]
        );
    }

    //--- Drawable ---------------------------------------------------------

    #[test]
    fn invisible_entity_skips_draw_and_profiling() {
        let mut probe = Probe::default();
        let mut canvas = Canvas::new(Size::new(64, 48));
        probe.set_draw_profiling(true);
        probe.set_visible(false);

        probe.draw(&mut canvas).unwrap();
        assert!(probe.entries().is_empty());

        probe.set_visible(true);
        probe.draw(&mut canvas).unwrap();
        assert_eq!(probe.entries(), ["draw:64", "draw_profile"]);
    }

    #[test]
    fn draw_disabled_gate_is_independent_of_visibility() {
        let mut probe = Probe::default();
        let mut canvas = Canvas::new(Size::new(8, 8));
        probe.set_draw_enabled(false);
        assert!(probe.is_visible());

        probe.draw(&mut canvas).unwrap();
        assert!(probe.entries().is_empty());
    }

    #[test]
    fn draw_error_reports_draw_phase() {
        let mut probe = Probe {
            fail_perform: true,
            ..Default::default()
        };
        let mut canvas = Canvas::new(Size::new(8, 8));
        let err = probe.draw(&mut canvas).unwrap_err();
        assert_eq!(err.phase, Phase::Draw);
    }

    #[test]
    fn z_index_accessors() {
        let mut probe = Probe::default();
        assert_eq!(probe.z_index(), 0);
        probe.set_z_index(-3);
        assert_eq!(probe.z_index(), -3);
    }

    //--- Eventful ---------------------------------------------------------

    #[test]
    fn handle_runs_bound_handlers_after_main_handler() {
        let mut probe = Probe::default();
        let journal = Rc::clone(&probe.journal);
        probe.event.handlers.bind(move |_| {
            journal.borrow_mut().push("generic".into());
            Ok(())
        });
        let journal = Rc::clone(&probe.journal);
        probe.event.handlers.bind_kind(EventKind::KeyDown, move |_| {
            journal.borrow_mut().push("key_handler".into());
            Ok(())
        });

        probe.handle(&Event::key_down(KeyCode::Space)).unwrap();
        assert_eq!(
            probe.entries(),
            ["before_event", "handle:KeyDown", "key_handler", "generic", "after_event"]
        );
    }

    #[test]
    fn filtered_event_skips_everything_including_profiling() {
        let mut probe = Probe::default();
        probe.set_event_profiling(true);
        probe.event.handlers.add_filter(|e| e.kind() != EventKind::Quit);

        probe.handle(&Event::Quit).unwrap();
        assert!(probe.entries().is_empty());

        probe.handle(&Event::Focus(true)).unwrap();
        assert_eq!(probe.entries().last().map(String::as_str), Some("event_profile"));
    }

    #[test]
    fn disabled_event_is_silent() {
        let mut probe = Probe::default();
        probe.disable_event();
        probe.handle(&Event::Quit).unwrap();
        assert!(probe.entries().is_empty());
    }

    #[test]
    fn failing_main_handler_skips_bound_handlers() {
        let mut probe = Probe {
            fail_perform: true,
            ..Default::default()
        };
        let journal = Rc::clone(&probe.journal);
        probe.event.handlers.bind(move |_| {
            journal.borrow_mut().push("generic".into());
            Ok(())
        });

        let err = probe.handle(&Event::Quit).unwrap_err();
        assert_eq!(err.phase, Phase::Event);
        assert_eq!(probe.entries(), ["before_event", "handle:Quit"]);
    }

    #[test]
    fn capabilities_combine() {
        let all = Capabilities::LOGICAL | Capabilities::DRAWABLE | Capabilities::EVENTFUL;
        assert_eq!(all, Capabilities::all());
        assert!(Capabilities::empty().is_empty());
    }
}
