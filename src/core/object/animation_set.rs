//=========================================================================
// Animation Set
//=========================================================================
//
// Named animators with one current selection (idle, run, jump, ...).
//
// The set itself is the entity placed in a scene. Update, draw and event
// calls go to the current animator only; the others keep their playback
// state untouched until selected again.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::warn;

//=== Internal Dependencies ===============================================

use super::{Animator, Entity};
use crate::core::capability::{
    DrawState, Drawable, EventState, Eventful, Logical, PhaseFlags,
};
use crate::core::input::Event;
use crate::core::render::{Point, Surface};
use crate::error::HookResult;

//=== AnimationSet ========================================================

#[derive(Debug, Default)]
pub struct AnimationSet {
    animators: HashMap<String, Animator>,
    current: Option<String>,

    update_flags: PhaseFlags,
    draw: DrawState,
    events: EventState,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `animator` under `name`, selecting it if nothing is selected.
    pub fn with(mut self, name: impl Into<String>, animator: Animator) -> Self {
        let name = name.into();
        if self.current.is_none() {
            self.current = Some(name.clone());
        }
        self.add(name, animator);
        self
    }

    //--- Membership -------------------------------------------------------

    /// Adds or replaces the animator under `name`.
    pub fn add(&mut self, name: impl Into<String>, animator: Animator) -> Option<Animator> {
        self.animators.insert(name.into(), animator)
    }

    /// Removes the animator under `name`, clearing the selection if it was
    /// current.
    pub fn remove(&mut self, name: &str) -> Option<Animator> {
        let removed = self.animators.remove(name);
        if removed.is_some() && self.current.as_deref() == Some(name) {
            self.current = None;
        }
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.animators.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Animator> {
        self.animators.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Animator> {
        self.animators.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.animators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animators.is_empty()
    }

    /// Animator names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.animators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    //--- Selection --------------------------------------------------------

    /// Selects the animator under `name`.
    ///
    /// Returns false and keeps the current selection if `name` is unknown.
    pub fn play(&mut self, name: &str) -> bool {
        if !self.animators.contains_key(name) {
            warn!("No animation named {:?}", name);
            return false;
        }
        if self.current.as_deref() != Some(name) {
            self.current = Some(name.to_owned());
        }
        true
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current(&self) -> Option<&Animator> {
        self.current.as_ref().and_then(|name| self.animators.get(name))
    }

    pub fn current_mut(&mut self) -> Option<&mut Animator> {
        match &self.current {
            Some(name) => self.animators.get_mut(name),
            None => None,
        }
    }

    //--- Position ---------------------------------------------------------

    /// Position of the current animator.
    pub fn position(&self) -> Option<Point> {
        self.current().map(Animator::position)
    }

    /// Moves the current animator.
    pub fn set_position(&mut self, position: Point) {
        if let Some(animator) = self.current_mut() {
            animator.set_position(position);
        }
    }
}

//=== Capabilities ========================================================

impl Logical for AnimationSet {
    fn update_state(&self) -> &PhaseFlags {
        &self.update_flags
    }

    fn update_state_mut(&mut self) -> &mut PhaseFlags {
        &mut self.update_flags
    }

    fn perform_update(&mut self, delta_time: f32) -> HookResult {
        match self.current_mut() {
            Some(animator) => animator.perform_update(delta_time),
            None => Ok(()),
        }
    }
}

impl Drawable for AnimationSet {
    fn draw_state(&self) -> &DrawState {
        &self.draw
    }

    fn draw_state_mut(&mut self) -> &mut DrawState {
        &mut self.draw
    }

    fn perform_draw(&mut self, target: &mut dyn Surface) -> HookResult {
        match self.current_mut() {
            Some(animator) => animator.perform_draw(target),
            None => Ok(()),
        }
    }
}

impl Eventful for AnimationSet {
    fn event_state(&self) -> &EventState {
        &self.events
    }

    fn event_state_mut(&mut self) -> &mut EventState {
        &mut self.events
    }

    fn handle_event(&mut self, event: &Event) -> HookResult {
        match self.current_mut() {
            Some(animator) => animator.handle_event(event),
            None => Ok(()),
        }
    }
}

impl Entity for AnimationSet {
    fn as_logical(&mut self) -> Option<&mut dyn Logical> {
        Some(self)
    }

    fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
        Some(self)
    }

    fn as_eventful(&mut self) -> Option<&mut dyn Eventful> {
        Some(self)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
