//=========================================================================
// Object Collection
//=========================================================================
//
// Ordered, capability-checked container of entities owned by a scene.
//
// Dispatch rules:
// - update: Logical members, insertion order
// - draw:   Drawable members, stable ascending z_index
// - handle: Eventful members, insertion order
//
// Members lacking the relevant capability are skipped. The first member
// whose phase returns an error aborts the pass; later members are not
// visited.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::warn;

//=== Internal Dependencies ===============================================

use super::{Entity, Spawn};
use crate::core::capability::{Capabilities, PhaseResult};
use crate::core::input::Event;
use crate::core::render::Surface;
use crate::error::ObjectError;

//=== Objects =============================================================

/// Ordered collection of entities.
///
/// Every member implements at least one capability. The same entity type
/// may appear any number of times; each instance is dispatched
/// independently.
#[derive(Default)]
pub struct Objects {
    items: Vec<Box<dyn Entity>>,
}

impl Objects {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Insertion --------------------------------------------------------

    /// Appends an entity, building it first if given a factory.
    ///
    /// # Errors
    ///
    /// [`ObjectError::Incompatible`] if the entity implements no
    /// capability. The collection is left unchanged.
    pub fn append(&mut self, item: impl Into<Spawn>) -> Result<(), ObjectError> {
        let entity = admit(item.into())?;
        self.items.push(entity);
        Ok(())
    }

    /// Inserts an entity before `index`. Indices past the end append.
    pub fn insert(&mut self, index: usize, item: impl Into<Spawn>) -> Result<(), ObjectError> {
        let entity = admit(item.into())?;
        let index = index.min(self.items.len());
        self.items.insert(index, entity);
        Ok(())
    }

    /// Appends every item in order.
    ///
    /// All items are checked before any is inserted, so a rejected item
    /// leaves the collection unchanged.
    pub fn extend<I>(&mut self, items: I) -> Result<(), ObjectError>
    where
        I: IntoIterator,
        I::Item: Into<Spawn>,
    {
        let admitted = items
            .into_iter()
            .map(|item| admit(item.into()))
            .collect::<Result<Vec<_>, _>>()?;
        self.items.extend(admitted);
        Ok(())
    }

    //--- Removal ----------------------------------------------------------

    /// Removes and returns the entity at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Box<dyn Entity>> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            warn!("No object at index {} (len {})", index, self.items.len());
            None
        }
    }

    /// Drops every entity. No per-entity hook runs.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    //--- Access -----------------------------------------------------------

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Entity> {
        self.items.get(index).map(|entity| &**entity as &dyn Entity)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut dyn Entity> {
        self.items
            .get_mut(index)
            .map(|entity| &mut **entity as &mut dyn Entity)
    }

    /// Iterates members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Entity> + '_ {
        self.items.iter().map(|entity| &**entity as &dyn Entity)
    }

    /// First member of type `T`.
    pub fn find<T: Entity>(&self) -> Option<&T> {
        self.items.iter().find_map(|entity| entity.downcast_ref::<T>())
    }

    pub fn find_mut<T: Entity>(&mut self) -> Option<&mut T> {
        self.items
            .iter_mut()
            .find_map(|entity| entity.downcast_mut::<T>())
    }

    //--- Dispatch ---------------------------------------------------------

    /// Updates Logical members in insertion order.
    pub fn update(&mut self, delta_time: f32) -> PhaseResult {
        for entity in self.items.iter_mut() {
            if let Some(logical) = entity.as_logical() {
                logical.update(delta_time)?;
            }
        }
        Ok(())
    }

    /// Draws Drawable members by ascending z_index.
    ///
    /// Members sharing a z_index keep their insertion order.
    pub fn draw(&mut self, target: &mut dyn Surface) -> PhaseResult {
        let mut order: Vec<(i32, usize)> = self
            .items
            .iter_mut()
            .enumerate()
            .filter_map(|(index, entity)| {
                entity.as_drawable().map(|drawable| (drawable.z_index(), index))
            })
            .collect();

        order.sort_by_key(|&(z_index, _)| z_index);

        for (_, index) in order {
            if let Some(drawable) = self.items[index].as_drawable() {
                drawable.draw(&mut *target)?;
            }
        }
        Ok(())
    }

    /// Hands `event` to Eventful members in insertion order.
    pub fn handle(&mut self, event: &Event) -> PhaseResult {
        for entity in self.items.iter_mut() {
            if let Some(eventful) = entity.as_eventful() {
                eventful.handle(event)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Objects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

//=== Helpers =============================================================

/// Materializes `spawn` and checks it implements at least one capability.
fn admit(spawn: Spawn) -> Result<Box<dyn Entity>, ObjectError> {
    let mut entity = spawn.into_entity();
    if entity.capabilities().is_empty() {
        warn!("Rejected object {}: no capability implemented", entity.entity_name());
        return Err(ObjectError::Incompatible {
            name: entity.entity_name(),
            allowed: Capabilities::all(),
        });
    }
    Ok(entity)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capability::{
        DrawState, Drawable, EventState, Eventful, Logical, PhaseError, PhaseFlags,
    };
    use crate::core::object::EntityFactory;
    use crate::core::render::{Canvas, Size};
    use crate::error::HookResult;
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    type Journal = Rc<RefCell<Vec<String>>>;

    /// Entity with a configurable capability set that records every
    /// perform call as "<phase>:<tag>".
    struct Probe {
        tag: &'static str,
        caps: Capabilities,
        journal: Journal,
        update: PhaseFlags,
        draw: DrawState,
        event: EventState,
        fail: bool,
    }

    impl Probe {
        fn new(tag: &'static str, caps: Capabilities, journal: &Journal) -> Self {
            Self {
                tag,
                caps,
                journal: Rc::clone(journal),
                update: PhaseFlags::default(),
                draw: DrawState::default(),
                event: EventState::default(),
                fail: false,
            }
        }

        fn z(mut self, z_index: i32) -> Self {
            self.draw.z_index = z_index;
            self
        }

        fn failing(mut self) -> Self {
            self.fail = true;
            self
        }

        fn record(&self, phase: &str) -> HookResult {
            self.journal.borrow_mut().push(format!("{phase}:{}", self.tag));
            if self.fail {
                Err(format!("{} failed", self.tag).into())
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
        fn perform_update(&mut self, _dt: f32) -> HookResult {
            self.record("update")
        }
    }

    impl Drawable for Probe {
        fn draw_state(&self) -> &DrawState {
            &self.draw
        }
        fn draw_state_mut(&mut self) -> &mut DrawState {
            &mut self.draw
        }
        fn perform_draw(&mut self, _target: &mut dyn Surface) -> HookResult {
            self.record("draw")
        }
    }

    impl Eventful for Probe {
        fn event_state(&self) -> &EventState {
            &self.event
        }
        fn event_state_mut(&mut self) -> &mut EventState {
            &mut self.event
        }
        fn handle_event(&mut self, _event: &Event) -> HookResult {
            self.record("event")
        }
    }

    impl Entity for Probe {
        fn as_logical(&mut self) -> Option<&mut dyn Logical> {
            if self.caps.contains(Capabilities::LOGICAL) {
                Some(self)
            } else {
                None
            }
        }
        fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
            if self.caps.contains(Capabilities::DRAWABLE) {
                Some(self)
            } else {
                None
            }
        }
        fn as_eventful(&mut self) -> Option<&mut dyn Eventful> {
            if self.caps.contains(Capabilities::EVENTFUL) {
                Some(self)
            } else {
                None
            }
        }
        fn entity_name(&self) -> &'static str {
            self.tag
        }
    }

    #[derive(Default)]
    struct Plain;

    impl Entity for Plain {}

    #[derive(Default)]
    struct Counter {
        flags: PhaseFlags,
        ticks: u32,
    }

    impl Logical for Counter {
        fn update_state(&self) -> &PhaseFlags {
            &self.flags
        }
        fn update_state_mut(&mut self) -> &mut PhaseFlags {
            &mut self.flags
        }
        fn perform_update(&mut self, _dt: f32) -> HookResult {
            self.ticks += 1;
            Ok(())
        }
    }

    impl Entity for Counter {
        fn as_logical(&mut self) -> Option<&mut dyn Logical> {
            Some(self)
        }
    }

    fn journal() -> Journal {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.borrow().clone()
    }

    const ALL: Capabilities = Capabilities::all();

    //--- Insertion --------------------------------------------------------

    #[test]
    fn append_rejects_entity_without_capabilities() {
        let mut objects = Objects::new();
        objects.append(Counter::default()).unwrap();

        let err = objects.append(Plain).unwrap_err();
        assert!(matches!(err, ObjectError::Incompatible { name, .. } if name.ends_with("Plain")));
        assert_eq!(objects.len(), 1);
    }

    #[test]
    fn append_builds_from_factory() {
        let mut objects = Objects::new();
        objects.append(EntityFactory::of::<Counter>()).unwrap();
        objects.append(EntityFactory::of::<Counter>()).unwrap();

        assert_eq!(objects.len(), 2);
        objects.update(0.016).unwrap();
        assert_eq!(objects.find::<Counter>().map(|c| c.ticks), Some(1));
    }

    #[test]
    fn factory_for_incompatible_type_is_rejected() {
        let mut objects = Objects::new();
        assert!(objects.append(EntityFactory::of::<Plain>()).is_err());
        assert!(objects.is_empty());
    }

    #[test]
    fn insert_places_before_index_and_clamps() {
        let log = journal();
        let mut objects = Objects::new();
        objects.append(Probe::new("a", ALL, &log)).unwrap();
        objects.append(Probe::new("c", ALL, &log)).unwrap();
        objects.insert(1, Probe::new("b", ALL, &log)).unwrap();
        objects.insert(99, Probe::new("d", ALL, &log)).unwrap();

        let names: Vec<_> = objects.iter().map(|e| e.entity_name()).collect();
        assert_eq!(names, ["a", "b", "c", "d"]);
    }

    #[test]
    fn extend_is_all_or_nothing() {
        let mut objects = Objects::new();
        let batch: Vec<Spawn> = vec![
            Counter::default().into(),
            Plain.into(),
            Counter::default().into(),
        ];

        assert!(objects.extend(batch).is_err());
        assert!(objects.is_empty());

        objects
            .extend([EntityFactory::of::<Counter>(), EntityFactory::of::<Counter>()])
            .unwrap();
        assert_eq!(objects.len(), 2);
    }

    #[test]
    fn same_entity_type_twice_dispatches_twice() {
        let log = journal();
        let mut objects = Objects::new();
        objects.append(Probe::new("x", ALL, &log)).unwrap();
        objects.append(Probe::new("x", ALL, &log)).unwrap();

        objects.update(0.0).unwrap();
        assert_eq!(entries(&log), ["update:x", "update:x"]);
    }

    //--- Removal ----------------------------------------------------------

    #[test]
    fn remove_and_clear() {
        let log = journal();
        let mut objects = Objects::new();
        objects.append(Probe::new("a", ALL, &log)).unwrap();
        objects.append(Probe::new("b", ALL, &log)).unwrap();

        let removed = objects.remove(0).unwrap();
        assert_eq!(removed.entity_name(), "a");
        assert!(objects.remove(5).is_none());

        objects.clear();
        assert!(objects.is_empty());
    }

    //--- Dispatch ---------------------------------------------------------

    #[test]
    fn update_visits_only_logical_members_in_order() {
        let log = journal();
        let mut objects = Objects::new();
        objects.append(Probe::new("a", Capabilities::LOGICAL, &log)).unwrap();
        objects.append(Probe::new("b", Capabilities::DRAWABLE, &log)).unwrap();
        objects.append(Probe::new("c", ALL, &log)).unwrap();
        objects.append(Probe::new("d", Capabilities::EVENTFUL, &log)).unwrap();

        objects.update(0.1).unwrap();
        assert_eq!(entries(&log), ["update:a", "update:c"]);
    }

    #[test]
    fn draw_is_stable_by_z_index() {
        let log = journal();
        let mut objects = Objects::new();
        objects.append(Probe::new("a", ALL, &log).z(2)).unwrap();
        objects.append(Probe::new("b", ALL, &log).z(-1)).unwrap();
        objects.append(Probe::new("c", Capabilities::LOGICAL, &log).z(-5)).unwrap();
        objects.append(Probe::new("d", ALL, &log).z(2)).unwrap();
        objects.append(Probe::new("e", ALL, &log).z(0)).unwrap();
        objects.append(Probe::new("f", ALL, &log).z(-1)).unwrap();

        let mut canvas = Canvas::new(Size::new(4, 4));
        objects.draw(&mut canvas).unwrap();
        assert_eq!(
            entries(&log),
            ["draw:b", "draw:f", "draw:e", "draw:a", "draw:d"]
        );
    }

    #[test]
    fn handle_visits_only_eventful_members() {
        let log = journal();
        let mut objects = Objects::new();
        objects.append(Probe::new("a", Capabilities::EVENTFUL, &log)).unwrap();
        objects.append(Probe::new("b", Capabilities::LOGICAL, &log)).unwrap();
        objects.append(Probe::new("c", ALL, &log)).unwrap();

        objects.handle(&Event::Quit).unwrap();
        assert_eq!(entries(&log), ["event:a", "event:c"]);
    }

    #[test]
    fn failing_member_aborts_the_pass() {
        let log = journal();
        let mut objects = Objects::new();
        objects.append(Probe::new("a", ALL, &log)).unwrap();
        objects.append(Probe::new("b", ALL, &log).failing()).unwrap();
        objects.append(Probe::new("c", ALL, &log)).unwrap();

        let err: PhaseError = objects.update(0.1).unwrap_err();
        assert_eq!(err.source.to_string(), "b failed");
        assert_eq!(entries(&log), ["update:a", "update:b"]);
    }

    #[test]
    fn find_mut_reaches_concrete_type() {
        let mut objects = Objects::new();
        objects.append(Counter::default()).unwrap();
        objects.find_mut::<Counter>().unwrap().ticks = 7;
        assert_eq!(objects.find::<Counter>().unwrap().ticks, 7);
        assert!(objects.get(0).is_some_and(|e| e.is::<Counter>()));
        assert!(objects.get_mut(1).is_none());
    }
}
