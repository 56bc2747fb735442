//=========================================================================
// Objects
//=========================================================================
//
// Entities and the containers that hold them.
//
// An entity is any value implementing at least one capability (Logical,
// Drawable, Eventful). The `Entity` trait exposes those capabilities as
// optional views so heterogeneous entities can live in one collection
// and be dispatched by capability check instead of by concrete type.
//
// Architecture:
//   Scene
//     └─ Objects: Vec<Box<dyn Entity>>
//          ├─ update → as_logical()  → Logical::update
//          ├─ draw   → as_drawable() → Drawable::draw   (stable z-order)
//          └─ handle → as_eventful() → Eventful::handle
//
//   ObjectRegistry: name → EntityFactory (resolved by scenes at setup)
//
//=========================================================================

//=== Module Declarations =================================================

mod animation_set;
mod animator;
mod objects;
mod registry;

//=== Public API ==========================================================

pub use animation_set::AnimationSet;
pub use animator::{Animator, Direction, FinishCallback};
pub use objects::Objects;
pub use registry::ObjectRegistry;

//=== External Dependencies ===============================================

use std::any::{type_name, Any};
use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::capability::{Capabilities, Drawable, Eventful, Logical};

//=== AsAny ===============================================================

/// Upcast to `Any`, implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== Entity Trait ========================================================

/// A value taking part in per-frame update, draw and event dispatch.
///
/// Implementors override the views of the capabilities they implement:
///
/// ```rust
/// # use aetheric_stage::prelude::*;
/// #[derive(Default)]
/// struct Ticker {
///     flags: PhaseFlags,
///     ticks: u32,
/// }
///
/// impl Logical for Ticker {
///     fn update_state(&self) -> &PhaseFlags { &self.flags }
///     fn update_state_mut(&mut self) -> &mut PhaseFlags { &mut self.flags }
///     fn perform_update(&mut self, _dt: f32) -> HookResult {
///         self.ticks += 1;
///         Ok(())
///     }
/// }
///
/// impl Entity for Ticker {
///     fn as_logical(&mut self) -> Option<&mut dyn Logical> { Some(self) }
/// }
/// ```
///
/// An entity overriding none of the views is rejected by [`Objects`].
pub trait Entity: AsAny {
    fn as_logical(&mut self) -> Option<&mut dyn Logical> {
        None
    }

    fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
        None
    }

    fn as_eventful(&mut self) -> Option<&mut dyn Eventful> {
        None
    }

    /// Name used in logs and errors.
    fn entity_name(&self) -> &'static str {
        type_name::<Self>()
    }

    /// Capabilities derived from the views this entity exposes.
    fn capabilities(&mut self) -> Capabilities {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::LOGICAL, self.as_logical().is_some());
        caps.set(Capabilities::DRAWABLE, self.as_drawable().is_some());
        caps.set(Capabilities::EVENTFUL, self.as_eventful().is_some());
        caps
    }
}

impl<'a> dyn Entity + 'a {
    /// Returns true if the entity is a `T`.
    pub fn is<T: Entity>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Entity>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Entity>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl<'a> fmt::Debug for dyn Entity + 'a {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.entity_name())
    }
}

//=== EntityFactory =======================================================

/// Named no-argument constructor for an entity type.
///
/// Stands in for a type reference wherever an entity may be given either
/// as a value or as "build one of these".
#[derive(Debug, Clone, Copy)]
pub struct EntityFactory {
    name: &'static str,
    build: fn() -> Box<dyn Entity>,
}

impl EntityFactory {
    pub const fn new(name: &'static str, build: fn() -> Box<dyn Entity>) -> Self {
        Self { name, build }
    }

    /// Factory building `T::default()`.
    pub fn of<T: Entity + Default>() -> Self {
        Self::new(type_name::<T>(), build_default::<T>)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Builds a fresh instance.
    pub fn build(&self) -> Box<dyn Entity> {
        (self.build)()
    }
}

fn build_default<T: Entity + Default>() -> Box<dyn Entity> {
    Box::new(T::default())
}

//=== Spawn ===============================================================

/// An entity, or a factory to build one on insertion.
#[derive(Debug)]
pub enum Spawn {
    Instance(Box<dyn Entity>),
    Factory(EntityFactory),
}

impl Spawn {
    /// Materializes the entity, building it if this is a factory.
    pub fn into_entity(self) -> Box<dyn Entity> {
        match self {
            Self::Instance(entity) => entity,
            Self::Factory(factory) => factory.build(),
        }
    }
}

impl<T: Entity> From<T> for Spawn {
    fn from(entity: T) -> Self {
        Self::Instance(Box::new(entity))
    }
}

impl From<Box<dyn Entity>> for Spawn {
    fn from(entity: Box<dyn Entity>) -> Self {
        Self::Instance(entity)
    }
}

impl From<EntityFactory> for Spawn {
    fn from(factory: EntityFactory) -> Self {
        Self::Factory(factory)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capability::{EventState, PhaseFlags};
    use crate::core::input::Event;
    use crate::error::HookResult;

    //--- Test Helpers -----------------------------------------------------

    #[derive(Default)]
    struct Button {
        flags: PhaseFlags,
        events: EventState,
        presses: u32,
    }

    impl Logical for Button {
        fn update_state(&self) -> &PhaseFlags {
            &self.flags
        }
        fn update_state_mut(&mut self) -> &mut PhaseFlags {
            &mut self.flags
        }
        fn perform_update(&mut self, _dt: f32) -> HookResult {
            Ok(())
        }
    }

    impl Eventful for Button {
        fn event_state(&self) -> &EventState {
            &self.events
        }
        fn event_state_mut(&mut self) -> &mut EventState {
            &mut self.events
        }
        fn handle_event(&mut self, _event: &Event) -> HookResult {
            self.presses += 1;
            Ok(())
        }
    }

    impl Entity for Button {
        fn as_logical(&mut self) -> Option<&mut dyn Logical> {
            Some(self)
        }
        fn as_eventful(&mut self) -> Option<&mut dyn Eventful> {
            Some(self)
        }
    }

    struct Inert;

    impl Entity for Inert {}

    //--- Tests ------------------------------------------------------------

    #[test]
    fn capabilities_follow_exposed_views() {
        let mut button = Button::default();
        assert_eq!(
            button.capabilities(),
            Capabilities::LOGICAL | Capabilities::EVENTFUL
        );
        assert!(Inert.capabilities().is_empty());
    }

    #[test]
    fn entity_name_is_type_name() {
        assert!(Inert.entity_name().ends_with("Inert"));
    }

    #[test]
    fn factory_builds_fresh_instances() {
        let factory = EntityFactory::of::<Button>();
        assert!(factory.name().ends_with("Button"));

        let mut first = factory.build();
        first.downcast_mut::<Button>().unwrap().presses = 5;

        let second = factory.build();
        assert_eq!(second.downcast_ref::<Button>().unwrap().presses, 0);
    }

    #[test]
    fn spawn_from_value_box_and_factory() {
        let from_value = Spawn::from(Button::default()).into_entity();
        assert!(from_value.is::<Button>());

        let boxed: Box<dyn Entity> = Box::new(Inert);
        assert!(Spawn::from(boxed).into_entity().is::<Inert>());

        let from_factory = Spawn::from(EntityFactory::of::<Button>());
        assert!(matches!(from_factory, Spawn::Factory(_)));
        assert!(from_factory.into_entity().is::<Button>());
    }

    #[test]
    fn downcast_to_wrong_type_is_none() {
        let entity: Box<dyn Entity> = Box::new(Button::default());
        assert!(entity.downcast_ref::<Inert>().is_none());
    }
}
