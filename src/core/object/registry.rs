//=========================================================================
// Object Registry
//=========================================================================
//
// Name → EntityFactory lookup table.
//
// Populated by bootstrap code before the first scene is set up; scenes
// resolve entries by name while generating their objects.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{Entity, EntityFactory};
use crate::error::ObjectError;

//=== ObjectRegistry ======================================================

/// Registry of named entity factories.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    factories: HashMap<String, EntityFactory>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Registers `factory` under `name`.
    ///
    /// # Errors
    ///
    /// [`ObjectError::AlreadyRegistered`] if the name is taken. Unregister
    /// it first to replace an entry.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: EntityFactory,
    ) -> Result<(), ObjectError> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            warn!("Object {:?} is already registered", name);
            return Err(ObjectError::AlreadyRegistered(name));
        }

        debug!("Registered object {:?} ({})", name, factory.name());
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Registers `T::default` under `name`.
    pub fn register_type<T>(&mut self, name: impl Into<String>) -> Result<(), ObjectError>
    where
        T: Entity + Default,
    {
        self.register(name, EntityFactory::of::<T>())
    }

    /// Removes and returns the factory registered under `name`.
    pub fn unregister(&mut self, name: &str) -> Option<EntityFactory> {
        let removed = self.factories.remove(name);
        if removed.is_none() {
            warn!("Cannot unregister unknown object {:?}", name);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.factories.clear();
    }

    //--- Lookup -----------------------------------------------------------

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Factory registered under `name`.
    pub fn get_object(&self, name: &str) -> Result<EntityFactory, ObjectError> {
        self.factories
            .get(name)
            .copied()
            .ok_or_else(|| ObjectError::UnknownObject(name.to_owned()))
    }

    /// Builds a fresh instance of the entity registered under `name`.
    pub fn spawn(&self, name: &str) -> Result<Box<dyn Entity>, ObjectError> {
        self.get_object(name).map(|factory| factory.build())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capability::{DrawState, Drawable};
    use crate::core::render::Surface;
    use crate::error::HookResult;

    #[derive(Default)]
    struct Label {
        draw: DrawState,
    }

    impl Drawable for Label {
        fn draw_state(&self) -> &DrawState {
            &self.draw
        }
        fn draw_state_mut(&mut self) -> &mut DrawState {
            &mut self.draw
        }
        fn perform_draw(&mut self, _target: &mut dyn Surface) -> HookResult {
            Ok(())
        }
    }

    impl Entity for Label {
        fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
            Some(self)
        }
    }

    #[test]
    fn register_and_spawn() {
        let mut registry = ObjectRegistry::new();
        registry.register_type::<Label>("label").unwrap();

        assert!(registry.is_registered("label"));
        assert!(registry.spawn("label").unwrap().is::<Label>());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_name_is_rejected_until_unregistered() {
        let mut registry = ObjectRegistry::new();
        registry.register_type::<Label>("label").unwrap();

        let err = registry.register_type::<Label>("label").unwrap_err();
        assert!(matches!(err, ObjectError::AlreadyRegistered(name) if name == "label"));

        assert!(registry.unregister("label").is_some());
        assert!(registry.unregister("label").is_none());
        registry.register_type::<Label>("label").unwrap();
    }

    #[test]
    fn unknown_name_errors() {
        let registry = ObjectRegistry::new();
        let err = registry.get_object("ghost").unwrap_err();
        assert_eq!(err.to_string(), "`ghost` is not a registered object");
        assert!(registry.spawn("ghost").is_err());
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = ObjectRegistry::new();
        registry.register_type::<Label>("title").unwrap();
        registry.register_type::<Label>("score").unwrap();
        registry.register_type::<Label>("hint").unwrap();
        assert_eq!(registry.names(), ["hint", "score", "title"]);

        registry.clear();
        assert!(registry.is_empty());
    }
}
