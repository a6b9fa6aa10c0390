//! Registration table of activatable types, keyed by type

use crate::constructor::{Activatable, TypeInfo};
use crate::value::{TypeKey, Value};
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;
use tracing::debug;

/// Type-erased constructor tables for activation by [`TypeKey`].
///
/// Populated at start-up and read during activation. Cloning shares the
/// underlying table.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    types: Arc<DashMap<TypeId, Arc<TypeInfo<Value>>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` using its own constructor table
    pub fn register<T: Activatable>(&self) -> &Self {
        self.register_info(TypeKey::of::<T>(), T::type_info().erase())
    }

    /// Register `T` as abstract: it can be resolved but never constructed
    pub fn register_abstract<T: ?Sized + 'static>(&self) -> &Self {
        let key = TypeKey::of::<T>();
        self.register_info(key, TypeInfo::abstract_type(key.name()))
    }

    /// Register an explicit table under `key`, replacing any previous one
    pub fn register_info(&self, key: TypeKey, info: TypeInfo<Value>) -> &Self {
        debug!(
            type_name = key.name(),
            constructors = info.constructors().len(),
            "registered activatable type"
        );
        self.types.insert(key.id(), Arc::new(info));
        self
    }

    pub fn get(&self, key: TypeKey) -> Option<Arc<TypeInfo<Value>>> {
        self.types.get(&key.id()).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key: TypeKey) -> bool {
        self.types.contains_key(&key.id())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructor::Constructor;

    struct Marker;

    impl Activatable for Marker {
        fn type_info() -> TypeInfo<Self> {
            TypeInfo::new(vec![Constructor::new("Marker()").build(|_| Ok(Marker))])
        }
    }

    trait Greeter {}

    #[test]
    fn test_register_and_lookup() {
        let registry = TypeRegistry::new();
        registry.register::<Marker>().register_abstract::<dyn Greeter>();

        assert_eq!(registry.len(), 2);
        let marker = registry.get(TypeKey::of::<Marker>()).unwrap();
        assert_eq!(marker.constructors().len(), 1);
        assert!(registry.get(TypeKey::of::<dyn Greeter>()).unwrap().is_abstract());
        assert!(!registry.contains(TypeKey::of::<u8>()));
    }
}
