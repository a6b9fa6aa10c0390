//! Service resolution for parameters that are not supplied explicitly

use crate::value::{TypeKey, Value};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tracing::trace;

/// Key-by-type lookup of dependency instances.
///
/// Implementations must be callable from several threads at once and return
/// `None` for types they do not know.
pub trait ServiceResolver: Send + Sync {
    fn get_service(&self, key: TypeKey) -> Option<Value>;
}

impl<R: ServiceResolver + ?Sized> ServiceResolver for Arc<R> {
    fn get_service(&self, key: TypeKey) -> Option<Value> {
        (**self).get_service(key)
    }
}

impl<R: ServiceResolver + ?Sized> ServiceResolver for &R {
    fn get_service(&self, key: TypeKey) -> Option<Value> {
        (**self).get_service(key)
    }
}

/// Resolver that knows nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoServices;

impl ServiceResolver for NoServices {
    fn get_service(&self, _key: TypeKey) -> Option<Value> {
        None
    }
}

type TransientFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// How a registered service is produced
#[derive(Clone)]
enum Registration {
    /// The same instance on every lookup
    Singleton(Value),
    /// A fresh instance on every lookup
    Transient(TransientFactory),
}

/// Simple concurrent service container keyed by type
#[derive(Clone, Default)]
pub struct ServiceProvider {
    registrations: Arc<DashMap<TypeId, Registration>>,
}

impl ServiceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared instance of `T`
    pub fn add_singleton<T: Any + Send + Sync>(&self, service: T) -> &Self {
        self.add_singleton_arc(Arc::new(service))
    }

    /// Register an already shared instance of `T`
    pub fn add_singleton_arc<T: Any + Send + Sync>(&self, service: Arc<T>) -> &Self {
        self.registrations
            .insert(TypeId::of::<T>(), Registration::Singleton(Value::from_arc(service)));
        self
    }

    /// Register a factory producing a new `T` on every lookup
    pub fn add_transient<T, F>(&self, factory: F) -> &Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.registrations.insert(
            TypeId::of::<T>(),
            Registration::Transient(Arc::new(move || Value::new(factory()))),
        );
        self
    }

    /// Drop the registration for `T`, returning whether one existed
    pub fn remove<T: Any>(&self) -> bool {
        self.registrations.remove(&TypeId::of::<T>()).is_some()
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<T>())
    }

    /// Typed lookup
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.get_service(TypeKey::of::<T>())?.downcast::<T>().ok()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl ServiceResolver for ServiceProvider {
    fn get_service(&self, key: TypeKey) -> Option<Value> {
        // The shard lock must be released before a transient factory runs.
        let registration = self.registrations.get(&key.id())?.value().clone();
        trace!(service = key.name(), "resolved service");
        Some(match registration {
            Registration::Singleton(value) => value,
            Registration::Transient(factory) => factory(),
        })
    }
}

impl std::fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("registrations", &self.registrations.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Clock {
        tick: u64,
    }

    #[test]
    fn test_singleton_is_shared() {
        let services = ServiceProvider::new();
        services.add_singleton(Clock { tick: 3 });

        let a = services.get::<Clock>().unwrap();
        let b = services.get::<Clock>().unwrap();
        assert_eq!(a.tick, 3);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_transient_runs_factory_each_time() {
        let counter = Arc::new(AtomicUsize::new(0));
        let services = ServiceProvider::new();
        let calls = counter.clone();
        services.add_transient(move || Clock {
            tick: calls.fetch_add(1, Ordering::SeqCst) as u64,
        });

        assert_eq!(services.get::<Clock>().unwrap().tick, 0);
        assert_eq!(services.get::<Clock>().unwrap().tick, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_missing_and_removed_services() {
        let services = ServiceProvider::new();
        assert!(services.get_service(TypeKey::of::<Clock>()).is_none());

        services.add_singleton(5u32);
        assert!(services.contains::<u32>());
        assert!(services.remove::<u32>());
        assert!(!services.remove::<u32>());
        assert!(services.is_empty());
        assert!(NoServices.get_service(TypeKey::of::<u32>()).is_none());
    }
}
