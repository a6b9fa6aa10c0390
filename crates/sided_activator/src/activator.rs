//! Activation entry points.
//!
//! [`Activator`] ties constructor selection, instance building and factory
//! compilation together. It holds no per-activation state: every call
//! re-runs selection against the current role and resolver.

use crate::builder::InstanceBuilder;
use crate::config::ActivatorConfig;
use crate::constructor::{Activatable, TypeInfo};
use crate::error::ActivationError;
use crate::factory::{FactoryCompiler, ObjectFactory};
use crate::registry::TypeRegistry;
use crate::role::{ExecutionRole, FixedRole, ForeignRolePolicy, RoleDetector};
use crate::selector::{select_for_types, select_for_values};
use crate::services::ServiceResolver;
use crate::value::{TypeKey, Value};
use crate::Result;
use std::sync::Arc;

/// Sided constructor activator
#[derive(Clone)]
pub struct Activator {
    registry: TypeRegistry,
    roles: Arc<dyn RoleDetector>,
    policy: ForeignRolePolicy,
}

impl Activator {
    /// Activator asking `roles` for the current role, with an empty registry
    pub fn new<R: RoleDetector + 'static>(roles: R) -> Self {
        Self {
            registry: TypeRegistry::new(),
            roles: Arc::new(roles),
            policy: ForeignRolePolicy::default(),
        }
    }

    /// Activator running as the configured role under the configured policy
    pub fn from_config(config: &ActivatorConfig) -> Self {
        Self::new(FixedRole(config.role)).with_policy(config.foreign_role_constructors)
    }

    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_policy(mut self, policy: ForeignRolePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn policy(&self) -> ForeignRolePolicy {
        self.policy
    }

    pub fn current_role(&self) -> ExecutionRole {
        self.roles.current_role()
    }

    /// Construct `T` from explicit `values`, resolving the remaining
    /// parameters through `services`.
    pub fn create_instance<T: Activatable>(
        &self,
        services: &dyn ServiceResolver,
        values: &[Value],
    ) -> Result<T> {
        self.instantiate(&T::type_info(), services, values)
    }

    /// Type-erased [`Activator::create_instance`] through the registry
    pub fn create_instance_of(
        &self,
        services: &dyn ServiceResolver,
        key: TypeKey,
        values: &[Value],
    ) -> Result<Value> {
        let info = self.lookup(key)?;
        self.instantiate(info.as_ref(), services, values)
    }

    /// Compile a reusable factory for `T` given only the argument types.
    ///
    /// `role` is supplied by the caller rather than queried.
    pub fn create_factory<T: Activatable>(
        &self,
        role: ExecutionRole,
        argument_types: &[TypeKey],
    ) -> Result<ObjectFactory<T>> {
        self.compile(&T::type_info(), role, argument_types)
    }

    /// Type-erased [`Activator::create_factory`] through the registry
    pub fn create_factory_of(
        &self,
        role: ExecutionRole,
        key: TypeKey,
        argument_types: &[TypeKey],
    ) -> Result<ObjectFactory<Value>> {
        let info = self.lookup(key)?;
        self.compile(info.as_ref(), role, argument_types)
    }

    /// Return the registered service for `T`, or construct one with no
    /// explicit values.
    pub fn get_service_or_create_instance<T: Activatable>(
        &self,
        services: &dyn ServiceResolver,
    ) -> Result<Arc<T>> {
        match services.get_service(TypeKey::of::<T>()) {
            Some(service) => service.downcast::<T>().map_err(|other| {
                ActivationError::ServiceTypeMismatch {
                    expected: std::any::type_name::<T>(),
                    actual: other.type_key().name(),
                }
            }),
            None => self.create_instance::<T>(services, &[]).map(Arc::new),
        }
    }

    /// Type-erased [`Activator::get_service_or_create_instance`]
    pub fn get_service_or_create_instance_of(
        &self,
        services: &dyn ServiceResolver,
        key: TypeKey,
    ) -> Result<Value> {
        match services.get_service(key) {
            Some(service) if service.type_key() == key => Ok(service),
            Some(service) => Err(ActivationError::ServiceTypeMismatch {
                expected: key.name(),
                actual: service.type_key().name(),
            }),
            None => self.create_instance_of(services, key, &[]),
        }
    }

    fn lookup(&self, key: TypeKey) -> Result<Arc<TypeInfo<Value>>> {
        self.registry
            .get(key)
            .ok_or(ActivationError::UnregisteredType {
                type_name: key.name(),
            })
    }

    fn instantiate<T>(
        &self,
        info: &TypeInfo<T>,
        services: &dyn ServiceResolver,
        values: &[Value],
    ) -> Result<T> {
        let role = self.roles.current_role();
        let selection = select_for_values(info, values, role, self.policy)?;
        InstanceBuilder::new(info.name(), selection.constructor, selection.map)
            .build(values, services)
    }

    fn compile<T: 'static>(
        &self,
        info: &TypeInfo<T>,
        role: ExecutionRole,
        argument_types: &[TypeKey],
    ) -> Result<ObjectFactory<T>> {
        let selection = select_for_types(info, argument_types, role, self.policy)?;
        Ok(FactoryCompiler::compile(
            info.name(),
            selection.constructor,
            selection.map,
        ))
    }
}

impl std::fmt::Debug for Activator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Activator")
            .field("registry", &self.registry)
            .field("role", &self.roles.current_role())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructor::Constructor;
    use crate::services::{NoServices, ServiceProvider};

    #[derive(Debug)]
    struct Counter {
        start: i64,
    }

    impl Activatable for Counter {
        fn type_info() -> TypeInfo<Self> {
            TypeInfo::new(vec![Constructor::new("Counter(start)")
                .param_or::<i64>("start", 0)
                .build(|args| Ok(Counter { start: args.cloned(0)? }))])
        }
    }

    #[test]
    fn test_get_service_prefers_resolver() {
        let activator = Activator::new(FixedRole(ExecutionRole::Server));
        let services = ServiceProvider::new();
        services.add_singleton(Counter { start: 12 });

        let counter = activator.get_service_or_create_instance::<Counter>(&services).unwrap();
        assert_eq!(counter.start, 12);

        let built = activator.get_service_or_create_instance::<Counter>(&NoServices).unwrap();
        assert_eq!(built.start, 0);
    }

    #[test]
    fn test_erased_lookup_requires_registration() {
        let activator = Activator::new(FixedRole(ExecutionRole::Client));
        let err = activator
            .create_instance_of(&NoServices, TypeKey::of::<Counter>(), &[])
            .unwrap_err();
        assert!(matches!(err, ActivationError::UnregisteredType { .. }));

        activator.registry().register::<Counter>();
        let value = activator
            .create_instance_of(&NoServices, TypeKey::of::<Counter>(), &[Value::new(3i64)])
            .unwrap();
        assert_eq!(value.downcast_ref::<Counter>().unwrap().start, 3);
    }

    #[test]
    fn test_from_config() {
        let config = ActivatorConfig {
            role: ExecutionRole::Client,
            foreign_role_constructors: ForeignRolePolicy::Allow,
            ..ActivatorConfig::default()
        };
        let activator = Activator::from_config(&config);
        assert_eq!(activator.current_role(), ExecutionRole::Client);
        assert_eq!(activator.policy(), ForeignRolePolicy::Allow);
    }
}
