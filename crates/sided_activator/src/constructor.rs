//! Constructor registration tables.
//!
//! Rust has no runtime constructor discovery, so every activatable type
//! publishes a [`TypeInfo`]: the ordered list of its constructors, each with
//! its parameter signature, role tag and body. Selection picks an index into
//! this table; nothing here is inferred at runtime.
//!
//! ```rust
//! use sided_activator::{Activatable, Constructor, ExecutionRole, TypeInfo};
//!
//! struct Foo {
//!     id: i32,
//!     name: Option<String>,
//! }
//!
//! impl Activatable for Foo {
//!     fn type_info() -> TypeInfo<Self> {
//!         TypeInfo::new(vec![
//!             Constructor::new("Foo(id)")
//!                 .param::<i32>("id")
//!                 .build(|args| Ok(Foo { id: args.cloned(0)?, name: None })),
//!             Constructor::new("Foo(id, name)")
//!                 .param::<i32>("id")
//!                 .param::<String>("name")
//!                 .role(ExecutionRole::Server)
//!                 .build(|args| Ok(Foo { id: args.cloned(0)?, name: Some(args.cloned(1)?) })),
//!         ])
//!     }
//! }
//! ```

use crate::error::BoxError;
use crate::role::{ExecutionRole, RoleTag};
use crate::value::{Arguments, DefaultValue, TypeKey, Value};
use smallvec::SmallVec;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// One declared constructor parameter
#[derive(Debug, Clone)]
pub struct Parameter {
    name: &'static str,
    ty: TypeKey,
    assignable_from: SmallVec<[TypeKey; 2]>,
    default: Option<DefaultValue>,
}

impl Parameter {
    pub fn new<P: Any + Send + Sync>(name: &'static str) -> Self {
        Self {
            name,
            ty: TypeKey::of::<P>(),
            assignable_from: SmallVec::new(),
            default: None,
        }
    }

    /// Also accept values of runtime type `V` in this slot
    pub fn assignable_from<V: Any + Send + Sync>(mut self) -> Self {
        let key = TypeKey::of::<V>();
        if key != self.ty && !self.assignable_from.contains(&key) {
            self.assignable_from.push(key);
        }
        self
    }

    /// Declare a default used when nothing else fills the slot
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type, also the key used to query the service resolver
    pub fn ty(&self) -> TypeKey {
        self.ty
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Whether a value of runtime type `key` may be placed in this slot
    pub fn accepts(&self, key: TypeKey) -> bool {
        self.ty == key || self.assignable_from.contains(&key)
    }
}

pub(crate) type ConstructorBody<T> = Arc<dyn Fn(Arguments) -> Result<T, BoxError> + Send + Sync>;

/// One entry of a type's constructor table
pub struct Constructor<T> {
    signature: &'static str,
    role: RoleTag,
    parameters: Vec<Parameter>,
    body: ConstructorBody<T>,
}

impl<T> Clone for Constructor<T> {
    fn clone(&self) -> Self {
        Self {
            signature: self.signature,
            role: self.role,
            parameters: self.parameters.clone(),
            body: self.body.clone(),
        }
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("signature", &self.signature)
            .field("role", &self.role)
            .field("parameters", &self.parameters)
            .finish()
    }
}

impl Constructor<()> {
    /// Start describing a constructor. `signature` is only used in diagnostics.
    pub fn new(signature: &'static str) -> ConstructorBuilder {
        ConstructorBuilder {
            signature,
            role: RoleTag::Any,
            parameters: Vec::new(),
        }
    }
}

impl<T> Constructor<T> {
    /// Get the diagnostic signature
    pub fn signature(&self) -> &'static str {
        self.signature
    }

    /// Get the role tag
    pub fn role(&self) -> RoleTag {
        self.role
    }

    /// Get the parameters in declaration order
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Runs the body with a fully assembled argument list
    pub fn invoke(&self, arguments: Arguments) -> Result<T, BoxError> {
        (self.body)(arguments)
    }

    pub(crate) fn body(&self) -> ConstructorBody<T> {
        self.body.clone()
    }

    /// Same constructor, producing type-erased values
    pub fn erase(self) -> Constructor<Value>
    where
        T: Any + Send + Sync,
    {
        let body = self.body;
        Constructor {
            signature: self.signature,
            role: self.role,
            parameters: self.parameters,
            body: Arc::new(move |arguments| body(arguments).map(Value::new)),
        }
    }
}

/// Builder returned by [`Constructor::new`]
#[derive(Debug, Clone)]
pub struct ConstructorBuilder {
    signature: &'static str,
    role: RoleTag,
    parameters: Vec<Parameter>,
}

impl ConstructorBuilder {
    /// Append a required parameter of type `P`
    pub fn param<P: Any + Send + Sync>(self, name: &'static str) -> Self {
        self.parameter(Parameter::new::<P>(name))
    }

    /// Append a parameter of type `P` defaulting to `default`
    pub fn param_or<P: Any + Send + Sync>(self, name: &'static str, default: P) -> Self {
        self.parameter(
            Parameter::new::<P>(name).with_default(DefaultValue::Value(Value::new(default))),
        )
    }

    /// Append a parameter of type `P` whose declared default is nothing
    pub fn optional_param<P: Any + Send + Sync>(self, name: &'static str) -> Self {
        self.parameter(Parameter::new::<P>(name).with_default(DefaultValue::Nothing))
    }

    /// Append a fully described parameter
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Reserve this constructor for `role`
    pub fn role(mut self, role: ExecutionRole) -> Self {
        self.role = role.into();
        self
    }

    pub fn tag(mut self, tag: RoleTag) -> Self {
        self.role = tag;
        self
    }

    pub fn build<T, F>(self, body: F) -> Constructor<T>
    where
        F: Fn(Arguments) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Constructor {
            signature: self.signature,
            role: self.role,
            parameters: self.parameters,
            body: Arc::new(body),
        }
    }
}

/// Which constructors are preferred per role.
///
/// Computed once when a [`TypeInfo`] is built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreferredSlot {
    #[default]
    None,
    One(usize),
    Ambiguous(usize, usize),
}

/// Preferred constructor per role, computed once per type
#[derive(Debug, Clone, Default)]
pub struct RoleIndex {
    slots: [PreferredSlot; 2],
}

impl RoleIndex {
    fn build<T>(constructors: &[Constructor<T>]) -> Self {
        let mut index = RoleIndex::default();
        for role in ExecutionRole::ALL {
            let slot = &mut index.slots[role.index()];
            for (i, constructor) in constructors.iter().enumerate() {
                if !constructor.role.prefers(role) {
                    continue;
                }
                *slot = match *slot {
                    PreferredSlot::None => PreferredSlot::One(i),
                    PreferredSlot::One(first) => PreferredSlot::Ambiguous(first, i),
                    PreferredSlot::Ambiguous(first, second) => {
                        PreferredSlot::Ambiguous(first, second)
                    }
                };
            }
        }
        index
    }

    /// Get the preferred slot for `role`
    pub fn preferred(&self, role: ExecutionRole) -> &PreferredSlot {
        &self.slots[role.index()]
    }
}

/// Registration table of one activatable type
pub struct TypeInfo<T> {
    name: &'static str,
    constructors: Vec<Constructor<T>>,
    roles: RoleIndex,
}

impl<T> Clone for TypeInfo<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            constructors: self.constructors.clone(),
            roles: self.roles.clone(),
        }
    }
}

impl<T> fmt::Debug for TypeInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("constructors", &self.constructors)
            .field("roles", &self.roles)
            .finish()
    }
}

impl<T: 'static> TypeInfo<T> {
    /// Concrete type with the given constructors, in declaration order
    pub fn new(constructors: Vec<Constructor<T>>) -> Self {
        Self::named(std::any::type_name::<T>(), constructors)
    }
}

impl<T> TypeInfo<T> {
    /// Type with an explicit diagnostic name
    pub fn named(name: &'static str, constructors: Vec<Constructor<T>>) -> Self {
        let roles = RoleIndex::build(&constructors);
        Self {
            name,
            constructors,
            roles,
        }
    }

    /// A type that cannot be activated directly; it has no candidates
    pub fn abstract_type(name: &'static str) -> Self {
        Self::named(name, Vec::new())
    }

    /// Get the type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the constructors in declaration order
    pub fn constructors(&self) -> &[Constructor<T>] {
        &self.constructors
    }

    /// Get the precomputed role index
    pub fn roles(&self) -> &RoleIndex {
        &self.roles
    }

    /// Check whether the type has no constructors
    pub fn is_abstract(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Same table, producing type-erased values
    pub fn erase(self) -> TypeInfo<Value>
    where
        T: Any + Send + Sync,
    {
        TypeInfo {
            name: self.name,
            constructors: self.constructors.into_iter().map(Constructor::erase).collect(),
            roles: self.roles,
        }
    }
}

/// Types that publish a constructor table
pub trait Activatable: Any + Send + Sync + Sized {
    fn type_info() -> TypeInfo<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(signature: &'static str, tag: RoleTag) -> Constructor<()> {
        Constructor::new(signature).tag(tag).build(|_| Ok(()))
    }

    #[test]
    fn test_role_index() {
        let info = TypeInfo::named(
            "T",
            vec![
                unit("a", RoleTag::Any),
                unit("b", RoleTag::Client),
                unit("c", RoleTag::Server),
                unit("d", RoleTag::Server),
                unit("e", RoleTag::Server),
            ],
        );

        assert_eq!(info.roles().preferred(ExecutionRole::Client), &PreferredSlot::One(1));
        assert_eq!(
            info.roles().preferred(ExecutionRole::Server),
            &PreferredSlot::Ambiguous(2, 3)
        );
    }

    #[test]
    fn test_parameter_assignability() {
        let param = Parameter::new::<String>("name").assignable_from::<&'static str>();
        assert!(param.accepts(TypeKey::of::<String>()));
        assert!(param.accepts(TypeKey::of::<&'static str>()));
        assert!(!param.accepts(TypeKey::of::<i32>()));
    }

    #[test]
    fn test_erase_wraps_output() {
        let ctor = Constructor::new("n").param::<i32>("n").build(|args| Ok(*args.get::<i32>(0)? * 2));
        let erased = ctor.erase();
        let value = erased
            .invoke(Arguments::new(vec![Some(Value::new(21i32))]))
            .unwrap();
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));
    }

    #[test]
    fn test_abstract_type_has_no_candidates() {
        let info: TypeInfo<Value> = TypeInfo::abstract_type("dyn Greeter");
        assert!(info.is_abstract());
        assert_eq!(info.roles().preferred(ExecutionRole::Server), &PreferredSlot::None);
    }
}
