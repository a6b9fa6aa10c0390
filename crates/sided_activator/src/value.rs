//! Type-erased values and the argument list handed to constructor bodies

use crate::error::ArgumentError;
use crate::utils::short_type_name;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Runtime identity of a type
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key of `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Get the underlying `TypeId`
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full type path, as reported by `std::any::type_name`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check whether this is the key of `T`
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", short_type_name(self.name))
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A shared, type-erased value.
///
/// Explicit arguments, resolved services and declared defaults all travel as
/// `Value`s. Cloning is an `Arc` clone.
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    key: TypeKey,
}

impl Value {
    /// Wrap an owned value
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            key: TypeKey::of::<T>(),
        }
    }

    /// Wraps an existing shared instance without re-allocating it
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            key: TypeKey::of::<T>(),
        }
    }

    /// Get the runtime type of the wrapped value
    pub fn type_key(&self) -> TypeKey {
        self.key
    }

    /// Check whether the wrapped value is a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.key.is::<T>()
    }

    /// Borrow the wrapped value as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns the shared instance, or gives the value back on a type mismatch
    pub fn downcast<T: Any + Send + Sync>(self) -> Result<Arc<T>, Value> {
        let key = self.key;
        self.inner
            .downcast::<T>()
            .map_err(|inner| Value { inner, key })
    }

    /// Takes ownership of the instance when this is its only handle
    pub fn try_unwrap<T: Any + Send + Sync>(self) -> Result<T, Value> {
        let key = self.key;
        let arc = self.downcast::<T>()?;
        Arc::try_unwrap(arc).map_err(|arc| Value { inner: arc, key })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", short_type_name(self.key.name()))
    }
}

/// Default declared on a constructor parameter.
///
/// `Nothing` is a declared default that fills the slot with no value at all,
/// which bodies observe through [`Arguments::optional`].
#[derive(Debug, Clone)]
pub enum DefaultValue {
    Nothing,
    Value(Value),
}

impl DefaultValue {
    pub fn value(&self) -> Option<Value> {
        match self {
            DefaultValue::Nothing => None,
            DefaultValue::Value(value) => Some(value.clone()),
        }
    }
}

/// Positional arguments passed to a constructor body
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Vec<Option<Value>>,
}

impl Arguments {
    pub fn new(values: Vec<Option<Value>>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw slot access
    pub fn value(&self, index: usize) -> Result<Option<&Value>, ArgumentError> {
        self.values
            .get(index)
            .map(Option::as_ref)
            .ok_or(ArgumentError::OutOfRange {
                index,
                len: self.values.len(),
            })
    }

    /// Borrow a required argument
    pub fn get<T: Any>(&self, index: usize) -> Result<&T, ArgumentError> {
        self.optional::<T>(index)?
            .ok_or(ArgumentError::Missing { index })
    }

    /// Borrow an argument that may hold nothing
    pub fn optional<T: Any>(&self, index: usize) -> Result<Option<&T>, ArgumentError> {
        match self.value(index)? {
            None => Ok(None),
            Some(value) => value
                .downcast_ref::<T>()
                .map(Some)
                .ok_or(ArgumentError::WrongType {
                    index,
                    expected: std::any::type_name::<T>(),
                    actual: value.type_key().name(),
                }),
        }
    }

    pub fn cloned<T: Any + Clone>(&self, index: usize) -> Result<T, ArgumentError> {
        self.get::<T>(index).cloned()
    }

    /// Shared handle to a required argument, typically a service
    pub fn shared<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>, ArgumentError> {
        let value = self.value(index)?.ok_or(ArgumentError::Missing { index })?;
        value.clone().downcast::<T>().map_err(|value| ArgumentError::WrongType {
            index,
            expected: std::any::type_name::<T>(),
            actual: value.type_key().name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_downcast() {
        let value = Value::new(42i32);
        assert!(value.is::<i32>());
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));
        assert!(value.clone().downcast::<String>().is_err());
        assert_eq!(*value.downcast::<i32>().unwrap(), 42);
    }

    #[test]
    fn test_try_unwrap_requires_unique_handle() {
        let value = Value::new(String::from("solo"));
        assert_eq!(value.try_unwrap::<String>().unwrap(), "solo");

        let shared = Value::new(String::from("shared"));
        let _other = shared.clone();
        assert!(shared.try_unwrap::<String>().is_err());
    }

    #[test]
    fn test_arguments_accessors() {
        let args = Arguments::new(vec![Some(Value::new(7i32)), None, Some(Value::new("x"))]);

        assert_eq!(*args.get::<i32>(0).unwrap(), 7);
        assert_eq!(args.optional::<String>(1).unwrap(), None);
        assert_eq!(args.get::<String>(1), Err(ArgumentError::Missing { index: 1 }));
        assert!(matches!(
            args.get::<String>(2),
            Err(ArgumentError::WrongType { index: 2, .. })
        ));
        assert_eq!(
            args.get::<i32>(5),
            Err(ArgumentError::OutOfRange { index: 5, len: 3 })
        );
        assert_eq!(*args.shared::<&str>(2).unwrap(), "x");
    }

    #[test]
    fn test_type_key_identity() {
        assert_eq!(TypeKey::of::<i32>(), Value::new(1i32).type_key());
        assert_ne!(TypeKey::of::<i32>(), TypeKey::of::<i64>());
        assert!(TypeKey::of::<String>().is::<String>());
    }
}
