//! Macros for building argument lists

/// Build a `Vec<Value>` of explicit arguments
///
/// ```rust
/// use sided_activator::values;
///
/// let args = values![7i32, String::from("alpha")];
/// assert_eq!(args.len(), 2);
/// assert!(args[0].is::<i32>());
/// ```
#[macro_export]
macro_rules! values {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::new($value)),+]
    };
}

/// Build a `Vec<TypeKey>` describing a factory's argument slots
///
/// ```rust
/// use sided_activator::{arg_types, TypeKey};
///
/// let types = arg_types![i32, String];
/// assert_eq!(types, vec![TypeKey::of::<i32>(), TypeKey::of::<String>()]);
/// ```
#[macro_export]
macro_rules! arg_types {
    () => {
        ::std::vec::Vec::<$crate::TypeKey>::new()
    };
    ($($ty:ty),+ $(,)?) => {
        ::std::vec![$($crate::TypeKey::of::<$ty>()),+]
    };
}
