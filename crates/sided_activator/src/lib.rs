//! # Sided Activator
//!
//! Constructor activation for types whose constructors may be reserved for
//! the client or the server side of a game. Given a type's constructor table,
//! the activator decides which constructor to call and what to pass it: a mix
//! of explicit values and services from a [`ServiceResolver`], with declared
//! defaults as the last resort.
//!
//! ## Key Features
//!
//! - **Role-aware selection**: a constructor tagged for the current role is
//!   preferred; two tagged for the same role is a hard error
//! - **Immediate activation**: score constructors against concrete values and
//!   build one instance
//! - **Compiled factories**: select once from argument types, then create
//!   many instances without re-running selection
//! - **No reflection**: types publish a [`TypeInfo`] table of constructors
//!
//! ## Usage Examples
//!
//! ```rust
//! use sided_activator::*;
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
//!
//! let activator = Activator::new(FixedRole(ExecutionRole::Server));
//! let foo: Foo = activator
//!     .create_instance(&NoServices, &values![7i32, String::from("alpha")])
//!     .unwrap();
//! assert_eq!(foo.id, 7);
//! assert_eq!(foo.name.as_deref(), Some("alpha"));
//!
//! let factory = activator
//!     .create_factory::<Foo>(ExecutionRole::Client, &arg_types![i32])
//!     .unwrap();
//! let foo = factory.create(&NoServices, &values![3i32]).unwrap();
//! assert_eq!(foo.id, 3);
//! ```

pub mod activator;
pub mod builder;
pub mod config;
pub mod constructor;
pub mod error;
pub mod factory;
pub mod logging;
pub mod macros;
pub mod matching;
pub mod registry;
pub mod role;
pub mod selector;
pub mod services;
pub mod utils;
pub mod value;

// Re-exports for convenience
pub use activator::Activator;
pub use builder::InstanceBuilder;
pub use config::{ActivatorConfig, LoggingSettings};
pub use constructor::{
    Activatable, Constructor, ConstructorBuilder, Parameter, PreferredSlot, RoleIndex, TypeInfo,
};
pub use error::{ActivationError, ArgumentError, BoxError, ConfigError};
pub use factory::{FactoryCompiler, ObjectFactory};
pub use logging::setup_logging;
pub use matching::{match_values, try_map, ParameterMap, ValueMatch};
pub use registry::TypeRegistry;
pub use role::{ExecutionRole, FixedRole, ForeignRolePolicy, RoleDetector, RoleTag};
pub use selector::{select_for_types, select_for_values, Selection};
pub use services::{NoServices, ServiceProvider, ServiceResolver};
pub use value::{Arguments, DefaultValue, TypeKey, Value};

/// Crate version
pub const SIDED_ACTIVATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, ActivationError>;
