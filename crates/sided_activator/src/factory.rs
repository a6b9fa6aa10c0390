//! Reusable factories compiled from a constructor and a parameter map.
//!
//! The selection work happens once, in [`FactoryCompiler::compile`]. The
//! returned [`ObjectFactory`] only reads argument slots, queries the service
//! resolver and applies defaults on each call.

use crate::builder::{coerce, resolve_parameter};
use crate::constructor::{Constructor, Parameter};
use crate::error::ActivationError;
use crate::matching::ParameterMap;
use crate::services::ServiceResolver;
use crate::value::{Arguments, Value};
use crate::Result;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Where one parameter's value comes from at call time
#[derive(Debug, Clone)]
enum Source {
    Argument(usize),
    Service,
}

#[derive(Debug, Clone)]
struct ParameterPlan {
    parameter: Parameter,
    source: Source,
}

impl ParameterPlan {
    fn fetch(
        &self,
        type_name: &'static str,
        services: &dyn ServiceResolver,
        arguments: &[Option<Value>],
    ) -> Result<Option<Value>> {
        let raw = match self.source {
            Source::Argument(slot) => arguments
                .get(slot)
                .ok_or(ActivationError::ArgumentOutOfRange {
                    type_name,
                    slot,
                    supplied: arguments.len(),
                })?
                .clone(),
            Source::Service => resolve_parameter(type_name, &self.parameter, services)?,
        };

        // Defaults apply before the value is checked against the declared type.
        let value = match (raw, self.parameter.default_value()) {
            (None, Some(default)) => default.value(),
            (raw, _) => raw,
        };
        coerce(type_name, &self.parameter, value)
    }
}

type FactoryFn<T> =
    Arc<dyn Fn(&dyn ServiceResolver, &[Option<Value>]) -> Result<T> + Send + Sync>;

/// A compiled creation procedure for one type and argument-type signature
pub struct ObjectFactory<T> {
    type_name: &'static str,
    signature: &'static str,
    map: ParameterMap,
    invoke: FactoryFn<T>,
}

impl<T> Clone for ObjectFactory<T> {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name,
            signature: self.signature,
            map: self.map.clone(),
            invoke: self.invoke.clone(),
        }
    }
}

impl<T> fmt::Debug for ObjectFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectFactory")
            .field("type_name", &self.type_name)
            .field("constructor", &self.signature)
            .field("map", &self.map)
            .finish()
    }
}

impl<T> ObjectFactory<T> {
    /// Create an instance. `arguments[i]` fills the parameter mapped to slot
    /// `i`; a `None` entry falls back to the parameter's default.
    pub fn invoke(&self, services: &dyn ServiceResolver, arguments: &[Option<Value>]) -> Result<T> {
        (self.invoke)(services, arguments)
    }

    /// Create an instance from a fully populated argument array
    pub fn create(&self, services: &dyn ServiceResolver, arguments: &[Value]) -> Result<T> {
        let arguments: Vec<Option<Value>> = arguments.iter().cloned().map(Some).collect();
        self.invoke(services, &arguments)
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Signature of the constructor this factory calls
    pub fn constructor(&self) -> &'static str {
        self.signature
    }

    pub fn parameter_map(&self) -> &ParameterMap {
        &self.map
    }
}

/// Turns a selected constructor into an [`ObjectFactory`]
pub struct FactoryCompiler;

impl FactoryCompiler {
    pub fn compile<T: 'static>(
        type_name: &'static str,
        constructor: &Constructor<T>,
        map: ParameterMap,
    ) -> ObjectFactory<T> {
        let plans: Arc<[ParameterPlan]> = constructor
            .parameters()
            .iter()
            .enumerate()
            .map(|(position, parameter)| ParameterPlan {
                parameter: parameter.clone(),
                source: match map.bound(position) {
                    Some(slot) => Source::Argument(slot),
                    None => Source::Service,
                },
            })
            .collect();
        let body = constructor.body();

        debug!(
            type_name,
            constructor = constructor.signature(),
            bound = map.iter().filter(Option::is_some).count(),
            "compiled factory"
        );

        let invoke: FactoryFn<T> = Arc::new(
            move |services: &dyn ServiceResolver, arguments: &[Option<Value>]| -> Result<T> {
                let mut assembled = Vec::with_capacity(plans.len());
                for plan in plans.iter() {
                    assembled.push(plan.fetch(type_name, services, arguments)?);
                }
                body(Arguments::new(assembled)).map_err(ActivationError::TargetConstruction)
            },
        );

        ObjectFactory {
            type_name,
            signature: constructor.signature(),
            map,
            invoke,
        }
    }
}
