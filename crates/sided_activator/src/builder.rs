//! Immediate construction from a selected constructor

use crate::constructor::{Constructor, Parameter};
use crate::error::ActivationError;
use crate::matching::ParameterMap;
use crate::services::ServiceResolver;
use crate::value::{Arguments, Value};
use crate::Result;
use tracing::trace;

/// Check that `value` may be placed in `parameter`
pub(crate) fn coerce(
    type_name: &'static str,
    parameter: &Parameter,
    value: Option<Value>,
) -> Result<Option<Value>> {
    if let Some(value) = &value {
        if !parameter.accepts(value.type_key()) {
            return Err(ActivationError::ArgumentTypeMismatch {
                type_name,
                parameter: parameter.name(),
                expected: parameter.ty().name(),
                actual: value.type_key().name(),
            });
        }
    }
    Ok(value)
}

/// Resolve an unbound parameter, falling back to its declared default
pub(crate) fn resolve_parameter(
    type_name: &'static str,
    parameter: &Parameter,
    services: &dyn ServiceResolver,
) -> Result<Option<Value>> {
    match services.get_service(parameter.ty()) {
        Some(service) => Ok(Some(service)),
        None => match parameter.default_value() {
            Some(default) => {
                trace!(type_name, parameter = parameter.name(), "using declared default");
                Ok(default.value())
            }
            None => Err(ActivationError::UnresolvableParameter {
                type_name,
                parameter: parameter.name(),
                parameter_type: parameter.ty().name(),
            }),
        },
    }
}

/// Fills the parameters a selection left unbound and invokes the constructor
pub struct InstanceBuilder<'a, T> {
    type_name: &'static str,
    constructor: &'a Constructor<T>,
    map: ParameterMap,
}

impl<'a, T> InstanceBuilder<'a, T> {
    pub fn new(type_name: &'static str, constructor: &'a Constructor<T>, map: ParameterMap) -> Self {
        Self {
            type_name,
            constructor,
            map,
        }
    }

    /// Assemble the argument list. Bound parameters take the explicit value,
    /// the rest come from `services` or their declared default.
    pub fn arguments(&self, values: &[Value], services: &dyn ServiceResolver) -> Result<Arguments> {
        let parameters = self.constructor.parameters();
        let mut assembled = Vec::with_capacity(parameters.len());

        for (position, parameter) in parameters.iter().enumerate() {
            let value = match self.map.bound(position) {
                Some(slot) => values.get(slot).cloned(),
                None => resolve_parameter(self.type_name, parameter, services)?,
            };
            assembled.push(coerce(self.type_name, parameter, value)?);
        }

        Ok(Arguments::new(assembled))
    }

    /// Build the instance. A failure raised by the constructor body is
    /// returned as [`ActivationError::TargetConstruction`] untouched.
    pub fn build(self, values: &[Value], services: &dyn ServiceResolver) -> Result<T> {
        let arguments = self.arguments(values, services)?;
        self.constructor
            .invoke(arguments)
            .map_err(ActivationError::TargetConstruction)
    }
}
