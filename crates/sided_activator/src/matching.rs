//! Placement of explicit arguments into constructor parameters.
//!
//! Two flavours exist. [`match_values`] works on concrete values and scores
//! how well a constructor's parameter order follows the argument order; it
//! drives immediate activation. [`try_map`] works on argument types only and
//! is all-or-nothing; it drives factory compilation.

use crate::constructor::Parameter;
use crate::value::{TypeKey, Value};
use smallvec::SmallVec;

/// Binding of each constructor parameter to an explicit argument slot.
///
/// `None` means the parameter is filled from the service resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMap {
    slots: SmallVec<[Option<usize>; 8]>,
}

impl ParameterMap {
    /// Map of `len` parameters with nothing bound
    pub fn unbound(len: usize) -> Self {
        Self {
            slots: SmallVec::from_elem(None, len),
        }
    }

    /// Get the number of parameters
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Argument slot bound to `parameter`, if any
    pub fn bound(&self, parameter: usize) -> Option<usize> {
        self.slots.get(parameter).copied().flatten()
    }

    /// Check whether `parameter` takes an explicit argument
    pub fn is_bound(&self, parameter: usize) -> bool {
        self.bound(parameter).is_some()
    }

    /// Iterate bindings in parameter order
    pub fn iter(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.slots.iter().copied()
    }

    fn bind(&mut self, parameter: usize, slot: usize) {
        self.slots[parameter] = Some(slot);
    }
}

/// Outcome of placing concrete values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueMatch {
    /// Number of values that landed in lock-step with their parameter position
    pub score: usize,
    pub map: ParameterMap,
}

/// Greedily place `values` into `parameters`.
///
/// Each value goes to the lowest unbound parameter, at or after the scan
/// cursor, whose type accepts it. Returns `None` if any value cannot be
/// placed. The score counts the leading values that were bound to the
/// parameter at their own index while the cursor advanced with them.
pub fn match_values(parameters: &[Parameter], values: &[Value]) -> Option<ValueMatch> {
    let mut map = ParameterMap::unbound(parameters.len());
    let mut cursor = 0;
    let mut score = 0;

    for (given, value) in values.iter().enumerate() {
        let key = value.type_key();
        let target = (cursor..parameters.len())
            .find(|&candidate| !map.is_bound(candidate) && parameters[candidate].accepts(key))?;

        map.bind(target, given);
        if target == cursor {
            cursor += 1;
            if target == given {
                score = given + 1;
            }
        }
    }

    Some(ValueMatch { score, map })
}

/// Map each argument type to the first free parameter accepting it.
///
/// All-or-nothing: a single argument type with no home fails the whole map.
pub fn try_map(parameters: &[Parameter], argument_types: &[TypeKey]) -> Option<ParameterMap> {
    let mut map = ParameterMap::unbound(parameters.len());

    for (slot, &key) in argument_types.iter().enumerate() {
        let target = (0..parameters.len())
            .find(|&candidate| !map.is_bound(candidate) && parameters[candidate].accepts(key))?;
        map.bind(target, slot);
    }

    Some(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_in_order_score_full_length() {
        let parameters = vec![
            Parameter::new::<i32>("id"),
            Parameter::new::<String>("name"),
        ];
        let values = vec![Value::new(7i32), Value::new(String::from("alpha"))];

        let result = match_values(&parameters, &values).unwrap();
        assert_eq!(result.score, 2);
        assert_eq!(result.map.bound(0), Some(0));
        assert_eq!(result.map.bound(1), Some(1));
    }

    #[test]
    fn test_out_of_order_values_still_match_with_lower_score() {
        let parameters = vec![
            Parameter::new::<i32>("id"),
            Parameter::new::<String>("name"),
        ];
        let values = vec![Value::new(String::from("alpha")), Value::new(7i32)];

        let result = match_values(&parameters, &values).unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.map.bound(0), Some(1));
        assert_eq!(result.map.bound(1), Some(0));
    }

    #[test]
    fn test_unplaceable_value_disqualifies() {
        let parameters = vec![Parameter::new::<i32>("id")];
        let values = vec![Value::new(7i32), Value::new(String::from("extra"))];
        assert!(match_values(&parameters, &values).is_none());
    }

    #[test]
    fn test_value_never_lands_before_cursor() {
        // No free i32 slot remains for the second value.
        let parameters = vec![
            Parameter::new::<i32>("a"),
            Parameter::new::<String>("b"),
        ];
        let values = vec![Value::new(1i32), Value::new(2i32)];
        assert!(match_values(&parameters, &values).is_none());
    }

    #[test]
    fn test_no_values_scores_zero_and_leaves_all_unbound() {
        let parameters = vec![Parameter::new::<i32>("a")];
        let result = match_values(&parameters, &[]).unwrap();
        assert_eq!(result.score, 0);
        assert!(!result.map.is_bound(0));
    }

    #[test]
    fn test_try_map_is_all_or_nothing() {
        let parameters = vec![
            Parameter::new::<String>("name"),
            Parameter::new::<u64>("service"),
            Parameter::new::<i32>("id"),
        ];

        let map = try_map(
            &parameters,
            &[TypeKey::of::<i32>(), TypeKey::of::<String>()],
        )
        .unwrap();
        assert_eq!(map.bound(0), Some(1));
        assert_eq!(map.bound(1), None);
        assert_eq!(map.bound(2), Some(0));

        assert!(try_map(&parameters, &[TypeKey::of::<bool>()]).is_none());
        assert!(try_map(
            &parameters,
            &[TypeKey::of::<i32>(), TypeKey::of::<i32>()]
        )
        .is_none());
    }

    #[test]
    fn test_try_map_honours_assignable_from() {
        let parameters = vec![
            Parameter::new::<String>("name").assignable_from::<&'static str>(),
        ];
        let map = try_map(&parameters, &[TypeKey::of::<&'static str>()]).unwrap();
        assert_eq!(map.bound(0), Some(0));
    }
}
