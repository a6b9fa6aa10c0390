//! Constructor selection.
//!
//! Both entry points consult the role index first so that two constructors
//! tagged for the same role always fail as ambiguous, whatever the arguments.
//! Constructors tagged for another role are filtered by [`ForeignRolePolicy`],
//! except a type's only constructor, which is always a candidate.

use crate::constructor::{Constructor, PreferredSlot, TypeInfo};
use crate::error::ActivationError;
use crate::matching::{match_values, try_map, ParameterMap};
use crate::role::{ExecutionRole, ForeignRolePolicy};
use crate::value::{TypeKey, Value};
use crate::Result;
use tracing::{debug, trace, warn};

/// The constructor chosen for one activation
#[derive(Debug)]
pub struct Selection<'a, T> {
    pub index: usize,
    pub constructor: &'a Constructor<T>,
    pub map: ParameterMap,
    /// Whether the constructor is tagged for the active role
    pub preferred: bool,
}

fn ambiguous_preferred<T>(info: &TypeInfo<T>, role: ExecutionRole) -> Result<()> {
    if let PreferredSlot::Ambiguous(first, second) = *info.roles().preferred(role) {
        warn!(
            type_name = info.name(),
            %role,
            first = info.constructors()[first].signature(),
            second = info.constructors()[second].signature(),
            "multiple constructors preferred for role"
        );
        return Err(ActivationError::AmbiguousPreferredConstructor {
            type_name: info.name(),
            role,
        });
    }
    Ok(())
}

/// Whether `constructor` may compete under `role`
fn eligible<T>(
    info: &TypeInfo<T>,
    constructor: &Constructor<T>,
    role: ExecutionRole,
    policy: ForeignRolePolicy,
) -> bool {
    info.constructors().len() == 1 || policy.admits(constructor.role(), role)
}

/// Choose a constructor for immediate activation with concrete values.
///
/// A preferred constructor always wins once found. Among the rest, the
/// highest match score wins and ties go to the earlier declaration.
pub fn select_for_values<'a, T>(
    info: &'a TypeInfo<T>,
    values: &[Value],
    role: ExecutionRole,
    policy: ForeignRolePolicy,
) -> Result<Selection<'a, T>> {
    ambiguous_preferred(info, role)?;

    let mut best: Option<(Selection<'a, T>, usize)> = None;

    for (index, constructor) in info.constructors().iter().enumerate() {
        let preferred = constructor.role().prefers(role);
        if !preferred && !eligible(info, constructor, role, policy) {
            trace!(constructor = constructor.signature(), %role, "skipping constructor reserved for another role");
            continue;
        }

        let matched = match_values(constructor.parameters(), values);
        trace!(
            constructor = constructor.signature(),
            preferred,
            score = ?matched.as_ref().map(|m| m.score),
            "scored constructor"
        );

        if preferred {
            let Some(matched) = matched else {
                return Err(ActivationError::PreferredConstructorArgumentMismatch {
                    type_name: info.name(),
                    constructor: constructor.signature(),
                    role,
                });
            };
            best = Some((
                Selection {
                    index,
                    constructor,
                    map: matched.map,
                    preferred: true,
                },
                matched.score,
            ));
            continue;
        }

        let Some(matched) = matched else {
            continue;
        };
        let adopt = match &best {
            None => true,
            Some((current, score)) => !current.preferred && matched.score > *score,
        };
        if adopt {
            best = Some((
                Selection {
                    index,
                    constructor,
                    map: matched.map,
                    preferred: false,
                },
                matched.score,
            ));
        }
    }

    let (selection, score) = best.ok_or(ActivationError::NoApplicableConstructor {
        type_name: info.name(),
    })?;
    debug!(
        type_name = info.name(),
        constructor = selection.constructor.signature(),
        preferred = selection.preferred,
        score,
        "selected constructor for values"
    );
    Ok(selection)
}

/// Choose a constructor for a reusable factory given only argument types.
///
/// Unlike [`select_for_values`] there is no scoring: exactly one candidate
/// may accept the argument types.
pub fn select_for_types<'a, T>(
    info: &'a TypeInfo<T>,
    argument_types: &[TypeKey],
    role: ExecutionRole,
    policy: ForeignRolePolicy,
) -> Result<Selection<'a, T>> {
    ambiguous_preferred(info, role)?;

    if let PreferredSlot::One(index) = *info.roles().preferred(role) {
        let constructor = &info.constructors()[index];
        let map = try_map(constructor.parameters(), argument_types).ok_or(
            ActivationError::PreferredConstructorArgumentMismatch {
                type_name: info.name(),
                constructor: constructor.signature(),
                role,
            },
        )?;
        debug!(
            type_name = info.name(),
            constructor = constructor.signature(),
            %role,
            "selected preferred constructor for argument types"
        );
        return Ok(Selection {
            index,
            constructor,
            map,
            preferred: true,
        });
    }

    let mut found: Option<Selection<'a, T>> = None;
    for (index, constructor) in info.constructors().iter().enumerate() {
        if !eligible(info, constructor, role, policy) {
            trace!(constructor = constructor.signature(), %role, "skipping constructor reserved for another role");
            continue;
        }
        let Some(map) = try_map(constructor.parameters(), argument_types) else {
            continue;
        };
        if let Some(first) = &found {
            warn!(
                type_name = info.name(),
                first = first.constructor.signature(),
                second = constructor.signature(),
                "multiple constructors accept the argument types"
            );
            return Err(ActivationError::AmbiguousConstructor {
                type_name: info.name(),
                first: first.constructor.signature(),
                second: constructor.signature(),
            });
        }
        found = Some(Selection {
            index,
            constructor,
            map,
            preferred: false,
        });
    }

    let selection = found.ok_or(ActivationError::NoApplicableConstructor {
        type_name: info.name(),
    })?;
    debug!(
        type_name = info.name(),
        constructor = selection.constructor.signature(),
        "selected constructor for argument types"
    );
    Ok(selection)
}
