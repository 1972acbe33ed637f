//! Calling one action from inside another.
//!
//! Two call patterns give a running action a trustworthy nested outcome:
//!
//! - **Checked invocation** ([`Compose::checked_invoke`]): the target is a
//!   known action type. If it fails, the caller fails too, carrying the
//!   nested `error` forward, and the caller's body stops at the `?`.
//! - **Dynamic invocation** ([`Compose::or_fail`]): the target is anything
//!   implementing [`Responder`] and the method is chosen at runtime. The
//!   reply only has to look like an outcome ([`Reply`]). Prefer checked
//!   invocation when both sides are actions; use this form at integration
//!   boundaries.

use std::fmt;

use actionizer_core::{
    Args, ConfigurationError, Fields, IntoFields, Outcome, ERROR_FIELD, UNKNOWN_ERROR,
};
use tracing::debug;

use crate::action::Action;
use crate::definitions::define;
use crate::dispatch::{invoke, STRICT_SUFFIX};
use crate::error::Flow;

/// Something returned by a dynamic invocation.
///
/// A reply counts as outcome-like only if it answers both queries.
pub trait Reply: fmt::Debug {
    /// Whether the call failed, if the reply can tell.
    fn failure(&self) -> Option<bool> {
        None
    }

    /// All named fields, if the reply exposes them.
    fn fields(&self) -> Option<Fields> {
        None
    }
}

impl Reply for Outcome {
    fn failure(&self) -> Option<bool> {
        Some(self.is_failure())
    }

    fn fields(&self) -> Option<Fields> {
        Some(self.to_fields())
    }
}

impl Reply for () {}

/// A target that can be asked to run a method chosen at runtime.
pub trait Responder {
    fn type_name(&self) -> &str;

    fn responds_to(&self, method: &str) -> bool;

    fn send(&self, method: &str, args: Args) -> Flow<Box<dyn Reply>>;

    /// The action type behind this target, if it is one.
    fn as_action(&self) -> Option<&ActionHandle> {
        None
    }
}

/// A type-erased action type, usable wherever a [`Responder`] is expected.
#[derive(Clone, Copy)]
pub struct ActionHandle {
    type_name: &'static str,
    default_entry_point: &'static str,
    invoke: fn(&str, Args) -> Flow<Outcome>,
    responds_to: fn(&str) -> bool,
}

impl ActionHandle {
    pub fn of<A: Action>() -> Self {
        Self {
            type_name: A::type_name(),
            default_entry_point: A::DEFAULT_ENTRY_POINT,
            invoke: invoke_erased::<A>,
            responds_to: responds_to::<A>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.type_name
    }

    pub fn default_entry_point(&self) -> &'static str {
        self.default_entry_point
    }

    /// Invoke `entry_point` through the dispatcher.
    pub fn invoke(&self, entry_point: &str, args: impl IntoFields) -> Flow<Outcome> {
        (self.invoke)(entry_point, args.into_fields())
    }
}

impl fmt::Debug for ActionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHandle")
            .field("type_name", &self.type_name)
            .finish()
    }
}

fn invoke_erased<A: Action>(entry_point: &str, args: Args) -> Flow<Outcome> {
    invoke::<A>(entry_point, args)
}

fn responds_to<A: Action>(method: &str) -> bool {
    define::<A>()
        .map(|definition| definition.entry_points().contains(returning(method)))
        .unwrap_or(false)
}

/// Composition always needs the nested outcome back, so the strict suffix
/// is dropped before dispatching.
fn returning(entry_point: &str) -> &str {
    entry_point
        .strip_suffix(STRICT_SUFFIX)
        .unwrap_or(entry_point)
}

impl Responder for ActionHandle {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn responds_to(&self, method: &str) -> bool {
        (self.responds_to)(method)
    }

    fn send(&self, method: &str, args: Args) -> Flow<Box<dyn Reply>> {
        let outcome = (self.invoke)(returning(method), args)?;
        Ok(Box::new(outcome))
    }

    fn as_action(&self) -> Option<&ActionHandle> {
        Some(self)
    }
}

/// Composition helpers available inside every action.
pub trait Compose: Action {
    /// Invoke `B`'s default entry point; fail this action if it fails.
    fn checked_invoke<B: Action>(&mut self, args: impl IntoFields) -> Flow<Outcome> {
        self.checked_invoke_entry::<B>(B::DEFAULT_ENTRY_POINT, args)
    }

    /// Invoke `B`'s `entry_point`; fail this action if it fails.
    fn checked_invoke_entry<B: Action>(
        &mut self,
        entry_point: &str,
        args: impl IntoFields,
    ) -> Flow<Outcome> {
        let outcome = invoke::<B>(returning(entry_point), args)?;
        propagate(self, B::type_name(), outcome)
    }

    /// Checked invocation of a target only known at runtime.
    ///
    /// A target that is not an action is a configuration error.
    fn checked_invoke_dyn(
        &mut self,
        target: &dyn Responder,
        args: impl IntoFields,
    ) -> Flow<Outcome> {
        let handle = target
            .as_action()
            .ok_or_else(|| ConfigurationError::NotAnAction {
                type_name: target.type_name().to_string(),
            })?;
        let outcome = handle.invoke(handle.default_entry_point(), args)?;
        propagate(self, handle.name(), outcome)
    }

    /// Call `method` on `target` and fail this action if the reply reports
    /// failure, carrying every `error*` field of the reply forward.
    fn or_fail(
        &mut self,
        target: &dyn Responder,
        method: &str,
        args: impl IntoFields,
    ) -> Flow<Box<dyn Reply>> {
        if !target.responds_to(method) {
            return Err(ConfigurationError::DoesNotRespond {
                type_name: target.type_name().to_string(),
                method: method.to_string(),
            }
            .into());
        }

        let reply = target.send(method, args.into_fields())?;
        let (Some(failed), Some(fields)) = (reply.failure(), reply.fields()) else {
            return Err(ConfigurationError::NotOutcomeLike {
                type_name: target.type_name().to_string(),
                method: method.to_string(),
            }
            .into());
        };

        let mut errors: Fields = fields
            .into_iter()
            .filter(|(key, _)| key.starts_with(ERROR_FIELD))
            .collect();
        if errors.is_empty() {
            errors.insert(ERROR_FIELD.to_string(), UNKNOWN_ERROR.into());
        }

        if failed {
            debug!(responder = target.type_name(), method, "delegate failed");
            return self.fail(errors);
        }
        Ok(reply)
    }
}

impl<A: Action> Compose for A {}

fn propagate<A: Action>(caller: &mut A, target: &str, outcome: Outcome) -> Flow<Outcome> {
    if outcome.is_success() {
        return Ok(outcome);
    }
    debug!(caller = A::type_name(), nested = target, "nested action failed");
    let error = outcome
        .get(ERROR_FIELD)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_ERROR.into());
    caller.fail([(ERROR_FIELD, error)])
}
