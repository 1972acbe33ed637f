//! Class-level invocation of actions.
//!
//! `invoke` resolves the entry point, validates the arguments, builds a fresh
//! instance and runs it. The failure signal is caught here and nowhere else:
//! a failing entry point comes back as a failed [`Outcome`]. The strict form
//! (`invoke_strict`, or a trailing `!` on the entry point name) lets the
//! signal reach the caller instead.

use std::sync::Arc;

use actionizer_core::{
    normalize_fields, Args, ConfigurationError, IntoFields, Outcome, ERROR_FIELD,
};
use serde_json::Value;
use tracing::{debug, debug_span, warn};
use uuid::Uuid;

use crate::action::{Action, Definition};
use crate::definitions::define;
use crate::error::{ActionError, ActionFailure, Flow};

/// Suffix that selects strict invocation, as in `"call!"`.
pub const STRICT_SUFFIX: char = '!';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Failures come back as a failed outcome.
    Returning,
    /// Failures propagate as `ActionError::Failure`.
    Strict,
}

impl Mode {
    fn settle(self, outcome: Outcome) -> Flow<Outcome> {
        match self {
            Mode::Returning => Ok(outcome),
            Mode::Strict => Err(ActionFailure::new(outcome).into()),
        }
    }
}

/// Invoke `entry_point` on a new instance of `A`.
///
/// A trailing `!` selects strict invocation.
pub fn invoke<A: Action>(entry_point: &str, args: impl IntoFields) -> Flow<Outcome> {
    match entry_point.strip_suffix(STRICT_SUFFIX) {
        Some(name) => dispatch::<A>(name, args.into_fields(), Mode::Strict),
        None => dispatch::<A>(entry_point, args.into_fields(), Mode::Returning),
    }
}

/// Invoke `entry_point` on a new instance of `A`, raising failures as
/// `ActionError::Failure` instead of returning a failed outcome.
pub fn invoke_strict<A: Action>(entry_point: &str, args: impl IntoFields) -> Flow<Outcome> {
    let name = entry_point
        .strip_suffix(STRICT_SUFFIX)
        .unwrap_or(entry_point);
    dispatch::<A>(name, args.into_fields(), Mode::Strict)
}

fn dispatch<A: Action>(entry_point: &str, args: Args, mode: Mode) -> Flow<Outcome> {
    let invocation_id = Uuid::new_v4();
    let span = debug_span!(
        "invoke",
        action = A::type_name(),
        entry_point,
        %invocation_id
    );
    let _enter = span.enter();

    let definition = load::<A>()?;
    let Some(entry) = definition.entry_points().get(entry_point) else {
        warn!("no such entry point");
        return Err(ActionError::NoSuchEntryPoint {
            action: A::type_name().to_string(),
            entry_point: entry_point.to_string(),
        });
    };

    if let Err(err) = definition.schema().validate(entry_point, &args) {
        debug!(error = %err, "inputs rejected");
        return mode.settle(Outcome::failed([(ERROR_FIELD, err.0)]));
    }

    let input = match serde_json::from_value::<A::Input>(Value::Object(normalize_fields(args))) {
        Ok(input) => input,
        Err(err) => {
            debug!(error = %err, "inputs could not be read");
            let message = format!("Invalid inputs for {entry_point}: {err}");
            return mode.settle(Outcome::failed([(ERROR_FIELD, message)]));
        }
    };

    let mut instance = A::build(input);
    debug!("dispatching");

    match entry(&mut instance) {
        Ok(()) => {
            let outcome = std::mem::take(instance.outcome_mut());
            if outcome.is_success() {
                return Ok(outcome);
            }
            debug!(error = ?outcome.error(), "action returned a failed outcome");
            mode.settle(outcome)
        }
        Err(ActionError::Failure(failure)) => {
            debug!(error = ?failure.outcome().error(), "action failed");
            mode.settle(failure.into_outcome())
        }
        Err(err) => Err(err),
    }
}

fn load<A: Action>() -> Result<Arc<Definition<A>>, ConfigurationError> {
    define::<A>().map_err(|err| {
        warn!(error = %err, "action definition rejected");
        err
    })
}

/// Class-level shorthands available on every action type.
pub trait ActionExt: Action {
    /// Invoke the default entry point.
    fn perform(args: impl IntoFields) -> Flow<Outcome> {
        invoke::<Self>(Self::DEFAULT_ENTRY_POINT, args)
    }

    /// Invoke the default entry point strictly.
    fn perform_strict(args: impl IntoFields) -> Flow<Outcome> {
        invoke_strict::<Self>(Self::DEFAULT_ENTRY_POINT, args)
    }

    fn invoke(entry_point: &str, args: impl IntoFields) -> Flow<Outcome> {
        invoke::<Self>(entry_point, args)
    }

    fn invoke_strict(entry_point: &str, args: impl IntoFields) -> Flow<Outcome> {
        invoke_strict::<Self>(entry_point, args)
    }

    /// Build (or fetch) the definition eagerly, surfacing configuration
    /// errors before the first call.
    fn define() -> Result<Arc<Definition<Self>>, ConfigurationError> {
        define::<Self>()
    }
}

impl<A: Action> ActionExt for A {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{EntryPoints, NoInputs};
    use actionizer_core::{InputsBuilder, ParamOptions, TypeTag};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct EchoInput {
        foo: Option<Value>,
    }

    struct Echo {
        input: EchoInput,
        outcome: Outcome,
    }

    impl Echo {
        fn call(&mut self) -> Flow<()> {
            if let Some(foo) = self.input.foo.clone() {
                self.outcome.set("echo", foo);
            }
            Ok(())
        }

        fn refuse(&mut self) -> Flow<()> {
            self.fail(json!({"error": "refused"}))
        }

        fn decline(&mut self) -> Flow<()> {
            self.outcome.set("error", "declined");
            self.outcome.fail();
            Ok(())
        }
    }

    impl Action for Echo {
        type Input = EchoInput;

        fn build(input: EchoInput) -> Self {
            Self {
                input,
                outcome: Outcome::new(),
            }
        }
        fn outcome(&self) -> &Outcome {
            &self.outcome
        }
        fn outcome_mut(&mut self) -> &mut Outcome {
            &mut self.outcome
        }
        fn entry_points(entry_points: &mut EntryPoints<Self>) {
            entry_points
                .register("call", Self::call)
                .register("refuse", Self::refuse)
                .register("decline", Self::decline);
        }
        fn declare_inputs(inputs: &mut InputsBuilder) -> actionizer_core::Result<()> {
            inputs.inputs_for("call", |i| {
                i.optional("foo", ParamOptions::new().of_type(TypeTag::Numeric))
                    .map(|_| ())
            })
        }
    }

    #[test]
    fn test_invoke_success() {
        let outcome = Echo::perform(json!({"foo": 1.1})).unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.get("echo"), Some(&json!(1.1)));
    }

    #[test]
    fn test_invoke_symbol_keys() {
        let outcome = Echo::perform(json!({":foo": 2})).unwrap();
        assert_eq!(outcome.get("echo"), Some(&json!(2)));
    }

    #[test]
    fn test_validation_failure_returns_outcome() {
        let outcome = Echo::perform(json!({"foo": "1"})).unwrap();
        assert!(outcome.is_failure());
        assert_eq!(outcome.error(), Some("Param foo must descend from Numeric"));
    }

    #[test]
    fn test_unscoped_entry_point_accepts_anything() {
        let outcome = Echo::invoke("refuse", json!({"whatever": [1, 2]})).unwrap();
        assert!(outcome.is_failure());
        assert_eq!(outcome.error(), Some("refused"));
    }

    #[test]
    fn test_no_such_entry_point() {
        let err = Echo::invoke("missing", ()).unwrap_err();
        assert!(matches!(err, ActionError::NoSuchEntryPoint { .. }));
        assert!(err.is_terminal());
    }

    #[test]
    fn test_strict_raises_failure() {
        let err = Echo::invoke_strict("refuse", ()).unwrap_err();
        assert_eq!(err.outcome().and_then(Outcome::error), Some("refused"));

        let err = Echo::invoke("refuse!", ()).unwrap_err();
        assert!(err.is_failure());

        let err = Echo::perform_strict(json!({"foo": "x"})).unwrap_err();
        assert_eq!(
            err.outcome().and_then(Outcome::error),
            Some("Param foo must descend from Numeric")
        );
    }

    #[test]
    fn test_failed_outcome_without_signal() {
        let outcome = Echo::invoke("decline", ()).unwrap();
        assert!(outcome.is_failure());
        assert_eq!(outcome.error(), Some("declined"));

        let err = Echo::invoke_strict("decline", ()).unwrap_err();
        assert!(err.is_failure());
        assert_eq!(err.outcome().and_then(Outcome::error), Some("declined"));
    }

    #[test]
    fn test_strict_success_returns_outcome() {
        let outcome = Echo::invoke("call!", json!({"foo": 3})).unwrap();
        assert!(outcome.is_success());
    }

    struct Typed {
        outcome: Outcome,
    }

    #[derive(Debug, Deserialize)]
    struct TypedInput {
        #[allow(dead_code)]
        count: u32,
    }

    impl Action for Typed {
        type Input = TypedInput;

        fn build(_: TypedInput) -> Self {
            Self {
                outcome: Outcome::new(),
            }
        }
        fn outcome(&self) -> &Outcome {
            &self.outcome
        }
        fn outcome_mut(&mut self) -> &mut Outcome {
            &mut self.outcome
        }
        fn entry_points(entry_points: &mut EntryPoints<Self>) {
            entry_points.register("call", |_| Ok(()));
        }
    }

    #[test]
    fn test_unreadable_inputs_fail_outcome() {
        let outcome = Typed::perform(json!({"count": "many"})).unwrap();
        assert!(outcome.is_failure());
        assert!(outcome
            .error()
            .is_some_and(|e| e.starts_with("Invalid inputs for call")));
    }

    #[test]
    fn test_no_inputs_action() {
        struct Noop {
            outcome: Outcome,
        }
        impl Action for Noop {
            type Input = NoInputs;
            fn build(_: NoInputs) -> Self {
                Self {
                    outcome: Outcome::new(),
                }
            }
            fn outcome(&self) -> &Outcome {
                &self.outcome
            }
            fn outcome_mut(&mut self) -> &mut Outcome {
                &mut self.outcome
            }
            fn entry_points(entry_points: &mut EntryPoints<Self>) {
                entry_points.register("call", |_| Ok(()));
            }
        }

        assert!(Noop::perform(()).unwrap().is_success());
    }
}
