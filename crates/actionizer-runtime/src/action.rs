//! The action contract.

use std::collections::HashMap;
use std::fmt;

use actionizer_core::{ConfigurationError, InputSchema, InputsBuilder, IntoFields, Outcome};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ActionError, ActionFailure, Flow};

/// An entry point: runs against a freshly built instance.
pub type EntryFn<A> = fn(&mut A) -> Flow<()>;

/// A unit of business logic with named entry points.
///
/// Every invocation builds a fresh instance from validated inputs, runs one
/// entry point against it and hands back the instance's [`Outcome`].
///
/// ```rust,ignore
/// struct Greet {
///     input: GreetInput,
///     outcome: Outcome,
/// }
///
/// impl Action for Greet {
///     type Input = GreetInput;
///
///     fn build(input: GreetInput) -> Self {
///         Self { input, outcome: Outcome::new() }
///     }
///     fn outcome(&self) -> &Outcome { &self.outcome }
///     fn outcome_mut(&mut self) -> &mut Outcome { &mut self.outcome }
///
///     fn declare_inputs(inputs: &mut InputsBuilder) -> actionizer_core::Result<()> {
///         inputs.inputs_for("call", |i| i.required("name", ParamOptions::new()).map(|_| ()))
///     }
///
///     fn entry_points(entry_points: &mut EntryPoints<Self>) {
///         entry_points.register("call", Self::call);
///     }
/// }
/// ```
pub trait Action: Sized + 'static {
    /// Declared inputs, deserialized from the validated argument map.
    type Input: DeserializeOwned;

    /// Entry point used by `call` and by checked invocations.
    const DEFAULT_ENTRY_POINT: &'static str = "call";

    /// Construct an instance. The instance starts with a successful outcome.
    fn build(input: Self::Input) -> Self;

    fn outcome(&self) -> &Outcome;

    fn outcome_mut(&mut self) -> &mut Outcome;

    /// Register the entry points of this type.
    fn entry_points(entry_points: &mut EntryPoints<Self>);

    /// Declare per-entry-point inputs. Undeclared entry points accept anything.
    fn declare_inputs(inputs: &mut InputsBuilder) -> actionizer_core::Result<()> {
        let _ = inputs;
        Ok(())
    }

    /// Name used in error messages and logs.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Merge `fields` into the outcome, mark it failed and return the
    /// failure signal. Use as `return self.fail(..)` or `self.fail(..)?`,
    /// or through the [`fail!`](crate::fail) macro.
    fn fail<T>(&mut self, fields: impl IntoFields) -> Flow<T> {
        let outcome = self.outcome_mut();
        outcome.merge(fields);
        outcome.fail();
        Err(ActionError::Failure(ActionFailure::new(outcome.clone())))
    }
}

/// Input type for actions whose entry points take no declared inputs.
///
/// Unknown keys are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct NoInputs {}

/// Explicit table of entry points for one action type.
pub struct EntryPoints<A> {
    table: HashMap<String, EntryFn<A>>,
}

impl<A> Default for EntryPoints<A> {
    fn default() -> Self {
        Self {
            table: HashMap::new(),
        }
    }
}

impl<A> EntryPoints<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entry` under `name`. Overwrites any existing registration.
    pub fn register(&mut self, name: &str, entry: EntryFn<A>) -> &mut Self {
        self.table.insert(name.to_string(), entry);
        self
    }

    pub fn get(&self, name: &str) -> Option<EntryFn<A>> {
        self.table.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<A> fmt::Debug for EntryPoints<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoints")
            .field("names", &self.table.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Everything known about an action type: its input schema and entry points.
pub struct Definition<A> {
    schema: InputSchema,
    entry_points: EntryPoints<A>,
}

impl<A: Action> Definition<A> {
    /// Run the type's declarations.
    pub fn build() -> Result<Self, ConfigurationError> {
        let mut inputs = InputsBuilder::new();
        A::declare_inputs(&mut inputs)?;
        let schema = inputs.finish()?;

        let mut entry_points = EntryPoints::new();
        A::entry_points(&mut entry_points);

        Ok(Self {
            schema,
            entry_points,
        })
    }

    pub fn schema(&self) -> &InputSchema {
        &self.schema
    }

    pub fn entry_points(&self) -> &EntryPoints<A> {
        &self.entry_points
    }
}

impl<A: Action> fmt::Debug for Definition<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("action", &A::type_name())
            .field("schema", &self.schema)
            .field("entry_points", &self.entry_points)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actionizer_core::ParamOptions;
    use serde_json::json;

    struct Counter {
        outcome: Outcome,
    }

    impl Counter {
        fn call(&mut self) -> Flow<()> {
            self.outcome.set("count", 1);
            Ok(())
        }
    }

    impl Action for Counter {
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
            entry_points.register("call", Self::call);
        }

        fn declare_inputs(inputs: &mut InputsBuilder) -> actionizer_core::Result<()> {
            inputs.inputs_for("call", |i| i.optional("step", ParamOptions::new()).map(|_| ()))
        }
    }

    #[test]
    fn test_definition_build() {
        let definition = Definition::<Counter>::build().unwrap();
        assert!(definition.entry_points().contains("call"));
        assert_eq!(definition.entry_points().len(), 1);
        assert!(definition.schema().is_declared("call"));
    }

    #[test]
    fn test_fail_merges_and_signals() {
        let mut counter = Counter::build(NoInputs::default());
        let flow: Flow<()> = counter.fail(json!({"error": "nope"}));

        let err = flow.unwrap_err();
        assert_eq!(err.outcome().and_then(Outcome::error), Some("nope"));
        assert!(counter.outcome().is_failure());
        assert_eq!(counter.outcome().error(), Some("nope"));
    }

    #[test]
    fn test_entry_points_debug() {
        let mut entry_points = EntryPoints::<Counter>::new();
        entry_points.register("call", Counter::call);
        assert!(format!("{entry_points:?}").contains("call"));
    }

    #[test]
    fn test_no_inputs_ignores_keys() {
        let parsed: NoInputs = serde_json::from_value(json!({"anything": 1})).unwrap();
        assert_eq!(parsed, NoInputs::default());
    }
}
