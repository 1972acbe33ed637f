//! Errors raised while dispatching actions.

use actionizer_core::{ConfigurationError, Outcome};
use thiserror::Error;

/// The failure signal raised by [`Action::fail`](crate::Action::fail).
///
/// Carries the failed [`Outcome`] of the action that raised it. Only the
/// dispatcher boundary turns it back into a returned outcome.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", self.message())]
pub struct ActionFailure {
    outcome: Outcome,
}

impl ActionFailure {
    /// Wrap `outcome`, marking it failed.
    pub fn new(mut outcome: Outcome) -> Self {
        outcome.fail();
        Self { outcome }
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> Outcome {
        self.outcome
    }

    fn message(&self) -> String {
        match self.outcome.error() {
            Some(error) => format!("Failed! {error}"),
            None => "Failed!".to_string(),
        }
    }
}

impl Default for ActionFailure {
    fn default() -> Self {
        Self::new(Outcome::new())
    }
}

/// Everything that can stop an entry point from returning normally.
#[derive(Error, Debug)]
pub enum ActionError {
    /// A declaration or wiring mistake. Always terminal.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The entry point name is not registered for the action type. Always terminal.
    #[error("undefined entry point `{entry_point}` for {action}")]
    NoSuchEntryPoint { action: String, entry_point: String },

    /// The failure signal. Converted into a failed outcome at the dispatcher.
    #[error(transparent)]
    Failure(#[from] ActionFailure),

    /// Any other fault raised inside an entry point. Always terminal.
    #[error(transparent)]
    Fault(#[from] anyhow::Error),
}

impl ActionError {
    /// Returns true if this is the failure signal.
    pub fn is_failure(&self) -> bool {
        matches!(self, ActionError::Failure(_))
    }

    /// Returns true if the dispatcher will never convert this into an outcome.
    pub fn is_terminal(&self) -> bool {
        !self.is_failure()
    }

    /// The failed outcome carried by the failure signal.
    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            ActionError::Failure(failure) => Some(failure.outcome()),
            _ => None,
        }
    }
}

/// Result type returned by entry points and dispatch calls.
pub type Flow<T> = std::result::Result<T, ActionError>;

/// Error handling for entry point bodies.
///
/// A body that wants to recover from "any error" must still let the failure
/// signal through. `rescue` does exactly that: the handler only ever sees
/// non-failure errors.
pub trait FlowExt<T> {
    fn rescue<F>(self, handler: F) -> Flow<T>
    where
        F: FnOnce(ActionError) -> Flow<T>;
}

impl<T> FlowExt<T> for Flow<T> {
    fn rescue<F>(self, handler: F) -> Flow<T>
    where
        F: FnOnce(ActionError) -> Flow<T>,
    {
        match self {
            Err(err @ ActionError::Failure(_)) => Err(err),
            Err(err) => handler(err),
            ok => ok,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_failure_is_failed() {
        let failure = ActionFailure::default();
        assert!(failure.outcome().is_failure());
        assert_eq!(failure.to_string(), "Failed!");
    }

    #[test]
    fn test_failure_message_includes_error() {
        let failure = ActionFailure::new(Outcome::with_fields(json!({"error": "boom"})));
        assert!(failure.outcome().is_failure());
        assert_eq!(failure.to_string(), "Failed! boom");
    }

    #[test]
    fn test_error_classification() {
        let failure: ActionError = ActionFailure::default().into();
        assert!(failure.is_failure());
        assert!(failure.outcome().is_some());

        let config: ActionError = ConfigurationError::NoOpenDeclaration.into();
        assert!(config.is_terminal());

        let fault: ActionError = anyhow::anyhow!("disk on fire").into();
        assert!(fault.is_terminal());
        assert_eq!(fault.to_string(), "disk on fire");
    }

    #[test]
    fn test_rescue_lets_failure_through() {
        let flow: Flow<()> = Err(ActionFailure::default().into());
        let rescued = flow.rescue(|_| Ok(()));
        assert!(matches!(rescued, Err(ActionError::Failure(_))));
    }

    #[test]
    fn test_rescue_handles_faults() {
        let flow: Flow<u32> = Err(anyhow::anyhow!("oops").into());
        assert_eq!(flow.rescue(|_| Ok(7)).unwrap(), 7);

        let ok: Flow<u32> = Ok(1);
        assert_eq!(ok.rescue(|_| Ok(7)).unwrap(), 1);
    }
}
