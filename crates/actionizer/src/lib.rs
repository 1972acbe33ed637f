//! # Actionizer
//!
//! Structure a unit of business logic as an action: declared inputs, named
//! entry points, an [`Outcome`] and a failure signal that aborts the action
//! (and any action that called it through [`Compose`]).
//!
//! ```rust,ignore
//! use actionizer::prelude::*;
//!
//! let outcome = Register::perform(json!({"email": "a@example.com"}))?;
//! if outcome.is_failure() {
//!     eprintln!("{}", outcome.error().unwrap_or(UNKNOWN_ERROR));
//! }
//! ```

pub use actionizer_core::{
    Args, CheckOrder, ConfigurationError, Fields, InputSchema, InputsBuilder, IntoFields,
    Outcome, ParamDecl, ParamOptions, TypeTag, ValidationConfig, ValidationError, ERROR_FIELD,
    UNKNOWN_ERROR,
};
pub use actionizer_runtime::{
    fail, invoke, invoke_strict, Action, ActionError, ActionExt, ActionFailure, ActionHandle,
    Compose, EntryPoints, Flow, FlowExt, NoInputs, Reply, Responder,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    pub use actionizer_core::{ERROR_FIELD, UNKNOWN_ERROR};
    pub use actionizer_runtime::prelude::*;
    pub use serde_json::json;
}
