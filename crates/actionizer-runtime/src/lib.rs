//! # Actionizer Runtime
//!
//! Everything needed to define and run actions:
//! - [`Action`] / [`EntryPoints`] - The action contract and its explicit entry-point table
//! - [`invoke`] / [`invoke_strict`] / [`ActionExt`] - Class-level dispatch
//! - [`Compose`] - Checked and dynamic invocation of one action from another
//! - [`fail!`] - Fail the running action and return from its entry point

pub mod action;
pub mod compose;
pub mod definitions;
pub mod dispatch;
pub mod error;
mod macros;

pub use action::{Action, Definition, EntryFn, EntryPoints, NoInputs};
pub use compose::{ActionHandle, Compose, Reply, Responder};
pub use definitions::{define, is_defined};
pub use dispatch::{invoke, invoke_strict, ActionExt, STRICT_SUFFIX};
pub use error::{ActionError, ActionFailure, Flow, FlowExt};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::action::{Action, EntryPoints, NoInputs};
    pub use crate::compose::{ActionHandle, Compose, Reply, Responder};
    pub use crate::dispatch::ActionExt;
    pub use crate::error::{ActionError, ActionFailure, Flow, FlowExt};
    pub use crate::fail;
    pub use actionizer_core::prelude::*;
}

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
