//! Quick Start Example
//!
//! Two actions: `Checkout` declares its inputs and delegates payment to
//! `Charge` through a checked invocation. Run with
//! `RUST_LOG=actionizer_runtime=debug` to see the dispatcher spans.

use actionizer::prelude::*;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Deserialize)]
struct ChargeInput {
    amount: f64,
}

struct Charge {
    input: ChargeInput,
    outcome: Outcome,
}

impl Charge {
    fn call(&mut self) -> Flow<()> {
        if self.input.amount > 100.0 {
            fail!(self, "error" => "card declined", "error_code" => 51);
        }
        self.outcome.set("receipt", format!("rcpt-{:.2}", self.input.amount));
        Ok(())
    }
}

impl Action for Charge {
    type Input = ChargeInput;

    fn build(input: ChargeInput) -> Self {
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
        entry_points.register("call", Self::call);
    }
    fn declare_inputs(inputs: &mut InputsBuilder) -> Result<(), ConfigurationError> {
        inputs.inputs_for("call", |i| {
            i.required("amount", ParamOptions::new().not_null().of_type(TypeTag::Numeric))?;
            Ok(())
        })
    }
}

#[derive(Debug, Deserialize)]
struct CheckoutInput {
    cart: String,
    total: f64,
}

struct Checkout {
    input: CheckoutInput,
    outcome: Outcome,
}

impl Checkout {
    fn call(&mut self) -> Flow<()> {
        let payment = self.checked_invoke::<Charge>(json!({"amount": self.input.total}))?;
        let receipt = payment.get("receipt").cloned().unwrap_or_default();
        self.outcome.set("cart", self.input.cart.clone());
        self.outcome.set("receipt", receipt);
        Ok(())
    }
}

impl Action for Checkout {
    type Input = CheckoutInput;

    fn build(input: CheckoutInput) -> Self {
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
        entry_points.register("call", Self::call);
    }
    fn declare_inputs(inputs: &mut InputsBuilder) -> Result<(), ConfigurationError> {
        inputs.inputs_for("call", |i| {
            i.required("cart", ParamOptions::new().of_type(TypeTag::String))?
                .required("total", ParamOptions::new().of_type(TypeTag::Numeric))?;
            Ok(())
        })
    }
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("actionizer {}", actionizer::VERSION);

    let outcome = Checkout::perform(json!({"cart": "c-1", "total": 42.5}))?;
    println!("small cart: success={} fields={:?}", outcome.is_success(), outcome.fields());

    let outcome = Checkout::perform(json!({"cart": "c-2", "total": 250}))?;
    println!(
        "large cart: success={} error={}",
        outcome.is_success(),
        outcome.error().unwrap_or(UNKNOWN_ERROR)
    );

    let outcome = Checkout::perform(json!({":cart": "c-3"}))?;
    println!("missing total: {}", outcome.error().unwrap_or(UNKNOWN_ERROR));

    match Checkout::perform_strict(json!({"cart": "c-4", "total": 500})) {
        Err(err) if err.is_failure() => println!("strict: {err}"),
        other => println!("strict: unexpected {other:?}"),
    }

    Ok(())
}
