//! Process-wide cache of action definitions.
//!
//! A definition is built the first time its action type is used and reused by
//! every later invocation. Definitions that fail to build are not cached, so
//! the same configuration error is reported on every attempt.

use std::any::{Any, TypeId};
use std::sync::Arc;

use actionizer_core::ConfigurationError;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::action::{Action, Definition};

static DEFINITIONS: Lazy<DashMap<TypeId, Arc<dyn Any + Send + Sync>>> = Lazy::new(DashMap::new);

/// The definition of `A`, building and caching it on first use.
pub fn define<A: Action>() -> Result<Arc<Definition<A>>, ConfigurationError> {
    let key = TypeId::of::<A>();

    let cached = DEFINITIONS.get(&key).map(|entry| Arc::clone(entry.value()));
    if let Some(definition) = cached.and_then(|any| any.downcast::<Definition<A>>().ok()) {
        return Ok(definition);
    }

    let built = Arc::new(Definition::<A>::build()?);
    debug!(
        action = A::type_name(),
        entry_points = built.entry_points().len(),
        "defined action"
    );

    let erased: Arc<dyn Any + Send + Sync> = built.clone();
    let stored = Arc::clone(DEFINITIONS.entry(key).or_insert(erased).value());
    Ok(stored.downcast::<Definition<A>>().unwrap_or(built))
}

/// Returns true if `A` has a cached definition.
pub fn is_defined<A: Action>() -> bool {
    DEFINITIONS.contains_key(&TypeId::of::<A>())
}
