//! Application context
//!
//! A type-keyed registry standing in for the UI framework's provide/inject
//! mechanism. One context per application instance, so independent
//! applications (and tests) never share plugin state.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

type Provided = Arc<dyn Any + Send + Sync>;

/// Values exposed to every component of one application.
#[derive(Default)]
pub struct AppContext {
    provided: RwLock<HashMap<TypeId, Provided>>,
}

impl AppContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose `value`, replacing any earlier value of the same type.
    pub fn provide<T: Any + Send + Sync>(&self, value: Arc<T>) {
        self.provided.write().insert(TypeId::of::<T>(), value);
    }

    /// Look up the value of type `T`, if one was provided.
    #[must_use]
    pub fn inject<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let value = Arc::clone(self.provided.read().get(&TypeId::of::<T>())?);
        value.downcast::<T>().ok()
    }

    #[must_use]
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.provided.read().contains_key(&TypeId::of::<T>())
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").field("provided", &self.provided.read().len()).finish()
    }
}
