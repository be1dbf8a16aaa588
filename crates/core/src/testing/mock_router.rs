//! In-memory host router

use std::sync::Arc;

use authgate_domain::{RouteLocation, RouterError};
use parking_lot::Mutex;

use crate::ports::{BeforeEachGuard, Router};

/// Router double that records scheduled navigations and runs registered
/// guards on demand through [`MockRouter::navigate`].
#[derive(Default)]
pub struct MockRouter {
    current: Mutex<RouteLocation>,
    guards: Mutex<Vec<Arc<dyn BeforeEachGuard>>>,
    pushed: Mutex<Vec<String>>,
    replaced: Mutex<Vec<String>>,
    reject_with: Mutex<Option<String>>,
}

impl MockRouter {
    /// Router sitting on `/`.
    #[must_use]
    pub fn new() -> Self {
        let router = Self::default();
        router.set_current(RouteLocation::new("/"));
        router
    }

    pub fn set_current(&self, route: RouteLocation) {
        *self.current.lock() = route;
    }

    /// Make `push`/`replace` fail with `reason`.
    pub fn reject_navigation(&self, reason: impl Into<String>) {
        *self.reject_with.lock() = Some(reason.into());
    }

    /// Run every guard against `to`, in registration order, stopping at the
    /// first refusal. On success the (possibly rewritten) target becomes the
    /// current route and is returned.
    pub async fn navigate(&self, mut to: RouteLocation) -> Option<RouteLocation> {
        let guards: Vec<Arc<dyn BeforeEachGuard>> = self.guards.lock().clone();
        let from = self.current.lock().clone();
        for guard in guards {
            if !guard.before_each(&mut to, &from).await {
                return None;
            }
        }
        self.set_current(to.clone());
        Some(to)
    }

    #[must_use]
    pub fn pushed(&self) -> Vec<String> {
        self.pushed.lock().clone()
    }

    #[must_use]
    pub fn replaced(&self) -> Vec<String> {
        self.replaced.lock().clone()
    }

    #[must_use]
    pub fn guard_count(&self) -> usize {
        self.guards.lock().len()
    }

    fn schedule(&self, log: &Mutex<Vec<String>>, path: &str) -> Result<(), RouterError> {
        if path.is_empty() {
            return Err(RouterError::InvalidTarget(path.to_string()));
        }
        if let Some(reason) = self.reject_with.lock().clone() {
            return Err(RouterError::Rejected { path: path.to_string(), reason });
        }
        log.lock().push(path.to_string());
        Ok(())
    }
}

impl Router for MockRouter {
    fn current_route(&self) -> RouteLocation {
        self.current.lock().clone()
    }

    fn push(&self, path: &str) -> Result<(), RouterError> {
        self.schedule(&self.pushed, path)
    }

    fn replace(&self, path: &str) -> Result<(), RouterError> {
        self.schedule(&self.replaced, path)
    }

    fn before_each(&self, guard: Arc<dyn BeforeEachGuard>) {
        self.guards.lock().push(guard);
    }
}
