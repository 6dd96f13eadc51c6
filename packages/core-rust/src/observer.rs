//! State-change observer trait and composite implementation.
//!
//! Defines [`StateObserver`] for reacting to engine state transitions, and
//! [`CompositeStateObserver`] which fans out notifications to multiple
//! observers. Render adapters subscribe here instead of being called from
//! inside the engine's business logic.

use std::sync::Arc;

use crate::engine::{EngineState, VisibleSet};
use crate::field::Field;

/// What kind of transition produced a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// One facet option flipped.
    FacetOption {
        key: Field,
        value: String,
        active: bool,
    },
    /// The search text was replaced.
    Search,
    /// The sort key or direction changed.
    Sort,
    /// Every option was deactivated and search and sort were cleared.
    ClearAll,
    /// State was seeded from a URL query string.
    Restored,
}

/// Observer for engine state transitions.
///
/// Called synchronously after every operation that actually changed state,
/// with a read-only view of the new state and its freshly evaluated visible
/// set. No-op operations do not notify.
///
/// Used as `Arc<dyn StateObserver>`.
pub trait StateObserver: Send + Sync {
    fn on_state_change(&self, change: &StateChange, state: &EngineState, visible: &VisibleSet<'_>);
}

/// Composite observer that fans out to multiple observers in registration order.
#[derive(Default, Clone)]
pub struct CompositeStateObserver {
    observers: Vec<Arc<dyn StateObserver>>,
}

impl CompositeStateObserver {
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn StateObserver>>) -> Self {
        Self { observers }
    }

    pub fn add(&mut self, observer: Arc<dyn StateObserver>) {
        self.observers.push(observer);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }
}

impl StateObserver for CompositeStateObserver {
    fn on_state_change(&self, change: &StateChange, state: &EngineState, visible: &VisibleSet<'_>) {
        for observer in &self.observers {
            observer.on_state_change(change, state, visible);
        }
    }
}

impl std::fmt::Debug for CompositeStateObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeStateObserver")
            .field("observers", &self.observers.len())
            .finish()
    }
}
