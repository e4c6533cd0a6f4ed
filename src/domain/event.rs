//! Change-notification layer consumed by the synchronization service.
//!
//! Everything here is single-threaded: a [`Signal`] is a plain subscriber
//! list, emission happens on the caller's stack, and delivery order is
//! registration order. That ordering is part of the contract — perimeter
//! geometry handlers must observe events before constraint handlers that
//! reference the same perimeter.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::constraint::BuildingConstraint;

use super::{PerimeterId, StoreyId};

/// A (current, previous) pair describing one domain mutation.
///
/// `(Some, None)` is an addition, `(None, Some)` a removal and
/// `(Some, Some)` an update.
#[derive(Debug, Clone)]
pub struct Change<T> {
    pub current: Option<T>,
    pub previous: Option<T>,
}

impl<T> Change<T> {
    /// Change describing an addition.
    #[must_use]
    pub fn added(value: T) -> Self {
        Self {
            current: Some(value),
            previous: None,
        }
    }

    /// Change describing a removal.
    #[must_use]
    pub fn removed(value: T) -> Self {
        Self {
            current: None,
            previous: Some(value),
        }
    }

    /// Change describing an update.
    #[must_use]
    pub fn updated(previous: T, current: T) -> Self {
        Self {
            current: Some(current),
            previous: Some(previous),
        }
    }
}

/// Handle returned by [`Signal::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

type Handler<T> = Rc<dyn Fn(&T)>;

/// A single-threaded subscriber list for one notification topic.
pub struct Signal<T> {
    subscribers: RefCell<Vec<(SubscriberId, Handler<T>)>>,
    next_id: Cell<u64>,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Signal<T> {
    /// Creates an empty signal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Registers a handler and returns its unsubscribe handle.
    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Removes a previously registered handler. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
    }

    /// Delivers `event` to every subscriber in registration order.
    ///
    /// The subscriber list is snapshotted first so a handler may
    /// subscribe or unsubscribe without invalidating the iteration.
    pub fn emit(&self, event: &T) {
        let snapshot: Vec<Handler<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        for handler in snapshot {
            handler(event);
        }
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

/// Identifying slice of a perimeter carried by lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerimeterInfo {
    pub id: PerimeterId,
    pub storey: StoreyId,
}

/// The domain model's notification hub: one [`Signal`] per topic.
#[derive(Debug, Default)]
pub struct PlanNotifier {
    /// Active-storey switches.
    pub active_storey: Signal<Change<StoreyId>>,
    /// Perimeter lifecycle (add/remove/update).
    pub perimeters: Signal<Change<PerimeterInfo>>,
    /// Declarative building-constraint lifecycle.
    pub constraints: Signal<Change<BuildingConstraint>>,
}

impl PlanNotifier {
    /// Creates a notifier with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
