//! Synchronization between the domain model and the sketch store.
//!
//! A single long-lived subscriber drives every sketch mutation from domain
//! change notifications. Registration order is part of the contract:
//! perimeter-geometry events must be observed before constraint events that
//! reference the same perimeter, because constraint translation requires
//! the referenced points and lines to exist. A constraint addition that
//! still arrives early is absorbed — the matching perimeter event is
//! expected to follow and the constraint to be re-delivered.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::constraint::{key, BuildingConstraint};
use crate::domain::event::{Change, PerimeterInfo, PlanNotifier, SubscriberId};
use crate::domain::{PerimeterId, PlanQuery, StoreyId};
use crate::sketch::SketchStore;

struct SyncState {
    store: Rc<RefCell<SketchStore>>,
    query: Rc<dyn PlanQuery>,
    active_storey: Option<StoreyId>,
}

struct Subscriptions {
    storey: SubscriberId,
    perimeter: SubscriberId,
    constraint: SubscriberId,
}

/// Keeps the sketch store mirrored to the domain model.
///
/// Explicitly constructed and started; `stop` detaches all subscriptions
/// so independent instances can live side by side in tests.
pub struct SyncService {
    state: Rc<RefCell<SyncState>>,
    subscriptions: Option<Subscriptions>,
}

impl SyncService {
    /// Creates a stopped service over a store and a domain query handle.
    #[must_use]
    pub fn new(store: Rc<RefCell<SketchStore>>, query: Rc<dyn PlanQuery>) -> Self {
        Self {
            state: Rc::new(RefCell::new(SyncState {
                store,
                query,
                active_storey: None,
            })),
            subscriptions: None,
        }
    }

    /// The storey the service currently mirrors.
    #[must_use]
    pub fn active_storey(&self) -> Option<StoreyId> {
        self.state.borrow().active_storey.clone()
    }

    /// Builds geometry for the currently active storey and subscribes to
    /// the three notification topics, in the order the contract requires:
    /// storey switches, then perimeter lifecycle, then constraints.
    ///
    /// Starting an already-started service is a no-op.
    pub fn start(&mut self, notifier: &PlanNotifier) {
        if self.subscriptions.is_some() {
            return;
        }

        let initial = self.state.borrow().query.active_storey();
        switch_storey(&self.state, initial);

        let state = Rc::clone(&self.state);
        let storey = notifier
            .active_storey
            .subscribe(move |change: &Change<StoreyId>| {
                switch_storey(&state, change.current.clone());
            });

        let state = Rc::clone(&self.state);
        let perimeter = notifier
            .perimeters
            .subscribe(move |change: &Change<PerimeterInfo>| {
                on_perimeter(&state, change);
            });

        let state = Rc::clone(&self.state);
        let constraint = notifier
            .constraints
            .subscribe(move |change: &Change<BuildingConstraint>| {
                on_constraint(&state, change);
            });

        self.subscriptions = Some(Subscriptions {
            storey,
            perimeter,
            constraint,
        });
    }

    /// Detaches from the notifier. The sketch store keeps its last state.
    pub fn stop(&mut self, notifier: &PlanNotifier) {
        if let Some(subs) = self.subscriptions.take() {
            notifier.active_storey.unsubscribe(subs.storey);
            notifier.perimeters.unsubscribe(subs.perimeter);
            notifier.constraints.unsubscribe(subs.constraint);
        }
    }
}

/// Tears down every tracked perimeter and rebuilds the new storey's.
fn switch_storey(state: &Rc<RefCell<SyncState>>, storey: Option<StoreyId>) {
    let (store, query) = {
        let mut state = state.borrow_mut();
        state.active_storey = storey.clone();
        (Rc::clone(&state.store), Rc::clone(&state.query))
    };
    debug!(storey = ?storey.as_ref().map(StoreyId::as_str), "switching active storey");

    let tracked: Vec<PerimeterId> = store.borrow().registry().keys().cloned().collect();
    {
        let mut store = store.borrow_mut();
        for perimeter in &tracked {
            store.remove_perimeter_geometry(perimeter);
        }
    }

    if let Some(storey) = &storey {
        for perimeter in query.storey_perimeters(storey) {
            rebuild_perimeter(&store, &*query, &perimeter);
        }
    }
}

fn on_perimeter(state: &Rc<RefCell<SyncState>>, change: &Change<PerimeterInfo>) {
    let (store, query, active) = {
        let state = state.borrow();
        (
            Rc::clone(&state.store),
            Rc::clone(&state.query),
            state.active_storey.clone(),
        )
    };

    match (&change.current, &change.previous) {
        // Added: only perimeters of the active storey get geometry.
        (Some(info), None) => {
            if active.as_ref() == Some(&info.storey) {
                rebuild_perimeter(&store, &*query, &info.id);
            }
        }
        // Removed: only tear down what we actually track.
        (None, Some(info)) => {
            let tracked = store.borrow().registry().contains_key(&info.id);
            if tracked {
                store.borrow_mut().remove_perimeter_geometry(&info.id);
            }
        }
        // Updated: re-run the upsert, or drop tracking if the perimeter
        // moved to another storey.
        (Some(info), Some(_)) => {
            if active.as_ref() == Some(&info.storey) {
                rebuild_perimeter(&store, &*query, &info.id);
            } else {
                let tracked = store.borrow().registry().contains_key(&info.id);
                if tracked {
                    store.borrow_mut().remove_perimeter_geometry(&info.id);
                }
            }
        }
        (None, None) => {}
    }
}

fn on_constraint(state: &Rc<RefCell<SyncState>>, change: &Change<BuildingConstraint>) {
    let (store, query) = {
        let state = state.borrow();
        (Rc::clone(&state.store), Rc::clone(&state.query))
    };

    match (&change.current, &change.previous) {
        (Some(current), None) => {
            add_absorbed(&store, &*query, current);
        }
        (None, Some(previous)) => {
            store
                .borrow_mut()
                .remove_building_constraint(&key::key(previous));
        }
        (Some(current), Some(previous)) => {
            store
                .borrow_mut()
                .remove_building_constraint(&key::key(previous));
            add_absorbed(&store, &*query, current);
        }
        (None, None) => {}
    }
}

fn rebuild_perimeter(store: &Rc<RefCell<SketchStore>>, query: &dyn PlanQuery, id: &PerimeterId) {
    if let Err(error) = store.borrow_mut().add_perimeter_geometry(query, id) {
        warn!(perimeter = %id, %error, "failed to build perimeter geometry");
    }
}

/// Constraint additions absorb referential-integrity failures: the
/// geometry they need is expected to arrive with a perimeter event.
fn add_absorbed(
    store: &Rc<RefCell<SketchStore>>,
    query: &dyn PlanQuery,
    constraint: &BuildingConstraint,
) {
    if let Err(error) = store
        .borrow_mut()
        .add_building_constraint(query, constraint.clone())
    {
        debug!(
            kind = constraint.kind_name(),
            %error,
            "deferring building constraint until its geometry exists"
        );
    }
}
