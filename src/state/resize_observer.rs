//! Resize Observer - Per-element size observation.
//!
//! Observations are delivered by `pipeline::flush`, never synchronously from
//! `observe`. The first delivery reports the size at the first flush after
//! observation starts; later deliveries only happen when the size changes.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::layout;
use crate::types::Size;

pub type ResizeObserverHandler = Rc<dyn Fn(Size)>;

struct Observation {
    index: usize,
    handler: ResizeObserverHandler,
    last_size: Option<Size>,
}

struct ObserverRegistry {
    observations: BTreeMap<usize, Observation>,
    next_id: usize,
}

impl ObserverRegistry {
    fn new() -> Self {
        Self {
            observations: BTreeMap::new(),
            next_id: 0,
        }
    }
}

thread_local! {
    static OBSERVERS: RefCell<ObserverRegistry> = RefCell::new(ObserverRegistry::new());
}

/// Observe the border-box size of an element. Returns cleanup function.
pub fn observe<F>(index: usize, handler: F) -> impl FnOnce()
where
    F: Fn(Size) + 'static,
{
    let id = OBSERVERS.with(|obs| {
        let mut obs = obs.borrow_mut();
        let id = obs.next_id;
        obs.next_id += 1;
        obs.observations.insert(
            id,
            Observation {
                index,
                handler: Rc::new(handler),
                last_size: None,
            },
        );
        id
    });

    move || {
        OBSERVERS.with(|obs| {
            obs.borrow_mut().observations.remove(&id);
        });
    }
}

/// Deliver every observation whose size differs from the last one reported.
///
/// Returns the number of handlers invoked.
pub fn deliver_pending() -> usize {
    let pending: Vec<(usize, usize)> = OBSERVERS.with(|obs| {
        obs.borrow()
            .observations
            .iter()
            .map(|(&id, o)| (id, o.index))
            .collect()
    });

    let mut delivered = 0;
    for (id, index) in pending {
        let Some(size) = layout::size(index) else { continue };

        // Re-read: an earlier handler may have dropped this observation
        let handler = OBSERVERS.with(|obs| {
            let mut obs = obs.borrow_mut();
            let observation = obs.observations.get_mut(&id)?;
            if observation.last_size == Some(size) {
                return None;
            }
            observation.last_size = Some(size);
            Some(observation.handler.clone())
        });

        if let Some(handler) = handler {
            handler(size);
            delivered += 1;
        }
    }
    delivered
}

/// Whether any observation has never been delivered or has a stale size.
pub fn has_pending() -> bool {
    let observed: Vec<(usize, Option<Size>)> = OBSERVERS.with(|obs| {
        obs.borrow()
            .observations
            .values()
            .map(|o| (o.index, o.last_size))
            .collect()
    });
    observed
        .into_iter()
        .any(|(index, last)| layout::size(index).is_some_and(|size| last != Some(size)))
}

pub fn observation_count() -> usize {
    OBSERVERS.with(|obs| obs.borrow().observations.len())
}

/// Drop observations of a released element.
pub fn cleanup_index(index: usize) {
    OBSERVERS.with(|obs| {
        obs.borrow_mut().observations.retain(|_, o| o.index != index);
    });
}

/// Reset observer state (for testing).
pub fn reset_resize_observers() {
    OBSERVERS.with(|obs| *obs.borrow_mut() = ObserverRegistry::new());
}
