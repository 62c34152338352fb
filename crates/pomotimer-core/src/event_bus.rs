//! Name-keyed publish/subscribe registry.
//!
//! Each bus is an ordinary value owned by whoever publishes on it; there is
//! no process-wide instance. Dispatch is synchronous and single-threaded.
//!
//! ## Usage
//!
//! ```ignore
//! let bus: EventBus<&str, u32> = EventBus::new();
//! let sub = bus.subscribe("count", |n| {
//!     println!("got {n}");
//!     Ok(())
//! });
//! bus.publish(&"count", &3);
//! sub.unsubscribe();
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

/// Error a listener may report. It is logged, never returned to the publisher.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;
pub type ListenerResult = Result<(), ListenerError>;

type Callback<P> = Rc<dyn Fn(&P) -> ListenerResult>;

/// Identifies one registration on a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registry<K, P> {
    next_id: u64,
    listeners: HashMap<K, Vec<(ListenerId, Callback<P>)>>,
}

impl<K: Eq + Hash, P> Registry<K, P> {
    fn remove(&mut self, name: &K, id: ListenerId) -> bool {
        let Some(list) = self.listeners.get_mut(name) else {
            return false;
        };
        let Some(pos) = list.iter().position(|(lid, _)| *lid == id) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.listeners.remove(name);
        }
        true
    }
}

/// Publish/subscribe registry keyed by event name.
///
/// Callbacks registered under the same name run in registration order.
/// A callback that returns `Err` or panics is logged and skipped; the
/// remaining callbacks still run and the publisher never sees the failure.
///
/// Publishing the same name again from inside one of its callbacks recurses
/// without limit. Avoiding that is the subscriber's job.
pub struct EventBus<K, P> {
    registry: Rc<RefCell<Registry<K, P>>>,
}

impl<K, P> EventBus<K, P>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                listeners: HashMap::new(),
            })),
        }
    }

    /// Register `callback` under `name`.
    ///
    /// The returned handle removes exactly this registration when
    /// [`Subscription::unsubscribe`] is called. Dropping the handle leaves the
    /// callback registered.
    pub fn subscribe<F>(&self, name: K, callback: F) -> Subscription<K, P>
    where
        F: Fn(&P) -> ListenerResult + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry
            .listeners
            .entry(name.clone())
            .or_default()
            .push((id, Rc::new(callback)));

        Subscription {
            name,
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Remove the registration `id` under `name`.
    ///
    /// Returns whether anything was removed; an unknown id is not an error.
    pub fn unsubscribe(&self, name: &K, id: ListenerId) -> bool {
        self.registry.borrow_mut().remove(name, id)
    }

    /// Invoke every callback registered under `name` with `payload`.
    ///
    /// The callback list is captured before dispatch, so callbacks may
    /// subscribe or unsubscribe while the event is being delivered.
    pub fn publish(&self, name: &K, payload: &P) {
        let callbacks: Vec<(ListenerId, Callback<P>)> = self
            .registry
            .borrow()
            .listeners
            .get(name)
            .cloned()
            .unwrap_or_default();

        for (id, callback) in callbacks {
            match catch_unwind(AssertUnwindSafe(|| callback(payload))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!(event = ?name, listener = id.0, error = %e, "event listener failed");
                }
                Err(_) => {
                    tracing::warn!(event = ?name, listener = id.0, "event listener panicked");
                }
            }
        }
    }

    pub fn listener_count(&self, name: &K) -> usize {
        self.registry
            .borrow()
            .listeners
            .get(name)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl<K, P> Default for EventBus<K, P>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by [`EventBus::subscribe`].
pub struct Subscription<K, P> {
    name: K,
    id: ListenerId,
    registry: Weak<RefCell<Registry<K, P>>>,
}

impl<K: Eq + Hash, P> Subscription<K, P> {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Remove the registration this handle was created for.
    ///
    /// A no-op if it was already removed or the bus no longer exists.
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(&self.name, self.id);
        }
    }
}
