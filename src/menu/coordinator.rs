//! Single-open coordination between menu buttons.
//!
//! Every button subscribes to a shared [`MenuCoordinator`] when it is built.
//! Opening a button announces it; the coordinator synchronously tells every
//! other live subscriber to close before the announcing button builds its
//! panel. Subscribers are held weakly, so a dropped button never keeps its
//! state alive through the coordinator.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

/// Identifies one menu button within a coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MenuId(u64);

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "menu#{}", self.0)
    }
}

/// Receiver of "another menu is opening" announcements.
pub trait OpeningListener {
    /// `opener` is about to present its panel.
    fn menu_opening(&self, opener: MenuId);
}

struct Subscriber {
    id: MenuId,
    listener: Weak<dyn OpeningListener>,
}

/// Shared broadcast channel enforcing that at most one panel is open.
#[derive(Default)]
pub struct MenuCoordinator {
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<Subscriber>>,
}

impl MenuCoordinator {
    /// Create a coordinator with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a fresh id.
    pub fn allocate_id(&self) -> MenuId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        MenuId(id)
    }

    /// Register `listener` under `id`.
    ///
    /// The returned [`Subscription`] unsubscribes when dropped.
    pub fn subscribe(
        self: &Rc<Self>,
        id: MenuId,
        listener: Weak<dyn OpeningListener>,
    ) -> Subscription {
        self.subscribers
            .borrow_mut()
            .push(Subscriber { id, listener });
        trace!(%id, "subscribed to menu coordinator");
        Subscription {
            id,
            coordinator: Rc::downgrade(self),
        }
    }

    fn unsubscribe(&self, id: MenuId) {
        self.subscribers.borrow_mut().retain(|s| s.id != id);
        trace!(%id, "unsubscribed from menu coordinator");
    }

    /// Tell every other subscriber that `opener` is opening.
    ///
    /// Delivery is synchronous: when this returns, every other listener has
    /// handled the announcement. Dead subscribers are pruned on the way.
    pub fn announce_opening(&self, opener: MenuId) {
        let listeners: Vec<Rc<dyn OpeningListener>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|s| s.listener.strong_count() > 0);
            subscribers
                .iter()
                .filter(|s| s.id != opener)
                .filter_map(|s| s.listener.upgrade())
                .collect()
        };

        debug!(%opener, others = listeners.len(), "announcing menu opening");
        for listener in listeners {
            listener.menu_opening(opener);
        }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|s| s.listener.strong_count() > 0)
            .count()
    }
}

impl fmt::Debug for MenuCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuCoordinator")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Keeps a listener registered; unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    id: MenuId,
    coordinator: Weak<MenuCoordinator>,
}

impl Subscription {
    /// Id the subscription was registered under.
    pub fn id(&self) -> MenuId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(coordinator) = self.coordinator.upgrade() {
            coordinator.unsubscribe(self.id);
        }
    }
}
