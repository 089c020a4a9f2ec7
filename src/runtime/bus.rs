//! Response bus - observer registration for engine output.

use std::sync::{Arc, PoisonError, RwLock};

use crate::schema::Response;

/// Observer invoked for every published response.
pub type Subscriber = Box<dyn Fn(&Response) + Send + Sync>;

/// Fan-out of engine responses to registered observers.
///
/// Observers run synchronously on the publishing thread, in registration
/// order. They must not subscribe from inside a callback.
#[derive(Clone, Default)]
pub struct ResponseBus {
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
}

impl ResponseBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    pub fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(&Response) + Send + Sync + 'static,
    {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(subscriber));
    }

    /// Deliver `response` to every observer.
    pub fn publish(&self, response: &Response) {
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for subscriber in subscribers.iter() {
            subscriber(response);
        }
    }
}
