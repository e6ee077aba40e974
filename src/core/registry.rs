//! # HandlerRegistry: message-type → handler mapping.
//!
//! Handlers are keyed by the [`TypeId`] of the concrete message type and
//! invoked with the full [`Event`]. Registration is expected to happen during
//! setup, before the cell starts; after start the registry is treated as
//! read-only (concurrent registration past that point is a precondition
//! violation, not guarded at runtime). The last registration for a type wins
//! silently; re-registering one type never disturbs other entries.
//!
//! There is no wildcard or fallback matching: an unregistered message type is
//! a routing miss, reported by the dispatcher.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use crate::events::Event;

/// Boxed future produced by one handler invocation.
pub type BoxHandlerFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Shared handler: called once per matching event, produces a fresh future
/// per invocation.
pub type Handler = Arc<dyn Fn(Event) -> BoxHandlerFuture + Send + Sync>;

/// Mapping from message type identity to handler function.
#[derive(Default)]
pub(crate) struct HandlerRegistry {
    handlers: RwLock<HashMap<TypeId, Handler>>,
}

impl HandlerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores/overwrites the handler for message type `M`.
    pub(crate) fn register<M, F, Fut>(&self, handler: F)
    where
        M: Any + Send + Sync,
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |ev| Box::pin(handler(ev)));
        self.handlers
            .write()
            .expect("handler registry lock poisoned")
            .insert(TypeId::of::<M>(), handler);
    }

    /// Returns the handler registered for `message_type`, or `None` on a
    /// routing miss.
    pub(crate) fn lookup(&self, message_type: TypeId) -> Option<Handler> {
        self.handlers
            .read()
            .expect("handler registry lock poisoned")
            .get(&message_type)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Session, UserData};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Conn;

    impl Session for Conn {
        fn id(&self) -> u64 {
            0
        }
        fn user_data(&self) -> Option<Arc<dyn UserData>> {
            None
        }
    }

    struct Ping;
    struct Pong;

    #[tokio::test]
    async fn test_lookup_hit_invokes_registered_handler() {
        let registry = HandlerRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let probe = Arc::clone(&hits);
        registry.register::<Ping, _, _>(move |_ev| {
            let probe = Arc::clone(&probe);
            async move {
                probe.fetch_add(1, Ordering::SeqCst);
            }
        });

        let ev = Event::new(Arc::new(Conn), Ping);
        let handler = registry.lookup(ev.message_type()).unwrap();
        handler(ev).await;

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_lookup_miss_for_unregistered_type() {
        let registry = HandlerRegistry::new();
        registry.register::<Ping, _, _>(|_ev| async {});
        assert!(registry.lookup(TypeId::of::<Pong>()).is_none());
    }

    #[tokio::test]
    async fn test_last_registration_wins_without_corrupting_others() {
        let registry = HandlerRegistry::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let other = Arc::new(AtomicUsize::new(0));

        let probe = Arc::clone(&other);
        registry.register::<Pong, _, _>(move |_ev| {
            let probe = Arc::clone(&probe);
            async move {
                probe.fetch_add(1, Ordering::SeqCst);
            }
        });

        let probe = Arc::clone(&first);
        registry.register::<Ping, _, _>(move |_ev| {
            let probe = Arc::clone(&probe);
            async move {
                probe.fetch_add(1, Ordering::SeqCst);
            }
        });
        let probe = Arc::clone(&second);
        registry.register::<Ping, _, _>(move |_ev| {
            let probe = Arc::clone(&probe);
            async move {
                probe.fetch_add(1, Ordering::SeqCst);
            }
        });

        let handler = registry.lookup(TypeId::of::<Ping>()).unwrap();
        handler(Event::new(Arc::new(Conn), Ping)).await;
        let handler = registry.lookup(TypeId::of::<Pong>()).unwrap();
        handler(Event::new(Arc::new(Conn), Pong)).await;

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(other.load(Ordering::SeqCst), 1);
    }
}
