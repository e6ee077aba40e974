//! # Dispatcher: routes one inbound event to its execution context.
//!
//! The transport delivers through an [`EventSink`], which posts every event
//! onto the default queue — the deterministic, single-threaded context all
//! routing decisions run on. From there each event takes one of two paths:
//!
//! ```text
//! peer ──deliver()──► [default queue] ──► dispatch(ev)
//!                                           │
//!                 sharding disabled ────────┤ lookup + invoke inline
//!                                           │ (on the default worker)
//!                 sharding enabled ─────────┘
//!                        │
//!                        ├─ user data present ─► pool[qid]    (fixed, ordered)
//!                        └─ no user data ──────► pool[random] (unordered)
//!                                │
//!                                └─► posted task: lookup + invoke on that
//!                                    queue's dedicated worker
//! ```
//!
//! ## Rules
//! - Each event is consumed exactly once: one lookup, at most one handler
//!   invocation.
//! - A routing miss (no handler for the message type) is reported and the
//!   event is dropped; the service keeps running.
//! - Delivery order into the sink is preserved per shard key: the default
//!   queue is FIFO and posts to pool queues in that same order.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::pool::QueuePool;
use crate::core::queue::EventQueue;
use crate::core::registry::HandlerRegistry;
use crate::events::Event;

/// Routing step shared by the default queue's dispatch tasks.
pub(crate) struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    pool: Arc<QueuePool>,
}

impl Dispatcher {
    pub(crate) fn new(registry: Arc<HandlerRegistry>, pool: Arc<QueuePool>) -> Self {
        Self { registry, pool }
    }

    /// Routes one event. Runs on the default queue's worker.
    ///
    /// With sharding disabled the handler executes inline, right here. With
    /// sharding enabled the lookup-and-invoke step is posted onto the queue
    /// owning the session's shard key (random for identity-less sessions).
    pub(crate) async fn dispatch(&self, ev: Event) {
        if self.pool.is_empty() {
            run_handler(&self.registry, ev).await;
            return;
        }

        let queue = self.pool.pick(ev.session().user_data());
        debug!(
            queue = %queue.name(),
            session = ev.session().id(),
            message = %ev.message_name(),
            "event routed"
        );
        let registry = Arc::clone(&self.registry);
        queue.post(async move {
            run_handler(&registry, ev).await;
        });
    }
}

/// Looks up and invokes the handler for one event, or reports a routing miss.
async fn run_handler(registry: &HandlerRegistry, ev: Event) {
    match registry.lookup(ev.message_type()) {
        Some(handler) => handler(ev).await,
        None => {
            warn!(
                message = %ev.message_name(),
                session = ev.session().id(),
                seq = ev.seq(),
                "routing miss: no handler registered"
            );
        }
    }
}

/// Cloneable delivery handle handed to the transport peer.
///
/// `deliver` appends the event to the default queue and returns immediately;
/// it is safe to call concurrently from the transport's I/O contexts. Events
/// delivered from one context are dispatched in delivery order.
#[derive(Clone)]
pub struct EventSink {
    queue: Arc<EventQueue>,
    dispatcher: Arc<Dispatcher>,
}

impl EventSink {
    pub(crate) fn new(queue: Arc<EventQueue>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { queue, dispatcher }
    }

    /// Admits one inbound event into the core. Never blocks.
    pub fn deliver(&self, ev: Event) {
        let dispatcher = Arc::clone(&self.dispatcher);
        self.queue.post(async move {
            dispatcher.dispatch(ev).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Session, UserData};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedShard(usize);

    impl UserData for FixedShard {
        fn qid(&self) -> usize {
            self.0
        }
    }

    struct Conn {
        id: u64,
        shard: Option<usize>,
    }

    impl Session for Conn {
        fn id(&self) -> u64 {
            self.id
        }
        fn user_data(&self) -> Option<Arc<dyn UserData>> {
            self.shard.map(|qid| Arc::new(FixedShard(qid)) as Arc<dyn UserData>)
        }
    }

    struct Ping;
    struct Unhandled;

    fn dispatcher_with_pool(size: usize) -> (Arc<HandlerRegistry>, Arc<QueuePool>, Dispatcher) {
        let registry = Arc::new(HandlerRegistry::new());
        let pool = Arc::new(QueuePool::new(size, true));
        let dispatcher = Dispatcher::new(Arc::clone(&registry), Arc::clone(&pool));
        (registry, pool, dispatcher)
    }

    #[tokio::test]
    async fn test_unsharded_dispatch_runs_handler_inline() {
        let (registry, _pool, dispatcher) = dispatcher_with_pool(0);
        let hits = Arc::new(AtomicUsize::new(0));

        let probe = Arc::clone(&hits);
        registry.register::<Ping, _, _>(move |_ev| {
            let probe = Arc::clone(&probe);
            async move {
                probe.fetch_add(1, Ordering::SeqCst);
            }
        });

        let session = Arc::new(Conn { id: 1, shard: None });
        dispatcher.dispatch(Event::new(session, Ping)).await;

        // No queue worker involved: the handler already ran.
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_routing_miss_is_not_fatal() {
        let (registry, _pool, dispatcher) = dispatcher_with_pool(0);
        let hits = Arc::new(AtomicUsize::new(0));

        let probe = Arc::clone(&hits);
        registry.register::<Ping, _, _>(move |_ev| {
            let probe = Arc::clone(&probe);
            async move {
                probe.fetch_add(1, Ordering::SeqCst);
            }
        });

        let session = Arc::new(Conn { id: 1, shard: None });
        dispatcher.dispatch(Event::new(Arc::clone(&session) as _, Unhandled)).await;
        dispatcher.dispatch(Event::new(session, Ping)).await;

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sharded_dispatch_lands_on_keyed_queue() {
        let (registry, pool, dispatcher) = dispatcher_with_pool(3);
        let hits = Arc::new(AtomicUsize::new(0));

        let probe = Arc::clone(&hits);
        registry.register::<Ping, _, _>(move |_ev| {
            let probe = Arc::clone(&probe);
            async move {
                probe.fetch_add(1, Ordering::SeqCst);
            }
        });

        // Only the keyed queue gets a worker: if routing picked any other
        // queue the task would sit unexecuted and the assertion would fail.
        pool.queues()[2].start_loop();

        let session = Arc::new(Conn { id: 9, shard: Some(2) });
        dispatcher.dispatch(Event::new(session, Ping)).await;

        pool.queues()[2].stop_loop();
        pool.queues()[2].wait().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sink_preserves_delivery_order() {
        let (registry, pool, dispatcher) = dispatcher_with_pool(1);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let probe = Arc::clone(&seen);
        registry.register::<u32, _, _>(move |ev| {
            let probe = Arc::clone(&probe);
            async move {
                probe.lock().unwrap().push(*ev.message::<u32>().unwrap());
            }
        });

        let default_queue = Arc::new(EventQueue::new("default"));
        let sink = EventSink::new(Arc::clone(&default_queue), Arc::new(dispatcher));

        let session = Arc::new(Conn { id: 3, shard: Some(0) });
        for i in 0..50u32 {
            sink.deliver(Event::new(Arc::clone(&session) as _, i));
        }

        default_queue.start_loop();
        pool.queues()[0].start_loop();
        default_queue.stop_loop();
        default_queue.wait().await;
        pool.queues()[0].stop_loop();
        pool.queues()[0].wait().await;

        assert_eq!(*seen.lock().unwrap(), (0..50).collect::<Vec<_>>());
    }
}
