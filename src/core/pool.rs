//! # QueuePool: fixed set of sharded event queues.
//!
//! The pool owns N [`EventQueue`]s created at cell construction. Every event
//! for a given shard key is processed by exactly one fixed queue, in delivery
//! order; sessions without an identity fall back to a uniformly random queue,
//! where ordering is explicitly not guaranteed.
//!
//! ```text
//!                ┌─ qid 0 ─► [shard-0] ─► worker 0
//!  pick(udata) ──┼─ qid 1 ─► [shard-1] ─► worker 1
//!                └─ none ──► random[0, N) ─► ...
//! ```

use std::sync::Arc;

use rand::Rng;

use crate::core::queue::EventQueue;
use crate::session::UserData;

/// Fixed array of sharded queues. Empty when sharding is disabled.
pub(crate) struct QueuePool {
    queues: Vec<Arc<EventQueue>>,
}

impl QueuePool {
    /// Creates `size` queues named `shard-0..shard-N`, with panic capture
    /// set per `capture_panic`.
    pub(crate) fn new(size: usize, capture_panic: bool) -> Self {
        let mut queues = Vec::with_capacity(size);
        for i in 0..size {
            let queue = EventQueue::new(format!("shard-{i}"));
            queue.enable_capture_panic(capture_panic);
            queues.push(Arc::new(queue));
        }
        Self { queues }
    }

    /// True when sharding is disabled (no pool queues).
    pub(crate) fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Number of pool queues.
    pub(crate) fn len(&self) -> usize {
        self.queues.len()
    }

    /// All queues, in shard order (lifecycle wiring).
    pub(crate) fn queues(&self) -> &[Arc<EventQueue>] {
        &self.queues
    }

    /// Selects the queue for a session.
    ///
    /// With user data present the shard key names the queue directly; the
    /// key must be a valid index (`< len`), which is the producer's contract.
    /// Without user data a queue is picked uniformly at random.
    pub(crate) fn pick(&self, udata: Option<Arc<dyn UserData>>) -> &Arc<EventQueue> {
        match udata {
            Some(udata) => &self.queues[udata.qid()],
            None => {
                let i = rand::rng().random_range(0..self.queues.len());
                &self.queues[i]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedShard(usize);

    impl UserData for FixedShard {
        fn qid(&self) -> usize {
            self.0
        }
    }

    #[test]
    fn test_shard_key_selects_fixed_queue() {
        let pool = QueuePool::new(3, true);
        for _ in 0..10 {
            let q = pool.pick(Some(Arc::new(FixedShard(1))));
            assert_eq!(q.name(), "shard-1");
        }
    }

    #[test]
    fn test_random_pick_stays_in_range() {
        let pool = QueuePool::new(5, true);
        for _ in 0..100 {
            let q = pool.pick(None);
            assert!(q.name().starts_with("shard-"));
        }
    }

    #[test]
    fn test_queue_names_follow_shard_order() {
        let pool = QueuePool::new(3, true);
        let names: Vec<_> = pool.queues().iter().map(|q| q.name().to_string()).collect();
        assert_eq!(names, ["shard-0", "shard-1", "shard-2"]);
    }
}
