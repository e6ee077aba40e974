//! # Example: sharded_sessions
//!
//! Sharded cell with three queues and two identified sessions. Each session's
//! events land on the queue its shard key names, in delivery order; the two
//! sessions progress in parallel.
//!
//! ## Flow
//! ```text
//! Cell::new(pool_size = 3)
//!
//! deliver(alice #0..#5) ┐                      ┌─► [shard-1] alice, in order
//! deliver(bob   #0..#5) ┼─► [default queue] ───┤
//!        (interleaved)  ┘                      └─► [shard-2] bob, in order
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example sharded_sessions
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use eventcell::{Cell, CellConfig, CellError, Event, EventSink, Peer, Session, UserData};

#[derive(Default)]
struct MemoryPeer {
    sink: Mutex<Option<EventSink>>,
}

#[async_trait]
impl Peer for MemoryPeer {
    async fn start(&self, sink: EventSink) -> Result<(), CellError> {
        *self.sink.lock().unwrap() = Some(sink);
        Ok(())
    }

    async fn stop(&self) {}
}

/// Identified client: the shard key pins every event to one queue.
struct ClientShard(usize);

impl UserData for ClientShard {
    fn qid(&self) -> usize {
        self.0
    }
}

struct Conn {
    id: u64,
    shard: usize,
}

impl Session for Conn {
    fn id(&self) -> u64 {
        self.id
    }
    fn user_data(&self) -> Option<Arc<dyn UserData>> {
        Some(Arc::new(ClientShard(self.shard)))
    }
}

struct Chat {
    from: &'static str,
    seq: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let peer = Arc::new(MemoryPeer::default());
    let cell = Cell::new(CellConfig::new(3), Arc::clone(&peer) as _)?;

    cell.register_message::<Chat, _, _>(|ev| async move {
        let chat = ev.message::<Chat>().unwrap();
        println!(
            "[chat] session={} from={} seq={}",
            ev.session().id(),
            chat.from,
            chat.seq
        );
    });

    cell.start(Vec::new()).await?;

    let sink = peer.sink.lock().unwrap().take().expect("peer started");
    let alice = Arc::new(Conn { id: 100, shard: 1 });
    let bob = Arc::new(Conn { id: 200, shard: 2 });

    // Interleaved delivery: per-session output order is still 0..5 each.
    for seq in 0..5 {
        sink.deliver(Event::new(Arc::clone(&alice) as _, Chat { from: "alice", seq }));
        sink.deliver(Event::new(Arc::clone(&bob) as _, Chat { from: "bob", seq }));
    }

    cell.stop().await?;
    Ok(())
}
