//! # Example: echo_cell
//!
//! Minimal unsharded cell: one message type, handlers run inline on the
//! default queue's worker.
//!
//! Demonstrates how to:
//! - Implement the [`Peer`] contract with an in-memory transport.
//! - Register a typed handler and deliver events through the [`EventSink`].
//! - Start and stop the cell cleanly.
//!
//! ## Flow
//! ```text
//! Cell::new(pool_size = 0) ──► start()
//!     ├─► MemoryPeer::start(sink)   (keeps the sink for main to use)
//!     └─► default queue loop
//! sink.deliver(Echo) ──► [default queue] ──► handler inline
//! stop() ──► drain ──► exit
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example echo_cell
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use eventcell::{Cell, CellConfig, CellError, Event, EventSink, Peer, Session, UserData};

/// In-memory peer: hands the sink back to main instead of doing I/O.
#[derive(Default)]
struct MemoryPeer {
    sink: Mutex<Option<EventSink>>,
}

#[async_trait]
impl Peer for MemoryPeer {
    async fn start(&self, sink: EventSink) -> Result<(), CellError> {
        println!("[peer] listening (in memory)");
        *self.sink.lock().unwrap() = Some(sink);
        Ok(())
    }

    async fn stop(&self) {
        println!("[peer] stopped");
    }
}

/// Anonymous connection: no user data, no shard identity.
struct Conn(u64);

impl Session for Conn {
    fn id(&self) -> u64 {
        self.0
    }
    fn user_data(&self) -> Option<Arc<dyn UserData>> {
        None
    }
}

struct Echo {
    text: &'static str,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    // 1. Unsharded cell: handlers run inline on the default worker
    let peer = Arc::new(MemoryPeer::default());
    let cell = Cell::new(CellConfig::new(0), Arc::clone(&peer) as _)?;

    // 2. Register the echo handler before start
    cell.register_message::<Echo, _, _>(|ev| async move {
        let echo = ev.message::<Echo>().unwrap();
        println!("[echo] session={} text={}", ev.session().id(), echo.text);
    });

    // 3. Start with no modules
    cell.start(Vec::new()).await?;

    // 4. Deliver a few events the way the transport would
    let sink = peer.sink.lock().unwrap().take().expect("peer started");
    let conn = Arc::new(Conn(1));
    for text in ["hello", "from", "the", "cell"] {
        sink.deliver(Event::new(Arc::clone(&conn) as _, Echo { text }));
    }

    // 5. Stop: drains the default queue before returning
    cell.stop().await?;
    Ok(())
}
