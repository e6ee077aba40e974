//! # eventcell
//!
//! **Eventcell** is the message-dispatch core for a networked service host.
//!
//! It receives inbound events from a transport and routes each one to a
//! registered handler, guaranteeing that handlers for events belonging to
//! the same logical client always execute in a deterministic,
//! single-threaded context, while handlers for different clients execute
//! concurrently. The transport, wire decoding, and module business logic
//! live outside this crate; only their lifecycle contracts are defined here.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   transport (Peer)
//!        │ EventSink::deliver(Event)
//!        ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  [default queue] ─► worker: Dispatcher::dispatch(ev)          │
//! │     - pool_size = 0: HandlerRegistry lookup + invoke inline   │
//! │     - pool_size > 0: pick shard (qid or random), post onward  │
//! └──────┬──────────────────┬──────────────────┬──────────────────┘
//!        ▼                  ▼                  ▼
//!   [shard-0]          [shard-1]          [shard-N-1]
//!    worker 0           worker 1           worker N-1
//!        │                  │                  │
//!        └── lookup + invoke handler (panic-isolated per task) ───┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Cell::new(cfg, peer) ──► constructed
//!
//! start(modules):
//!   ├─► verify module names unique (abort before any init on duplicate)
//!   ├─► module.init() in order (failure aborts, prefix torn down)
//!   ├─► peer.start(sink)          (events may begin arriving)
//!   ├─► default queue start_loop()
//!   └─► every pool queue start_loop()
//!
//! stop():
//!   ├─► peer.stop()               (no further events admitted)
//!   ├─► default queue: stop_loop() + wait()   (exact drain)
//!   ├─► every pool queue: stop_loop() + wait()
//!   └─► module.on_destroy() in start order (best-effort)
//! ```
//!
//! ## Guarantees
//! | Area          | Guarantee                                                       |
//! |---------------|-----------------------------------------------------------------|
//! | **Ordering**  | Per shard key, strict FIFO relative to arrival at the sink.     |
//! | **Isolation** | A handler panic is contained to its task; the queue keeps going.|
//! | **Drain**     | `stop()` returns only after every queue ran everything enqueued before it. |
//! | **Routing miss** | Unregistered message types are reported and dropped, never fatal. |
//!
//! Sessions without an attached identity are routed to a uniformly random
//! shard — ordering is explicitly not guaranteed for them until the
//! transport attaches user data carrying a stable shard key.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use eventcell::{Cell, CellConfig, CellError, Event, EventSink, Peer, Session, UserData};
//!
//! struct LoopbackPeer;
//!
//! #[async_trait]
//! impl Peer for LoopbackPeer {
//!     async fn start(&self, _sink: EventSink) -> Result<(), CellError> { Ok(()) }
//!     async fn stop(&self) {}
//! }
//!
//! struct Conn;
//!
//! impl Session for Conn {
//!     fn id(&self) -> u64 { 1 }
//!     fn user_data(&self) -> Option<Arc<dyn UserData>> { None }
//! }
//!
//! struct Hello { who: &'static str }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cell = Cell::new(CellConfig::new(3), Arc::new(LoopbackPeer))?;
//!
//!     cell.register_message::<Hello, _, _>(|ev| async move {
//!         println!("hello, {}", ev.message::<Hello>().unwrap().who);
//!     });
//!
//!     cell.start(Vec::new()).await?;
//!     cell.sink().deliver(Event::new(Arc::new(Conn), Hello { who: "cell" }));
//!     cell.stop().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod module;
mod peer;
mod session;

// ---- Public re-exports ----

pub use crate::config::CellConfig;
pub use crate::core::{
    BoxHandlerFuture, Cell, EventQueue, EventSink, Handler, QueueTask, default_cell,
    register_message,
};
pub use crate::error::{CellError, ConfigError, ModuleError};
pub use crate::events::Event;
pub use crate::module::Module;
pub use crate::peer::Peer;
pub use crate::session::{Session, UserData};
