//! Runtime core: queues, routing, and lifecycle.
//!
//! This module contains the dispatch machinery behind the public [`Cell`]
//! API.
//!
//! Internal modules:
//! - [`queue`]: single-worker FIFO task runner with panic isolation;
//! - [`pool`]: the fixed set of sharded queues and shard selection;
//! - [`registry`]: message-type → handler mapping;
//! - [`dispatcher`]: per-event routing and the transport-facing [`EventSink`];
//! - [`cell`]: lifecycle orchestration and the default-cell adapter.

mod cell;
mod dispatcher;
mod pool;
mod queue;
mod registry;

pub use cell::{Cell, default_cell, register_message};
pub use dispatcher::EventSink;
pub use queue::{EventQueue, QueueTask};
pub use registry::{BoxHandlerFuture, Handler};
