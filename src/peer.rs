//! # Transport peer capability contract.
//!
//! The peer is the listen/connect endpoint owned by the transport layer. The
//! core never performs network I/O; it only starts and stops the peer and
//! receives decoded events through the [`EventSink`] handed to
//! [`Peer::start`].
//!
//! ## Delivery contract
//! - The peer may deliver events concurrently from its own I/O context;
//!   [`EventSink::deliver`](crate::EventSink::deliver) is safe to call from
//!   any task and never blocks.
//! - Events for one session must be delivered in the order the transport
//!   observed them; the core preserves that order per shard key from the
//!   sink onward.
//! - After [`Peer::stop`] returns, the peer must deliver no further events.

use async_trait::async_trait;

use crate::core::EventSink;
use crate::error::CellError;

/// Contract for the transport endpoint.
///
/// Implementations live outside this crate (a real listener/connector, or an
/// in-memory peer in tests and demos).
#[async_trait]
pub trait Peer: Send + Sync + 'static {
    /// Begins the listen/connect operation, delivering every inbound event
    /// to `sink`.
    ///
    /// Returning an error aborts cell startup.
    async fn start(&self, sink: EventSink) -> Result<(), CellError>;

    /// Stops the endpoint and drains its delivery path. Once this returns,
    /// no further events are admitted into the core.
    async fn stop(&self);
}
