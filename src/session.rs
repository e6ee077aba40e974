//! # Session and user-data capability contracts.
//!
//! The transport owns connections; the core only reads two capabilities from
//! them: a connection identity for log correlation, and an optional attached
//! user-data object exposing a shard key.
//!
//! ## Shard routing contract
//! - `user_data()` returns `None` → the session has no identity yet (e.g. not
//!   authenticated). Its events are routed to a uniformly random pool queue;
//!   ordering is explicitly not guaranteed in this state.
//! - `user_data()` returns `Some` → [`UserData::qid`] names the one pool
//!   queue that processes every event for this client, in delivery order.
//!   The value must stay stable for the lifetime of the session.

use std::sync::Arc;

/// Attached per-client state exposing the shard-key capability.
///
/// Produced by the transport/application layer once a client has an identity.
/// The returned shard key must be a valid index into the configured pool
/// (`< pool_size`); enforcing that is the producer's responsibility.
pub trait UserData: Send + Sync + 'static {
    /// Shard key: index of the pool queue that owns this client's events.
    fn qid(&self) -> usize;
}

/// One logical client connection, owned by the transport.
///
/// The core never writes through this handle; it reads the connection id for
/// log fields and the optional user data for routing.
pub trait Session: Send + Sync + 'static {
    /// Stable connection identity (for logs and diagnostics).
    fn id(&self) -> u64;

    /// Attached user data, if the client has one.
    ///
    /// `None` is a legal state meaning "route randomly".
    fn user_data(&self) -> Option<Arc<dyn UserData>>;
}
