//! # Inbound event data model.
//!
//! An [`Event`] is one inbound occurrence produced by the transport: a
//! session reference plus a decoded message payload, optionally carrying a
//! processing-error note from the decode path. Events are consumed exactly
//! once by the dispatcher and are not persisted.
//!
//! ## Message typing
//! The payload is type-erased (`Arc<dyn Any + Send + Sync>`); its concrete
//! type's [`TypeId`] is captured at construction and is the key the handler
//! registry is consulted with. Handlers recover the concrete type with
//! [`Event::message`]. The type name is captured alongside for routing-miss
//! reports.
//!
//! ## Ordering metadata
//! Each event carries a globally unique, monotonically increasing sequence
//! number (`seq`) and a wall-clock timestamp (`at`). Both exist for log
//! correlation only; routing order is defined by queue FIFO, not by `seq`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventcell::{Event, Session, UserData};
//!
//! struct Conn(u64);
//! impl Session for Conn {
//!     fn id(&self) -> u64 { self.0 }
//!     fn user_data(&self) -> Option<Arc<dyn UserData>> { None }
//! }
//!
//! struct Ping { nonce: u32 }
//!
//! let ev = Event::new(Arc::new(Conn(7)), Ping { nonce: 42 });
//! assert_eq!(ev.session().id(), 7);
//! assert_eq!(ev.message::<Ping>().unwrap().nonce, 42);
//! assert!(ev.message::<String>().is_none());
//! ```

use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::session::Session;

/// Global sequence counter for event ordering in logs.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// One inbound occurrence: session reference + decoded message payload.
///
/// Cheap to clone (payload and session are shared behind `Arc`); cloning does
/// not duplicate the "consumed exactly once" contract — the dispatcher hands
/// each event to exactly one handler invocation.
#[derive(Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    seq: u64,
    /// Wall-clock timestamp (for logs).
    at: SystemTime,
    /// The connection the event arrived on.
    session: Arc<dyn Session>,
    /// Type-erased decoded message.
    message: Arc<dyn Any + Send + Sync>,
    /// Type identity of the concrete message, the registry key.
    message_type: TypeId,
    /// Concrete message type name (for routing-miss reports).
    message_name: &'static str,
    /// Optional processing-error note attached by the decode path.
    error: Option<Arc<str>>,
}

impl Event {
    /// Creates an event for `message` arriving on `session`.
    ///
    /// Captures the payload's type identity and name, stamps the next global
    /// sequence number and the current wall-clock time.
    pub fn new<M: Any + Send + Sync>(session: Arc<dyn Session>, message: M) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            session,
            message: Arc::new(message),
            message_type: TypeId::of::<M>(),
            message_name: type_name::<M>(),
            error: None,
        }
    }

    /// Attaches a processing-error note (e.g. a decode warning).
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Sequence number (log correlation only).
    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Wall-clock arrival timestamp.
    #[inline]
    pub fn at(&self) -> SystemTime {
        self.at
    }

    /// The session this event arrived on.
    #[inline]
    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    /// Downcasts the payload to its concrete message type.
    ///
    /// Returns `None` if `M` is not the type the event was constructed with.
    #[inline]
    pub fn message<M: Any>(&self) -> Option<&M> {
        self.message.downcast_ref::<M>()
    }

    /// Type identity of the payload (the handler-registry key).
    #[inline]
    pub fn message_type(&self) -> TypeId {
        self.message_type
    }

    /// Concrete type name of the payload (for logs).
    #[inline]
    pub fn message_name(&self) -> &'static str {
        self.message_name
    }

    /// Processing-error note, if the decode path attached one.
    #[inline]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("seq", &self.seq)
            .field("session", &self.session.id())
            .field("message", &self.message_name)
            .field("error", &self.error)
            .finish()
    }
}
