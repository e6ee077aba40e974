//! # Module capability contract.
//!
//! A module is a named unit of service functionality with an init step and a
//! teardown step. Modules are handed to [`Cell::start`](crate::Cell::start),
//! which owns them for the cell's entire active lifetime.
//!
//! ## Lifecycle rules
//! - Module names must be unique within one cell instance; a duplicate
//!   aborts the whole start sequence before any init hook runs.
//! - Init hooks run in the given order. An init failure aborts startup.
//! - Teardown hooks run in start order during [`Cell::stop`](crate::Cell::stop),
//!   after all queues have drained. A teardown failure is surfaced and the
//!   remaining teardowns still run.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use eventcell::{Module, ModuleError};
//!
//! struct Metrics;
//!
//! #[async_trait]
//! impl Module for Metrics {
//!     fn name(&self) -> &str { "metrics" }
//!
//!     async fn init(&self) -> Result<(), ModuleError> {
//!         // open exporters, allocate state...
//!         Ok(())
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::error::ModuleError;

/// Contract for service modules.
///
/// Hooks are called from the cell's lifecycle methods; implementations may be
/// slow (I/O, handshakes) and should avoid blocking the async runtime.
#[async_trait]
pub trait Module: Send + Sync + 'static {
    /// Globally-unique name within one cell instance.
    fn name(&self) -> &str;

    /// Initializes the module. Called once, before the transport starts.
    async fn init(&self) -> Result<(), ModuleError>;

    /// Tears the module down. Called once during `stop()`, after all queues
    /// have drained. Best-effort: errors are logged, not fatal.
    async fn on_destroy(&self) -> Result<(), ModuleError> {
        Ok(())
    }
}
