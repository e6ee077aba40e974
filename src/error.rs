//! Error types used by the eventcell runtime and modules.
//!
//! This module defines three error types:
//!
//! - [`ConfigError`] — invalid construction-time configuration.
//! - [`CellError`] — errors raised by the cell lifecycle itself.
//! - [`ModuleError`] — errors raised by module init/teardown hooks.
//!
//! Configuration and lifecycle errors are fatal: the service must not come up
//! half-configured. Module teardown errors are surfaced but never abort the
//! remaining teardowns. All types provide `as_label` for logging/metrics.

use thiserror::Error;

/// # Errors produced by cell construction.
///
/// These represent invalid configuration detected before any queue or worker
/// is created. Construction is rejected outright.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Pool size is even and nonzero.
    ///
    /// Sharded pools must have an odd number of queues. The rule is kept as a
    /// compatibility constraint on the configuration surface; zero (sharding
    /// disabled) is always accepted.
    #[error("pool size must be odd when sharding is enabled, got {size}")]
    EvenPoolSize {
        /// The rejected pool size.
        size: usize,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventcell::ConfigError;
    ///
    /// let err = ConfigError::EvenPoolSize { size: 4 };
    /// assert_eq!(err.as_label(), "config_even_pool_size");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::EvenPoolSize { .. } => "config_even_pool_size",
        }
    }
}

/// # Errors produced by the cell lifecycle.
///
/// These represent misuse of the `constructed → started → stopped` state
/// machine and fatal startup failures (duplicate module names, a module init
/// hook failing, the transport refusing to start).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CellError {
    /// `start()` was called on a cell that is already started or stopped.
    #[error("cell already started")]
    AlreadyStarted,

    /// `stop()` was called on a cell that was never started.
    #[error("cell is not started")]
    NotStarted,

    /// Two modules in the same `start()` call share a name.
    ///
    /// The whole start sequence is aborted before any init hook runs; no
    /// partial module list is retained.
    #[error("duplicate module name: {name}")]
    DuplicateModule {
        /// The name carried by more than one module.
        name: String,
    },

    /// A module's init hook failed; startup is aborted.
    #[error("module {name} failed to initialize: {source}")]
    ModuleInit {
        /// Name of the failing module.
        name: String,
        /// The hook's error.
        source: ModuleError,
    },

    /// The transport failed to start listening/connecting.
    #[error("transport failed to start: {reason}")]
    Transport {
        /// Transport-supplied failure description.
        reason: String,
    },

    /// The process-wide convenience accessor was used before any cell was
    /// constructed.
    #[error("no default cell constructed yet")]
    NoDefaultCell,
}

impl CellError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventcell::CellError;
    ///
    /// let err = CellError::DuplicateModule { name: "auth".into() };
    /// assert_eq!(err.as_label(), "cell_duplicate_module");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CellError::AlreadyStarted => "cell_already_started",
            CellError::NotStarted => "cell_not_started",
            CellError::DuplicateModule { .. } => "cell_duplicate_module",
            CellError::ModuleInit { .. } => "cell_module_init",
            CellError::Transport { .. } => "cell_transport",
            CellError::NoDefaultCell => "cell_no_default",
        }
    }
}

/// # Error produced by a module hook.
///
/// Modules are external collaborators; their init and teardown hooks report
/// failures through this type. Init failures become
/// [`CellError::ModuleInit`] and abort startup; teardown failures are logged
/// by the cell and never abort the remaining teardowns.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ModuleError {
    /// Human-readable failure description.
    pub message: String,
}

impl ModuleError {
    /// Creates a module error from any displayable reason.
    ///
    /// # Example
    /// ```
    /// use eventcell::ModuleError;
    ///
    /// let err = ModuleError::new("datastore unreachable");
    /// assert_eq!(err.to_string(), "datastore unreachable");
    /// ```
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
