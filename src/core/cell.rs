//! # Cell: service lifecycle controller.
//!
//! The [`Cell`] owns everything the dispatch core is made of — the default
//! queue, the sharded pool, the handler registry, the accepted module list,
//! and the transport peer handle — and drives it through one-way lifecycle:
//!
//! ```text
//! constructed ──start(modules)──► started ──stop()──► stopped (terminal)
//!
//! start: check module names ► init modules ► peer.start(sink)
//!        ► default queue loop ► pool queue loops
//! stop:  peer.stop (no more events) ► drain default queue
//!        ► drain pool queues ► module teardowns (best-effort)
//! ```
//!
//! ## Rules
//! - Module names are verified for uniqueness before any init hook runs; a
//!   duplicate aborts the whole start and retains no module list.
//! - Stop never returns until every queue has finished all tasks enqueued
//!   before it was called.
//! - A stopped cell is not restarted; `start` after `started`/`stopped` and
//!   `stop` before `started` are invalid-usage errors.
//!
//! ## Default cell
//! The first-constructed cell is recorded process-wide so boundary code can
//! use the free [`register_message`] without threading a handle. Explicit
//! `Arc<Cell>` handles are the normal API; the global accessor exists for
//! compatibility at the setup boundary only.

use std::any::Any;
use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::{error, info};

use crate::config::CellConfig;
use crate::core::dispatcher::{Dispatcher, EventSink};
use crate::core::pool::QueuePool;
use crate::core::queue::EventQueue;
use crate::core::registry::HandlerRegistry;
use crate::error::{CellError, ConfigError};
use crate::module::Module;
use crate::peer::Peer;

/// First-constructed cell, for the compatibility accessor.
static DEFAULT_CELL: OnceLock<Arc<Cell>> = OnceLock::new();

const CREATED: u8 = 0;
const STARTED: u8 = 1;
const STOPPED: u8 = 2;

/// One service instance: queue pool + default queue + handler registry +
/// module list + transport handle.
///
/// Multiple independent cells may coexist in one process; the first one
/// constructed additionally becomes the [`default_cell`].
pub struct Cell {
    cfg: CellConfig,
    registry: Arc<HandlerRegistry>,
    pool: Arc<QueuePool>,
    queue: Arc<EventQueue>,
    dispatcher: Arc<Dispatcher>,
    peer: Arc<dyn Peer>,
    modules: Mutex<Vec<Arc<dyn Module>>>,
    state: AtomicU8,
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("cfg", &self.cfg)
            .field("state", &self.state.load(AtomicOrdering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Cell {
    /// Creates a cell with `cfg.pool_size` sharded queues plus the default
    /// queue. Fails fast on an invalid pool size; no worker is spawned until
    /// [`start`](Self::start).
    pub fn new(cfg: CellConfig, peer: Arc<dyn Peer>) -> Result<Arc<Self>, ConfigError> {
        cfg.validate()?;

        let registry = Arc::new(HandlerRegistry::new());
        let pool = Arc::new(QueuePool::new(cfg.pool_size, cfg.capture_panic));
        let queue = Arc::new(EventQueue::new("default"));
        queue.enable_capture_panic(cfg.capture_panic);
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&registry), Arc::clone(&pool)));

        let cell = Arc::new(Self {
            cfg,
            registry,
            pool,
            queue,
            dispatcher,
            peer,
            modules: Mutex::new(Vec::new()),
            state: AtomicU8::new(CREATED),
        });

        let _ = DEFAULT_CELL.set(Arc::clone(&cell));
        Ok(cell)
    }

    /// The configuration this cell was constructed with.
    pub fn config(&self) -> &CellConfig {
        &self.cfg
    }

    /// Registers the handler for message type `M` on this cell.
    ///
    /// Call during setup, before [`start`](Self::start); the registry is
    /// treated as read-only afterwards. The last registration for a type
    /// wins silently.
    pub fn register_message<M, F, Fut>(&self, handler: F)
    where
        M: Any + Send + Sync,
        F: Fn(crate::events::Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.registry.register::<M, _, _>(handler);
    }

    /// The delivery handle for the transport peer.
    pub fn sink(&self) -> EventSink {
        EventSink::new(Arc::clone(&self.queue), Arc::clone(&self.dispatcher))
    }

    /// Starts the cell: module init in order, then the transport, then the
    /// default queue loop, then every pool queue loop.
    ///
    /// Module names are checked for uniqueness across the whole list before
    /// any init hook runs; on a duplicate the start aborts with no module
    /// accepted. An init failure aborts startup after tearing down the
    /// already-initialized prefix (best-effort).
    pub async fn start(&self, modules: Vec<Arc<dyn Module>>) -> Result<(), CellError> {
        if self
            .state
            .compare_exchange(CREATED, STARTED, AtomicOrdering::SeqCst, AtomicOrdering::SeqCst)
            .is_err()
        {
            return Err(CellError::AlreadyStarted);
        }

        if let Err(err) = self.start_inner(modules).await {
            self.state.store(CREATED, AtomicOrdering::SeqCst);
            return Err(err);
        }

        info!(pool = self.pool.len(), "cell started");
        Ok(())
    }

    async fn start_inner(&self, modules: Vec<Arc<dyn Module>>) -> Result<(), CellError> {
        let mut names = HashSet::new();
        for module in &modules {
            if !names.insert(module.name().to_string()) {
                return Err(CellError::DuplicateModule {
                    name: module.name().to_string(),
                });
            }
        }

        for (i, module) in modules.iter().enumerate() {
            if let Err(err) = module.init().await {
                teardown(&modules[..i]).await;
                return Err(CellError::ModuleInit {
                    name: module.name().to_string(),
                    source: err,
                });
            }
        }

        if let Err(err) = self.peer.start(self.sink()).await {
            teardown(&modules).await;
            return Err(err);
        }
        *self.modules.lock().expect("module list lock poisoned") = modules;

        self.queue.start_loop();
        for queue in self.pool.queues() {
            queue.start_loop();
        }
        Ok(())
    }

    /// Stops the cell: transport first (no further events admitted), then
    /// drain the default queue, then each pool queue, then module teardowns
    /// in start order.
    ///
    /// Does not return until every queue has executed everything enqueued
    /// before the call. A teardown failure is reported and the remaining
    /// teardowns still run.
    pub async fn stop(&self) -> Result<(), CellError> {
        if self
            .state
            .compare_exchange(STARTED, STOPPED, AtomicOrdering::SeqCst, AtomicOrdering::SeqCst)
            .is_err()
        {
            return Err(CellError::NotStarted);
        }

        self.peer.stop().await;

        self.queue.stop_loop();
        self.queue.wait().await;
        for queue in self.pool.queues() {
            queue.stop_loop();
            queue.wait().await;
        }

        let modules: Vec<_> = self
            .modules
            .lock()
            .expect("module list lock poisoned")
            .clone();
        teardown(&modules).await;

        info!("cell stopped");
        Ok(())
    }
}

/// Runs `on_destroy` for each module in order; failures are reported and do
/// not abort the remaining teardowns.
async fn teardown(modules: &[Arc<dyn Module>]) {
    for module in modules {
        if let Err(err) = module.on_destroy().await {
            error!(module = module.name(), error = %err, "module teardown failed");
        }
    }
}

/// Returns the first-constructed cell, if any.
pub fn default_cell() -> Option<Arc<Cell>> {
    DEFAULT_CELL.get().cloned()
}

/// Registers a handler on the first-constructed cell.
///
/// Compatibility adapter for setup-boundary code; prefer
/// [`Cell::register_message`] on an explicit handle.
pub fn register_message<M, F, Fut>(handler: F) -> Result<(), CellError>
where
    M: Any + Send + Sync,
    F: Fn(crate::events::Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    match DEFAULT_CELL.get() {
        Some(cell) => {
            cell.register_message::<M, _, _>(handler);
            Ok(())
        }
        None => Err(CellError::NoDefaultCell),
    }
}
