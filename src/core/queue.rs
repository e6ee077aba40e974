//! # EventQueue: single-worker FIFO task runner with panic isolation.
//!
//! Each queue owns an unbounded FIFO of boxed tasks and one dedicated worker
//! that executes them strictly one at a time, in enqueue order. Tasks on one
//! queue never run concurrently with each other; different queues run in
//! parallel.
//!
//! ## Lifecycle
//! ```text
//! created ──start_loop()──► running ──stop_loop()──► stopping ──► stopped
//!
//! post(task)   append to the FIFO; never blocks, safe from any producer
//! start_loop() spawn the dedicated worker
//! stop_loop()  enqueue an in-band stop marker: the worker finishes every
//!              task enqueued before the marker, then exits (exact drain)
//! wait()       await worker exit; idempotent
//! ```
//!
//! ## Panic isolation
//! With capture enabled, a panic inside a task is caught via
//! `catch_unwind`, reported, and the worker moves on to the next task. With
//! capture disabled the panic kills the worker; tasks still queued are
//! dropped when the queue is dropped.
//!
//! ## Rules
//! - Tasks are never re-ordered.
//! - A task posted after the worker has exited is dropped (warn).
//! - `stop_loop` + `wait` is the only shutdown path; there is no hard-cancel
//!   of an in-flight task and no drain timeout.

use std::any::Any;
use std::borrow::Cow;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use futures::FutureExt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Boxed unit of work executed by a queue worker.
pub type QueueTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

enum Cmd {
    Run(QueueTask),
    Stop,
}

/// Single-worker FIFO task queue.
///
/// ### Properties
/// - `post` never blocks the producer (unbounded channel) and is safe to
///   call concurrently from multiple producer contexts.
/// - Exactly one worker executes tasks; per-queue execution is serial.
/// - Stop always drains: everything enqueued before `stop_loop` runs to
///   completion before the worker exits.
pub struct EventQueue {
    name: Cow<'static, str>,
    tx: UnboundedSender<Cmd>,
    rx: Mutex<Option<UnboundedReceiver<Cmd>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    capture_panic: AtomicBool,
}

impl EventQueue {
    /// Creates a queue in the `created` state. No worker exists until
    /// [`start_loop`](Self::start_loop).
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            name: name.into(),
            tx,
            rx: Mutex::new(Some(rx)),
            worker: Mutex::new(None),
            capture_panic: AtomicBool::new(false),
        }
    }

    /// Queue name (for logs).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Toggles panic capture. Takes effect when the loop starts.
    pub fn enable_capture_panic(&self, on: bool) {
        self.capture_panic.store(on, AtomicOrdering::Relaxed);
    }

    /// Appends a task to the tail of the FIFO.
    ///
    /// Never blocks. If the worker has already exited, the task is dropped
    /// with a warning.
    pub fn post<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.tx.send(Cmd::Run(Box::pin(task))).is_err() {
            warn!(queue = %self.name, "dropped task: worker exited");
        }
    }

    /// Spawns the dedicated worker and begins executing tasks in enqueue
    /// order. Calling it again after the loop has started is a no-op (warn).
    pub fn start_loop(&self) {
        let rx = self.rx.lock().expect("queue receiver lock poisoned").take();
        let Some(mut rx) = rx else {
            warn!(queue = %self.name, "start_loop called twice");
            return;
        };

        let name = self.name.clone();
        let capture = self.capture_panic.load(AtomicOrdering::Relaxed);
        let handle = tokio::spawn(async move {
            debug!(queue = %name, "worker started");
            while let Some(cmd) = rx.recv().await {
                match cmd {
                    Cmd::Run(task) => {
                        if capture {
                            if let Err(panic) = AssertUnwindSafe(task).catch_unwind().await {
                                error!(
                                    queue = %name,
                                    panic = %panic_message(panic.as_ref()),
                                    "task panicked; worker keeps running"
                                );
                            }
                        } else {
                            task.await;
                        }
                    }
                    Cmd::Stop => break,
                }
            }
            debug!(queue = %name, "worker stopped");
        });

        *self.worker.lock().expect("queue worker lock poisoned") = Some(handle);
    }

    /// Signals the worker to finish everything enqueued so far and exit.
    ///
    /// Returns immediately; pair with [`wait`](Self::wait) to observe the
    /// drain completing.
    pub fn stop_loop(&self) {
        if self.tx.send(Cmd::Stop).is_err() {
            debug!(queue = %self.name, "stop_loop: worker already exited");
        }
    }

    /// Awaits worker exit. Idempotent: a second call returns immediately.
    ///
    /// Can pend indefinitely if an in-flight task hangs; there is no drain
    /// timeout.
    pub async fn wait(&self) {
        let handle = self.worker.lock().expect("queue worker lock poisoned").take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

/// Extracts a printable message from a panic payload.
fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
