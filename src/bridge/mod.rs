//! Blocking bridge to a long-lived asynchronous connection.
//!
//! A [`Bridge`] owns one background worker thread running a current-thread
//! Tokio runtime, and one connection object living on that worker. Blocking
//! callers hand it asynchronous operations through [`Bridge::call`] and wait
//! for the result with a ceiling. Nothing outside the bridge ever touches the
//! connection directly.
//!
//! ```no_run
//! use async_trait::async_trait;
//! use futures::FutureExt;
//! use mcp_bridge::bridge::{Bridge, Connection};
//! use mcp_bridge::error::Result;
//!
//! struct Counter {
//!     hits: u32,
//! }
//!
//! #[async_trait]
//! impl Connection for Counter {
//!     async fn connect(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     async fn disconnect(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let bridge = Bridge::new(|| Ok(Counter { hits: 0 }));
//! bridge.start()?;
//! let hits = bridge.call(|counter| {
//!     async move {
//!         counter.hits += 1;
//!         Ok(counter.hits)
//!     }
//!     .boxed()
//! })?;
//! assert_eq!(hits, 1);
//! bridge.stop();
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "mcp")]
pub mod global;
#[cfg(feature = "mcp")]
mod mcp;
mod worker;

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use strum::Display;

use crate::error::{BridgeError, Result};
use worker::{WaitError, Worker};

/// Lifecycle of the external connection owned by a [`Bridge`].
#[async_trait]
pub trait Connection: Send + 'static {
    /// Establish the connection and complete any protocol handshake.
    async fn connect(&mut self) -> Result<()>;

    /// Tear the connection down.
    async fn disconnect(&mut self) -> Result<()>;
}

/// Where a [`Bridge`] is in its start/stop lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum BridgeState {
    Uninitialized,
    Starting,
    Connected,
    Stopped,
}

/// Caller-side wait ceilings.
///
/// These bound how long a blocking caller waits; they do not cancel the
/// operation running on the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeTimeouts {
    pub connect: Duration,
    pub call: Duration,
    pub disconnect: Duration,
}

impl Default for BridgeTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(30),
            call: Duration::from_secs(60),
            disconnect: Duration::from_secs(10),
        }
    }
}

type ConnectionFactory<C> = Box<dyn Fn() -> Result<C> + Send + Sync>;

struct Shared<C: Connection> {
    state: BridgeState,
    worker: Option<Worker<C>>,
}

/// Synchronous front end to one asynchronous connection.
///
/// Operations submitted through [`call`](Self::call) run one at a time on
/// the worker, in the order the worker receives them. A call that times out
/// keeps occupying the worker until it finishes on its own.
pub struct Bridge<C: Connection> {
    name: String,
    factory: ConnectionFactory<C>,
    timeouts: BridgeTimeouts,
    // Serializes start() and stop() against each other.
    lifecycle: Mutex<()>,
    shared: Mutex<Shared<C>>,
}

impl<C: Connection> fmt::Debug for Bridge<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl<C: Connection> Bridge<C> {
    /// Create an unstarted bridge. `factory` builds a fresh connection object
    /// on every [`start`](Self::start).
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<C> + Send + Sync + 'static,
    {
        Self {
            name: "bridge".to_string(),
            factory: Box::new(factory),
            timeouts: BridgeTimeouts::default(),
            lifecycle: Mutex::new(()),
            shared: Mutex::new(Shared {
                state: BridgeState::Uninitialized,
                worker: None,
            }),
        }
    }

    /// Name used for the worker thread and in log fields.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_timeouts(mut self, timeouts: BridgeTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timeouts(&self) -> BridgeTimeouts {
        self.timeouts
    }

    pub fn state(&self) -> BridgeState {
        lock(&self.shared).state
    }

    pub fn is_connected(&self) -> bool {
        self.state() == BridgeState::Connected
    }

    /// Spawn the worker and complete the connection handshake.
    ///
    /// Returns immediately when already connected. On failure the bridge is
    /// left startable again.
    pub fn start(&self) -> Result<()> {
        let _lifecycle = lock(&self.lifecycle);
        {
            let mut shared = lock(&self.shared);
            if shared.state == BridgeState::Connected {
                tracing::debug!(bridge = %self.name, "bridge already connected");
                return Ok(());
            }
            shared.state = BridgeState::Starting;
        }

        match self.establish() {
            Ok(worker) => {
                let mut shared = lock(&self.shared);
                shared.worker = Some(worker);
                shared.state = BridgeState::Connected;
                tracing::info!(bridge = %self.name, "bridge connected");
                Ok(())
            }
            Err(error) => {
                lock(&self.shared).state = BridgeState::Uninitialized;
                tracing::warn!(bridge = %self.name, error = %error, "bridge failed to connect");
                Err(error)
            }
        }
    }

    fn establish(&self) -> Result<Worker<C>> {
        let connection = (self.factory)()?;
        let worker = Worker::spawn(connection, &self.name)?;

        let pending = match worker.submit(|connection| connection.connect()) {
            Ok(pending) => pending,
            Err(error) => {
                worker.abort();
                return Err(error.into_connection_error());
            }
        };

        let error = match pending.wait(self.timeouts.connect) {
            Ok(Ok(())) => return Ok(worker),
            Ok(Err(error)) => error.into_connection_error(),
            Err(WaitError::TimedOut) => {
                BridgeError::ConnectionTimeout(self.timeouts.connect.as_millis() as u64)
            }
            Err(WaitError::WorkerGone) => {
                BridgeError::Connection("bridge worker exited during handshake".into())
            }
        };
        worker.abort();
        Err(error)
    }

    /// Run `op` against the connection on the worker and block for its
    /// result.
    ///
    /// Errors returned by `op` are passed through unchanged. On
    /// [`BridgeError::CallTimeout`] the operation may still complete later.
    pub fn call<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: for<'a> FnOnce(&'a mut C) -> BoxFuture<'a, Result<T>> + Send + 'static,
    {
        let submitter = {
            let shared = lock(&self.shared);
            match (shared.state, shared.worker.as_ref()) {
                (BridgeState::Connected, Some(worker)) => worker.submitter(),
                _ => return Err(BridgeError::NotStarted),
            }
        };

        let pending = submitter.submit(op)?;
        match pending.wait(self.timeouts.call) {
            Ok(result) => result,
            Err(WaitError::TimedOut) => {
                let timeout_ms = self.timeouts.call.as_millis() as u64;
                tracing::warn!(bridge = %self.name, timeout_ms, "bridge call timed out");
                Err(BridgeError::CallTimeout(timeout_ms))
            }
            Err(WaitError::WorkerGone) => Err(BridgeError::WorkerStopped),
        }
    }

    /// Disconnect and let the worker exit once queued work drains.
    ///
    /// No-op unless connected. Teardown failures are logged, never returned,
    /// so this is safe from cleanup paths.
    pub fn stop(&self) {
        let _lifecycle = lock(&self.lifecycle);
        let worker = {
            let mut shared = lock(&self.shared);
            if shared.state != BridgeState::Connected {
                return;
            }
            shared.state = BridgeState::Stopped;
            shared.worker.take()
        };
        let Some(worker) = worker else { return };

        let teardown = worker
            .submit(|connection| connection.disconnect())
            .map(|pending| pending.wait(self.timeouts.disconnect));

        let wedged = match teardown {
            Ok(Ok(Ok(()))) => false,
            Ok(Ok(Err(error))) => {
                tracing::warn!(bridge = %self.name, error = %error, "disconnect failed");
                false
            }
            Ok(Err(WaitError::TimedOut)) => {
                tracing::warn!(
                    bridge = %self.name,
                    timeout_ms = self.timeouts.disconnect.as_millis() as u64,
                    "disconnect timed out; aborting worker"
                );
                true
            }
            Ok(Err(WaitError::WorkerGone)) | Err(_) => {
                tracing::debug!(bridge = %self.name, "worker already gone at stop");
                false
            }
        };

        if wedged {
            worker.abort();
        } else {
            worker.close();
        }
        tracing::info!(bridge = %self.name, "bridge stopped");
    }
}

impl<C: Connection> Drop for Bridge<C> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
