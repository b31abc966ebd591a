//! Background worker: one thread, one current-thread runtime, one connection.

use std::sync::mpsc as std_mpsc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::Connection;
use crate::error::{BridgeError, Result};

/// Work item executed on the worker against the owned connection.
type Job<C> = Box<dyn for<'a> FnOnce(&'a mut C) -> BoxFuture<'a, ()> + Send>;

/// Receiving half of a submitted operation's result.
pub(super) struct Pending<T> {
    reply: std_mpsc::Receiver<Result<T>>,
}

/// Why waiting on a [`Pending`] result ended without a value.
pub(super) enum WaitError {
    TimedOut,
    WorkerGone,
}

impl<T> Pending<T> {
    /// Block the calling thread until the result arrives or `timeout` elapses.
    pub(super) fn wait(self, timeout: Duration) -> std::result::Result<Result<T>, WaitError> {
        match self.reply.recv_timeout(timeout) {
            Ok(result) => Ok(result),
            Err(std_mpsc::RecvTimeoutError::Timeout) => Err(WaitError::TimedOut),
            Err(std_mpsc::RecvTimeoutError::Disconnected) => Err(WaitError::WorkerGone),
        }
    }
}

fn make_job<C, F>(f: F) -> Job<C>
where
    F: for<'a> FnOnce(&'a mut C) -> BoxFuture<'a, ()> + Send + 'static,
{
    Box::new(f)
}

/// Handle to a running worker thread.
pub(super) struct Worker<C: Connection> {
    jobs: mpsc::UnboundedSender<Job<C>>,
    cancel: CancellationToken,
}

impl<C: Connection> Worker<C> {
    /// Build the runtime, move `connection` onto a fresh thread and start
    /// servicing jobs.
    pub(super) fn spawn(connection: C, name: &str) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| BridgeError::Connection(format!("failed to build bridge runtime: {e}")))?;

        let (jobs_tx, jobs_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();
        let thread_name = format!("{name}-worker");

        // Detached: joining could block forever on a wedged connection.
        std::thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                runtime.block_on(run(connection, jobs_rx, worker_cancel));
                tracing::debug!(worker = %thread_name, "bridge worker exited");
            })
            .map_err(|e| BridgeError::Connection(format!("failed to spawn bridge worker: {e}")))?;

        Ok(Self {
            jobs: jobs_tx,
            cancel,
        })
    }

    /// Sender for callers that submit without holding the bridge's lock.
    pub(super) fn submitter(&self) -> Submitter<C> {
        Submitter {
            jobs: self.jobs.clone(),
        }
    }

    pub(super) fn submit<T, F>(&self, op: F) -> Result<Pending<T>>
    where
        T: Send + 'static,
        F: for<'a> FnOnce(&'a mut C) -> BoxFuture<'a, Result<T>> + Send + 'static,
    {
        submit_to(&self.jobs, op)
    }

    /// Halt immediately, dropping queued work and any in-flight operation.
    pub(super) fn abort(self) {
        self.cancel.cancel();
        self.close();
    }

    /// Stop accepting work; the thread exits once queued jobs finish.
    pub(super) fn close(self) {
        drop(self.jobs);
    }
}

/// Cloneable job sender handed to concurrent callers.
pub(super) struct Submitter<C: Connection> {
    jobs: mpsc::UnboundedSender<Job<C>>,
}

impl<C: Connection> Submitter<C> {
    pub(super) fn submit<T, F>(&self, op: F) -> Result<Pending<T>>
    where
        T: Send + 'static,
        F: for<'a> FnOnce(&'a mut C) -> BoxFuture<'a, Result<T>> + Send + 'static,
    {
        submit_to(&self.jobs, op)
    }
}

fn submit_to<C, T, F>(jobs: &mpsc::UnboundedSender<Job<C>>, op: F) -> Result<Pending<T>>
where
    C: Connection,
    T: Send + 'static,
    F: for<'a> FnOnce(&'a mut C) -> BoxFuture<'a, Result<T>> + Send + 'static,
{
    let (reply_tx, reply_rx) = std_mpsc::sync_channel(1);
    let job = make_job::<C, _>(move |connection| {
        async move {
            let result = op(connection).await;
            // The caller may have timed out and gone away.
            let _ = reply_tx.send(result);
        }
        .boxed()
    });

    jobs.send(job).map_err(|_| BridgeError::WorkerStopped)?;
    Ok(Pending { reply: reply_rx })
}

/// Worker loop. Jobs run one at a time, so the connection never sees two
/// requests in flight.
async fn run<C: Connection>(
    mut connection: C,
    mut jobs: mpsc::UnboundedReceiver<Job<C>>,
    cancel: CancellationToken,
) {
    loop {
        let job = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            job = jobs.recv() => job,
        };
        let Some(job) = job else { break };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = job(&mut connection) => {}
        }
    }
}
