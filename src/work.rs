//! Background task queue with a completion channel.
//!
//! Work is submitted from the frame thread and results come back over an mpsc channel that the
//! owner drains at a point of its choosing, so completion order never races simulation state.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crate::foundation::error::{CodefallError, CodefallResult};

/// Where submitted tasks execute.
pub enum Execution {
    /// Run at submission on the calling thread; results still wait for the next drain.
    Inline,
    /// Run on a dedicated rayon pool.
    Pool(rayon::ThreadPool),
}

/// FIFO of background tasks producing `T`.
pub struct TaskQueue<T> {
    exec: Execution,
    tx: Sender<T>,
    rx: Receiver<T>,
    pending: usize,
}

impl<T: Send + 'static> TaskQueue<T> {
    /// Queue executing on the calling thread.
    pub fn inline() -> Self {
        Self::with_execution(Execution::Inline)
    }

    /// Queue backed by a pool of `threads` workers.
    pub fn pooled(threads: usize) -> CodefallResult<Self> {
        Ok(Self::with_execution(Execution::Pool(build_thread_pool(
            threads,
        )?)))
    }

    /// Inline when `threads == 0`, pooled otherwise.
    pub fn for_threads(threads: usize) -> CodefallResult<Self> {
        if threads == 0 {
            Ok(Self::inline())
        } else {
            Self::pooled(threads)
        }
    }

    fn with_execution(exec: Execution) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            exec,
            tx,
            rx,
            pending: 0,
        }
    }

    /// Whether tasks run on the submitting thread.
    pub fn is_inline(&self) -> bool {
        matches!(self.exec, Execution::Inline)
    }

    /// Queue `task`; its output is delivered by a later [`TaskQueue::drain`].
    pub fn submit<F>(&mut self, task: F)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        self.pending += 1;
        let tx = self.tx.clone();
        match &self.exec {
            Execution::Inline => {
                let _ = tx.send(task());
            }
            Execution::Pool(pool) => pool.spawn(move || {
                // The queue may be gone by the time the task finishes.
                let _ = tx.send(task());
            }),
        }
    }

    /// Take every completed result, in completion order, without blocking.
    pub fn drain(&mut self) -> Vec<T> {
        let out: Vec<T> = self.rx.try_iter().collect();
        self.pending = self.pending.saturating_sub(out.len());
        out
    }

    /// Submitted tasks whose results have not been drained yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Block until every pending result has arrived or `timeout` elapses; returns them.
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<T> {
        let deadline = Instant::now() + timeout;
        let mut out = Vec::new();
        while self.pending > 0 {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(left) {
                Ok(v) => {
                    self.pending -= 1;
                    out.push(v);
                }
                Err(_) => break,
            }
        }
        out
    }
}

fn build_thread_pool(threads: usize) -> CodefallResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(CodefallError::validation(
            "worker 'threads' must be >= 1 for a pooled queue",
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("codefall-worker-{i}"))
        .build()
        .map_err(|e| CodefallError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/work.rs"]
mod tests;
