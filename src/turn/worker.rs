//! Background turn worker
//!
//! Runs a `TurnProcessor` to completion on its own thread so the caller
//! (a UI loop, the async runtime) stays responsive. Completion comes back
//! over a oneshot channel together with the processor itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tokio::sync::oneshot;

use crate::core::error::{Result, StarfallError};
use crate::turn::processor::{TurnProcessor, TurnStep};

/// A processor handed back after its turn finished
#[derive(Debug)]
pub struct TurnOutcome<P> {
    pub processor: P,
    /// `step` calls made, including the one that reported `Complete`
    pub steps: u32,
}

/// Clears the running flag even if the processor panics
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct TurnWorker;

impl TurnWorker {
    /// Start processing on a new thread
    pub fn spawn<P>(mut processor: P) -> Result<TurnHandle<P>>
    where
        P: TurnProcessor + Send + 'static,
    {
        let started = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(false));
        let (done_tx, done_rx) = oneshot::channel();

        let thread_started = Arc::clone(&started);
        let thread_running = Arc::clone(&running);
        thread::Builder::new()
            .name("starfall-turn".into())
            .spawn(move || {
                thread_running.store(true, Ordering::Release);
                thread_started.store(true, Ordering::Release);
                let guard = RunningGuard(thread_running);
                tracing::info!("turn worker started");

                let mut steps = 0u32;
                let result = loop {
                    steps += 1;
                    match processor.step() {
                        Ok(TurnStep::Continue) => {}
                        Ok(TurnStep::Complete) => break Ok(()),
                        Err(err) => break Err(err),
                    }
                };

                drop(guard);
                match &result {
                    Ok(()) => tracing::info!(steps, "turn worker finished"),
                    Err(err) => tracing::warn!(steps, error = %err, "turn worker failed"),
                }
                // Nobody listening is fine
                let _ = done_tx.send(result.map(|()| TurnOutcome { processor, steps }));
            })?;

        Ok(TurnHandle {
            started,
            running,
            done: done_rx,
        })
    }
}

/// Caller's view of a running turn
pub struct TurnHandle<P> {
    started: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    done: oneshot::Receiver<Result<TurnOutcome<P>>>,
}

impl<P> TurnHandle<P> {
    /// True once the worker thread has begun processing
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// True while the worker thread is inside the processing loop
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Block the current thread until the turn completes
    ///
    /// Must not be called from inside an async runtime; use `finished`
    /// there.
    pub fn wait(self) -> Result<TurnOutcome<P>> {
        self.done
            .blocking_recv()
            .map_err(|_| StarfallError::WorkerLost)?
    }

    /// Await completion of the turn
    pub async fn finished(self) -> Result<TurnOutcome<P>> {
        self.done.await.map_err(|_| StarfallError::WorkerLost)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown(u32);

    impl TurnProcessor for Countdown {
        fn step(&mut self) -> Result<TurnStep> {
            self.0 -= 1;
            if self.0 == 0 {
                Ok(TurnStep::Complete)
            } else {
                Ok(TurnStep::Continue)
            }
        }
    }

    struct Failing;

    impl TurnProcessor for Failing {
        fn step(&mut self) -> Result<TurnStep> {
            Err(StarfallError::InvalidAction("out of fuel".into()))
        }
    }

    struct Panicking;

    impl TurnProcessor for Panicking {
        fn step(&mut self) -> Result<TurnStep> {
            panic!("processor blew up");
        }
    }

    #[test]
    fn test_wait_returns_processor() {
        let handle = TurnWorker::spawn(Countdown(5)).unwrap();
        let outcome = handle.wait().unwrap();
        assert_eq!(outcome.steps, 5);
        assert_eq!(outcome.processor.0, 0);
    }

    #[test]
    fn test_flags_after_completion() {
        let handle = TurnWorker::spawn(Countdown(1)).unwrap();
        let started = handle.started.clone();
        let running = handle.running.clone();
        handle.wait().unwrap();
        assert!(started.load(Ordering::Acquire));
        assert!(!running.load(Ordering::Acquire));
    }

    #[test]
    fn test_processor_error_propagates() {
        let handle = TurnWorker::spawn(Failing).unwrap();
        assert!(matches!(handle.wait(), Err(StarfallError::InvalidAction(_))));
    }

    #[test]
    fn test_panic_reports_worker_lost() {
        let handle = TurnWorker::spawn(Panicking).unwrap();
        assert!(matches!(handle.wait(), Err(StarfallError::WorkerLost)));
    }

    #[tokio::test]
    async fn test_finished_awaits() {
        let handle = TurnWorker::spawn(Countdown(3)).unwrap();
        let outcome = handle.finished().await.unwrap();
        assert_eq!(outcome.steps, 3);
    }
}
