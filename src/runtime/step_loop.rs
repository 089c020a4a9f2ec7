//! Scheduled step loop - the engine's autonomous generation ticker.

use std::io;
use std::ops::ControlFlow;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Sender, TryRecvError, select};
use log::{debug, error};

/// A ticking background task, cancelled by dropping its token.
///
/// Ticks fire on a fixed cadence. A tick that comes due while the previous
/// one is still running is dropped, not queued.
pub struct StepLoop {
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl StepLoop {
    /// Spawn the loop. `tick` runs once per cadence until it breaks or the
    /// loop is cancelled.
    pub fn spawn<F>(cadence: Duration, mut tick: F) -> io::Result<Self>
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let (cancel, cancelled) = crossbeam_channel::bounded::<()>(0);
        let ticker = crossbeam_channel::tick(cadence);

        let handle = thread::Builder::new()
            .name("life-step-loop".into())
            .spawn(move || {
                let started = Instant::now();
                let mut ticks: u32 = 0;

                loop {
                    select! {
                        recv(ticker) -> _ => {
                            if !matches!(cancelled.try_recv(), Err(TryRecvError::Empty)) {
                                break;
                            }
                            if tick().is_break() {
                                break;
                            }
                            ticks += 1;
                            debug!(
                                "average step cycle: {:?}",
                                started.elapsed() / ticks
                            );
                        }
                        recv(cancelled) -> _ => break,
                    }
                }
            })?;

        Ok(Self {
            cancel: Some(cancel),
            handle: Some(handle),
        })
    }

    /// Check if the loop thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Cancel the loop and wait for a tick in flight to finish.
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        drop(self.cancel.take());
        let Some(handle) = self.handle.take() else {
            return;
        };
        // Cancelled from inside a tick: the loop exits on its own.
        if handle.thread().id() == thread::current().id() {
            return;
        }
        if handle.join().is_err() {
            error!("step loop panicked");
        }
    }
}

impl Drop for StepLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_ticks_until_cancelled() {
        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);
        let step_loop = StepLoop::spawn(Duration::from_millis(2), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        })
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while count.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        step_loop.cancel();

        let after_cancel = count.load(Ordering::SeqCst);
        assert!(after_cancel >= 3);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    }

    #[test]
    fn test_break_ends_loop() {
        let step_loop =
            StepLoop::spawn(Duration::from_millis(1), || ControlFlow::Break(())).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while !step_loop.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(step_loop.is_finished());
    }

    #[test]
    fn test_cancel_does_not_wait_for_cadence() {
        let step_loop =
            StepLoop::spawn(Duration::from_secs(3600), || ControlFlow::Continue(())).unwrap();
        let start = Instant::now();
        step_loop.cancel();
        assert!(start.elapsed() < Duration::from_secs(60));
    }
}
