//! Background scoreboard poll
//!
//! The poll runs as its own task while a round is being played. The delay
//! is measured from the end of one tick to the start of the next, so two
//! ticks never overlap however slow the server is.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use web_time::Duration;

/// Whether the poll should keep running after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Wait for the next tick
    Continue,
    /// The game left the playing screen
    Stop,
}

/// Handle to a running poll task
///
/// Dropping the handle stops the task.
#[derive(Debug)]
pub(crate) struct Poller {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Spawns a task calling `tick` every `interval`
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn<F, Fut>(interval: Duration, tick: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Step> + Send + 'static,
    {
        let token = CancellationToken::new();
        let handle = tokio::spawn(run(token.clone(), interval, tick));
        debug!(?interval, "poller started");
        Self { token, handle }
    }

    /// Whether the task is still polling
    pub(crate) fn is_running(&self) -> bool {
        !self.token.is_cancelled() && !self.handle.is_finished()
    }

    /// Asks the task to stop; a tick in progress is allowed to finish
    pub(crate) fn stop(&self) {
        self.token.cancel();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run<F, Fut>(token: CancellationToken, interval: Duration, tick: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = Step>,
{
    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }
        if tick().await == Step::Stop {
            break;
        }
    }
    debug!("poller stopped");
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    fn counting(limit: usize) -> (Arc<AtomicUsize>, impl Fn() -> std::future::Ready<Step>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let tick = move || {
            let seen = counter.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(if seen >= limit {
                Step::Stop
            } else {
                Step::Continue
            })
        };
        (count, tick)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_at_interval() {
        let (count, tick) = counting(usize::MAX);
        let poller = Poller::spawn(Duration::from_millis(1500), tick);

        tokio::time::sleep(Duration::from_millis(1400)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(3200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(poller.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels() {
        let (count, tick) = counting(usize::MAX);
        let poller = Poller::spawn(Duration::from_millis(100), tick);
        tokio::time::sleep(Duration::from_millis(250)).await;
        poller.stop();
        assert!(!poller.is_running());

        let seen = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_itself() {
        let (count, tick) = counting(2);
        let poller = Poller::spawn(Duration::from_millis(100), tick);
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!poller.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops() {
        let (count, tick) = counting(usize::MAX);
        drop(Poller::spawn(Duration::from_millis(100), tick));
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
