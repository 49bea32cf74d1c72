#![cfg(feature = "std")]

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Stop signal plus join handle of a spawned task.
#[derive(Debug)]
pub struct TaskControl(oneshot::Sender<()>, JoinHandle<()>);

impl TaskControl {
    pub fn new(stop: oneshot::Sender<()>, handle: JoinHandle<()>) -> TaskControl {
        TaskControl(stop, handle)
    }

    /// Spawn `task`, handing it the receiving end of the stop signal.
    pub fn spawn<F, Fut>(task: F) -> TaskControl
    where
        F: FnOnce(oneshot::Receiver<()>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let (stop_tx, stop_rx) = oneshot::channel();
        TaskControl::new(stop_tx, tokio::spawn(task(stop_rx)))
    }

    /// Ask the task to stop and wait for it to finish.
    pub async fn stop(self) {
        if !self.1.is_finished() && self.0.send(()).is_ok() {
            let _ = self.1.await;
        }
    }
}
