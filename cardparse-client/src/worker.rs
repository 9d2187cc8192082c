//! Background runner for submissions started by a UI loop.
//!
//! The UI sends `Submission`s in and polls `Settlement`s out; the network
//! call never runs on the UI thread.

use tokio::sync::mpsc;
use tracing::debug;

use crate::controller::{Settlement, Submission};

pub async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<Submission>,
    tx: std::sync::mpsc::Sender<Settlement>,
) {
    let mut current: Option<tokio::task::JoinHandle<()>> = None;

    while let Some(submission) = rx.recv().await {
        // a newer submission supersedes whatever is still in flight
        if let Some(h) = current.take() {
            if !h.is_finished() {
                debug!("aborting superseded submission");
            }
            h.abort();
        }

        let tx2 = tx.clone();
        current = Some(tokio::spawn(async move {
            let settlement = submission.run().await;
            let _ = tx2.send(settlement);
        }));
    }
}
