// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fire-and-forget work: analytics logs, outbound replies and admin alerts.
//!
//! Jobs go through a bounded mpsc queue drained by a single worker task.
//! Submitting never blocks the request path; a full or closed queue drops
//! the job with a warning. Job failures are logged, never propagated.

use std::sync::Arc;

use racedesk_core::types::DialogLogEntry;
use racedesk_core::{AnalyticsRepository, Notifier, OutboundSender};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// A unit of background work.
pub enum BackgroundJob {
    /// Persist the analytics shadow of an exchange.
    SaveLog(DialogLogEntry),
    /// Deliver a reply through a channel.
    SendOutbound {
        sender: Arc<dyn OutboundSender>,
        recipient: String,
        text: String,
    },
    /// Alert the operator.
    NotifyAdmin(String),
    /// Resolves once every job queued before it has been handled.
    Flush(oneshot::Sender<()>),
}

impl BackgroundJob {
    fn kind(&self) -> &'static str {
        match self {
            BackgroundJob::SaveLog(_) => "save_log",
            BackgroundJob::SendOutbound { .. } => "send_outbound",
            BackgroundJob::NotifyAdmin(_) => "notify_admin",
            BackgroundJob::Flush(_) => "flush",
        }
    }
}

/// Cloneable handle for submitting [`BackgroundJob`]s.
#[derive(Clone)]
pub struct BackgroundQueue {
    tx: mpsc::Sender<BackgroundJob>,
}

impl BackgroundQueue {
    /// Starts the worker. It runs until every queue handle is dropped.
    pub fn spawn(
        capacity: usize,
        analytics: Option<Arc<dyn AnalyticsRepository>>,
        notifier: Arc<dyn Notifier>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = Worker {
            analytics,
            notifier,
        };
        let handle = tokio::spawn(worker.run(rx));
        (Self { tx }, handle)
    }

    pub fn submit(&self, job: BackgroundJob) {
        let kind = job.kind();
        match self.tx.try_send(job) {
            Ok(()) => debug!(job = kind, "background job queued"),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(job = kind, "background queue full, dropping job")
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(job = kind, "background worker stopped, dropping job")
            }
        }
    }

    pub fn save_log(&self, entry: DialogLogEntry) {
        self.submit(BackgroundJob::SaveLog(entry));
    }

    pub fn notify_admin(&self, message: impl Into<String>) {
        self.submit(BackgroundJob::NotifyAdmin(message.into()));
    }

    pub fn send_outbound(&self, sender: Arc<dyn OutboundSender>, recipient: &str, text: &str) {
        self.submit(BackgroundJob::SendOutbound {
            sender,
            recipient: recipient.to_string(),
            text: text.to_string(),
        });
    }

    /// Waits until everything submitted so far has been processed.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(BackgroundJob::Flush(done_tx)).await.is_ok() {
            let _ = done_rx.await;
        }
    }
}

struct Worker {
    analytics: Option<Arc<dyn AnalyticsRepository>>,
    notifier: Arc<dyn Notifier>,
}

impl Worker {
    async fn run(self, mut rx: mpsc::Receiver<BackgroundJob>) {
        while let Some(job) = rx.recv().await {
            self.handle(job).await;
        }
        debug!("background worker exiting");
    }

    async fn handle(&self, job: BackgroundJob) {
        match job {
            BackgroundJob::SaveLog(entry) => {
                let Some(analytics) = &self.analytics else {
                    debug!(client_id = %entry.client_id, "no analytics repository, log skipped");
                    return;
                };
                if let Err(e) = analytics.save_log(&entry).await {
                    error!(client_id = %entry.client_id, error = %e, "failed to save dialog log");
                }
            }
            BackgroundJob::SendOutbound {
                sender,
                recipient,
                text,
            } => {
                if let Err(e) = sender.send_text(&recipient, &text).await {
                    error!(
                        channel = sender.channel(),
                        recipient = %recipient,
                        error = %e,
                        "failed to deliver reply"
                    );
                }
            }
            BackgroundJob::NotifyAdmin(message) => {
                if let Err(e) = self.notifier.notify_admin(&message).await {
                    warn!(error = %e, "failed to notify admin");
                }
            }
            BackgroundJob::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use racedesk_test_utils::{MemoryStore, RecordingNotifier, RecordingSender};
    use tracing_test::traced_test;

    #[tokio::test]
    async fn logs_reach_the_repository() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let (queue, _worker) = BackgroundQueue::spawn(8, Some(store.clone()), notifier);

        queue.save_log(DialogLogEntry::for_exchange("TG-1", "hello"));
        queue.flush().await;

        let logs = store.logs().await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].lead_source, "telegram");
    }

    #[tokio::test]
    async fn failing_jobs_do_not_stop_the_worker() {
        let store = Arc::new(MemoryStore::new());
        store.fail_writes(true);
        let notifier = Arc::new(RecordingNotifier::new());
        let (queue, _worker) = BackgroundQueue::spawn(8, Some(store.clone()), notifier.clone());

        queue.save_log(DialogLogEntry::for_exchange("WA-1", "hi"));
        queue.send_outbound(Arc::new(RecordingSender::failing()), "WA-1", "reply");
        queue.notify_admin("still alive");
        queue.flush().await;

        assert_eq!(notifier.messages().await, vec!["still alive".to_string()]);
    }

    #[tokio::test]
    async fn outbound_replies_are_delivered() {
        let sender = Arc::new(RecordingSender::new());
        let (queue, _worker) =
            BackgroundQueue::spawn(8, None, Arc::new(RecordingNotifier::new()));

        queue.send_outbound(sender.clone(), "WA-7", "see you at 19:00");
        queue.save_log(DialogLogEntry::for_exchange("WA-7", "x"));
        queue.flush().await;

        assert_eq!(
            sender.sent().await,
            vec![("WA-7".to_string(), "see you at 19:00".to_string())]
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn stopped_worker_drops_jobs_with_warning() {
        let (queue, worker) = BackgroundQueue::spawn(4, None, Arc::new(RecordingNotifier::new()));
        worker.abort();
        let _ = worker.await;

        queue.notify_admin("lost");
        assert!(logs_contain("background worker stopped, dropping job"));
    }

    #[tokio::test]
    async fn worker_exits_when_queue_dropped() {
        let (queue, worker) = BackgroundQueue::spawn(1, None, Arc::new(RecordingNotifier::new()));
        drop(queue);
        worker.await.unwrap();
    }
}
