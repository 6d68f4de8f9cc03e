//! Per-upload progress channels.
//!
//! The batch processor publishes through a [`ProgressReporter`]; the SSE
//! handler subscribes by upload id. Publishing is best effort and never
//! fails the upload.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::time::interval;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{ProgressEvent, ProgressStatus};

/// Buffered events per upload before slow subscribers start lagging.
const CHANNEL_CAPACITY: usize = 64;

/// Channels untouched for this long are dropped by [`ProgressHub::prune`].
pub const STALE_CHANNEL_AGE: Duration = Duration::from_secs(60 * 60);

/// How long a finished upload's final event stays available to late subscribers.
pub const FINISHED_CHANNEL_AGE: Duration = Duration::from_secs(5 * 60);

struct Channel {
    /// `None` once a terminal event was published; receivers then see `Closed`.
    sender: Option<broadcast::Sender<ProgressEvent>>,
    last: Option<ProgressEvent>,
    touched: Instant,
}

impl Channel {
    fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender: Some(sender),
            last: None,
            touched: Instant::now(),
        }
    }

    fn is_finished(&self) -> bool {
        self.sender.is_none()
    }

    fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        match &self.sender {
            Some(sender) => sender.subscribe(),
            None => {
                let (sender, receiver) = broadcast::channel(1);
                drop(sender);
                receiver
            }
        }
    }
}

/// Registry of progress channels keyed by upload id.
#[derive(Clone, Default)]
pub struct ProgressHub {
    channels: Arc<Mutex<HashMap<Uuid, Channel>>>,
}

impl ProgressHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Channel>> {
        self.channels.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Subscribe to an upload's events.
    ///
    /// The channel is created if the upload has not started yet. Returns the
    /// most recent event (if any) so late subscribers can catch up. For a
    /// finished upload that is the final event and the receiver is already
    /// closed.
    pub fn subscribe(
        &self,
        upload_id: Uuid,
    ) -> (Option<ProgressEvent>, broadcast::Receiver<ProgressEvent>) {
        let mut channels = self.lock();
        let channel = channels.entry(upload_id).or_insert_with(Channel::new);
        channel.touched = Instant::now();
        (channel.last.clone(), channel.subscribe())
    }

    /// Publish an event. Returns the number of subscribers reached.
    ///
    /// A terminal event closes the channel after delivery but keeps the event
    /// for late subscribers until [`FINISHED_CHANNEL_AGE`] passes.
    pub fn publish(&self, event: ProgressEvent) -> usize {
        let mut channels = self.lock();
        let terminal = event.status.is_terminal();

        let channel = channels.entry(event.upload_id).or_insert_with(Channel::new);
        if channel.is_finished() {
            // Upload id reused for a new run
            *channel = Channel::new();
        }
        channel.touched = Instant::now();
        channel.last = Some(event.clone());

        let delivered = channel
            .sender
            .as_ref()
            .and_then(|sender| sender.send(event).ok())
            .unwrap_or(0);

        if terminal {
            channel.sender = None;
        }

        delivered
    }

    /// Reporter bound to one upload.
    pub fn reporter(&self, upload_id: Uuid) -> ProgressReporter {
        ProgressReporter {
            hub: self.clone(),
            upload_id,
        }
    }

    /// Drop channels untouched for longer than `max_age`, and finished ones
    /// older than [`FINISHED_CHANNEL_AGE`]. Returns how many.
    pub fn prune(&self, max_age: Duration) -> usize {
        let finished_age = max_age.min(FINISHED_CHANNEL_AGE);
        let mut channels = self.lock();
        let before = channels.len();
        channels.retain(|_, channel| {
            let limit = if channel.is_finished() {
                finished_age
            } else {
                max_age
            };
            channel.touched.elapsed() < limit
        });
        before - channels.len()
    }

    /// Number of uploads still in progress.
    pub fn active_uploads(&self) -> usize {
        self.lock().values().filter(|c| !c.is_finished()).count()
    }
}

/// Counters after a finished batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchTick {
    pub current_batch: usize,
    pub total_batches: usize,
    pub processed_rows: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_rows: usize,
    /// Wall-clock time of the batch just finished
    pub batch_duration: Duration,
}

impl BatchTick {
    /// Previous batch duration times the batches still to run.
    pub fn estimated_remaining(&self) -> Duration {
        let remaining = self.total_batches.saturating_sub(self.current_batch) as u32;
        self.batch_duration * remaining
    }
}

/// Publishes the lifecycle events of one upload.
#[derive(Clone)]
pub struct ProgressReporter {
    hub: ProgressHub,
    upload_id: Uuid,
}

impl ProgressReporter {
    pub fn started(&self, total_rows: usize, total_batches: usize) {
        self.hub.publish(
            ProgressEvent::new(self.upload_id, ProgressStatus::Started, total_rows, total_batches)
                .with_message(format!("Processing {} rows", total_rows)),
        );
    }

    pub fn batch_completed(&self, tick: &BatchTick) {
        let mut event = ProgressEvent::new(
            self.upload_id,
            ProgressStatus::Processing,
            tick.total_rows,
            tick.total_batches,
        )
        .with_counts(tick.processed_rows, tick.successful, tick.failed);
        event.current_batch = tick.current_batch;
        event.estimated_time_remaining_ms = Some(tick.estimated_remaining().as_millis() as u64);

        let delivered = self.hub.publish(event);
        debug!(
            upload_id = %self.upload_id,
            batch = tick.current_batch,
            total_batches = tick.total_batches,
            subscribers = delivered,
            "Batch progress published"
        );
    }

    pub fn completed(
        &self,
        total_rows: usize,
        total_batches: usize,
        successful: usize,
        failed: usize,
    ) {
        let mut event = ProgressEvent::new(
            self.upload_id,
            ProgressStatus::Completed,
            total_rows,
            total_batches,
        )
        .with_counts(successful + failed, successful, failed)
        .with_message("Upload processed");
        event.current_batch = total_batches;
        event.estimated_time_remaining_ms = Some(0);
        self.hub.publish(event);
    }

    pub fn failed(&self, message: impl Into<String>) {
        self.hub.publish(
            ProgressEvent::new(self.upload_id, ProgressStatus::Error, 0, 0).with_message(message),
        );
    }
}

/// Periodically drop abandoned progress channels.
pub fn start_progress_pruning(hub: ProgressHub, every: Duration) {
    tokio::spawn(async move {
        info!(
            "Starting progress channel pruning (interval: {} seconds)",
            every.as_secs()
        );

        let mut ticker = interval(every);
        loop {
            ticker.tick().await;
            let removed = hub.prune(STALE_CHANNEL_AGE);
            if removed > 0 {
                info!(
                    "Pruned {} stale progress channels ({} uploads in progress)",
                    removed,
                    hub.active_uploads()
                );
            }
        }
    });
}
