use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::engine::scoring::Weights;
use crate::notify::NotificationEvent;
use crate::observability::metrics::Metrics;
use crate::store::memory::MemoryStore;

pub struct AppState {
    pub store: MemoryStore,
    pub weights: Weights,
    pub job_tx: mpsc::Sender<Uuid>,
    pub notifications_tx: broadcast::Sender<NotificationEvent>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(job_queue_size: usize, event_buffer_size: usize) -> (Self, mpsc::Receiver<Uuid>) {
        let (job_tx, job_rx) = mpsc::channel(job_queue_size);
        let (notifications_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        (
            Self {
                store: MemoryStore::new(),
                weights: Weights::default(),
                job_tx,
                notifications_tx,
                metrics: Metrics::new(),
            },
            job_rx,
        )
    }
}
