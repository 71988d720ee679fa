use crate::clock::Clock;
use crate::export::ExportGuard;
use crate::journal::Journal;
use crate::reminder::{Outbox, Reminder};
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub journal: Arc<Mutex<Journal>>,
    pub reminder: Arc<Mutex<Reminder>>,
    pub store: Arc<dyn KeyValueStore>,
    pub clock: Arc<dyn Clock>,
    pub outbox: Arc<Outbox>,
    pub exports: ExportGuard,
}

impl AppState {
    pub fn new(
        journal: Journal,
        reminder: Reminder,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            journal: Arc::new(Mutex::new(journal)),
            reminder: Arc::new(Mutex::new(reminder)),
            store,
            outbox: Arc::new(Outbox::new(Arc::clone(&clock))),
            clock,
            exports: ExportGuard::new(),
        }
    }

    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        reminder_hour: u32,
    ) -> Self {
        let journal = Journal::load(crate::dates::journey_dates(), store.as_ref()).await;
        let reminder = Reminder::load(store.as_ref(), reminder_hour).await;
        Self::new(journal, reminder, store, clock)
    }
}
