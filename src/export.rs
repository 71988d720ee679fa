use crate::document::{layout_journal, render_pdf};
use crate::errors::ExportError;
use crate::journal::NoteMap;
use crate::models::DateEntry;
use crate::snapshot::export_region;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::info;

pub const JOURNAL_FILE_NAME: &str = "UL_Journey_Uday.pdf";
pub const IMAGE_FILE_NAME: &str = "UL_Journey_Completed.png";

/// Allows one export at a time.
#[derive(Clone, Default)]
pub struct ExportGuard {
    busy: Arc<AtomicBool>,
}

impl ExportGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self) -> Option<ExportPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    #[cfg(test)]
    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

pub struct ExportPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for ExportPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

pub async fn export_journal(dates: Vec<DateEntry>, notes: NoteMap) -> Result<Vec<u8>, ExportError> {
    let bytes = tokio::task::spawn_blocking(move || render_pdf(&layout_journal(&dates, &notes)))
        .await
        .map_err(|err| ExportError::Task(err.to_string()))??;
    info!(bytes = bytes.len(), "rendered journal pdf");
    Ok(bytes)
}

/// `None` when `region_id` names nothing that can be captured.
pub async fn export_image(region_id: String) -> Option<Result<Vec<u8>, ExportError>> {
    match tokio::task::spawn_blocking(move || export_region(&region_id)).await {
        Ok(result) => result,
        Err(err) => Some(Err(ExportError::Task(err.to_string()))),
    }
}
