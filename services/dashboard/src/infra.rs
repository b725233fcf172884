use expedientes::cases::{CaseImporter, CaseTable};
use expedientes::config::DatasetConfig;
use expedientes::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) dataset: Arc<DatasetConfig>,
}

/// Reads the export from disk on every call; there is no cached table.
pub(crate) fn load_table(dataset: &DatasetConfig) -> Result<CaseTable, AppError> {
    let table = CaseImporter::from_path(&dataset.path, &dataset.sheet)?;
    info!(
        path = %dataset.path.display(),
        sheet = %dataset.sheet,
        records = table.len(),
        "expediente export loaded"
    );
    Ok(table)
}

/// [`load_table`] on tokio's blocking pool.
pub(crate) async fn load_table_off_runtime(
    dataset: Arc<DatasetConfig>,
) -> Result<CaseTable, AppError> {
    tokio::task::spawn_blocking(move || load_table(&dataset))
        .await
        .map_err(|err| AppError::Io(std::io::Error::other(err)))?
}
