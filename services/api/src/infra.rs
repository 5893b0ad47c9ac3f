use guardian_intake::error::AppError;
use guardian_intake::workflows::jotform::{FieldMapping, FileAttachment};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the reviewed mapping and flag semantic fields the form will never receive.
pub(crate) fn load_field_mapping(path: &Path) -> Result<FieldMapping, AppError> {
    let mapping = FieldMapping::from_path(path)?;
    let missing = mapping.missing();

    info!(
        path = %path.display(),
        mapped = mapping.len(),
        "field mapping loaded"
    );
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|field| field.key()).collect();
        warn!(unmapped = ?names, "answers for these fields will be dropped");
    }

    Ok(mapping)
}

/// Read a local file as an attachment, guessing its content type from the extension.
pub(crate) fn read_attachment(path: &Path) -> Result<FileAttachment, AppError> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_default();

    Ok(FileAttachment::new(name, mime_type, bytes))
}
