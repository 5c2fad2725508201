//! Resume PDF → plain text.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::errors::AppError;

const PDF_SIGNATURE: &[u8] = b"%PDF-";
/// Readers accept the signature anywhere in the first kilobyte.
const SIGNATURE_WINDOW: usize = 1024;

/// True when `bytes` carries a PDF header signature.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(SIGNATURE_WINDOW)];
    window
        .windows(PDF_SIGNATURE.len())
        .any(|w| w == PDF_SIGNATURE)
}

/// Extracts the text of every page, concatenated in page order.
///
/// Parsing runs on the blocking pool; a parser panic is reported as an
/// unreadable document rather than taking the worker down.
pub async fn extract_pdf_text(bytes: Bytes) -> Result<String, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("resume file is empty".to_string()));
    }
    if !looks_like_pdf(&bytes) {
        return Err(AppError::Validation("resume must be a PDF document".to_string()));
    }

    let size = bytes.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| {
            warn!("PDF extraction worker failed: {e}");
            AppError::UnprocessableEntity("resume PDF could not be read".to_string())
        })?
        .map_err(|e| {
            warn!("PDF extraction failed: {e}");
            AppError::UnprocessableEntity(format!("resume PDF could not be read: {e}"))
        })?;

    debug!("Extracted {} chars from {} byte PDF", text.len(), size);
    Ok(text)
}
