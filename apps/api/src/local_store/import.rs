//! PDF resume import. Extraction only; the client saves the text as a resume.

use axum::{extract::Multipart, Json};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::CurrentUser;
use crate::errors::AppError;

const UNREADABLE_PDF: &str = "Could not read text from this PDF. Try pasting the resume instead.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedResume {
    pub name: String,
    pub content: String,
}

/// Extracts plain text from PDF bytes. CPU-bound, so it runs via
/// `spawn_blocking`; a panic inside the parser counts as an unreadable file.
pub async fn extract_pdf_text(data: Bytes) -> Result<String, AppError> {
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| {
            warn!("PDF extraction task failed: {e}");
            AppError::Validation(UNREADABLE_PDF.to_string())
        })?;

    let text = extracted.map_err(|e| {
        warn!("PDF extraction failed: {e}");
        AppError::Validation(UNREADABLE_PDF.to_string())
    })?;

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Validation(UNREADABLE_PDF.to_string()));
    }
    Ok(text)
}

/// "Jane Doe CV.pdf" → "Jane Doe CV".
fn resume_name(file_name: Option<&str>) -> String {
    file_name
        .map(|n| n.strip_suffix(".pdf").or_else(|| n.strip_suffix(".PDF")).unwrap_or(n))
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Imported resume")
        .to_string()
}

/// POST /api/v1/resumes/import (multipart, field `file`)
pub async fn handle_import_resume(
    current: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<ImportedResume>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = resume_name(field.file_name());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let content = extract_pdf_text(data).await?;
        info!(
            "Imported {} characters of resume text for {}",
            content.chars().count(),
            current.uid()
        );
        return Ok(Json(ImportedResume { name, content }));
    }

    Err(AppError::Validation("Missing 'file' field".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_bytes_are_a_validation_error() {
        let result = extract_pdf_text(Bytes::from_static(b"definitely not a pdf")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_resume_name_strips_extension() {
        assert_eq!(resume_name(Some("Jane Doe CV.pdf")), "Jane Doe CV");
        assert_eq!(resume_name(Some("RESUME.PDF")), "RESUME");
        assert_eq!(resume_name(Some(".pdf")), "Imported resume");
        assert_eq!(resume_name(None), "Imported resume");
    }
}
