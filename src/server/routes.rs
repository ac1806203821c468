use crate::defaults;
use crate::error::LectometroError;
use crate::evaluation::{EvaluationRequest, EvaluationResult};
use crate::server::AppState;
use crate::server::error::ApiError;
use axum::{
    Json,
    extract::{Multipart, State},
};
use std::sync::Arc;

/// Multipart field names accepted by `POST /evaluate`.
pub const FIELD_SUBJECT: &str = "id_sujeto";
pub const FIELD_TASK: &str = "tipo";
pub const FIELD_FORM: &str = "forma";
pub const FIELD_AUDIO: &str = "archivo";

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": defaults::SERVICE_NAME,
        "version": crate::version_string(),
    }))
}

pub async fn evaluate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EvaluationResult>, ApiError> {
    let mut subject_id = String::new();
    let mut task = String::new();
    let mut form = String::new();
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FIELD_SUBJECT => subject_id = field.text().await?,
            FIELD_TASK => task = field.text().await?,
            FIELD_FORM => form = field.text().await?,
            FIELD_AUDIO => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                upload = Some((filename, bytes.to_vec()));
            }
            other => tracing::debug!(field = %other, "Ignoring unknown multipart field"),
        }
    }

    let (filename, audio) = upload.ok_or(LectometroError::MissingAudio)?;
    let request = EvaluationRequest::parse(&subject_id, &task, &form, &filename, audio)?;

    let evaluator = Arc::clone(&state.evaluator);
    let result = tokio::task::spawn_blocking(move || evaluator.evaluate(&request))
        .await
        .map_err(|e| ApiError::Internal(format!("Evaluation task failed: {}", e)))??;

    Ok(Json(result))
}
