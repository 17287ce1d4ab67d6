//! Axum route handlers for the ranking API. Multipart intake lives here; the
//! pipeline itself is in `orchestrator`.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::ranking::extract::{extract, ResumeDocument};
use crate::ranking::orchestrator::{rank, RankRequest, RankedBatch};
use crate::ranking::prompts::{RESUME_ENHANCE_PROMPT_TEMPLATE, RESUME_ENHANCE_SYSTEM};
use crate::ranking::weights::CRITERIA;
use crate::state::AppState;

/// Multipart field name carrying resume files in a ranking request.
const BATCH_FILE_FIELD: &str = "resumes";
/// Multipart field name carrying the single file in extract/enhance requests.
const SINGLE_FILE_FIELD: &str = "resume";
/// Weight fields arrive as `weight_<criterion>`, e.g. `weight_skills`.
const WEIGHT_FIELD_PREFIX: &str = "weight_";

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub filename: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnhanceResponse {
    pub filename: String,
    pub enhanced_text: String,
}

/// POST /api/v1/rank
///
/// Multipart form: `job_description`, `tech_skills`, `soft_skills`, `top_n`,
/// `weight_<criterion>` and repeated `resumes` file fields. Returns the
/// ranked batch; individual bad files are skipped, not fatal.
pub async fn handle_rank(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RankedBatch>, AppError> {
    let request = read_rank_request(&mut multipart, state.config.max_upload_bytes()).await?;
    let batch = rank(
        state.oracle.clone(),
        state.config.scoring_concurrency,
        request,
    )
    .await?;
    Ok(Json(batch))
}

/// POST /api/v1/resumes/extract
///
/// Single-file text/email extraction. Unlike the batch endpoint there is
/// nothing else to return, so a bad file is a request-level error here.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let (document, _) = read_single_upload(&mut multipart, state.config.max_upload_bytes()).await?;

    if !document.is_supported() {
        return Err(AppError::Validation(format!(
            "unsupported file type '{}': only PDF and DOCX are accepted",
            document.extension
        )));
    }

    let extracted =
        extract(&document).map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    Ok(Json(ExtractResponse {
        filename: extracted.filename,
        text: extracted.text,
        email: extracted.email,
    }))
}

/// POST /api/v1/resumes/enhance
///
/// Extracts the resume text and asks the LLM for a truthful rewrite,
/// optionally targeted at a `job_description` form field.
pub async fn handle_enhance(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EnhanceResponse>, AppError> {
    let (document, jd_text) =
        read_single_upload(&mut multipart, state.config.max_upload_bytes()).await?;

    if !document.is_supported() {
        return Err(AppError::Validation(format!(
            "unsupported file type '{}': only PDF and DOCX are accepted",
            document.extension
        )));
    }

    let extracted =
        extract(&document).map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;
    if extracted.text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "no text could be extracted from the file".to_string(),
        ));
    }

    let prompt = RESUME_ENHANCE_PROMPT_TEMPLATE
        .replace("{resume_text}", &extracted.text)
        .replace("{jd_text}", jd_text.as_deref().unwrap_or(""));
    let enhanced_text = state
        .llm
        .call_text(&prompt, RESUME_ENHANCE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(Json(EnhanceResponse {
        filename: extracted.filename,
        enhanced_text,
    }))
}

/// Drains the multipart stream of a ranking request into a `RankRequest`.
/// Unknown fields are read and discarded so a chatty client cannot stall the
/// stream.
async fn read_rank_request(
    multipart: &mut Multipart,
    max_upload_bytes: usize,
) -> Result<RankRequest, AppError> {
    let mut jd_text = String::new();
    let mut tech_skills_csv = String::new();
    let mut soft_skills_csv = String::new();
    let mut raw_weights = HashMap::new();
    let mut top_n = None;
    let mut files = Vec::new();

    while let Some(field) = next_field(multipart).await? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "job_description" => jd_text = read_text(field).await?,
            "tech_skills" => tech_skills_csv = read_text(field).await?,
            "soft_skills" => soft_skills_csv = read_text(field).await?,
            "top_n" => top_n = Some(read_text(field).await?),
            BATCH_FILE_FIELD => files.push(read_file(field, max_upload_bytes).await?),
            name if name.starts_with(WEIGHT_FIELD_PREFIX) => {
                let criterion = name[WEIGHT_FIELD_PREFIX.len()..].to_string();
                let value = read_text(field).await?;
                // Unknown criteria would be ignored by normalization anyway;
                // dropping them here keeps the raw map bounded.
                if CRITERIA.contains(&criterion.as_str()) {
                    raw_weights.insert(criterion, value);
                }
            }
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    Ok(RankRequest {
        jd_text,
        tech_skills_csv,
        soft_skills_csv,
        raw_weights,
        top_n,
        files,
    })
}

/// Reads the single `resume` file plus an optional `job_description` field.
async fn read_single_upload(
    multipart: &mut Multipart,
    max_upload_bytes: usize,
) -> Result<(ResumeDocument, Option<String>), AppError> {
    let mut document = None;
    let mut jd_text = None;

    while let Some(field) = next_field(multipart).await? {
        match field.name().unwrap_or("") {
            SINGLE_FILE_FIELD => document = Some(read_file(field, max_upload_bytes).await?),
            "job_description" => jd_text = Some(read_text(field).await?),
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    let document = document.ok_or_else(|| {
        AppError::Validation(format!("missing '{SINGLE_FILE_FIELD}' file field"))
    })?;
    Ok((document, jd_text))
}

async fn next_field<'a>(
    multipart: &'a mut Multipart,
) -> Result<Option<axum::extract::multipart::Field<'a>>, AppError> {
    multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart request: {e}")))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("invalid form field: {e}")))
}

async fn read_file(
    field: axum::extract::multipart::Field<'_>,
    max_upload_bytes: usize,
) -> Result<ResumeDocument, AppError> {
    let filename = field.file_name().unwrap_or("unknown").to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("failed to read uploaded file: {e}")))?;

    if data.len() > max_upload_bytes {
        return Err(AppError::Validation(format!(
            "file '{filename}' exceeds the {}MB upload limit",
            max_upload_bytes / (1024 * 1024)
        )));
    }

    Ok(ResumeDocument::new(filename, data))
}
