//! Batch Ranking Orchestrator — runs extract → score for every uploaded
//! resume, tolerating per-file failures, then sorts and truncates the batch.
//!
//! The per-file pipelines share no mutable state, so they fan out on a
//! `JoinSet` bounded by a semaphore (each scoring call is an outbound network
//! request). Results are re-assembled in input order before the stable sort,
//! so ties always keep submission order regardless of completion order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ranking::extract::{extract, ResumeDocument};
use crate::ranking::oracle::{ScoreBreakdown, ScoringContext, ScoringOracle};
use crate::ranking::skills::normalize_skill_csv;
use crate::ranking::weights::ScoringWeights;

/// Everything the client submitted for one ranking request, still raw.
#[derive(Debug)]
pub struct RankRequest {
    pub jd_text: String,
    pub tech_skills_csv: String,
    pub soft_skills_csv: String,
    pub raw_weights: HashMap<String, String>,
    /// Raw form value; only a positive integer triggers truncation.
    pub top_n: Option<String>,
    pub files: Vec<ResumeDocument>,
}

/// Score for one resume. Breakdown fields are flattened into the record so
/// the response carries per-criterion sub-scores at the top level.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRecord {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub scores: ScoreBreakdown,
}

/// Ranked output plus the normalized skill lists that were actually applied.
#[derive(Debug, Serialize)]
pub struct RankedBatch {
    pub results: Vec<ScoreRecord>,
    pub tech_skills: Vec<String>,
    pub soft_skills: Vec<String>,
}

pub async fn rank(
    oracle: Arc<dyn ScoringOracle>,
    concurrency: usize,
    request: RankRequest,
) -> Result<RankedBatch, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation(
            "job description must not be empty".to_string(),
        ));
    }
    if request.files.is_empty() {
        return Err(AppError::Validation(
            "at least one resume file is required".to_string(),
        ));
    }

    // Normalized once per batch, shared read-only across the per-file tasks.
    let context = Arc::new(ScoringContext {
        jd_text: request.jd_text,
        tech_skills: normalize_skill_csv(&request.tech_skills_csv),
        soft_skills: normalize_skill_csv(&request.soft_skills_csv),
        weights: ScoringWeights::normalize(&request.raw_weights),
    });
    let top_n = parse_top_n(request.top_n.as_deref());
    let total = request.files.len();
    let batch_id = Uuid::new_v4();

    info!(%batch_id, files = total, "ranking resume batch");

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();
    for (index, document) in request.files.into_iter().enumerate() {
        let oracle = oracle.clone();
        let context = context.clone();
        let semaphore = semaphore.clone();
        tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return (index, None), // semaphore closed: request torn down
            };
            (index, score_one(oracle.as_ref(), &context, &document).await)
        });
    }

    // Slots keyed by input index so completion order cannot reorder ties.
    let mut slots: Vec<Option<ScoreRecord>> = (0..total).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, record)) => slots[index] = record,
            Err(e) => {
                return Err(AppError::Internal(anyhow!("scoring task panicked: {e}")));
            }
        }
    }

    let mut records: Vec<ScoreRecord> = slots.into_iter().flatten().collect();
    let skipped = total - records.len();

    if records.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "no resumes could be scored".to_string(),
        ));
    }

    // Stable sort: equal final scores keep submission order.
    records.sort_by(|a, b| {
        b.scores
            .final_score
            .partial_cmp(&a.scores.final_score)
            .unwrap_or(Ordering::Equal)
    });
    if let Some(n) = top_n {
        records.truncate(n);
    }

    info!(
        %batch_id,
        scored = total - skipped,
        skipped,
        returned = records.len(),
        "resume batch ranked"
    );

    Ok(RankedBatch {
        results: records,
        tech_skills: context.tech_skills.clone(),
        soft_skills: context.soft_skills.clone(),
    })
}

/// One file's pipeline. Every failure mode here is a skip, never an abort:
/// the batch only fails when zero files survive.
async fn score_one(
    oracle: &dyn ScoringOracle,
    context: &ScoringContext,
    document: &ResumeDocument,
) -> Option<ScoreRecord> {
    if !document.is_supported() {
        warn!(
            file = %document.filename,
            extension = %document.extension,
            "skipping file with unsupported extension"
        );
        return None;
    }

    let extracted = match extract(document) {
        Ok(extracted) => extracted,
        Err(e) => {
            warn!(file = %document.filename, error = %e, "extraction failed, skipping file");
            return None;
        }
    };

    match oracle.score(&extracted.text, context).await {
        Ok(scores) => Some(ScoreRecord {
            filename: extracted.filename,
            email: extracted.email,
            scores,
        }),
        Err(e) => {
            warn!(file = %document.filename, error = %e, "scoring failed, skipping file");
            None
        }
    }
}

fn parse_top_n(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::oracle::OracleError;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    /// Oracle that reads the score out of the resume text itself: the last
    /// whitespace-separated token must parse as f64. Text containing
    /// "unscorable" simulates a malformed oracle response.
    struct ScriptedOracle {
        calls: AtomicUsize,
    }

    impl ScriptedOracle {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(AtomicOrdering::SeqCst)
        }
    }

    #[async_trait]
    impl ScoringOracle for ScriptedOracle {
        async fn score(
            &self,
            resume_text: &str,
            _context: &ScoringContext,
        ) -> Result<ScoreBreakdown, OracleError> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            if resume_text.contains("unscorable") {
                return Err(OracleError::Malformed("not json".to_string()));
            }
            let final_score = resume_text
                .split_whitespace()
                .last()
                .and_then(|token| token.parse::<f64>().ok())
                .unwrap_or(0.0);
            Ok(ScoreBreakdown {
                final_score,
                ..Default::default()
            })
        }
    }

    fn docx_file(name: &str, text: &str) -> ResumeDocument {
        let docx = docx_rs::Docx::new().add_paragraph(
            docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text(text)),
        );
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        ResumeDocument::new(name.to_string(), Bytes::from(cursor.into_inner()))
    }

    fn corrupt_pdf(name: &str) -> ResumeDocument {
        ResumeDocument::new(name.to_string(), Bytes::from_static(b"not a pdf at all"))
    }

    fn request(files: Vec<ResumeDocument>) -> RankRequest {
        RankRequest {
            jd_text: "Senior backend engineer, Go, Kubernetes".to_string(),
            tech_skills_csv: "Go,Kubernetes,SQL".to_string(),
            soft_skills_csv: "communication".to_string(),
            raw_weights: HashMap::new(),
            top_n: None,
            files,
        }
    }

    #[tokio::test]
    async fn test_example_scenario_sorts_truncates_and_skips() {
        // File A scores 88, B scores 95, C's extraction fails; top_n = 2.
        let oracle = ScriptedOracle::new();
        let mut req = request(vec![
            docx_file("a.docx", "candidate a scores 88"),
            docx_file("b.docx", "candidate b scores 95"),
            corrupt_pdf("c.pdf"),
        ]);
        req.top_n = Some("2".to_string());

        let batch = rank(oracle.clone(), 4, req).await.unwrap();

        assert_eq!(batch.results.len(), 2);
        assert_eq!(batch.results[0].filename, "b.docx");
        assert_eq!(batch.results[0].scores.final_score, 95.0);
        assert_eq!(batch.results[1].filename, "a.docx");
        assert_eq!(batch.results[1].scores.final_score, 88.0);
        assert_eq!(batch.tech_skills, vec!["go", "kubernetes", "sql"]);
        assert_eq!(batch.soft_skills, vec!["communication"]);
        // C never reached the oracle.
        assert_eq!(oracle.call_count(), 2);
    }

    #[tokio::test]
    async fn test_results_sorted_descending() {
        let oracle = ScriptedOracle::new();
        let req = request(vec![
            docx_file("low.docx", "scores 10"),
            docx_file("high.docx", "scores 90"),
            docx_file("mid.docx", "scores 50"),
        ]);

        let batch = rank(oracle, 4, req).await.unwrap();

        let scores: Vec<f64> = batch
            .results
            .iter()
            .map(|r| r.scores.final_score)
            .collect();
        for pair in scores.windows(2) {
            assert!(pair[0] >= pair[1], "not descending: {scores:?}");
        }
    }

    #[tokio::test]
    async fn test_ties_keep_submission_order() {
        let oracle = ScriptedOracle::new();
        let req = request(vec![
            docx_file("first.docx", "scores 80"),
            docx_file("second.docx", "scores 80"),
            docx_file("third.docx", "scores 80"),
        ]);

        // Concurrency of 3 so completion order is genuinely unordered.
        let batch = rank(oracle, 3, req).await.unwrap();

        let names: Vec<&str> = batch.results.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["first.docx", "second.docx", "third.docx"]);
    }

    #[tokio::test]
    async fn test_truncation_only_when_top_n_is_positive_integer() {
        for (top_n, expected_len) in [
            (Some("2".to_string()), 2),
            (Some("5".to_string()), 3), // fewer files than top_n
            (Some("0".to_string()), 3),
            (Some("-1".to_string()), 3),
            (Some("two".to_string()), 3),
            (None, 3),
        ] {
            let oracle = ScriptedOracle::new();
            let mut req = request(vec![
                docx_file("a.docx", "scores 30"),
                docx_file("b.docx", "scores 20"),
                docx_file("c.docx", "scores 10"),
            ]);
            req.top_n = top_n.clone();

            let batch = rank(oracle, 4, req).await.unwrap();
            assert_eq!(batch.results.len(), expected_len, "top_n = {top_n:?}");
        }
    }

    #[tokio::test]
    async fn test_one_corrupt_file_does_not_abort_batch() {
        let oracle = ScriptedOracle::new();
        let req = request(vec![
            docx_file("a.docx", "scores 70"),
            corrupt_pdf("broken.pdf"),
            docx_file("b.docx", "scores 60"),
        ]);

        let batch = rank(oracle, 4, req).await.unwrap();
        assert_eq!(batch.results.len(), 2);
    }

    #[tokio::test]
    async fn test_scoring_failure_skips_that_file_only() {
        let oracle = ScriptedOracle::new();
        let req = request(vec![
            docx_file("good.docx", "scores 70"),
            docx_file("bad.docx", "unscorable"),
        ]);

        let batch = rank(oracle, 4, req).await.unwrap();
        assert_eq!(batch.results.len(), 1);
        assert_eq!(batch.results[0].filename, "good.docx");
    }

    #[tokio::test]
    async fn test_unsupported_extension_skipped_without_oracle_call() {
        let oracle = ScriptedOracle::new();
        let req = request(vec![
            docx_file("a.docx", "scores 70"),
            ResumeDocument::new("notes.txt".to_string(), Bytes::from_static(b"text")),
        ]);

        let batch = rank(oracle.clone(), 4, req).await.unwrap();
        assert_eq!(batch.results.len(), 1);
        assert_eq!(oracle.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_jd_rejected_before_any_oracle_call() {
        let oracle = ScriptedOracle::new();
        let mut req = request(vec![docx_file("a.docx", "scores 70")]);
        req.jd_text = "   ".to_string();

        let result = rank(oracle.clone(), 4, req).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_file_list_rejected() {
        let oracle = ScriptedOracle::new();
        let result = rank(oracle.clone(), 4, request(vec![])).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_all_files_failing_is_batch_failure() {
        let oracle = ScriptedOracle::new();
        let req = request(vec![corrupt_pdf("x.pdf"), corrupt_pdf("y.pdf")]);

        let result = rank(oracle, 4, req).await;
        assert!(matches!(result, Err(AppError::UnprocessableEntity(_))));
    }

    #[tokio::test]
    async fn test_extracted_email_carried_into_record() {
        let oracle = ScriptedOracle::new();
        let req = request(vec![docx_file(
            "jane.docx",
            "jane.doe@example.com backend engineer scores 75",
        )]);

        let batch = rank(oracle, 4, req).await.unwrap();
        assert_eq!(
            batch.results[0].email.as_deref(),
            Some("jane.doe@example.com")
        );
    }

    #[test]
    fn test_parse_top_n() {
        assert_eq!(parse_top_n(Some("3")), Some(3));
        assert_eq!(parse_top_n(Some(" 10 ")), Some(10));
        assert_eq!(parse_top_n(Some("0")), None);
        assert_eq!(parse_top_n(Some("-2")), None);
        assert_eq!(parse_top_n(Some("abc")), None);
        assert_eq!(parse_top_n(None), None);
    }

    #[test]
    fn test_score_record_serializes_flat() {
        let record = ScoreRecord {
            filename: "a.docx".to_string(),
            email: None,
            scores: ScoreBreakdown {
                skills: 80.0,
                final_score: 67.5,
                ..Default::default()
            },
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["filename"], "a.docx");
        assert_eq!(value["skills"], 80.0);
        assert_eq!(value["final_score"], 67.5);
        assert!(value.get("email").is_none());
    }
}
