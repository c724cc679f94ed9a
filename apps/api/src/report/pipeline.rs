//! Analysis pipeline: extracted text → scores → report.
//!
//! Runs strictly in order: validate inputs, similarity, skills, heuristics,
//! then the optional full report. Any failure aborts the whole analysis.

use chrono::Utc;
use tracing::{info, warn};

use crate::document::ExtractedDocument;
use crate::embedding::TextEncoder;
use crate::errors::AppError;
use crate::grammar::GrammarChecker;
use crate::report::composer::{
    compose_full_report, compose_scores, AnalysisReport, Feedback, GrammarFeedback, ScoreCategory,
    ScoreInputs,
};
use crate::report::formatting::check_formatting;
use crate::scoring::heuristics::{ats_score, section_score, style_score};
use crate::scoring::similarity::{compute_similarity, content_score};
use crate::scoring::skills::{match_skills, DEFAULT_THRESHOLD, MAX_SKILL_CHARS};

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub document: ExtractedDocument,
    pub job_description: String,
    pub skills: Vec<String>,
    /// Run grammar and formatting checks when the full report is unlocked.
    pub enable_feedback: bool,
    /// "Unlock Full Report": include matched/missing skills, feedback, recommendations.
    pub full_report: bool,
}

/// Rejects blank job descriptions, empty skill lists and over-long skills.
/// Cheap; run before extraction.
pub fn validate_inputs(job_description: &str, skills: &[String]) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::EmptyInput(
            "Please paste a job description.".to_string(),
        ));
    }
    if skills.is_empty() {
        return Err(AppError::EmptyInput(
            "Please enter at least one skill.".to_string(),
        ));
    }
    if let Some(skill) = skills.iter().find(|s| s.chars().count() > MAX_SKILL_CHARS) {
        let preview: String = skill.chars().take(20).collect();
        return Err(AppError::Validation(format!(
            "skill \"{preview}…\" is longer than {MAX_SKILL_CHARS} characters; separate skills with commas"
        )));
    }
    Ok(())
}

pub async fn run_analysis(
    encoder: &dyn TextEncoder,
    grammar: &dyn GrammarChecker,
    request: AnalysisRequest,
) -> Result<AnalysisReport, AppError> {
    validate_inputs(&request.job_description, &request.skills)?;

    let document = &request.document;
    if document.is_empty() {
        return Err(AppError::EmptyText);
    }

    let similarity = compute_similarity(encoder, &document.text, &request.job_description)
        .await?
        .ok_or_else(|| {
            AppError::SimilarityCompute("a text was empty after preprocessing".to_string())
        })?;
    let overall_score = content_score(similarity);

    let skills = {
        let (resume, job, list) = (
            document.text.clone(),
            request.job_description.clone(),
            request.skills.clone(),
        );
        tokio::task::spawn_blocking(move || match_skills(&resume, &job, &list, DEFAULT_THRESHOLD))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("skill matching task failed: {e}")))?
    };

    let scores = compose_scores(ScoreInputs {
        skill_match: skills.score(request.skills.len()),
        content: overall_score,
        style: style_score(&document.text),
        ats: ats_score(&document.text, &request.job_description),
        sections: section_score(&document.text),
    });

    info!(
        "Analysis complete: content={} skills={}/{} ats={:?}",
        overall_score,
        skills.matched.len(),
        request.skills.len(),
        scores.get(ScoreCategory::Ats)
    );

    let full_report = if request.full_report {
        let feedback = if request.enable_feedback {
            Some(collect_feedback(grammar, document).await)
        } else {
            None
        };
        Some(compose_full_report(&skills, feedback))
    } else {
        None
    };

    Ok(AnalysisReport {
        overall_score,
        similarity,
        scores,
        skill_count: request.skills.len(),
        skills,
        full_report,
        generated_at: Utc::now(),
    })
}

/// Grammar runs on the normalized text; formatting needs the original line breaks.
async fn collect_feedback(grammar: &dyn GrammarChecker, document: &ExtractedDocument) -> Feedback {
    let grammar = match grammar.check(&document.text).await {
        Ok(issues) => GrammarFeedback::from_issues(&issues),
        Err(e) => {
            warn!("Grammar check failed: {e}");
            GrammarFeedback::Unavailable {
                reason: AppError::from(e).user_message(),
            }
        }
    };

    Feedback {
        grammar,
        formatting_issues: check_formatting(&document.raw_text),
    }
}
