use askama::Template;
use axum::{
    extract::{rejection::FormRejection, Multipart, State},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{info, warn};

use crate::document::{extract_document, ExtractedDocument};
use crate::errors::AppError;
use crate::report::composer::AnalysisReport;
use crate::report::pipeline::{run_analysis, validate_inputs, AnalysisRequest};
use crate::report::views::{CarryForward, FormValues, IndexPage, Notice, ReportPage};
use crate::scoring::skills::parse_skill_list;
use crate::state::AppState;

const WELCOME: &str = "Please upload a resume and paste a job description to begin.";
const BYTES_PER_MB: usize = 1024 * 1024;

/// Fields of an analysis upload (`multipart/form-data`).
#[derive(Debug, Default)]
struct Upload {
    resume: Option<Bytes>,
    job_description: String,
    skills: String,
    enable_feedback: bool,
    full_report: bool,
}

impl Upload {
    fn form_values(&self) -> FormValues {
        FormValues {
            job_description: self.job_description.clone(),
            skills: self.skills.clone(),
            enable_feedback: self.enable_feedback,
        }
    }
}

/// Body of POST /analyze/full: the report page posts the extracted text back.
#[derive(Debug, Deserialize)]
pub struct FullReportForm {
    pub resume_text: String,
    pub job_description: String,
    #[serde(default)]
    pub skills: String,
    pub enable_feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub job_description: String,
    /// Each entry may itself be a comma-separated list.
    pub skills: Vec<String>,
    #[serde(default)]
    pub enable_feedback: bool,
    #[serde(default)]
    pub full_report: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// HTML
// ────────────────────────────────────────────────────────────────────────────

/// GET /
pub async fn handle_index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let page = IndexPage {
        notice: Notice::info(WELCOME),
        form: FormValues::default(),
        max_upload_mb: state.config.max_upload_bytes / BYTES_PER_MB,
    };
    Ok(Html(page.render()?))
}

/// POST /analyze
/// Renders the score report, or the form again with the problem shown inline.
pub async fn handle_analyze_page(State(state): State<AppState>, multipart: Multipart) -> Response {
    let upload = match read_upload(multipart, state.config.max_upload_bytes).await {
        Ok(upload) => upload,
        Err(e) => return index_with_error(&state, &e, FormValues::default()),
    };
    let form = upload.form_values();

    let request = match prepare_upload(upload).await {
        Ok(request) => request,
        Err(e) => return index_with_error(&state, &e, form),
    };
    let carry = carry_forward(&request);

    match run_analysis(state.encoder.as_ref(), state.grammar.as_ref(), request).await {
        Ok(report) => render_report(&report, carry).into_response(),
        Err(e) => index_with_error(&state, &e, form),
    }
}

/// POST /analyze/full
/// Re-runs the analysis on the carried text with the full report unlocked.
pub async fn handle_full_report_page(
    State(state): State<AppState>,
    form: Result<Form<FullReportForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            let err = AppError::Validation(rejection.body_text());
            return index_with_error(&state, &err, FormValues::default());
        }
    };
    let enable_feedback = form.enable_feedback.as_deref().is_some_and(is_truthy);
    let values = FormValues {
        job_description: form.job_description.clone(),
        skills: form.skills.clone(),
        enable_feedback,
    };

    let request = AnalysisRequest {
        document: ExtractedDocument::from_plain_text(&form.resume_text),
        job_description: form.job_description,
        skills: parse_skill_list(&form.skills),
        enable_feedback,
        full_report: true,
    };
    let carry = carry_forward(&request);

    match run_analysis(state.encoder.as_ref(), state.grammar.as_ref(), request).await {
        Ok(report) => render_report(&report, carry).into_response(),
        Err(e) => index_with_error(&state, &e, values),
    }
}

fn render_report(report: &AnalysisReport, carry: CarryForward) -> Result<Html<String>, AppError> {
    Ok(Html(ReportPage::new(report, carry).render()?))
}

fn index_with_error(state: &AppState, err: &AppError, form: FormValues) -> Response {
    if !err.is_warning() {
        warn!("Analysis failed: {err}");
    }
    let page = IndexPage {
        notice: Notice::from_error(err),
        form,
        max_upload_mb: state.config.max_upload_bytes / BYTES_PER_MB,
    };
    match page.render() {
        Ok(html) => (err.status(), Html(html)).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

fn carry_forward(request: &AnalysisRequest) -> CarryForward {
    CarryForward {
        resume_text: request.document.raw_text.clone(),
        job_description: request.job_description.clone(),
        skills: request.skills.join(", "),
        enable_feedback: request.enable_feedback,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// JSON API
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
pub async fn handle_analyze_api(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let upload = read_upload(multipart, state.config.max_upload_bytes).await?;
    let request = prepare_upload(upload).await?;
    let report = run_analysis(state.encoder.as_ref(), state.grammar.as_ref(), request).await?;
    Ok(Json(report))
}

/// POST /api/v1/analyze/text
pub async fn handle_analyze_text_api(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    let request = AnalysisRequest {
        document: ExtractedDocument::from_plain_text(&req.resume_text),
        job_description: req.job_description,
        skills: req.skills.iter().flat_map(|s| parse_skill_list(s)).collect(),
        enable_feedback: req.enable_feedback,
        full_report: req.full_report,
    };
    let report = run_analysis(state.encoder.as_ref(), state.grammar.as_ref(), request).await?;
    Ok(Json(report))
}

// ────────────────────────────────────────────────────────────────────────────
// Upload parsing
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload(mut multipart: Multipart, max_bytes: usize) -> Result<Upload, AppError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed upload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("could not read resume: {e}")))?;
                if data.len() > max_bytes {
                    return Err(AppError::Validation(format!(
                        "the resume exceeds the {} MB upload limit",
                        max_bytes.div_ceil(BYTES_PER_MB)
                    )));
                }
                if !data.is_empty() {
                    upload.resume = Some(data);
                }
            }
            "job_description" => upload.job_description = read_text(field).await?,
            "skills" => upload.skills = read_text(field).await?,
            "enable_feedback" => upload.enable_feedback = is_truthy(&read_text(field).await?),
            "full_report" => upload.full_report = is_truthy(&read_text(field).await?),
            other => warn!("Ignoring unknown upload field '{other}'"),
        }
    }

    Ok(upload)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("malformed form field: {e}")))
}

/// Checks the cheap inputs first, then extracts the PDF.
async fn prepare_upload(upload: Upload) -> Result<AnalysisRequest, AppError> {
    let resume = upload.resume.ok_or_else(|| {
        AppError::EmptyInput("Please upload a resume PDF.".to_string())
    })?;
    let skills = parse_skill_list(&upload.skills);
    validate_inputs(&upload.job_description, &skills)?;

    info!("Received resume upload ({} bytes)", resume.len());
    let document = extract_document(resume).await?;

    Ok(AnalysisRequest {
        document,
        job_description: upload.job_description,
        skills,
        enable_feedback: upload.enable_feedback,
        full_report: upload.full_report,
    })
}

/// HTML checkboxes post "on"; API clients tend to send "true" or "1".
fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::document::extract::tests::build_pdf;
    use crate::embedding::EncoderModel;
    use crate::grammar::tests::FixedChecker;
    use crate::routes::build_router;
    use crate::scoring::similarity::tests::LetterEncoder;

    const BOUNDARY: &str = "resumatch-test-boundary";

    fn app_with_limit(max_upload_bytes: usize) -> Router {
        build_router(AppState {
            config: Config {
                port: 0,
                rust_log: "info".to_string(),
                embedding_model: EncoderModel::default(),
                embedding_cache_dir: None,
                languagetool_url: "http://localhost:8010".to_string(),
                grammar_timeout_secs: 1,
                max_upload_bytes,
            },
            encoder: Arc::new(LetterEncoder::default()),
            grammar: Arc::new(FixedChecker(vec![])),
        })
    }

    fn app() -> Router {
        app_with_limit(BYTES_PER_MB)
    }

    /// (name, filename, data)
    fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, filename, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match filename {
                Some(f) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                         Content-Type: application/pdf\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("on"));
        assert!(is_truthy(" TRUE "));
        assert!(is_truthy("1"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy(""));
    }

    #[tokio::test]
    async fn test_index_renders_form() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Upload Resume PDF (max 1 MB)"));
        assert!(html.contains(WELCOME));
        // feedback toggle defaults to on
        assert!(html.contains("checked"));
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resumatch-api");
    }

    #[tokio::test]
    async fn test_text_api_returns_report() {
        let request = json_request(
            "/api/v1/analyze/text",
            json!({
                "resume_text": "Summary\nExperienced Python developer.\nEducation: BS CS",
                "job_description": "Python developer",
                "skills": ["python, java"]
            }),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["skills"]["matched"], json!(["python"]));
        assert_eq!(body["skill_count"], 2);
        assert_eq!(body["scores"]["scores"].as_array().unwrap().len(), 5);
        assert_eq!(body["scores"]["scores"][0]["category"], "skill_match");
        assert_eq!(body["scores"]["scores"][0]["value"], 50);
        assert!(body["full_report"].is_null());
    }

    #[tokio::test]
    async fn test_text_api_full_report_with_feedback() {
        let request = json_request(
            "/api/v1/analyze/text",
            json!({
                "resume_text": "Summary\n• Built Python services",
                "job_description": "Python developer",
                "skills": ["python"],
                "enable_feedback": true,
                "full_report": true
            }),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        let full = &body["full_report"];
        assert_eq!(full["matched_skills"], json!(["python"]));
        assert_eq!(full["feedback"]["grammar"]["status"], "clean");
        assert_eq!(
            full["feedback"]["formatting_issues"][0],
            "Use more bullet points for better readability."
        );
        assert_eq!(full["recommendations"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_text_api_rejects_empty_skills() {
        let request = json_request(
            "/api/v1/analyze/text",
            json!({
                "resume_text": "Python developer",
                "job_description": "Python developer",
                "skills": [" , "]
            }),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["code"], "EMPTY_INPUT");
        assert_eq!(body["error"]["message"], "Please enter at least one skill.");
    }

    #[tokio::test]
    async fn test_text_api_blank_resume_is_empty_text() {
        let request = json_request(
            "/api/v1/analyze/text",
            json!({
                "resume_text": "   ",
                "job_description": "Python developer",
                "skills": ["python"]
            }),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_text_api_rejects_overlong_skill() {
        let request = json_request(
            "/api/v1/analyze/text",
            json!({
                "resume_text": "Python developer",
                "job_description": "Python developer",
                "skills": ["python", "I have built many large scale distributed systems over the years"]
            }),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_text_api_blank_resume_message() {
        let request = json_request(
            "/api/v1/analyze/text",
            json!({
                "resume_text": "",
                "job_description": "Python developer",
                "skills": ["python"]
            }),
        );
        let response = app().oneshot(request).await.unwrap();
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["message"], "The resume contains no extractable text");
    }

    #[tokio::test]
    async fn test_upload_api_scores_pdf() {
        let pdf = build_pdf(&["Experienced Python developer"]);
        let request = multipart_request(
            "/api/v1/analyze",
            &[
                ("resume", Some("resume.pdf"), &pdf),
                ("job_description", None, b"Python developer, Java a plus"),
                ("skills", None, b"python, java"),
                ("full_report", None, b"true"),
            ],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["skills"]["matched"], json!(["python"]));
        assert_eq!(body["full_report"]["missing_skills"], json!(["java"]));
        // feedback was not requested
        assert!(body["full_report"]["feedback"].is_null());
    }

    #[tokio::test]
    async fn test_upload_api_rejects_non_pdf() {
        let request = multipart_request(
            "/api/v1/analyze",
            &[
                ("resume", Some("resume.pdf"), b"just some text"),
                ("job_description", None, b"Python developer"),
                ("skills", None, b"python"),
            ],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["code"], "DOCUMENT_PARSE_ERROR");
    }

    #[tokio::test]
    async fn test_upload_over_limit_rejected() {
        let pdf = build_pdf(&["Experienced Python developer"]);
        let request = multipart_request(
            "/api/v1/analyze",
            &[
                ("resume", Some("resume.pdf"), &pdf),
                ("job_description", None, b"Python developer"),
                ("skills", None, b"python"),
            ],
        );
        let response = app_with_limit(64).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_analyze_page_renders_report() {
        let pdf = build_pdf(&["Experienced Python developer"]);
        let request = multipart_request(
            "/analyze",
            &[
                ("resume", Some("resume.pdf"), &pdf),
                ("job_description", None, b"Python developer"),
                ("skills", None, b"python"),
                ("enable_feedback", None, b"on"),
            ],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("Overall Resume Score"));
        assert!(html.contains("Unlock Full Report"));
        assert!(html.contains("action=\"/analyze/full\""));
        assert!(html.contains("Experienced Python developer"));
    }

    #[tokio::test]
    async fn test_analyze_page_without_resume_shows_warning() {
        let request = multipart_request(
            "/analyze",
            &[
                ("job_description", None, b"Senior Rust engineer"),
                ("skills", None, b"rust"),
            ],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let html = body_string(response).await;
        assert!(html.contains("notice warning"));
        assert!(html.contains("Please upload a resume PDF."));
        assert!(html.contains("Senior Rust engineer"));
    }

    #[tokio::test]
    async fn test_full_report_page_unlocks_details() {
        let form = "resume_text=Summary%0A-+Built+APIs+in+Python%0A-+Led+a+team%0A-+Shipped+v2\
                    &job_description=Python+developer&skills=python&enable_feedback=true";
        let request = Request::builder()
            .method("POST")
            .uri("/analyze/full")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("Detailed Report"));
        assert!(html.contains("No major grammar issues found!"));
        assert!(html.contains("Formatting looks clean!"));
        assert!(!html.contains("Unlock Full Report"));
    }

    #[tokio::test]
    async fn test_full_report_page_malformed_form_shows_inline_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/analyze/full")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("resume_text=Summary&skills=python"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let html = body_string(response).await;
        assert!(html.contains("notice error"));
        assert!(html.contains("missing field"));
        assert!(html.contains("<form action=\"/analyze\""));
    }
}
