//! HTML views (askama templates under `templates/`).
//!
//! View structs hold display-ready values only; templates do no arithmetic.

use askama::Template;
use uuid::Uuid;

use crate::errors::AppError;
use crate::report::composer::{AnalysisReport, GrammarFeedback};

/// Semicircle radius of the overall gauge, in SVG user units.
const GAUGE_RADIUS: f64 = 80.0;
const GAUGE_COLOR: &str = "#4CAF50";
/// (from %, to %, color) bands drawn behind the gauge value.
const GAUGE_BANDS: [(f64, f64, &str); 3] = [
    (0.0, 50.0, "#ffcccc"),
    (50.0, 80.0, "#ffe699"),
    (80.0, 100.0, "#c6efce"),
];

/// Values typed into the form, echoed back so the user can fix and resubmit.
#[derive(Debug, Clone)]
pub struct FormValues {
    pub job_description: String,
    pub skills: String,
    pub enable_feedback: bool,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            job_description: String::new(),
            skills: String::new(),
            enable_feedback: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    /// "info" | "warning" | "error" — used as a CSS class.
    pub kind: &'static str,
    pub message: String,
}

impl Notice {
    pub fn info(message: &str) -> Self {
        Self {
            kind: "info",
            message: message.to_string(),
        }
    }

    pub fn from_error(err: &AppError) -> Self {
        Self {
            kind: if err.is_warning() { "warning" } else { "error" },
            message: err.user_message(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub notice: Notice,
    pub form: FormValues,
    pub max_upload_mb: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Report page
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BarView {
    /// Unique per render so each bar gets its own keyframes.
    pub id: String,
    pub label: &'static str,
    pub value: u8,
    pub color_from: &'static str,
    pub color_to: &'static str,
}

#[derive(Debug, Clone)]
pub struct GaugeBand {
    pub color: &'static str,
    pub dash: String,
    pub offset: String,
}

#[derive(Debug, Clone)]
pub struct GaugeView {
    pub id: String,
    pub label: &'static str,
    pub value: u8,
    pub color: &'static str,
    /// Distance to a perfect 100, shown like a delta indicator.
    pub delta: String,
    pub arc_length: String,
    pub value_dash: String,
    pub bands: Vec<GaugeBand>,
}

impl GaugeView {
    pub fn new(label: &'static str, value: u8) -> Self {
        let arc = std::f64::consts::PI * GAUGE_RADIUS;
        let bands = GAUGE_BANDS
            .iter()
            .map(|&(from, to, color)| GaugeBand {
                color,
                dash: format!("{:.2} {:.2}", (to - from) / 100.0 * arc, arc),
                offset: format!("{:.2}", 0.0 - from / 100.0 * arc),
            })
            .collect();
        let delta = match i16::from(value) - 100 {
            0 => "±0".to_string(),
            d => format!("▼{}", d.abs()),
        };

        Self {
            id: Uuid::new_v4().simple().to_string(),
            label,
            value,
            color: GAUGE_COLOR,
            delta,
            arc_length: format!("{arc:.2}"),
            value_dash: format!("{:.2} {:.2}", f64::from(value) / 100.0 * arc, arc),
            bands,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FullReportView {
    pub matched_skills: String,
    pub missing_skills: String,
    pub feedback_enabled: bool,
    pub grammar_issues: Vec<String>,
    pub grammar_hidden: usize,
    pub grammar_notice: Option<String>,
    pub formatting_issues: Vec<String>,
    pub recommendations: Vec<&'static str>,
}

/// Everything needed to re-run the analysis with the full report unlocked,
/// posted back as hidden form fields.
#[derive(Debug, Clone)]
pub struct CarryForward {
    pub resume_text: String,
    pub job_description: String,
    pub skills: String,
    pub enable_feedback: bool,
}

#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportPage {
    pub gauge: GaugeView,
    pub bars: Vec<BarView>,
    pub full: Option<FullReportView>,
    pub carry: CarryForward,
    pub generated_at: String,
}

impl ReportPage {
    pub fn new(report: &AnalysisReport, carry: CarryForward) -> Self {
        let bars = report
            .scores
            .scores
            .iter()
            .map(|s| {
                let (color_from, color_to) = s.category.gradient();
                BarView {
                    id: Uuid::new_v4().simple().to_string(),
                    label: s.label,
                    value: s.value,
                    color_from,
                    color_to,
                }
            })
            .collect();

        let full = report.full_report.as_ref().map(|full| {
            let (grammar_issues, grammar_hidden, grammar_notice, formatting_issues) =
                match &full.feedback {
                    None => (vec![], 0, None, vec![]),
                    Some(feedback) => {
                        let (shown, hidden, notice) = match &feedback.grammar {
                            GrammarFeedback::Issues { shown, total } => {
                                (shown.clone(), total - shown.len(), None)
                            }
                            GrammarFeedback::Clean => (vec![], 0, None),
                            GrammarFeedback::Unavailable { reason } => {
                                (vec![], 0, Some(reason.clone()))
                            }
                        };
                        (shown, hidden, notice, feedback.formatting_issues.clone())
                    }
                };

            FullReportView {
                matched_skills: join_or_none(&full.matched_skills),
                missing_skills: join_or_none(&full.missing_skills),
                feedback_enabled: full.feedback.is_some(),
                grammar_issues,
                grammar_hidden,
                grammar_notice,
                formatting_issues,
                recommendations: full.recommendations.clone(),
            }
        });

        Self {
            gauge: GaugeView::new("🧮 Overall Resume Score", report.overall_score),
            bars,
            full,
            carry,
            generated_at: report.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}
