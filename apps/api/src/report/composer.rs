//! Report Composer — gathers the individual scores into the ordered score card
//! and, when unlocked, the full report. Computes no scores of its own.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::grammar::GrammarIssue;
use crate::scoring::skills::SkillMatchResult;

/// Grammar issues shown in the full report; the rest are only counted.
pub const MAX_GRAMMAR_ISSUES_SHOWN: usize = 10;

pub const RECOMMENDATIONS: [&str; 4] = [
    "Tailor your resume to reflect the job description better.",
    "Add missing technical or domain-specific skills.",
    "Use more bullet points and clean formatting.",
    "Ensure all key resume sections are present.",
];

// ────────────────────────────────────────────────────────────────────────────
// Score card
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    SkillMatch,
    Content,
    Style,
    Ats,
    Sections,
}

impl ScoreCategory {
    /// Display order of the score bars.
    pub const ALL: [ScoreCategory; 5] = [
        ScoreCategory::SkillMatch,
        ScoreCategory::Content,
        ScoreCategory::Style,
        ScoreCategory::Ats,
        ScoreCategory::Sections,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScoreCategory::SkillMatch => "🎯 Skill Match",
            ScoreCategory::Content => "🧠 Content",
            ScoreCategory::Style => "🎨 Style",
            ScoreCategory::Ats => "⚙️ ATS Compatibility",
            ScoreCategory::Sections => "📄 Sections",
        }
    }

    /// Left and right colors of the bar gradient.
    pub fn gradient(self) -> (&'static str, &'static str) {
        match self {
            ScoreCategory::SkillMatch => ("#f2709c", "#ff9472"),
            ScoreCategory::Content => ("#00c6ff", "#0072ff"),
            ScoreCategory::Style => ("#f7971e", "#ffd200"),
            ScoreCategory::Ats => ("#56ab2f", "#a8e063"),
            ScoreCategory::Sections => ("#e96443", "#904e95"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryScore {
    pub category: ScoreCategory,
    pub label: &'static str,
    pub value: u8,
}

/// The five category scores in display order.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreCard {
    pub scores: Vec<CategoryScore>,
}

impl ScoreCard {
    pub fn get(&self, category: ScoreCategory) -> Option<u8> {
        self.scores
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreInputs {
    pub skill_match: u8,
    pub content: u8,
    pub style: u8,
    pub ats: u8,
    pub sections: u8,
}

pub fn compose_scores(inputs: ScoreInputs) -> ScoreCard {
    let scores = ScoreCategory::ALL
        .iter()
        .map(|&category| CategoryScore {
            category,
            label: category.label(),
            value: match category {
                ScoreCategory::SkillMatch => inputs.skill_match,
                ScoreCategory::Content => inputs.content,
                ScoreCategory::Style => inputs.style,
                ScoreCategory::Ats => inputs.ats,
                ScoreCategory::Sections => inputs.sections,
            }
            .min(100),
        })
        .collect();
    ScoreCard { scores }
}

// ────────────────────────────────────────────────────────────────────────────
// Full report
// ────────────────────────────────────────────────────────────────────────────

/// Result of the grammar step as shown to the user.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GrammarFeedback {
    /// First `MAX_GRAMMAR_ISSUES_SHOWN` issues, formatted, plus the full count.
    Issues { shown: Vec<String>, total: usize },
    Clean,
    /// The checker failed; the rest of the report still renders.
    Unavailable { reason: String },
}

impl GrammarFeedback {
    pub fn from_issues(issues: &[GrammarIssue]) -> Self {
        if issues.is_empty() {
            return GrammarFeedback::Clean;
        }
        GrammarFeedback::Issues {
            shown: issues
                .iter()
                .take(MAX_GRAMMAR_ISSUES_SHOWN)
                .map(GrammarIssue::summary)
                .collect(),
            total: issues.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    pub grammar: GrammarFeedback,
    pub formatting_issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FullReport {
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// Present only when grammar and formatting feedback is enabled.
    pub feedback: Option<Feedback>,
    pub recommendations: Vec<&'static str>,
}

pub fn compose_full_report(skills: &SkillMatchResult, feedback: Option<Feedback>) -> FullReport {
    FullReport {
        matched_skills: skills.matched.clone(),
        missing_skills: skills.missing.clone(),
        feedback,
        recommendations: RECOMMENDATIONS.to_vec(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Analysis report
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Content score, shown on the overall gauge.
    pub overall_score: u8,
    /// Raw cosine similarity between resume and job description.
    pub similarity: f32,
    pub scores: ScoreCard,
    pub skills: SkillMatchResult,
    pub skill_count: usize,
    pub full_report: Option<FullReport>,
    pub generated_at: DateTime<Utc>,
}
