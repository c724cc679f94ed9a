//! Skill matching — partitions a user-supplied skill list into skills the resume
//! demonstrates and skills the job asks for that the resume lacks.

use serde::Serialize;
use tracing::debug;

use crate::scoring::fuzzy::partial_ratio;
use crate::scoring::percent;

/// Similarity (0–100) a skill needs to count as present in a text.
pub const DEFAULT_THRESHOLD: u8 = 70;

/// Longest accepted skill, in chars. Fuzzy matching cost grows with its square.
pub const MAX_SKILL_CHARS: usize = 50;

/// Where a single skill lands. Every skill gets exactly one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillOutcome {
    /// The resume demonstrates it.
    Matched,
    /// The job description calls for it and the resume does not show it.
    Missing,
    /// Neither text mentions it; not a gap since the job does not need it.
    Irrelevant,
}

/// Classifies one skill from its two similarity scores.
pub fn classify_skill(resume_score: u8, job_score: u8, threshold: u8) -> SkillOutcome {
    if resume_score >= threshold {
        SkillOutcome::Matched
    } else if job_score >= threshold {
        SkillOutcome::Missing
    } else {
        SkillOutcome::Irrelevant
    }
}

#[derive(Debug, Clone)]
pub struct SkillAssessment {
    pub skill: String,
    pub resume_score: u8,
    pub job_score: u8,
    pub outcome: SkillOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkillMatchResult {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl SkillMatchResult {
    /// Share of the skill list the resume matched, 0–100. 0 for an empty list.
    pub fn score(&self, skill_count: usize) -> u8 {
        percent(self.matched.len(), skill_count)
    }
}

/// Splits a comma-separated skill string into trimmed, lowercased, non-empty skills.
/// Order and duplicates are kept.
pub fn parse_skill_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Scores every skill against both texts, in list order.
pub fn assess_skills(
    resume_text: &str,
    job_description: &str,
    skills: &[String],
    threshold: u8,
) -> Vec<SkillAssessment> {
    let resume = resume_text.to_lowercase();
    let job = job_description.to_lowercase();

    skills
        .iter()
        .map(|skill| {
            let needle = skill.to_lowercase();
            let resume_score = partial_ratio(&needle, &resume);
            let job_score = partial_ratio(&needle, &job);
            SkillAssessment {
                skill: skill.clone(),
                resume_score,
                job_score,
                outcome: classify_skill(resume_score, job_score, threshold),
            }
        })
        .collect()
}

/// Partitions `skills` into matched and missing, preserving input order.
pub fn match_skills(
    resume_text: &str,
    job_description: &str,
    skills: &[String],
    threshold: u8,
) -> SkillMatchResult {
    let mut result = SkillMatchResult::default();
    for assessment in assess_skills(resume_text, job_description, skills, threshold) {
        debug!(
            "Skill '{}': resume={} job={} -> {:?}",
            assessment.skill, assessment.resume_score, assessment.job_score, assessment.outcome
        );
        match assessment.outcome {
            SkillOutcome::Matched => result.matched.push(assessment.skill),
            SkillOutcome::Missing => result.missing.push(assessment.skill),
            SkillOutcome::Irrelevant => {}
        }
    }
    result
}
