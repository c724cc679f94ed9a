//! Grammar checking through a LanguageTool server (`POST {base}/v2/check`).
//!
//! The public LanguageTool API is the default backend; point `LANGUAGETOOL_URL` at a
//! self-hosted instance to avoid its rate limits. Calls are not retried: a failure
//! is reported to the user, who can resubmit.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Locale every resume is checked against.
pub const LANGUAGE: &str = "en-US";

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// One issue reported by the checker.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarIssue {
    pub message: String,
    pub rule_id: String,
}

impl GrammarIssue {
    /// "{message} (Rule: {rule_id})"
    pub fn summary(&self) -> String {
        format!("{} (Rule: {})", self.message, self.rule_id)
    }
}

#[async_trait]
pub trait GrammarChecker: Send + Sync {
    async fn check(&self, text: &str) -> Result<Vec<GrammarIssue>, GrammarError>;
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<CheckMatch>,
}

#[derive(Debug, Deserialize)]
struct CheckMatch {
    message: String,
    rule: Rule,
}

#[derive(Debug, Deserialize)]
struct Rule {
    id: String,
}

impl From<CheckMatch> for GrammarIssue {
    fn from(m: CheckMatch) -> Self {
        GrammarIssue {
            message: m.message,
            rule_id: m.rule.id,
        }
    }
}

#[derive(Clone)]
pub struct LanguageToolClient {
    client: Client,
    check_url: String,
}

impl LanguageToolClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GrammarError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            check_url: format!("{}/v2/check", base_url.trim_end_matches('/')),
        })
    }

    pub fn check_url(&self) -> &str {
        &self.check_url
    }
}

#[async_trait]
impl GrammarChecker for LanguageToolClient {
    async fn check(&self, text: &str) -> Result<Vec<GrammarIssue>, GrammarError> {
        let response = self
            .client
            .post(&self.check_url)
            .form(&[("text", text), ("language", LANGUAGE)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GrammarError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: CheckResponse = response.json().await?;
        debug!("LanguageTool returned {} match(es)", body.matches.len());
        Ok(body.matches.into_iter().map(GrammarIssue::from).collect())
    }
}
