//! Expense classification through a remote chat-completion endpoint.
//!
//! The classifier sends the comment together with the list of allowed categories and
//! expects the name of exactly one category back. Whatever the service answers is
//! checked against the list; anything else is a failure. Callers substitute the
//! fallback category on failure, so errors here never reach users.

use crate::{
    config::ClassifierConfig,
    errors::{Error, Result},
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Assigns one of a fixed list of categories to a free-text comment.
#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    /// Returns the canonical entry of `categories` that best fits `comment`.
    ///
    /// # Errors
    /// [`Error::Classification`] when no valid category could be obtained.
    async fn classify(&self, comment: &str, categories: &[String]) -> Result<String>;
}

/// Looks up `reply` in `categories`, ignoring surrounding whitespace and case.
///
/// Returns the entry as written in the list, never the reply's own casing.
#[must_use]
pub fn match_category<'a>(reply: &str, categories: &'a [String]) -> Option<&'a str> {
    let wanted = reply.trim().to_lowercase();
    for category in categories {
        if category.to_lowercase() == wanted {
            return Some(category.as_str());
        }
    }
    None
}

/// Instruction describing the task and enumerating the allowed categories.
#[must_use]
pub fn system_prompt(categories: &[String]) -> String {
    format!(
        "Ты - ассистент для классификации трат. Твоя задача - проанализировать текст и \
         определить наиболее подходящую категорию из списка.\n\
         Отвечай строго названием одной категории из списка, без лишних слов и знаков \
         препинания.\n\n\
         Список категорий:\n- {}",
        categories.join("\n- ")
    )
}

/// Instruction carrying the literal comment.
#[must_use]
pub fn user_prompt(comment: &str) -> String {
    format!("Текст для анализа: \"{comment}\"")
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Classifier backed by an OpenAI-compatible chat-completions API (`DeepSeek` by default).
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpClassifier {
    /// Builds a classifier from settings. A missing `api_key` is accepted here and
    /// reported on every call instead.
    pub fn new(config: &ClassifierConfig, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl Classifier for HttpClassifier {
    #[instrument(skip(self, categories))]
    async fn classify(&self, comment: &str, categories: &[String]) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::classification("classifier API key is not configured"))?;

        let system = system_prompt(categories);
        let user = user_prompt(comment);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
        };

        debug!(endpoint = %self.endpoint, "Sending classification request");
        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::classification(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::classification(format!(
                "endpoint returned {status}: {text}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::classification(format!("malformed response: {e}")))?;

        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| Error::classification("empty reply"))?;

        debug!(reply = %reply.trim(), "Classifier replied");
        match_category(&reply, categories)
            .map(str::to_string)
            .ok_or_else(|| Error::classification(format!("unknown category '{}'", reply.trim())))
    }
}
