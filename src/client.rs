use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChatError;

#[derive(Serialize)]
struct QuestionRequest<'a> {
    question: &'a str,
}

/// Outer reply object. `body` carries the real payload as a JSON string.
#[derive(Deserialize)]
struct ResponseEnvelope {
    body: String,
}

/// Payload found inside the envelope's `body` string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisReply {
    #[serde(default)]
    pub llm_answer: Option<String>,
    /// Usually a number, but shown as-is whatever JSON type arrives
    #[serde(default)]
    pub destinations_count: Option<Value>,
}

impl AnalysisReply {
    /// The answer text, or `None` when it is missing or empty.
    pub fn answer(&self) -> Option<&str> {
        self.llm_answer.as_deref().filter(|a| !a.is_empty())
    }

    /// The count as displayed in the badge.
    pub fn count_text(&self) -> String {
        match &self.destinations_count {
            None | Some(Value::Null) => "?".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Decode a raw response body: the envelope first, then its `body` string again.
pub fn decode_envelope(raw: &[u8]) -> Result<AnalysisReply, ChatError> {
    let envelope: ResponseEnvelope = serde_json::from_slice(raw)?;
    let reply: AnalysisReply = serde_json::from_str(&envelope.body)?;
    Ok(reply)
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn ask(&self, question: &str) -> Result<AnalysisReply, ChatError> {
        tracing::debug!(endpoint = %self.endpoint, "sending question");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&QuestionRequest { question })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Http { status });
        }

        let raw = response.bytes().await?;
        let reply = decode_envelope(&raw)?;
        tracing::debug!(
            has_answer = reply.llm_answer.is_some(),
            "reply decoded"
        );
        Ok(reply)
    }
}
