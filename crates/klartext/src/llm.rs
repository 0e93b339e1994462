//! Groq chat-completions client.

use serde::{Deserialize, Serialize};

use crate::prelude::*;

const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 2000;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Send one system/user prompt pair to the chat-completions endpoint and
/// return the model's reply.
pub async fn complete(
    api_key: &str,
    model: &str,
    system_prompt: &str,
    user_prompt: &str,
) -> Result<String> {
    let request = ChatRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system_prompt,
            },
            ChatMessage {
                role: "user",
                content: user_prompt,
            },
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    };

    let client = reqwest::Client::new();
    let response = client
        .post(f!("{GROQ_API_BASE}/chat/completions"))
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await
        .map_err(|e| Error::Llm(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Llm(f!("HTTP {status}: {body}")).into());
    }

    let body: ChatResponse = response
        .json()
        .await
        .map_err(|e| Error::Llm(f!("invalid response body: {e}")))?;

    let content = body
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| Error::Llm("response contained no choices".to_string()))?;

    Ok(content.trim().to_string())
}
