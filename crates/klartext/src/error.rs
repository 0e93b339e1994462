#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Generic {0}")]
    Generic(String),

    #[error("Input text cannot be empty")]
    EmptyInput,

    #[error("GROQ_API_KEY is not set. Export it or pass --api-key.")]
    MissingApiKey,

    #[error("Prompt template not found: {0}")]
    TemplateNotFound(String),

    #[error("Unsupported language: {0} (expected 'de' or 'en')")]
    UnsupportedLanguage(String),

    #[error("LLM request failed: {0}")]
    Llm(String),
}
