use crate::ai::client::OpenRouterClient;

/// Only the leading part of the document is embedded in the prompt.
/// Character based, so a long document never splits a UTF-8 code point.
pub const DOCUMENT_EXCERPT_LIMIT: usize = 4000;

/// Build the fixed question-generation prompt around a document excerpt.
pub fn build_prompt(document_text: &str) -> String {
    let excerpt: String = document_text.chars().take(DOCUMENT_EXCERPT_LIMIT).collect();

    format!(
        r#"Based on the following document, generate a single multiple choice question (4 options: A, B, C, D) with a randomized correct answer.

Clearly format the output as:
Question: ...
A) ...
B) ...
C) ...
D) ...
Correct Answer: X

Document:
"""{}""""#,
        excerpt
    )
}

/// Ask the model for one multiple choice question about the document.
///
/// Returns the raw model text; parsing happens downstream so that a
/// malformed response and a transport failure end the quiz the same way.
pub async fn generate_question(
    client: &OpenRouterClient,
    document_text: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    crate::logger::log("Requesting question generation");
    let prompt = build_prompt(document_text);

    let raw = client.complete(&prompt, None).await?;
    crate::logger::log(&format!("Raw model response: {}", raw));

    Ok(raw)
}
