//! Semantic extraction: one model call turning a page outline into
//! per-heading descriptions.

use std::fmt::Write as FmtWrite;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::GenerationError;
use crate::models::{HarvestConfig, HeadingInsights, OutlineSection, PageOutline};
use crate::services::generation::TextGenerator;
use crate::utils::text::truncate_chars;

const SYSTEM_PROMPT: &str = "You are a professional content analyst who extracts key \
information from documents. You are given the headings of one web page, each followed by \
the text that appears under it. For each heading, extract and condense the information \
under that heading into a clear, factually accurate summary of 1-2 sentences. Use only \
the supplied text; never add information that is not present in it. If a heading has no \
text under it, use an empty string as its summary. Respond with a single JSON object \
mapping each heading, exactly as given, to its summary, and nothing else.";

/// Produces [`HeadingInsights`] for a [`PageOutline`] via one batched
/// completion covering up to `max_headings` headings.
///
/// Headings beyond the cap, and headings the model does not answer for,
/// keep empty descriptions. Provider failures surface as
/// [`GenerationError`]; the coordinator decides whether to degrade.
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
    max_headings: usize,
    text_limit: usize,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &HarvestConfig) -> Self {
        Self {
            generator,
            max_headings: config.max_headings as usize,
            text_limit: config.text_limit as usize,
        }
    }

    pub async fn summarize(
        &self,
        outline: &PageOutline,
    ) -> Result<HeadingInsights, GenerationError> {
        let described = outline.capped_sections(self.max_headings);
        if described.is_empty() {
            return Ok(HeadingInsights::default());
        }

        let user = self.build_user_prompt(described);
        let reply = self.generator.generate(SYSTEM_PROMPT, &user).await?;
        debug!(headings = described.len(), "received summarization reply");
        let descriptions = parse_reply(&reply)?;

        // `described` is the leading slice of the outline, so scope is by
        // position.
        let described_len = described.len();
        Ok(HeadingInsights::from_pairs(
            outline.sections.iter().enumerate().map(|(idx, section)| {
                let description = if idx < described_len {
                    descriptions
                        .get(&section.heading)
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string()
                } else {
                    String::new()
                };
                (section.heading.clone(), description)
            }),
        ))
    }

    fn build_user_prompt(&self, sections: &[OutlineSection]) -> String {
        // Per-heading budget keeps the whole prompt inside the text limit
        // no matter how many headings the page has.
        let per_heading = (self.text_limit / sections.len()).max(200);

        let mut prompt = String::from(
            "Summarize the text under each of the following headings.\n\n",
        );
        for section in sections {
            writeln!(prompt, "### {}", section.heading).unwrap();
            writeln!(prompt, "{}\n", truncate_chars(&section.body_text, per_heading)).unwrap();
        }
        prompt.push_str(
            "Return a JSON object in the form {\"<heading>\": \"<summary>\"} covering every \
             heading above. Example: {\"History\": \"The field began in 1956 at Dartmouth.\", \
             \"Applications\": \"\"}",
        );
        prompt
    }
}

/// Strips Markdown code fences the model sometimes wraps around JSON, then
/// parses the heading→description object.
fn parse_reply(reply: &str) -> Result<serde_json::Map<String, Value>, GenerationError> {
    let cleaned = reply.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| GenerationError::InvalidResponse(format!("reply is not JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| GenerationError::InvalidResponse("reply is not a JSON object".into()))?;

    // Some models wrap the mapping in a "headings" envelope.
    if object.len() == 1
        && let Some(inner) = object.get("headings").and_then(Value::as_object)
    {
        return Ok(inner.clone());
    }

    Ok(object.clone())
}
