//! Response Normalization
//!
//! Turns free-form model output into an explanation / code / language triple.
//! Models are asked to answer in JSON but frequently wrap it in prose or
//! markdown fences, or ignore the instruction entirely, so extraction is a
//! best-effort pass over three formats in priority order:
//!
//! 1. A JSON object, preferably inside a `json` (or untagged) fence, otherwise
//!    the widest `{...}` span in the text
//! 2. The first fenced code block, with its language tag
//! 3. The raw text itself

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Explanation used when the model supplied none
pub const DEFAULT_EXPLANATION: &str = "Generated code based on your request.";

/// Explanation used when nothing structured could be found
pub const RAW_FALLBACK_EXPLANATION: &str = "Generated content based on your request.";

/// Language used when the model supplied none
pub const DEFAULT_LANGUAGE: &str = "text";

/// Structured result of a code generation request. Every field is always set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub explanation: String,
    pub code: String,
    pub language: String,
}

impl GenerationResult {
    /// Wrap raw text that carried no recognisable structure.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            explanation: RAW_FALLBACK_EXPLANATION.to_string(),
            code: text.into(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Whether the result carries any code at all.
    pub fn has_code(&self) -> bool {
        !self.code.trim().is_empty()
    }
}

/// Which extraction pass produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeSource {
    Json,
    CodeFence,
    Raw,
}

fn fenced_json() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"```(?:json)?\s*(\{[\s\S]*?\})\s*```").expect("static regex"))
}

fn brace_span() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\{[\s\S]*\})").expect("static regex"))
}

fn code_fence() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"```(\w+)?\s*([\s\S]*?)```").expect("static regex"))
}

/// Normalize raw model output. Never fails.
pub fn normalize(raw: &str) -> GenerationResult {
    normalize_with_source(raw).0
}

/// Normalize raw model output and report which pass matched.
pub fn normalize_with_source(raw: &str) -> (GenerationResult, NormalizeSource) {
    match parse_json_object(raw) {
        Ok(result) => {
            debug!(language = %result.language, "normalized structured JSON response");
            return (result, NormalizeSource::Json);
        }
        Err(reason) => {
            warn!(%reason, "model response is not structured JSON, falling back");
        }
    }

    if let Some(result) = parse_code_fence(raw) {
        debug!(language = %result.language, "normalized fenced code block");
        return (result, NormalizeSource::CodeFence);
    }

    warn!(bytes = raw.len(), "no structure found in model response, using raw text");
    (GenerationResult::raw(raw), NormalizeSource::Raw)
}

fn parse_json_object(raw: &str) -> Result<GenerationResult, String> {
    let candidate = fenced_json()
        .captures(raw)
        .or_else(|| brace_span().captures(raw))
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| "no JSON object found".to_string())?;

    let value: serde_json::Value =
        serde_json::from_str(candidate.as_str()).map_err(|e| e.to_string())?;
    let object = value
        .as_object()
        .ok_or_else(|| "JSON value is not an object".to_string())?;

    let field = |name: &str, default: &str| {
        object
            .get(name)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(default)
            .to_string()
    };

    Ok(GenerationResult {
        explanation: field("explanation", DEFAULT_EXPLANATION),
        code: field("code", ""),
        language: field("language", DEFAULT_LANGUAGE),
    })
}

fn parse_code_fence(raw: &str) -> Option<GenerationResult> {
    let caps = code_fence().captures(raw)?;
    let language = caps
        .get(1)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE);
    let body = caps.get(2).map(|m| m.as_str()).unwrap_or("");

    Some(GenerationResult {
        explanation: DEFAULT_EXPLANATION.to_string(),
        code: body.trim().to_string(),
        language: language.to_string(),
    })
}
