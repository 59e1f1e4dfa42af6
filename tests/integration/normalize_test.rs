//! Response Normalization Integration Tests
//!
//! Feeds the kinds of text real models return through `normalize`.

use ketu_llm::normalize::{DEFAULT_EXPLANATION, RAW_FALLBACK_EXPLANATION};
use ketu_llm::{normalize, normalize_with_source, GenerationResult, NormalizeSource};

// ============================================================================
// Structured JSON
// ============================================================================

#[test]
fn test_chatty_json_answer() {
    let raw = r#"Certainly! Below is a function that reverses a string.

```json
{
  "explanation": "Uses slicing with a negative step to reverse the string.",
  "code": "def reverse(s):\n    return s[::-1]",
  "language": "python"
}
```

Feel free to ask if you need anything else!"#;

    assert_eq!(
        normalize(raw),
        GenerationResult {
            explanation: "Uses slicing with a negative step to reverse the string.".to_string(),
            code: "def reverse(s):\n    return s[::-1]".to_string(),
            language: "python".to_string(),
        }
    );
}

#[test]
fn test_unfenced_json_with_nested_braces() {
    let raw = r#"{"explanation": "Counts words", "code": "fn count(s: &str) -> usize { s.split_whitespace().count() }", "language": "rust"}"#;
    let result = normalize(raw);
    assert_eq!(result.language, "rust");
    assert!(result.code.contains("split_whitespace"));
}

// ============================================================================
// Code fences
// ============================================================================

#[test]
fn test_python_fence_without_json() {
    let body = "\nnumbers = [3, 1, 2]\nnumbers.sort()\nprint(numbers)\n";
    let raw = format!("Here is how to sort a list:\n```python{}```\nThis sorts in place.", body);

    let (result, source) = normalize_with_source(&raw);
    assert_eq!(source, NormalizeSource::CodeFence);
    assert_eq!(result.code, body.trim());
    assert_eq!(result.language, "python");
    assert_eq!(result.explanation, DEFAULT_EXPLANATION);
}

#[test]
fn test_first_of_several_fences() {
    let raw = "Install it:\n```bash\nnpm install lodash\n```\nThen use it:\n```javascript\n_.sortBy(list)\n```";
    let result = normalize(raw);
    assert_eq!(result.language, "bash");
    assert_eq!(result.code, "npm install lodash");
}

// ============================================================================
// Raw fallback
// ============================================================================

#[test]
fn test_prose_only_answer() {
    let raw = "You can sort a list in Python by calling its sort method.";
    let first = normalize(raw);
    assert_eq!(first.code, raw);
    assert_eq!(first.language, "text");
    assert_eq!(first.explanation, RAW_FALLBACK_EXPLANATION);

    // Normalizing the fallback code again lands on the same fallback
    assert_eq!(normalize(&first.code), first);
}
