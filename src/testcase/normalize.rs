use crate::testcase::model::TestCaseRecord;
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

static UNICODE_ESCAPES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\\u[0-9A-Fa-f]{4})+").unwrap());

const ID_KEYS: [&str; 2] = ["id", "Id"];
const REQUIREMENT_KEYS: [&str; 2] = ["requirement", "Requirement"];
const TITLE_KEYS: [&str; 2] = ["title", "Title"];
const STEPS_KEYS: [&str; 2] = ["steps", "Steps"];
const EXPECTED_KEYS: [&str; 2] = ["expected", "Expected"];
const FRAMEWORK_KEYS: [&str; 2] = ["framework", "Framework"];
const SCRIPT_CODE_KEYS: [&str; 2] = ["scriptCode", "ScriptCode"];
const CREATED_AT_KEYS: [&str; 2] = ["createdAt", "CreatedAt"];
const LATENCY_MS_KEYS: [&str; 2] = ["latencyMs", "LatencyMs"];
const PROMPT_TOKENS_KEYS: [&str; 2] = ["promptTokens", "PromptTokens"];
const COMPLETION_TOKENS_KEYS: [&str; 2] = ["completionTokens", "CompletionTokens"];
const TOTAL_TOKENS_KEYS: [&str; 2] = ["totalTokens", "TotalTokens"];
const TOTAL_DURATION_MS_KEYS: [&str; 2] = ["totalDurationMs", "TotalDurationMs"];
const PROMPT_EVAL_DURATION_MS_KEYS: [&str; 2] = ["promptEvalDurationMs", "PromptEvalDurationMs"];
const EVAL_DURATION_MS_KEYS: [&str; 2] = ["evalDurationMs", "EvalDurationMs"];

/// Undoes backslash escaping left over from the backend's JSON round trip.
///
/// Replacements run in a fixed order and the `\\` collapse runs last, so text
/// holding literal backslashes that are not escapes (`C:\new`) is decoded too.
pub fn decode_escaped_text(value: &str) -> String {
    if value.is_empty() {
        return value.to_string();
    }
    let decoded = UNICODE_ESCAPES.replace_all(value, |caps: &Captures| decode_utf16_run(&caps[0]));
    decoded
        .replace("\\r\\n", "\n")
        .replace("\\n", "\n")
        .replace("\\t", "\t")
        .replace("\\\"", "\"")
        .replace("\\'", "'")
        .replace("\\\\", "\\")
        .trim()
        .to_string()
}

// Consecutive escapes are decoded together so surrogate pairs survive.
fn decode_utf16_run(run: &str) -> String {
    let units = run
        .split("\\u")
        .filter(|hex| !hex.is_empty())
        .filter_map(|hex| u16::from_str_radix(hex, 16).ok());
    char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Steps arrive either as an array or as a JSON-encoded array inside a string.
pub fn normalize_steps(steps: Option<&Value>) -> Vec<String> {
    match steps {
        Some(Value::Array(items)) => items.iter().map(step_text).collect(),
        Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Array(items)) => items.iter().map(step_text).collect(),
            _ => vec![],
        },
        _ => vec![],
    }
}

fn step_text(step: &Value) -> String {
    match step {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Numeric coercion for telemetry fields; anything unusable becomes 0.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let number = match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) if text.trim().is_empty() => 0.0,
        Some(Value::String(text)) => parse_numeric_text(text.trim()),
        Some(Value::Bool(flag)) => {
            if *flag {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };
    if number.is_finite() {
        number
    } else {
        0.0
    }
}

// Accepts decimal text plus unsigned 0x/0o/0b literals.
fn parse_numeric_text(text: &str) -> f64 {
    let prefix = text.get(..2).map(str::to_ascii_lowercase);
    let radix = match prefix.as_deref() {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => return text.parse::<f64>().unwrap_or(0.0),
    };
    u64::from_str_radix(&text[2..], radix)
        .map(|value| value as f64)
        .unwrap_or(0.0)
}

/// First candidate key holding a non-null value.
fn pick<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(key))
        .find(|value| !value.is_null())
}

fn plain_text(raw: &Value, keys: &[&str]) -> String {
    match pick(raw, keys) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn decoded_text(raw: &Value, keys: &[&str]) -> String {
    decode_escaped_text(&plain_text(raw, keys))
}

fn number(raw: &Value, keys: &[&str]) -> f64 {
    coerce_number(pick(raw, keys))
}

pub fn normalize_record(raw: &Value) -> TestCaseRecord {
    TestCaseRecord::builder()
        .id(number(raw, &ID_KEYS) as i64)
        .requirement(decoded_text(raw, &REQUIREMENT_KEYS))
        .title(decoded_text(raw, &TITLE_KEYS))
        .steps(normalize_steps(pick(raw, &STEPS_KEYS)))
        .expected(decoded_text(raw, &EXPECTED_KEYS))
        .framework(plain_text(raw, &FRAMEWORK_KEYS))
        .script_code(decoded_text(raw, &SCRIPT_CODE_KEYS))
        .created_at(plain_text(raw, &CREATED_AT_KEYS))
        .latency_ms(number(raw, &LATENCY_MS_KEYS))
        .prompt_tokens(number(raw, &PROMPT_TOKENS_KEYS))
        .completion_tokens(number(raw, &COMPLETION_TOKENS_KEYS))
        .total_tokens(number(raw, &TOTAL_TOKENS_KEYS))
        .total_duration_ms(number(raw, &TOTAL_DURATION_MS_KEYS))
        .prompt_eval_duration_ms(number(raw, &PROMPT_EVAL_DURATION_MS_KEYS))
        .eval_duration_ms(number(raw, &EVAL_DURATION_MS_KEYS))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_common_escapes_and_trims() {
        let raw = r#"  Line one\nLine two\tTabbed \"quoted\" back\\slash caf\u00e9  "#;
        assert_eq!(
            decode_escaped_text(raw),
            "Line one\nLine two\tTabbed \"quoted\" back\\slash café"
        );
    }

    #[test]
    fn decodes_crlf_and_single_quotes() {
        assert_eq!(decode_escaped_text(r"a\r\nb \'c\'"), "a\nb 'c'");
    }

    #[test]
    fn empty_input_is_returned_unchanged() {
        assert_eq!(decode_escaped_text(""), "");
    }

    #[test]
    fn whitespace_only_input_is_trimmed() {
        assert_eq!(decode_escaped_text("   "), "");
    }

    #[test]
    fn decodes_surrogate_pairs() {
        assert_eq!(decode_escaped_text(r"ok \uD83D\uDE00"), "ok 😀");
        assert_eq!(decode_escaped_text(r"\u0041\uD83D\uDE00\u0042"), "A😀B");
        assert_eq!(decode_escaped_text(r"lone \uD83D!"), "lone \u{FFFD}!");
    }

    #[test]
    fn literal_backslashes_are_decoded_too() {
        // "\n" inside a Windows path is indistinguishable from an escape
        assert_eq!(decode_escaped_text(r"C:\new\folder"), "C:\new\\folder");
    }

    #[test]
    fn double_backslash_collapses_after_other_escapes() {
        assert_eq!(decode_escaped_text(r"a\\nb"), "a\\\nb");
    }

    #[test]
    fn steps_array_is_returned_unchanged() {
        let steps = json!(["a", "b"]);
        assert_eq!(normalize_steps(Some(&steps)), vec!["a", "b"]);
    }

    #[test]
    fn steps_json_string_is_parsed() {
        let steps = json!(r#"["step1","step2"]"#);
        assert_eq!(normalize_steps(Some(&steps)), vec!["step1", "step2"]);
    }

    #[test]
    fn malformed_steps_become_empty() {
        assert!(normalize_steps(Some(&json!("not json"))).is_empty());
        assert!(normalize_steps(Some(&json!(r#"{"a":1}"#))).is_empty());
        assert!(normalize_steps(Some(&json!(42))).is_empty());
        assert!(normalize_steps(Some(&Value::Null)).is_empty());
        assert!(normalize_steps(None).is_empty());
    }

    #[test]
    fn non_text_steps_are_kept_as_json_text() {
        let steps = json!(["open", 2, {"click": "submit"}]);
        assert_eq!(
            normalize_steps(Some(&steps)),
            vec!["open".to_string(), "2".to_string(), r#"{"click":"submit"}"#.to_string()]
        );
    }

    #[test]
    fn coerces_numbers() {
        assert_eq!(coerce_number(Some(&json!(12))), 12.0);
        assert_eq!(coerce_number(Some(&json!(1.5))), 1.5);
        assert_eq!(coerce_number(Some(&json!(" 42 "))), 42.0);
        assert_eq!(coerce_number(Some(&json!("abc"))), 0.0);
        assert_eq!(coerce_number(Some(&json!("NaN"))), 0.0);
        assert_eq!(coerce_number(Some(&json!(true))), 1.0);
        assert_eq!(coerce_number(Some(&json!("0x10"))), 16.0);
        assert_eq!(coerce_number(Some(&json!("0B101"))), 5.0);
        assert_eq!(coerce_number(Some(&json!("0o17"))), 15.0);
        assert_eq!(coerce_number(Some(&json!("0x"))), 0.0);
        assert_eq!(coerce_number(Some(&json!("-0x10"))), 0.0);
        assert_eq!(coerce_number(Some(&json!("1e3"))), 1000.0);
        assert_eq!(coerce_number(Some(&json!([1]))), 0.0);
        assert_eq!(coerce_number(None), 0.0);
    }

    #[test]
    fn lower_camel_key_takes_precedence() {
        let raw = json!({"id": 1, "requirement": "lower", "Requirement": "Pascal"});
        assert_eq!(normalize_record(&raw).requirement, "lower");
    }

    #[test]
    fn null_lower_camel_value_falls_back_to_pascal() {
        let raw = json!({"id": 1, "title": null, "Title": "Pascal title"});
        assert_eq!(normalize_record(&raw).title, "Pascal title");
    }

    #[test]
    fn normalizes_pascal_case_record() {
        let raw = json!({
            "Id": 7,
            "Requirement": "User resets password\\n",
            "Title": "Reset via \\\"email\\\"",
            "Steps": "[\"Open login\",\"Click forgot\"]",
            "Expected": "Mail is sent",
            "Framework": "Cypress",
            "ScriptCode": "cy.visit('/login');\\ncy.get('#forgot').click();",
            "CreatedAt": "2025-01-02T10:20:30Z",
            "LatencyMs": "1500",
            "PromptTokens": 120,
            "CompletionTokens": 80,
            "TotalTokens": 200,
            "TotalDurationMs": 1400.5,
            "PromptEvalDurationMs": null,
            "EvalDurationMs": "oops"
        });
        let record = normalize_record(&raw);
        assert_eq!(record.id, 7);
        assert_eq!(record.requirement, "User resets password");
        assert_eq!(record.title, "Reset via \"email\"");
        assert_eq!(record.steps, vec!["Open login", "Click forgot"]);
        assert_eq!(record.expected, "Mail is sent");
        assert_eq!(record.framework, "Cypress");
        assert_eq!(record.script_code, "cy.visit('/login');\ncy.get('#forgot').click();");
        assert_eq!(record.created_at, "2025-01-02T10:20:30Z");
        assert_eq!(record.latency_ms, 1500.0);
        assert_eq!(record.prompt_tokens, 120.0);
        assert_eq!(record.completion_tokens, 80.0);
        assert_eq!(record.total_tokens, 200.0);
        assert_eq!(record.total_duration_ms, 1400.5);
        assert_eq!(record.prompt_eval_duration_ms, 0.0);
        assert_eq!(record.eval_duration_ms, 0.0);
    }

    #[test]
    fn missing_fields_default_to_empty_and_zero() {
        let record = normalize_record(&json!({"id": 3}));
        assert_eq!(record, TestCaseRecord::builder().id(3).build());
    }
}
