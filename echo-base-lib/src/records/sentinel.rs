use serde_json::Value;

/// Strings standing in for a datum that is not known or does not apply.
const SENTINELS: [&str; 2] = ["unknown", "n/a"];

/// Returns `true` if the value is a string meaning "unknown".
///
/// Comparison ignores case and surrounding whitespace. Values that are not
/// strings, including `null`, are never unknown.
#[must_use]
pub fn is_unknown(value: &Value) -> bool {
    value.as_str().is_some_and(|s| {
        let s = s.trim().to_lowercase();
        SENTINELS.contains(&s.as_str())
    })
}
