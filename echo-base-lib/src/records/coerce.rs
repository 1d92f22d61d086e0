//! Conversions from stringly-typed values to typed JSON values.
//!
//! Every conversion is total. When a value cannot be converted it comes back
//! as [`Coerced::Unchanged`] holding the original value, so callers can apply
//! the same conversion to fields whose source representation varies.

use serde_json::{Number, Value};

/// Delimiter used for list-valued fields such as `climate` or `hair_color`.
pub const DEFAULT_LIST_DELIMITER: &str = ",";

/// Outcome of a coercion attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// The value was a string and parsed into the target type.
    Converted(Value),

    /// The value was left as it was.
    Unchanged(Value),
}

impl Coerced {
    #[must_use]
    pub const fn is_converted(&self) -> bool {
        matches!(self, Self::Converted(_))
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Converted(value) | Self::Unchanged(value) => value,
        }
    }
}

/// Parses a string value as a base-10 integer.
#[must_use]
pub fn to_int(value: Value) -> Coerced {
    match value {
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(n) => Coerced::Converted(Value::from(n)),
            Err(_) => Coerced::Unchanged(Value::String(s)),
        },
        other => Coerced::Unchanged(other),
    }
}

/// Parses a string value as a floating point number.
///
/// Non-finite results have no JSON representation and leave the value unchanged.
#[must_use]
pub fn to_float(value: Value) -> Coerced {
    match value {
        Value::String(s) => match s.trim().parse::<f64>().ok().and_then(Number::from_f64) {
            Some(n) => Coerced::Converted(Value::Number(n)),
            None => Coerced::Unchanged(Value::String(s)),
        },
        other => Coerced::Unchanged(other),
    }
}

/// Splits `value` on `delimiter` and trims each part.
#[must_use]
pub fn to_list(value: &str, delimiter: &str) -> Vec<String> {
    value.split(delimiter).map(|part| part.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_int_parses_strings() {
        assert_eq!(to_int(json!("30")), Coerced::Converted(json!(30)));
        assert_eq!(to_int(json!(" 7200 ")), Coerced::Converted(json!(7200)));
        assert_eq!(to_int(json!("-4")), Coerced::Converted(json!(-4)));
        assert_eq!(to_int(json!("1000000000000")), Coerced::Converted(json!(1_000_000_000_000_i64)));
    }

    #[test]
    fn test_to_int_keeps_unparseable_strings() {
        assert_eq!(to_int(json!("unknown")), Coerced::Unchanged(json!("unknown")));
        assert_eq!(to_int(json!("1,000")), Coerced::Unchanged(json!("1,000")));
        assert_eq!(to_int(json!("12.5")), Coerced::Unchanged(json!("12.5")));
        assert_eq!(to_int(json!("")), Coerced::Unchanged(json!("")));
    }

    #[test]
    fn test_to_int_is_idempotent_on_non_strings() {
        assert_eq!(to_int(json!(30)), Coerced::Unchanged(json!(30)));
        assert_eq!(to_int(Value::Null), Coerced::Unchanged(Value::Null));
        assert_eq!(to_int(json!(["1"])), Coerced::Unchanged(json!(["1"])));
    }

    #[test]
    fn test_to_float_parses_strings() {
        assert_eq!(to_float(json!("1.5")), Coerced::Converted(json!(1.5)));
        assert_eq!(to_float(json!("1")), Coerced::Converted(json!(1.0)));
        assert_eq!(to_float(json!("34.37")), Coerced::Converted(json!(34.37)));
    }

    #[test]
    fn test_to_float_keeps_unparseable_strings() {
        assert_eq!(to_float(json!("1 standard")), Coerced::Unchanged(json!("1 standard")));
        assert_eq!(to_float(json!("inf")), Coerced::Unchanged(json!("inf")));
        assert_eq!(to_float(json!("NaN")), Coerced::Unchanged(json!("NaN")));
        assert!(!to_float(json!("n/a")).is_converted());
    }

    #[test]
    fn test_to_float_is_idempotent_on_non_strings() {
        assert_eq!(to_float(json!(0.5)), Coerced::Unchanged(json!(0.5)));
        assert_eq!(to_float(json!(2)), Coerced::Unchanged(json!(2)));
    }

    #[test]
    fn test_to_list_splits_and_trims() {
        assert_eq!(to_list("blond, auburn, white", DEFAULT_LIST_DELIMITER), ["blond", "auburn", "white"]);
        assert_eq!(to_list("frozen", DEFAULT_LIST_DELIMITER), ["frozen"]);
        assert_eq!(to_list("a;b ; c", ";"), ["a", "b", "c"]);
    }

    #[test]
    fn test_to_list_keeps_empty_parts() {
        assert_eq!(to_list("", DEFAULT_LIST_DELIMITER), [""]);
        assert_eq!(to_list("a,,b", DEFAULT_LIST_DELIMITER), ["a", "", "b"]);
    }

    #[test]
    fn test_into_value() {
        assert_eq!(to_int(json!("3")).into_value(), json!(3));
        assert_eq!(to_int(json!("x")).into_value(), json!("x"));
    }
}
