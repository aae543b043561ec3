//! Loose conversion of resolver output to identifiers.
//!
//! Resolvers are free to return identifiers as numbers, numeric strings or anything else JSON can
//! hold. Each element is converted the way a weakly typed host would cast it to an integer:
//! floats truncate toward zero, strings contribute their leading number, `true` is 1, and values
//! with no numeric reading are 0.
use serde_json::Value;

use crate::error::ResolutionFailure;
use crate::types::ObjectId;

/// Convert a resolver's return value to the identifiers it names.
///
/// A non-empty list, or a non-empty object whose values are taken in order, yields one identifier
/// per element. Anything else is a failure, which callers replace with the exclude-all sentinel.
pub(crate) fn object_ids_from_value(value: &Value) -> Result<Vec<ObjectId>, ResolutionFailure> {
    let elements: Vec<&Value> = match value {
        Value::Array(elements) => elements.iter().collect(),
        Value::Object(members) => members.values().collect(),
        Value::Null => return Err(ResolutionFailure::NotAList { found: "null" }),
        Value::Bool(_) => return Err(ResolutionFailure::NotAList { found: "a boolean" }),
        Value::Number(_) => return Err(ResolutionFailure::NotAList { found: "a number" }),
        Value::String(_) => return Err(ResolutionFailure::NotAList { found: "a string" }),
    };
    if elements.is_empty() {
        return Err(ResolutionFailure::Empty);
    }
    Ok(elements.into_iter().map(to_object_id).collect())
}

pub fn to_object_id(value: &Value) -> ObjectId {
    ObjectId(match value {
        Value::Null => 0,
        Value::Bool(flag) => i64::from(*flag),
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                integer
            } else if number.is_u64() {
                i64::MAX
            } else {
                number.as_f64().map_or(0, truncate)
            }
        }
        Value::String(text) => parse_leading_number(text),
        Value::Array(elements) => i64::from(!elements.is_empty()),
        Value::Object(members) => i64::from(!members.is_empty()),
    })
}

// `as` saturates at the i64 bounds and maps NaN to 0
#[allow(clippy::cast_possible_truncation)]
fn truncate(float: f64) -> i64 {
    float.trunc() as i64
}

/// The integer reading of the longest numeric prefix of `text`, after leading whitespace.
fn parse_leading_number(text: &str) -> i64 {
    let text = text.trim_start_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let integer_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let integer_digits = end - integer_start;

    let mut is_float = false;
    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while bytes.get(fraction_end).is_some_and(u8::is_ascii_digit) {
            fraction_end += 1;
        }
        if integer_digits > 0 || fraction_end > fraction_start {
            end = fraction_end;
            is_float = true;
        }
    }
    if integer_digits == 0 && !is_float {
        return 0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits_start = exponent_end;
        while bytes.get(exponent_end).is_some_and(u8::is_ascii_digit) {
            exponent_end += 1;
        }
        if exponent_end > exponent_digits_start {
            end = exponent_end;
            is_float = true;
        }
    }

    let number = &text[..end];
    if is_float {
        number.parse::<f64>().map_or(0, truncate)
    } else {
        number.parse::<i64>().unwrap_or_else(|_| {
            if number.starts_with('-') {
                i64::MIN
            } else {
                i64::MAX
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(values: &[i64]) -> Vec<ObjectId> {
        values.iter().copied().map(ObjectId).collect()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(to_object_id(&json!(42)), ObjectId(42));
        assert_eq!(to_object_id(&json!(-7)), ObjectId(-7));
        assert_eq!(to_object_id(&json!(12.9)), ObjectId(12));
        assert_eq!(to_object_id(&json!(-12.9)), ObjectId(-12));
        assert_eq!(to_object_id(&json!(u64::MAX)), ObjectId(i64::MAX));
    }

    #[test]
    fn test_strings() {
        let cases = [
            ("17", 17),
            ("  17", 17),
            ("17abc", 17),
            ("+5", 5),
            ("-5", -5),
            ("12.7", 12),
            (".5", 0),
            ("1e3", 1000),
            ("2E-1", 0),
            ("7e", 7),
            ("abc", 0),
            ("", 0),
            ("-", 0),
            ("99999999999999999999", i64::MAX),
        ];
        for (text, expected) in cases {
            assert_eq!(
                to_object_id(&json!(text)),
                ObjectId(expected),
                "converting {text:?}"
            );
        }
    }

    #[test]
    fn test_other_values() {
        assert_eq!(to_object_id(&json!(null)), ObjectId(0));
        assert_eq!(to_object_id(&json!(true)), ObjectId(1));
        assert_eq!(to_object_id(&json!(false)), ObjectId(0));
        assert_eq!(to_object_id(&json!([])), ObjectId(0));
        assert_eq!(to_object_id(&json!([9])), ObjectId(1));
        assert_eq!(to_object_id(&json!({"id": 9})), ObjectId(1));
    }

    #[test]
    fn test_lists_and_objects() {
        assert_eq!(
            object_ids_from_value(&json!([3, "1", 2.5])).unwrap(),
            ids(&[3, 1, 2])
        );
        assert_eq!(
            object_ids_from_value(&json!({"a": 8, "b": "9"})).unwrap(),
            ids(&[8, 9])
        );
    }

    #[test]
    fn test_unusable_values() {
        assert!(matches!(
            object_ids_from_value(&json!([])),
            Err(ResolutionFailure::Empty)
        ));
        assert!(matches!(
            object_ids_from_value(&json!({})),
            Err(ResolutionFailure::Empty)
        ));
        assert!(matches!(
            object_ids_from_value(&json!("1,2,3")),
            Err(ResolutionFailure::NotAList { found: "a string" })
        ));
        assert!(matches!(
            object_ids_from_value(&json!(null)),
            Err(ResolutionFailure::NotAList { found: "null" })
        ));
    }
}
