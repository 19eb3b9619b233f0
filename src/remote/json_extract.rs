use serde::de::DeserializeOwned;

use super::RemoteError;

/// Find the first balanced JSON object embedded in free text.
///
/// The reasoning endpoint returns prose with a JSON object somewhere inside
/// it. This scans for the first `{`, then tracks brace depth while honoring
/// string literals and escapes, and returns the slice up to the matching
/// `}`. Returns None when no balanced object exists (e.g. truncated output).
pub fn first_json_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract and deserialize the first balanced JSON object in free text
pub fn parse_embedded<T: DeserializeOwned>(text: &str) -> Result<T, RemoteError> {
    let object = first_json_object(text)
        .ok_or_else(|| RemoteError::Parse("no balanced JSON object in response".to_string()))?;
    serde_json::from_str(object).map_err(|e| RemoteError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_object() {
        assert_eq!(first_json_object(r#"{"a": 1}"#), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_object_wrapped_in_prose() {
        let text = r#"Here is my analysis: {"is_emergency": true, "confidence": 90} I hope it helps."#;
        assert_eq!(
            first_json_object(text),
            Some(r#"{"is_emergency": true, "confidence": 90}"#)
        );
    }

    #[test]
    fn test_nested_objects() {
        let text = r#"result: {"outer": {"inner": 1}, "b": 2} trailing"#;
        assert_eq!(first_json_object(text), Some(r#"{"outer": {"inner": 1}, "b": 2}"#));
    }

    #[test]
    fn test_braces_inside_strings() {
        let text = r#"{"note": "a } inside \" a string {"} rest"#;
        assert_eq!(first_json_object(text), Some(r#"{"note": "a } inside \" a string {"}"#));
    }

    #[test]
    fn test_multiple_objects_picks_first() {
        let text = r#"{"first": 1} and then {"second": 2}"#;
        assert_eq!(first_json_object(text), Some(r#"{"first": 1}"#));
    }

    #[test]
    fn test_truncated_object() {
        assert_eq!(first_json_object(r#"prefix {"a": {"b": 1}"#), None);
    }

    #[test]
    fn test_no_object() {
        assert_eq!(first_json_object("no json here"), None);
        assert_eq!(first_json_object(""), None);
    }

    #[test]
    fn test_parse_embedded() {
        #[derive(serde::Deserialize, Debug)]
        struct V {
            confidence: u8,
        }

        let v: V = parse_embedded(r#"text {"confidence": 85} more"#).unwrap();
        assert_eq!(v.confidence, 85);

        let err = parse_embedded::<V>("nothing").unwrap_err();
        assert!(matches!(err, RemoteError::Parse(_)));

        // balanced but wrong shape is still a parse error
        let err = parse_embedded::<V>(r#"{"confidence": "not a number"}"#).unwrap_err();
        assert!(matches!(err, RemoteError::Parse(_)));
    }
}
