//! Label/description template substitution.
//!
//! Presentation-supplied titles may interpolate values from the current
//! property bag: `"Order for ${formData.customer.name}"`. Evaluation is a
//! plain scan for `${dotted.path}` markers against a JSON bag; no
//! expression language.

use crate::error::TemplateError;
use serde_json::Value;

/// The marker that makes a string template-capable.
const MARKER: &str = "${";

/// Returns true when `input` contains an interpolation marker.
#[must_use]
pub fn has_template(input: &str) -> bool {
    input.contains(MARKER)
}

/// Substitutes every `${dotted.path}` in `input` with the value at that
/// path in `bag`.
///
/// Scalar values substitute their natural text; composite values
/// substitute compact JSON.
///
/// # Errors
///
/// [`TemplateError::Unterminated`] for an unclosed marker,
/// [`TemplateError::MissingValue`] when a path has no value in the bag.
pub fn render_template(input: &str, bag: &Value) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find(MARKER) {
        out.push_str(&rest[..start]);
        let after_marker = &rest[start + MARKER.len()..];
        let Some(end) = after_marker.find('}') else {
            return Err(TemplateError::Unterminated(input.to_string()));
        };
        let path = after_marker[..end].trim();
        let value = lookup(bag, path)
            .ok_or_else(|| TemplateError::MissingValue(path.to_string()))?;
        out.push_str(&stringify(value));
        rest = &after_marker[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Walks a dotted path through objects (and numeric segments through
/// arrays).
fn lookup<'a>(bag: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = bag;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_strings_pass_through() {
        let bag = json!({});
        assert_eq!(render_template("Title", &bag).unwrap(), "Title");
        assert!(!has_template("Title"));
    }

    #[test]
    fn substitutes_dotted_paths() {
        let bag = json!({ "formData": { "customer": { "name": "ACME" } } });
        let out = render_template("Order for ${formData.customer.name}", &bag).unwrap();
        assert_eq!(out, "Order for ACME");
    }

    #[test]
    fn substitutes_multiple_markers() {
        let bag = json!({ "a": 1, "b": "two" });
        assert_eq!(render_template("${a}-${b}", &bag).unwrap(), "1-two");
    }

    #[test]
    fn array_index_segments() {
        let bag = json!({ "items": ["x", "y"] });
        assert_eq!(render_template("${items.1}", &bag).unwrap(), "y");
    }

    #[test]
    fn missing_path_is_an_error() {
        let bag = json!({ "a": 1 });
        assert_eq!(
            render_template("${nope.here}", &bag).unwrap_err(),
            TemplateError::MissingValue("nope.here".to_string())
        );
    }

    #[test]
    fn unterminated_marker_is_an_error() {
        let bag = json!({});
        assert!(matches!(
            render_template("${open", &bag).unwrap_err(),
            TemplateError::Unterminated(_)
        ));
    }
}
