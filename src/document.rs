//! Rendering of one data row into a JSON or text document

use crate::types::OutputFormat;
use indexmap::IndexMap;

/// Line separator used between `header: value` lines
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
/// Line separator used between `header: value` lines
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Pair header names with row values by position
///
/// Stops at the shorter of the two slices: missing values produce no pair and
/// values beyond the last header are dropped.
pub fn pair_fields<'a>(
    headers: &'a [String],
    values: &'a [String],
) -> impl Iterator<Item = (&'a str, &'a str)> {
    headers
        .iter()
        .zip(values.iter())
        .map(|(header, value)| (header.as_str(), value.as_str()))
}

/// Render a row as an indented JSON object in header order
pub fn render_json(headers: &[String], values: &[String]) -> serde_json::Result<String> {
    let object: IndexMap<&str, &str> = pair_fields(headers, values).collect();
    serde_json::to_string_pretty(&object)
}

/// Render a row as `header: value` lines
pub fn render_text(headers: &[String], values: &[String]) -> String {
    let mut out = String::with_capacity(64);
    for (i, (header, value)) in pair_fields(headers, values).enumerate() {
        if i > 0 {
            out.push_str(LINE_SEPARATOR);
        }
        out.push_str(header);
        out.push_str(": ");
        out.push_str(value);
    }
    out
}

/// Render a row in the requested format
pub fn render(
    format: OutputFormat,
    headers: &[String],
    values: &[String],
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => render_json(headers, values),
        OutputFormat::Text => Ok(render_text(headers, values)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_json_round_trip() {
        let json = render_json(&strings(&["name", "age"]), &strings(&["Ann", "30"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value, serde_json::json!({"name": "Ann", "age": "30"}));
    }

    #[test]
    fn test_json_is_indented_in_header_order() {
        let json = render_json(&strings(&["z", "a"]), &strings(&["1", "2"])).unwrap();
        assert_eq!(json, "{\n  \"z\": \"1\",\n  \"a\": \"2\"\n}");
    }

    #[test]
    fn test_json_values_stay_strings() {
        let json = render_json(&strings(&["n", "flag"]), &strings(&["42", "true"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["n"], serde_json::Value::String("42".to_string()));
        assert_eq!(value["flag"], serde_json::Value::String("true".to_string()));
    }

    #[test]
    fn test_text() {
        let text = render_text(&strings(&["name", "age"]), &strings(&["Ann", "30"]));
        assert_eq!(text, format!("name: Ann{}age: 30", LINE_SEPARATOR));
    }

    #[test]
    fn test_short_row_truncates() {
        let headers = strings(&["a", "b", "c", "d", "e"]);
        let values = strings(&["1", "2", "3"]);

        assert_eq!(pair_fields(&headers, &values).count(), 3);

        let json = render_json(&headers, &values).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 3);
        assert!(value.get("d").is_none());
    }

    #[test]
    fn test_long_row_drops_extras() {
        let headers = strings(&["a", "b"]);
        let values = strings(&["1", "2", "3", "4"]);

        let text = render(OutputFormat::Text, &headers, &values).unwrap();
        assert_eq!(text, format!("a: 1{}b: 2", LINE_SEPARATOR));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let json = render_json(&strings(&["quote"]), &strings(&["say \"hi\"\nbye"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["quote"], "say \"hi\"\nbye");
    }
}
