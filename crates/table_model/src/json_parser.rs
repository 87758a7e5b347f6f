//! JSON table parsing
//!
//! Two shapes are accepted: an array of objects, where the keys of the
//! first object become the header, or an array of arrays.

use serde_json::Value;

use crate::error::{ParseError, ParseResult, TableError};

pub(crate) fn parse_json(text: &str) -> ParseResult<Vec<Vec<String>>> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(ParseError::UnsupportedShape(
            "top-level value must be an array".to_string(),
        ));
    };

    match items.first() {
        None => Err(TableError::Empty.into()),
        Some(Value::Object(first)) => {
            let headers: Vec<String> = first.keys().cloned().collect();
            let mut rows = vec![headers.clone()];
            for (idx, item) in items.iter().enumerate() {
                let Value::Object(map) = item else {
                    return Err(ParseError::UnsupportedShape(format!(
                        "item {idx} is not an object"
                    )));
                };
                let row = headers
                    .iter()
                    .map(|key| map.get(key).map_or(Ok(String::new()), cell_text))
                    .collect::<ParseResult<Vec<String>>>()?;
                rows.push(row);
            }
            Ok(rows)
        }
        Some(Value::Array(_)) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::Array(cells) => cells.iter().map(cell_text).collect::<ParseResult<Vec<String>>>(),
                _ => Err(ParseError::UnsupportedShape(format!(
                    "item {idx} is not an array"
                ))),
            })
            .collect(),
        Some(_) => Err(ParseError::UnsupportedShape(
            "array items must be objects or arrays".to_string(),
        )),
    }
}

fn cell_text(value: &Value) -> ParseResult<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Array(_) | Value::Object(_) => Err(ParseError::UnsupportedShape(
            "nested values are not allowed in table cells".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_of_objects_keeps_key_order() {
        let rows = parse_json(r#"[{"Month":"Jan","Sales":10,"Costs":4.5},{"Month":"Feb","Sales":20,"Costs":5}]"#)
            .unwrap();
        assert_eq!(rows[0], vec!["Month", "Sales", "Costs"]);
        assert_eq!(rows[1], vec!["Jan", "10", "4.5"]);
        assert_eq!(rows[2], vec!["Feb", "20", "5"]);
    }

    #[test]
    fn test_missing_key_becomes_empty_cell() {
        let rows = parse_json(r#"[{"A":"x","B":1},{"A":"y"}]"#).unwrap();
        assert_eq!(rows[2], vec!["y", ""]);
    }

    #[test]
    fn test_array_of_arrays() {
        let rows = parse_json(r#"[["Month","Sales"],["Jan",10]]"#).unwrap();
        assert_eq!(rows, vec![vec!["Month", "Sales"], vec!["Jan", "10"]]);
    }

    #[test]
    fn test_rejects_scalar_top_level() {
        assert!(matches!(
            parse_json("42"),
            Err(ParseError::UnsupportedShape(_))
        ));
    }

    #[test]
    fn test_rejects_nested_cells() {
        assert!(matches!(
            parse_json(r#"[{"A":"x","B":[1,2]}]"#),
            Err(ParseError::UnsupportedShape(_))
        ));
    }

    #[test]
    fn test_empty_array_is_empty_table() {
        assert!(matches!(
            parse_json("[]"),
            Err(ParseError::Invalid(TableError::Empty))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_json("[{"), Err(ParseError::Json(_))));
    }
}
