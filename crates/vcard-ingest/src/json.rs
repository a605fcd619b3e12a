//! JSON input: a top-level array of objects, or a stream of objects one per
//! line.

use std::collections::HashMap;

use serde_json::{Deserializer, Map, Value};

use crate::error::{IngestError, Result};
use crate::table::{Cells, RawTable, is_blank, normalize_cell};

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => normalize_cell(text),
        other => Some(other.to_string()),
    }
}

fn push_object(objects: &mut Vec<Map<String, Value>>, value: Value) -> Result<()> {
    match value {
        Value::Object(object) => objects.push(object),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(object) => objects.push(object),
                    other => {
                        return Err(IngestError::JsonShape {
                            found: value_kind(&other),
                        });
                    }
                }
            }
        }
        other => {
            return Err(IngestError::JsonShape {
                found: value_kind(&other),
            });
        }
    }
    Ok(())
}

/// Parses JSON records into a table.
///
/// Headers are the union of object keys in first-seen order; a key missing
/// from an object, or set to `null`, becomes the null sentinel.
pub fn read_json(text: &str) -> Result<RawTable> {
    let mut objects = Vec::new();
    for value in Deserializer::from_str(text).into_iter::<Value>() {
        push_object(&mut objects, value?)?;
    }

    let mut headers: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for object in &objects {
        for key in object.keys() {
            positions.entry(key.clone()).or_insert_with(|| {
                headers.push(key.clone());
                headers.len() - 1
            });
        }
    }

    let rows = objects
        .iter()
        .map(|object| {
            let mut cells: Cells = vec![None; headers.len()];
            for (key, value) in object {
                if let Some(&idx) = positions.get(key) {
                    cells[idx] = cell_text(value);
                }
            }
            cells
        })
        .filter(|cells| !is_blank(cells))
        .collect();
    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_of_objects() {
        let table = read_json(
            r#"[{"Nombre": "Ana", "Teléfono": 22221234}, {"Nombre": "Luis", "Email": null}]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        let phone = table.headers.iter().position(|h| h == "Teléfono").unwrap();
        let email = table.headers.iter().position(|h| h == "Email").unwrap();
        assert_eq!(table.rows[0][phone].as_deref(), Some("22221234"));
        assert_eq!(table.rows[1][phone], None);
        assert_eq!(table.rows[1][email], None);
    }

    #[test]
    fn newline_delimited_objects() {
        let table = read_json("{\"name\": \"Ana\"}\n{\"name\": \"Luis\"}\n\n").unwrap();
        assert_eq!(table.headers, vec!["name"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn scalars_are_rejected() {
        let err = read_json("[1, 2]").unwrap_err();
        assert!(matches!(err, IngestError::JsonShape { found: "number" }));
        assert!(matches!(read_json("{"), Err(IngestError::Json { .. })));
    }

    #[test]
    fn empty_document_is_an_empty_table() {
        assert!(read_json("  ").unwrap().is_empty());
    }
}
