use serde_json::{json, Value};

/// JSON Schema of a raw dataset document: an object whose values are arrays
/// of row objects. Cell types are unconstrained; odd cells
/// become empty values during conversion.
pub fn dataset_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": {
            "type": "array",
            "items": {"type": "object"}
        }
    })
}

/// Validate data against JSON Schema
/// Returns Ok(()) if valid, Err with list of validation errors if invalid
pub fn validate_against_schema(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    // Compile the JSON Schema
    let compiled = jsonschema::validator_for(schema)
        .map_err(|e| vec![format!("Schema compilation error: {}", e)])?;

    match compiled.validate(data) {
        Ok(()) => Ok(()),
        Err(error) => {
            // Format validation error with path
            let path_str = error.instance_path.to_string();
            let location = if path_str.is_empty() {
                "root".to_string()
            } else {
                path_str
            };
            Err(vec![format!("{} at {}", error, location)])
        }
    }
}

/// Check the shape of a dataset document before converting it
pub fn validate_dataset_shape(data: &Value) -> Result<(), Vec<String>> {
    validate_against_schema(&dataset_schema(), data)
}
