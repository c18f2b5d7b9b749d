/// Validation error with field and message
#[derive(Debug)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Parse one `name=value` argument
pub fn parse_assignment(input: &str) -> Result<(String, String), ValidationError> {
    let Some((name, value)) = input.split_once('=') else {
        return Err(ValidationError {
            field: input.to_string(),
            message: "Expected 'name=value'".to_string(),
        });
    };

    let name = name.trim();
    let value = value.trim();
    if name.is_empty() {
        return Err(ValidationError {
            field: input.to_string(),
            message: "Name cannot be empty".to_string(),
        });
    }
    if value.is_empty() {
        return Err(ValidationError {
            field: input.to_string(),
            message: "Value cannot be empty".to_string(),
        });
    }

    Ok((name.to_string(), value.to_string()))
}

/// Parse repeated `name=value` arguments, keeping their order
pub fn parse_assignments(inputs: &[String]) -> Result<Vec<(String, String)>, ValidationError> {
    inputs.iter().map(|input| parse_assignment(input)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("ST=0").unwrap(),
            ("ST".to_string(), "0".to_string())
        );
        assert_eq!(
            parse_assignment(" weapons = data/w.csv ").unwrap(),
            ("weapons".to_string(), "data/w.csv".to_string())
        );
    }

    #[test]
    fn test_value_may_contain_equals() {
        assert_eq!(
            parse_assignment("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
    }

    #[test]
    fn test_invalid_assignments() {
        assert_eq!(parse_assignment("ST").unwrap_err().message, "Expected 'name=value'");
        assert_eq!(parse_assignment("=0").unwrap_err().message, "Name cannot be empty");
        assert_eq!(parse_assignment("ST=").unwrap_err().message, "Value cannot be empty");
    }

    #[test]
    fn test_parse_assignments_stops_at_first_error() {
        let inputs = vec!["a=1".to_string(), "bad".to_string()];
        assert_eq!(parse_assignments(&inputs).unwrap_err().field, "bad");
    }
}
