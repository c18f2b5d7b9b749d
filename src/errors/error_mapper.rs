use sheetdex_core::{ConfigError, DatasetError};
use std::io::ErrorKind;

use crate::operations::ValidationError;

/// Map any front-end error to a user-facing message
/// Returns (title, message, details)
pub fn map_error(error: &anyhow::Error) -> (String, String, String) {
    if let Some(err) = error.downcast_ref::<DatasetError>() {
        return map_dataset_error(err);
    }
    if let Some(err) = error.downcast_ref::<ConfigError>() {
        return map_config_error(err);
    }
    if let Some(err) = error.downcast_ref::<ValidationError>() {
        return (
            "Invalid Argument".to_string(),
            format!("Could not parse {}.", err.field),
            err.message.clone(),
        );
    }

    let details = error
        .chain()
        .skip(1)
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    ("Error".to_string(), error.to_string(), details)
}

/// Map dataset errors to user-facing messages.
/// Every variant means the dataset is unavailable for this session.
/// Returns (title, message, details)
pub fn map_dataset_error(error: &DatasetError) -> (String, String, String) {
    match error {
        DatasetError::Io(err) if err.kind() == ErrorKind::NotFound => (
            "Dataset Not Found".to_string(),
            "The dataset file could not be found.".to_string(),
            "Please verify the path and that you have permission to read it.".to_string(),
        ),
        DatasetError::Io(err) if err.kind() == ErrorKind::PermissionDenied => (
            "Permission Denied".to_string(),
            "Permission denied.".to_string(),
            err.to_string(),
        ),
        DatasetError::Io(err) => (
            "Dataset Unavailable".to_string(),
            "Failed to read the dataset.".to_string(),
            err.to_string(),
        ),
        DatasetError::Transport(err) => (
            "Dataset Unavailable".to_string(),
            "The dataset could not be downloaded.".to_string(),
            err.to_string(),
        ),
        DatasetError::Status(code) => (
            "Dataset Unavailable".to_string(),
            format!("The server answered with HTTP {}.", code),
            "Check that the dataset URL is published and reachable.".to_string(),
        ),
        DatasetError::Malformed(details) => (
            "Malformed Dataset".to_string(),
            "The dataset is not a category-to-records document.".to_string(),
            details.clone(),
        ),
        DatasetError::Empty => (
            "Empty Dataset".to_string(),
            "The dataset contains no categories.".to_string(),
            String::new(),
        ),
        DatasetError::Csv(err) => (
            "Invalid CSV".to_string(),
            "A sheet export could not be parsed.".to_string(),
            err.to_string(),
        ),
    }
}

/// Map configuration errors to user-facing messages
/// Returns (title, message, details)
pub fn map_config_error(error: &ConfigError) -> (String, String, String) {
    match error {
        ConfigError::Io(err) => (
            "Config Not Readable".to_string(),
            "The configuration file could not be read.".to_string(),
            err.to_string(),
        ),
        ConfigError::Json(err) => (
            "Invalid Config".to_string(),
            "The configuration file is not valid JSON.".to_string(),
            err.to_string(),
        ),
        ConfigError::Invalid(errors) => (
            "Validation Error".to_string(),
            "The configuration table has validation errors.".to_string(),
            errors
                .iter()
                .enumerate()
                .map(|(i, e)| format!("  {}. {}", i + 1, e))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    }
}
