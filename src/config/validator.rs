use thiserror::Error;

use crate::config::{LoggingSettings, SchemaSettings, Settings};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_schemas(&settings.schemas) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_logging(&settings.logging) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_schemas(schemas: &SchemaSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (idx, path) in schemas.paths.iter().enumerate() {
            if path.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!("schemas.paths[{}]", idx)));
            } else if let Err(e) = glob::Pattern::new(path) {
                errors.push(ValidationError::InvalidValue {
                    field: format!("schemas.paths[{}]", idx),
                    reason: e.to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_logging(logging: &LoggingSettings) -> Result<(), Vec<ValidationError>> {
        if logging.level.parse::<tracing::Level>().is_err() {
            return Err(vec![ValidationError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!(
                    "'{}' is not one of trace, debug, info, warn, error",
                    logging.level
                ),
            }]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputSettings;

    fn settings(paths: &[&str], level: &str) -> Settings {
        Settings {
            schemas: SchemaSettings {
                paths: paths.iter().map(|p| p.to_string()).collect(),
            },
            output: OutputSettings { pretty: true },
            logging: LoggingSettings {
                level: level.to_string(),
            },
        }
    }

    #[test]
    fn test_valid_settings() {
        assert!(ConfigValidator::validate(&settings(&["a.json", "schemas/*.yaml"], "debug")).is_ok());
    }

    #[test]
    fn test_empty_path_rejected() {
        let errors = ConfigValidator::validate(&settings(&["a.json", " "], "info")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::MissingField(_)));
    }

    #[test]
    fn test_repeated_path_accepted() {
        assert!(ConfigValidator::validate(&settings(&["a.json", "a.json", "*.json"], "info")).is_ok());
    }

    #[test]
    fn test_reports_all_errors() {
        let errors = ConfigValidator::validate(&settings(&["", "[bad"], "loud")).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
