//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Concurrency above this tends to starve a single Chrome instance.
const HIGH_CONCURRENCY: usize = 32;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_batch(config, &mut result);
        Self::validate_marking(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.add_error(ValidationError::new("browser.debug_port", "Port cannot be 0"));
        }

        if config.browser.launch_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "browser.launch_timeout_ms",
                "launch_timeout_ms must be greater than 0",
            ));
        }

        if let Some(path) = &config.browser.chrome_path {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "browser.chrome_path",
                    format!("Chrome executable does not exist: {:?}", path),
                ));
            }
        }
    }

    fn validate_batch(config: &Config, result: &mut ValidationResult) {
        let batch = &config.batch;

        if batch.concurrency == 0 {
            result.add_error(ValidationError::new(
                "batch.concurrency",
                "concurrency must be greater than 0",
            ));
        }

        if batch.concurrency > HIGH_CONCURRENCY {
            result.add_warning(ValidationWarning::new(
                "batch.concurrency",
                format!(
                    "concurrency is very high (>{}), pages may time out",
                    HIGH_CONCURRENCY
                ),
            ));
        }

        if batch.total < -1 {
            result.add_error(ValidationError::new(
                "batch.total",
                "total must be -1 (all) or a non-negative count",
            ));
        }

        if batch.document_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "batch.document_timeout_secs",
                "document_timeout_secs must be greater than 0",
            ));
        }

        let settle_secs = (batch.settle_ms + 2 * batch.scroll_settle_ms) / 1000;
        if batch.document_timeout_secs > 0 && settle_secs >= batch.document_timeout_secs {
            result.add_warning(ValidationWarning::new(
                "batch.document_timeout_secs",
                "settle waits alone can exceed the document timeout",
            ));
        }
    }

    fn validate_marking(config: &Config, result: &mut ValidationResult) {
        if config.marking.depth < 0 {
            result.add_error(ValidationError::new(
                "marking.depth",
                format!("depth must be non-negative, not {}", config.marking.depth),
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', valid values: {:?}",
                    config.logging.level, LOG_LEVELS
                ),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
