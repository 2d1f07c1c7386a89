use crate::request::ValidationError;
use std::path::PathBuf;

/// Library-level structured errors for urlredir.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: Box<fancy_regex::Error>,
	},

	#[error("Failed to match rule: {pattern}")]
	MatchFailed {
		pattern: String,
		#[source]
		source: Box<fancy_regex::Error>,
	},

	#[error(transparent)]
	Validation(#[from] ValidationError),

	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using urlredir's Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_invalid_regex_names_pattern() {
		let source = fancy_regex::Regex::new("(").unwrap_err();
		let err = Error::InvalidRegex {
			pattern: "(".to_string(),
			source: Box::new(source),
		};
		assert_eq!(err.to_string(), "Invalid regex pattern in rule: (");
		assert!(std::error::Error::source(&err).is_some());
	}

	#[test]
	fn test_validation_error_is_transparent() {
		let err: Error = ValidationError::MissingTestUrl.into();
		assert_eq!(err.to_string(), "Please input the test URL");
	}

	#[test]
	fn test_error_is_send_and_sync() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<Error>();
	}
}
