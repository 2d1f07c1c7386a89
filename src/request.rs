//! Validation of incoming check requests.
//!
//! A request arrives as four optional, already-decoded strings. Validation
//! turns it into a [`ValidatedRequest`] the decider can run without further
//! checks, or a [`ValidationError`] describing what the caller got wrong.

use crate::error::Result;
use crate::rules::{RedirectReport, Side, decide};
use serde::Deserialize;

/// Rejections produced before any rule is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	#[error("Please input the right side Type")]
	InvalidSide { value: String },

	#[error("Please input the right side Type")]
	MissingSide,

	#[error("Please input the test URL")]
	MissingTestUrl,
}

/// A raw check request, as read from a JSON line or command-line flags.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckRequest {
	#[serde(rename = "testUrl", default)]
	pub test_url: Option<String>,

	#[serde(default)]
	pub side: Option<String>,

	#[serde(rename = "clientRules", default)]
	pub client_rules: Option<String>,

	#[serde(rename = "agentRules", default)]
	pub agent_rules: Option<String>,
}

/// A request whose fields have all been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
	pub test_url: String,
	pub side: Side,
	pub client_rules: String,
	pub agent_rules: String,
}

impl CheckRequest {
	/// Check the side first, then the URL. Absent rule strings become empty.
	pub fn validate(self) -> std::result::Result<ValidatedRequest, ValidationError> {
		let side: Side = self.side.ok_or(ValidationError::MissingSide)?.parse()?;

		let test_url = match self.test_url {
			Some(url) if !url.is_empty() => url,
			_ => return Err(ValidationError::MissingTestUrl),
		};

		Ok(ValidatedRequest {
			test_url,
			side,
			client_rules: self.client_rules.unwrap_or_default(),
			agent_rules: self.agent_rules.unwrap_or_default(),
		})
	}
}

impl ValidatedRequest {
	pub fn decide(&self) -> Result<RedirectReport> {
		decide(
			&self.test_url,
			&self.client_rules,
			&self.agent_rules,
			self.side,
		)
	}
}

/// Validate and evaluate a request in one step.
pub fn check(request: CheckRequest) -> Result<RedirectReport> {
	let validated = request.validate()?;
	validated.decide()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::Error;

	fn request(url: Option<&str>, side: Option<&str>) -> CheckRequest {
		CheckRequest {
			test_url: url.map(str::to_string),
			side: side.map(str::to_string),
			..Default::default()
		}
	}

	#[test]
	fn test_missing_rules_become_empty() {
		let validated = request(Some("http://example.com/"), Some("Agent"))
			.validate()
			.unwrap();
		assert_eq!(validated.side, Side::Agent);
		assert_eq!(validated.client_rules, "");
		assert_eq!(validated.agent_rules, "");
	}

	#[test]
	fn test_missing_or_empty_url_rejected() {
		assert_eq!(
			request(None, Some("Client")).validate().unwrap_err(),
			ValidationError::MissingTestUrl
		);
		assert_eq!(
			request(Some(""), Some("Client")).validate().unwrap_err(),
			ValidationError::MissingTestUrl
		);
	}

	#[test]
	fn test_bad_side_rejected() {
		let err = request(Some("http://x/"), Some("client"))
			.validate()
			.unwrap_err();
		assert_eq!(
			err,
			ValidationError::InvalidSide {
				value: "client".to_string()
			}
		);
		assert_eq!(err.to_string(), "Please input the right side Type");

		assert_eq!(
			request(Some("http://x/"), None).validate().unwrap_err(),
			ValidationError::MissingSide
		);
	}

	#[test]
	fn test_side_checked_before_url() {
		let err = request(None, Some("Nobody")).validate().unwrap_err();
		assert!(matches!(err, ValidationError::InvalidSide { .. }));
	}

	#[test]
	fn test_parse_json_request() {
		let line = r#"{"testUrl":"http://example.com/a","side":"Client","clientRules":"/a$"}"#;
		let parsed: CheckRequest = serde_json::from_str(line).unwrap();
		assert_eq!(parsed.test_url.as_deref(), Some("http://example.com/a"));
		assert_eq!(parsed.client_rules.as_deref(), Some("/a$"));
		assert!(parsed.agent_rules.is_none());

		let report = check(parsed).unwrap();
		assert_eq!(report.verdict(), "Redirect the URL from Client");
	}

	#[test]
	fn test_check_propagates_errors() {
		let err = check(request(Some(""), Some("Client"))).unwrap_err();
		assert!(matches!(err, Error::Validation(ValidationError::MissingTestUrl)));

		let mut bad_rules = request(Some("http://x/"), Some("Agent"));
		bad_rules.agent_rules = Some("(".to_string());
		assert!(matches!(
			check(bad_rules).unwrap_err(),
			Error::InvalidRegex { .. }
		));
	}
}
