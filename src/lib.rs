//! urlredir - decide whether a URL is redirected between client and agent.
//!
//! Each side carries its own set of regex rules. A URL is checked against
//! both sets and a precedence rule decides whether it is redirected from the
//! requested side. This library provides:
//! - Rule matching with a per-pattern trace
//! - The side precedence decision
//! - Request validation and the JSON report format
//! - Configuration file parsing and cascade discovery
//!
//! # Example
//!
//! ```
//! use urlredir_cli::report::to_json;
//! use urlredir_cli::rules::{Side, decide};
//!
//! let report = decide("http://example.com/a", "/a$", "", Side::Client).unwrap();
//! assert!(report.redirected);
//! assert_eq!(report.verdict(), "Redirect the URL from Client");
//!
//! let json = to_json(&report).unwrap();
//! assert!(json.contains(r#""SideMatchResult":"Matched""#));
//! ```

pub mod config;
pub mod error;
pub mod report;
pub mod request;
pub mod rules;

pub use error::{Error, Result};
