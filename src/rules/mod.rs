//! Rule evaluation for urlredir.
//!
//! This module handles:
//! - Matching `;`-delimited regex rule sets against a URL
//! - Deciding whether a URL is redirected from a given side

pub mod decider;
pub mod matcher;

pub use decider::{RedirectReport, Side, decide, decide_sets, is_redirected};
pub use matcher::{MatchTrace, PatternSet, RuleResult, evaluate};
