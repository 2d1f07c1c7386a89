use crate::error::Result;
use crate::rules::{PatternSet, Side};
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration from a `.urlredir.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop directory cascade and jump directly to ~/.urlredir.toml.
	#[serde(default)]
	pub root: bool,

	/// Side used when a check does not name one.
	#[serde(default)]
	pub default_side: Option<Side>,

	/// Rules attributed to the client side.
	#[serde(default)]
	pub client_rules: Option<RuleList>,

	/// Rules attributed to the agent side.
	#[serde(default)]
	pub agent_rules: Option<RuleList>,
}

/// Rules as written in a config file.
///
/// Either a single `;`-joined string, the same form a check request carries,
/// or a list of patterns that are taken verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuleList {
	Joined(String),
	Patterns(Vec<String>),
}

impl RuleList {
	pub fn pattern_set(&self) -> PatternSet {
		match self {
			RuleList::Joined(rules) => PatternSet::parse(rules),
			RuleList::Patterns(patterns) => PatternSet::from_patterns(patterns.clone()),
		}
	}
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Effective configuration after merging the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	pub default_side: Option<Side>,
	pub client_rules: Option<PatternSet>,
	pub agent_rules: Option<PatternSet>,
}

impl Config {
	/// Compile every configured pattern so bad rules surface at load time.
	pub fn validate(&self) -> Result<()> {
		for rules in [&self.client_rules, &self.agent_rules].into_iter().flatten() {
			rules.pattern_set().compile()?;
		}
		Ok(())
	}
}
