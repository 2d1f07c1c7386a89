use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, MergedConfig};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Name of the config file looked up in each directory.
pub const CONFIG_FILE_NAME: &str = ".urlredir.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.urlredir.toml`
/// 2. If found and `root = true`, skip to user config only
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.urlredir.toml
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		if config_path.exists() {
			let config = parse_config_file(&config_path)?;
			let is_root = config.root;
			tracing::debug!(path = %config_path.display(), root = is_root, "loaded config");

			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if is_root {
				break;
			}
		}

		match current_dir.parent() {
			Some(parent) => current_dir = parent.to_path_buf(),
			None => break,
		}
	}

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load the user's ~/.urlredir.toml if it exists and wasn't already found.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	let user_config_path = user_config_path()?;

	if existing_configs.iter().any(|c| c.path == user_config_path) {
		return Ok(None);
	}

	if user_config_path.exists() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Merge multiple configs into a single effective config.
///
/// For each setting, the first config in cascade order that sets it wins.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();

	for loaded in configs {
		let config = &loaded.config;
		if merged.default_side.is_none() {
			merged.default_side = config.default_side;
		}
		if merged.client_rules.is_none() {
			merged.client_rules = config.client_rules.as_ref().map(|r| r.pattern_set());
		}
		if merged.agent_rules.is_none() {
			merged.agent_rules = config.agent_rules.as_ref().map(|r| r.pattern_set());
		}
	}

	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Load exactly one config file, bypassing discovery.
pub fn load_config_file(path: &Path) -> Result<MergedConfig> {
	let config = parse_config_file(path)?;
	Ok(merge_configs(&[LoadedConfig {
		config,
		path: path.to_path_buf(),
	}]))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(Error::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::{Config, RuleList};
	use crate::rules::Side;
	use std::fs;

	fn loaded(config: Config, path: &str) -> LoadedConfig {
		LoadedConfig {
			config,
			path: PathBuf::from(path),
		}
	}

	#[test]
	fn test_merge_most_specific_wins() {
		let inner = Config {
			client_rules: Some(RuleList::Joined("inner".to_string())),
			..Default::default()
		};
		let outer = Config {
			default_side: Some(Side::Agent),
			client_rules: Some(RuleList::Joined("outer".to_string())),
			agent_rules: Some(RuleList::Patterns(vec!["agent".to_string()])),
			..Default::default()
		};

		let merged = merge_configs(&[loaded(inner, "a/.urlredir.toml"), loaded(outer, ".urlredir.toml")]);

		assert_eq!(merged.default_side, Some(Side::Agent));
		assert_eq!(merged.client_rules.unwrap().patterns(), ["inner"]);
		assert_eq!(merged.agent_rules.unwrap().patterns(), ["agent"]);
	}

	#[test]
	fn test_merge_empty() {
		let merged = merge_configs(&[]);
		assert!(merged.default_side.is_none());
		assert!(merged.client_rules.is_none());
		assert!(merged.agent_rules.is_none());
	}

	#[test]
	fn test_discover_stops_at_root() {
		let temp_dir = tempfile::tempdir().unwrap();
		let nested = temp_dir.path().join("project").join("sub");
		fs::create_dir_all(&nested).unwrap();

		fs::write(
			temp_dir.path().join("project").join(CONFIG_FILE_NAME),
			"root = true\nclient-rules = \"outer\"\n",
		)
		.unwrap();
		fs::write(nested.join(CONFIG_FILE_NAME), "agent-rules = \"inner\"\n").unwrap();

		let configs = discover_configs(&nested).unwrap();
		let local: Vec<_> = configs
			.iter()
			.filter(|c| c.path.starts_with(temp_dir.path()))
			.collect();

		assert_eq!(local.len(), 2);
		assert_eq!(local[0].path, nested.join(CONFIG_FILE_NAME));
		assert!(local[1].config.root);
	}

	#[test]
	fn test_load_config_file() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("rules.toml");
		fs::write(&path, "default-side = \"Client\"\nagent-rules = [\"/a$\"]\n").unwrap();

		let merged = load_config_file(&path).unwrap();
		assert_eq!(merged.default_side, Some(Side::Client));
		assert!(merged.client_rules.is_none());
		assert_eq!(merged.agent_rules.unwrap().patterns(), ["/a$"]);
	}

	#[test]
	fn test_user_config_path() {
		let path = user_config_path();
		assert!(path.is_ok());
		assert!(path.unwrap().ends_with(CONFIG_FILE_NAME));
	}
}
