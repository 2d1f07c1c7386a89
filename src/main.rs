use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use urlredir_cli::config::{
	CONFIG_FILE_NAME, LoadedConfig, MergedConfig, discover_configs,
	generate_init_template, load_config_file, load_merged_config, parse_config_file,
	user_config_path,
};
use urlredir_cli::report::{to_json, to_json_pretty, to_text};
use urlredir_cli::request::{CheckRequest, check};
use urlredir_cli::rules::{PatternSet, decide_sets};

#[derive(Parser)]
#[command(name = "urlredir")]
#[command(
	author,
	version,
	about = "CLI tool for checking URL redirection rules between client and agent sides"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Use this config file instead of discovering .urlredir.toml files
	#[arg(long, global = true, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Increase log verbosity (-v debug, -vv trace)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Check whether a URL is redirected from the given side
	Check(CheckArgs),
	/// Check JSON-lines requests read from a file or stdin
	Batch {
		/// Read requests from this file instead of stdin
		#[arg(long, value_name = "PATH")]
		input: Option<PathBuf>,
	},
	/// Create a template .urlredir.toml in the current directory
	Init {
		/// Overwrite an existing .urlredir.toml
		#[arg(long)]
		force: bool,
	},
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(clap::Args)]
struct CheckArgs {
	/// URL to test against the rules
	#[arg(long, value_name = "URL")]
	url: Option<String>,

	/// Side to decide for: Client or Agent
	#[arg(long, value_name = "SIDE")]
	side: Option<String>,

	/// Client rules, ";"-separated (overrides configured rules)
	#[arg(long, value_name = "RULES", allow_hyphen_values = true)]
	client_rules: Option<String>,

	/// Agent rules, ";"-separated (overrides configured rules)
	#[arg(long, value_name = "RULES", allow_hyphen_values = true)]
	agent_rules: Option<String>,

	/// Output format
	#[arg(long, value_enum, default_value_t = OutputFormat::Json)]
	format: OutputFormat,

	/// Indent JSON output
	#[arg(long)]
	pretty: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
	Json,
	Text,
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display discovered configuration files with their settings
	Show,
	/// Check all config files and rule patterns for errors
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match cli.command {
		Commands::Check(args) => handle_check(args, cli.config.as_deref()),
		Commands::Batch { input } => handle_batch(input.as_deref()),
		Commands::Init { force } => handle_init(force),
		Commands::Config { action } => match action {
			ConfigAction::Show => handle_config_show(cli.config.as_deref()),
			ConfigAction::Validate => handle_config_validate(cli.config.as_deref()),
		},
	}
}

fn init_logging(verbose: u8) {
	let default_level = match verbose {
		0 => "warn",
		1 => "debug",
		_ => "trace",
	};

	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();
}

fn load_config(explicit: Option<&Path>) -> Result<MergedConfig> {
	match explicit {
		Some(path) => load_config_file(path)
			.with_context(|| format!("Failed to load configuration from {}", path.display())),
		None => {
			let cwd = std::env::current_dir().context("Failed to get current directory")?;
			load_merged_config(&cwd).context("Failed to load configuration")
		}
	}
}

fn handle_check(args: CheckArgs, config_path: Option<&Path>) -> Result<ExitCode> {
	let config = load_config(config_path)?;

	// Flags take precedence over configured rules, per side.
	let client_rules = args
		.client_rules
		.as_deref()
		.map(PatternSet::parse)
		.or(config.client_rules)
		.unwrap_or_default();
	let agent_rules = args
		.agent_rules
		.as_deref()
		.map(PatternSet::parse)
		.or(config.agent_rules)
		.unwrap_or_default();

	let request = CheckRequest {
		test_url: args.url,
		side: args
			.side
			.or_else(|| config.default_side.map(|s| s.to_string())),
		..Default::default()
	};
	let validated = request.validate().context("Invalid request")?;

	let report = decide_sets(&validated.test_url, &client_rules, &agent_rules, validated.side)
		.context("Failed to evaluate rules")?;

	let output = match (args.format, args.pretty) {
		(OutputFormat::Text, _) => to_text(&report),
		(OutputFormat::Json, true) => to_json_pretty(&report)?,
		(OutputFormat::Json, false) => to_json(&report)?,
	};
	println!("{}", output.trim_end());

	Ok(ExitCode::SUCCESS)
}

fn handle_batch(input: Option<&Path>) -> Result<ExitCode> {
	let reader: Box<dyn BufRead> = match input {
		Some(path) => {
			let file = std::fs::File::open(path)
				.with_context(|| format!("Failed to open {}", path.display()))?;
			Box::new(BufReader::new(file))
		}
		None => Box::new(BufReader::new(std::io::stdin())),
	};

	let stdout = std::io::stdout();
	let mut out = stdout.lock();
	let mut failures = 0usize;

	// Split on raw bytes so a line that is not UTF-8 only fails itself.
	for (index, line) in reader.split(b'\n').enumerate() {
		let line = line.context("Failed to read request")?;
		if line.iter().all(u8::is_ascii_whitespace) {
			continue;
		}

		let result = serde_json::from_slice::<CheckRequest>(&line)
			.map_err(|e| format!("Invalid request: {e}"))
			.and_then(|request| check(request).map_err(|e| e.to_string()))
			.and_then(|report| to_json(&report).map_err(|e| e.to_string()));

		match result {
			Ok(json) => writeln!(out, "{json}")?,
			Err(message) => {
				failures += 1;
				tracing::warn!(line = index + 1, %message, "request failed");
				writeln!(out, "{}", serde_json::json!({ "error": message }))?;
			}
		}
	}

	if failures > 0 {
		Ok(ExitCode::FAILURE)
	} else {
		Ok(ExitCode::SUCCESS)
	}
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

/// The explicit config file alone, or every file found by discovery.
fn collect_configs(explicit: Option<&Path>) -> Result<urlredir_cli::Result<Vec<LoadedConfig>>> {
	Ok(match explicit {
		Some(path) => parse_config_file(path).map(|config| {
			vec![LoadedConfig {
				config,
				path: path.to_path_buf(),
			}]
		}),
		None => {
			let cwd = std::env::current_dir().context("Failed to get current directory")?;
			discover_configs(&cwd)
		}
	})
}

fn handle_config_show(explicit: Option<&Path>) -> Result<ExitCode> {
	let configs = collect_configs(explicit)?.context("Failed to load config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", loaded.config.root);
		if let Some(side) = loaded.config.default_side {
			println!("# default-side: {}", side);
		}
		for (name, rules) in [
			("client-rules", &loaded.config.client_rules),
			("agent-rules", &loaded.config.agent_rules),
		] {
			if let Some(rules) = rules {
				println!("  {}:", name);
				for pattern in rules.pattern_set().patterns() {
					println!("    {}", pattern);
				}
			}
		}
		println!();
	}

	if explicit.is_none()
		&& let Ok(user_path) = user_config_path()
	{
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(explicit: Option<&Path>) -> Result<ExitCode> {
	match collect_configs(explicit)? {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					let count: usize = [&loaded.config.client_rules, &loaded.config.agent_rules]
						.into_iter()
						.flatten()
						.map(|r| r.pattern_set().len())
						.sum();
					println!("  {} ({} rules)", loaded.path.display(), count);
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
