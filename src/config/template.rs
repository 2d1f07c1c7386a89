/// Contents written by `urlredir init`.
pub fn generate_init_template() -> &'static str {
	r#"# urlredir configuration
# See `urlredir config show` for the effective settings.

# Stop looking for .urlredir.toml in parent directories.
root = true

# Side used when `check` is run without --side ("Client" or "Agent").
# default-side = "Client"

# Rules are regular expressions searched anywhere in the URL.
# Either a single ";"-joined string or a list of patterns.
client-rules = ["^https?://intranet\\."]
agent-rules = "youtube\\.com;/watch\\?v="
"#
}
