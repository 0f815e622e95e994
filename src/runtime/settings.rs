use crate::config;

/// Load settings, falling back to defaults on any problem.
///
/// Logging is not up yet at this point, so the reason for a fallback is
/// handed back to be logged once it is.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                config::Settings::default(),
                Some(format!("invalid config, using defaults: {msg}")),
            ),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}

/// Apply the optional `BASE_URL` positional argument.
pub fn apply_cli_overrides(settings: &mut config::Settings, args: &[String]) {
    if let Some(base) = args.first().filter(|a| !a.trim().is_empty()) {
        settings.server.base_url = base.trim().to_string();
    }
}
