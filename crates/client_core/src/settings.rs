use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

use crate::{
    executor::{CommandExecutor, DEFAULT_SKIP_SECONDS, DEFAULT_VOLUME_STEP},
    feedback::FeedbackPresenter,
};

pub const DEFAULT_SETTINGS_FILE: &str = "gesture.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub service_url: String,
    pub poll_interval: Duration,
    pub command_cooldown: Duration,
    pub request_timeout: Duration,
    pub volume_step: f64,
    pub skip_seconds: f64,
    pub feedback_duration: Duration,
    pub notification_duration: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:5000".into(),
            poll_interval: Duration::from_millis(300),
            command_cooldown: Duration::from_millis(1000),
            request_timeout: Duration::from_secs(5),
            volume_step: DEFAULT_VOLUME_STEP,
            skip_seconds: DEFAULT_SKIP_SECONDS,
            feedback_duration: Duration::from_millis(1500),
            notification_duration: Duration::from_millis(3000),
        }
    }
}

impl ControllerSettings {
    pub fn executor(&self) -> CommandExecutor {
        CommandExecutor::new(self.volume_step, self.skip_seconds)
    }

    pub fn presenter(&self) -> FeedbackPresenter {
        FeedbackPresenter::new(self.feedback_duration, self.notification_duration)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    service_url: Option<String>,
    poll_interval_ms: Option<u64>,
    command_cooldown_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    volume_step: Option<f64>,
    skip_seconds: Option<f64>,
    feedback_duration_ms: Option<u64>,
    notification_duration_ms: Option<u64>,
}

/// Defaults, then the TOML file at `path` (or `gesture.toml`) if readable,
/// then environment overrides.
pub fn load_settings(path: Option<&Path>) -> ControllerSettings {
    let mut settings = ControllerSettings::default();

    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
    if let Ok(raw) = fs::read_to_string(path) {
        if let Err(err) = apply_file(&mut settings, &raw) {
            warn!(path = %path.display(), %err, "ignoring unreadable settings file");
        }
    }

    apply_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file(settings: &mut ControllerSettings, raw: &str) -> Result<(), toml::de::Error> {
    let file: SettingsFile = toml::from_str(raw)?;

    if let Some(v) = file.service_url {
        settings.service_url = v;
    }
    if let Some(v) = file.poll_interval_ms {
        settings.poll_interval = Duration::from_millis(v.max(1));
    }
    if let Some(v) = file.command_cooldown_ms {
        settings.command_cooldown = Duration::from_millis(v);
    }
    if let Some(v) = file.request_timeout_ms {
        settings.request_timeout = Duration::from_millis(v);
    }
    if let Some(v) = file.volume_step {
        settings.volume_step = v.clamp(0.0, 1.0);
    }
    if let Some(v) = file.skip_seconds {
        settings.skip_seconds = v;
    }
    if let Some(v) = file.feedback_duration_ms {
        settings.feedback_duration = Duration::from_millis(v);
    }
    if let Some(v) = file.notification_duration_ms {
        settings.notification_duration = Duration::from_millis(v);
    }
    Ok(())
}

fn apply_overrides(settings: &mut ControllerSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("GESTURE_SERVICE_URL") {
        settings.service_url = v;
    }
    if let Some(v) = lookup("APP__SERVICE_URL") {
        settings.service_url = v;
    }

    let millis = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
    if let Some(v) = millis("APP__POLL_INTERVAL_MS") {
        settings.poll_interval = Duration::from_millis(v.max(1));
    }
    if let Some(v) = millis("APP__COMMAND_COOLDOWN_MS") {
        settings.command_cooldown = Duration::from_millis(v);
    }
    if let Some(v) = millis("APP__REQUEST_TIMEOUT_MS") {
        settings.request_timeout = Duration::from_millis(v);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_match_reference_timings() {
        let settings = ControllerSettings::default();
        assert_eq!(settings.poll_interval, Duration::from_millis(300));
        assert_eq!(settings.command_cooldown, Duration::from_millis(1000));
        assert_eq!(settings.skip_seconds, 10.0);
        assert_eq!(settings.volume_step, 0.1);
    }

    #[test]
    fn file_values_replace_defaults() {
        let mut settings = ControllerSettings::default();
        apply_file(
            &mut settings,
            r#"
                service_url = "http://recognizer.local:8080"
                poll_interval_ms = 150
                skip_seconds = 5.0
            "#,
        )
        .expect("parse");

        assert_eq!(settings.service_url, "http://recognizer.local:8080");
        assert_eq!(settings.poll_interval, Duration::from_millis(150));
        assert_eq!(settings.skip_seconds, 5.0);
        assert_eq!(settings.command_cooldown, Duration::from_millis(1000));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let mut settings = ControllerSettings::default();
        assert!(apply_file(&mut settings, "poll_every = 3").is_err());
        assert_eq!(settings, ControllerSettings::default());
    }

    #[test]
    fn app_prefixed_env_wins_over_legacy_name() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GESTURE_SERVICE_URL", "http://legacy:5000"),
            ("APP__SERVICE_URL", "http://preferred:5000"),
            ("APP__COMMAND_COOLDOWN_MS", "250"),
            ("APP__POLL_INTERVAL_MS", "not-a-number"),
        ]);
        let mut settings = ControllerSettings::default();
        apply_overrides(&mut settings, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.service_url, "http://preferred:5000");
        assert_eq!(settings.command_cooldown, Duration::from_millis(250));
        assert_eq!(settings.poll_interval, Duration::from_millis(300));
    }
}
