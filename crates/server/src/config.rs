use std::{collections::HashMap, fs};

use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub max_queue_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            max_queue_len: 64,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Ok(v) = std::env::var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Ok(v) = std::env::var("APP__MAX_QUEUE_LEN") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.max_queue_len = parsed.max(1);
        }
    }

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!(%err, "ignoring malformed server.toml");
            return;
        }
    };

    if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
        settings.server_bind = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("max_queue_len")
        .and_then(toml::Value::as_integer)
    {
        settings.max_queue_len = usize::try_from(v).unwrap_or(1).max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_overrides_bind_and_queue_len() {
        let mut settings = Settings::default();
        apply_file(
            &mut settings,
            r#"
                bind_addr = "0.0.0.0:8080"
                max_queue_len = 8
            "#,
        );
        assert_eq!(
            settings,
            Settings {
                server_bind: "0.0.0.0:8080".into(),
                max_queue_len: 8,
            }
        );
    }

    #[test]
    fn malformed_file_keeps_defaults() {
        let mut settings = Settings::default();
        apply_file(&mut settings, "bind_addr = ");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn queue_len_never_drops_to_zero() {
        let mut settings = Settings::default();
        apply_file(&mut settings, "max_queue_len = -3");
        assert_eq!(settings.max_queue_len, 1);
    }
}
