use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use crate::types::{Config, NotifierKind, Thresholds};

pub const DEFAULT_SENDER_EMAIL: &str = "sender@example.com";
pub const DEFAULT_RECIPIENT_EMAIL: &str = "admin@example.com";

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn load_config() -> Result<Config> {
    load_config_with_env(&SystemEnvironment)
}

pub fn load_config_with_env<E: EnvironmentProvider>(env: &E) -> Result<Config> {
    let sender_email = non_empty(env, "SENDER_EMAIL")
        .unwrap_or_else(|| DEFAULT_SENDER_EMAIL.to_string());
    let recipient_email = non_empty(env, "RECIPIENT_EMAIL")
        .unwrap_or_else(|| DEFAULT_RECIPIENT_EMAIL.to_string());

    let max_key_age_days = parse_days(env, "MAX_KEY_AGE", 90)?;
    let max_unused_days = parse_days(env, "MAX_UNUSED_DAYS", 30)?;

    let notifier = match env.get_var("NOTIFIER").as_deref().map(str::trim) {
        None | Some("") => NotifierKind::Ses,
        Some(v) if v.eq_ignore_ascii_case("ses") => NotifierKind::Ses,
        Some(v) if v.eq_ignore_ascii_case("slack") => NotifierKind::Slack,
        Some(other) => return Err(anyhow!("Invalid NOTIFIER '{}' (expected ses or slack)", other)),
    };

    let slack_webhook_url = non_empty(env, "SLACK_WEBHOOK_URL");
    if notifier == NotifierKind::Slack && slack_webhook_url.is_none() {
        return Err(anyhow!("SLACK_WEBHOOK_URL must be provided when NOTIFIER=slack"));
    }

    let aws_region = non_empty(env, "AWS_REGION");

    Ok(Config {
        sender_email,
        recipient_email,
        thresholds: Thresholds {
            max_key_age_days,
            max_unused_days,
        },
        notifier,
        slack_webhook_url,
        aws_region,
    })
}

fn non_empty<E: EnvironmentProvider>(env: &E, key: &str) -> Option<String> {
    env.get_var(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_days<E: EnvironmentProvider>(env: &E, key: &str, default: i64) -> Result<i64> {
    match non_empty(env, key) {
        None => Ok(default),
        Some(v) => {
            let days: i64 = v.parse().with_context(|| format!("Invalid {}", key))?;
            if days < 0 {
                return Err(anyhow!("Invalid {}: must not be negative", key));
            }
            Ok(days)
        }
    }
}
