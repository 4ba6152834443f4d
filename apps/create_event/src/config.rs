use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context};
use chrono::{Duration, NaiveDate, NaiveTime};
use event_form::pickers::{format_date, format_time, DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT};

pub const DEFAULT_CONFIG_FILE: &str = "create_event.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_filter: String,
    pub date_format: String,
    pub time_format: String,
    pub proposed_date_offset_hours: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            date_format: DEFAULT_DATE_FORMAT.into(),
            time_format: DEFAULT_TIME_FORMAT.into(),
            proposed_date_offset_hours: 24,
        }
    }
}

impl Settings {
    pub fn proposed_date_offset(&self) -> anyhow::Result<Duration> {
        Duration::try_hours(self.proposed_date_offset_hours).with_context(|| {
            format!(
                "proposed_date_offset_hours {} is out of range",
                self.proposed_date_offset_hours
            )
        })
    }
}

/// Defaults, then the TOML file, then `APP__*` environment variables.
///
/// An explicit `path` must exist and parse. The default file is optional; a
/// malformed one is skipped and reported in the returned warnings, since
/// logging is not set up yet when settings load.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<(Settings, Vec<String>)> {
    load_settings_from(path, Path::new(DEFAULT_CONFIG_FILE))
}

fn load_settings_from(
    path: Option<&Path>,
    default_file: &Path,
) -> anyhow::Result<(Settings, Vec<String>)> {
    let mut settings = Settings::default();
    let mut warnings = Vec::new();

    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            apply_file(&mut settings, &raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(default_file) {
                if let Err(err) = apply_file(&mut settings, &raw) {
                    warnings.push(format!(
                        "ignoring malformed config file '{}': {err}",
                        default_file.display()
                    ));
                }
            }
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    validate(&settings)?;
    Ok((settings, warnings))
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(raw)?;
    let value = |key: &str| -> Option<String> {
        match file_cfg.get(key)? {
            toml::Value::String(v) => Some(v.clone()),
            toml::Value::Integer(v) => Some(v.to_string()),
            _ => None,
        }
    };

    if let Some(v) = value("log_filter") {
        settings.log_filter = v;
    }
    if let Some(v) = value("date_format") {
        settings.date_format = v;
    }
    if let Some(v) = value("time_format") {
        settings.time_format = v;
    }
    if let Some(v) = value("proposed_date_offset_hours") {
        if let Ok(parsed) = v.parse::<i64>() {
            settings.proposed_date_offset_hours = parsed;
        }
    }

    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
    if let Some(v) = lookup("APP__DATE_FORMAT") {
        settings.date_format = v;
    }
    if let Some(v) = lookup("APP__TIME_FORMAT") {
        settings.time_format = v;
    }
    if let Some(v) = lookup("APP__PROPOSED_DATE_OFFSET_HOURS") {
        if let Ok(parsed) = v.parse::<i64>() {
            settings.proposed_date_offset_hours = parsed;
        }
    }
}

fn validate(settings: &Settings) -> anyhow::Result<()> {
    let sample_date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
    if format_date(sample_date, &settings.date_format).is_none() {
        bail!("invalid date_format '{}'", settings.date_format);
    }
    if format_time(NaiveTime::MIN, &settings.time_format).is_none() {
        bail!("invalid time_format '{}'", settings.time_format);
    }
    settings.proposed_date_offset()?;
    Ok(())
}
