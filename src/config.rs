use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_yaml::Mapping;
use tracing::{debug, info, warn};

use crate::industry::{IndustryMap, UNKNOWN_INDUSTRY};
use crate::period::PeriodPolicy;
use crate::record::{Defaults, DEFAULT_DATE_FORMAT};

pub const DEFAULT_CONFIG_PATH: &str = "config.yml";
const DEFAULT_DB_PATH: &str = "data/applications.sqlite";
const DEFAULT_TIMEZONE: &str = "America/New_York";
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; JobLinkBot/1.1; +https://example.com/bot)";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub defaults: DefaultSettings,
    pub period: PeriodPolicy,
    /// Optional `keyword: Label` YAML file, relative to the config file.
    pub industry_map: Option<PathBuf>,
    pub industry_allowed: Vec<String>,
    pub industry_rules: Mapping,
    pub company_map: HashMap<String, String>,
    pub sink: SinkSettings,
    pub fetch: FetchSettings,
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultSettings {
    pub source: String,
    pub status: String,
    pub timezone: String,
    pub date_format: String,
    pub industry: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SinkSettings {
    pub database: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            defaults: DefaultSettings::default(),
            period: PeriodPolicy::default(),
            industry_map: None,
            industry_allowed: Vec::new(),
            industry_rules: Mapping::new(),
            company_map: HashMap::new(),
            sink: SinkSettings::default(),
            fetch: FetchSettings::default(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            source: String::new(),
            status: String::new(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            industry: UNKNOWN_INDUSTRY.to_string(),
        }
    }
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Settings {
    /// Load settings. With no explicit path, a missing `config.yml` means
    /// built-in defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        if !required && !path.exists() {
            info!("No {} found, using built-in defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();
        let settings = Self::from_yaml(&text, base_dir)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings. Relative paths resolve against `base_dir`.
    pub fn from_yaml(text: &str, base_dir: PathBuf) -> Result<Self> {
        let mut settings: Settings = if text.trim().is_empty() {
            Settings::default()
        } else {
            serde_yaml::from_str(text)?
        };
        settings.base_dir = base_dir;
        settings.period.validate()?;
        settings.timezone()?;
        if settings.sink.database.is_relative() {
            settings.sink.database = settings.base_dir.join(&settings.sink.database);
        }
        Ok(settings)
    }

    pub fn timezone(&self) -> Result<Tz> {
        let name = self.defaults.timezone.trim();
        name.parse::<Tz>()
            .map_err(|e| anyhow!("Unknown timezone '{}': {}", name, e))
    }

    /// The industry table: the standalone map file if configured, else the
    /// inline `industry_rules`.
    pub fn industry_map(&self) -> Result<IndustryMap> {
        let default_label = &self.defaults.industry;
        match &self.industry_map {
            Some(rel) => {
                let path = self.base_dir.join(rel);
                if !path.exists() {
                    warn!("Industry map {} not found, classifying everything as '{}'", path.display(), default_label);
                    return Ok(IndustryMap::new(Vec::new(), default_label));
                }
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read industry map {}", path.display()))?;
                let map = IndustryMap::from_yaml(&text, default_label)
                    .with_context(|| format!("Failed to parse industry map {}", path.display()))?;
                debug!("Loaded {} industry keywords from {}", map.len(), path.display());
                Ok(map)
            }
            None => Ok(IndustryMap::from_rules(
                &self.industry_rules,
                &self.industry_allowed,
                default_label,
            )),
        }
    }

    pub fn record_defaults(&self) -> Defaults {
        Defaults {
            source: self.defaults.source.clone(),
            status: self.defaults.status.clone(),
            date_format: self.defaults.date_format.clone(),
            company_map: self
                .company_map
                .iter()
                .map(|(host, name)| (host.trim().to_lowercase(), name.clone()))
                .collect(),
        }
    }
}
