use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::{
    category::Category,
    notifier::WeatherNotifier,
    status::StatusReporter,
    subscriber::{ConsoleSubscriber, LogSubscriber, Subscriber},
};

/// How a configured subscriber reacts to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberKind {
    #[default]
    Console,
    Log,
}

impl SubscriberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriberKind::Console => "console",
            SubscriberKind::Log => "log",
        }
    }

    pub const fn all() -> &'static [SubscriberKind] {
        &[SubscriberKind::Console, SubscriberKind::Log]
    }

    fn build(self, name: &str) -> Rc<dyn Subscriber> {
        match self {
            SubscriberKind::Console => Rc::new(ConsoleSubscriber::new(name)),
            SubscriberKind::Log => Rc::new(LogSubscriber::new(name)),
        }
    }
}

impl std::fmt::Display for SubscriberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberConfig {
    pub name: String,

    #[serde(default)]
    pub kind: SubscriberKind,

    /// Kept as raw text so an unknown category in the file is skipped, not fatal.
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Condition checked when no explicit one is given, e.g. "windy".
    pub default_condition: Option<String>,

    /// Example TOML:
    /// [[subscribers]]
    /// name = "Abebe"
    /// kind = "console"
    /// categories = ["cold"]
    #[serde(default)]
    pub subscribers: Vec<SubscriberConfig>,
}

/// Built-in roster used until a config file exists.
impl Default for Config {
    fn default() -> Self {
        let entry = |name: &str, category: Category| SubscriberConfig {
            name: name.to_string(),
            kind: SubscriberKind::Console,
            categories: vec![category.to_string()],
        };

        Self {
            default_condition: Some(Category::Windy.to_string()),
            subscribers: vec![
                entry("Abebe", Category::Cold),
                entry("Getahun", Category::Warm),
                entry("Chala", Category::Rainy),
                entry("jhon", Category::Sunny),
                entry("messi", Category::Windy),
            ],
        }
    }
}

impl Config {
    pub fn default_condition(&self) -> &str {
        self.default_condition.as_deref().unwrap_or(Category::Windy.as_str())
    }

    /// Load config from the platform location, or the built-in roster if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Read the roster at `path`. A file that isn't there means the built-in roster.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read config file: {}", path.display()));
            }
        };

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Write the roster as TOML, creating missing directories on the way.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let rendered =
            toml::to_string_pretty(self).context("Failed to serialize roster to TOML")?;

        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?,
            _ => {}
        }

        fs::write(path, rendered)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-notifier")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace the entry with the same name, or append a new one.
    pub fn upsert_subscriber(
        &mut self,
        name: String,
        kind: SubscriberKind,
        categories: Vec<Category>,
    ) {
        let categories = categories.iter().map(Category::to_string).collect();

        match self.subscribers.iter_mut().find(|s| s.name == name) {
            Some(existing) => {
                existing.kind = kind;
                existing.categories = categories;
            }
            None => self.subscribers.push(SubscriberConfig { name, kind, categories }),
        }
    }

    pub fn subscriber(&self, name: &str) -> Option<&SubscriberConfig> {
        self.subscribers.iter().find(|s| s.name == name)
    }

    /// Build a notifier with every roster entry subscribed to its categories.
    ///
    /// Returns the subscriber handles by name so callers can unsubscribe them later.
    pub fn build_notifier(
        &self,
        reporter: Box<dyn StatusReporter>,
    ) -> (WeatherNotifier, BTreeMap<String, Rc<dyn Subscriber>>) {
        let mut notifier = WeatherNotifier::with_reporter(reporter);
        let mut handles = BTreeMap::new();

        for entry in &self.subscribers {
            let subscriber = entry.kind.build(&entry.name);

            for raw in &entry.categories {
                if notifier.subscribe_raw(subscriber.clone(), raw).is_none() {
                    tracing::warn!(subscriber = %entry.name, category = %raw, "skipping unknown category");
                }
            }

            handles.insert(entry.name.clone(), subscriber);
        }

        (notifier, handles)
    }
}
