use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{MultiSelect, Select, Text};
use std::path::PathBuf;
use tracing::Level;

use weather_notifier_core::{
    Category, Config, ConsoleReporter, StatusReporter, SubscriberKind, WeatherNotifier,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-notifier", version, about = "Weather condition notifier")]
pub struct Cli {
    /// Roster file to use instead of the platform config location.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase diagnostic output on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Subscribe the roster and announce the default condition.
    Run,

    /// Subscribe the roster and announce a condition.
    Check {
        /// Condition text, e.g. "windy". Unknown conditions are reported, not rejected.
        condition: String,

        /// Unsubscribe this roster member from the condition before announcing it.
        #[arg(long = "without", value_name = "NAME")]
        without: Vec<String>,

        /// Print the dispatch report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the weather categories observers can subscribe to.
    Categories,

    /// Add or replace a roster member interactively.
    Configure,
}

impl Cli {
    pub fn init_tracing(&self) {
        let level = match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        };

        tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();
    }

    pub fn run(self) -> Result<()> {
        match &self.command {
            None | Some(Command::Run) => {
                let config = self.load_config()?;
                let condition = config.default_condition().to_string();
                announce(&config, &condition, &[], false)
            }
            Some(Command::Check { condition, without, json }) => {
                let config = self.load_config()?;
                announce(&config, condition, without, *json)
            }
            Some(Command::Categories) => {
                for category in Category::all() {
                    println!("{category}");
                }
                Ok(())
            }
            Some(Command::Configure) => self.configure(),
        }
    }

    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    fn configure(&self) -> Result<()> {
        let mut config = self.load_config()?;

        let name = Text::new("Observer name:").prompt().context("Failed to read observer name")?;
        let name = name.trim().to_string();
        if name.is_empty() {
            anyhow::bail!("Observer name must not be empty");
        }

        let kind = Select::new("How should they be notified?", SubscriberKind::all().to_vec())
            .prompt()
            .context("Failed to read notification kind")?;

        let categories =
            MultiSelect::new("Which weather should they hear about?", Category::all().to_vec())
                .prompt()
                .context("Failed to read categories")?;

        config.upsert_subscriber(name.clone(), kind, categories);

        match &self.config {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }

        println!("Saved observer {name}.");
        Ok(())
    }
}

/// Build the notifier from the roster and unsubscribe every `without` member from `condition`.
///
/// Exclusions only apply to known categories; unknown names and members that were
/// never subscribed to the condition are warned about and skipped.
fn prepare(
    config: &Config,
    reporter: Box<dyn StatusReporter>,
    condition: &str,
    without: &[String],
) -> WeatherNotifier {
    let (mut notifier, handles) = config.build_notifier(reporter);

    if without.is_empty() {
        return notifier;
    }

    let category = match condition.parse::<Category>() {
        Ok(category) => category,
        Err(err) => {
            tracing::info!("ignoring --without: {err}");
            return notifier;
        }
    };

    for name in without {
        match handles.get(name) {
            Some(handle) => {
                if let Err(err) = notifier.unsubscribe(handle, category) {
                    tracing::warn!("{err}");
                }
            }
            None => tracing::warn!(observer = %name, "no such observer in the roster"),
        }
    }

    notifier
}

/// Apply exclusions, check `condition`, and optionally print the report as JSON.
fn announce(config: &Config, condition: &str, without: &[String], json: bool) -> Result<()> {
    let notifier = prepare(config, Box::new(ConsoleReporter), condition, without);
    let report = notifier.check_weather(condition);

    if json {
        let out = serde_json::to_string_pretty(&report)
            .context("Failed to serialize dispatch report to JSON")?;
        println!("{out}");
    }

    Ok(())
}
