//! Core library for the `weather-notifier` CLI.
//!
//! This crate defines:
//! - The closed set of weather categories
//! - The subscriber capability and a few ready-made subscribers
//! - The notifier registry that dispatches categories to subscribers
//! - The on-disk roster configuration
//!
//! It is used by `weather-notifier`, but can also be reused by other binaries.

pub mod category;
pub mod config;
pub mod error;
pub mod model;
pub mod notifier;
pub mod status;
pub mod subscriber;

pub use category::Category;
pub use config::{Config, SubscriberConfig, SubscriberKind};
pub use error::NotifierError;
pub use model::DispatchReport;
pub use notifier::WeatherNotifier;
pub use status::{ConsoleReporter, SilentReporter, Status, StatusReporter};
pub use subscriber::{ConsoleSubscriber, LogSubscriber, RecordingSubscriber, Subscriber};
