use std::{fmt, rc::Rc};

use crate::category::Category;

/// Human-readable records the notifier emits as it changes or announces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Subscribed { subscriber: String, category: Category },
    Unsubscribed { subscriber: String, category: Category },
    Notifying { category: Category },
    /// Emitted for conditions outside the known categories; carries the normalized text.
    NoSubscribers { condition: String },
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Subscribed { subscriber, category } => {
                write!(f, "Observer {subscriber} subscribed to {category} weather.")
            }
            Status::Unsubscribed { subscriber, category } => {
                write!(f, "Observer {subscriber} unsubscribed from {category} weather.")
            }
            Status::Notifying { category } => {
                write!(f, "\nNotifying observers about {category} weather:")
            }
            Status::NoSubscribers { condition } => {
                write!(f, "No observers subscribed to {condition} weather.")
            }
        }
    }
}

pub trait StatusReporter {
    fn report(&self, status: &Status);
}

impl<R: StatusReporter + ?Sized> StatusReporter for Rc<R> {
    fn report(&self, status: &Status) {
        (**self).report(status);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl StatusReporter for SilentReporter {
    fn report(&self, _status: &Status) {}
}

/// Prints every status line to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl StatusReporter for ConsoleReporter {
    fn report(&self, status: &Status) {
        println!("{status}");
    }
}
