use std::{cell::RefCell, fmt::Debug};

use crate::category::Category;

/// Anything that can react when a category it subscribed to is announced.
pub trait Subscriber: Debug {
    fn name(&self) -> &str;

    fn update(&self, category: Category);
}

/// The sentence every built-in subscriber uses to describe a notification.
pub fn notification_line(name: &str, category: Category) -> String {
    format!("{name} is notified: The condition is {category} now.")
}

/// Prints each notification to stdout.
#[derive(Debug, Clone)]
pub struct ConsoleSubscriber {
    name: String,
}

impl ConsoleSubscriber {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Subscriber for ConsoleSubscriber {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&self, category: Category) {
        println!("{}", notification_line(&self.name, category));
    }
}

/// Emits each notification as a tracing event instead of printing it.
#[derive(Debug, Clone)]
pub struct LogSubscriber {
    name: String,
}

impl LogSubscriber {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Subscriber for LogSubscriber {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&self, category: Category) {
        tracing::info!(subscriber = %self.name, %category, "{}", notification_line(&self.name, category));
    }
}

/// Keeps every category it was notified about, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSubscriber {
    name: String,
    received: RefCell<Vec<Category>>,
}

impl RecordingSubscriber {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), received: RefCell::new(Vec::new()) }
    }

    pub fn received(&self) -> Vec<Category> {
        self.received.borrow().clone()
    }

    pub fn times_notified(&self, category: Category) -> usize {
        self.received.borrow().iter().filter(|c| **c == category).count()
    }
}

impl Subscriber for RecordingSubscriber {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&self, category: Category) {
        self.received.borrow_mut().push(category);
    }
}
