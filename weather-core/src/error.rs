use thiserror::Error;

use crate::category::Category;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifierError {
    /// Text that does not name one of the known weather categories.
    #[error("Unknown weather category '{0}'. Supported categories: cold, warm, rainy, sunny, windy.")]
    UnrecognizedCategory(String),

    #[error("Observer {subscriber} is not subscribed to {category} weather.")]
    NotSubscribed { subscriber: String, category: Category },
}
