use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::NotifierError;

/// The closed set of weather conditions observers can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cold,
    Warm,
    Rainy,
    Sunny,
    Windy,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cold => "cold",
            Category::Warm => "warm",
            Category::Rainy => "rainy",
            Category::Sunny => "sunny",
            Category::Windy => "windy",
        }
    }

    pub const fn all() -> &'static [Category] {
        &[Category::Cold, Category::Warm, Category::Rainy, Category::Sunny, Category::Windy]
    }

    /// Trim and lowercase raw condition text the way every external entry point expects.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_lowercase()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Category {
    type Error = NotifierError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match Category::normalize(value).as_str() {
            "cold" => Ok(Category::Cold),
            "warm" => Ok(Category::Warm),
            "rainy" => Ok(Category::Rainy),
            "sunny" => Ok(Category::Sunny),
            "windy" => Ok(Category::Windy),
            _ => Err(NotifierError::UnrecognizedCategory(value.to_string())),
        }
    }
}

impl FromStr for Category {
    type Err = NotifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::try_from(s)
    }
}
