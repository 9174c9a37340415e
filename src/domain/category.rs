//! Fixed expense categories and their presentation metadata.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Classification tag carried by every transaction.
///
/// Persisted values that do not name a known category (unknown keys, `null`,
/// numbers) resolve to [`Category::Other`]. User input goes through the
/// strict [`Category::lookup`] and is rejected instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "StoredCategory")]
pub enum Category {
    Food,
    Rent,
    Transport,
    Shopping,
    Entertainment,
    Other,
}

/// Display metadata used by list, legend and chart output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

impl Category {
    /// All known categories in legend order.
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Rent,
        Category::Transport,
        Category::Shopping,
        Category::Entertainment,
        Category::Other,
    ];

    /// Strict lookup: `None` unless `key` names one of the known categories.
    pub fn lookup(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "food" => Some(Category::Food),
            "rent" => Some(Category::Rent),
            "transport" => Some(Category::Transport),
            "shopping" => Some(Category::Shopping),
            "entertainment" => Some(Category::Entertainment),
            "other" => Some(Category::Other),
            _ => None,
        }
    }

    /// Resolves a storage key, falling back to `Other` for anything unrecognised.
    pub fn from_key(key: &str) -> Self {
        Self::lookup(key).unwrap_or(Category::Other)
    }

    pub fn key(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Rent => "rent",
            Category::Transport => "transport",
            Category::Shopping => "shopping",
            Category::Entertainment => "entertainment",
            Category::Other => "other",
        }
    }

    pub fn info(self) -> CategoryInfo {
        match self {
            Category::Food => CategoryInfo {
                name: "Food",
                icon: "utensils",
                color: "#FF6B6B",
            },
            Category::Rent => CategoryInfo {
                name: "Rent",
                icon: "home",
                color: "#4ECDC4",
            },
            Category::Transport => CategoryInfo {
                name: "Transport",
                icon: "bus",
                color: "#FFD166",
            },
            Category::Shopping => CategoryInfo {
                name: "Shopping",
                icon: "shopping-bag",
                color: "#06D6A0",
            },
            Category::Entertainment => CategoryInfo {
                name: "Entertainment",
                icon: "film",
                color: "#118AB2",
            },
            Category::Other => CategoryInfo {
                name: "Other",
                icon: "ellipsis-h",
                color: "#073B4C",
            },
        }
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

/// Any JSON value found in a record's category slot.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCategory {
    Key(String),
    Unreadable(serde::de::IgnoredAny),
}

impl From<StoredCategory> for Category {
    fn from(value: StoredCategory) -> Self {
        match value {
            StoredCategory::Key(key) => Category::from_key(&key),
            StoredCategory::Unreadable(_) => Category::Other,
        }
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::from_key(s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
