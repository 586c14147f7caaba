//! The fixed set of categories a subscription can belong to.
//!
//! Categories are a closed set so that spending can be grouped consistently.
//! Each category has a display label, a background colour and an emoji icon
//! which are purely presentational.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The kind of service a subscription is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Video streaming, e.g. Netflix.
    Streaming,
    /// Software licences and apps.
    Software,
    /// Gyms, workout and wellbeing apps.
    Fitness,
    /// Office suites, note taking and design tools.
    Productivity,
    /// Game subscriptions and online play.
    Gaming,
    /// Music streaming.
    Music,
    /// Newspapers, magazines and books.
    News,
    /// Cloud storage.
    Cloud,
    /// Courses and language learning.
    Education,
    /// Phone, internet and other household services.
    Utilities,
    /// Anything that does not fit elsewhere.
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 11] = [
        Category::Streaming,
        Category::Software,
        Category::Fitness,
        Category::Productivity,
        Category::Gaming,
        Category::Music,
        Category::News,
        Category::Cloud,
        Category::Education,
        Category::Utilities,
        Category::Other,
    ];

    /// The code used in forms and the database, e.g. "streaming".
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Streaming => "streaming",
            Self::Software => "software",
            Self::Fitness => "fitness",
            Self::Productivity => "productivity",
            Self::Gaming => "gaming",
            Self::Music => "music",
            Self::News => "news",
            Self::Cloud => "cloud",
            Self::Education => "education",
            Self::Utilities => "utilities",
            Self::Other => "other",
        }
    }

    /// The name shown to users, e.g. "Streaming".
    pub fn label(self) -> &'static str {
        match self {
            Self::Streaming => "Streaming",
            Self::Software => "Software",
            Self::Fitness => "Fitness",
            Self::Productivity => "Productivity",
            Self::Gaming => "Gaming",
            Self::Music => "Music",
            Self::News => "News",
            Self::Cloud => "Cloud Storage",
            Self::Education => "Education",
            Self::Utilities => "Utilities",
            Self::Other => "Other",
        }
    }

    /// The pastel background colour for the category as a hex string.
    pub fn color_hex(self) -> &'static str {
        match self {
            Self::Streaming => "#FDEAE8",
            Self::Software => "#E8E4F4",
            Self::Fitness => "#D4F5F3",
            Self::Productivity => "#E3F2FD",
            Self::Gaming => "#F3E5F5",
            Self::Music => "#E8F5E9",
            Self::News => "#FDF6E3",
            Self::Cloud => "#E3F2FD",
            Self::Education => "#FCE4EC",
            Self::Utilities => "#DDF7F6",
            Self::Other => "#FFF3E0",
        }
    }

    /// A small icon for the category.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Streaming => "📺",
            Self::Software => "💻",
            Self::Fitness => "🏋️",
            Self::Productivity => "✅",
            Self::Gaming => "🎮",
            Self::Music => "🎵",
            Self::News => "📰",
            Self::Cloud => "☁️",
            Self::Education => "🎓",
            Self::Utilities => "💡",
            Self::Other => "📦",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::InvalidCategory(s.to_owned()))
    }
}
