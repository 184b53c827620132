pub mod favorites;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

pub use favorites::Favorites;

/// Coarse tag attached to every idea. Used as the prompt parameter and as a display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    All,
    Indoor,
    Outdoor,
    Budget,
    #[serde(rename = "User Submitted")]
    UserSubmitted,
}

impl Category {
    /// Categories that can be sent to the provider
    pub const REQUESTABLE: [Category; 4] = [
        Category::All,
        Category::Indoor,
        Category::Outdoor,
        Category::Budget,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Indoor => "Indoor",
            Category::Outdoor => "Outdoor",
            Category::Budget => "Budget",
            Category::UserSubmitted => "User Submitted",
        }
    }

    /// Parse a category name as typed on the command line (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "all" => Some(Category::All),
            "indoor" => Some(Category::Indoor),
            "outdoor" => Some(Category::Outdoor),
            "budget" => Some(Category::Budget),
            "user submitted" | "user-submitted" | "user" => Some(Category::UserSubmitted),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single date idea, either suggested by the provider or typed in by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    pub id: u64,
    pub text: String,
    pub category: Category,
}

impl Idea {
    /// Build a user-submitted idea. Blank input yields `None`.
    pub fn user_submitted(text: &str, ids: &mut IdGenerator) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            id: ids.next_id(),
            text: text.to_string(),
            category: Category::UserSubmitted,
        })
    }
}

/// Millisecond-timestamp ids that never repeat within a process
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue after ids already handed out in a previous session
    pub fn starting_after(last: u64) -> Self {
        Self { last }
    }

    pub fn next_id(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.last = now.max(self.last + 1);
        self.last
    }
}

/// Turn raw completion text into ideas: one per non-blank line, trimmed, in order.
pub fn parse_suggestions(content: &str, category: Category, ids: &mut IdGenerator) -> Vec<Idea> {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Idea {
            id: ids.next_id(),
            text: line.to_string(),
            category,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_lines() {
        let mut ids = IdGenerator::new();
        let content = "1. Picnic in the park\n\n   \n2. Stargazing  \r\n3. Cook dinner together\n";
        let ideas = parse_suggestions(content, Category::Outdoor, &mut ids);

        let texts: Vec<&str> = ideas.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["1. Picnic in the park", "2. Stargazing", "3. Cook dinner together"]
        );
        assert!(ideas.iter().all(|i| i.category == Category::Outdoor));
    }

    #[test]
    fn test_parse_assigns_increasing_ids() {
        let mut ids = IdGenerator::new();
        let ideas = parse_suggestions("a\nb\nc", Category::All, &mut ids);
        assert!(ideas.windows(2).all(|w| w[0].id < w[1].id));

        let user = Idea::user_submitted("d", &mut ids).unwrap();
        assert!(user.id > ideas[2].id);
    }

    #[test]
    fn test_parse_empty_content() {
        let mut ids = IdGenerator::new();
        assert!(parse_suggestions("", Category::Budget, &mut ids).is_empty());
        assert!(parse_suggestions("\n \n\t\n", Category::Budget, &mut ids).is_empty());
    }

    #[test]
    fn test_user_submitted_blank_is_none() {
        let mut ids = IdGenerator::new();
        assert!(Idea::user_submitted("   ", &mut ids).is_none());

        let idea = Idea::user_submitted("  Board games night ", &mut ids).unwrap();
        assert_eq!(idea.text, "Board games night");
        assert_eq!(idea.category, Category::UserSubmitted);
    }

    #[test]
    fn test_ids_continue_after_previous_session() {
        let far_future = u64::MAX / 2;
        let mut ids = IdGenerator::starting_after(far_future);
        assert_eq!(ids.next_id(), far_future + 1);
    }

    #[test]
    fn test_category_serializes_as_label() {
        let idea = Idea {
            id: 7,
            text: "Museum".to_string(),
            category: Category::UserSubmitted,
        };
        let json = serde_json::to_string(&idea).unwrap();
        assert_eq!(json, r#"{"id":7,"text":"Museum","category":"User Submitted"}"#);

        let back: Idea = serde_json::from_str(&json).unwrap();
        assert_eq!(back, idea);
    }

    #[test]
    fn test_category_from_name() {
        assert_eq!(Category::from_name("INDOOR"), Some(Category::Indoor));
        assert_eq!(Category::from_name(" budget "), Some(Category::Budget));
        assert_eq!(Category::from_name("beach"), None);
    }
}
