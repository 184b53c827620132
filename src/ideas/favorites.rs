use serde::{Deserialize, Serialize};

use super::Idea;

/// Saved ideas. Never holds two entries with the same id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    items: Vec<Idea>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries, dropping repeated ids (first one wins)
    pub fn from_items(items: Vec<Idea>) -> Self {
        let mut favorites = Self::new();
        for idea in items {
            favorites.add(idea);
        }
        favorites
    }

    /// Append unless already saved. Returns whether the list changed.
    pub fn add(&mut self, idea: Idea) -> bool {
        if self.contains(idea.id) {
            return false;
        }
        self.items.push(idea);
        true
    }

    /// Remove the entry with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: u64) -> bool {
        match self.items.iter().position(|idea| idea.id == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.items.iter().any(|idea| idea.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&Idea> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Idea> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Highest id saved, used to keep new ids ahead of persisted ones
    pub fn max_id(&self) -> Option<u64> {
        self.items.iter().map(|idea| idea.id).max()
    }
}
