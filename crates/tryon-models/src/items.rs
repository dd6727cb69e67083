//! Detected item labels and the user's selection.

use serde::{Deserialize, Serialize};

/// Placeholder label used when analysis finds no distinguishable item.
///
/// Selecting exactly this label asks the service to apply the principal
/// garment or accessory of the clothing photo.
pub const ENTIRE_ITEM_LABEL: &str = "L'ensemble du vêtement/accessoire";

/// Ordered labels produced by item analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectedItems(Vec<String>);

impl DetectedItems {
    /// Build from raw analysis labels.
    ///
    /// Labels are trimmed, blank labels dropped and duplicates collapsed in
    /// first-seen order. An empty result becomes the single sentinel label.
    pub fn from_analysis<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut items: Vec<String> = Vec::new();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() || items.iter().any(|existing| existing == label) {
                continue;
            }
            items.push(label.to_string());
        }

        if items.is_empty() {
            items.push(ENTIRE_ITEM_LABEL.to_string());
        }

        Self(items)
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selection containing every detected label.
    pub fn select_all(&self) -> ItemSelection {
        ItemSelection(self.0.clone())
    }
}

/// Labels the user chose to apply, kept in toggle order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemSelection(Vec<String>);

impl ItemSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the label if absent, remove it if present.
    ///
    /// Returns `true` when the label is selected afterwards.
    pub fn toggle(&mut self, label: &str) -> bool {
        if let Some(pos) = self.0.iter().position(|l| l == label) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(label.to_string());
            true
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the selection is exactly the sentinel label.
    pub fn is_entire_item(&self) -> bool {
        self.0.len() == 1 && self.0[0] == ENTIRE_ITEM_LABEL
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}
