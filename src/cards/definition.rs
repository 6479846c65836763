//! Card definitions - the faces a tile can show.
//!
//! A `CardDefinition` describes one pair group. Two tiles on the board share
//! its `CardValue`; the name is only for display and logging.

use serde::{Deserialize, Serialize};

/// Identifier of a pair group.
///
/// Two tiles with equal values are a match. Values are what a snapshot
/// stores, so they must stay stable across catalog revisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardValue(pub u32);

impl CardValue {
    /// Create a new card value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Static card data.
///
/// ## Example
///
/// ```
/// use memory_match::cards::{CardDefinition, CardValue};
///
/// let star = CardDefinition::new(CardValue::new(3), "Star");
/// assert_eq!(star.value.raw(), 3);
/// assert_eq!(star.name, "Star");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Matching value.
    pub value: CardValue,

    /// Shown in logs; the presentation layer maps values to art.
    pub name: String,
}

impl CardDefinition {
    pub fn new(value: CardValue, name: impl Into<String>) -> Self {
        Self {
            value,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_value() {
        let value = CardValue::new(12);
        assert_eq!(value.raw(), 12);
        assert_eq!(format!("{}", value), "Card(12)");
        assert!(CardValue::new(1) < CardValue::new(2));
    }

    #[test]
    fn test_value_serializes_as_plain_number() {
        let json = serde_json::to_string(&CardValue::new(5)).unwrap();
        assert_eq!(json, "5");
        let parsed: CardValue = serde_json::from_str("5").unwrap();
        assert_eq!(parsed, CardValue::new(5));
    }

    #[test]
    fn test_definition_from_asset_json() {
        let card: CardDefinition = serde_json::from_str(r#"{"value": 1, "name": "Moon"}"#).unwrap();
        assert_eq!(card, CardDefinition::new(CardValue::new(1), "Moon"));
    }
}
