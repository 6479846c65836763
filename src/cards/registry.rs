//! Card catalog - the pool of available pair values.
//!
//! The catalog plays two roles:
//! - **Pair source** for the board generator: it draws distinct values
//!   without replacement.
//! - **Value resolver** for the snapshot codec: a stored value is only valid
//!   while the catalog still contains it.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardValue};
use crate::board::PairSource;
use crate::core::{GameError, GameRng, Result};
use crate::persistence::ValueResolver;

/// Registry of card definitions keyed by value.
///
/// ## Example
///
/// ```
/// use memory_match::cards::{CardCatalog, CardDefinition, CardValue};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(CardDefinition::new(CardValue::new(1), "Sun"));
///
/// assert_eq!(catalog.get(CardValue::new(1)).unwrap().name, "Sun");
/// assert!(catalog.get(CardValue::new(2)).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardValue, CardDefinition>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with values `1..=count` named "Card 1", "Card 2", ...
    #[must_use]
    pub fn numbered(count: u32) -> Self {
        let mut catalog = Self::new();
        for value in 1..=count {
            catalog.register(CardDefinition::new(CardValue::new(value), format!("Card {}", value)));
        }
        catalog
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same value already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.value) {
            panic!("Card with value {:?} already registered", card.value);
        }
        self.cards.insert(card.value, card);
    }

    /// Remove a card, returning its definition.
    pub fn remove(&mut self, value: CardValue) -> Option<CardDefinition> {
        self.cards.remove(&value)
    }

    /// Get a card definition by value.
    #[must_use]
    pub fn get(&self, value: CardValue) -> Option<&CardDefinition> {
        self.cards.get(&value)
    }

    /// Check if a value is registered.
    #[must_use]
    pub fn contains(&self, value: CardValue) -> bool {
        self.cards.contains_key(&value)
    }

    /// Number of distinct values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All registered values in ascending order.
    ///
    /// Sorted so that draws depend only on the seed, not on hash order.
    #[must_use]
    pub fn values(&self) -> Vec<CardValue> {
        let mut values: Vec<_> = self.cards.keys().copied().collect();
        values.sort_unstable();
        values
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}

impl PairSource for CardCatalog {
    fn draw_values(&self, count: usize, rng: &mut GameRng) -> Result<Vec<CardValue>> {
        rng.sample(&self.values(), count)
            .ok_or(GameError::InsufficientPool {
                requested: count,
                available: self.len(),
            })
    }
}

impl ValueResolver for CardCatalog {
    fn resolve(&self, value: CardValue) -> Result<&CardDefinition> {
        self.get(value).ok_or(GameError::UnknownCardValue(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut catalog = CardCatalog::new();
        catalog.register(CardDefinition::new(CardValue::new(4), "Leaf"));

        assert!(catalog.contains(CardValue::new(4)));
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(CardValue::new(5)).is_none());
    }

    #[test]
    fn test_numbered() {
        let catalog = CardCatalog::numbered(5);
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.get(CardValue::new(3)).unwrap().name, "Card 3");
        assert_eq!(
            catalog.values(),
            (1..=5).map(CardValue::new).collect::<Vec<_>>()
        );
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_value_panics() {
        let mut catalog = CardCatalog::new();
        catalog.register(CardDefinition::new(CardValue::new(1), "A"));
        catalog.register(CardDefinition::new(CardValue::new(1), "B"));
    }

    #[test]
    fn test_draw_distinct_values() {
        let catalog = CardCatalog::numbered(10);
        let mut rng = GameRng::new(42);

        let mut drawn = catalog.draw_values(6, &mut rng).unwrap();
        assert_eq!(drawn.len(), 6);
        drawn.sort();
        drawn.dedup();
        assert_eq!(drawn.len(), 6);
        assert!(drawn.iter().all(|&v| catalog.contains(v)));
    }

    #[test]
    fn test_draw_is_deterministic() {
        let catalog = CardCatalog::numbered(10);
        let a = catalog.draw_values(4, &mut GameRng::new(9)).unwrap();
        let b = catalog.draw_values(4, &mut GameRng::new(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_draw_insufficient_pool() {
        let catalog = CardCatalog::numbered(3);
        let result = catalog.draw_values(4, &mut GameRng::new(1));
        assert!(matches!(
            result,
            Err(GameError::InsufficientPool { requested: 4, available: 3 })
        ));
    }

    #[test]
    fn test_resolve() {
        let mut catalog = CardCatalog::numbered(2);
        assert_eq!(catalog.resolve(CardValue::new(2)).unwrap().name, "Card 2");

        catalog.remove(CardValue::new(2));
        assert!(matches!(
            catalog.resolve(CardValue::new(2)),
            Err(GameError::UnknownCardValue(v)) if v == CardValue::new(2)
        ));
    }
}
