use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{array, fmt};
use thiserror::Error;

use super::{
    constants::{DECK_SIZE, HAND_SIZE, RANKS, SUITS},
    functional, Hand,
};

/// Placeholder for card values (two=2u8 ... ace=14u8).
pub type Value = u8;

pub const ACE: Value = 14;
/// High card a wheel (A-2-3-4-5) straight is ranked by.
pub const WHEEL_HIGH: Value = 5;

#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum ValidationError {
    #[error("invalid rank: {rank}")]
    InvalidRank { rank: String },
    #[error("invalid suit: {suit}")]
    InvalidSuit { suit: String },
    #[error("invalid card value: {value}")]
    InvalidValue { value: Value },
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Heart,
    Diamond,
    Club,
    Spade,
}

impl Suit {
    /// All suits in deck order.
    pub const ALL: [Suit; 4] = [Suit::Heart, Suit::Diamond, Suit::Club, Suit::Spade];

    /// Look up a suit by its full name ("hearts", "diamonds", ...).
    pub fn from_name(name: &str) -> Result<Self, ValidationError> {
        SUITS
            .iter()
            .position(|s| *s == name)
            .map(|i| Self::ALL[i])
            .ok_or_else(|| ValidationError::InvalidSuit {
                suit: name.to_string(),
            })
    }

    #[must_use]
    pub fn glyph(&self) -> char {
        match self {
            Self::Heart => '♥',
            Self::Diamond => '♦',
            Self::Club => '♣',
            Self::Spade => '♠',
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        SUITS[*self as usize]
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Heart => "h",
            Self::Diamond => "d",
            Self::Club => "c",
            Self::Spade => "s",
        };
        write!(f, "{repr}")
    }
}

/// A card is a tuple of a uInt8 value (two=2u8 ... ace=14u8) and a suit.
/// Cards can only be created through validated constructors, so a
/// `Card` always holds a value within `2..=14`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "(Value, Suit)", into = "(Value, Suit)")]
pub struct Card(pub(crate) Value, pub(crate) Suit);

impl Card {
    /// Create a card from a rank symbol ("2" ... "10", "J", "Q", "K", "A")
    /// and a suit name ("hearts", "diamonds", "clubs", "spades").
    ///
    /// # Examples
    ///
    /// ```
    /// use poker_hands::entities::Card;
    ///
    /// let card = Card::new("A", "hearts").unwrap();
    /// assert_eq!(card.value(), 14);
    /// assert_eq!(card.to_string(), "A♥");
    /// assert!(Card::new("1", "hearts").is_err());
    /// ```
    pub fn new(rank: &str, suit: &str) -> Result<Self, ValidationError> {
        let idx = RANKS
            .iter()
            .position(|r| *r == rank)
            .ok_or_else(|| ValidationError::InvalidRank {
                rank: rank.to_string(),
            })?;
        let suit = Suit::from_name(suit)?;
        Ok(Self(idx as Value + 2, suit))
    }

    pub fn from_value(value: Value, suit: Suit) -> Result<Self, ValidationError> {
        if !(2..=ACE).contains(&value) {
            return Err(ValidationError::InvalidValue { value });
        }
        Ok(Self(value, suit))
    }

    #[must_use]
    pub fn is_ace(&self) -> bool {
        self.0 == ACE
    }

    #[must_use]
    pub fn rank(&self) -> &'static str {
        RANKS[(self.0 - 2) as usize]
    }

    #[must_use]
    pub fn suit(&self) -> Suit {
        self.1
    }

    #[must_use]
    pub fn value(&self) -> Value {
        self.0
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank(), self.1.glyph())
    }
}

impl From<Card> for (Value, Suit) {
    fn from(value: Card) -> Self {
        (value.0, value.1)
    }
}

impl TryFrom<(Value, Suit)> for Card {
    type Error = ValidationError;

    fn try_from(value: (Value, Suit)) -> Result<Self, Self::Error> {
        Self::from_value(value.0, value.1)
    }
}

/// Hand strength categories, weakest first. The discriminant is the
/// category's numeric strength and leads every comparison key.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Category {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::HighCard,
        Category::OnePair,
        Category::TwoPair,
        Category::ThreeOfAKind,
        Category::Straight,
        Category::Flush,
        Category::FullHouse,
        Category::FourOfAKind,
        Category::StraightFlush,
        Category::RoyalFlush,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::HighCard => "High Card",
            Self::OnePair => "One Pair",
            Self::TwoPair => "Two Pair",
            Self::ThreeOfAKind => "Three of a Kind",
            Self::Straight => "Straight",
            Self::Flush => "Flush",
            Self::FullHouse => "Full House",
            Self::FourOfAKind => "Four of a Kind",
            Self::StraightFlush => "Straight Flush",
            Self::RoyalFlush => "Royal Flush",
        }
    }

    #[must_use]
    pub fn strength(&self) -> Value {
        *self as Value
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum DeckError {
    #[error("can't deal {requested} cards from a deck of {remaining}")]
    InsufficientCards { requested: usize, remaining: usize },
}

/// A single 52-card deck. Dealing takes cards off the top, so the deck
/// only ever shrinks.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Cards still in the deck, top first.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Remove and return the top `n` cards.
    ///
    /// # Examples
    ///
    /// ```
    /// use poker_hands::entities::Deck;
    ///
    /// let mut deck = Deck::standard();
    /// let cards = deck.deal(5).unwrap();
    /// assert_eq!(cards.len(), 5);
    /// assert_eq!(deck.len(), 47);
    /// assert!(deck.deal(48).is_err());
    /// ```
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        if n > self.cards.len() {
            return Err(DeckError::InsufficientCards {
                requested: n,
                remaining: self.cards.len(),
            });
        }
        debug!("dealing {n} of {} cards", self.cards.len());
        Ok(self.cards.drain(..n).collect())
    }

    /// Deal the top five cards straight into a classified hand.
    pub fn deal_hand(&mut self) -> Result<Hand, DeckError> {
        if HAND_SIZE > self.cards.len() {
            return Err(DeckError::InsufficientCards {
                requested: HAND_SIZE,
                remaining: self.cards.len(),
            });
        }
        let cards: [Card; HAND_SIZE] = array::from_fn(|i| self.cards[i]);
        self.cards.drain(..HAND_SIZE);
        Ok(Hand::from(cards))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Shuffle the remaining cards in place with the given generator.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        functional::shuffle(&mut self.cards, rng);
    }

    /// A full, unshuffled deck.
    #[must_use]
    pub fn standard() -> Self {
        let cards = functional::new_deck();
        debug_assert_eq!(cards.len(), DECK_SIZE);
        Self {
            cards: cards.to_vec(),
        }
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = self
            .cards
            .iter()
            .map(Card::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{repr}")
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    use super::{Card, Category, Deck, DeckError, Suit, ValidationError, ACE};
    use crate::hand::constants::{DECK_SIZE, RANKS, SUITS};

    #[test]
    fn card_values_increase_with_rank() {
        for suit in SUITS {
            let values: Vec<_> = RANKS
                .iter()
                .map(|rank| Card::new(rank, suit).unwrap().value())
                .collect();
            assert_eq!(values.first(), Some(&2));
            assert_eq!(values.last(), Some(&ACE));
            assert!(values.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn card_rank_and_suit_names_round_trip() {
        for card in Deck::standard().cards() {
            let suit = card.suit();
            assert_eq!(Suit::from_name(suit.name()), Ok(suit));
            assert_eq!(Card::new(card.rank(), suit.name()).as_ref(), Ok(card));
        }
        assert_eq!(Suit::Spade.name(), "spades");
    }

    #[test]
    fn card_rejects_bad_rank_and_suit() {
        assert_eq!(
            Card::new("1", "hearts"),
            Err(ValidationError::InvalidRank {
                rank: "1".to_string()
            })
        );
        assert_eq!(
            Card::new("A", "invalid"),
            Err(ValidationError::InvalidSuit {
                suit: "invalid".to_string()
            })
        );
        assert_eq!(
            Card::from_value(15, Suit::Club),
            Err(ValidationError::InvalidValue { value: 15 })
        );
        assert!(Card::from_value(1, Suit::Club).is_err());
    }

    #[test]
    fn card_display_and_ace() {
        let ace_hearts = Card::new("A", "hearts").unwrap();
        let king_spades = Card::new("K", "spades").unwrap();
        let ten_clubs = Card::new("10", "clubs").unwrap();
        assert!(ace_hearts.is_ace());
        assert!(!king_spades.is_ace());
        assert_eq!(ace_hearts.to_string(), "A♥");
        assert_eq!(king_spades.to_string(), "K♠");
        assert_eq!(ten_clubs.to_string(), "10♣");
        assert_eq!(king_spades.value(), 13);
        assert_eq!(ten_clubs.suit(), Suit::Club);
    }

    #[test]
    fn card_deserialization_is_validated() {
        let card = Card::new("Q", "diamonds").unwrap();
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(serde_json::from_str::<Card>(&json).unwrap(), card);
        assert!(serde_json::from_str::<Card>("[20,\"Heart\"]").is_err());
    }

    #[test]
    fn category_strengths_are_ordered() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.strength() as usize, i);
        }
        assert_eq!(Category::RoyalFlush.strength(), 9);
        assert_eq!(Category::FullHouse.to_string(), "Full House");
    }

    #[test]
    fn standard_deck_is_complete() {
        let deck = Deck::standard();
        assert_eq!(deck.len(), DECK_SIZE);
        let unique: HashSet<_> = deck.cards().iter().collect();
        assert_eq!(unique.len(), DECK_SIZE);
        assert_eq!(deck, Deck::default());
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut deck = Deck::standard();
        deck.shuffle(&mut StdRng::seed_from_u64(7));
        assert_eq!(deck.len(), DECK_SIZE);
        let mut shuffled = deck.cards().to_vec();
        let mut original = Deck::standard().cards().to_vec();
        shuffled.sort();
        original.sort();
        assert_eq!(shuffled, original);
    }

    #[test]
    fn shuffle_is_deterministic_per_seed() {
        let mut deck1 = Deck::standard();
        let mut deck2 = Deck::standard();
        let mut deck3 = Deck::standard();
        deck1.shuffle(&mut StdRng::seed_from_u64(42));
        deck2.shuffle(&mut StdRng::seed_from_u64(42));
        deck3.shuffle(&mut StdRng::seed_from_u64(43));
        assert_eq!(deck1, deck2);
        assert_ne!(deck1, deck3);
        assert_ne!(deck1, Deck::standard());
    }

    #[test]
    fn deal_shrinks_deck() {
        let mut deck = Deck::standard();
        deck.shuffle(&mut StdRng::seed_from_u64(0));
        let dealt = deck.deal(5).unwrap();
        assert_eq!(dealt.len(), 5);
        assert_eq!(deck.len(), DECK_SIZE - 5);
        assert!(dealt.iter().all(|card| !deck.cards().contains(card)));

        let rest = deck.deal(deck.len()).unwrap();
        assert_eq!(rest.len(), DECK_SIZE - 5);
        assert!(deck.is_empty());
        assert_eq!(deck.deal(0), Ok(vec![]));
    }

    #[test]
    fn deal_too_many_fails() {
        let mut deck = Deck::standard();
        assert_eq!(
            deck.deal(DECK_SIZE + 1),
            Err(DeckError::InsufficientCards {
                requested: DECK_SIZE + 1,
                remaining: DECK_SIZE
            })
        );
        // A failed deal leaves the deck untouched.
        assert_eq!(deck.len(), DECK_SIZE);
    }

    #[test]
    fn deal_hand_until_exhausted() {
        let mut deck = Deck::standard();
        for _ in 0..DECK_SIZE / 5 {
            assert!(deck.deal_hand().is_ok());
        }
        assert_eq!(deck.len(), 2);
        assert_eq!(
            deck.deal_hand().map(|hand| hand.category()),
            Err(DeckError::InsufficientCards {
                requested: 5,
                remaining: 2
            })
        );
    }
}
