use log::debug;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};
use thiserror::Error;

pub mod constants;
pub mod entities;
pub mod functional;

use constants::HAND_SIZE;
use entities::{Card, Category, Value};

#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum HandError {
    #[error("a hand needs exactly 5 cards, got {size}")]
    InvalidHandSize { size: usize },
}

/// Result of putting one hand against another.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Showdown {
    FirstWins,
    SecondWins,
    Tie,
}

impl From<Ordering> for Showdown {
    fn from(value: Ordering) -> Self {
        match value {
            Ordering::Greater => Self::FirstWins,
            Ordering::Less => Self::SecondWins,
            Ordering::Equal => Self::Tie,
        }
    }
}

impl fmt::Display for Showdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::FirstWins => "first wins",
            Self::SecondWins => "second wins",
            Self::Tie => "tie",
        };
        write!(f, "{repr}")
    }
}

/// A classified five-card hand.
///
/// Cards are kept sorted by decreasing value. Two hands are equal when
/// they have the same poker strength, so hands made of different cards
/// (e.g. two royal flushes) can compare equal.
#[derive(Clone, Debug)]
pub struct Hand {
    cards: [Card; HAND_SIZE],
    category: Category,
    /// Values compared after the category, strongest first. A wheel
    /// straight is ranked by its five here even though its ace still
    /// sorts first in `cards`.
    tie_breaker: Vec<Value>,
}

impl Hand {
    /// Classify exactly five cards.
    ///
    /// # Examples
    ///
    /// ```
    /// use poker_hands::{entities::{Card, Category}, Hand, HandError};
    ///
    /// let cards: Vec<Card> = ["A", "K", "Q", "J", "10"]
    ///     .iter()
    ///     .map(|rank| Card::new(rank, "hearts").unwrap())
    ///     .collect();
    /// let hand = Hand::new(&cards).unwrap();
    /// assert_eq!(hand.category(), Category::RoyalFlush);
    /// assert_eq!(Hand::new(&cards[..4]).unwrap_err(), HandError::InvalidHandSize { size: 4 });
    /// ```
    pub fn new(cards: &[Card]) -> Result<Self, HandError> {
        let cards: [Card; HAND_SIZE] = cards
            .try_into()
            .map_err(|_| HandError::InvalidHandSize { size: cards.len() })?;
        Ok(Self::from(cards))
    }

    #[must_use]
    pub fn cards(&self) -> &[Card; HAND_SIZE] {
        &self.cards
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Full ordering between two hands, category first.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        functional::compare(&self.key(), &other.key())
    }

    /// The comparison key: the category's strength followed by the
    /// tie-breaker.
    #[must_use]
    pub fn key(&self) -> Vec<Value> {
        let mut key = Vec::with_capacity(self.tie_breaker.len() + 1);
        key.push(self.category.strength());
        key.extend(&self.tie_breaker);
        key
    }

    #[must_use]
    pub fn report(&self) -> HandReport {
        HandReport {
            cards: self.cards.iter().map(Card::to_string).collect(),
            category: self.category,
            name: self.category.name().to_string(),
            key: self.key(),
        }
    }

    #[must_use]
    pub fn showdown(&self, other: &Self) -> Showdown {
        self.compare(other).into()
    }

    #[must_use]
    pub fn tie_breaker(&self) -> &[Value] {
        &self.tie_breaker
    }
}

impl From<[Card; HAND_SIZE]> for Hand {
    fn from(mut cards: [Card; HAND_SIZE]) -> Self {
        // Stable, so equal values keep their input order.
        cards.sort_by(|c1, c2| c2.value().cmp(&c1.value()));
        let (category, tie_breaker) = functional::eval(&cards);
        let hand = Self {
            cards,
            category,
            tie_breaker,
        };
        debug!("classified {hand} as {:?}", hand.key());
        hand
    }
}

impl TryFrom<Vec<Card>> for Hand {
    type Error = HandError;

    fn try_from(value: Vec<Card>) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards = self
            .cards
            .iter()
            .map(Card::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{cards} ({})", self.category)
    }
}

impl Eq for Hand {}

impl Ord for Hand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialEq for Hand {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other).is_eq()
    }
}

impl PartialOrd for Hand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A serializable summary of a classified hand.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandReport {
    pub cards: Vec<String>,
    pub category: Category,
    pub name: String,
    pub key: Vec<Value>,
}
