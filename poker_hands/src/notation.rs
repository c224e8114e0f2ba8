//! Parsing of human-readable hand notation.
//!
//! Two card forms are accepted and can be mixed freely:
//!
//! - a rank character followed by a suit letter, e.g. `Ah`, `Td`, `9s`
//! - a rank numeral or name followed by a suit glyph, e.g. `10♥`, `King♠`
//!
//! Cards are separated by whitespace or commas.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::hand::{
    constants::HAND_SIZE,
    entities::{ACE, Card, Suit, ValidationError, Value},
    Hand,
};

#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum NotationError {
    #[error("malformed notation: unrecognized card `{token}`")]
    MalformedCard { token: String },
    #[error("malformed notation: a hand needs exactly 5 cards, got {found}")]
    WrongCardCount { found: usize },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Parse a single card token.
pub fn parse_card(token: &str) -> Result<Card, NotationError> {
    let malformed = || NotationError::MalformedCard {
        token: token.to_string(),
    };

    // Glyphs copied from some terminals carry an emoji presentation
    // selector after them.
    let mut chars = token.strip_suffix('\u{fe0f}').unwrap_or(token).chars();
    let suit = chars.next_back().and_then(parse_suit).ok_or_else(malformed)?;
    let value = parse_rank(chars.as_str()).ok_or_else(malformed)?;
    Ok(Card::from_value(value, suit)?)
}

/// Parse any number of cards.
///
/// # Examples
///
/// ```
/// use poker_hands::notation::parse_cards;
///
/// let cards = parse_cards("Ah, 10♦ Queen♣").unwrap();
/// assert_eq!(cards.len(), 3);
/// assert!(parse_cards("Ah Xz").is_err());
/// ```
pub fn parse_cards(notation: &str) -> Result<Vec<Card>, NotationError> {
    notation
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(parse_card)
        .collect()
}

/// Parse exactly five cards into a classified hand.
///
/// # Examples
///
/// ```
/// use poker_hands::{entities::Category, notation::parse_hand};
///
/// let hand = parse_hand("Th Td Ts 4c 4h").unwrap();
/// assert_eq!(hand.category(), Category::FullHouse);
/// assert!(parse_hand("Th Td Ts 4c").is_err());
/// ```
pub fn parse_hand(notation: &str) -> Result<Hand, NotationError> {
    let cards: [Card; HAND_SIZE] = parse_cards(notation)?
        .try_into()
        .map_err(|cards: Vec<Card>| NotationError::WrongCardCount { found: cards.len() })?;
    Ok(Hand::from(cards))
}

fn parse_rank(rank: &str) -> Option<Value> {
    let value = match rank.to_lowercase().as_str() {
        "a" | "ace" | "as" => ACE,
        "k" | "king" | "roi" => 13,
        "q" | "queen" | "dame" => 12,
        "j" | "jack" | "valet" => 11,
        "t" | "ten" => 10,
        "10" => 10,
        numeral => match numeral.as_bytes() {
            [digit @ b'2'..=b'9'] => *digit - b'0',
            _ => return None,
        },
    };
    Some(value)
}

fn parse_suit(suit: char) -> Option<Suit> {
    match suit.to_ascii_lowercase() {
        'h' | '♥' | '♡' => Some(Suit::Heart),
        'd' | '♦' | '♢' => Some(Suit::Diamond),
        'c' | '♣' | '♧' => Some(Suit::Club),
        's' | '♠' | '♤' => Some(Suit::Spade),
        _ => None,
    }
}

impl FromStr for Card {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_card(s.trim())
    }
}

impl FromStr for Hand {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hand(s)
    }
}
