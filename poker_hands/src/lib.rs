pub mod hand;
pub use hand::{
    constants::{self, DECK_SIZE, HAND_SIZE},
    entities::{self, Card, Category, Deck, DeckError, Suit, ValidationError, Value},
    functional, Hand, HandError, HandReport, Showdown,
};

pub mod notation;
pub use notation::{parse_cards, parse_hand, NotationError};
