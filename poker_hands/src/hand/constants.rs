pub const HAND_SIZE: usize = 5;
pub const DECK_SIZE: usize = RANKS.len() * SUITS.len();

// Card value is a rank's index plus two, so the ace is high (14).
pub const RANKS: [&str; 13] = [
    "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "A",
];
pub const SUITS: [&str; 4] = ["hearts", "diamonds", "clubs", "spades"];
