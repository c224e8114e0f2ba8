use log::trace;
use rand::Rng;
use std::{cmp::Ordering, collections::BTreeMap};

use super::{
    constants::{DECK_SIZE, HAND_SIZE},
    entities::{ACE, Card, Category, Suit, Value, WHEEL_HIGH},
    Hand,
};

/// Card values grouped by how many times they occur in a hand. Each group
/// is sorted in decreasing order, e.g. a full house of tens over fours
/// groups as `{2: [4], 3: [10]}`.
pub type Groups = BTreeMap<usize, Vec<Value>>;

/// Compare two comparison keys element by element. The first differing
/// position decides; if one key is a prefix of the other, the hands are
/// equal up to the shorter length.
pub fn compare(key1: &[Value], key2: &[Value]) -> Ordering {
    key1.iter()
        .zip(key2)
        .map(|(v1, v2)| v1.cmp(v2))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Get the indices corresponding to the winning hands from an array
/// of hands.
///
/// # Examples
///
/// ```
/// use poker_hands::{functional::argmax, Hand};
///
/// let hand1: Hand = "Kh Kd Kc Ks 5h".parse().unwrap();
/// let hand2: Hand = "Kh Kd Kc Ks Ah".parse().unwrap();
/// let hand3: Hand = "Ks Kc Kd Kh Ad".parse().unwrap();
/// assert_eq!(argmax(&[hand1, hand2, hand3]), vec![1, 2])
/// ```
pub fn argmax(hands: &[Hand]) -> Vec<usize> {
    let mut max: Option<&Hand> = None;
    let mut argmaxes: Vec<usize> = Vec::new();
    for (i, hand) in hands.iter().enumerate() {
        let ordering = match max {
            Some(best) => hand.cmp(best),
            None => Ordering::Greater,
        };
        match ordering {
            Ordering::Equal => argmaxes.push(i),
            Ordering::Greater => {
                argmaxes.clear();
                argmaxes.push(i);
                max = Some(hand);
            }
            _ => {}
        }
    }
    argmaxes
}

/// Evaluate exactly five cards, returning the hand's category and its
/// tie-breaker (the values compared after the category).
///
/// Everything is derived in one pass over the cards sorted by decreasing
/// value: the value groups, the flush flag and the straight's high card.
/// The category is then picked strongest first and the tie-breaker is
/// built from the groups for that category.
///
/// # Examples
///
/// ```
/// use poker_hands::{entities::{Card, Category}, functional::eval};
///
/// let cards = [
///     Card::new("5", "hearts").unwrap(),
///     Card::new("4", "clubs").unwrap(),
///     Card::new("3", "spades").unwrap(),
///     Card::new("2", "diamonds").unwrap(),
///     Card::new("A", "hearts").unwrap(),
/// ];
/// let (category, tie_breaker) = eval(&cards);
/// assert_eq!(category, Category::Straight);
/// assert_eq!(tie_breaker, vec![5]);
/// ```
pub fn eval(cards: &[Card; HAND_SIZE]) -> (Category, Vec<Value>) {
    let mut values = cards.map(|card| card.value());
    values.sort_unstable_by(|v1, v2| v2.cmp(v1));

    let groups = group_by_count(&values);
    let flush = is_flush(cards);
    let straight = straight_high(&values);
    let has = |count: usize| groups.contains_key(&count);

    let category = match (flush, straight) {
        (true, Some(ACE)) => Category::RoyalFlush,
        (true, Some(_)) => Category::StraightFlush,
        _ if has(4) => Category::FourOfAKind,
        _ if has(3) && has(2) => Category::FullHouse,
        (true, None) => Category::Flush,
        (false, Some(_)) => Category::Straight,
        _ if has(3) => Category::ThreeOfAKind,
        _ => match groups.get(&2).map_or(0, Vec::len) {
            2 => Category::TwoPair,
            1 => Category::OnePair,
            _ => Category::HighCard,
        },
    };

    let tie_breaker = match category {
        Category::RoyalFlush => Vec::new(),
        Category::StraightFlush | Category::Straight => straight.into_iter().collect(),
        Category::FourOfAKind => top(&groups, 4, 1).chain(top(&groups, 1, 1)).collect(),
        Category::FullHouse => top(&groups, 3, 1).chain(top(&groups, 2, 1)).collect(),
        Category::Flush | Category::HighCard => values.to_vec(),
        Category::ThreeOfAKind => top(&groups, 3, 1).chain(top(&groups, 1, 2)).collect(),
        Category::TwoPair => top(&groups, 2, 2).chain(top(&groups, 1, 1)).collect(),
        Category::OnePair => top(&groups, 2, 1).chain(top(&groups, 1, 3)).collect(),
    };
    (category, tie_breaker)
}

/// Group values (assumed sorted in decreasing order) by their number of
/// occurrences.
pub fn group_by_count(values: &[Value]) -> Groups {
    let mut value_counts: BTreeMap<Value, usize> = BTreeMap::new();
    for value in values {
        *value_counts.entry(*value).or_insert(0) += 1;
    }

    // Walking the counts from the highest value down keeps each
    // group in decreasing order.
    let mut groups = Groups::new();
    for (value, count) in value_counts.into_iter().rev() {
        groups.entry(count).or_default().push(value);
    }
    groups
}

#[must_use]
pub fn is_flush(cards: &[Card]) -> bool {
    match cards.first() {
        Some(first) => cards.iter().all(|card| card.suit() == first.suit()),
        None => false,
    }
}

/// Create a new, unshuffled deck of cards. Cards are ordered by suit
/// and then by increasing value within each suit.
pub fn new_deck() -> [Card; DECK_SIZE] {
    let mut deck: [Card; DECK_SIZE] = [Card(2, Suit::Heart); DECK_SIZE];
    for (i, suit) in Suit::ALL.into_iter().enumerate() {
        for (j, value) in (2..=ACE).enumerate() {
            deck[13 * i + j] = Card(value, suit);
        }
    }
    deck
}

/// Fisher-Yates shuffle: walking down from the last position, swap each
/// position with a uniformly chosen position at or below it.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        trace!("swapping {i} and {j}");
        items.swap(i, j);
    }
}

/// The high card of a straight, if the values (sorted in decreasing
/// order) form one. The wheel (A-5-4-3-2) is ranked by its five, not its
/// ace.
#[must_use]
pub fn straight_high(values: &[Value; HAND_SIZE]) -> Option<Value> {
    if *values == [ACE, 5, 4, 3, 2] {
        return Some(WHEEL_HIGH);
    }
    if values.windows(2).all(|pair| pair[0] == pair[1] + 1) {
        return Some(values[0]);
    }
    None
}

fn top(groups: &Groups, count: usize, n: usize) -> impl Iterator<Item = Value> + '_ {
    groups.get(&count).into_iter().flatten().copied().take(n)
}
