use super::solver;
use rand::Rng;

pub const HAND_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suit
{
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit
{
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn symbol(self) -> char
    {
        match self {
            Suit::Hearts => '\u{2665}',
            Suit::Diamonds => '\u{2666}',
            Suit::Clubs => '\u{2663}',
            Suit::Spades => '\u{2660}',
        }
    }

    pub fn is_red(self) -> bool
    {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card
{
    pub value: u8,
    pub suit: Suit,
}

impl Card
{
    pub fn rank(self) -> String
    {
        match self.value {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            value => value.to_string(),
        }
    }

    pub fn label(self) -> String
    {
        format!("{}{}", self.rank(), self.suit.symbol())
    }
}

pub struct Deck
{
    cards: Vec<Card>,
}

impl Deck
{
    pub fn new() -> Self
    {
        let cards = Suit::ALL
            .iter()
            .flat_map(|suit| (1..=13).map(move |value| Card { value, suit: *suit }))
            .collect();
        Self { cards }
    }

    /// Fisher-Yates, walking down from the last card.
    pub fn shuffle(&mut self, rng: &mut impl Rng)
    {
        for i in (1..self.cards.len()).rev() {
            let j = rng.gen_range(0..=i);
            self.cards.swap(i, j);
        }
    }

    pub fn draw(&mut self, count: usize) -> Vec<Card>
    {
        let keep = self.cards.len().saturating_sub(count);
        self.cards.split_off(keep)
    }
}

impl Default for Deck
{
    fn default() -> Self
    {
        Self::new()
    }
}

pub fn hand_values(hand: &[Card]) -> Vec<i64>
{
    hand.iter().map(|card| card.value as i64).collect()
}

/// Four cards off a freshly shuffled deck.
pub fn deal(rng: &mut impl Rng) -> Vec<Card>
{
    let mut deck = Deck::new();
    deck.shuffle(rng);
    deck.draw(HAND_SIZE)
}

/// Redeals until the hand can reach `target`, giving up after
/// `max_attempts` and keeping the last hand.
pub fn deal_solvable(rng: &mut impl Rng, target: i64, max_attempts: usize) -> Vec<Card>
{
    let mut hand = deal(rng);
    for attempt in 1..max_attempts {
        if solver::solve(&hand_values(&hand), target).is_some() {
            return hand;
        }
        log::debug!("hand {attempt} has no solution for {target}, redealing");
        hand = deal(rng);
    }
    hand
}
