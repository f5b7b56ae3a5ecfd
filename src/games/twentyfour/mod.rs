mod deck;
mod expr;
mod solver;

use deck::{Card, hand_values};
use expr::{ExprError, Ratio};

use crate::config::TwentyFourConfig;
use crate::scores::ScoreStore;
use crate::terminal::{self, Key, Rgb, TerminalGuard, GOLD, GREEN, RED};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

pub const NAME: &str = "twentyfour";

const TICK_MS: u64 = 33;
const MAX_INPUT: usize = 60;
const MAX_DEAL_ATTEMPTS: usize = 100;
const CARD_RED: Rgb = Rgb::new(220, 50, 50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome
{
    Correct,
    WrongValue(Ratio),
    WrongCards,
    Invalid(ExprError),
}

pub struct TwentyFour
{
    config: TwentyFourConfig,
    rng: StdRng,
    hand: Vec<Card>,
    score: u32,
    hands_dealt: u32,
}

impl TwentyFour
{
    pub fn new(config: TwentyFourConfig, seed: u64) -> Self
    {
        let mut game = Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            hand: Vec::new(),
            score: 0,
            hands_dealt: 0,
        };
        game.new_hand();
        game
    }

    pub fn new_hand(&mut self)
    {
        self.hand = if self.config.solvable_only {
            deck::deal_solvable(&mut self.rng, self.config.target, MAX_DEAL_ATTEMPTS)
        } else {
            deck::deal(&mut self.rng)
        };
        self.hands_dealt += 1;
    }

    /// Correct answers use each card value exactly once and hit the target.
    pub fn submit(&mut self, input: &str) -> Outcome
    {
        let evaluation = match expr::evaluate(input) {
            Ok(evaluation) => evaluation,
            Err(err) => return Outcome::Invalid(err),
        };
        let mut used = evaluation.numbers;
        used.sort_unstable();
        let mut values = hand_values(&self.hand);
        values.sort_unstable();
        if used != values {
            return Outcome::WrongCards;
        }
        if !evaluation.value.equals_int(self.config.target) {
            return Outcome::WrongValue(evaluation.value);
        }
        self.score += 1;
        self.new_hand();
        Outcome::Correct
    }

    /// Gives up on the current hand: returns one solution (if any) and deals
    /// again without scoring.
    pub fn reveal(&mut self) -> Option<String>
    {
        let solution = solver::solve(&hand_values(&self.hand), self.config.target);
        self.new_hand();
        solution
    }

    pub fn hand(&self) -> &[Card]
    {
        &self.hand
    }

    pub fn score(&self) -> u32
    {
        self.score
    }

    pub fn target(&self) -> i64
    {
        self.config.target
    }
}

pub fn run(config: TwentyFourConfig, scores: &mut ScoreStore) -> Result<()>
{
    let mut term = TerminalGuard::enter()?;
    let mut game = TwentyFour::new(config, rand::random());
    let mut input = String::new();
    let mut status: Option<(String, Rgb)> = None;
    let mut last_tick = Instant::now();
    log::info!("24 session started, target {}", game.target());

    'game: loop {
        for key in terminal::pending_keys()? {
            match key {
                Key::Quit => break 'game,
                Key::Char(ch) => {
                    if input.len() < MAX_INPUT {
                        input.push(ch);
                    }
                }
                Key::Backspace => {
                    input.pop();
                }
                Key::Enter => {
                    let outcome = game.submit(&input);
                    log::debug!("24 answer {input:?}: {outcome:?}");
                    status = Some(describe(&outcome, game.target()));
                    if outcome == Outcome::Correct {
                        input.clear();
                    }
                }
                Key::Tab => {
                    let text = match game.reveal() {
                        Some(solution) => format!("One solution: {solution}. New hand dealt."),
                        None => "That hand had no solution. New hand dealt.".to_string(),
                    };
                    status = Some((text, GOLD));
                    input.clear();
                }
                Key::Ctrl('n') => {
                    game.new_hand();
                    status = Some(("New hand dealt.".to_string(), GOLD));
                    input.clear();
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            term.draw(&render(&game, &input, status.as_ref()))?;
            last_tick = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    let new_best = scores.record(NAME, game.score())?;
    log::info!(
        "24 session ended with score {} over {} hands",
        game.score(),
        game.hands_dealt
    );

    let mut lines = vec![
        "24 finished".to_string(),
        String::new(),
        format!("Solved: {}", game.score()),
        format!("Best: {}", scores.best(NAME)),
    ];
    if new_best {
        lines.push(terminal::paint("New personal best!", GOLD));
    }
    lines.push(String::new());
    lines.push("Press SPACE to exit.".to_string());
    term.draw(&lines)?;
    terminal::wait_for_space()?;
    Ok(())
}

fn describe(outcome: &Outcome, target: i64) -> (String, Rgb)
{
    match outcome {
        Outcome::Correct => (format!("Correct! That makes {target}. New hand dealt."), GREEN),
        Outcome::WrongValue(value) => (format!("That makes {value}, not {target}."), RED),
        Outcome::WrongCards => ("Use each of the four cards exactly once.".to_string(), RED),
        Outcome::Invalid(err) => (format!("Invalid expression: {err}"), RED),
    }
}

fn render(game: &TwentyFour, input: &str, status: Option<&(String, Rgb)>) -> Vec<String>
{
    let cards: Vec<String> = game
        .hand()
        .iter()
        .map(|card| {
            let face = format!("[ {:>3} ]", card.label());
            if card.suit.is_red() {
                terminal::paint(&face, CARD_RED)
            } else {
                face
            }
        })
        .collect();

    let mut lines = Vec::new();
    lines.push(format!("Term Arcade - {}", game.target()));
    lines.push(format!("Solved: {}", game.score()));
    lines.push(String::new());
    lines.push(format!("  {}", cards.join("  ")));
    lines.push(format!(
        "  Values: {}",
        hand_values(game.hand())
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    ));
    lines.push(String::new());
    lines.push(format!("Make {} with + - * / and parentheses.", game.target()));
    lines.push(format!("> {input}"));
    lines.push(match status {
        Some((text, color)) => terminal::paint(text, *color),
        None => String::new(),
    });
    lines.push("ENTER check, TAB show a solution, Ctrl-N new hand, ESC quit".to_string());
    lines
}
