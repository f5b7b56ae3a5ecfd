use crate::scores::ScoreStore;
use crate::terminal::{self, Key, TerminalGuard, GOLD, GREEN, RED};
use anyhow::Result;
use std::time::{Duration, Instant};

pub const NAME: &str = "pi";

const TICK_MS: u64 = 33;
const PI_DIGITS: &str = "3141592653589793238462643383279502884197169399375105820974944592307816406286208998628034825342117067";
const LEVEL_DIGITS: [usize; 6] = [3, 10, 25, 50, 75, 100];
const MAX_INPUT: usize = 110;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback
{
    Empty,
    Correct,
    Completed,
    Incorrect,
}

#[derive(Default)]
pub struct PiQuiz
{
    level: usize,
    input: String,
    level_start_input: String,
    answered: bool,
    feedback: Option<Feedback>,
}

impl PiQuiz
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn level_number(&self) -> usize
    {
        self.level + 1
    }

    pub fn level_count(&self) -> usize
    {
        LEVEL_DIGITS.len()
    }

    pub fn digits_required(&self) -> usize
    {
        LEVEL_DIGITS[self.level]
    }

    pub fn question(&self) -> String
    {
        let count = self.digits_required();
        if count == 3 {
            "What are the first three digits of Pi?".to_string()
        } else {
            format!("What are the first {count} digits of Pi?")
        }
    }

    /// The two accepted spellings: bare digits and the "3." form.
    pub fn answers(&self) -> [String; 2]
    {
        let digits = &PI_DIGITS[..self.digits_required()];
        [digits.to_string(), format!("{}.{}", &digits[..1], &digits[1..])]
    }

    pub fn push(&mut self, ch: char)
    {
        if self.answered || self.input.len() >= MAX_INPUT {
            return;
        }
        if ch.is_ascii_digit() || ch == '.' {
            self.input.push(ch);
        }
    }

    pub fn pop(&mut self)
    {
        if !self.answered {
            self.input.pop();
        }
    }

    pub fn digit_count(&self) -> usize
    {
        self.input.chars().filter(|ch| *ch != '.').count()
    }

    pub fn submit(&mut self) -> Feedback
    {
        let attempt = self.input.trim();
        let feedback = if attempt.is_empty() {
            Feedback::Empty
        } else if self.answers().iter().any(|answer| answer == attempt) {
            self.answered = true;
            if self.level + 1 == LEVEL_DIGITS.len() {
                Feedback::Completed
            } else {
                Feedback::Correct
            }
        } else {
            self.input = self.level_start_input.clone();
            Feedback::Incorrect
        };
        self.feedback = Some(feedback);
        feedback
    }

    /// Moves on after a correct answer, keeping the typed digits so the
    /// player extends them instead of starting over.
    pub fn advance(&mut self) -> bool
    {
        if !self.answered || self.level + 1 >= LEVEL_DIGITS.len() {
            return false;
        }
        self.level += 1;
        self.answered = false;
        self.feedback = None;
        self.level_start_input = self.input.clone();
        true
    }

    /// Enter either checks the answer or, once answered, moves on.
    pub fn enter(&mut self) -> Option<Feedback>
    {
        if self.answered {
            self.advance();
            None
        } else {
            Some(self.submit())
        }
    }

    pub fn levels_cleared(&self) -> usize
    {
        if self.answered {
            self.level + 1
        } else {
            self.level
        }
    }

    pub fn is_complete(&self) -> bool
    {
        self.feedback == Some(Feedback::Completed)
    }

    pub fn input(&self) -> &str
    {
        &self.input
    }

    pub fn feedback(&self) -> Option<Feedback>
    {
        self.feedback
    }
}

pub fn run(scores: &mut ScoreStore) -> Result<()>
{
    let mut term = TerminalGuard::enter()?;
    let mut quiz = PiQuiz::new();
    let mut last_tick = Instant::now();
    log::info!("pi quiz started");

    'game: loop {
        for key in terminal::pending_keys()? {
            match key {
                Key::Quit => break 'game,
                Key::Enter if quiz.is_complete() => break 'game,
                Key::Enter => {
                    if let Some(feedback) = quiz.enter() {
                        log::debug!("pi level {} answer: {feedback:?}", quiz.level_number());
                    }
                }
                Key::Backspace => quiz.pop(),
                Key::Char(ch) => quiz.push(ch),
                _ => {}
            }
        }

        if last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            term.draw(&render(&quiz))?;
            last_tick = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    let cleared = quiz.levels_cleared();
    let new_best = scores.record(NAME, cleared as u32)?;
    log::info!("pi quiz ended with {cleared} levels cleared");

    let mut lines = vec![
        "Pi quiz finished".to_string(),
        String::new(),
        format!("Levels cleared: {}/{}", cleared, quiz.level_count()),
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

fn render(quiz: &PiQuiz) -> Vec<String>
{
    let mut lines = Vec::new();
    lines.push("Term Arcade - Pi Quiz".to_string());
    lines.push(format!("Level {}/{}", quiz.level_number(), quiz.level_count()));
    lines.push(String::new());
    lines.push(quiz.question());
    lines.push(String::new());
    lines.push(format!("> {}", quiz.input()));
    lines.push(format!("Digits: {}/{}", quiz.digit_count(), quiz.digits_required()));
    lines.push(String::new());
    let status = match quiz.feedback() {
        None => String::new(),
        Some(Feedback::Empty) => terminal::paint("Please enter an answer!", RED),
        Some(Feedback::Incorrect) => terminal::paint("Incorrect. Try again!", RED),
        Some(Feedback::Correct) => terminal::paint(
            &format!(
                "Correct! The first {} digits are {}. Press ENTER for the next level.",
                quiz.digits_required(),
                quiz.answers()[1]
            ),
            GREEN,
        ),
        Some(Feedback::Completed) => terminal::paint(
            &format!(
                "LEGENDARY! You are a Pi master with {} digits. Press ENTER to finish.",
                quiz.digits_required()
            ),
            GOLD,
        ),
    };
    lines.push(status);
    lines.push("Type digits (a '.' is allowed), ENTER to check, ESC to quit.".to_string());
    lines
}
