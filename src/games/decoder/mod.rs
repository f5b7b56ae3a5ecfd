mod cipher;

use cipher::{Challenge, CipherMap, PracticeRound, PUNCTUATION};

use crate::terminal::{self, Key, Rgb, TerminalGuard, GOLD, GREEN, GREY, RED};
use anyhow::Result;
use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

pub const NAME: &str = "decoder";

const TICK_MS: u64 = 33;
const MAX_INPUT: usize = 120;
const KEY_COLUMNS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode
{
    /// Decode messages written with a known cipher
    Challenge,
    /// Build your own cipher and practice with it
    Create,
}

enum Screen
{
    Challenge(Challenge),
    Setup
    {
        cursor: usize,
        show_punctuation: bool,
        confirm_empty: bool,
    },
    Practice
    {
        round: PracticeRound,
        selected: usize,
    },
}

struct Decoder
{
    rng: StdRng,
    screen: Screen,
    map: CipherMap,
    input: String,
    status: Option<(String, Rgb)>,
    challenges_solved: u32,
    rounds_completed: u32,
}

fn key_sources(show_punctuation: bool) -> Vec<char>
{
    let mut sources: Vec<char> = cipher::letters().chain(cipher::digits()).collect();
    if show_punctuation {
        sources.extend(PUNCTUATION);
    }
    sources
}

fn source_label(source: char) -> String
{
    if source == ' ' {
        "SPC".to_string()
    } else {
        source.to_string()
    }
}

impl Decoder
{
    fn new(mode: Mode, seed: u64) -> Self
    {
        let mut decoder = Self {
            rng: StdRng::seed_from_u64(seed),
            screen: Screen::Setup {
                cursor: 0,
                show_punctuation: false,
                confirm_empty: false,
            },
            map: CipherMap::default(),
            input: String::new(),
            status: None,
            challenges_solved: 0,
            rounds_completed: 0,
        };
        if mode == Mode::Challenge {
            decoder.new_challenge();
        }
        decoder
    }

    fn set_status(&mut self, text: &str, color: Rgb)
    {
        self.status = Some((text.to_string(), color));
    }

    fn new_challenge(&mut self)
    {
        let challenge = Challenge::random(&mut self.rng);
        log::debug!("decoder challenge uses {}", challenge.preset.name);
        self.screen = Screen::Challenge(challenge);
        self.input.clear();
        self.status = None;
    }

    fn open_setup(&mut self)
    {
        self.screen = Screen::Setup {
            cursor: 0,
            show_punctuation: false,
            confirm_empty: false,
        };
        self.input.clear();
        self.status = None;
    }

    fn start_practice(&mut self)
    {
        let round = PracticeRound::new(&self.map, &mut self.rng);
        self.screen = Screen::Practice { round, selected: 0 };
        self.input.clear();
        self.status = None;
    }

    fn type_char(&mut self, ch: char)
    {
        if self.input.chars().count() < MAX_INPUT {
            self.input.push(ch);
        }
    }

    /// Returns false once the player quits.
    fn handle(&mut self, key: Key) -> bool
    {
        if key == Key::Quit {
            return false;
        }
        if key == Key::Ctrl('t') {
            match self.screen {
                Screen::Challenge(_) => self.open_setup(),
                _ => self.new_challenge(),
            }
            return true;
        }
        match self.screen {
            Screen::Challenge(_) => self.handle_challenge(key),
            Screen::Setup { .. } => self.handle_setup(key),
            Screen::Practice { .. } => self.handle_practice(key),
        }
        true
    }

    fn handle_challenge(&mut self, key: Key)
    {
        let Screen::Challenge(challenge) = &mut self.screen else {
            return;
        };
        match key {
            Key::Char(ch) => self.type_char(ch),
            Key::Backspace => {
                self.input.pop();
            }
            Key::Tab => {
                challenge.reveal_key();
                self.set_status("Hint: the cipher key is shown below.", GOLD);
            }
            Key::Ctrl('n') => self.new_challenge(),
            Key::Enter => {
                if challenge.last_result == Some(true) {
                    self.new_challenge();
                } else if self.input.trim().is_empty() {
                    self.set_status("Please enter your decoded message!", RED);
                } else if challenge.check(&self.input) {
                    self.challenges_solved += 1;
                    log::info!("decoder challenge solved ({} this session)", self.challenges_solved);
                    self.set_status("Correct! You cracked the code. Press ENTER for the next one.", GREEN);
                } else {
                    self.set_status("Not quite. Try again or press TAB for a hint.", RED);
                }
            }
            _ => {}
        }
    }

    fn handle_setup(&mut self, key: Key)
    {
        let Screen::Setup {
            cursor,
            show_punctuation,
            confirm_empty,
        } = &mut self.screen
        else {
            return;
        };
        let sources = key_sources(*show_punctuation);
        let source = sources[(*cursor).min(sources.len() - 1)];
        if key != Key::Enter {
            *confirm_empty = false;
        }
        match key {
            Key::Left => *cursor = cursor.saturating_sub(1),
            Key::Right => *cursor = (*cursor + 1).min(sources.len() - 1),
            Key::Up => *cursor = cursor.saturating_sub(KEY_COLUMNS),
            Key::Down => *cursor = (*cursor + KEY_COLUMNS).min(sources.len() - 1),
            Key::Tab => {
                *show_punctuation = !*show_punctuation;
                let count = key_sources(*show_punctuation).len();
                *cursor = (*cursor).min(count - 1);
            }
            Key::Char(ch) => {
                let code = format!("{}{}", self.map.get(source).unwrap_or(""), ch);
                self.map.set(source, &code);
            }
            Key::Backspace => {
                let mut code = self.map.get(source).unwrap_or("").to_string();
                code.pop();
                self.map.set(source, &code);
            }
            Key::Ctrl('r') => {
                self.map = CipherMap::randomized(&mut self.rng);
                self.set_status("Random cipher generated.", GREEN);
            }
            Key::Ctrl('x') => {
                self.map.clear();
                self.set_status("All mappings cleared.", GOLD);
            }
            Key::Enter => {
                if self.map.has_mappings() || *confirm_empty {
                    self.start_practice();
                } else {
                    *confirm_empty = true;
                    self.set_status(
                        "No mappings yet, messages will not change. Press ENTER again to practice anyway.",
                        GOLD,
                    );
                }
            }
            _ => {}
        }
    }

    fn handle_practice(&mut self, key: Key)
    {
        let Screen::Practice { round, selected } = &mut self.screen else {
            return;
        };
        let count = round.sentences.len();
        match key {
            Key::Up => *selected = selected.saturating_sub(1),
            Key::Down => *selected = (*selected + 1).min(count - 1),
            Key::Char(ch) => self.type_char(ch),
            Key::Backspace => {
                self.input.pop();
            }
            Key::Ctrl('n') => {
                self.start_practice();
                self.set_status("New practice sentences.", GOLD);
            }
            Key::Ctrl('b') => {
                let show_punctuation = PUNCTUATION.iter().any(|ch| self.map.get(*ch).is_some());
                self.screen = Screen::Setup {
                    cursor: 0,
                    show_punctuation,
                    confirm_empty: false,
                };
                self.input.clear();
                self.status = None;
            }
            Key::Enter => {
                if round.sentences[*selected].solved {
                    return;
                }
                if self.input.trim().is_empty() {
                    self.set_status("Please enter your decoded message!", RED);
                } else if round.check(*selected, &self.input) {
                    self.input.clear();
                    if round.all_solved() {
                        self.rounds_completed += 1;
                        log::info!("decoder practice round completed");
                        self.set_status(
                            "Outstanding! All three messages decoded. Ctrl-N for new sentences.",
                            GOLD,
                        );
                    } else {
                        if let Some(next) = round.sentences.iter().position(|sentence| !sentence.solved) {
                            *selected = next;
                        }
                        self.set_status("Correct! On to the next message.", GREEN);
                    }
                } else {
                    self.set_status("Not quite right. Check your cipher and try again.", RED);
                }
            }
            _ => {}
        }
    }

    fn render(&self) -> Vec<String>
    {
        let mut lines = Vec::new();
        match &self.screen {
            Screen::Challenge(challenge) => {
                lines.push("Term Arcade - Secret Decoder (challenge)".to_string());
                lines.push(format!("Solved this session: {}", self.challenges_solved));
                lines.push(String::new());
                lines.push(format!("Cipher: {}", challenge.preset.name));
                lines.push("Encoded message:".to_string());
                lines.push(format!("  {}", terminal::paint(&challenge.encoded, GOLD)));
                lines.push(String::new());
                if challenge.key_revealed {
                    lines.push(challenge.preset.description.to_string());
                    for chunk in challenge.preset.map.key_listing().chunks(KEY_COLUMNS) {
                        lines.push(format!("  {}", chunk.join("   ")));
                    }
                    lines.push(String::new());
                }
                lines.push(format!("> {}", self.input));
                lines.push(self.status_line());
                lines.push(
                    "ENTER check, TAB hint, Ctrl-N new challenge, Ctrl-T create mode, ESC quit"
                        .to_string(),
                );
            }
            Screen::Setup {
                cursor,
                show_punctuation,
                ..
            } => {
                lines.push("Term Arcade - Secret Decoder (create your cipher)".to_string());
                lines.push(String::new());
                let sources = key_sources(*show_punctuation);
                for (row, chunk) in sources.chunks(KEY_COLUMNS).enumerate() {
                    let cells: Vec<String> = chunk
                        .iter()
                        .enumerate()
                        .map(|(col, source)| {
                            let code = self.map.get(*source).unwrap_or("___");
                            let cell = format!("{:>3} -> {:<3}", source_label(*source), code);
                            if row * KEY_COLUMNS + col == *cursor {
                                terminal::paint(&cell, GOLD)
                            } else if self.map.get(*source).is_none() {
                                terminal::paint(&cell, GREY)
                            } else {
                                cell
                            }
                        })
                        .collect();
                    lines.push(format!("  {}", cells.join("  ")));
                }
                lines.push(String::new());
                lines.push(self.status_line());
                lines.push(
                    "Arrows select, type a code, TAB punctuation, Ctrl-R random, Ctrl-X clear".to_string(),
                );
                lines.push("ENTER practice, Ctrl-T challenge mode, ESC quit".to_string());
            }
            Screen::Practice { round, selected } => {
                lines.push("Term Arcade - Secret Decoder (practice)".to_string());
                lines.push(format!("Rounds completed: {}", self.rounds_completed));
                lines.push(String::new());
                for (index, sentence) in round.sentences.iter().enumerate() {
                    let marker = if index == *selected { ">" } else { " " };
                    lines.push(format!("{marker} Message {}: {}", index + 1, sentence.encoded));
                    if sentence.solved {
                        lines.push(format!("    {}", terminal::paint(sentence.original, GREEN)));
                    }
                }
                lines.push(String::new());
                lines.push(format!("> {}", self.input));
                lines.push(self.status_line());
                lines.push(
                    "Up/Down select, ENTER check, Ctrl-N new sentences, Ctrl-B edit cipher, ESC quit"
                        .to_string(),
                );
            }
        }
        lines
    }

    fn status_line(&self) -> String
    {
        match &self.status {
            Some((text, color)) => terminal::paint(text, *color),
            None => String::new(),
        }
    }
}

pub fn run(mode: Mode) -> Result<()>
{
    let mut term = TerminalGuard::enter()?;
    let mut decoder = Decoder::new(mode, rand::random());
    let mut last_tick = Instant::now();
    log::info!("decoder started in {mode:?} mode");

    'game: loop {
        for key in terminal::pending_keys()? {
            if !decoder.handle(key) {
                break 'game;
            }
        }

        if last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            term.draw(&decoder.render())?;
            last_tick = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    log::info!(
        "decoder ended: {} challenges solved, {} practice rounds completed",
        decoder.challenges_solved,
        decoder.rounds_completed
    );
    term.draw(&[
        "Secret Decoder finished".to_string(),
        String::new(),
        format!("Challenges solved: {}", decoder.challenges_solved),
        format!("Practice rounds completed: {}", decoder.rounds_completed),
        String::new(),
        "Press SPACE to exit.".to_string(),
    ])?;
    terminal::wait_for_space()?;
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn type_text(decoder: &mut Decoder, text: &str)
    {
        for ch in text.chars() {
            decoder.handle(Key::Char(ch));
        }
    }

    #[test]
    fn test_challenge_solve_and_hint()
    {
        let mut decoder = Decoder::new(Mode::Challenge, 3);
        let original = match &decoder.screen {
            Screen::Challenge(challenge) => challenge.original,
            _ => panic!("expected challenge screen"),
        };
        decoder.handle(Key::Tab);
        assert!(matches!(&decoder.screen, Screen::Challenge(c) if c.key_revealed));

        type_text(&mut decoder, "wrong");
        decoder.handle(Key::Enter);
        assert_eq!(decoder.challenges_solved, 0);

        decoder.input.clear();
        type_text(&mut decoder, &original.to_lowercase());
        decoder.handle(Key::Enter);
        assert_eq!(decoder.challenges_solved, 1);

        decoder.handle(Key::Enter);
        assert!(matches!(&decoder.screen, Screen::Challenge(c) if c.last_result.is_none()));
        assert!(decoder.input.is_empty());
    }

    #[test]
    fn test_setup_typing_edits_selected_code()
    {
        let mut decoder = Decoder::new(Mode::Create, 1);
        type_text(&mut decoder, "q1!z");
        assert_eq!(decoder.map.get('A'), Some("Q1Z"));
        decoder.handle(Key::Backspace);
        assert_eq!(decoder.map.get('A'), Some("Q1"));

        decoder.handle(Key::Down);
        type_text(&mut decoder, "x");
        assert_eq!(decoder.map.get('G'), Some("X"));
        assert_eq!(decoder.map.encode("AG"), "Q1X");
    }

    #[test]
    fn test_punctuation_toggle_clamps_cursor()
    {
        let mut decoder = Decoder::new(Mode::Create, 1);
        decoder.handle(Key::Tab);
        for _ in 0..20 {
            decoder.handle(Key::Down);
        }
        type_text(&mut decoder, "a");
        assert_eq!(decoder.map.get('~'), Some("A"));
        decoder.handle(Key::Tab);
        assert!(matches!(decoder.screen, Screen::Setup { cursor: 35, .. }));
    }

    #[test]
    fn test_empty_cipher_needs_confirmation()
    {
        let mut decoder = Decoder::new(Mode::Create, 1);
        decoder.handle(Key::Enter);
        assert!(matches!(decoder.screen, Screen::Setup { confirm_empty: true, .. }));
        decoder.handle(Key::Enter);
        assert!(matches!(decoder.screen, Screen::Practice { .. }));
    }

    #[test]
    fn test_practice_round_completion()
    {
        let mut decoder = Decoder::new(Mode::Create, 8);
        decoder.handle(Key::Ctrl('r'));
        assert!(decoder.map.has_mappings());
        decoder.handle(Key::Enter);

        let originals: Vec<&str> = match &decoder.screen {
            Screen::Practice { round, .. } => round.sentences.iter().map(|s| s.original).collect(),
            _ => panic!("expected practice screen"),
        };
        for original in originals {
            type_text(&mut decoder, original);
            decoder.handle(Key::Enter);
        }
        assert_eq!(decoder.rounds_completed, 1);

        decoder.handle(Key::Ctrl('b'));
        assert!(matches!(decoder.screen, Screen::Setup { .. }));
        assert!(decoder.map.has_mappings());
    }

    #[test]
    fn test_mode_switch_and_quit()
    {
        let mut decoder = Decoder::new(Mode::Create, 1);
        assert!(decoder.handle(Key::Ctrl('t')));
        assert!(matches!(decoder.screen, Screen::Challenge(_)));
        assert!(decoder.handle(Key::Ctrl('t')));
        assert!(matches!(decoder.screen, Screen::Setup { .. }));
        assert!(!decoder.handle(Key::Quit));
    }

    #[test]
    fn test_render_setup_marks_cursor()
    {
        let decoder = Decoder::new(Mode::Create, 1);
        let lines = decoder.render();
        assert!(lines[2].contains(&terminal::paint("  A -> ___", GOLD)));
    }
}
