use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;

pub struct TerminalGuard
{
    stdout: Stdout,
    mouse: bool,
}

impl TerminalGuard
{
    pub fn enter() -> Result<Self>
    {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(stdout, EnterAlternateScreen, Hide).context("Failed to enter alternate screen")?;
        Ok(Self {
            stdout,
            mouse: false,
        })
    }

    /// Reports left-button presses and releases as `Key::MouseDown`/`Key::MouseUp`.
    pub fn capture_mouse(&mut self) -> Result<()>
    {
        execute!(self.stdout, EnableMouseCapture).context("Failed to enable mouse capture")?;
        self.mouse = true;
        Ok(())
    }

    pub fn draw(&mut self, lines: &[String]) -> Result<()>
    {
        let output = format!("{}\r\n", lines.join("\r\n"));
        queue!(self.stdout, MoveTo(0, 0), Clear(ClearType::All))?;
        self.stdout.write_all(output.as_bytes())?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for TerminalGuard
{
    fn drop(&mut self)
    {
        if self.mouse {
            let _ = execute!(self.stdout, DisableMouseCapture);
        }
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb
{
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb
{
    pub const fn new(r: u8, g: u8, b: u8) -> Self
    {
        Self { r, g, b }
    }
}

pub const GREEN: Rgb = Rgb::new(0, 255, 0);
pub const RED: Rgb = Rgb::new(255, 0, 0);
pub const GOLD: Rgb = Rgb::new(255, 215, 0);
pub const GREY: Rgb = Rgb::new(110, 110, 110);

pub fn paint(text: &str, color: Rgb) -> String
{
    format!("\x1b[38;2;{};{};{}m{}\x1b[0m", color.r, color.g, color.b, text)
}

#[derive(Clone, Copy)]
pub struct Cell
{
    pub ch: char,
    pub color: Option<Rgb>,
}

impl Cell
{
    pub const BLANK: Cell = Cell {
        ch: ' ',
        color: None,
    };
}

pub fn render_row(row: &[Cell]) -> String
{
    let mut line = String::with_capacity(row.len() + 16);
    let mut active: Option<Rgb> = None;
    for cell in row {
        if cell.color != active {
            if let Some(color) = cell.color {
                line.push_str(&format!("\x1b[38;2;{};{};{}m", color.r, color.g, color.b));
            } else {
                line.push_str("\x1b[0m");
            }
            active = cell.color;
        }
        line.push(cell.ch);
    }
    if active.is_some() {
        line.push_str("\x1b[0m");
    }
    line
}

/// Keys the games care about, with ESC and Ctrl-C folded into `Quit`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key
{
    Quit,
    Char(char),
    Ctrl(char),
    Enter,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    /// Left button pressed at (column, row).
    MouseDown(u16, u16),
    MouseUp(u16, u16),
}

fn translate(event: KeyEvent) -> Option<Key>
{
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let key = match event.code {
        KeyCode::Esc => Key::Quit,
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Key::Quit,
        KeyCode::Char(ch) if event.modifiers.contains(KeyModifiers::CONTROL) => Key::Ctrl(ch),
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        _ => return None,
    };
    Some(key)
}

fn translate_mouse(event: MouseEvent) -> Option<Key>
{
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Key::MouseDown(event.column, event.row)),
        MouseEventKind::Up(MouseButton::Left) => Some(Key::MouseUp(event.column, event.row)),
        _ => None,
    }
}

/// Drains every pending key without blocking.
pub fn pending_keys() -> Result<Vec<Key>>
{
    let mut keys = Vec::new();
    while event::poll(Duration::from_millis(0))? {
        let key = match event::read()? {
            Event::Key(key_event) => translate(key_event),
            Event::Mouse(mouse_event) => translate_mouse(mouse_event),
            _ => None,
        };
        keys.extend(key);
    }
    Ok(keys)
}

pub fn wait_for_space() -> Result<()>
{
    while event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(KeyEvent {
                code: KeyCode::Char(' ') | KeyCode::Esc,
                ..
            }) = event::read()?
            {
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_render_row_resets_color()
    {
        let row = [
            Cell {
                ch: 'a',
                color: Some(RED),
            },
            Cell::BLANK,
        ];
        let line = render_row(&row);
        assert_eq!(line, "\x1b[38;2;255;0;0ma\x1b[0m ");
    }

    #[test]
    fn test_translate_folds_quit_keys()
    {
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let ctrl_n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_eq!(translate(esc), Some(Key::Quit));
        assert_eq!(translate(ctrl_c), Some(Key::Quit));
        assert_eq!(translate(ctrl_n), Some(Key::Ctrl('n')));
    }

    #[test]
    fn test_translate_mouse_left_button_only()
    {
        let event = |kind| MouseEvent {
            kind,
            column: 12,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            translate_mouse(event(MouseEventKind::Down(MouseButton::Left))),
            Some(Key::MouseDown(12, 7))
        );
        assert_eq!(
            translate_mouse(event(MouseEventKind::Up(MouseButton::Left))),
            Some(Key::MouseUp(12, 7))
        );
        assert_eq!(translate_mouse(event(MouseEventKind::Down(MouseButton::Right))), None);
        assert_eq!(translate_mouse(event(MouseEventKind::Moved)), None);
    }
}
