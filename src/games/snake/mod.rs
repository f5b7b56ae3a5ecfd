mod sim;

use sim::{Collision, Direction, Phase, SnakeSim, TickEvent};

use crate::config::SnakeConfig;
use crate::scores::ScoreStore;
use crate::terminal::{self, Key, Rgb, TerminalGuard, GOLD, GREY, RED};
use anyhow::Result;
use std::time::{Duration, Instant};

pub const NAME: &str = "snake";

const HEAD: Rgb = Rgb::new(39, 174, 96);
const BODY: Rgb = Rgb::new(46, 204, 113);

pub fn run(config: SnakeConfig, scores: &mut ScoreStore) -> Result<()>
{
    let mut term = TerminalGuard::enter()?;
    let tick = Duration::from_millis(config.tick_ms as u64);
    let mut sim = SnakeSim::new(config, rand::random());
    let mut best = scores.best(NAME);
    let mut games_played = 0u32;
    let mut message: Option<String> = None;
    let mut last_tick = Instant::now();

    log::info!("snake session started on a {0}x{0} board", sim.grid());

    'game: loop {
        for key in terminal::pending_keys()? {
            match key {
                Key::Quit => break 'game,
                Key::Up | Key::Char('w') | Key::Char('W') => {
                    sim.steer(Direction::Up);
                }
                Key::Down | Key::Char('s') | Key::Char('S') => {
                    sim.steer(Direction::Down);
                }
                Key::Left | Key::Char('a') | Key::Char('A') => {
                    sim.steer(Direction::Left);
                }
                Key::Right | Key::Char('d') | Key::Char('D') => {
                    sim.steer(Direction::Right);
                }
                Key::Enter => sim.start(),
                Key::Char(' ') | Key::Char('p') | Key::Char('P') => {
                    if sim.phase() == Phase::Ready {
                        sim.start();
                    } else {
                        sim.toggle_pause();
                    }
                }
                Key::Char('r') | Key::Char('R') => {
                    sim.reset();
                    message = None;
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick {
            match sim.tick() {
                TickEvent::Ate { points } => {
                    log::debug!("snake ate for {points} points, score {}", sim.score());
                }
                TickEvent::Died(collision) => {
                    games_played += 1;
                    let reason = match collision {
                        Collision::Wall => "hit the wall",
                        Collision::SelfHit => "bit its own tail",
                    };
                    log::info!("snake {reason} with score {}", sim.score());
                    if scores.record(NAME, sim.score())? {
                        best = sim.score();
                        message = Some(format!("GAME OVER - the snake {reason}. New high score!"));
                    } else {
                        message = Some(format!("GAME OVER - the snake {reason}."));
                    }
                }
                _ => {}
            }
            term.draw(&render(&sim, best, message.as_deref()))?;
            last_tick = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    if sim.phase() != Phase::Over && sim.score() > 0 && scores.record(NAME, sim.score())? {
        best = sim.score();
    }
    log::info!("snake session ended after {games_played} finished games");

    term.draw(&summary(sim.score(), best, games_played))?;
    terminal::wait_for_space()?;
    Ok(())
}

fn render(sim: &SnakeSim, best: u32, message: Option<&str>) -> Vec<String>
{
    let mut lines = Vec::new();
    lines.push("Term Arcade - Snake".to_string());
    lines.push(format!(
        "Score: {:>4}  High score: {:>4}  Length: {:>3}  Step: {}ms",
        sim.score(),
        best,
        sim.body().len(),
        sim.step_interval_ms()
    ));
    lines.push(String::new());

    let grid = sim.grid().max(1) as usize;
    let mut field = vec![vec![terminal::Cell::BLANK; grid * 2]; grid];
    for row in field.iter_mut() {
        for (col, cell) in row.iter_mut().enumerate() {
            if col % 2 == 0 {
                *cell = terminal::Cell {
                    ch: '.',
                    color: Some(GREY),
                };
            }
        }
    }

    for food in sim.food() {
        put(&mut field, food.x as f32, food.y as f32, '*', RED);
    }
    let segments = sim.interpolated();
    for (index, (x, y)) in segments.iter().enumerate().rev() {
        if index == 0 {
            put(&mut field, *x, *y, '@', HEAD);
        } else {
            put(&mut field, *x, *y, 'o', BODY);
        }
    }

    let border = format!("+{}+", "-".repeat(grid * 2));
    lines.push(border.clone());
    for row in &field {
        lines.push(format!("|{}|", terminal::render_row(row)));
    }
    lines.push(border);

    lines.push(String::new());
    let status = match sim.phase() {
        Phase::Ready => "Press ENTER or SPACE to start".to_string(),
        Phase::Running => "Arrows/WASD steer, SPACE/P pause".to_string(),
        Phase::Paused => terminal::paint("PAUSED - press P or SPACE to resume", GOLD),
        Phase::Over => {
            let text = message.unwrap_or("GAME OVER");
            format!("{}  Final score: {}  (R to reset)", terminal::paint(text, RED), sim.score())
        }
    };
    lines.push(status);
    lines.push("ESC quits.".to_string());
    lines
}

fn put(field: &mut [Vec<terminal::Cell>], x: f32, y: f32, ch: char, color: Rgb)
{
    let col = x.round();
    let row = y.round();
    if col < 0.0 || row < 0.0 {
        return;
    }
    let (col, row) = (col as usize, row as usize);
    if let Some(line) = field.get_mut(row) {
        if col * 2 < line.len() {
            line[col * 2] = terminal::Cell {
                ch,
                color: Some(color),
            };
        }
    }
}

fn summary(score: u32, best: u32, games_played: u32) -> Vec<String>
{
    vec![
        "Snake finished".to_string(),
        String::new(),
        format!("Last score: {score}"),
        format!("High score: {best}"),
        format!("Games finished: {games_played}"),
        String::new(),
        "Press SPACE to exit.".to_string(),
    ]
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_render_shows_board_and_status()
    {
        let sim = SnakeSim::new(SnakeConfig::default(), 11);
        let lines = render(&sim, 70, None);
        assert!(lines[1].contains("High score:   70"));
        // title, score, blank, border, 20 rows, border, blank, status, footer
        assert_eq!(lines.len(), 3 + 22 + 3);
        assert!(lines.iter().any(|line| line.contains('@')));
        assert_eq!(lines[lines.len() - 2], "Press ENTER or SPACE to start");
    }

    #[test]
    fn test_put_ignores_out_of_board()
    {
        let mut field = vec![vec![terminal::Cell::BLANK; 4]; 2];
        put(&mut field, -1.0, 0.0, '@', HEAD);
        put(&mut field, 5.0, 0.0, '@', HEAD);
        put(&mut field, 0.0, 9.0, '@', HEAD);
        assert!(field.iter().flatten().all(|cell| cell.ch == ' '));
        put(&mut field, 1.2, 0.8, '@', HEAD);
        assert_eq!(field[1][2].ch, '@');
    }
}
