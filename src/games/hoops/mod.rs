mod physics;

use physics::{HoopsSim, ShotEvent, Spot, COURT_HEIGHT, COURT_WIDTH, TICK_MS};

use crate::config::HoopsConfig;
use crate::scores::ScoreStore;
use crate::terminal::{self, Cell, Key, Rgb, TerminalGuard, GOLD, GREY, RED};
use anyhow::Result;
use rand::seq::SliceRandom;
use std::time::{Duration, Instant};

pub const NAME: &str = "hoops";

const FIELD_COLS: usize = 80;
const FIELD_ROWS: usize = 25;
/// Screen row of the first field line, below the header lines.
const FIELD_TOP: u16 = 4;
const MESSAGE_MS: u32 = 1500;
const ORANGE: Rgb = Rgb::new(255, 140, 0);
const CHEERS: [&str; 8] = [
    "SWISH!",
    "NICE SHOT!",
    "BOOM!",
    "PERFECT!",
    "AMAZING!",
    "FANTASTIC!",
    "INCREDIBLE!",
    "AWESOME!",
];

struct Banner
{
    text: String,
    color: Rgb,
    remaining_ms: u32,
}

pub fn run(config: HoopsConfig, scores: &mut ScoreStore) -> Result<()>
{
    let mut term = TerminalGuard::enter()?;
    term.capture_mouse()?;
    let mut rng = rand::thread_rng();
    let mut show_trajectory = config.show_trajectory;
    let mut sim = HoopsSim::new(config, scores.best(NAME));
    let mut banner: Option<Banner> = None;
    let mut drag_start: Option<(f32, f32)> = None;
    let mut shots = 0u32;
    let mut makes = 0u32;
    let tick = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    log::info!("hoops session started, high score {}", sim.high_score());

    'game: loop {
        for key in terminal::pending_keys()? {
            match key {
                Key::Quit => break 'game,
                Key::Left => sim.nudge_aim(2.0, 0.0),
                Key::Right => sim.nudge_aim(-2.0, 0.0),
                Key::Up => sim.nudge_aim(0.0, 0.5),
                Key::Down => sim.nudge_aim(0.0, -0.5),
                Key::Char(' ') => {
                    if sim.shoot() {
                        shots += 1;
                    }
                }
                Key::Char('1') => {
                    sim.teleport(Spot::Home);
                }
                Key::Char('2') => {
                    sim.teleport(Spot::OneThird);
                }
                Key::Char('3') => {
                    sim.teleport(Spot::TwoThirds);
                }
                Key::Char('t') | Key::Char('T') => show_trajectory = !show_trajectory,
                Key::MouseDown(col, row) => drag_start = drag_origin(&sim, col, row),
                Key::MouseUp(col, row) => {
                    if let (Some(start), Some(end)) = (drag_start.take(), to_court(col, row)) {
                        sim.aim_from_drag(start.0 - end.0, start.1 - end.1);
                        if sim.shoot() {
                            shots += 1;
                        }
                    }
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick {
            for event in sim.tick() {
                match event {
                    ShotEvent::Scored { new_high } => {
                        makes += 1;
                        let text = if new_high {
                            scores.record(NAME, sim.score())?;
                            "NEW HIGH SCORE!".to_string()
                        } else {
                            CHEERS.choose(&mut rng).unwrap_or(&"SWISH!").to_string()
                        };
                        banner = Some(Banner {
                            text,
                            color: GOLD,
                            remaining_ms: MESSAGE_MS,
                        });
                    }
                    ShotEvent::Penalty => {
                        log::debug!("hoops penalty, score now {}", sim.score());
                        banner = Some(Banner {
                            text: "PENALTY: -1 POINT!".to_string(),
                            color: RED,
                            remaining_ms: MESSAGE_MS,
                        });
                    }
                    ShotEvent::Missed => {}
                }
            }
            if let Some(active) = banner.as_mut() {
                active.remaining_ms = active.remaining_ms.saturating_sub(TICK_MS);
                if active.remaining_ms == 0 {
                    banner = None;
                }
            }

            term.draw(&render(&sim, show_trajectory, banner.as_ref()))?;
            last_tick = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    scores.record(NAME, sim.high_score())?;
    log::info!("hoops session ended: {makes}/{shots} shots, score {}", sim.score());

    term.draw(&summary(&sim, shots, makes))?;
    terminal::wait_for_space()?;
    Ok(())
}

fn to_cell(x: f32, y: f32) -> Option<(usize, usize)>
{
    let col = (x / COURT_WIDTH * FIELD_COLS as f32).floor();
    let row = (y / COURT_HEIGHT * FIELD_ROWS as f32).floor();
    if col < 0.0 || row < 0.0 || col >= FIELD_COLS as f32 || row >= FIELD_ROWS as f32 {
        return None;
    }
    Some((col as usize, row as usize))
}

/// Centre of the court area under a screen cell, if the cell is on the field.
fn to_court(col: u16, row: u16) -> Option<(f32, f32)>
{
    let row = row.checked_sub(FIELD_TOP)? as usize;
    let col = col as usize;
    if col >= FIELD_COLS || row >= FIELD_ROWS {
        return None;
    }
    Some((
        (col as f32 + 0.5) * COURT_WIDTH / FIELD_COLS as f32,
        (row as f32 + 0.5) * COURT_HEIGHT / FIELD_ROWS as f32,
    ))
}

/// A drag only starts on the resting ball.
fn drag_origin(sim: &HoopsSim, col: u16, row: u16) -> Option<(f32, f32)>
{
    to_court(col, row).filter(|&(x, y)| !sim.is_moving() && sim.ball().contains(x, y))
}

fn plot(field: &mut [Vec<Cell>], x: f32, y: f32, ch: char, color: Rgb)
{
    if let Some((col, row)) = to_cell(x, y) {
        field[row][col] = Cell {
            ch,
            color: Some(color),
        };
    }
}

fn render(sim: &HoopsSim, show_trajectory: bool, banner: Option<&Banner>) -> Vec<String>
{
    let mut field = vec![vec![Cell::BLANK; FIELD_COLS]; FIELD_ROWS];
    let hoop = sim.hoop();
    let board = hoop.backboard;
    let unit_x = COURT_WIDTH / FIELD_COLS as f32;
    let unit_y = COURT_HEIGHT / FIELD_ROWS as f32;

    let mut y = board.y;
    while y < board.y + board.height {
        let mut x = board.x;
        while x < board.x + board.width {
            plot(&mut field, x, y, '#', GREY);
            x += unit_x;
        }
        y += unit_y;
    }

    let mut x = hoop.x;
    while x < hoop.x + hoop.width - 10.0 {
        plot(&mut field, x, hoop.rim_y, '=', ORANGE);
        plot(&mut field, x, hoop.rim_y + unit_y, 'v', Rgb::new(230, 230, 230));
        x += unit_x;
    }

    for spot in [Spot::Home, Spot::OneThird, Spot::TwoThirds] {
        let (sx, sy) = sim.spot_position(spot);
        plot(&mut field, sx, sy + unit_y, '^', GREY);
    }

    if show_trajectory && !sim.is_moving() {
        for (px, py) in sim.trajectory() {
            plot(&mut field, px, py, '.', Rgb::new(160, 160, 160));
        }
    }

    let ball = sim.ball();
    plot(&mut field, ball.x, ball.y, 'O', ORANGE);

    let mut lines = Vec::new();
    lines.push("Term Arcade - Hoops".to_string());
    lines.push(format!(
        "Score: {}  High score: {}  Misses: {}",
        sim.score(),
        sim.high_score(),
        sim.misses()
    ));
    let (elevation, power) = sim.aim_state();
    let filled = ((power / sim.max_power()) * 20.0).round() as usize;
    lines.push(format!(
        "Angle: {:>5.1} deg  Power: [{}{}] {:>4.1}",
        elevation,
        "|".repeat(filled.min(20)),
        " ".repeat(20 - filled.min(20)),
        power
    ));
    lines.push(match banner {
        Some(active) => terminal::paint(&active.text, active.color),
        None => String::new(),
    });
    for row in &field {
        lines.push(terminal::render_row(row));
    }
    lines.push("=".repeat(FIELD_COLS));
    lines.push(
        "Left/Right angle, Up/Down power, SPACE shoot (or drag with the mouse), 1-3 spots, T trajectory, ESC quit"
            .to_string(),
    );
    lines
}

fn summary(sim: &HoopsSim, shots: u32, makes: u32) -> Vec<String>
{
    let accuracy = if shots == 0 {
        0.0
    } else {
        makes as f32 / shots as f32 * 100.0
    };
    vec![
        "Hoops finished".to_string(),
        String::new(),
        format!("Score: {}", sim.score()),
        format!("High score: {}", sim.high_score()),
        format!("Shots: {shots}  Made: {makes}  Accuracy: {accuracy:>5.1}%"),
        String::new(),
        "Press SPACE to exit.".to_string(),
    ]
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_to_cell_scales_court()
    {
        assert_eq!(to_cell(0.0, 0.0), Some((0, 0)));
        assert_eq!(to_cell(100.0, 400.0), Some((10, 20)));
        assert_eq!(to_cell(799.0, 499.0), Some((79, 24)));
        assert_eq!(to_cell(800.0, 10.0), None);
        assert_eq!(to_cell(-1.0, 10.0), None);
    }

    #[test]
    fn test_to_court_skips_header()
    {
        assert_eq!(to_court(0, 3), None);
        assert_eq!(to_court(0, FIELD_TOP), Some((5.0, 10.0)));
        assert_eq!(to_court(80, 10), None);
        assert_eq!(to_court(10, FIELD_TOP + 25), None);
    }

    #[test]
    fn test_drag_starts_only_on_resting_ball()
    {
        let mut sim = HoopsSim::new(HoopsConfig::default(), 0);
        assert_eq!(drag_origin(&sim, 10, FIELD_TOP + 20), Some((105.0, 410.0)));
        assert_eq!(drag_origin(&sim, 20, FIELD_TOP + 20), None);
        assert_eq!(drag_origin(&sim, 10, 2), None);

        sim.aim(90.0, 10.0);
        assert!(sim.shoot());
        assert_eq!(drag_origin(&sim, 10, FIELD_TOP + 20), None);
    }

    #[test]
    fn test_render_places_ball_and_rim()
    {
        let sim = HoopsSim::new(HoopsConfig::default(), 4);
        let lines = render(&sim, true, None);
        assert!(lines[1].contains("High score: 4"));
        assert_eq!(lines.len(), 4 + FIELD_ROWS + 2);
        let ball_row = &lines[4 + 20];
        assert!(ball_row.contains('O'));
        let rim_row = &lines[4 + 12];
        assert!(rim_row.contains('='));
    }
}
