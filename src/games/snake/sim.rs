//! Grid snake with continuous interpolation between grid moves.
//!
//! The board state advances one cell per completed move; between moves the
//! front end asks for [`SnakeSim::interpolated`] positions so segments glide
//! toward their next cell.

use crate::config::SnakeConfig;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// A position on the board, in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell
{
    pub x: i32,
    pub y: i32,
}

impl Cell
{
    pub const fn new(x: i32, y: i32) -> Self
    {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self
    {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction
{
    Up,
    Down,
    Left,
    Right,
}

impl Direction
{
    pub fn delta(self) -> (i32, i32)
    {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn is_horizontal(self) -> bool
    {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn is_perpendicular(self, other: Direction) -> bool
    {
        self.is_horizontal() != other.is_horizontal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase
{
    Ready,
    Running,
    Paused,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision
{
    Wall,
    SelfHit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent
{
    /// Nothing advanced (not running, or no direction yet).
    Idle,
    /// Interpolation advanced, no grid move completed.
    Glide,
    Moved,
    Ate { points: u32 },
    Died(Collision),
}

pub struct SnakeSim
{
    config: SnakeConfig,
    rng: StdRng,
    body: Vec<Cell>,
    food: Vec<Cell>,
    direction: Option<Direction>,
    heading: Option<Direction>,
    elapsed_ms: u32,
    score: u32,
    phase: Phase,
}

impl SnakeSim
{
    pub fn new(config: SnakeConfig, seed: u64) -> Self
    {
        let mut sim = Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            body: Vec::new(),
            food: Vec::new(),
            direction: None,
            heading: None,
            elapsed_ms: 0,
            score: 0,
            phase: Phase::Ready,
        };
        sim.reset();
        sim
    }

    pub fn reset(&mut self)
    {
        let mid = self.config.grid / 2;
        self.body = vec![Cell::new(mid, mid)];
        self.food.clear();
        self.direction = None;
        self.heading = None;
        self.elapsed_ms = 0;
        self.score = 0;
        self.phase = Phase::Ready;
        self.refill_food();
    }

    pub fn start(&mut self)
    {
        if self.phase != Phase::Ready {
            return;
        }
        self.phase = Phase::Running;
        if self.direction.is_none() {
            self.direction = Some(Direction::Right);
        }
        self.heading = self.direction;
    }

    pub fn toggle_pause(&mut self)
    {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            other => other,
        };
    }

    /// Turns are judged against the heading of the last completed move, so
    /// two quick presses inside one move cannot fold the snake back.
    pub fn steer(&mut self, direction: Direction) -> bool
    {
        if self.phase != Phase::Running {
            return false;
        }
        let accepted = self
            .heading
            .is_none_or(|current| direction.is_perpendicular(current));
        if accepted {
            self.direction = Some(direction);
        }
        accepted
    }

    pub fn step_interval_ms(&self) -> u32
    {
        let bonus = (self.score / 50) * self.config.speed_bonus_ms;
        self.config
            .base_step_ms
            .saturating_sub(bonus)
            .max(self.config.min_step_ms)
    }

    pub fn tick(&mut self) -> TickEvent
    {
        if self.phase != Phase::Running {
            return TickEvent::Idle;
        }
        let Some(direction) = self.direction else {
            return TickEvent::Idle;
        };

        self.elapsed_ms += self.config.tick_ms;
        if self.elapsed_ms < self.step_interval_ms() {
            return TickEvent::Glide;
        }
        self.elapsed_ms = 0;
        self.complete_move(direction)
    }

    fn complete_move(&mut self, direction: Direction) -> TickEvent
    {
        let head = self.head().step(direction);

        if !self.in_bounds(head) {
            self.phase = Phase::Over;
            return TickEvent::Died(Collision::Wall);
        }
        if self.body.contains(&head) {
            self.phase = Phase::Over;
            return TickEvent::Died(Collision::SelfHit);
        }

        self.body.insert(0, head);
        self.heading = Some(direction);

        if let Some(index) = self.food.iter().position(|food| *food == head) {
            self.food.swap_remove(index);
            self.score += self.config.food_points;
            self.refill_food();
            TickEvent::Ate {
                points: self.config.food_points,
            }
        } else {
            self.body.pop();
            TickEvent::Moved
        }
    }

    fn in_bounds(&self, cell: Cell) -> bool
    {
        (0..self.config.grid).contains(&cell.x) && (0..self.config.grid).contains(&cell.y)
    }

    fn refill_food(&mut self)
    {
        while self.food.len() < self.config.min_food {
            match self.free_cell() {
                Some(cell) => self.food.push(cell),
                None => break,
            }
        }
    }

    fn free_cell(&mut self) -> Option<Cell>
    {
        let grid = self.config.grid;
        let free: Vec<Cell> = (0..grid)
            .flat_map(|y| (0..grid).map(move |x| Cell::new(x, y)))
            .filter(|cell| !self.body.contains(cell) && !self.food.contains(cell))
            .collect();
        free.choose(&mut self.rng).copied()
    }

    /// Fraction of the current grid move already travelled, in [0, 1).
    pub fn progress(&self) -> f32
    {
        self.elapsed_ms as f32 / self.step_interval_ms() as f32
    }

    /// Segment positions in tile units, head first, blended toward the cell
    /// each segment is about to enter.
    pub fn interpolated(&self) -> Vec<(f32, f32)>
    {
        let t = if self.phase == Phase::Running || self.phase == Phase::Paused {
            self.progress()
        } else {
            0.0
        };
        self.body
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let target = if index == 0 {
                    match self.direction {
                        Some(direction) => cell.step(direction),
                        None => *cell,
                    }
                } else {
                    self.body[index - 1]
                };
                (
                    cell.x as f32 + (target.x - cell.x) as f32 * t,
                    cell.y as f32 + (target.y - cell.y) as f32 * t,
                )
            })
            .collect()
    }

    pub fn head(&self) -> Cell
    {
        self.body[0]
    }

    pub fn body(&self) -> &[Cell]
    {
        &self.body
    }

    pub fn food(&self) -> &[Cell]
    {
        &self.food
    }

    pub fn score(&self) -> u32
    {
        self.score
    }

    pub fn phase(&self) -> Phase
    {
        self.phase
    }

    pub fn grid(&self) -> i32
    {
        self.config.grid
    }
}
