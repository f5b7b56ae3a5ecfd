//! Point-mass basketball on a fixed court.
//!
//! Court units are canvas-style: origin top-left, y grows downward. One call
//! to [`HoopsSim::tick`] is one 16 ms frame.

use crate::config::HoopsConfig;

pub const COURT_WIDTH: f32 = 800.0;
pub const COURT_HEIGHT: f32 = 500.0;
pub const TICK_MS: u32 = 16;

const BALL_RADIUS: f32 = 20.0;
const HOME: (f32, f32) = (100.0, 400.0);
const RIM_THICKNESS: f32 = 4.0;
const RIM_END_WIDTH: f32 = 1.0;
const HOOP_MARGIN: f32 = 10.0;
const SCORED_RESET_MS: u32 = 1000;
const POWER_PER_UNIT: f32 = 1.0 / 6.0;
const BACKBOARD_BOUNCE: f32 = -0.8;
const RIM_BOUNCE_Y: f32 = -0.6;
const RIM_BOUNCE_X: f32 = -0.7;
const PREVIEW_STEPS: usize = 100;
const PREVIEW_FLOOR_GAP: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect
{
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hoop
{
    pub x: f32,
    pub width: f32,
    pub rim_y: f32,
    pub backboard: Rect,
}

impl Hoop
{
    pub fn standard() -> Self
    {
        let (x, y, width, height) = (650.0, 200.0, 80.0, 60.0);
        Self {
            x,
            width,
            rim_y: 240.0,
            backboard: Rect {
                x: x + width - 10.0,
                y: y - 20.0,
                width: 15.0,
                height: height + 20.0,
            },
        }
    }

    pub fn centre_x(&self) -> f32
    {
        self.x + self.width / 2.0
    }

    fn opening(&self) -> (f32, f32)
    {
        (self.x + HOOP_MARGIN, self.x + self.width - HOOP_MARGIN)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball
{
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
}

impl Ball
{
    pub fn contains(&self, x: f32, y: f32) -> bool
    {
        let (dx, dy) = (x - self.x, y - self.y);
        dx * dx + dy * dy <= self.radius * self.radius
    }

    fn left(&self) -> f32
    {
        self.x - self.radius
    }

    fn right(&self) -> f32
    {
        self.x + self.radius
    }

    fn top(&self) -> f32
    {
        self.y - self.radius
    }

    fn bottom(&self) -> f32
    {
        self.y + self.radius
    }
}

/// Launch spots on the home line: the start, and one and two thirds of the
/// way toward the hoop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spot
{
    Home,
    OneThird,
    TwoThirds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotEvent
{
    Scored { new_high: bool },
    Missed,
    Penalty,
}

pub struct HoopsSim
{
    config: HoopsConfig,
    ball: Ball,
    hoop: Hoop,
    reset_point: (f32, f32),
    moving: bool,
    scored: bool,
    scored_ms: u32,
    elevation_deg: f32,
    power: f32,
    score: u32,
    high_score: u32,
    misses: u32,
}

impl HoopsSim
{
    pub fn new(config: HoopsConfig, high_score: u32) -> Self
    {
        Self {
            config,
            ball: Ball {
                x: HOME.0,
                y: HOME.1,
                vx: 0.0,
                vy: 0.0,
                radius: BALL_RADIUS,
            },
            hoop: Hoop::standard(),
            reset_point: HOME,
            moving: false,
            scored: false,
            scored_ms: 0,
            elevation_deg: 55.0,
            power: 16.0,
            score: 0,
            high_score,
            misses: 0,
        }
    }

    /// Any elevation is allowed, negative ones fire downward. Only power is
    /// clamped.
    pub fn aim(&mut self, elevation_deg: f32, power: f32)
    {
        self.elevation_deg = elevation_deg;
        self.power = power.clamp(0.0, self.config.max_power);
    }

    /// Aims from a drag vector (press point minus release point, y down).
    pub fn aim_from_drag(&mut self, dx: f32, dy: f32)
    {
        let distance = (dx * dx + dy * dy).sqrt();
        let elevation = (-dy).atan2(dx).to_degrees();
        self.aim(elevation, distance * POWER_PER_UNIT);
    }

    /// Keyboard aiming stays between flat right and flat left.
    pub fn nudge_aim(&mut self, elevation_delta: f32, power_delta: f32)
    {
        let elevation = (self.elevation_deg + elevation_delta).clamp(0.0, 180.0);
        self.aim(elevation, self.power + power_delta);
    }

    fn launch_velocity(&self) -> (f32, f32)
    {
        let angle = self.elevation_deg.to_radians();
        (angle.cos() * self.power, -angle.sin() * self.power)
    }

    pub fn shoot(&mut self) -> bool
    {
        if self.moving {
            return false;
        }
        self.reset_point = (self.ball.x, self.ball.y);
        let (vx, vy) = self.launch_velocity();
        self.ball.vx = vx;
        self.ball.vy = vy;
        self.moving = true;
        true
    }

    pub fn spot_position(&self, spot: Spot) -> (f32, f32)
    {
        let span = self.hoop.centre_x() - HOME.0;
        let x = match spot {
            Spot::Home => HOME.0,
            Spot::OneThird => HOME.0 + span / 3.0,
            Spot::TwoThirds => HOME.0 + span * 2.0 / 3.0,
        };
        (x, HOME.1)
    }

    pub fn teleport(&mut self, spot: Spot) -> bool
    {
        if self.moving {
            return false;
        }
        let (x, y) = self.spot_position(spot);
        self.ball.x = x;
        self.ball.y = y;
        self.reset_point = (x, y);
        true
    }

    pub fn tick(&mut self) -> Vec<ShotEvent>
    {
        let mut events = Vec::new();
        if !self.moving {
            return events;
        }

        self.ball.vy += self.config.gravity;
        self.ball.x += self.ball.vx;
        self.ball.y += self.ball.vy;
        self.ball.vx *= self.config.air_resistance;

        self.collide_backboard();
        self.collide_rim();

        let ball = self.ball;
        if ball.x < ball.radius || ball.x > COURT_WIDTH - ball.radius || ball.y > COURT_HEIGHT - ball.radius
        {
            self.reset(&mut events);
            return events;
        }

        if !self.scored && self.in_scoring_zone() {
            self.score += 1;
            self.misses = 0;
            self.scored = true;
            self.scored_ms = 0;
            let new_high = self.update_high_score();
            events.push(ShotEvent::Scored { new_high });
        } else if self.scored {
            self.scored_ms += TICK_MS;
            if self.scored_ms > SCORED_RESET_MS {
                self.reset(&mut events);
            }
        }
        events
    }

    fn collide_backboard(&mut self)
    {
        let board = self.hoop.backboard;
        let ball = &mut self.ball;
        let overlaps = ball.right() > board.x
            && ball.left() < board.x + board.width
            && ball.bottom() > board.y
            && ball.top() < board.y + board.height;
        if overlaps && ball.vx > 0.0 {
            ball.x = board.x - ball.radius;
            ball.vx *= BACKBOARD_BOUNCE;
        }
    }

    fn collide_rim(&mut self)
    {
        let rim_y = self.hoop.rim_y;
        let rim_left = self.hoop.x;
        let rim_right = self.hoop.x + self.hoop.width;
        let ball = &mut self.ball;

        let in_band = ball.bottom() > rim_y && ball.top() < rim_y + RIM_THICKNESS;
        if !in_band {
            return;
        }

        if ball.right() > rim_left && ball.left() < rim_left + RIM_END_WIDTH {
            if ball.vy > 0.0 {
                ball.vy *= RIM_BOUNCE_Y;
                ball.y = rim_y - ball.radius;
            }
            if ball.vx > 0.0 {
                ball.vx *= RIM_BOUNCE_X;
            }
        }

        if ball.right() > rim_right - RIM_END_WIDTH && ball.left() < rim_right {
            if ball.vy > 0.0 {
                ball.vy *= RIM_BOUNCE_Y;
                ball.y = rim_y - ball.radius;
            }
            if ball.vx < 0.0 {
                ball.vx *= RIM_BOUNCE_X;
            }
        }
    }

    /// The ball must be falling, straddle the rim line, and have its centre
    /// strictly inside the opening (narrower than the rim by the margin).
    fn in_scoring_zone(&self) -> bool
    {
        let (left, right) = self.hoop.opening();
        let ball = &self.ball;
        ball.right() > left
            && ball.left() < right
            && ball.top() < self.hoop.rim_y
            && ball.bottom() > self.hoop.rim_y
            && ball.vy > 0.0
            && ball.x > left
            && ball.x < right
    }

    fn reset(&mut self, events: &mut Vec<ShotEvent>)
    {
        if !self.scored {
            self.misses += 1;
            events.push(ShotEvent::Missed);
            if self.misses >= self.config.misses_per_penalty && self.score > 0 {
                self.score -= 1;
                self.misses = 0;
                events.push(ShotEvent::Penalty);
            }
        }
        self.update_high_score();

        self.ball.x = self.reset_point.0;
        self.ball.y = self.reset_point.1;
        self.ball.vx = 0.0;
        self.ball.vy = 0.0;
        self.moving = false;
        self.scored = false;
        self.scored_ms = 0;
    }

    fn update_high_score(&mut self) -> bool
    {
        if self.score > self.high_score {
            self.high_score = self.score;
            return true;
        }
        false
    }

    /// Collision-free preview of the current aim; every third step is kept.
    pub fn trajectory(&self) -> Vec<(f32, f32)>
    {
        let (mut vx, mut vy) = self.launch_velocity();
        let (mut x, mut y) = (self.ball.x, self.ball.y);
        let mut points = Vec::new();
        for step in 0..PREVIEW_STEPS {
            vy += self.config.gravity;
            vx *= self.config.air_resistance;
            x += vx;
            y += vy;
            if x < 0.0 || x > COURT_WIDTH || y > COURT_HEIGHT - PREVIEW_FLOOR_GAP {
                break;
            }
            if step % 3 == 0 {
                points.push((x, y));
            }
        }
        points
    }

    pub fn ball(&self) -> &Ball
    {
        &self.ball
    }

    pub fn hoop(&self) -> &Hoop
    {
        &self.hoop
    }

    pub fn is_moving(&self) -> bool
    {
        self.moving
    }

    pub fn aim_state(&self) -> (f32, f32)
    {
        (self.elevation_deg, self.power)
    }

    pub fn max_power(&self) -> f32
    {
        self.config.max_power
    }

    pub fn score(&self) -> u32
    {
        self.score
    }

    pub fn high_score(&self) -> u32
    {
        self.high_score
    }

    pub fn misses(&self) -> u32
    {
        self.misses
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn sim() -> HoopsSim
    {
        HoopsSim::new(HoopsConfig::default(), 0)
    }

    fn launch(sim: &mut HoopsSim, x: f32, y: f32, vx: f32, vy: f32)
    {
        sim.ball.x = x;
        sim.ball.y = y;
        sim.ball.vx = vx;
        sim.ball.vy = vy;
        sim.moving = true;
    }

    fn close(a: f32, b: f32) -> bool
    {
        (a - b).abs() < 1e-3
    }

    fn run_until_rest(sim: &mut HoopsSim) -> Vec<ShotEvent>
    {
        let mut events = Vec::new();
        for _ in 0..500 {
            events.extend(sim.tick());
            if !sim.is_moving() {
                return events;
            }
        }
        panic!("ball never came to rest");
    }

    #[test]
    fn test_gravity_and_drag_integration()
    {
        let mut sim = sim();
        launch(&mut sim, 100.0, 400.0, 10.0, -10.0);
        sim.tick();
        assert!(close(sim.ball.vy, -9.6));
        assert!(close(sim.ball.y, 390.4));
        assert!(close(sim.ball.x, 110.0));
        assert!(close(sim.ball.vx, 9.9));
    }

    #[test]
    fn test_shoot_only_at_rest()
    {
        let mut sim = sim();
        sim.aim(90.0, 10.0);
        assert!(sim.shoot());
        assert!(close(sim.ball.vy, -10.0));
        assert!(sim.ball.vx.abs() < 1e-4);
        assert!(!sim.shoot());
        assert!(!sim.teleport(Spot::TwoThirds));
    }

    #[test]
    fn test_aim_from_drag_clamps_power()
    {
        let mut sim = sim();
        sim.aim_from_drag(0.0, -600.0);
        let (elevation, power) = sim.aim_state();
        assert!(close(elevation, 90.0));
        assert!(close(power, 25.0));

        sim.aim_from_drag(60.0, 0.0);
        let (elevation, power) = sim.aim_state();
        assert!(close(elevation, 0.0));
        assert!(close(power, 10.0));
    }

    #[test]
    fn test_drag_upward_fires_downward()
    {
        let mut sim = sim();
        sim.aim_from_drag(60.0, 60.0);
        let (elevation, _) = sim.aim_state();
        assert!(close(elevation, -45.0));
        assert!(sim.shoot());
        assert!(close(sim.ball.vx, 10.0));
        assert!(close(sim.ball.vy, 10.0));
    }

    #[test]
    fn test_nudge_keeps_keyboard_limits()
    {
        let mut sim = sim();
        sim.aim(170.0, 24.0);
        sim.nudge_aim(20.0, 5.0);
        assert_eq!(sim.aim_state(), (180.0, 25.0));
        sim.aim(-30.0, 10.0);
        sim.nudge_aim(2.0, 0.0);
        assert_eq!(sim.aim_state(), (0.0, 10.0));
    }

    #[test]
    fn test_ball_contains_point()
    {
        let sim = sim();
        assert!(sim.ball().contains(100.0, 400.0));
        assert!(sim.ball().contains(112.0, 416.0));
        assert!(!sim.ball().contains(121.0, 400.0));
    }

    #[test]
    fn test_backboard_reflects_ball()
    {
        let mut sim = sim();
        launch(&mut sim, 705.0, 190.0, 10.0, 0.0);
        let events = sim.tick();
        assert!(events.is_empty());
        assert!(close(sim.ball.x, 700.0));
        assert!(close(sim.ball.vx, -7.92));
    }

    #[test]
    fn test_rim_bounces_falling_ball()
    {
        let mut sim = sim();
        launch(&mut sim, 650.0, 215.0, 0.0, 5.0);
        sim.tick();
        assert!(close(sim.ball.vy, -3.24));
        assert!(close(sim.ball.y, 220.0));
    }

    #[test]
    fn test_left_rim_end_turns_back_incoming_ball()
    {
        let mut sim = sim();
        launch(&mut sim, 650.0, 215.0, 4.0, 5.0);
        assert!(sim.tick().is_empty());
        assert!(close(sim.ball.vy, -3.24));
        assert!(close(sim.ball.y, 220.0));
        assert!(close(sim.ball.vx, -2.772));
    }

    #[test]
    fn test_right_rim_end_turns_back_incoming_ball()
    {
        let mut sim = sim();
        launch(&mut sim, 730.0, 215.0, -4.0, 5.0);
        assert!(sim.tick().is_empty());
        assert!(close(sim.ball.vy, -3.24));
        assert!(close(sim.ball.y, 220.0));
        assert!(close(sim.ball.vx, 2.772));
        assert_eq!(sim.score(), 0);
    }

    #[test]
    fn test_scored_ball_resets_after_one_second()
    {
        let config = HoopsConfig {
            gravity: 0.0,
            ..HoopsConfig::default()
        };
        let mut sim = HoopsSim::new(config, 0);
        sim.reset_point = (300.0, 400.0);
        launch(&mut sim, 690.0, 225.0, 0.0, 0.1);
        assert_eq!(sim.tick(), vec![ShotEvent::Scored { new_high: true }]);
        for _ in 0..62 {
            assert!(sim.tick().is_empty());
            assert!(sim.is_moving());
        }
        assert!(sim.tick().is_empty());
        assert!(!sim.is_moving());
        assert!(close(sim.ball.x, 300.0));
        assert!(close(sim.ball.y, 400.0));
        assert_eq!(sim.score(), 1);
        assert_eq!(sim.misses(), 0);
    }

    #[test]
    fn test_swish_scores_once_and_resets_without_miss()
    {
        let mut sim = sim();
        launch(&mut sim, 690.0, 215.0, 0.0, 5.0);
        assert_eq!(sim.tick(), vec![ShotEvent::Scored { new_high: true }]);
        assert_eq!(sim.score(), 1);
        assert_eq!(sim.high_score(), 1);
        let rest = run_until_rest(&mut sim);
        assert!(rest.is_empty());
        assert_eq!(sim.score(), 1);
        assert_eq!(sim.misses(), 0);
    }

    #[test]
    fn test_rising_ball_does_not_score()
    {
        let mut sim = sim();
        launch(&mut sim, 690.0, 235.0, 0.0, -8.0);
        assert!(sim.tick().is_empty());
        assert_eq!(sim.score(), 0);
    }

    #[test]
    fn test_three_misses_cost_a_point()
    {
        let mut sim = sim();
        sim.score = 2;
        sim.aim(180.0, 25.0);
        for _ in 0..2 {
            assert!(sim.shoot());
            assert_eq!(run_until_rest(&mut sim), vec![ShotEvent::Missed]);
        }
        assert!(sim.shoot());
        assert_eq!(
            run_until_rest(&mut sim),
            vec![ShotEvent::Missed, ShotEvent::Penalty]
        );
        assert_eq!(sim.score(), 1);
        assert_eq!(sim.misses(), 0);
        assert_eq!(sim.high_score(), 2);
    }

    #[test]
    fn test_no_penalty_at_zero()
    {
        let mut sim = sim();
        sim.aim(180.0, 25.0);
        for _ in 0..4 {
            sim.shoot();
            run_until_rest(&mut sim);
        }
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.misses(), 4);
    }

    #[test]
    fn test_ball_returns_to_launch_spot()
    {
        let mut sim = sim();
        assert!(sim.teleport(Spot::OneThird));
        let spot = sim.spot_position(Spot::OneThird);
        assert!(close(spot.0, 100.0 + 590.0 / 3.0));
        sim.aim(180.0, 25.0);
        sim.shoot();
        run_until_rest(&mut sim);
        assert!(close(sim.ball.x, spot.0));
        assert!(close(sim.ball.y, 400.0));
    }

    #[test]
    fn test_trajectory_preview()
    {
        let mut sim = sim();
        sim.aim(60.0, 20.0);
        let points = sim.trajectory();
        assert!(!points.is_empty());
        assert!(points.len() <= 34);
        assert!(points[0].1 < 400.0);
        assert!(points.iter().all(|(x, y)| *x >= 0.0 && *x <= COURT_WIDTH && *y <= 480.0));
        // Preview never moves the ball.
        assert!(!sim.is_moving());
        assert!(close(sim.ball.x, 100.0));
    }
}
