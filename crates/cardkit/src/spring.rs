//! Damped spring used to ease card rotation and scale toward their targets.
//!
//! Acceleration is `(-stiffness * (x - target) - damping * v) / mass`,
//! integrated with semi-implicit Euler. Long frames are split into steps of
//! at most [`MAX_STEP_SECS`] so a stalled frame cannot blow the spring up.

use std::time::Duration;

const MAX_STEP_SECS: f64 = 0.004;
const REST_THRESHOLD: f64 = 0.001;
const VELOCITY_THRESHOLD: f64 = 0.01;
const MIN_STIFFNESS: f64 = 0.1;
const MIN_MASS: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub damping: f64,
    pub stiffness: f64,
    pub mass: f64,
}

impl SpringConfig {
    /// Slow, heavy settle used for card tilt and hover scale.
    pub const CARD: Self = Self {
        damping: 30.0,
        stiffness: 100.0,
        mass: 2.0,
    };

    /// Quicker response for layout moves between stacked and spread poses.
    pub const LAYOUT: Self = Self {
        damping: 26.0,
        stiffness: 170.0,
        mass: 1.0,
    };
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::CARD
    }
}

#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    config: SpringConfig,
    at_rest: bool,
}

impl Spring {
    pub fn new(initial: f64, config: SpringConfig) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target: initial,
            config: SpringConfig {
                damping: config.damping.max(0.0),
                stiffness: config.stiffness.max(MIN_STIFFNESS),
                mass: config.mass.max(MIN_MASS),
            },
            at_rest: true,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Moves the target. The position keeps its momentum and eases over.
    pub fn set_target(&mut self, target: f64) {
        if self.target != target {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Snaps both position and target, dropping any velocity.
    pub fn jump_to(&mut self, value: f64) {
        self.position = value;
        self.target = value;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    /// Advances the simulation. Returns `true` while still moving.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.at_rest {
            return false;
        }

        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step = remaining.min(MAX_STEP_SECS);
            self.step(step);
            remaining -= step;
        }

        if (self.position - self.target).abs() < REST_THRESHOLD
            && self.velocity.abs() < VELOCITY_THRESHOLD
        {
            self.jump_to(self.target);
        }

        !self.at_rest
    }

    fn step(&mut self, dt: f64) {
        let SpringConfig {
            damping,
            stiffness,
            mass,
        } = self.config;
        let force = -stiffness * (self.position - self.target) - damping * self.velocity;
        self.velocity += force / mass * dt;
        self.position += self.velocity * dt;
    }
}
