use crate::config::{Bounds, GenomeConfig, HEALTH_LIMITS, HEALTHY_THRESHOLD};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive shape of one body region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Cube,
    Sphere,
    Capsule,
}

impl Shape {
    /// Draw a shape from eleven equally likely buckets:
    /// Cube 4/11, Sphere 4/11, Capsule 3/11.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(1..12) {
            1..=4 => Shape::Cube,
            5..=8 => Shape::Sphere,
            _ => Shape::Capsule,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Cube => write!(f, "cube"),
            Shape::Sphere => write!(f, "sphere"),
            Shape::Capsule => write!(f, "capsule"),
        }
    }
}

/// Heritable attribute bundle of one creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub body_shape: Shape,
    pub head_shape: Shape,
    pub ear_shape: Shape,
    pub size: f32,
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub ear_count: u8,
    /// In [0, 100]
    pub health: f32,
    /// Remaining lifetime in seconds
    pub lifetime: f32,
}

impl Genome {
    /// Create a founder genome: every field sampled independently within its range.
    pub fn random<R: Rng + ?Sized>(config: &GenomeConfig, rng: &mut R) -> Self {
        let (health, lifetime) = Self::random_vitality(config, rng);
        Self {
            body_shape: Shape::random(rng),
            head_shape: Shape::random(rng),
            ear_shape: Shape::random(rng),
            size: sample(config.size, rng),
            red: sample(config.red, rng),
            green: sample(config.green, rng),
            blue: sample(config.blue, rng),
            ear_count: rng.gen_range(0..=config.max_ear_count),
            health,
            lifetime,
        }
    }

    /// Fresh health plus the lifetime derived from it.
    ///
    /// Higher health maps linearly to a longer lifetime.
    pub fn random_vitality<R: Rng + ?Sized>(config: &GenomeConfig, rng: &mut R) -> (f32, f32) {
        let health = sample(config.health, rng);
        (health, Self::lifetime_for(config, health))
    }

    pub fn lifetime_for(config: &GenomeConfig, health: f32) -> f32 {
        config.lifetime.lerp(health / HEALTH_LIMITS.max)
    }

    /// All-or-nothing mutation: with probability `mutation_rate`, resample size,
    /// the color channels and the ear count. Shapes, health and lifetime are kept.
    ///
    /// Returns whether the mutation happened.
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        config: &GenomeConfig,
        mutation_rate: f32,
        rng: &mut R,
    ) -> bool {
        if rng.gen_range(0.0..1.0_f32) >= mutation_rate {
            return false;
        }

        self.size = sample(config.size, rng);
        self.red = sample(config.red, rng);
        self.green = sample(config.green, rng);
        self.blue = sample(config.blue, rng);
        self.ear_count = rng.gen_range(0..=config.max_ear_count);
        true
    }

    /// Decrease the remaining lifetime, never below zero.
    pub fn age(&mut self, delta: f32) {
        self.lifetime = (self.lifetime - delta).max(0.0);
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }

    /// Add `amount` (negative to drain) to health, staying within [0, 100].
    pub fn adjust_health(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(HEALTH_LIMITS.min, HEALTH_LIMITS.max);
    }

    pub fn is_healthy(&self) -> bool {
        self.health > HEALTHY_THRESHOLD
    }

    /// Whether every sampled field lies in the ranges of `config`
    pub fn within(&self, config: &GenomeConfig) -> bool {
        config.size.contains(self.size)
            && config.red.contains(self.red)
            && config.green.contains(self.green)
            && config.blue.contains(self.blue)
            && self.ear_count <= config.max_ear_count
            && HEALTH_LIMITS.contains(self.health)
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{} size {:.2} rgb({:.2}, {:.2}, {:.2}) ears {} health {:.1} ttl {:.1}s",
            self.body_shape,
            self.head_shape,
            self.ear_shape,
            self.size,
            self.red,
            self.green,
            self.blue,
            self.ear_count,
            self.health,
            self.lifetime
        )
    }
}

fn sample<R: Rng + ?Sized>(bounds: Bounds, rng: &mut R) -> f32 {
    rng.gen_range(bounds.min..=bounds.max)
}
