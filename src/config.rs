//! Configuration constants and runtime configuration for the evolution simulator
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// GENOME SETTINGS
// ============================================================================

/// Creature size range sampled for founders and on mutation
pub const SIZE_RANGE: Bounds = Bounds::new(0.0, 1.0);

/// Range for each color channel (red, green, blue)
pub const COLOR_RANGE: Bounds = Bounds::new(0.0, 1.0);

/// Ear count is drawn from 0..=MAX_EAR_COUNT
pub const MAX_EAR_COUNT: u8 = 3;

/// Health range sampled for founders and every offspring
pub const HEALTH_RANGE: Bounds = Bounds::new(80.0, 100.0);

/// Lifetime (seconds) at health 0 and at health 100; lerped in between
pub const LIFETIME_RANGE: Bounds = Bounds::new(5.0, 20.0);

/// Health above which a genome counts as healthy
pub const HEALTHY_THRESHOLD: f32 = 50.0;

/// Hard limits for health
pub const HEALTH_LIMITS: Bounds = Bounds::new(0.0, 100.0);

// ============================================================================
// BREEDING SETTINGS
// ============================================================================

/// Probability that an offspring receives a bulk mutation
pub const MUTATION_RATE: f32 = 0.01;

/// Seconds between breed cycles
pub const BREEDING_INTERVAL: f32 = 3.0;

/// Remaining lifetime a creature needs to be an eligible parent
pub const ELIGIBLE_LIFETIME: f32 = 15.0;

/// Maximum horizontal offset from the parents' midpoint for near-parent placement
pub const OFFSPRING_DISPLACEMENT: f32 = 5.0;

/// Every selected pair yields this many offspring
pub const OFFSPRING_PER_PAIR: usize = 2;

// ============================================================================
// POPULATION SETTINGS
// ============================================================================

/// Number of founders created by initialization
pub const INITIAL_POPULATION: usize = 100;

/// Breeding stops once the population reaches this size
pub const MAX_POPULATION: usize = 3000;

/// Interval in seconds between population summaries in the log
pub const STATS_INTERVAL: f32 = 10.0;

// ============================================================================
// MOVEMENT SETTINGS
// ============================================================================

/// Flat-ground speed of the largest (min) and the smallest (max) creature
pub const WALK_SPEED: Bounds = Bounds::new(2.0, 5.0);

/// Stride multiplier of the largest creature; the smallest walks at 1x
pub const SIZE_SPEED_BOOST: f32 = 2.0;

/// Fraction of speed lost when climbing the steepest walkable slope
pub const SLOPE_PENALTY: f32 = 0.25;

/// Steepest walkable slope in degrees
pub const MAX_SLOPE: f32 = 90.0;

/// Creatures never walk slower than this
pub const MIN_SPEED: f32 = 1.0;

/// Relative body mass of the smallest and the largest creature
pub const MASS_RANGE: Bounds = Bounds::new(1.0, 5.0);

/// Health spent per second per unit of speed and mass
pub const ENERGY_COST: f32 = 0.1;

/// Health recovered per second while resting
pub const REST_RECOVERY: f32 = 10.0;

/// Seconds a creature rests after reaching its target
pub const REST_TIME: Bounds = Bounds::new(1.0, 5.0);

/// Distance at which a target counts as reached
pub const ARRIVAL_DISTANCE: f32 = 1.0;

/// Extra lifetime seconds lost per second while unhealthy
pub const UNHEALTHY_PENALTY: f32 = 2.0;

// ============================================================================
// WORLD SETTINGS
// ============================================================================

/// Corner of the spawning area on the terrain (x, z)
pub const SPAWN_ORIGIN: [f32; 2] = [10.0, 10.0];

/// Extent of the spawning area (x, z)
pub const SPAWN_SIZE: [f32; 2] = [490.0, 490.0];

/// Closed interval `[min, max]` used for every sampled genome field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
}

impl Bounds {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Linear interpolation from `min` to `max`; `t` is clamped to [0, 1].
    pub fn lerp(&self, t: f32) -> f32 {
        lerp(self.min, self.max, t)
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        for value in [self.min, self.max] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    fn validate_within(&self, field: &'static str, limits: Bounds) -> Result<(), ConfigError> {
        self.validate(field)?;
        if self.min < limits.min || self.max > limits.max {
            return Err(ConfigError::RangeOutOfBounds {
                field,
                min: self.min,
                max: self.max,
                lower: limits.min,
                upper: limits.max,
            });
        }
        Ok(())
    }
}

/// `a + (b - a) * t` with `t` clamped to [0, 1]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Rectangle on the terrain's horizontal plane where creatures are placed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnArea {
    /// Corner (x, z)
    pub origin: [f32; 2],
    /// Extent along x and z
    pub size: [f32; 2],
}

impl Default for SpawnArea {
    fn default() -> Self {
        Self {
            origin: SPAWN_ORIGIN,
            size: SPAWN_SIZE,
        }
    }
}

/// Where offspring are placed after a breed cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OffspringPlacement {
    /// Anywhere in the spawning area, like founders
    SpawnArea,
    /// Around the midpoint of the two parents
    NearParents { displacement: f32 },
}

impl Default for OffspringPlacement {
    fn default() -> Self {
        OffspringPlacement::SpawnArea
    }
}

impl OffspringPlacement {
    /// Near-parent placement with the default displacement
    pub fn near_parents() -> Self {
        OffspringPlacement::NearParents {
            displacement: OFFSPRING_DISPLACEMENT,
        }
    }
}

/// Ranges used when sampling genomes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenomeConfig {
    pub size: Bounds,
    pub red: Bounds,
    pub green: Bounds,
    pub blue: Bounds,
    pub max_ear_count: u8,
    pub health: Bounds,
    pub lifetime: Bounds,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            size: SIZE_RANGE,
            red: COLOR_RANGE,
            green: COLOR_RANGE,
            blue: COLOR_RANGE,
            max_ear_count: MAX_EAR_COUNT,
            health: HEALTH_RANGE,
            lifetime: LIFETIME_RANGE,
        }
    }
}

impl GenomeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.size.validate("genome.size")?;
        self.red.validate_within("genome.red", COLOR_RANGE)?;
        self.green.validate_within("genome.green", COLOR_RANGE)?;
        self.blue.validate_within("genome.blue", COLOR_RANGE)?;
        self.health.validate_within("genome.health", HEALTH_LIMITS)?;
        self.lifetime.validate("genome.lifetime")?;
        if self.lifetime.min <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "genome.lifetime.min",
                value: self.lifetime.min,
            });
        }
        Ok(())
    }
}

/// Wandering, energy use and resting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub enabled: bool,
    pub speed: Bounds,
    pub size_boost: f32,
    pub slope_penalty: f32,
    pub max_slope: f32,
    pub min_speed: f32,
    pub energy_cost: f32,
    pub rest_recovery: f32,
    pub rest_time: Bounds,
    pub arrival_distance: f32,
    pub unhealthy_penalty: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: WALK_SPEED,
            size_boost: SIZE_SPEED_BOOST,
            slope_penalty: SLOPE_PENALTY,
            max_slope: MAX_SLOPE,
            min_speed: MIN_SPEED,
            energy_cost: ENERGY_COST,
            rest_recovery: REST_RECOVERY,
            rest_time: REST_TIME,
            arrival_distance: ARRIVAL_DISTANCE,
            unhealthy_penalty: UNHEALTHY_PENALTY,
        }
    }
}

impl MovementConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.speed.validate("movement.speed")?;
        require_positive("movement.speed.min", self.speed.min)?;
        require_positive("movement.size_boost", self.size_boost)?;
        require_positive("movement.max_slope", self.max_slope)?;
        require_positive("movement.arrival_distance", self.arrival_distance)?;
        if !(0.0..=1.0).contains(&self.slope_penalty) {
            return Err(ConfigError::InvalidRate {
                field: "movement.slope_penalty",
                value: self.slope_penalty,
            });
        }
        require_non_negative("movement.min_speed", self.min_speed)?;
        require_non_negative("movement.energy_cost", self.energy_cost)?;
        require_non_negative("movement.rest_recovery", self.rest_recovery)?;
        require_non_negative("movement.unhealthy_penalty", self.unhealthy_penalty)?;
        self.rest_time.validate("movement.rest_time")?;
        require_non_negative("movement.rest_time.min", self.rest_time.min)
    }
}

/// Full simulation configuration.
///
/// Every field has a default, so a JSON file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub genome: GenomeConfig,
    pub initial_population: usize,
    pub max_population: usize,
    pub mutation_rate: f32,
    pub breeding_interval: f32,
    pub eligible_lifetime: f32,
    pub spawn_area: SpawnArea,
    pub offspring_placement: OffspringPlacement,
    pub stats_interval: f32,
    pub movement: MovementConfig,
    /// Fixed seed for the simulation's random stream; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            genome: GenomeConfig::default(),
            initial_population: INITIAL_POPULATION,
            max_population: MAX_POPULATION,
            mutation_rate: MUTATION_RATE,
            breeding_interval: BREEDING_INTERVAL,
            eligible_lifetime: ELIGIBLE_LIFETIME,
            spawn_area: SpawnArea::default(),
            offspring_placement: OffspringPlacement::default(),
            stats_interval: STATS_INTERVAL,
            movement: MovementConfig::default(),
            seed: None,
        }
    }
}

impl EvolutionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.genome.validate()?;
        self.movement.validate()?;

        if self.max_population == 0 {
            return Err(ConfigError::ZeroCap);
        }
        if self.initial_population > self.max_population {
            return Err(ConfigError::InitialExceedsCap {
                initial: self.initial_population,
                max: self.max_population,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidRate {
                field: "mutation_rate",
                value: self.mutation_rate,
            });
        }
        require_positive("breeding_interval", self.breeding_interval)?;
        require_positive("stats_interval", self.stats_interval)?;
        if !self.eligible_lifetime.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "eligible_lifetime",
                value: self.eligible_lifetime,
            });
        }
        for value in self.spawn_area.origin {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite {
                    field: "spawn_area.origin",
                    value,
                });
            }
        }
        for value in self.spawn_area.size {
            require_positive("spawn_area.size", value)?;
        }
        if let OffspringPlacement::NearParents { displacement } = self.offspring_placement {
            if !displacement.is_finite() || displacement < 0.0 {
                return Err(ConfigError::NonPositive {
                    field: "offspring_placement.displacement",
                    value: displacement,
                });
            }
        }
        Ok(())
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field, value });
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field, value });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}
