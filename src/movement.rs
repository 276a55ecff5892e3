//! Wandering between random targets on the terrain.
//!
//! A walking creature spends health in proportion to its speed, mass and the
//! slope under it. On reaching its target it rests for a while and recovers.
use crate::config::{MASS_RANGE, MovementConfig, SpawnArea, lerp};
use crate::creature::Creature;
use crate::error::PlacementError;
use crate::placement::SpawnPlacer;
use bevy::math::{Quat, Vec2, Vec3};
use rand::{Rng, RngCore};

/// Wander state of one creature
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Motion {
    /// Needs a new target; one is picked on the next step
    #[default]
    Idle,
    Walking {
        target: Vec3,
    },
    Resting {
        remaining: f32,
    },
}

/// Flat-ground speed before the stride boost: small creatures are quicker
pub fn base_speed(config: &MovementConfig, size: f32) -> f32 {
    lerp(config.speed.max, config.speed.min, size)
}

/// Speed over ground tilted by `slope` degrees
pub fn ground_speed(config: &MovementConfig, size: f32, slope: f32) -> f32 {
    let stride = lerp(1.0, config.size_boost, size);
    let incline = 1.0 - steepness(config, slope) * config.slope_penalty;
    (base_speed(config, size) * stride * incline).max(config.min_speed)
}

/// Health spent per second of walking
pub fn energy_cost(config: &MovementConfig, size: f32, slope: f32) -> f32 {
    config.energy_cost
        * base_speed(config, size)
        * MASS_RANGE.lerp(size)
        * (1.0 + steepness(config, slope))
}

/// Tilt of a ground-aligned rotation away from vertical, in degrees
pub fn slope_angle(rotation: Quat) -> f32 {
    let up = rotation * Vec3::Y;
    up.y.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Where wander targets are drawn: the placer's bounds, else `fallback`
pub fn wander_area<P: SpawnPlacer + ?Sized>(placer: &P, fallback: &SpawnArea) -> SpawnArea {
    match placer.bounds() {
        Some(rect) => SpawnArea {
            origin: [rect.min.x, rect.min.y],
            size: [rect.width(), rect.height()],
        },
        None => *fallback,
    }
}

/// Advance one creature's wandering by `delta` seconds.
///
/// On error the creature stays where it was.
pub fn step<H, P>(
    creature: &mut Creature<H>,
    delta: f32,
    config: &MovementConfig,
    placer: &P,
    area: &SpawnArea,
    rng: &mut dyn RngCore,
) -> Result<(), PlacementError>
where
    P: SpawnPlacer + ?Sized,
{
    match creature.motion() {
        Motion::Resting { remaining } => {
            creature.adjust_health(config.rest_recovery * delta);
            let remaining = remaining - delta;
            creature.set_motion(if remaining > 0.0 {
                Motion::Resting { remaining }
            } else {
                Motion::Idle
            });
            Ok(())
        }
        Motion::Idle => {
            let target = placer.spawn_position(area, rng)?.position;
            creature.set_motion(Motion::Walking { target });
            walk(creature, target, delta, config, placer, rng)
        }
        Motion::Walking { target } => walk(creature, target, delta, config, placer, rng),
    }
}

fn walk<H, P>(
    creature: &mut Creature<H>,
    target: Vec3,
    delta: f32,
    config: &MovementConfig,
    placer: &P,
    rng: &mut dyn RngCore,
) -> Result<(), PlacementError>
where
    P: SpawnPlacer + ?Sized,
{
    let position = creature.position();
    let offset = Vec2::new(target.x - position.x, target.z - position.z);
    let distance = offset.length();
    if distance <= config.arrival_distance {
        start_rest(creature, config, rng);
        return Ok(());
    }

    let slope = slope_angle(creature.rotation());
    if slope > config.max_slope {
        creature.set_motion(Motion::Idle);
        return Ok(());
    }

    let size = creature.genome().size;
    let travel = (ground_speed(config, size, slope) * delta).min(distance);
    let next = Vec2::new(position.x, position.z) + offset / distance * travel;
    let placement = placer.snap(next.x, next.y)?;
    creature.set_placement(placement);
    creature.adjust_health(-energy_cost(config, size, slope_angle(placement.rotation)) * delta);

    if distance - travel <= config.arrival_distance {
        start_rest(creature, config, rng);
    }
    Ok(())
}

fn start_rest<H>(creature: &mut Creature<H>, config: &MovementConfig, rng: &mut dyn RngCore) {
    let remaining = rng.gen_range(config.rest_time.min..=config.rest_time.max);
    creature.set_motion(Motion::Resting { remaining });
}

fn steepness(config: &MovementConfig, slope: f32) -> f32 {
    (slope / config.max_slope).clamp(0.0, 1.0)
}
