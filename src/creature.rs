use crate::fitness::{self, FitnessLevel};
use crate::genome::Genome;
use crate::movement::Motion;
use crate::placement::Placement;
use bevy::math::{Quat, Vec3};

/// One member of the population.
///
/// `H` is the visual handle issued by a [`ModelFactory`](crate::model::ModelFactory).
/// The creature carries it but the factory owns the visual and releases it.
#[derive(Debug, Clone)]
pub struct Creature<H> {
    genome: Genome,
    fitness: FitnessLevel,
    visual: H,
    position: Vec3,
    rotation: Quat,
    motion: Motion,
}

impl<H> Creature<H> {
    pub fn new(genome: Genome, visual: H, position: Vec3) -> Self {
        let fitness = fitness::evaluate(&genome);
        Self {
            genome,
            fitness,
            visual,
            position,
            rotation: Quat::IDENTITY,
            motion: Motion::default(),
        }
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Replace the genome; fitness is recomputed from scratch.
    pub fn set_genome(&mut self, genome: Genome) {
        self.fitness = fitness::evaluate(&genome);
        self.genome = genome;
    }

    pub fn fitness(&self) -> FitnessLevel {
        self.fitness
    }

    pub fn visual(&self) -> &H {
        &self.visual
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn set_placement(&mut self, placement: Placement) {
        self.position = placement.position;
        self.rotation = placement.rotation;
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn set_motion(&mut self, motion: Motion) {
        self.motion = motion;
    }

    pub fn health(&self) -> f32 {
        self.genome.health
    }

    /// Health plays no part in fitness, so the cached level stays valid.
    pub fn adjust_health(&mut self, amount: f32) {
        self.genome.adjust_health(amount);
    }

    pub fn lifetime(&self) -> f32 {
        self.genome.lifetime
    }

    /// Aging only touches the remaining lifetime, which plays no part in fitness.
    pub fn age(&mut self, delta: f32) {
        self.genome.age(delta);
    }

    pub fn is_expired(&self) -> bool {
        self.genome.is_expired()
    }

    /// Whether this creature may reproduce under the given lifetime threshold
    pub fn is_eligible(&self, threshold: f32) -> bool {
        self.genome.lifetime > threshold
    }

    pub fn into_visual(self) -> H {
        self.visual
    }
}
