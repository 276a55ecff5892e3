use crate::breeding;
use crate::config::{EvolutionConfig, OFFSPRING_PER_PAIR, OffspringPlacement};
use crate::creature::Creature;
use crate::error::{ConfigError, PlacementError};
use crate::fitness::FitnessLevel;
use crate::genome::Genome;
use crate::model::ModelFactory;
use crate::movement;
use crate::placement::{Placement, SpawnPlacer};
use crate::selection::select_parent;
use bevy::log::{debug, info, warn};
use bevy::math::Vec3;
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

/// Why breeding stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    PopulationCap,
    EmptyPopulation,
    NoEligibleParents,
    Requested,
}

/// Breeding sub-mode of a running population
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreedingState {
    /// Not initialized yet
    Idle,
    Active,
    /// Terminal until the next `initialize`
    Stopped(StopReason),
}

/// Result of one aging step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub culled: usize,
    pub release_failures: usize,
    /// Creatures that could not be moved this tick
    pub stranded: usize,
}

/// Counters for one completed breed cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BreedReport {
    pub pairs: usize,
    pub offspring: usize,
    pub failed_offspring: usize,
    /// Parent draws that hit the zero-weight fallback
    pub fallback_draws: usize,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreedOutcome {
    Bred(BreedReport),
    /// This call found a stop condition and halted breeding
    Stopped(StopReason),
    /// Breeding was not active; nothing happened
    Inactive,
}

/// Snapshot of the population for logging
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PopulationSummary {
    pub size: usize,
    pub generation: u64,
    /// Counts indexed by level, best first
    pub fitness_counts: [usize; 4],
    /// Creatures above the healthy threshold
    pub healthy: usize,
    pub mean_lifetime: f32,
    pub mean_health: f32,
    pub breeding: bool,
}

impl PopulationSummary {
    pub fn count(&self, level: FitnessLevel) -> usize {
        self.fitness_counts[level as usize]
    }
}

/// Owns the population and drives aging, culling and breeding.
///
/// `H` is the visual handle type of the [`ModelFactory`] used with this manager,
/// `P` the placer used for founders and offspring.
pub struct PopulationManager<H, P> {
    config: EvolutionConfig,
    placer: P,
    rng: SmallRng,
    population: Vec<Creature<H>>,
    generation: u64,
    state: BreedingState,
}

impl<H, P: SpawnPlacer> PopulationManager<H, P> {
    /// Validate `config` and seed the random stream from `config.seed`
    /// (entropy when absent).
    pub fn new(config: EvolutionConfig, placer: P) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::with_rng(config, placer, rng)
    }

    pub fn with_rng(
        config: EvolutionConfig,
        placer: P,
        rng: SmallRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            placer,
            rng,
            population: Vec::new(),
            generation: 0,
            state: BreedingState::Idle,
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn creatures(&self) -> &[Creature<H>] {
        &self.population
    }

    pub fn len(&self) -> usize {
        self.population.len()
    }

    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> BreedingState {
        self.state
    }

    pub fn is_breeding(&self) -> bool {
        self.state == BreedingState::Active
    }

    /// Replace the population with fresh founders and start breeding.
    ///
    /// Any existing creatures are released first. Returns the number of founders
    /// actually placed; a founder whose placement or visual fails is skipped.
    pub fn initialize<F>(&mut self, factory: &mut F) -> usize
    where
        F: ModelFactory<Handle = H>,
    {
        self.clear(factory);
        self.generation = 0;

        for _ in 0..self.config.initial_population {
            let genome = Genome::random(&self.config.genome, &mut self.rng);
            let placement = self
                .placer
                .spawn_position(&self.config.spawn_area, &mut self.rng);
            if let Some(creature) = spawn_creature(factory, genome, placement) {
                self.population.push(creature);
            }
        }

        self.state = BreedingState::Active;
        info!(
            founders = self.population.len(),
            cap = self.config.max_population,
            "Breeding started"
        );
        self.population.len()
    }

    /// Release every creature's visual and empty the population.
    pub fn clear<F>(&mut self, factory: &mut F)
    where
        F: ModelFactory<Handle = H>,
    {
        for creature in self.population.drain(..) {
            if let Err(err) = factory.destroy_visual(creature.into_visual()) {
                warn!("Failed to release creature visual: {err}");
            }
        }
        self.state = BreedingState::Idle;
    }

    /// Move every creature, age it by `delta` seconds and remove the expired
    /// ones, releasing their visuals. Survivors keep their relative order.
    ///
    /// Unhealthy creatures lose an extra `unhealthy_penalty` seconds of
    /// lifetime per second.
    pub fn tick<F>(&mut self, delta: f32, factory: &mut F) -> TickReport
    where
        F: ModelFactory<Handle = H>,
    {
        let mut report = TickReport::default();
        if !(delta.is_finite() && delta > 0.0) {
            return report;
        }

        let walking = self.config.movement;
        if walking.enabled {
            let area = movement::wander_area(&self.placer, &self.config.spawn_area);
            for creature in &mut self.population {
                let moved =
                    movement::step(creature, delta, &walking, &self.placer, &area, &mut self.rng);
                if let Err(err) = moved {
                    report.stranded += 1;
                    creature.set_motion(movement::Motion::Idle);
                    warn!("Creature could not move: {err}");
                }
            }
        }

        let (expired, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut self.population)
            .into_iter()
            .map(|mut creature| {
                let penalty = if creature.genome().is_healthy() {
                    0.0
                } else {
                    walking.unhealthy_penalty
                };
                creature.age(delta * (1.0 + penalty));
                creature
            })
            .partition(Creature::is_expired);
        self.population = alive;

        for creature in expired {
            report.culled += 1;
            if let Err(err) = factory.destroy_visual(creature.into_visual()) {
                report.release_failures += 1;
                warn!("Failed to release expired creature visual: {err}");
            }
        }

        if report.culled > 0 {
            debug!(
                culled = report.culled,
                remaining = self.population.len(),
                "Culled expired creatures"
            );
        }
        report
    }

    /// Run one breed cycle if breeding is active.
    ///
    /// Pairs are drawn once per two eligible parents; every pair yields two
    /// offspring. A pair is only started when both offspring fit under the
    /// cap, so the population never exceeds it.
    pub fn breed_cycle<F>(&mut self, factory: &mut F) -> BreedOutcome
    where
        F: ModelFactory<Handle = H>,
    {
        if self.state != BreedingState::Active {
            return BreedOutcome::Inactive;
        }
        if self.population.is_empty() {
            warn!("Population is empty; cannot breed");
            self.halt(StopReason::EmptyPopulation);
            return BreedOutcome::Stopped(StopReason::EmptyPopulation);
        }
        if self.population.len() + OFFSPRING_PER_PAIR > self.config.max_population {
            self.halt(StopReason::PopulationCap);
            return BreedOutcome::Stopped(StopReason::PopulationCap);
        }

        let threshold = self.config.eligible_lifetime;
        let candidates: Vec<&Creature<H>> = self
            .population
            .iter()
            .filter(|creature| creature.is_eligible(threshold))
            .collect();
        if candidates.is_empty() {
            warn!(
                population = self.population.len(),
                threshold, "No eligible parents; breeding halted"
            );
            self.halt(StopReason::NoEligibleParents);
            return BreedOutcome::Stopped(StopReason::NoEligibleParents);
        }

        let mut report = BreedReport::default();
        let mut brood = Vec::new();
        let mut capped = false;

        for _ in (0..candidates.len()).step_by(2) {
            if self.population.len() + brood.len() + OFFSPRING_PER_PAIR
                > self.config.max_population
            {
                capped = true;
                break;
            }

            let (Some(first), Some(second)) = (
                select_parent(&candidates, &mut self.rng),
                select_parent(&candidates, &mut self.rng),
            ) else {
                continue;
            };
            report.fallback_draws += usize::from(first.fallback) + usize::from(second.fallback);
            let parent_a = candidates[first.index];
            let parent_b = candidates[second.index];
            report.pairs += 1;

            for _ in 0..OFFSPRING_PER_PAIR {
                let genome = breeding::breed(
                    parent_a.genome(),
                    parent_b.genome(),
                    &self.config.genome,
                    self.config.mutation_rate,
                    &mut self.rng,
                );
                let placement = place_offspring(
                    &self.placer,
                    &self.config,
                    parent_a.position(),
                    parent_b.position(),
                    &mut self.rng,
                );
                match spawn_creature(factory, genome, placement) {
                    Some(child) => {
                        brood.push(child);
                        report.offspring += 1;
                    }
                    None => report.failed_offspring += 1,
                }
            }
        }

        drop(candidates);
        self.population.extend(brood);
        self.generation += 1;
        report.generation = self.generation;

        debug!(
            generation = self.generation,
            pairs = report.pairs,
            offspring = report.offspring,
            population = self.population.len(),
            "Breed cycle complete"
        );

        if capped || self.population.len() + OFFSPRING_PER_PAIR > self.config.max_population {
            self.halt(StopReason::PopulationCap);
        }
        BreedOutcome::Bred(report)
    }

    /// Stop breeding on request. Idempotent: returns false when breeding was
    /// not active.
    pub fn stop_breeding(&mut self) -> bool {
        if self.state != BreedingState::Active {
            return false;
        }
        self.halt(StopReason::Requested);
        true
    }

    fn halt(&mut self, reason: StopReason) {
        if self.state == BreedingState::Active {
            self.state = BreedingState::Stopped(reason);
            info!(
                ?reason,
                generation = self.generation,
                population = self.population.len(),
                "Breeding stopped after {} generations",
                self.generation
            );
        }
    }

    pub fn summary(&self) -> PopulationSummary {
        let mut fitness_counts = [0usize; 4];
        let mut healthy = 0;
        let mut total_lifetime = 0.0;
        let mut total_health = 0.0;
        for creature in &self.population {
            fitness_counts[creature.fitness() as usize] += 1;
            healthy += usize::from(creature.genome().is_healthy());
            total_lifetime += creature.lifetime();
            total_health += creature.health();
        }
        let size = self.population.len();
        let mean = |total: f32| if size == 0 { 0.0 } else { total / size as f32 };
        PopulationSummary {
            size,
            generation: self.generation,
            fitness_counts,
            healthy,
            mean_lifetime: mean(total_lifetime),
            mean_health: mean(total_health),
            breeding: self.is_breeding(),
        }
    }
}

fn place_offspring<P: SpawnPlacer>(
    placer: &P,
    config: &EvolutionConfig,
    parent_a: Vec3,
    parent_b: Vec3,
    rng: &mut dyn RngCore,
) -> Result<Placement, PlacementError> {
    match config.offspring_placement {
        OffspringPlacement::SpawnArea => placer.spawn_position(&config.spawn_area, rng),
        OffspringPlacement::NearParents { displacement } => {
            placer.breeding_position(parent_a, parent_b, displacement, rng)
        }
    }
}

/// Place and dress one creature; failures are logged and yield `None`.
fn spawn_creature<F: ModelFactory>(
    factory: &mut F,
    genome: Genome,
    placement: Result<Placement, PlacementError>,
) -> Option<Creature<F::Handle>> {
    let placement = match placement {
        Ok(placement) => placement,
        Err(err) => {
            warn!("Skipping creature with no valid position: {err}");
            return None;
        }
    };
    match factory.create_visual(&genome, &placement) {
        Ok(handle) => {
            let mut creature = Creature::new(genome, handle, placement.position);
            creature.set_placement(placement);
            Some(creature)
        }
        Err(err) => {
            warn!("Skipping creature whose visual failed: {err}");
            None
        }
    }
}
