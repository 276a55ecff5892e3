use crate::config::{EvolutionConfig, HEALTH_LIMITS};
use crate::error::{ConfigError, ModelError};
use crate::fitness::{self, FitnessLevel};
use crate::genome::Genome;
use crate::model::ModelFactory;
use crate::placement::{FlatTerrain, Placement, TerrainSpawnPlacer};
use crate::population::{BreedOutcome, PopulationManager};
use bevy::prelude::*;

/// Population whose visuals are entities in the Bevy world
pub type EntityPopulation = PopulationManager<Entity, TerrainSpawnPlacer<FlatTerrain>>;

/// Resource holding the population manager
#[derive(Resource, Deref, DerefMut)]
pub struct Population(pub EntityPopulation);

/// Resource to control simulation state
#[derive(Resource, PartialEq, Eq, Clone, Copy)]
pub enum SimulationState {
    Running,
    Paused,
}

impl Default for SimulationState {
    fn default() -> Self {
        SimulationState::Running
    }
}

/// Timer for breed cycles
#[derive(Resource)]
pub struct BreedingTimer(pub Timer);

/// Timer for population summaries in the log
#[derive(Resource)]
pub struct StatsTimer(pub Timer);

/// Component on the entity standing in for a creature's visual
#[derive(Component, Debug, Clone, Copy)]
pub struct CreatureModel {
    pub fitness: FitnessLevel,
    /// Color channels of the genome
    pub tint: [f32; 3],
    /// Fades with health: 1 at full health, 0 at none
    pub opacity: f32,
}

fn opacity(health: f32) -> f32 {
    (health / HEALTH_LIMITS.max).clamp(0.0, 1.0)
}

/// ModelFactory that spawns and despawns entities through `Commands`
pub struct CommandsModelFactory<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
}

impl<'a, 'w, 's> CommandsModelFactory<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>) -> Self {
        Self { commands }
    }
}

impl ModelFactory for CommandsModelFactory<'_, '_, '_> {
    type Handle = Entity;

    fn create_visual(
        &mut self,
        genome: &Genome,
        placement: &Placement,
    ) -> Result<Entity, ModelError> {
        let entity = self
            .commands
            .spawn((
                CreatureModel {
                    fitness: fitness::evaluate(genome),
                    tint: [genome.red, genome.green, genome.blue],
                    opacity: opacity(genome.health),
                },
                Transform::from_translation(placement.position)
                    .with_rotation(placement.rotation)
                    .with_scale(Vec3::splat(genome.size.max(0.01))),
            ))
            .id();
        Ok(entity)
    }

    fn destroy_visual(&mut self, handle: Entity) -> Result<(), ModelError> {
        match self.commands.get_entity(handle) {
            Some(mut entity) => {
                entity.despawn();
                Ok(())
            }
            None => Err(ModelError::StaleHandle),
        }
    }
}

/// Runs a population on a flat terrain, aging every frame and breeding on a timer
pub struct EvolutionPlugin {
    config: EvolutionConfig,
}

impl EvolutionPlugin {
    /// Rejects an invalid configuration before the app is built
    pub fn new(config: EvolutionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Plugin for EvolutionPlugin {
    fn build(&self, app: &mut App) {
        let placer = TerrainSpawnPlacer::new(FlatTerrain::default());
        let manager = match PopulationManager::new(self.config.clone(), placer) {
            Ok(manager) => manager,
            Err(err) => {
                error!("Evolution plugin disabled: {err}");
                return;
            }
        };

        app.init_resource::<SimulationState>()
            .insert_resource(Population(manager))
            .insert_resource(BreedingTimer(Timer::from_seconds(
                self.config.breeding_interval,
                TimerMode::Repeating,
            )))
            .insert_resource(StatsTimer(Timer::from_seconds(
                self.config.stats_interval,
                TimerMode::Repeating,
            )))
            .add_systems(Startup, setup_population)
            .add_systems(
                Update,
                (
                    age_population,
                    sync_creature_models,
                    breed_population,
                    log_population_stats,
                )
                    .chain()
                    .run_if(|state: Res<SimulationState>| *state == SimulationState::Running),
            );
    }
}

/// System to create the founders
pub fn setup_population(mut commands: Commands, mut population: ResMut<Population>) {
    let mut factory = CommandsModelFactory::new(&mut commands);
    population.initialize(&mut factory);
}

/// System to age creatures and remove the expired ones
pub fn age_population(
    time: Res<Time>,
    mut commands: Commands,
    mut population: ResMut<Population>,
) {
    let mut factory = CommandsModelFactory::new(&mut commands);
    population.tick(time.delta_secs(), &mut factory);
}

/// System to copy creature positions and health onto their entities
pub fn sync_creature_models(
    population: Res<Population>,
    mut models: Query<(&mut Transform, &mut CreatureModel)>,
) {
    for creature in population.creatures() {
        if let Ok((mut transform, mut model)) = models.get_mut(*creature.visual()) {
            transform.translation = creature.position();
            transform.rotation = creature.rotation();
            model.opacity = opacity(creature.health());
        }
    }
}

/// System to run a breed cycle every time the breeding timer finishes
pub fn breed_population(
    time: Res<Time>,
    mut timer: ResMut<BreedingTimer>,
    mut commands: Commands,
    mut population: ResMut<Population>,
) {
    if !timer.0.tick(time.delta()).just_finished() || !population.is_breeding() {
        return;
    }

    let mut factory = CommandsModelFactory::new(&mut commands);
    for _ in 0..timer.0.times_finished_this_tick() {
        if let BreedOutcome::Stopped(reason) = population.breed_cycle(&mut factory) {
            debug!(?reason, "Breed cycle skipped");
            break;
        }
    }
}

/// System to log a population summary at regular intervals
pub fn log_population_stats(
    time: Res<Time>,
    mut timer: ResMut<StatsTimer>,
    population: Res<Population>,
) {
    if timer.0.tick(time.delta()).just_finished() {
        let summary = population.summary();
        info!(
            size = summary.size,
            generation = summary.generation,
            best = summary.count(FitnessLevel::Best),
            good = summary.count(FitnessLevel::Good),
            not_bad = summary.count(FitnessLevel::NotBad),
            poor = summary.count(FitnessLevel::Poor),
            healthy = summary.healthy,
            mean_lifetime = summary.mean_lifetime,
            mean_health = summary.mean_health,
            breeding = summary.breeding,
            "Population summary"
        );
    }
}

/// System to exit the app once breeding is over and every creature has died
pub fn exit_when_extinct(population: Res<Population>, mut exit: EventWriter<AppExit>) {
    if !population.is_breeding() && population.is_empty() {
        info!(generation = population.generation(), "Population extinct");
        exit.send(AppExit::Success);
    }
}
