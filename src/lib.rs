//! Genetic population simulation: creatures with heritable shape, size and
//! color traits, weighted parent selection, uniform crossover and lifetime-based
//! culling, driven by a Bevy app.

pub mod breeding;
pub mod config;
pub mod creature;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod model;
pub mod movement;
pub mod placement;
pub mod population;
pub mod selection;
pub mod simulation;

pub use config::EvolutionConfig;
pub use creature::Creature;
pub use error::{ConfigError, ModelError, PlacementError};
pub use fitness::FitnessLevel;
pub use genome::{Genome, Shape};
pub use model::ModelFactory;
pub use movement::Motion;
pub use population::{BreedOutcome, BreedingState, PopulationManager, StopReason};
pub use simulation::EvolutionPlugin;
