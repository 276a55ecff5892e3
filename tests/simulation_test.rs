use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use creature_evo::config::{Bounds, EvolutionConfig};
use creature_evo::simulation::{CreatureModel, Population, SimulationState, exit_when_extinct};
use creature_evo::{ConfigError, EvolutionPlugin};
use std::time::Duration;

/// Headless app stepping 100ms per update
fn headless_app(config: EvolutionConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    app.add_plugins(EvolutionPlugin::new(config).expect("valid config"));
    app
}

fn model_count(app: &mut App) -> usize {
    app.world_mut()
        .query::<&CreatureModel>()
        .iter(app.world())
        .count()
}

fn seeded(initial: usize, max: usize) -> EvolutionConfig {
    EvolutionConfig {
        initial_population: initial,
        max_population: max,
        seed: Some(17),
        ..EvolutionConfig::default()
    }
}

/// Startup spawns one entity per founder
#[test]
fn test_founders_are_spawned_as_entities() {
    let mut app = headless_app(seeded(20, 40));
    app.update();

    let population = app.world().resource::<Population>();
    assert_eq!(population.len(), 20);
    assert!(population.is_breeding());
    assert_eq!(model_count(&mut app), 20);
}

/// Expired creatures are despawned along with their entities
#[test]
fn test_expired_creatures_are_despawned() {
    let mut config = seeded(10, 10);
    config.genome.lifetime = Bounds::new(0.2, 0.3);
    let mut app = headless_app(config);

    app.update();
    assert_eq!(model_count(&mut app), 10);

    for _ in 0..10 {
        app.update();
    }
    assert!(app.world().resource::<Population>().is_empty());
    assert_eq!(model_count(&mut app), 0);
}

/// The breeding timer triggers a breed cycle and offspring get entities
#[test]
fn test_breeding_timer_runs_breed_cycles() {
    let mut config = seeded(4, 100);
    config.breeding_interval = 0.5;
    config.eligible_lifetime = 0.0;
    config.genome.lifetime = Bounds::new(50.0, 60.0);
    let mut app = headless_app(config);

    for _ in 0..8 {
        app.update();
    }

    let population = app.world().resource::<Population>();
    assert_eq!(population.generation(), 1);
    assert_eq!(population.len(), 8);
    let size = population.len();
    assert_eq!(model_count(&mut app), size);
}

/// Pausing freezes aging and breeding
#[test]
fn test_paused_simulation_does_not_age() {
    let mut app = headless_app(seeded(5, 10));
    app.update();
    let before: Vec<f32> = app
        .world()
        .resource::<Population>()
        .creatures()
        .iter()
        .map(|creature| creature.lifetime())
        .collect();

    *app.world_mut().resource_mut::<SimulationState>() = SimulationState::Paused;
    for _ in 0..5 {
        app.update();
    }

    let after: Vec<f32> = app
        .world()
        .resource::<Population>()
        .creatures()
        .iter()
        .map(|creature| creature.lifetime())
        .collect();
    assert_eq!(before, after);
}

/// An empty population stops breeding and the app is asked to exit
#[test]
fn test_extinct_population_requests_exit() {
    let mut config = seeded(0, 10);
    config.breeding_interval = 0.1;
    let mut app = headless_app(config);
    app.add_systems(Update, exit_when_extinct);

    let mut exited = false;
    for _ in 0..5 {
        app.update();
        if !app.world().resource::<Events<AppExit>>().is_empty() {
            exited = true;
            break;
        }
    }
    assert!(exited, "expected an AppExit event");
    assert!(!app.world().resource::<Population>().is_breeding());
}

/// The plugin refuses an invalid configuration up front
#[test]
fn test_plugin_rejects_invalid_config() {
    let result = EvolutionPlugin::new(EvolutionConfig {
        max_population: 0,
        ..EvolutionConfig::default()
    });
    assert!(matches!(result, Err(ConfigError::ZeroCap)));
}

/// Entities follow their creatures as they wander and fade with health
#[test]
fn test_entities_follow_wandering_creatures() {
    let mut app = headless_app(seeded(10, 20));
    app.update();
    let start: Vec<Vec3> = app
        .world()
        .resource::<Population>()
        .creatures()
        .iter()
        .map(|creature| creature.position())
        .collect();

    for _ in 0..6 {
        app.update();
    }

    let current: Vec<(Entity, Vec3, f32)> = app
        .world()
        .resource::<Population>()
        .creatures()
        .iter()
        .map(|creature| (*creature.visual(), creature.position(), creature.health()))
        .collect();
    assert_eq!(current.len(), start.len());
    assert!(current.iter().zip(&start).any(|(now, then)| now.1 != *then));

    for (entity, position, health) in current {
        let transform = app.world().get::<Transform>(entity).expect("creature entity");
        assert_eq!(transform.translation, position);
        let model = app.world().get::<CreatureModel>(entity).expect("creature model");
        assert!((model.opacity - health / 100.0).abs() < 1e-6);
    }
}
