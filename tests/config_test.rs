use bevy::math::{Quat, Vec3};
use creature_evo::config::{
    Bounds, EvolutionConfig, MovementConfig, OffspringPlacement, SpawnArea, lerp,
};
use creature_evo::error::{ConfigError, PlacementError};
use creature_evo::placement::{
    FlatTerrain, HeightmapTerrain, SpawnPlacer, TerrainSampler, TerrainSpawnPlacer,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[test]
fn test_default_config_is_valid() {
    let config = EvolutionConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.initial_population, 100);
    assert_eq!(config.max_population, 3000);
    assert_eq!(config.mutation_rate, 0.01);
    assert_eq!(config.breeding_interval, 3.0);
    assert_eq!(config.eligible_lifetime, 15.0);
    assert_eq!(config.offspring_placement, OffspringPlacement::SpawnArea);
}

#[test]
fn test_inverted_range_is_rejected() {
    let mut config = EvolutionConfig::default();
    config.genome.lifetime = Bounds::new(30.0, 10.0);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvertedRange {
            field: "genome.lifetime",
            ..
        })
    ));
}

#[test]
fn test_color_range_must_stay_in_unit_interval() {
    let mut config = EvolutionConfig::default();
    config.genome.green = Bounds::new(0.0, 1.5);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::RangeOutOfBounds { field: "genome.green", .. })
    ));
}

#[test]
fn test_health_range_must_stay_within_limits() {
    let mut config = EvolutionConfig::default();
    config.genome.health = Bounds::new(50.0, 120.0);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::RangeOutOfBounds { field: "genome.health", .. })
    ));
}

#[test]
fn test_non_finite_bounds_are_rejected() {
    let mut config = EvolutionConfig::default();
    config.genome.size = Bounds::new(f32::NAN, 1.0);
    assert!(matches!(config.validate(), Err(ConfigError::NonFinite { .. })));
}

#[test]
fn test_population_limits() {
    let mut config = EvolutionConfig::default();
    config.initial_population = 10;
    config.max_population = 5;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InitialExceedsCap { initial: 10, max: 5 })
    ));

    config.initial_population = 0;
    config.max_population = 0;
    assert!(matches!(config.validate(), Err(ConfigError::ZeroCap)));
}

#[test]
fn test_rates_and_intervals() {
    let mut config = EvolutionConfig::default();
    config.mutation_rate = 1.5;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidRate { .. })));

    let mut config = EvolutionConfig::default();
    config.breeding_interval = 0.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NonPositive { field: "breeding_interval", .. })
    ));

    let mut config = EvolutionConfig::default();
    config.spawn_area = SpawnArea {
        origin: [0.0, 0.0],
        size: [-1.0, 5.0],
    };
    assert!(matches!(config.validate(), Err(ConfigError::NonPositive { .. })));

    let mut config = EvolutionConfig::default();
    config.offspring_placement = OffspringPlacement::NearParents { displacement: -1.0 };
    assert!(config.validate().is_err());
}

#[test]
fn test_movement_settings_are_validated() {
    let mut config = EvolutionConfig::default();
    config.movement.speed = Bounds::new(0.0, 5.0);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NonPositive { field: "movement.speed.min", .. })
    ));

    let mut config = EvolutionConfig::default();
    config.movement.energy_cost = -0.1;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Negative { field: "movement.energy_cost", .. })
    ));

    let mut config = EvolutionConfig::default();
    config.movement.slope_penalty = 2.0;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidRate { .. })));

    let mut config = EvolutionConfig::default();
    config.movement.rest_time = Bounds::new(5.0, 1.0);
    assert!(matches!(config.validate(), Err(ConfigError::InvertedRange { .. })));

    let mut config = EvolutionConfig::default();
    config.movement.unhealthy_penalty = f32::INFINITY;
    assert!(matches!(config.validate(), Err(ConfigError::NonFinite { .. })));
}

#[test]
fn test_partial_movement_json() {
    let config = EvolutionConfig::from_json_str(
        r#"{ "movement": { "enabled": false, "rest_recovery": 4.0 } }"#,
    )
    .expect("valid json config");
    assert!(!config.movement.enabled);
    assert_eq!(config.movement.rest_recovery, 4.0);
    assert_eq!(config.movement.speed, MovementConfig::default().speed);
}

/// Only the fields present in the file are overridden
#[test]
fn test_partial_json_keeps_defaults() {
    let config = EvolutionConfig::from_json_str(
        r#"{
            "initial_population": 4,
            "max_population": 10,
            "seed": 9,
            "genome": { "size": { "min": 0.2, "max": 0.8 } },
            "offspring_placement": { "mode": "near_parents", "displacement": 3.0 }
        }"#,
    )
    .expect("valid json config");

    assert_eq!(config.initial_population, 4);
    assert_eq!(config.max_population, 10);
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.genome.size, Bounds::new(0.2, 0.8));
    assert_eq!(config.genome.health, Bounds::new(80.0, 100.0));
    assert_eq!(
        config.offspring_placement,
        OffspringPlacement::NearParents { displacement: 3.0 }
    );
    assert_eq!(config.mutation_rate, 0.01);
}

#[test]
fn test_json_is_validated_on_load() {
    let result = EvolutionConfig::from_json_str(r#"{ "mutation_rate": -0.5 }"#);
    assert!(matches!(result, Err(ConfigError::InvalidRate { .. })));

    let result = EvolutionConfig::from_json_str("{ not json");
    assert!(matches!(result, Err(ConfigError::Parse(_))));

    let result = EvolutionConfig::from_json_file("/nonexistent/creature-evo.json");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_config_round_trips_through_json() {
    let config = EvolutionConfig {
        seed: Some(1),
        offspring_placement: OffspringPlacement::near_parents(),
        ..EvolutionConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(EvolutionConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_lerp_clamps() {
    assert_eq!(lerp(5.0, 20.0, 0.0), 5.0);
    assert_eq!(lerp(5.0, 20.0, 1.0), 20.0);
    assert_eq!(lerp(5.0, 20.0, 2.0), 20.0);
    assert_eq!(lerp(5.0, 20.0, -1.0), 5.0);
    assert_eq!(Bounds::new(0.0, 10.0).lerp(0.25), 2.5);
}

#[test]
fn test_heightmap_interpolates_between_samples() {
    // 3x2 grid, cell size 10: rising along x, flat along z
    let terrain = HeightmapTerrain::new(3, 2, 10.0, vec![0.0, 10.0, 20.0, 0.0, 10.0, 20.0])
        .expect("valid heightmap");

    assert_eq!(terrain.sample_height(0.0, 0.0), 0.0);
    assert_eq!(terrain.sample_height(5.0, 5.0), 5.0);
    assert_eq!(terrain.sample_height(15.0, 0.0), 15.0);
    // clamped outside the grid
    assert_eq!(terrain.sample_height(100.0, 0.0), 20.0);

    let normal = terrain.sample_normal(10.0, 5.0);
    assert!((normal.length() - 1.0).abs() < 1e-5);
    assert!(normal.x < 0.0, "slope rises along x so the normal leans back: {normal}");
    assert!(normal.y > 0.0);
    assert!(normal.z.abs() < 1e-5);
}

#[test]
fn test_heightmap_shape_is_checked() {
    assert!(matches!(
        HeightmapTerrain::new(3, 3, 1.0, vec![0.0; 8]),
        Err(ConfigError::HeightmapShape { expected: 9, actual: 8, .. })
    ));
    assert!(HeightmapTerrain::new(2, 2, 0.0, vec![0.0; 4]).is_err());
}

#[test]
fn test_spawn_positions_stay_in_area() {
    let placer = TerrainSpawnPlacer::new(FlatTerrain { height: 1.5 });
    let area = SpawnArea::default();
    let mut rng = SmallRng::seed_from_u64(6);

    for _ in 0..1_000 {
        let placement = placer.spawn_position(&area, &mut rng).unwrap();
        assert!((10.0..=500.0).contains(&placement.position.x));
        assert!((10.0..=500.0).contains(&placement.position.z));
        assert_eq!(placement.position.y, 1.5);
        assert!(placement.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }
}

/// Placement on a bounded terrain clamps into the terrain and follows its height
#[test]
fn test_placement_clamps_to_terrain_bounds() {
    let terrain = HeightmapTerrain::new(2, 2, 10.0, vec![0.0, 10.0, 0.0, 10.0]).unwrap();
    let placer = TerrainSpawnPlacer::new(terrain);

    let placement = placer.snap(50.0, -5.0).unwrap();
    assert_eq!(placement.position, Vec3::new(10.0, 10.0, 0.0));
    assert!(!placement.rotation.abs_diff_eq(Quat::IDENTITY, 1e-3));

    assert!(matches!(
        placer.snap(f32::NAN, 0.0),
        Err(PlacementError::NonFinitePosition { .. })
    ));
}

#[test]
fn test_breeding_position_is_near_midpoint() {
    let placer = TerrainSpawnPlacer::new(FlatTerrain::default());
    let mut rng = SmallRng::seed_from_u64(31);
    let a = Vec3::new(0.0, 0.0, 0.0);
    let b = Vec3::new(10.0, 0.0, 20.0);

    for _ in 0..500 {
        let placement = placer.breeding_position(a, b, 2.0, &mut rng).unwrap();
        let offset = placement.position - Vec3::new(5.0, 0.0, 10.0);
        assert!(offset.length() <= 2.0 + 1e-4);
    }

    let exact = placer.breeding_position(a, b, 0.0, &mut rng).unwrap();
    assert!(exact.position.abs_diff_eq(Vec3::new(5.0, 0.0, 10.0), 1e-5));
}
