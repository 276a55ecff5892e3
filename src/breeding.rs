use crate::config::GenomeConfig;
use crate::genome::Genome;
use rand::Rng;

/// Uniform crossover: every trait comes from one parent or the other with even odds.
///
/// Health and lifetime are never inherited; the child gets fresh vitality.
pub fn crossover<R: Rng + ?Sized>(
    parent_a: &Genome,
    parent_b: &Genome,
    config: &GenomeConfig,
    rng: &mut R,
) -> Genome {
    let (health, lifetime) = Genome::random_vitality(config, rng);
    Genome {
        body_shape: pick(parent_a.body_shape, parent_b.body_shape, rng),
        head_shape: pick(parent_a.head_shape, parent_b.head_shape, rng),
        ear_shape: pick(parent_a.ear_shape, parent_b.ear_shape, rng),
        size: pick(parent_a.size, parent_b.size, rng),
        red: pick(parent_a.red, parent_b.red, rng),
        green: pick(parent_a.green, parent_b.green, rng),
        blue: pick(parent_a.blue, parent_b.blue, rng),
        ear_count: pick(parent_a.ear_count, parent_b.ear_count, rng),
        health,
        lifetime,
    }
}

/// Crossover followed by a single mutation roll
pub fn breed<R: Rng + ?Sized>(
    parent_a: &Genome,
    parent_b: &Genome,
    config: &GenomeConfig,
    mutation_rate: f32,
    rng: &mut R,
) -> Genome {
    let mut child = crossover(parent_a, parent_b, config, rng);
    child.mutate(config, mutation_rate, rng);
    child
}

fn pick<T, R: Rng + ?Sized>(a: T, b: T, rng: &mut R) -> T {
    if rng.gen_bool(0.5) { a } else { b }
}
