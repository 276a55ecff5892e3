use crate::config::SpawnArea;
use crate::error::{ConfigError, PlacementError};
use bevy::math::{Quat, Rect, Vec2, Vec3};
use rand::{Rng, RngCore};

/// Height and normal queries against the ground creatures stand on
pub trait TerrainSampler {
    fn sample_height(&self, x: f32, z: f32) -> f32;
    fn sample_normal(&self, x: f32, z: f32) -> Vec3;

    /// Horizontal extent (x, z) if the terrain is finite
    fn bounds(&self) -> Option<Rect> {
        None
    }
}

/// Infinite plane at a fixed height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatTerrain {
    pub height: f32,
}

impl TerrainSampler for FlatTerrain {
    fn sample_height(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }

    fn sample_normal(&self, _x: f32, _z: f32) -> Vec3 {
        Vec3::Y
    }
}

/// Regular grid of heights starting at the world origin, bilinearly interpolated
#[derive(Debug, Clone, PartialEq)]
pub struct HeightmapTerrain {
    heights: Vec<f32>,
    columns: usize,
    rows: usize,
    cell_size: f32,
}

impl HeightmapTerrain {
    /// `heights` is row-major: index `row * columns + column`, rows along z.
    pub fn new(
        columns: usize,
        rows: usize,
        cell_size: f32,
        heights: Vec<f32>,
    ) -> Result<Self, ConfigError> {
        let expected = columns * rows;
        if columns < 2 || rows < 2 || heights.len() != expected {
            return Err(ConfigError::HeightmapShape {
                columns,
                rows,
                expected,
                actual: heights.len(),
            });
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "heightmap.cell_size",
                value: cell_size,
            });
        }
        Ok(Self {
            heights,
            columns,
            rows,
            cell_size,
        })
    }

    fn at(&self, column: usize, row: usize) -> f32 {
        self.heights[row * self.columns + column]
    }

    /// Grid coordinate split into a cell index and the fraction within the cell
    fn locate(&self, coord: f32, cells: usize) -> (usize, usize, f32) {
        let scaled = (coord / self.cell_size).clamp(0.0, (cells - 1) as f32);
        let lower = scaled.floor() as usize;
        let upper = (lower + 1).min(cells - 1);
        (lower, upper, scaled - lower as f32)
    }
}

impl TerrainSampler for HeightmapTerrain {
    fn sample_height(&self, x: f32, z: f32) -> f32 {
        let (c0, c1, tx) = self.locate(x, self.columns);
        let (r0, r1, tz) = self.locate(z, self.rows);
        let near = self.at(c0, r0) + (self.at(c1, r0) - self.at(c0, r0)) * tx;
        let far = self.at(c0, r1) + (self.at(c1, r1) - self.at(c0, r1)) * tx;
        near + (far - near) * tz
    }

    fn sample_normal(&self, x: f32, z: f32) -> Vec3 {
        let e = self.cell_size;
        let left = self.sample_height(x - e, z);
        let right = self.sample_height(x + e, z);
        let back = self.sample_height(x, z - e);
        let front = self.sample_height(x, z + e);
        Vec3::new(left - right, 2.0 * e, back - front)
            .try_normalize()
            .unwrap_or(Vec3::Y)
    }

    fn bounds(&self) -> Option<Rect> {
        Some(Rect::from_corners(
            Vec2::ZERO,
            Vec2::new(
                (self.columns - 1) as f32 * self.cell_size,
                (self.rows - 1) as f32 * self.cell_size,
            ),
        ))
    }
}

/// Where a creature stands and how it is tilted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Chooses positions for founders, offspring and wandering creatures
pub trait SpawnPlacer {
    /// Drop the point (x, z) onto the ground
    fn snap(&self, x: f32, z: f32) -> Result<Placement, PlacementError>;

    /// Horizontal extent creatures are kept within, if any
    fn bounds(&self) -> Option<Rect> {
        None
    }

    fn spawn_position(
        &self,
        area: &SpawnArea,
        rng: &mut dyn RngCore,
    ) -> Result<Placement, PlacementError>;

    fn breeding_position(
        &self,
        parent_a: Vec3,
        parent_b: Vec3,
        displacement: f32,
        rng: &mut dyn RngCore,
    ) -> Result<Placement, PlacementError>;
}

/// Places creatures on a terrain, aligned with its surface
#[derive(Debug, Clone, Default)]
pub struct TerrainSpawnPlacer<T> {
    pub terrain: T,
}

impl<T: TerrainSampler> TerrainSpawnPlacer<T> {
    pub fn new(terrain: T) -> Self {
        Self { terrain }
    }
}

impl<T: TerrainSampler> SpawnPlacer for TerrainSpawnPlacer<T> {
    fn snap(&self, x: f32, z: f32) -> Result<Placement, PlacementError> {
        if !x.is_finite() || !z.is_finite() {
            return Err(PlacementError::NonFinitePosition { x, z });
        }
        let (x, z) = match self.terrain.bounds() {
            Some(rect) => (x.clamp(rect.min.x, rect.max.x), z.clamp(rect.min.y, rect.max.y)),
            None => (x, z),
        };

        let y = self.terrain.sample_height(x, z);
        if !y.is_finite() {
            return Err(PlacementError::NonFiniteHeight { x, z });
        }
        let normal = self
            .terrain
            .sample_normal(x, z)
            .try_normalize()
            .unwrap_or(Vec3::Y);

        Ok(Placement {
            position: Vec3::new(x, y, z),
            rotation: Quat::from_rotation_arc(Vec3::Y, normal),
        })
    }

    fn bounds(&self) -> Option<Rect> {
        self.terrain.bounds()
    }

    fn spawn_position(
        &self,
        area: &SpawnArea,
        rng: &mut dyn RngCore,
    ) -> Result<Placement, PlacementError> {
        let x = area.origin[0] + rng.gen_range(0.0..=area.size[0]);
        let z = area.origin[1] + rng.gen_range(0.0..=area.size[1]);
        self.snap(x, z)
    }

    fn breeding_position(
        &self,
        parent_a: Vec3,
        parent_b: Vec3,
        displacement: f32,
        rng: &mut dyn RngCore,
    ) -> Result<Placement, PlacementError> {
        let midpoint = (parent_a + parent_b) * 0.5;
        // sqrt keeps the offset uniform over the disc
        let radius = displacement * rng.gen_range(0.0..=1.0_f32).sqrt();
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        self.snap(
            midpoint.x + radius * angle.cos(),
            midpoint.z + radius * angle.sin(),
        )
    }
}
