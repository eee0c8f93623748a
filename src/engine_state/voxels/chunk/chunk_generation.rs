//! # Chunk Generation
//!
//! The procedural pipeline that fills a chunk:
//!
//! 1. `initialize` - allocate an all-empty grid
//! 2. terrain pass - biome, surface height, sand, ground, trees and resources,
//!    walked column by column from the top down
//! 3. cloud pass - a single layer of clouds at the top of the chunk
//! 4. player changes - stored edits replace the procedural block (even with empty)
//! 5. `generate_meshes` - build the instance lists of the visible blocks
//!
//! Every noise sample is taken at the world position of the cell, with noise fields
//! seeded from the world seed alone, so terrain is continuous across chunk borders.
//! Probabilistic choices (trees, trunk height, canopy) come from a generator seeded
//! from the world seed and the chunk coordinate, which makes a chunk's contents a
//! pure function of `(params, coord, edits)`.

use cgmath::Point3;
use web_time::Instant;

use super::{Chunk, WATER_PLANE_OFFSET};
use crate::engine_state::voxels::{
    biome::Biome,
    block::block_type::BlockType,
    edit_store::EditStore,
    noise_field::NoiseField,
    params::GenerationParams,
    rng::SeededRng,
};

impl Chunk {
    /// Runs the whole generation pipeline and marks the chunk loaded.
    ///
    /// # Arguments
    /// * `params` - The generation parameters shared by every chunk of the world
    /// * `edits` - Player edits; only those of this chunk are applied
    pub fn generate(&mut self, params: &GenerationParams, edits: &EditStore) {
        let start = Instant::now();

        let mut world_rng = SeededRng::new(params.seed);
        let terrain_noise = NoiseField::new(world_rng.next_u32());
        let cloud_noise = NoiseField::new(world_rng.next_u32());
        let mut chunk_rng = SeededRng::for_chunk(params.seed, self.coord);

        self.initialize();
        self.generate_terrain(params, &terrain_noise, &mut chunk_rng);
        self.generate_clouds(params, &cloud_noise);
        self.load_player_changes(edits);
        self.generate_meshes();

        self.water_level = Some(params.terrain.water_offset as f32 + WATER_PLANE_OFFSET);
        self.loaded = true;

        log::debug!(
            "Generated chunk ({}, {}) with {} instances in {:?}",
            self.coord.x,
            self.coord.z,
            self.instance_count(),
            start.elapsed()
        );
    }

    /// Classifies the biome of the column at a world position.
    fn biome_at(params: &GenerationParams, noise: &NoiseField, world_x: f64, world_z: f64) -> Biome {
        let biomes = &params.biomes;
        let variation = &biomes.variation;

        let sample = 0.5 * noise.sample_2d(world_x / biomes.scale, world_z / biomes.scale)
            + 0.5
            + variation.amplitude
                * noise.sample_2d(world_x / variation.scale, world_z / variation.scale);

        Biome::classify(sample, biomes)
    }

    fn generate_terrain(&mut self, params: &GenerationParams, noise: &NoiseField, rng: &mut SeededRng) {
        let terrain = &params.terrain;
        let width = self.size.width as i32;
        let max_y = self.size.height as i32 - 1;
        let max_height = max_y.max(0);
        let (origin_x, origin_z) = self.origin();

        for x in 0..width {
            for z in 0..width {
                let world_x = (origin_x + x) as f64;
                let world_z = (origin_z + z) as f64;

                let biome = Self::biome_at(params, noise, world_x, world_z);
                let value = noise.sample_2d(world_x / terrain.scale, world_z / terrain.scale);
                let height =
                    ((terrain.offset + terrain.magnitude * value).floor() as i32).clamp(0, max_height);

                for y in (0..=max_y).rev() {
                    let local = Point3::new(x, y, z);
                    if y <= terrain.water_offset && y <= height {
                        self.set_block_id(local, BlockType::SAND);
                    } else if y == height {
                        self.set_block_id(local, biome.ground_block());
                        if rng.next_f64() < params.trees.frequency {
                            self.generate_tree(params, rng, biome, Point3::new(x, height + 1, z));
                        }
                    } else if y < height && self.is_empty_at(local) {
                        self.generate_resource_if_needed(params, noise, local);
                    }
                }
            }
        }
    }

    fn is_empty_at(&self, local: Point3<i32>) -> bool {
        self.get_block(local).is_some_and(|cell| cell.is_empty())
    }

    /// Fills an underground cell with dirt, or with the last resource whose noise
    /// exceeds its scarcity.
    fn generate_resource_if_needed(
        &mut self,
        params: &GenerationParams,
        noise: &NoiseField,
        local: Point3<i32>,
    ) {
        let world = self.to_world(local);
        let mut block_type = BlockType::DIRT;

        for resource in &params.resources {
            let value = noise.sample_3d(
                world.x as f64 / resource.scale.x,
                world.y as f64 / resource.scale.y,
                world.z as f64 / resource.scale.z,
            );
            if value > resource.scarcity {
                block_type = resource.block;
            }
        }

        self.set_block_id(local, block_type);
    }

    /// Stamps a trunk upwards from `root` and, for leafy biomes, a canopy on top.
    fn generate_tree(
        &mut self,
        params: &GenerationParams,
        rng: &mut SeededRng,
        biome: Biome,
        root: Point3<i32>,
    ) {
        let trunk = &params.trees.trunk;
        let min_height = trunk.min_height as f64;
        let max_height = trunk.max_height as f64;
        let height = (min_height + (max_height - min_height) * rng.next_f64()).round() as i32;

        let trunk_block = biome.trunk_block();
        for y in root.y..=root.y + height {
            self.set_block_id(Point3::new(root.x, y, root.z), trunk_block);
        }

        if let Some(leaves) = biome.canopy_block() {
            let top = Point3::new(root.x, root.y + height, root.z);
            self.generate_tree_canopy(params, rng, leaves, top);
        }
    }

    /// Fills a randomly thinned sphere of leaves around `center`.
    ///
    /// One value is drawn for every cell of the bounding cube, inside the sphere or
    /// not, so the draw sequence depends only on the radius.
    fn generate_tree_canopy(
        &mut self,
        params: &GenerationParams,
        rng: &mut SeededRng,
        leaves: BlockType,
        center: Point3<i32>,
    ) {
        let canopy = &params.trees.canopy;
        let min_radius = canopy.min_radius as f64;
        let max_radius = canopy.max_radius as f64;
        let radius = (min_radius + (max_radius - min_radius) * rng.next_f64()).round() as i32;

        for dx in -radius..=radius {
            for dy in -radius..=radius {
                for dz in -radius..=radius {
                    let draw = rng.next_f64();
                    if dx * dx + dy * dy + dz * dz >= radius * radius {
                        continue;
                    }
                    if draw < canopy.density {
                        let local = Point3::new(center.x + dx, center.y + dy, center.z + dz);
                        self.set_block_id(local, leaves);
                    }
                }
            }
        }
    }

    fn generate_clouds(&mut self, params: &GenerationParams, noise: &NoiseField) {
        let clouds = &params.clouds;
        let width = self.size.width as i32;
        let top = self.size.height as i32 - 1;
        let (origin_x, origin_z) = self.origin();

        for x in 0..width {
            for z in 0..width {
                let world_x = (origin_x + x) as f64;
                let world_z = (origin_z + z) as f64;
                let value =
                    (noise.sample_2d(world_x / clouds.scale, world_z / clouds.scale) + 1.0) * 0.5;

                if value < clouds.density {
                    self.set_block_id(Point3::new(x, top, z), BlockType::CLOUD);
                }
            }
        }
    }

    /// Applies this chunk's stored edits over the procedural blocks.
    fn load_player_changes(&mut self, edits: &EditStore) {
        for (local, block_type) in edits.chunk_edits(self.origin()) {
            self.set_block_id(local, block_type);
        }
    }
}
