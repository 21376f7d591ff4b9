use rand::Rng;

use crate::block::{Block, BlockKind};
use crate::config::WorldConfig;

/// One generated span of terrain columns.
#[derive(Clone, Debug)]
pub struct Strip {
    /// Blocks in generation order.
    pub blocks: Vec<Block>,
    /// Surface row of the column after the last one, for seeding a
    /// follow-up strip.
    pub last_height: i32,
}

/// Generate `width` columns starting at tile column `start_col`.
///
/// Heights are measured in tile rows from the top of the screen. Each column
/// perturbs the base height by -1, 0 or +1, clamps, then averages with the
/// previous column. The average is held within one row of the previous
/// column, so a `prev_height` far from the base walks back one row at a
/// time and neighbours never differ by more than a row.
///
/// # Panics
///
/// If `world.tree_chance` is outside `[0, 1]` or `trunk_min > trunk_max`.
/// [`WorldConfig`]s that passed `Config::validate` are fine.
pub fn generate(
    world: &WorldConfig,
    start_col: i32,
    width: usize,
    prev_height: Option<i32>,
    rng: &mut impl Rng,
) -> Strip {
    let heights = height_profile(world, width, prev_height, rng);
    let tile = world.tile_size;
    let rows = world.rows();
    let mut blocks = Vec::new();

    for i in 0..width {
        let h = heights[i];
        let block_x = world.wrap_x((start_col + i as i32) * tile);

        blocks.push(Block::new(block_x, h * tile, BlockKind::Grass));
        for row in h + 1..=h + world.dirt_depth {
            blocks.push(Block::new(block_x, row * tile, BlockKind::Dirt));
        }
        for row in h + world.dirt_depth + 1..rows {
            blocks.push(Block::new(block_x, row * tile, BlockKind::Stone));
        }

        // rolled for every column so the sequence doesn't depend on eligibility
        let roll = rng.random_bool(world.tree_chance);
        if roll && i > 2 && i + 3 < width && is_flat(&heights, i) {
            grow_tree(world, block_x, h, rng, &mut blocks);
        }
    }

    tracing::debug!(
        start_col,
        width,
        blocks = blocks.len(),
        last_height = heights[width],
        "generated terrain strip"
    );

    Strip {
        blocks,
        last_height: heights[width],
    }
}

/// Surface rows for columns `0..=width`; the extra entry seeds the next strip.
fn height_profile(
    world: &WorldConfig,
    width: usize,
    prev_height: Option<i32>,
    rng: &mut impl Rng,
) -> Vec<i32> {
    let base = world.base_height();
    let mut heights = Vec::with_capacity(width + 1);
    heights.push(world.clamp_height(prev_height.unwrap_or(base)));

    for i in 1..=width {
        let prev = heights[i - 1];
        let candidate = world.clamp_height(base + rng.random_range(-1..=1));
        let avg = (candidate + prev).div_euclid(2);
        heights.push(world.clamp_height(avg.clamp(prev - 1, prev + 1)));
    }
    heights
}

fn is_flat(heights: &[i32], i: usize) -> bool {
    (heights[i - 1] - heights[i]).abs() <= 1 && (heights[i + 1] - heights[i]).abs() <= 1
}

fn grow_tree(world: &WorldConfig, x: i32, h: i32, rng: &mut impl Rng, out: &mut Vec<Block>) {
    let tile = world.tile_size;
    let trunk = rng.random_range(world.trunk_min..=world.trunk_max);

    for up in 1..=trunk {
        out.push(Block::new(x, (h - up) * tile, BlockKind::Wood));
    }

    let top = h - trunk;
    let r = world.canopy_radius;
    for lx in -(r - 1)..=(r - 1) {
        for ly in -r..=-1 {
            if lx.abs() + ly.abs() <= r {
                let leaf_x = world.wrap_x(x + lx * tile);
                out.push(Block::new(leaf_x, (top + ly) * tile, BlockKind::Leaves));
            }
        }
    }
}
