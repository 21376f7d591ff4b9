use rand::Rng;

use crate::surface::{Rect, Rgb, Surface};

/// Version of the tile assets (palette and recipes). The launcher refuses
/// to start when its own version differs.
pub const ASSETS_VERSION: &str = "1.0.0";

// ── Colors ──────────────────────────────────────────────────────────────────

pub const SKY: Rgb = Rgb(135, 206, 235);
pub const GRASS_TOP: Rgb = Rgb(34, 139, 34);
pub const DIRT: Rgb = Rgb(139, 69, 19);
pub const DIRT_DARK: Rgb = Rgb(120, 60, 16);
pub const WOOD: Rgb = Rgb(160, 82, 45);
pub const WOOD_DARK: Rgb = Rgb(140, 70, 35);
pub const LEAVES: Rgb = Rgb(34, 139, 34);
pub const LEAVES_DARK: Rgb = Rgb(25, 110, 25);
pub const STONE: Rgb = Rgb(128, 128, 128);
pub const STONE_DARK: Rgb = Rgb(100, 100, 100);

const SPECKLE: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Grass,
    Dirt,
    Stone,
    Wood,
    Leaves,
}

impl BlockKind {
    /// Solid kinds take part in collision; wood and leaves are scenery.
    pub fn is_solid(self) -> bool {
        matches!(self, BlockKind::Grass | BlockKind::Dirt | BlockKind::Stone)
    }
}

/// One terrain tile. Positions are pixel coordinates of the top-left
/// corner; terrain generation keeps them on tile multiples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub x: i32,
    pub y: i32,
    pub kind: BlockKind,
    solid: bool,
}

impl Block {
    pub fn new(x: i32, y: i32, kind: BlockKind) -> Self {
        Self {
            x,
            y,
            kind,
            solid: kind.is_solid(),
        }
    }

    pub fn solid(&self) -> bool {
        self.solid
    }

    pub fn bounds(&self, tile: i32) -> Rect {
        Rect::new(self.x, self.y, tile, tile)
    }

    /// Paint the tile. Speckle positions come from `rng` on every call, so
    /// redrawing the same block gives a slightly different texture.
    pub fn draw(&self, s: &mut impl Surface, tile: i32, rng: &mut impl Rng) {
        let (x, y) = (self.x, self.y);
        let area = self.bounds(tile);
        match self.kind {
            BlockKind::Grass => {
                s.fill_rect(x, y, tile, tile, DIRT);
                s.fill_rect(x, y, tile, tile / 4, GRASS_TOP);
                speckle(s, area, tile / 4, 3, DIRT_DARK, rng);
            }
            BlockKind::Dirt => {
                s.fill_rect(x, y, tile, tile, DIRT);
                speckle(s, area, 0, 4, DIRT_DARK, rng);
            }
            BlockKind::Stone => {
                s.fill_rect(x, y, tile, tile, STONE);
                speckle(s, area, 0, 3, STONE_DARK, rng);
            }
            BlockKind::Wood => {
                s.fill_rect(x, y, tile, tile, WOOD);
                s.fill_rect(x + tile / 4, y, tile / 2, tile, WOOD_DARK);
            }
            BlockKind::Leaves => {
                s.fill_rect(x, y, tile, tile, LEAVES);
                speckle(s, area, 0, 3, LEAVES_DARK, rng);
            }
        }
    }
}

/// Scatter `count` small squares inside `area`, starting no higher than
/// `min_dy` below its top.
fn speckle(s: &mut impl Surface, area: Rect, min_dy: i32, count: usize, c: Rgb, rng: &mut impl Rng) {
    let max_dx = (area.w - SPECKLE).max(0);
    let max_dy = (area.h - SPECKLE).max(0);
    let min_dy = min_dy.min(max_dy);
    for _ in 0..count {
        let dx = rng.random_range(0..=max_dx);
        let dy = rng.random_range(min_dy..=max_dy);
        s.fill_rect(area.x + dx, area.y + dy, SPECKLE, SPECKLE, c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelBuf;
    use rand::{SeedableRng, rngs::StdRng};

    /// Records every fill so recipes can be checked call by call.
    #[derive(Default)]
    struct Recorder {
        fills: Vec<(i32, i32, i32, i32, Rgb)>,
    }

    impl Surface for Recorder {
        fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
            self.fills.push((x, y, w, h, c));
        }
        fn draw_string(&mut self, _text: &str, _x: i32, _y: i32) {}
    }

    #[test]
    fn solidity_follows_kind() {
        assert!(Block::new(0, 0, BlockKind::Grass).solid());
        assert!(Block::new(0, 0, BlockKind::Dirt).solid());
        assert!(Block::new(0, 0, BlockKind::Stone).solid());
        assert!(!Block::new(0, 0, BlockKind::Wood).solid());
        assert!(!Block::new(0, 0, BlockKind::Leaves).solid());
    }

    #[test]
    fn grass_recipe() {
        let mut rec = Recorder::default();
        let mut rng = StdRng::seed_from_u64(1);
        Block::new(32, 48, BlockKind::Grass).draw(&mut rec, 16, &mut rng);

        assert_eq!(rec.fills.len(), 5);
        assert_eq!(rec.fills[0], (32, 48, 16, 16, DIRT));
        assert_eq!(rec.fills[1], (32, 48, 16, 4, GRASS_TOP));
        for &(x, y, w, h, c) in &rec.fills[2..] {
            assert_eq!((w, h, c), (4, 4, DIRT_DARK));
            assert!((32..=44).contains(&x));
            // speckles stay below the grass band
            assert!((52..=60).contains(&y));
        }
    }

    #[test]
    fn speckle_counts_per_kind() {
        let mut rng = StdRng::seed_from_u64(2);
        for (kind, fills) in [
            (BlockKind::Dirt, 5),
            (BlockKind::Stone, 4),
            (BlockKind::Wood, 2),
            (BlockKind::Leaves, 4),
        ] {
            let mut rec = Recorder::default();
            Block::new(0, 0, kind).draw(&mut rec, 16, &mut rng);
            assert_eq!(rec.fills.len(), fills, "{kind:?}");
        }
    }

    #[test]
    fn wood_stripe_covers_middle_half() {
        let mut buf = PixelBuf::new(16, 16);
        let mut rng = StdRng::seed_from_u64(3);
        Block::new(0, 0, BlockKind::Wood).draw(&mut buf, 16, &mut rng);
        assert_eq!(buf.get(3, 8), WOOD);
        assert_eq!(buf.get(4, 8), WOOD_DARK);
        assert_eq!(buf.get(11, 8), WOOD_DARK);
        assert_eq!(buf.get(12, 8), WOOD);
    }

    #[test]
    fn speckles_stay_inside_tile() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let mut rec = Recorder::default();
            Block::new(64, 32, BlockKind::Dirt).draw(&mut rec, 16, &mut rng);
            for &(x, y, w, h, _) in &rec.fills[1..] {
                assert!(x >= 64 && x + w <= 80, "x {x}");
                assert!(y >= 32 && y + h <= 48, "y {y}");
            }
        }
    }

    #[test]
    fn redraws_vary_speckles() {
        let block = Block::new(0, 0, BlockKind::Stone);
        let mut rng = StdRng::seed_from_u64(4);
        let draws: Vec<_> = (0..8)
            .map(|_| {
                let mut rec = Recorder::default();
                block.draw(&mut rec, 16, &mut rng);
                rec.fills
            })
            .collect();
        assert!(draws.windows(2).any(|w| w[0] != w[1]));
    }
}
