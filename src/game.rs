use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::block::{ASSETS_VERSION, Block, SKY};
use crate::config::{Config, ConfigError};
use crate::player::Player;
use crate::surface::{Rect, Rgb, Surface};
use crate::terrain;

pub const LAUNCHER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
}

/// Instantaneous key state from the host.
pub trait Input {
    fn key_down(&self, key: Key) -> bool;
}

/// What the player asked for this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Intent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl Intent {
    pub fn poll(input: &impl Input) -> Self {
        Self {
            left: input.key_down(Key::Left),
            right: input.key_down(Key::Right),
            jump: input.key_down(Key::Up),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StartupError {
    #[error("version mismatch: launcher {launcher}, assets {assets}")]
    VersionMismatch { launcher: String, assets: String },
}

pub fn check_version(launcher: &str, assets: &str) -> Result<(), StartupError> {
    if launcher == assets {
        Ok(())
    } else {
        Err(StartupError::VersionMismatch {
            launcher: launcher.to_string(),
            assets: assets.to_string(),
        })
    }
}

pub fn check_assets() -> Result<(), StartupError> {
    check_version(LAUNCHER_VERSION, ASSETS_VERSION)
}

/// Paint the diagnostic screen shown instead of the game.
pub fn draw_splash(s: &mut impl Surface, err: &StartupError, width: i32, height: i32) {
    let StartupError::VersionMismatch { launcher, assets } = err;
    s.fill_rect(0, 0, width, height, Rgb::WHITE);
    s.draw_string("Version mismatch!", 10, 100);
    s.draw_string(&format!("Launcher: {launcher}"), 10, 120);
    s.draw_string(&format!("Assets: {assets}"), 10, 140);
}

// ── Game ────────────────────────────────────────────────────────────────────

pub struct Game {
    config: Config,
    blocks: Vec<Block>,
    player: Player,
    last_pos: (i32, i32),
    /// Cosmetic randomness for tile speckles, kept apart from terrain.
    paint_rng: StdRng,
    frame: u64,
}

impl Game {
    /// Build a world from `seed`: one screen-width strip of terrain, which
    /// repeats as the player wraps around.
    pub fn new(config: Config, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut terrain_rng = StdRng::seed_from_u64(seed);
        let paint_rng = StdRng::seed_from_u64(terrain_rng.random());
        let world = &config.world;
        let strip = terrain::generate(world, 0, world.columns() as usize, None, &mut terrain_rng);
        let player = Player::new(world, &config.physics);

        tracing::info!(
            seed,
            blocks = strip.blocks.len(),
            last_height = strip.last_height,
            "world generated"
        );

        Ok(Self {
            last_pos: (player.x, player.y),
            blocks: strip.blocks,
            player,
            paint_rng,
            frame: 0,
            config,
        })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// First frame: sky, every block, then the player.
    pub fn draw_all(&mut self, s: &mut impl Surface) {
        let world = &self.config.world;
        s.fill_rect(0, 0, world.screen_width, world.screen_height, SKY);
        for block in &self.blocks {
            block.draw(s, world.tile_size, &mut self.paint_rng);
        }
        self.player.draw(s);
    }

    /// Apply one frame's intent and gravity.
    pub fn update(&mut self, intent: Intent) {
        self.frame += 1;
        let speed = self.player.speed;
        if intent.left {
            self.player.move_by(-speed, &self.blocks);
        }
        if intent.right {
            self.player.move_by(speed, &self.blocks);
        }
        if intent.jump {
            self.player.jump();
        }
        self.player.apply_gravity(&self.blocks);
    }

    /// Repaint only what the player's move disturbed. Returns whether
    /// anything was drawn.
    pub fn redraw(&mut self, s: &mut impl Surface) -> bool {
        let pos = (self.player.x, self.player.y);
        if pos == self.last_pos {
            return false;
        }

        let tile = self.config.world.tile_size;
        let (w, h) = (self.player.width(), self.player.height());
        let vacated = Rect::new(self.last_pos.0, self.last_pos.1, w, h);
        s.fill_rect(vacated.x, vacated.y, w, h, SKY);
        for block in &self.blocks {
            if block.bounds(tile).overlaps(&vacated) {
                block.draw(s, tile, &mut self.paint_rng);
            }
        }
        self.player.draw(s);
        self.last_pos = pos;
        true
    }

    /// One full frame: input, physics, repaint.
    pub fn tick(&mut self, input: &impl Input, s: &mut impl Surface) -> bool {
        self.update(Intent::poll(input));
        self.redraw(s)
    }
}
