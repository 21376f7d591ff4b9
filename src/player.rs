use crate::block::Block;
use crate::config::{PhysicsConfig, WorldConfig};
use crate::surface::{Rect, Rgb, Surface};

const BODY: Rgb = Rgb(0, 0, 255);
const HEAD: Rgb = Rgb(255, 200, 150);
const EYE: Rgb = Rgb(0, 0, 0);

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    width: i32,
    height: i32,
    pub vel_y: i32,
    pub speed: i32,
    pub jumping: bool,
    gravity: i32,
    jump_force: i32,
    tile: i32,
    screen_width: i32,
}

impl Player {
    /// Spawn at the top of the screen, horizontally centred.
    pub fn new(world: &WorldConfig, physics: &PhysicsConfig) -> Self {
        Self::at(world.screen_width / 2, 0, world, physics)
    }

    pub fn at(x: i32, y: i32, world: &WorldConfig, physics: &PhysicsConfig) -> Self {
        Self {
            x,
            y,
            width: world.tile_size - 2,
            height: world.tile_size * 2,
            vel_y: 0,
            speed: physics.speed,
            jumping: false,
            gravity: physics.gravity,
            jump_force: physics.jump_force,
            tile: world.tile_size,
            screen_width: world.screen_width,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        self.bounds_at(self.x, self.y)
    }

    fn bounds_at(&self, x: i32, y: i32) -> Rect {
        Rect::new(x, y, self.width, self.height)
    }

    fn hits_solid(&self, x: i32, y: i32, blocks: &[Block]) -> bool {
        let candidate = self.bounds_at(x, y);
        blocks
            .iter()
            .any(|b| b.solid() && candidate.overlaps(&b.bounds(self.tile)))
    }

    /// Shift horizontally by `dx`, wrapping at the screen edges. The move is
    /// dropped entirely if the new box would overlap a solid block.
    pub fn move_by(&mut self, dx: i32, blocks: &[Block]) {
        let mut new_x = self.x + dx;
        if new_x < 0 {
            new_x = self.screen_width - self.width;
        } else if new_x + self.width > self.screen_width {
            new_x = 0;
        }

        if !self.hits_solid(new_x, self.y, blocks) {
            self.x = new_x;
        }
    }

    /// Accelerate downward and resolve against solid blocks.
    ///
    /// Every overlapping block snaps the candidate position, so with several
    /// contacts in one frame the last one in `blocks` order decides where the
    /// player ends up.
    pub fn apply_gravity(&mut self, blocks: &[Block]) {
        self.vel_y += self.gravity;
        let falling = self.vel_y > 0;
        let rising = self.vel_y < 0;
        let mut new_y = self.y + self.vel_y;
        let mut hit = false;

        for block in blocks.iter().filter(|b| b.solid()) {
            if !self.bounds_at(self.x, new_y).overlaps(&block.bounds(self.tile)) {
                continue;
            }
            if falling {
                new_y = block.y - self.height;
                self.jumping = false;
                hit = true;
            } else if rising {
                new_y = block.y + self.tile;
                hit = true;
            }
        }

        if hit {
            self.vel_y = 0;
        }
        self.y = new_y;
    }

    /// Start a jump unless one is already in progress.
    pub fn jump(&mut self) {
        if !self.jumping {
            self.vel_y = self.jump_force;
            self.jumping = true;
        }
    }

    pub fn draw(&self, s: &mut impl Surface) {
        let (x, y, w, h) = (self.x, self.y, self.width, self.height);
        // Body
        s.fill_rect(x, y + h / 2, w, h / 2, BODY);
        // Head
        s.fill_rect(x + 2, y, w - 4, h / 2, HEAD);
        // Eyes
        s.fill_rect(x + 4, y + 6, 2, 2, EYE);
        s.fill_rect(x + w - 6, y + 6, 2, 2, EYE);
    }
}
