use pocketcraft::{
    block::BlockKind,
    config::{Config, PhysicsConfig, WorldConfig},
    game::{Game, Input, Intent, Key},
    player::Player,
    surface::PixelBuf,
    terrain,
};
use rand::{SeedableRng, rngs::StdRng};

struct Keys(&'static [Key]);

impl Input for Keys {
    fn key_down(&self, key: Key) -> bool {
        self.0.contains(&key)
    }
}

#[test]
fn strip_block_count_matches_layering() {
    let world = WorldConfig::default();
    for seed in 0..20 {
        let strip = terrain::generate(&world, 0, 20, None, &mut StdRng::seed_from_u64(seed));

        let trees = strip
            .blocks
            .iter()
            .filter(|b| matches!(b.kind, BlockKind::Wood | BlockKind::Leaves))
            .count();
        let columns: usize = strip
            .blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Grass)
            .map(|g| {
                let h = g.y / world.tile_size;
                let stone = (world.rows() - (h + 5)).max(0);
                (1 + 4 + stone) as usize
            })
            .sum();

        assert_eq!(
            strip.blocks.iter().filter(|b| b.kind == BlockKind::Grass).count(),
            20
        );
        assert_eq!(strip.blocks.len(), columns + trees);
        // stock screen: every column is 1 grass + 4 dirt + 3 stone
        assert_eq!(columns, 20 * 8);
        assert!((5..=world.max_height().max(5)).contains(&strip.last_height));
    }
}

#[test]
fn free_fall_never_reaches_terminal_velocity() {
    let mut p = Player::new(&WorldConfig::default(), &PhysicsConfig::default());
    let mut prev_y = p.y;
    let mut prev_step = 0;
    for _ in 0..500 {
        p.apply_gravity(&[]);
        let step = p.y - prev_y;
        assert!(step > prev_step, "fall speed stopped growing at {step}");
        prev_step = step;
        prev_y = p.y;
    }
}

#[test]
fn walk_across_the_wrap_and_back() {
    let config = Config {
        world: WorldConfig {
            tree_chance: 0.0,
            ..WorldConfig::default()
        },
        ..Config::default()
    };
    let mut game = Game::new(config, 7).unwrap();
    let mut buf = PixelBuf::new(320, 222);
    game.draw_all(&mut buf);

    for _ in 0..60 {
        game.tick(&Keys(&[]), &mut buf);
    }
    let rest_y = game.player().y;

    // 320 / 4 steps bring the player back to where it started
    let start_x = game.player().x;
    let mut wrapped = false;
    for _ in 0..80 {
        let before = game.player().x;
        game.tick(&Keys(&[Key::Right]), &mut buf);
        wrapped |= game.player().x < before;
        assert_eq!(game.player().y, rest_y);
    }
    assert!(wrapped);
    // the wrap lands on 0 rather than carrying the overshoot
    assert_ne!(game.player().x, start_x);
}

#[test]
fn left_and_right_cancel_out() {
    let mut game = Game::new(Config::default(), 8).unwrap();
    for _ in 0..60 {
        game.update(Intent::default());
    }
    let x = game.player().x;
    game.update(Intent {
        left: true,
        right: true,
        jump: false,
    });
    assert_eq!(game.player().x, x);
}
