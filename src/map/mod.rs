use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::{BLACK, LIGHT_GREEN, RGB};

pub const MAP_WIDTH: i32 = 30;
pub const MAP_HEIGHT: i32 = 15;

#[derive(Clone, Debug)]
pub struct Tile {
    pub glyph: u16,
    pub fg: RGB,
    pub bg: RGB,
    pub is_exit: bool,
}

impl Tile {
    pub fn floor() -> Self {
        Self {
            glyph: b'.' as u16,
            fg: RGB::from_u8(110, 110, 110),
            bg: RGB::named(BLACK),
            is_exit: false,
        }
    }

    pub fn exit() -> Self {
        Self {
            glyph: b'>' as u16,
            fg: RGB::named(LIGHT_GREEN),
            bg: RGB::named(BLACK),
            is_exit: true,
        }
    }
}

/// One level of the dungeon: an open grid with a spawn cell and exactly one
/// exit cell. Movement is blocked only at the grid edges.
#[derive(Clone, Debug)]
pub struct Level {
    pub depth: u32,
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<Tile>,
    pub spawn: Point,
    pub exit: Point,
}

impl Level {
    pub fn with_layout(depth: u32, width: i32, height: i32, spawn: Point, exit: Point) -> Self {
        let size = (width * height) as usize;
        let mut level = Self {
            depth,
            width,
            height,
            tiles: vec![Tile::floor(); size],
            spawn,
            exit,
        };
        if let Some(idx) = level.idx(exit.x, exit.y) {
            level.tiles[idx] = Tile::exit();
        }
        level
    }

    /// Deterministic for a given (depth, run_seed) pair. The exit lands at
    /// least a quarter of the grid perimeter away from the spawn when the
    /// grid allows it.
    pub fn generate(depth: u32, run_seed: u64) -> Self {
        let mut rng = RandomNumberGenerator::seeded(run_seed.wrapping_add(u64::from(depth)));
        let spawn = Point::new(rng.range(0, MAP_WIDTH), rng.range(0, MAP_HEIGHT));

        let min_span = (MAP_WIDTH + MAP_HEIGHT) / 4;
        let mut exit = spawn;
        for attempt in 0..64 {
            let candidate = Point::new(rng.range(0, MAP_WIDTH), rng.range(0, MAP_HEIGHT));
            if candidate == spawn {
                continue;
            }
            let span = (candidate.x - spawn.x).abs() + (candidate.y - spawn.y).abs();
            if span >= min_span || attempt >= 32 {
                exit = candidate;
                break;
            }
        }
        if exit == spawn {
            exit = if spawn.x == 0 {
                Point::new(MAP_WIDTH - 1, spawn.y)
            } else {
                Point::new(0, spawn.y)
            };
        }

        Self::with_layout(depth, MAP_WIDTH, MAP_HEIGHT, spawn, exit)
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(Point::new(x, y)) {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn tile_at(&self, point: Point) -> Option<&Tile> {
        self.idx(point.x, point.y).map(|idx| &self.tiles[idx])
    }

    /// Random cell other than the spawn, for scattering items and traps.
    pub fn random_cell(&self, rng: &mut RandomNumberGenerator) -> Point {
        if self.width * self.height <= 1 {
            return self.spawn;
        }
        loop {
            let point = Point::new(rng.range(0, self.width), rng.range(0, self.height));
            if point != self.spawn {
                return point;
            }
        }
    }
}
