//! Level layout table
//!
//! Each level is a declarative [`LevelLayout`]: ground size, static boxes,
//! patrolling movers and pickups. The ten shipped levels are produced by the
//! builders in [`LEVELS`], looked up by id; unknown ids fall back to level 1.
//! Layouts are plain serde data, so custom levels can be loaded from JSON.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::{LEVEL_TIME, MOVER_RADIUS, MOVER_SPEED, WALL_HEIGHT, WALL_THICKNESS};

/// Pickup shapes (purely cosmetic, both score one point)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Triangle,
    Cylinder,
}

/// A static box: wall segment or obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxPlacement {
    pub center: Vec2,
    /// Full width (x) and depth (z)
    pub size: Vec2,
    /// Render height only, collisions are planar
    pub height: f32,
}

impl BoxPlacement {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_size(self.center, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectiblePlacement {
    pub kind: CollectibleKind,
    pub pos: Vec2,
}

fn default_mover_speed() -> f32 {
    MOVER_SPEED
}

fn default_mover_radius() -> f32 {
    MOVER_RADIUS
}

/// A patrolling obstacle, starting at the first waypoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoverPlacement {
    pub path: Vec<Vec2>,
    #[serde(default = "default_mover_speed")]
    pub speed: f32,
    #[serde(default = "default_mover_radius")]
    pub radius: f32,
    /// Wait at each end of the path
    #[serde(default)]
    pub pause: f32,
}

/// Everything needed to instantiate a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub id: u32,
    pub name: String,
    /// Ground width (x) and depth (z), centered on the origin
    pub ground: Vec2,
    #[serde(default)]
    pub spawn: Vec2,
    #[serde(default = "default_time_limit")]
    pub time_limit: f32,
    #[serde(default)]
    pub blocks: Vec<BoxPlacement>,
    #[serde(default)]
    pub movers: Vec<MoverPlacement>,
    #[serde(default)]
    pub collectibles: Vec<CollectiblePlacement>,
}

fn default_time_limit() -> f32 {
    LEVEL_TIME
}

impl LevelLayout {
    pub fn new(id: u32, name: &str, width: f32, depth: f32) -> Self {
        Self {
            id,
            name: name.to_string(),
            ground: Vec2::new(width, depth),
            spawn: Vec2::ZERO,
            time_limit: LEVEL_TIME,
            blocks: Vec::new(),
            movers: Vec::new(),
            collectibles: Vec::new(),
        }
    }

    /// Parse a custom layout
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Four boundary walls hugging the ground edges
    pub fn walls(&self) -> [BoxPlacement; 4] {
        let (w, d) = (self.ground.x, self.ground.y);
        let t = WALL_THICKNESS;
        let wall = |x: f32, z: f32, sx: f32, sz: f32| BoxPlacement {
            center: Vec2::new(x, z),
            size: Vec2::new(sx, sz),
            height: WALL_HEIGHT,
        };
        [
            wall(0.0, d / 2.0 + t / 2.0, w + t, t),
            wall(0.0, -d / 2.0 - t / 2.0, w + t, t),
            wall(w / 2.0 + t / 2.0, 0.0, t, d + t),
            wall(-w / 2.0 - t / 2.0, 0.0, t, d + t),
        ]
    }

    pub fn spawn_at(mut self, x: f32, z: f32) -> Self {
        self.spawn = Vec2::new(x, z);
        self
    }

    fn block(&mut self, x: f32, z: f32, width: f32, height: f32, depth: f32) {
        self.blocks.push(BoxPlacement {
            center: Vec2::new(x, z),
            size: Vec2::new(width, depth),
            height,
        });
    }

    fn pickup(&mut self, kind: CollectibleKind, x: f32, z: f32) {
        self.collectibles.push(CollectiblePlacement {
            kind,
            pos: Vec2::new(x, z),
        });
    }

    fn triangle(&mut self, x: f32, z: f32) {
        self.pickup(CollectibleKind::Triangle, x, z);
    }

    fn cylinder(&mut self, x: f32, z: f32) {
        self.pickup(CollectibleKind::Cylinder, x, z);
    }

    /// Alternate triangle/cylinder by index
    fn alternating(&mut self, i: usize, x: f32, z: f32) {
        if i % 2 == 0 {
            self.triangle(x, z);
        } else {
            self.cylinder(x, z);
        }
    }

    fn mover(&mut self, path: &[(f32, f32)]) {
        self.movers.push(MoverPlacement {
            path: path.iter().map(|&(x, z)| Vec2::new(x, z)).collect(),
            speed: MOVER_SPEED,
            radius: MOVER_RADIUS,
            pause: 0.0,
        });
    }
}

/// One row of the level table
pub struct LevelEntry {
    pub id: u32,
    pub name: &'static str,
    build: fn(LevelLayout) -> LevelLayout,
    ground: (f32, f32),
}

impl LevelEntry {
    pub fn layout(&self) -> LevelLayout {
        (self.build)(LevelLayout::new(
            self.id,
            self.name,
            self.ground.0,
            self.ground.1,
        ))
    }
}

pub const LEVEL_COUNT: u32 = 10;

/// The shipped levels, in menu order
pub static LEVELS: [LevelEntry; LEVEL_COUNT as usize] = [
    LevelEntry { id: 1, name: "Tutorial", ground: (20.0, 20.0), build: tutorial },
    LevelEntry { id: 2, name: "Speed Course", ground: (25.0, 25.0), build: speed_course },
    LevelEntry { id: 3, name: "Narrow Paths", ground: (30.0, 30.0), build: narrow_paths },
    LevelEntry { id: 4, name: "The Maze", ground: (35.0, 35.0), build: cross },
    LevelEntry { id: 5, name: "Moving Obstacles", ground: (40.0, 30.0), build: spiral },
    LevelEntry { id: 6, name: "Elevation", ground: (45.0, 35.0), build: scattered },
    LevelEntry { id: 7, name: "Time Crunch", ground: (50.0, 50.0), build: maze },
    LevelEntry { id: 8, name: "Spiral Challenge", ground: (55.0, 40.0), build: grid },
    LevelEntry { id: 9, name: "The Gauntlet", ground: (60.0, 45.0), build: gauntlet },
    LevelEntry { id: 10, name: "Final Boss", ground: (70.0, 50.0), build: final_boss },
];

/// Table entry for `id`, falling back to the first level
pub fn entry(id: u32) -> &'static LevelEntry {
    LEVELS.iter().find(|e| e.id == id).unwrap_or_else(|| {
        log::warn!("Unknown level {}, falling back to level 1", id);
        &LEVELS[0]
    })
}

/// Layout for `id`, falling back to the first level
pub fn layout(id: u32) -> LevelLayout {
    entry(id).layout()
}

fn tutorial(mut l: LevelLayout) -> LevelLayout {
    l.triangle(-5.0, -5.0);
    l.cylinder(5.0, -5.0);
    l.triangle(-5.0, 5.0);
    l.cylinder(5.0, 5.0);
    l.triangle(0.0, 0.0);
    l
}

fn speed_course(mut l: LevelLayout) -> LevelLayout {
    for i in 0..3 {
        for j in 0..3 {
            if i == 1 && j == 1 {
                continue;
            }
            let x = (i as f32 - 1.0) * 8.0;
            let z = (j as f32 - 1.0) * 8.0;
            l.alternating(i + j, x, z);
        }
    }
    l
}

fn narrow_paths(mut l: LevelLayout) -> LevelLayout {
    for (x, z) in [(-8.0, 0.0), (8.0, 0.0), (0.0, -8.0), (0.0, 8.0)] {
        l.block(x, z, 2.0, 3.0, 2.0);
    }
    l.triangle(-12.0, -12.0);
    l.cylinder(12.0, -12.0);
    l.triangle(-12.0, 12.0);
    l.cylinder(12.0, 12.0);
    l.triangle(0.0, 0.0);
    l.cylinder(-6.0, 0.0);
    l.triangle(6.0, 0.0);
    l
}

fn cross(mut l: LevelLayout) -> LevelLayout {
    for i in -2..=2 {
        if i != 0 {
            let offset = i as f32 * 4.0;
            l.block(offset, 0.0, 1.5, 4.0, 1.5);
            l.block(0.0, offset, 1.5, 4.0, 1.5);
        }
    }
    for (i, (x, z)) in [
        (-15.0, -15.0),
        (15.0, -15.0),
        (-15.0, 15.0),
        (15.0, 15.0),
        (-2.0, -2.0),
        (2.0, -2.0),
        (-2.0, 2.0),
        (2.0, 2.0),
    ]
    .into_iter()
    .enumerate()
    {
        l.alternating(i, x, z);
    }
    l
}

fn spiral(mut l: LevelLayout) -> LevelLayout {
    const SPIRAL: [(f32, f32); 11] = [
        (3.0, 0.0),
        (3.0, 3.0),
        (-3.0, 3.0),
        (-3.0, -3.0),
        (6.0, -3.0),
        (6.0, 6.0),
        (-6.0, 6.0),
        (-6.0, -6.0),
        (9.0, -6.0),
        (9.0, 9.0),
        (-9.0, 9.0),
    ];
    for (x, z) in SPIRAL {
        l.block(x, z, 1.0, 2.0, 1.0);
    }
    for (i, (x, z)) in [
        (-18.0, -12.0),
        (18.0, -12.0),
        (-18.0, 12.0),
        (18.0, 12.0),
        (1.5, 1.5),
        (-1.5, -1.5),
        (4.5, -1.5),
        (-4.5, 4.5),
        (7.5, 1.5),
    ]
    .into_iter()
    .enumerate()
    {
        l.alternating(i, x, z);
    }
    l
}

/// Seed for the scattered pickups; fixed so the level is the same every load
const SCATTER_SEED: u64 = 0x5ca7_7e6d;
const SCATTER_COUNT: usize = 12;
const SCATTER_ATTEMPTS: usize = 50;

fn scattered(mut l: LevelLayout) -> LevelLayout {
    const OBSTACLES: [(f32, f32); 14] = [
        (-15.0, -10.0),
        (-8.0, -12.0),
        (0.0, -8.0),
        (8.0, -10.0),
        (15.0, -5.0),
        (-12.0, 0.0),
        (-4.0, 2.0),
        (4.0, -2.0),
        (12.0, 3.0),
        (-18.0, 8.0),
        (-6.0, 10.0),
        (2.0, 12.0),
        (10.0, 8.0),
        (18.0, 12.0),
    ];
    for (x, z) in OBSTACLES {
        l.block(x, z, 1.5, 3.0, 1.5);
    }

    let mut rng = Pcg32::seed_from_u64(SCATTER_SEED);
    for i in 0..SCATTER_COUNT {
        let spot = (0..SCATTER_ATTEMPTS).find_map(|_| {
            let x = (rng.random::<f32>() - 0.5) * 40.0;
            let z = (rng.random::<f32>() - 0.5) * 30.0;
            let p = Vec2::new(x, z);
            let clear_of_obstacles = OBSTACLES
                .iter()
                .all(|&(ox, oz)| p.distance(Vec2::new(ox, oz)) >= 3.0);
            let clear_of_spawn = p.distance(l.spawn) >= 2.0;
            (clear_of_obstacles && clear_of_spawn).then_some(p)
        });
        if let Some(p) = spot {
            l.alternating(i, p.x, p.y);
        }
    }
    l
}

fn maze(l: LevelLayout) -> LevelLayout {
    const WALLS: [(f32, f32, f32, f32); 13] = [
        (-20.0, 0.0, 1.0, 40.0),
        (20.0, 0.0, 1.0, 40.0),
        (0.0, -20.0, 40.0, 1.0),
        (0.0, 20.0, 40.0, 1.0),
        (-15.0, -10.0, 1.0, 20.0),
        (-10.0, 5.0, 20.0, 1.0),
        (0.0, -15.0, 1.0, 10.0),
        (10.0, -5.0, 1.0, 20.0),
        (5.0, 10.0, 10.0, 1.0),
        (-5.0, 0.0, 10.0, 1.0),
        (15.0, 10.0, 1.0, 10.0),
        (-8.0, -8.0, 6.0, 1.0),
        (2.0, 3.0, 1.0, 6.0),
    ];
    // The origin sits on the (-5, 0) wall edge
    let mut l = l.spawn_at(0.0, -2.0);
    for (x, z, w, d) in WALLS {
        l.block(x, z, w, 3.0, d);
    }
    for (i, (x, z)) in [
        (-18.0, -18.0),
        (18.0, -18.0),
        (-18.0, 18.0),
        (18.0, 18.0),
        (-13.0, -5.0),
        (3.0, -12.0),
        (8.0, 8.0),
        (-3.0, 8.0),
        (13.0, -2.0),
        (-8.0, 15.0),
    ]
    .into_iter()
    .enumerate()
    {
        l.alternating(i, x, z);
    }
    l
}

fn grid(mut l: LevelLayout) -> LevelLayout {
    for i in -6i32..=6 {
        for j in -4i32..=4 {
            if (i + j) % 3 == 0 && i.abs() + j.abs() > 2 {
                l.block(i as f32 * 4.0, j as f32 * 4.0, 1.5, 4.0, 1.5);
            }
        }
    }
    for (i, (x, z)) in [
        (-25.0, -18.0),
        (25.0, -18.0),
        (-25.0, 18.0),
        (25.0, 18.0),
        (-2.0, -2.0),
        (2.0, 2.0),
        (-10.0, 6.0),
        (10.0, -6.0),
        (6.0, 10.0),
        (-6.0, -10.0),
        (14.0, 2.0),
        (-14.0, -2.0),
    ]
    .into_iter()
    .enumerate()
    {
        l.alternating(i, x, z);
    }
    l
}

fn gauntlet(mut l: LevelLayout) -> LevelLayout {
    for (x, z) in [(-20.0, 0.0), (20.0, 0.0), (0.0, -15.0), (0.0, 15.0)] {
        l.block(x, z, 2.0, 3.0, 2.0);
    }
    l.mover(&[(-10.0, -10.0), (10.0, -10.0), (10.0, 10.0), (-10.0, 10.0)]);
    l.mover(&[(15.0, -5.0), (15.0, 5.0), (25.0, 5.0), (25.0, -5.0)]);
    l.mover(&[(-15.0, 8.0), (-25.0, 8.0), (-25.0, 18.0), (-15.0, 18.0)]);

    for (i, (x, z)) in [
        (-28.0, -20.0),
        (28.0, -20.0),
        (-28.0, 20.0),
        (28.0, 20.0),
        (0.0, 0.0),
        (-5.0, -20.0),
        (5.0, 20.0),
        (-25.0, 0.0),
        (25.0, -10.0),
        (0.0, -8.0),
        (12.0, 12.0),
        (-12.0, -12.0),
    ]
    .into_iter()
    .enumerate()
    {
        l.alternating(i, x, z);
    }
    l
}

fn final_boss(l: LevelLayout) -> LevelLayout {
    const WALLS: [(f32, f32, f32, f32); 9] = [
        (-30.0, 0.0, 1.0, 30.0),
        (30.0, 0.0, 1.0, 30.0),
        (-15.0, -20.0, 30.0, 1.0),
        (15.0, 20.0, 30.0, 1.0),
        (0.0, -10.0, 1.0, 20.0),
        (-20.0, 10.0, 20.0, 1.0),
        (20.0, -10.0, 20.0, 1.0),
        (-10.0, 0.0, 1.0, 20.0),
        (10.0, 5.0, 1.0, 10.0),
    ];
    // The origin sits on the (0, -10) wall edge
    let mut l = l.spawn_at(0.0, 3.0);
    for (x, z, w, d) in WALLS {
        l.block(x, z, w, 4.0, d);
    }
    l.mover(&[(-25.0, -15.0), (-5.0, -15.0), (-5.0, 5.0), (-25.0, 5.0)]);
    l.mover(&[(25.0, 15.0), (5.0, 15.0), (5.0, -5.0), (25.0, -5.0)]);
    l.mover(&[(0.0, -20.0), (-15.0, -20.0), (-15.0, -5.0), (0.0, -5.0)]);

    const PICKUPS: [(f32, f32, CollectibleKind); 15] = [
        (-32.0, -22.0, CollectibleKind::Triangle),
        (32.0, -22.0, CollectibleKind::Cylinder),
        (-32.0, 22.0, CollectibleKind::Triangle),
        (32.0, 22.0, CollectibleKind::Cylinder),
        (-25.0, -8.0, CollectibleKind::Cylinder),
        (25.0, 8.0, CollectibleKind::Triangle),
        (-8.0, -18.0, CollectibleKind::Triangle),
        (8.0, 18.0, CollectibleKind::Cylinder),
        (-18.0, 2.0, CollectibleKind::Triangle),
        (18.0, -2.0, CollectibleKind::Cylinder),
        (-2.0, 12.0, CollectibleKind::Triangle),
        (2.0, -12.0, CollectibleKind::Cylinder),
        (-12.0, -12.0, CollectibleKind::Triangle),
        (12.0, 12.0, CollectibleKind::Cylinder),
        (28.0, 0.0, CollectibleKind::Triangle),
    ];
    for (x, z, kind) in PICKUPS {
        l.pickup(kind, x, z);
    }
    l
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_RADIUS;

    #[test]
    fn test_table_ids_are_sequential() {
        for (i, entry) in LEVELS.iter().enumerate() {
            assert_eq!(entry.id, i as u32 + 1);
        }
        assert_eq!(LEVEL_COUNT, 10);
    }

    #[test]
    fn test_unknown_level_falls_back_to_first() {
        assert_eq!(layout(0).id, 1);
        assert_eq!(layout(99).name, "Tutorial");
    }

    #[test]
    fn test_collectible_counts() {
        let counts: Vec<usize> = LEVELS.iter().map(|e| e.layout().collectibles.len()).collect();
        assert_eq!(counts[0], 5);
        assert_eq!(counts[1], 8);
        assert_eq!(counts[2], 7);
        assert_eq!(counts[3], 8);
        assert_eq!(counts[4], 9);
        assert!(counts[5] > 0 && counts[5] <= SCATTER_COUNT);
        assert_eq!(counts[6], 10);
        assert_eq!(counts[7], 12);
        assert_eq!(counts[8], 12);
        assert_eq!(counts[9], 15);
    }

    #[test]
    fn test_scattered_level_is_deterministic() {
        assert_eq!(layout(6), layout(6));
    }

    #[test]
    fn test_spawn_is_clear_of_static_geometry() {
        for entry in &LEVELS {
            let l = entry.layout();
            let blocked = l
                .walls()
                .iter()
                .chain(l.blocks.iter())
                .any(|b| b.aabb().overlaps_disc(l.spawn, PLAYER_RADIUS));
            assert!(!blocked, "level {} spawns inside geometry", entry.id);
        }
    }

    #[test]
    fn test_walls_enclose_ground() {
        let l = layout(1);
        let walls = l.walls();
        assert!(walls[0].aabb().overlaps_disc(Vec2::new(0.0, 10.2), PLAYER_RADIUS));
        assert!(walls[3].aabb().overlaps_disc(Vec2::new(-10.2, 0.0), PLAYER_RADIUS));
        assert!(!walls[2].aabb().overlaps_disc(Vec2::new(9.4, 0.0), PLAYER_RADIUS));
    }

    #[test]
    fn test_json_layout_defaults() {
        let json = r#"{
            "id": 42,
            "name": "Custom",
            "ground": [10.0, 10.0],
            "movers": [{ "path": [[0.0, 3.0], [4.0, 3.0]] }],
            "collectibles": [{ "kind": "Cylinder", "pos": [2.0, 2.0] }]
        }"#;
        let l = LevelLayout::from_json(json).unwrap();
        assert_eq!(l.time_limit, LEVEL_TIME);
        assert_eq!(l.spawn, Vec2::ZERO);
        assert!(l.blocks.is_empty());
        assert_eq!(l.movers[0].speed, MOVER_SPEED);
        assert_eq!(l.movers[0].radius, MOVER_RADIUS);
        assert_eq!(l.collectibles[0].kind, CollectibleKind::Cylinder);

        let back = LevelLayout::from_json(&l.to_json().unwrap()).unwrap();
        assert_eq!(back, l);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(LevelLayout::from_json("{\"id\": 1}").is_err());
    }
}
