//! All game entity types — pure data, no logic.
//!
//! Positions and sizes are f32 pixels in the fixed 640×960 world. Every
//! entity is a plain cloneable record owned exclusively by `GameState`.

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in world pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Strict overlap: rectangles that merely touch do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

// ── Status ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Clone, Debug)]
pub struct Bullet {
    pub rect: Rect,
    pub owner: BulletOwner,
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
    pub lives: u32,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub rect: Rect,
}

// ── Pickups & effects ────────────────────────────────────────────────────────

/// Falling score pickup dropped by a destroyed enemy.
#[derive(Clone, Debug)]
pub struct Item {
    pub rect: Rect,
}

/// Short-lived explosion visual: four animation frames over its lifetime,
/// derived from the creation timestamp.
#[derive(Clone, Debug)]
pub struct Explosion {
    pub rect: Rect,
    /// Session time (ms) at which the explosion was created.
    pub spawned_at: u64,
    /// Current animation frame, 0..=3.
    pub frame: u8,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Player and enemy bullets in one list, tagged by owner.
    pub bullets: Vec<Bullet>,
    /// Pickups currently falling through the play area.
    pub items: Vec<Item>,
    /// Explosion visuals currently animating.
    pub explosions: Vec<Explosion>,
    pub score: u32,
    /// Difficulty tier 1..=4, advanced solely by score thresholds.
    pub stage: u32,
    pub status: GameStatus,
    /// Session time (ms) below which the player takes no bullet damage.
    pub invincible_until: u64,
    /// Session time (ms) of the last enemy spawn.
    pub last_enemy_spawn: u64,
    /// Session time (ms) of the last player shot.
    pub last_shot: u64,
    /// Session time (ms) as of the most recent tick.
    pub now: u64,
}
