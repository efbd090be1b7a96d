//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (plus, where needed, the session clock in milliseconds and an
//! RNG handle) and returns a brand-new `GameState`.  Side effects are limited
//! to the injected RNG, so callers control determinism (tests drive the
//! simulation with seeded or forced generators).

use rand::Rng;

use crate::entities::{
    Bullet, BulletOwner, Enemy, Explosion, GameState, GameStatus, Item, Player, Rect,
};

// ── World constants (pixels / milliseconds) ──────────────────────────────────

pub const WORLD_WIDTH: f32 = 640.0;
pub const WORLD_HEIGHT: f32 = 960.0;

pub const PLAYER_SIZE: f32 = 100.0;
pub const PLAYER_SPEED: f32 = 4.0; // px per frame while a direction is held
/// Vertical gap between the top of the player sprite and the world bottom.
pub const PLAYER_SPAWN_MARGIN: f32 = 150.0;
pub const START_LIVES: u32 = 3;

pub const BULLET_W: f32 = 8.0;
pub const BULLET_H: f32 = 15.0;
pub const PLAYER_BULLET_SPEED: f32 = 6.0;
pub const ENEMY_BULLET_SPEED: f32 = 5.0;
pub const BULLET_COOLDOWN_MS: u64 = 300;

pub const ENEMY_SIZE: f32 = 30.0;
pub const ENEMY_SPAWN_INTERVAL_MS: u64 = 2000;
/// Chance per enemy per frame of firing a bullet.
pub const ENEMY_SHOOT_CHANCE: f64 = 0.01;

pub const ITEM_SIZE: f32 = 25.0;
pub const ITEM_SPEED: f32 = 3.0;
/// Chance that a destroyed enemy drops a pickup.
pub const ITEM_DROP_CHANCE: f64 = 0.1;

pub const EXPLOSION_SIZE: f32 = 50.0;
pub const EXPLOSION_DURATION_MS: u64 = 500;

pub const INVINCIBLE_DURATION_MS: u64 = 2000;

pub const KILL_SCORE: u32 = 100;
pub const ITEM_SCORE: u32 = 50;

// ── Difficulty tables ────────────────────────────────────────────────────────

/// Enemy descent speed rises half a pixel per frame with each stage.
fn enemy_speed(stage: u32) -> f32 {
    2.0 + (stage - 1) as f32 * 0.5
}

/// Stage is a pure function of cumulative score.
pub fn stage_for_score(score: u32) -> u32 {
    if score >= 3000 {
        4
    } else if score >= 2000 {
        3
    } else if score >= 1000 {
        2
    } else {
        1
    }
}

/// Explosion animation frame for a given age: four frames over the lifetime.
fn explosion_frame(elapsed: u64) -> u8 {
    (elapsed / (EXPLOSION_DURATION_MS / 4)).min(3) as u8
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the startup state: player centered near the bottom, all timers at 0.
pub fn init_state() -> GameState {
    GameState {
        player: Player {
            rect: Rect::new(
                (WORLD_WIDTH - PLAYER_SIZE) / 2.0,
                WORLD_HEIGHT - PLAYER_SPAWN_MARGIN,
                PLAYER_SIZE,
                PLAYER_SIZE,
            ),
            lives: START_LIVES,
        },
        enemies: Vec::new(),
        bullets: Vec::new(),
        items: Vec::new(),
        explosions: Vec::new(),
        score: 0,
        stage: 1,
        status: GameStatus::Playing,
        invincible_until: 0,
        last_enemy_spawn: 0,
        last_shot: 0,
        now: 0,
    }
}

/// Restart after game over (or at any time): fresh player, empty entity
/// lists, score/stage/lives back to start.  The session clock and the
/// spawn/shot timestamps carry over, so a restart never grants an instant
/// spawn or free shot.
pub fn reset_game(state: &GameState) -> GameState {
    GameState {
        last_enemy_spawn: state.last_enemy_spawn,
        last_shot: state.last_shot,
        now: state.now,
        ..init_state()
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player_left(state: &GameState) -> GameState {
    let new_x = (state.player.rect.x - PLAYER_SPEED).max(0.0);
    GameState {
        player: Player {
            rect: Rect {
                x: new_x,
                ..state.player.rect
            },
            ..state.player.clone()
        },
        ..state.clone()
    }
}

pub fn move_player_right(state: &GameState) -> GameState {
    let new_x = (state.player.rect.x + PLAYER_SPEED).min(WORLD_WIDTH - PLAYER_SIZE);
    GameState {
        player: Player {
            rect: Rect {
                x: new_x,
                ..state.player.rect
            },
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Fire a bullet from the player's nose.  Fire inputs are edge-triggered by
/// the caller; two presses less than `BULLET_COOLDOWN_MS` apart yield one
/// bullet, presses exactly the cooldown apart yield two.
pub fn player_shoot(state: &GameState, now: u64) -> GameState {
    if now.saturating_sub(state.last_shot) < BULLET_COOLDOWN_MS {
        return state.clone();
    }
    let new_bullet = Bullet {
        rect: Rect::new(
            state.player.rect.center_x() - BULLET_W / 2.0,
            state.player.rect.top(),
            BULLET_W,
            BULLET_H,
        ),
        owner: BulletOwner::Player,
    };
    let mut bullets = state.bullets.clone();
    bullets.push(new_bullet);
    GameState {
        bullets,
        last_shot: now,
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame at session time `now` (ms).
/// A `GameOver` state is frozen: the call is a no-op until `reset_game`.
pub fn tick(state: &GameState, now: u64, rng: &mut impl Rng) -> GameState {
    if state.status == GameStatus::GameOver {
        return state.clone();
    }

    let mut s = state.clone();
    s.now = now;

    // ── 1. Spawn an enemy on the interval ────────────────────────────────────
    if now.saturating_sub(s.last_enemy_spawn) > ENEMY_SPAWN_INTERVAL_MS {
        let x = rng.gen_range(0.0..=(WORLD_WIDTH - ENEMY_SIZE));
        s.enemies.push(Enemy {
            rect: Rect::new(x, -ENEMY_SIZE, ENEMY_SIZE, ENEMY_SIZE),
        });
        s.last_enemy_spawn = now;
    }

    // ── 2. Move bullets, discard those fully off-screen ──────────────────────
    s.bullets = s
        .bullets
        .iter()
        .filter_map(|b| {
            let dy = match b.owner {
                BulletOwner::Player => -PLAYER_BULLET_SPEED,
                BulletOwner::Enemy => ENEMY_BULLET_SPEED,
            };
            let rect = Rect {
                y: b.rect.y + dy,
                ..b.rect
            };
            let gone = match b.owner {
                BulletOwner::Player => rect.bottom() < 0.0,
                BulletOwner::Enemy => rect.top() > WORLD_HEIGHT,
            };
            if gone {
                None
            } else {
                Some(Bullet { rect, ..b.clone() })
            }
        })
        .collect();

    // ── 3. Move enemies down, cull past the bottom, roll their fire chance ───
    let speed = enemy_speed(s.stage);
    let enemies: Vec<Enemy> = s
        .enemies
        .iter()
        .filter_map(|e| {
            let rect = Rect {
                y: e.rect.y + speed,
                ..e.rect
            };
            if rect.top() > WORLD_HEIGHT {
                None
            } else {
                Some(Enemy { rect })
            }
        })
        .collect();
    for enemy in &enemies {
        if rng.gen_bool(ENEMY_SHOOT_CHANCE) {
            s.bullets.push(Bullet {
                rect: Rect::new(
                    enemy.rect.center_x() - BULLET_W / 2.0,
                    enemy.rect.bottom(),
                    BULLET_W,
                    BULLET_H,
                ),
                owner: BulletOwner::Enemy,
            });
        }
    }
    s.enemies = enemies;

    // ── 4. Move items: cull off-screen, collect on player contact ────────────
    let mut score = s.score;
    let player_rect = s.player.rect;
    s.items = s
        .items
        .iter()
        .filter_map(|it| {
            let rect = Rect {
                y: it.rect.y + ITEM_SPEED,
                ..it.rect
            };
            if rect.top() > WORLD_HEIGHT {
                None
            } else if rect.overlaps(&player_rect) {
                score += ITEM_SCORE;
                None
            } else {
                Some(Item { rect })
            }
        })
        .collect();

    // ── 5. Advance explosion animations, expire finished ones ────────────────
    s.explosions = s
        .explosions
        .iter()
        .filter_map(|ex| {
            let elapsed = now.saturating_sub(ex.spawned_at);
            if elapsed > EXPLOSION_DURATION_MS {
                None
            } else {
                Some(Explosion {
                    frame: explosion_frame(elapsed),
                    ..ex.clone()
                })
            }
        })
        .collect();

    // ── 6. Collision: enemy bullets ↔ player ─────────────────────────────────
    // Only the first overlapping bullet counts: at most one life is lost per
    // frame no matter how many bullets overlap simultaneously.  A hit at time
    // T protects the player until exactly T + INVINCIBLE_DURATION_MS.
    let mut lives = s.player.lives;
    let mut invincible_until = s.invincible_until;
    let mut status = s.status;
    if now >= invincible_until {
        if let Some(bi) = s
            .bullets
            .iter()
            .position(|b| b.owner == BulletOwner::Enemy && b.rect.overlaps(&player_rect))
        {
            s.bullets.remove(bi);
            lives = lives.saturating_sub(1);
            invincible_until = now + INVINCIBLE_DURATION_MS;
            if lives == 0 {
                status = GameStatus::GameOver;
            }
        }
    }

    // ── 7. Collision: player bullets ↔ enemies ───────────────────────────────
    let mut killed_enemies: Vec<usize> = Vec::new();
    let mut used_bullets: Vec<usize> = Vec::new();

    for (bi, bullet) in s.bullets.iter().enumerate() {
        if bullet.owner != BulletOwner::Player {
            continue;
        }
        // First overlapping enemy wins; the bullet is spent on it.
        for (ei, enemy) in s.enemies.iter().enumerate() {
            if bullet.rect.overlaps(&enemy.rect) && !killed_enemies.contains(&ei) {
                killed_enemies.push(ei);
                used_bullets.push(bi);
                score += KILL_SCORE;

                let cx = enemy.rect.center_x();
                let cy = enemy.rect.center_y();
                s.explosions.push(Explosion {
                    rect: Rect::new(
                        cx - EXPLOSION_SIZE / 2.0,
                        cy - EXPLOSION_SIZE / 2.0,
                        EXPLOSION_SIZE,
                        EXPLOSION_SIZE,
                    ),
                    spawned_at: now,
                    frame: 0,
                });
                if rng.gen_bool(ITEM_DROP_CHANCE) {
                    s.items.push(Item {
                        rect: Rect::new(cx, cy, ITEM_SIZE, ITEM_SIZE),
                    });
                }
                break;
            }
        }
    }

    s.enemies = s
        .enemies
        .iter()
        .enumerate()
        .filter(|(i, _)| !killed_enemies.contains(i))
        .map(|(_, e)| e.clone())
        .collect();
    s.bullets = s
        .bullets
        .iter()
        .enumerate()
        .filter(|(i, _)| !used_bullets.contains(i))
        .map(|(_, b)| b.clone())
        .collect();

    // ── 8. Commit player/score, recompute stage (never decreases) ────────────
    s.player = Player {
        lives,
        ..s.player.clone()
    };
    s.score = score;
    s.stage = s.stage.max(stage_for_score(score));
    s.invincible_until = invincible_until;
    s.status = status;
    s
}
