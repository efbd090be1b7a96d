use starfall::compute::{init_state, EXPLOSION_SIZE, ITEM_SIZE};
use starfall::display::{render, Theme};
use starfall::entities::*;

/// Render into a byte buffer; the output is a terminal command stream, but
/// the literal HUD/overlay text must appear in it.
fn render_to_string(state: &GameState, theme: &Theme) -> String {
    let mut buf: Vec<u8> = Vec::new();
    render(&mut buf, state, theme, 80, 24).expect("render into a Vec cannot fail");
    String::from_utf8_lossy(&buf).into_owned()
}

fn busy_state() -> GameState {
    let mut s = init_state();
    s.enemies.push(Enemy {
        rect: Rect::new(300.0, 100.0, 30.0, 30.0),
    });
    s.bullets.push(Bullet {
        rect: Rect::new(316.0, 400.0, 8.0, 15.0),
        owner: BulletOwner::Player,
    });
    s.bullets.push(Bullet {
        rect: Rect::new(200.0, 300.0, 8.0, 15.0),
        owner: BulletOwner::Enemy,
    });
    s.items.push(Item {
        rect: Rect::new(400.0, 500.0, ITEM_SIZE, ITEM_SIZE),
    });
    s.explosions.push(Explosion {
        rect: Rect::new(100.0, 200.0, EXPLOSION_SIZE, EXPLOSION_SIZE),
        spawned_at: 0,
        frame: 2,
    });
    s.score = 1250;
    s.stage = 2;
    s
}

#[test]
fn render_draws_hud() {
    let out = render_to_string(&busy_state(), &Theme::unicode());
    assert!(out.contains("Score:"));
    assert!(out.contains("1250"));
    assert!(out.contains("Stage: 2"));
    assert!(out.contains("Lives:"));
}

#[test]
fn render_draws_player_sprite() {
    let out = render_to_string(&init_state(), &Theme::unicode());
    assert!(out.contains('▲'));
}

#[test]
fn render_hides_player_on_blink_frames() {
    let mut s = init_state();
    s.invincible_until = 5000;

    // Odd 100 ms slice → hidden
    s.now = 4100;
    let hidden = render_to_string(&s, &Theme::unicode());
    assert!(!hidden.contains('▲'));

    // Even slice → visible
    s.now = 4200;
    let visible = render_to_string(&s, &Theme::unicode());
    assert!(visible.contains('▲'));
}

#[test]
fn render_game_over_overlay() {
    let mut s = busy_state();
    s.status = GameStatus::GameOver;
    let out = render_to_string(&s, &Theme::unicode());
    assert!(out.contains("G A M E   O V E R"));
    assert!(out.contains("Final Score: 1250"));
    assert!(out.contains("SPACE - Restart"));
}

#[test]
fn ascii_theme_uses_no_wide_glyphs() {
    let out = render_to_string(&busy_state(), &Theme::ascii());
    assert!(out.is_ascii());
}
