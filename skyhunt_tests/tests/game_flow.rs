//! End-to-end game loop scenarios driven by a fake clock.

use approx::assert_abs_diff_eq;
use skyhunt_client::{
    game::{Game, GameEvent, GameState},
    input::{FrameInput, Keys},
};
use skyhunt_shared::{
    config::GameConfig,
    enemy::{Behavior, Enemy, Roster},
    math::Vec3,
    shop::{ShopError, Upgrade},
};
use skyhunt_tests::{init_tracing, Driver};

fn driver() -> Driver {
    init_tracing();
    let cfg = GameConfig {
        seed: Some(99),
        ..GameConfig::default()
    };
    Driver::new(Game::new(cfg), 60)
}

/// `count` weak enemies lined up on the camera's starting line of sight.
fn line_of_sight(count: usize, hp: i32) -> Roster {
    Roster::new(
        (0..count)
            .map(|i| Enemy::new(Vec3::new(0.0, 0.0, -3.0 * (i as f32 + 1.0)), Behavior::Idle, hp))
            .collect(),
    )
}

fn destroyed_count(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
        .count()
}

#[test]
fn clearing_a_wave_pays_out_and_opens_shop() -> anyhow::Result<()> {
    let mut d = driver();
    d.frames(&FrameInput::holding(Keys::W), 5);
    *d.game.roster_mut() = line_of_sight(6, 5);
    d.game.camera_mut().reset_position(Vec3::new(0.0, 0.0, 2.0));

    let out = d.frame(&FrameInput::holding(Keys::SPACE));
    assert_eq!(out.hits, 6);
    assert_eq!(destroyed_count(&out.events), 6);
    assert!(out.events.contains(&GameEvent::EnemyDestroyed {
        remaining: 0,
        reward: 5,
        balance: 30,
    }));
    assert!(out.events.contains(&GameEvent::WaveCleared { wave: 1 }));
    assert_eq!(out.transition, Some(GameState::Shop));

    assert_eq!(d.game.wave(), 2);
    assert_eq!(d.game.wallet().balance(), 30);
    assert_eq!(d.game.camera().position(), Vec3::new(0.0, 0.0, 2.0));

    let frame = d.renderer.last().ok_or_else(|| anyhow::anyhow!("no frame"))?;
    assert_eq!(frame.clear_color, [0.0, 0.0, 1.0]);
    assert!(frame.enemies.is_empty());
    Ok(())
}

#[test]
fn shop_rejects_short_balance() {
    let mut d = driver();
    *d.game.roster_mut() = line_of_sight(1, 5);
    d.frame(&FrameInput::holding(Keys::SPACE));
    assert_eq!(d.game.state(), GameState::Shop);

    let out = d.frame(&FrameInput::pressing(Keys::ONE));
    assert_eq!(
        out.events,
        vec![GameEvent::PurchaseFailed(ShopError::InsufficientFunds {
            price: 30,
            balance: 5,
        })]
    );
    assert!(!d.game.owns(Upgrade::Boost));
    assert_eq!(d.game.wallet().balance(), 5);
}

#[test]
fn buy_boost_then_fly_the_next_wave() {
    let mut d = driver();
    *d.game.roster_mut() = line_of_sight(6, 5);
    d.frame(&FrameInput::holding(Keys::SPACE));

    // Holding the key down across frames buys once.
    let out = d.frame(&FrameInput::pressing(Keys::ONE));
    assert_eq!(
        out.events,
        vec![GameEvent::Purchased {
            upgrade: Upgrade::Boost,
            balance: 0,
        }]
    );
    assert!(d.frame(&FrameInput::holding(Keys::ONE)).events.is_empty());
    let again = d.frame(&FrameInput::pressing(Keys::ONE));
    assert_eq!(
        again.events,
        vec![GameEvent::PurchaseFailed(ShopError::AlreadyOwned(Upgrade::Boost))]
    );

    let out = d.frame(&FrameInput::pressing(Keys::Q));
    assert!(out.events.contains(&GameEvent::WaveStarted { wave: 2, enemies: 10 }));
    assert_eq!(d.game.state(), GameState::Gameplay);
    assert_eq!(d.game.roster().len(), 10);

    // Boost triples thrust for the rest of its duration.
    let before = d.game.camera().velocity.forward;
    let out = d.frame(&FrameInput::holding(Keys::F | Keys::W));
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::BoostStarted { .. })));
    assert!(d.game.boost().is_active());
    assert_abs_diff_eq!(d.game.camera().velocity.forward - before, 0.3, epsilon = 1.0e-5);

    d.advance(5.1);
    let out = d.frame(&FrameInput::default());
    assert!(out.events.contains(&GameEvent::BoostEnded));
    assert!(!d.game.boost().is_active());

    let before = d.game.camera().velocity.forward;
    d.frame(&FrameInput::holding(Keys::W));
    assert_abs_diff_eq!(d.game.camera().velocity.forward - before, 0.1, epsilon = 1.0e-5);
}

#[test]
fn shot_removes_only_destroyed_enemies_in_order() {
    let mut d = driver();
    let off_axis = Enemy::new(Vec3::new(6.0, 0.0, -4.0), Behavior::Idle, 5);
    let tough = Enemy::new(Vec3::new(0.0, 0.0, -6.0), Behavior::Idle, 100);
    *d.game.roster_mut() = Roster::new(vec![
        Enemy::new(Vec3::new(0.0, 0.0, -3.0), Behavior::Idle, 5),
        Enemy::new(Vec3::new(0.0, 0.0, -9.0), Behavior::Idle, 5),
        tough,
        off_axis,
    ]);

    let out = d.frame(&FrameInput::holding(Keys::SPACE));
    assert_eq!(out.hits, 3);
    assert_eq!(destroyed_count(&out.events), 2);

    let left: Vec<Vec3> = d.game.roster().iter().map(|e| e.position).collect();
    assert_eq!(left, vec![tough.position, off_axis.position]);
    assert_eq!(d.game.roster().get(0).map(|e| e.hp), Some(95));

    let frame = d.renderer.last().expect("frame");
    assert!(frame.muzzle_flash);
    assert_eq!(frame.enemies.len(), 2);
}

#[test]
fn escape_and_tab_work_in_every_state() {
    let mut d = driver();
    let states: Vec<GameState> = (0..3)
        .map(|_| {
            d.frame(&FrameInput::pressing(Keys::TAB));
            d.game.state()
        })
        .collect();
    assert_eq!(
        states,
        vec![GameState::Shop, GameState::StartMenu, GameState::Gameplay]
    );

    d.frame(&FrameInput::pressing(Keys::TAB));
    assert!(d.frame(&FrameInput::holding(Keys::ESCAPE)).quit);
}
