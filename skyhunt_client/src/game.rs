//! Game state machine.
//!
//! The game owns:
//! - The current state (start menu, gameplay, shop)
//! - The camera and the enemy roster of the running wave
//! - The wallet, owned upgrades and the boost timer
//!
//! `Game::update` consumes one frame of input and reports what happened as a
//! `FrameOutcome`; nothing outside the struct is mutated.

use std::collections::HashSet;

use rand::{rngs::StdRng, SeedableRng};
use skyhunt_shared::{
    camera::Camera,
    config::GameConfig,
    enemy::Roster,
    math::Mat4,
    render::RenderBackend,
    shop::{ShopError, Upgrade, Wallet},
};
use tracing::{debug, info, warn};

use crate::{
    clock::FrameTime,
    controls::{apply_flight_keys, apply_mouse_look, Boost},
    input::{FrameInput, Keys},
};

/// Top-level game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    StartMenu,
    Gameplay,
    Shop,
}

impl GameState {
    /// Tab cycles menu -> gameplay -> shop -> menu.
    pub fn next(self) -> Self {
        match self {
            GameState::StartMenu => GameState::Gameplay,
            GameState::Gameplay => GameState::Shop,
            GameState::Shop => GameState::StartMenu,
        }
    }

    pub fn clear_color(self) -> [f32; 3] {
        match self {
            GameState::StartMenu => [1.0, 0.0, 0.0],
            GameState::Gameplay => [0.0, 0.0, 0.0],
            GameState::Shop => [0.0, 0.0, 1.0],
        }
    }
}

/// Notable things that happened during a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    StateChanged { from: GameState, to: GameState },
    WaveStarted { wave: u32, enemies: usize },
    EnemyDestroyed { remaining: usize, reward: u32, balance: u32 },
    WaveCleared { wave: u32 },
    BoostStarted { until: f64 },
    BoostEnded,
    Purchased { upgrade: Upgrade, balance: u32 },
    PurchaseFailed(ShopError),
}

/// Result of one `Game::update`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// New state, if the frame changed it.
    pub transition: Option<GameState>,
    pub events: Vec<GameEvent>,
    /// Enemies struck by this frame's shot.
    pub hits: usize,
    /// The driver should stop the loop.
    pub quit: bool,
}

/// High-level game.
pub struct Game {
    config: GameConfig,
    state: GameState,
    camera: Camera,
    projection: Mat4,
    roster: Roster,
    wallet: Wallet,
    wave: u32,
    upgrades: HashSet<Upgrade>,
    boost: Boost,
    firing: bool,
    rng: StdRng,
}

impl Game {
    /// Creates a game in gameplay with the first wave spawned.
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut game = Self {
            camera: config.camera.build(),
            projection: config.projection.matrix(),
            state: GameState::Gameplay,
            roster: Roster::default(),
            wallet: Wallet::default(),
            wave: 1,
            upgrades: HashSet::new(),
            boost: Boost::default(),
            firing: false,
            rng,
            config,
        };
        game.spawn_wave();
        game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn owns(&self, upgrade: Upgrade) -> bool {
        self.upgrades.contains(&upgrade)
    }

    pub fn boost(&self) -> &Boost {
        &self.boost
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Advances one frame.
    pub fn update(&mut self, input: &FrameInput, time: FrameTime) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();
        self.firing = false;

        if input.close_requested || input.is_held(Keys::ESCAPE) {
            info!("Close requested");
            outcome.quit = true;
            return outcome;
        }

        if input.was_pressed(Keys::TAB) {
            self.set_state(self.state.next(), &mut outcome);
        }

        match self.state {
            GameState::StartMenu => {}
            GameState::Gameplay => self.update_gameplay(input, time, &mut outcome),
            GameState::Shop => self.update_shop(input, &mut outcome),
        }

        outcome
    }

    fn update_gameplay(&mut self, input: &FrameInput, time: FrameTime, outcome: &mut FrameOutcome) {
        let flight = &self.config.flight;

        if input.is_held(Keys::F)
            && self.owns(Upgrade::Boost)
            && self.boost.try_start(time.now, flight.boost_duration_secs)
        {
            let until = time.now + flight.boost_duration_secs;
            info!(until, "Boost started");
            outcome.events.push(GameEvent::BoostStarted { until });
        }
        if self.boost.expire(time.now) {
            info!("Boost ended");
            outcome.events.push(GameEvent::BoostEnded);
        }

        apply_flight_keys(&mut self.camera, input, flight, self.boost.is_active(), time.dt);
        apply_mouse_look(&mut self.camera, input);

        if input.is_held(Keys::SPACE) {
            self.fire(outcome);
        }

        self.camera.apply_movement(time.dt);
        self.roster
            .drift_all(self.camera.position(), self.config.combat.drift_divisor);

        if self.roster.is_empty() {
            let cleared = self.wave;
            self.wave += 1;
            self.camera.reset_position(self.config.camera.start_position);
            info!(wave = cleared, balance = self.wallet.balance(), "Wave cleared");
            outcome.events.push(GameEvent::WaveCleared { wave: cleared });
            self.set_state(GameState::Shop, outcome);
        }
    }

    fn fire(&mut self, outcome: &mut FrameOutcome) {
        self.firing = true;
        let combat = &self.config.combat;
        let shot = self
            .roster
            .resolve_shot(&self.camera.ray(), combat.hitbox_radius, combat.damage);
        outcome.hits += shot.hits;

        let mut remaining = self.roster.len() + shot.destroyed.len();
        for enemy in &shot.destroyed {
            remaining -= 1;
            self.wallet.deposit(combat.reward);
            info!(
                position = ?enemy.position,
                remaining,
                balance = self.wallet.balance(),
                "Enemy destroyed"
            );
            outcome.events.push(GameEvent::EnemyDestroyed {
                remaining,
                reward: combat.reward,
                balance: self.wallet.balance(),
            });
        }
        if shot.hits > 0 {
            debug!(hits = shot.hits, "Shot landed");
        }
    }

    fn update_shop(&mut self, input: &FrameInput, outcome: &mut FrameOutcome) {
        if input.was_pressed(Keys::ONE) {
            let upgrade = Upgrade::Boost;
            let price = self.config.shop.boost_price;
            let owned = self.owns(upgrade);
            match self.wallet.purchase(upgrade, price, owned) {
                Ok(()) => {
                    self.upgrades.insert(upgrade);
                    info!(%upgrade, price, balance = self.wallet.balance(), "Upgrade purchased");
                    outcome.events.push(GameEvent::Purchased {
                        upgrade,
                        balance: self.wallet.balance(),
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Purchase failed");
                    outcome.events.push(GameEvent::PurchaseFailed(e));
                }
            }
        }

        if input.was_pressed(Keys::Q) {
            self.spawn_wave();
            outcome.events.push(GameEvent::WaveStarted {
                wave: self.wave,
                enemies: self.roster.len(),
            });
            self.set_state(GameState::Gameplay, outcome);
        }
    }

    fn spawn_wave(&mut self) {
        let combat = &self.config.combat;
        self.roster.spawn_wave(
            &mut self.rng,
            combat.wave_size,
            combat.spawn_extent,
            combat.enemy_hp,
        );
        info!(wave = self.wave, enemies = self.roster.len(), "Wave started");
    }

    fn set_state(&mut self, to: GameState, outcome: &mut FrameOutcome) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        info!(?from, ?to, "Game state changed");
        outcome.transition = Some(to);
        outcome.events.push(GameEvent::StateChanged { from, to });
    }

    /// Hands the current frame to a renderer.
    pub fn render(&self, renderer: &mut dyn RenderBackend) {
        renderer.begin_frame(self.state.clear_color());
        if self.state == GameState::Gameplay {
            renderer.set_projection(&self.projection);
            renderer.set_view(&self.camera.view_matrix());
            for enemy in self.roster.iter() {
                renderer.draw_enemy(enemy.position);
            }
            if self.firing {
                renderer.draw_muzzle_flash();
            }
        }
        renderer.end_frame();
    }

    /// Human-readable status lines for the console.
    pub fn status_lines(&self) -> Vec<String> {
        let cam = &self.camera;
        let p = cam.position();
        let mut out = vec![
            format!("State: {:?}", self.state),
            format!("Wave: {}", self.wave),
            format!("Enemies left: {}", self.roster.len()),
            format!("Money: {}$", self.wallet.balance()),
            format!("Position: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z),
            format!("Yaw/pitch: {:.1} / {:.1}", cam.yaw(), cam.pitch()),
            format!(
                "Speed: forward {:.2}, strafe {:.2}",
                cam.velocity.forward, cam.velocity.right
            ),
        ];
        if self.owns(Upgrade::Boost) {
            out.push(format!("Boost: {}", if self.boost.is_active() { "active" } else { "ready (F)" }));
        }
        out
    }
}
