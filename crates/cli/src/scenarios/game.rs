//! Game loop: player and world buses driving audio, physics and render systems.
//!
//! Dying schedules a respawn on a tokio task; the respawn is published from
//! that task, concurrently with the caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, info};

use dispatcher::{Dispatcher, Event, EventType};

use super::{ScenarioOptions, ScenarioReport, Transcript};
use crate::error::{CliError, Result};

#[derive(Debug, Clone)]
pub struct PlayerJumped {
    pub player_id: String,
    pub height: f64,
}

impl Event for PlayerJumped {
    fn event_type(&self) -> EventType {
        "player:jumped".into()
    }
}

#[derive(Debug, Clone)]
pub struct PlayerDied {
    pub player_id: String,
    pub cause: String,
}

impl Event for PlayerDied {
    fn event_type(&self) -> EventType {
        "player:died".into()
    }
}

#[derive(Debug, Clone)]
pub struct PlayerRespawned {
    pub player_id: String,
    pub x: f64,
    pub y: f64,
}

impl Event for PlayerRespawned {
    fn event_type(&self) -> EventType {
        "player:respawned".into()
    }
}

#[derive(Debug, Clone)]
pub struct LevelLoaded {
    pub level_name: String,
}

impl Event for LevelLoaded {
    fn event_type(&self) -> EventType {
        "world:level_loaded".into()
    }
}

pub struct AudioSystem;

impl AudioSystem {
    pub fn attach(bus: &Dispatcher, transcript: &Transcript) -> Self {
        let out = transcript.clone();
        bus.subscribe("player:jumped", move |_: &dyn Event| {
            out.record("  [Audio] Playing jump sound");
        });

        let out = transcript.clone();
        bus.subscribe("player:died", move |_: &dyn Event| {
            out.record("  [Audio] Playing death sound");
        });

        Self
    }
}

pub struct PhysicsSystem;

impl PhysicsSystem {
    pub fn attach(bus: &Dispatcher, transcript: &Transcript) -> Self {
        let out = transcript.clone();
        bus.subscribe_typed("player:jumped", move |e: &PlayerJumped| {
            out.record(format!(
                "  [Physics] Applying jump force (height: {:.1})",
                e.height
            ));
        });

        Self
    }
}

/// Listens on whichever bus it is attached to; the scenario attaches it to both.
pub struct RenderSystem;

impl RenderSystem {
    pub fn attach(bus: &Dispatcher, transcript: &Transcript) -> Self {
        let out = transcript.clone();
        bus.subscribe_typed("player:respawned", move |e: &PlayerRespawned| {
            out.record(format!("  [Render] Moved camera to ({:.0}, {:.0})", e.x, e.y));
        });

        let out = transcript.clone();
        bus.subscribe_typed("world:level_loaded", move |e: &LevelLoaded| {
            out.record(format!(
                "  [Render] Loading textures for level '{}'",
                e.level_name
            ));
        });

        Self
    }
}

#[derive(Clone)]
pub struct Player {
    pub id: String,
    bus: Arc<Dispatcher>,
    alive: Arc<AtomicBool>,
    respawn_delay: Duration,
    transcript: Transcript,
}

impl Player {
    pub fn new(
        id: impl Into<String>,
        bus: Arc<Dispatcher>,
        respawn_delay: Duration,
        transcript: &Transcript,
    ) -> Self {
        Self {
            id: id.into(),
            bus,
            alive: Arc::new(AtomicBool::new(true)),
            respawn_delay,
            transcript: transcript.clone(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub fn jump(&self, height: f64) {
        if !self.is_alive() {
            debug!(player = %self.id, "Dead players cannot jump");
            return;
        }
        self.transcript.record(format!("[Player] {} jumps!", self.id));
        self.bus.publish(PlayerJumped {
            player_id: self.id.clone(),
            height,
        });
    }

    /// Kill the player and schedule a respawn after the configured delay
    pub fn die(&self, cause: &str) {
        if !self.alive.swap(false, Ordering::SeqCst) {
            return;
        }
        self.transcript
            .record(format!("[Player] {} died from {}", self.id, cause));
        self.bus.publish(PlayerDied {
            player_id: self.id.clone(),
            cause: cause.to_string(),
        });

        let player = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(player.respawn_delay).await;
            player.respawn();
        });
    }

    pub fn respawn(&self) {
        self.transcript
            .record(format!("[Player] {} respawning...", self.id));
        self.alive.store(true, Ordering::SeqCst);
        self.bus.publish(PlayerRespawned {
            player_id: self.id.clone(),
            x: 0.0,
            y: 0.0,
        });
    }
}

pub struct World {
    bus: Arc<Dispatcher>,
    transcript: Transcript,
}

impl World {
    pub fn new(bus: Arc<Dispatcher>, transcript: &Transcript) -> Self {
        Self {
            bus,
            transcript: transcript.clone(),
        }
    }

    pub fn load_level(&self, name: &str) {
        self.transcript
            .record(format!("[World] Loading level '{}'", name));
        self.bus.publish(LevelLoaded {
            level_name: name.to_string(),
        });
    }
}

pub async fn run(options: &ScenarioOptions, transcript: &Transcript) -> Result<ScenarioReport> {
    let player_bus = options.bus("player");
    let world_bus = options.bus("world");

    AudioSystem::attach(&player_bus, transcript);
    PhysicsSystem::attach(&player_bus, transcript);
    RenderSystem::attach(&player_bus, transcript);
    RenderSystem::attach(&world_bus, transcript);

    let player = Player::new("player-1", Arc::clone(&player_bus), options.respawn_delay, transcript);
    let world = World::new(Arc::clone(&world_bus), transcript);

    world.load_level("level-1");
    player.jump(10.0);

    // Subscribed before dying so the respawn cannot be missed
    let respawned = Arc::new(Notify::new());
    let signal = Arc::clone(&respawned);
    player_bus.subscribe("player:respawned", move |_: &dyn Event| signal.notify_one());

    player.die("falling");

    let wait = options.respawn_delay + Duration::from_secs(5);
    tokio::time::timeout(wait, respawned.notified())
        .await
        .map_err(|_| CliError::scenario("game", format!("no respawn within {wait:?}")))?;

    player.jump(8.0);

    info!(alive = player.is_alive(), "Game scenario finished");

    Ok(ScenarioReport::from_buses([&player_bus, &world_bus]))
}
