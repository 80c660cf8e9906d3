//! One bus per domain, with the physics bus forwarding into the audio bus.

use std::sync::Arc;

use tracing::info;

use dispatcher::{Dispatcher, Event, EventType};

use super::{ScenarioOptions, ScenarioReport, Transcript};

/// Collisions above this force trigger an impact sound
pub const HEAVY_IMPACT_FORCE: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct AppQuit;

impl Event for AppQuit {
    fn event_type(&self) -> EventType {
        "app:quit".into()
    }
}

#[derive(Debug, Clone)]
pub struct Collision {
    pub object1: String,
    pub object2: String,
    pub force: f64,
}

impl Event for Collision {
    fn event_type(&self) -> EventType {
        "physics:collision".into()
    }
}

#[derive(Debug, Clone)]
pub struct SoundPlay {
    pub sound_id: String,
    pub volume: f32,
}

impl Event for SoundPlay {
    fn event_type(&self) -> EventType {
        "audio:play".into()
    }
}

/// Domain-specific buses
pub struct EventBuses {
    pub application: Arc<Dispatcher>,
    pub physics: Arc<Dispatcher>,
    pub audio: Arc<Dispatcher>,
}

impl EventBuses {
    pub fn new(options: &ScenarioOptions) -> Self {
        Self {
            application: options.bus("application"),
            physics: options.bus("physics"),
            audio: options.bus("audio"),
        }
    }

    pub fn report(&self) -> ScenarioReport {
        ScenarioReport::from_buses([&self.application, &self.physics, &self.audio])
    }
}

/// Subscribe the scenario's listeners on each bus
pub fn wire(buses: &EventBuses, transcript: &Transcript) {
    let out = transcript.clone();
    buses.application.subscribe("app:quit", move |_: &dyn Event| {
        out.record("[Application] Shutting down...");
    });

    let out = transcript.clone();
    buses.physics.subscribe_typed("physics:collision", move |e: &Collision| {
        out.record(format!(
            "[Physics] Collision: {} <-> {} (force: {:.2})",
            e.object1, e.object2, e.force
        ));
    });

    let out = transcript.clone();
    buses.audio.subscribe_typed("audio:play", move |e: &SoundPlay| {
        out.record(format!(
            "[Audio] Playing sound '{}' at volume {:.1}%",
            e.sound_id,
            e.volume * 100.0
        ));
    });

    // Strong collisions trigger a sound on the audio bus
    let audio = Arc::clone(&buses.audio);
    buses.physics.subscribe_typed("physics:collision", move |e: &Collision| {
        if e.force > HEAVY_IMPACT_FORCE {
            audio.publish(SoundPlay {
                sound_id: "impact_heavy".to_string(),
                volume: 0.8,
            });
        }
    });
}

pub fn run(options: &ScenarioOptions, transcript: &Transcript) -> ScenarioReport {
    let buses = EventBuses::new(options);
    wire(&buses, transcript);

    info!("Publishing events to domain buses");

    buses.physics.publish(Collision {
        object1: "Player".to_string(),
        object2: "Wall".to_string(),
        force: 25.0,
    });

    buses.physics.publish(Collision {
        object1: "Player".to_string(),
        object2: "Enemy".to_string(),
        force: 75.0,
    });

    buses.audio.publish(SoundPlay {
        sound_id: "background_music".to_string(),
        volume: 0.5,
    });

    buses.application.publish(AppQuit);

    buses.report()
}
