//! Login flow: user sessions and chat messages on a single bus.

use chrono::{DateTime, Utc};
use tracing::info;

use dispatcher::{Event, EventType};

use super::{ScenarioOptions, ScenarioReport, Transcript};

#[derive(Debug, Clone)]
pub struct UserLoggedIn {
    pub user_id: String,
    pub username: String,
    pub timestamp: DateTime<Utc>,
}

impl Event for UserLoggedIn {
    fn event_type(&self) -> EventType {
        "user:logged_in".into()
    }
}

#[derive(Debug, Clone)]
pub struct UserLoggedOut {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
}

impl Event for UserLoggedOut {
    fn event_type(&self) -> EventType {
        "user:logged_out".into()
    }
}

#[derive(Debug, Clone)]
pub struct MessageSent {
    pub from: String,
    pub to: String,
    pub content: String,
}

impl Event for MessageSent {
    fn event_type(&self) -> EventType {
        "message:sent".into()
    }
}

pub fn run(options: &ScenarioOptions, transcript: &Transcript) -> ScenarioReport {
    let bus = options.bus("basic");

    let out = transcript.clone();
    bus.subscribe_typed("user:logged_in", move |e: &UserLoggedIn| {
        out.record(format!(
            "[Login Handler] User {} ({}) logged in at {}",
            e.username,
            e.user_id,
            e.timestamp.format("%H:%M:%S")
        ));
    });

    let out = transcript.clone();
    bus.subscribe_typed("user:logged_out", move |e: &UserLoggedOut| {
        out.record(format!(
            "[Logout Handler] User {} logged out at {}",
            e.user_id,
            e.timestamp.format("%H:%M:%S")
        ));
    });

    // Second listener for the same category runs after the login handler
    let out = transcript.clone();
    bus.subscribe_typed("user:logged_in", move |e: &UserLoggedIn| {
        out.record(format!("[Analytics] Recording login for user {}", e.user_id));
    });

    let out = transcript.clone();
    bus.subscribe_typed("message:sent", move |e: &MessageSent| {
        out.record(format!("[Message] {} -> {}: {}", e.from, e.to, e.content));
    });

    info!(bus = bus.name(), "Publishing events");

    bus.publish(UserLoggedIn {
        user_id: "user-123".to_string(),
        username: "alice".to_string(),
        timestamp: Utc::now(),
    });

    bus.publish(MessageSent {
        from: "alice".to_string(),
        to: "bob".to_string(),
        content: "Hello, Bob!".to_string(),
    });

    bus.publish(UserLoggedOut {
        user_id: "user-123".to_string(),
        timestamp: Utc::now(),
    });

    ScenarioReport::from_buses([&bus])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_scenario() {
        let transcript = Transcript::new();
        let report = run(&ScenarioOptions::default(), &transcript);

        let lines = transcript.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("[Login Handler] User alice (user-123)"));
        assert_eq!(lines[1], "[Analytics] Recording login for user user-123");
        assert_eq!(lines[2], "[Message] alice -> bob: Hello, Bob!");
        assert!(lines[3].starts_with("[Logout Handler] User user-123"));

        let metrics = report.bus("basic").unwrap();
        assert_eq!(metrics.published, 3);
        assert_eq!(metrics.delivered, 4);
        assert_eq!(metrics.unrouted, 0);
    }
}
