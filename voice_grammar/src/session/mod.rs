//! Listening state carried across utterances
//!
//! A session starts awake. "go to sleep" puts it to sleep and "start
//! listening" wakes it; while asleep every other utterance parses normally but
//! produces an empty action.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepState {
    #[default]
    Awake,
    Asleep,
}

impl SleepState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Awake => "awake",
            Self::Asleep => "asleep",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    state: SleepState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SleepState {
        self.state
    }

    pub fn is_sleeping(&self) -> bool {
        self.state == SleepState::Asleep
    }

    pub fn fall_asleep(&mut self) {
        self.state = SleepState::Asleep;
    }

    pub fn wake_up(&mut self) {
        self.state = SleepState::Awake;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_starts_awake() {
        let session = Session::new();
        assert_eq!(session.state(), SleepState::Awake);
        assert!(!session.is_sleeping());
    }

    #[test]
    fn test_sleep_transitions_are_idempotent() {
        let mut session = Session::new();
        session.fall_asleep();
        session.fall_asleep();
        assert!(session.is_sleeping());

        session.wake_up();
        assert_eq!(session.state().as_str(), "awake");
        session.wake_up();
        assert!(!session.is_sleeping());
    }

    #[test]
    fn test_state_serializes_lowercase() {
        let json = serde_json::to_string(&SleepState::Asleep).unwrap();
        assert_eq!(json, "\"asleep\"");
    }
}
