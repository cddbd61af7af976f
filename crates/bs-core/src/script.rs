use serde::{Deserialize, Serialize};

use crate::brick::Brick;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScriptTrigger {
    Start,
    WhenTapped,
    WhenCloneStarts,
    BroadcastReceive { message: String },
    UserDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub trigger: ScriptTrigger,
    #[serde(default)]
    pub bricks: Vec<Brick>,
}

impl Script {
    pub fn new(trigger: ScriptTrigger) -> Self {
        Self {
            trigger,
            bricks: Vec::new(),
        }
    }

    pub fn with_bricks(trigger: ScriptTrigger, bricks: Vec<Brick>) -> Self {
        Self { trigger, bricks }
    }

    /// Message this script is waiting for, if it is a broadcast receiver.
    pub fn broadcast_message(&self) -> Option<&str> {
        match &self.trigger {
            ScriptTrigger::BroadcastReceive { message } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// An authored block definition. Its body is a script of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBrick {
    pub name: String,
    pub definition: Script,
}

impl UserBrick {
    pub fn new(name: impl Into<String>, bricks: Vec<Brick>) -> Self {
        Self {
            name: name.into(),
            definition: Script::with_bricks(ScriptTrigger::UserDefinition, bricks),
        }
    }
}

#[cfg(test)]
mod script_tests {
    use super::*;

    #[test]
    fn only_broadcast_receivers_report_a_message() {
        let receiver = Script::new(ScriptTrigger::BroadcastReceive {
            message: "go".to_string(),
        });
        assert_eq!(receiver.broadcast_message(), Some("go"));
        assert_eq!(Script::new(ScriptTrigger::Start).broadcast_message(), None);
    }

    #[test]
    fn script_deserialize_defaults_to_no_bricks() {
        let script: Script = serde_json::from_str(
            r#"{"trigger":{"kind":"broadcastReceive","message":"stop"}}"#,
        )
        .expect("script should deserialize");
        assert!(script.bricks.is_empty());
        assert_eq!(script.broadcast_message(), Some("stop"));
    }
}
