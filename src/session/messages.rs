//! Session Message Definitions
//!
//! ```text
//! host --JSON line--> Command --SessionMsg--> SessionActor --Response--> host
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Commands from an external controller, tagged by `action`.
///
/// ```json
/// {"action": "toggle"}
/// {"action": "getStatus"}
/// {"action": "setPrefixLength", "value": 3}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
    Toggle,
    GetStatus,
    /// The value stays untyped until validation so that `2.5` or `"3"` get
    /// a precise rejection.
    #[serde(alias = "setBoldLetters")]
    SetPrefixLength {
        #[serde(default)]
        value: serde_json::Value,
    },
}

impl Command {
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    pub fn set_prefix_length(value: i64) -> Self {
        Self::SetPrefixLength {
            value: value.into(),
        }
    }
}

/// Replies: `{"enabled": bool}`, `{"success": true}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Status {
        enabled: bool,
    },
    Outcome {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl Response {
    pub fn status(enabled: bool) -> Self {
        Self::Status { enabled }
    }

    pub fn success() -> Self {
        Self::Outcome {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Outcome {
            success: false,
            error: Some(error.into()),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"success":false}"#.to_string())
    }
}

/// Messages to the session actor
#[derive(Debug)]
pub enum SessionMsg {
    Command {
        command: Command,
        reply: oneshot::Sender<Response>,
    },
    /// Reply once every one-shot pass has finished
    WaitIdle { reply: oneshot::Sender<()> },
    /// Stop background work and exit
    Shutdown,
}
