//! Control Channel Module
//!
//! Out-of-band messages from the application shell. `SKIP_WAITING`
//! promotes a waiting instance immediately; `GET_VERSION` replies with
//! the current version tag over a caller-supplied channel.

use tokio::sync::oneshot;

use crate::error::{AgentError, Result};

/// Wire value for the skip-waiting message type.
pub const SKIP_WAITING: &str = "SKIP_WAITING";

/// Wire value for the version-query message type.
pub const GET_VERSION: &str = "GET_VERSION";

// == Control Message ==
/// A decoded control-channel message.
#[derive(Debug)]
pub enum ControlMessage {
    /// Promote a waiting instance to active, bypassing the multi-tab wait
    SkipWaiting,
    /// Reply with the current version tag
    GetVersion { reply: oneshot::Sender<String> },
}

impl ControlMessage {
    /// Decodes a message type; `GET_VERSION` takes the reply sender.
    pub fn decode(kind: &str, reply: Option<oneshot::Sender<String>>) -> Result<Self> {
        match kind {
            SKIP_WAITING => Ok(ControlMessage::SkipWaiting),
            GET_VERSION => {
                let reply = reply
                    .ok_or_else(|| AgentError::InvalidMessage("GET_VERSION needs a reply channel".to_string()))?;
                Ok(ControlMessage::GetVersion { reply })
            }
            other => Err(AgentError::InvalidMessage(other.to_string())),
        }
    }
}
