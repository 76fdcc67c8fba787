use crate::ids::{PanelId, RequestId};

/// Protocol-layer errors. All of these are drop-and-log conditions:
/// none are surfaced to the end user, whose worst case is a panel
/// showing stale or default content.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Inbound data was not valid structured data or lacked a command.
    #[error("malformed frame: {reason}")]
    MalformedFrame { reason: String },

    /// Command not in the known set. Forward-compatibility case.
    #[error("unknown command: {cmd}")]
    UnknownCommand { cmd: String },

    /// Response correlated to no outstanding request. Expected under
    /// normal teardown races.
    #[error("unmatched response: {req_id}")]
    UnmatchedResponse { req_id: RequestId },

    /// Response older than the latest query issued by its session.
    #[error("stale response for {panel}: seq {seq} < latest {latest}")]
    StaleResponse {
        panel: PanelId,
        seq: u64,
        latest: u64,
    },

    /// Outbound channel to the transport is gone.
    #[error("transport channel closed")]
    ChannelClosed,
}

impl ProtocolError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedFrame {
            reason: reason.into(),
        }
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::MalformedFrame { .. } => "malformed_frame",
            Self::UnknownCommand { .. } => "unknown_command",
            Self::UnmatchedResponse { .. } => "unmatched_response",
            Self::StaleResponse { .. } => "stale_response",
            Self::ChannelClosed => "channel_closed",
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err.to_string())
    }
}
