use serde::{Deserialize, Serialize};

use crate::context::ContextHint;
use crate::ids::RequestId;
use crate::payload::{DefGroup, GraphData, RefererGroup};

/// Inbound frame after decoding. A closed set: adding a kernel command
/// is a compile-time-checked change, not a new string case.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    /// Response to a global backlinks query.
    Backlinks {
        req_id: Option<RequestId>,
        groups: Vec<DefGroup>,
    },
    /// Response to a scoped (per-document) backlinks query.
    TreeBacklinks {
        req_id: Option<RequestId>,
        groups: Vec<RefererGroup>,
    },
    /// Response to a relation graph query.
    Graph {
        req_id: Option<RequestId>,
        data: GraphData,
    },
    /// Unsolicited broadcast: data affecting `hint` changed.
    Reload { hint: ContextHint },
}

impl Frame {
    pub fn command(&self) -> &'static str {
        match self {
            Self::Backlinks { .. } => "backlinks",
            Self::TreeBacklinks { .. } => "treebacklinks",
            Self::Graph { .. } => "graph",
            Self::Reload { .. } => "reload",
        }
    }

    /// Correlation id, if this frame answers an outstanding request.
    pub fn req_id(&self) -> Option<&RequestId> {
        match self {
            Self::Backlinks { req_id, .. }
            | Self::TreeBacklinks { req_id, .. }
            | Self::Graph { req_id, .. } => req_id.as_ref(),
            Self::Reload { .. } => None,
        }
    }

    pub fn is_broadcast(&self) -> bool {
        matches!(self, Self::Reload { .. })
    }
}

/// Outbound query command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Global backlinks query (no parameters beyond an optional filter).
    Backlinks,
    /// Scoped backlinks query carrying the document context.
    #[serde(rename = "treebacklinks")]
    TreeBacklinks,
    /// Relation graph query.
    Graph,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backlinks => "backlinks",
            Self::TreeBacklinks => "treebacklinks",
            Self::Graph => "graph",
        }
    }
}

/// Parameters of an outbound query. `url`/`path` identify a scoped
/// context; `k` is the free-text filter for graph queries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
}

impl QueryParams {
    pub fn scoped(url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            path: Some(path.into()),
            k: None,
        }
    }

    pub fn filter(k: impl Into<String>) -> Self {
        Self {
            url: None,
            path: None,
            k: Some(k.into()),
        }
    }
}

/// Outbound request frame: `{ cmd, reqId, param }` on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub cmd: Command,
    #[serde(rename = "reqId")]
    pub req_id: RequestId,
    pub param: QueryParams,
}

impl Request {
    pub fn new(cmd: Command, param: QueryParams) -> Self {
        Self {
            cmd,
            req_id: RequestId::new(),
            param,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_wire_names() {
        assert_eq!(
            serde_json::to_string(&Command::TreeBacklinks).unwrap(),
            r#""treebacklinks""#
        );
        assert_eq!(serde_json::to_string(&Command::Graph).unwrap(), r#""graph""#);
        assert_eq!(Command::Backlinks.as_str(), "backlinks");
    }

    #[test]
    fn request_serializes_with_req_id_key() {
        let req = Request::new(Command::TreeBacklinks, QueryParams::scoped("file://doc1", "/a/b"));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["cmd"], "treebacklinks");
        assert_eq!(json["param"]["url"], "file://doc1");
        assert_eq!(json["param"]["path"], "/a/b");
        assert!(json["reqId"].as_str().unwrap().starts_with("req_"));
        assert!(json["param"].get("k").is_none());
    }

    #[test]
    fn graph_request_carries_filter_only_when_set() {
        let req = Request::new(Command::Graph, QueryParams::filter("kernel"));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["param"]["k"], "kernel");
        assert!(json["param"].get("url").is_none());
    }

    #[test]
    fn frame_accessors() {
        let id = RequestId::new();
        let frame = Frame::Graph {
            req_id: Some(id.clone()),
            data: GraphData::default(),
        };
        assert_eq!(frame.command(), "graph");
        assert_eq!(frame.req_id(), Some(&id));
        assert!(!frame.is_broadcast());

        let reload = Frame::Reload {
            hint: ContextHint::new("file://doc1", "/a/b"),
        };
        assert!(reload.is_broadcast());
        assert!(reload.req_id().is_none());
    }
}
