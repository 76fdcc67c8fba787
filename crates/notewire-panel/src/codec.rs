//! Wire codec for kernel frames.
//!
//! Inbound frames look like `{ "cmd": string, "data": any, "reqId"?: string }`.
//! Decoding never panics: bad input comes back as a [`ProtocolError`]
//! and the caller drops the frame.

use notewire_core::{ContextHint, Frame, GraphData, ProtocolError, Request, RequestId};
use serde::Deserialize;

#[derive(Deserialize)]
struct RawFrame {
    cmd: String,
    #[serde(rename = "reqId")]
    req_id: Option<String>,
    #[serde(default)]
    data: serde_json::Value,
}

/// Backlink responses wrap their groups in a `backlinks` field next to
/// the echoed context.
#[derive(Deserialize)]
struct BacklinksEnvelope<T> {
    // `default = "Vec::new"` keeps serde from demanding `T: Default`.
    #[serde(default = "Vec::new")]
    backlinks: Vec<T>,
}

/// Decode a raw inbound message into a typed [`Frame`].
pub fn decode(raw: &str) -> Result<Frame, ProtocolError> {
    let frame: RawFrame = serde_json::from_str(raw)
        .map_err(|e| ProtocolError::malformed(format!("invalid frame: {e}")))?;
    let req_id = frame.req_id.map(RequestId::from_raw);

    match frame.cmd.as_str() {
        "backlinks" => {
            let envelope: BacklinksEnvelope<_> = serde_json::from_value(frame.data)?;
            Ok(Frame::Backlinks {
                req_id,
                groups: envelope.backlinks,
            })
        }
        "treebacklinks" => {
            let envelope: BacklinksEnvelope<_> = serde_json::from_value(frame.data)?;
            Ok(Frame::TreeBacklinks {
                req_id,
                groups: envelope.backlinks,
            })
        }
        "graph" => {
            let data: GraphData = serde_json::from_value(frame.data)?;
            Ok(Frame::Graph { req_id, data })
        }
        "reload" => {
            let hint: ContextHint = serde_json::from_value(frame.data)?;
            Ok(Frame::Reload { hint })
        }
        other => Err(ProtocolError::UnknownCommand { cmd: other.into() }),
    }
}

/// Encode an outbound request as its wire string.
pub fn encode(request: &Request) -> Result<String, ProtocolError> {
    serde_json::to_string(request).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notewire_core::{Command, QueryParams};

    #[test]
    fn decodes_treebacklinks_response() {
        let raw = r#"{
            "cmd": "treebacklinks",
            "reqId": "req_1",
            "data": {
                "url": "file://doc1",
                "path": "/a/b",
                "backlinks": [{
                    "url": "file://doc1",
                    "path": "/a/c",
                    "blocks": [{
                        "def": {"url": "file://doc1", "path": "/a/b", "id": "b1", "type": "NodeParagraph"},
                        "type": "NodeParagraph",
                        "content": "a reference"
                    }]
                }]
            }
        }"#;
        match decode(raw).unwrap() {
            Frame::TreeBacklinks { req_id, groups } => {
                assert_eq!(req_id, Some(RequestId::from_raw("req_1")));
                assert_eq!(groups.len(), 1);
                assert_eq!(groups[0].path, "/a/c");
            }
            other => panic!("wrong frame: {other:?}"),
        }
    }

    #[test]
    fn decodes_global_backlinks_response() {
        let raw = r#"{
            "cmd": "backlinks",
            "reqId": "req_2",
            "data": {"backlinks": [{
                "def": {"url": "file://doc1", "path": "/a/b", "id": "d1", "type": "NodeHeading", "content": "Target"},
                "refs": []
            }]}
        }"#;
        match decode(raw).unwrap() {
            Frame::Backlinks { groups, .. } => {
                assert_eq!(groups.len(), 1);
                assert_eq!(groups[0].def.id, "d1");
            }
            other => panic!("wrong frame: {other:?}"),
        }
    }

    #[test]
    fn decodes_reload_broadcast_without_req_id() {
        let raw = r#"{"cmd": "reload", "data": {"url": "file://doc1", "path": "/a/b"}}"#;
        match decode(raw).unwrap() {
            Frame::Reload { hint } => {
                assert_eq!(hint, ContextHint::new("file://doc1", "/a/b"));
            }
            other => panic!("wrong frame: {other:?}"),
        }
    }

    #[test]
    fn decodes_global_reload_with_empty_hint() {
        let raw = r#"{"cmd": "reload", "data": {}}"#;
        match decode(raw).unwrap() {
            Frame::Reload { hint } => assert!(hint.is_global()),
            other => panic!("wrong frame: {other:?}"),
        }
    }

    #[test]
    fn decodes_graph_response() {
        let raw = r#"{"cmd": "graph", "reqId": "req_3", "data": {"nodes": [{"name": "n"}], "links": []}}"#;
        match decode(raw).unwrap() {
            Frame::Graph { data, .. } => assert_eq!(data.nodes.len(), 1),
            other => panic!("wrong frame: {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_json() {
        let err = decode("not json at all").unwrap_err();
        assert_eq!(err.error_kind(), "malformed_frame");
    }

    #[test]
    fn rejects_missing_command() {
        let err = decode(r#"{"data": {}}"#).unwrap_err();
        assert_eq!(err.error_kind(), "malformed_frame");
    }

    #[test]
    fn rejects_unknown_command() {
        let err = decode(r#"{"cmd": "mount", "data": {}}"#).unwrap_err();
        assert_eq!(err.error_kind(), "unknown_command");
    }

    #[test]
    fn backlinks_response_tolerates_empty_data() {
        match decode(r#"{"cmd": "backlinks", "data": {}}"#).unwrap() {
            Frame::Backlinks { groups, .. } => assert!(groups.is_empty()),
            other => panic!("wrong frame: {other:?}"),
        }
    }

    #[test]
    fn encode_roundtrips_through_decode_shape() {
        let req = Request::new(Command::Graph, QueryParams::filter("wiki"));
        let wire = encode(&req).unwrap();
        let value: serde_json::Value = serde_json::from_str(&wire).unwrap();
        assert_eq!(value["cmd"], "graph");
        assert_eq!(value["param"]["k"], "wiki");
    }
}
