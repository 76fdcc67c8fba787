//! Session hub: the process-wide registry of live panel sessions and
//! the correlation point between transport frames and sessions.
//!
//! The hub is single-owner state: the client event loop owns it and
//! drives every method from one task, so sessions never race each
//! other. Multiplexing is purely logical: all sessions share one
//! outbound channel to the transport.

use std::collections::HashMap;

use notewire_core::{
    Command, Frame, PanelContext, PanelId, ProtocolError, QueryResult, Request, RequestId,
};
use tokio::sync::mpsc;

use crate::codec;
use crate::render::Renderer;
use crate::session::{IssuedQuery, PanelKind, PanelSession, SessionState};

/// An outstanding query: which session asked, at which sequence.
#[derive(Clone, Debug)]
struct PendingQuery {
    panel: PanelId,
    seq: u64,
    cmd: Command,
}

pub struct PanelHub {
    sessions: HashMap<PanelId, PanelSession>,
    pending: HashMap<RequestId, PendingQuery>,
    outbox: mpsc::UnboundedSender<Request>,
}

impl PanelHub {
    /// Create a hub and the receiving half of the shared outbound
    /// channel, which the transport drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Request>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                sessions: HashMap::new(),
                pending: HashMap::new(),
                outbox: tx,
            },
            rx,
        )
    }

    /// Open a panel: register its session and issue the initial query.
    pub fn open(
        &mut self,
        kind: PanelKind,
        context: PanelContext,
        renderer: Box<dyn Renderer>,
    ) -> Result<PanelId, ProtocolError> {
        let mut session = PanelSession::new(kind, context, renderer, self.outbox.clone());
        let id = session.id().clone();
        let issued = session.query()?;
        self.track(&id, issued, session.expected_command());
        tracing::info!(panel_id = %id, kind = ?kind, "Panel opened");
        self.sessions.insert(id.clone(), session);
        Ok(id)
    }

    /// Close a panel. The session leaves the registry before anything
    /// else is torn down, so no later frame can reach it; its in-flight
    /// request is not cancelled, only orphaned.
    pub fn close(&mut self, id: &PanelId) {
        if let Some(mut session) = self.sessions.remove(id) {
            session.close();
            self.pending.retain(|_, p| p.panel != *id);
            tracing::info!(panel_id = %id, "Panel closed");
        }
    }

    /// User input changed a panel's query filter.
    pub fn set_filter(&mut self, id: &PanelId, k: impl Into<String>) {
        let Some(session) = self.sessions.get_mut(id) else {
            return;
        };
        let cmd = session.expected_command();
        match session.set_filter(k) {
            Ok(Some(issued)) => self.track(id, issued, cmd),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(panel_id = %id, kind = e.error_kind(), "Filter query failed");
            }
        }
    }

    /// Feed one raw inbound transport message through the codec and
    /// route it. Never propagates an error: bad frames are dropped and
    /// logged, per the degraded-not-broken contract.
    pub fn handle_frame(&mut self, raw: &str) {
        let frame = match codec::decode(raw) {
            Ok(frame) => frame,
            Err(e @ ProtocolError::UnknownCommand { .. }) => {
                tracing::debug!(kind = e.error_kind(), "Dropped frame: {e}");
                return;
            }
            Err(e) => {
                tracing::warn!(kind = e.error_kind(), "Dropped frame: {e}");
                return;
            }
        };

        match frame {
            Frame::Reload { hint } => self.fan_out(&hint),
            Frame::Backlinks { req_id, groups } => {
                self.resolve(req_id, Command::Backlinks, QueryResult::Backlinks(groups))
            }
            Frame::TreeBacklinks { req_id, groups } => self.resolve(
                req_id,
                Command::TreeBacklinks,
                QueryResult::TreeBacklinks(groups),
            ),
            Frame::Graph { req_id, data } => {
                self.resolve(req_id, Command::Graph, QueryResult::Graph(data))
            }
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn panel_state(&self, id: &PanelId) -> Option<SessionState> {
        self.sessions.get(id).map(|s| s.state())
    }

    fn track(&mut self, panel: &PanelId, issued: IssuedQuery, cmd: Command) {
        // A newer query supersedes the panel's outstanding one. Evict
        // it so an unanswered request cannot pin a map entry forever;
        // its response, if it ever comes, lands unmatched.
        self.pending.retain(|_, p| p.panel != *panel);
        self.pending.insert(
            issued.req_id,
            PendingQuery {
                panel: panel.clone(),
                seq: issued.seq,
                cmd,
            },
        );
    }

    /// Deliver every live session's relevance check. Relevant sessions
    /// each issue exactly one refetch.
    fn fan_out(&mut self, hint: &notewire_core::ContextHint) {
        let ids: Vec<PanelId> = self.sessions.keys().cloned().collect();
        for id in ids {
            let Some(session) = self.sessions.get_mut(&id) else {
                continue;
            };
            let cmd = session.expected_command();
            match session.on_broadcast(hint) {
                Ok(Some(issued)) => self.track(&id, issued, cmd),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(panel_id = %id, kind = e.error_kind(), "Refetch failed");
                }
            }
        }
    }

    /// Correlate a response frame with its outstanding query and hand
    /// the payload to the owning session.
    fn resolve(&mut self, req_id: Option<RequestId>, cmd: Command, result: QueryResult) {
        let Some(req_id) = req_id else {
            tracing::debug!(cmd = cmd.as_str(), "Response without reqId, dropped");
            return;
        };
        let Some(pending) = self.pending.remove(&req_id) else {
            // Normal teardown race or traffic for a defunct request.
            tracing::debug!(req_id = %req_id, "Unmatched response, dropped");
            return;
        };
        if pending.cmd != cmd {
            tracing::warn!(
                req_id = %req_id,
                expected = pending.cmd.as_str(),
                got = cmd.as_str(),
                "Response command mismatch, dropped"
            );
            return;
        }
        let Some(session) = self.sessions.get_mut(&pending.panel) else {
            // The panel closed while the query was in flight.
            tracing::debug!(panel_id = %pending.panel, "Response for closed panel, dropped");
            return;
        };
        if let Err(e) = session.deliver(pending.seq, &result) {
            tracing::debug!(panel_id = %pending.panel, kind = e.error_kind(), "{e}");
        }
    }
}
