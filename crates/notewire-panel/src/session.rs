//! Panel session: one logical subscription per open UI panel.

use chrono::{DateTime, Utc};
use notewire_core::{
    Command, ContextHint, PanelContext, PanelId, ProtocolError, QueryParams, QueryResult, Request,
    RequestId,
};
use tokio::sync::mpsc;

use crate::render::Renderer;

/// Which panel surface this session feeds. Fixed for the session's
/// lifetime; together with the context it selects the query command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelKind {
    Backlinks,
    Graph,
}

/// Session lifecycle.
///
/// `Subscribed → (Querying ⇄ Idle) → Closed`. A closed session stays
/// in the map only long enough for the hub to unregister it; late
/// responses are checked against liveness, not cancelled at the
/// transport (it has no cancellation primitive).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Subscribed,
    Querying,
    Idle,
    Closed,
}

/// A query the session has sent and not yet seen answered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedQuery {
    pub req_id: RequestId,
    pub seq: u64,
}

pub struct PanelSession {
    id: PanelId,
    kind: PanelKind,
    context: PanelContext,
    state: SessionState,
    /// Free-text filter for graph queries, set from user input.
    filter: Option<String>,
    /// Sequence of the latest issued query. Responses carrying an
    /// older sequence are stale and rejected.
    issued_seq: u64,
    created_at: DateTime<Utc>,
    outbox: mpsc::UnboundedSender<Request>,
    renderer: Box<dyn Renderer>,
}

impl PanelSession {
    pub fn new(
        kind: PanelKind,
        context: PanelContext,
        renderer: Box<dyn Renderer>,
        outbox: mpsc::UnboundedSender<Request>,
    ) -> Self {
        Self {
            id: PanelId::new(),
            kind,
            context,
            state: SessionState::Subscribed,
            filter: None,
            issued_seq: 0,
            created_at: Utc::now(),
            outbox,
            renderer,
        }
    }

    pub fn id(&self) -> &PanelId {
        &self.id
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn context(&self) -> &PanelContext {
        &self.context
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_alive(&self) -> bool {
        self.state != SessionState::Closed
    }

    /// The command whose response frames this session consumes.
    pub fn expected_command(&self) -> Command {
        match (self.kind, &self.context) {
            (PanelKind::Backlinks, PanelContext::Scoped { .. }) => Command::TreeBacklinks,
            (PanelKind::Backlinks, PanelContext::Global) => Command::Backlinks,
            (PanelKind::Graph, _) => Command::Graph,
        }
    }

    fn params(&self) -> QueryParams {
        let mut params = match &self.context {
            PanelContext::Scoped { url, path } => QueryParams::scoped(url.clone(), path.clone()),
            PanelContext::Global => QueryParams::default(),
        };
        if self.kind == PanelKind::Graph {
            params.k = Some(self.filter.clone().unwrap_or_default());
        }
        params
    }

    /// Send a query for this session's context. Supersedes interest in
    /// any earlier outstanding query: the sequence number advances and
    /// older responses will be rejected as stale.
    pub fn query(&mut self) -> Result<IssuedQuery, ProtocolError> {
        if self.state == SessionState::Closed {
            return Err(ProtocolError::ChannelClosed);
        }
        let request = Request::new(self.expected_command(), self.params());
        let req_id = request.req_id.clone();
        self.outbox
            .send(request)
            .map_err(|_| ProtocolError::ChannelClosed)?;
        self.issued_seq += 1;
        self.state = SessionState::Querying;
        tracing::debug!(
            panel_id = %self.id,
            cmd = self.expected_command().as_str(),
            seq = self.issued_seq,
            "Query issued"
        );
        Ok(IssuedQuery {
            req_id,
            seq: self.issued_seq,
        })
    }

    /// User input changed the query filter. Only graph sessions carry
    /// a filter; for other panels this is a no-op.
    pub fn set_filter(
        &mut self,
        k: impl Into<String>,
    ) -> Result<Option<IssuedQuery>, ProtocolError> {
        if self.kind != PanelKind::Graph || !self.is_alive() {
            return Ok(None);
        }
        self.filter = Some(k.into());
        self.query().map(Some)
    }

    /// Inspect a change broadcast and refetch when it is relevant.
    /// Returns the issued query, if any.
    pub fn on_broadcast(
        &mut self,
        hint: &ContextHint,
    ) -> Result<Option<IssuedQuery>, ProtocolError> {
        if !self.is_alive() || !self.context.matches(hint) {
            return Ok(None);
        }
        self.query().map(Some)
    }

    /// Deliver a response for the query issued at `seq`. Stale
    /// responses (older than the latest issued query) are rejected;
    /// the newest query's response is the one rendered.
    pub fn deliver(&mut self, seq: u64, result: &QueryResult) -> Result<(), ProtocolError> {
        if !self.is_alive() {
            // Teardown race: the panel closed while the query was in
            // flight. Dropped without rendering.
            return Ok(());
        }
        if seq < self.issued_seq {
            return Err(ProtocolError::StaleResponse {
                panel: self.id.clone(),
                seq,
                latest: self.issued_seq,
            });
        }
        self.renderer.render(result);
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Panel teardown. The hub removes the session from its registry;
    /// any response that arrives later finds no live session.
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
        tracing::debug!(panel_id = %self.id, "Session closed");
    }
}
