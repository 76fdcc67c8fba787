pub mod context;
pub mod error;
pub mod frame;
pub mod ids;
pub mod payload;

pub use context::{ContextHint, DocKey, PanelContext};
pub use error::ProtocolError;
pub use frame::{Command, Frame, QueryParams, Request};
pub use ids::{PanelId, RequestId};
pub use payload::{
    BlockRef, DefBlock, DefGroup, DefRef, GraphData, NodeKind, QueryResult, RefBlock, RefererGroup,
};
