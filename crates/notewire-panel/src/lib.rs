pub mod codec;
pub mod highlight;
pub mod hub;
pub mod render;
pub mod session;

pub use codec::{decode, encode};
pub use highlight::{EditorRegistry, EditorSurface, RefTarget};
pub use hub::PanelHub;
pub use render::{Labels, Renderer, TextRenderer};
pub use session::{PanelKind, PanelSession, SessionState};
