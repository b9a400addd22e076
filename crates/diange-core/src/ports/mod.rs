pub mod http;
pub mod render;
pub mod session;

pub use http::{HttpClient, HttpError};
pub use render::{PageRenderer, RenderError};
pub use session::{ChatSession, InboundMessage, SessionError};
