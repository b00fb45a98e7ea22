pub mod api;
pub mod conversation;
pub mod live;
pub mod session;

pub use api::ApiClient;
pub use session::{ChatSession, SessionConfig};
