mod builder;
pub mod session;

pub use builder::Douyin;
pub use session::{BrowserSession, SessionConfig};
