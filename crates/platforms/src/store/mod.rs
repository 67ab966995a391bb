pub mod cookies;
pub mod credentials;

pub use cookies::{Cookie, CookieStore, JsonFileCookieStore, MemoryCookieStore};
pub use credentials::{CredentialStore, JsonFileCredentialStore, MemoryCredentialStore};
