//! Session-domain models: redacted token secrets, login/refresh payloads, and the listener
//! notified when a session cannot be recovered.

pub mod listener;
pub mod secret;
pub mod session;

pub use listener::*;
pub use secret::*;
pub use session::*;
