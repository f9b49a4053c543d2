//! Hook invoked when a session is lost for good.

/// Receives a notification whenever the client wipes stored credentials because the session
/// could not be refreshed. Front ends typically route the user back to their login view.
pub trait SessionListener
where
	Self: Send + Sync,
{
	/// Called once per irrecoverable refresh failure, after credentials were cleared.
	fn session_expired(&self, reason: &str);
}

/// Listener that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSessionListener;
impl SessionListener for NoopSessionListener {
	fn session_expired(&self, _reason: &str) {}
}
