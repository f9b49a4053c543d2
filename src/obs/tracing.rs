// self
use crate::{_prelude::*, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by client calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("rental_client.call", call = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Notes that a request hit a 401 and joined (or started) a refresh.
pub(crate) fn unauthorized(path: &str, queued: bool) {
	#[cfg(feature = "tracing")]
	tracing::debug!(path, queued, "request unauthorized; awaiting refreshed token");
	#[cfg(not(feature = "tracing"))]
	let _ = (path, queued);
}

/// Notes that a 401 was answered with a token another refresh had already stored.
pub(crate) fn stale_token_recovered() {
	#[cfg(feature = "tracing")]
	tracing::debug!("access token was rotated while the request was in flight");
}

/// Notes an irrecoverable refresh failure.
pub(crate) fn refresh_failed(reason: &str, waiters: usize) {
	#[cfg(feature = "tracing")]
	tracing::warn!(reason, waiters, "token refresh failed; session cleared");
	#[cfg(not(feature = "tracing"))]
	let _ = (reason, waiters);
}

/// Notes that stored credentials could not be wiped.
pub(crate) fn refresh_unreachable(err: &dyn StdError, waiters: usize) {
	#[cfg(feature = "tracing")]
	tracing::warn!(error = %err, waiters, "token refresh did not reach the API; session kept");
	#[cfg(not(feature = "tracing"))]
	let _ = (err, waiters);
}

pub(crate) fn cleanup_failed(err: &dyn StdError) {
	#[cfg(feature = "tracing")]
	tracing::error!(error = %err, "failed to clear stored credentials");
	#[cfg(not(feature = "tracing"))]
	let _ = err;
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn event_helpers_are_callable_without_subscriber() {
		unauthorized("/leases", true);
		stale_token_recovered();
		refresh_failed("refresh rejected", 2);
		refresh_unreachable(&std::io::Error::other("connection reset"), 1);
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = CallSpan::new(CallKind::Request, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
