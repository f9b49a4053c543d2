//! Counters and histograms published through the `metrics` facade.
//!
//! Without the `metrics` feature every recorder here compiles to a no-op.

// self
use crate::obs::{CallKind, CallOutcome};

/// Why a token refresh produced no token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshCause {
	/// The API rejected the refresh, or no refresh token was stored; the session ended.
	Expired,
	/// The refresh call failed in transport; the session was kept.
	Unreachable,
}
impl RefreshCause {
	/// Label value used on `rental_client_refresh_failure_total`.
	pub const fn as_str(self) -> &'static str {
		match self {
			RefreshCause::Expired => "expired",
			RefreshCause::Unreachable => "unreachable",
		}
	}
}

/// Counts one client call stage on `rental_client_call_total{call, outcome}`.
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"rental_client_call_total",
		"call" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Counts a failed refresh on `rental_client_refresh_failure_total{cause}`.
pub fn record_refresh_failure(cause: RefreshCause) {
	#[cfg(feature = "metrics")]
	metrics::counter!("rental_client_refresh_failure_total", "cause" => cause.as_str())
		.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = cause;
}

/// Samples how many parked callers a single refresh released.
pub fn record_refresh_released(released: usize) {
	#[cfg(feature = "metrics")]
	metrics::histogram!("rental_client_refresh_released").record(released as f64);
	#[cfg(not(feature = "metrics"))]
	let _ = released;
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn refresh_causes_have_stable_labels() {
		assert_eq!(RefreshCause::Expired.as_str(), "expired");
		assert_eq!(RefreshCause::Unreachable.as_str(), "unreachable");
	}

	#[test]
	fn recorders_work_without_installed_recorder() {
		record_call_outcome(CallKind::Refresh, CallOutcome::Failure);
		record_refresh_failure(RefreshCause::Unreachable);
		record_refresh_released(3);
	}
}
