//! Single-flight gate that parks callers behind the refresh currently in flight.

// std
use std::mem;
// crates.io
use tokio::sync::oneshot;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{SessionExpired, TransportError},
};

/// Outcome fanned out to every caller parked behind a refresh.
pub(crate) type RefreshOutcome = std::result::Result<TokenSecret, RefreshFailure>;

/// Why a refresh produced no token, in a form every parked caller can receive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum RefreshFailure {
	/// The session ended; credentials are already cleared.
	Expired(SessionExpired),
	/// The refresh call never got an answer; credentials are kept.
	Unreachable(String),
}
impl RefreshFailure {
	pub(crate) fn expired(reason: impl Into<String>) -> Self {
		Self::Expired(SessionExpired::new(reason))
	}

	/// Converts the shared failure into the error a parked caller returns.
	pub(crate) fn into_error(self) -> Error {
		match self {
			Self::Expired(e) => e.into(),
			Self::Unreachable(message) => TransportError::RefreshInterrupted { message }.into(),
		}
	}
}

/// Either `Idle` or `Refreshing` with the FIFO queue of parked callers.
#[derive(Debug, Default)]
pub(crate) struct RefreshGate {
	state: Mutex<GateState>,
}
impl RefreshGate {
	/// Makes the caller the refresh leader, or parks it behind the current leader.
	///
	/// The state check and the transition happen under one lock, so two callers can never both
	/// become leader.
	pub(crate) fn admit(&self) -> Admission<'_> {
		let mut state = self.state.lock();

		if let GateState::Refreshing { waiters } = &mut *state {
			let (tx, rx) = oneshot::channel();

			waiters.push_back(tx);

			return Admission::Waiter(rx);
		}

		*state = GateState::Refreshing { waiters: VecDeque::new() };

		Admission::Leader(RefreshLease { gate: self, settled: false })
	}

	pub(crate) fn is_refreshing(&self) -> bool {
		matches!(*self.state.lock(), GateState::Refreshing { .. })
	}

	pub(crate) fn pending(&self) -> usize {
		match &*self.state.lock() {
			GateState::Idle => 0,
			GateState::Refreshing { waiters } => waiters.len(),
		}
	}

	fn release(&self, outcome: &RefreshOutcome) -> usize {
		let waiters = match mem::take(&mut *self.state.lock()) {
			GateState::Idle => VecDeque::new(),
			GateState::Refreshing { waiters } => waiters,
		};
		let released = waiters.len();

		for waiter in waiters {
			// A waiter whose future was dropped no longer needs the outcome.
			let _ = waiter.send(outcome.clone());
		}

		released
	}
}

#[derive(Debug, Default)]
enum GateState {
	#[default]
	Idle,
	Refreshing {
		waiters: VecDeque<oneshot::Sender<RefreshOutcome>>,
	},
}

/// Result of [`RefreshGate::admit`].
pub(crate) enum Admission<'a> {
	/// The caller runs the refresh and must settle the lease.
	Leader(RefreshLease<'a>),
	/// The caller waits for the leader's outcome.
	Waiter(oneshot::Receiver<RefreshOutcome>),
}

/// Leadership over one refresh; dropping it unsettled rejects every parked caller.
pub(crate) struct RefreshLease<'a> {
	gate: &'a RefreshGate,
	settled: bool,
}
impl RefreshLease<'_> {
	/// Resets the gate to idle and resumes parked callers in arrival order.
	pub(crate) fn settle(mut self, outcome: &RefreshOutcome) -> usize {
		self.settled = true;

		self.gate.release(outcome)
	}
}
impl Drop for RefreshLease<'_> {
	fn drop(&mut self) {
		if !self.settled {
			self.gate.release(&Err(RefreshFailure::expired("token refresh was abandoned")));
		}
	}
}

/// Awaits a parked caller's outcome; a vanished leader counts as an expired session.
pub(crate) async fn wait(receiver: oneshot::Receiver<RefreshOutcome>) -> RefreshOutcome {
	receiver
		.await
		.unwrap_or_else(|_| Err(RefreshFailure::expired("token refresh ended without an outcome")))
}
