use tokio_util::sync::CancellationToken;

/// Cooperative stop request for a running scenario.
///
/// Observed between steps only: a step already in flight always runs to completion.
#[derive(Debug, Clone, Default)]
pub struct StopToken {
	cancel: CancellationToken,
}

impl StopToken {
	pub fn new() -> Self {
		Self::default()
	}

	/// Requests that no further step be started.
	pub fn stop(&self) {
		self.cancel.cancel();
	}

	pub fn is_stopped(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Future resolving once a stop is requested.
	pub async fn stopped(&self) {
		self.cancel.cancelled().await;
	}

	/// Token stopped together with this one, but which can also be stopped on its own.
	pub fn child(&self) -> Self {
		Self {
			cancel: self.cancel.child_token(),
		}
	}
}

impl From<CancellationToken> for StopToken {
	fn from(cancel: CancellationToken) -> Self {
		Self { cancel }
	}
}
