use crate::error::{ErrorKind, Result};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Cooperative cancellation for scans.
///
/// Scans check the handle before each step and stop with
/// [`ErrorKind::Halted`] once it is set. A step already under way (reading
/// one file's tags, say) always finishes first. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct Halt {
    token: CancellationToken,
}
impl Halt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Halt when something is sent on `signal`.
    ///
    /// Spawns a listener task. Dropping the sender without sending leaves the
    /// scan running.
    pub fn listen(signal: oneshot::Receiver<()>) -> Self {
        let halt = Self::new();
        let token = halt.token.clone();
        tokio::spawn(async move {
            tokio::select! {
                received = signal => {
                    if received.is_ok() {
                        tracing::info!("Halt requested");
                        token.cancel();
                    }
                },
                () = token.cancelled() => {},
            }
        });
        halt
    }

    pub fn halt(&self) {
        self.token.cancel();
    }

    pub fn is_halted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until halted.
    pub async fn halted(&self) {
        self.token.cancelled().await;
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.is_halted() {
            exn::bail!(ErrorKind::Halted);
        }
        Ok(())
    }
}
