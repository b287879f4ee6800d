//! Ctrl-C tracking for the lifetime of a run
//!
//! A single listener records the first Ctrl-C. The pipeline races against
//! `cancelled()` while pricing, and `check()` is called between the later
//! steps so a Ctrl-C pressed after pricing still ends the run.

use crate::error::{PricectlError, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Clone, Debug)]
pub struct Interrupt {
    state: Arc<watch::Sender<bool>>,
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}

impl Interrupt {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// Spawn the Ctrl-C listener. Must be called inside a tokio runtime.
    pub fn listen(&self) -> JoinHandle<()> {
        let interrupt = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    debug!("Ctrl-C received");
                    interrupt.trigger();
                }
                Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
            }
        })
    }

    pub fn trigger(&self) {
        self.state.send_replace(true);
    }

    pub fn is_set(&self) -> bool {
        *self.state.borrow()
    }

    /// `Err(Interrupted)` once Ctrl-C has been pressed
    pub fn check(&self) -> Result<()> {
        if self.is_set() {
            Err(PricectlError::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Resolves once Ctrl-C has been pressed
    pub async fn cancelled(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so this only fails after a trigger
        let _ = rx.wait_for(|set| *set).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_check_fails_after_trigger() {
        let interrupt = Interrupt::new();
        assert!(interrupt.check().is_ok());

        interrupt.clone().trigger();
        assert!(interrupt.is_set());
        assert!(matches!(interrupt.check(), Err(PricectlError::Interrupted)));
    }

    #[tokio::test]
    async fn test_cancelled_wakes_on_trigger() {
        let interrupt = Interrupt::new();
        let trigger = interrupt.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.trigger();
        });

        tokio::time::timeout(Duration::from_secs(5), interrupt.cancelled())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_after_trigger_returns_immediately() {
        let interrupt = Interrupt::new();
        interrupt.trigger();
        tokio::time::timeout(Duration::from_millis(100), interrupt.cancelled())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_pending_until_triggered() {
        let interrupt = Interrupt::new();
        let waited =
            tokio::time::timeout(Duration::from_millis(20), interrupt.cancelled()).await;
        assert!(waited.is_err());
    }
}
