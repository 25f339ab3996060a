//! # Bridge Readiness
//!
//! The native bridge announces once that its plugins are loaded. Anything
//! that needs the bridge (the back-button listener, the notification
//! channel) awaits that announcement instead of polling on a timer.
//!
//! ```text
//! let (notifier, waiter) = bridge_ready();
//! tokio::spawn(register_when_ready(waiter, || install_back_handler()));
//! // ... later, from the bridge integration:
//! notifier.mark_ready();
//! ```

use log::{debug, warn};
use std::fmt;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The notifier was dropped without ever signalling.
    Closed,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Closed => write!(f, "bridge went away before becoming ready"),
        }
    }
}

impl std::error::Error for BridgeError {}

/// Held by the bridge integration; signals readiness once.
pub struct ReadyNotifier {
    tx: watch::Sender<bool>,
}

impl ReadyNotifier {
    pub fn mark_ready(&self) {
        if !self.tx.send_replace(true) {
            debug!("Bridge ready");
        }
    }
}

/// Cloneable handle for anyone waiting on the bridge.
#[derive(Clone)]
pub struct ReadyWaiter {
    rx: watch::Receiver<bool>,
}

impl ReadyWaiter {
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves as soon as the bridge is ready, immediately if it already is.
    pub async fn wait(mut self) -> Result<(), BridgeError> {
        self.rx
            .wait_for(|ready| *ready)
            .await
            .map(|_| ())
            .map_err(|_| BridgeError::Closed)
    }
}

pub fn bridge_ready() -> (ReadyNotifier, ReadyWaiter) {
    let (tx, rx) = watch::channel(false);
    (ReadyNotifier { tx }, ReadyWaiter { rx })
}

/// Runs `register` exactly once, after the bridge is ready.
pub async fn register_when_ready<F, T>(waiter: ReadyWaiter, register: F) -> Result<T, BridgeError>
where
    F: FnOnce() -> T,
{
    match waiter.wait().await {
        Ok(()) => Ok(register()),
        Err(e) => {
            warn!("Skipping registration: {e}");
            Err(e)
        }
    }
}
