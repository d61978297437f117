//! Where the connectivity flag comes from.
//!
//! The header never talks to the feed itself. A [`FeedMonitor`] owns the
//! latest flag in a watch channel, fed either by a background TCP probe or
//! by hand. Readers only ever see the most recent value.

use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::connectivity::Connectivity;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid feed address {0:?}, expected host:port")]
    InvalidAddress(String),

    #[error("feed {address} did not answer within {timeout:?}")]
    Timeout { address: String, timeout: Duration },

    #[error("feed {address} is unreachable: {source}")]
    Unreachable {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Checks whether the feed endpoint accepts TCP connections.
#[derive(Debug, Clone)]
pub struct FeedProbe {
    address: String,
    timeout: Duration,
}

impl FeedProbe {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let address = address.into();
        let valid = address
            .rsplit_once(':')
            .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
        if !valid {
            return Err(FeedError::InvalidAddress(address));
        }
        Ok(Self { address, timeout })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn check(&self) -> Result<(), FeedError> {
        match tokio::time::timeout(self.timeout, TcpStream::connect(self.address.as_str())).await
        {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(source)) => Err(FeedError::Unreachable {
                address: self.address.clone(),
                source,
            }),
            Err(_) => Err(FeedError::Timeout {
                address: self.address.clone(),
                timeout: self.timeout,
            }),
        }
    }
}

/// Holds the latest connectivity flag.
///
/// `None` means nothing has been reported yet and reads as disconnected.
#[derive(Debug)]
pub struct FeedMonitor {
    rx: watch::Receiver<Option<bool>>,
    manual: Option<watch::Sender<Option<bool>>>,
    source: String,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl FeedMonitor {
    /// Probe `probe` every `interval` on a background task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(probe: FeedProbe, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let source = probe.address().to_string();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let result = tokio::select! {
                    _ = token.cancelled() => break,
                    result = probe.check() => result,
                };
                let live = match result {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::debug!(error = %e, "feed probe failed");
                        false
                    }
                };

                let changed = tx.send_if_modified(|current| {
                    if *current == Some(live) {
                        return false;
                    }
                    *current = Some(live);
                    true
                });
                if changed {
                    tracing::info!(address = %probe.address(), live, "feed probe state changed");
                }

                if tx.is_closed() {
                    break;
                }
            }

            tracing::debug!(address = %probe.address(), "feed probe stopped");
        });

        Self {
            rx,
            manual: None,
            source,
            cancel,
            task: Some(task),
        }
    }

    /// A feed driven by [`FeedMonitor::set`].
    pub fn manual(initial: bool) -> Self {
        let (tx, rx) = watch::channel(Some(initial));
        Self {
            rx,
            manual: Some(tx),
            source: "manual".to_string(),
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    pub fn latest(&self) -> Connectivity {
        Connectivity::from(*self.rx.borrow())
    }

    pub fn is_manual(&self) -> bool {
        self.manual.is_some()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Publish a flag by hand. Returns `false` for probed feeds, which
    /// cannot be overridden.
    pub fn set(&self, connected: bool) -> bool {
        match &self.manual {
            Some(tx) => {
                tx.send_replace(Some(connected));
                true
            }
            None => false,
        }
    }

    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("feed probe task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for FeedMonitor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
