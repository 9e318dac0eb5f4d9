//! Host credential service and the periodic status poller.

use crate::error::Result;
use crate::image::providers::api_key_from_env;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Where the professional-tier credential lives.
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Returns true if a credential is currently configured.
    async fn has_credential(&self) -> bool;

    /// Opens the host's credential picker.
    ///
    /// The outcome is observed through a later [`has_credential`](Self::has_credential).
    async fn open_picker(&self) -> Result<()>;
}

/// Credential read from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

#[async_trait]
impl CredentialService for EnvCredentials {
    async fn has_credential(&self) -> bool {
        api_key_from_env().is_some()
    }

    async fn open_picker(&self) -> Result<()> {
        // No interactive picker outside a host page.
        tracing::info!("set GOOGLE_API_KEY (or API_KEY) to enable the professional tier");
        Ok(())
    }
}

/// Periodically mirrors [`CredentialService::has_credential`] into a flag.
///
/// The flag is display state only. Stopped by [`stop`](Self::stop) or on drop.
#[derive(Debug)]
pub struct CredentialPoller {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl CredentialPoller {
    /// Spawns the poll loop on the current tokio runtime.
    ///
    /// The first check runs immediately.
    pub fn start(
        service: Arc<dyn CredentialService>,
        flag: Arc<AtomicBool>,
        every: Duration,
    ) -> Self {
        let (shutdown, mut stopped) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let present = service.has_credential().await;
                        let previous = flag.swap(present, Ordering::Relaxed);
                        if previous != present {
                            tracing::debug!(present, "credential status changed");
                        }
                    }
                    changed = stopped.changed() => {
                        if changed.is_err() || *stopped.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Returns true until the loop has been stopped.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the loop and waits for it to exit.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for CredentialPoller {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    /// Switchable credential with call counters.
    #[derive(Default)]
    pub(crate) struct FakeCredentials {
        pub(crate) present: AtomicBool,
        pub(crate) picker_opened: AtomicUsize,
        pub(crate) checks: AtomicUsize,
        /// When set, opening the picker configures a credential.
        pub(crate) picker_configures: bool,
    }

    impl FakeCredentials {
        pub(crate) fn with(present: bool) -> Self {
            Self {
                present: AtomicBool::new(present),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl CredentialService for FakeCredentials {
        async fn has_credential(&self) -> bool {
            self.checks.fetch_add(1, Ordering::SeqCst);
            self.present.load(Ordering::SeqCst)
        }

        async fn open_picker(&self) -> Result<()> {
            self.picker_opened.fetch_add(1, Ordering::SeqCst);
            if self.picker_configures {
                self.present.store(true, Ordering::SeqCst);
            }
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_tracks_changes() {
        let service = Arc::new(FakeCredentials::with(false));
        let flag = Arc::new(AtomicBool::new(false));
        let poller = CredentialPoller::start(service.clone(), flag.clone(), Duration::from_secs(2));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!flag.load(Ordering::SeqCst));

        service.present.store(true, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(flag.load(Ordering::SeqCst));
        assert!(poller.is_running());

        poller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_stops() {
        let service = Arc::new(FakeCredentials::with(true));
        let flag = Arc::new(AtomicBool::new(false));
        let poller = CredentialPoller::start(service.clone(), flag, Duration::from_secs(2));

        tokio::time::sleep(Duration::from_millis(10)).await;
        poller.stop().await;
        let checks = service.checks.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(service.checks.load(Ordering::SeqCst), checks);
    }
}
