//! KYC document-status poller
//!
//! Creates the signing document for an identity, then checks its status on
//! a fixed interval until it reaches a terminal status. The timer task and
//! in-flight calls can outlive the owning view, so every state update checks
//! the mounted flag first, and teardown clears the timer unconditionally.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::model::{Identity, KycPhase, KycSession, KycStatus};
use super::service::KycApi;
use crate::downloads::FileDownloader;
use crate::error::{SyncError, SyncResult};
use crate::notify::{Toast, ToastSink};

/// Observed interval of the status check
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(6);

struct Shared {
    api: Arc<dyn KycApi>,
    toasts: Arc<dyn ToastSink>,
    mounted: AtomicBool,
    completion_announced: AtomicBool,
    session: watch::Sender<KycSession>,
}

impl Shared {
    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Apply one status tick. Returns whether polling should stop.
    fn record_status(&self, status: KycStatus) -> bool {
        let terminal = status.is_terminal();
        self.session.send_modify(|s| {
            s.status = status;
            if terminal {
                s.is_polling = false;
                s.phase = KycPhase::Finished;
            }
        });

        if status == KycStatus::Completed && !self.completion_announced.swap(true, Ordering::SeqCst)
        {
            self.toasts
                .push(Toast::success("Your identity verification document has been signed"));
        }
        terminal
    }
}

/// Polling resource for the KYC document signing status
pub struct KycPoller {
    shared: Arc<Shared>,
    downloader: Arc<dyn FileDownloader>,
    interval: Duration,
    identity: Mutex<Option<Identity>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl KycPoller {
    pub fn new(
        api: Arc<dyn KycApi>,
        toasts: Arc<dyn ToastSink>,
        downloader: Arc<dyn FileDownloader>,
    ) -> Self {
        let (session, _rx) = watch::channel(KycSession::default());
        Self {
            shared: Arc::new(Shared {
                api,
                toasts,
                mounted: AtomicBool::new(true),
                completion_announced: AtomicBool::new(false),
                session,
            }),
            downloader,
            interval: DEFAULT_POLL_INTERVAL,
            identity: Mutex::new(None),
            timer: Mutex::new(None),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn session(&self) -> KycSession {
        self.shared.session.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<KycSession> {
        self.shared.session.subscribe()
    }

    pub fn is_polling(&self) -> bool {
        self.timer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Create the signing document and start polling its status.
    ///
    /// Returns `Ok(false)` and stays uninitialized when the identity is
    /// incomplete. A failed creation call moves the session to `Failed`,
    /// raises a toast and is not retried automatically.
    pub async fn initialize(&self, identity: Identity) -> SyncResult<bool> {
        if !self.shared.is_mounted() {
            return Err(SyncError::InvalidState("KYC view was torn down".to_string()));
        }
        if !identity.is_complete() {
            tracing::debug!("KYC identity incomplete, waiting");
            return Ok(false);
        }

        *self.identity.lock().unwrap_or_else(|e| e.into_inner()) = Some(identity.clone());
        self.stop_polling();
        self.shared.completion_announced.store(false, Ordering::SeqCst);
        self.shared.session.send_replace(KycSession {
            phase: KycPhase::Requesting,
            ..KycSession::default()
        });

        match self.shared.api.create_document(&identity).await {
            Ok(created) => {
                if !self.shared.is_mounted() {
                    return Ok(false);
                }
                tracing::info!(request_id = %created.request_id, "KYC document created");
                self.shared.session.send_modify(|s| {
                    s.phase = KycPhase::Active;
                    s.signing_url = Some(created.signing_url.clone());
                    s.request_id = Some(created.request_id.clone());
                });
                self.start_polling(&created.request_id);
                Ok(true)
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to create KYC document");
                if self.shared.is_mounted() {
                    self.shared.session.send_modify(|s| {
                        s.phase = KycPhase::Failed;
                        s.error = Some(err.to_string());
                    });
                    self.shared.toasts.push(
                        Toast::error("We couldn't start identity verification")
                            .with_action("Try Again"),
                    );
                }
                Err(err)
            }
        }
    }

    /// Run `initialize` again with the last identity (the "Try Again" control)
    pub async fn retry(&self) -> SyncResult<bool> {
        let identity = self.identity.lock().unwrap_or_else(|e| e.into_inner()).clone();
        match identity {
            Some(identity) => self.initialize(identity).await,
            None => Ok(false),
        }
    }

    /// Check `request_id` every interval until a terminal status.
    ///
    /// The first check happens one interval after the call. Failed checks
    /// are logged and polling continues on the next tick.
    pub fn start_polling(&self, request_id: &str) {
        self.stop_polling();
        if !self.shared.is_mounted() {
            return;
        }

        let request_id = request_id.to_string();
        self.shared.session.send_modify(|s| {
            s.request_id = Some(request_id.clone());
            s.is_polling = true;
            s.phase = KycPhase::Active;
        });

        let shared = Arc::clone(&self.shared);
        let period = self.interval;
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if !shared.is_mounted() {
                    break;
                }
                match shared.api.document_status(&request_id).await {
                    Ok(status) => {
                        if !shared.is_mounted() {
                            break;
                        }
                        tracing::debug!(request_id = %request_id, status = status.as_str(), "KYC status checked");
                        if shared.record_status(status) {
                            tracing::info!(request_id = %request_id, status = status.as_str(), "KYC polling finished");
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(request_id = %request_id, error = %err, "KYC status check failed");
                    }
                }
            }
        });

        *self.timer.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
    }

    /// Clear the timer. Safe to call at any time.
    pub fn stop_polling(&self) {
        let handle = self.timer.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(handle) = handle {
            handle.abort();
            if self.shared.is_mounted() {
                self.shared.session.send_if_modified(|s| {
                    let was_polling = s.is_polling;
                    s.is_polling = false;
                    was_polling
                });
            }
        }
    }

    /// Fetch the signed document and hand it to the downloader.
    /// Only valid once the status is `completed`.
    pub async fn download_document(&self) -> SyncResult<std::path::PathBuf> {
        let session = self.session();
        if session.status != KycStatus::Completed {
            return Err(SyncError::InvalidState(format!(
                "Document is not ready (status: {})",
                session.status.as_str()
            )));
        }
        let request_id = session
            .request_id
            .ok_or_else(|| SyncError::InvalidState("No KYC request in progress".to_string()))?;

        let url = self.shared.api.document_download_url(&request_id).await?;
        self.downloader.download(&url).await
    }

    /// Stop everything; later callbacks become no-ops
    pub fn teardown(&self) {
        self.stop_polling();
        self.shared.mounted.store(false, Ordering::SeqCst);
    }
}

impl Drop for KycPoller {
    fn drop(&mut self) {
        self.teardown();
    }
}
