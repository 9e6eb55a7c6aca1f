//! History Polling Controller
//!
//! Drives one contract-history request through its lifecycle:
//!
//! ```text
//! Idle -> Submitting -> ImmediateDone
//!                    -> Pending                (caller did not ask to wait)
//!                    -> Polling -> Completed | Failed | TimedOut
//!                    -> Failed                 (validation, transport, shape)
//! ```
//!
//! A session owns at most one background poll task. The task is aborted on
//! teardown and on drop, and every state it publishes goes through a gate
//! that teardown closes first, so nothing is observable after teardown.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::config::{AnalysisConfig, ClientConfig, HistoryQuery};
use crate::models::errors::AppError;
use crate::models::types::{AnalysisOutcome, HistoryResponse, HistoryResult, PollStatus, TaskHandle};
use crate::providers::backend::AnalysisBackend;
use crate::utils::constants::{MAX_POLL_ATTEMPTS, MSG_ANALYSIS_FAILED, POLL_INTERVAL_MS};
use crate::utils::validation::validate_address;

// ============================================
// Session State
// ============================================

/// Observable state of a history session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Submitting,
    ImmediateDone(HistoryResult),
    /// Deferred and not polled; the preview is all this call will show
    Pending {
        preview: Option<HistoryResult>,
        handle: TaskHandle,
    },
    Polling {
        preview: Option<HistoryResult>,
        handle: TaskHandle,
        attempts: u32,
    },
    Completed(HistoryResult),
    /// Any preview received before the failure stays available for display
    Failed {
        error: AppError,
        preview: Option<HistoryResult>,
    },
    TimedOut {
        message: String,
        preview: Option<HistoryResult>,
    },
}

impl SessionState {
    /// Failure with nothing to show alongside it
    pub fn failed(error: AppError) -> Self {
        SessionState::Failed {
            error,
            preview: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::ImmediateDone(_)
                | SessionState::Completed(_)
                | SessionState::Failed { .. }
                | SessionState::TimedOut { .. }
        )
    }

    /// Nothing more will happen without a new request
    pub fn is_settled(&self) -> bool {
        self.is_terminal() || matches!(self, SessionState::Pending { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Submitting | SessionState::Polling { .. })
    }

    /// Result to display: the final one, or the preview while deferred
    pub fn data(&self) -> Option<&HistoryResult> {
        match self {
            SessionState::ImmediateDone(r) | SessionState::Completed(r) => Some(r),
            SessionState::Pending { preview, .. }
            | SessionState::Polling { preview, .. }
            | SessionState::Failed { preview, .. }
            | SessionState::TimedOut { preview, .. } => preview.as_ref(),
            SessionState::Idle | SessionState::Submitting => None,
        }
    }

    pub fn task_handle(&self) -> Option<&TaskHandle> {
        match self {
            SessionState::Pending { handle, .. } | SessionState::Polling { handle, .. } => {
                Some(handle)
            }
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SessionState::Failed { error, .. } => Some(&error.message),
            SessionState::TimedOut { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            SessionState::Polling { attempts, .. } => *attempts,
            _ => 0,
        }
    }

    /// Tagged outcome once the session has settled
    pub fn outcome(&self) -> Option<AnalysisOutcome> {
        Some(match self {
            SessionState::ImmediateDone(r) => AnalysisOutcome::Immediate(r.clone()),
            SessionState::Pending { preview, handle } => AnalysisOutcome::Pending {
                preview: preview.clone(),
                handle: handle.clone(),
            },
            SessionState::Completed(r) => AnalysisOutcome::Completed(r.clone()),
            SessionState::Failed { error, .. } => AnalysisOutcome::Failed(error.clone()),
            SessionState::TimedOut { .. } => AnalysisOutcome::TimedOut,
            SessionState::Idle | SessionState::Submitting | SessionState::Polling { .. } => {
                return None
            }
        })
    }
}

// ============================================
// Publisher
// ============================================

/// Single writer of a session's state
struct Publisher {
    tx: watch::Sender<SessionState>,
    closed: Mutex<bool>,
}

impl Publisher {
    fn new() -> (Arc<Self>, watch::Receiver<SessionState>) {
        let (tx, rx) = watch::channel(SessionState::Idle);
        let publisher = Arc::new(Self {
            tx,
            closed: Mutex::new(false),
        });
        (publisher, rx)
    }

    /// Returns false once the session has been torn down
    fn publish(&self, state: SessionState) -> bool {
        let closed = self.closed.lock().unwrap_or_else(|p| p.into_inner());
        if *closed {
            return false;
        }
        self.tx.send_replace(state);
        true
    }

    fn close(&self) {
        let mut closed = self.closed.lock().unwrap_or_else(|p| p.into_inner());
        *closed = true;
    }

    fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap_or_else(|p| p.into_inner())
    }
}

// ============================================
// History Session
// ============================================

/// One history request for one address, owned by whoever submitted it
pub struct HistorySession {
    address: String,
    state: watch::Receiver<SessionState>,
    publisher: Arc<Publisher>,
    task: Option<JoinHandle<()>>,
    cancelled: bool,
}

impl HistorySession {
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Watch every transition published from here on
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    pub fn is_polling(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Wait until the session settles and return that state.
    ///
    /// After teardown this returns the last state seen.
    pub async fn wait_for_terminal(&mut self) -> SessionState {
        loop {
            {
                let cancelled = self.cancelled;
                let current = self.state.borrow_and_update();
                if current.is_settled() || cancelled {
                    return current.clone();
                }
            }
            if self.state.changed().await.is_err() {
                return self.state.borrow().clone();
            }
        }
    }

    /// Tagged outcome, if the session has settled
    pub fn outcome(&self) -> Option<AnalysisOutcome> {
        self.state.borrow().outcome()
    }

    /// Stop polling now. Idempotent.
    pub fn teardown(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.publisher.close();
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                debug!("🛑 Polling for {} cancelled", self.address);
            }
            task.abort();
        }
    }
}

impl Drop for HistorySession {
    fn drop(&mut self) {
        self.teardown();
    }
}

// ============================================
// Polling Controller
// ============================================

/// Submits history requests and polls deferred ones
pub struct PollingController<B: ?Sized> {
    backend: Arc<B>,
    poll_interval: Duration,
    max_attempts: u32,
}

impl<B: AnalysisBackend + ?Sized + 'static> PollingController<B> {
    /// Controller with the default 2000 ms interval and 30-attempt ceiling
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }

    /// Controller using the polling settings of a client configuration
    pub fn with_config(backend: Arc<B>, config: &ClientConfig) -> Self {
        Self {
            backend,
            poll_interval: config.poll_interval,
            max_attempts: config.max_poll_attempts,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Submit a history request.
    ///
    /// Returns once the first response is in. If the work was deferred and
    /// `wait` is set, polling continues in the background of the returned
    /// session.
    pub async fn submit(&self, address: &str, config: &AnalysisConfig, wait: bool) -> HistorySession {
        let (publisher, state) = Publisher::new();
        let mut session = HistorySession {
            address: address.to_string(),
            state,
            publisher: publisher.clone(),
            task: None,
            cancelled: false,
        };

        if let Err(err) = validate_address(address) {
            warn!("🚫 {}: {}", address, err);
            publisher.publish(SessionState::failed(err));
            return session;
        }

        publisher.publish(SessionState::Submitting);
        let query = HistoryQuery::new(config, wait);

        match self.backend.request_contract_history(address, &query).await {
            Ok(HistoryResponse::Immediate(result)) => {
                info!("✅ History for {} returned immediately", address);
                publisher.publish(SessionState::ImmediateDone(result));
            }
            Ok(HistoryResponse::Pending(pending)) => {
                info!(
                    "⏳ History for {} deferred as task {} (~{}s)",
                    address, pending.handle.task_id, pending.handle.estimated_completion_secs
                );
                if !wait {
                    publisher.publish(SessionState::Pending {
                        preview: pending.quick_overview,
                        handle: pending.handle,
                    });
                    return session;
                }

                publisher.publish(SessionState::Polling {
                    preview: pending.quick_overview.clone(),
                    handle: pending.handle.clone(),
                    attempts: 0,
                });
                let poller = Poller {
                    backend: self.backend.clone(),
                    publisher,
                    address: address.to_string(),
                    handle: pending.handle,
                    preview: pending.quick_overview,
                    interval: self.poll_interval,
                    max_attempts: self.max_attempts,
                };
                session.task = Some(tokio::spawn(poller.run()));
            }
            Err(err) => {
                warn!("❌ History request for {} failed: {}", address, err);
                publisher.publish(SessionState::failed(err));
            }
        }

        session
    }

    /// Submit and wait for the session to settle
    pub async fn run(&self, address: &str, config: &AnalysisConfig, wait: bool) -> AnalysisOutcome {
        let mut session = self.submit(address, config, wait).await;
        let state = session.wait_for_terminal().await;
        state
            .outcome()
            .unwrap_or_else(|| AnalysisOutcome::Failed(AppError::analysis_failed(MSG_ANALYSIS_FAILED)))
    }
}

/// Background status checks of one deferred task
struct Poller<B: ?Sized> {
    backend: Arc<B>,
    publisher: Arc<Publisher>,
    address: String,
    handle: TaskHandle,
    preview: Option<HistoryResult>,
    interval: Duration,
    max_attempts: u32,
}

impl<B: AnalysisBackend + ?Sized> Poller<B> {
    async fn run(self) {
        for attempt in 1..=self.max_attempts {
            tokio::time::sleep(self.interval).await;
            if self.publisher.is_closed() {
                return;
            }

            let status = self
                .backend
                .poll_history_status(&self.address, &self.handle.task_id)
                .await;

            let next = match status {
                Ok(PollStatus::InProgress(status)) => {
                    debug!(
                        "⏳ Task {} is {} ({}/{})",
                        self.handle.task_id, status, attempt, self.max_attempts
                    );
                    SessionState::Polling {
                        preview: self.preview.clone(),
                        handle: self.handle.clone(),
                        attempts: attempt,
                    }
                }
                Ok(PollStatus::Completed(result)) => {
                    info!("✅ Task {} completed after {} checks", self.handle.task_id, attempt);
                    self.publisher.publish(SessionState::Completed(result));
                    return;
                }
                Ok(PollStatus::Failed(reason)) => {
                    let reason = reason.unwrap_or_else(|| MSG_ANALYSIS_FAILED.to_string());
                    warn!("❌ Task {} failed: {}", self.handle.task_id, reason);
                    self.publisher.publish(SessionState::Failed {
                        error: AppError::analysis_failed(reason),
                        preview: self.preview,
                    });
                    return;
                }
                Err(err) => {
                    warn!("❌ Status check for task {} failed: {}", self.handle.task_id, err);
                    self.publisher.publish(SessionState::Failed {
                        error: err,
                        preview: self.preview,
                    });
                    return;
                }
            };

            if !self.publisher.publish(next) {
                return;
            }
        }

        let err = AppError::poll_timeout();
        warn!(
            "⌛ Task {} unresolved after {} checks [{}]",
            self.handle.task_id,
            self.max_attempts,
            err.code_str()
        );
        self.publisher.publish(SessionState::TimedOut {
            message: err.message,
            preview: self.preview,
        });
    }
}
