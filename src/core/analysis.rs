//! Single-shot analysis flows (contract, token, gas)
//!
//! Validate the address, call the backend once, fold the outcome into an
//! `AnalysisView` the way each screen keeps its loading/error/data state.

use std::sync::Arc;
use tracing::{info, warn};

use crate::models::errors::{AppResult, ErrorCode};
use crate::models::types::{AnalysisResult, GasAnalysisResult, TokenAnalysisResult};
use crate::providers::backend::AnalysisBackend;
use crate::utils::validation::validate_address;

/// Loading/error/data state of one analysis screen
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView<T> {
    pub is_loading: bool,
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> Default for AnalysisView<T> {
    fn default() -> Self {
        Self {
            is_loading: false,
            error: None,
            data: None,
        }
    }
}

impl<T> AnalysisView<T> {
    /// Request issued: show the spinner, clear the previous error
    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Fold a flow result into the view.
    ///
    /// Rejected input keeps whatever was displayed before; a backend failure
    /// clears it.
    pub fn update(&mut self, result: AppResult<T>) {
        self.is_loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(err) if err.code == ErrorCode::InvalidAddress => {
                self.error = Some(err.message);
            }
            Err(err) => {
                self.data = None;
                self.error = Some(err.message);
            }
        }
    }
}

/// Validate-then-call flows over any backend
pub struct AnalysisFlow<B: ?Sized> {
    backend: Arc<B>,
}

impl<B: AnalysisBackend + ?Sized> AnalysisFlow<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub async fn analyze_contract(&self, address: &str) -> AppResult<AnalysisResult> {
        validate_address(address).inspect_err(|e| warn!("🚫 {}: {}", address, e))?;
        let result = self.backend.submit_contract_analysis(address).await?;
        info!(
            "✅ Contract {} analysed: risk {:.0}, {} vulnerabilities",
            address,
            result.risk_score,
            result.vulnerabilities.len()
        );
        Ok(result)
    }

    pub async fn analyze_token(&self, address: &str) -> AppResult<TokenAnalysisResult> {
        validate_address(address).inspect_err(|e| warn!("🚫 {}: {}", address, e))?;
        let result = self.backend.fetch_token_analysis(address).await?;
        info!(
            "✅ Token {} analysed: {} ({})",
            address, result.risk_assessment.risk_level, result.basic_info.symbol
        );
        Ok(result)
    }

    pub async fn analyze_gas(&self, address: &str) -> AppResult<GasAnalysisResult> {
        validate_address(address).inspect_err(|e| warn!("🚫 {}: {}", address, e))?;
        let result = self.backend.fetch_gas_analysis(address).await?;
        info!(
            "✅ Gas for {} analysed: avg {:.0}",
            address, result.average_gas_used
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::HistoryQuery;
    use crate::models::errors::AppError;
    use crate::models::types::{HistoryResponse, PollStatus};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ADDR: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

    #[derive(Default)]
    struct CountingBackend {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl AnalysisBackend for CountingBackend {
        async fn submit_contract_analysis(&self, address: &str) -> AppResult<AnalysisResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::server("Contract not verified"));
            }
            Ok(AnalysisResult {
                contract_address: address.to_string(),
                risk_score: 42.0,
                ..Default::default()
            })
        }

        async fn fetch_token_analysis(&self, _address: &str) -> AppResult<TokenAnalysisResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TokenAnalysisResult::default())
        }

        async fn fetch_gas_analysis(&self, _address: &str) -> AppResult<GasAnalysisResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::network("Failed to get gas analysis"))
        }

        async fn request_contract_history(
            &self,
            _address: &str,
            _query: &HistoryQuery,
        ) -> AppResult<HistoryResponse> {
            unreachable!("history is not a single-shot flow")
        }

        async fn poll_history_status(&self, _a: &str, _t: &str) -> AppResult<PollStatus> {
            unreachable!("history is not a single-shot flow")
        }
    }

    #[tokio::test]
    async fn test_invalid_address_never_reaches_backend() {
        let backend = Arc::new(CountingBackend::default());
        let flow = AnalysisFlow::new(backend.clone());

        for bad in ["", "0x123", "not-an-address"] {
            assert!(flow.analyze_contract(bad).await.is_err());
            assert!(flow.analyze_token(bad).await.is_err());
            assert!(flow.analyze_gas(bad).await.is_err());
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_view_lifecycle() {
        let flow = AnalysisFlow::new(Arc::new(CountingBackend::default()));
        let mut view = AnalysisView::default();

        view.begin();
        assert!(view.is_loading);
        view.update(flow.analyze_contract(ADDR).await);
        assert!(!view.is_loading);
        assert_eq!(view.data.as_ref().map(|d| d.risk_score), Some(42.0));

        // Bad input keeps the previous report on screen
        view.update(flow.analyze_contract("0x1").await);
        assert_eq!(view.error.as_deref(), Some("Please enter a valid Ethereum address"));
        assert!(view.data.is_some());
    }

    #[tokio::test]
    async fn test_backend_failure_clears_data() {
        let flow = AnalysisFlow::new(Arc::new(CountingBackend {
            fail: true,
            ..Default::default()
        }));
        let mut view = AnalysisView {
            data: Some(AnalysisResult::default()),
            ..Default::default()
        };
        view.update(flow.analyze_contract(ADDR).await);
        assert!(view.data.is_none());
        assert_eq!(view.error.as_deref(), Some("Contract not verified"));

        let mut gas_view = AnalysisView::default();
        gas_view.update(flow.analyze_gas(ADDR).await);
        assert_eq!(gas_view.error.as_deref(), Some("Failed to get gas analysis"));
    }
}
