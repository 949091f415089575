//! Ledger REST gateway.
//!
//! Talks to a fullnode REST API: `POST {node}/view` for reads and
//! `GET {node}/transactions/by_hash/{hash}` polling for confirmation.
//! Submission goes through an injected [`TransactionSigner`].

use crate::config::{ConfigError, QuoteSyncConfig};
use crate::domain::{
    ConfirmedTransaction, EntryFunctionPayload, GatewayError, PendingTransaction, TxHash,
    ViewRequest,
};
use crate::ports::{LedgerGateway, TransactionSigner};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const PENDING_TRANSACTION: &str = "pending_transaction";

/// Error body returned by the node.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    vm_error_code: Option<u64>,
}

/// Subset of the transaction resource used for confirmation.
#[derive(Debug, Deserialize)]
struct TransactionResource {
    #[serde(rename = "type")]
    tx_type: String,
    hash: String,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    vm_status: Option<String>,
}

/// REST implementation of [`LedgerGateway`].
pub struct RestLedgerGateway {
    base_url: String,
    client: reqwest::Client,
    signer: Option<Arc<dyn TransactionSigner>>,
    poll_interval: Duration,
    confirmation_timeout: Option<Duration>,
}

impl RestLedgerGateway {
    /// Gateway for `config.node_url`, read-only until a signer is attached.
    pub fn new(config: &QuoteSyncConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("quote-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: config.node_url.trim_end_matches('/').to_string(),
            client,
            signer: None,
            poll_interval: config.confirmation_poll_interval(),
            confirmation_timeout: config.confirmation_timeout(),
        })
    }

    /// Attach the signer used by `submit`.
    pub fn with_signer(mut self, signer: Arc<dyn TransactionSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn transaction_endpoint(&self, hash: &TxHash) -> String {
        self.endpoint(&format!("transactions/by_hash/{hash}"))
    }

    /// One confirmation poll. `None` while still pending.
    async fn poll_once(&self, hash: &TxHash) -> Result<Option<ConfirmedTransaction>, GatewayError> {
        let response = self
            .client
            .get(self.transaction_endpoint(hash))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return match map_error_body(status.as_u16(), &body) {
                // Not indexed yet.
                GatewayError::ResourceNotFound(_) => Ok(None),
                err => Err(err),
            };
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|e| GatewayError::Malformed(e.to_string()))?;
        parse_transaction(&value)
    }

    async fn poll_until_committed(
        &self,
        hash: &TxHash,
    ) -> Result<ConfirmedTransaction, GatewayError> {
        loop {
            if let Some(confirmed) = self.poll_once(hash).await? {
                return Ok(confirmed);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl LedgerGateway for RestLedgerGateway {
    async fn view(&self, request: &ViewRequest) -> Result<Value, GatewayError> {
        debug!(function = %request.function, "POST /view");

        let response = self
            .client
            .post(self.endpoint("view"))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(map_error_body(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|e| GatewayError::Malformed(e.to_string()))
    }

    async fn submit(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction, GatewayError> {
        let signer = self.signer.as_ref().ok_or(GatewayError::SignerUnavailable)?;
        signer.sign_and_submit(payload).await
    }

    async fn await_confirmation(
        &self,
        pending: &PendingTransaction,
    ) -> Result<ConfirmedTransaction, GatewayError> {
        debug!(hash = %pending.hash, "Waiting for transaction");

        match self.confirmation_timeout {
            Some(limit) => tokio::time::timeout(limit, self.poll_until_committed(&pending.hash))
                .await
                .map_err(|_| {
                    warn!(hash = %pending.hash, ?limit, "Confirmation timed out");
                    GatewayError::Timeout(pending.hash.to_string())
                })?,
            None => self.poll_until_committed(&pending.hash).await,
        }
    }
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout(err.to_string())
    } else {
        GatewayError::Network(err.to_string())
    }
}

/// Classify a non-success node response.
pub fn map_error_body(status: u16, body: &str) -> GatewayError {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let message = parsed
        .as_ref()
        .map(|b| b.message.clone())
        .unwrap_or_else(|| body.to_string());
    let error_code = parsed.as_ref().and_then(|b| b.error_code.as_deref());

    if message.to_ascii_uppercase().contains("ABORTED") {
        return GatewayError::Aborted(message);
    }
    if error_code.is_some_and(|code| code.ends_with("_not_found")) || status == 404 {
        return GatewayError::ResourceNotFound(message);
    }
    match status {
        408 | 504 => GatewayError::Timeout(message),
        400..=499 => match parsed.and_then(|b| b.vm_error_code) {
            Some(code) => GatewayError::Rejected(format!("{message} (vm_error_code {code})")),
            None => GatewayError::Rejected(message),
        },
        _ => GatewayError::Network(format!("HTTP {status}: {message}")),
    }
}

/// Read a transaction resource. `None` while it is still pending.
fn parse_transaction(value: &Value) -> Result<Option<ConfirmedTransaction>, GatewayError> {
    let tx: TransactionResource = serde_json::from_value(value.clone())
        .map_err(|e| GatewayError::Malformed(e.to_string()))?;

    if tx.tx_type == PENDING_TRANSACTION {
        return Ok(None);
    }
    Ok(Some(ConfirmedTransaction {
        hash: TxHash(tx.hash),
        success: tx.success.unwrap_or(false),
        vm_status: tx.vm_status.unwrap_or_default(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedSigner;

    #[async_trait]
    impl TransactionSigner for FixedSigner {
        async fn sign_and_submit(
            &self,
            _payload: &EntryFunctionPayload,
        ) -> Result<PendingTransaction, GatewayError> {
            Ok(PendingTransaction {
                hash: TxHash("0xfeed".into()),
            })
        }
    }

    fn payload() -> EntryFunctionPayload {
        EntryFunctionPayload::new("0x1::Quotes::initialize".into(), vec![])
    }

    #[test]
    fn test_endpoints() {
        let mut config = QuoteSyncConfig::for_testing();
        config.node_url = "http://localhost:8080/v1/".into();
        let gateway = RestLedgerGateway::new(&config).unwrap();

        assert_eq!(gateway.endpoint("view"), "http://localhost:8080/v1/view");
        assert_eq!(
            gateway.transaction_endpoint(&TxHash("0xab".into())),
            "http://localhost:8080/v1/transactions/by_hash/0xab"
        );
    }

    #[test]
    fn test_map_aborted_view() {
        let body = json!({
            "message": "Move abort in 0x1::Quotes: ABORTED (code 1)",
            "error_code": "vm_error",
            "vm_error_code": 4016
        })
        .to_string();
        let err = map_error_body(400, &body);
        assert!(matches!(err, GatewayError::Aborted(_)));
        assert!(err.is_remote_absence());
    }

    #[test]
    fn test_map_resource_not_found() {
        let body = json!({
            "message": "Resource not found",
            "error_code": "resource_not_found"
        })
        .to_string();
        assert!(matches!(
            map_error_body(404, &body),
            GatewayError::ResourceNotFound(_)
        ));
    }

    #[test]
    fn test_map_rejection_keeps_vm_code() {
        let body = json!({
            "message": "Invalid transaction",
            "error_code": "invalid_input",
            "vm_error_code": 1
        })
        .to_string();
        match map_error_body(400, &body) {
            GatewayError::Rejected(m) => assert!(m.contains("vm_error_code 1")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_map_non_json_server_error() {
        let err = map_error_body(502, "bad gateway");
        assert_eq!(err, GatewayError::Network("HTTP 502: bad gateway".into()));
        assert!(matches!(map_error_body(504, ""), GatewayError::Timeout(_)));
    }

    #[test]
    fn test_parse_pending_transaction() {
        let value = json!({ "type": "pending_transaction", "hash": "0x1" });
        assert_eq!(parse_transaction(&value).unwrap(), None);
    }

    #[test]
    fn test_parse_committed_transaction() {
        let value = json!({
            "type": "user_transaction",
            "hash": "0x1",
            "success": false,
            "vm_status": "Move abort: EALREADY_INITIALIZED"
        });
        let confirmed = parse_transaction(&value).unwrap().unwrap();
        assert!(!confirmed.success);
        assert_eq!(confirmed.vm_status, "Move abort: EALREADY_INITIALIZED");
    }

    #[test]
    fn test_new_applies_config() {
        let mut config = QuoteSyncConfig::for_testing();
        config.confirmation_timeout_secs = Some(7);
        let gateway = RestLedgerGateway::new(&config).unwrap();

        assert_eq!(gateway.poll_interval, Duration::from_millis(10));
        assert_eq!(gateway.confirmation_timeout, Some(Duration::from_secs(7)));
    }

    #[tokio::test]
    async fn test_submit_without_signer() {
        let gateway = RestLedgerGateway::new(&QuoteSyncConfig::for_testing()).unwrap();
        assert_eq!(
            gateway.submit(&payload()).await.unwrap_err(),
            GatewayError::SignerUnavailable
        );
    }

    #[tokio::test]
    async fn test_submit_through_signer() {
        let gateway = RestLedgerGateway::new(&QuoteSyncConfig::for_testing())
            .unwrap()
            .with_signer(Arc::new(FixedSigner));
        let pending = gateway.submit(&payload()).await.unwrap();
        assert_eq!(pending.hash, TxHash("0xfeed".into()));
    }
}
