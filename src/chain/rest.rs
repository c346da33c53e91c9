//! Aptos fullnode REST client
//!
//! Talks JSON to the `/v1` API. The signing message is BCS-encoded locally
//! from the request, so the node only ever sees the finished signature.

use super::finality::{wait_for_finality, TransactionStatus, WaitOptions};
use super::signing::signing_message;
use super::NetworkClient;
use crate::error::{AirdropError, AirdropResult};
use crate::types::{
    AccountAddress, EntryFunctionArgument, EntryPoint, FinalityResult, SubmissionReceipt,
    TransactionRequest,
};
use crate::wallet::SigningIdentity;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Defaults applied by `build_simple_transaction`
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub max_gas_amount: u64,
    /// Uses the node's gas estimate when unset
    pub gas_unit_price: Option<u64>,
    pub expiration_secs: u64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_gas_amount: 200_000,
            gas_unit_price: None,
            expiration_secs: 20,
        }
    }
}

/// REST implementation of `NetworkClient`
pub struct RestClient {
    base_url: String,
    http: Client,
    build: BuildOptions,
    expected_chain_id: Option<u8>,
}

impl RestClient {
    /// Create a client for the fullnode at `base_url` (e.g. `https://api.testnet.aptoslabs.com/v1`)
    pub fn new(base_url: &str, request_timeout: Duration) -> AirdropResult<Self> {
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| AirdropError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            build: BuildOptions::default(),
            expected_chain_id: None,
        })
    }

    pub fn with_build_options(mut self, build: BuildOptions) -> Self {
        self.build = build;
        self
    }

    /// Refuse to build transactions when the node reports a different chain
    pub fn with_expected_chain_id(mut self, chain_id: Option<u8>) -> Self {
        self.expected_chain_id = chain_id;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        map_err: fn(String) -> AirdropError,
    ) -> AirdropResult<T> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| map_err(e.to_string()))?;
        decode(response, map_err).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        map_err: fn(String) -> AirdropError,
    ) -> AirdropResult<T> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| map_err(e.to_string()))?;
        decode(response, map_err).await
    }

    /// Current sequence number of an account
    pub async fn sequence_number(&self, address: AccountAddress) -> AirdropResult<u64> {
        let account: AccountResource = self
            .get_json(&format!("accounts/{}", address), AirdropError::Build)
            .await?;
        parse_u64("sequence_number", &account.sequence_number).map_err(AirdropError::Build)
    }

    /// Node's gas unit price estimate
    pub async fn estimate_gas_price(&self) -> AirdropResult<u64> {
        let estimate: GasEstimate = self
            .get_json("estimate_gas_price", AirdropError::Build)
            .await?;
        Ok(estimate.gas_estimate)
    }

    /// Chain id from the ledger info
    pub async fn chain_id(&self) -> AirdropResult<u8> {
        let ledger: LedgerInfo = self.get_json("", AirdropError::Build).await?;
        Ok(ledger.chain_id)
    }

    /// One lookup of a transaction by hash
    async fn lookup_transaction(&self, hash: &str) -> AirdropResult<TransactionStatus> {
        let response = self
            .http
            .get(self.url(&format!("transactions/by_hash/{}", hash)))
            .send()
            .await
            .map_err(|e| AirdropError::ChainConnection(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(TransactionStatus::Pending);
        }

        let view: TransactionView = decode(response, AirdropError::ChainConnection).await?;
        if view.kind == "pending_transaction" {
            return Ok(TransactionStatus::Pending);
        }

        let version = view
            .version
            .as_deref()
            .map(|v| parse_u64("version", v))
            .transpose()
            .map_err(AirdropError::ChainConnection)?
            .unwrap_or_default();

        Ok(TransactionStatus::Committed(FinalityResult {
            hash: view.hash,
            success: view.success.unwrap_or(false),
            vm_status: view.vm_status.unwrap_or_default(),
            version,
        }))
    }
}

#[async_trait]
impl NetworkClient for RestClient {
    async fn build_simple_transaction(
        &self,
        sender: AccountAddress,
        entry_point: &EntryPoint,
        arguments: Vec<EntryFunctionArgument>,
    ) -> AirdropResult<TransactionRequest> {
        let sequence_number = self.sequence_number(sender).await?;
        let gas_unit_price = match self.build.gas_unit_price {
            Some(price) => price,
            None => self.estimate_gas_price().await?,
        };
        let chain_id = self.chain_id().await?;
        if let Some(expected) = self.expected_chain_id {
            if chain_id != expected {
                return Err(AirdropError::Build(format!(
                    "Fullnode at {} serves chain {}, expected chain {}",
                    self.base_url, chain_id, expected
                )));
            }
        }

        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default();
        let expiration_timestamp_secs = now
            .checked_add(self.build.expiration_secs)
            .ok_or_else(|| {
                AirdropError::Build(format!(
                    "Expiration of {}s overflows the timestamp",
                    self.build.expiration_secs
                ))
            })?;
        let request = TransactionRequest {
            sender,
            entry_point: entry_point.clone(),
            arguments,
            sequence_number,
            max_gas_amount: self.build.max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        };

        debug!(
            "Built transaction for {} (sequence {}, gas price {}, chain {})",
            sender, sequence_number, gas_unit_price, chain_id
        );
        Ok(request)
    }

    async fn sign_and_submit(
        &self,
        identity: &SigningIdentity,
        request: &TransactionRequest,
    ) -> AirdropResult<SubmissionReceipt> {
        if identity.address() != request.sender {
            return Err(AirdropError::Submission(format!(
                "Request sender {} is not controlled by the signing key ({})",
                request.sender,
                identity.address()
            )));
        }

        let message = signing_message(request)?;
        let body = TransactionBody::from(request);

        let signed = SignedTransactionBody {
            transaction: &body,
            signature: TransactionSignature {
                kind: "ed25519_signature",
                public_key: format!("0x{}", hex::encode(identity.public_key())),
                signature: format!("0x{}", hex::encode(identity.sign(&message))),
            },
        };

        let pending: PendingTransaction = self
            .post_json("transactions", &signed, AirdropError::Submission)
            .await?;

        if pending.hash.is_empty() {
            return Err(AirdropError::Submission(
                "Node accepted the transaction but returned no hash".to_string(),
            ));
        }

        info!(
            "Submitted {} from {} as {}",
            request.entry_point, request.sender, pending.hash
        );
        Ok(SubmissionReceipt { hash: pending.hash })
    }

    async fn wait_for_transaction(
        &self,
        hash: &str,
        options: WaitOptions,
    ) -> AirdropResult<FinalityResult> {
        wait_for_finality(hash, options, || self.lookup_transaction(hash)).await
    }
}

/// Read a JSON body, turning non-2xx responses into `map_err` with the node's message
async fn decode<T: DeserializeOwned>(
    response: Response,
    map_err: fn(String) -> AirdropError,
) -> AirdropResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiError>(&body)
            .map(|e| e.to_string())
            .unwrap_or(body);
        warn!("Fullnode returned {}: {}", status, message);
        return Err(map_err(format!("HTTP {}: {}", status.as_u16(), message)));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| map_err(format!("Malformed response: {}", e)))
}

fn parse_u64(field: &str, value: &str) -> Result<u64, String> {
    value
        .parse()
        .map_err(|e| format!("Invalid {} {:?}: {}", field, value, e))
}

#[derive(Debug, Deserialize)]
struct AccountResource {
    sequence_number: String,
}

#[derive(Debug, Deserialize)]
struct GasEstimate {
    gas_estimate: u64,
}

#[derive(Debug, Deserialize)]
struct LedgerInfo {
    chain_id: u8,
}

#[derive(Debug, Deserialize)]
struct PendingTransaction {
    hash: String,
}

#[derive(Debug, Deserialize)]
struct TransactionView {
    #[serde(rename = "type")]
    kind: String,
    hash: String,
    version: Option<String>,
    success: Option<bool>,
    vm_status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    error_code: Option<String>,
    vm_error_code: Option<u64>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(code) = &self.error_code {
            write!(f, " ({})", code)?;
        }
        if let Some(vm_code) = self.vm_error_code {
            write!(f, " [vm error {}]", vm_code)?;
        }
        Ok(())
    }
}

/// JSON form of an unsigned user transaction. u64 fields travel as strings.
#[derive(Debug, Serialize)]
struct TransactionBody {
    sender: AccountAddress,
    sequence_number: String,
    max_gas_amount: String,
    gas_unit_price: String,
    expiration_timestamp_secs: String,
    payload: EntryFunctionPayload,
}

#[derive(Debug, Serialize)]
struct EntryFunctionPayload {
    #[serde(rename = "type")]
    kind: &'static str,
    function: EntryPoint,
    type_arguments: Vec<String>,
    arguments: Vec<EntryFunctionArgument>,
}

impl From<&TransactionRequest> for TransactionBody {
    fn from(request: &TransactionRequest) -> Self {
        Self {
            sender: request.sender,
            sequence_number: request.sequence_number.to_string(),
            max_gas_amount: request.max_gas_amount.to_string(),
            gas_unit_price: request.gas_unit_price.to_string(),
            expiration_timestamp_secs: request.expiration_timestamp_secs.to_string(),
            payload: EntryFunctionPayload {
                kind: "entry_function_payload",
                function: request.entry_point.clone(),
                type_arguments: Vec::new(),
                arguments: request.arguments.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct SignedTransactionBody<'a> {
    #[serde(flatten)]
    transaction: &'a TransactionBody,
    signature: TransactionSignature,
}

#[derive(Debug, Serialize)]
struct TransactionSignature {
    #[serde(rename = "type")]
    kind: &'static str,
    public_key: String,
    signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEED_HEX: &str = "9bf49a6a0755f953811fce125f2683d50429c3bb49e074147e0089a52eae155f";
    const TX_HASH: &str = "0x5a4d3f0c1e2b7a8c9d0e1f2a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e";

    fn client(server: &MockServer) -> RestClient {
        RestClient::new(&format!("{}/v1/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    fn fast_wait() -> WaitOptions {
        WaitOptions {
            timeout: Duration::from_secs(2),
            poll_interval: Duration::from_millis(10),
            backoff_multiplier: 1.5,
            max_poll_interval: Duration::from_millis(50),
        }
    }

    fn submitted_signature(body: &Value) -> Signature {
        let signature_hex = body["signature"]["signature"].as_str().unwrap();
        let signature_bytes: [u8; 64] = hex::decode(&signature_hex[2..])
            .unwrap()
            .try_into()
            .unwrap();
        Signature::from_bytes(&signature_bytes)
    }

    async fn mount_accepting_submit(server: &MockServer, identity: &SigningIdentity) {
        Mock::given(method("POST"))
            .and(path("/v1/transactions"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "hash": TX_HASH,
                "sender": identity.address().to_string(),
                "sequence_number": "7",
            })))
            .mount(server)
            .await;
    }

    fn request_for(identity: &SigningIdentity) -> TransactionRequest {
        TransactionRequest {
            sender: identity.address(),
            entry_point: "0x1::custom_token::airdrop_and_register".parse().unwrap(),
            arguments: vec![
                EntryFunctionArgument::Address("0xa".parse().unwrap()),
                EntryFunctionArgument::U64(100_000_000_000_000),
            ],
            sequence_number: 7,
            max_gas_amount: 200_000,
            gas_unit_price: 100,
            expiration_timestamp_secs: 1_700_000_020,
            chain_id: 2,
        }
    }

    async fn mount_build_endpoints(server: &MockServer, identity: &SigningIdentity) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/accounts/{}", identity.address())))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sequence_number": "7",
                "authentication_key": identity.address().to_string(),
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/estimate_gas_price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "deprioritized_gas_estimate": 100,
                "gas_estimate": 150,
                "prioritized_gas_estimate": 200,
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "chain_id": 2,
                "epoch": "100",
                "ledger_version": "12345",
                "ledger_timestamp": "1700000000000000",
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_build_resolves_sequence_gas_and_chain() {
        let server = MockServer::start().await;
        let identity = SigningIdentity::from_secret(SEED_HEX).unwrap();
        mount_build_endpoints(&server, &identity).await;

        let entry: EntryPoint = "0x1::custom_token::airdrop_and_register".parse().unwrap();
        let args = vec![EntryFunctionArgument::U64(5)];
        let request = client(&server)
            .build_simple_transaction(identity.address(), &entry, args.clone())
            .await
            .unwrap();

        assert_eq!(request.sender, identity.address());
        assert_eq!(request.entry_point, entry);
        assert_eq!(request.arguments, args);
        assert_eq!(request.sequence_number, 7);
        assert_eq!(request.gas_unit_price, 150);
        assert_eq!(request.max_gas_amount, 200_000);
        assert_eq!(request.chain_id, 2);
        assert!(request.expiration_timestamp_secs > 1_700_000_000);
    }

    #[tokio::test]
    async fn test_build_uses_configured_gas_price() {
        let server = MockServer::start().await;
        let identity = SigningIdentity::from_secret(SEED_HEX).unwrap();
        mount_build_endpoints(&server, &identity).await;

        let request = client(&server)
            .with_build_options(BuildOptions {
                max_gas_amount: 5_000,
                gas_unit_price: Some(100),
                expiration_secs: 60,
            })
            .build_simple_transaction(
                identity.address(),
                &"0x1::m::f".parse().unwrap(),
                Vec::new(),
            )
            .await
            .unwrap();

        assert_eq!(request.gas_unit_price, 100);
        assert_eq!(request.max_gas_amount, 5_000);

        let requests = server.received_requests().await.unwrap();
        assert!(requests
            .iter()
            .all(|r| r.url.path() != "/v1/estimate_gas_price"));
    }

    #[tokio::test]
    async fn test_build_rejects_node_on_another_chain() {
        let server = MockServer::start().await;
        let identity = SigningIdentity::from_secret(SEED_HEX).unwrap();
        mount_build_endpoints(&server, &identity).await;

        let err = client(&server)
            .with_expected_chain_id(Some(1))
            .build_simple_transaction(identity.address(), &"0x1::m::f".parse().unwrap(), Vec::new())
            .await
            .unwrap_err();

        match err {
            AirdropError::Build(message) => assert!(message.contains("chain 2, expected chain 1")),
            other => panic!("expected build error, got {:?}", other),
        }

        let request = client(&server)
            .with_expected_chain_id(Some(2))
            .build_simple_transaction(identity.address(), &"0x1::m::f".parse().unwrap(), Vec::new())
            .await
            .unwrap();
        assert_eq!(request.chain_id, 2);
    }

    #[tokio::test]
    async fn test_build_rejects_overflowing_expiration() {
        let server = MockServer::start().await;
        let identity = SigningIdentity::from_secret(SEED_HEX).unwrap();
        mount_build_endpoints(&server, &identity).await;

        let err = client(&server)
            .with_build_options(BuildOptions {
                expiration_secs: u64::MAX,
                ..BuildOptions::default()
            })
            .build_simple_transaction(identity.address(), &"0x1::m::f".parse().unwrap(), Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AirdropError::Build(_)));
    }

    #[tokio::test]
    async fn test_build_fails_for_unknown_account() {
        let server = MockServer::start().await;
        let identity = SigningIdentity::from_secret(SEED_HEX).unwrap();
        Mock::given(method("GET"))
            .and(path(format!("/v1/accounts/{}", identity.address())))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Account not found by Address",
                "error_code": "account_not_found",
                "vm_error_code": null,
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .build_simple_transaction(identity.address(), &"0x1::m::f".parse().unwrap(), Vec::new())
            .await
            .unwrap_err();

        match err {
            AirdropError::Build(message) => {
                assert!(message.contains("404"));
                assert!(message.contains("account_not_found"));
            }
            other => panic!("expected build error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sign_and_submit_signs_bcs_transaction() {
        let server = MockServer::start().await;
        let identity = SigningIdentity::from_secret(SEED_HEX).unwrap();
        mount_accepting_submit(&server, &identity).await;

        let request = request_for(&identity);
        let receipt = client(&server)
            .sign_and_submit(&identity, &request)
            .await
            .unwrap();
        assert_eq!(receipt.hash, TX_HASH);

        let requests = server.received_requests().await.unwrap();
        let submitted = requests
            .iter()
            .find(|r| r.url.path() == "/v1/transactions")
            .unwrap();
        let body: Value = serde_json::from_slice(&submitted.body).unwrap();

        assert_eq!(body["sequence_number"], "7");
        assert_eq!(body["payload"]["type"], "entry_function_payload");
        assert_eq!(
            body["payload"]["function"],
            "0x0000000000000000000000000000000000000000000000000000000000000001::custom_token::airdrop_and_register"
        );
        assert_eq!(body["payload"]["arguments"][1], "100000000000000");
        assert_eq!(body["signature"]["type"], "ed25519_signature");

        let verifying = VerifyingKey::from_bytes(&identity.public_key()).unwrap();
        let message = signing_message(&request).unwrap();
        assert!(verifying
            .verify(&message, &submitted_signature(&body))
            .is_ok());
    }

    #[tokio::test]
    async fn test_node_supplied_signing_bytes_are_never_signed() {
        let server = MockServer::start().await;
        let identity = SigningIdentity::from_secret(SEED_HEX).unwrap();
        Mock::given(method("POST"))
            .and(path("/v1/transactions/encode_submission"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("0xdeadbeef")))
            .mount(&server)
            .await;
        mount_accepting_submit(&server, &identity).await;

        let mut request = request_for(&identity);
        request.chain_id = 1;
        client(&server)
            .sign_and_submit(&identity, &request)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests
            .iter()
            .all(|r| r.url.path() != "/v1/transactions/encode_submission"));

        let submitted = requests
            .iter()
            .find(|r| r.url.path() == "/v1/transactions")
            .unwrap();
        let body: Value = serde_json::from_slice(&submitted.body).unwrap();
        let signature = submitted_signature(&body);
        let verifying = VerifyingKey::from_bytes(&identity.public_key()).unwrap();

        assert!(verifying.verify(&[0xdeu8, 0xad, 0xbe, 0xef], &signature).is_err());
        assert!(verifying
            .verify(&signing_message(&request).unwrap(), &signature)
            .is_ok());
        // Signed for chain 1, so it does not verify for any other chain
        request.chain_id = 2;
        assert!(verifying
            .verify(&signing_message(&request).unwrap(), &signature)
            .is_err());
    }

    #[tokio::test]
    async fn test_empty_hash_is_a_submission_error() {
        let server = MockServer::start().await;
        let identity = SigningIdentity::from_secret(SEED_HEX).unwrap();
        Mock::given(method("POST"))
            .and(path("/v1/transactions"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "hash": "" })))
            .mount(&server)
            .await;

        let err = client(&server)
            .sign_and_submit(&identity, &request_for(&identity))
            .await
            .unwrap_err();

        match err {
            AirdropError::Submission(message) => assert!(message.contains("no hash")),
            other => panic!("expected submission error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejected_submission_surfaces_node_message() {
        let server = MockServer::start().await;
        let identity = SigningIdentity::from_secret(SEED_HEX).unwrap();
        Mock::given(method("POST"))
            .and(path("/v1/transactions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "message": "Invalid transaction: INSUFFICIENT_BALANCE_FOR_TRANSACTION_FEE",
                "error_code": "vm_error",
                "vm_error_code": 5,
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .sign_and_submit(&identity, &request_for(&identity))
            .await
            .unwrap_err();

        match err {
            AirdropError::Submission(message) => {
                assert!(message.contains("INSUFFICIENT_BALANCE_FOR_TRANSACTION_FEE"));
                assert!(message.contains("vm error 5"));
            }
            other => panic!("expected submission error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sign_and_submit_rejects_foreign_sender() {
        let server = MockServer::start().await;
        let identity = SigningIdentity::from_secret(SEED_HEX).unwrap();
        let mut request = request_for(&identity);
        request.sender = "0xdead".parse().unwrap();

        let err = client(&server)
            .sign_and_submit(&identity, &request)
            .await
            .unwrap_err();

        assert!(matches!(err, AirdropError::Submission(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wait_polls_past_not_found_and_pending() {
        let server = MockServer::start().await;
        let by_hash = format!("/v1/transactions/by_hash/{}", TX_HASH);
        Mock::given(method("GET"))
            .and(path(by_hash.as_str()))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Transaction not found",
                "error_code": "transaction_not_found",
                "vm_error_code": null,
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(by_hash.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "pending_transaction",
                "hash": TX_HASH,
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(by_hash.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "user_transaction",
                "hash": TX_HASH,
                "version": "987654",
                "success": true,
                "vm_status": "Executed successfully",
            })))
            .mount(&server)
            .await;

        let result = client(&server)
            .wait_for_transaction(TX_HASH, fast_wait())
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.hash, TX_HASH);
        assert_eq!(result.version, 987_654);
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_wait_reports_failed_execution() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/transactions/by_hash/{}", TX_HASH)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "user_transaction",
                "hash": TX_HASH,
                "version": "10",
                "success": false,
                "vm_status": "Move abort in 0x1::coin: EINSUFFICIENT_BALANCE(0x10006)",
            })))
            .mount(&server)
            .await;

        let result = client(&server)
            .wait_for_transaction(TX_HASH, fast_wait())
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.vm_status.contains("EINSUFFICIENT_BALANCE"));
    }

    #[tokio::test]
    async fn test_wait_times_out_while_pending() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/transactions/by_hash/{}", TX_HASH)))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client(&server)
            .wait_for_transaction(
                TX_HASH,
                WaitOptions {
                    timeout: Duration::from_millis(100),
                    ..fast_wait()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AirdropError::Timeout { .. }));
    }
}
