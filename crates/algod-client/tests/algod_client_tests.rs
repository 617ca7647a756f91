use std::time::Duration;

use algo_spv_verify::{
    fetch_inclusion_proof, verify_transaction, verify_transactions, BatchOptions, Digest,
    HashAlgorithm, TxnOutcome, VerifierConfig, VerifyError,
};
use algod_client::{AlgodClient, AlgodClientError};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Five-transaction block; the proofs below are for the transaction at index 4
const TXID: &str = "AQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCA";
const STIBHASH: &str = "pKSkpKSkpKSkpKSkpKSkpKSkpKSkpKSkpKSkpKSkpKQ=";
const TXN_ROOT: &str = "eza1RHAREeEUp07+f6g2rQx0od8BGBruvJ9DvU6CbyA=";
const TXN256_ROOT: &str = "i33yiHlXRlvn+UR4flyc9PzRW3mbu1oQB/8O8s/X92w=";
const PROOF: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAANoaO6OV5uVIkeDLYNg8cDUgLMrzygEmVVBYZPLMYvpi";
const PROOF256: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAJvYrq9G3sXiPzwsKXKcflvn80Op49USPYlUDbuAg/3P";
const GENESIS_HASH: &str = "ERERERERERERERERERERERERERERERERERERERERERE=";

fn fast_backoff() -> backoff::ExponentialBackoff {
    backoff::ExponentialBackoff {
        initial_interval: Duration::from_millis(10),
        max_interval: Duration::from_millis(50),
        max_elapsed_time: Some(Duration::from_secs(5)),
        ..Default::default()
    }
}

fn client(server: &MockServer, token: Option<&str>) -> AlgodClient {
    AlgodClient::new(server.uri(), token.map(str::to_string))
        .unwrap()
        .with_backoff(fast_backoff())
}

fn block_body() -> serde_json::Value {
    json!({
        "block": {
            "gen": "testnet-v1.0",
            "gh": GENESIS_HASH,
            "rnd": 42,
            "txn": TXN_ROOT,
            "txn256": TXN256_ROOT
        }
    })
}

fn proof_body(proof: &str, hashtype: &str) -> serde_json::Value {
    json!({
        "idx": 4,
        "treedepth": 3,
        "proof": proof,
        "stibhash": STIBHASH,
        "hashtype": hashtype
    })
}

async fn mount_block(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v2/blocks/42"))
        .and(query_param("header-only", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(block_body()))
        .mount(server)
        .await;
}

async fn mount_proof(server: &MockServer, hashtype: &str, proof: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v2/blocks/42/transactions/{}/proof", TXID)))
        .and(query_param("hashtype", hashtype))
        .respond_with(ResponseTemplate::new(200).set_body_json(proof_body(proof, hashtype)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_block_header_sends_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/blocks/42"))
        .and(header("X-Algo-API-Token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(block_body()))
        .expect(1)
        .mount(&server)
        .await;

    let header = client(&server, Some("secret"))
        .get_block_header(42)
        .await
        .unwrap();
    assert_eq!(header.round, 42);
    assert_eq!(header.genesis_id, "testnet-v1.0");
    assert_eq!(header.genesis_hash, Digest::from([0x11; 32]));
    assert_eq!(
        header.txn_root.to_hex(),
        "7b36b544701111e114a74efe7fa836ad0c74a1df01181aeebc9f43bd4e826f20"
    );
}

#[tokio::test]
async fn test_transaction_proof_decoding() {
    let server = MockServer::start().await;
    mount_proof(&server, "sha512_256", PROOF).await;

    let response = client(&server, None)
        .get_transaction_proof(42, TXID, HashAlgorithm::Sha512_256)
        .await
        .unwrap();
    assert_eq!(response.idx, 4);
    assert_eq!(response.treedepth, 3);
    assert_eq!(response.proof.len(), 96);
    assert_eq!(response.stibhash, vec![0xa4; 32]);
    assert_eq!(response.hashtype, "sha512_256");
}

#[tokio::test]
async fn test_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"last-round": 31337, "catchup-time": 0})),
        )
        .mount(&server)
        .await;

    let status = client(&server, None).get_status().await.unwrap();
    assert_eq!(status.last_round, 31337);
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/status"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"last-round": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let status = client(&server, None).get_status().await.unwrap();
    assert_eq!(status.last_round, 7);
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/blocks/42/transactions/{}/proof", TXID)))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"message": "transaction not found in block"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, None)
        .get_transaction_proof(42, TXID, HashAlgorithm::Sha512_256)
        .await
        .unwrap_err();
    match err {
        AlgodClientError::Status {
            status, message, ..
        } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "transaction not found in block");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_fetch_and_verify_both_schemes() {
    let server = MockServer::start().await;
    mount_block(&server).await;
    mount_proof(&server, "sha512_256", PROOF).await;
    mount_proof(&server, "sha256", PROOF256).await;
    let client = client(&server, None);

    for algorithm in [HashAlgorithm::Sha512_256, HashAlgorithm::Sha256] {
        let bundle = fetch_inclusion_proof(&client, &client, 42, TXID, algorithm)
            .await
            .unwrap();
        assert_eq!(bundle.hash_type, algorithm);
        let result = verify_transaction(&bundle, &VerifierConfig::default()).unwrap();
        assert_eq!(result.leaf_index, 4);
        assert_eq!(result.round, 42);
    }
}

#[tokio::test]
async fn test_tampered_proof_is_rejected() {
    let server = MockServer::start().await;
    mount_block(&server).await;
    // Served the SHA-256 siblings under the SHA-512/256 label
    mount_proof(&server, "sha512_256", PROOF256).await;
    let client = client(&server, None);

    let bundle = fetch_inclusion_proof(&client, &client, 42, TXID, HashAlgorithm::Sha512_256)
        .await
        .unwrap();
    let err = verify_transaction(&bundle, &VerifierConfig::default()).unwrap_err();
    assert!(matches!(err, VerifyError::RootMismatch { .. }));
}

#[tokio::test]
async fn test_batch_over_rest() {
    let server = MockServer::start().await;
    mount_block(&server).await;
    mount_proof(&server, "sha512_256", PROOF).await;
    let client = client(&server, None);

    let txids = vec![
        TXID.to_string(),
        "AAAQEAYEAUDAOCAJBIFQYDIOB4IBCEQTCQKRMFYYDENBWHA5DYPQ".to_string(),
    ];
    let report = verify_transactions(
        &client,
        &client,
        42,
        &txids,
        &VerifierConfig::default(),
        &BatchOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.verified_count(), 1);
    let missing = report
        .reports
        .iter()
        .find(|r| r.txid == txids[1])
        .unwrap();
    assert!(matches!(missing.outcome, TxnOutcome::Unavailable(_)));
}
