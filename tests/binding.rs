//! Contract binding against an in-memory node.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};
use contract_call::blockchain::{
    load_abi, BlockchainError, ConfirmationPolicy, ContractBinding, Operation, SendOptions,
};
use contract_call::Wallet;
use std::sync::Arc;
use std::time::Duration;

mod common;

use common::FakeNode;

fn bind(node: Arc<FakeNode>) -> (ContractBinding<FakeNode>, Address) {
    let wallet = Wallet::from_private_key(common::TEST_PRIVATE_KEY).unwrap();
    let from = wallet.address();
    let abi = load_abi(&common::abi_path()).unwrap();
    let binding = ContractBinding::bind(abi, common::TEST_CONTRACT.parse().unwrap(), node)
        .unwrap()
        .with_signer(wallet)
        .with_confirmation(ConfirmationPolicy {
            poll_interval: Duration::from_millis(5),
            timeout: Duration::from_secs(1),
        });
    (binding, from)
}

fn uint(v: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(v), 256)
}

#[tokio::test]
async fn test_send_then_call() {
    let node = Arc::new(FakeNode::new());
    let (binding, from) = bind(node.clone());

    let options = SendOptions {
        from,
        gas_limit: Some(1_000_000),
    };
    let receipt = binding.send("setData", &[uint(20)], &options).await.unwrap();
    assert!(receipt.status());
    assert_eq!(receipt.block_number, Some(100));

    let values = binding.call("getData", &[]).await.unwrap();
    assert_eq!(values, vec![uint(20)]);
}

#[tokio::test]
async fn test_repeated_call_is_idempotent() {
    let node = Arc::new(FakeNode::new());
    let (binding, from) = bind(node.clone());

    let first = binding.call("getData", &[]).await.unwrap();
    let second = binding.call("getData", &[]).await.unwrap();
    assert_eq!(first, vec![uint(0)]);
    assert_eq!(first, second);

    let options = SendOptions {
        from,
        gas_limit: None,
    };
    binding.send("setData", &[uint(7)], &options).await.unwrap();
    assert!(node.received("eth_estimateGas"));

    for _ in 0..3 {
        assert_eq!(binding.call("getData", &[]).await.unwrap(), vec![uint(7)]);
    }
}

#[tokio::test]
async fn test_send_on_read_only_method_issues_no_request() {
    let node = Arc::new(FakeNode::new());
    let (binding, from) = bind(node.clone());

    let options = SendOptions {
        from,
        gas_limit: Some(1_000_000),
    };
    let result = binding.send("getData", &[], &options).await;
    assert!(matches!(
        result,
        Err(BlockchainError::MethodMutabilityMismatch { .. })
    ));
    assert_eq!(node.request_count(), 0);
}

#[tokio::test]
async fn test_unknown_method_issues_no_request() {
    let node = Arc::new(FakeNode::new());
    let (binding, from) = bind(node.clone());

    let result = binding.call("echo", &[]).await;
    assert!(matches!(result, Err(BlockchainError::MethodNotFound(_))));

    let options = SendOptions {
        from,
        gas_limit: Some(1_000_000),
    };
    let result = binding.send("echo", &[uint(1)], &options).await;
    assert!(matches!(result, Err(BlockchainError::MethodNotFound(_))));

    assert!(binding.resolve("echo", 0, Operation::Call).is_err());
    assert_eq!(node.request_count(), 0);
}

#[tokio::test]
async fn test_send_from_foreign_address_is_refused() {
    let node = Arc::new(FakeNode::new());
    let (binding, _) = bind(node.clone());

    let options = SendOptions {
        from: Address::repeat_byte(0x11),
        gas_limit: Some(1_000_000),
    };
    let result = binding.send("setData", &[uint(1)], &options).await;
    assert!(matches!(result, Err(BlockchainError::InvalidKey(_))));
    assert_eq!(node.request_count(), 0);
}

#[tokio::test]
async fn test_mistyped_argument_is_rejected() {
    let node = Arc::new(FakeNode::new());
    let (binding, from) = bind(node.clone());

    let options = SendOptions {
        from,
        gas_limit: Some(1_000_000),
    };
    let result = binding
        .send("setData", &[DynSolValue::Bool(true)], &options)
        .await;
    assert!(matches!(result, Err(BlockchainError::InvalidArgument { .. })));
    assert_eq!(node.request_count(), 0);
}

#[tokio::test]
async fn test_mutability_is_checked_before_arity() {
    let node = Arc::new(FakeNode::new());
    let (binding, from) = bind(node.clone());

    let options = SendOptions {
        from,
        gas_limit: Some(1_000_000),
    };
    let result = binding.send("getData", &[uint(20)], &options).await;
    assert!(matches!(
        result,
        Err(BlockchainError::MethodMutabilityMismatch { operation: "send", .. })
    ));

    let result = binding.call("setData", &[]).await;
    assert!(matches!(
        result,
        Err(BlockchainError::MethodMutabilityMismatch { operation: "call", .. })
    ));

    assert_eq!(node.request_count(), 0);
}
