use alloy::primitives::{hex, Address, Bytes, U256};
use alloy::sol_types::SolCall;

use relay_wallet_adapters::AbiAdapter;
use relay_wallet_core::contracts::IERC20;
use relay_wallet_core::{AbiPort, PortError};

#[test]
fn transfer_call_is_selector_plus_encoded_arguments() {
    let to: Address = "0x0000000000000000000000000000000000000abc"
        .parse()
        .expect("address");
    let calldata = AbiAdapter
        .encode_function_call(
            "transfer(address,uint256)",
            "0x0000000000000000000000000000000000000abc,100",
        )
        .expect("encode");

    assert_eq!(&calldata[..4], hex!("a9059cbb").as_slice());
    let expected: Bytes = IERC20::transferCall {
        to,
        amount: U256::from(100u64),
    }
    .abi_encode()
    .into();
    assert_eq!(calldata, expected);
    assert_eq!(calldata.len(), 4 + 32 * 2);
}

#[test]
fn selector_matches_the_canonical_signature() {
    let selector = AbiAdapter
        .selector("transfer( address, uint256 )")
        .expect("selector");
    assert_eq!(selector, hex!("a9059cbb"));
}

#[test]
fn empty_type_list_encodes_only_the_selector() {
    let calldata = AbiAdapter
        .encode_function_call("decimals()", "")
        .expect("encode");
    assert_eq!(calldata.as_ref(), hex!("313ce567").as_slice());
}

#[test]
fn dynamic_values_are_encoded_in_order() {
    let calldata = AbiAdapter
        .encode_function_call("setGreeting(string,bool)", "hello, true")
        .expect("encode");
    // head: string offset, bool; tail: length, padded bytes.
    assert_eq!(calldata.len(), 4 + 32 * 4);
    assert_eq!(calldata[4 + 31], 0x40);
    assert_eq!(calldata[4 + 63], 1);
    assert_eq!(calldata[4 + 95], 5);
    assert_eq!(&calldata[4 + 96..4 + 101], b"hello");
}

#[test]
fn argument_count_mismatch_is_rejected() {
    let err = AbiAdapter
        .encode_function_call("transfer(address,uint256)", "0x0000000000000000000000000000000000000abc")
        .expect_err("must fail");
    match err {
        PortError::Validation(message) => assert!(message.contains("argument count mismatch")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn array_and_tuple_types_are_a_stated_limitation() {
    for signature in ["batch(address[],uint256)", "exec((address,bytes))"] {
        let err = AbiAdapter
            .encode_function_call(signature, "")
            .expect_err("must fail");
        assert!(matches!(err, PortError::Validation(_)), "{signature}");
    }
}

#[test]
fn malformed_values_are_reported_with_their_position() {
    let err = AbiAdapter
        .encode_function_call("transfer(address,uint256)", "0x0000000000000000000000000000000000000abc,ten")
        .expect_err("must fail");
    assert!(err.to_string().contains("argument 2 (uint256)"));
}
