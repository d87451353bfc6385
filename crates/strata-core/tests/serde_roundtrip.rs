use std::str::FromStr;

use strata_core::errors::{codes, ErrorInfo, StrataError};
use strata_core::{EdgeTraversal, NodeId, OperationResult, Payload};

#[test]
fn payload_renders_as_plain_json() {
    let payload = Payload::map([
        ("count", Payload::from(2usize)),
        ("sizes", Payload::from(vec![3usize, 2])),
        ("density", Payload::from(0.4)),
        ("node", Payload::from(NodeId::from_raw(7))),
    ]);
    let json = serde_json::to_string(&payload).expect("serialize");
    assert_eq!(
        json,
        r#"{"count":2,"density":0.4,"node":7,"sizes":[3,2]}"#
    );
    let decoded: Payload = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, payload);
}

#[test]
fn operation_result_carries_code_on_failure() {
    let failed: Result<f64, StrataError> = Err(StrataError::Lookup(ErrorInfo::new(
        codes::LAYER_NOT_FOUND,
        "layer does not exist",
    )));
    let result = OperationResult::from(failed);
    assert!(!result.success);
    assert_eq!(result.code.as_deref(), Some("LayerNotFound"));
    assert_eq!(result.message, "layer does not exist");
    assert_eq!(result.payload, Payload::Empty);

    let ok = OperationResult::from(Ok::<_, StrataError>(-1i64));
    assert!(ok.success);
    assert_eq!(ok.payload.as_i64(), Some(-1));
    let json = serde_json::to_value(&ok).expect("serialize");
    assert!(json.get("code").is_none());
}

#[test]
fn traversal_parses_case_insensitively() {
    assert_eq!(EdgeTraversal::from_str("OUT").unwrap(), EdgeTraversal::Out);
    assert_eq!(EdgeTraversal::from_str("both").unwrap(), EdgeTraversal::Both);
    let err = EdgeTraversal::from_str("sideways").unwrap_err();
    assert_eq!(err.code(), codes::INVALID_ARGUMENT);
}
