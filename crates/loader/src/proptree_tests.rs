use super::*;
use serde_json::json;

#[test]
fn get_reads_a_mapping_field() {
    let value = json!({"name": "build"});
    let tree = PropertyTree::root(&value, "stages[0]");
    assert_eq!(tree.get("name").unwrap().unwrap().as_str(), Some("build"));
    assert!(tree.get("missing").unwrap().is_none());
}

#[test]
fn get_on_a_non_mapping_is_an_error_with_the_current_path() {
    let value = json!("just a string");
    let tree = PropertyTree::root(&value, "stages[0].name");
    let err = tree.get("anything").unwrap_err();
    match err {
        pk_core::KernelError::Definition { path, .. } => assert_eq!(path, "stages[0].name"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn child_path_and_index_path_compose_dotted_segments() {
    let value = json!({});
    let tree = PropertyTree::root(&value, "stages[0]");
    assert_eq!(tree.child_path("steps"), "stages[0].steps");
    assert_eq!(tree.index_path(3), "stages[0][3]");
}

#[test]
fn as_sequence_rejects_non_array_values() {
    let value = json!({"branches": {}});
    let tree = PropertyTree::root(&value, "stages[0].parallel");
    assert!(tree.as_sequence().is_err());
}
