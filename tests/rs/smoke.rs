//! Integration smoke tests for `pathwise`

use pathwise::core::loader::load_snapshot;
use pathwise::get_version;
use std::path::Path;

#[test]
fn version_is_not_empty() {
    let v = get_version();
    assert!(!v.trim().is_empty());
}

#[test]
fn sample_snapshot_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("samples/snapshot.json");
    let snapshot = load_snapshot(&path).expect("sample snapshot should load");
    assert!(!snapshot.catalog.is_empty());
    assert!(!snapshot.users().is_empty());
}
