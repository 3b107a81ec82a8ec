use std::fs;

use twinchat_core::types::{EmbeddingIndex, IndexItem};
use twinchat_vector::store::read_index;
use twinchat_vector::IndexStore;

#[test]
fn missing_file_yields_empty_store() {
    let tmp = tempfile::tempdir().unwrap();
    let store = IndexStore::new(tmp.path().join("embeddings.json"));
    assert!(store.is_empty());
    assert_eq!(store.dims(), 0);
    assert!(read_index(store.path()).expect("read").is_none());
}

#[test]
fn malformed_file_yields_empty_store() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("embeddings.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(read_index(&path).is_err());
    let store = IndexStore::new(&path);
    assert!(store.is_empty());
}

#[test]
fn first_attempt_sticks() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("embeddings.json");
    let store = IndexStore::new(&path);
    assert!(store.is_empty());

    // Writing the file afterwards does not resurrect the store.
    fs::write(&path, r#"{"model":"m","dims":2,"items":[{"id":"a","text":"t","embedding":[1,0]}]}"#).unwrap();
    assert!(store.is_empty());
    assert_eq!(IndexStore::new(&path).len(), 1);
}

#[test]
fn loader_fills_ids_skips_bad_dims_and_normalizes() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("embeddings.json");
    let json = r#"{
        "model": "Xenova/all-MiniLM-L6-v2",
        "dims": 2,
        "items": [
            {"id": "alpha", "text": "first", "embedding": [1.0, 0.0]},
            {"text": "no id", "embedding": [0.0, 1.0]},
            {"id": 7, "text": "numeric id", "embedding": [3.0, 4.0]},
            {"id": "bad", "text": "wrong dims", "embedding": [1.0, 0.0, 0.0]},
            {"id": "blank", "embedding": [0.0, 0.0]}
        ]
    }"#;
    fs::write(&path, json).unwrap();

    let store = IndexStore::new(&path);
    assert_eq!(store.model(), "Xenova/all-MiniLM-L6-v2");
    assert_eq!(store.dims(), 2);
    let ids: Vec<&str> = store.items().iter().map(|it| it.id.as_str()).collect();
    assert_eq!(ids, vec!["alpha", "1", "7", "blank"]);

    let numeric = &store.items()[2];
    assert!((numeric.embedding[0] - 0.6).abs() < 1e-6);
    assert!((numeric.embedding[1] - 0.8).abs() < 1e-6);
    assert_eq!(store.items()[3].text, "");
    assert_eq!(store.items()[3].embedding, vec![0.0, 0.0]);
}

#[test]
fn dims_are_inferred_when_absent() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("embeddings.json");
    fs::write(&path, r#"{"items":[{"id":"a","text":"t","embedding":[0.0,1.0,0.0]}]}"#).unwrap();
    let store = IndexStore::new(&path);
    assert_eq!(store.dims(), 3);
    assert_eq!(store.len(), 1);
}

#[test]
fn in_memory_store_skips_the_filesystem() {
    let index = EmbeddingIndex {
        model: "fake".into(),
        dims: 1,
        items: vec![IndexItem { id: "a".into(), text: "t".into(), embedding: vec![1.0] }],
    };
    let store = IndexStore::from_index(index.clone());
    assert_eq!(store.load(), &index);
}
