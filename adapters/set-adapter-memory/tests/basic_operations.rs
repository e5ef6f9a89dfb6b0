//! In-memory adapter tests
//!
//! Exercise the adapter directly with raw storage keys.

use aclstore_set_adapter_memory::SetAdapterMemory;
use aclstore_types::set_adapter::{SetAdapter, SetOp};
use aclstore_types::types::Value;
use std::collections::HashSet;

fn add(key: &str, value: &str) -> SetOp {
	SetOp::Add { key: key.into(), value: value.into() }
}

fn remove(key: &str, value: &str) -> SetOp {
	SetOp::Remove { key: key.into(), value: value.into() }
}

fn keys(keys: &[&str]) -> Vec<Box<str>> {
	keys.iter().map(|k| Box::from(*k)).collect()
}

fn set_of(values: &[&str]) -> HashSet<Value> {
	values.iter().map(|v| Value::from(*v)).collect()
}

#[tokio::test]
async fn test_members_of_missing_key_is_empty() {
	let adapter = SetAdapterMemory::new();
	assert!(adapter.members("acl_roles@nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_exec_add_and_remove() {
	let adapter = SetAdapterMemory::new();

	adapter
		.exec(vec![add("k", "a"), add("k", "b"), add("k", "a")])
		.await
		.unwrap();
	let members: HashSet<Value> = adapter.members("k").await.unwrap().into_iter().collect();
	assert_eq!(members, set_of(&["a", "b"]));

	adapter.exec(vec![remove("k", "a"), remove("k", "zzz")]).await.unwrap();
	let members: HashSet<Value> = adapter.members("k").await.unwrap().into_iter().collect();
	assert_eq!(members, set_of(&["b"]));
}

#[tokio::test]
async fn test_drained_set_is_removed() {
	let adapter = SetAdapterMemory::new();

	adapter.exec(vec![add("k", "a")]).await.unwrap();
	assert!(adapter.contains_key("k").await);

	adapter.exec(vec![remove("k", "a")]).await.unwrap();
	assert!(!adapter.contains_key("k").await);
	assert_eq!(adapter.set_count().await, 0);
}

#[tokio::test]
async fn test_ops_apply_in_order() {
	let adapter = SetAdapterMemory::new();
	adapter.exec(vec![add("k", "old")]).await.unwrap();

	adapter
		.exec(vec![SetOp::Del { keys: keys(&["k"]) }, add("k", "new")])
		.await
		.unwrap();

	let members: HashSet<Value> = adapter.members("k").await.unwrap().into_iter().collect();
	assert_eq!(members, set_of(&["new"]));
}

#[tokio::test]
async fn test_failed_commit_applies_nothing() {
	let adapter = SetAdapterMemory::new();
	adapter.exec(vec![add("k1", "keep")]).await.unwrap();

	adapter.fail_commit_at(2).await;
	let result = adapter
		.exec(vec![
			add("k1", "x"),
			SetOp::Del { keys: keys(&["k1"]) },
			add("k2", "y"),
		])
		.await;
	assert!(result.is_err());

	let members: HashSet<Value> = adapter.members("k1").await.unwrap().into_iter().collect();
	assert_eq!(members, set_of(&["keep"]));
	assert!(!adapter.contains_key("k2").await);

	// The fault is one-shot
	adapter.exec(vec![add("k2", "y")]).await.unwrap();
	assert!(adapter.contains_key("k2").await);
}

#[tokio::test]
async fn test_unreached_commit_fault_is_cleared() {
	let adapter = SetAdapterMemory::new();

	adapter.fail_commit_at(5).await;
	adapter.exec(vec![add("k1", "a"), add("k1", "b")]).await.unwrap();

	// A later, longer commit must not trip the stale fault
	let ops = (0..8).map(|n| add("k2", &n.to_string())).collect();
	adapter.exec(ops).await.unwrap();
	assert_eq!(adapter.members("k2").await.unwrap().len(), 8);
}

#[tokio::test]
async fn test_empty_storage_key_rejects_whole_commit() {
	let adapter = SetAdapterMemory::new();

	let result = adapter.exec(vec![add("k1", "a"), add("", "b")]).await;
	assert!(result.is_err());
	assert!(!adapter.contains_key("k1").await);
}

#[tokio::test]
async fn test_union_batch_reports_per_entry_failures() {
	let adapter = SetAdapterMemory::new();
	adapter.exec(vec![add("a", "1"), add("b", "2"), add("c", "3")]).await.unwrap();
	adapter.fail_union_on("b").await;

	let replies = adapter
		.union_batch(&[keys(&["a", "c"]), keys(&["b"])])
		.await
		.unwrap();
	assert_eq!(replies.len(), 2);
	assert_eq!(replies[0].as_ref().unwrap(), &set_of(&["1", "3"]));
	assert!(replies[1].is_err());

	adapter.clear_faults().await;
	assert_eq!(adapter.union(&keys(&["b"])).await.unwrap(), set_of(&["2"]));
}

#[tokio::test]
async fn test_prefix_enumeration_and_delete() {
	let adapter = SetAdapterMemory::new();
	adapter
		.exec(vec![add("acl_roles@a", "1"), add("acl_roles@b", "2"), add("other_roles@a", "3")])
		.await
		.unwrap();

	let mut found = adapter.keys_with_prefix("acl_").await.unwrap();
	found.sort();
	assert_eq!(found, keys(&["acl_roles@a", "acl_roles@b"]));

	adapter.delete_keys(&found).await.unwrap();
	assert_eq!(adapter.set_count().await, 1);
	assert!(adapter.contains_key("other_roles@a").await);
}

// vim: ts=4
