//! Shared test helpers

#![allow(dead_code)]

use aclstore::{SetStore, StoreConfig, Value};
use aclstore_set_adapter_memory::SetAdapterMemory;
use std::collections::HashSet;
use std::sync::Arc;

/// Initialize a tracing subscriber for test debugging
pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.try_init();
}

/// Create a store over a fresh in-memory adapter.
///
/// The adapter is returned too, for fault injection and raw inspection.
pub fn create_test_store(prefix: &str) -> (SetStore, Arc<SetAdapterMemory>) {
	setup_test_logging();
	let adapter = Arc::new(SetAdapterMemory::new());
	let store = SetStore::new(adapter.clone(), &StoreConfig::default().with_prefix(prefix))
		.expect("Failed to create store");
	(store, adapter)
}

pub fn set_of(values: &[&str]) -> HashSet<Value> {
	values.iter().map(|v| Value::from(*v)).collect()
}

// vim: ts=4
