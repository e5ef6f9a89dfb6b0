//! In-memory Set Adapter
//!
//! Reference implementation of [`SetAdapter`] backed by a `HashMap` of
//! `HashSet`s behind a single `RwLock`. Commits stage the touched sets on a
//! copy and swap them in only when every operation succeeded, so readers
//! never observe half of a commit.
//!
//! Drained sets are removed, so an emptied set and a deleted one look the same.
//!
//! # Fault injection
//!
//! Tests can make the adapter fail on purpose:
//! - [`SetAdapterMemory::fail_commit_at`] fails the next commit when it
//!   reaches the given operation index
//! - [`SetAdapterMemory::fail_union_on`] fails every union that reads the
//!   given storage key

#![forbid(unsafe_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::trace;

use aclstore_types::prelude::*;
use aclstore_types::set_adapter::{SetAdapter, SetOp};

type SetMap = HashMap<Box<str>, HashSet<Value>>;

#[derive(Debug, Default)]
struct Faults {
	/// Fail the next commit when it reaches this operation index
	commit_at: Option<usize>,

	/// Storage keys whose unions fail
	union_keys: HashSet<Box<str>>,
}

#[derive(Debug, Default)]
struct MemoryState {
	sets: SetMap,
	faults: Faults,
}

#[derive(Debug, Default)]
pub struct SetAdapterMemory {
	state: RwLock<MemoryState>,
}

impl SetAdapterMemory {
	pub fn new() -> Self {
		Self::default()
	}

	/// Make the next commit fail when it reaches operation `op_index` (0-based).
	///
	/// The fault only applies to the next commit. A commit with fewer
	/// operations succeeds and clears it.
	pub async fn fail_commit_at(&self, op_index: usize) {
		self.state.write().await.faults.commit_at = Some(op_index);
	}

	/// Make every union reading `storage_key` fail until faults are cleared.
	pub async fn fail_union_on(&self, storage_key: &str) {
		self.state.write().await.faults.union_keys.insert(storage_key.into());
	}

	pub async fn clear_faults(&self) {
		self.state.write().await.faults = Faults::default();
	}

	/// Number of non-empty sets currently stored
	pub async fn set_count(&self) -> usize {
		self.state.read().await.sets.len()
	}

	pub async fn contains_key(&self, storage_key: &str) -> bool {
		self.state.read().await.sets.contains_key(storage_key)
	}
}

fn union_of(state: &MemoryState, keys: &[Box<str>]) -> AclResult<HashSet<Value>> {
	if let Some(key) = keys.iter().find(|key| state.faults.union_keys.contains(*key)) {
		return Err(Error::backend(format!("injected union failure on '{}'", key)));
	}

	let mut result = HashSet::new();
	for key in keys {
		if let Some(set) = state.sets.get(key) {
			result.extend(set.iter().cloned());
		}
	}
	Ok(result)
}

/// Working copy of a set for the current commit
fn staged_set<'a>(sets: &SetMap, staged: &'a mut SetMap, key: Box<str>) -> &'a mut HashSet<Value> {
	staged.entry(key).or_insert_with_key(|key| sets.get(key).cloned().unwrap_or_default())
}

#[async_trait]
impl SetAdapter for SetAdapterMemory {
	async fn members(&self, key: &str) -> AclResult<Vec<Value>> {
		let state = self.state.read().await;
		Ok(state.sets.get(key).map(|set| set.iter().cloned().collect()).unwrap_or_default())
	}

	async fn union(&self, keys: &[Box<str>]) -> AclResult<HashSet<Value>> {
		let state = self.state.read().await;
		union_of(&state, keys)
	}

	async fn union_batch(&self, batch: &[Vec<Box<str>>]) -> AclResult<Vec<AclResult<HashSet<Value>>>> {
		let state = self.state.read().await;
		Ok(batch.iter().map(|keys| union_of(&state, keys)).collect())
	}

	async fn exec(&self, ops: Vec<SetOp>) -> AclResult<()> {
		let mut guard = self.state.write().await;
		let state = &mut *guard;
		let op_count = ops.len();
		let mut staged = SetMap::new();
		// One-shot: consumed by this commit whether or not it reaches the index
		let fail_at = state.faults.commit_at.take();

		for (idx, op) in ops.into_iter().enumerate() {
			if fail_at == Some(idx) {
				debug!("injected commit failure at op {}/{}", idx, op_count);
				return Err(Error::backend(format!("injected commit failure at op {}", idx)));
			}

			if op.keys().iter().any(|key| key.is_empty()) {
				return Err(Error::backend(format!("empty storage key at op {}", idx)));
			}

			match op {
				SetOp::Add { key, value } => {
					staged_set(&state.sets, &mut staged, key).insert(value);
				}
				SetOp::Remove { key, value } => {
					staged_set(&state.sets, &mut staged, key).remove(&value);
				}
				SetOp::Del { keys } => {
					for key in keys {
						staged.insert(key, HashSet::new());
					}
				}
			}
		}

		for (key, set) in staged {
			if set.is_empty() {
				state.sets.remove(&key);
			} else {
				state.sets.insert(key, set);
			}
		}
		trace!("applied {} ops", op_count);

		Ok(())
	}

	async fn keys_with_prefix(&self, prefix: &str) -> AclResult<Vec<Box<str>>> {
		let state = self.state.read().await;
		Ok(state.sets.keys().filter(|key| key.starts_with(prefix)).cloned().collect())
	}

	async fn delete_keys(&self, keys: &[Box<str>]) -> AclResult<()> {
		let mut state = self.state.write().await;
		for key in keys {
			state.sets.remove(key);
		}
		Ok(())
	}
}

// vim: ts=4
