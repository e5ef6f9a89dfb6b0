//! Set Adapter
//!
//! Trait and types for pluggable backends that store named sets of values
//! under opaque storage keys (produced by the [`KeyCodec`](crate::key_codec::KeyCodec)).
//!
//! Read operations (members, union, union_batch) work directly on the adapter.
//! Write operations are collected into a list of [`SetOp`]s and applied by
//! [`SetAdapter::exec`] as one atomic unit.
//!
//! Each adapter implementation provides its own constructor handling backend-specific
//! initialization (database path, connection settings, etc.).

use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt::Debug;

use crate::prelude::*;

/// A single queued mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOp {
	/// Insert one value into the set at a storage key
	Add { key: Box<str>, value: Value },

	/// Remove one value from the set at a storage key
	Remove { key: Box<str>, value: Value },

	/// Delete the sets at the given storage keys entirely
	Del { keys: Vec<Box<str>> },
}

impl SetOp {
	/// Storage keys touched by this operation.
	pub fn keys(&self) -> &[Box<str>] {
		match self {
			SetOp::Add { key, .. } | SetOp::Remove { key, .. } => std::slice::from_ref(key),
			SetOp::Del { keys } => keys,
		}
	}
}

/// Set Adapter trait.
///
/// Unified interface for set storage backends. Provides atomic batched writes,
/// single and batched union reads, and prefix enumeration.
///
/// A set with no members must be indistinguishable from an absent one: `members`
/// and `union` return empty results for unknown keys, never an error.
#[async_trait]
pub trait SetAdapter: Debug + Send + Sync {
	/// Return every member of the set at `key` (empty if the set does not exist).
	async fn members(&self, key: &str) -> AclResult<Vec<Value>>;

	/// Return the union of the sets at `keys`.
	async fn union(&self, keys: &[Box<str>]) -> AclResult<HashSet<Value>>;

	/// Execute several unions as one batched request.
	///
	/// The outer result reports a failure of the batch as a whole. The inner
	/// results are aligned with `batch` and report per-union failures.
	async fn union_batch(&self, batch: &[Vec<Box<str>>]) -> AclResult<Vec<AclResult<HashSet<Value>>>>;

	/// Apply all operations atomically, in order.
	///
	/// Either every operation takes effect or, on error, none does.
	async fn exec(&self, ops: Vec<SetOp>) -> AclResult<()>;

	/// List every storage key starting with `prefix`.
	async fn keys_with_prefix(&self, prefix: &str) -> AclResult<Vec<Box<str>>>;

	/// Delete the sets at `keys` immediately, outside of any transaction.
	async fn delete_keys(&self, keys: &[Box<str>]) -> AclResult<()>;
}

// vim: ts=4
