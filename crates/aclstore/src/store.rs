//! Set Store
//!
//! Prefix-scoped access to named sets addressed by (bucket, key).
//!
//! Reads (`get`, `union`, `unions`) go straight to the adapter. Mutations
//! (`add`, `remove`, `del`) are queued on a [`TransactionContext`] and applied
//! together by [`SetStore::end`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use aclstore_types::key_codec::KeyCodec;
use aclstore_types::prelude::*;
use aclstore_types::set_adapter::{SetAdapter, SetOp};

use crate::settings::StoreConfig;
use crate::transaction::TransactionContext;

#[derive(Debug, Clone)]
pub struct SetStore {
	adapter: Arc<dyn SetAdapter>,
	codec: KeyCodec,
}

impl SetStore {
	pub fn new(adapter: Arc<dyn SetAdapter>, config: &StoreConfig) -> AclResult<Self> {
		let codec = KeyCodec::new(&config.prefix, config.key_encoding)?;
		Ok(Self { adapter, codec })
	}

	/// Create a store with the default configuration and an optional prefix
	pub fn with_prefix(adapter: Arc<dyn SetAdapter>, prefix: Option<&str>) -> AclResult<Self> {
		let mut config = StoreConfig::default();
		if let Some(prefix) = prefix {
			config.prefix = prefix.into();
		}
		Self::new(adapter, &config)
	}

	pub fn prefix(&self) -> &str {
		self.codec.prefix()
	}

	pub fn codec(&self) -> &KeyCodec {
		&self.codec
	}

	/// Begin a transaction
	pub fn begin(&self) -> TransactionContext {
		let tx = TransactionContext::new();
		debug!("begin tx={} prefix={}", tx.id(), self.prefix());
		tx
	}

	/// End a transaction, applying every queued mutation atomically.
	///
	/// On failure nothing is applied, the context is left `Aborted`, and the
	/// backend error is returned.
	pub async fn end(&self, tx: &mut TransactionContext) -> AclResult<()> {
		let ops = tx.take_for_commit()?;
		let op_count = ops.len();

		if ops.is_empty() {
			tx.mark_committed();
			debug!("commit tx={} (empty)", tx.id());
			return Ok(());
		}

		match self.adapter.exec(ops).await {
			Ok(()) => {
				tx.mark_committed();
				debug!("commit tx={} ops={}", tx.id(), op_count);
				Ok(())
			}
			Err(err) => {
				warn!("abort tx={} ops={}: {}", tx.id(), op_count, err);
				Err(err)
			}
		}
	}

	/// Get the contents of the set at a bucket's key.
	///
	/// Returns an empty set if nothing is stored there.
	pub async fn get(&self, bucket: &str, key: impl Into<Key>) -> AclResult<HashSet<Value>> {
		let storage_key = self.codec.encode(bucket, &key.into())?;
		let members = self.adapter.members(&storage_key).await?;
		Ok(members.into_iter().collect())
	}

	/// Union of the sets at the given keys inside one bucket
	pub async fn union(&self, bucket: &str, keys: &[Key]) -> AclResult<HashSet<Value>> {
		self.codec.check_bucket(bucket)?;
		if keys.is_empty() {
			return Ok(HashSet::new());
		}

		let storage_keys = self.codec.encode_many(bucket, keys)?;
		self.adapter.union(&storage_keys).await
	}

	/// Map each bucket to the union of the given keys inside that bucket.
	///
	/// All unions are sent to the adapter as one batch. A failure in any of
	/// them fails the whole call.
	pub async fn unions(
		&self,
		buckets: &[&str],
		keys: &[Key],
	) -> AclResult<HashMap<Box<str>, HashSet<Value>>> {
		for bucket in buckets {
			self.codec.check_bucket(bucket)?;
		}
		if buckets.is_empty() {
			return Ok(HashMap::new());
		}
		if keys.is_empty() {
			return Ok(buckets.iter().map(|bucket| ((*bucket).into(), HashSet::new())).collect());
		}

		let batch = buckets
			.iter()
			.map(|bucket| self.codec.encode_many(bucket, keys))
			.collect::<AclResult<Vec<_>>>()?;

		let replies = self.adapter.union_batch(&batch).await?;
		if replies.len() != buckets.len() {
			return Err(Error::backend(format!(
				"union batch returned {} replies for {} buckets",
				replies.len(),
				buckets.len()
			)));
		}

		let mut result = HashMap::with_capacity(buckets.len());
		for (bucket, reply) in buckets.iter().zip(replies) {
			match reply {
				Ok(members) => {
					result.insert((*bucket).into(), members);
				}
				Err(err) => {
					warn!("unions: sub-query for bucket '{}' failed: {}", bucket, err);
					return Err(match err {
						Error::BackendError(_) => err,
						other => Error::backend(other.to_string()),
					});
				}
			}
		}

		Ok(result)
	}

	/// Queue adding values to a given key inside a bucket
	pub fn add(
		&self,
		tx: &mut TransactionContext,
		bucket: &str,
		key: impl Into<Key>,
		values: impl Into<Values>,
	) -> AclResult<()> {
		let (storage_key, values) = self.prepare_values(bucket, key.into(), values.into())?;
		debug!("tx={} add {} ({} values)", tx.id(), storage_key, values.len());

		tx.push_all(values.into_iter().map(|value| SetOp::Add { key: storage_key.clone(), value }))
	}

	/// Queue removing values from a given key inside a bucket
	pub fn remove(
		&self,
		tx: &mut TransactionContext,
		bucket: &str,
		key: impl Into<Key>,
		values: impl Into<Values>,
	) -> AclResult<()> {
		let (storage_key, values) = self.prepare_values(bucket, key.into(), values.into())?;
		debug!("tx={} remove {} ({} values)", tx.id(), storage_key, values.len());

		tx.push_all(
			values.into_iter().map(|value| SetOp::Remove { key: storage_key.clone(), value }),
		)
	}

	/// Queue deleting the given key(s) of a bucket
	pub fn del(
		&self,
		tx: &mut TransactionContext,
		bucket: &str,
		keys: impl Into<Keys>,
	) -> AclResult<()> {
		let keys = keys.into().into_vec();
		if keys.is_empty() {
			return Err(Error::invalid_argument("keys must not be empty"));
		}

		let storage_keys = self.codec.encode_many(bucket, &keys)?;
		debug!("tx={} del {:?}", tx.id(), storage_keys);

		tx.push_all([SetOp::Del { keys: storage_keys }])
	}

	/// Delete every set under this store's prefix, immediately.
	///
	/// Meant for test teardown and resets, not hot paths.
	pub async fn clean(&self) -> AclResult<()> {
		let keys = self.adapter.keys_with_prefix(self.codec.namespace()).await?;
		if !keys.is_empty() {
			self.adapter.delete_keys(&keys).await?;
		}
		info!("clean prefix={}: removed {} sets", self.prefix(), keys.len());
		Ok(())
	}

	fn prepare_values(
		&self,
		bucket: &str,
		key: Key,
		values: Values,
	) -> AclResult<(Box<str>, Vec<Value>)> {
		let values = values.into_vec();
		if values.is_empty() {
			return Err(Error::invalid_argument("values must not be empty"));
		}

		let storage_key = self.codec.encode(bucket, &key)?;
		Ok((storage_key, values))
	}
}

// vim: ts=4
