//! Redb-based Set Adapter
//!
//! Implements the [`SetAdapter`] trait on top of redb, an embedded
//! transactional key-value store.
//!
//! # Storage Layout
//!
//! All sets live in one multimap table:
//! - `sets` - storage key -> JSON-encoded member, one row per member
//!
//! Multimap values are unique per key, which gives set semantics for free.
//! Removing the last member removes the key, so drained sets disappear.
//!
//! # Transactions
//!
//! Every [`SetAdapter::exec`] call runs in a single redb write transaction.
//! If any operation fails the transaction is dropped without commit and
//! nothing is applied. Batched unions share one read transaction and see
//! one consistent snapshot.

#![forbid(unsafe_code)]

mod error;
pub mod storage;

use async_trait::async_trait;
use redb::ReadableDatabase;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub use error::Error;

use aclstore_types::error::Error as AclError;
use aclstore_types::prelude::{AclResult, Value};
use aclstore_types::set_adapter::{SetAdapter, SetOp};

use error::from_redb_error;

/// Adapter configuration options
#[derive(Debug, Clone)]
pub struct AdapterConfig {
	/// Database file name inside the storage directory
	pub file_name: Box<str>,
}

impl Default for AdapterConfig {
	fn default() -> Self {
		Self { file_name: "aclstore.redb".into() }
	}
}

/// redb-based implementation of SetAdapter.
#[derive(Debug)]
pub struct SetAdapterRedb {
	db_path: PathBuf,
	db: Arc<redb::Database>,
}

impl SetAdapterRedb {
	/// Create a new redb-based set adapter.
	///
	/// # Arguments
	///
	/// * `storage_dir` - Directory where the database file is stored (created if missing)
	/// * `config` - Adapter configuration
	pub async fn new(storage_dir: PathBuf, config: AdapterConfig) -> AclResult<Self> {
		tokio::fs::create_dir_all(&storage_dir).await.map_err(Error::from)?;
		let db_path = storage_dir.join(&*config.file_name);

		let path = db_path.clone();
		let db = tokio::task::spawn_blocking(move || open_db_file(&path)).await.map_err(Error::from)??;
		info!("Opened set database: {}", db_path.display());

		Ok(Self { db_path, db: Arc::new(db) })
	}

	pub fn path(&self) -> &Path {
		&self.db_path
	}

	/// Run a read-only closure against the sets table in its own read transaction
	async fn read<T, F>(&self, f: F) -> AclResult<T>
	where
		T: Send + 'static,
		F: FnOnce(&storage::SetsTable) -> AclResult<T> + Send + 'static,
	{
		let db = Arc::clone(&self.db);

		tokio::task::spawn_blocking(move || {
			let tx = db.begin_read().map_err(from_redb_error)?;
			let table = tx.open_multimap_table(storage::TABLE_SETS).map_err(from_redb_error)?;
			f(&table)
		})
		.await
		.map_err(Error::from)?
	}
}

fn open_db_file(db_path: &Path) -> AclResult<redb::Database> {
	let db = if db_path.exists() {
		redb::Database::open(db_path).map_err(from_redb_error)?
	} else {
		redb::Database::create(db_path).map_err(from_redb_error)?
	};

	// Initialize tables so read transactions never see a missing table
	let tx = db.begin_write().map_err(from_redb_error)?;
	let _ = tx.open_multimap_table(storage::TABLE_SETS).map_err(from_redb_error)?;
	tx.commit().map_err(from_redb_error)?;

	Ok(db)
}

/// Apply all operations in one write transaction, committing only if every one succeeds
fn apply_ops(db: &redb::Database, ops: &[SetOp]) -> Result<(), Error> {
	let tx = db.begin_write().map_err(from_redb_error)?;

	{
		let mut table = tx.open_multimap_table(storage::TABLE_SETS).map_err(from_redb_error)?;

		for (idx, op) in ops.iter().enumerate() {
			// Returning early drops the write transaction uncommitted
			if op.keys().iter().any(|key| key.is_empty()) {
				return Err(Error::InvalidKey(format!("empty storage key at op {}", idx)));
			}

			match op {
				SetOp::Add { key, value } => {
					let member = storage::encode_member(value)?;
					table.insert(&**key, member.as_str()).map_err(from_redb_error)?;
				}
				SetOp::Remove { key, value } => {
					let member = storage::encode_member(value)?;
					table.remove(&**key, member.as_str()).map_err(from_redb_error)?;
				}
				SetOp::Del { keys } => {
					for key in keys {
						table.remove_all(&**key).map_err(from_redb_error)?;
					}
				}
			}
		}
	}

	tx.commit().map_err(from_redb_error)?;
	Ok(())
}

#[async_trait]
impl SetAdapter for SetAdapterRedb {
	async fn members(&self, key: &str) -> AclResult<Vec<Value>> {
		let key = key.to_string();
		self.read(move |table| Ok(storage::read_members(table, &key)?)).await
	}

	async fn union(&self, keys: &[Box<str>]) -> AclResult<HashSet<Value>> {
		let keys = keys.to_vec();
		self.read(move |table| Ok(storage::read_union(table, &keys)?)).await
	}

	async fn union_batch(&self, batch: &[Vec<Box<str>>]) -> AclResult<Vec<AclResult<HashSet<Value>>>> {
		let batch = batch.to_vec();
		self.read(move |table| {
			Ok(batch
				.iter()
				.map(|keys| storage::read_union(table, keys).map_err(AclError::from))
				.collect::<Vec<_>>())
		})
		.await
	}

	async fn exec(&self, ops: Vec<SetOp>) -> AclResult<()> {
		let db = Arc::clone(&self.db);
		let op_count = ops.len();

		tokio::task::spawn_blocking(move || apply_ops(&db, &ops)).await.map_err(Error::from)??;
		debug!("committed {} ops", op_count);

		Ok(())
	}

	async fn keys_with_prefix(&self, prefix: &str) -> AclResult<Vec<Box<str>>> {
		let prefix = prefix.to_string();
		self.read(move |table| Ok(storage::read_keys_with_prefix(table, &prefix)?)).await
	}

	async fn delete_keys(&self, keys: &[Box<str>]) -> AclResult<()> {
		let ops = vec![SetOp::Del { keys: keys.to_vec() }];
		let db = Arc::clone(&self.db);

		tokio::task::spawn_blocking(move || apply_ops(&db, &ops)).await.map_err(Error::from)??;
		Ok(())
	}
}

// vim: ts=4
