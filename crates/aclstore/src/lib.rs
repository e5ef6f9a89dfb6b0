//! Set storage for ACL data.
//!
//! Permission data (roles, resources, allowed actions, role hierarchies) is
//! stored as named sets addressed by (bucket, key) under a namespace prefix.
//! The backend is pluggable through the [`SetAdapter`] trait:
//!
//! ```text
//! SetStore ──encode──> KeyCodec
//!    │
//!    └──members / union / union_batch / exec──> dyn SetAdapter
//! ```
//!
//! Mutations are queued on an explicit [`TransactionContext`] and committed
//! atomically with [`SetStore::end`]:
//!
//! ```ignore
//! let mut tx = store.begin();
//! store.add(&mut tx, "roles", "admin", ["read", "write"])?;
//! store.end(&mut tx).await?;
//! assert_eq!(store.get("roles", "admin").await?.len(), 2);
//! ```

#![forbid(unsafe_code)]

pub mod settings;
pub mod store;
pub mod transaction;

pub use aclstore_types::error::{AclResult, Error};
pub use aclstore_types::key_codec::{KeyCodec, KeyEncoding};
pub use aclstore_types::set_adapter::{SetAdapter, SetOp};
pub use aclstore_types::types::{Ident, Key, Keys, OneOrMany, Value, Values};

pub use settings::StoreConfig;
pub use store::SetStore;
pub use transaction::{TransactionContext, TxState};

// vim: ts=4
