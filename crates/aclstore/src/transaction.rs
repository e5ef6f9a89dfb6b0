//! Transaction Context
//!
//! A caller-owned queue of mutations. Contexts are created by
//! [`SetStore::begin`](crate::SetStore::begin), filled by `add` / `remove` / `del`,
//! and applied atomically by [`SetStore::end`](crate::SetStore::end).
//!
//! ```text
//! Open --end ok--> Committed
//!   \--end err / cancelled--> Aborted
//! ```
//!
//! An open context holds no backend resources. Dropping it without calling
//! `end` discards the queue.

use std::sync::atomic::{AtomicU64, Ordering};

use aclstore_types::prelude::*;
use aclstore_types::set_adapter::SetOp;

static NEXT_TX_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
	Open,
	Committed,
	Aborted,
}

#[derive(Debug)]
pub struct TransactionContext {
	id: u64,
	state: TxState,
	ops: Vec<SetOp>,
}

impl TransactionContext {
	pub(crate) fn new() -> Self {
		Self { id: NEXT_TX_ID.fetch_add(1, Ordering::Relaxed), state: TxState::Open, ops: Vec::new() }
	}

	/// Process-unique id, used for log correlation
	pub fn id(&self) -> u64 {
		self.id
	}

	pub fn state(&self) -> TxState {
		self.state
	}

	pub fn is_open(&self) -> bool {
		self.state == TxState::Open
	}

	/// Number of queued operations
	pub fn len(&self) -> usize {
		self.ops.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ops.is_empty()
	}

	/// Queued operations, in application order
	pub fn ops(&self) -> &[SetOp] {
		&self.ops
	}

	pub(crate) fn ensure_open(&self) -> AclResult<()> {
		match self.state {
			TxState::Open => Ok(()),
			TxState::Committed => {
				Err(Error::invalid_state(format!("transaction {} is already committed", self.id)))
			}
			TxState::Aborted => {
				Err(Error::invalid_state(format!("transaction {} was aborted", self.id)))
			}
		}
	}

	pub(crate) fn push_all(&mut self, ops: impl IntoIterator<Item = SetOp>) -> AclResult<()> {
		self.ensure_open()?;
		self.ops.extend(ops);
		Ok(())
	}

	/// Take the queue for commit.
	///
	/// The context is marked `Aborted` until the commit reports success, so a
	/// cancelled commit leaves it terminal.
	pub(crate) fn take_for_commit(&mut self) -> AclResult<Vec<SetOp>> {
		self.ensure_open()?;
		self.state = TxState::Aborted;
		Ok(std::mem::take(&mut self.ops))
	}

	pub(crate) fn mark_committed(&mut self) {
		self.state = TxState::Committed;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn add_op(key: &str, value: &str) -> SetOp {
		SetOp::Add { key: key.into(), value: value.into() }
	}

	#[test]
	fn test_ids_are_unique() {
		let a = TransactionContext::new();
		let b = TransactionContext::new();
		assert_ne!(a.id(), b.id());
	}

	#[test]
	fn test_queue_preserves_order() {
		let mut tx = TransactionContext::new();
		tx.push_all([SetOp::Del { keys: vec!["k".into()] }]).unwrap();
		tx.push_all([add_op("k", "v")]).unwrap();
		assert_eq!(tx.len(), 2);
		assert!(matches!(tx.ops()[0], SetOp::Del { .. }));
		assert!(matches!(tx.ops()[1], SetOp::Add { .. }));
	}

	#[test]
	fn test_take_for_commit_is_single_shot() {
		let mut tx = TransactionContext::new();
		tx.push_all([add_op("k", "v")]).unwrap();

		let ops = tx.take_for_commit().unwrap();
		assert_eq!(ops.len(), 1);
		assert_eq!(tx.state(), TxState::Aborted);
		assert!(tx.is_empty());

		tx.mark_committed();
		assert_eq!(tx.state(), TxState::Committed);
		assert!(matches!(tx.take_for_commit(), Err(Error::InvalidState(_))));
		assert!(matches!(tx.push_all([add_op("k", "w")]), Err(Error::InvalidState(_))));
	}
}

// vim: ts=4
