//! Identifier and input types used by the set store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque identifier: either a string or an integer.
///
/// Used both for keys (entities inside a bucket) and for set members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ident {
	Str(Box<str>),
	Int(i64),
}

/// Identifies one Stored Set inside a bucket
pub type Key = Ident;

/// A member of a Stored Set
pub type Value = Ident;

impl Ident {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Ident::Str(s) => Some(s),
			Ident::Int(_) => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Ident::Int(n) => Some(*n),
			Ident::Str(_) => None,
		}
	}

	/// True for the empty string. Integers are never empty.
	pub fn is_empty(&self) -> bool {
		matches!(self, Ident::Str(s) if s.is_empty())
	}
}

impl fmt::Display for Ident {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Ident::Str(s) => f.write_str(s),
			Ident::Int(n) => write!(f, "{}", n),
		}
	}
}

impl From<&str> for Ident {
	fn from(s: &str) -> Self {
		Ident::Str(s.into())
	}
}

impl From<String> for Ident {
	fn from(s: String) -> Self {
		Ident::Str(s.into_boxed_str())
	}
}

impl From<Box<str>> for Ident {
	fn from(s: Box<str>) -> Self {
		Ident::Str(s)
	}
}

impl From<i64> for Ident {
	fn from(n: i64) -> Self {
		Ident::Int(n)
	}
}

impl From<i32> for Ident {
	fn from(n: i32) -> Self {
		Ident::Int(n.into())
	}
}

impl From<u32> for Ident {
	fn from(n: u32) -> Self {
		Ident::Int(n.into())
	}
}

/// A single item or a sequence of items.
///
/// Mutation calls accept either form; `into_vec` is the one place
/// where the two are normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany<T> {
	One(T),
	Many(Vec<T>),
}

/// Values argument of `add` / `remove`
pub type Values = OneOrMany<Value>;

/// Keys argument of `del`
pub type Keys = OneOrMany<Key>;

impl<T> OneOrMany<T> {
	pub fn into_vec(self) -> Vec<T> {
		match self {
			OneOrMany::One(item) => vec![item],
			OneOrMany::Many(items) => items,
		}
	}

	pub fn len(&self) -> usize {
		match self {
			OneOrMany::One(_) => 1,
			OneOrMany::Many(items) => items.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl From<Ident> for OneOrMany<Ident> {
	fn from(item: Ident) -> Self {
		OneOrMany::One(item)
	}
}

impl From<&str> for OneOrMany<Ident> {
	fn from(s: &str) -> Self {
		OneOrMany::One(s.into())
	}
}

impl From<String> for OneOrMany<Ident> {
	fn from(s: String) -> Self {
		OneOrMany::One(s.into())
	}
}

impl From<i64> for OneOrMany<Ident> {
	fn from(n: i64) -> Self {
		OneOrMany::One(n.into())
	}
}

impl From<i32> for OneOrMany<Ident> {
	fn from(n: i32) -> Self {
		OneOrMany::One(n.into())
	}
}

impl From<Vec<Ident>> for OneOrMany<Ident> {
	fn from(items: Vec<Ident>) -> Self {
		OneOrMany::Many(items)
	}
}

impl From<Vec<&str>> for OneOrMany<Ident> {
	fn from(items: Vec<&str>) -> Self {
		OneOrMany::Many(items.into_iter().map(Ident::from).collect())
	}
}

impl From<Vec<String>> for OneOrMany<Ident> {
	fn from(items: Vec<String>) -> Self {
		OneOrMany::Many(items.into_iter().map(Ident::from).collect())
	}
}

impl From<&[&str]> for OneOrMany<Ident> {
	fn from(items: &[&str]) -> Self {
		OneOrMany::Many(items.iter().map(|s| Ident::from(*s)).collect())
	}
}

impl<const N: usize> From<[&str; N]> for OneOrMany<Ident> {
	fn from(items: [&str; N]) -> Self {
		OneOrMany::Many(items.into_iter().map(Ident::from).collect())
	}
}

impl<const N: usize> From<[i64; N]> for OneOrMany<Ident> {
	fn from(items: [i64; N]) -> Self {
		OneOrMany::Many(items.into_iter().map(Ident::from).collect())
	}
}


// vim: ts=4
