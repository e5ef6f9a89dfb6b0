//! Key Codec
//!
//! Maps a (prefix, bucket, key) triple to a single storage-engine key:
//!
//! ```text
//! <prefix>_<bucket>@<key>
//! ```
//!
//! With [`KeyEncoding::Escaped`] (the default) every `\`, `_` and `@` inside
//! the prefix, bucket and key is backslash-escaped, so distinct triples never
//! produce the same storage key and the namespace of one prefix is never a
//! string prefix of another prefix's keys.
//!
//! [`KeyEncoding::Raw`] reproduces the unescaped layout byte for byte. In that
//! mode buckets and keys containing a separator are rejected instead of being
//! allowed to collide. The same goes for a prefix containing a separator.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::prelude::*;

const PREFIX_SEP: char = '_';
const KEY_SEP: char = '@';
const ESCAPE: char = '\\';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEncoding {
	#[default]
	Escaped,
	Raw,
}

impl std::str::FromStr for KeyEncoding {
	type Err = Error;

	fn from_str(s: &str) -> AclResult<Self> {
		match s.trim().to_ascii_lowercase().as_str() {
			"escaped" => Ok(KeyEncoding::Escaped),
			"raw" => Ok(KeyEncoding::Raw),
			other => Err(Error::invalid_argument(format!("unknown key encoding: {}", other))),
		}
	}
}

/// Escape separator and escape characters
pub fn escape(s: &str) -> Cow<'_, str> {
	if !s.contains([PREFIX_SEP, KEY_SEP, ESCAPE]) {
		return Cow::Borrowed(s);
	}

	let mut out = String::with_capacity(s.len() + 4);
	for c in s.chars() {
		if matches!(c, PREFIX_SEP | KEY_SEP | ESCAPE) {
			out.push(ESCAPE);
		}
		out.push(c);
	}
	Cow::Owned(out)
}

#[derive(Debug, Clone)]
pub struct KeyCodec {
	prefix: Box<str>,
	encoding: KeyEncoding,
	/// Encoded `<prefix>_`, shared by every key this codec produces
	namespace: Box<str>,
}

impl KeyCodec {
	pub fn new(prefix: &str, encoding: KeyEncoding) -> AclResult<Self> {
		if prefix.is_empty() {
			return Err(Error::invalid_argument("prefix must not be empty"));
		}
		// An unescaped separator would let this namespace nest inside another
		if encoding == KeyEncoding::Raw && prefix.contains([PREFIX_SEP, KEY_SEP]) {
			return Err(Error::invalid_argument(format!(
				"prefix '{}' contains a separator character",
				prefix
			)));
		}

		let namespace = match encoding {
			KeyEncoding::Escaped => format!("{}{}", escape(prefix), PREFIX_SEP),
			KeyEncoding::Raw => format!("{}{}", prefix, PREFIX_SEP),
		};

		Ok(Self { prefix: prefix.into(), encoding, namespace: namespace.into() })
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	pub fn encoding(&self) -> KeyEncoding {
		self.encoding
	}

	/// Storage-key prefix of every key under this codec's prefix
	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// Validate a bucket name without encoding anything
	pub fn check_bucket(&self, bucket: &str) -> AclResult<()> {
		if bucket.is_empty() {
			return Err(Error::invalid_argument("bucket must not be empty"));
		}
		if self.encoding == KeyEncoding::Raw && bucket.contains([PREFIX_SEP, KEY_SEP]) {
			return Err(Error::invalid_argument(format!(
				"bucket '{}' contains a separator character",
				bucket
			)));
		}
		Ok(())
	}

	fn check_key(&self, key: &Key) -> AclResult<()> {
		if key.is_empty() {
			return Err(Error::invalid_argument("key must not be empty"));
		}
		if self.encoding == KeyEncoding::Raw {
			if let Key::Str(s) = key {
				if s.contains([PREFIX_SEP, KEY_SEP]) {
					return Err(Error::invalid_argument(format!(
						"key '{}' contains a separator character",
						s
					)));
				}
			}
		}
		Ok(())
	}

	fn encode_unchecked(&self, bucket: &str, key: &Key) -> Box<str> {
		let key = key.to_string();
		let encoded = match self.encoding {
			KeyEncoding::Escaped => {
				format!("{}{}{}{}", self.namespace, escape(bucket), KEY_SEP, escape(&key))
			}
			KeyEncoding::Raw => format!("{}{}{}{}", self.namespace, bucket, KEY_SEP, key),
		};
		encoded.into()
	}

	/// Encode one (bucket, key) pair
	pub fn encode(&self, bucket: &str, key: &Key) -> AclResult<Box<str>> {
		self.check_bucket(bucket)?;
		self.check_key(key)?;
		Ok(self.encode_unchecked(bucket, key))
	}

	/// Encode several keys of one bucket, preserving input order.
	///
	/// Every key is validated before any is encoded.
	pub fn encode_many(&self, bucket: &str, keys: &[Key]) -> AclResult<Vec<Box<str>>> {
		self.check_bucket(bucket)?;
		for key in keys {
			self.check_key(key)?;
		}
		Ok(keys.iter().map(|key| self.encode_unchecked(bucket, key)).collect())
	}
}


// vim: ts=4
