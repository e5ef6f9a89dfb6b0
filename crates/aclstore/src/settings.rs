//! Store configuration
//!
//! `StoreConfig` can be built in code, deserialized as part of a host
//! application's configuration, or read from the environment:
//!
//! - `ACL_PREFIX` - namespace prefix (default `acl`)
//! - `ACL_KEY_ENCODING` - `escaped` (default) or `raw`

use serde::Deserialize;
use std::env;

use aclstore_types::key_codec::{KeyCodec, KeyEncoding};
use aclstore_types::prelude::*;

pub const DEFAULT_PREFIX: &str = "acl";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
	/// Namespace of every storage key written by the store
	pub prefix: Box<str>,

	/// Storage key layout
	pub key_encoding: KeyEncoding,
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self { prefix: DEFAULT_PREFIX.into(), key_encoding: KeyEncoding::default() }
	}
}

impl StoreConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_prefix(mut self, prefix: impl Into<Box<str>>) -> Self {
		self.prefix = prefix.into();
		self
	}

	pub fn with_key_encoding(mut self, key_encoding: KeyEncoding) -> Self {
		self.key_encoding = key_encoding;
		self
	}

	/// Build a config from `ACL_PREFIX` and `ACL_KEY_ENCODING`, falling back to defaults.
	pub fn from_env() -> AclResult<Self> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AclResult<Self> {
		let mut config = Self::default();

		if let Some(prefix) = lookup("ACL_PREFIX") {
			if prefix.is_empty() {
				return Err(Error::invalid_argument("ACL_PREFIX must not be empty"));
			}
			config.prefix = prefix.into();
		}
		if let Some(encoding) = lookup("ACL_KEY_ENCODING") {
			config.key_encoding = encoding.parse()?;
		}

		// Reject combinations the store would refuse, e.g. a raw prefix with a separator
		KeyCodec::new(&config.prefix, config.key_encoding)?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> =
			vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
		move |name| vars.get(name).cloned()
	}

	#[test]
	fn test_defaults() {
		let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
		assert_eq!(config, StoreConfig::default());
		assert_eq!(config.prefix.as_ref(), "acl");
		assert_eq!(config.key_encoding, KeyEncoding::Escaped);
	}

	#[test]
	fn test_env_overrides() {
		let config = StoreConfig::from_lookup(lookup_from(&[
			("ACL_PREFIX", "tenant1"),
			("ACL_KEY_ENCODING", "raw"),
		]))
		.unwrap();
		assert_eq!(config.prefix.as_ref(), "tenant1");
		assert_eq!(config.key_encoding, KeyEncoding::Raw);
	}

	#[test]
	fn test_env_rejects_bad_values() {
		assert!(StoreConfig::from_lookup(lookup_from(&[("ACL_PREFIX", "")])).is_err());
		assert!(StoreConfig::from_lookup(lookup_from(&[("ACL_KEY_ENCODING", "hex")])).is_err());
		assert!(matches!(
			StoreConfig::from_lookup(lookup_from(&[
				("ACL_PREFIX", "tenant_1"),
				("ACL_KEY_ENCODING", "raw"),
			])),
			Err(Error::InvalidArgument(_))
		));
		assert!(
			StoreConfig::from_lookup(lookup_from(&[("ACL_PREFIX", "tenant_1")])).is_ok()
		);
	}

	#[test]
	fn test_deserialize_partial() {
		let config: StoreConfig = serde_json::from_str(r#"{"prefix":"app"}"#).unwrap();
		assert_eq!(config.prefix.as_ref(), "app");
		assert_eq!(config.key_encoding, KeyEncoding::Escaped);

		let config: StoreConfig = serde_json::from_str(r#"{"keyEncoding":"raw"}"#).unwrap();
		assert_eq!(config.prefix.as_ref(), "acl");
		assert_eq!(config.key_encoding, KeyEncoding::Raw);
	}
}

// vim: ts=4
