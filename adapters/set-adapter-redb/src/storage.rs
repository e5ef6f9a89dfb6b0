use aclstore_types::types::Value;
use redb::{MultimapTableDefinition, ReadOnlyMultimapTable, ReadableMultimapTable};
use std::collections::HashSet;

use crate::error::{from_redb_error, Error};

/// Set storage table: storage key -> JSON-encoded member (one row per member)
pub const TABLE_SETS: MultimapTableDefinition<&str, &str> = MultimapTableDefinition::new("sets");

pub type SetsTable = ReadOnlyMultimapTable<&'static str, &'static str>;

/// Encode a member for storage.
///
/// JSON keeps strings and integers apart: `"7"` and `7` are different members.
pub fn encode_member(value: &Value) -> Result<String, Error> {
	Ok(serde_json::to_string(value)?)
}

pub fn decode_member(raw: &str) -> Result<Value, Error> {
	Ok(serde_json::from_str(raw)?)
}

/// Read every member stored under `key`
pub fn read_members(table: &SetsTable, key: &str) -> Result<Vec<Value>, Error> {
	let mut members = Vec::new();
	for item in table.get(key).map_err(from_redb_error)? {
		let guard = item.map_err(from_redb_error)?;
		members.push(decode_member(guard.value())?);
	}
	Ok(members)
}

/// Union of the sets stored under `keys`
pub fn read_union(table: &SetsTable, keys: &[Box<str>]) -> Result<HashSet<Value>, Error> {
	let mut result = HashSet::new();
	for key in keys {
		result.extend(read_members(table, key)?);
	}
	Ok(result)
}

/// List every storage key starting with `prefix`
pub fn read_keys_with_prefix(table: &SetsTable, prefix: &str) -> Result<Vec<Box<str>>, Error> {
	let mut keys = Vec::new();
	let range = table.range(prefix..).map_err(from_redb_error)?;

	for item in range {
		let (key, _values) = item.map_err(from_redb_error)?;
		let key_str = key.value();

		if !key_str.starts_with(prefix) {
			break;
		}
		keys.push(Box::from(key_str));
	}

	Ok(keys)
}


// vim: ts=4
