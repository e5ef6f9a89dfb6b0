use aclstore_types::error::Error as AclError;
use std::fmt;

/// Internal error type for the redb set adapter
#[derive(Debug)]
pub enum Error {
	RedbError(String),
	JsonError(String),
	IoError(std::io::Error),
	TaskError(String),
	InvalidKey(String),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::RedbError(msg) => write!(f, "redb error: {}", msg),
			Error::JsonError(msg) => write!(f, "json error: {}", msg),
			Error::IoError(e) => write!(f, "io error: {}", e),
			Error::TaskError(msg) => write!(f, "blocking task failed: {}", msg),
			Error::InvalidKey(msg) => write!(f, "invalid storage key: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(e: std::io::Error) -> Self {
		Error::IoError(e)
	}
}

impl From<serde_json::Error> for Error {
	fn from(e: serde_json::Error) -> Self {
		Error::JsonError(e.to_string())
	}
}

impl From<tokio::task::JoinError> for Error {
	fn from(e: tokio::task::JoinError) -> Self {
		Error::TaskError(e.to_string())
	}
}

impl From<Error> for AclError {
	fn from(e: Error) -> Self {
		// Everything the driver reports is a backend failure to the store
		AclError::BackendError(e.to_string().into())
	}
}

/// Helper to convert redb errors
pub fn from_redb_error<E: fmt::Display>(err: E) -> Error {
	Error::RedbError(err.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_io_error_becomes_backend_error() {
		let err = Error::from(std::io::Error::other("read-only file system"));
		assert!(matches!(err, Error::IoError(_)));
		assert!(matches!(AclError::from(err), AclError::BackendError(ref msg) if msg.contains("read-only")));
	}

	#[tokio::test]
	async fn test_join_error_becomes_task_error() {
		let join_err = tokio::task::spawn_blocking(|| panic!("boom")).await.unwrap_err();
		let err = Error::from(join_err);
		assert!(matches!(err, Error::TaskError(_)));
		assert!(AclError::from(err).is_transient());
	}
}

// vim: ts=4
