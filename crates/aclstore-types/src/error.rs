//! Error taxonomy shared by the store and every adapter.

pub type AclResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Malformed or empty input, detected before any backend call
	InvalidArgument(Box<str>),
	/// Transaction misuse (ending twice, queueing after commit)
	InvalidState(Box<str>),
	/// The backend reported a failure; carries the underlying cause
	BackendError(Box<str>),
}

impl Error {
	pub fn invalid_argument(msg: impl Into<Box<str>>) -> Self {
		Self::InvalidArgument(msg.into())
	}

	pub fn invalid_state(msg: impl Into<Box<str>>) -> Self {
		Self::InvalidState(msg.into())
	}

	pub fn backend(msg: impl Into<Box<str>>) -> Self {
		Self::BackendError(msg.into())
	}

	/// Only backend failures are worth retrying.
	pub fn is_transient(&self) -> bool {
		matches!(self, Error::BackendError(_))
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
			Error::InvalidState(msg) => write!(f, "invalid state: {}", msg),
			Error::BackendError(msg) => write!(f, "backend error: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::BackendError(err.to_string().into())
	}
}

impl From<tokio::task::JoinError> for Error {
	fn from(err: tokio::task::JoinError) -> Self {
		Self::BackendError(err.to_string().into())
	}
}


// vim: ts=4
