use crate::frame::FrameError;
use crate::payload::CodecError;

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::io;

use tokio::task::JoinError;

/// Why a call did not produce a result.
#[derive(Debug)]
#[non_exhaustive]
pub enum RequestError {
	/// The connection was closed before the call could be sent.
	ConnectionAlreadyClosed,
	/// The connection closed while the call was waiting for its response.
	ConnectionClosed,
	/// No response arrived before the configured timeout.
	Timeout,
	/// Every request id of this connection was used.
	IdsExhausted,
	/// The remote handler failed with this message.
	Remote(String),
	Codec(CodecError),
	Frame(FrameError),
}

impl RequestError {
	/// The message of a remote failure.
	pub fn remote_message(&self) -> Option<&str> {
		match self {
			Self::Remote(m) => Some(m),
			_ => None,
		}
	}
}

impl From<CodecError> for RequestError {
	fn from(e: CodecError) -> Self {
		Self::Codec(e)
	}
}

impl From<FrameError> for RequestError {
	fn from(e: FrameError) -> Self {
		Self::Frame(e)
	}
}

impl fmt::Display for RequestError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ConnectionAlreadyClosed => {
				f.write_str("connection already closed")
			}
			Self::ConnectionClosed => {
				f.write_str("connection closed before a response arrived")
			}
			Self::Timeout => f.write_str("request timed out"),
			Self::IdsExhausted => f.write_str("request ids exhausted"),
			Self::Remote(m) => f.write_str(m),
			Self::Codec(e) => write!(f, "codec: {e}"),
			Self::Frame(e) => write!(f, "frame: {e}"),
		}
	}
}

impl StdError for RequestError {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		match self {
			Self::Codec(e) => Some(e),
			Self::Frame(e) => Some(e),
			_ => None,
		}
	}
}

/// A background task failed.
#[derive(Debug)]
#[non_exhaustive]
pub enum TaskError {
	Io(io::Error),
	Join(JoinError),
}

impl fmt::Display for TaskError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Io(e) => write!(f, "io: {e}"),
			Self::Join(e) => write!(f, "join: {e}"),
		}
	}
}

impl StdError for TaskError {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		match self {
			Self::Io(e) => Some(e),
			Self::Join(e) => Some(e),
		}
	}
}

/// Returned by a handler to fail a call.
///
/// The message is sent back to the caller inside an `ErrorPayload`. Any
/// error converts with `?`, plain messages use [`ServiceError::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
	message: Cow<'static, str>,
}

impl ServiceError {
	pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
		Self {
			message: message.into(),
		}
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

impl<E> From<E> for ServiceError
where
	E: StdError,
{
	fn from(e: E) -> Self {
		Self::new(e.to_string())
	}
}

impl fmt::Display for ServiceError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.message)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn service_error_from_error() {
		let e: ServiceError =
			io::Error::other("disk full").into();
		assert_eq!(e.message(), "disk full");

		let e = ServiceError::new("bad input");
		assert_eq!(e.to_string(), "bad input");
	}
}
