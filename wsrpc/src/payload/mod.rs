//! Payloads carried by frames.
//!
//! Generated code only talks to payloads through [`IntoPayload`] and
//! [`FromPayload`], the serialisation format itself is up to the type.
//! Use `#[derive(IntoPayload, FromPayload)]` together with
//! `#[payload(json)]` to encode a serde type as json, or with
//! `#[payload(protobuf)]` for a `protopuffer` message.

use protopuffer::decode::{DecodeError, DecodeMessage};
use protopuffer::encode::{EncodeError, EncodeMessage};

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

#[derive(Debug)]
#[non_exhaustive]
pub enum CodecError {
	#[cfg(feature = "json")]
	Json(serde_json::Error),
	Encode(EncodeError),
	Decode(DecodeError),
	Malformed(Cow<'static, str>),
	Other(Cow<'static, str>),
}

impl From<EncodeError> for CodecError {
	fn from(e: EncodeError) -> Self {
		Self::Encode(e)
	}
}

impl From<DecodeError> for CodecError {
	fn from(e: DecodeError) -> Self {
		Self::Decode(e)
	}
}

impl fmt::Display for CodecError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			#[cfg(feature = "json")]
			Self::Json(e) => write!(f, "json: {e}"),
			Self::Encode(e) => write!(f, "protobuf: {e}"),
			Self::Decode(e) => write!(f, "protobuf: {e}"),
			Self::Malformed(m) => write!(f, "malformed payload: {m}"),
			Self::Other(m) => f.write_str(m),
		}
	}
}

impl StdError for CodecError {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		match self {
			#[cfg(feature = "json")]
			Self::Json(e) => Some(e),
			Self::Encode(e) => Some(e),
			Self::Decode(e) => Some(e),
			_ => None,
		}
	}
}

pub trait IntoPayload {
	fn into_payload(self) -> Result<Vec<u8>, CodecError>;
}

pub trait FromPayload: Sized {
	fn from_payload(bytes: &[u8]) -> Result<Self, CodecError>;
}

/// The absence of a payload.
///
/// Encodes to zero bytes, decoding ignores whatever was sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Void;

impl IntoPayload for Void {
	fn into_payload(self) -> Result<Vec<u8>, CodecError> {
		Ok(Vec::new())
	}
}

impl FromPayload for Void {
	fn from_payload(_: &[u8]) -> Result<Self, CodecError> {
		Ok(Self)
	}
}

impl IntoPayload for () {
	fn into_payload(self) -> Result<Vec<u8>, CodecError> {
		Ok(Vec::new())
	}
}

impl FromPayload for () {
	fn from_payload(_: &[u8]) -> Result<Self, CodecError> {
		Ok(())
	}
}

/// Raw bytes are passed through untouched.
impl IntoPayload for Vec<u8> {
	fn into_payload(self) -> Result<Vec<u8>, CodecError> {
		Ok(self)
	}
}

impl FromPayload for Vec<u8> {
	fn from_payload(bytes: &[u8]) -> Result<Self, CodecError> {
		Ok(bytes.to_vec())
	}
}

/// The failure sent back with a negated request id.
///
/// A protobuf message with a single string field `1`, so
/// `ErrorPayload::new("bad input")` encodes to
/// `0a 09 62 61 64 20 69 6e 70 75 74`.
#[derive(
	Debug,
	Clone,
	Default,
	PartialEq,
	Eq,
	protopuffer::EncodeMessage,
	protopuffer::DecodeMessage,
)]
pub struct ErrorPayload {
	#[field(1)]
	pub error: String,
}

impl ErrorPayload {
	pub fn new(error: impl Into<String>) -> Self {
		Self {
			error: error.into(),
		}
	}

	pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
		Ok(self.clone().write_to_bytes()?)
	}

	/// Decodes the message, unknown fields are skipped.
	pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
		Ok(Self::parse_from_bytes(bytes)?)
	}
}

impl IntoPayload for ErrorPayload {
	fn into_payload(self) -> Result<Vec<u8>, CodecError> {
		self.encode()
	}
}

impl FromPayload for ErrorPayload {
	fn from_payload(bytes: &[u8]) -> Result<Self, CodecError> {
		Self::decode(bytes)
	}
}

impl fmt::Display for ErrorPayload {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.error)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use hex_literal::hex;

	#[test]
	fn error_payload_bytes() {
		let bytes = ErrorPayload::new("bad input").encode().unwrap();
		assert_eq!(bytes, hex!("0a 09 62 61 64 20 69 6e 70 75 74"));

		let error = ErrorPayload::decode(&bytes).unwrap();
		assert_eq!(error.error, "bad input");
	}

	#[test]
	fn empty_error_payload() {
		assert!(ErrorPayload::default().encode().unwrap().is_empty());
		assert_eq!(ErrorPayload::decode(&[]).unwrap().error, "");
	}

	#[test]
	fn error_payload_skips_unknown_fields() {
		// field 2 varint 150, field 3 fixed32, then field 1
		let bytes = hex!("10 96 01 1d 01 02 03 04 0a 02 68 69");
		assert_eq!(ErrorPayload::decode(&bytes).unwrap().error, "hi");
	}

	#[test]
	fn error_payload_rejects_truncated_bytes() {
		let err = ErrorPayload::decode(&hex!("0a 05 61")).unwrap_err();
		assert!(matches!(err, CodecError::Decode(_)), "{err:?}");
	}

	#[test]
	fn void_is_empty() {
		assert!(Void.into_payload().unwrap().is_empty());
		assert_eq!(Void::from_payload(b"ignored").unwrap(), Void);
	}
}
