//! Codecs used by `#[derive(IntoPayload, FromPayload)]`.

#[cfg(feature = "json")]
#[cfg_attr(docsrs, doc(cfg(feature = "json")))]
pub mod json {
	use crate::payload::CodecError;

	use serde::{Serialize, de::DeserializeOwned};

	pub fn encode<T>(value: T) -> Result<Vec<u8>, CodecError>
	where
		T: Serialize,
	{
		serde_json::to_vec(&value).map_err(CodecError::Json)
	}

	pub fn decode<T>(bytes: &[u8]) -> Result<T, CodecError>
	where
		T: DeserializeOwned,
	{
		serde_json::from_slice(bytes).map_err(CodecError::Json)
	}
}

#[cfg(feature = "protobuf")]
#[cfg_attr(docsrs, doc(cfg(feature = "protobuf")))]
pub mod protobuf {
	use crate::payload::CodecError;

	use protopuffer::decode::DecodeMessage;
	use protopuffer::encode::EncodeMessage;

	pub fn encode<T>(mut value: T) -> Result<Vec<u8>, CodecError>
	where
		T: EncodeMessage,
	{
		value.write_to_bytes().map_err(CodecError::Encode)
	}

	pub fn decode<T>(bytes: &[u8]) -> Result<T, CodecError>
	where
		T: for<'a> DecodeMessage<'a>,
	{
		T::parse_from_bytes(bytes).map_err(CodecError::Decode)
	}
}
