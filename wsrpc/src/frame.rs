//! The three frame shapes sharing one connection.
//!
//! ```text
//! request:  | name | 0x00 | id (i32 BE) | payload |
//! response: | id (i32 BE) | payload |
//! push:     | name | 0x00 | payload |
//! ```
//!
//! A response with a positive id carries the encoded result, a negative id
//! (the negated request id) carries an encoded [`ErrorPayload`].
//!
//! [`ErrorPayload`]: crate::payload::ErrorPayload

use bytes::{Bytes, BytesRead, BytesReadRef, BytesWrite, Cursor};

use std::error::Error as StdError;
use std::fmt;
use std::str;

/// Ends the name of a request or push frame.
pub const TERMINATOR: u8 = 0x00;
/// Leading byte of every failure response id, treated like a terminator when
/// a client disambiguates frames.
pub const ALT_TERMINATOR: u8 = 0xFF;

pub const ID_LEN: usize = 4;

/// The highest request id a client allocates.
///
/// The leading byte of a response id must stay `0x00` (success) or `0xFF`
/// (failure) for a client to tell responses and pushes apart.
pub const MAX_REQUEST_ID: i32 = 0x00FF_FFFF;

/// Which side received the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
	/// Only receives requests.
	Server,
	/// Receives responses and pushes.
	Client,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FrameError {
	EmptyName,
	/// The name contains a `0x00` byte.
	InvalidName(String),
	NameNotUtf8,
	MissingTerminator,
	/// Less than four bytes where an id was expected.
	Truncated,
}

impl fmt::Display for FrameError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::EmptyName => f.write_str("frame name is empty"),
			Self::InvalidName(name) => {
				write!(f, "frame name {name:?} contains a reserved byte")
			}
			Self::NameNotUtf8 => f.write_str("frame name is not valid utf8"),
			Self::MissingTerminator => {
				f.write_str("frame name is not terminated")
			}
			Self::Truncated => f.write_str("frame too short to hold an id"),
		}
	}
}

impl StdError for FrameError {}

/// Checks that a method or event name can be framed.
pub fn validate_name(name: &str) -> Result<(), FrameError> {
	if name.is_empty() {
		return Err(FrameError::EmptyName);
	}

	// a str never holds 0xFF, only the terminator needs checking
	if name.bytes().any(|b| b == TERMINATOR) {
		return Err(FrameError::InvalidName(name.escape_debug().to_string()));
	}

	Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
	pub name: &'a str,
	pub id: i32,
	pub payload: &'a [u8],
}

impl<'a> Request<'a> {
	/// Parses a frame the way a server does: the name ends at the first
	/// `0x00`, followed by the id and the payload.
	pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, FrameError> {
		let end = bytes
			.iter()
			.position(|b| *b == TERMINATOR)
			.ok_or(FrameError::MissingTerminator)?;

		let name = str::from_utf8(&bytes[..end])
			.map_err(|_| FrameError::NameNotUtf8)?;

		let mut rest = Bytes::from(&bytes[end + 1..]);
		let id = rest.try_read_u32().map_err(|_| FrameError::Truncated)?;

		Ok(Self {
			name,
			id: id as i32,
			payload: rest.remaining_ref(),
		})
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>, FrameError> {
		validate_name(self.name)?;

		let mut buf = Vec::with_capacity(
			self.name.len() + 1 + ID_LEN + self.payload.len(),
		);
		{
			let mut cursor = Cursor::new(&mut buf);
			cursor.write(self.name.as_bytes());
			cursor.write_u8(TERMINATOR);
			cursor.write_u32(self.id as u32);
			cursor.write(self.payload);
		}

		Ok(buf)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response<'a> {
	pub id: i32,
	pub payload: &'a [u8],
}

impl<'a> Response<'a> {
	pub fn success(request_id: i32, payload: &'a [u8]) -> Self {
		Self {
			id: request_id,
			payload,
		}
	}

	/// The payload should be an encoded `ErrorPayload`.
	pub fn failure(request_id: i32, payload: &'a [u8]) -> Self {
		Self {
			id: request_id.wrapping_neg(),
			payload,
		}
	}

	pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, FrameError> {
		let mut bytes = Bytes::from(bytes);
		let id = bytes.try_read_u32().map_err(|_| FrameError::Truncated)?;

		Ok(Self {
			id: id as i32,
			payload: bytes.remaining_ref(),
		})
	}

	pub fn is_success(&self) -> bool {
		self.id > 0
	}

	/// The id of the request this response answers.
	///
	/// Returns `0`, an id which is never issued, if the id has no positive
	/// counterpart.
	pub fn request_id(&self) -> i32 {
		self.id.checked_abs().unwrap_or(0)
	}

	pub fn to_bytes(&self) -> Vec<u8> {
		let mut buf = Vec::with_capacity(ID_LEN + self.payload.len());
		{
			let mut cursor = Cursor::new(&mut buf);
			cursor.write_u32(self.id as u32);
			cursor.write(self.payload);
		}

		buf
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Push<'a> {
	pub name: &'a str,
	pub payload: &'a [u8],
}

impl<'a> Push<'a> {
	pub fn to_bytes(&self) -> Result<Vec<u8>, FrameError> {
		validate_name(self.name)?;

		let mut buf =
			Vec::with_capacity(self.name.len() + 1 + self.payload.len());
		{
			let mut cursor = Cursor::new(&mut buf);
			cursor.write(self.name.as_bytes());
			cursor.write_u8(TERMINATOR);
			cursor.write(self.payload);
		}

		Ok(buf)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
	Request(Request<'a>),
	Response(Response<'a>),
	Push(Push<'a>),
}

impl<'a> Frame<'a> {
	/// Decodes a frame received by `side`.
	///
	/// A client scans for the first `0x00` or `0xFF` byte. If one is found
	/// after a non-empty prefix the frame is a push named by that prefix,
	/// otherwise it is a response keyed by its leading four bytes.
	pub fn decode(bytes: &'a [u8], side: Side) -> Result<Self, FrameError> {
		match side {
			Side::Server => Request::from_bytes(bytes).map(Self::Request),
			Side::Client => match named_prefix(bytes) {
				Some(end) => {
					let name = str::from_utf8(&bytes[..end])
						.map_err(|_| FrameError::NameNotUtf8)?;

					Ok(Self::Push(Push {
						name,
						payload: &bytes[end + 1..],
					}))
				}
				None => Response::from_bytes(bytes).map(Self::Response),
			},
		}
	}
}

fn named_prefix(bytes: &[u8]) -> Option<usize> {
	let pos = bytes
		.iter()
		.position(|b| *b == TERMINATOR || *b == ALT_TERMINATOR)?;

	(pos > 0).then_some(pos)
}

#[cfg(test)]
mod tests {
	use super::*;

	use hex_literal::hex;

	#[test]
	fn request_layout() {
		let req = Request {
			name: "say",
			id: 1,
			payload: b"hi",
		};
		let bytes = req.to_bytes().unwrap();
		assert_eq!(bytes, hex!("73 61 79 00 00 00 00 01 68 69"));

		let frame = Frame::decode(&bytes, Side::Server).unwrap();
		assert_eq!(frame, Frame::Request(req));
	}

	#[test]
	fn failure_negates_id() {
		for id in [1, 2, 300, MAX_REQUEST_ID] {
			let ok = Response::success(id, &[]);
			let err = Response::failure(id, &[]);
			assert_eq!(ok.id, id);
			assert_eq!(err.id, -id);
			assert!(ok.is_success());
			assert!(!err.is_success());
			assert_eq!(ok.request_id(), id);
			assert_eq!(err.request_id(), id);
		}

		let bytes = Response::failure(2, b"x").to_bytes();
		assert_eq!(bytes, hex!("ff ff ff fe 78"));
	}

	#[test]
	fn client_tells_responses_from_pushes() {
		let push = Push {
			name: "tick",
			payload: &[],
		}
		.to_bytes()
		.unwrap();
		assert_eq!(push, hex!("74 69 63 6b 00"));
		assert_eq!(
			Frame::decode(&push, Side::Client).unwrap(),
			Frame::Push(Push {
				name: "tick",
				payload: &[]
			})
		);

		let ok = Response::success(MAX_REQUEST_ID, b"ab").to_bytes();
		assert_eq!(
			Frame::decode(&ok, Side::Client).unwrap(),
			Frame::Response(Response {
				id: MAX_REQUEST_ID,
				payload: b"ab"
			})
		);

		let err = Response::failure(MAX_REQUEST_ID, b"ab").to_bytes();
		assert_eq!(
			Frame::decode(&err, Side::Client).unwrap(),
			Frame::Response(Response {
				id: -MAX_REQUEST_ID,
				payload: b"ab"
			})
		);
	}

	#[test]
	fn response_without_terminator() {
		// no 0x00 or 0xFF anywhere, still a response
		let bytes = hex!("01 02 03 04 05");
		let frame = Frame::decode(&bytes, Side::Client).unwrap();
		assert_eq!(
			frame,
			Frame::Response(Response {
				id: 0x0102_0304,
				payload: &[5]
			})
		);
	}

	#[test]
	fn short_frames_do_not_panic() {
		assert_eq!(
			Frame::decode(&[], Side::Client),
			Err(FrameError::Truncated)
		);
		assert_eq!(
			Frame::decode(&hex!("00 01"), Side::Client),
			Err(FrameError::Truncated)
		);
		assert_eq!(
			Frame::decode(b"say", Side::Server),
			Err(FrameError::MissingTerminator)
		);
		assert_eq!(
			Frame::decode(b"say\0\0\0", Side::Server),
			Err(FrameError::Truncated)
		);
	}

	#[test]
	fn empty_name_is_never_framed() {
		let req = Request {
			name: "",
			id: 1,
			payload: &[],
		};
		assert_eq!(req.to_bytes(), Err(FrameError::EmptyName));

		let push = Push {
			name: "a\0b",
			payload: &[],
		};
		assert!(matches!(push.to_bytes(), Err(FrameError::InvalidName(_))));

		// a server still parses a leading terminator
		let frame = Frame::decode(&hex!("00 00 00 00 07"), Side::Server);
		assert_eq!(
			frame.unwrap(),
			Frame::Request(Request {
				name: "",
				id: 7,
				payload: &[]
			})
		);
	}

	#[test]
	fn unrepresentable_id() {
		let resp = Response {
			id: i32::MIN,
			payload: &[],
		};
		assert_eq!(resp.request_id(), 0);
	}
}
