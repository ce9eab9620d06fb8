use super::Transport;
use crate::util::ByteStream;

use bytes::{Bytes, BytesRead, BytesWrite, Cursor};

use std::io;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

const LEN_SIZE: usize = 4;
const READ_CHUNK: usize = 4096;

/// Sends messages over a byte stream, each prefixed by its length as a
/// big endian `u32`.
#[derive(Debug)]
pub struct StreamTransport<S> {
	stream: S,
	buf: Vec<u8>,
	/// if the limit is 0 there is no limit
	body_limit: u32,
}

impl<S> StreamTransport<S>
where
	S: ByteStream,
{
	pub fn new(stream: S, body_limit: u32) -> Self {
		Self {
			stream,
			buf: Vec::new(),
			body_limit,
		}
	}

	pub fn set_body_limit(&mut self, body_limit: u32) {
		self.body_limit = body_limit;
	}

	fn check_limit(&self, len: usize) -> io::Result<()> {
		if self.body_limit != 0 && len > self.body_limit as usize {
			return Err(io::Error::new(
				io::ErrorKind::InvalidData,
				format!("message of {len} bytes exceeds the body limit"),
			));
		}

		Ok(())
	}

	/// Takes a complete message out of the buffer.
	fn take_message(&mut self) -> io::Result<Option<Vec<u8>>> {
		let header = Bytes::from(self.buf.as_slice()).try_read_u32();
		let Ok(len) = header else {
			return Ok(None);
		};
		let len = len as usize;
		self.check_limit(len)?;

		if self.buf.len() < LEN_SIZE + len {
			return Ok(None);
		}

		let msg = self.buf[LEN_SIZE..LEN_SIZE + len].to_vec();
		self.buf.drain(..LEN_SIZE + len);

		Ok(Some(msg))
	}
}

impl<S> Transport for StreamTransport<S>
where
	S: ByteStream,
{
	async fn send(&mut self, msg: Vec<u8>) -> io::Result<()> {
		self.check_limit(msg.len())?;

		let mut bytes = Vec::with_capacity(LEN_SIZE + msg.len());
		{
			let mut cursor = Cursor::new(&mut bytes);
			cursor.write_u32(msg.len() as u32);
			cursor.write(&msg);
		}

		self.stream.write_all(&bytes).await?;
		self.stream.flush().await
	}

	/// this function is abort safe
	async fn receive(&mut self) -> io::Result<Option<Vec<u8>>> {
		loop {
			if let Some(msg) = self.take_message()? {
				return Ok(Some(msg));
			}

			let mut chunk = [0; READ_CHUNK];
			let read = self.stream.read(&mut chunk).await?;
			if read == 0 {
				return match self.buf.is_empty() {
					true => Ok(None),
					false => Err(io::ErrorKind::UnexpectedEof.into()),
				};
			}

			self.buf.extend_from_slice(&chunk[..read]);
		}
	}

	async fn shutdown(&mut self) -> io::Result<()> {
		self.stream.shutdown().await
	}
}
