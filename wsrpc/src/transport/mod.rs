//! Carriers of complete binary messages.
//!
//! A frame is always sent and received as one message, the transport keeps
//! the boundaries.

pub mod memory;
pub mod stream;

use std::future::Future;
use std::io;

pub trait Transport: Send + 'static {
	/// Sends one message.
	fn send(
		&mut self,
		msg: Vec<u8>,
	) -> impl Future<Output = io::Result<()>> + Send;

	/// Receives the next message, `None` if the other side closed.
	///
	/// Must be abort safe, it is raced against other events.
	fn receive(
		&mut self,
	) -> impl Future<Output = io::Result<Option<Vec<u8>>>> + Send;

	fn shutdown(&mut self) -> impl Future<Output = io::Result<()>> + Send;
}
