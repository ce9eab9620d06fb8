//! The serving side of a connection.
//!
//! Generated dispatch functions and push emitters only depend on the
//! [`Socket`] and [`Logger`] contracts, so they can be driven by
//! [`Connection`] or by any other host owning a message socket.

mod connection;
mod dispatch;

pub use connection::{Connection, ConnectionSocket};
pub use dispatch::{
	CallService, DispatchOutcome, MethodId, MethodTable, dispatch, push,
	send_push_message,
};

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex};

/// A message socket the server writes frames to.
pub trait Socket {
	fn write(&self, msg: &[u8]) -> io::Result<()>;

	fn write_binary(&self, msg: &[u8]) -> io::Result<()>;

	/// Values stored alongside the socket.
	fn values(&self) -> &Values;

	fn set<D>(&self, key: impl Into<String>, data: D)
	where
		D: Any + Send + Sync,
	{
		self.values().set(key, data)
	}

	fn get<D>(&self, key: &str) -> Option<D>
	where
		D: Any + Clone + Send + Sync,
	{
		self.values().get(key)
	}

	fn take<D>(&self, key: &str) -> Option<D>
	where
		D: Any + Send + Sync,
	{
		self.values().take(key)
	}
}

impl<S> Socket for &S
where
	S: Socket + ?Sized,
{
	fn write(&self, msg: &[u8]) -> io::Result<()> {
		(**self).write(msg)
	}

	fn write_binary(&self, msg: &[u8]) -> io::Result<()> {
		(**self).write_binary(msg)
	}

	fn values(&self) -> &Values {
		(**self).values()
	}
}

impl<S> Socket for Arc<S>
where
	S: Socket + ?Sized,
{
	fn write(&self, msg: &[u8]) -> io::Result<()> {
		(**self).write(msg)
	}

	fn write_binary(&self, msg: &[u8]) -> io::Result<()> {
		(**self).write_binary(msg)
	}

	fn values(&self) -> &Values {
		(**self).values()
	}
}

/// A string keyed side channel holding any value.
#[derive(Default)]
pub struct Values {
	data: Mutex<HashMap<String, Box<dyn Any + Send + Sync>>>,
}

impl Values {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set<D>(&self, key: impl Into<String>, data: D)
	where
		D: Any + Send + Sync,
	{
		self.data.lock().unwrap().insert(key.into(), Box::new(data));
	}

	/// Returns a clone of the value if it is stored with the type `D`.
	pub fn get<D>(&self, key: &str) -> Option<D>
	where
		D: Any + Clone + Send + Sync,
	{
		self.data
			.lock()
			.unwrap()
			.get(key)
			.and_then(|d| d.downcast_ref())
			.map(Clone::clone)
	}

	/// Removes the value if it is stored with the type `D`.
	pub fn take<D>(&self, key: &str) -> Option<D>
	where
		D: Any + Send + Sync,
	{
		let mut data = self.data.lock().unwrap();
		if !data.get(key).is_some_and(|d| d.is::<D>()) {
			return None;
		}

		data.remove(key)
			.and_then(|d| d.downcast().ok())
			.map(|b| *b)
	}
}

impl fmt::Debug for Values {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let data = self.data.lock().unwrap();
		f.debug_set().entries(data.keys()).finish()
	}
}

/// Where dispatch and push emitters report what they do.
pub trait Logger {
	fn log(&self, line: &str);

	fn logf(&self, args: fmt::Arguments<'_>) {
		match args.as_str() {
			Some(line) => self.log(line),
			None => self.log(&args.to_string()),
		}
	}
}

impl<L> Logger for &L
where
	L: Logger + ?Sized,
{
	fn log(&self, line: &str) {
		(**self).log(line)
	}

	fn logf(&self, args: fmt::Arguments<'_>) {
		(**self).logf(args)
	}
}

/// Forwards every line to `tracing` at the info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
	fn log(&self, line: &str) {
		tracing::info!("{line}");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::util::testing::MemorySocket;

	#[test]
	fn side_channel() {
		let socket = MemorySocket::new();
		socket.set("user", 7u32);

		assert_eq!(socket.get::<u32>("user"), Some(7));
		assert_eq!(socket.get::<u64>("user"), None);
		assert_eq!(socket.take::<String>("user"), None);
		assert_eq!(socket.take::<u32>("user"), Some(7));
		assert_eq!(socket.get::<u32>("user"), None);
	}
}
