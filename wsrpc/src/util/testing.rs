//! In memory doubles for the server side contracts.

use crate::server::{Logger, Socket, Values};

use std::io;
use std::sync::Mutex;

/// A socket recording every message written to it.
#[derive(Debug, Default)]
pub struct MemorySocket {
	written: Mutex<Vec<Vec<u8>>>,
	values: Values,
}

impl MemorySocket {
	pub fn new() -> Self {
		Self::default()
	}

	/// Every message written so far.
	pub fn written(&self) -> Vec<Vec<u8>> {
		self.written.lock().unwrap().clone()
	}

	/// Takes the written messages, leaving none behind.
	pub fn take_written(&self) -> Vec<Vec<u8>> {
		std::mem::take(&mut *self.written.lock().unwrap())
	}
}

impl Socket for MemorySocket {
	fn write(&self, msg: &[u8]) -> io::Result<()> {
		self.written.lock().unwrap().push(msg.to_vec());
		Ok(())
	}

	fn write_binary(&self, msg: &[u8]) -> io::Result<()> {
		self.write(msg)
	}

	fn values(&self) -> &Values {
		&self.values
	}
}

/// A logger keeping every line.
#[derive(Debug, Default)]
pub struct MemoryLogger {
	lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn lines(&self) -> Vec<String> {
		self.lines.lock().unwrap().clone()
	}

	pub fn contains(&self, needle: &str) -> bool {
		self.lines.lock().unwrap().iter().any(|l| l.contains(needle))
	}
}

impl Logger for MemoryLogger {
	fn log(&self, line: &str) {
		self.lines.lock().unwrap().push(line.to_string());
	}
}
