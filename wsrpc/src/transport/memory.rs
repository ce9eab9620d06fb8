use super::Transport;

use std::io;

use tokio::sync::mpsc;

/// One end of an in process connection.
#[derive(Debug)]
pub struct MemoryTransport {
	tx: Option<mpsc::UnboundedSender<Vec<u8>>>,
	rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

/// Creates two connected transports.
pub fn pair() -> (MemoryTransport, MemoryTransport) {
	let (a_tx, b_rx) = mpsc::unbounded_channel();
	let (b_tx, a_rx) = mpsc::unbounded_channel();

	(
		MemoryTransport {
			tx: Some(a_tx),
			rx: a_rx,
		},
		MemoryTransport {
			tx: Some(b_tx),
			rx: b_rx,
		},
	)
}

impl Transport for MemoryTransport {
	async fn send(&mut self, msg: Vec<u8>) -> io::Result<()> {
		let tx = self.tx.as_ref().ok_or(io::ErrorKind::NotConnected)?;
		tx.send(msg)
			.map_err(|_| io::Error::from(io::ErrorKind::BrokenPipe))
	}

	async fn receive(&mut self) -> io::Result<Option<Vec<u8>>> {
		Ok(self.rx.recv().await)
	}

	async fn shutdown(&mut self) -> io::Result<()> {
		// the other side sees the end after the queued messages
		self.tx = None;
		Ok(())
	}
}
