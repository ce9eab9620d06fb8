use super::{CallService, DispatchOutcome, Logger, Socket, Values, dispatch};
use crate::error::TaskError;
use crate::transport::Transport;
use crate::util::TaskHandle;

use std::io;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

/// The serving end of a connection.
///
/// A background task owns the transport, frames are received with
/// [`Connection::receive`] and written through a [`ConnectionSocket`].
pub struct Connection {
	inbound: mpsc::Receiver<Vec<u8>>,
	socket: ConnectionSocket,
	task: TaskHandle,
}

impl Connection {
	pub fn new<T>(transport: T) -> Self
	where
		T: Transport,
	{
		let (inbound_tx, inbound) = mpsc::channel(10);
		let (outbound_tx, outbound) = mpsc::unbounded_channel();
		let (close_tx, close_rx) = oneshot::channel();

		let task = tokio::spawn(async move {
			let r = bg_task(transport, inbound_tx, outbound, close_rx).await;

			if let Err(e) = &r {
				tracing::error!("server bg_task error {:?}", e);
			}

			r
		});

		Self {
			inbound,
			socket: ConnectionSocket {
				outbound: outbound_tx,
				values: Arc::new(Values::new()),
			},
			task: TaskHandle {
				close: close_tx,
				task,
			},
		}
	}

	/// A socket writing to this connection.
	pub fn socket(&self) -> ConnectionSocket {
		self.socket.clone()
	}

	/// Returns the next frame or `None` once the connection is closed.
	pub async fn receive(&mut self) -> Option<Vec<u8>> {
		self.inbound.recv().await
	}

	/// Dispatches every received frame to `service` until the connection
	/// closes.
	pub async fn serve<C, L>(&mut self, service: &mut C, log: &L)
	where
		C: CallService + ?Sized,
		L: Logger + ?Sized,
	{
		while let Some(frame) = self.inbound.recv().await {
			if let DispatchOutcome::Malformed(e) =
				dispatch(service, &self.socket, log, &frame)
			{
				tracing::warn!("dropped malformed frame {e}");
			}
		}
	}

	/// Wait until the connection has nothing more todo which will then close
	/// the connection.
	pub async fn wait(self) -> Result<(), TaskError> {
		self.task.wait().await
	}

	/// Send a close signal to the background task and wait until it closes.
	pub async fn close(self) -> Result<(), TaskError> {
		self.task.close().await
	}
}

/// Writes frames to a [`Connection`], cheap to clone.
#[derive(Debug, Clone)]
pub struct ConnectionSocket {
	outbound: mpsc::UnboundedSender<Vec<u8>>,
	values: Arc<Values>,
}

impl Socket for ConnectionSocket {
	fn write(&self, msg: &[u8]) -> io::Result<()> {
		self.outbound
			.send(msg.to_vec())
			.map_err(|_| io::Error::from(io::ErrorKind::NotConnected))
	}

	fn write_binary(&self, msg: &[u8]) -> io::Result<()> {
		self.write(msg)
	}

	fn values(&self) -> &Values {
		&self.values
	}
}

async fn bg_task<T>(
	mut transport: T,
	inbound: mpsc::Sender<Vec<u8>>,
	mut outbound: mpsc::UnboundedReceiver<Vec<u8>>,
	mut close: oneshot::Receiver<()>,
) -> Result<(), TaskError>
where
	T: Transport,
{
	let result = loop {
		tokio::select! {
			msg = transport.receive() => match msg {
				Ok(Some(msg)) => {
					if inbound.send(msg).await.is_err() {
						// nobody is receiving anymore
						break Ok(());
					}
				}
				Ok(None) => break Ok(()),
				Err(e) => break Err(TaskError::Io(e)),
			},
			Some(msg) = outbound.recv() => {
				if let Err(e) = transport.send(msg).await {
					break Err(TaskError::Io(e));
				}
			},
			_ = &mut close => break Ok(()),
		}
	};

	// send what was already written
	outbound.close();
	if result.is_ok() {
		while let Some(msg) = outbound.recv().await {
			if let Err(e) = transport.send(msg).await {
				tracing::error!("failed to flush frame {e}");
				break;
			}
		}
	}

	if let Err(e) = transport.shutdown().await {
		tracing::error!("error shutting down transport {e}");
	}

	result
}
