pub mod testing;

use crate::error::TaskError;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A trait to simplify using all tokio io traits.
pub trait ByteStream: AsyncRead + AsyncWrite + Send + Unpin + 'static {}
impl<T> ByteStream for T where T: AsyncRead + AsyncWrite + Send + Unpin + 'static
{}

/// A Handle to a background task, if this handle is dropped
/// the connection will be dropped.
#[derive(Debug)]
pub(crate) struct TaskHandle {
	pub close: oneshot::Sender<()>,
	pub task: JoinHandle<Result<(), TaskError>>,
}

impl TaskHandle {
	/// Wait until the connection has nothing more todo which will then close
	/// the connection.
	pub async fn wait(self) -> Result<(), TaskError> {
		self.task.await.map_err(TaskError::Join)?
	}

	/// Send a close signal to the background task and wait until it closes.
	pub async fn close(self) -> Result<(), TaskError> {
		let _ = self.close.send(());
		self.task.await.map_err(TaskError::Join)?
	}
}
