//! The calling side of a connection.
//!
//! A [`Connection`] spawns a background task owning the transport, the
//! request id counter and every pending call. [`Caller`]s talk to that task
//! through a channel and are what generated clients hold.

mod handler;
mod listeners;

pub use listeners::Subscribers;

use handler::{Call, Handler, bg_task};
use listeners::Listeners;

use crate::error::{RequestError, TaskError};
use crate::frame;
use crate::transport::Transport;
use crate::util::TaskHandle;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};

#[derive(Debug, Clone)]
pub struct Config {
	/// How long a call waits for its response, `None` waits forever.
	pub timeout: Option<Duration>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			timeout: Some(Duration::from_secs(30)),
		}
	}
}

/// A connection to a server, dropping it closes the connection.
pub struct Connection {
	caller: Caller,
	cfg: watch::Sender<Config>,
	task: TaskHandle,
}

impl Connection {
	/// Spawns the background task driving `transport`.
	pub fn new<T>(transport: T, cfg: Config) -> Self
	where
		T: Transport,
	{
		let (tx, rx) = mpsc::channel(10);
		let (cfg_tx, cfg_rx) = watch::channel(cfg.clone());
		let (close_tx, close_rx) = oneshot::channel();

		let listeners = Arc::new(Listeners::new());
		let handler = Handler::new(&cfg, listeners.clone());

		let task = tokio::spawn(async move {
			let r = bg_task(transport, handler, rx, cfg_rx, close_rx).await;

			if let Err(e) = &r {
				tracing::error!("client bg_task error {:?}", e);
			}

			r
		});

		Self {
			caller: Caller {
				inner: tx,
				listeners,
			},
			cfg: cfg_tx,
			task: TaskHandle {
				close: close_tx,
				task,
			},
		}
	}

	/// A handle to make calls on this connection.
	pub fn caller(&self) -> Caller {
		self.caller.clone()
	}

	/// Update the connection configuration
	pub fn update_config(&self, cfg: Config) {
		self.cfg.send_replace(cfg);
	}

	pub async fn rpc(
		&self,
		name: &str,
		payload: Vec<u8>,
	) -> Result<Vec<u8>, RequestError> {
		self.caller.rpc(name, payload).await
	}

	pub fn register_callback_handler<F>(&self, name: impl Into<String>, f: F)
	where
		F: Fn(&[u8]) + Send + Sync + 'static,
	{
		self.caller.register_callback_handler(name, f)
	}

	/// Wait until the connection has nothing more todo which will then close
	/// the connection.
	pub async fn wait(self) -> Result<(), TaskError> {
		self.task.wait().await
	}

	/// Send a close signal to the background task and wait until it closes.
	///
	/// Calls still waiting for a response fail with
	/// [`RequestError::ConnectionClosed`].
	pub async fn close(self) -> Result<(), TaskError> {
		self.task.close().await
	}
}

/// Makes calls and registers push handlers on a [`Connection`].
#[derive(Debug, Clone)]
pub struct Caller {
	inner: mpsc::Sender<Call>,
	listeners: Arc<Listeners>,
}

impl Caller {
	/// Sends a request and waits for the matching response.
	///
	/// ## Errors
	/// - The name cannot be framed
	/// - The connection closed before or while waiting
	/// - The timeout elapsed
	/// - The remote handler failed
	pub async fn rpc(
		&self,
		name: &str,
		payload: Vec<u8>,
	) -> Result<Vec<u8>, RequestError> {
		frame::validate_name(name)?;

		let (tx, rx) = oneshot::channel();
		self.inner
			.send(Call {
				method: name.to_string(),
				payload,
				tx,
			})
			.await
			.map_err(|_| RequestError::ConnectionAlreadyClosed)?;

		rx.await.map_err(|_| RequestError::ConnectionClosed)?
	}

	/// Registers a handler for the push event `name`.
	///
	/// Handlers run on the connection task in registration order.
	pub fn register_callback_handler<F>(&self, name: impl Into<String>, f: F)
	where
		F: Fn(&[u8]) + Send + Sync + 'static,
	{
		self.listeners.register(name, f)
	}
}
