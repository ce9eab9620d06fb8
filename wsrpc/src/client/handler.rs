use super::Config;
use super::listeners::Listeners;
use crate::error::{RequestError, TaskError};
use crate::frame::{Frame, MAX_REQUEST_ID, Request, Response, Side};
use crate::payload::ErrorPayload;
use crate::transport::Transport;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval};

pub(crate) type ResponseSender = oneshot::Sender<Result<Vec<u8>, RequestError>>;

/// A call waiting to be sent.
#[derive(Debug)]
pub(crate) struct Call {
	pub method: String,
	pub payload: Vec<u8>,
	pub tx: ResponseSender,
}

#[derive(Debug)]
struct PendingCall {
	method: String,
	deadline: Option<Instant>,
	tx: ResponseSender,
}

/// The state of a client connection, owned by its background task.
pub(crate) struct Handler {
	// none once every id was handed out
	next_id: Option<i32>,
	pending: HashMap<i32, PendingCall>,
	listeners: Arc<Listeners>,
	timeout: Option<Duration>,
}

impl Handler {
	pub fn new(cfg: &Config, listeners: Arc<Listeners>) -> Self {
		Self {
			next_id: Some(1),
			pending: HashMap::new(),
			listeners,
			timeout: cfg.timeout,
		}
	}

	fn next_id(&mut self) -> Option<i32> {
		let id = self.next_id?;
		self.next_id = (id < MAX_REQUEST_ID).then_some(id + 1);

		Some(id)
	}

	pub fn timeout(&self) -> Option<Duration> {
		self.timeout
	}

	pub fn update_config(&mut self, cfg: &Config) {
		self.timeout = cfg.timeout;
	}

	/// Registers the call, returning the request frame to send.
	pub fn outbound(&mut self, call: Call) -> Option<Vec<u8>> {
		let Some(id) = self.next_id() else {
			let _ = call.tx.send(Err(RequestError::IdsExhausted));
			return None;
		};

		let frame = Request {
			name: &call.method,
			id,
			payload: &call.payload,
		}
		.to_bytes();

		let frame = match frame {
			Ok(f) => f,
			Err(e) => {
				let _ = call.tx.send(Err(e.into()));
				return None;
			}
		};

		let existing = self.pending.insert(
			id,
			PendingCall {
				method: call.method,
				deadline: self.timeout.map(|t| Instant::now() + t),
				tx: call.tx,
			},
		);
		debug_assert!(existing.is_none(), "generated a duplicate id");

		Some(frame)
	}

	/// Handles a received frame, either completing a call or delivering a
	/// push to its listeners.
	pub fn inbound(&mut self, bytes: &[u8]) {
		match Frame::decode(bytes, Side::Client) {
			Ok(Frame::Response(resp)) => self.response(resp),
			Ok(Frame::Push(push)) => {
				self.listeners.dispatch(push.name, push.payload)
			}
			Ok(Frame::Request(req)) => {
				tracing::error!("client received a request {:?}", req.name)
			}
			Err(e) => tracing::error!("dropping undecodable frame: {e}"),
		}
	}

	fn response(&mut self, resp: Response<'_>) {
		let Some(call) = self.pending.remove(&resp.request_id()) else {
			tracing::error!("no pending call found for id {}", resp.id);
			return;
		};

		let result = match resp.is_success() {
			true => Ok(resp.payload.to_vec()),
			false => match ErrorPayload::decode(resp.payload) {
				Ok(e) => Err(RequestError::Remote(e.error)),
				Err(e) => Err(RequestError::Codec(e)),
			},
		};

		if let Err(e) = &result {
			tracing::debug!("call {} failed: {e}", call.method);
		}

		// the caller might have stopped waiting
		let _ = call.tx.send(result);
	}

	/// Rejects every call past its deadline and forgets calls nobody waits
	/// for anymore.
	pub fn expire(&mut self, now: Instant) {
		self.pending.retain(|_, call| !call.tx.is_closed());

		let expired: Vec<i32> = self
			.pending
			.iter()
			.filter(|(_, call)| call.deadline.is_some_and(|d| d <= now))
			.map(|(id, _)| *id)
			.collect();

		for id in expired {
			if let Some(call) = self.pending.remove(&id) {
				tracing::warn!("call {} ({id}) timed out", call.method);
				let _ = call.tx.send(Err(RequestError::Timeout));
			}
		}
	}

	/// Rejects every pending call.
	pub fn close(&mut self) {
		for (_, call) in self.pending.drain() {
			let _ = call.tx.send(Err(RequestError::ConnectionClosed));
		}
	}
}

fn sweep_interval(timeout: Option<Duration>) -> Interval {
	let period = timeout
		.map(|t| (t / 4).max(Duration::from_millis(1)))
		.unwrap_or(Duration::from_secs(60));

	let mut interval = interval(period);
	interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
	interval
}

pub(crate) async fn bg_task<T>(
	mut transport: T,
	mut handler: Handler,
	mut calls: mpsc::Receiver<Call>,
	mut cfg_rx: watch::Receiver<Config>,
	mut close: oneshot::Receiver<()>,
) -> Result<(), TaskError>
where
	T: Transport,
{
	let mut sweep = sweep_interval(handler.timeout());

	let result = loop {
		tokio::select! {
			msg = transport.receive() => match msg {
				Ok(Some(msg)) => handler.inbound(&msg),
				Ok(None) => break Ok(()),
				Err(e) => break Err(TaskError::Io(e)),
			},
			Some(call) = calls.recv() => {
				let Some(frame) = handler.outbound(call) else {
					continue
				};

				if let Err(e) = transport.send(frame).await {
					break Err(TaskError::Io(e));
				}
			},
			now = sweep.tick() => handler.expire(now),
			Ok(()) = cfg_rx.changed() => {
				let cfg = cfg_rx.borrow_and_update().clone();
				handler.update_config(&cfg);
				sweep = sweep_interval(cfg.timeout);
			},
			_ = &mut close => break Ok(()),
		}
	};

	handler.close();
	if let Err(e) = transport.shutdown().await {
		tracing::error!("error shutting down transport {e}");
	}

	result
}
