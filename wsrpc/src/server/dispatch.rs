use super::{Logger, Socket};
use crate::error::ServiceError;
use crate::frame::{FrameError, Push, Request, Response};
use crate::payload::{ErrorPayload, IntoPayload};

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Identifies a method of a call service.
///
/// Implemented by the generated `<Service>Method` enums.
pub trait MethodId: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
	/// Every method in declaration order.
	const ALL: &'static [Self];

	/// The name used on the wire.
	fn name(&self) -> &'static str;

	/// A lookup table from names, built once.
	fn table() -> &'static MethodTable<Self>;

	fn from_name(name: &str) -> Option<Self> {
		Self::table().get(name)
	}
}

#[derive(Debug, Clone)]
pub struct MethodTable<M> {
	inner: HashMap<&'static str, M>,
}

impl<M> MethodTable<M>
where
	M: MethodId,
{
	/// ## Panics
	/// If two methods share a name.
	pub fn new() -> Self {
		let mut inner = HashMap::with_capacity(M::ALL.len());
		for method in M::ALL {
			let existing = inner.insert(method.name(), *method);
			assert!(existing.is_none(), "duplicate method {}", method.name());
		}

		Self { inner }
	}

	pub fn get(&self, name: &str) -> Option<M> {
		self.inner.get(name).copied()
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl<M> Default for MethodTable<M>
where
	M: MethodId,
{
	fn default() -> Self {
		Self::new()
	}
}

/// A call service with its payloads still encoded.
pub trait CallService {
	type Method: MethodId;

	/// Decodes the payload, calls the handler and encodes its response.
	fn call(
		&mut self,
		method: Self::Method,
		payload: &[u8],
	) -> Result<Vec<u8>, ServiceError>;
}

impl<C> CallService for &mut C
where
	C: CallService + ?Sized,
{
	type Method = C::Method;

	fn call(
		&mut self,
		method: Self::Method,
		payload: &[u8],
	) -> Result<Vec<u8>, ServiceError> {
		(**self).call(method, payload)
	}
}

/// What [`dispatch`] did with a frame.
#[derive(Debug)]
pub enum DispatchOutcome {
	/// The handler succeeded and its response was written.
	Responded { method: &'static str },
	/// The handler failed, an error response was written.
	Failed {
		method: &'static str,
		error: ServiceError,
	},
	/// No method with this name exists, nothing was written.
	UnknownMethod(String),
	/// The frame could not be parsed, nothing was written.
	Malformed(FrameError),
}

impl DispatchOutcome {
	pub fn responded(&self) -> bool {
		matches!(self, Self::Responded { .. } | Self::Failed { .. })
	}
}

/// Handles one request frame, writing at most one response frame.
///
/// The name ends at the first `0x00` byte, followed by the request id and
/// the payload. A failing handler is answered with an [`ErrorPayload`] under
/// the negated id, a succeeding one with its encoded response under the
/// unmodified id.
pub fn dispatch<C, S, L>(
	service: &mut C,
	socket: &S,
	log: &L,
	frame: &[u8],
) -> DispatchOutcome
where
	C: CallService + ?Sized,
	S: Socket + ?Sized,
	L: Logger + ?Sized,
{
	let req = match Request::from_bytes(frame) {
		Ok(req) => req,
		Err(e) => {
			log.logf(format_args!("Malformed rpc call: {e}"));
			return DispatchOutcome::Malformed(e);
		}
	};

	let Some(method) = C::Method::from_name(req.name) else {
		log.logf(format_args!("Invalid rpc call: {:?}", req.name));
		return DispatchOutcome::UnknownMethod(req.name.to_string());
	};
	let name = method.name();

	log.logf(format_args!("Request: '{name}'"));

	match service.call(method, req.payload) {
		Ok(payload) => {
			write(socket, log, &Response::success(req.id, &payload).to_bytes());
			DispatchOutcome::Responded { method: name }
		}
		Err(error) => {
			send_error(socket, log, req.id, &error);
			DispatchOutcome::Failed {
				method: name,
				error,
			}
		}
	}
}

fn send_error<S, L>(socket: &S, log: &L, id: i32, error: &ServiceError)
where
	S: Socket + ?Sized,
	L: Logger + ?Sized,
{
	let payload = match ErrorPayload::new(error.message()).encode() {
		Ok(p) => p,
		Err(e) => {
			log.logf(format_args!("Failed to encode error: {e}"));
			Vec::new()
		}
	};

	write(socket, log, &Response::failure(id, &payload).to_bytes());
}

/// Encodes and sends a push event, `service` is only used to report errors.
///
/// Encoding failures are logged and the event is dropped.
pub fn push<S, L, P>(socket: &S, log: &L, service: &str, event: &str, payload: P)
where
	S: Socket + ?Sized,
	L: Logger + ?Sized,
	P: IntoPayload,
{
	match payload.into_payload() {
		Ok(data) => send_push_message(socket, log, event, &data),
		Err(e) => log.logf(format_args!("Error in {service}.{event}: {e}")),
	}
}

/// Frames and writes an already encoded push payload.
pub fn send_push_message<S, L>(socket: &S, log: &L, name: &str, data: &[u8])
where
	S: Socket + ?Sized,
	L: Logger + ?Sized,
{
	let frame = match (Push { name, payload: data }).to_bytes() {
		Ok(frame) => frame,
		Err(e) => {
			log.logf(format_args!("Invalid push message {name:?}: {e}"));
			return;
		}
	};

	log.logf(format_args!(
		"Sending push message '{name}' ({} bytes)",
		data.len()
	));
	write(socket, log, &frame);
}

fn write<S, L>(socket: &S, log: &L, frame: &[u8])
where
	S: Socket + ?Sized,
	L: Logger + ?Sized,
{
	if let Err(e) = socket.write_binary(frame) {
		log.logf(format_args!("Failed to write frame: {e}"));
	}
}
