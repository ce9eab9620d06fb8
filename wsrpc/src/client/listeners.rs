use crate::payload::FromPayload;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

type Callback = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// Push event handlers by event name.
#[derive(Default)]
pub(crate) struct Listeners {
	inner: Mutex<HashMap<String, Vec<Callback>>>,
}

impl Listeners {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register<F>(&self, name: impl Into<String>, callback: F)
	where
		F: Fn(&[u8]) + Send + Sync + 'static,
	{
		self.inner
			.lock()
			.unwrap()
			.entry(name.into())
			.or_default()
			.push(Arc::new(callback));
	}

	/// Calls every handler registered for `name` in registration order.
	pub fn dispatch(&self, name: &str, payload: &[u8]) {
		// handlers may register further handlers
		let callbacks = self.inner.lock().unwrap().get(name).cloned();

		match callbacks {
			Some(callbacks) => {
				for callback in callbacks {
					callback(payload);
				}
			}
			None => tracing::error!("No listener for {name:?}"),
		}
	}
}

impl fmt::Debug for Listeners {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let inner = self.inner.lock().unwrap();
		f.debug_map()
			.entries(inner.iter().map(|(k, v)| (k, v.len())))
			.finish()
	}
}

/// Decodes the payloads of one push event and hands them to every
/// subscriber.
pub struct Subscribers<T> {
	event: &'static str,
	inner: Mutex<Vec<Arc<dyn Fn(&T) + Send + Sync>>>,
}

impl<T> Subscribers<T>
where
	T: FromPayload + 'static,
{
	pub fn new(event: &'static str) -> Self {
		Self {
			event,
			inner: Mutex::new(Vec::new()),
		}
	}

	pub fn event(&self) -> &'static str {
		self.event
	}

	pub fn subscribe<F>(&self, callback: F)
	where
		F: Fn(&T) + Send + Sync + 'static,
	{
		self.inner.lock().unwrap().push(Arc::new(callback));
	}

	pub fn len(&self) -> usize {
		self.inner.lock().unwrap().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Decodes the payload and calls every subscriber with it.
	///
	/// Without subscribers the payload is dropped.
	pub fn publish(&self, payload: &[u8]) {
		let subscribers = self.inner.lock().unwrap().clone();
		if subscribers.is_empty() {
			tracing::warn!("No listener for: {}", self.event);
			return;
		}

		let value = match T::from_payload(payload) {
			Ok(v) => v,
			Err(e) => {
				tracing::error!("failed to decode {}: {e}", self.event);
				return;
			}
		};

		for subscriber in subscribers {
			subscriber(&value);
		}
	}

	/// A handler to register on a connection, publishing to `this`.
	pub fn handler(this: &Arc<Self>) -> impl Fn(&[u8]) + Send + Sync + 'static {
		let this = this.clone();
		move |payload: &[u8]| this.publish(payload)
	}
}

impl<T> fmt::Debug for Subscribers<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscribers")
			.field("event", &self.event)
			.field("len", &self.inner.lock().unwrap().len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::payload::Void;

	use std::sync::atomic::{AtomicUsize, Ordering};

	#[test]
	fn fan_out_to_every_subscriber() {
		let subs = Arc::new(Subscribers::<Vec<u8>>::new("price"));
		let calls = Arc::new(AtomicUsize::new(0));

		for _ in 0..3 {
			let calls = calls.clone();
			subs.subscribe(move |v: &Vec<u8>| {
				assert_eq!(v, b"42");
				calls.fetch_add(1, Ordering::Relaxed);
			});
		}

		let listeners = Listeners::new();
		listeners.register("price", Subscribers::handler(&subs));
		listeners.dispatch("price", b"42");

		assert_eq!(calls.load(Ordering::Relaxed), 3);
	}

	#[test]
	fn zero_subscribers() {
		let subs = Subscribers::<Void>::new("tick");
		assert!(subs.is_empty());
		// dropped without a panic
		subs.publish(&[]);
	}
}
