//! Runtime for generated call and push stubs.
//!
//! Calls and pushes share one connection. A client sends a request frame
//! with a fresh id and completes the call once a response frame with the
//! same id (or its negation on failure) arrives. A server dispatches request
//! frames to a generated call service and may push events at any time.
//!
//! The stubs themselves come from `#[service(call)]` / `#[service(push)]`
//! or from the `wsrpc-gen` generator.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod client;
pub mod encdec;
pub mod error;
pub mod frame;
pub mod payload;
pub mod server;
pub mod transport;
pub mod util;

pub use error::{RequestError, ServiceError};
pub use payload::{ErrorPayload, FromPayload, IntoPayload, Void};

#[doc(hidden)]
pub use tracing;

pub use codegen::{FromPayload, IntoPayload, service};
