//! Generates server and client stubs for services sharing one connection.
//!
//! A [`Schema`] holds schema files with their payload types and services.
//! Services tagged `is_call` become a handler trait with a dispatch function
//! on the server and an async proxy on the client, services tagged `is_push`
//! become an event emitter on the server and subscribers on the client.
//!
//! ```
//! use wsrpc_gen::{Generator, HEADER};
//! use wsrpc_gen::schema::{Method, Schema, SchemaFile, Service};
//!
//! let schema = Schema::new().file(
//! 	SchemaFile::new("echo.proto").ty("Msg").service(
//! 		Service::new("Echo")
//! 			.tag("is_call")
//! 			.method(Method::new("say", "Msg", "Msg")),
//! 	),
//! );
//!
//! let out = Generator::new().generate(&schema, "echo.proto").unwrap();
//! assert!(out.server.starts_with(HEADER));
//! assert!(out.client.contains("pub struct EchoClient"));
//! ```

pub mod classify;
pub mod emit;
mod error;
pub mod imports;
pub mod parse;
mod render;
pub mod schema;

pub use error::GenError;
pub use render::{Generated, Generator, HEADER, render};
pub use schema::Schema;
