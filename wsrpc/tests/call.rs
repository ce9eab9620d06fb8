use wsrpc::client::{self, Config};
use wsrpc::error::{RequestError, ServiceError};
use wsrpc::server::{self, DispatchOutcome, TracingLogger};
use wsrpc::transport::memory::{self, MemoryTransport};
use wsrpc::util::testing::{MemoryLogger, MemorySocket};
use wsrpc::{ErrorPayload, FromPayload, IntoPayload};

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[derive(IntoPayload, FromPayload)]
#[payload(json)]
pub struct Msg {
	pub text: String,
}

impl Msg {
	fn new(text: &str) -> Self {
		Self {
			text: text.to_string(),
		}
	}
}

#[wsrpc::service(call)]
pub trait Echo {
	/// Returns the message unchanged.
	fn say(&mut self, msg: Msg) -> Msg;

	fn fail(&mut self, msg: Msg) -> Msg;

	fn count(&mut self);
}

#[derive(Debug, Default)]
struct EchoHandler {
	calls: usize,
}

impl Echo for EchoHandler {
	fn say(&mut self, msg: Msg) -> Result<Msg, ServiceError> {
		self.calls += 1;
		Ok(msg)
	}

	fn fail(&mut self, _msg: Msg) -> Result<Msg, ServiceError> {
		self.calls += 1;
		Err(ServiceError::new("bad input"))
	}

	fn count(&mut self) -> Result<(), ServiceError> {
		self.calls += 1;
		Ok(())
	}
}

fn serve(transport: MemoryTransport) -> tokio::task::JoinHandle<usize> {
	tokio::spawn(async move {
		let mut con = server::Connection::new(transport);
		let mut service = EchoServer(EchoHandler::default());

		con.serve(&mut service, &TracingLogger).await;

		service.0.calls
	})
}

fn connect(cfg: Config) -> (client::Connection, tokio::task::JoinHandle<usize>) {
	let (client, server) = memory::pair();

	(client::Connection::new(client, cfg), serve(server))
}

#[tokio::test]
async fn round_trip() {
	let (con, server) = connect(Config::default());
	let echo = EchoClient::new(con.caller());

	let resp = echo.say(Msg::new("hi")).await.unwrap();
	assert_eq!(resp, Msg::new("hi"));

	echo.count().await.unwrap();

	con.close().await.unwrap();
	assert_eq!(server.await.unwrap(), 2);
}

#[tokio::test]
async fn concurrent_calls_are_matched_by_id() {
	let (con, server) = connect(Config::default());
	let echo = EchoClient::new(con.caller());

	let (a, b, c) = tokio::join!(
		echo.say(Msg::new("a")),
		echo.say(Msg::new("b")),
		echo.say(Msg::new("c")),
	);
	assert_eq!(a.unwrap().text, "a");
	assert_eq!(b.unwrap().text, "b");
	assert_eq!(c.unwrap().text, "c");

	con.close().await.unwrap();
	assert_eq!(server.await.unwrap(), 3);
}

#[tokio::test]
async fn handler_failure_reaches_the_caller() {
	let (con, server) = connect(Config::default());
	let echo = EchoClient::new(con.caller());

	let err = echo.fail(Msg::new("x")).await.unwrap_err();
	assert_eq!(err.remote_message(), Some("bad input"));

	// the connection keeps working after a failure
	assert_eq!(echo.say(Msg::new("ok")).await.unwrap().text, "ok");

	con.close().await.unwrap();
	server.await.unwrap();
}

#[tokio::test]
async fn unknown_method_times_out() {
	let (con, server) = connect(Config {
		timeout: Some(Duration::from_millis(50)),
	});

	let err = con.rpc("shout", b"{}".to_vec()).await.unwrap_err();
	assert!(matches!(err, RequestError::Timeout), "{err:?}");

	con.close().await.unwrap();
	assert_eq!(server.await.unwrap(), 0);
}

#[tokio::test]
async fn pending_calls_fail_when_the_server_goes_away() {
	let (client, mut server) = memory::pair();
	let con = client::Connection::new(client, Config { timeout: None });
	let echo = EchoClient::new(con.caller());

	let call = tokio::spawn(async move { echo.say(Msg::new("hi")).await });

	// read the request but never answer it
	let req = wsrpc::transport::Transport::receive(&mut server)
		.await
		.unwrap()
		.unwrap();
	assert!(req.starts_with(b"say\0"));
	drop(server);

	let err = call.await.unwrap().unwrap_err();
	assert!(matches!(err, RequestError::ConnectionClosed), "{err:?}");

	let echo = EchoClient::new(con.caller());
	let err = echo.say(Msg::new("late")).await.unwrap_err();
	assert!(
		matches!(
			err,
			RequestError::ConnectionAlreadyClosed
				| RequestError::ConnectionClosed
		),
		"{err:?}"
	);
}

#[test]
fn generated_dispatch_without_a_connection() {
	let socket = MemorySocket::new();
	let log = MemoryLogger::new();
	let mut handler = EchoHandler::default();

	let frame = wsrpc::frame::Request {
		name: "say",
		id: 9,
		payload: &Msg::new("hi").into_payload().unwrap(),
	}
	.to_bytes()
	.unwrap();

	let outcome = handle_echo_request(&socket, &mut handler, &log, &frame);
	assert!(matches!(outcome, DispatchOutcome::Responded { method: "say" }));

	let written = socket.take_written();
	assert_eq!(written.len(), 1);
	assert_eq!(&written[0][..4], &[0, 0, 0, 9]);
	assert_eq!(Msg::from_payload(&written[0][4..]).unwrap(), Msg::new("hi"));
	assert!(log.contains("Request: 'say'"));
}

#[test]
fn undecodable_request_is_answered_with_an_error() {
	let socket = MemorySocket::new();
	let log = MemoryLogger::new();
	let mut handler = EchoHandler::default();

	let frame = wsrpc::frame::Request {
		name: "say",
		id: 4,
		payload: b"not json",
	}
	.to_bytes()
	.unwrap();

	let outcome = handle_echo_request(&socket, &mut handler, &log, &frame);
	assert!(
		matches!(outcome, DispatchOutcome::Failed { method: "say", .. }),
		"{outcome:?}"
	);
	assert_eq!(handler.calls, 0);

	let written = socket.take_written();
	assert_eq!(written.len(), 1);
	assert_eq!(&written[0][..4], &[0xff, 0xff, 0xff, 0xfc]);

	let error = ErrorPayload::from_payload(&written[0][4..]).unwrap();
	assert!(error.error.starts_with("json:"), "{}", error.error);
}

#[test]
fn generated_method_table() {
	use wsrpc::server::MethodId;

	assert_eq!(EchoMethod::ALL.len(), 3);
	assert_eq!(EchoMethod::from_name("fail"), Some(EchoMethod::Fail));
	assert_eq!(EchoMethod::Count.name(), "count");
	assert_eq!(EchoMethod::from_name("shout"), None);
}
