// THIS FILE WAS AUTOMATICALLY GENERATED
// DO NOT MODIFY!

#[allow(unused_imports)]
use crate::proto::echo::{Msg};
#[allow(unused_imports)]
use crate::proto::common::{Price};
pub trait Echo {
    /// Returns the message.
    fn say(
        &mut self,
        param: Msg,
    ) -> ::core::result::Result<Msg, ::wsrpc::error::ServiceError>;
    fn ping(&mut self) -> ::core::result::Result<(), ::wsrpc::error::ServiceError>;
    fn report(
        &mut self,
    ) -> ::core::result::Result<
        ::wsrpc::payload::ErrorPayload,
        ::wsrpc::error::ServiceError,
    >;
}
impl<T: Echo + ?Sized> Echo for &mut T {
    fn say(
        &mut self,
        param: Msg,
    ) -> ::core::result::Result<Msg, ::wsrpc::error::ServiceError> {
        (**self).say(param)
    }
    fn ping(&mut self) -> ::core::result::Result<(), ::wsrpc::error::ServiceError> {
        (**self).ping()
    }
    fn report(
        &mut self,
    ) -> ::core::result::Result<
        ::wsrpc::payload::ErrorPayload,
        ::wsrpc::error::ServiceError,
    > {
        (**self).report()
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EchoMethod {
    /// Returns the message.
    Say,
    Ping,
    Report,
}
impl ::wsrpc::server::MethodId for EchoMethod {
    const ALL: &'static [Self] = &[Self::Say, Self::Ping, Self::Report];
    fn name(&self) -> &'static str {
        match *self {
            Self::Say => "say",
            Self::Ping => "ping",
            Self::Report => "report",
        }
    }
    fn table() -> &'static ::wsrpc::server::MethodTable<Self> {
        static TABLE: ::std::sync::OnceLock<::wsrpc::server::MethodTable<EchoMethod>> = ::std::sync::OnceLock::new();
        TABLE.get_or_init(::wsrpc::server::MethodTable::new)
    }
}
/// Decodes calls and hands them to the wrapped handler.
pub struct EchoServer<H>(pub H);
impl<H: Echo> ::wsrpc::server::CallService for EchoServer<H> {
    type Method = EchoMethod;
    #[allow(unused_variables)]
    fn call(
        &mut self,
        method: EchoMethod,
        payload: &[u8],
    ) -> ::core::result::Result<::std::vec::Vec<u8>, ::wsrpc::error::ServiceError> {
        match method {
            EchoMethod::Say => {
                let param = <Msg as ::wsrpc::payload::FromPayload>::from_payload(
                    payload,
                )?;
                let response = self.0.say(param)?;
                Ok(::wsrpc::payload::IntoPayload::into_payload(response)?)
            }
            EchoMethod::Ping => {
                self.0.ping()?;
                Ok(::wsrpc::payload::IntoPayload::into_payload(::wsrpc::payload::Void)?)
            }
            EchoMethod::Report => {
                let response = self.0.report()?;
                Ok(::wsrpc::payload::IntoPayload::into_payload(response)?)
            }
        }
    }
}
/// Handles one request frame, writing at most one response frame.
pub fn handle_echo_request<H, S, L>(
    socket: &S,
    handler: &mut H,
    log: &L,
    frame: &[u8],
) -> ::wsrpc::server::DispatchOutcome
where
    H: Echo + ?Sized,
    S: ::wsrpc::server::Socket + ?Sized,
    L: ::wsrpc::server::Logger + ?Sized,
{
    ::wsrpc::server::dispatch(&mut EchoServer(handler), socket, log, frame)
}
pub trait Ticker {
    fn tick(&self);
    fn price(&self, param: Price);
}
/// Writes every event as a push frame.
pub struct TickerEmitter<S, L> {
    socket: S,
    log: L,
}
impl<S, L> TickerEmitter<S, L> {
    pub fn new(socket: S, log: L) -> Self {
        Self { socket, log }
    }
}
impl<S, L> Ticker for TickerEmitter<S, L>
where
    S: ::wsrpc::server::Socket,
    L: ::wsrpc::server::Logger,
{
    fn tick(&self) {
        ::wsrpc::server::push(
            &self.socket,
            &self.log,
            "Ticker",
            "tick",
            ::wsrpc::payload::Void,
        )
    }
    fn price(&self, param: Price) {
        ::wsrpc::server::push(&self.socket, &self.log, "Ticker", "price", param)
    }
}
