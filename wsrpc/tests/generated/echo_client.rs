// THIS FILE WAS AUTOMATICALLY GENERATED
// DO NOT MODIFY!

#[allow(unused_imports)]
use crate::proto::echo::{Msg};
#[allow(unused_imports)]
use crate::proto::common::{Price};
#[derive(Debug, Clone)]
pub struct EchoClient {
    caller: ::wsrpc::client::Caller,
}
impl EchoClient {
    pub fn new(caller: ::wsrpc::client::Caller) -> Self {
        Self { caller }
    }
    /// Returns the message.
    pub async fn say(
        &self,
        param: Msg,
    ) -> ::core::result::Result<Msg, ::wsrpc::error::RequestError> {
        let payload = ::wsrpc::payload::IntoPayload::into_payload(param)?;
        let response = self.caller.rpc("say", payload).await?;
        Ok(<Msg as ::wsrpc::payload::FromPayload>::from_payload(&response)?)
    }
    pub async fn ping(&self) -> ::core::result::Result<(), ::wsrpc::error::RequestError> {
        let payload = ::std::vec::Vec::new();
        self.caller.rpc("ping", payload).await?;
        Ok(())
    }
    pub async fn report(
        &self,
    ) -> ::core::result::Result<
        ::wsrpc::payload::ErrorPayload,
        ::wsrpc::error::RequestError,
    > {
        let payload = ::std::vec::Vec::new();
        let response = self.caller.rpc("report", payload).await?;
        Ok(
            <::wsrpc::payload::ErrorPayload as ::wsrpc::payload::FromPayload>::from_payload(
                &response,
            )?,
        )
    }
}
#[derive(Debug)]
pub struct TickerSubscriber {
    tick: ::std::sync::Arc<::wsrpc::client::Subscribers<::wsrpc::payload::Void>>,
    price: ::std::sync::Arc<::wsrpc::client::Subscribers<Price>>,
}
impl TickerSubscriber {
    #[allow(unused_variables)]
    pub fn new(caller: &::wsrpc::client::Caller) -> Self {
        let tick = ::std::sync::Arc::new(::wsrpc::client::Subscribers::new("tick"));
        caller
            .register_callback_handler(
                "tick",
                ::wsrpc::client::Subscribers::handler(&tick),
            );
        let price = ::std::sync::Arc::new(::wsrpc::client::Subscribers::new("price"));
        caller
            .register_callback_handler(
                "price",
                ::wsrpc::client::Subscribers::handler(&price),
            );
        Self { tick, price }
    }
    pub fn on_tick<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.tick.subscribe(move |_: &::wsrpc::payload::Void| callback())
    }
    pub fn on_price<F>(&self, callback: F)
    where
        F: Fn(&Price) + Send + Sync + 'static,
    {
        self.price.subscribe(callback)
    }
}
/// Every service of this file on one connection.
#[derive(Debug)]
pub struct Services {
    pub echo: EchoClient,
    pub ticker: TickerSubscriber,
}
impl Services {
    #[allow(unused_variables)]
    pub fn new(caller: &::wsrpc::client::Caller) -> Self {
        Self {
            echo: EchoClient::new(caller.clone()),
            ticker: TickerSubscriber::new(caller),
        }
    }
}
