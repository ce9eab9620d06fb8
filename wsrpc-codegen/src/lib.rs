mod args;
mod payload;
mod service;
mod util;

use args::ServiceArgs;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemTrait, parse_macro_input};

/*
#[service(call)]
pub trait Echo {
	fn say(&mut self, msg: Msg) -> Msg;
}

#[service(push)]
pub trait Ticker {
	fn tick(&self);
}
*/
/// Replaces the trait with the stubs of a call or push service.
///
/// A call service becomes the handler trait (every method returning a
/// `Result<_, ServiceError>` and taking `&mut self`), the `<Name>Method`
/// enum, the `<Name>Server` adapter, a `handle_<name>_request` function and
/// the `<Name>Client` proxy. A push service becomes the event trait, the
/// `<Name>Emitter` and the `<Name>Subscriber`.
#[proc_macro_attribute]
pub fn service(attrs: TokenStream, item: TokenStream) -> TokenStream {
	let args = parse_macro_input!(attrs as ServiceArgs);
	let item = parse_macro_input!(item as ItemTrait);

	service::expand(args, item)
		.unwrap_or_else(|e| e.to_compile_error())
		.into()
}

/*
#[derive(IntoPayload)]
#[payload(json)]
*/
#[proc_macro_derive(IntoPayload, attributes(payload))]
pub fn derive_into_payload(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);

	payload::into_expand(input)
		.unwrap_or_else(|e| e.to_compile_error())
		.into()
}

#[proc_macro_derive(FromPayload, attributes(payload))]
pub fn derive_from_payload(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);

	payload::from_expand(input)
		.unwrap_or_else(|e| e.to_compile_error())
		.into()
}
