use super::{EmitCtx, method_parts, service_ident, snake_ident};
use crate::GenError;
use crate::schema::Service;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// A proxy with one async method per call.
pub fn call_client(
	ctx: &EmitCtx,
	service: &Service,
) -> Result<TokenStream, GenError> {
	let krate = &ctx.krate;
	let vis = &ctx.vis;
	let client = service_ident(service, "Client")?;
	let methods = method_parts(ctx, service)?;

	let fns = methods.iter().map(|m| {
		let fn_ident = &m.fn_ident;
		let wire_name = m.wire_name();
		let docs = &m.docs;
		let param = m.param();
		let output = m.output();

		let encode = match &m.request {
			Some(_) => quote!(#krate::payload::IntoPayload::into_payload(param)?),
			None => quote!(::std::vec::Vec::new()),
		};

		let decode = match &m.response {
			Some(ty) => quote!(
				let response = self.caller.rpc(#wire_name, payload).await?;
				Ok(<#ty as #krate::payload::FromPayload>::from_payload(
					&response
				)?)
			),
			None => quote!(
				self.caller.rpc(#wire_name, payload).await?;
				Ok(())
			),
		};

		quote!(
			#docs
			#vis async fn #fn_ident(&self #param) -> ::core::result::Result<
				#output,
				#krate::error::RequestError
			> {
				let payload = #encode;
				#decode
			}
		)
	});

	Ok(quote!(
		#[derive(Debug, Clone)]
		#vis struct #client {
			caller: #krate::client::Caller,
		}

		impl #client {
			#vis fn new(caller: #krate::client::Caller) -> Self {
				Self { caller }
			}

			#(#fns)*
		}
	))
}

/// Registers one handler per event at construction, subscribers are added
/// with `on_<event>`.
pub fn push_subscriber(
	ctx: &EmitCtx,
	service: &Service,
) -> Result<TokenStream, GenError> {
	let krate = &ctx.krate;
	let vis = &ctx.vis;
	let subscriber = service_ident(service, "Subscriber")?;
	let methods = method_parts(ctx, service)?;

	let mut fields = vec![];
	let mut inits = vec![];
	let mut field_idents = vec![];
	let mut on_fns = vec![];

	for m in &methods {
		let field = &m.fn_ident;
		let wire_name = m.wire_name();
		let docs = &m.docs;
		let on_fn = format_ident!("on_{}", m.fn_ident);

		let ty = match &m.request {
			Some(ty) => quote!(#ty),
			None => quote!(#krate::payload::Void),
		};

		fields.push(quote!(
			#field: ::std::sync::Arc<#krate::client::Subscribers<#ty>>
		));

		inits.push(quote!(
			let #field = ::std::sync::Arc::new(
				#krate::client::Subscribers::new(#wire_name)
			);
			caller.register_callback_handler(
				#wire_name,
				#krate::client::Subscribers::handler(&#field),
			);
		));

		field_idents.push(field);

		on_fns.push(match &m.request {
			Some(ty) => quote!(
				#docs
				#vis fn #on_fn<F>(&self, callback: F)
				where
					F: Fn(&#ty) + Send + Sync + 'static,
				{
					self.#field.subscribe(callback)
				}
			),
			None => quote!(
				#docs
				#vis fn #on_fn<F>(&self, callback: F)
				where
					F: Fn() + Send + Sync + 'static,
				{
					self.#field.subscribe(move |_: &#ty| callback())
				}
			),
		});
	}

	Ok(quote!(
		#[derive(Debug)]
		#vis struct #subscriber {
			#(#fields,)*
		}

		impl #subscriber {
			#[allow(unused_variables)]
			#vis fn new(caller: &#krate::client::Caller) -> Self {
				#(#inits)*

				Self {
					#(#field_idents,)*
				}
			}

			#(#on_fns)*
		}
	))
}

/// One field per service proxy, all sharing a caller.
pub fn aggregate(
	ctx: &EmitCtx,
	call: &[&Service],
	push: &[&Service],
) -> Result<TokenStream, GenError> {
	let krate = &ctx.krate;
	let vis = &ctx.vis;

	let mut fields = vec![];
	let mut inits = vec![];

	for service in call {
		let field = snake_ident(&service.name)?;
		let client = service_ident(service, "Client")?;
		fields.push(quote!(#vis #field: #client));
		inits.push(quote!(#field: #client::new(caller.clone())));
	}

	for service in push {
		let field = snake_ident(&service.name)?;
		// a service in both lists already has a field
		let field = match call.iter().any(|s| s.name == service.name) {
			true => format_ident!("{}_events", field),
			false => field,
		};
		let subscriber = service_ident(service, "Subscriber")?;
		fields.push(quote!(#vis #field: #subscriber));
		inits.push(quote!(#field: #subscriber::new(caller)));
	}

	Ok(quote!(
		/// Every service of this file on one connection.
		#[derive(Debug)]
		#vis struct Services {
			#(#fields,)*
		}

		impl Services {
			#[allow(unused_variables)]
			#vis fn new(caller: &#krate::client::Caller) -> Self {
				Self {
					#(#inits,)*
				}
			}
		}
	))
}
