use super::{EmitCtx, docs, method_parts, service_ident};
use crate::GenError;
use crate::schema::Service;

use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// The handler trait of a call service, its method enum, the adapter
/// implementing `CallService` and the `handle_<service>_request` function.
pub fn call_server(
	ctx: &EmitCtx,
	service: &Service,
) -> Result<TokenStream, GenError> {
	let krate = &ctx.krate;
	let vis = &ctx.vis;
	let name = service_ident(service, "")?;
	let method_enum = service_ident(service, "Method")?;
	let server = service_ident(service, "Server")?;
	let handle_fn =
		format_ident!("handle_{}_request", service.name.to_snake_case());
	let service_docs = docs(&service.docs);
	let methods = method_parts(ctx, service)?;

	let mut trait_fns = vec![];
	let mut forward_fns = vec![];
	let mut variants = vec![];
	let mut names = vec![];
	let mut arms = vec![];

	for m in &methods {
		let fn_ident = &m.fn_ident;
		let variant = &m.variant;
		let wire_name = m.wire_name();
		let docs = &m.docs;
		let param = m.param();
		let arg = m.arg();
		let output = m.output();

		let sig = quote!(
			fn #fn_ident(&mut self #param) -> ::core::result::Result<
				#output,
				#krate::error::ServiceError
			>
		);

		trait_fns.push(quote!(
			#docs
			#sig;
		));

		forward_fns.push(quote!(
			#sig {
				(**self).#fn_ident(#arg)
			}
		));

		variants.push(quote!(
			#docs
			#variant
		));

		names.push(quote!(Self::#variant => #wire_name));

		let decode = m.request.as_ref().map(|ty| {
			quote!(
				let param =
					<#ty as #krate::payload::FromPayload>::from_payload(payload)?;
			)
		});

		let encode = match &m.response {
			Some(_) => quote!(
				let response = self.0.#fn_ident(#arg)?;
				Ok(#krate::payload::IntoPayload::into_payload(response)?)
			),
			None => quote!(
				self.0.#fn_ident(#arg)?;
				Ok(#krate::payload::IntoPayload::into_payload(
					#krate::payload::Void
				)?)
			),
		};

		arms.push(quote!(
			#method_enum::#variant => {
				#decode
				#encode
			}
		));
	}

	let all = methods.iter().map(|m| &m.variant);

	Ok(quote!(
		#service_docs
		#vis trait #name {
			#(#trait_fns)*
		}

		impl<T: #name + ?Sized> #name for &mut T {
			#(#forward_fns)*
		}

		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		#vis enum #method_enum {
			#(#variants,)*
		}

		impl #krate::server::MethodId for #method_enum {
			const ALL: &'static [Self] = &[#(Self::#all),*];

			fn name(&self) -> &'static str {
				match *self {
					#(#names,)*
				}
			}

			fn table() -> &'static #krate::server::MethodTable<Self> {
				static TABLE: ::std::sync::OnceLock<
					#krate::server::MethodTable<#method_enum>
				> = ::std::sync::OnceLock::new();

				TABLE.get_or_init(#krate::server::MethodTable::new)
			}
		}

		/// Decodes calls and hands them to the wrapped handler.
		#vis struct #server<H>(pub H);

		impl<H: #name> #krate::server::CallService for #server<H> {
			type Method = #method_enum;

			#[allow(unused_variables)]
			fn call(
				&mut self,
				method: #method_enum,
				payload: &[u8],
			) -> ::core::result::Result<
				::std::vec::Vec<u8>,
				#krate::error::ServiceError
			> {
				match method {
					#(#arms)*
				}
			}
		}

		/// Handles one request frame, writing at most one response frame.
		#vis fn #handle_fn<H, S, L>(
			socket: &S,
			handler: &mut H,
			log: &L,
			frame: &[u8],
		) -> #krate::server::DispatchOutcome
		where
			H: #name + ?Sized,
			S: #krate::server::Socket + ?Sized,
			L: #krate::server::Logger + ?Sized,
		{
			#krate::server::dispatch(&mut #server(handler), socket, log, frame)
		}
	))
}

/// The event trait of a push service and the emitter implementing it over
/// a socket.
pub fn push_emitter(
	ctx: &EmitCtx,
	service: &Service,
) -> Result<TokenStream, GenError> {
	let krate = &ctx.krate;
	let vis = &ctx.vis;
	let name = service_ident(service, "")?;
	let emitter = service_ident(service, "Emitter")?;
	let service_name = &service.name;
	let service_docs = docs(&service.docs);
	let methods = method_parts(ctx, service)?;

	let mut trait_fns = vec![];
	let mut impl_fns = vec![];

	for m in &methods {
		let fn_ident = &m.fn_ident;
		let wire_name = m.wire_name();
		let docs = &m.docs;
		let param = m.param();
		let payload = match &m.request {
			Some(_) => quote!(param),
			None => quote!(#krate::payload::Void),
		};

		trait_fns.push(quote!(
			#docs
			fn #fn_ident(&self #param);
		));

		impl_fns.push(quote!(
			fn #fn_ident(&self #param) {
				#krate::server::push(
					&self.socket,
					&self.log,
					#service_name,
					#wire_name,
					#payload,
				)
			}
		));
	}

	Ok(quote!(
		#service_docs
		#vis trait #name {
			#(#trait_fns)*
		}

		/// Writes every event as a push frame.
		#vis struct #emitter<S, L> {
			socket: S,
			log: L,
		}

		impl<S, L> #emitter<S, L> {
			#vis fn new(socket: S, log: L) -> Self {
				Self { socket, log }
			}
		}

		impl<S, L> #name for #emitter<S, L>
		where
			S: #krate::server::Socket,
			L: #krate::server::Logger,
		{
			#(#impl_fns)*
		}
	))
}
