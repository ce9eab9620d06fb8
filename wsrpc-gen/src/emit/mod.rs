//! Turns services into rust items.

mod client;
mod server;

pub use client::{aggregate, call_client, push_subscriber};
pub use server::{call_server, push_emitter};

use crate::GenError;
use crate::schema::{Method, PayloadType, Role, Service};

use heck::{ToSnakeCase, ToUpperCamelCase};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Ident, Type, Visibility};

/// Settings shared by every emitted item.
#[derive(Clone)]
pub struct EmitCtx {
	/// Path to the runtime crate, `::wsrpc` by default.
	pub krate: TokenStream,
	pub vis: Visibility,
}

impl EmitCtx {
	pub fn new(krate: TokenStream) -> Self {
		Self {
			krate,
			vis: syn::parse_quote!(pub),
		}
	}

	pub fn with_vis(mut self, vis: Visibility) -> Self {
		self.vis = vis;
		self
	}
}

impl Default for EmitCtx {
	fn default() -> Self {
		Self::new(quote!(::wsrpc))
	}
}

/// Server and client items for every role of `service`.
pub fn service_items(
	ctx: &EmitCtx,
	service: &Service,
) -> Result<TokenStream, GenError> {
	service.validate()?;

	let mut tokens = TokenStream::new();

	if service.has_role(Role::Call) {
		tokens.extend(call_server(ctx, service)?);
		tokens.extend(call_client(ctx, service)?);
	}

	if service.has_role(Role::Push) {
		tokens.extend(push_emitter(ctx, service)?);
		tokens.extend(push_subscriber(ctx, service)?);
	}

	Ok(tokens)
}

pub(crate) fn ident(name: &str) -> Result<Ident, GenError> {
	syn::parse_str::<Ident>(name)
		.map_err(|_| GenError::InvalidIdent(name.to_string()))
}

pub(crate) fn snake_ident(name: &str) -> Result<Ident, GenError> {
	ident(&name.to_snake_case())
}

/// The service name followed by `suffix`.
pub(crate) fn service_ident(
	service: &Service,
	suffix: &str,
) -> Result<Ident, GenError> {
	let base = ident(&service.name)?;
	Ok(format_ident!("{}{}", base, suffix))
}

/// Doc attributes from documentation lines, without a leading `///` or
/// `//`.
pub(crate) fn docs(lines: &[String]) -> TokenStream {
	let lines = lines.iter().map(|line| {
		let line = line
			.strip_prefix("///")
			.or_else(|| line.strip_prefix("//"))
			.unwrap_or(line);
		quote!(#[doc = #line])
	});

	quote!(#(#lines)*)
}

/// The rust type of a payload, `None` for `Void`.
pub(crate) fn payload_ty(
	ctx: &EmitCtx,
	ty: &PayloadType,
) -> Result<Option<Type>, GenError> {
	let krate = &ctx.krate;
	let ty = match ty {
		PayloadType::Void => return Ok(None),
		PayloadType::Error => syn::parse_quote!(#krate::payload::ErrorPayload),
		PayloadType::Named(name) => syn::parse_str(name)
			.map_err(|_| GenError::InvalidType(name.clone()))?,
	};

	Ok(Some(ty))
}

/// Everything emitters need to know about a method.
pub(crate) struct MethodParts<'a> {
	pub method: &'a Method,
	pub fn_ident: Ident,
	pub variant: Ident,
	pub request: Option<Type>,
	pub response: Option<Type>,
	pub docs: TokenStream,
}

impl<'a> MethodParts<'a> {
	pub fn new(ctx: &EmitCtx, method: &'a Method) -> Result<Self, GenError> {
		Ok(Self {
			method,
			fn_ident: snake_ident(&method.name)?,
			variant: ident(&method.name.to_upper_camel_case())?,
			request: payload_ty(ctx, &method.request)?,
			response: payload_ty(ctx, &method.response)?,
			docs: docs(&method.docs),
		})
	}

	/// The name used on the wire.
	pub fn wire_name(&self) -> &str {
		&self.method.name
	}

	/// `param: Request` or nothing.
	pub fn param(&self) -> TokenStream {
		match &self.request {
			Some(ty) => quote!(, param: #ty),
			None => quote!(),
		}
	}

	/// `param` or nothing.
	pub fn arg(&self) -> TokenStream {
		match &self.request {
			Some(_) => quote!(param),
			None => quote!(),
		}
	}

	/// The response type, `()` for `Void`.
	pub fn output(&self) -> TokenStream {
		match &self.response {
			Some(ty) => quote!(#ty),
			None => quote!(()),
		}
	}
}

pub(crate) fn method_parts<'a>(
	ctx: &EmitCtx,
	service: &'a Service,
) -> Result<Vec<MethodParts<'a>>, GenError> {
	service
		.methods
		.iter()
		.map(|m| MethodParts::new(ctx, m))
		.collect()
}
