use crate::util::wsrpc_crate;

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Attribute, DeriveInput, Error, Ident};

pub(crate) fn into_expand(input: DeriveInput) -> Result<TokenStream, Error> {
	let DeriveInput {
		attrs,
		ident,
		generics,
		..
	} = input;

	let attr = PayloadAttribute::from_attrs(&attrs)?;
	let encdec_module = attr.module;

	let wsrpc = wsrpc_crate()?;
	let payload = quote!(#wsrpc::payload);

	let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

	Ok(quote!(
		impl #impl_generics #payload::IntoPayload for #ident #ty_generics
		#where_clause {
			fn into_payload(
				self
			) -> ::core::result::Result<
				::std::vec::Vec<u8>,
				#payload::CodecError
			> {
				#wsrpc::encdec::#encdec_module::encode(self)
			}
		}
	))
}

pub(crate) fn from_expand(input: DeriveInput) -> Result<TokenStream, Error> {
	let DeriveInput {
		attrs,
		ident,
		generics,
		..
	} = input;

	let attr = PayloadAttribute::from_attrs(&attrs)?;
	let encdec_module = attr.module;

	let wsrpc = wsrpc_crate()?;
	let payload = quote!(#wsrpc::payload);

	let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

	Ok(quote!(
		impl #impl_generics #payload::FromPayload for #ident #ty_generics
		#where_clause {
			fn from_payload(
				bytes: &[u8]
			) -> ::core::result::Result<Self, #payload::CodecError> {
				#wsrpc::encdec::#encdec_module::decode(bytes)
			}
		}
	))
}

struct PayloadAttribute {
	/// which module should be used to convert the types
	pub module: Ident,
}

impl PayloadAttribute {
	pub fn from_attrs(attrs: &[Attribute]) -> Result<Self, Error> {
		let mut module = None;

		for attr in attrs {
			if !attr.path().is_ident("payload") {
				continue;
			}

			let ident: Ident = attr.parse_args()?;
			if ident != "json" && ident != "protobuf" {
				return Err(Error::new(
					ident.span(),
					"expected `json` or `protobuf`",
				));
			}

			module = Some(ident);
		}

		Ok(Self {
			module: module.ok_or_else(|| {
				Error::new(
					Span::call_site(),
					"need an attribute #[payload(..)]",
				)
			})?,
		})
	}
}
