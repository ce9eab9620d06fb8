use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Error, Ident, Result};

pub(crate) fn wsrpc_crate() -> Result<TokenStream> {
	let name =
		crate_name("wsrpc").map_err(|e| Error::new(Span::call_site(), e))?;

	Ok(match name {
		// inside wsrpc this is an integration test or a doc test
		FoundCrate::Itself => quote!(wsrpc),
		FoundCrate::Name(n) => {
			let ident = Ident::new(&n, Span::call_site());
			quote!(::#ident)
		}
	})
}
