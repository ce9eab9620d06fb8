use generator::schema::Role;

use syn::parse::{Parse, ParseStream, Result};
use syn::{Error, Ident};

#[derive(Clone)]
pub(crate) struct ServiceArgs {
	pub role: Role,
}

impl Parse for ServiceArgs {
	fn parse(input: ParseStream) -> Result<Self> {
		let ident: Ident = input.parse()?;

		let role = match ident.to_string().as_str() {
			"call" | "rpc" => Role::Call,
			"push" | "ssp" => Role::Push,
			_ => {
				return Err(Error::new(
					ident.span(),
					"expected `call` or `push`",
				));
			}
		};

		if !input.is_empty() {
			return Err(input.error("unexpected tokens after the role"));
		}

		Ok(Self { role })
	}
}
