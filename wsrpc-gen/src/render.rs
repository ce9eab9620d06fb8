use crate::GenError;
use crate::classify::classify;
use crate::emit::{self, EmitCtx};
use crate::imports::{self, Import};
use crate::schema::{Schema, SchemaFile};

use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::Path;

/// Starts every generated file.
pub const HEADER: &str =
	"// THIS FILE WAS AUTOMATICALLY GENERATED\n// DO NOT MODIFY!\n\n";

/// The rendered sources of one schema file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
	pub server: String,
	pub client: String,
}

/// Renders schema files to rust sources.
#[derive(Clone)]
pub struct Generator {
	ctx: EmitCtx,
	types_root: Path,
}

impl Generator {
	pub fn new() -> Self {
		Self {
			ctx: EmitCtx::default(),
			types_root: syn::parse_quote!(crate),
		}
	}

	/// The path generated code reaches the runtime through, `::wsrpc` by
	/// default.
	pub fn crate_path(mut self, path: &str) -> Result<Self, GenError> {
		let path: Path = syn::parse_str(path)
			.map_err(|_| GenError::InvalidType(path.to_string()))?;
		self.ctx.krate = quote!(#path);
		Ok(self)
	}

	/// The module holding one submodule per schema file, `crate` by
	/// default.
	pub fn types_root(mut self, path: &str) -> Result<Self, GenError> {
		self.types_root = syn::parse_str(path)
			.map_err(|_| GenError::InvalidType(path.to_string()))?;
		Ok(self)
	}

	pub fn generate(
		&self,
		schema: &Schema,
		file: &str,
	) -> Result<Generated, GenError> {
		let file = schema
			.get(file)
			.ok_or_else(|| GenError::UnknownFile(file.to_string()))?;

		self.generate_file(schema, file)
	}

	/// Renders the server and the client source of `file`.
	///
	/// Both expect the payload types to be in scope under
	/// `<types_root>::<file module>`.
	pub fn generate_file(
		&self,
		schema: &Schema,
		file: &SchemaFile,
	) -> Result<Generated, GenError> {
		for service in &file.services {
			service.validate()?;
		}

		let classified = classify(&file.services);
		let ctx = &self.ctx;

		let types = imports::referenced_types(
			classified.call.iter().chain(&classified.push).copied(),
		);
		let imports = self.use_items(&imports::resolve(file, schema, &types))?;

		let mut server = imports.clone();
		let mut client = imports;

		for service in &classified.call {
			server.extend(emit::call_server(ctx, service)?);
			client.extend(emit::call_client(ctx, service)?);
		}

		for service in &classified.push {
			server.extend(emit::push_emitter(ctx, service)?);
			client.extend(emit::push_subscriber(ctx, service)?);
		}

		client.extend(emit::aggregate(ctx, &classified.call, &classified.push)?);

		Ok(Generated {
			server: render(server)?,
			client: render(client)?,
		})
	}

	fn use_items(&self, imports: &[Import]) -> Result<TokenStream, GenError> {
		let root = &self.types_root;
		let mut tokens = TokenStream::new();

		for import in imports {
			let module = module_path(&import.file)?;
			let types = import
				.types
				.iter()
				.map(|t| emit::ident(t))
				.collect::<Result<Vec<_>, _>>()?;

			tokens.extend(quote!(
				#[allow(unused_imports)]
				use #root::#module::{#(#types),*};
			));
		}

		Ok(tokens)
	}
}

impl Default for Generator {
	fn default() -> Self {
		Self::new()
	}
}

/// `common/time.proto` becomes `common::time`.
fn module_path(file: &str) -> Result<TokenStream, GenError> {
	let stem = match file.rsplit_once('.') {
		Some((stem, ext)) if !ext.contains('/') => stem,
		_ => file,
	};

	let segments = stem
		.split('/')
		.filter(|s| !s.is_empty())
		.map(|s| emit::ident(&s.to_snake_case()))
		.collect::<Result<Vec<_>, _>>()?;

	if segments.is_empty() {
		return Err(GenError::InvalidIdent(file.to_string()));
	}

	Ok(quote!(#(#segments)::*))
}

/// Formats the tokens as a file starting with [`HEADER`].
pub fn render(tokens: TokenStream) -> Result<String, GenError> {
	let file: syn::File =
		syn::parse2(tokens).map_err(|e| GenError::Syntax(e.to_string()))?;

	Ok(format!("{HEADER}{}", prettyplease::unparse(&file)))
}
