//! The service description stubs are generated from.

use crate::GenError;

use std::collections::HashSet;

use heck::ToSnakeCase;

pub const VOID: &str = "Void";
pub const ERROR: &str = "Error";

/// Marks a service whose methods are called by the client.
pub const CALL_TAG: &str = "is_call";
/// Marks a service whose events are pushed by the server.
pub const PUSH_TAG: &str = "is_push";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PayloadType {
	Void,
	Error,
	Named(String),
}

impl PayloadType {
	/// Maps the reserved names to their variants.
	pub fn named(name: impl Into<String>) -> Self {
		let name = name.into();
		match name.as_str() {
			VOID => Self::Void,
			ERROR => Self::Error,
			_ => Self::Named(name),
		}
	}

	pub fn name(&self) -> &str {
		match self {
			Self::Void => VOID,
			Self::Error => ERROR,
			Self::Named(n) => n,
		}
	}

	pub fn is_void(&self) -> bool {
		matches!(self, Self::Void)
	}
}

impl From<&str> for PayloadType {
	fn from(name: &str) -> Self {
		Self::named(name)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
	pub name: String,
	pub request: PayloadType,
	/// Ignored for push services.
	pub response: PayloadType,
	pub docs: Vec<String>,
}

impl Method {
	pub fn new(
		name: impl Into<String>,
		request: impl Into<PayloadType>,
		response: impl Into<PayloadType>,
	) -> Self {
		Self {
			name: name.into(),
			request: request.into(),
			response: response.into(),
			docs: Vec::new(),
		}
	}

	pub fn doc(mut self, line: impl Into<String>) -> Self {
		self.docs.push(line.into());
		self
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
	Call,
	Push,
}

impl Role {
	pub fn tag(&self) -> &'static str {
		match self {
			Self::Call => CALL_TAG,
			Self::Push => PUSH_TAG,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
	pub name: String,
	pub methods: Vec<Method>,
	pub tags: Vec<String>,
	pub docs: Vec<String>,
}

impl Service {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			methods: Vec::new(),
			tags: Vec::new(),
			docs: Vec::new(),
		}
	}

	pub fn tag(mut self, tag: impl Into<String>) -> Self {
		self.tags.push(tag.into());
		self
	}

	pub fn method(mut self, method: Method) -> Self {
		self.methods.push(method);
		self
	}

	/// Tags match ignoring surrounding parentheses, `is_rpc` and `is_ssp`
	/// are accepted for `is_call` and `is_push`.
	pub fn has_tag(&self, tag: &str) -> bool {
		let tag = normalize_tag(tag);
		self.tags.iter().any(|t| normalize_tag(t) == tag)
	}

	pub fn has_role(&self, role: Role) -> bool {
		self.has_tag(role.tag())
	}

	/// Checks that every method can be framed and dispatched.
	pub fn validate(&self) -> Result<(), GenError> {
		let mut names = HashSet::new();
		let mut idents = HashSet::new();

		for method in &self.methods {
			if method.name.is_empty() {
				return Err(GenError::EmptyName {
					service: self.name.clone(),
				});
			}

			// utf8 never contains 0xFF, only the terminator can occur
			if method.name.contains('\0') {
				return Err(GenError::InvalidName {
					service: self.name.clone(),
					method: method.name.clone(),
				});
			}

			// two names may map to the same rust identifier
			if !names.insert(method.name.as_str())
				|| !idents.insert(method.name.to_snake_case())
			{
				return Err(GenError::DuplicateMethod {
					service: self.name.clone(),
					method: method.name.clone(),
				});
			}
		}

		Ok(())
	}
}

fn normalize_tag(tag: &str) -> &str {
	let tag = tag.trim();
	let tag = tag
		.strip_prefix('(')
		.and_then(|t| t.strip_suffix(')'))
		.unwrap_or(tag)
		.trim();

	match tag {
		"is_rpc" => CALL_TAG,
		"is_ssp" => PUSH_TAG,
		t => t,
	}
}

/// One schema source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaFile {
	/// For example `echo.proto`.
	pub name: String,
	/// Names of the payload types this file defines.
	pub types: Vec<String>,
	/// Other schema files this file refers to.
	pub references: Vec<String>,
	pub services: Vec<Service>,
}

impl SchemaFile {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}

	pub fn ty(mut self, name: impl Into<String>) -> Self {
		self.types.push(name.into());
		self
	}

	pub fn reference(mut self, file: impl Into<String>) -> Self {
		self.references.push(file.into());
		self
	}

	pub fn service(mut self, service: Service) -> Self {
		self.services.push(service);
		self
	}

	pub fn defines(&self, ty: &str) -> bool {
		self.types.iter().any(|t| t == ty)
	}
}

/// Every schema file known to the generator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
	files: Vec<SchemaFile>,
}

impl Schema {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a file, replacing one with the same name.
	pub fn add(&mut self, file: SchemaFile) {
		match self.files.iter_mut().find(|f| f.name == file.name) {
			Some(existing) => *existing = file,
			None => self.files.push(file),
		}
	}

	pub fn file(mut self, file: SchemaFile) -> Self {
		self.add(file);
		self
	}

	pub fn get(&self, name: &str) -> Option<&SchemaFile> {
		self.files.iter().find(|f| f.name == name)
	}

	pub fn files(&self) -> &[SchemaFile] {
		&self.files
	}
}
