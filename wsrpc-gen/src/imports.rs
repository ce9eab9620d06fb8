//! Decides which schema file each payload type is imported from.

use crate::schema::{PayloadType, Schema, SchemaFile, Service};

use std::collections::BTreeSet;

/// The types to import from one schema file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
	pub file: String,
	/// Sorted lexicographically.
	pub types: Vec<String>,
}

/// Every named payload type the client code of `services` refers to.
///
/// `Void` and `Error` come from the runtime and are never part of it.
pub fn referenced_types<'a, I>(services: I) -> BTreeSet<String>
where
	I: IntoIterator<Item = &'a Service>,
{
	services
		.into_iter()
		.flat_map(|s| &s.methods)
		.flat_map(|m| [&m.request, &m.response])
		.filter_map(|ty| match ty {
			PayloadType::Named(name) => Some(name.clone()),
			_ => None,
		})
		.collect()
}

/// Resolves `types` against `file` and the files it references directly.
///
/// Each type is imported from the first file defining it, `file` itself
/// first and then its references in declaration order. Types no file
/// defines are left out. References of references are not followed.
pub fn resolve(
	file: &SchemaFile,
	schema: &Schema,
	types: &BTreeSet<String>,
) -> Vec<Import> {
	let mut files = vec![file];
	for reference in &file.references {
		if files.iter().any(|f| &f.name == reference) {
			continue;
		}

		match schema.get(reference) {
			Some(f) => files.push(f),
			None => tracing::warn!(
				"schema file {reference:?} referenced by {:?} not found, \
				 skipping",
				file.name
			),
		}
	}

	let mut groups: Vec<BTreeSet<&str>> = vec![BTreeSet::new(); files.len()];
	for ty in types {
		if let Some(pos) = files.iter().position(|f| f.defines(ty)) {
			groups[pos].insert(ty);
		}
	}

	files
		.iter()
		.zip(groups)
		.filter(|(_, types)| !types.is_empty())
		.map(|(f, types)| Import {
			file: f.name.clone(),
			types: types.into_iter().map(String::from).collect(),
		})
		.collect()
}
