//! Reads a service from a rust trait.

use crate::schema::{Method, PayloadType, Role, Service};

use syn::{
	Attribute, Error, Expr, ExprLit, FnArg, ItemTrait, Lit, Meta, Result,
	ReturnType, TraitItem, Type,
};

/// Builds a service from a trait like
///
/// ```ignore
/// trait Echo {
/// 	/// Returns the message.
/// 	fn say(&mut self, msg: Msg) -> Msg;
/// 	fn ping(&mut self);
/// }
/// ```
///
/// Each method takes at most one payload, a missing payload or return type
/// and `()` are `Void`. The receiver is ignored, emitted code chooses its
/// own.
pub fn service_from_trait(role: Role, item: &ItemTrait) -> Result<Service> {
	if !item.generics.params.is_empty() {
		return Err(Error::new_spanned(
			&item.generics,
			"a service cannot be generic",
		));
	}

	let mut service = Service::new(item.ident.to_string()).tag(role.tag());
	service.docs = doc_lines(&item.attrs);

	for trait_item in &item.items {
		let TraitItem::Fn(f) = trait_item else {
			return Err(Error::new_spanned(
				trait_item,
				"a service can only contain methods",
			));
		};

		let sig = &f.sig;
		if let Some(default) = &f.default {
			return Err(Error::new_spanned(
				default,
				"service methods cannot have a body",
			));
		}

		if let Some(asyncness) = &sig.asyncness {
			return Err(Error::new_spanned(
				asyncness,
				"service methods are declared without async",
			));
		}

		if !sig.generics.params.is_empty() {
			return Err(Error::new_spanned(
				&sig.generics,
				"service methods cannot be generic",
			));
		}

		let mut inputs = sig.inputs.iter();
		match inputs.next() {
			Some(FnArg::Receiver(_)) => {}
			_ => {
				return Err(Error::new_spanned(
					sig,
					"service methods need a self receiver",
				));
			}
		}

		let request = match inputs.next() {
			None => PayloadType::Void,
			Some(FnArg::Typed(pat)) => payload_type(&pat.ty)?,
			Some(arg) => {
				return Err(Error::new_spanned(arg, "unexpected argument"));
			}
		};

		if let Some(arg) = inputs.next() {
			return Err(Error::new_spanned(
				arg,
				"service methods take at most one payload",
			));
		}

		let response = match &sig.output {
			ReturnType::Default => PayloadType::Void,
			ReturnType::Type(_, ty) => payload_type(ty)?,
		};

		if role == Role::Push && !response.is_void() {
			return Err(Error::new_spanned(
				&sig.output,
				"push events do not return anything",
			));
		}

		service.methods.push(Method {
			name: sig.ident.to_string(),
			request,
			response,
			docs: doc_lines(&f.attrs),
		});
	}

	Ok(service)
}

fn payload_type(ty: &Type) -> Result<PayloadType> {
	match ty {
		Type::Tuple(t) if t.elems.is_empty() => Ok(PayloadType::Void),
		Type::Paren(p) => payload_type(&p.elem),
		Type::Path(p) if p.qself.is_none() => {
			let name = p
				.path
				.segments
				.iter()
				.map(|s| s.ident.to_string())
				.collect::<Vec<_>>()
				.join("::");

			if p.path.segments.iter().any(|s| !s.arguments.is_none()) {
				return Err(Error::new_spanned(
					ty,
					"payload types cannot have generics",
				));
			}

			Ok(match p.path.leading_colon {
				Some(_) => PayloadType::Named(format!("::{name}")),
				None => PayloadType::named(name),
			})
		}
		_ => Err(Error::new_spanned(ty, "expected a payload type path")),
	}
}

/// The values of every `#[doc = "..."]` attribute.
pub fn doc_lines(attrs: &[Attribute]) -> Vec<String> {
	attrs
		.iter()
		.filter(|a| a.path().is_ident("doc"))
		.filter_map(|a| match &a.meta {
			Meta::NameValue(nv) => match &nv.value {
				Expr::Lit(ExprLit {
					lit: Lit::Str(s), ..
				}) => Some(s.value()),
				_ => None,
			},
			_ => None,
		})
		.collect()
}
