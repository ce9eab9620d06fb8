use crate::schema::{Role, Service};

/// Services split by role, each list in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified<'a> {
	pub call: Vec<&'a Service>,
	pub push: Vec<&'a Service>,
}

/// Splits services into call and push services.
///
/// A service without a role tag is left out, one tagged with both roles is
/// part of both lists.
pub fn classify(services: &[Service]) -> Classified<'_> {
	let mut classified = Classified::default();

	for service in services {
		if service.has_role(Role::Call) {
			classified.call.push(service);
		}

		if service.has_role(Role::Push) {
			classified.push.push(service);
		}
	}

	classified
}

#[cfg(test)]
mod tests {
	use super::*;

	fn names<'a>(services: &[&'a Service]) -> Vec<&'a str> {
		services.iter().map(|s| s.name.as_str()).collect()
	}

	#[test]
	fn keeps_order() {
		let services = [
			Service::new("A").tag("is_call"),
			Service::new("B").tag("is_push"),
			Service::new("C"),
			Service::new("D").tag("(is_rpc)"),
			Service::new("E").tag("is_call").tag("is_push"),
		];

		let classified = classify(&services);
		assert_eq!(names(&classified.call), ["A", "D", "E"]);
		assert_eq!(names(&classified.push), ["B", "E"]);
	}
}
