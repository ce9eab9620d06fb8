use std::error::Error as StdError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenError {
	EmptyName {
		service: String,
	},
	/// A method name containing a `0x00` or `0xFF` byte.
	InvalidName {
		service: String,
		method: String,
	},
	DuplicateMethod {
		service: String,
		method: String,
	},
	/// The name cannot be turned into a rust identifier.
	InvalidIdent(String),
	/// The payload type is not a rust type path.
	InvalidType(String),
	UnknownFile(String),
	/// The emitted tokens did not form a file.
	Syntax(String),
}

impl fmt::Display for GenError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::EmptyName { service } => {
				write!(f, "service {service:?} has a method without a name")
			}
			Self::InvalidName { service, method } => write!(
				f,
				"method {method:?} of {service:?} contains a reserved byte"
			),
			Self::DuplicateMethod { service, method } => {
				write!(f, "method {method:?} of {service:?} is declared twice")
			}
			Self::InvalidIdent(name) => {
				write!(f, "{name:?} is not a valid identifier")
			}
			Self::InvalidType(ty) => write!(f, "{ty:?} is not a valid type"),
			Self::UnknownFile(name) => write!(f, "unknown schema file {name:?}"),
			Self::Syntax(e) => write!(f, "generated invalid code: {e}"),
		}
	}
}

impl StdError for GenError {}
