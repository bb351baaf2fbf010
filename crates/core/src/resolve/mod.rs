//! From a symbol table to ordered, qualified method specs

pub mod interface;
pub mod names;
pub mod package_names;
pub mod signature;
pub mod type_string;

pub use interface::{InterfaceDecl, find_interface};
pub use names::{name_signature, name_tuple, synthesize_name};
pub use package_names::{PackageNames, guess_package_name};
pub use signature::SignatureResolver;
pub use type_string::{RawVar, TypeContext, TypeRenderer, signature_string};
