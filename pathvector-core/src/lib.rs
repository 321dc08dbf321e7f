//! Pathvector core library — protocol records, derived-field inference and
//! the hot-swappable lookup registry.
//!
//! - [`types`] — [`Protocol`] records and the [`ProtocolMap`] they live in
//! - [`inference`] — IP-version and ASN tagging derived from identifiers
//! - [`registry`] — [`Registry`]: load / swap / get
//! - [`error`] — [`RegistryError`]

pub mod error;
pub mod inference;
pub mod registry;
pub mod types;

pub use error::RegistryError;
pub use inference::{infer_asn, IpVersion};
pub use registry::Registry;
pub use types::{Protocol, ProtocolMap};
