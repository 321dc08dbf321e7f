//! Fields derived from the shape of a protocol identifier.
//!
//! Identifiers follow an `_`-separated naming convention, e.g.
//! `eu_AS1234_v4`: an `ASnnnn` part carries the peer's AS number and a
//! trailing (or embedded) `v4`/`v6` part the address family.

use std::fmt;

use crate::types::Protocol;

/// Address family inferred from an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// `_v4` wins over `_v6` when an identifier carries both.
    pub fn infer(identifier: &str) -> Option<Self> {
        if identifier.ends_with("_v4") || identifier.contains("_v4_") {
            Some(Self::V4)
        } else if identifier.ends_with("_v6") || identifier.contains("_v6_") {
            Some(Self::V6)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::V4 => "IPv4",
            Self::V6 => "IPv6",
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// AS number embedded in an identifier, if any.
///
/// Only the first `_`-separated part starting with `AS` is considered; when
/// its remainder is empty or not a base-10 integer the result is `None`
/// and later parts are not tried.
pub fn infer_asn(identifier: &str) -> Option<i64> {
    let digits = identifier
        .split('_')
        .find_map(|part| part.strip_prefix("AS"))?;
    digits.parse().ok()
}

/// Apply every derived field to `protocol`, the working copy served for
/// `identifier`.
///
/// A parsed AS number replaces whatever the record carried; an unparsable
/// one leaves it alone.
pub fn apply(identifier: &str, mut protocol: Protocol) -> Protocol {
    if let Some(version) = IpVersion::infer(identifier) {
        protocol.name.push(' ');
        protocol.name.push_str(version.label());
    }
    if let Some(asn) = infer_asn(identifier) {
        protocol.asn = asn;
    }
    protocol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v4_takes_priority_over_v6() {
        assert_eq!(IpVersion::infer("x_v4_v6"), Some(IpVersion::V4));
        assert_eq!(IpVersion::infer("x_v6_y_v4"), Some(IpVersion::V4));
    }

    #[test]
    fn version_markers_must_be_delimited() {
        assert_eq!(IpVersion::infer("v4"), None);
        assert_eq!(IpVersion::infer("foo_v4x"), None);
        assert_eq!(IpVersion::infer("foov4"), None);
        assert_eq!(IpVersion::infer("_v6"), Some(IpVersion::V6));
    }

    #[test]
    fn first_as_part_wins_even_when_unparsable() {
        assert_eq!(infer_asn("ASxyz_AS65000"), None);
        assert_eq!(infer_asn("a_AS1_AS2"), Some(1));
        assert_eq!(infer_asn("link_AS"), None);
    }

    #[test]
    fn apply_appends_single_suffix() {
        let p = apply("foo_v4_v6", Protocol::unknown("foo_v4_v6"));
        assert_eq!(p.name, "foo_v4_v6 IPv4");
    }

    #[test]
    fn apply_keeps_stored_asn_on_parse_failure() {
        let stored = Protocol {
            name: "Link".into(),
            tags: vec!["core".into()],
            asn: 77,
        };
        assert_eq!(apply("link_ASxyz", stored.clone()), stored);
    }
}
