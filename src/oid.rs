//! Object identifiers for the supported extension kinds.
//!
//! Most of these live in [`const_oid::db::rfc5280`]; the ones RFC 5280 does
//! not define are declared here.

use const_oid::ObjectIdentifier;

pub use const_oid::db::rfc5280::{
    ID_CE_AUTHORITY_KEY_IDENTIFIER, ID_CE_BASIC_CONSTRAINTS, ID_CE_EXT_KEY_USAGE,
    ID_CE_ISSUER_ALT_NAME, ID_CE_KEY_USAGE, ID_CE_NAME_CONSTRAINTS, ID_CE_SUBJECT_ALT_NAME,
    ID_CE_SUBJECT_KEY_IDENTIFIER, ID_PE_AUTHORITY_INFO_ACCESS,
};

/// Access method for CA issuer certificates.
pub const ID_AD_CA_ISSUERS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.48.2");

/// Access method for OCSP responders.
pub const ID_AD_OCSP: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.48.1");

/// TLS Feature extension ([RFC 7633]).
///
/// [RFC 7633]: https://datatracker.ietf.org/doc/html/rfc7633
pub const ID_PE_TLS_FEATURE: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.1.24");

/// OCSP No Check extension ([RFC 6960 § 4.2.2.2.1]).
///
/// [RFC 6960 § 4.2.2.2.1]: https://datatracker.ietf.org/doc/html/rfc6960#section-4.2.2.2.1
pub const ID_PKIX_OCSP_NOCHECK: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.48.1.5");

/// Certificate Transparency precertificate poison ([RFC 6962 § 3.1]).
///
/// [RFC 6962 § 3.1]: https://datatracker.ietf.org/doc/html/rfc6962#section-3.1
pub const CT_PRECERT_POISON: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.11129.2.4.3");

/// Extended key usages.
pub mod eku {
    use const_oid::ObjectIdentifier;

    pub use const_oid::db::rfc5280::ANY_EXTENDED_KEY_USAGE;

    /// TLS WWW server authentication.
    pub const ID_KP_SERVER_AUTH: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.1");

    /// TLS WWW client authentication.
    pub const ID_KP_CLIENT_AUTH: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.2");

    /// Signing of downloadable executable code.
    pub const ID_KP_CODE_SIGNING: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.3");

    /// Email protection.
    pub const ID_KP_EMAIL_PROTECTION: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.4");

    /// IPSec end system (RFC 2459, obsoleted but still issued).
    pub const ID_KP_IPSEC_END_SYSTEM: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.5");

    /// IPSec tunnel.
    pub const ID_KP_IPSEC_TUNNEL: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.6");

    /// IPSec user.
    pub const ID_KP_IPSEC_USER: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.7");

    /// Binding the hash of an object to a time.
    pub const ID_KP_TIME_STAMPING: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.8");

    /// Signing OCSP responses.
    pub const ID_KP_OCSP_SIGNING: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.9");

    /// Microsoft smartcard logon.
    pub const MS_SMARTCARD_LOGON: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.311.20.2.2");

    /// Kerberos KDC ([RFC 4556]).
    ///
    /// [RFC 4556]: https://datatracker.ietf.org/doc/html/rfc4556
    pub const ID_PKINIT_KPKDC: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.2.3.5");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_strings() {
        assert_eq!(ID_PE_TLS_FEATURE.to_string(), "1.3.6.1.5.5.7.1.24");
        assert_eq!(ID_PKIX_OCSP_NOCHECK.to_string(), "1.3.6.1.5.5.7.48.1.5");
        assert_eq!(CT_PRECERT_POISON.to_string(), "1.3.6.1.4.1.11129.2.4.3");
        assert_eq!(ID_CE_KEY_USAGE.to_string(), "2.5.29.15");
    }
}
