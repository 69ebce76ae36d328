//! Extension kinds.
//!
//! Each kind is a zero-sized marker implementing [`Kind`](crate::Kind); an
//! [`Extension`](crate::Extension) is parametrized by one of them. The crate
//! root has a type alias for every concrete kind, e.g.
//! [`crate::BasicConstraints`] for `Extension<kind::BasicConstraints>`.

mod access;
mod alt_name;
mod constraints;
mod flag;
mod generic;
mod key_id;
mod key_usage;
mod tls_feature;

pub use self::{
    access::{AccessLocations, AuthorityInformationAccess},
    alt_name::{IssuerAlternativeName, SubjectAlternativeName},
    constraints::{BasicConstraints, CaConstraint, NameConstraints, Subtrees},
    flag::{OcspNoCheck, OcspNoCheckSyntax, PrecertPoison, PrecertPoisonSyntax},
    generic::{Base, List},
    key_id::{AuthorityKeyId, AuthorityKeyIdentifier, SubjectKeyIdentifier},
    key_usage::{ExtendedKeyUsage, KeyUsage, EXTENDED_KEY_USAGE_OIDS, KEY_USAGE_FLAGS},
    tls_feature::{TlsFeature, TlsFeatures, STATUS_REQUEST, STATUS_REQUEST_V2, TLS_FEATURE_TYPES},
};
