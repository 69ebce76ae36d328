#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo_small.png")]
#![warn(missing_docs)]

//! # Input forms
//!
//! Every kind can be created from some of these representations:
//!
//! - the wire form, [`RawExtension`], with [`Extension::from_wire`],
//! - a config string such as `critical,cRLSign,keyCertSign`, with [`str::parse`],
//! - a config mapping `{"value": ..., "critical": ...}`, with
//!   [`Extension::from_config`] or [`Extension::from_json`].
//!
//! [`Extension::serialize`] returns a config mapping that is accepted again by
//! [`Extension::from_json`], and [`Extension::as_extension`] returns the wire
//! form.
//!
//! # Operations by kind
//!
//! - List kinds ([`SubjectAlternativeName`], [`IssuerAlternativeName`]) implement
//!   [`OrderedValueOps`] and can be indexed like slices.
//! - Enumerated kinds ([`KeyUsage`], [`ExtendedKeyUsage`], [`TlsFeature`])
//!   implement [`EnumeratedValueOps`].
//! - [`ParsedExtension`] dispatches over every supported kind and keeps
//!   anything else as an [`UnrecognizedExtension`].

#[cfg(doctest)]
pub struct ReadmeDoctests;

pub mod codec;
pub mod config;
pub mod errors;
pub mod general_name;
pub mod kind;
pub mod oid;

mod extension;
mod known_values;
mod list;
mod parsed;
mod unrecognized;

pub use const_oid::ObjectIdentifier;
pub use der;
pub use x509_cert;

/// X.509 extension in its wire form: OID, criticality and DER-encoded value.
pub use x509_cert::ext::Extension as RawExtension;

pub use crate::{
    errors::{Error, Result},
    extension::{Extension, ForBuilder, Kind},
    general_name::{GeneralName, IntoItem},
    known_values::{EnumeratedValueOps, KnownValues, TokenSet},
    list::{ListKind, OrderedValueOps},
    parsed::ParsedExtension,
    unrecognized::UnrecognizedExtension,
};

/// Extension with an opaque string value and no OID.
pub type BaseExtension = Extension<kind::Base>;
/// Extension with a list of opaque strings and no OID.
pub type ListExtension = Extension<kind::List>;

/// Authority information access extension.
pub type AuthorityInformationAccess = Extension<kind::AuthorityInformationAccess>;
/// Authority key identifier extension.
pub type AuthorityKeyIdentifier = Extension<kind::AuthorityKeyIdentifier>;
/// Basic constraints extension.
pub type BasicConstraints = Extension<kind::BasicConstraints>;
/// Extended key usage extension.
pub type ExtendedKeyUsage = Extension<kind::ExtendedKeyUsage>;
/// Issuer alternative name extension.
pub type IssuerAlternativeName = Extension<kind::IssuerAlternativeName>;
/// Key usage extension.
pub type KeyUsage = Extension<kind::KeyUsage>;
/// Name constraints extension.
pub type NameConstraints = Extension<kind::NameConstraints>;
/// OCSP no-check extension.
pub type OcspNoCheck = Extension<kind::OcspNoCheck>;
/// Precertificate poison extension.
pub type PrecertPoison = Extension<kind::PrecertPoison>;
/// Subject alternative name extension.
pub type SubjectAlternativeName = Extension<kind::SubjectAlternativeName>;
/// Subject key identifier extension.
pub type SubjectKeyIdentifier = Extension<kind::SubjectKeyIdentifier>;
/// TLS feature extension.
pub type TlsFeature = Extension<kind::TlsFeature>;
