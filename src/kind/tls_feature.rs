//! TLS feature ([RFC 7633]).
//!
//! [RFC 7633]: https://datatracker.ietf.org/doc/html/rfc7633

use core::fmt;
use core::hash::{Hash, Hasher};

use const_oid::{AssociatedOid, ObjectIdentifier};
use der::{DecodeValue, EncodeValue, FixedTag, Header, Length, Reader, Tag, Writer};
use serde_json::Value as JsonValue;

use crate::errors::{Error, Result};
use crate::extension::Kind;
use crate::known_values::{self, KnownValues, TokenSet};
use crate::oid;

/// TLS feature extension, e.g. `OCSPMustStaple`.
#[derive(Clone, Copy, Debug)]
pub struct TlsFeature;

/// TLS extension type numbers carried on the wire.
///
/// ```text
/// Features ::= SEQUENCE OF INTEGER
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TlsFeatures(pub Vec<u16>);

impl AssociatedOid for TlsFeatures {
    const OID: ObjectIdentifier = oid::ID_PE_TLS_FEATURE;
}

impl FixedTag for TlsFeatures {
    const TAG: Tag = Tag::Sequence;
}

impl<'a> DecodeValue<'a> for TlsFeatures {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        Vec::<u16>::decode_value(reader, header).map(Self)
    }
}

impl EncodeValue for TlsFeatures {
    fn value_len(&self) -> der::Result<Length> {
        self.0.value_len()
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.0.encode_value(writer)
    }
}

/// `status_request` ([RFC 6066 § 8])
///
/// [RFC 6066 § 8]: https://datatracker.ietf.org/doc/html/rfc6066#section-8
pub const STATUS_REQUEST: u16 = 5;

/// `status_request_v2` ([RFC 6961])
///
/// [RFC 6961]: https://datatracker.ietf.org/doc/html/rfc6961
pub const STATUS_REQUEST_V2: u16 = 17;

/// Token to TLS extension type.
pub const TLS_FEATURE_TYPES: &[(&str, u16)] = &[
    ("OCSPMustStaple", STATUS_REQUEST),
    ("MultipleCertStatusRequest", STATUS_REQUEST_V2),
];

impl Kind for TlsFeature {
    type Value = TokenSet;
    type ExtensionType = TlsFeatures;

    const NAME: &'static str = "TLSFeature";
    const OID: Option<ObjectIdentifier> = Some(oid::ID_PE_TLS_FEATURE);

    fn default_value() -> TokenSet {
        TokenSet::new()
    }

    fn parse_str(value: &str) -> Result<TokenSet> {
        known_values::parse_str::<Self>(value)
    }

    fn parse_value(value: &JsonValue) -> Result<TokenSet> {
        known_values::parse_value::<Self>(value)
    }

    fn serialize_value(value: &TokenSet) -> Result<JsonValue> {
        Ok(known_values::serialize_value(value))
    }

    fn extension_type(value: &TokenSet) -> Result<TlsFeatures> {
        let features = value
            .iter()
            .filter_map(|token| {
                TLS_FEATURE_TYPES
                    .iter()
                    .find(|(known, _)| *known == token)
                    .map(|(_, feature)| *feature)
            })
            .collect();
        Ok(TlsFeatures(features))
    }

    fn from_extension_type(ext: TlsFeatures) -> Result<TokenSet> {
        let mut tokens = TokenSet::new();
        for feature in ext.0 {
            let (token, _) = TLS_FEATURE_TYPES
                .iter()
                .find(|(_, known)| *known == feature)
                .ok_or_else(|| Error::unknown_values([feature.to_string()]))?;
            tokens.insert(*token);
        }
        Ok(tokens)
    }

    fn hash_value<H: Hasher>(value: &TokenSet, state: &mut H) {
        value.hash(state);
    }

    fn fmt_value(value: &TokenSet, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        known_values::fmt_value(value, f)
    }

    fn fmt_repr(value: &TokenSet, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        known_values::fmt_repr(value, f)
    }

    fn as_text(value: &TokenSet) -> String {
        known_values::as_text(value)
    }

    fn is_empty(value: &TokenSet) -> bool {
        value.is_empty()
    }
}

impl KnownValues for TlsFeature {
    const KNOWN_VALUES: &'static [&'static str] = &["MultipleCertStatusRequest", "OCSPMustStaple"];
}
