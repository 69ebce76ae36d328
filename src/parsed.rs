//! Closed dispatch over every supported extension kind.

use core::fmt;

use const_oid::ObjectIdentifier;
use serde_json::Value as JsonValue;
use x509_cert::Certificate;

use crate::errors::{Error, Result};
use crate::extension::{Extension, Kind};
use crate::unrecognized::UnrecognizedExtension;
use crate::{kind, oid, RawExtension};

/// Decode a wire extension as kind `K`, keeping it as unrecognized on failure.
fn parse_as<K: Kind>(raw: &RawExtension, wrap: fn(Extension<K>) -> ParsedExtension) -> ParsedExtension {
    match Extension::<K>::from_wire(raw) {
        Ok(ext) => wrap(ext),
        Err(err) => {
            log::warn!("could not parse {} extension: {err}", K::NAME);
            let unrecognized = UnrecognizedExtension::new(raw.clone())
                .with_name(K::NAME)
                .with_error(err.to_string());
            ParsedExtension::Unrecognized(unrecognized)
        }
    }
}

macro_rules! parsed_extension {
    ($($variant:ident: $key:literal => $oid:path),+ $(,)?) => {
        /// An extension of any supported kind, or an unrecognized one.
        #[derive(Clone, Debug, Eq, Hash, PartialEq)]
        pub enum ParsedExtension {
            $(
                #[allow(missing_docs)]
                $variant(crate::$variant),
            )+
            /// Unsupported OID, or a value that failed to decode.
            Unrecognized(UnrecognizedExtension),
        }

        impl ParsedExtension {
            /// Parse a wire extension, dispatching on its OID.
            ///
            /// Never fails: unsupported OIDs and undecodable values become
            /// [`ParsedExtension::Unrecognized`].
            pub fn from_raw(raw: &RawExtension) -> Self {
                log::trace!("parsing extension {}", raw.extn_id);
                match raw.extn_id {
                    $( $oid => parse_as::<kind::$variant>(raw, Self::$variant), )+
                    _ => Self::Unrecognized(UnrecognizedExtension::new(raw.clone())),
                }
            }

            /// Build an extension from a profile entry, e.g.
            /// `("basic_constraints", {"value": "CA:TRUE"})`.
            pub fn from_config(key: &str, value: &JsonValue) -> Result<Self> {
                match key {
                    $( $key => Ok(Self::$variant(Extension::from_json(value)?)), )+
                    _ => Err(Error::inconsistent(format!("Unknown extension: {key}"))),
                }
            }

            /// Profile key of the extension kind, `None` if unrecognized.
            pub fn key(&self) -> Option<&'static str> {
                match self {
                    $( Self::$variant(_) => Some($key), )+
                    Self::Unrecognized(_) => None,
                }
            }

            /// OID of the extension.
            pub fn oid(&self) -> ObjectIdentifier {
                match self {
                    $( Self::$variant(_) => $oid, )+
                    Self::Unrecognized(ext) => ext.oid(),
                }
            }

            /// Is the extension marked critical?
            pub fn critical(&self) -> bool {
                match self {
                    $( Self::$variant(ext) => ext.critical(), )+
                    Self::Unrecognized(ext) => ext.critical(),
                }
            }

            /// Human readable name of the extension.
            pub fn name(&self) -> String {
                match self {
                    $( Self::$variant(ext) => ext.name().into(), )+
                    Self::Unrecognized(ext) => ext.name(),
                }
            }

            /// Human readable multi-line rendering.
            pub fn as_text(&self) -> String {
                match self {
                    $( Self::$variant(ext) => ext.as_text(), )+
                    Self::Unrecognized(ext) => ext.as_text(),
                }
            }

            /// Convert back into the wire form.
            pub fn as_extension(&self) -> Result<RawExtension> {
                match self {
                    $( Self::$variant(ext) => ext.as_extension(), )+
                    Self::Unrecognized(ext) => Ok(ext.as_extension()),
                }
            }

            /// Flat config mapping, accepted again by
            /// [`ParsedExtension::from_config`] with the same key.
            pub fn serialize(&self) -> Result<JsonValue> {
                match self {
                    $( Self::$variant(ext) => ext.serialize(), )+
                    Self::Unrecognized(ext) => Ok(ext.serialize()),
                }
            }
        }

        impl fmt::Display for ParsedExtension {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( Self::$variant(ext) => fmt::Display::fmt(ext, f), )+
                    Self::Unrecognized(ext) => fmt::Display::fmt(ext, f),
                }
            }
        }

        $(
            impl From<crate::$variant> for ParsedExtension {
                fn from(ext: crate::$variant) -> Self {
                    Self::$variant(ext)
                }
            }
        )+
    };
}

parsed_extension! {
    AuthorityInformationAccess: "authority_information_access" => oid::ID_PE_AUTHORITY_INFO_ACCESS,
    AuthorityKeyIdentifier: "authority_key_identifier" => oid::ID_CE_AUTHORITY_KEY_IDENTIFIER,
    BasicConstraints: "basic_constraints" => oid::ID_CE_BASIC_CONSTRAINTS,
    ExtendedKeyUsage: "extended_key_usage" => oid::ID_CE_EXT_KEY_USAGE,
    IssuerAlternativeName: "issuer_alternative_name" => oid::ID_CE_ISSUER_ALT_NAME,
    KeyUsage: "key_usage" => oid::ID_CE_KEY_USAGE,
    NameConstraints: "name_constraints" => oid::ID_CE_NAME_CONSTRAINTS,
    OcspNoCheck: "ocsp_no_check" => oid::ID_PKIX_OCSP_NOCHECK,
    PrecertPoison: "precert_poison" => oid::CT_PRECERT_POISON,
    SubjectAlternativeName: "subject_alternative_name" => oid::ID_CE_SUBJECT_ALT_NAME,
    SubjectKeyIdentifier: "subject_key_identifier" => oid::ID_CE_SUBJECT_KEY_IDENTIFIER,
    TlsFeature: "tls_feature" => oid::ID_PE_TLS_FEATURE,
}

impl ParsedExtension {
    /// Parse a list of wire extensions, keeping their order.
    pub fn from_extensions<'a, I>(extensions: I) -> Vec<Self>
    where
        I: IntoIterator<Item = &'a RawExtension>,
    {
        extensions.into_iter().map(Self::from_raw).collect()
    }

    /// Parse every extension of a certificate.
    pub fn from_certificate(certificate: &Certificate) -> Vec<Self> {
        match &certificate.tbs_certificate.extensions {
            Some(extensions) => Self::from_extensions(extensions),
            None => Vec::new(),
        }
    }

    /// Is this an extension without a supported kind?
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use der::asn1::OctetString;
    use hex_literal::hex;
    use serde_json::json;

    fn raw(extn_id: ObjectIdentifier, critical: bool, value: &[u8]) -> RawExtension {
        RawExtension {
            extn_id,
            critical,
            extn_value: OctetString::new(value).unwrap(),
        }
    }

    #[test]
    fn dispatches_on_oid() {
        let ext = ParsedExtension::from_raw(&raw(oid::ID_CE_KEY_USAGE, true, &hex!("03020106")));
        assert!(matches!(ext, ParsedExtension::KeyUsage(_)));
        assert_eq!(ext.key(), Some("key_usage"));
        assert_eq!(ext.oid(), oid::ID_CE_KEY_USAGE);
        assert_eq!(ext.name(), "KeyUsage");
        assert!(ext.critical());
        assert_eq!(ext.as_text(), "* keyCertSign\n* cRLSign");

        let ext = ParsedExtension::from_raw(&raw(oid::ID_CE_BASIC_CONSTRAINTS, true, &hex!("30060101ff020100")));
        assert_eq!(ext.to_string(), "CA:TRUE, pathlen:0/critical");
    }

    #[test]
    fn unknown_oid_is_unrecognized() {
        let input = raw(ObjectIdentifier::new_unwrap("1.2.3.4"), false, &[0x05, 0x00]);
        let ext = ParsedExtension::from_raw(&input);
        assert!(ext.is_unrecognized());
        assert_eq!(ext.key(), None);
        assert_eq!(ext.name(), "Unsupported extension (OID 1.2.3.4)");
        assert_eq!(ext.as_extension().unwrap(), input);
    }

    #[test]
    fn undecodable_value_is_unrecognized() {
        let input = raw(oid::ID_CE_BASIC_CONSTRAINTS, true, &[0x05, 0x00]);
        let ParsedExtension::Unrecognized(ext) = ParsedExtension::from_raw(&input) else {
            panic!("expected an unrecognized extension");
        };
        assert_eq!(ext.name(), "BasicConstraints");
        assert!(ext.error().is_some());
        assert_eq!(ext.as_extension(), input);

        let poison = raw(oid::CT_PRECERT_POISON, false, &[0x05, 0x00]);
        let ParsedExtension::Unrecognized(ext) = ParsedExtension::from_raw(&poison) else {
            panic!("non-critical poison must not parse");
        };
        assert_eq!(ext.error(), Some("PrecertPoison must always be marked as critical"));
    }

    #[test]
    fn undecodable_value_survives_serialization() {
        let input = raw(oid::ID_CE_BASIC_CONSTRAINTS, false, &[0x05, 0x00]);
        let ParsedExtension::Unrecognized(ext) = ParsedExtension::from_raw(&input) else {
            panic!("expected an unrecognized extension");
        };

        let JsonValue::Object(mapping) = ext.serialize() else {
            panic!("not a mapping");
        };
        let restored = UnrecognizedExtension::from_config(&mapping).unwrap();
        assert_eq!(restored, ext);
        assert_eq!(restored.name(), "BasicConstraints");
        assert_eq!(restored.error(), ext.error());
        assert_eq!(restored.as_extension(), input);
    }

    #[test]
    fn from_config_keys() {
        let ext = ParsedExtension::from_config("basic_constraints", &json!({"ca": true})).unwrap();
        assert_eq!(ext.oid(), oid::ID_CE_BASIC_CONSTRAINTS);
        assert!(ext.critical());

        let ext = ParsedExtension::from_config("key_usage", &json!("critical,keyCertSign")).unwrap();
        let again = ParsedExtension::from_config("key_usage", &ext.serialize().unwrap()).unwrap();
        assert_eq!(again, ext);

        let err = ParsedExtension::from_config("foo", &json!({})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown extension: foo");
    }

    #[test]
    fn wire_round_trip_for_every_key() {
        let inputs = [
            ("authority_information_access", json!([["https://example.com/ca.der"], ["http://ocsp.example.com"]])),
            ("authority_key_identifier", json!("33:33:33")),
            ("basic_constraints", json!("critical,CA:TRUE,pathlen=1")),
            ("extended_key_usage", json!("serverAuth,clientAuth")),
            ("issuer_alternative_name", json!("https://example.com")),
            ("key_usage", json!("critical,digitalSignature,keyAgreement")),
            ("name_constraints", json!([["example.com"], ["example.net"]])),
            ("ocsp_no_check", json!({})),
            ("precert_poison", json!({})),
            ("subject_alternative_name", json!("example.com,IP:127.0.0.1")),
            ("subject_key_identifier", json!("AB:CD")),
            ("tls_feature", json!("OCSPMustStaple")),
        ];

        for (key, value) in inputs {
            let ext = ParsedExtension::from_config(key, &value).unwrap();
            assert_eq!(ext.key(), Some(key));

            let raw = ext.as_extension().unwrap();
            assert_eq!(raw.extn_id, ext.oid());
            assert_eq!(ParsedExtension::from_raw(&raw), ext, "{key}");
        }
    }
}
