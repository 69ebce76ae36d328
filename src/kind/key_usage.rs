//! Key usage and extended key usage.

use core::fmt;
use core::hash::{Hash, Hasher};

use const_oid::ObjectIdentifier;
use der::flagset::FlagSet;
use log::debug;
use serde_json::Value as JsonValue;
use x509_cert::ext::pkix::{self, KeyUsages};

use crate::errors::{Error, Result};
use crate::extension::Kind;
use crate::known_values::{self, KnownValues, TokenSet};
use crate::oid::{self, eku};

/// Key usage ([RFC 5280 § 4.2.1.3]), e.g. `critical,cRLSign,keyCertSign`.
///
/// `encipherOnly` and `decipherOnly` imply `keyAgreement`, which is added
/// automatically.
///
/// [RFC 5280 § 4.2.1.3]: https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.3
#[derive(Clone, Copy, Debug)]
pub struct KeyUsage;

/// Token to wire flag, in bit order.
pub const KEY_USAGE_FLAGS: &[(&str, KeyUsages)] = &[
    ("digitalSignature", KeyUsages::DigitalSignature),
    ("nonRepudiation", KeyUsages::NonRepudiation),
    ("keyEncipherment", KeyUsages::KeyEncipherment),
    ("dataEncipherment", KeyUsages::DataEncipherment),
    ("keyAgreement", KeyUsages::KeyAgreement),
    ("keyCertSign", KeyUsages::KeyCertSign),
    ("cRLSign", KeyUsages::CRLSign),
    ("encipherOnly", KeyUsages::EncipherOnly),
    ("decipherOnly", KeyUsages::DecipherOnly),
];

const KEY_AGREEMENT: &str = "keyAgreement";

impl Kind for KeyUsage {
    type Value = TokenSet;
    type ExtensionType = pkix::KeyUsage;

    const NAME: &'static str = "KeyUsage";
    const OID: Option<ObjectIdentifier> = Some(oid::ID_CE_KEY_USAGE);
    // RFC 5280 § 4.2.1.3: CAs SHOULD mark this extension critical.
    const DEFAULT_CRITICAL: bool = true;

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

    fn extension_type(value: &TokenSet) -> Result<pkix::KeyUsage> {
        let mut flags = FlagSet::<KeyUsages>::default();
        for (token, flag) in KEY_USAGE_FLAGS {
            if value.contains(token) {
                flags |= *flag;
            }
        }
        Ok(pkix::KeyUsage(flags))
    }

    fn from_extension_type(ext: pkix::KeyUsage) -> Result<TokenSet> {
        Ok(KEY_USAGE_FLAGS
            .iter()
            .filter(|(_, flag)| ext.0.contains(*flag))
            .map(|(token, _)| *token)
            .collect())
    }

    fn normalize(value: &mut TokenSet) {
        for implying in ["decipherOnly", "encipherOnly"] {
            if value.contains(implying) && value.insert(KEY_AGREEMENT) {
                debug!("{implying} implies {KEY_AGREEMENT}, adding it");
            }
        }
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

impl KnownValues for KeyUsage {
    const KNOWN_VALUES: &'static [&'static str] = &[
        "cRLSign",
        "dataEncipherment",
        "decipherOnly",
        "digitalSignature",
        "encipherOnly",
        "keyAgreement",
        "keyCertSign",
        "keyEncipherment",
        "nonRepudiation",
    ];
}

/// Extended key usage ([RFC 5280 § 4.2.1.12]), e.g. `serverAuth,clientAuth`.
///
/// [RFC 5280 § 4.2.1.12]: https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.12
#[derive(Clone, Copy, Debug)]
pub struct ExtendedKeyUsage;

/// Token to key purpose OID.
pub const EXTENDED_KEY_USAGE_OIDS: &[(&str, ObjectIdentifier)] = &[
    ("serverAuth", eku::ID_KP_SERVER_AUTH),
    ("clientAuth", eku::ID_KP_CLIENT_AUTH),
    ("codeSigning", eku::ID_KP_CODE_SIGNING),
    ("emailProtection", eku::ID_KP_EMAIL_PROTECTION),
    ("timeStamping", eku::ID_KP_TIME_STAMPING),
    ("OCSPSigning", eku::ID_KP_OCSP_SIGNING),
    ("smartcardLogon", eku::MS_SMARTCARD_LOGON),
    ("msKDC", eku::ID_PKINIT_KPKDC),
    ("ipsecEndSystem", eku::ID_KP_IPSEC_END_SYSTEM),
    ("ipsecTunnel", eku::ID_KP_IPSEC_TUNNEL),
    ("ipsecUser", eku::ID_KP_IPSEC_USER),
    ("anyExtendedKeyUsage", eku::ANY_EXTENDED_KEY_USAGE),
];

impl Kind for ExtendedKeyUsage {
    type Value = TokenSet;
    type ExtensionType = pkix::ExtendedKeyUsage;

    const NAME: &'static str = "ExtendedKeyUsage";
    const OID: Option<ObjectIdentifier> = Some(oid::ID_CE_EXT_KEY_USAGE);

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

    fn extension_type(value: &TokenSet) -> Result<pkix::ExtendedKeyUsage> {
        let oids = value
            .iter()
            .filter_map(|token| {
                EXTENDED_KEY_USAGE_OIDS
                    .iter()
                    .find(|(known, _)| *known == token)
                    .map(|(_, oid)| *oid)
            })
            .collect();
        Ok(pkix::ExtendedKeyUsage(oids))
    }

    fn from_extension_type(ext: pkix::ExtendedKeyUsage) -> Result<TokenSet> {
        let mut tokens = TokenSet::new();
        let mut unknown = Vec::new();

        for purpose in ext.0 {
            match EXTENDED_KEY_USAGE_OIDS.iter().find(|(_, oid)| *oid == purpose) {
                Some((token, _)) => {
                    tokens.insert(*token);
                }
                None => unknown.push(purpose.to_string()),
            }
        }

        if unknown.is_empty() {
            Ok(tokens)
        } else {
            Err(Error::unknown_values(unknown))
        }
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

impl KnownValues for ExtendedKeyUsage {
    const KNOWN_VALUES: &'static [&'static str] = &[
        "OCSPSigning",
        "anyExtendedKeyUsage",
        "clientAuth",
        "codeSigning",
        "emailProtection",
        "ipsecEndSystem",
        "ipsecTunnel",
        "ipsecUser",
        "msKDC",
        "serverAuth",
        "smartcardLogon",
        "timeStamping",
    ];
}
