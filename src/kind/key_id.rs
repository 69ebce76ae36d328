//! Key identifiers ([RFC 5280 § 4.2.1.1], [RFC 5280 § 4.2.1.2]).
//!
//! [RFC 5280 § 4.2.1.1]: https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.1
//! [RFC 5280 § 4.2.1.2]: https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.2

use core::fmt;
use core::hash::{Hash, Hasher};

use const_oid::ObjectIdentifier;
use der::asn1::OctetString;
use serde_json::{Map, Value as JsonValue};
use x509_cert::ext::pkix;
use x509_cert::serial_number::SerialNumber;

use crate::codec::{bytes_to_hex, hex_to_bytes};
use crate::config;
use crate::errors::{Error, Result};
use crate::extension::{Extension, Kind};
use crate::general_name::{self, format_general_name, GeneralName};
use crate::oid;

const KEY_IDENTIFIER_KEY: &str = "key_identifier";
const ISSUER_KEY: &str = "authority_cert_issuer";
const SERIAL_KEY: &str = "authority_cert_serial_number";

/// Subject key identifier, e.g. `33:33:33:33:33:33`.
#[derive(Clone, Copy, Debug)]
pub struct SubjectKeyIdentifier;

impl Kind for SubjectKeyIdentifier {
    type Value = Vec<u8>;
    type ExtensionType = pkix::SubjectKeyIdentifier;

    const NAME: &'static str = "SubjectKeyIdentifier";
    const OID: Option<ObjectIdentifier> = Some(oid::ID_CE_SUBJECT_KEY_IDENTIFIER);

    fn default_value() -> Vec<u8> {
        Vec::new()
    }

    fn parse_str(value: &str) -> Result<Vec<u8>> {
        hex_to_bytes(value)
    }

    fn serialize_value(value: &Vec<u8>) -> Result<JsonValue> {
        Ok(JsonValue::String(bytes_to_hex(value)))
    }

    fn extension_type(value: &Vec<u8>) -> Result<pkix::SubjectKeyIdentifier> {
        Ok(pkix::SubjectKeyIdentifier(OctetString::new(value.as_slice())?))
    }

    fn from_extension_type(ext: pkix::SubjectKeyIdentifier) -> Result<Vec<u8>> {
        Ok(ext.0.into_bytes())
    }

    fn hash_value<H: Hasher>(value: &Vec<u8>, state: &mut H) {
        value.hash(state);
    }

    fn fmt_value(value: &Vec<u8>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bytes_to_hex(value))
    }

    fn is_empty(value: &Vec<u8>) -> bool {
        value.is_empty()
    }
}

impl Extension<SubjectKeyIdentifier> {
    /// Create a non-critical extension from raw key identifier bytes.
    pub fn from_key_id(key_id: impl Into<Vec<u8>>) -> Result<Self> {
        Self::from_value(key_id.into())
    }

    /// The key identifier.
    pub fn key_id(&self) -> &[u8] {
        self.value()
    }
}

/// Authority key identifier.
///
/// Usually only carries the key identifier of the issuer, which is also what
/// the string form (`33:33:33`) sets. The config mapping value may
/// additionally carry `authority_cert_issuer` and
/// `authority_cert_serial_number`.
#[derive(Clone, Copy, Debug)]
pub struct AuthorityKeyIdentifier;

/// Value of an [`AuthorityKeyIdentifier`] extension.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AuthorityKeyId {
    /// Key identifier of the issuer's public key.
    pub key_identifier: Option<Vec<u8>>,
    /// Names of the issuer's issuer. Empty when absent.
    pub authority_cert_issuer: Vec<GeneralName>,
    /// Serial number of the issuer's certificate, big-endian without leading zeros.
    pub authority_cert_serial_number: Option<Vec<u8>>,
}

/// Strip leading zero bytes, keeping at least one byte.
fn trim_serial(bytes: &[u8]) -> Vec<u8> {
    let start = bytes
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(bytes.len().saturating_sub(1));
    bytes[start..].to_vec()
}

fn serial_from_json(value: &JsonValue) -> Result<Option<Vec<u8>>> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => Ok(Some(trim_serial(&hex_to_bytes(s)?))),
        JsonValue::Number(n) => n
            .as_u64()
            .map(|n| Some(trim_serial(&n.to_be_bytes())))
            .ok_or_else(|| Error::inconsistent(format!("Invalid serial number: {n}"))),
        other => Err(config::unsupported(other)),
    }
}

fn key_id_from_json(value: &JsonValue) -> Result<Option<Vec<u8>>> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => hex_to_bytes(s).map(Some),
        other => Err(config::unsupported(other)),
    }
}

fn key_id_from_mapping(mapping: &Map<String, JsonValue>) -> Result<AuthorityKeyId> {
    Ok(AuthorityKeyId {
        key_identifier: mapping.get(KEY_IDENTIFIER_KEY).map_or(Ok(None), key_id_from_json)?,
        authority_cert_issuer: mapping
            .get(ISSUER_KEY)
            .map_or(Ok(Vec::new()), general_name::parse_names)?,
        authority_cert_serial_number: mapping.get(SERIAL_KEY).map_or(Ok(None), serial_from_json)?,
    })
}

impl AuthorityKeyId {
    fn lines(&self, separator: &str) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(key_id) = &self.key_identifier {
            lines.push(format!("keyid:{}", bytes_to_hex(key_id)));
        }
        if !self.authority_cert_issuer.is_empty() {
            let names: Vec<_> = self.authority_cert_issuer.iter().map(format_general_name).collect();
            lines.push(format!("issuer:{}", names.join(separator)));
        }
        if let Some(serial) = &self.authority_cert_serial_number {
            lines.push(format!("serial:{}", bytes_to_hex(serial)));
        }
        lines
    }
}

impl Kind for AuthorityKeyIdentifier {
    type Value = AuthorityKeyId;
    type ExtensionType = pkix::AuthorityKeyIdentifier;

    const NAME: &'static str = "AuthorityKeyIdentifier";
    const OID: Option<ObjectIdentifier> = Some(oid::ID_CE_AUTHORITY_KEY_IDENTIFIER);

    fn default_value() -> AuthorityKeyId {
        AuthorityKeyId::default()
    }

    fn parse_str(value: &str) -> Result<AuthorityKeyId> {
        Ok(AuthorityKeyId {
            key_identifier: Some(hex_to_bytes(value)?),
            ..Default::default()
        })
    }

    fn parse_value(value: &JsonValue) -> Result<AuthorityKeyId> {
        match value {
            JsonValue::String(s) => Self::parse_str(s),
            JsonValue::Object(mapping) => key_id_from_mapping(mapping),
            other => Err(config::unsupported(other)),
        }
    }

    fn serialize_value(value: &AuthorityKeyId) -> Result<JsonValue> {
        let mut mapping = Map::new();
        if let Some(key_id) = &value.key_identifier {
            mapping.insert(KEY_IDENTIFIER_KEY.into(), bytes_to_hex(key_id).into());
        }
        if !value.authority_cert_issuer.is_empty() {
            let issuer = general_name::names_to_json(&value.authority_cert_issuer)?;
            mapping.insert(ISSUER_KEY.into(), issuer);
        }
        if let Some(serial) = &value.authority_cert_serial_number {
            mapping.insert(SERIAL_KEY.into(), bytes_to_hex(serial).into());
        }
        Ok(JsonValue::Object(mapping))
    }

    fn extension_type(value: &AuthorityKeyId) -> Result<pkix::AuthorityKeyIdentifier> {
        let key_identifier = match &value.key_identifier {
            Some(key_id) => Some(OctetString::new(key_id.as_slice())?),
            None => None,
        };
        let authority_cert_issuer = match value.authority_cert_issuer.as_slice() {
            [] => None,
            names => Some(names.to_vec()),
        };
        let authority_cert_serial_number = match &value.authority_cert_serial_number {
            Some(serial) => Some(SerialNumber::new(serial)?),
            None => None,
        };

        Ok(pkix::AuthorityKeyIdentifier {
            key_identifier,
            authority_cert_issuer,
            authority_cert_serial_number,
        })
    }

    fn from_extension_type(ext: pkix::AuthorityKeyIdentifier) -> Result<AuthorityKeyId> {
        Ok(AuthorityKeyId {
            key_identifier: ext.key_identifier.map(OctetString::into_bytes),
            authority_cert_issuer: ext.authority_cert_issuer.unwrap_or_default(),
            authority_cert_serial_number: ext
                .authority_cert_serial_number
                .map(|serial| trim_serial(serial.as_bytes())),
        })
    }

    fn hash_value<H: Hasher>(value: &AuthorityKeyId, state: &mut H) {
        value.key_identifier.hash(state);
        general_name::hash_names(&value.authority_cert_issuer, state);
        value.authority_cert_serial_number.hash(state);
    }

    fn fmt_value(value: &AuthorityKeyId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&value.lines(",").join(", "))
    }

    fn as_text(value: &AuthorityKeyId) -> String {
        value.lines("\n  ").join("\n")
    }

    fn is_empty(value: &AuthorityKeyId) -> bool {
        value.key_identifier.is_none()
            && value.authority_cert_issuer.is_empty()
            && value.authority_cert_serial_number.is_none()
    }
}

impl Extension<AuthorityKeyIdentifier> {
    /// Create a non-critical extension carrying only a key identifier.
    pub fn from_key_id(key_id: impl Into<Vec<u8>>) -> Result<Self> {
        Self::from_value(AuthorityKeyId {
            key_identifier: Some(key_id.into()),
            ..Default::default()
        })
    }

    /// The key identifier, if present.
    pub fn key_identifier(&self) -> Option<&[u8]> {
        self.value().key_identifier.as_deref()
    }

    /// Names of the issuer's issuer.
    pub fn authority_cert_issuer(&self) -> &[GeneralName] {
        &self.value().authority_cert_issuer
    }

    /// Serial number of the issuer's certificate, if present.
    pub fn authority_cert_serial_number(&self) -> Option<&[u8]> {
        self.value().authority_cert_serial_number.as_deref()
    }
}

/// The authority key identifier of certificates issued by the holder of a
/// subject key identifier.
impl TryFrom<&Extension<SubjectKeyIdentifier>> for Extension<AuthorityKeyIdentifier> {
    type Error = Error;

    fn try_from(ski: &Extension<SubjectKeyIdentifier>) -> Result<Self> {
        Self::from_key_id(ski.key_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawExtension;
    use hex_literal::hex;
    use serde_json::json;
    use std::collections::hash_map::DefaultHasher;

    type Aki = Extension<AuthorityKeyIdentifier>;
    type Ski = Extension<SubjectKeyIdentifier>;

    fn hash<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn raw_aki(key_id: &[u8]) -> RawExtension {
        let value = pkix::AuthorityKeyIdentifier {
            key_identifier: Some(OctetString::new(key_id).unwrap()),
            authority_cert_issuer: None,
            authority_cert_serial_number: None,
        };
        RawExtension {
            extn_id: oid::ID_CE_AUTHORITY_KEY_IDENTIFIER,
            critical: false,
            extn_value: OctetString::new(der::Encode::to_der(&value).unwrap()).unwrap(),
        }
    }

    #[test]
    fn authority_key_identifier_from_wire() {
        let raw = raw_aki(b"333333");
        assert_eq!(raw.extn_value.as_bytes(), hex!("30088006333333333333"));

        let aki = Aki::from_wire(&raw).unwrap();
        assert_eq!(aki.as_text(), "keyid:33:33:33:33:33:33");
        assert_eq!(aki.key_identifier(), Some(&b"333333"[..]));
        assert_eq!(aki.as_extension().unwrap(), raw);
    }

    #[test]
    fn authority_key_identifier_from_bytes() {
        let aki = Aki::from_key_id(*b"333333").unwrap();
        assert_eq!(aki.as_text(), "keyid:33:33:33:33:33:33");
        assert_eq!(aki.as_extension().unwrap(), raw_aki(b"333333"));
        assert!(!aki.critical());
    }

    #[test]
    fn authority_key_identifier_from_subject_key_identifier() {
        let ski: Ski = "33:33:33:33:33:33".parse().unwrap();
        let aki = Aki::try_from(&ski).unwrap();
        assert_eq!(aki.as_text(), "keyid:33:33:33:33:33:33");
        assert_eq!(aki.key_identifier(), Some(ski.key_id()));
    }

    #[test]
    fn authority_key_identifier_hash() {
        let ext1 = Aki::from_wire(&raw_aki(b"333333")).unwrap();
        let ext2 = Aki::from_wire(&raw_aki(b"444444")).unwrap();
        assert_eq!(hash(&ext1), hash(&ext1.clone()));
        assert_ne!(hash(&ext1), hash(&ext2));
        assert_ne!(ext1, ext2);
    }

    #[test]
    fn authority_key_identifier_with_issuer_and_serial() {
        let aki = Aki::from_json(&json!({
            "value": {
                "key_identifier": "33:33",
                "authority_cert_issuer": ["example.com"],
                "authority_cert_serial_number": "00:01:02",
            }
        }))
        .unwrap();

        assert_eq!(aki.authority_cert_serial_number(), Some(&[1u8, 2][..]));
        assert_eq!(aki.as_text(), "keyid:33:33\nissuer:DNS:example.com\nserial:01:02");
        assert_eq!(aki.to_string(), "keyid:33:33, issuer:DNS:example.com, serial:01:02");

        let raw = aki.as_extension().unwrap();
        assert_eq!(Aki::from_wire(&raw).unwrap(), aki);
        assert_eq!(Aki::from_json(&aki.serialize().unwrap()).unwrap(), aki);

        let numeric = Aki::from_json(&json!({"value": {"authority_cert_serial_number": 258}})).unwrap();
        assert_eq!(numeric.authority_cert_serial_number(), Some(&[1u8, 2][..]));
        assert_eq!(numeric.key_identifier(), None);
    }

    #[test]
    fn authority_key_identifier_errors() {
        assert_eq!(
            Aki::from_json(&json!(null)).unwrap_err().to_string(),
            "Value is of unsupported type null"
        );
        assert_eq!(
            Aki::from_json(&json!(false)).unwrap_err().to_string(),
            "Value is of unsupported type bool"
        );
        assert!("zz:zz".parse::<Aki>().is_err());
    }

    #[test]
    fn subject_key_identifier() {
        let ski: Ski = "33:33:33:33:33:33".parse().unwrap();
        assert_eq!(ski.key_id(), b"333333");
        assert_eq!(ski.to_string(), "33:33:33:33:33:33");
        assert_eq!(ski.as_text(), "33:33:33:33:33:33");
        assert_eq!(format!("{ski:?}"), "<SubjectKeyIdentifier: 33:33:33:33:33:33, critical=false>");
        assert_eq!(Ski::from_key_id(*b"333333").unwrap(), ski);

        let raw = ski.as_extension().unwrap();
        assert_eq!(raw.extn_value.as_bytes(), hex!("0406333333333333"));
        assert_eq!(Ski::from_wire(&raw).unwrap(), ski);
        assert_eq!(Ski::from_json(&ski.serialize().unwrap()).unwrap(), ski);
        assert_eq!(Ski::from_json(&json!({"value": "333333333333"})).unwrap(), ski);
        assert_eq!(Ski::from_json(&json!({"value": "333333"})).unwrap().key_id(), b"333");
    }

    #[test]
    fn serial_trimming() {
        assert_eq!(trim_serial(&[0, 0, 1]), [1]);
        assert_eq!(trim_serial(&[0, 0]), [0]);
        assert_eq!(trim_serial(&[]), Vec::<u8>::new());
    }
}
