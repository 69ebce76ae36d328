//! Fallback for wire extensions without a supported kind.

use core::fmt;
use core::hash::{Hash, Hasher};

use const_oid::ObjectIdentifier;
use der::asn1::OctetString;
use serde_json::{json, Value as JsonValue};

use crate::codec::{bytes_to_hex, hex_to_bytes};
use crate::config::{self, Mapping, VALUE_KEY};
use crate::errors::{Error, Result};
use crate::RawExtension;

const OID_KEY: &str = "oid";
const NAME_KEY: &str = "name";
const ERROR_KEY: &str = "error";

/// Wire extension kept as-is because its OID is not supported or its value
/// could not be decoded.
///
/// Converts back to exactly the wire extension it was created from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnrecognizedExtension {
    raw: RawExtension,
    name: Option<String>,
    error: Option<String>,
}

impl UnrecognizedExtension {
    /// Wrap a wire extension.
    pub fn new(raw: RawExtension) -> Self {
        Self {
            raw,
            name: None,
            error: None,
        }
    }

    /// Override the name reported by [`UnrecognizedExtension::name`].
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Record why the extension could not be parsed.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Create from a config mapping as produced by
    /// [`UnrecognizedExtension::serialize`].
    pub fn from_config(mapping: &Mapping) -> Result<Self> {
        let critical = config::read_critical(mapping, false)?;

        let extn_id = match mapping.get(OID_KEY) {
            Some(JsonValue::String(oid)) => ObjectIdentifier::new(oid)
                .map_err(|_| Error::inconsistent(format!("Invalid OID: {oid}")))?,
            Some(other) => return Err(config::unsupported(other)),
            None => return Err(Error::inconsistent("Missing OID")),
        };

        let value = match mapping.get(VALUE_KEY) {
            Some(JsonValue::String(value)) => hex_to_bytes(value)?,
            Some(other) => return Err(config::unsupported(other)),
            None => Vec::new(),
        };

        let text = |key: &str| match mapping.get(key) {
            Some(JsonValue::String(text)) => Ok(Some(text.clone())),
            Some(other) => Err(config::unsupported(other)),
            None => Ok(None),
        };

        Ok(Self {
            raw: RawExtension {
                extn_id,
                critical,
                extn_value: OctetString::new(value)?,
            },
            name: text(NAME_KEY)?,
            error: text(ERROR_KEY)?,
        })
    }

    /// OID of the wrapped extension.
    pub fn oid(&self) -> ObjectIdentifier {
        self.raw.extn_id
    }

    /// Is the wrapped extension marked critical?
    pub fn critical(&self) -> bool {
        self.raw.critical
    }

    /// Name given at construction, or `Unsupported extension (OID <oid>)`.
    pub fn name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("Unsupported extension (OID {})", self.raw.extn_id),
        }
    }

    /// Why the extension could not be parsed, if known.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// DER bytes of the extension value.
    pub fn value(&self) -> &[u8] {
        self.raw.extn_value.as_bytes()
    }

    /// Human readable rendering.
    pub fn as_text(&self) -> String {
        match &self.error {
            Some(error) => format!("Could not parse extension ({error})"),
            None => "Could not parse extension".into(),
        }
    }

    /// The wrapped wire extension.
    pub fn as_extension(&self) -> RawExtension {
        self.raw.clone()
    }

    /// Flat config mapping: `{"critical": .., "oid": "1.2.3", "value": "AB:CD"}`,
    /// plus `name` and `error` when set.
    pub fn serialize(&self) -> JsonValue {
        let mut serialized = json!({
            "critical": self.critical(),
            "oid": self.oid().to_string(),
            "value": bytes_to_hex(self.value()),
        });
        if let JsonValue::Object(mapping) = &mut serialized {
            if let Some(name) = &self.name {
                mapping.insert(NAME_KEY.into(), name.as_str().into());
            }
            if let Some(error) = &self.error {
                mapping.insert(ERROR_KEY.into(), error.as_str().into());
            }
        }
        serialized
    }
}

impl From<RawExtension> for UnrecognizedExtension {
    fn from(raw: RawExtension) -> Self {
        Self::new(raw)
    }
}

impl Hash for UnrecognizedExtension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.extn_id.hash(state);
        self.raw.critical.hash(state);
        self.value().hash(state);
    }
}

impl fmt::Display for UnrecognizedExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())?;
        if self.critical() {
            f.write_str("/critical")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawExtension {
        RawExtension {
            extn_id: ObjectIdentifier::new_unwrap("1.2.3"),
            critical: false,
            extn_value: OctetString::new(vec![0x05, 0x00]).unwrap(),
        }
    }

    #[test]
    fn names_and_text() {
        let ext = UnrecognizedExtension::new(raw());
        assert_eq!(ext.name(), "Unsupported extension (OID 1.2.3)");
        assert_eq!(ext.as_text(), "Could not parse extension");
        assert_eq!(ext.to_string(), "Unsupported extension (OID 1.2.3)");

        let ext = UnrecognizedExtension::new(raw())
            .with_name("my name")
            .with_error("my error");
        assert_eq!(ext.name(), "my name");
        assert_eq!(ext.error(), Some("my error"));
        assert_eq!(ext.as_text(), "Could not parse extension (my error)");
    }

    #[test]
    fn round_trip() {
        let ext = UnrecognizedExtension::from(raw());
        assert_eq!(ext.as_extension(), raw());

        let serialized = ext.serialize();
        assert_eq!(serialized, json!({"critical": false, "oid": "1.2.3", "value": "05:00"}));

        let JsonValue::Object(mapping) = serialized else {
            panic!("not a mapping");
        };
        assert_eq!(UnrecognizedExtension::from_config(&mapping).unwrap(), ext);
    }

    #[test]
    fn round_trip_keeps_name_and_error() {
        let ext = UnrecognizedExtension::new(raw())
            .with_name("BasicConstraints")
            .with_error("ASN.1 error");

        let serialized = ext.serialize();
        assert_eq!(
            serialized,
            json!({
                "critical": false,
                "oid": "1.2.3",
                "value": "05:00",
                "name": "BasicConstraints",
                "error": "ASN.1 error",
            })
        );

        let JsonValue::Object(mapping) = serialized else {
            panic!("not a mapping");
        };
        assert_eq!(UnrecognizedExtension::from_config(&mapping).unwrap(), ext);
    }

    #[test]
    fn config_errors() {
        let mapping = |value: JsonValue| match value {
            JsonValue::Object(mapping) => mapping,
            _ => unreachable!(),
        };

        let err = UnrecognizedExtension::from_config(&mapping(json!({"value": "05:00"})));
        assert_eq!(err.unwrap_err().to_string(), "Missing OID");

        let err = UnrecognizedExtension::from_config(&mapping(json!({"oid": "foo"})));
        assert_eq!(err.unwrap_err().to_string(), "Invalid OID: foo");

        let err = UnrecognizedExtension::from_config(&mapping(json!({"oid": 1})));
        assert_eq!(err.unwrap_err().to_string(), "Value is of unsupported type number");

        let err = UnrecognizedExtension::from_config(&mapping(json!({"oid": "1.2.3", "name": true})));
        assert_eq!(err.unwrap_err().to_string(), "Value is of unsupported type bool");
    }
}
