//! Generic extension value.
//!
//! An [`Extension`] pairs a criticality flag with a kind-specific value. The
//! behavior of every kind (OID binding, string grammar, wire type, text
//! rendering) is supplied by its [`Kind`] implementation.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::str::FromStr;

use const_oid::{AssociatedOid, ObjectIdentifier};
use der::asn1::OctetString;
use der::{Decode, DecodeOwned, Encode, Length, Writer};
use serde_json::Value as JsonValue;
use x509_cert::ext::AsExtension;
use x509_cert::name::Name;

use crate::codec::split_critical;
use crate::config::{self, Mapping, VALUE_KEY};
use crate::errors::{Error, Result};
use crate::RawExtension;

/// Behavior of one extension kind.
///
/// Implemented by the zero-sized marker types in [`crate::kind`].
pub trait Kind: Sized + 'static {
    /// Structured value stored by extensions of this kind.
    type Value: Clone + fmt::Debug + Eq;

    /// Typed wire value handed to certificate builders.
    type ExtensionType: DecodeOwned + Encode;

    /// Name used in `Debug`/`Display` output and error messages.
    const NAME: &'static str;

    /// OID bound to this kind. Base kinds have none.
    const OID: Option<ObjectIdentifier> = None;

    /// Criticality used when the input does not specify one.
    const DEFAULT_CRITICAL: bool = false;

    /// Value used when a config mapping has no `value` key.
    fn default_value() -> Self::Value;

    /// Parse the config-string payload (the `critical` token already removed).
    fn parse_str(value: &str) -> Result<Self::Value> {
        let _ = value;
        Err(Self::not_implemented("parsing from str"))
    }

    /// Parse the payload stored under a mapping's `value` key, or a direct
    /// (non-mapping) value.
    fn parse_value(value: &JsonValue) -> Result<Self::Value> {
        match value {
            JsonValue::String(s) => Self::parse_str(s),
            other => Err(config::unsupported(other)),
        }
    }

    /// Parse a config mapping. `critical` is handled by the caller.
    fn parse_config(mapping: &Mapping) -> Result<Self::Value> {
        match mapping.get(VALUE_KEY) {
            Some(value) => Self::parse_value(value),
            None => Ok(Self::default_value()),
        }
    }

    /// Render the payload stored under the `value` key by `serialize()`.
    fn serialize_value(value: &Self::Value) -> Result<JsonValue> {
        let _ = value;
        Err(Self::not_implemented("serialize"))
    }

    /// Convert into the typed wire value.
    fn extension_type(value: &Self::Value) -> Result<Self::ExtensionType> {
        let _ = value;
        Err(Self::not_implemented("extension_type"))
    }

    /// Convert from the typed wire value.
    fn from_extension_type(ext: Self::ExtensionType) -> Result<Self::Value> {
        let _ = ext;
        Err(Self::not_implemented("parsing wire extensions"))
    }

    /// Reject criticality flags the kind does not allow.
    fn check_critical(critical: bool) -> Result<()> {
        let _ = critical;
        Ok(())
    }

    /// Check cross-field invariants of a value.
    fn validate(value: &Self::Value) -> Result<()> {
        let _ = value;
        Ok(())
    }

    /// Inject values implied by others. Runs after [`Kind::validate`].
    fn normalize(value: &mut Self::Value) {
        let _ = value;
    }

    /// Feed a value into a hasher, consistent with `Eq` on the value.
    fn hash_value<H: Hasher>(value: &Self::Value, state: &mut H);

    /// Compact rendering of a value, as used by `Display`.
    fn fmt_value(value: &Self::Value, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Rendering of a value inside `Debug` output.
    fn fmt_repr(value: &Self::Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::fmt_value(value, f)
    }

    /// `Display` for a whole extension: value, then `/critical` if critical.
    fn fmt_display(value: &Self::Value, critical: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::fmt_value(value, f)?;
        if critical {
            f.write_str("/critical")?;
        }
        Ok(())
    }

    /// `Debug` for a whole extension: `<Name: value, critical=bool>`.
    fn fmt_debug(value: &Self::Value, critical: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: ", Self::NAME)?;
        Self::fmt_repr(value, f)?;
        write!(f, ", critical={critical}>")
    }

    /// Human readable multi-line rendering.
    fn as_text(value: &Self::Value) -> String {
        DisplayValue::<Self>(value).to_string()
    }

    /// Whether the value carries no information.
    fn is_empty(value: &Self::Value) -> bool {
        let _ = value;
        false
    }

    #[doc(hidden)]
    fn not_implemented(operation: &'static str) -> Error {
        Error::NotImplemented {
            kind: Self::NAME,
            operation,
        }
    }
}

/// Displays a bare value through [`Kind::fmt_value`].
pub(crate) struct DisplayValue<'a, K: Kind>(pub(crate) &'a K::Value);

impl<K: Kind> fmt::Display for DisplayValue<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        K::fmt_value(self.0, f)
    }
}

/// X.509 extension of kind `K`: a criticality flag and a structured value.
pub struct Extension<K: Kind> {
    critical: bool,
    value: K::Value,
    kind: PhantomData<K>,
}

impl<K: Kind> Extension<K> {
    /// Create an extension from a value and an explicit criticality.
    pub fn new(value: K::Value, critical: bool) -> Result<Self> {
        K::check_critical(critical)?;
        K::validate(&value)?;

        let mut value = value;
        K::normalize(&mut value);

        Ok(Self {
            critical,
            value,
            kind: PhantomData,
        })
    }

    /// Create an extension with the kind's default criticality.
    pub fn from_value(value: K::Value) -> Result<Self> {
        Self::new(value, K::DEFAULT_CRITICAL)
    }

    /// Create an extension from a config mapping (`{"value": .., "critical": ..}`).
    pub fn from_config(mapping: &Mapping) -> Result<Self> {
        let critical = config::read_critical(mapping, K::DEFAULT_CRITICAL)?;
        let value = K::parse_config(mapping)?;
        Self::new(value, critical)
    }

    /// Create an extension from any JSON config representation.
    ///
    /// Strings use the config-string grammar, objects are config mappings
    /// and arrays are handed to the kind as direct values.
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        match value {
            JsonValue::String(s) => s.parse(),
            JsonValue::Object(mapping) => Self::from_config(mapping),
            JsonValue::Array(_) => Self::new(K::parse_value(value)?, K::DEFAULT_CRITICAL),
            other => Err(config::unsupported(other)),
        }
    }

    /// Create an extension from its wire form.
    pub fn from_wire(ext: &RawExtension) -> Result<Self> {
        let expected = K::OID.ok_or_else(|| K::not_implemented("parsing wire extensions"))?;
        if ext.extn_id != expected {
            return Err(Error::OidMismatch {
                kind: K::NAME,
                expected,
                actual: ext.extn_id,
            });
        }

        let wire = K::ExtensionType::from_der(ext.extn_value.as_bytes())?;
        Self::new(K::from_extension_type(wire)?, ext.critical)
    }

    /// OID bound to the extension kind.
    pub fn oid() -> Result<ObjectIdentifier> {
        K::OID.ok_or_else(|| K::not_implemented("as_extension"))
    }

    /// Name of the extension kind.
    pub fn name(&self) -> &'static str {
        K::NAME
    }

    /// Is the extension marked critical?
    pub fn critical(&self) -> bool {
        self.critical
    }

    /// Change the criticality flag.
    pub fn set_critical(&mut self, critical: bool) -> Result<()> {
        K::check_critical(critical)?;
        self.critical = critical;
        Ok(())
    }

    /// Borrow the structured value.
    pub fn value(&self) -> &K::Value {
        &self.value
    }

    /// Consume the extension, returning the structured value.
    pub fn into_value(self) -> K::Value {
        self.value
    }

    /// Replace the structured value, re-running validation.
    pub fn set_value(&mut self, value: K::Value) -> Result<()> {
        *self = Self::new(value, self.critical)?;
        Ok(())
    }

    /// Human readable multi-line rendering.
    pub fn as_text(&self) -> String {
        K::as_text(&self.value)
    }

    /// Whether the extension carries no information.
    pub fn is_empty(&self) -> bool {
        K::is_empty(&self.value)
    }

    /// Typed wire value of this extension.
    pub fn extension_type(&self) -> Result<K::ExtensionType> {
        K::extension_type(&self.value)
    }

    /// Typed wire value wrapped for [`x509_cert::builder`], carrying this
    /// extension's criticality.
    pub fn for_builder(&self) -> Result<ForBuilder<K::ExtensionType>> {
        Ok(ForBuilder {
            extension: self.extension_type()?,
            critical: self.critical,
        })
    }

    /// Convert into the wire form.
    pub fn as_extension(&self) -> Result<RawExtension> {
        let extn_id = Self::oid()?;
        let der = self.extension_type()?.to_der()?;

        Ok(RawExtension {
            extn_id,
            critical: self.critical,
            extn_value: OctetString::new(der)?,
        })
    }

    /// Flat config mapping, accepted again by [`Extension::from_config`].
    pub fn serialize(&self) -> Result<JsonValue> {
        let value = K::serialize_value(&self.value)?;
        Ok(config::to_mapping(self.critical, value))
    }

    pub(crate) fn value_mut(&mut self) -> &mut K::Value {
        &mut self.value
    }

    /// Re-apply normalization after in-place mutation.
    pub(crate) fn renormalize(&mut self) {
        K::normalize(&mut self.value);
    }
}

impl<K: Kind> FromStr for Extension<K> {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let (critical, rest) = split_critical(value);
        Self::new(K::parse_str(rest)?, critical)
    }
}

impl<K: Kind> TryFrom<&RawExtension> for Extension<K> {
    type Error = Error;

    fn try_from(ext: &RawExtension) -> Result<Self> {
        Self::from_wire(ext)
    }
}

impl<K: Kind> TryFrom<&JsonValue> for Extension<K> {
    type Error = Error;

    fn try_from(value: &JsonValue) -> Result<Self> {
        Self::from_json(value)
    }
}

impl<K: Kind> TryFrom<&str> for Extension<K> {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        value.parse()
    }
}

impl<K: Kind> Clone for Extension<K> {
    fn clone(&self) -> Self {
        Self {
            critical: self.critical,
            value: self.value.clone(),
            kind: PhantomData,
        }
    }
}

impl<K: Kind> PartialEq for Extension<K> {
    fn eq(&self, other: &Self) -> bool {
        self.critical == other.critical && self.value == other.value
    }
}

impl<K: Kind> Eq for Extension<K> {}

impl<K: Kind> Hash for Extension<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.critical.hash(state);
        K::hash_value(&self.value, state);
    }
}

impl<K: Kind> fmt::Display for Extension<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        K::fmt_display(&self.value, self.critical, f)
    }
}

impl<K: Kind> fmt::Debug for Extension<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        K::fmt_debug(&self.value, self.critical, f)
    }
}

/// Typed wire value together with the criticality of the extension it came from.
///
/// Implements [`AsExtension`] so it can be added to a certificate builder.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForBuilder<T> {
    extension: T,
    critical: bool,
}

impl<T> ForBuilder<T> {
    /// The typed wire value.
    pub fn extension(&self) -> &T {
        &self.extension
    }

    /// Criticality the builder will mark the extension with.
    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// Consume the wrapper, returning the typed wire value.
    pub fn into_inner(self) -> T {
        self.extension
    }
}

impl<T: AssociatedOid> AssociatedOid for ForBuilder<T> {
    const OID: ObjectIdentifier = T::OID;
}

impl<T: Encode> Encode for ForBuilder<T> {
    fn encoded_len(&self) -> der::Result<Length> {
        self.extension.encoded_len()
    }

    fn encode(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.extension.encode(writer)
    }
}

impl<T: AssociatedOid + Encode> AsExtension for ForBuilder<T> {
    fn critical(&self, _subject: &Name, _extensions: &[RawExtension]) -> bool {
        self.critical
    }
}
