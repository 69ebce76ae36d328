//! Extensions whose presence is their only information.
//!
//! Both are encoded as an ASN.1 `NULL`.

use core::fmt;
use core::hash::Hasher;

use const_oid::{AssociatedOid, ObjectIdentifier};
use der::asn1::Null;
use der::{DecodeValue, EncodeValue, FixedTag, Header, Length, Reader, Tag, Writer};

use crate::config::Mapping;
use crate::errors::{Error, Result};
use crate::extension::Kind;
use crate::oid;

macro_rules! null_extension {
    ($name:ident, $oid:expr) => {
        impl AssociatedOid for $name {
            const OID: ObjectIdentifier = $oid;
        }

        impl FixedTag for $name {
            const TAG: Tag = Tag::Null;
        }

        impl<'a> DecodeValue<'a> for $name {
            fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
                Null::decode_value(reader, header).map(|_| Self)
            }
        }

        impl EncodeValue for $name {
            fn value_len(&self) -> der::Result<Length> {
                Ok(Length::ZERO)
            }

            fn encode_value(&self, _writer: &mut impl Writer) -> der::Result<()> {
                Ok(())
            }
        }
    };
}

/// Wire value of the OCSP no-check extension.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OcspNoCheckSyntax;

null_extension!(OcspNoCheckSyntax, oid::ID_PKIX_OCSP_NOCHECK);

/// Wire value of the precertificate poison extension.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PrecertPoisonSyntax;

null_extension!(PrecertPoisonSyntax, oid::CT_PRECERT_POISON);

fn fmt_flag_debug(name: &str, critical: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "<{name}: critical={critical}>")
}

/// OCSP no-check ([RFC 6960 § 4.2.2.2.1]).
///
/// Only the config mapping and wire forms are supported.
///
/// [RFC 6960 § 4.2.2.2.1]: https://datatracker.ietf.org/doc/html/rfc6960#section-4.2.2.2.1
#[derive(Clone, Copy, Debug)]
pub struct OcspNoCheck;

impl Kind for OcspNoCheck {
    type Value = ();
    type ExtensionType = OcspNoCheckSyntax;

    const NAME: &'static str = "OCSPNoCheck";
    const OID: Option<ObjectIdentifier> = Some(oid::ID_PKIX_OCSP_NOCHECK);

    fn default_value() {}

    fn parse_config(_mapping: &Mapping) -> Result<()> {
        Ok(())
    }

    fn serialize_value(_value: &()) -> Result<serde_json::Value> {
        Ok(serde_json::Value::Null)
    }

    fn extension_type(_value: &()) -> Result<OcspNoCheckSyntax> {
        Ok(OcspNoCheckSyntax)
    }

    fn from_extension_type(_ext: OcspNoCheckSyntax) -> Result<()> {
        Ok(())
    }

    fn hash_value<H: Hasher>(_value: &(), _state: &mut H) {}

    fn fmt_value(_value: &(), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::NAME)
    }

    fn fmt_debug(_value: &(), critical: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_flag_debug(Self::NAME, critical, f)
    }
}

/// Certificate Transparency precertificate poison ([RFC 6962 § 3.1]).
///
/// Must always be critical: non-critical input is rejected on every path.
///
/// [RFC 6962 § 3.1]: https://datatracker.ietf.org/doc/html/rfc6962#section-3.1
#[derive(Clone, Copy, Debug)]
pub struct PrecertPoison;

impl Kind for PrecertPoison {
    type Value = ();
    type ExtensionType = PrecertPoisonSyntax;

    const NAME: &'static str = "PrecertPoison";
    const OID: Option<ObjectIdentifier> = Some(oid::CT_PRECERT_POISON);
    const DEFAULT_CRITICAL: bool = true;

    fn default_value() {}

    fn parse_config(_mapping: &Mapping) -> Result<()> {
        Ok(())
    }

    fn serialize_value(_value: &()) -> Result<serde_json::Value> {
        Ok(serde_json::Value::Null)
    }

    fn extension_type(_value: &()) -> Result<PrecertPoisonSyntax> {
        Ok(PrecertPoisonSyntax)
    }

    fn from_extension_type(_ext: PrecertPoisonSyntax) -> Result<()> {
        Ok(())
    }

    fn check_critical(critical: bool) -> Result<()> {
        if critical {
            Ok(())
        } else {
            Err(Error::CriticalityPolicy { kind: Self::NAME })
        }
    }

    fn hash_value<H: Hasher>(_value: &(), _state: &mut H) {}

    fn fmt_value(_value: &(), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::NAME)
    }

    fn fmt_debug(_value: &(), critical: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_flag_debug(Self::NAME, critical, f)
    }
}
