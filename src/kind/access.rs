//! Authority information access ([RFC 5280 § 4.2.2.1]).
//!
//! [RFC 5280 § 4.2.2.1]: https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.2.1

use core::fmt;
use core::hash::Hasher;

use const_oid::ObjectIdentifier;
use serde_json::{json, Value as JsonValue};
use x509_cert::ext::pkix::{AccessDescription, AuthorityInfoAccessSyntax};

use crate::config::{Mapping, VALUE_KEY};
use crate::errors::{Error, Result};
use crate::extension::{Extension, Kind};
use crate::general_name::{self, format_general_name, GeneralName, IntoItem};
use crate::list;
use crate::oid;

const KEYS: [&str; 2] = ["issuers", "ocsp"];

/// Authority information access: CA issuer and OCSP responder locations.
///
/// Accepts a list pair `[[issuers...], [ocsp...]]` or a mapping with
/// `issuers`/`ocsp` keys; the mapping may also be given at the top level of
/// the config mapping. There is no config-string form.
#[derive(Clone, Copy, Debug)]
pub struct AuthorityInformationAccess;

/// Value of an [`AuthorityInformationAccess`] extension.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccessLocations {
    /// `caIssuers` access locations.
    pub issuers: Vec<GeneralName>,
    /// `ocsp` access locations.
    pub ocsp: Vec<GeneralName>,
}

impl AccessLocations {
    fn lists(&self) -> [(&'static str, &[GeneralName]); 2] {
        [(KEYS[0], self.issuers.as_slice()), (KEYS[1], self.ocsp.as_slice())]
    }
}

impl Kind for AuthorityInformationAccess {
    type Value = AccessLocations;
    type ExtensionType = AuthorityInfoAccessSyntax;

    const NAME: &'static str = "AuthorityInformationAccess";
    const OID: Option<ObjectIdentifier> = Some(oid::ID_PE_AUTHORITY_INFO_ACCESS);

    fn default_value() -> AccessLocations {
        AccessLocations::default()
    }

    fn parse_value(value: &JsonValue) -> Result<AccessLocations> {
        let (issuers, ocsp) = general_name::parse_name_pair(value, KEYS)?;
        Ok(AccessLocations { issuers, ocsp })
    }

    fn parse_config(mapping: &Mapping) -> Result<AccessLocations> {
        match mapping.get(VALUE_KEY) {
            Some(value) => Self::parse_value(value),
            None => {
                let get = |key: &str| mapping.get(key).map_or(Ok(Vec::new()), general_name::parse_names);
                Ok(AccessLocations {
                    issuers: get(KEYS[0])?,
                    ocsp: get(KEYS[1])?,
                })
            }
        }
    }

    fn serialize_value(value: &AccessLocations) -> Result<JsonValue> {
        Ok(json!({
            "issuers": general_name::names_to_json(&value.issuers)?,
            "ocsp": general_name::names_to_json(&value.ocsp)?,
        }))
    }

    fn extension_type(value: &AccessLocations) -> Result<AuthorityInfoAccessSyntax> {
        let describe = |access_method: ObjectIdentifier| {
            move |name: &GeneralName| AccessDescription {
                access_method,
                access_location: name.clone(),
            }
        };

        let issuers = value.issuers.iter().map(describe(oid::ID_AD_CA_ISSUERS));
        let ocsp = value.ocsp.iter().map(describe(oid::ID_AD_OCSP));
        Ok(AuthorityInfoAccessSyntax(issuers.chain(ocsp).collect()))
    }

    fn from_extension_type(ext: AuthorityInfoAccessSyntax) -> Result<AccessLocations> {
        let mut value = AccessLocations::default();
        for description in ext.0 {
            match description.access_method {
                oid::ID_AD_CA_ISSUERS => value.issuers.push(description.access_location),
                oid::ID_AD_OCSP => value.ocsp.push(description.access_location),
                other => {
                    return Err(Error::inconsistent(format!("Unknown access method: {other}")));
                }
            }
        }
        Ok(value)
    }

    fn hash_value<H: Hasher>(value: &AccessLocations, state: &mut H) {
        general_name::hash_names(&value.issuers, state);
        general_name::hash_names(&value.ocsp, state);
    }

    fn fmt_value(value: &AccessLocations, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        list::fmt_named_lists(&value.lists(), format_general_name, f)
    }

    fn fmt_display(value: &AccessLocations, critical: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", Self::NAME)?;
        Self::fmt_value(value, f)?;
        write!(f, ", critical={critical})")
    }

    fn as_text(value: &AccessLocations) -> String {
        list::sections_as_text(
            &[
                ("CA Issuers", value.issuers.as_slice()),
                ("OCSP", value.ocsp.as_slice()),
            ],
            format_general_name,
        )
    }

    fn is_empty(value: &AccessLocations) -> bool {
        value.issuers.is_empty() && value.ocsp.is_empty()
    }
}

impl Extension<AuthorityInformationAccess> {
    /// CA issuer locations.
    pub fn issuers(&self) -> &[GeneralName] {
        &self.value().issuers
    }

    /// OCSP responder locations.
    pub fn ocsp(&self) -> &[GeneralName] {
        &self.value().ocsp
    }

    /// Replace the CA issuer locations.
    pub fn set_issuers<I, T>(&mut self, issuers: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: IntoItem<GeneralName>,
    {
        self.value_mut().issuers = list::parse_items(issuers)?;
        Ok(())
    }

    /// Replace the OCSP responder locations.
    pub fn set_ocsp<I, T>(&mut self, ocsp: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: IntoItem<GeneralName>,
    {
        self.value_mut().ocsp = list::parse_items(ocsp)?;
        Ok(())
    }
}
