//! Subject and issuer alternative names.

use core::fmt;
use core::hash::Hasher;

use const_oid::ObjectIdentifier;
use serde_json::Value as JsonValue;
use x509_cert::ext::pkix;

use crate::codec::split_tokens;
use crate::errors::Result;
use crate::extension::Kind;
use crate::general_name::{self, format_general_name, parse_general_name, GeneralName};
use crate::list::{self, ListKind};
use crate::oid;

fn parse_names_str(value: &str) -> Result<Vec<GeneralName>> {
    split_tokens(value)
        .into_iter()
        .map(parse_general_name)
        .collect()
}

/// Subject alternative name ([RFC 5280 § 4.2.1.6]), e.g. `DNS:example.com,DNS:example.org`.
///
/// [RFC 5280 § 4.2.1.6]: https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.6
#[derive(Clone, Copy, Debug)]
pub struct SubjectAlternativeName;

impl Kind for SubjectAlternativeName {
    type Value = Vec<GeneralName>;
    type ExtensionType = pkix::SubjectAltName;

    const NAME: &'static str = "SubjectAlternativeName";
    const OID: Option<ObjectIdentifier> = Some(oid::ID_CE_SUBJECT_ALT_NAME);

    fn default_value() -> Vec<GeneralName> {
        Vec::new()
    }

    fn parse_str(value: &str) -> Result<Vec<GeneralName>> {
        parse_names_str(value)
    }

    fn parse_value(value: &JsonValue) -> Result<Vec<GeneralName>> {
        general_name::parse_names(value)
    }

    fn serialize_value(value: &Vec<GeneralName>) -> Result<JsonValue> {
        general_name::names_to_json(value)
    }

    fn extension_type(value: &Vec<GeneralName>) -> Result<pkix::SubjectAltName> {
        Ok(pkix::SubjectAltName(value.clone()))
    }

    fn from_extension_type(ext: pkix::SubjectAltName) -> Result<Vec<GeneralName>> {
        Ok(ext.0)
    }

    fn hash_value<H: Hasher>(value: &Vec<GeneralName>, state: &mut H) {
        general_name::hash_names(value, state);
    }

    fn fmt_value(value: &Vec<GeneralName>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        list::fmt_items::<Self>(value, f)
    }

    fn fmt_repr(value: &Vec<GeneralName>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        list::fmt_item_list(value, format_general_name, f)
    }

    fn as_text(value: &Vec<GeneralName>) -> String {
        list::items_as_text::<Self>(value)
    }

    fn is_empty(value: &Vec<GeneralName>) -> bool {
        value.is_empty()
    }
}

impl ListKind for SubjectAlternativeName {
    type Item = GeneralName;

    fn items(value: &Vec<GeneralName>) -> &[GeneralName] {
        value
    }

    fn items_mut(value: &mut Vec<GeneralName>) -> &mut Vec<GeneralName> {
        value
    }

    fn format_item(item: &GeneralName) -> String {
        format_general_name(item)
    }
}

/// Issuer alternative name ([RFC 5280 § 4.2.1.7]).
///
/// Same representation as [`SubjectAlternativeName`].
///
/// [RFC 5280 § 4.2.1.7]: https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.7
#[derive(Clone, Copy, Debug)]
pub struct IssuerAlternativeName;

impl Kind for IssuerAlternativeName {
    type Value = Vec<GeneralName>;
    type ExtensionType = pkix::IssuerAltName;

    const NAME: &'static str = "IssuerAlternativeName";
    const OID: Option<ObjectIdentifier> = Some(oid::ID_CE_ISSUER_ALT_NAME);

    fn default_value() -> Vec<GeneralName> {
        Vec::new()
    }

    fn parse_str(value: &str) -> Result<Vec<GeneralName>> {
        parse_names_str(value)
    }

    fn parse_value(value: &JsonValue) -> Result<Vec<GeneralName>> {
        general_name::parse_names(value)
    }

    fn serialize_value(value: &Vec<GeneralName>) -> Result<JsonValue> {
        general_name::names_to_json(value)
    }

    fn extension_type(value: &Vec<GeneralName>) -> Result<pkix::IssuerAltName> {
        Ok(pkix::IssuerAltName(value.clone()))
    }

    fn from_extension_type(ext: pkix::IssuerAltName) -> Result<Vec<GeneralName>> {
        Ok(ext.0)
    }

    fn hash_value<H: Hasher>(value: &Vec<GeneralName>, state: &mut H) {
        general_name::hash_names(value, state);
    }

    fn fmt_value(value: &Vec<GeneralName>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        list::fmt_items::<Self>(value, f)
    }

    fn fmt_repr(value: &Vec<GeneralName>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        list::fmt_item_list(value, format_general_name, f)
    }

    fn as_text(value: &Vec<GeneralName>) -> String {
        list::items_as_text::<Self>(value)
    }

    fn is_empty(value: &Vec<GeneralName>) -> bool {
        value.is_empty()
    }
}

impl ListKind for IssuerAlternativeName {
    type Item = GeneralName;

    fn items(value: &Vec<GeneralName>) -> &[GeneralName] {
        value
    }

    fn items_mut(value: &mut Vec<GeneralName>) -> &mut Vec<GeneralName> {
        value
    }

    fn format_item(item: &GeneralName) -> String {
        format_general_name(item)
    }
}
