//! Base kinds without an OID binding.

use core::fmt;
use core::hash::{Hash, Hasher};

use der::asn1::Null;
use serde_json::Value as JsonValue;

use crate::codec::split_tokens;
use crate::config;
use crate::errors::Result;
use crate::extension::Kind;
use crate::list::{self, ListKind};

/// Opaque string value, the most basic kind.
///
/// Parses and renders but cannot be converted to or from the wire form.
#[derive(Clone, Copy, Debug)]
pub struct Base;

impl Kind for Base {
    type Value = String;
    type ExtensionType = Null;

    const NAME: &'static str = "Extension";

    fn default_value() -> String {
        String::new()
    }

    fn parse_str(value: &str) -> Result<String> {
        Ok(value.trim().to_owned())
    }

    fn hash_value<H: Hasher>(value: &String, state: &mut H) {
        value.hash(state);
    }

    fn fmt_value(value: &String, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(value)
    }

    fn is_empty(value: &String) -> bool {
        value.is_empty()
    }
}

/// Ordered list of opaque strings.
#[derive(Clone, Copy, Debug)]
pub struct List;

impl Kind for List {
    type Value = Vec<String>;
    type ExtensionType = Null;

    const NAME: &'static str = "ListExtension";

    fn default_value() -> Vec<String> {
        Vec::new()
    }

    fn parse_str(value: &str) -> Result<Vec<String>> {
        Ok(split_tokens(value).into_iter().map(str::to_owned).collect())
    }

    fn parse_value(value: &JsonValue) -> Result<Vec<String>> {
        match value {
            JsonValue::String(s) => Self::parse_str(s),
            other => Ok(config::string_list(other)?.into_iter().map(str::to_owned).collect()),
        }
    }

    fn serialize_value(value: &Vec<String>) -> Result<JsonValue> {
        Ok(JsonValue::from(value.clone()))
    }

    fn hash_value<H: Hasher>(value: &Vec<String>, state: &mut H) {
        value.hash(state);
    }

    fn fmt_value(value: &Vec<String>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        list::fmt_items::<Self>(value, f)
    }

    fn fmt_repr(value: &Vec<String>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        list::fmt_item_list(value, Self::format_item, f)
    }

    fn as_text(value: &Vec<String>) -> String {
        list::items_as_text::<Self>(value)
    }

    fn is_empty(value: &Vec<String>) -> bool {
        value.is_empty()
    }
}

impl ListKind for List {
    type Item = String;

    fn items(value: &Vec<String>) -> &[String] {
        value
    }

    fn items_mut(value: &mut Vec<String>) -> &mut Vec<String> {
        value
    }

    fn format_item(item: &String) -> String {
        item.clone()
    }
}
