//! Text form of [`GeneralName`].
//!
//! Names are written as `<type>:<value>`, e.g. `DNS:example.com`,
//! `URI:https://example.com` or `IP:192.0.2.0/24`. Values without a
//! recognized type prefix are classified heuristically.

use core::hash::{Hash, Hasher};
use core::str::FromStr;
use std::net::IpAddr;

use const_oid::ObjectIdentifier;
use der::asn1::{Any, Ia5String, OctetString};
use der::{Decode, Encode};
use serde_json::Value as JsonValue;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::ext::pkix::name::{EdiPartyName, OtherName};
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};

pub use x509_cert::ext::pkix::name::GeneralName;

use crate::codec::{bytes_to_hex, hex_to_bytes};
use crate::config;
use crate::errors::{Error, Result};

/// Parse the text form of a general name.
///
/// With a type prefix the value is taken as is: any IA5 string is a valid
/// `DNS:`, `URI:` or `email:` name. Untyped values are classified and must
/// look like what they are guessed to be.
pub fn parse_general_name(value: &str) -> Result<GeneralName> {
    if let Some((prefix, rest)) = value.split_once(':') {
        match prefix.trim().to_ascii_lowercase().as_str() {
            "dns" => return Ok(GeneralName::DnsName(ia5(rest)?)),
            "uri" => return Ok(GeneralName::UniformResourceIdentifier(ia5(rest)?)),
            "email" => return Ok(GeneralName::Rfc822Name(ia5(rest)?)),
            "ip" => {
                let rest = rest.trim();
                return match rest.strip_prefix('#') {
                    Some(raw) => Ok(GeneralName::IpAddress(OctetString::new(hex_to_bytes(raw)?)?)),
                    None => ip_address(rest),
                };
            }
            "rid" => return registered_id(rest.trim()),
            "dirname" => return directory_name(rest.trim_start()),
            "othername" => return other_name(rest.trim()),
            "edipartyname" => return edi_party_name(rest.trim()),
            _ => {}
        }
    }

    let value = value.trim();
    if value.is_empty() {
        return Err(invalid(value));
    }
    guess(value)
}

/// Render a general name in the `<type>:<value>` form read by [`parse_general_name`].
///
/// Values that cannot be DER-encoded are logged and rendered with their
/// `Debug` form.
pub fn format_general_name(name: &GeneralName) -> String {
    try_format_general_name(name).unwrap_or_else(|err| {
        log::warn!("could not render general name: {err}");
        format!("{name:?}")
    })
}

/// Like [`format_general_name`], but fails if part of the name cannot be
/// DER-encoded.
pub fn try_format_general_name(name: &GeneralName) -> Result<String> {
    Ok(match name {
        GeneralName::DnsName(dns) => format!("DNS:{dns}"),
        GeneralName::UniformResourceIdentifier(uri) => format!("URI:{uri}"),
        GeneralName::Rfc822Name(email) => format!("email:{email}"),
        GeneralName::IpAddress(ip) => format!("IP:{}", format_ip(ip.as_bytes())),
        GeneralName::RegisteredId(oid) => format!("RID:{oid}"),
        GeneralName::DirectoryName(name) => format!("dirname:{}", format_name(name)?),
        GeneralName::OtherName(other) => {
            format!("otherName:{};{}", other.type_id, bytes_to_hex(&other.value.to_der()?))
        }
        GeneralName::EdiPartyName(edi) => {
            format!("ediPartyName:{}", bytes_to_hex(&edi.to_der()?))
        }
    })
}

/// Conversion of the items accepted by list operations.
///
/// List-valued extensions accept their items either in text form or
/// already parsed.
pub trait IntoItem<T> {
    /// Convert into the stored item type.
    fn into_item(self) -> Result<T>;
}

impl IntoItem<GeneralName> for GeneralName {
    fn into_item(self) -> Result<GeneralName> {
        Ok(self)
    }
}

impl IntoItem<GeneralName> for &GeneralName {
    fn into_item(self) -> Result<GeneralName> {
        Ok(self.clone())
    }
}

impl IntoItem<GeneralName> for &str {
    fn into_item(self) -> Result<GeneralName> {
        parse_general_name(self)
    }
}

impl IntoItem<GeneralName> for String {
    fn into_item(self) -> Result<GeneralName> {
        parse_general_name(&self)
    }
}

impl IntoItem<String> for &str {
    fn into_item(self) -> Result<String> {
        Ok(self.to_owned())
    }
}

impl IntoItem<String> for String {
    fn into_item(self) -> Result<String> {
        Ok(self)
    }
}

/// Parse a JSON string or list of strings into names.
pub(crate) fn parse_names(value: &JsonValue) -> Result<Vec<GeneralName>> {
    config::string_list(value)?
        .into_iter()
        .map(parse_general_name)
        .collect()
}

/// Parse two name lists, given either as a two-element list or as a
/// mapping with the two `keys`. Missing keys are empty lists.
pub(crate) fn parse_name_pair(
    value: &JsonValue,
    keys: [&str; 2],
) -> Result<(Vec<GeneralName>, Vec<GeneralName>)> {
    match value {
        JsonValue::Array(pair) => match pair.as_slice() {
            [first, second] => Ok((parse_names(first)?, parse_names(second)?)),
            _ => Err(Error::inconsistent(format!(
                "Expected a list of two lists ({}, {}), got {} elements",
                keys[0],
                keys[1],
                pair.len()
            ))),
        },
        JsonValue::Object(mapping) => {
            let get = |key: &str| mapping.get(key).map_or(Ok(Vec::new()), parse_names);
            Ok((get(keys[0])?, get(keys[1])?))
        }
        JsonValue::Null => Ok((Vec::new(), Vec::new())),
        other => Err(config::unsupported(other)),
    }
}

/// Text forms of `names` as a JSON list.
pub(crate) fn names_to_json(names: &[GeneralName]) -> Result<JsonValue> {
    names
        .iter()
        .map(|name| try_format_general_name(name).map(JsonValue::String))
        .collect()
}

/// Hash names through their text form, which is injective.
pub(crate) fn hash_names<H: Hasher>(names: &[GeneralName], state: &mut H) {
    names.len().hash(state);
    for name in names {
        format_general_name(name).hash(state);
    }
}

fn invalid(value: &str) -> Error {
    Error::InvalidGeneralName(value.into())
}

fn guess(value: &str) -> Result<GeneralName> {
    if value.contains("://") {
        uri(value)
    } else if value.contains('@') {
        email(value)
    } else if let Ok(name) = ip_address(value) {
        Ok(name)
    } else if value.starts_with('/') {
        directory_name(value)
    } else {
        dns_name(value)
    }
}

fn ia5(value: &str) -> Result<Ia5String> {
    Ia5String::new(value).map_err(|_| invalid(value))
}

fn is_hostname(value: &str) -> bool {
    let host = value
        .strip_prefix("*.")
        .or_else(|| value.strip_prefix('.'))
        .unwrap_or(value);

    !host.is_empty()
        && host.split('.').all(|label| {
            !label.is_empty()
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}

fn dns_name(value: &str) -> Result<GeneralName> {
    if !is_hostname(value) {
        return Err(invalid(value));
    }
    Ok(GeneralName::DnsName(ia5(value)?))
}

fn uri(value: &str) -> Result<GeneralName> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(invalid(value));
    }
    Ok(GeneralName::UniformResourceIdentifier(ia5(value)?))
}

fn email(value: &str) -> Result<GeneralName> {
    match value.rsplit_once('@') {
        Some((local, domain)) if !local.is_empty() && is_hostname(domain) => {
            Ok(GeneralName::Rfc822Name(ia5(value)?))
        }
        _ => Err(invalid(value)),
    }
}

fn ip_address(value: &str) -> Result<GeneralName> {
    let bytes = match value.split_once('/') {
        None => match IpAddr::from_str(value).map_err(|_| invalid(value))? {
            IpAddr::V4(addr) => addr.octets().to_vec(),
            IpAddr::V6(addr) => addr.octets().to_vec(),
        },
        Some((addr, prefix)) => {
            let addr = IpAddr::from_str(addr).map_err(|_| invalid(value))?;
            let prefix = u8::from_str(prefix).map_err(|_| invalid(value))?;
            network_bytes(addr, prefix).ok_or_else(|| invalid(value))?
        }
    };

    Ok(GeneralName::IpAddress(OctetString::new(bytes)?))
}

/// Address followed by netmask, as used in name constraints.
fn network_bytes(addr: IpAddr, prefix: u8) -> Option<Vec<u8>> {
    let mut bytes = match addr {
        IpAddr::V4(addr) => addr.octets().to_vec(),
        IpAddr::V6(addr) => addr.octets().to_vec(),
    };
    let bits = bytes.len() * 8;
    let prefix = usize::from(prefix);
    if prefix > bits {
        return None;
    }

    let mask: Vec<u8> = (0..bytes.len())
        .map(|i| {
            let set = prefix.saturating_sub(i * 8).min(8);
            (0xffu16 << (8 - set)) as u8
        })
        .collect();

    for (byte, mask) in bytes.iter_mut().zip(&mask) {
        *byte &= mask;
    }
    bytes.extend(mask);
    Some(bytes)
}

fn format_ip(bytes: &[u8]) -> String {
    let addr = |octets: &[u8]| -> Option<IpAddr> {
        match octets.len() {
            4 => <[u8; 4]>::try_from(octets).ok().map(IpAddr::from),
            16 => <[u8; 16]>::try_from(octets).ok().map(IpAddr::from),
            _ => None,
        }
    };

    if let Some(addr) = addr(bytes) {
        return addr.to_string();
    }

    // Only a network with a contiguous mask and no host bits has a prefix form.
    let (network, mask) = bytes.split_at(bytes.len() / 2);
    if let Some(network) = addr(network).filter(|_| bytes.len() % 2 == 0) {
        let prefix = mask.iter().map(|b| b.count_ones()).sum::<u32>();
        if let Ok(prefix) = u8::try_from(prefix) {
            if network_bytes(network, prefix).as_deref() == Some(bytes) {
                return format!("{network}/{prefix}");
            }
        }
    }

    format!("#{}", hex::encode_upper(bytes))
}

fn registered_id(value: &str) -> Result<GeneralName> {
    ObjectIdentifier::new(value)
        .map(GeneralName::RegisteredId)
        .map_err(|_| invalid(value))
}

/// Directory names are accepted in slash form (`/C=AT/CN=example.com`,
/// most significant RDN first) or in RFC 4514 form. An empty value is the
/// empty name.
fn directory_name(value: &str) -> Result<GeneralName> {
    if value.is_empty() {
        return Ok(GeneralName::DirectoryName(RdnSequence(Vec::new())));
    }

    let name = if value.starts_with('/') {
        value
            .split('/')
            .filter(|rdn| !rdn.is_empty())
            .map(RelativeDistinguishedName::from_str)
            .collect::<der::Result<Vec<_>>>()
            .map(RdnSequence)
    } else {
        Name::from_str(value)
    }
    .map_err(|_| invalid(value))?;

    Ok(GeneralName::DirectoryName(name))
}

/// RFC 4514 form, least significant RDN first. Attributes whose text form
/// does not read back to the same value are written as `oid=#<DER hex>`,
/// and so is every attribute of a name that does not read back as a whole.
fn format_name(name: &Name) -> Result<String> {
    if name.0.is_empty() {
        return Ok(String::new());
    }

    let text = join_rdns(name, format_attribute)?;
    match Name::from_str(&text) {
        Ok(parsed) if parsed == *name => Ok(text),
        _ => join_rdns(name, hex_attribute),
    }
}

fn join_rdns(
    name: &Name,
    attribute: fn(&AttributeTypeAndValue) -> Result<String>,
) -> Result<String> {
    let rdns = name
        .0
        .iter()
        .rev()
        .map(|rdn| {
            let atvs = rdn.0.iter().map(attribute).collect::<Result<Vec<_>>>()?;
            Ok(atvs.join("+"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(rdns.join(","))
}

fn format_attribute(atv: &AttributeTypeAndValue) -> Result<String> {
    let text = atv.to_string();
    match AttributeTypeAndValue::from_str(&text) {
        Ok(parsed) if parsed == *atv => Ok(text),
        _ => hex_attribute(atv),
    }
}

fn hex_attribute(atv: &AttributeTypeAndValue) -> Result<String> {
    Ok(format!("{}=#{}", atv.oid, hex::encode_upper(atv.value.to_der()?)))
}

fn edi_party_name(value: &str) -> Result<GeneralName> {
    let der = hex_to_bytes(value)?;
    let name = EdiPartyName::from_der(&der).map_err(|_| invalid(value))?;
    Ok(GeneralName::EdiPartyName(name))
}

fn other_name(value: &str) -> Result<GeneralName> {
    let (type_id, der) = value.split_once(';').ok_or_else(|| invalid(value))?;
    let type_id = ObjectIdentifier::new(type_id.trim()).map_err(|_| invalid(value))?;
    let value = Any::from_der(&hex_to_bytes(der)?)?;

    Ok(GeneralName::OtherName(OtherName { type_id, value }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: &str) -> String {
        format_general_name(&parse_general_name(value).unwrap())
    }

    #[test]
    fn typed_prefixes() {
        assert_eq!(roundtrip("DNS:example.com"), "DNS:example.com");
        assert_eq!(roundtrip("dns:*.example.com"), "DNS:*.example.com");
        assert_eq!(roundtrip("URI:https://example.com"), "URI:https://example.com");
        assert_eq!(roundtrip("email:user@example.com"), "email:user@example.com");
        assert_eq!(roundtrip("IP:127.0.0.1"), "IP:127.0.0.1");
        assert_eq!(roundtrip("IP:::1"), "IP:::1");
        assert_eq!(roundtrip("RID:1.2.3.4"), "RID:1.2.3.4");
    }

    #[test]
    fn guessed_types() {
        assert_eq!(roundtrip("example.com"), "DNS:example.com");
        assert_eq!(roundtrip("https://example.com"), "URI:https://example.com");
        assert_eq!(roundtrip("user@example.com"), "email:user@example.com");
        assert_eq!(roundtrip("192.0.2.1"), "IP:192.0.2.1");
        assert_eq!(roundtrip("fd00::1"), "IP:fd00::1");
    }

    #[test]
    fn networks() {
        assert_eq!(roundtrip("IP:192.0.2.0/24"), "IP:192.0.2.0/24");
        assert_eq!(roundtrip("IP:192.0.2.77/24"), "IP:192.0.2.0/24");
        assert_eq!(roundtrip("IP:fd00::/8"), "IP:fd00::/8");

        match parse_general_name("IP:10.0.0.0/8").unwrap() {
            GeneralName::IpAddress(bytes) => {
                assert_eq!(bytes.as_bytes(), [10, 0, 0, 0, 255, 0, 0, 0]);
            }
            other => panic!("unexpected name {other:?}"),
        }

        assert!(parse_general_name("IP:10.0.0.0/33").is_err());
    }

    #[test]
    fn directory_names() {
        assert_eq!(roundtrip("dirname:/C=AT/CN=example.com"), "dirname:CN=example.com,C=AT");
        assert_eq!(roundtrip("/C=AT/CN=example.com"), "dirname:CN=example.com,C=AT");
        assert_eq!(roundtrip("dirname:CN=example.com,C=AT"), "dirname:CN=example.com,C=AT");
        assert_eq!(roundtrip("dirname:CN=a\\,b,O=x"), "dirname:CN=a\\,b,O=x");
        assert_eq!(roundtrip("dirname:"), "dirname:");
    }

    #[test]
    fn directory_name_with_slash() {
        let name = Name::from_str("CN=a/b,O=Foo").unwrap();
        let formatted = format_general_name(&GeneralName::DirectoryName(name.clone()));
        assert_eq!(formatted, "dirname:CN=a/b,O=Foo");
        assert_eq!(parse_general_name(&formatted).unwrap(), GeneralName::DirectoryName(name));
    }

    #[test]
    fn directory_name_keeps_value_tag() {
        // CN as PrintableString, which the text form would read back as UTF8String
        let atv = AttributeTypeAndValue {
            oid: const_oid::db::rfc4519::CN,
            value: Any::new(der::Tag::PrintableString, b"foo".as_slice()).unwrap(),
        };
        let rdn = RelativeDistinguishedName::try_from(vec![atv]).unwrap();
        let name = GeneralName::DirectoryName(RdnSequence(vec![rdn]));

        let formatted = format_general_name(&name);
        assert_eq!(formatted, "dirname:2.5.4.3=#1303666F6F");
        assert_eq!(parse_general_name(&formatted).unwrap(), name);
    }

    #[test]
    fn directory_name_with_escaped_backslash() {
        // `a\,b` renders as `CN=a\\\,b`, whose comma the RDN splitter takes as unescaped
        let atv = AttributeTypeAndValue {
            oid: const_oid::db::rfc4519::CN,
            value: Any::new(der::Tag::Utf8String, b"a\\,b".as_slice()).unwrap(),
        };
        let rdn = RelativeDistinguishedName::try_from(vec![atv]).unwrap();
        let name = GeneralName::DirectoryName(RdnSequence(vec![rdn]));

        let formatted = format_general_name(&name);
        assert_eq!(formatted, "dirname:2.5.4.3=#0C04615C2C62");
        assert_eq!(parse_general_name(&formatted).unwrap(), name);
    }

    #[test]
    fn typed_values_are_kept_verbatim() {
        for value in ["DNS:example.com.", "DNS:exa mple.com", "DNS:", "email:@example.com", "URI:foo"] {
            assert_eq!(roundtrip(value), value);
        }
    }

    #[test]
    fn lossy_ip_addresses() {
        let raw = |bytes: &[u8]| GeneralName::IpAddress(OctetString::new(bytes).unwrap());

        for (bytes, text) in [
            (&[192, 0, 2, 1, 255, 255, 255, 0][..], "IP:#C0000201FFFFFF00"),
            (&[10, 0, 0, 0, 255, 0, 255, 0][..], "IP:#0A000000FF00FF00"),
            (&[1, 2, 3][..], "IP:#010203"),
            (&[][..], "IP:#"),
        ] {
            let name = raw(bytes);
            assert_eq!(format_general_name(&name), text);
            assert_eq!(parse_general_name(text).unwrap(), name);
        }
    }

    #[test]
    fn other_names() {
        // UTF8String "x"
        assert_eq!(roundtrip("otherName:1.2.3;0C:01:78"), "otherName:1.2.3;0C:01:78");
    }

    #[test]
    fn edi_party_names() {
        // partyName [1] UTF8String "x"
        assert_eq!(roundtrip("ediPartyName:30:05:A1:03:0C:01:78"), "ediPartyName:30:05:A1:03:0C:01:78");
        assert!(parse_general_name("ediPartyName:04:00").is_err());
    }

    #[test]
    fn invalid_names() {
        for value in ["", "  ", "exa mple.com", "IP:foo", "IP:#zz", "RID:x", "DNS:\u{e9}", "dirname:foo", "#0A000001"] {
            assert!(parse_general_name(value).is_err(), "{value}");
        }
        assert!(matches!(parse_general_name("IP:foo"), Err(Error::InvalidGeneralName(_))));
    }

    #[test]
    fn into_item() {
        let name: GeneralName = "example.com".into_item().unwrap();
        assert_eq!(IntoItem::<GeneralName>::into_item(&name).unwrap(), name);
        let text: String = "foo".into_item().unwrap();
        assert_eq!(text, "foo");
    }
}
