//! Basic and name constraints ([RFC 5280 § 4.2.1.9], [RFC 5280 § 4.2.1.10]).
//!
//! Both kinds are critical unless told otherwise.
//!
//! [RFC 5280 § 4.2.1.9]: https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.9
//! [RFC 5280 § 4.2.1.10]: https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.10

use core::fmt;
use core::hash::{Hash, Hasher};

use const_oid::ObjectIdentifier;
use serde_json::{json, Value as JsonValue};
use x509_cert::ext::pkix;
use x509_cert::ext::pkix::constraints::name::{GeneralSubtree, GeneralSubtrees};

use crate::codec::parse_bool;
use crate::config::{self, Mapping, VALUE_KEY};
use crate::errors::{Error, Result};
use crate::extension::{Extension, Kind};
use crate::general_name::{self, format_general_name, GeneralName, IntoItem};
use crate::list;
use crate::oid;

/// Basic constraints: whether the subject is a CA and how many intermediate
/// CAs may follow it.
///
/// The string form is `CA:TRUE,pathlen=0`; `:` and `=` are interchangeable,
/// whitespace around tokens is ignored and the boolean is case-insensitive.
#[derive(Clone, Copy, Debug)]
pub struct BasicConstraints;

/// Value of a [`BasicConstraints`] extension.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct CaConstraint {
    /// Is the subject a CA?
    pub ca: bool,
    /// Maximum number of non-self-issued intermediate certificates. Only
    /// meaningful for CAs.
    pub pathlen: Option<u8>,
}

/// Split `key:value` or `key=value`, whichever separator comes first.
fn split_pair(token: &str) -> Option<(&str, &str)> {
    let index = token.find([':', '='])?;
    Some((token[..index].trim(), token[index + 1..].trim()))
}

fn parse_ca(token: &str) -> Result<bool> {
    split_pair(token)
        .filter(|(key, _)| key.eq_ignore_ascii_case("ca"))
        .and_then(|(_, value)| parse_bool(value))
        .ok_or_else(|| Error::inconsistent(format!("Could not parse CA value: {}", token.trim())))
}

fn parse_pathlen(token: &str) -> Result<u8> {
    split_pair(token)
        .filter(|(key, _)| key.eq_ignore_ascii_case("pathlen"))
        .and_then(|(_, value)| value.parse().ok())
        .ok_or_else(|| Error::inconsistent(format!("Could not parse pathlen: {}", token.trim())))
}

fn ca_from_json(value: &JsonValue) -> Result<bool> {
    match value {
        JsonValue::Bool(ca) => Ok(*ca),
        JsonValue::String(s) => parse_bool(s)
            .ok_or_else(|| Error::inconsistent(format!("Could not parse CA value: {s}"))),
        other => Err(config::unsupported(other)),
    }
}

fn pathlen_from_json(value: &JsonValue) -> Result<Option<u8>> {
    let pathlen = match value {
        JsonValue::Null => return Ok(None),
        JsonValue::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        JsonValue::String(s) => s.trim().parse().ok(),
        other => return Err(config::unsupported(other)),
    };

    pathlen
        .map(Some)
        .ok_or_else(|| Error::inconsistent(format!("Could not parse pathlen: {value}")))
}

/// Read `ca`/`pathlen` keys. A missing `ca` key means "not a CA".
fn ca_from_mapping(mapping: &Mapping) -> Result<CaConstraint> {
    Ok(CaConstraint {
        ca: mapping.get("ca").map_or(Ok(false), ca_from_json)?,
        pathlen: mapping.get("pathlen").map_or(Ok(None), pathlen_from_json)?,
    })
}

impl Kind for BasicConstraints {
    type Value = CaConstraint;
    type ExtensionType = pkix::BasicConstraints;

    const NAME: &'static str = "BasicConstraints";
    const OID: Option<ObjectIdentifier> = Some(oid::ID_CE_BASIC_CONSTRAINTS);
    const DEFAULT_CRITICAL: bool = true;

    fn default_value() -> CaConstraint {
        CaConstraint::default()
    }

    fn parse_str(value: &str) -> Result<CaConstraint> {
        let (ca, pathlen) = match value.split_once(',') {
            Some((ca, pathlen)) => (ca, Some(pathlen)),
            None => (value, None),
        };

        Ok(CaConstraint {
            ca: parse_ca(ca)?,
            pathlen: pathlen.map(parse_pathlen).transpose()?,
        })
    }

    fn parse_value(value: &JsonValue) -> Result<CaConstraint> {
        match value {
            JsonValue::String(s) => Self::parse_str(s),
            JsonValue::Object(mapping) => ca_from_mapping(mapping),
            other => Err(config::unsupported(other)),
        }
    }

    fn parse_config(mapping: &Mapping) -> Result<CaConstraint> {
        match mapping.get(VALUE_KEY) {
            Some(value) => Self::parse_value(value),
            None => ca_from_mapping(mapping),
        }
    }

    fn serialize_value(value: &CaConstraint) -> Result<JsonValue> {
        Ok(json!({"ca": value.ca, "pathlen": value.pathlen}))
    }

    fn extension_type(value: &CaConstraint) -> Result<pkix::BasicConstraints> {
        Ok(pkix::BasicConstraints {
            ca: value.ca,
            path_len_constraint: value.pathlen,
        })
    }

    fn from_extension_type(ext: pkix::BasicConstraints) -> Result<CaConstraint> {
        Ok(CaConstraint {
            ca: ext.ca,
            pathlen: ext.path_len_constraint,
        })
    }

    fn validate(value: &CaConstraint) -> Result<()> {
        if !value.ca && value.pathlen.is_some() {
            return Err(Error::inconsistent("pathlen must be None when ca is False"));
        }
        Ok(())
    }

    fn hash_value<H: Hasher>(value: &CaConstraint, state: &mut H) {
        value.hash(state);
    }

    fn fmt_value(value: &CaConstraint, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (value.ca, value.pathlen) {
            (true, Some(pathlen)) => write!(f, "CA:TRUE, pathlen:{pathlen}"),
            (true, None) => f.write_str("CA:TRUE"),
            (false, _) => f.write_str("CA:FALSE"),
        }
    }

    fn fmt_repr(value: &CaConstraint, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ca={}, pathlen={:?}", value.ca, value.pathlen)
    }
}

impl Extension<BasicConstraints> {
    /// Is the subject a CA?
    pub fn ca(&self) -> bool {
        self.value().ca
    }

    /// Maximum path length below the subject, if any.
    pub fn pathlen(&self) -> Option<u8> {
        self.value().pathlen
    }
}

/// Name constraints: namespaces that names in subsequent certificates must
/// (permitted) or must not (excluded) fall into.
///
/// Accepts a list pair `[[permitted...], [excluded...]]` or a mapping with
/// `permitted`/`excluded` keys. There is no config-string form.
#[derive(Clone, Copy, Debug)]
pub struct NameConstraints;

/// Value of a [`NameConstraints`] extension.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Subtrees {
    /// Permitted subtrees.
    pub permitted: Vec<GeneralName>,
    /// Excluded subtrees.
    pub excluded: Vec<GeneralName>,
}

const SUBTREE_KEYS: [&str; 2] = ["permitted", "excluded"];

fn to_subtrees(names: &[GeneralName]) -> Option<GeneralSubtrees> {
    if names.is_empty() {
        return None;
    }

    let subtrees = names
        .iter()
        .map(|name| GeneralSubtree {
            base: name.clone(),
            minimum: 0,
            maximum: None,
        })
        .collect();
    Some(subtrees)
}

/// Base distances other than the RFC 5280 defaults have no text form, so
/// such extensions are refused and stay unrecognized.
fn from_subtrees(subtrees: Option<GeneralSubtrees>) -> Result<Vec<GeneralName>> {
    subtrees
        .unwrap_or_default()
        .into_iter()
        .map(|subtree| {
            if subtree.minimum != 0 || subtree.maximum.is_some() {
                return Err(Error::inconsistent(format!(
                    "Unsupported base distance {}..{:?} in name constraint subtree",
                    subtree.minimum, subtree.maximum
                )));
            }
            Ok(subtree.base)
        })
        .collect()
}

impl Kind for NameConstraints {
    type Value = Subtrees;
    type ExtensionType = pkix::NameConstraints;

    const NAME: &'static str = "NameConstraints";
    const OID: Option<ObjectIdentifier> = Some(oid::ID_CE_NAME_CONSTRAINTS);
    const DEFAULT_CRITICAL: bool = true;

    fn default_value() -> Subtrees {
        Subtrees::default()
    }

    fn parse_value(value: &JsonValue) -> Result<Subtrees> {
        let (permitted, excluded) = general_name::parse_name_pair(value, SUBTREE_KEYS)?;
        Ok(Subtrees { permitted, excluded })
    }

    fn serialize_value(value: &Subtrees) -> Result<JsonValue> {
        Ok(json!({
            "permitted": general_name::names_to_json(&value.permitted)?,
            "excluded": general_name::names_to_json(&value.excluded)?,
        }))
    }

    fn extension_type(value: &Subtrees) -> Result<pkix::NameConstraints> {
        Ok(pkix::NameConstraints {
            permitted_subtrees: to_subtrees(&value.permitted),
            excluded_subtrees: to_subtrees(&value.excluded),
        })
    }

    fn from_extension_type(ext: pkix::NameConstraints) -> Result<Subtrees> {
        Ok(Subtrees {
            permitted: from_subtrees(ext.permitted_subtrees)?,
            excluded: from_subtrees(ext.excluded_subtrees)?,
        })
    }

    fn hash_value<H: Hasher>(value: &Subtrees, state: &mut H) {
        general_name::hash_names(&value.permitted, state);
        general_name::hash_names(&value.excluded, state);
    }

    fn fmt_value(value: &Subtrees, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        list::fmt_named_lists(
            &[
                (SUBTREE_KEYS[0], value.permitted.as_slice()),
                (SUBTREE_KEYS[1], value.excluded.as_slice()),
            ],
            format_general_name,
            f,
        )
    }

    fn fmt_display(value: &Subtrees, critical: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", Self::NAME)?;
        Self::fmt_value(value, f)?;
        write!(f, ", critical={critical})")
    }

    fn as_text(value: &Subtrees) -> String {
        list::sections_as_text(
            &[
                ("Permitted", value.permitted.as_slice()),
                ("Excluded", value.excluded.as_slice()),
            ],
            format_general_name,
        )
    }

    fn is_empty(value: &Subtrees) -> bool {
        value.permitted.is_empty() && value.excluded.is_empty()
    }
}

impl Extension<NameConstraints> {
    /// Permitted subtrees.
    pub fn permitted(&self) -> &[GeneralName] {
        &self.value().permitted
    }

    /// Excluded subtrees.
    pub fn excluded(&self) -> &[GeneralName] {
        &self.value().excluded
    }

    /// Replace the permitted subtrees.
    pub fn set_permitted<I, T>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: IntoItem<GeneralName>,
    {
        self.value_mut().permitted = list::parse_items(names)?;
        Ok(())
    }

    /// Replace the excluded subtrees.
    pub fn set_excluded<I, T>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: IntoItem<GeneralName>,
    {
        self.value_mut().excluded = list::parse_items(names)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::general_name::parse_general_name;
    use hex_literal::hex;
    use std::collections::hash_map::DefaultHasher;

    type Bc = Extension<BasicConstraints>;
    type Nc = Extension<NameConstraints>;

    fn hash<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn assert_bc(ext: &Bc, ca: bool, pathlen: Option<u8>, critical: bool) {
        assert_eq!(ext.ca(), ca);
        assert_eq!(ext.pathlen(), pathlen);
        assert_eq!(ext.critical(), critical);
        assert_eq!(*ext.value(), CaConstraint { ca, pathlen });
    }

    fn dns(name: &str) -> GeneralName {
        parse_general_name(&format!("DNS:{name}")).unwrap()
    }

    #[test]
    fn basic_constraints_from_mapping() {
        let bc = |value| Bc::from_json(&value).unwrap();

        assert_bc(&bc(json!({"ca": true})), true, None, true);
        assert_bc(&bc(json!({"ca": false})), false, None, true);
        assert_bc(&bc(json!({"ca": true, "pathlen": 3})), true, Some(3), true);
        assert_bc(&bc(json!({"ca": true, "pathlen": null})), true, None, true);
        assert_bc(&bc(json!({"ca": true, "critical": false})), true, None, false);
        assert_bc(&bc(json!({"value": "CA:TRUE,pathlen=1"})), true, Some(1), true);
        assert_bc(&bc(json!({"value": {"ca": true, "pathlen": 2}})), true, Some(2), true);
        assert_bc(&bc(json!({})), false, None, true);
    }

    #[test]
    fn basic_constraints_from_str() {
        let bc = |value: &str| value.parse::<Bc>().unwrap();

        assert_bc(&bc("CA:FALSE"), false, None, false);
        assert_bc(&bc("CA : FAlse "), false, None, false);
        assert_bc(&bc("CA: true"), true, None, false);
        assert_bc(&bc("CA=true"), true, None, false);
        assert_bc(&bc("CA:TRUE,pathlen=0"), true, Some(0), false);
        assert_bc(&bc("CA:trUe,pathlen:1"), true, Some(1), false);
        assert_bc(&bc("CA: true , pathlen = 2 "), true, Some(2), false);
        assert_bc(&bc("critical,CA:TRUE"), true, None, true);
    }

    #[test]
    fn basic_constraints_parse_errors() {
        let err = |value: &str| value.parse::<Bc>().unwrap_err().to_string();

        assert_eq!(err("CA:FALSE, pathlen=foo"), "Could not parse pathlen: pathlen=foo");
        assert_eq!(err("CA:FALSE, pathlen="), "Could not parse pathlen: pathlen=");
        assert_eq!(err("CA:FALSE, foobar"), "Could not parse pathlen: foobar");
        assert_eq!(err("CA:TRUE, pathlen=256"), "Could not parse pathlen: pathlen=256");
        assert_eq!(err("foo"), "Could not parse CA value: foo");
        assert_eq!(err("CA:maybe"), "Could not parse CA value: CA:maybe");
    }

    #[test]
    fn pathlen_requires_ca() {
        let err = "CA:FALSE, pathlen=3".parse::<Bc>().unwrap_err();
        assert_eq!(err, Error::inconsistent("pathlen must be None when ca is False"));

        let err = Bc::from_json(&json!({"ca": false, "pathlen": 1})).unwrap_err();
        assert_eq!(err.to_string(), "pathlen must be None when ca is False");

        let mut bc: Bc = "CA:TRUE,pathlen=3".parse().unwrap();
        let invalid = CaConstraint {
            ca: false,
            pathlen: Some(3),
        };
        assert!(bc.set_value(invalid).is_err());
        assert_eq!(bc.pathlen(), Some(3));
    }

    #[test]
    fn basic_constraints_hash() {
        let ext1: Bc = "CA:FALSE".parse().unwrap();
        let ext2: Bc = "CA:TRUE".parse().unwrap();
        let ext3: Bc = "CA:TRUE,pathlen=1".parse().unwrap();

        assert_eq!(hash(&ext1), hash(&ext1.clone()));
        assert_ne!(hash(&ext1), hash(&ext2));
        assert_ne!(hash(&ext1), hash(&ext3));
        assert_ne!(hash(&ext2), hash(&ext3));
    }

    #[test]
    fn basic_constraints_rendering() {
        assert_eq!("CA=true".parse::<Bc>().unwrap().as_text(), "CA:TRUE");
        assert_eq!("CA= true , pathlen = 3".parse::<Bc>().unwrap().as_text(), "CA:TRUE, pathlen:3");
        assert_eq!("CA = FALSE".parse::<Bc>().unwrap().as_text(), "CA:FALSE");

        let bc: Bc = "critical,CA:TRUE,pathlen=3".parse().unwrap();
        assert_eq!(bc.to_string(), "CA:TRUE, pathlen:3/critical");
        assert_eq!(format!("{bc:?}"), "<BasicConstraints: ca=true, pathlen=Some(3), critical=true>");
    }

    #[test]
    fn basic_constraints_wire() {
        let wire = "CA=true".parse::<Bc>().unwrap().extension_type().unwrap();
        assert!(wire.ca);
        assert_eq!(wire.path_len_constraint, None);

        let wire = "CA=true, pathlen: 5".parse::<Bc>().unwrap().extension_type().unwrap();
        assert_eq!(wire.path_len_constraint, Some(5));

        let bc = Bc::from_json(&json!({"ca": true, "pathlen": 0})).unwrap();
        let raw = bc.as_extension().unwrap();
        assert_eq!(raw.extn_value.as_bytes(), hex!("30060101ff020100"));
        assert_eq!(Bc::from_wire(&raw).unwrap(), bc);
        assert_eq!(Bc::from_json(&bc.serialize().unwrap()).unwrap(), bc);
    }

    fn assert_nc(ext: &Nc, permitted: &[&str], excluded: &[&str]) {
        let names = |values: &[&str]| values.iter().map(|v| dns(v)).collect::<Vec<_>>();
        assert_eq!(ext.permitted(), names(permitted));
        assert_eq!(ext.excluded(), names(excluded));
        assert_eq!(ext.is_empty(), permitted.is_empty() && excluded.is_empty());
        assert!(ext.critical());

        let raw = ext.as_extension().unwrap();
        assert_eq!(raw.extn_id, oid::ID_CE_NAME_CONSTRAINTS);
        assert_eq!(Nc::from_wire(&raw).unwrap(), *ext);
    }

    #[test]
    fn name_constraints_from_list() {
        let nc = |value| Nc::from_json(&value).unwrap();

        assert_nc(&nc(json!([[], []])), &[], &[]);
        assert_nc(&nc(json!([["example.com"], []])), &["example.com"], &[]);
        assert_nc(&nc(json!([[], ["example.com"]])), &[], &["example.com"]);
        assert_nc(&nc(json!([["example.com"], ["example.net"]])), &["example.com"], &["example.net"]);

        let err = Nc::from_json(&json!([["example.com"]])).unwrap_err();
        assert!(matches!(err, Error::InconsistentValue(_)));
    }

    #[test]
    fn name_constraints_from_mapping() {
        let nc = |value| Nc::from_json(&value).unwrap();

        assert_nc(&nc(json!({})), &[], &[]);
        assert_nc(&nc(json!({"value": {}})), &[], &[]);
        assert_nc(&nc(json!({"value": {"permitted": [], "excluded": []}})), &[], &[]);
        assert_nc(&nc(json!({"value": {"permitted": ["example.com"]}})), &["example.com"], &[]);
        assert_nc(&nc(json!({"value": {"excluded": ["example.com"], "permitted": []}})), &[], &["example.com"]);
        assert_nc(
            &nc(json!({"value": {"permitted": ["example.com"], "excluded": ["example.net"]}})),
            &["example.com"],
            &["example.net"],
        );

        assert!(!nc(json!({"critical": false})).critical());

        let both = nc(json!([["example.com"], ["example.net"]]));
        assert_eq!(Nc::from_json(&both.serialize().unwrap()).unwrap(), both);
    }

    #[test]
    fn name_constraints_empty_lists_are_omitted_on_the_wire() {
        let nc = Nc::from_json(&json!([["example.com"], []])).unwrap();
        let wire = nc.extension_type().unwrap();
        assert_eq!(wire.permitted_subtrees.map(|s| s.len()), Some(1));
        assert_eq!(wire.excluded_subtrees, None);
    }

    #[test]
    fn name_constraints_with_base_distance_stay_unrecognized() {
        use der::asn1::OctetString;
        use der::Encode;

        let subtree = GeneralSubtree {
            base: dns("example.com"),
            minimum: 1,
            maximum: Some(2),
        };
        let wire = pkix::NameConstraints {
            permitted_subtrees: Some(vec![subtree]),
            excluded_subtrees: None,
        };
        let raw = crate::RawExtension {
            extn_id: oid::ID_CE_NAME_CONSTRAINTS,
            critical: true,
            extn_value: OctetString::new(wire.to_der().unwrap()).unwrap(),
        };

        assert_eq!(
            Nc::from_wire(&raw).unwrap_err().to_string(),
            "Unsupported base distance 1..Some(2) in name constraint subtree"
        );

        let parsed = crate::ParsedExtension::from_raw(&raw);
        assert!(parsed.is_unrecognized());
        assert_eq!(parsed.as_extension().unwrap(), raw);
    }

    #[test]
    fn name_constraints_hash() {
        let ext1 = Nc::from_json(&json!([["example.com"], []])).unwrap();
        let ext2 = Nc::from_json(&json!([["example.com"], ["example.net"]])).unwrap();
        let ext3 = Nc::from_json(&json!([[], ["example.net"]])).unwrap();

        assert_eq!(hash(&ext1), hash(&ext1.clone()));
        assert_ne!(hash(&ext1), hash(&ext2));
        assert_ne!(hash(&ext1), hash(&ext3));
        assert_ne!(hash(&ext2), hash(&ext3));
    }

    #[test]
    fn name_constraints_rendering() {
        let empty = Nc::from_json(&json!([[], []])).unwrap();
        assert_eq!(empty.to_string(), "NameConstraints(permitted=[], excluded=[], critical=true)");
        assert_eq!(format!("{empty:?}"), "<NameConstraints: permitted=[], excluded=[], critical=true>");
        assert_eq!(empty.as_text(), "");

        let permitted = Nc::from_json(&json!({"value": {"permitted": ["example.com"]}})).unwrap();
        assert_eq!(
            permitted.to_string(),
            "NameConstraints(permitted=[\"DNS:example.com\"], excluded=[], critical=true)"
        );
        assert_eq!(permitted.as_text(), "Permitted:\n  * DNS:example.com\n");

        let excluded = Nc::from_json(&json!([[], ["example.com"]])).unwrap();
        assert_eq!(
            format!("{excluded:?}"),
            "<NameConstraints: permitted=[], excluded=[\"DNS:example.com\"], critical=true>"
        );
        assert_eq!(excluded.as_text(), "Excluded:\n  * DNS:example.com\n");

        let both = Nc::from_json(&json!([["example.com"], ["example.net"]])).unwrap();
        assert_eq!(
            both.as_text(),
            "Permitted:\n  * DNS:example.com\nExcluded:\n  * DNS:example.net\n"
        );
    }

    #[test]
    fn name_constraints_setters() {
        let mut nc = Nc::from_json(&json!([[], []])).unwrap();
        nc.set_permitted(["example.com"]).unwrap();
        nc.set_excluded([dns("example.net")]).unwrap();
        assert_eq!(nc, Nc::from_json(&json!([["example.com"], ["example.net"]])).unwrap());
        assert!(matches!("foo".parse::<Nc>(), Err(Error::NotImplemented { .. })));
    }
}
