//! Wire-value codec for the DynECT API
//!
//! The API transmits integers and booleans as strings, in three different
//! encodings depending on the field:
//!
//! - [`StringifiedInt`]: `"300"`; the empty string means zero, and zero is
//!   always *sent* as the empty string
//! - [`PresenceBool`]: `"Y"` / `"N"`
//! - [`LiteralBool`]: `"true"` / `"false"`
//!
//! The encoding is a property of the field, never of the content. Model types
//! keep native `u32`/`bool` fields and pick the encoding once, at the field
//! declaration, through the serde `with`-modules below:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Example {
//!     #[serde(with = "dsf_core::codec::stringified_int")]
//!     ttl: u32,
//!     #[serde(with = "dsf_core::codec::presence_bool")]
//!     active: bool,
//! }
//!
//! let wire = r#"{"ttl":"300","active":"Y"}"#;
//! let value: Example = serde_json::from_str(wire).unwrap();
//! assert_eq!(value.ttl, 300);
//! assert!(value.active);
//! ```
//!
//! Decoding anything outside the accepted forms fails with
//! [`Error::MalformedValue`](crate::Error::MalformedValue) (or, inside serde,
//! with a custom error carrying the same text).

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Integer carried as a base-10 string
///
/// Zero and "absent" are indistinguishable on the wire: zero encodes to the
/// empty string, and the empty string decodes to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StringifiedInt(pub i64);

impl StringifiedInt {
    /// Decode a wire string
    pub fn decode(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self(0));
        }
        raw.parse::<i64>()
            .map(Self)
            .map_err(|_| Error::malformed(format!("expected a base-10 integer string, got {raw:?}")))
    }

    /// Encode to the wire string
    pub fn encode(self) -> String {
        if self.0 == 0 {
            String::new()
        } else {
            self.0.to_string()
        }
    }
}

impl From<i64> for StringifiedInt {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<StringifiedInt> for i64 {
    fn from(value: StringifiedInt) -> Self {
        value.0
    }
}

impl fmt::Display for StringifiedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl Serialize for StringifiedInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for StringifiedInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::decode(&raw).map_err(D::Error::custom)
    }
}

/// Boolean carried as `"Y"` / `"N"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PresenceBool(pub bool);

impl PresenceBool {
    /// Decode a wire string; only `Y` and `N` are accepted
    pub fn decode(raw: &str) -> Result<Self> {
        match raw {
            "Y" => Ok(Self(true)),
            "N" => Ok(Self(false)),
            other => Err(Error::malformed(format!("expected \"Y\" or \"N\", got {other:?}"))),
        }
    }

    /// Encode to the wire string
    pub fn encode(self) -> &'static str {
        if self.0 { "Y" } else { "N" }
    }
}

impl From<bool> for PresenceBool {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<PresenceBool> for bool {
    fn from(value: PresenceBool) -> Self {
        value.0
    }
}

impl fmt::Display for PresenceBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode())
    }
}

impl Serialize for PresenceBool {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.encode())
    }
}

impl<'de> Deserialize<'de> for PresenceBool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::decode(&raw).map_err(D::Error::custom)
    }
}

/// Boolean carried as the strings `"true"` / `"false"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LiteralBool(pub bool);

impl LiteralBool {
    /// Decode a wire string; only `true` and `false` are accepted
    pub fn decode(raw: &str) -> Result<Self> {
        match raw {
            "true" => Ok(Self(true)),
            "false" => Ok(Self(false)),
            other => Err(Error::malformed(format!(
                "expected \"true\" or \"false\", got {other:?}"
            ))),
        }
    }

    /// Encode to the wire string
    pub fn encode(self) -> &'static str {
        if self.0 { "true" } else { "false" }
    }
}

impl From<bool> for LiteralBool {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<LiteralBool> for bool {
    fn from(value: LiteralBool) -> Self {
        value.0
    }
}

impl fmt::Display for LiteralBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode())
    }
}

impl Serialize for LiteralBool {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.encode())
    }
}

impl<'de> Deserialize<'de> for LiteralBool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::decode(&raw).map_err(D::Error::custom)
    }
}

fn narrow<T, E>(value: i64) -> std::result::Result<T, E>
where
    T: TryFrom<i64>,
    E: serde::de::Error,
{
    T::try_from(value).map_err(|_| E::custom(format!("stringified integer {value} is out of range")))
}

/// `#[serde(with = ...)]` adapter: native integer <-> [`StringifiedInt`]
pub mod stringified_int {
    use super::{StringifiedInt, narrow};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Copy + Into<i64>,
        S: Serializer,
    {
        StringifiedInt((*value).into()).serialize(serializer)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: TryFrom<i64>,
        D: Deserializer<'de>,
    {
        let StringifiedInt(value) = StringifiedInt::deserialize(deserializer)?;
        narrow(value)
    }

    /// Same as the parent module, for `Option` fields
    pub mod option {
        use super::super::{StringifiedInt, narrow};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
        where
            T: Copy + Into<i64>,
            S: Serializer,
        {
            match value {
                Some(v) => serializer.serialize_some(&StringifiedInt((*v).into())),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
        where
            T: TryFrom<i64>,
            D: Deserializer<'de>,
        {
            Option::<StringifiedInt>::deserialize(deserializer)?
                .map(|StringifiedInt(value)| narrow(value))
                .transpose()
        }
    }
}

/// `#[serde(with = ...)]` adapter: `bool` <-> [`PresenceBool`]
pub mod presence_bool {
    use super::PresenceBool;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        PresenceBool(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        PresenceBool::deserialize(deserializer).map(bool::from)
    }

    /// Same as the parent module, for `Option` fields
    pub mod option {
        use super::super::PresenceBool;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.serialize_some(&PresenceBool(*v)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
            Ok(Option::<PresenceBool>::deserialize(deserializer)?.map(bool::from))
        }
    }
}

/// `#[serde(with = ...)]` adapter: `bool` <-> [`LiteralBool`]
pub mod literal_bool {
    use super::LiteralBool;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        LiteralBool(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        LiteralBool::deserialize(deserializer).map(bool::from)
    }

    /// Same as the parent module, for `Option` fields
    pub mod option {
        use super::super::LiteralBool;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.serialize_some(&LiteralBool(*v)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
            Ok(Option::<LiteralBool>::deserialize(deserializer)?.map(bool::from))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stringified_int_decode() {
        assert_eq!(StringifiedInt::decode("300").unwrap(), StringifiedInt(300));
        assert_eq!(StringifiedInt::decode("-3").unwrap(), StringifiedInt(-3));
        assert_eq!(StringifiedInt::decode("").unwrap(), StringifiedInt(0));
        assert!(matches!(
            StringifiedInt::decode("3s"),
            Err(Error::MalformedValue(_))
        ));
        assert!(matches!(
            StringifiedInt::decode(" 3"),
            Err(Error::MalformedValue(_))
        ));
    }

    #[test]
    fn test_stringified_int_zero_is_empty_on_the_wire() {
        assert_eq!(StringifiedInt(0).encode(), "");
        assert_eq!(StringifiedInt::decode(&StringifiedInt(0).encode()).unwrap(), StringifiedInt(0));
    }

    #[test]
    fn test_stringified_int_round_trips() {
        for n in [1_i64, 2, 15, 60, 300, 86_400, i64::from(u32::MAX), i64::MAX] {
            let wire = StringifiedInt(n).encode();
            assert_eq!(StringifiedInt::decode(&wire).unwrap().0, n, "wire form {wire:?}");
        }
    }

    #[test]
    fn test_stringified_int_rejects_json_numbers() {
        let result: std::result::Result<StringifiedInt, _> = serde_json::from_value(json!(300));
        assert!(result.is_err());
    }

    #[test]
    fn test_presence_bool() {
        assert_eq!(PresenceBool(true).encode(), "Y");
        assert_eq!(PresenceBool(false).encode(), "N");
        for b in [true, false] {
            assert_eq!(PresenceBool::decode(PresenceBool(b).encode()).unwrap().0, b);
        }
        for bad in ["y", "n", "true", "", "YES", "1"] {
            assert!(
                matches!(PresenceBool::decode(bad), Err(Error::MalformedValue(_))),
                "{bad:?} must be rejected"
            );
        }
    }

    #[test]
    fn test_literal_bool() {
        assert_eq!(LiteralBool(true).encode(), "true");
        assert_eq!(LiteralBool(false).encode(), "false");
        for b in [true, false] {
            assert_eq!(LiteralBool::decode(LiteralBool(b).encode()).unwrap().0, b);
        }
        for bad in ["True", "Y", "N", "", "1", "0"] {
            assert!(matches!(LiteralBool::decode(bad), Err(Error::MalformedValue(_))));
        }
    }

    #[test]
    fn test_literal_bool_is_a_json_string() {
        assert_eq!(serde_json::to_value(LiteralBool(true)).unwrap(), json!("true"));
        let native: std::result::Result<LiteralBool, _> = serde_json::from_value(json!(true));
        assert!(native.is_err(), "a native JSON boolean is not the declared wire form");
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Fields {
        #[serde(with = "stringified_int")]
        ttl: u32,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "stringified_int::option"
        )]
        serve_count: Option<u32>,
        #[serde(with = "presence_bool")]
        active: bool,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "literal_bool::option"
        )]
        eligible: Option<bool>,
    }

    #[test]
    fn test_with_modules_on_native_fields() {
        let value = Fields {
            ttl: 0,
            serve_count: Some(2),
            active: true,
            eligible: None,
        };
        let wire = serde_json::to_value(&value).unwrap();
        assert_eq!(wire, json!({"ttl": "", "serve_count": "2", "active": "Y"}));

        let back: Fields = serde_json::from_value(wire).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_with_modules_reject_out_of_range() {
        let result: std::result::Result<Fields, _> =
            serde_json::from_value(json!({"ttl": "-1", "active": "N"}));
        assert!(result.is_err());
    }
}
