//! Variant values - scalar values handed across the host boundary
//!
//! Host property getters return one of five primitive kinds. The inspector
//! only ever renders them as text, but the marshalling form must carry them
//! back and forth without loss.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A primitive value read from the host document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(#[serde(with = "float_repr")] f64),
    String(String),
}

impl Variant {
    /// Get the kind name used in the marshalling form
    pub fn type_name(&self) -> &'static str {
        match self {
            Variant::Bool(_) => "bool",
            Variant::Int(_) => "int",
            Variant::UInt(_) => "uint",
            Variant::Double(_) => "double",
            Variant::String(_) => "string",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Bool(b) => write!(f, "{}", b),
            Variant::Int(i) => write!(f, "{}", i),
            Variant::UInt(u) => write!(f, "{}", u),
            // Debug keeps the fractional part: 1.0 rather than 1
            Variant::Double(d) => write!(f, "{:?}", d),
            Variant::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Bool(value)
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Variant::Int(value)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Variant::Double(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::String(value)
    }
}

/// Serde form of `f64` that keeps non-finite values.
///
/// Finite values are plain numbers. Infinities and NaN are written as the
/// strings `"inf"`, `"-inf"` and `"nan"`, which JSON has no number for.
pub mod float_repr {
    use serde::{de, Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_nan() {
            serializer.serialize_str("nan")
        } else if value.is_infinite() {
            serializer.serialize_str(if value.is_sign_positive() { "inf" } else { "-inf" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FloatVisitor;

        impl<'de> de::Visitor<'de> for FloatVisitor {
            type Value = f64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number or one of \"inf\", \"-inf\", \"nan\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(v as f64)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(v as f64)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                match v {
                    "inf" => Ok(f64::INFINITY),
                    "-inf" => Ok(f64::NEG_INFINITY),
                    "nan" => Ok(f64::NAN),
                    _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
                }
            }
        }

        deserializer.deserialize_any(FloatVisitor)
    }
}

/// The marshalling boundary between script values and host values.
pub mod bridge {
    use super::*;

    /// Encode a variant into its marshalled form
    pub fn marshal(value: &Variant) -> Result<String> {
        serde_json::to_string(value).map_err(|e| Error::Bridge(e.to_string()))
    }

    /// Decode a marshalled variant
    pub fn unmarshal(encoded: &str) -> Result<Variant> {
        serde_json::from_str(encoded).map_err(|e| Error::Bridge(e.to_string()))
    }

    /// Pass a value across the boundary and back
    pub fn round_trip(value: &Variant) -> Result<Variant> {
        let encoded = marshal(value)?;
        tracing::trace!("marshalled {} as {}", value.type_name(), encoded);
        unmarshal(&encoded)
    }

    /// The acceptance values every bridge must carry unchanged
    pub fn acceptance_values() -> Vec<Variant> {
        vec![
            Variant::Bool(true),
            Variant::Bool(false),
            Variant::Int(-17),
            Variant::UInt(u64::MAX),
            Variant::Double(-548993.271993),
            Variant::String(" Another \n\r Test! $%&\" ".to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::bridge::*;
    use super::*;

    #[test]
    fn test_string_survives_bridge() {
        let value = Variant::from(" Another \n\r Test! $%&\" ");
        assert_eq!(round_trip(&value).unwrap(), value);
    }

    #[test]
    fn test_double_survives_bridge() {
        let value = Variant::Double(-548993.271993);
        match round_trip(&value).unwrap() {
            Variant::Double(d) => assert_eq!(d, -548993.271993),
            other => panic!("expected double, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_doubles_survive_bridge() {
        for value in [f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(round_trip(&Variant::Double(value)).unwrap(), Variant::Double(value));
        }
        assert_eq!(marshal(&Variant::Double(f64::INFINITY)).unwrap(), r#"{"double":"inf"}"#);

        match round_trip(&Variant::Double(f64::NAN)).unwrap() {
            Variant::Double(d) => assert!(d.is_nan()),
            other => panic!("expected double, got {:?}", other),
        }
    }

    #[test]
    fn test_double_accepts_integer_form() {
        assert_eq!(unmarshal(r#"{"double":3}"#).unwrap(), Variant::Double(3.0));
        assert!(unmarshal(r#"{"double":"infinity"}"#).is_err());
    }

    #[test]
    fn test_bools_survive_bridge() {
        assert_eq!(round_trip(&Variant::Bool(true)).unwrap(), Variant::Bool(true));
        assert_eq!(round_trip(&Variant::Bool(false)).unwrap(), Variant::Bool(false));
    }

    #[test]
    fn test_unsigned_stays_unsigned() {
        let value = Variant::UInt(42);
        assert_eq!(round_trip(&value).unwrap(), Variant::UInt(42));
        assert_ne!(round_trip(&value).unwrap(), Variant::Int(42));
    }

    #[test]
    fn test_display() {
        assert_eq!(Variant::Bool(true).to_string(), "true");
        assert_eq!(Variant::Int(-3).to_string(), "-3");
        assert_eq!(Variant::Double(1.0).to_string(), "1.0");
        assert_eq!(Variant::Double(-548993.271993).to_string(), "-548993.271993");
        assert_eq!(Variant::from("frame").to_string(), "frame");
    }

    #[test]
    fn test_unmarshal_rejects_garbage() {
        assert!(unmarshal("{\"complex\": 1}").is_err());
    }
}
