use std::any::{type_name, Any};
use std::fmt::Display;
use std::str::FromStr;

use crate::error::Error;
use crate::node::Node;
use crate::typeref::{TypeHandle, TypeRegistry};

/// A piece of text that may not exist.
///
/// Attribute values, element text and anything you want to write into a
/// document pass through `Value`. An absent value (an attribute that isn't
/// there) is distinct from an empty one (`name=""`).
///
/// ```rust
/// use fluxml::Value;
///
/// assert_eq!(Value::from(42).as_i32()?, 42);
/// assert_eq!(Value::from(true).as_str()?, "true");
/// assert!(!Value::absent().exists());
/// assert!(Value::absent().as_i32().is_err());
/// # Ok::<(), fluxml::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Value {
    raw: Option<String>,
}

impl Value {
    /// A present value.
    pub fn new(raw: impl Into<String>) -> Self {
        Value {
            raw: Some(raw.into()),
        }
    }

    /// The value that does not exist.
    pub fn absent() -> Self {
        Value { raw: None }
    }

    pub fn from_option(raw: Option<String>) -> Self {
        Value { raw }
    }

    /// The member name of an enum, as given by its `Display`.
    pub fn of_enum<E: Display>(member: &E) -> Self {
        Value::new(member.to_string())
    }

    /// The full name of a type, suitable for [`Value::as_type`].
    pub fn of_type<T: ?Sized>() -> Self {
        Value::new(type_name::<T>())
    }

    pub fn exists(&self) -> bool {
        self.raw.is_some()
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Present and zero-length.
    pub fn is_empty(&self) -> bool {
        self.raw.as_deref() == Some("")
    }

    /// The text. Fails only when absent; an empty value is fine.
    pub fn as_str(&self) -> Result<&str, Error> {
        self.raw.as_deref().ok_or(Error::AbsentValue)
    }

    pub fn as_string(&self) -> Result<String, Error> {
        self.as_str().map(|s| s.to_string())
    }

    // typed coercions refuse absent and empty values
    fn present(&self) -> Result<&str, Error> {
        match self.raw.as_deref() {
            None => Err(Error::AbsentValue),
            Some("") => Err(Error::EmptyValue),
            Some(raw) => Ok(raw),
        }
    }

    /// Parse into any type with a textual representation.
    pub fn parse<T>(&self) -> Result<T, Error>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.present()?;
        raw.parse::<T>().map_err(|e| Error::InvalidValue {
            value: raw.to_string(),
            target: type_name::<T>(),
            reason: e.to_string(),
        })
    }

    /// `true` or `false`, in any case.
    pub fn as_bool(&self) -> Result<bool, Error> {
        let raw = self.present()?;
        if raw.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(Error::InvalidValue {
                value: raw.to_string(),
                target: "bool",
                reason: "expected true or false".to_string(),
            })
        }
    }

    pub fn as_i8(&self) -> Result<i8, Error> {
        self.parse()
    }

    pub fn as_i16(&self) -> Result<i16, Error> {
        self.parse()
    }

    pub fn as_i32(&self) -> Result<i32, Error> {
        self.parse()
    }

    pub fn as_i64(&self) -> Result<i64, Error> {
        self.parse()
    }

    pub fn as_u8(&self) -> Result<u8, Error> {
        self.parse()
    }

    pub fn as_u16(&self) -> Result<u16, Error> {
        self.parse()
    }

    pub fn as_u32(&self) -> Result<u32, Error> {
        self.parse()
    }

    pub fn as_u64(&self) -> Result<u64, Error> {
        self.parse()
    }

    pub fn as_f32(&self) -> Result<f32, Error> {
        self.parse()
    }

    pub fn as_f64(&self) -> Result<f64, Error> {
        self.parse()
    }

    /// The first character.
    pub fn as_char(&self) -> Result<char, Error> {
        let raw = self.present()?;
        raw.chars().next().ok_or(Error::EmptyValue)
    }

    /// Parse an enum member, falling back to `default` when the value is
    /// absent, empty or names no member.
    pub fn as_enum<E: FromStr>(&self, default: E) -> E {
        match self.present() {
            Ok(raw) => raw.parse().unwrap_or(default),
            Err(_) => default,
        }
    }

    /// Look the value up as a type name.
    pub fn as_type(&self, registry: &TypeRegistry) -> Result<TypeHandle, Error> {
        let raw = self.present()?;
        registry
            .get(raw)
            .ok_or_else(|| Error::ClassNotFound(raw.to_string()))
    }

    /// Construct a default instance of the type named by this value.
    pub fn instantiate<T: Any>(&self, registry: &TypeRegistry) -> Result<T, Error> {
        let handle = self.as_type(registry)?;
        let instance = handle.instantiate()?;
        instance
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| Error::Instantiation(handle.name().to_string()))
    }

    /// Follow a dotted path of child names, starting at `start`.
    ///
    /// Missing steps yield a placeholder rather than an error. An absent
    /// value is treated as the empty path segment `""`.
    pub fn resolve(&self, start: &Node) -> Node {
        let path = self.raw.as_deref().unwrap_or("");
        let mut node = start.clone();
        for segment in path.split('.') {
            node = node.try_child(segment);
        }
        node
    }
}

impl From<String> for Value {
    fn from(raw: String) -> Self {
        Value::new(raw)
    }
}

impl From<&str> for Value {
    fn from(raw: &str) -> Self {
        Value::new(raw)
    }
}

impl From<&String> for Value {
    fn from(raw: &String) -> Self {
        Value::new(raw.as_str())
    }
}

impl From<Option<String>> for Value {
    fn from(raw: Option<String>) -> Self {
        Value::from_option(raw)
    }
}

impl From<Option<&str>> for Value {
    fn from(raw: Option<&str>) -> Self {
        Value::from_option(raw.map(|s| s.to_string()))
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

macro_rules! value_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::new(v.to_string())
                }
            }
        )*
    };
}

value_from_display!(bool, char, i8, i16, i32, i64, u8, u16, u32, u64);

// debug formatting gives a shortest round-trip form that always has a
// decimal point or exponent
impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::new(format!("{:?}", v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::new(format!("{:?}", v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;

    #[derive(Debug, PartialEq)]
    enum Color {
        Red,
        Green,
    }

    impl FromStr for Color {
        type Err = ();

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "Red" => Ok(Color::Red),
                "Green" => Ok(Color::Green),
                _ => Err(()),
            }
        }
    }

    #[rstest]
    #[case(Value::from(true), "true")]
    #[case(Value::from(-7i8), "-7")]
    #[case(Value::from(300i16), "300")]
    #[case(Value::from(42u64), "42")]
    #[case(Value::from(1.0f64), "1.0")]
    #[case(Value::from(0.25f32), "0.25")]
    #[case(Value::from('x'), "x")]
    fn test_canonical_form(#[case] value: Value, #[case] expected: &str) {
        assert!(value.exists());
        assert_eq!(value.as_str().unwrap(), expected);
    }

    #[test]
    fn test_empty_string_is_not_absent() {
        let value = Value::new("");
        assert!(value.exists());
        assert!(value.is_empty());
        assert_eq!(value.as_str().unwrap(), "");
        assert!(matches!(value.as_i32(), Err(Error::EmptyValue)));
    }

    #[test]
    fn test_absent_fails_as_str() {
        let value = Value::absent();
        assert!(matches!(value.as_str(), Err(Error::AbsentValue)));
        assert!(matches!(value.as_string(), Err(Error::AbsentValue)));
    }

    fn typed_coercions(value: &Value) -> Vec<Result<(), Error>> {
        let registry = TypeRegistry::new();
        vec![
            value.as_bool().map(drop),
            value.as_i8().map(drop),
            value.as_i16().map(drop),
            value.as_i32().map(drop),
            value.as_i64().map(drop),
            value.as_u8().map(drop),
            value.as_u16().map(drop),
            value.as_u32().map(drop),
            value.as_u64().map(drop),
            value.as_f32().map(drop),
            value.as_f64().map(drop),
            value.as_char().map(drop),
            value.parse::<u128>().map(drop),
            value.parse::<std::net::Ipv4Addr>().map(drop),
            value.as_type(&registry).map(drop),
            value.instantiate::<String>(&registry).map(drop),
        ]
    }

    #[rstest]
    #[case::absent(Value::absent())]
    #[case::empty(Value::new(""))]
    fn test_typed_coercions_fail_without_text(#[case] value: Value) {
        for result in typed_coercions(&value) {
            let err = result.unwrap_err();
            if value.exists() {
                assert!(matches!(err, Error::EmptyValue), "{:?}", err);
            } else {
                assert!(matches!(err, Error::AbsentValue), "{:?}", err);
            }
            assert_eq!(err.kind(), ErrorKind::Parse);
        }
        assert_eq!(value.as_enum(7u8), 7);
    }

    #[rstest]
    #[case("true", true)]
    #[case("TRUE", true)]
    #[case("False", false)]
    fn test_as_bool(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(Value::new(raw).as_bool().unwrap(), expected);
    }

    #[test]
    fn test_as_bool_rejects_other_text() {
        let err = Value::new("yes").as_bool().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_overflow_is_invalid() {
        let err = Value::new("300").as_u8().unwrap_err();
        assert!(matches!(err, Error::InvalidValue { target: "u8", .. }));
    }

    #[test]
    fn test_float_round_trip() {
        let value = Value::from(1e20f64);
        assert_eq!(value.as_f64().unwrap(), 1e20);
        assert!(Value::from(f64::NAN).as_f64().unwrap().is_nan());
    }

    #[test]
    fn test_as_char_takes_first() {
        assert_eq!(Value::new("xyz").as_char().unwrap(), 'x');
    }

    #[test]
    fn test_as_enum_falls_back() {
        assert_eq!(Value::new("Green").as_enum(Color::Red), Color::Green);
        assert_eq!(Value::new("Blue").as_enum(Color::Red), Color::Red);
        assert_eq!(Value::new("").as_enum(Color::Green), Color::Green);
        assert_eq!(Value::absent().as_enum(Color::Green), Color::Green);
    }

    #[test]
    fn test_option_conversion() {
        assert!(!Value::from(None::<&str>).exists());
        assert_eq!(Value::from(Some("a")).raw(), Some("a"));
    }
}
