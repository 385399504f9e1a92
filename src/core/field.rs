//! Typed key/value fields
//!
//! A [`Field`] is a key plus a closed [`FieldValue`] enum. Primitive payloads
//! live inline in the enum; only the catch-all [`AnyValue`] holds a shared
//! reference, formatted lazily when a record is encoded.
//!
//! Fields are built either with the typed constructors (`Field::string`,
//! `Field::int`, ...) or from a flat alternating key/value slice of [`Arg`]s.
//! Both paths produce identical fields for equivalent input.

use chrono::{DateTime, FixedOffset, Local, Utc};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Value recorded for a trailing key that has no value.
pub const MISSING_VALUE: &str = "MISSING";

/// Opaque value rendered through `Display`, or `Debug` when the type only
/// provides that.
#[derive(Clone)]
pub enum AnyValue {
    Display(Arc<dyn fmt::Display + Send + Sync>),
    Debug(Arc<dyn fmt::Debug + Send + Sync>),
}

impl AnyValue {
    pub fn display<T: fmt::Display + Send + Sync + 'static>(value: T) -> Self {
        AnyValue::Display(Arc::new(value))
    }

    pub fn debug<T: fmt::Debug + Send + Sync + 'static>(value: T) -> Self {
        AnyValue::Debug(Arc::new(value))
    }
}

/// Best-effort stringification shared by every encoder.
impl fmt::Display for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyValue::Display(v) => v.fmt(f),
            AnyValue::Debug(v) => write!(f, "{:?}", v),
        }
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyValue::Display(v) => write!(f, "Display({})", v),
            AnyValue::Debug(v) => write!(f, "Debug({:?})", v),
        }
    }
}

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

/// Payload of a field. Exactly one kind per value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(Cow<'static, str>),
    Int(i64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<FixedOffset>),
    Error(Cow<'static, str>),
    Any(AnyValue),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Str(Cow::Borrowed(""))
    }
}

impl FieldValue {
    /// Unsigned values above `i64::MAX` are kept exact as a decimal string.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(v) => FieldValue::Int(v),
            Err(_) => FieldValue::Str(Cow::Owned(value.to_string())),
        }
    }

    /// Short kind name, mostly for diagnostics and tests.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Str(_) => "string",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Bool(_) => "bool",
            FieldValue::Duration(_) => "duration",
            FieldValue::Time(_) => "time",
            FieldValue::Error(_) => "error",
            FieldValue::Any(_) => "any",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) | FieldValue::Error(s) => f.write_str(s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Duration(d) => write!(f, "{:?}", d),
            FieldValue::Time(t) => f.write_str(&t.to_rfc3339()),
            FieldValue::Any(v) => v.fmt(f),
        }
    }
}

/// One key/value pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    pub key: Cow<'static, str>,
    pub value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<Cow<'static, str>>, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
        Self::new(key, FieldValue::Str(value.into()))
    }

    pub fn int(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, FieldValue::Int(value))
    }

    pub fn uint(key: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self::new(key, FieldValue::from_u64(value))
    }

    pub fn float(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::new(key, FieldValue::Float(value))
    }

    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    pub fn duration(key: impl Into<Cow<'static, str>>, value: Duration) -> Self {
        Self::new(key, FieldValue::Duration(value))
    }

    pub fn time(key: impl Into<Cow<'static, str>>, value: impl Into<DateTime<FixedOffset>>) -> Self {
        Self::new(key, FieldValue::Time(value.into()))
    }

    /// Error field under the conventional `error` key.
    pub fn error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Self::new("error", FieldValue::Error(Cow::Owned(err.to_string())))
    }

    pub fn display<T>(key: impl Into<Cow<'static, str>>, value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Self::new(key, FieldValue::Any(AnyValue::display(value)))
    }

    pub fn debug<T>(key: impl Into<Cow<'static, str>>, value: T) -> Self
    where
        T: fmt::Debug + Send + Sync + 'static,
    {
        Self::new(key, FieldValue::Any(AnyValue::debug(value)))
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Hand the payload to `enc`. This is the only place the value kind is
    /// inspected during encoding.
    #[inline]
    pub fn encode<E: FieldEncoder + ?Sized>(&self, enc: &mut E) {
        let key = self.key.as_ref();
        match &self.value {
            FieldValue::Str(s) => enc.encode_str(key, s),
            FieldValue::Int(i) => enc.encode_int(key, *i),
            FieldValue::Float(v) => enc.encode_float(key, *v),
            FieldValue::Bool(b) => enc.encode_bool(key, *b),
            FieldValue::Duration(d) => enc.encode_duration(key, *d),
            FieldValue::Time(t) => enc.encode_time(key, t),
            FieldValue::Error(msg) => enc.encode_error(key, msg),
            FieldValue::Any(v) => enc.encode_any(key, v),
        }
    }
}

/// Receives typed field values from [`Field::encode`].
pub trait FieldEncoder {
    fn encode_str(&mut self, key: &str, value: &str);
    fn encode_int(&mut self, key: &str, value: i64);
    fn encode_float(&mut self, key: &str, value: f64);
    fn encode_bool(&mut self, key: &str, value: bool);
    fn encode_duration(&mut self, key: &str, value: Duration);
    fn encode_time(&mut self, key: &str, value: &DateTime<FixedOffset>);
    fn encode_error(&mut self, key: &str, message: &str);
    fn encode_any(&mut self, key: &str, value: &AnyValue);
}

/// One element of an alternating key/value argument list.
///
/// Conversions exist for strings, integers, floats, `bool`, `Duration`,
/// chrono timestamps, `SystemTime`, errors and pre-built [`Field`]s. Other
/// types go through [`Arg::display`] or [`Arg::debug`].
///
/// ```
/// use loghq::{Arg, Field};
///
/// let kvs: &[Arg] = &["method".into(), "GET".into(), "status".into(), 200.into()];
/// let fields = loghq::core::fields_from_kvs(kvs);
/// assert_eq!(fields[1], Field::int("status", 200));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(FieldValue),
    Field(Field),
}

impl Arg {
    pub fn display<T: fmt::Display + Send + Sync + 'static>(value: T) -> Self {
        Arg::Value(FieldValue::Any(AnyValue::display(value)))
    }

    pub fn debug<T: fmt::Debug + Send + Sync + 'static>(value: T) -> Self {
        Arg::Value(FieldValue::Any(AnyValue::debug(value)))
    }

    pub fn error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Arg::Value(FieldValue::Error(Cow::Owned(err.to_string())))
    }

    /// Field holding this argument's value under `key`. A pre-built field
    /// keeps its value and takes the new key.
    pub fn into_field(self, key: impl Into<Cow<'static, str>>) -> Field {
        let key = key.into();
        match self {
            Arg::Value(value) => Field { key, value },
            Arg::Field(field) => Field {
                key,
                value: field.value,
            },
        }
    }

    /// Key text for an argument in a key position.
    fn to_key(&self) -> Cow<'static, str> {
        match self {
            Arg::Value(FieldValue::Str(s)) => s.clone(),
            Arg::Value(value) => Cow::Owned(value.to_string()),
            Arg::Field(field) => field.key.clone(),
        }
    }

    /// Field for an argument in a value position.
    fn to_field(&self, key: Cow<'static, str>) -> Field {
        match self {
            Arg::Value(value) => Field {
                key,
                value: value.clone(),
            },
            Arg::Field(field) => Field {
                key,
                value: field.value.clone(),
            },
        }
    }
}

impl From<FieldValue> for Arg {
    fn from(v: FieldValue) -> Self {
        Arg::Value(v)
    }
}

impl From<Field> for Arg {
    fn from(f: Field) -> Self {
        Arg::Field(f)
    }
}

impl From<AnyValue> for Arg {
    fn from(v: AnyValue) -> Self {
        Arg::Value(FieldValue::Any(v))
    }
}

impl From<&'static str> for Arg {
    fn from(s: &'static str) -> Self {
        Arg::Value(FieldValue::Str(Cow::Borrowed(s)))
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Value(FieldValue::Str(Cow::Owned(s)))
    }
}

impl From<Cow<'static, str>> for Arg {
    fn from(s: Cow<'static, str>) -> Self {
        Arg::Value(FieldValue::Str(s))
    }
}

macro_rules! arg_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(v: $t) -> Self {
                Arg::Value(FieldValue::Int(v as i64))
            }
        })*
    };
}

macro_rules! arg_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(v: $t) -> Self {
                Arg::Value(FieldValue::from_u64(v as u64))
            }
        })*
    };
}

arg_from_signed!(i8, i16, i32, i64, isize);
arg_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Arg {
    fn from(v: f32) -> Self {
        Arg::Value(FieldValue::Float(f64::from(v)))
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Value(FieldValue::Float(v))
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Value(FieldValue::Bool(v))
    }
}

impl From<Duration> for Arg {
    fn from(d: Duration) -> Self {
        Arg::Value(FieldValue::Duration(d))
    }
}

impl From<DateTime<FixedOffset>> for Arg {
    fn from(t: DateTime<FixedOffset>) -> Self {
        Arg::Value(FieldValue::Time(t))
    }
}

impl From<DateTime<Utc>> for Arg {
    fn from(t: DateTime<Utc>) -> Self {
        Arg::Value(FieldValue::Time(t.into()))
    }
}

impl From<DateTime<Local>> for Arg {
    fn from(t: DateTime<Local>) -> Self {
        Arg::Value(FieldValue::Time(t.into()))
    }
}

impl From<SystemTime> for Arg {
    fn from(t: SystemTime) -> Self {
        Arg::from(DateTime::<Utc>::from(t))
    }
}

impl From<std::io::Error> for Arg {
    fn from(e: std::io::Error) -> Self {
        Arg::error(&e)
    }
}

impl From<crate::core::LoggerError> for Arg {
    fn from(e: crate::core::LoggerError) -> Self {
        Arg::error(&e)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Arg {
    fn from(e: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Arg::error(e.as_ref())
    }
}

/// `None` renders as `<nil>`.
impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Arg::Value(FieldValue::Str(Cow::Borrowed("<nil>"))),
        }
    }
}

/// Walk an alternating key/value list, producing one field per pair. A
/// trailing key with no value yields a `"MISSING"` string field.
pub(crate) fn for_each_kv(kvs: &[Arg], mut f: impl FnMut(Field)) {
    for pair in kvs.chunks(2) {
        let key = pair[0].to_key();
        match pair.get(1) {
            Some(value) => f(value.to_field(key)),
            None => f(Field {
                key,
                value: FieldValue::Str(Cow::Borrowed(MISSING_VALUE)),
            }),
        }
    }
}

/// Collect an alternating key/value list into fields.
pub fn fields_from_kvs(kvs: &[Arg]) -> Vec<Field> {
    let mut fields = Vec::with_capacity(kvs.len().div_ceil(2));
    for_each_kv(kvs, |field| fields.push(field));
    fields
}
