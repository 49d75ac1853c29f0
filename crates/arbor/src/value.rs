//! Dynamic values exchanged between fields and model properties.

use std::{any::type_name, fmt};

use serde::{Deserialize, Serialize};

use crate::error::BindingError;

/// Dynamic value carried between UI fields and model properties.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// No value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl Value {
    /// Human-readable variant name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool(_) => "Bool",
            Self::Int(_) => "Int",
            Self::Float(_) => "Float",
            Self::Text(_) => "Text",
        }
    }

    /// True for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render the value the way a text field shows it. `Null` is empty.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Convert a typed value into a [`Value`].
pub trait IntoValue {
    /// Encode the value.
    fn into_value(self) -> Value;
}

/// Convert a [`Value`] into a typed value.
pub trait FromValue: Sized {
    /// Decode the value.
    fn from_value(v: &Value) -> Result<Self, BindingError>;
}

/// Build a type mismatch error.
fn mismatch<T>(got: &Value) -> BindingError {
    BindingError::conversion(format!(
        "expected {}, got {}",
        type_name::<T>(),
        got.kind_name()
    ))
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

/// Implement `IntoValue` for integer primitives that widen into i64.
macro_rules! impl_int_into_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::Int(i64::from(self))
                }
            }
        )+
    };
}

impl_int_into_value!(i8, i16, i32, i64, u8, u16, u32);

impl<T> IntoValue for Option<T>
where
    T: IntoValue,
{
    fn into_value(self) -> Value {
        match self {
            Some(value) => value.into_value(),
            None => Value::Null,
        }
    }
}

impl FromValue for Value {
    fn from_value(v: &Value) -> Result<Self, BindingError> {
        Ok(v.clone())
    }
}

impl FromValue for bool {
    fn from_value(v: &Value) -> Result<Self, BindingError> {
        match v {
            Value::Bool(value) => Ok(*value),
            Value::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(mismatch::<Self>(v)),
            },
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromValue for String {
    fn from_value(v: &Value) -> Result<Self, BindingError> {
        match v {
            Value::Null => Err(mismatch::<Self>(v)),
            Value::Text(text) => Ok(text.clone()),
            other => Ok(other.to_string()),
        }
    }
}

/// Implement `FromValue` for integer primitives, parsing text when needed.
macro_rules! impl_int_from_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(v: &Value) -> Result<Self, BindingError> {
                    let wide = match v {
                        Value::Int(value) => *value,
                        Value::Text(text) => text.trim().parse::<i64>().map_err(|_| {
                            BindingError::conversion(format!(
                                "`{text}` is not a valid {}",
                                stringify!($ty)
                            ))
                        })?,
                        other => return Err(mismatch::<$ty>(other)),
                    };
                    <$ty>::try_from(wide).map_err(|_| {
                        BindingError::conversion(format!(
                            "value {wide} out of range for {}",
                            stringify!($ty)
                        ))
                    })
                }
            }
        )+
    };
}

impl_int_from_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(v: &Value) -> Result<Self, BindingError> {
        match v {
            Value::Float(value) => Ok(*value),
            Value::Int(value) => Ok(*value as Self),
            Value::Text(text) => text
                .trim()
                .parse::<Self>()
                .map_err(|_| BindingError::conversion(format!("`{text}` is not a valid f64"))),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl<T> FromValue for Option<T>
where
    T: FromValue,
{
    /// `Null` and blank text both decode to `None`.
    fn from_value(v: &Value) -> Result<Self, BindingError> {
        match v {
            Value::Null => Ok(None),
            Value::Text(text) if text.trim().is_empty() => Ok(None),
            _ => T::from_value(v).map(Some),
        }
    }
}
