//! Coercion of text into leaf field types.

use std::path::PathBuf;
use std::time::Duration;

use super::duration::parse_duration;
use super::field::{ScalarKind, ValueKind};

/// A type that can be parsed from a single trimmed item of text.
///
/// Implemented for strings, paths, every primitive integer and float,
/// `bool` and [`Duration`]. These are the element types of list fields.
pub trait Scalar: Sized {
    const KIND: ScalarKind;

    fn parse_scalar(raw: &str) -> Result<Self, String>;
}

/// A type a leaf field can hold.
///
/// `sep` is the field's list separator; only list types look at it.
pub trait FromEnv: Sized {
    const KIND: ValueKind;

    fn from_env(raw: &str, sep: &str) -> Result<Self, String>;
}

macro_rules! impl_number {
    ($kind:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: ScalarKind = $kind;

                fn parse_scalar(raw: &str) -> Result<Self, String> {
                    raw.parse::<$ty>()
                        .map_err(|e| format!("parsing {raw:?}: {e}"))
                }
            }

            impl FromEnv for $ty {
                const KIND: ValueKind = ValueKind::Scalar($kind);

                fn from_env(raw: &str, _sep: &str) -> Result<Self, String> {
                    <$ty as Scalar>::parse_scalar(raw)
                }
            }
        )+
    };
}

impl_number!(ScalarKind::Int => i8, i16, i32, i64, i128, isize);
impl_number!(ScalarKind::Uint => u8, u16, u32, u64, u128, usize);
impl_number!(ScalarKind::Float => f32, f64);

macro_rules! impl_from_env_for_scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FromEnv for $ty {
                const KIND: ValueKind = ValueKind::Scalar(<$ty as Scalar>::KIND);

                fn from_env(raw: &str, _sep: &str) -> Result<Self, String> {
                    <$ty as Scalar>::parse_scalar(raw)
                }
            }
        )+
    };
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn parse_scalar(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl Scalar for PathBuf {
    const KIND: ScalarKind = ScalarKind::Text;

    fn parse_scalar(raw: &str) -> Result<Self, String> {
        Ok(PathBuf::from(raw))
    }
}

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn parse_scalar(raw: &str) -> Result<Self, String> {
        match raw.to_ascii_lowercase().as_str() {
            "1" | "t" | "true" => Ok(true),
            "0" | "f" | "false" => Ok(false),
            _ => Err(format!(
                "parsing {raw:?}: expected one of true, false, 1, 0, t, f"
            )),
        }
    }
}

impl Scalar for Duration {
    const KIND: ScalarKind = ScalarKind::Duration;

    fn parse_scalar(raw: &str) -> Result<Self, String> {
        parse_duration(raw).map_err(|e| e.to_string())
    }
}

impl_from_env_for_scalar!(String, PathBuf, bool, Duration);

impl<T: Scalar> FromEnv for Vec<T> {
    const KIND: ValueKind = ValueKind::Seq(T::KIND);

    fn from_env(raw: &str, sep: &str) -> Result<Self, String> {
        raw.split(sep)
            .map(str::trim)
            .enumerate()
            .map(|(i, item)| {
                T::parse_scalar(item).map_err(|e| format!("item {i} ({item:?}): {e}"))
            })
            .collect()
    }
}

/// Optional leaves stay `None` until a value is resolved for them.
impl<T: FromEnv> FromEnv for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn from_env(raw: &str, sep: &str) -> Result<Self, String> {
        T::from_env(raw, sep).map(Some)
    }
}
