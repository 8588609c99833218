//! Runtime values of query-model fields.
//!
//! The compiler never inspects a query struct generically. Instead a query
//! model hands out a [`FieldValue`] per field: a single scalar, a sequence of
//! scalars, or an optional scalar that may be absent.

use std::borrow::Cow;
use std::fmt;

/// A single query value, borrowed from the query model where possible.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'a> {
    Text(Cow<'a, str>),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl Scalar<'_> {
    /// Formats the value the way it is sent to the engine.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Scalar::Text(s) => Cow::Borrowed(s.as_ref()),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::UInt(n) => write!(f, "{}", n),
            Scalar::Float(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// The value of one query-model field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Scalar(Scalar<'a>),
    Sequence(Vec<Scalar<'a>>),
    Optional(Option<Scalar<'a>>),
}

impl<'a> FieldValue<'a> {
    /// The value for a field the model does not know.
    pub fn absent() -> Self {
        FieldValue::Optional(None)
    }

    /// Returns the scalars to visit: every element of a sequence, a present
    /// optional, or the scalar itself.
    pub fn scalars(&self) -> impl Iterator<Item = &Scalar<'a>> {
        let slice: &[Scalar<'a>] = match self {
            FieldValue::Scalar(s) => std::slice::from_ref(s),
            FieldValue::Sequence(items) => items,
            FieldValue::Optional(Some(s)) => std::slice::from_ref(s),
            FieldValue::Optional(None) => &[],
        };
        slice.iter()
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Optional(None))
    }
}

/// Conversion of a single field type into a [`Scalar`].
///
/// Implement this for custom leaf types (enums, ids) used in query models.
/// It covers `Option<T>` and `Vec<T>` fields. A field of the bare type also
/// needs an [`IntoFieldValue`] impl that wraps the scalar:
///
/// ```
/// use docquery::{FieldValue, IntoFieldValue, Scalar, ToScalar};
/// use std::borrow::Cow;
///
/// enum Color { Red, Blue }
///
/// impl ToScalar for Color {
///     fn to_scalar(&self) -> Scalar<'_> {
///         Scalar::Text(Cow::Borrowed(match self {
///             Color::Red => "red",
///             Color::Blue => "blue",
///         }))
///     }
/// }
///
/// impl IntoFieldValue for Color {
///     fn field_value(&self) -> FieldValue<'_> {
///         FieldValue::Scalar(self.to_scalar())
///     }
/// }
///
/// assert_eq!(Color::Blue.to_scalar().to_text(), "blue");
/// assert_eq!(Color::Red.field_value().scalars().count(), 1);
/// assert_eq!(Some(Color::Red).field_value().scalars().count(), 1);
/// assert_eq!(vec![Color::Red, Color::Blue].field_value().scalars().count(), 2);
/// ```
pub trait ToScalar {
    fn to_scalar(&self) -> Scalar<'_>;
}

/// Conversion of a query-model field into a [`FieldValue`].
///
/// Implemented for scalar types, `Option<T>` and sequences of
/// [`ToScalar`] types. `#[derive(QueryModel)]` calls this for every
/// annotated field.
pub trait IntoFieldValue {
    fn field_value(&self) -> FieldValue<'_>;
}

impl ToScalar for String {
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::Text(Cow::Borrowed(self.as_str()))
    }
}

impl ToScalar for str {
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::Text(Cow::Borrowed(self))
    }
}

impl ToScalar for Cow<'_, str> {
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::Text(Cow::Borrowed(self.as_ref()))
    }
}

impl ToScalar for char {
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::Text(Cow::Owned(self.to_string()))
    }
}

impl ToScalar for bool {
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::Bool(*self)
    }
}

impl<T: ToScalar + ?Sized> ToScalar for &T {
    fn to_scalar(&self) -> Scalar<'_> {
        (**self).to_scalar()
    }
}

impl<T: ToScalar + ?Sized> ToScalar for Box<T> {
    fn to_scalar(&self) -> Scalar<'_> {
        (**self).to_scalar()
    }
}

macro_rules! numeric_scalar {
    ($variant:ident as $target:ty => $($ty:ty),+) => {
        $(
            impl ToScalar for $ty {
                fn to_scalar(&self) -> Scalar<'_> {
                    Scalar::$variant(*self as $target)
                }
            }
        )+
    };
}

numeric_scalar!(Int as i64 => i8, i16, i32, i64, isize);
numeric_scalar!(UInt as u64 => u8, u16, u32, u64, usize);
numeric_scalar!(Float as f64 => f32, f64);

macro_rules! scalar_field_value {
    ($($ty:ty),+) => {
        $(
            impl IntoFieldValue for $ty {
                fn field_value(&self) -> FieldValue<'_> {
                    FieldValue::Scalar(self.to_scalar())
                }
            }
        )+
    };
}

scalar_field_value!(
    String, str, Cow<'_, str>, char, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize,
    f32, f64
);

impl<T: ToScalar> IntoFieldValue for Option<T> {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Optional(self.as_ref().map(ToScalar::to_scalar))
    }
}

impl<T: ToScalar> IntoFieldValue for Vec<T> {
    fn field_value(&self) -> FieldValue<'_> {
        self.as_slice().field_value()
    }
}

impl<T: ToScalar> IntoFieldValue for [T] {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Sequence(self.iter().map(ToScalar::to_scalar).collect())
    }
}

impl<T: IntoFieldValue + ?Sized> IntoFieldValue for &T {
    fn field_value(&self) -> FieldValue<'_> {
        (**self).field_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_text_formatting() {
        assert_eq!(Scalar::Int(-3).to_text(), "-3");
        assert_eq!(Scalar::UInt(7).to_text(), "7");
        assert_eq!(Scalar::Float(1.5).to_text(), "1.5");
        assert_eq!(Scalar::Float(2.0).to_text(), "2");
        assert_eq!(Scalar::Bool(true).to_text(), "true");
        assert_eq!("abc".to_scalar().to_text(), "abc");
    }

    enum Size {
        Small,
        Large,
    }

    impl ToScalar for Size {
        fn to_scalar(&self) -> Scalar<'_> {
            Scalar::Text(Cow::Borrowed(match self {
                Size::Small => "s",
                Size::Large => "l",
            }))
        }
    }

    impl IntoFieldValue for Size {
        fn field_value(&self) -> FieldValue<'_> {
            FieldValue::Scalar(self.to_scalar())
        }
    }

    #[test]
    fn custom_leaf_type_in_every_position() {
        fn texts(value: FieldValue<'_>) -> Vec<String> {
            value.scalars().map(|s| s.to_text().into_owned()).collect()
        }
        assert_eq!(texts(Size::Large.field_value()), ["l"]);
        assert_eq!(texts(Some(Size::Small).field_value()), ["s"]);
        assert!(None::<Size>.field_value().is_absent());
        assert_eq!(texts(vec![Size::Small, Size::Large].field_value()), ["s", "l"]);
    }

    #[test]
    fn scalar_field_is_visited_once() {
        let value = 42u16.field_value();
        let visited: Vec<_> = value.scalars().collect();
        assert_eq!(visited, [&Scalar::UInt(42)]);
    }

    #[test]
    fn sequence_visits_every_element() {
        let tags = vec!["a".to_string(), "b".to_string()];
        let value = tags.field_value();
        let texts: Vec<_> = value.scalars().map(|s| s.to_text().into_owned()).collect();
        assert_eq!(texts, ["a", "b"]);
    }

    #[test]
    fn optional_visits_only_when_present() {
        let none: Option<i32> = None;
        assert!(none.field_value().is_absent());
        assert_eq!(none.field_value().scalars().count(), 0);

        let some = Some(5i32);
        assert_eq!(some.field_value().scalars().count(), 1);
    }

    #[test]
    fn references_delegate() {
        let s = "x";
        let r = &s;
        assert_eq!(r.field_value(), FieldValue::Scalar(Scalar::Text(Cow::Borrowed("x"))));
    }
}
