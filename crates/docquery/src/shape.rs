//! Static type descriptions.
//!
//! A [`Shape`] tells the type mapper and the descriptor builders what a Rust
//! type looks like without any runtime reflection. Shapes are produced by the
//! [`Mapped`] trait, which is implemented here for primitives and standard
//! containers and generated for structs by `#[derive(Mapped)]`.
//!
//! Records describe their members lazily through a function pointer, so a
//! self-referential type never has to be expanded eagerly.
//!
//! # Manual Implementation
//!
//! ```
//! use docquery::{Mapped, Member, RecordShape, Shape};
//!
//! struct Product {
//!     caption: String,
//!     price: f64,
//! }
//!
//! impl Mapped for Product {
//!     fn shape() -> Shape {
//!         Shape::Record(RecordShape::of::<Product>(|| {
//!             vec![
//!                 Member::new("caption", <String as Mapped>::shape).search("must, boost=2"),
//!                 Member::new("price", <f64 as Mapped>::shape),
//!             ]
//!         }))
//!     }
//! }
//!
//! let Shape::Record(record) = Product::shape() else { unreachable!() };
//! assert_eq!(record.members().len(), 2);
//! ```

use std::any::TypeId;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// Deferred shape constructor.
pub type ShapeFn = fn() -> Shape;

/// Scalar kinds with a fixed mapping type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Text,
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    /// Any unsigned integer width.
    Unsigned,
}

/// The structure of a type as seen by the mapper.
#[derive(Debug, Clone)]
pub enum Shape {
    Primitive(Primitive),
    /// `Vec<T>`, slices, arrays and sets.
    Sequence(ShapeFn),
    /// `Option<T>`.
    Optional(ShapeFn),
    /// `Box<T>`, `Rc<T>`, `Arc<T>`, `&T`.
    Reference(ShapeFn),
    /// Map and dictionary types.
    Map,
    /// A struct with named members.
    Record(RecordShape),
    /// Anything else; mapped as a keyword.
    Other,
}

impl Shape {
    /// Returns the record behind at most one optional level.
    pub fn as_record(&self) -> Option<RecordShape> {
        match self {
            Shape::Record(record) => Some(record.clone()),
            Shape::Optional(inner) => match inner() {
                Shape::Record(record) => Some(record),
                _ => None,
            },
            _ => None,
        }
    }

    /// A readable name for error messages.
    pub fn describe(&self) -> String {
        match self {
            Shape::Primitive(p) => format!("{:?}", p).to_lowercase(),
            Shape::Sequence(_) => "sequence".to_string(),
            Shape::Optional(_) => "optional".to_string(),
            Shape::Reference(_) => "reference".to_string(),
            Shape::Map => "map".to_string(),
            Shape::Record(record) => record.name().to_string(),
            Shape::Other => "other".to_string(),
        }
    }
}

/// A record type: identity, name and member table.
#[derive(Debug, Clone)]
pub struct RecordShape {
    id: TypeId,
    name: &'static str,
    members: fn() -> Vec<Member>,
}

impl RecordShape {
    /// Describes the record `T` with the given member table.
    pub fn of<T: 'static>(members: fn() -> Vec<Member>) -> Self {
        RecordShape {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            members,
        }
    }

    /// Type identity, used for cycle detection and caching.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The Rust type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Members in declaration order.
    pub fn members(&self) -> Vec<Member> {
        (self.members)()
    }
}

/// One member of a record together with its annotations.
#[derive(Debug, Clone)]
pub struct Member {
    name: String,
    wire_name: Option<String>,
    shape: ShapeFn,
    mapping: Option<String>,
    search: Option<String>,
    query: Option<String>,
}

impl Member {
    /// Creates a member whose wire name equals its field name.
    pub fn new(name: impl Into<String>, shape: ShapeFn) -> Self {
        let name = name.into();
        Member {
            wire_name: Some(name.clone()),
            name,
            shape,
            mapping: None,
            search: None,
            query: None,
        }
    }

    /// Sets the serialized name.
    pub fn rename(mut self, wire_name: impl Into<String>) -> Self {
        self.wire_name = Some(wire_name.into());
        self
    }

    /// Marks the member as not serialized; it is left out of mappings and
    /// document descriptors.
    pub fn elide(mut self) -> Self {
        self.wire_name = None;
        self
    }

    /// Attaches a mapping annotation: `type[,analyzer=name]`.
    pub fn mapping(mut self, tag: impl Into<String>) -> Self {
        self.mapping = Some(tag.into());
        self
    }

    /// Attaches a document search annotation:
    /// `role[.strategy][,boost=n][,lang=code][,name=override]`.
    pub fn search(mut self, tag: impl Into<String>) -> Self {
        self.search = Some(tag.into());
        self
    }

    /// Attaches a query-model annotation: `role[,type=t][,name=override]`.
    pub fn query(mut self, tag: impl Into<String>) -> Self {
        self.query = Some(tag.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wire_name(&self) -> Option<&str> {
        self.wire_name.as_deref()
    }

    pub fn shape(&self) -> Shape {
        (self.shape)()
    }

    pub fn mapping_tag(&self) -> Option<&str> {
        self.mapping.as_deref()
    }

    pub fn search_tag(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn query_tag(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

/// Types that can describe their own [`Shape`].
///
/// The default implementation reports [`Shape::Other`], which maps to a
/// keyword. Enums and other leaf types only need an empty impl:
///
/// ```
/// use docquery::{Mapped, Shape};
///
/// enum Status { Open, Closed }
/// impl Mapped for Status {}
///
/// assert!(matches!(Status::shape(), Shape::Other));
/// ```
///
/// Structs normally use `#[derive(Mapped)]`.
pub trait Mapped {
    fn shape() -> Shape {
        Shape::Other
    }
}

macro_rules! primitive_shape {
    ($prim:ident => $($ty:ty),+) => {
        $(
            impl Mapped for $ty {
                fn shape() -> Shape {
                    Shape::Primitive(Primitive::$prim)
                }
            }
        )+
    };
}

primitive_shape!(Text => String, str, Cow<'_, str>);
primitive_shape!(Bool => bool);
primitive_shape!(I8 => i8);
primitive_shape!(I16 => i16);
primitive_shape!(I32 => i32);
primitive_shape!(I64 => i64, isize);
primitive_shape!(F32 => f32);
primitive_shape!(F64 => f64);
primitive_shape!(Unsigned => u8, u16, u32, u64, u128, usize);

impl Mapped for char {}
impl Mapped for i128 {}

impl<T: Mapped> Mapped for Option<T> {
    fn shape() -> Shape {
        Shape::Optional(T::shape)
    }
}

macro_rules! sequence_shape {
    ($($ty:ty),+) => {
        $(
            impl<T: Mapped> Mapped for $ty {
                fn shape() -> Shape {
                    Shape::Sequence(T::shape)
                }
            }
        )+
    };
}

sequence_shape!(Vec<T>, [T], VecDeque<T>, HashSet<T>, BTreeSet<T>);

impl<T: Mapped, const N: usize> Mapped for [T; N] {
    fn shape() -> Shape {
        Shape::Sequence(T::shape)
    }
}

macro_rules! reference_shape {
    ($($ty:ty),+) => {
        $(
            impl<T: Mapped + ?Sized> Mapped for $ty {
                fn shape() -> Shape {
                    Shape::Reference(T::shape)
                }
            }
        )+
    };
}

reference_shape!(Box<T>, Rc<T>, Arc<T>, &T);

impl<K, V, S> Mapped for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::Map
    }
}

impl<K, V> Mapped for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Map
    }
}
