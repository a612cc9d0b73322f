//! Low level building blocks: scalar types, element/property definitions and
//! the record decoder.
//!
//! Most users only need [`RecordSink`] (to receive decoded values) and the
//! definition types handed out by [`Header`][crate::Header]. The rest is
//! what the [`ElementReader`][crate::ElementReader] is built out of.

use std::{
    fmt,
    ops,
    str::FromStr,
};

use byteorder::{ByteOrder, LittleEndian};
use derive_more::{Add, AddAssign, From, Sub, SubAssign};
use num_traits::NumCast;


// ===========================================================================
// ===== Scalar types
// ===========================================================================

/// One of the eight scalar types a PLY property can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl ScalarType {
    /// Returns `true` if and only if the type is either `float` or `double`.
    pub fn is_floating_point(&self) -> bool {
        *self == ScalarType::Float || *self == ScalarType::Double
    }

    /// Returns `true` if and only if the type is one of `uchar`, `ushort` or
    /// `uint`.
    pub fn is_unsigned_integer(&self) -> bool {
        match self {
            ScalarType::UChar | ScalarType::UShort | ScalarType::UInt => true,
            _ => false,
        }
    }

    /// Returns `true` if and only if the type is one of `char`, `short` or
    /// `int`.
    pub fn is_signed_integer(&self) -> bool {
        match self {
            ScalarType::Char | ScalarType::Short | ScalarType::Int => true,
            _ => false,
        }
    }

    /// Returns the number of bytes a value of this type occupies in the
    /// binary body.
    pub fn len(&self) -> ScalarLen {
        match self {
            ScalarType::Char => ScalarLen::One,
            ScalarType::UChar => ScalarLen::One,
            ScalarType::Short => ScalarLen::Two,
            ScalarType::UShort => ScalarLen::Two,
            ScalarType::Int => ScalarLen::Four,
            ScalarType::UInt => ScalarLen::Four,
            ScalarType::Float => ScalarLen::Four,
            ScalarType::Double => ScalarLen::Eight,
        }
    }

    /// Returns the type name used in the header (e.g. `short` for `i16`).
    /// This is simply the variant name in lowercase.
    pub fn ply_type_name(&self) -> &'static str {
        match self {
            ScalarType::Char => "char",
            ScalarType::UChar => "uchar",
            ScalarType::Short => "short",
            ScalarType::UShort => "ushort",
            ScalarType::Int => "int",
            ScalarType::UInt => "uint",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
        }
    }
}

impl FromStr for ScalarType {
    type Err = ScalarTypeParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "char" => Ok(ScalarType::Char),
            "uchar" => Ok(ScalarType::UChar),
            "short" => Ok(ScalarType::Short),
            "ushort" => Ok(ScalarType::UShort),
            "int" => Ok(ScalarType::Int),
            "uint" => Ok(ScalarType::UInt),
            "float" => Ok(ScalarType::Float),
            "double" => Ok(ScalarType::Double),
            other => Err(ScalarTypeParseError(other.to_string())),
        }
    }
}

/// The error emitted when the `FromStr` implementation for `ScalarType`
/// cannot parse the given string.
pub struct ScalarTypeParseError(String);

impl fmt::Display for ScalarTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\" is not a valid PLY scalar type", self.0)
    }
}

impl fmt::Debug for ScalarTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Length of a PLY scalar value in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarLen {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
}

impl ScalarLen {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn as_usize(&self) -> usize {
        *self as usize
    }
}

/// A byte offset into the raw data of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Add, Sub, AddAssign, SubAssign, From)]
pub struct RawOffset(pub u32);

impl RawOffset {
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl From<ScalarLen> for RawOffset {
    fn from(src: ScalarLen) -> Self {
        (src.as_u8() as u32).into()
    }
}

impl ops::Add<ScalarLen> for RawOffset {
    type Output = RawOffset;
    fn add(self, len: ScalarLen) -> Self::Output {
        (self.0 + len.as_u8() as u32).into()
    }
}

impl ops::AddAssign<ScalarLen> for RawOffset {
    fn add_assign(&mut self, rhs: ScalarLen) {
        *self = *self + rhs;
    }
}


// ===========================================================================
// ===== Element and property definitions
// ===========================================================================

/// The header definition of one property of an element.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    pub ty: ScalarType,
}

/// The header definition of one element group: a name, the number of records
/// stored in the body and the ordered list of per-record properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDef {
    pub name: String,

    /// Number of records of this element in the body.
    pub count: u64,

    /// Definitions for all properties of records in this group, in
    /// declaration order. This order is also the byte layout order within
    /// one record.
    pub property_defs: Vec<PropertyDef>,
}

impl ElementDef {
    /// Returns the byte length of one record: the sum of all property
    /// lengths.
    ///
    /// This is recomputed from the property list on every call. Records are
    /// packed, so there is no padding or alignment to account for.
    pub fn record_len(&self) -> usize {
        self.property_defs.iter()
            .map(|p| p.ty.len().as_usize())
            .sum()
    }

    /// Returns the index of the property with the given name, or `None` if
    /// no property has that name.
    pub fn prop_pos(&self, prop_name: &str) -> Option<usize> {
        self.property_defs.iter().position(|p| p.name == prop_name)
    }
}


// ===========================================================================
// ===== Property values
// ===========================================================================

/// One decoded property value of some PLY scalar type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Property {
    Char(i8),
    UChar(u8),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Float(f32),
    Double(f64),
}

impl Property {
    /// Decodes a value of type `ty` from the start of `buf` (little-endian).
    /// `buf` must hold at least `ty.len()` bytes.
    pub fn from_bytes(buf: &[u8], ty: ScalarType) -> Self {
        match ty {
            ScalarType::Char => Property::Char(buf[0] as i8),
            ScalarType::UChar => Property::UChar(buf[0]),
            ScalarType::Short => Property::Short(LittleEndian::read_i16(buf)),
            ScalarType::UShort => Property::UShort(LittleEndian::read_u16(buf)),
            ScalarType::Int => Property::Int(LittleEndian::read_i32(buf)),
            ScalarType::UInt => Property::UInt(LittleEndian::read_u32(buf)),
            ScalarType::Float => Property::Float(LittleEndian::read_f32(buf)),
            ScalarType::Double => Property::Double(LittleEndian::read_f64(buf)),
        }
    }

    /// Returns the type of this value.
    pub fn ty(&self) -> ScalarType {
        match self {
            Property::Char(_) => ScalarType::Char,
            Property::UChar(_) => ScalarType::UChar,
            Property::Short(_) => ScalarType::Short,
            Property::UShort(_) => ScalarType::UShort,
            Property::Int(_) => ScalarType::Int,
            Property::UInt(_) => ScalarType::UInt,
            Property::Float(_) => ScalarType::Float,
            Property::Double(_) => ScalarType::Double,
        }
    }

    /// Returns the value as integer, or `None` if the property does not have
    /// an integer type.
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Property::Char(v) => Some(v.into()),
            Property::UChar(v) => Some(v.into()),
            Property::Short(v) => Some(v.into()),
            Property::UShort(v) => Some(v.into()),
            Property::Int(v) => Some(v.into()),
            Property::UInt(v) => Some(v.into()),
            _ => None,
        }
    }

    /// Returns the value as unsigned integer, or `None` if the property does
    /// not have an unsigned integer type.
    pub fn as_unsigned_integer(&self) -> Option<u32> {
        match *self {
            Property::UChar(v) => Some(v.into()),
            Property::UShort(v) => Some(v.into()),
            Property::UInt(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as signed integer, or `None` if the property does
    /// not have a signed integer type.
    pub fn as_signed_integer(&self) -> Option<i32> {
        match *self {
            Property::Char(v) => Some(v.into()),
            Property::Short(v) => Some(v.into()),
            Property::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as float, or `None` if the property does not have a
    /// float type.
    pub fn as_floating_point(&self) -> Option<f64> {
        match *self {
            Property::Float(v) => Some(v.into()),
            Property::Double(v) => Some(v),
            _ => None,
        }
    }

    /// Converts the value into any primitive number type, if the value can
    /// be represented in it.
    ///
    /// This goes through [`num_traits::NumCast`], so widening conversions
    /// (e.g. a `uchar` property into a `u32` or `f64` field) always succeed,
    /// while narrowing conversions succeed exactly when the concrete value
    /// fits the target type.
    pub fn cast<T: NumCast>(&self) -> Option<T> {
        match *self {
            Property::Char(v) => T::from(v),
            Property::UChar(v) => T::from(v),
            Property::Short(v) => T::from(v),
            Property::UShort(v) => T::from(v),
            Property::Int(v) => T::from(v),
            Property::UInt(v) => T::from(v),
            Property::Float(v) => T::from(v),
            Property::Double(v) => T::from(v),
        }
    }
}


// ===========================================================================
// ===== RecordSink and the record decoder
// ===========================================================================

/// A type that can receive the decoded property values of one record.
///
/// This is the binding seam between the schema-driven decoder and a typed
/// target: the decoder calls [`set_property`][RecordSink::set_property] once
/// per property, in header declaration order, and the sink decides by *name*
/// which field (if any) the value is stored in. A sink may bind its fields
/// in any order, may ignore properties it has no use for, and keeps its
/// prior state for fields no property binds to.
pub trait RecordSink {
    /// Called once for each property of a record with the property's header
    /// name and its decoded value.
    fn set_property(&mut self, name: &str, value: Property);
}

/// Decodes one raw record buffer into `sink`.
///
/// `data` must be exactly `def.record_len()` bytes. The properties are
/// walked in declaration order; the running byte offset is advanced by every
/// property's width whether or not the sink binds its name, so the buffer
/// layout alone determines where each value is read from.
pub fn decode_record(def: &ElementDef, data: &[u8], sink: &mut impl RecordSink) {
    debug_assert_eq!(data.len(), def.record_len());

    let mut offset = RawOffset(0);
    for prop in &def.property_defs {
        let value = Property::from_bytes(&data[offset.as_usize()..], prop.ty);
        sink.set_property(&prop.name, value);
        offset += prop.ty.len();
    }
}
