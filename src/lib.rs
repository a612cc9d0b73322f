//! Reading binary little-endian PLY files.
//!
//! A PLY file starts with a textual header describing a sequence of named
//! *elements* (e.g. `vertex`, `face`), each with a record count and an
//! ordered list of fixed-width scalar *properties*. The binary body that
//! follows is just those records, packed back to back in declaration order.
//!
//! Opening a file parses the header into a [`Header`]; an [`ElementReader`]
//! then gives sequential and random access to one element's records. Decoded
//! values are handed to a caller-supplied [`RecordSink`], which binds
//! property *names* to its fields -- the order of fields in the target and
//! the order of properties in the file are completely independent, and both
//! sides may have entries the other doesn't know about.
//!
//! ```no_run
//! use plyfile::{Error, Property, Reader, RecordSink};
//!
//! #[derive(Default)]
//! struct Vertex {
//!     x: f32,
//!     y: f32,
//!     z: f32,
//! }
//!
//! impl RecordSink for Vertex {
//!     fn set_property(&mut self, name: &str, value: Property) {
//!         match name {
//!             "x" => self.x = value.cast().unwrap_or(0.0),
//!             "y" => self.y = value.cast().unwrap_or(0.0),
//!             "z" => self.z = value.cast().unwrap_or(0.0),
//!             _ => {}
//!         }
//!     }
//! }
//!
//! fn main() -> Result<(), Error> {
//!     let mut reader = Reader::open("bunny.ply")?;
//!     let mut vertices = reader.element_reader("vertex")?;
//!
//!     let mut v = Vertex::default();
//!     while vertices.read_next(&mut v).is_ok() {
//!         println!("({}, {}, {})", v.x, v.y, v.z);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! For plain colored point clouds, [`read_all_points`] does all of the above
//! in one call.
//!
//! Only the `binary_little_endian` variant of the format is supported;
//! `ascii` and `binary_big_endian` files are rejected with
//! [`Error::UnsupportedFormat`]. List (variable-width) properties are not
//! supported either: the reader's random access relies on every record of an
//! element having the same byte length.

pub mod error;
pub mod raw;

mod header;
mod point;
mod read;


pub use self::{
    error::Error,
    header::{Format, Header},
    point::{read_all_points, Point},
    read::{ElementReader, Reader},
    raw::{Property, RecordSink},
};
