//! A ready-made record type for the most common kind of PLY file: a point
//! cloud with positions and RGB colors.

use std::{fmt, path::Path};

use cgmath::Point3;

use crate::{
    error::Error,
    raw::{Property, RecordSink},
    read::Reader,
};


/// One point of a colored point cloud: a position and an RGB color.
///
/// Binds the conventional `vertex` properties `x`, `y`, `z`, `red`, `green`
/// and `blue`. Properties the file doesn't have leave the corresponding
/// field at its previous value, so decoding into `Point::default()` yields
/// zeroes for anything missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Point {
    /// The position as a `cgmath` point.
    pub fn position(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    /// The color as an `[r, g, b]` array.
    pub fn color(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

impl RecordSink for Point {
    fn set_property(&mut self, name: &str, value: Property) {
        // Stores the value if it is representable in the field's type;
        // properties of a wildly unexpected type are ignored rather than
        // mangled.
        macro_rules! set {
            ($field:expr) => {
                if let Some(v) = value.cast() {
                    $field = v;
                }
            };
        }

        match name {
            "x" => set!(self.x),
            "y" => set!(self.y),
            "z" => set!(self.z),
            "red" => set!(self.red),
            "green" => set!(self.green),
            "blue" => set!(self.blue),
            _ => {}
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{{x: {:.16}, y: {:.16}, z: {:.16}, r: {}, g: {}, b: {}}}",
            self.x, self.y, self.z, self.red, self.green, self.blue,
        )
    }
}

/// Reads all records of the `vertex` element of the given file as
/// [`Point`]s.
///
/// This is a small convenience frontend for the common
/// one-element-point-cloud case; anything more involved should use
/// [`Reader`] directly.
pub fn read_all_points(path: impl AsRef<Path>) -> Result<Vec<Point>, Error> {
    let mut reader = Reader::open(path)?;
    let mut elem = reader.element_reader("vertex")?;

    // The count is header-supplied, so cap what gets preallocated on it.
    let mut points = Vec::with_capacity(elem.total_count().min(4096) as usize);
    loop {
        let mut point = Point::default();
        match elem.read_next(&mut point) {
            Ok(_) => points.push(point),
            Err(Error::EndOfElement) => break,
            Err(e) => return Err(e),
        }
    }

    Ok(points)
}
