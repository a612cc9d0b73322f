//! Reading and parsing the textual PLY header.

use std::io;

use crate::{
    error::Error,
    raw::{ElementDef, PropertyDef, ScalarType},
};


/// The number of bytes read from the source per iteration while looking for
/// the header terminator.
const CHUNK_LEN: usize = 100;

/// The sentinel marking the end of the textual header. The binary body
/// starts right after this line's newline.
const HEADER_END: &[u8] = b"end_header";


/// The declared encoding of a PLY file's body.
///
/// Only the two formats the header parser recognizes are represented here;
/// this crate can *decode* only [`Format::BinaryLittleEndian`] bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ascii,
    BinaryLittleEndian,
}

/// The parsed structural description of a PLY file: its format, elements and
/// their properties, plus the byte offset at which the binary body starts.
///
/// The element order equals the physical layout order of the body: elements
/// are stored consecutively in declaration order, each as `count` packed
/// records. There is no index anywhere in the file, so all offsets are
/// computed by summing up the sizes of everything stored before.
#[derive(Debug, Clone)]
pub struct Header {
    format: Option<Format>,
    comment: Option<String>,
    elements: Vec<ElementDef>,
    body_offset: u64,
}

impl Header {
    /// Reads the header from the start of `source` and parses it.
    ///
    /// The source is read in bounded chunks until the `end_header`
    /// terminator shows up in the accumulated text. The source is left
    /// positioned wherever the last chunk read ended, which is why every
    /// body read later seeks to an absolute position first.
    pub(crate) fn read(source: &mut impl io::Read) -> Result<Self, Error> {
        let (text, body_offset) = read_header_bytes(source)?;
        if text.is_empty() {
            return Err(Error::InvalidFile("empty header".into()));
        }

        Self::parse(&String::from_utf8_lossy(&text), body_offset)
    }

    /// Parses the accumulated header text, line by line.
    pub(crate) fn parse(text: &str, body_offset: u64) -> Result<Self, Error> {
        let mut format = None;
        let mut comment = None;
        let mut elements = Vec::new();
        let mut current: Option<ElementDef> = None;

        for line in text.split('\n') {
            // The terminator line closes the open element context and ends
            // the header.
            if line == "end_header" {
                if let Some(elem) = current.take() {
                    elements.push(elem);
                }
                break;
            }

            if let Some(rest) = line.strip_prefix("format ") {
                // Only the first recognized format line is authoritative;
                // later ones are ignored. Unrecognized format tokens don't
                // match at all.
                if format.is_none() {
                    format = match rest.split_whitespace().next() {
                        Some("ascii") => Some(Format::Ascii),
                        Some("binary_little_endian") => Some(Format::BinaryLittleEndian),
                        _ => None,
                    };
                }
            } else if let Some(rest) = line.strip_prefix("comment ") {
                // Comment lines are not accumulated: the last one wins.
                comment = Some(rest.to_string());
            } else if let Some(rest) = line.strip_prefix("element ") {
                let mut words = rest.split_whitespace();
                let name = match words.next() {
                    Some(name) => name,
                    None => continue,
                };

                // An unparseable count resolves to 0. The element is then
                // treated as empty: sequential reads report `EndOfElement`
                // right away and it contributes no bytes to the layout.
                let count = words.next()
                    .and_then(|w| w.parse::<u64>().ok())
                    .unwrap_or(0);

                if let Some(elem) = current.take() {
                    elements.push(elem);
                }
                current = Some(ElementDef {
                    name: name.to_string(),
                    count,
                    property_defs: vec![],
                });
            } else if let Some(rest) = line.strip_prefix("property ") {
                let elem = current.as_mut().ok_or_else(|| Error::InvalidFile(
                    "property definition without preceding element definition".into(),
                ))?;

                let mut words = rest.split_whitespace();
                let ty_word = match words.next() {
                    Some(word) => word,
                    None => continue,
                };

                // An unknown type token (this includes `list`) is a hard
                // error: a property of unknown width would corrupt the
                // offsets of everything declared after it.
                let ty: ScalarType = ty_word.parse()
                    .map_err(|e| Error::InvalidFile(format!("{}", e)))?;

                let name = match words.next() {
                    Some(name) => name,
                    None => continue,
                };

                elem.property_defs.push(PropertyDef {
                    name: name.to_string(),
                    ty,
                });
            }

            // Any other line is ignored. Headers may contain directives
            // (e.g. `obj_info`) this parser has no use for.
        }

        Ok(Self { format, comment, elements, body_offset })
    }

    /// The declared body format, or `None` if the header contains no
    /// recognized format line.
    pub fn format(&self) -> Option<Format> {
        self.format
    }

    /// The header comment, if any. If the header contains several comment
    /// lines, this is the last one.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_ref().map(|s| s.as_str())
    }

    /// All element definitions, in declaration (= body layout) order.
    pub fn elements(&self) -> &[ElementDef] {
        &self.elements
    }

    /// The absolute byte offset of the first body byte, i.e. the position
    /// right after the terminator line's newline. Fixed once the header is
    /// parsed.
    pub fn body_offset(&self) -> u64 {
        self.body_offset
    }

    /// Returns `true` if an element with the given name was declared.
    pub fn has_element(&self, name: &str) -> bool {
        self.elements.iter().any(|e| e.name == name)
    }

    /// Returns the definition of the element with the given name.
    pub fn element(&self, name: &str) -> Option<&ElementDef> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Returns the element with the given name together with the absolute
    /// byte offset of its first record.
    ///
    /// The offset is found by a linear scan over the declarations,
    /// accumulating `count × record_len` for every element stored before
    /// the requested one. Elements are packed back to back, so this exactly
    /// reproduces the file layout.
    pub fn find_element(&self, name: &str) -> Result<(&ElementDef, u64), Error> {
        let mut offset = self.body_offset;
        for elem in &self.elements {
            if elem.name == name {
                return Ok((elem, offset));
            }

            // Counts are header-supplied and not to be trusted: saturate
            // instead of overflowing. Reads at such offsets simply fail.
            offset = offset.saturating_add(
                elem.count.saturating_mul(elem.record_len() as u64)
            );
        }

        Err(Error::UnknownElement(name.to_string()))
    }

    /// Returns the absolute byte offset of the first record of the named
    /// element. See [`find_element`][Self::find_element].
    pub fn element_offset(&self, name: &str) -> Result<u64, Error> {
        self.find_element(name).map(|(_, offset)| offset)
    }
}

/// Accumulates bytes from `source` until the terminator is found. Returns
/// the header bytes (truncated right after the terminator's newline) and the
/// body offset.
fn read_header_bytes(source: &mut impl io::Read) -> Result<(Vec<u8>, u64), Error> {
    let mut acc = Vec::new();
    let mut chunk = [0u8; CHUNK_LEN];

    loop {
        let n = match source.read(&mut chunk) {
            // End of stream before the terminator: there is no header to
            // find anymore.
            Ok(0) => return Err(Error::HeaderRead),
            Ok(n) => n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => return Err(Error::HeaderRead),
        };
        acc.extend_from_slice(&chunk[..n]);

        if let Some(pos) = find_terminator(&acc) {
            // The body starts right after the terminator line, inclusive of
            // its trailing newline.
            let body_offset = pos + HEADER_END.len() + 1;
            acc.truncate(body_offset);
            return Ok((acc, body_offset as u64));
        }
    }
}

fn find_terminator(haystack: &[u8]) -> Option<usize> {
    haystack.windows(HEADER_END.len()).position(|w| w == HEADER_END)
}
