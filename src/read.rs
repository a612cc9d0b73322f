//! The file handle ([`Reader`]) and per-element record access
//! ([`ElementReader`]).

use std::{
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    path::Path,
};

use crate::{
    error::Error,
    header::{Format, Header},
    raw::{self, ElementDef, RecordSink},
};


/// A reader able to read binary little-endian PLY files.
///
/// Creating a reader (via [`Reader::open`] or [`Reader::new`]) reads and
/// parses the header; the body is only touched once an [`ElementReader`] is
/// used. The source has to be seekable because records are read at computed
/// absolute positions instead of relying on the stream staying wherever the
/// previous read left it.
#[derive(Debug)]
pub struct Reader<R: Read + Seek> {
    source: R,
    header: Header,
}

impl Reader<File> {
    /// Tries to open the file specified by the given path and creates a new
    /// `Reader` from that file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::new(File::open(path)?)
    }
}

impl<R: Read + Seek> Reader<R> {
    /// Creates a new `Reader` from the given source and parses the header.
    ///
    /// Fails with [`Error::UnsupportedFormat`] if the header declares
    /// anything but `binary_little_endian` (in that case the source is
    /// dropped, so a file handle is released right here). If you want to
    /// open a file, rather use [`Reader::open`].
    pub fn new(mut source: R) -> Result<Self, Error> {
        let header = Header::read(&mut source)?;

        match header.format() {
            Some(Format::BinaryLittleEndian) => Ok(Self { source, header }),
            _ => Err(Error::UnsupportedFormat),
        }
    }

    /// The parsed header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns `true` if the file declares an element with the given name.
    pub fn has_element(&self, name: &str) -> bool {
        self.header.has_element(name)
    }

    /// Creates an [`ElementReader`] for the element with the given name.
    ///
    /// The returned reader starts at the element's first record. It borrows
    /// this `Reader` mutably: record positions are computed, but the
    /// seek-then-read pair on the shared source must not be interleaved with
    /// anything else, and the exclusive borrow rules that out statically.
    /// Callers that need to read several elements concurrently must open
    /// independent `Reader`s.
    pub fn element_reader(&mut self, name: &str) -> Result<ElementReader<'_, R>, Error> {
        let (def, base_offset) = self.header.find_element(name)?;

        Ok(ElementReader {
            def: def.clone(),
            base_offset,
            cursor: 0,
            buf: Vec::new(),
            source: &mut self.source,
        })
    }

    /// Consumes the reader and returns the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Closes the reader by dropping the underlying source.
    ///
    /// This exists for symmetry with [`Reader::open`]; dropping the reader
    /// has the same effect.
    pub fn close(self) -> Result<(), Error> {
        drop(self.source);
        Ok(())
    }
}


/// Sequential and random access to the records of one element.
///
/// The reader keeps a cursor in `0..=count`: the index of the next record a
/// sequential [`read_next`][Self::read_next] returns. `count` itself is the
/// exhausted state. Every read recomputes the absolute byte position of its
/// record from the cursor, so a reader is never confused by where earlier
/// operations left the source.
#[derive(Debug)]
pub struct ElementReader<'a, R: Read + Seek> {
    source: &'a mut R,
    def: ElementDef,
    base_offset: u64,
    cursor: u64,

    /// Record buffer, reused across reads to retain its allocation.
    buf: Vec<u8>,
}

impl<R: Read + Seek> ElementReader<'_, R> {
    /// Sets the cursor to `pos`.
    ///
    /// `pos` may be anything in `0..=count`; seeking to `count` is allowed
    /// and simply leaves the reader exhausted. For anything greater the
    /// cursor stays unchanged and [`Error::SeekOutOfRange`] is returned.
    pub fn seek(&mut self, pos: u64) -> Result<(), Error> {
        if pos > self.def.count {
            return Err(Error::SeekOutOfRange { pos, count: self.def.count });
        }

        self.cursor = pos;
        Ok(())
    }

    /// Resets the cursor to the first record.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Reads the record at the cursor into `sink` and advances the cursor.
    ///
    /// Returns the new cursor value, i.e. the 1-based number of records this
    /// reader has read sequentially so far. Once all records are read, every
    /// further call fails with [`Error::EndOfElement`] without touching the
    /// source; use that as the loop termination signal.
    pub fn read_next(&mut self, sink: &mut impl RecordSink) -> Result<u64, Error> {
        if self.cursor >= self.def.count {
            return Err(Error::EndOfElement);
        }

        let record_len = self.def.record_len();
        let pos = self.base_offset.saturating_add(self.cursor.saturating_mul(record_len as u64));
        self.source.seek(SeekFrom::Start(pos))?;

        self.buf.resize(record_len, 0);
        self.source.read_exact(&mut self.buf).map_err(|e| {
            match e.kind() {
                io::ErrorKind::UnexpectedEof => Error::TruncatedRecord {
                    element: self.def.name.clone(),
                    index: self.cursor,
                },
                _ => Error::Io(e),
            }
        })?;

        raw::decode_record(&self.def, &self.buf, sink);
        self.cursor += 1;

        Ok(self.cursor)
    }

    /// Reads the record at position `pos` into `sink` without moving the
    /// cursor.
    ///
    /// The cursor is restored to its previous value whether or not the read
    /// succeeds.
    pub fn read_at(&mut self, pos: u64, sink: &mut impl RecordSink) -> Result<(), Error> {
        let saved = self.cursor;
        let res = self.seek(pos).and_then(|()| self.read_next(sink));
        self.cursor = saved;

        res.map(|_| ())
    }

    /// Reads the first record into `sink` without moving the cursor.
    pub fn read_first(&mut self, sink: &mut impl RecordSink) -> Result<(), Error> {
        self.read_at(0, sink)
    }

    /// The cursor: the index of the record the next `read_next` returns.
    pub fn current_position(&self) -> u64 {
        self.cursor
    }

    /// The number of records of this element, as declared in the header.
    pub fn total_count(&self) -> u64 {
        self.def.count
    }

    /// The definition of the element this reader reads.
    pub fn def(&self) -> &ElementDef {
        &self.def
    }
}
