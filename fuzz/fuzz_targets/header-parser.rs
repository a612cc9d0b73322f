#![no_main]

use std::io::Cursor;
use libfuzzer_sys::fuzz_target;
use plyfile::{Property, Reader, RecordSink};

struct NullSink;

impl RecordSink for NullSink {
    fn set_property(&mut self, _: &str, _: Property) {}
}

fuzz_target!(|data: &[u8]| {
    // We just pass the data to the parser and ignore everything it decodes.
    // We are only interested in panics or other even worse crashes, so the
    // returned `Result`s are ignored too: it's fine if the parser says
    // "this is not a valid PLY file".
    let mut reader = match Reader::new(Cursor::new(data)) {
        Ok(reader) => reader,
        Err(_) => return,
    };

    let names: Vec<String> = reader.header()
        .elements()
        .iter()
        .map(|e| e.name.clone())
        .collect();

    for name in names {
        if let Ok(mut elem) = reader.element_reader(&name) {
            let mut sink = NullSink;
            // Bounded: a fuzzed header may declare an absurd record count.
            for _ in 0..1024 {
                if elem.read_next(&mut sink).is_err() {
                    break;
                }
            }
        }
    }
});
