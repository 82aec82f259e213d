#![no_main]

use libfuzzer_sys::fuzz_target;
use cluegen::SchemaDocument;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Parse the document
        if let Ok(document) = SchemaDocument::from_json(s) {
            // If parsing succeeds, define it and render every sample
            if let Ok(schema) = document.define() {
                for sample in schema.samples() {
                    let _ = sample.repr();
                }
            }
        }
    }
});
