#![no_main]
use libfuzzer_sys::fuzz_target;
use oxihuff::compress::{self, DecompressOptions};
use oxihuff::format::Addressing;

fuzz_target!(|data: &[u8]| {
    // Arbitrary artifacts must only ever produce errors, never panics.
    for addressing in [Addressing::General, Addressing::Postorder] {
        let _ = compress::decompress_with_options(data, &DecompressOptions { addressing });
    }
});
