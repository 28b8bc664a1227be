#![no_main]
use libfuzzer_sys::fuzz_target;
use oxihuff::compress::{self, CompressOptions, DecompressOptions};
use oxihuff::format::Addressing;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte selects options.
    let flags = data[0];
    let payload = &data[1..];
    let opts = CompressOptions {
        improve_tree: flags & 1 != 0,
    };
    let addressing = if flags & 2 != 0 {
        Addressing::Postorder
    } else {
        Addressing::General
    };

    let artifact = compress::compress_with_options(payload, &opts).unwrap();
    let decoded =
        compress::decompress_with_options(&artifact, &DecompressOptions { addressing }).unwrap();
    assert_eq!(decoded, payload);
});
