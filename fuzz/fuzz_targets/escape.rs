#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    cygscript::fuzz_escape_bytes(data);
});
