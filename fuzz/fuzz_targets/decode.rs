#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let once = lft_jsonc::decode_comments(s);
        // Decoding must be idempotent
        assert_eq!(lft_jsonc::decode_comments(&once), once);
        let _ = lft_jsonc::parse_relaxed(s);
    }
});
