//! Fuzz target for command parsing.
//!
//! Arbitrary text must always classify to some command without panicking,
//! and the same text must always classify the same way.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let first = coffeebot::parse(text);
    assert_eq!(first, coffeebot::parse(text));
});
