#![no_main]

//! Command parser fuzzer.
//!
//! Any line must either fail to parse or parse into a command whose
//! rendered form parses back to the same command.

use libfuzzer_sys::fuzz_target;
use warcode::game::Command;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(command) = line.parse::<Command>() {
        let rendered = command.to_string();
        let reparsed: Command = rendered
            .parse()
            .unwrap_or_else(|e| panic!("'{rendered}' does not reparse: {e}"));
        assert_eq!(command, reparsed);
    }
});
