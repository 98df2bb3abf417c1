// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use gitmit::services::sanitizer::CommitSanitizer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data)
        && let Ok(message) = CommitSanitizer::parse(raw)
    {
        assert!(!message.short_description.trim().is_empty());
        let _ = message.format();
    }
});
