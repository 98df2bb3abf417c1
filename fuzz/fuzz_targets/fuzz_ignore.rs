// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use gitmit::services::ignore::IgnoreMatcher;
use libfuzzer_sys::fuzz_target;

// First line is the path, the rest is the ignore file
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (path, patterns) = text.split_once('\n').unwrap_or((text, ""));
    let matcher = IgnoreMatcher::parse(patterns);
    let _ = matcher.should_ignore(path);
});
