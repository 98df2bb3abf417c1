// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use gitmit::domain::ChangeRecord;
use gitmit::services::analyzer::ChangeAnalyzer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let records = vec![
        ChangeRecord::new("src/new.py", text.as_ref()),
        ChangeRecord::modified("src/lib.rs", text.as_ref()),
    ];

    let analysis = ChangeAnalyzer::analyze(&records);
    assert_eq!(analysis.total_files, 2);
    assert!(!analysis.suggested_types.is_empty());
    let _ = analysis.to_context_string();
});
