// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

mod helpers;

use gitmit::domain::{ChangeCategory, ChangeMagnitude, ChangeRecord, CommitType};
use gitmit::services::analyzer::ChangeAnalyzer;
use helpers::{make_content, modified_record, new_record};
use proptest::prelude::*;

// ─── Magnitude boundaries ─────────────────────────────────────────────────────

#[test]
fn empty_change_set() {
    let analysis = ChangeAnalyzer::analyze(&[]);
    assert_eq!(analysis.magnitude, ChangeMagnitude::Trivial);
    assert_eq!(analysis.category, ChangeCategory::Modifications);
    assert_eq!(analysis.total_files, 0);
    assert_eq!(
        analysis.suggested_types,
        vec![CommitType::Enhancement, CommitType::Refactor, CommitType::Chore]
    );
}

#[test]
fn one_file_five_changes_is_trivial() {
    let analysis = ChangeAnalyzer::analyze(&[modified_record("src/main.rs", 1, 4)]);
    assert_eq!(analysis.magnitude, ChangeMagnitude::Trivial);
    assert!(analysis.warnings[0].starts_with("This is a TRIVIAL change."));
}

#[test]
fn one_file_six_changes_is_small() {
    let analysis = ChangeAnalyzer::analyze(&[modified_record("src/main.rs", 3, 3)]);
    assert_eq!(analysis.magnitude, ChangeMagnitude::Small);
}

#[test]
fn two_files_thirty_changes_is_small() {
    let records = [
        modified_record("src/a.rs", 10, 5),
        modified_record("src/b.rs", 10, 5),
    ];
    assert_eq!(
        ChangeAnalyzer::analyze(&records).magnitude,
        ChangeMagnitude::Small
    );
}

#[test]
fn two_files_thirty_one_changes_is_medium() {
    let records = [
        modified_record("src/a.rs", 11, 5),
        modified_record("src/b.rs", 10, 5),
    ];
    assert_eq!(
        ChangeAnalyzer::analyze(&records).magnitude,
        ChangeMagnitude::Medium
    );
}

#[test]
fn structural_single_line_change_is_not_trivial() {
    let diff = "--- a/app.py\n+++ b/app.py\n@@ -1,2 +1,2 @@\n+def run():\n+    return 1\n-def go():\n-    return 1";
    let analysis = ChangeAnalyzer::analyze(&[ChangeRecord::modified("app.py", diff)]);
    // balanced edit: rename-like, so still trivial
    assert!(analysis.file_analyses[0].rename_only);
    assert_eq!(analysis.magnitude, ChangeMagnitude::Trivial);

    let diff = "--- a/app.py\n+++ b/app.py\n@@ -0,0 +1,3 @@\n+def run():\n+    return 1\n+";
    let analysis = ChangeAnalyzer::analyze(&[ChangeRecord::modified("app.py", diff)]);
    assert!(analysis.file_analyses[0].has_function_changes);
    assert_eq!(analysis.magnitude, ChangeMagnitude::Small);
}

#[test]
fn large_and_major_thresholds() {
    let large: Vec<ChangeRecord> = (0..15)
        .map(|i| modified_record(&format!("src/m{i}.rs"), 20, 13))
        .collect();
    assert_eq!(
        ChangeAnalyzer::analyze(&large).magnitude,
        ChangeMagnitude::Large
    );

    let major: Vec<ChangeRecord> = (0..16)
        .map(|i| modified_record(&format!("src/m{i}.rs"), 1, 1))
        .collect();
    assert_eq!(
        ChangeAnalyzer::analyze(&major).magnitude,
        ChangeMagnitude::Major
    );
}

// ─── Line counting ────────────────────────────────────────────────────────────

#[test]
fn new_file_line_count_handles_missing_trailing_newline() {
    let with_newline = ChangeAnalyzer::analyze_file(&ChangeRecord::new("a.txt", "a\nb\n"));
    let without = ChangeAnalyzer::analyze_file(&ChangeRecord::new("a.txt", "a\nb"));
    let empty = ChangeAnalyzer::analyze_file(&ChangeRecord::new("a.txt", ""));
    assert_eq!(with_newline.lines_added, 2);
    assert_eq!(without.lines_added, 2);
    assert_eq!(empty.lines_added, 0);
}

#[test]
fn diff_headers_are_not_counted() {
    let analysis = ChangeAnalyzer::analyze_file(&modified_record("src/lib.rs", 4, 2));
    assert_eq!(analysis.lines_added, 4);
    assert_eq!(analysis.lines_removed, 2);
    assert_eq!(analysis.total_changes(), 6);
    assert_eq!(analysis.net_changes(), 2);
}

// ─── Rename heuristic ─────────────────────────────────────────────────────────

#[test]
fn rename_heuristic() {
    assert!(ChangeAnalyzer::is_rename_like(8, 9));
    assert!(ChangeAnalyzer::is_rename_like(10, 10));
    assert!(!ChangeAnalyzer::is_rename_like(8, 20));
    assert!(!ChangeAnalyzer::is_rename_like(11, 11));
    assert!(!ChangeAnalyzer::is_rename_like(0, 5));
    assert!(!ChangeAnalyzer::is_rename_like(7, 10));
}

#[test]
fn rename_only_changes_are_rename_refactor() {
    let records = [
        modified_record("src/a.rs", 3, 3),
        modified_record("src/b.rs", 4, 5),
    ];
    let analysis = ChangeAnalyzer::analyze(&records);
    assert_eq!(analysis.category, ChangeCategory::RenameRefactor);
    assert_eq!(
        analysis.suggested_types,
        vec![CommitType::Refactor, CommitType::Style]
    );
    assert!(
        analysis
            .warnings
            .iter()
            .any(|w| w.contains(r#"["src/a.rs", "src/b.rs"]"#))
    );
}

// ─── Categories and suggestions ───────────────────────────────────────────────

#[test]
fn single_plain_new_file_is_new_files() {
    let analysis = ChangeAnalyzer::analyze(&[new_record("notes/ideas", 3)]);
    assert_eq!(analysis.category, ChangeCategory::NewFiles);
    assert_eq!(
        analysis.suggested_types,
        vec![CommitType::Feat, CommitType::Chore]
    );
}

#[test]
fn new_python_function_suggests_feat_first() {
    let content = format!("def bar(): pass\n{}", make_content(11));
    let analysis = ChangeAnalyzer::analyze(&[ChangeRecord::new("foo.py", content)]);

    assert_eq!(analysis.total_lines_added, 12);
    assert_eq!(analysis.magnitude, ChangeMagnitude::Small);
    assert_eq!(analysis.category, ChangeCategory::NewFiles);
    assert_eq!(analysis.suggested_types[0], CommitType::Feat);
}

#[test]
fn new_rust_struct_counts_as_class() {
    let content = "pub struct Matcher {\n    rules: Vec<Rule>,\n}\n";
    let analysis = ChangeAnalyzer::analyze_file(&ChangeRecord::new("src/matcher.rs", content));
    assert!(analysis.has_class_changes);
    assert!(!analysis.has_function_changes);
}

#[test]
fn test_only_changes() {
    let records: Vec<ChangeRecord> = (0..10)
        .map(|i| modified_record(&format!("tests/test_module_{i}.py"), 2, 2))
        .collect();
    let analysis = ChangeAnalyzer::analyze(&records);

    assert_eq!(analysis.category, ChangeCategory::Tests);
    assert_eq!(analysis.suggested_types, vec![CommitType::Test]);
    assert_eq!(analysis.magnitude, ChangeMagnitude::Large);
    assert!(
        analysis
            .warnings
            .contains(&"All changes are in test files. Use 'test' commit type.".to_string())
    );
}

#[test]
fn documentation_only() {
    let analysis = ChangeAnalyzer::analyze(&[modified_record("README.md", 12, 1)]);
    assert_eq!(analysis.category, ChangeCategory::Documentation);
    assert_eq!(analysis.suggested_types, vec![CommitType::Docs]);
}

#[test]
fn config_only() {
    let analysis = ChangeAnalyzer::analyze(&[modified_record(".github/workflows/ci.yml", 12, 1)]);
    assert_eq!(analysis.category, ChangeCategory::Config);
    assert_eq!(
        analysis.suggested_types,
        vec![CommitType::Chore, CommitType::Build, CommitType::Ci]
    );
    assert!(
        analysis
            .warnings
            .iter()
            .any(|w| w.starts_with("All changes are in configuration files."))
    );
}

#[test]
fn lockfile_only_is_dependencies() {
    let analysis = ChangeAnalyzer::analyze(&[modified_record("poetry.lock", 40, 12)]);
    assert_eq!(analysis.category, ChangeCategory::Dependencies);
    assert_eq!(
        analysis.suggested_types,
        vec![
            CommitType::Dependencies,
            CommitType::DevDependencies,
            CommitType::PeerDependencies
        ]
    );
}

#[test]
fn heavy_removals_are_deletions() {
    let analysis = ChangeAnalyzer::analyze(&[modified_record("src/legacy.rs", 2, 40)]);
    assert_eq!(analysis.category, ChangeCategory::Deletions);
    assert_eq!(
        analysis.suggested_types,
        vec![CommitType::Refactor, CommitType::Chore]
    );
}

#[test]
fn balanced_new_and_modified_is_mixed() {
    let records = [new_record("src/new.rs", 20), modified_record("src/old.rs", 15, 5)];
    let analysis = ChangeAnalyzer::analyze(&records);
    assert_eq!(analysis.category, ChangeCategory::Mixed);
    assert_eq!(analysis.new_files_count, 1);
    assert_eq!(analysis.modified_files_count, 1);
}

#[test]
fn dominant_new_lines_are_new_files() {
    let records = [new_record("src/new.rs", 100), modified_record("src/old.rs", 15, 5)];
    assert_eq!(
        ChangeAnalyzer::analyze(&records).category,
        ChangeCategory::NewFiles
    );
}

#[test]
fn modified_functions_suggest_enhancement() {
    let diff = "--- a/app.py\n+++ b/app.py\n@@ -1,2 +1,20 @@\n\
                +def run(config):\n+    pass\n+    pass\n+    pass\n+    pass\n+    pass\n\
                +    pass\n+    pass\n+    pass\n+    pass\n+    pass\n+    pass\n+    pass\n\
                +    pass\n+    pass\n+    pass\n+    pass\n+    pass\n+    pass\n+    pass\n\
                -def run():\n-    pass";
    let analysis = ChangeAnalyzer::analyze(&[ChangeRecord::modified("app.py", diff)]);
    assert_eq!(analysis.category, ChangeCategory::Modifications);
    assert_eq!(
        analysis.suggested_types,
        vec![CommitType::Enhancement, CommitType::Refactor]
    );
}

// ─── Hints and rendering ──────────────────────────────────────────────────────

#[test]
fn hints_truncate_long_file_lists() {
    let records: Vec<ChangeRecord> = (0..7)
        .map(|i| new_record(&format!("src/f{i}.rs"), 2))
        .collect();
    let analysis = ChangeAnalyzer::analyze(&records);
    assert_eq!(
        analysis.context_hints[0],
        "New files: src/f0.rs, src/f1.rs, src/f2.rs, src/f3.rs, src/f4.rs (+2 more)"
    );
}

#[test]
fn context_string() {
    let content = format!("def bar(): pass\n{}", make_content(11));
    let records = [
        ChangeRecord::new("foo.py", content),
        modified_record("src/old.py", 3, 1),
    ];
    let analysis = ChangeAnalyzer::analyze(&records);
    insta::assert_snapshot!(analysis.to_context_string(), @r"
    CHANGE MAGNITUDE: SMALL
    CHANGE CATEGORY: NEW_FILES
    FILES: 2 total (1 new, 1 modified)
    LINES: +15 -1 (net: +14)
    SUGGESTED TYPES: feat
    CONTEXT HINTS:
      • New files: foo.py
      • Modified files: src/old.py
      • Files with structural changes (classes/functions): 1
    ");
}

// ─── Proptest: order insensitivity ────────────────────────────────────────────

fn arb_record() -> impl Strategy<Value = ChangeRecord> {
    (any::<bool>(), 0usize..8, 0usize..60, 0usize..60).prop_map(|(is_new, name, added, removed)| {
        let names = [
            "src/lib.rs",
            "README.md",
            "tests/test_api.py",
            "config.yaml",
            "Cargo.lock",
            "src/app.py",
            "docs/guide.rst",
            "web/index.ts",
        ];
        if is_new {
            new_record(names[name], added)
        } else {
            modified_record(names[name], added, removed)
        }
    })
}

proptest! {
    #[test]
    fn magnitude_and_category_ignore_order(records in prop::collection::vec(arb_record(), 0..12)) {
        let forward = ChangeAnalyzer::analyze(&records);
        let mut reversed = records.clone();
        reversed.reverse();
        let backward = ChangeAnalyzer::analyze(&reversed);

        prop_assert_eq!(forward.magnitude, backward.magnitude);
        prop_assert_eq!(forward.category, backward.category);
        prop_assert_eq!(forward.total_lines_added, backward.total_lines_added);
    }

    #[test]
    fn analysis_is_deterministic(records in prop::collection::vec(arb_record(), 0..12)) {
        prop_assert_eq!(ChangeAnalyzer::analyze(&records), ChangeAnalyzer::analyze(&records));
    }
}
