// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

pub mod analyzer;
pub mod generator;
pub mod git;
pub mod ignore;
pub mod llm;
pub mod loader;
pub mod prompt;
pub mod sanitizer;
pub mod templates;
pub mod usage;
