// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

mod analysis;
mod change;
mod commit;
mod prompt;

pub use analysis::*;
pub use change::*;
pub use commit::*;
pub use prompt::*;
