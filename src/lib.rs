//! A single-elimination bracket engine for horse tournaments.
//!
//! Eight horses enter a tournament. Each one holds an entry number (0 to 7)
//! that fixes its seed slot, and a round reached (1 to 4) that records how
//! far it got. The final is round 4.
//!
//! * [`bracket`] - rebuild the bracket tree from the flat standings
//! * [`validate`] - check that proposed standings form a legal bracket
//! * [`compatibility`] - check that an update doesn't overwrite recorded results
//! * [`seed`] - score past results and seed round 1
//! * [`registry`] - an in-memory store of horses, tournaments and standings

// This file is part of paddock.
//
// paddock is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// paddock is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

#![deny(clippy::panic)]

pub mod bracket;
pub mod compatibility;
pub mod error;
pub mod registry;
pub mod seed;
pub mod standing;
pub mod utils;
pub mod validate;

pub use error::{Error, Violation, Violations};

/// The number of horses in a full tournament.
pub const ENTRANTS: usize = 8;
/// The round of the final.
pub const FINAL_ROUND: i64 = 4;

pub const HOME: &str = "paddock";
pub const DATA_FILE: &str = "paddock.ron";

pub const COPYRIGHT: &str = r".SH COPYRIGHT
Copyright (C) 2026 Paddock Developers

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU Affero General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU Affero General Public License for more details.

You should have received a copy of the GNU Affero General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
";

pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "
Copyright (c) 2026 Paddock Developers
Licensed under the AGPLv3"
);
