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

use std::{io::Write as _, path::PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use paddock::{COPYRIGHT, LONG_VERSION, standing::TournamentId};

/// Paddock
///
/// Keeps the single-elimination brackets of horse tournaments.
#[derive(Parser, Debug)]
#[command(long_version = LONG_VERSION, about = "Paddock")]
pub(crate) struct Args {
    /// The registry file, by default paddock.ron in the user's data directory
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Whether to log on the debug level
    #[arg(long)]
    pub debug: bool,

    /// Whether the application is being run by systemd
    #[arg(long)]
    pub systemd: bool,

    /// Build the manpage
    #[arg(long)]
    pub man: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Print the bracket and standings of a tournament
    Show { tournament: TournamentId },

    /// Generate round 1 of a tournament from the last 12 months of results
    Seed { tournament: TournamentId },

    /// Apply a RON list of placement updates to a tournament
    Update {
        tournament: TournamentId,
        file: PathBuf,
    },

    /// Check that a RON list of participants forms a legal bracket
    Check { file: PathBuf },
}

impl Args {
    pub(crate) fn generate_man_page() -> anyhow::Result<()> {
        let mut buffer: Vec<u8> = Vec::default();
        let cmd = Self::command().name("paddock").long_version(None);
        let man = clap_mangen::Man::new(cmd).date("2026-10-19");

        man.render(&mut buffer)?;
        write!(buffer, "{COPYRIGHT}")?;

        std::fs::write("paddock.1", buffer)?;
        Ok(())
    }
}
