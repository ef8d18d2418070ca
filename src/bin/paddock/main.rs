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

#![deny(clippy::expect_used)]
#![deny(clippy::indexing_slicing)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]

mod command_line;

use std::{fs, path::Path, process::exit};

use clap::{CommandFactory, Parser};
use log::{error, info};
use paddock::{
    Error, Violations,
    bracket::BracketNode,
    registry::Registry,
    standing::{Participant, ParticipantUpdate},
    utils::{self, create_data_folder, data_file},
    validate::validate_structure,
};
use serde::de::DeserializeOwned;

use crate::command_line::{Args, Command};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    utils::init_logger(args.systemd, args.debug);

    if args.man {
        return Args::generate_man_page();
    }

    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    let path = match args.data {
        Some(path) => path,
        None => {
            create_data_folder()?;
            data_file()
        }
    };

    if let Err(error) = run(command, &path) {
        report(&error);
        exit(1);
    }

    Ok(())
}

fn run(command: Command, path: &Path) -> anyhow::Result<()> {
    match command {
        Command::Show { tournament } => {
            let registry = Registry::load(path)?;
            let participants = registry.participants(tournament)?;

            println!("{}", BracketNode::build(&participants));
            for participant in &participants {
                println!("{participant}");
            }
        }
        Command::Seed { tournament } => {
            let mut registry = Registry::load(path)?;

            for participant in registry.generate_round_one(tournament)? {
                println!("{participant}");
            }

            registry.save(path)?;
            info!("seeded round 1 of the tournament {tournament}");
        }
        Command::Update { tournament, file } => {
            let mut registry = Registry::load(path)?;
            let updates: Vec<ParticipantUpdate> = read_ron(&file)?;
            let participants = registry.update_standings(tournament, &updates)?;

            println!("{}", BracketNode::build(&participants));
            registry.save(path)?;
            info!("updated {} standings of the tournament {tournament}", updates.len());
        }
        Command::Check { file } => {
            let participants: Vec<Participant> = read_ron(&file)?;
            validate_structure(&participants).into_result(Error::Structural)?;

            println!("{}", BracketNode::build(&participants));
        }
    }

    Ok(())
}

fn report(error: &anyhow::Error) {
    match error.downcast_ref::<Error>().and_then(Error::violations) {
        Some(violations) => print_violations(violations),
        None => error!("{error}"),
    }
}

fn print_violations(violations: &Violations) {
    for violation in violations {
        eprintln!("{violation}");
    }
}

fn read_ron<T: DeserializeOwned>(file: &Path) -> anyhow::Result<T> {
    let string = fs::read_to_string(file)
        .map_err(|err| anyhow::Error::msg(format!("{}: {err}", file.display())))?;

    ron::from_str(&string).map_err(|err| anyhow::Error::msg(format!("RON: {}: {err}", file.display())))
}
