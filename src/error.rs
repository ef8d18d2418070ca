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

use std::fmt;

use thiserror::Error;

use crate::{
    bracket::EntryRange,
    standing::{HorseId, TournamentId},
};

/// One thing wrong with a proposed set of standings.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Violation {
    #[error("a tournament can have at most 8 horses, found {0}")]
    TooManyParticipants(usize),
    #[error("the horse {0} appears more than once")]
    DuplicateHorse(String),
    #[error("the horse {0} is not registered in this tournament")]
    NotRegistered(HorseId),
    #[error("the horse {name} has only one of entry number and round reached set")]
    HalfPlaced { name: String },
    #[error("the horse {name} has the entry number {entry_number}, it has to be between 0 and 7")]
    EntryNumberOutOfRange { name: String, entry_number: i64 },
    #[error("the horse {name} reached round {round}, a round has to be between 1 and 4")]
    RoundOutOfRange { name: String, round: i64 },
    #[error("the entry number {entry_number} is taken by both {first} and {second}")]
    DuplicateEntryNumber {
        entry_number: i64,
        first: String,
        second: String,
    },
    #[error("only {limit} horses can reach round {round}, found {count}")]
    RoundOverbooked {
        round: i64,
        count: usize,
        limit: usize,
    },
    #[error("the horse {name} is on the wrong side of the bracket, expected an entry number in {range}")]
    WrongSide { name: String, range: EntryRange },
    #[error("the winner {name} of round {round} had no recorded opponent")]
    NoRecordedOpponent { name: String, round: i64 },
    #[error("the winner {name} of round {round} did not win either match below it")]
    WinnerNotAdvanced { name: String, round: i64 },
    #[error("{count} horses with entry numbers in {range} claim round {round}")]
    ContestedRound {
        round: i64,
        range: EntryRange,
        count: usize,
    },
    #[error(
        "the recorded result of round {round} for entry numbers {range} would be overwritten: {recorded} -> {proposed}"
    )]
    ResultOverwritten {
        round: i64,
        range: EntryRange,
        recorded: String,
        proposed: String,
    },
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    /// # Errors
    ///
    /// If there is at least one violation, wrapped by `kind`.
    pub fn into_result(self, kind: fn(Violations) -> Error) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(kind(self))
        }
    }
}

impl Extend<Violation> for Violations {
    fn extend<T: IntoIterator<Item = Violation>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let violations: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", violations.join("; "))
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("the standings don't form a legal bracket: {0}")]
    Structural(Violations),
    #[error("the standings are incompatible with the recorded results: {0}")]
    Compatibility(Violations),
    #[error("round 1 was already generated, these horses are placed: {}", .horses.join(", "))]
    SeedingPrecondition { horses: Vec<String> },
    #[error("generating round 1 needs exactly 8 horses, found {0}")]
    EntrantCount(usize),
    #[error("the tournament {0} doesn't exist")]
    TournamentNotFound(TournamentId),
    #[error("the horse {0} doesn't exist")]
    HorseNotFound(HorseId),
}

impl Error {
    /// The individual violations, if this is a structural or compatibility
    /// error.
    #[must_use]
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Self::Structural(violations) | Self::Compatibility(violations) => Some(violations),
            _ => None,
        }
    }
}
