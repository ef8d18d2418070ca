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

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type HorseId = u64;
pub type TournamentId = u64;

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Horse {
    pub id: HorseId,
    pub name: String,
    pub date_of_birth: NaiveDate,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Tournament {
    /// The dates whose results count towards seeding: the twelve months
    /// before the start up to the last day of this tournament.
    #[must_use]
    pub fn scoring_window(&self) -> (NaiveDate, NaiveDate) {
        let from = self
            .start_date
            .checked_sub_months(Months::new(12))
            .unwrap_or(NaiveDate::MIN);

        (from, self.end_date)
    }
}

/// Where a horse sits in a bracket: its seed slot and the furthest round it
/// is confirmed to have reached.
///
/// The two values only exist together. Storage keeps them as two nullable
/// columns, see [`Placement::from_columns`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Placement {
    pub entry_number: i64,
    pub round_reached: i64,
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("the entry number and the round reached have to be set together")]
pub struct HalfPlacement;

impl Placement {
    #[must_use]
    pub const fn new(entry_number: i64, round_reached: i64) -> Self {
        Self {
            entry_number,
            round_reached,
        }
    }

    #[must_use]
    pub const fn round_one(entry_number: i64) -> Self {
        Self::new(entry_number, 1)
    }

    /// # Errors
    ///
    /// If only one of the two columns is set.
    pub const fn from_columns(
        entry_number: Option<i64>,
        round_reached: Option<i64>,
    ) -> Result<Option<Self>, HalfPlacement> {
        match (entry_number, round_reached) {
            (Some(entry_number), Some(round_reached)) => {
                Ok(Some(Self::new(entry_number, round_reached)))
            }
            (None, None) => Ok(None),
            _ => Err(HalfPlacement),
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry {} round {}", self.entry_number, self.round_reached)
    }
}

/// One horse's progress in one tournament, as it is persisted.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Standing {
    pub tournament_id: TournamentId,
    pub horse_id: HorseId,
    #[serde(default)]
    pub placement: Option<Placement>,
}

impl Standing {
    #[must_use]
    pub const fn unplaced(tournament_id: TournamentId, horse_id: HorseId) -> Self {
        Self {
            tournament_id,
            horse_id,
            placement: None,
        }
    }

    #[must_use]
    pub fn entry_number(&self) -> Option<i64> {
        self.placement.map(|placement| placement.entry_number)
    }

    #[must_use]
    pub fn round_reached(&self) -> Option<i64> {
        self.placement.map(|placement| placement.round_reached)
    }
}

/// A standing joined with the identity of its horse.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Participant {
    pub horse: Horse,
    #[serde(default)]
    pub placement: Option<Placement>,
}

impl Participant {
    #[must_use]
    pub const fn new(horse: Horse, placement: Option<Placement>) -> Self {
        Self { horse, placement }
    }

    #[must_use]
    pub fn entry_number(&self) -> Option<i64> {
        self.placement.map(|placement| placement.entry_number)
    }

    #[must_use]
    pub fn round_reached(&self) -> Option<i64> {
        self.placement.map(|placement| placement.round_reached)
    }

    /// Whether both are the same horse, whatever their placements.
    #[must_use]
    pub fn is(&self, other: &Participant) -> bool {
        self.horse.id == other.horse.id
    }

    #[must_use]
    pub fn standing(&self, tournament_id: TournamentId) -> Standing {
        Standing {
            tournament_id,
            horse_id: self.horse.id,
            placement: self.placement,
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.placement {
            Some(placement) => write!(f, "{} ({placement})", self.horse.name),
            None => write!(f, "{} (unplaced)", self.horse.name),
        }
    }
}

/// A caller's proposed placement for one horse, with the columns still
/// independently nullable.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ParticipantUpdate {
    pub horse_id: HorseId,
    #[serde(default)]
    pub entry_number: Option<i64>,
    #[serde(default)]
    pub round_reached: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_columns() {
        assert_eq!(Placement::from_columns(None, None), Ok(None));
        assert_eq!(
            Placement::from_columns(Some(3), Some(2)),
            Ok(Some(Placement::new(3, 2)))
        );
        assert_eq!(Placement::from_columns(Some(3), None), Err(HalfPlacement));
        assert_eq!(Placement::from_columns(None, Some(1)), Err(HalfPlacement));
    }

    #[test]
    fn scoring_window_is_twelve_months_back() -> anyhow::Result<()> {
        let tournament = Tournament {
            id: 1,
            name: "Spring Cup".to_string(),
            start_date: "2024-03-31".parse()?,
            end_date: "2024-04-02".parse()?,
        };

        let (from, to) = tournament.scoring_window();
        assert_eq!(from, "2023-03-31".parse::<NaiveDate>()?);
        assert_eq!(to, tournament.end_date);

        Ok(())
    }

    #[test]
    fn leap_day_window_clamps() -> anyhow::Result<()> {
        let tournament = Tournament {
            id: 1,
            name: "Leap Cup".to_string(),
            start_date: "2024-02-29".parse()?,
            end_date: "2024-03-01".parse()?,
        };

        assert_eq!(
            tournament.scoring_window().0,
            "2023-02-28".parse::<NaiveDate>()?
        );

        Ok(())
    }
}
