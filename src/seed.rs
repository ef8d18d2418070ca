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

use chrono::NaiveDate;
use log::{debug, trace};

use crate::{
    ENTRANTS,
    error::Error,
    standing::{HorseId, Participant, Placement, Standing, Tournament},
};

/// Looks up past results of a horse.
pub trait StandingHistory {
    /// The standings of `horse` in every tournament that starts on or after
    /// `from` and ends on or before `to`.
    fn standings_between(&self, horse: HorseId, from: NaiveDate, to: NaiveDate) -> Vec<Standing>;
}

impl<F> StandingHistory for F
where
    F: Fn(HorseId, NaiveDate, NaiveDate) -> Vec<Standing>,
{
    fn standings_between(&self, horse: HorseId, from: NaiveDate, to: NaiveDate) -> Vec<Standing> {
        self(horse, from, to)
    }
}

/// The points a finish is worth: 1 for reaching round 2, 3 for the semi
/// finals and 5 for winning.
#[must_use]
pub const fn points_for_round(round_reached: Option<i64>) -> u64 {
    match round_reached {
        Some(2) => 1,
        Some(3) => 3,
        Some(4) => 5,
        _ => 0,
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScoredEntrant {
    pub participant: Participant,
    pub points: u64,
}

impl fmt::Display for ScoredEntrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.participant.horse.name, self.points)
    }
}

/// Scores every entrant on its results in other tournaments within the
/// scoring window and orders them best first, ties by name.
#[must_use]
pub fn rank_entrants<H: StandingHistory + ?Sized>(
    tournament: &Tournament,
    entrants: &[Participant],
    history: &H,
) -> Vec<ScoredEntrant> {
    let (from, to) = tournament.scoring_window();

    let mut ranked: Vec<ScoredEntrant> = entrants
        .iter()
        .map(|participant| {
            let points = history
                .standings_between(participant.horse.id, from, to)
                .iter()
                .filter(|standing| standing.tournament_id != tournament.id)
                .map(|standing| points_for_round(standing.round_reached()))
                .sum();

            ScoredEntrant {
                participant: participant.clone(),
                points,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| a.participant.horse.name.cmp(&b.participant.horse.name))
            .then_with(|| a.participant.horse.id.cmp(&b.participant.horse.id))
    });

    ranked
}

/// Generates the round 1 standings of a tournament.
///
/// The best ranked horse gets entry 0 and meets the worst ranked one on entry
/// 1, the second best gets entry 2 against the second worst, and so on.
///
/// # Errors
///
/// If there aren't exactly 8 entrants, or if any of them is already placed.
pub fn seed_round_one<H: StandingHistory + ?Sized>(
    tournament: &Tournament,
    entrants: &[Participant],
    history: &H,
) -> Result<Vec<Standing>, Error> {
    trace!("seed_round_one({}, {entrants:?})", tournament.id);

    if entrants.len() != ENTRANTS {
        return Err(Error::EntrantCount(entrants.len()));
    }

    let placed: Vec<String> = entrants
        .iter()
        .filter(|participant| participant.placement.is_some())
        .map(|participant| participant.horse.name.clone())
        .collect();

    if !placed.is_empty() {
        return Err(Error::SeedingPrecondition { horses: placed });
    }

    let ranked = rank_entrants(tournament, entrants, history);
    debug!(
        "ranked entrants: {}",
        ranked.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
    );

    let mut standings = Vec::with_capacity(ENTRANTS);
    for (pair, (high, low)) in (0..).zip(ranked.iter().zip(ranked.iter().rev()).take(ENTRANTS / 2)) {
        for (seed, entrant) in [(2 * pair, high), (2 * pair + 1, low)] {
            standings.push(Standing {
                tournament_id: tournament.id,
                horse_id: entrant.participant.horse.id,
                placement: Some(Placement::round_one(seed)),
            });
        }
    }

    Ok(standings)
}
