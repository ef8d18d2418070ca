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

use std::{fs, io::ErrorKind, path::Path};

use chrono::NaiveDate;
use log::{debug, info, trace};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    bracket::BracketNode,
    compatibility::check_compatibility,
    error::{Error, Violation, Violations},
    seed::{StandingHistory, seed_round_one},
    standing::{
        Horse, HorseId, Participant, ParticipantUpdate, Placement, Standing, Tournament,
        TournamentId,
    },
    validate::validate_structure,
};

/// Horses, tournaments and the standings that join them.
///
/// Every operation that reads the standings, checks them and writes them
/// back takes `&mut self`, so two updates of the same tournament can't
/// interleave. Share it between threads behind a `Mutex`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Registry {
    #[serde(default)]
    pub horses: FxHashMap<HorseId, Horse>,
    #[serde(default)]
    pub tournaments: FxHashMap<TournamentId, Tournament>,
    #[serde(default)]
    pub standings: Vec<Standing>,
}

impl Registry {
    /// Reads a registry written by [`Registry::save`]. A missing file is an
    /// empty registry.
    ///
    /// # Errors
    ///
    /// If the file can't be read or isn't a valid registry.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(string) => {
                let registry: Self = ron::from_str(&string)
                    .map_err(|err| anyhow::Error::msg(format!("RON: {}: {err}", path.display())))?;

                debug!(
                    "loaded {} horses and {} tournaments from {}",
                    registry.horses.len(),
                    registry.tournaments.len(),
                    path.display()
                );
                Ok(registry)
            }
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    info!("{} doesn't exist yet, starting empty", path.display());
                    Ok(Self::default())
                }
                _ => Err(anyhow::Error::msg(format!("{}: {err}", path.display()))),
            },
        }
    }

    /// Writes the registry as pretty RON. The file is replaced in one step.
    ///
    /// # Errors
    ///
    /// If serializing or writing fails.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        let mut temporary = path.as_os_str().to_owned();
        temporary.push(".tmp");

        fs::write(&temporary, string)?;
        fs::rename(&temporary, path)?;

        debug!("saved {}", path.display());
        Ok(())
    }

    pub fn add_horse(&mut self, horse: Horse) {
        self.horses.insert(horse.id, horse);
    }

    /// Adds a tournament and registers its horses, unplaced.
    ///
    /// # Errors
    ///
    /// If one of the horses doesn't exist.
    pub fn add_tournament(&mut self, tournament: Tournament, horses: &[HorseId]) -> Result<(), Error> {
        if let Some(missing) = horses.iter().find(|&&id| !self.horses.contains_key(&id)) {
            return Err(Error::HorseNotFound(*missing));
        }

        for &horse_id in horses {
            let registered = self
                .standings
                .iter()
                .any(|standing| standing.tournament_id == tournament.id && standing.horse_id == horse_id);

            if !registered {
                self.standings.push(Standing::unplaced(tournament.id, horse_id));
            }
        }

        info!("added the tournament {} with {} horses", tournament.name, horses.len());
        self.tournaments.insert(tournament.id, tournament);
        Ok(())
    }

    /// Removes a tournament together with all of its standings.
    pub fn remove_tournament(&mut self, id: TournamentId) -> Option<Tournament> {
        self.standings.retain(|standing| standing.tournament_id != id);
        self.tournaments.remove(&id)
    }

    /// # Errors
    ///
    /// If the tournament doesn't exist.
    pub fn tournament(&self, id: TournamentId) -> Result<&Tournament, Error> {
        self.tournaments.get(&id).ok_or(Error::TournamentNotFound(id))
    }

    /// The standings of a tournament joined with their horses.
    ///
    /// # Errors
    ///
    /// If the tournament or one of its horses doesn't exist.
    pub fn participants(&self, id: TournamentId) -> Result<Vec<Participant>, Error> {
        self.tournament(id)?;

        self.standings
            .iter()
            .filter(|standing| standing.tournament_id == id)
            .map(|standing| {
                let horse = self
                    .horses
                    .get(&standing.horse_id)
                    .ok_or(Error::HorseNotFound(standing.horse_id))?;

                Ok(Participant::new(horse.clone(), standing.placement))
            })
            .collect()
    }

    /// # Errors
    ///
    /// If the tournament or one of its horses doesn't exist.
    pub fn bracket(&self, id: TournamentId) -> Result<BracketNode, Error> {
        Ok(BracketNode::build(&self.participants(id)?))
    }

    /// Replaces the placements of a tournament's horses.
    ///
    /// Horses the update doesn't mention keep their placements. The whole
    /// proposal has to be a legal bracket, and once anything is placed it may
    /// not overwrite a recorded result.
    ///
    /// # Errors
    ///
    /// If the tournament doesn't exist, or with every structural or
    /// compatibility violation found.
    pub fn update_standings(
        &mut self,
        id: TournamentId,
        updates: &[ParticipantUpdate],
    ) -> Result<Vec<Participant>, Error> {
        trace!("update_standings({id}, {updates:?})");

        let current = self.participants(id)?;
        let (proposed, mut violations) = propose(&current, updates);

        violations.extend(validate_structure(&proposed));
        violations.into_result(Error::Structural)?;

        if current.iter().any(|participant| participant.placement.is_some()) {
            check_compatibility(&BracketNode::build(&current), &BracketNode::build(&proposed))
                .into_result(Error::Compatibility)?;
        }

        for participant in &proposed {
            self.place(participant.standing(id));
        }

        debug!("updated the standings of {id}: {}", BracketNode::build(&proposed));
        self.participants(id)
    }

    /// Seeds round 1 of a tournament from the last 12 months of results.
    ///
    /// # Errors
    ///
    /// If the tournament doesn't exist, doesn't have 8 horses, or was already
    /// seeded.
    pub fn generate_round_one(&mut self, id: TournamentId) -> Result<Vec<Participant>, Error> {
        let tournament = self.tournament(id)?;
        let standings = seed_round_one(tournament, &self.participants(id)?, &*self)?;

        for standing in standings {
            self.place(standing);
        }

        info!("generated round 1 of {id}");
        self.participants(id)
    }

    fn place(&mut self, placed: Standing) {
        if let Some(standing) = self.standings.iter_mut().find(|standing| {
            standing.tournament_id == placed.tournament_id && standing.horse_id == placed.horse_id
        }) {
            standing.placement = placed.placement;
        }
    }
}

impl StandingHistory for Registry {
    fn standings_between(&self, horse: HorseId, from: NaiveDate, to: NaiveDate) -> Vec<Standing> {
        self.standings
            .iter()
            .filter(|standing| standing.horse_id == horse)
            .filter(|standing| {
                self.tournaments.get(&standing.tournament_id).is_some_and(|tournament| {
                    from <= tournament.start_date && tournament.end_date <= to
                })
            })
            .cloned()
            .collect()
    }
}

/// Lays the updates over the current participants.
fn propose(current: &[Participant], updates: &[ParticipantUpdate]) -> (Vec<Participant>, Violations) {
    let mut proposed = Vec::with_capacity(current.len());
    let mut violations = Violations::default();

    for update in updates {
        let Some(registered) = current.iter().find(|participant| participant.horse.id == update.horse_id)
        else {
            violations.push(Violation::NotRegistered(update.horse_id));
            continue;
        };

        match Placement::from_columns(update.entry_number, update.round_reached) {
            Ok(placement) => proposed.push(Participant::new(registered.horse.clone(), placement)),
            Err(_) => violations.push(Violation::HalfPlaced {
                name: registered.horse.name.clone(),
            }),
        }
    }

    for participant in current {
        if !updates.iter().any(|update| update.horse_id == participant.horse.id) {
            proposed.push(participant.clone());
        }
    }

    (proposed, violations)
}
