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

use log::{debug, trace};
use rustc_hash::FxHashMap;

use crate::{
    ENTRANTS, FINAL_ROUND,
    standing::{HorseId, Participant, Placement},
};

/// An inclusive range of entry numbers covered by one node of the bracket.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EntryRange {
    pub low: i64,
    pub high: i64,
}

impl EntryRange {
    pub const FULL: Self = Self::new(0, 7);

    #[must_use]
    pub const fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    /// The last entry number of the lower half. Floor division decides which
    /// half a boundary entry falls into.
    #[must_use]
    pub const fn split(self) -> i64 {
        self.low + (self.high - self.low) / 2
    }

    #[must_use]
    pub const fn halves(self) -> (Self, Self) {
        let split = self.split();
        (Self::new(self.low, split), Self::new(split + 1, self.high))
    }

    /// The range of the `index`th node of `round`, counting up from entry 0.
    #[cfg(test)]
    #[must_use]
    pub(crate) const fn of_node(round: i64, index: i64) -> Self {
        let width = 1 << (round - 1);
        Self::new(index * width, index * width + width - 1)
    }

    #[must_use]
    pub const fn contains(self, entry_number: i64) -> bool {
        self.low <= entry_number && entry_number <= self.high
    }
}

impl fmt::Display for EntryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// A node of a single-elimination bracket.
///
/// The root is the final (round 4) and covers every entry number. Each inner
/// node has exactly two children covering the lower and upper half of its
/// range. Leaves are the round 1 seed slots. `participant` is the horse that
/// won its way into this node, if one has been recorded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BracketNode {
    pub round: i64,
    pub range: EntryRange,
    pub participant: Option<Participant>,
    pub children: Option<Box<[BracketNode; 2]>>,
}

impl BracketNode {
    /// Rebuilds the bracket from a flat list of participants.
    ///
    /// Participants are slotted by entry number. Unplaced participants, entry
    /// numbers outside 0 to 7, and any later participant claiming an already
    /// taken slot are left out.
    #[must_use]
    pub fn build(participants: &[Participant]) -> Self {
        trace!("build({participants:?})");

        let slots = slots(participants);
        let root = Self::grow(FINAL_ROUND, EntryRange::FULL, &slots);

        debug!("built the bracket: {root}");
        root
    }

    /// A bracket without any participants: 15 nodes, 8 of them leaves.
    #[must_use]
    pub fn empty() -> Self {
        Self::grow(FINAL_ROUND, EntryRange::FULL, &[None; ENTRANTS])
    }

    #[must_use]
    pub const fn leaf(range: EntryRange, participant: Option<Participant>) -> Self {
        Self {
            round: 1,
            range,
            participant,
            children: None,
        }
    }

    #[must_use]
    pub fn branch(
        round: i64,
        range: EntryRange,
        participant: Option<Participant>,
        children: [BracketNode; 2],
    ) -> Self {
        Self {
            round,
            range,
            participant,
            children: Some(Box::new(children)),
        }
    }

    fn grow(round: i64, range: EntryRange, slots: &[Option<&Participant>; ENTRANTS]) -> Self {
        let mut in_range = slots
            .iter()
            .flatten()
            .filter(|participant| {
                participant
                    .entry_number()
                    .is_some_and(|entry_number| range.contains(entry_number))
            })
            .copied();

        if round <= 1 {
            return Self::leaf(range, in_range.next().cloned());
        }

        // The last qualifier wins, a contested round is reported by validation.
        let winner = in_range
            .rfind(|participant| {
                participant
                    .round_reached()
                    .is_some_and(|round_reached| round_reached >= round)
            })
            .cloned();

        let (lower, upper) = range.halves();
        Self::branch(
            round,
            range,
            winner,
            [
                Self::grow(round - 1, lower, slots),
                Self::grow(round - 1, upper, slots),
            ],
        )
    }

    #[must_use]
    pub fn children(&self) -> Option<(&Self, &Self)> {
        self.children.as_deref().map(|[lower, upper]| (lower, upper))
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Calls `visitor` on this node and then on every node below it, lower
    /// half first.
    pub fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a Self)) {
        visitor(self);

        if let Some((lower, upper)) = self.children() {
            lower.visit(visitor);
            upper.visit(visitor);
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_| count += 1);
        count
    }

    /// Reads the bracket back into participants ordered by entry number.
    ///
    /// The entry number of a horse is the position of its leaf. Its round is
    /// the round of the topmost node it occupies.
    #[must_use]
    pub fn flatten(&self) -> Vec<Participant> {
        let mut rounds = FxHashMap::default();
        let mut leaves = Vec::with_capacity(ENTRANTS);
        self.collect(&mut rounds, &mut leaves);

        (0_i64..)
            .zip(leaves)
            .filter_map(|(entry_number, leaf)| {
                let participant = leaf?;
                let round = rounds.get(&participant.horse.id).copied().unwrap_or(1);

                Some(Participant::new(
                    participant.horse.clone(),
                    Some(Placement::new(entry_number, round)),
                ))
            })
            .collect()
    }

    fn collect<'a>(
        &'a self,
        rounds: &mut FxHashMap<HorseId, i64>,
        leaves: &mut Vec<Option<&'a Participant>>,
    ) {
        if let Some(participant) = &self.participant {
            rounds.entry(participant.horse.id).or_insert(self.round);
        }

        match self.children() {
            Some((lower, upper)) => {
                lower.collect(rounds, leaves);
                upper.collect(rounds, leaves);
            }
            None => leaves.push(self.participant.as_ref()),
        }
    }
}

impl Default for BracketNode {
    fn default() -> Self {
        Self::empty()
    }
}

/// The compact rendering `name:{lower, upper}`, with bare names for leaves
/// and `null` for empty nodes.
impl fmt::Display for BracketNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.participant {
            Some(participant) => write!(f, "{}", participant.horse.name)?,
            None => write!(f, "null")?,
        }

        if let Some((lower, upper)) = self.children() {
            write!(f, ":{{{lower}, {upper}}}")?;
        }

        Ok(())
    }
}

fn slots(participants: &[Participant]) -> [Option<&Participant>; ENTRANTS] {
    let mut slots = [None; ENTRANTS];

    for participant in participants {
        if let Some(index) = participant
            .entry_number()
            .and_then(|entry_number| usize::try_from(entry_number).ok())
            && let Some(slot) = slots.get_mut(index)
            && slot.is_none()
        {
            *slot = Some(participant);
        }
    }

    slots
}
