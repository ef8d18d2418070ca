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

use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    ENTRANTS,
    bracket::BracketNode,
    error::{Violation, Violations},
    standing::Participant,
};

/// How many horses may reach each round, indexed by round - 1.
const ROUND_LIMITS: [usize; 4] = [8, 4, 2, 1];

/// Checks that a proposed participant list is a legal bracket.
///
/// Every check runs, the result holds all of the violations found and is
/// empty when the list is legal.
#[must_use]
pub fn validate_structure(participants: &[Participant]) -> Violations {
    trace!("validate_structure({participants:?})");

    let mut violations = check_participants(participants);

    let bracket = BracketNode::build(participants);
    violations.extend(validate_tree(&bracket));
    violations.extend(check_contested(&bracket, participants));

    if !violations.is_empty() {
        debug!("invalid bracket {bracket}: {violations}");
    }

    violations
}

fn check_participants(participants: &[Participant]) -> Violations {
    let mut violations = Violations::default();

    if participants.len() > ENTRANTS {
        violations.push(Violation::TooManyParticipants(participants.len()));
    }

    let mut horses = FxHashSet::default();
    let mut entry_numbers: FxHashMap<i64, &Participant> = FxHashMap::default();
    let mut round_counts = [0; ROUND_LIMITS.len()];

    for participant in participants {
        let name = &participant.horse.name;

        if !horses.insert(participant.horse.id) {
            violations.push(Violation::DuplicateHorse(name.clone()));
        }

        let Some(placement) = participant.placement else {
            continue;
        };

        if (0..=7).contains(&placement.entry_number) {
            if let Some(first) = entry_numbers.get(&placement.entry_number) {
                violations.push(Violation::DuplicateEntryNumber {
                    entry_number: placement.entry_number,
                    first: first.horse.name.clone(),
                    second: name.clone(),
                });
            } else {
                entry_numbers.insert(placement.entry_number, participant);
            }
        } else {
            violations.push(Violation::EntryNumberOutOfRange {
                name: name.clone(),
                entry_number: placement.entry_number,
            });
        }

        match placement
            .round_reached
            .checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| round_counts.get_mut(index))
        {
            Some(count) => *count += 1,
            None => violations.push(Violation::RoundOutOfRange {
                name: name.clone(),
                round: placement.round_reached,
            }),
        }
    }

    for (round, (count, limit)) in (1..).zip(round_counts.into_iter().zip(ROUND_LIMITS)) {
        if count > limit {
            violations.push(Violation::RoundOverbooked {
                round,
                count,
                limit,
            });
        }
    }

    violations
}

/// Checks the winners recorded in a bracket against the nodes below them.
///
/// Leaves are not checked, a seed slot has no match below it.
#[must_use]
pub fn validate_tree(bracket: &BracketNode) -> Violations {
    let mut violations = Violations::default();
    check_node(bracket, &mut violations);
    violations
}

fn check_node(node: &BracketNode, violations: &mut Violations) {
    let Some((lower, upper)) = node.children() else {
        return;
    };

    if let Some(winner) = &node.participant {
        let name = &winner.horse.name;

        if !winner
            .entry_number()
            .is_some_and(|entry_number| node.range.contains(entry_number))
        {
            violations.push(Violation::WrongSide {
                name: name.clone(),
                range: node.range,
            });
        }

        match (lower.participant.as_ref(), upper.participant.as_ref()) {
            (None, None) => violations.push(Violation::NoRecordedOpponent {
                name: name.clone(),
                round: node.round,
            }),
            (lower_winner, upper_winner) => {
                let advanced =
                    |child: Option<&Participant>| child.is_some_and(|child| child.is(winner));

                if !advanced(lower_winner) && !advanced(upper_winner) {
                    violations.push(Violation::WinnerNotAdvanced {
                        name: name.clone(),
                        round: node.round,
                    });
                }
            }
        }
    }

    check_node(lower, violations);
    check_node(upper, violations);
}

/// Only one horse per node can have won its way into it. The bracket shows
/// just one of them, so the claims are counted on the flat list.
fn check_contested(bracket: &BracketNode, participants: &[Participant]) -> Violations {
    let mut violations = Violations::default();

    bracket.visit(&mut |node| {
        if node.is_leaf() {
            return;
        }

        let count = participants
            .iter()
            .filter_map(|participant| participant.placement)
            .filter(|placement| {
                node.range.contains(placement.entry_number) && placement.round_reached >= node.round
            })
            .count();

        if count > 1 {
            violations.push(Violation::ContestedRound {
                round: node.round,
                range: node.range,
                count,
            });
        }
    });

    violations
}
