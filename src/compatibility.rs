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

use crate::{
    bracket::BracketNode,
    error::{Violation, Violations},
};

/// Compares the bracket of the stored standings with a proposed one.
///
/// Results are append only: every horse recorded in a node, the final
/// included, has to stay where it is. A node that was empty may be filled.
#[must_use]
pub fn check_compatibility(current: &BracketNode, proposed: &BracketNode) -> Violations {
    trace!("check_compatibility({current}, {proposed})");

    let mut violations = Violations::default();
    compare(current, proposed, &mut violations);

    if !violations.is_empty() {
        debug!("incompatible with {current}: {violations}");
    }

    violations
}

fn compare(recorded: &BracketNode, candidate: &BracketNode, violations: &mut Violations) {
    if let Some(recorded_winner) = &recorded.participant {
        let kept = candidate
            .participant
            .as_ref()
            .is_some_and(|candidate_winner| candidate_winner.is(recorded_winner));

        if !kept {
            violations.push(Violation::ResultOverwritten {
                round: recorded.round,
                range: recorded.range,
                recorded: recorded_winner.horse.name.clone(),
                proposed: candidate
                    .participant
                    .as_ref()
                    .map_or_else(|| "null".to_string(), |winner| winner.horse.name.clone()),
            });
        }
    }

    if let (Some((recorded_lower, recorded_upper)), Some((candidate_lower, candidate_upper))) =
        (recorded.children(), candidate.children())
    {
        compare(recorded_lower, candidate_lower, violations);
        compare(recorded_upper, candidate_upper, violations);
    }
}
