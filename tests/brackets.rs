use chrono::NaiveDate;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use paddock::{
    Error, Violation,
    bracket::{BracketNode, EntryRange},
    compatibility::check_compatibility,
    registry::Registry,
    seed::{rank_entrants, seed_round_one},
    standing::{Horse, HorseId, Participant, ParticipantUpdate, Placement, Standing, Tournament},
    validate::{validate_structure, validate_tree},
};

/// Fixed seeds, so a failing bracket can be replayed.
const SEEDS: [u64; 4] = [7, 1_234, 98_765, 4_242_424_242];

const NAMES: [&str; 8] = [
    "Zephyr", "Bramble", "Ostara", "Juniper", "Marlow", "Cinder", "Tamsin", "Fable",
];

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn horse(id: HorseId, name: &str) -> Horse {
    Horse {
        id,
        name: name.to_string(),
        date_of_birth: date(2019, 4, 12),
    }
}

fn horses() -> Vec<Horse> {
    (1..).zip(NAMES).map(|(id, name)| horse(id, name)).collect()
}

/// Plays out a whole bracket, each match going to a random side.
fn random_finished_bracket(rng: &mut impl Rng) -> Vec<Participant> {
    let mut horses = horses();
    horses.shuffle(rng);

    let mut rounds = [1; 8];
    let mut alive: Vec<usize> = (0..8).collect();

    while alive.len() > 1 {
        alive = alive
            .chunks(2)
            .map(|pair| {
                let winner = pair[rng.random_range(0..2)];
                rounds[winner] += 1;
                winner
            })
            .collect();
    }

    horses
        .into_iter()
        .zip(rounds)
        .zip(0_i64..)
        .map(|((horse, round), entry)| Participant::new(horse, Some(Placement::new(entry, round))))
        .collect()
}

#[test]
fn scenario_a_seeding_without_history() -> anyhow::Result<()> {
    let tournament = Tournament {
        id: 1,
        name: "Harvest Stakes".to_string(),
        start_date: date(2025, 9, 6),
        end_date: date(2025, 9, 7),
    };

    let entrants: Vec<Participant> = horses()
        .into_iter()
        .map(|horse| Participant::new(horse, None))
        .collect();

    let no_history = |_: HorseId, _: NaiveDate, _: NaiveDate| -> Vec<Standing> { Vec::new() };

    let ranked = rank_entrants(&tournament, &entrants, &no_history);
    assert!(ranked.iter().all(|entrant| entrant.points == 0));

    let standings = seed_round_one(&tournament, &entrants, &no_history)?;
    let mut by_entry: Vec<(i64, &str)> = standings
        .iter()
        .filter_map(|standing| {
            let horse = entrants
                .iter()
                .find(|participant| participant.horse.id == standing.horse_id)?;
            Some((standing.entry_number()?, horse.horse.name.as_str()))
        })
        .collect();
    by_entry.sort_unstable();

    // Bramble, Cinder, Fable, Juniper, Marlow, Ostara, Tamsin, Zephyr
    assert_eq!(
        by_entry,
        [
            (0, "Bramble"),
            (1, "Zephyr"),
            (2, "Cinder"),
            (3, "Tamsin"),
            (4, "Fable"),
            (5, "Ostara"),
            (6, "Juniper"),
            (7, "Marlow"),
        ]
    );

    Ok(())
}

#[test]
fn scenario_b_shared_entry_number() {
    let participants = vec![
        Participant::new(horse(1, "Zephyr"), Some(Placement::round_one(3))),
        Participant::new(horse(2, "Bramble"), Some(Placement::round_one(3))),
    ];

    let violations = validate_structure(&participants);
    assert!(violations.iter().any(|violation| matches!(
        violation,
        Violation::DuplicateEntryNumber { entry_number: 3, .. }
    )));
}

#[test]
fn scenario_c_changed_winner() {
    let field = |rounds: [i64; 8]| -> Vec<Participant> {
        horses()
            .into_iter()
            .zip(rounds)
            .zip(0..)
            .map(|((horse, round), entry)| {
                Participant::new(horse, Some(Placement::new(entry, round)))
            })
            .collect()
    };

    let current = BracketNode::build(&field([1, 3, 2, 1, 1, 1, 1, 1]));
    let proposed = BracketNode::build(&field([1, 2, 3, 1, 1, 1, 1, 1]));

    assert_eq!(
        check_compatibility(&current, &proposed).0,
        vec![Violation::ResultOverwritten {
            round: 3,
            range: EntryRange::new(0, 3),
            recorded: "Bramble".to_string(),
            proposed: "Ostara".to_string(),
        }]
    );
}

#[test]
fn scenario_d_winner_without_opponent() {
    let winner = Participant::new(horse(1, "Zephyr"), Some(Placement::new(4, 2)));
    let bracket = BracketNode::branch(
        2,
        EntryRange::new(4, 5),
        Some(winner),
        [
            BracketNode::leaf(EntryRange::new(4, 4), None),
            BracketNode::leaf(EntryRange::new(5, 5), None),
        ],
    );

    assert_eq!(
        validate_tree(&bracket).0,
        vec![Violation::NoRecordedOpponent {
            name: "Zephyr".to_string(),
            round: 2,
        }]
    );
}

#[test]
fn scenario_e_empty_standings() {
    let bracket = BracketNode::build(&[]);

    assert_eq!(bracket.node_count(), 15);

    let mut occupied = 0;
    bracket.visit(&mut |node| {
        if node.participant.is_some() {
            occupied += 1;
        }
    });
    assert_eq!(occupied, 0);

    assert!(validate_structure(&[]).is_empty());
}

#[test]
fn finished_brackets_round_trip() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..16 {
            let participants = random_finished_bracket(&mut rng);
            assert!(validate_structure(&participants).is_empty(), "seed {seed}");

            let bracket = BracketNode::build(&participants);
            assert_eq!(bracket.flatten(), participants, "seed {seed}");

            bracket.visit(&mut |node| {
                if let Some(participant) = &node.participant {
                    assert!(
                        participant
                            .entry_number()
                            .is_some_and(|entry_number| node.range.contains(entry_number)),
                        "seed {seed}"
                    );
                }
            });
        }
    }
}

#[test]
fn validation_is_idempotent() {
    for seed in SEEDS {
        let mut participants = random_finished_bracket(&mut StdRng::seed_from_u64(seed));
        participants[0].placement = Some(Placement::new(9, 6));
        participants[1].placement = participants[2].placement;

        let first = validate_structure(&participants);
        assert!(!first.is_empty(), "seed {seed}");
        assert_eq!(first, validate_structure(&participants), "seed {seed}");
    }
}

#[test]
fn seeding_pairs_best_with_worst() -> anyhow::Result<()> {
    let tournament = Tournament {
        id: 100,
        name: "Frost Cup".to_string(),
        start_date: date(2026, 1, 3),
        end_date: date(2026, 1, 4),
    };

    let entrants: Vec<Participant> = horses()
        .into_iter()
        .map(|horse| Participant::new(horse, None))
        .collect();

    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let past: Vec<Standing> = (1..=8)
            .flat_map(|horse_id| {
                (0..3).map(move |tournament_id| Standing {
                    tournament_id,
                    horse_id,
                    placement: None,
                })
            })
            .map(|mut standing| {
                standing.placement = Some(Placement::new(0, rng.random_range(1..=4)));
                standing
            })
            .collect();

        let history = |horse: HorseId, _: NaiveDate, _: NaiveDate| -> Vec<Standing> {
            past.iter()
                .filter(|standing| standing.horse_id == horse)
                .cloned()
                .collect()
        };

        let ranked = rank_entrants(&tournament, &entrants, &history);
        assert!(
            ranked.windows(2).all(|pair| pair[0].points >= pair[1].points),
            "seed {seed}"
        );

        let standings = seed_round_one(&tournament, &entrants, &history)?;
        for (rank, entrant) in (0_i64..).zip(&ranked) {
            let entry_number = standings
                .iter()
                .find(|standing| standing.horse_id == entrant.participant.horse.id)
                .and_then(Standing::entry_number);

            let expected = if rank < 4 { 2 * rank } else { 2 * (7 - rank) + 1 };
            assert_eq!(entry_number, Some(expected), "seed {seed}");
        }
    }

    Ok(())
}

#[test]
fn a_tournament_from_seeding_to_the_final() -> anyhow::Result<()> {
    let mut registry = Registry::default();
    for horse in horses() {
        registry.add_horse(horse);
    }

    registry.add_tournament(
        Tournament {
            id: 7,
            name: "Midsummer Derby".to_string(),
            start_date: date(2026, 6, 20),
            end_date: date(2026, 6, 21),
        },
        &[1, 2, 3, 4, 5, 6, 7, 8],
    )?;

    let seeded = registry.generate_round_one(7)?;
    assert!(seeded.iter().all(|participant| participant.round_reached() == Some(1)));

    let bracket = registry.bracket(7)?;
    let mut leaves = Vec::new();
    bracket.visit(&mut |node| {
        if node.is_leaf()
            && let Some(participant) = &node.participant
        {
            leaves.push(participant.clone());
        }
    });
    assert_eq!(leaves.len(), 8);

    let winners_of = |pairs: &[Participant], round: i64| -> Vec<_> {
        pairs
            .chunks(2)
            .filter_map(|pair| pair.first())
            .map(|participant| ParticipantUpdate {
                horse_id: participant.horse.id,
                entry_number: participant.entry_number(),
                round_reached: Some(round),
            })
            .collect()
    };

    // The lower entry number wins every match.
    registry.update_standings(7, &winners_of(&leaves, 2))?;
    let semi_finalists: Vec<Participant> = leaves.iter().step_by(2).cloned().collect();
    registry.update_standings(7, &winners_of(&semi_finalists, 3))?;
    let finalists: Vec<Participant> = semi_finalists.iter().step_by(2).cloned().collect();
    let participants = registry.update_standings(7, &winners_of(&finalists, 4))?;

    assert!(validate_structure(&participants).is_empty());

    let champion = registry
        .bracket(7)?
        .participant
        .map(|participant| participant.horse.name);
    assert_eq!(champion, Some(leaves[0].horse.name.clone()));

    // The final is recorded, it can't be handed to the other finalist.
    let error = registry.update_standings(
        7,
        &[
            ParticipantUpdate {
                horse_id: finalists[0].horse.id,
                entry_number: finalists[0].entry_number(),
                round_reached: Some(2),
            },
            ParticipantUpdate {
                horse_id: finalists[1].horse.id,
                entry_number: finalists[1].entry_number(),
                round_reached: Some(3),
            },
        ],
    );
    assert!(matches!(error, Err(Error::Compatibility(_))));

    assert!(matches!(
        registry.generate_round_one(7),
        Err(Error::SeedingPrecondition { ref horses }) if horses.len() == 8
    ));

    Ok(())
}
