//! Integration tests for result reporting and winner advancement.

use division_bracket_web::{
    advance_winner, apply_match_update, create_match, delete_match, division_champion,
    generate_bracket, receives_entrants, report_result, Advancement, BracketError, BracketMatch,
    BracketStore, Division, MatchPatch, MatchStatus, MemoryStore, NewMatch, NewParticipant,
    Participant, Slot, MAX_ROUNDS,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

fn bracket_with_players(
    n: usize,
    seed: u64,
) -> (MemoryStore, Vec<Participant>, Vec<BracketMatch>) {
    let mut store = MemoryStore::new();
    let players = (0..n)
        .map(|i| {
            store
                .create_participant(NewParticipant::named(format!("P{i}"), Division::Elite))
                .unwrap()
        })
        .collect();
    let mut rng = StdRng::seed_from_u64(seed);
    let matches = generate_bracket(&mut store, &mut rng, Division::Elite)
        .unwrap()
        .into_matches();
    (store, players, matches)
}

fn find(store: &MemoryStore, round: u32, match_number: u32) -> BracketMatch {
    store
        .list_matches(Division::Elite)
        .unwrap()
        .into_iter()
        .find(|m| m.round == round && m.match_number == match_number)
        .unwrap()
}

#[test]
fn winners_fill_slots_by_match_parity() {
    let (mut store, _, _) = bracket_with_players(8, 1);
    let mut winners = Vec::new();
    for k in 1..=4 {
        let m = find(&store, 1, k);
        let winner = if k % 2 == 0 {
            m.participant2_id.unwrap()
        } else {
            m.participant1_id.unwrap()
        };
        let updated = report_result(&mut store, m.id, winner).unwrap();
        assert_eq!(updated.status, MatchStatus::Completed);
        assert_eq!(updated.winner_id, Some(winner));
        winners.push(winner);
    }

    let semi_1 = find(&store, 2, 1);
    let semi_2 = find(&store, 2, 2);
    assert_eq!(semi_1.participant1_id, Some(winners[0]));
    assert_eq!(semi_1.participant2_id, Some(winners[1]));
    assert_eq!(semi_2.participant1_id, Some(winners[2]));
    assert_eq!(semi_2.participant2_id, Some(winners[3]));
    for semi in [&semi_1, &semi_2] {
        assert_eq!(semi.status, MatchStatus::Pending);
        assert!(semi.is_playable());
    }

    let final_match = find(&store, 3, 1);
    assert_eq!(final_match.participant1_id, None);
    assert_eq!(final_match.participant2_id, None);
}

#[test]
fn half_filled_match_is_not_playable() {
    let (mut store, _, _) = bracket_with_players(4, 2);
    let m = find(&store, 1, 2);
    report_result(&mut store, m.id, m.participant1_id.unwrap()).unwrap();

    let final_match = find(&store, 2, 1);
    assert_eq!(final_match.participant1_id, None);
    assert_eq!(final_match.participant2_id, m.participant1_id);
    assert!(!final_match.is_playable());
}

#[test]
fn advancement_never_overwrites_a_filled_slot() {
    let (mut store, players, _) = bracket_with_players(4, 3);
    let m1 = find(&store, 1, 1);
    let final_match = find(&store, 2, 1);
    let squatter = players
        .iter()
        .find(|p| !m1.has_participant(p.id))
        .unwrap()
        .id;
    store
        .update_match(final_match.id, &MatchPatch::fill(Slot::First, squatter))
        .unwrap();

    let winner = m1.participant1_id.unwrap();
    report_result(&mut store, m1.id, winner).unwrap();
    assert_eq!(find(&store, 2, 1).participant1_id, Some(squatter));

    let completed = find(&store, 1, 1);
    assert_eq!(
        advance_winner(&mut store, &completed).unwrap(),
        Advancement::SlotTaken {
            target: final_match.id,
            slot: Slot::First,
            occupant: squatter,
        }
    );
}

#[test]
fn repeated_report_is_idempotent() {
    let (mut store, _, _) = bracket_with_players(4, 4);
    let m = find(&store, 1, 1);
    let winner = m.participant2_id.unwrap();
    let first = report_result(&mut store, m.id, winner).unwrap();
    let snapshot = store.list_matches(Division::Elite).unwrap();

    let again = report_result(&mut store, m.id, winner).unwrap();
    assert_eq!(again, first);
    assert_eq!(store.list_matches(Division::Elite).unwrap(), snapshot);
    assert_eq!(
        advance_winner(&mut store, &again).unwrap(),
        Advancement::AlreadyAdvanced {
            target: find(&store, 2, 1).id,
            slot: Slot::First,
        }
    );
}

#[test]
fn completed_match_rejects_changes() {
    let (mut store, _, _) = bracket_with_players(4, 5);
    let m = find(&store, 1, 1);
    let (p1, p2) = (m.participant1_id.unwrap(), m.participant2_id.unwrap());
    report_result(&mut store, m.id, p1).unwrap();

    assert_eq!(
        report_result(&mut store, m.id, p2),
        Err(BracketError::MatchCompleted(m.id))
    );
    let reopen = MatchPatch {
        status: Some(MatchStatus::Pending),
        ..MatchPatch::default()
    };
    assert_eq!(
        apply_match_update(&mut store, m.id, &reopen),
        Err(BracketError::MatchCompleted(m.id))
    );
    let stored = find(&store, 1, 1);
    assert_eq!(stored.winner_id, Some(p1));
    assert_eq!(stored.status, MatchStatus::Completed);
}

#[test]
fn winner_must_be_in_a_slot() {
    let (mut store, players, _) = bracket_with_players(4, 6);
    let m = find(&store, 1, 1);
    let outsider = players.iter().find(|p| !m.has_participant(p.id)).unwrap().id;

    assert_eq!(
        report_result(&mut store, m.id, outsider),
        Err(BracketError::InvalidWinner {
            match_id: m.id,
            winner: outsider,
        })
    );
    assert_eq!(find(&store, 1, 1), m);
    assert_eq!(find(&store, 2, 1).participant1_id, None);
}

#[test]
fn completion_and_winner_go_together() {
    let (mut store, _, _) = bracket_with_players(4, 7);
    let m = find(&store, 1, 1);

    let winner_only = MatchPatch {
        winner_id: m.participant1_id,
        ..MatchPatch::default()
    };
    assert_eq!(
        apply_match_update(&mut store, m.id, &winner_only),
        Err(BracketError::WinnerWithoutCompletion(m.id))
    );

    let status_only = MatchPatch {
        status: Some(MatchStatus::Completed),
        ..MatchPatch::default()
    };
    assert_eq!(
        apply_match_update(&mut store, m.id, &status_only),
        Err(BracketError::MissingWinner(m.id))
    );
    assert_eq!(find(&store, 1, 1), m);
}

#[test]
fn in_progress_then_completed() {
    let (mut store, _, _) = bracket_with_players(4, 8);
    let m = find(&store, 1, 2);
    let started = apply_match_update(
        &mut store,
        m.id,
        &MatchPatch {
            status: Some(MatchStatus::InProgress),
            ..MatchPatch::default()
        },
    )
    .unwrap();
    assert_eq!(started.status, MatchStatus::InProgress);
    assert_eq!(find(&store, 2, 1).participant2_id, None);

    let winner = m.participant2_id.unwrap();
    report_result(&mut store, m.id, winner).unwrap();
    assert_eq!(find(&store, 2, 1).participant2_id, Some(winner));
}

#[test]
fn unknown_match_is_reported() {
    let (mut store, players, _) = bracket_with_players(2, 9);
    let missing = Uuid::new_v4();
    assert_eq!(
        report_result(&mut store, missing, players[0].id),
        Err(BracketError::MatchNotFound(missing))
    );
}

#[test]
fn final_decides_the_champion_without_further_writes() {
    let (mut store, _, matches) = bracket_with_players(2, 10);
    assert_eq!(matches.len(), 1);
    let final_match = &matches[0];
    let winner = final_match.participant1_id.unwrap();
    assert_eq!(division_champion(&store, Division::Elite).unwrap(), None);

    let completed = report_result(&mut store, final_match.id, winner).unwrap();
    assert_eq!(store.list_matches(Division::Elite).unwrap(), vec![completed.clone()]);
    assert_eq!(
        advance_winner(&mut store, &completed).unwrap(),
        Advancement::Champion(winner)
    );
    assert_eq!(
        division_champion(&store, Division::Elite).unwrap(),
        Some(winner)
    );
}

#[test]
fn missing_target_is_a_dangling_reference() {
    let mut store = MemoryStore::new();
    let players: Vec<_> = (0..8)
        .map(|i| {
            store
                .create_participant(NewParticipant::named(format!("P{i}"), Division::Division2))
                .unwrap()
        })
        .collect();
    for (k, pair) in players.chunks(2).enumerate() {
        store
            .create_match(NewMatch {
                participant1_id: Some(pair[0].id),
                participant2_id: Some(pair[1].id),
                ..NewMatch::placeholder(Division::Division2, 1, k as u32 + 1)
            })
            .unwrap();
    }
    // Only one round-2 match: the winners of matches 3 and 4 have nowhere to go.
    store
        .create_match(NewMatch::placeholder(Division::Division2, 2, 1))
        .unwrap();

    let m3 = store
        .list_matches(Division::Division2)
        .unwrap()
        .into_iter()
        .find(|m| m.round == 1 && m.match_number == 3)
        .unwrap();
    let completed = report_result(&mut store, m3.id, players[4].id).unwrap();
    assert_eq!(completed.winner_id, Some(players[4].id));
    assert_eq!(
        advance_winner(&mut store, &completed).unwrap(),
        Advancement::DanglingReference {
            division: Division::Division2,
            round: 2,
            index: 1,
        }
    );
}

#[test]
fn six_players_cascade_through_the_short_round() {
    let (mut store, _, _) = bracket_with_players(6, 11);
    // Round 1 has three matches; match 3 has no sibling, so its winner walks through round 2.
    let m3 = find(&store, 1, 3);
    let winner = m3.participant1_id.unwrap();
    report_result(&mut store, m3.id, winner).unwrap();

    let r2m2 = find(&store, 2, 2);
    assert_eq!(r2m2.participant1_id, Some(winner));
    assert_eq!(r2m2.status, MatchStatus::Completed);
    assert_eq!(r2m2.winner_id, Some(winner));
    assert_eq!(find(&store, 3, 1).participant2_id, Some(winner));
}

#[test]
fn playing_every_match_crowns_one_champion() {
    for n in 2..=12 {
        let (mut store, players, matches) = bracket_with_players(n, 100 + n as u64);
        let rounds = matches.iter().map(|m| m.round).max().unwrap();

        loop {
            let next = store
                .list_matches(Division::Elite)
                .unwrap()
                .into_iter()
                .find(|m| m.is_playable());
            let Some(m) = next else { break };
            report_result(&mut store, m.id, m.participant2_id.unwrap()).unwrap();
        }

        let all = store.list_matches(Division::Elite).unwrap();
        let first_round = all.iter().filter(|m| m.round == 1).count();
        for m in &all {
            if receives_entrants(first_round, m.round, m.match_number) {
                assert_eq!(m.status, MatchStatus::Completed, "n={n}");
                assert!(m.winner_id.is_some_and(|w| m.has_participant(w)), "n={n}");
            } else {
                // Placeholder below a missing stretch of round 1: never filled.
                assert_eq!(m.status, MatchStatus::Pending, "n={n}");
                assert_eq!((m.participant1_id, m.participant2_id), (None, None));
            }
        }
        let champion = division_champion(&store, Division::Elite).unwrap().unwrap();
        assert!(players.iter().any(|p| p.id == champion));
        let final_match = all.iter().find(|m| m.round == rounds).unwrap();
        assert_eq!(final_match.winner_id, Some(champion));
    }
}

#[test]
fn half_filled_match_cannot_be_completed() {
    let (mut store, _, _) = bracket_with_players(4, 12);
    let m1 = find(&store, 1, 1);
    let winner = m1.participant1_id.unwrap();
    report_result(&mut store, m1.id, winner).unwrap();

    let final_match = find(&store, 2, 1);
    assert_eq!(
        report_result(&mut store, final_match.id, winner),
        Err(BracketError::NotPlayable(final_match.id))
    );
    assert_eq!(find(&store, 2, 1), final_match);

    // The other semi-final still feeds the second slot once it is played.
    let m2 = find(&store, 1, 2);
    let other = m2.participant2_id.unwrap();
    report_result(&mut store, m2.id, other).unwrap();
    let final_match = find(&store, 2, 1);
    assert!(final_match.is_playable());
    report_result(&mut store, final_match.id, other).unwrap();
    assert_eq!(division_champion(&store, Division::Elite).unwrap(), Some(other));
}

#[test]
fn lone_entrant_with_a_dead_feeder_can_be_completed() {
    let mut store = MemoryStore::new();
    let players: Vec<_> = (0..6)
        .map(|i| {
            store
                .create_participant(NewParticipant::named(format!("P{i}"), Division::Recruits))
                .unwrap()
        })
        .collect();
    for (k, pair) in players.chunks(2).enumerate() {
        store
            .create_match(NewMatch {
                participant1_id: Some(pair[0].id),
                participant2_id: Some(pair[1].id),
                ..NewMatch::placeholder(Division::Recruits, 1, k as u32 + 1)
            })
            .unwrap();
    }
    store
        .create_match(NewMatch::placeholder(Division::Recruits, 2, 1))
        .unwrap();
    // Round-1 match 4 was never created, so nobody can join this match.
    let lone = store
        .create_match(NewMatch {
            participant1_id: Some(players[4].id),
            ..NewMatch::placeholder(Division::Recruits, 2, 2)
        })
        .unwrap();

    let completed = report_result(&mut store, lone.id, players[4].id).unwrap();
    assert_eq!(completed.status, MatchStatus::Completed);
    assert_eq!(completed.winner_id, Some(players[4].id));
}

#[test]
fn a_wrongly_filled_slot_can_be_emptied() {
    let (mut store, players, _) = bracket_with_players(4, 13);
    let m1 = find(&store, 1, 1);
    let final_match = find(&store, 2, 1);
    let squatter = players
        .iter()
        .find(|p| !m1.has_participant(p.id))
        .unwrap()
        .id;
    apply_match_update(
        &mut store,
        final_match.id,
        &MatchPatch::fill(Slot::First, squatter),
    )
    .unwrap();

    let cleared =
        apply_match_update(&mut store, final_match.id, &MatchPatch::clear(Slot::First)).unwrap();
    assert_eq!(cleared.participant1_id, None);

    let winner = m1.participant1_id.unwrap();
    report_result(&mut store, m1.id, winner).unwrap();
    assert_eq!(find(&store, 2, 1).participant1_id, Some(winner));
}

#[test]
fn patch_json_tells_null_from_missing() {
    let clear: MatchPatch = serde_json::from_str(r#"{"participant1_id": null}"#).unwrap();
    assert_eq!(clear, MatchPatch::clear(Slot::First));

    let untouched: MatchPatch = serde_json::from_str(r#"{"status": "in_progress"}"#).unwrap();
    assert_eq!(untouched.participant1_id, None);
    assert_eq!(untouched.participant2_id, None);
    assert_eq!(untouched.status, Some(MatchStatus::InProgress));

    let id = Uuid::new_v4();
    let fill: MatchPatch =
        serde_json::from_str(&format!(r#"{{"participant2_id": "{id}"}}"#)).unwrap();
    assert_eq!(fill, MatchPatch::fill(Slot::Second, id));
}

#[test]
fn hand_created_matches_are_checked() {
    let mut store = MemoryStore::new();
    let a = store
        .create_participant(NewParticipant::named("A", Division::Division1))
        .unwrap()
        .id;
    let b = store
        .create_participant(NewParticipant::named("B", Division::Division1))
        .unwrap()
        .id;
    let outsider = Uuid::new_v4();
    let pairing = NewMatch {
        participant1_id: Some(a),
        participant2_id: Some(b),
        ..NewMatch::placeholder(Division::Division1, 1, 1)
    };

    let no_winner = NewMatch {
        status: MatchStatus::Completed,
        ..pairing.clone()
    };
    assert!(matches!(
        create_match(&mut store, no_winner),
        Err(BracketError::MissingWinner(_))
    ));

    let wrong_winner = NewMatch {
        status: MatchStatus::Completed,
        winner_id: Some(outsider),
        ..pairing.clone()
    };
    assert!(matches!(
        create_match(&mut store, wrong_winner),
        Err(BracketError::InvalidWinner { winner, .. }) if winner == outsider
    ));

    let early_winner = NewMatch {
        winner_id: Some(a),
        ..pairing.clone()
    };
    assert!(matches!(
        create_match(&mut store, early_winner),
        Err(BracketError::WinnerWithoutCompletion(_))
    ));
    assert!(store.list_matches(Division::Division1).unwrap().is_empty());

    let created = create_match(&mut store, pairing).unwrap();
    assert_eq!(created.status, MatchStatus::Pending);
    assert_eq!(
        store.list_matches(Division::Division1).unwrap(),
        vec![created]
    );
}

#[test]
fn positions_outside_any_bracket_are_rejected() {
    let mut store = MemoryStore::new();
    for (round, match_number) in [
        (0, 1),
        (1, 0),
        (MAX_ROUNDS + 1, 1),
        (u32::MAX, 1),
        (MAX_ROUNDS, 2),
        (1, u32::MAX),
    ] {
        assert_eq!(
            create_match(
                &mut store,
                NewMatch::placeholder(Division::Elite, round, match_number)
            ),
            Err(BracketError::InvalidPosition {
                round,
                match_number
            })
        );
    }
    assert!(store.all_matches().unwrap().is_empty());

    create_match(&mut store, NewMatch::placeholder(Division::Elite, MAX_ROUNDS, 1)).unwrap();
    create_match(&mut store, NewMatch::placeholder(Division::Elite, 1, 1 << 31)).unwrap();
}

#[test]
fn deepest_round_completes_as_the_final() {
    let mut store = MemoryStore::new();
    let a = store
        .create_participant(NewParticipant::named("A", Division::Elite))
        .unwrap()
        .id;
    let b = store
        .create_participant(NewParticipant::named("B", Division::Elite))
        .unwrap()
        .id;
    let deepest = create_match(
        &mut store,
        NewMatch {
            participant1_id: Some(a),
            participant2_id: Some(b),
            ..NewMatch::placeholder(Division::Elite, MAX_ROUNDS, 1)
        },
    )
    .unwrap();
    let completed = report_result(&mut store, deepest.id, b).unwrap();
    assert_eq!(completed.winner_id, Some(b));
    assert_eq!(division_champion(&store, Division::Elite).unwrap(), Some(b));

    // A round number with no successor (only reachable through the raw store).
    let last = store
        .create_match(NewMatch {
            participant1_id: Some(a),
            participant2_id: Some(b),
            winner_id: Some(a),
            status: MatchStatus::Completed,
            ..NewMatch::placeholder(Division::Division2, u32::MAX, u32::MAX)
        })
        .unwrap();
    assert_eq!(
        advance_winner(&mut store, &last).unwrap(),
        Advancement::Champion(a)
    );
}

#[test]
fn delete_match_removes_only_that_match() {
    let (mut store, _, matches) = bracket_with_players(4, 14);
    let victim = matches[0].id;
    delete_match(&mut store, victim).unwrap();

    let left = store.list_matches(Division::Elite).unwrap();
    assert_eq!(left.len(), matches.len() - 1);
    assert!(left.iter().all(|m| m.id != victim));
    assert_eq!(
        delete_match(&mut store, victim),
        Err(BracketError::MatchNotFound(victim))
    );
}
