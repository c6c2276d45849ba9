//! Property tests for move acquisition.
//!
//! Run with: PROPTEST_CASES=256 cargo test -p arena --test acquisition_prop_tests

mod support;

use arena::ai::{PlayerId, Resolution, MAX_ATTEMPTS};
use arena::rules::{LegalMoves, Position};
use proptest::prelude::*;
use support::providers::{acquirer, ScriptedProvider};

#[derive(Debug, Clone)]
enum Answer {
    /// Index into the legal list, quoted and padded sometimes.
    Legal(usize, bool),
    Garbage(String),
    Failure,
}

fn answer() -> impl Strategy<Value = Answer> {
    prop_oneof![
        (any::<usize>(), any::<bool>()).prop_map(|(i, padded)| Answer::Legal(i, padded)),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Answer::Garbage),
        Just(Answer::Failure),
    ]
}

/// Play one move per pick from the start, stopping before the game ends.
fn position_after(picks: &[usize]) -> Position {
    let mut position = Position::new();
    for pick in picks {
        let moves = position.legal_moves();
        if moves.is_empty() || position.outcome().is_some() {
            break;
        }
        let mv = moves[pick % moves.len()].chess_move;
        if position.apply(mv).is_err() || position.outcome().is_some() {
            break;
        }
    }
    position
}

fn cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(32)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(cases()))]

    #[test]
    fn acquisition_always_yields_a_legal_move(
        picks in proptest::collection::vec(any::<usize>(), 0..30),
        script in proptest::collection::vec(answer(), 0..5),
    ) {
        let mut position = position_after(&picks);
        prop_assume!(position.outcome().is_none());
        let legal = LegalMoves::new(position.legal_moves()).expect("game is live");

        let rendered: Vec<Option<String>> = script
            .iter()
            .map(|a| match a {
                Answer::Legal(i, false) => Some(legal.as_slice()[i % legal.len()].san.clone()),
                Answer::Legal(i, true) => Some(format!(" \"{}\"\n", legal.as_slice()[i % legal.len()].san)),
                Answer::Garbage(text) => Some(text.clone()),
                Answer::Failure => None,
            })
            .collect();
        let borrowed: Vec<Option<&str>> = rendered.iter().map(|a| a.as_deref()).collect();

        let mover = PlayerId::ChatGpt;
        let provider = ScriptedProvider::new(mover, &borrowed);
        let acquirer = acquirer(provider.clone(), ScriptedProvider::new(PlayerId::Claude, &[]));

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .expect("runtime");
        let acquisition = rt.block_on(acquirer.acquire(mover, &position.fen(), &legal));

        // Whatever happened, the chosen move is playable.
        prop_assert!(legal.as_slice().contains(&acquisition.chosen));
        prop_assert!(position.apply(acquisition.chosen.chess_move).is_ok());

        let first_valid = rendered
            .iter()
            .take(MAX_ATTEMPTS)
            .position(|a| {
                a.as_deref()
                    .map(|text| arena::ai::match_suggestion(text, &legal).is_some())
                    .unwrap_or(false)
            });

        match first_valid {
            Some(index) => {
                prop_assert_eq!(acquisition.resolution, Resolution::Provider { attempt: index + 1 });
                prop_assert_eq!(acquisition.attempts_used(), index + 1);
                let expected = arena::ai::match_suggestion(rendered[index].as_deref().unwrap(), &legal).unwrap();
                prop_assert_eq!(&acquisition.chosen, expected);
            }
            None => {
                prop_assert_eq!(acquisition.resolution, Resolution::RandomFallback);
                prop_assert_eq!(acquisition.attempts_used(), MAX_ATTEMPTS);
            }
        }
        prop_assert_eq!(provider.calls(), acquisition.attempts_used());
    }
}
