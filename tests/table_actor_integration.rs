/// Integration tests for the game actor layer
///
/// Commands reach a game only through its actor's inbox, so these tests
/// exercise the end-to-end path: manager -> handle -> actor -> game.
use rand::SeedableRng;
use rand::rngs::StdRng;

use holdem_core::table::actor::GameActor;
use holdem_core::table::messages::CommandError;
use holdem_core::{GameError, GameId, GameManager, GameSettings, Phase, PlayerAction, PlayerId};

fn spawn_seeded_game(seed: u64) -> holdem_core::GameHandle {
    let (actor, handle) = GameActor::with_rng(
        GameId::new_v4(),
        GameSettings::default(),
        StdRng::seed_from_u64(seed),
    );
    tokio::spawn(actor.run());
    handle
}

#[tokio::test]
async fn test_actor_runs_a_full_preflop_round() {
    let handle = spawn_seeded_game(21);
    let ids: Vec<PlayerId> = (0..3).map(|_| PlayerId::new_v4()).collect();
    for &id in &ids {
        handle.seat_player(id, 1000).await.unwrap();
    }
    handle.start_hand().await.unwrap();

    let snapshot = handle.snapshot(None).await.unwrap();
    assert_eq!(snapshot.phase, Phase::Preflop);
    assert_eq!(snapshot.current_player_idx, 2);

    handle.take_action(ids[2], PlayerAction::Call).await.unwrap();
    handle.take_action(ids[0], PlayerAction::Call).await.unwrap();
    handle.take_action(ids[1], PlayerAction::Check).await.unwrap();

    let snapshot = handle.snapshot(None).await.unwrap();
    assert_eq!(snapshot.phase, Phase::Flop);
    assert_eq!(snapshot.pot, 60);
    assert_eq!(snapshot.board.len(), 3);
}

#[tokio::test]
async fn test_actor_rejects_out_of_turn_action() {
    let handle = spawn_seeded_game(22);
    let ids: Vec<PlayerId> = (0..3).map(|_| PlayerId::new_v4()).collect();
    for &id in &ids {
        handle.seat_player(id, 1000).await.unwrap();
    }
    handle.start_hand().await.unwrap();

    let result = handle.take_action(ids[0], PlayerAction::Call).await;
    assert!(matches!(
        result,
        Err(CommandError::Game(GameError::NotYourTurn))
    ));
}

#[tokio::test]
async fn test_actor_snapshot_redaction() {
    let handle = spawn_seeded_game(23);
    let alice = PlayerId::new_v4();
    let bob = PlayerId::new_v4();
    handle.seat_player(alice, 1000).await.unwrap();
    handle.seat_player(bob, 1000).await.unwrap();
    handle.start_hand().await.unwrap();

    let view = handle.snapshot(Some(alice)).await.unwrap();
    assert_eq!(view.players[0].cards.len(), 2);
    assert!(view.players[1].cards.is_empty());
}

#[tokio::test]
async fn test_concurrent_commands_are_serialized() {
    // Both clones race the same all-in sized raise; the actor applies them
    // one at a time, so exactly one succeeds and the loser is told why.
    let handle = spawn_seeded_game(24);
    let ids: Vec<PlayerId> = (0..3).map(|_| PlayerId::new_v4()).collect();
    for &id in &ids {
        handle.seat_player(id, 1000).await.unwrap();
    }
    handle.start_hand().await.unwrap();

    let first = {
        let handle = handle.clone();
        let id = ids[2];
        tokio::spawn(async move { handle.take_action(id, PlayerAction::Raise(1000)).await })
    };
    let second = {
        let handle = handle.clone();
        let id = ids[2];
        tokio::spawn(async move { handle.take_action(id, PlayerAction::Raise(1000)).await })
    };
    let results = [first.await.unwrap(), second.await.unwrap()];

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    // The losing command found the turn already gone and the game intact.
    let snapshot = handle.snapshot(None).await.unwrap();
    assert_eq!(snapshot.call_amount, 1000);
    assert_eq!(snapshot.players[2].credit, 0);
}

#[tokio::test]
async fn test_manager_creates_routes_and_closes() {
    let mut manager = GameManager::new();
    assert!(manager.is_empty());

    let handle = manager.create_game(GameSettings::default());
    assert_eq!(manager.len(), 1);
    let fetched = manager.get(handle.game_id()).unwrap();
    assert_eq!(fetched.game_id(), handle.game_id());

    let alice = PlayerId::new_v4();
    fetched.seat_player(alice, 1000).await.unwrap();
    let snapshot = handle.snapshot(None).await.unwrap();
    assert_eq!(snapshot.players.len(), 1);

    assert!(manager.close_game(handle.game_id()).await);
    assert!(manager.is_empty());
    assert!(!manager.close_game(handle.game_id()).await);

    // The actor is gone; further commands report the closed channel.
    let result = handle.snapshot(None).await;
    assert!(matches!(result, Err(CommandError::Closed)));
}

#[tokio::test]
async fn test_winner_determination_through_actor() {
    let handle = spawn_seeded_game(25);
    let ids: Vec<PlayerId> = (0..2).map(|_| PlayerId::new_v4()).collect();
    for &id in &ids {
        handle.seat_player(id, 1000).await.unwrap();
    }
    handle.start_hand().await.unwrap();

    handle.take_action(ids[0], PlayerAction::Call).await.unwrap();
    handle.take_action(ids[1], PlayerAction::Check).await.unwrap();
    for _ in 0..3 {
        let snapshot = handle.snapshot(None).await.unwrap();
        let first = snapshot.current_player_idx;
        for offset in 0..2 {
            let id = snapshot.players[(first + offset) % 2].user_id;
            handle.take_action(id, PlayerAction::Check).await.unwrap();
        }
    }

    let winners = handle.determine_winners().await.unwrap();
    assert!(!winners.is_empty());
    let snapshot = handle.snapshot(None).await.unwrap();
    assert_eq!(snapshot.phase, Phase::GameOver);
    let total: u32 = snapshot.players.iter().map(|p| p.credit).sum();
    assert_eq!(total, 2000);

    handle.next_hand().await.unwrap();
    let snapshot = handle.snapshot(None).await.unwrap();
    assert_eq!(snapshot.phase, Phase::Ready);
}
