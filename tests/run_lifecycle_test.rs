//! End-to-end run lifecycle tests against the public API: full runs from
//! menu to results, the canonical scripted battle, and save/resume.

use breakroom::economy::ledger::PurchaseError;
use breakroom::save_manager::{SaveData, SaveManager};
use breakroom::{Game, GameEvent, GamePhase, Side};
use breakroom::{
    BOSS_KILL_BONUS, CURRENCY_PER_KILL, ENEMY_BASE_DAMAGE, ENEMY_BASE_HEALTH, MAX_WAVES,
};

/// Starts a battle with crits disabled on both sides so damage per
/// half-turn is exact.
fn deterministic_battle() -> Game {
    let mut game = Game::new();
    game.start_new_run();
    game.player.as_mut().unwrap().crit_chance = 0.0;
    game.enemy.as_mut().unwrap().crit_chance = 0.0;
    game
}

#[test]
fn scripted_opening_battle_resolves_exactly() {
    // Player: 50 health, 10 damage. Enemy: 30 health, 8 damage. No crits,
    // no shields. The enemy falls on the player's third attack, before it
    // can answer; the player ends at 50 - 2*8 = 34.
    let mut game = deterministic_battle();
    {
        let player = game.player.as_mut().unwrap();
        player.max_health = 50;
        player.current_health = 50;
        player.attack_damage = 10;
    }
    {
        let enemy = game.enemy.as_mut().unwrap();
        enemy.max_health = ENEMY_BASE_HEALTH;
        enemy.current_health = ENEMY_BASE_HEALTH;
        enemy.attack_damage = ENEMY_BASE_DAMAGE;
    }

    game.step_turn(); // player: enemy 30 -> 20
    assert_eq!(game.enemy.as_ref().unwrap().current_health, 20);
    game.step_turn(); // enemy: player 50 -> 42
    assert_eq!(game.player.as_ref().unwrap().current_health, 42);
    game.step_turn(); // player: enemy 20 -> 10
    game.step_turn(); // enemy: player 42 -> 34
    let events = game.step_turn(); // player: enemy 10 -> 0, dies

    assert!(events.contains(&GameEvent::CombatantDied(Side::Enemy)));
    assert!(game.enemy.is_none());
    assert_eq!(game.player.as_ref().unwrap().current_health, 34);
    assert_eq!(game.progression.current_level(), 2);
    assert_eq!(game.ledger.run_currency(), CURRENCY_PER_KILL);
}

#[test]
fn full_run_clears_all_waves_and_wins() {
    let mut game = Game::new();
    game.start_new_run();

    let mut waves_seen = vec![1u32];
    for _ in 0..MAX_WAVES {
        // Make each fight a guaranteed one-shot without touching the loop.
        game.enemy.as_mut().unwrap().current_health = 1;
        game.enemy.as_mut().unwrap().attack_damage = 0;
        game.player.as_mut().unwrap().crit_chance = 0.0;

        let events = game.step_turn();
        if game.phase == GamePhase::Win {
            assert!(events.iter().any(|e| matches!(e, GameEvent::RunWon { .. })));
            break;
        }

        let wave = match events.iter().find_map(|e| match e {
            GameEvent::WaveAdvanced { wave, .. } => Some(*wave),
            _ => None,
        }) {
            Some(w) => w,
            None => panic!("expected a wave advance, got {:?}", events),
        };
        waves_seen.push(wave);
        game.finish_wave_transition();
    }

    assert_eq!(game.phase, GamePhase::Win);
    assert_eq!(waves_seen, (1..=MAX_WAVES).collect::<Vec<_>>());

    // 29 normal kills plus the boss kill with its bonus, all committed.
    let expected = MAX_WAVES * CURRENCY_PER_KILL + BOSS_KILL_BONUS;
    assert_eq!(game.ledger.total_currency(), expected);
    assert_eq!(game.ledger.run_currency(), 0);
}

#[test]
fn defeat_banks_earnings_and_results_screen_offers_retry() {
    let mut game = deterministic_battle();
    game.player.as_mut().unwrap().current_health = 1;
    game.player.as_mut().unwrap().attack_damage = 0;
    game.enemy.as_mut().unwrap().attack_damage = 100;

    game.step_turn(); // player swings for 0
    let events = game.step_turn(); // enemy kills

    assert_eq!(game.phase, GamePhase::Results);
    assert!(events.contains(&GameEvent::StateChanged(GamePhase::Results)));

    // Retry from results starts over at wave 1 with fresh pools.
    let events = game.start_new_run();
    assert_eq!(game.phase, GamePhase::Battle);
    assert!(!events.is_empty());
    assert_eq!(game.progression.current_level(), 1);
    let player = game.player.as_ref().unwrap();
    assert_eq!(player.current_health, player.max_health);
}

#[test]
fn pause_and_menu_detour_preserves_run_state() {
    let mut game = deterministic_battle();
    game.enemy.as_mut().unwrap().max_health = 1_000;
    game.enemy.as_mut().unwrap().current_health = 1_000;

    game.step_turn();
    game.step_turn();
    let player_health = game.player.as_ref().unwrap().current_health;
    let enemy_health = game.enemy.as_ref().unwrap().current_health;

    game.pause();
    // Stray loop inputs while paused change nothing.
    for _ in 0..5 {
        assert!(game.step_turn().is_empty());
    }
    assert_eq!(game.player.as_ref().unwrap().current_health, player_health);
    assert_eq!(game.enemy.as_ref().unwrap().current_health, enemy_health);

    game.resume_from_pause();
    assert_eq!(game.phase, GamePhase::Battle);
    assert!(!game.step_turn().is_empty());
}

#[test]
fn duplicate_transition_requests_are_absorbed() {
    let mut game = Game::new();

    // Phase-invalid requests: all no-ops.
    assert!(game.pause().is_empty());
    assert!(game.resume_from_pause().is_empty());
    assert!(game.finish_wave_transition().is_empty());
    assert!(game.step_turn().is_empty());
    assert_eq!(game.phase, GamePhase::MainMenu);

    game.start_new_run();
    // Double-start mid-battle ignored.
    assert!(game.start_new_run().is_empty());
    assert!(game.resume_run().is_empty());

    // Double pause and double resume collapse to one transition each.
    assert_eq!(game.pause().len(), 1);
    assert!(game.pause().is_empty());
    assert_eq!(game.resume_from_pause().len(), 1);
    assert!(game.resume_from_pause().is_empty());
}

#[test]
fn purchase_flow_gates_and_funds_enforced_through_game() {
    let mut game = Game::new();
    game.go_to_upgrades();
    assert_eq!(game.phase, GamePhase::Upgrades);

    // Broke: first purchase fails cleanly.
    assert_eq!(
        game.buy_upgrade("damage1"),
        Err(PurchaseError::InsufficientFunds)
    );
    assert_eq!(game.buy_upgrade("no_such_thing"), Err(PurchaseError::UnknownUpgrade));

    game.ledger.restore_currency(200, 0, 0);
    let events = game.buy_upgrade("damage1").unwrap();
    assert!(events.contains(&GameEvent::UpgradePurchased {
        id: "damage1",
        level: 1
    }));
    assert_eq!(game.ledger.total_currency(), 180);

    // Wave-gated ability still locked before its wave is ever reached.
    assert_eq!(game.buy_upgrade("janitor"), Err(PurchaseError::Locked));

    // Purchased damage shows up in the next run's attacks.
    game.start_new_run();
    game.player.as_mut().unwrap().crit_chance = 0.0;
    let enemy_max = game.enemy.as_ref().unwrap().current_health;
    game.step_turn();
    // round(10 * 1.2) = 12 damage instead of 10.
    assert_eq!(game.enemy.as_ref().unwrap().current_health, enemy_max - 12);
}

#[test]
fn save_file_round_trip_resumes_the_run() {
    let path = std::env::temp_dir().join(format!("breakroom-lifecycle-{}.dat", std::process::id()));
    let manager = SaveManager::with_path(path);
    let _ = manager.clear_save();
    assert!(!manager.save_exists());

    // Build up a mid-run game worth saving.
    let mut game = Game::new();
    game.ledger.restore_currency(300, 0, 0);
    game.go_to_upgrades();
    game.buy_upgrade("health").unwrap();
    game.buy_upgrade("shield").unwrap();
    game.progression.set_current_level(7);
    game.ledger.add_currency(25);

    manager.save(&game.to_save_data()).unwrap();
    assert!(manager.save_exists());

    // A brand-new process: load, restore, resume.
    let mut restored = Game::new();
    let data: SaveData = manager.load().unwrap();
    let events = restored.restore_from_save(&data);

    assert_eq!(restored.ledger.total_currency(), game.ledger.total_currency());
    assert_eq!(restored.ledger.run_currency(), 25);
    assert_eq!(restored.progression.current_level(), 7);
    assert_eq!(restored.multipliers, game.multipliers);
    // Wave 5 was crossed before the save, so its unlock replays.
    assert!(events.contains(&GameEvent::AbilityUnlocked("janitor")));

    restored.resume_run();
    assert_eq!(restored.phase, GamePhase::Battle);
    assert_eq!(restored.progression.current_level(), 7);
    // Shield capacity from the restored upgrade is live.
    assert_eq!(restored.player.as_ref().unwrap().max_shield, 20);

    manager.clear_save().unwrap();
}

#[test]
fn new_game_wipes_persistent_state() {
    let mut game = Game::new();
    game.ledger.restore_currency(500, 0, 0);
    game.go_to_upgrades();
    game.buy_upgrade("damage1").unwrap();
    game.start_new_run();
    game.quit_to_main_menu();

    game.new_game();
    assert_eq!(game.ledger.total_currency(), 0);
    assert_eq!(game.ledger.upgrade("damage1").unwrap().level, 0);
    assert_eq!(game.progression.current_level(), 1);

    // A run after the wipe starts from the true baseline.
    game.start_new_run();
    let player = game.player.as_ref().unwrap();
    assert_eq!(player.max_health, 100);
    assert_eq!(player.max_shield, 0);
}

#[test]
fn quit_mid_run_then_resume_continues_at_saved_wave() {
    let mut game = deterministic_battle();
    game.progression.set_current_level(4);
    game.ledger.add_currency(30);

    let events = game.quit_to_main_menu();
    assert_eq!(game.phase, GamePhase::MainMenu);
    // Earnings committed on the way out.
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::CurrencyChanged { run: 0, .. }
    )));
    assert_eq!(game.ledger.total_currency(), 30);

    // The wave counter survives the quit, so resuming re-enters wave 4.
    let events = game.resume_run();
    assert_eq!(game.phase, GamePhase::Battle);
    assert_eq!(game.progression.current_level(), 4);
    assert!(events.contains(&GameEvent::WaveAdvanced {
        wave: 4,
        is_boss: false
    }));
}
