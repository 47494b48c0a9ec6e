use breakroom::economy::upgrades::Upgrade;
use breakroom::save_manager::SaveManager;
use breakroom::{Game, GameEvent, GamePhase, Side};
use std::io;

fn main() -> io::Result<()> {
    env_logger::init();

    // Handle CLI arguments
    let args: Vec<String> = std::env::args().collect();
    let save_manager = SaveManager::new()?;

    if args.len() > 1 {
        match args[1].as_str() {
            "reset" => {
                save_manager.clear_save()?;
                println!("Save file cleared.");
                std::process::exit(0);
            }
            "--version" | "-v" => {
                println!("breakroom {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--help" | "-h" => {
                println!("Breakroom - Turn-Based Wave Combat Simulation\n");
                println!("Usage: breakroom [command]\n");
                println!("Commands:");
                println!("  reset      Delete the save file and start over");
                println!("  --version  Show version information");
                println!("  --help     Show this help message");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown command: {}", other);
                eprintln!("Run 'breakroom --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    let mut game = Game::new();

    if save_manager.save_exists() {
        match save_manager.load() {
            Ok(data) => {
                print_events(&game.restore_from_save(&data));
                println!(
                    "Loaded save: wave {}, {} total currency.",
                    data.wave, data.total_currency
                );
            }
            Err(e) => {
                eprintln!("Warning: could not load save: {}", e);
                eprintln!("Starting fresh.");
            }
        }
    }

    // Autoplay one run: spend the bank greedily, resume a saved run if
    // one was in flight, then step until the run resolves.
    buy_everything_affordable(&mut game);
    let events = if game.progression.current_level() > 1 {
        game.resume_run()
    } else {
        game.start_new_run()
    };
    print_events(&events);

    while game.phase == GamePhase::Battle {
        if game.wave_transition_pending() {
            print_events(&game.finish_wave_transition());
            continue;
        }
        for id in owned_ability_ids(&game) {
            if game.ability_cooldown(&id) == 0 {
                print_events(&game.use_ability(&id));
            }
        }
        if game.phase != GamePhase::Battle || game.wave_transition_pending() {
            continue;
        }
        print_events(&game.step_turn());
    }

    save_manager.save(&game.to_save_data())?;
    println!(
        "Run over. Total currency: {}.",
        game.ledger.total_currency()
    );

    Ok(())
}

/// Buys the cheapest affordable unlocked upgrade until nothing fits.
fn buy_everything_affordable(game: &mut Game) {
    loop {
        let pick = {
            let wave = game.progression.current_level();
            let ledger = &game.ledger;
            let mut affordable: Vec<&Upgrade> = ledger
                .upgrades()
                .iter()
                .filter(|u| !u.is_maxed() && u.current_cost() <= ledger.total_currency())
                .filter(|u| u.wave_gate.map_or(true, |gate| wave >= gate))
                .filter(|u| {
                    u.requires.map_or(true, |(id, level)| {
                        ledger.upgrade(id).map_or(false, |req| req.level >= level)
                    })
                })
                .collect();
            affordable.sort_by_key(|u| u.current_cost());
            affordable.first().map(|u| u.id)
        };

        let Some(pick) = pick else { break };
        match game.buy_upgrade(pick) {
            Ok(events) => print_events(&events),
            Err(_) => break,
        }
    }
}

fn owned_ability_ids(game: &Game) -> Vec<String> {
    game.ledger
        .upgrades()
        .iter()
        .filter(|u| u.is_active_ability() && u.level > 0)
        .map(|u| u.id.to_string())
        .collect()
}

fn print_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::StateChanged(phase) => println!("== {:?} ==", phase),
            GameEvent::DamageApplied {
                target,
                amount,
                was_crit,
                shield_absorbed,
            } => {
                let who = match target {
                    Side::Player => "You take",
                    Side::Enemy => "Enemy takes",
                };
                let crit = if *was_crit { " (CRIT)" } else { "" };
                if *shield_absorbed > 0 {
                    println!("{} {} damage{} ({} to shield)", who, amount, crit, shield_absorbed);
                } else {
                    println!("{} {} damage{}", who, amount, crit);
                }
            }
            GameEvent::CombatantDied(Side::Enemy) => println!("Enemy down!"),
            GameEvent::CombatantDied(Side::Player) => println!("You died."),
            GameEvent::WaveAdvanced { wave, is_boss } => {
                if *is_boss {
                    println!("-- Wave {} (BOSS) --", wave);
                } else {
                    println!("-- Wave {} --", wave);
                }
            }
            GameEvent::AbilityUnlocked(id) => println!("Ally available in the shop: {}", id),
            GameEvent::CurrencyChanged { run, total } => {
                println!("Currency: {} this run, {} banked", run, total)
            }
            GameEvent::UpgradePurchased { id, level } => {
                println!("Bought {} (level {})", id, level)
            }
            GameEvent::AbilityUsed { id, damage } => {
                println!("{} helps out for {} damage", id, damage)
            }
            GameEvent::RunEnded {
                waves_cleared,
                earnings,
            } => println!("Run ended: {} waves cleared, {} earned.", waves_cleared, earnings),
            GameEvent::RunWon { earnings } => {
                println!("YOU WIN! {} earned this run.", earnings)
            }
        }
    }
}
