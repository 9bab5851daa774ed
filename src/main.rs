use quest_chronicles::build_info;
use quest_chronicles::character::{create_character, xp_to_next_level, Character, CharacterManager};
use quest_chronicles::combat::{BattleOutcome, PlayerAction, ScriptedActions};
use quest_chronicles::core::{BattleConfig, GameError, ITEM_DATA_FILE, QUEST_DATA_FILE};
use quest_chronicles::inventory::{self, ItemCatalog, ItemKind};
use quest_chronicles::quest::{self, QuestCatalog};
use quest_chronicles::session::GameSession;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), GameError> {
    let command = args.get(1).map(String::as_str).unwrap_or("--help");

    match command {
        "--version" | "-v" => {
            println!(
                "quest-chronicles {} ({})",
                build_info::BUILD_DATE,
                build_info::BUILD_COMMIT
            );
            Ok(())
        }
        "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "new" => {
            let (name, class) = match (args.get(2), args.get(3)) {
                (Some(name), Some(class)) => (name, class),
                _ => return usage("new <name> <class>"),
            };
            let manager = CharacterManager::new()?;
            if manager.character_exists(name) {
                return Err(GameError::InvalidSaveData(format!(
                    "A character named '{}' already exists",
                    name
                )));
            }
            let character = create_character(name, class)?;
            manager.save_character(&character)?;
            println!("Created {} the {}.", character.name, character.class);
            print_stats(&character);
            Ok(())
        }
        "list" => {
            let manager = CharacterManager::new()?;
            let characters = manager.list_characters()?;
            if characters.is_empty() {
                println!("No saved characters.");
            }
            for info in characters {
                if info.is_corrupted {
                    println!("  {} [CORRUPTED]", info.filename);
                } else {
                    println!(
                        "  {} - Level {} {}",
                        info.character_name, info.level, info.class_name
                    );
                }
            }
            Ok(())
        }
        "stats" => {
            let Some(name) = args.get(2) else {
                return usage("stats <name>");
            };
            let character = CharacterManager::new()?.load_character(name)?;
            print_stats(&character);
            Ok(())
        }
        "explore" => {
            let Some(name) = args.get(2) else {
                return usage("explore <name> [--seed N] [--enemy TYPE] [--action A]...");
            };
            explore(name, &args[3..])
        }
        "revive" => {
            let Some(name) = args.get(2) else {
                return usage("revive <name>");
            };
            let manager = CharacterManager::new()?;
            let mut character = manager.load_character(name)?;
            if quest_chronicles::character::revive(&mut character) {
                manager.save_character(&character)?;
                println!(
                    "{} has been revived with {} HP.",
                    character.name, character.health
                );
            } else {
                println!("{} is not dead.", character.name);
            }
            Ok(())
        }
        "delete" => {
            let Some(name) = args.get(2) else {
                return usage("delete <name>");
            };
            CharacterManager::new()?.delete_character(name)?;
            println!("Deleted {}.", name);
            Ok(())
        }
        "quests" => {
            let Some(name) = args.get(2) else {
                return usage("quests <name>");
            };
            let manager = CharacterManager::new()?;
            let (quests, _) = load_catalogs(&manager)?;
            print_quests(&manager.load_character(name)?, &quests);
            Ok(())
        }
        "accept" | "complete" | "abandon" => {
            let (Some(name), Some(quest_id)) = (args.get(2), args.get(3)) else {
                return usage(&format!("{} <name> <quest-id>", command));
            };
            let manager = CharacterManager::new()?;
            let (quests, _) = load_catalogs(&manager)?;
            let mut character = manager.load_character(name)?;
            match command {
                "accept" => {
                    quest::accept_quest(&mut character, quest_id, &quests)?;
                    println!("Accepted '{}'.", quests.get(quest_id)?.title);
                }
                "complete" => {
                    let done = quest::complete_quest(&mut character, quest_id, &quests)?;
                    println!(
                        "Quest complete! Gained {} XP and {} gold.",
                        done.reward.xp, done.reward.gold
                    );
                    if done.levels_gained > 0 {
                        println!("Level up! You are now level {}.", character.level);
                    }
                }
                _ => {
                    quest::abandon_quest(&mut character, quest_id)?;
                    println!("Abandoned '{}'.", quest_id);
                }
            }
            manager.save_character(&character)
        }
        "inventory" => {
            let Some(name) = args.get(2) else {
                return usage("inventory <name>");
            };
            let manager = CharacterManager::new()?;
            let (_, items) = load_catalogs(&manager)?;
            print_inventory(&manager.load_character(name)?, &items);
            Ok(())
        }
        "shop" => {
            let (_, items) = load_catalogs(&CharacterManager::new()?)?;
            println!("\n=== SHOP ===");
            for item in items.iter() {
                println!(
                    "  {:<16} {:<16} {:<10} {:>4} gold  {}",
                    item.id, item.name, item.kind, item.cost, item.effect
                );
            }
            Ok(())
        }
        "buy" | "sell" | "use" | "equip" => {
            let (Some(name), Some(item_id)) = (args.get(2), args.get(3)) else {
                return usage(&format!("{} <name> <item-id>", command));
            };
            let manager = CharacterManager::new()?;
            let (_, items) = load_catalogs(&manager)?;
            let mut character = manager.load_character(name)?;
            match command {
                "buy" => {
                    let gold = inventory::purchase_item(&mut character, item_id, &items)?;
                    println!("Bought {}. {} gold left.", items.get(item_id)?.name, gold);
                }
                "sell" => {
                    let price = inventory::sell_item(&mut character, item_id, &items)?;
                    println!("Sold {} for {} gold.", items.get(item_id)?.name, price);
                }
                "use" => println!("{}", inventory::use_item(&mut character, item_id, &items)?),
                _ => {
                    let message = match items.get(item_id)?.kind {
                        ItemKind::Armor => inventory::equip_armor(&mut character, item_id, &items)?,
                        _ => inventory::equip_weapon(&mut character, item_id, &items)?,
                    };
                    println!("{}", message);
                }
            }
            manager.save_character(&character)
        }
        "unequip" => {
            let (Some(name), Some(slot)) = (args.get(2), args.get(3)) else {
                return usage("unequip <name> weapon|armor");
            };
            let manager = CharacterManager::new()?;
            let (_, items) = load_catalogs(&manager)?;
            let mut character = manager.load_character(name)?;
            let removed = match slot.as_str() {
                "weapon" => inventory::unequip_weapon(&mut character, &items)?,
                "armor" => inventory::unequip_armor(&mut character, &items)?,
                _ => return usage("unequip <name> weapon|armor"),
            };
            match removed {
                Some(item_id) => println!("Unequipped {}.", item_id),
                None => println!("Nothing equipped in that slot."),
            }
            manager.save_character(&character)
        }
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Run 'quest-chronicles --help' for usage.");
            process::exit(1);
        }
    }
}

fn explore(name: &str, options: &[String]) -> Result<(), GameError> {
    let mut seed = None;
    let mut enemy = None;
    let mut actions = Vec::new();
    let mut config = BattleConfig::default();

    let mut i = 0;
    while i < options.len() {
        let value = options.get(i + 1);
        match (options[i].as_str(), value) {
            ("--seed", Some(v)) => {
                seed = Some(parse_seed(v)?);
                i += 1;
            }
            ("--enemy", Some(v)) => {
                enemy = Some(v.clone());
                i += 1;
            }
            ("--action", Some(v)) => {
                match PlayerAction::parse(v) {
                    Some(action) => actions.push(action),
                    None => eprintln!("Ignoring unknown action: {}", v),
                }
                i += 1;
            }
            ("--config", Some(path)) => {
                config = BattleConfig::from_json_str(&std::fs::read_to_string(path)?)?;
                i += 1;
            }
            (other, _) => eprintln!("Ignoring option: {}", other),
        }
        i += 1;
    }

    let manager = CharacterManager::new()?;
    let character = manager.load_character(name)?;

    let rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut session = GameSession::with_config(character, config, rng);
    let mut source = ScriptedActions::new(actions);

    println!("\nExploring the world...");
    let report = match enemy {
        Some(enemy_type) => session.fight(&enemy_type, &mut source)?,
        None => session.explore(&mut source)?,
    };

    for entry in &report.battle.log {
        println!(">>> {}", entry.message);
    }
    println!();

    match report.outcome() {
        BattleOutcome::PlayerWon => {
            println!(
                "You defeated the {}! Gained {} XP and {} gold.",
                report.battle.enemy_name, report.battle.xp_gained, report.battle.gold_gained
            );
            if report.levels_gained > 0 {
                println!("Level up! You are now level {}.", session.character().level);
            }
        }
        BattleOutcome::EnemyWon => {
            println!("You were defeated! Use 'revive {}' to continue.", name);
        }
        BattleOutcome::Escaped => println!("You successfully escaped!"),
    }

    manager.save_character(&session.into_character())
}

fn parse_seed(value: &str) -> Result<u64, GameError> {
    value
        .parse()
        .map_err(|_| GameError::InvalidConfig(format!("Invalid value for --seed: {}", value)))
}

/// Built-in catalogs, replaced by `quests.json` / `items.json` when present
/// in the save directory.
fn load_catalogs(manager: &CharacterManager) -> Result<(QuestCatalog, ItemCatalog), GameError> {
    let quest_path = manager.save_dir().join(QUEST_DATA_FILE);
    let quests = if quest_path.exists() {
        QuestCatalog::load(&quest_path)?
    } else {
        QuestCatalog::default()
    };

    let item_path = manager.save_dir().join(ITEM_DATA_FILE);
    let items = if item_path.exists() {
        ItemCatalog::load(&item_path)?
    } else {
        ItemCatalog::default()
    };

    Ok((quests, items))
}

fn print_quests(character: &Character, quests: &QuestCatalog) {
    println!("\n=== QUESTS ===");
    println!("Active:");
    for q in quest::active_quests(character, quests) {
        println!("  {:<16} {} ({} XP, {} gold)", q.id, q.title, q.reward_xp, q.reward_gold);
    }
    println!("Available:");
    for q in quest::available_quests(character, quests) {
        println!(
            "  {:<16} {} (level {}, {} XP, {} gold)",
            q.id, q.title, q.required_level, q.reward_xp, q.reward_gold
        );
    }
    println!("Completed:");
    for q in quest::completed_quests(character, quests) {
        println!("  {:<16} {}", q.id, q.title);
    }

    let earned = quest::total_rewards_earned(character, quests);
    println!(
        "\nProgress: {:.1}% ({} XP, {} gold earned)",
        quest::completion_percentage(character, quests),
        earned.xp,
        earned.gold
    );
}

fn print_inventory(character: &Character, items: &ItemCatalog) {
    println!("\n=== {}'s INVENTORY ===", character.name);
    for (item_id, count) in inventory::inventory_counts(character) {
        match items.get(item_id) {
            Ok(item) => println!("  {} ({}) x{}", item.name, item.kind, count),
            Err(_) => println!("  {} (unknown) x{}", item_id, count),
        }
    }
    println!(
        "Weapon: {}",
        character.equipped_weapon.as_deref().unwrap_or("none")
    );
    println!(
        "Armor: {}",
        character.equipped_armor.as_deref().unwrap_or("none")
    );
    println!("Free slots: {}", inventory::space_remaining(character));
}

fn print_stats(character: &Character) {
    println!("\n=== CHARACTER STATS ===");
    println!("Name: {}", character.name);
    println!("Class: {}", character.class);
    if let Some(ability) = character.class.ability_name() {
        println!("Special: {}", ability);
    }
    println!(
        "Level: {} ({} XP to next level)",
        character.level,
        xp_to_next_level(character)
    );
    println!("Health: {}/{}", character.health, character.max_health);
    println!("Strength: {}", character.strength);
    println!("Magic: {}", character.magic);
    println!("Gold: {}", character.gold);
    println!("Active Quests: {}", character.active_quests.len());
}

fn usage(form: &str) -> Result<(), GameError> {
    eprintln!("Usage: quest-chronicles {}", form);
    process::exit(1);
}

fn print_help() {
    println!("Quest Chronicles - Turn-Based RPG\n");
    println!("Usage: quest-chronicles <command>\n");
    println!("Commands:");
    println!("  new <name> <class>   Create a Warrior, Mage, Rogue or Cleric");
    println!("  list                 List saved characters");
    println!("  stats <name>         Show a character's stats");
    println!("  explore <name>       Fight the enemy for your level");
    println!("      --enemy TYPE     Fight goblin, orc or dragon instead");
    println!("      --action A       Queue attack, special or run (repeatable)");
    println!("      --seed N         Reproducible battle");
    println!("      --config PATH    Battle config JSON overrides");
    println!("  quests <name>        Show active, available and completed quests");
    println!("  accept <name> <id>   Accept a quest");
    println!("  complete <name> <id> Complete an active quest");
    println!("  abandon <name> <id>  Abandon an active quest");
    println!("  inventory <name>     Show inventory and equipment");
    println!("  shop                 List items for sale");
    println!("  buy <name> <item>    Buy an item");
    println!("  sell <name> <item>   Sell an item for half its cost");
    println!("  use <name> <item>    Use a consumable");
    println!("  equip <name> <item>  Equip a weapon or armor");
    println!("  unequip <name> weapon|armor");
    println!("  revive <name>        Revive a fallen character");
    println!("  delete <name>        Delete a character");
    println!("  --version            Show version information");
    println!("  --help               Show this help message");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed("42").unwrap(), 42);
        assert!(matches!(parse_seed("abc"), Err(GameError::InvalidConfig(_))));
        assert!(matches!(parse_seed("-1"), Err(GameError::InvalidConfig(_))));
    }
}
