// Leveling
pub const XP_PER_LEVEL: u32 = 100;
pub const LEVEL_UP_MAX_HEALTH: u32 = 10;
pub const LEVEL_UP_STRENGTH: u32 = 2;
pub const LEVEL_UP_MAGIC: u32 = 2;

// New characters
pub const STARTING_LEVEL: u32 = 1;
pub const STARTING_GOLD: u32 = 100;
pub const MAX_NAME_LENGTH: usize = 16;

// Combat
pub const MIN_ATTACK_DAMAGE: u32 = 1;
/// Defender strength is divided by this before it is subtracted from an attack.
pub const DEFENSE_DIVISOR: u32 = 4;
pub const SPECIAL_COOLDOWN_TURNS: u32 = 3;
pub const ESCAPE_CHANCE: f64 = 0.5;
pub const ROGUE_CRIT_CHANCE: f64 = 0.5;
pub const CLERIC_HEAL_AMOUNT: u32 = 30;
pub const POWER_STRIKE_MULTIPLIER: u32 = 2;
pub const FIREBALL_MULTIPLIER: u32 = 2;
pub const CRITICAL_STRIKE_MULTIPLIER: u32 = 3;
pub const COMBAT_LOG_CAPACITY: usize = 50;

// Enemy level brackets (inclusive upper bounds)
pub const GOBLIN_MAX_LEVEL: u32 = 2;
pub const ORC_MAX_LEVEL: u32 = 5;

// Inventory
pub const MAX_INVENTORY_SIZE: usize = 20;
/// Items sell back for cost divided by this.
pub const SELL_PRICE_DIVISOR: u32 = 2;

// Simulator
pub const MAX_SIM_LEVEL: u32 = 100_000;

// Save files
pub const SAVE_DIR_NAME: &str = ".quest-chronicles";
pub const SAVE_FILE_VERSION: u32 = 1;
/// Optional catalog overrides, read from the save directory.
pub const QUEST_DATA_FILE: &str = "quests.json";
pub const ITEM_DATA_FILE: &str = "items.json";
