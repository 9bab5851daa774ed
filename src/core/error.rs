use thiserror::Error;

/// Every failure the engine and the character store can surface.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("{name} is dead")]
    CharacterDead { name: String },

    #[error("Special ability is on cooldown ({turns_remaining} turns remaining)")]
    AbilityOnCooldown { turns_remaining: u32 },

    #[error("Enemy type '{0}' is invalid")]
    InvalidTarget(String),

    #[error("Not enough gold: have {gold}, change of {delta}")]
    InsufficientGold { gold: u32, delta: i64 },

    #[error("Combat is not active")]
    CombatNotActive,

    #[error("Experience overflow: {experience} + {amount} does not fit")]
    ExperienceOverflow { experience: u32, amount: u32 },

    #[error("Quest '{0}' not found")]
    QuestNotFound(String),

    #[error("Level {required} required (currently {current})")]
    InsufficientLevel { required: u32, current: u32 },

    #[error("Quest requirements not met: {0}")]
    QuestRequirementsNotMet(String),

    #[error("Quest '{0}' already completed")]
    QuestAlreadyCompleted(String),

    #[error("Quest '{0}' is not active")]
    QuestNotActive(String),

    #[error("Inventory is full ({capacity} slots)")]
    InventoryFull { capacity: usize },

    #[error("Item '{0}' not found")]
    ItemNotFound(String),

    #[error("Invalid item type: {0}")]
    InvalidItemType(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid class: {0}")]
    InvalidCharacterClass(String),

    #[error("Character '{0}' not found")]
    CharacterNotFound(String),

    #[error("Invalid save data: {0}")]
    InvalidSaveData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Save file corrupted: {0}")]
    SaveFileCorrupted(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;

impl GameError {
    /// Errors the caller can recover from by choosing another action.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GameError::AbilityOnCooldown { .. })
    }
}
