/// The fixed set of commands the bot understands.
///
/// Dispatch is an explicit table: the raw command token (case-sensitive,
/// without the prefix) maps to one variant, everything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Dog,
    All,
    Breed,
}

impl BotCommand {
    pub const ALL: [BotCommand; 5] = [
        BotCommand::Start,
        BotCommand::Help,
        BotCommand::Dog,
        BotCommand::All,
        BotCommand::Breed,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "start" => Some(BotCommand::Start),
            "help" => Some(BotCommand::Help),
            "dog" => Some(BotCommand::Dog),
            "all" => Some(BotCommand::All),
            "breed" => Some(BotCommand::Breed),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BotCommand::Start => "start",
            BotCommand::Help => "help",
            BotCommand::Dog => "dog",
            BotCommand::All => "all",
            BotCommand::Breed => "breed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BotCommand::Start => "Start the bot",
            BotCommand::Help => "Show help message",
            BotCommand::Dog => "Get a random dog picture",
            BotCommand::All => "List all available breeds",
            BotCommand::Breed => "Get a picture of a specific breed",
        }
    }

    pub fn usage(&self) -> Option<&'static str> {
        match self {
            BotCommand::Breed => Some("/breed <name>"),
            _ => None,
        }
    }
}
