use std::fmt;

/// Reasons a round cannot start. The table is left untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BetError {
    GameOver,
    Invalid,
    InsufficientFunds { bet: i64, wallet: i64 },
    RoundInProgress,
}

impl BetError {
    /// Text shown to the player.
    pub fn message(&self) -> &'static str {
        match self {
            BetError::GameOver => "GAME OVER!",
            BetError::Invalid => "Enter a valid bet!",
            BetError::InsufficientFunds { .. } => "Not enough funds!",
            BetError::RoundInProgress => "Finish this hand first!",
        }
    }
}

impl fmt::Display for BetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetError::GameOver => write!(f, "wallet is empty"),
            BetError::Invalid => write!(f, "bet must be a positive integer"),
            BetError::InsufficientFunds { bet, wallet } => {
                write!(f, "bet {bet} exceeds wallet {wallet}")
            }
            BetError::RoundInProgress => write!(f, "a round is already in progress"),
        }
    }
}

impl std::error::Error for BetError {}

/// A presenter call that failed. Logged and otherwise ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresentError(pub String);

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "presenter failed: {}", self.0)
    }
}

impl std::error::Error for PresentError {}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "{err}"),
            ConfigError::Invalid(reason) => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}
