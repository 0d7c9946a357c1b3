/// Application name
pub const APP_NAME: &str = "Foyer";

/// Maximum notice length in characters
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Maximum schedule-block label length in characters
pub const MAX_LABEL_LEN: usize = 80;

/// Default page size for the notice board
pub const DEFAULT_MESSAGE_LIMIT: u32 = 50;

/// Days in a schedule week
pub const DAYS_PER_WEEK: usize = 7;
