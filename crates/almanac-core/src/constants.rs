/// Years past the reference instant that an open-ended recurrence may reach.
pub const DEFAULT_LOOKAHEAD_YEARS: u32 = 10;

/// Upper bound accepted for a configured lookahead.
pub const MAX_LOOKAHEAD_YEARS: u32 = 1000;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_EVENTS_PATH: &str = "events.json";
