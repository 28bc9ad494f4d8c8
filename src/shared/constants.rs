/// Permission required to submit a new rubbish location
pub const PERMISSION_ADD_LOCATION: &str = "add:location";

/// Maximum length of a single log entry description
pub const MAX_LOG_DESCRIPTION_LENGTH: u64 = 5000;
