/// Env value holding the MAC key identifier.
pub const TENT_MAC_KEY_ID: &str = "TENT_MAC_KEY_ID";
/// Env value holding the MAC key.
pub const TENT_MAC_KEY: &str = "TENT_MAC_KEY";
/// Env value holding the MAC algorithm name.
pub const TENT_MAC_ALGORITHM: &str = "TENT_MAC_ALGORITHM";

pub const MAC_SCHEME: &str = "MAC";

/// Random bytes drawn for every nonce, before hex encoding.
pub const NONCE_LENGTH: usize = 8;
