//! Remote operation names
//!
//! The `type` field of every request envelope names one of these.

// instances
pub const RUN_INSTANCE: &str = "RUN_INSTANCE";
pub const TERMINATE_INSTANCE: &str = "TERMINATE_INSTANCE";
pub const DESCRIBE_INSTANCE: &str = "DESCRIBE_INSTANCE";
pub const TERMINATION_PROTECTION: &str = "MANAGE_TERMINATION_PROTECTION";

// images
pub const CREATE_IMAGE: &str = "CREATE_IMAGE";
pub const DELETE_IMAGE: &str = "DELETE_IMAGE";
pub const DESCRIBE_IMAGE: &str = "DESCRIBE_IMAGE";

// keypairs
pub const CREATE_KEYPAIR: &str = "ADD_KEY";
pub const DELETE_KEYPAIR: &str = "DELETE_KEY";
pub const DESCRIBE_KEYPAIR: &str = "DESCRIBE_KEYS";
