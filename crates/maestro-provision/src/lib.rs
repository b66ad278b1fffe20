//! Maestro provisioning layer
//!
//! Bridges the platform's asynchronous resource lifecycles (instances,
//! images, keypairs) to a synchronous management contract. Every mutation
//! returns before the platform finishes; the [`Wait`] primitive re-polls a
//! describe-style call until a condition over its outcome holds.
//!
//! All services follow the same calling convention over the
//! `maestro-client` transport: build an envelope, execute a one-element
//! batch, unwrap the single result and interpret `status`/`error`/`data`.

pub mod error;
pub mod image;
pub mod instance;
pub mod keypair;
pub mod methods;
pub mod request;
pub mod state;
pub mod wait;

#[cfg(test)]
mod testing;

// Re-exports
pub use error::{ProvisionError, Result};
pub use image::{Image, ImageService};
pub use instance::{Instance, InstanceService};
pub use keypair::{Keypair, KeypairScope, KeypairService};
pub use request::DefaultRequestParams;
pub use state::InstanceState;
pub use wait::Wait;
