//! Maestro (M3) API client core
//!
//! Implements the platform's signed/encrypted batched JSON-RPC protocol:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            resource services                  │
//! │   (maestro-provision and other callers)       │
//! └──────────────────┬───────────────────────────┘
//!                    │ Payload
//! ┌──────────────────▼───────────────────────────┐
//! │               maestro-client                  │
//! │  ┌───────────┐  ┌─────────┐  ┌────────────┐  │
//! │  │ Transport │──│ crypto  │  │  envelope  │  │
//! │  │ (reqwest) │  │ AES-GCM │  │ batch model│  │
//! │  └───────────┘  │ + HMAC  │  └────────────┘  │
//! │                 └─────────┘                   │
//! └──────────────────┬───────────────────────────┘
//!                    │ POST, base64(AES-GCM(json))
//!                    ▼
//!              Maestro endpoint
//! ```
//!
//! A caller builds a [`Payload`], the [`Transport`] serializes it as a
//! one-element batch, encrypts it with the session secret key, signs it
//! with an HMAC bound to the request timestamp, and POSTs it. The response
//! decrypts to a [`BatchResult`] whose single [`RawResult`] the caller
//! interprets through its `status`/`error`/`data` fields.

pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod transport;

// Re-exports
pub use config::Config;
pub use envelope::{BatchResult, Params, Payload, RawResult};
pub use error::{ClientError, Result};
pub use transport::{call, Transport, Transporter};
