// Provider plumbing shared by the Solar Suite crates:
// - Gemini generateContent client
// - ElevenLabs text-to-speech client
// - Request/response data structures
// - Configuration loading
// - Shared error types

// Export client module - API client for Gemini
pub mod client;
pub use client::*;

// Export speech module - API client for ElevenLabs
pub mod speech;
pub use speech::ElevenLabsClient;

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;
