//! Security Module
//!
//! Memory hygiene for sensitive material handled during transaction
//! authorization: biometric templates, voice samples, match confidences
//! and decrypted secrets.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Secure Memory                       │
//! ├─────────────────────────────────────────────────────┤
//! │  secure_erase  │  SensitiveBuffer  │  SensitiveValue │
//! └─────────────────────────────────────────────────────┘
//!                          ↑
//! ┌─────────────────────────────────────────────────────┐
//! │              Callers holding sensitive bytes         │
//! │  Biometric upload │ Auth orchestration │ Secrets     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Features
//!
//! ## Secure Erase (`secure_erase`)
//! - Volatile overwrite of the whole allocation, not elided by the optimizer
//! - Length and capacity reset to zero afterwards
//! - No-op on absent or empty buffers, idempotent
//!
//! ## Scoped Holders (`sensitive`)
//! - `SensitiveBuffer`: erase on drop, leak-free growth, redacted `Debug`
//! - `SensitiveValue<T>`: zeroize-on-drop wrapper for scalars
//!
//! # Usage Examples
//!
//! ## Erasing a buffer
//!
//! ```rust
//! use security::secure_erase;
//!
//! let mut template = vec![0x17u8; 512];
//! // ... compare against the enrolled template ...
//! secure_erase(Some(&mut template));
//!
//! assert!(template.is_empty());
//! assert_eq!(template.capacity(), 0);
//! ```
//!
//! ## Scoped acquisition
//!
//! ```rust
//! use security::SensitiveBuffer;
//!
//! fn match_sample(sample: &[u8]) -> Result<f64, String> {
//!     if sample.is_empty() {
//!         return Err("empty sample".to_string());
//!     }
//!     Ok(0.97)
//! }
//!
//! # fn example() -> Result<(), String> {
//! let sample = SensitiveBuffer::from_vec(b"raw face capture".to_vec());
//! // Erased when `sample` drops, whether `?` returns early or not.
//! let confidence = match_sample(sample.as_slice())?;
//! # assert!(confidence > 0.9);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Caller Discipline
//!
//! Erasure takes `&mut`, so no other reference can observe the buffer
//! while it is being overwritten. Copies the caller made before handing
//! the buffer over are outside this crate's reach: move bytes into a
//! `SensitiveBuffer` as soon as they are produced.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod secure_erase;
pub mod sensitive;

// Re-exports for convenience
pub use secure_erase::{secure_erase, secure_erase_slice};
pub use sensitive::{SensitiveBuffer, SensitiveValue};
