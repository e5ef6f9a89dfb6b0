//! Shared types, key codec, and adapter trait for the aclstore ACL storage engine.
//!
//! This crate contains the foundational types that are shared between the
//! store crate and all adapter implementations. Keeping them in a separate
//! crate lets adapters compile without depending on the store itself.

pub mod error;
pub mod key_codec;
pub mod prelude;
pub mod set_adapter;
pub mod types;

// vim: ts=4
