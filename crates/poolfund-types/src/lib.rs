//! Poolfund Types - Core type definitions for the POOLFUND ledger.
//!
//! This crate provides the fundamental types used throughout the fund engine:
//! - Addresses (20-byte opaque identities, Bech32m encoded)
//! - Type-level errors

pub mod address;
pub mod error;

pub use address::Address;
pub use error::TypesError;
