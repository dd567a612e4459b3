//! PetChain - a proof-of-work ledger of collectible pets
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Blocks, the ledger, integrity validation and the pet registry
//! - [`transaction`] - Transaction payloads and their JSON codec
//! - [`history`] - Per-pet and per-owner views projected from the ledger
//!
//! ## Consensus
//! - [`miner`] - Proof-of-work sealing
//!
//! ## Pets
//! - [`pet`] - The pet asset record
//! - [`derivation`] - Traits derived from the creating block's hash
//!
//! ## Cryptography & Wallets
//! - [`crypto`] - SHA-256 hex digests and id generation
//! - [`wallet`] - Random wallet addresses
//!
//! ## Service & Storage
//! - [`service`] - Create, trade and query pets over one shared ledger
//! - [`persistence`] - JSON file storage
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`cli`] - Bootstrap helpers shared by the binary

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod history;
pub mod transaction;

// ============================================================================
// Consensus & Mining
// ============================================================================
pub mod miner;

// ============================================================================
// Pets
// ============================================================================
pub mod derivation;
pub mod pet;

// ============================================================================
// Cryptography & Wallets
// ============================================================================
pub mod crypto;
pub mod wallet;

// ============================================================================
// Service & Storage
// ============================================================================
pub mod persistence;
pub mod service;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;
