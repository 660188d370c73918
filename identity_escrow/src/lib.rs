#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! # Identity escrow
//!
//! Verifiable encryption of an attribute committed in a credential presentation to an auditor. The verifier of a
//! presentation learns a ciphertext and a proof that it encrypts the committed attribute, without learning the
//! attribute. The auditor can later decrypt the ciphertext to a pseudonym of the attribute, `ge * x_b`, and
//! use it to look up the identity.
//!
//! - [`setup`]: issuer parameters and the domain parameters derived from them
//! - [`keys`]: auditor's key pair
//! - [`randomness`]: randomness sources for encryption
//! - [`encryption`]: encryption, proof verification and decryption
//! - [`presentation`]: adapters for credential presentations
//! - [`wire`]: JSON wire form and its binding to an issuer
//!
//! The scheme is generic over the group and the hash. Proofs are made non-interactive with Fiat-Shamir, hashing the
//! public inputs, the issuer UID and the presentation token's identifier.

pub mod encryption;
pub mod error;
pub mod keys;
pub mod presentation;
pub mod randomness;
pub mod setup;
mod util;
pub mod wire;

pub type Result<T, E = error::IdEscrowError> = core::result::Result<T, E>;

pub use encryption::{verify_many, Ciphertext, Proof, Pseudonym, TokenId, VerifiedCiphertext};
pub use error::IdEscrowError;
pub use keys::{keygen, PrivateKey, PublicKey};
pub use setup::{DomainParameters, IssuerParameters, IssuerSetup};
