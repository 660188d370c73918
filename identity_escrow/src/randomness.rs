//! Randomness of a single verifiable encryption.
//!
//! Each encryption needs 4 random scalars, the Elgamal randomness `r` and the blindings `xb'`, `r'`, `ob'` of the
//! Sigma protocol. These must never be shared by 2 proofs, even ones created concurrently, since the response
//! equations of 2 proofs with the same blindings reveal the secrets. Encryption takes them from a
//! [`RandomnessSource`]. In production that is [`SampledRandomness`] which samples all 4 afresh on each call.
//! Reproducing a test vector needs [`FixedRandomness`] which is only compiled for tests or with the `test-vectors`
//! feature and can be drawn from only once.

use crate::Result;
use ark_ff::PrimeField;
use ark_std::rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(any(test, feature = "test-vectors"))]
use crate::error::IdEscrowError;

/// Random exponents used by one verifiable encryption
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RandomnessBundle<F: PrimeField> {
    /// Elgamal randomness `r`
    pub r: F,
    /// Blinding `xb'` for the attribute
    pub xb_blinding: F,
    /// Blinding `r'` for the Elgamal randomness
    pub r_blinding: F,
    /// Blinding `ob'` for the commitment's opening
    pub ob_blinding: F,
}

impl<F: PrimeField> RandomnessBundle<F> {
    pub fn rand<R: RngCore>(rng: &mut R) -> Self {
        Self {
            r: F::rand(rng),
            xb_blinding: F::rand(rng),
            r_blinding: F::rand(rng),
            ob_blinding: F::rand(rng),
        }
    }
}

/// Supplies the randomness of encryptions, one bundle per encryption
pub trait RandomnessSource<F: PrimeField> {
    fn next_bundle(&mut self) -> Result<RandomnessBundle<F>>;
}

/// Samples a new bundle from the wrapped RNG on every call
pub struct SampledRandomness<'a, R: RngCore>(pub &'a mut R);

impl<'a, F: PrimeField, R: RngCore> RandomnessSource<F> for SampledRandomness<'a, R> {
    fn next_bundle(&mut self) -> Result<RandomnessBundle<F>> {
        Ok(RandomnessBundle::rand(self.0))
    }
}

/// A caller chosen bundle, handed out exactly once
#[cfg(any(test, feature = "test-vectors"))]
#[derive(Debug)]
pub struct FixedRandomness<F: PrimeField>(Option<RandomnessBundle<F>>);

#[cfg(any(test, feature = "test-vectors"))]
impl<F: PrimeField> FixedRandomness<F> {
    pub fn new(bundle: RandomnessBundle<F>) -> Self {
        Self(Some(bundle))
    }
}

#[cfg(any(test, feature = "test-vectors"))]
impl<F: PrimeField> RandomnessSource<F> for FixedRandomness<F> {
    fn next_bundle(&mut self) -> Result<RandomnessBundle<F>> {
        self.0.take().ok_or(IdEscrowError::RandomnessExhausted)
    }
}
