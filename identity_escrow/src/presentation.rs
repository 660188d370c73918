//! Glue between the escrow scheme and a credential presentation.
//!
//! A presentation consists of a token, a proof that commits to some of the token's attributes and the openings of
//! those commitments known to the prover. The escrowed attribute is always the first committed one. The traits here
//! are what the credential library has to implement.

use crate::{
    encryption::{Ciphertext, TokenId},
    error::IdEscrowError,
    keys::PublicKey,
    setup::DomainParameters,
    Result,
};
use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use ark_std::{marker::PhantomData, rand::RngCore, vec::Vec};
use digest::Digest;
use schnorr_pok::compute_random_oracle_challenge;

/// Position of the escrowed attribute among the committed ones
pub const ESCROWED_ATTRIBUTE_INDEX: usize = 0;

pub trait PresentationToken {
    /// Identifier that is unique to the token, like a hash of the token
    fn token_id(&self) -> Vec<u8>;
}

pub trait PresentationProof<G: AffineRepr> {
    /// Commitments `g * x + g1 * o` to the committed attributes, in the order they were committed
    fn commitments(&self) -> &[G];
}

pub trait CommitmentOpenings<F: PrimeField> {
    /// Openings `o` of the commitments, in the same order as the commitments
    fn openings(&self) -> &[F];
}

/// Maps the encoded attribute value to the scalar committed in the presentation proof
pub trait AttributeEncoding<F: PrimeField> {
    fn encode(&self, attribute: &[u8]) -> F;
}

/// Encodes an attribute by hashing it to a scalar
#[derive(Default)]
pub struct HashedAttributeEncoding<D: Digest>(PhantomData<fn() -> D>);

impl<F: PrimeField, D: Digest> AttributeEncoding<F> for HashedAttributeEncoding<D> {
    fn encode(&self, attribute: &[u8]) -> F {
        compute_random_oracle_challenge::<F, D>(attribute)
    }
}

fn escrowed_commitment<G: AffineRepr>(proof: &impl PresentationProof<G>) -> Result<&G> {
    proof
        .commitments()
        .get(ESCROWED_ATTRIBUTE_INDEX)
        .ok_or(IdEscrowError::NoCommittedAttributes)
}

/// Encrypt the first committed attribute of a presentation to the auditor
pub fn encrypt_presentation<R: RngCore, G: AffineRepr, D: Digest>(
    rng: &mut R,
    params: &DomainParameters<G, D>,
    public_key: &PublicKey<G>,
    token: &impl PresentationToken,
    proof: &impl PresentationProof<G>,
    openings: &impl CommitmentOpenings<G::ScalarField>,
    attribute: &[u8],
    encoding: &impl AttributeEncoding<G::ScalarField>,
    label: Option<Vec<u8>>,
) -> Result<Ciphertext<G>> {
    let token_id = TokenId::new(token.token_id())?;
    let commitment = escrowed_commitment(proof)?;
    let openings = openings.openings();
    let o_b = openings.get(ESCROWED_ATTRIBUTE_INDEX).ok_or(
        IdEscrowError::CommittedIndexOutOfBounds(ESCROWED_ATTRIBUTE_INDEX, openings.len()),
    )?;
    let x_b = encoding.encode(attribute);
    Ciphertext::new(
        rng, params, public_key, &token_id, commitment, &x_b, o_b, label,
    )
}

/// Verify the ciphertext against the token and the first commitment of the presentation proof. Errors only when
/// the presentation itself is unusable.
pub fn verify_presentation<G: AffineRepr, D: Digest>(
    params: &DomainParameters<G, D>,
    ciphertext: &Ciphertext<G>,
    token: &impl PresentationToken,
    proof: &impl PresentationProof<G>,
    public_key: &PublicKey<G>,
) -> Result<bool> {
    let token_id = TokenId::new(token.token_id())?;
    let commitment = escrowed_commitment(proof)?;
    Ok(ciphertext.verify(params, &token_id, public_key, commitment))
}
