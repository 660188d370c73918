//! Verifiable encryption of a committed attribute to the auditor.
//!
//! Given a Pedersen commitment `C_xb = g * x_b + g1 * o_b` to attribute `x_b`, the prover encrypts the pseudonym
//! `ge * x_b` with Elgamal under the auditor's key `H` and proves that the ciphertext encrypts the committed value:
//! 1. Elgamal encryption with randomness `r`: `E1 = ge * r`, `E2 = H * r + ge * x_b`
//! 2. Prover picks blindings `xb'`, `r'`, `ob'` and computes `C_xb' = g * xb' + g1 * ob'`, `E1' = ge * r'` and
//!    `E2' = ge * xb' + H * r'`
//! 3. Challenge `c` is the hash of the issuer UID, the token identifier, `H`, `C_xb`, `E1`, `E2`, `C_xb'`, `E1'`,
//!    `E2'` and the optional label
//! 4. Responses are `rXb = xb' - c * x_b`, `rR = r' - c * r` and `rOb = ob' - c * o_b`
//! 5. Verifier computes `C_xb' = g * rXb + g1 * rOb + C_xb * c`, `E1' = ge * rR + E1 * c` and
//!    `E2' = ge * rXb + H * rR + E2 * c` and checks that hashing them as in step 3 gives `c`
//!
//! The auditor decrypts a verified ciphertext to the pseudonym `E2 - E1 * x`.

use crate::{
    error::IdEscrowError,
    keys::{PrivateKey, PublicKey},
    randomness::{RandomnessSource, SampledRandomness},
    setup::DomainParameters,
    util::validate_group_element,
    Result,
};
use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Valid};
use ark_std::{cfg_iter, end_timer, io::Write, rand::RngCore, start_timer, vec, vec::Vec};
use digest::Digest;
use schnorr_pok::compute_random_oracle_challenge;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Identifier of the presentation token. Binds the proof to a single credential presentation.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize)]
pub struct TokenId(Vec<u8>);

impl TokenId {
    pub fn new(id: impl Into<Vec<u8>>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdEscrowError::EmptyTokenId);
        }
        Ok(Self(id))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Challenge and responses of the Sigma protocol
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof<F: PrimeField> {
    pub c: F,
    pub r_xb: F,
    pub r_r: F,
    pub r_ob: F,
}

/// Elgamal encryption of the pseudonym `ge * x_b` along with the proof that it encrypts the committed attribute
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Ciphertext<G: AffineRepr> {
    /// `ge * r`
    pub E1: G,
    /// `H * r + ge * x_b`
    pub E2: G,
    /// Optional public data bound to the proof. It is authenticated but not encrypted.
    pub label: Option<Vec<u8>>,
    pub proof: Proof<G::ScalarField>,
}

/// A ciphertext whose proof has been verified. Only such ciphertexts can be decrypted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedCiphertext<G: AffineRepr>(Ciphertext<G>);

/// The decrypted value `ge * x_b`. Stable for an attribute across presentations and not reversible to `x_b`.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Pseudonym<G: AffineRepr>(pub G);

/// Public inputs of the proof, in the order they are hashed
struct Statement<'a, G: AffineRepr> {
    uid: &'a [u8],
    token_id: &'a TokenId,
    public_key: &'a G,
    commitment: &'a G,
    E1: &'a G,
    E2: &'a G,
    label: &'a Option<Vec<u8>>,
}

impl<'a, G: AffineRepr> Statement<'a, G> {
    /// Variable length fields are length prefixed and the label carries a presence flag so that no 2 distinct
    /// statements serialize to the same bytes.
    fn challenge_contribution<W: Write>(
        &self,
        t_commitment: &G,
        t_E1: &G,
        t_E2: &G,
        mut writer: W,
    ) -> Result<()> {
        self.uid.serialize_compressed(&mut writer)?;
        self.token_id.serialize_compressed(&mut writer)?;
        self.public_key.serialize_compressed(&mut writer)?;
        self.commitment.serialize_compressed(&mut writer)?;
        self.E1.serialize_compressed(&mut writer)?;
        self.E2.serialize_compressed(&mut writer)?;
        t_commitment.serialize_compressed(&mut writer)?;
        t_E1.serialize_compressed(&mut writer)?;
        t_E2.serialize_compressed(&mut writer)?;
        self.label.serialize_compressed(&mut writer)?;
        Ok(())
    }

    fn challenge<D: Digest>(&self, t_commitment: &G, t_E1: &G, t_E2: &G) -> Result<G::ScalarField> {
        let mut challenge_bytes = vec![];
        self.challenge_contribution(t_commitment, t_E1, t_E2, &mut challenge_bytes)?;
        Ok(compute_random_oracle_challenge::<G::ScalarField, D>(
            &challenge_bytes,
        ))
    }
}

impl<G: AffineRepr> Ciphertext<G> {
    /// Encrypt attribute `x_b` committed in `commitment` with opening `o_b`, sampling fresh randomness from `rng`
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        params: &DomainParameters<G, D>,
        public_key: &PublicKey<G>,
        token_id: &TokenId,
        commitment: &G,
        x_b: &G::ScalarField,
        o_b: &G::ScalarField,
        label: Option<Vec<u8>>,
    ) -> Result<Self> {
        Self::new_with_randomness(
            &mut SampledRandomness(rng),
            params,
            public_key,
            token_id,
            commitment,
            x_b,
            o_b,
            label,
        )
    }

    /// Same as `Self::new` but takes the randomness from the given source
    pub fn new_with_randomness<S: RandomnessSource<G::ScalarField>, D: Digest>(
        randomness: &mut S,
        params: &DomainParameters<G, D>,
        public_key: &PublicKey<G>,
        token_id: &TokenId,
        commitment: &G,
        x_b: &G::ScalarField,
        o_b: &G::ScalarField,
        label: Option<Vec<u8>>,
    ) -> Result<Self> {
        let encrypt_time = start_timer!(|| "Identity escrow encryption");
        let randomness = randomness.next_bundle()?;
        let ge = *params.ge();
        let (g, g1) = params.commitment_bases();
        let H = public_key.0;

        let E1 = ge.mul_bigint(randomness.r.into_bigint());
        let E2 = G::Group::msm_unchecked(&[H, ge], &[randomness.r, *x_b]);
        let t_commitment = G::Group::msm_unchecked(
            &[*g, *g1],
            &[randomness.xb_blinding, randomness.ob_blinding],
        );
        let t_E1 = ge.mul_bigint(randomness.r_blinding.into_bigint());
        let t_E2 = G::Group::msm_unchecked(
            &[ge, H],
            &[randomness.xb_blinding, randomness.r_blinding],
        );
        let points = G::Group::normalize_batch(&[E1, E2, t_commitment, t_E1, t_E2]);
        let (E1, E2) = (points[0], points[1]);

        let c = Statement {
            uid: params.uid(),
            token_id,
            public_key: &H,
            commitment,
            E1: &E1,
            E2: &E2,
            label: &label,
        }
        .challenge::<D>(&points[2], &points[3], &points[4])?;

        let proof = Proof {
            c,
            r_xb: randomness.xb_blinding - c * x_b,
            r_r: randomness.r_blinding - c * randomness.r,
            r_ob: randomness.ob_blinding - c * o_b,
        };
        end_timer!(encrypt_time);
        Ok(Self {
            E1,
            E2,
            label,
            proof,
        })
    }

    /// Returns true only if the ciphertext is well-formed and its proof verifies for the given token, public key
    /// and commitment. Use `Self::check_proof` to learn why verification failed.
    pub fn verify<D: Digest>(
        &self,
        params: &DomainParameters<G, D>,
        token_id: &TokenId,
        public_key: &PublicKey<G>,
        commitment: &G,
    ) -> bool {
        self.check_proof(params, token_id, public_key, commitment).is_ok()
    }

    /// Like `Self::verify` but returns `InvalidGroupElement` or `InvalidFieldElement` for malformed inputs and
    /// `InvalidProof` when the inputs are well-formed but the proof is wrong.
    pub fn check_proof<D: Digest>(
        &self,
        params: &DomainParameters<G, D>,
        token_id: &TokenId,
        public_key: &PublicKey<G>,
        commitment: &G,
    ) -> Result<()> {
        let verify_time = start_timer!(|| "Identity escrow verification");
        let result = self
            .recompute_challenge(params, token_id, public_key, commitment)
            .and_then(|challenge| {
                if challenge != self.proof.c {
                    return Err(IdEscrowError::InvalidProof);
                }
                Ok(())
            });
        end_timer!(verify_time);
        result
    }

    /// Validates the inputs and computes the challenge from the verification equations
    fn recompute_challenge<D: Digest>(
        &self,
        params: &DomainParameters<G, D>,
        token_id: &TokenId,
        public_key: &PublicKey<G>,
        commitment: &G,
    ) -> Result<G::ScalarField> {
        validate_group_element(&self.E1)?;
        validate_group_element(&self.E2)?;
        validate_group_element(commitment)?;
        validate_group_element(&public_key.0)?;
        self.proof
            .check()
            .map_err(|_| IdEscrowError::InvalidFieldElement)?;

        let ge = *params.ge();
        let (g, g1) = params.commitment_bases();
        let H = public_key.0;
        let Proof { c, r_xb, r_r, r_ob } = self.proof;

        let t_commitment = G::Group::msm_unchecked(&[*g, *g1, *commitment], &[r_xb, r_ob, c]);
        let t_E1 = G::Group::msm_unchecked(&[ge, self.E1], &[r_r, c]);
        let t_E2 = G::Group::msm_unchecked(&[ge, H, self.E2], &[r_xb, r_r, c]);
        let t = G::Group::normalize_batch(&[t_commitment, t_E1, t_E2]);

        Statement {
            uid: params.uid(),
            token_id,
            public_key: &H,
            commitment,
            E1: &self.E1,
            E2: &self.E2,
            label: &self.label,
        }
        .challenge::<D>(&t[0], &t[1], &t[2])
    }

    /// Verifies the proof and on success returns the ciphertext in a form that can be decrypted
    pub fn into_verified<D: Digest>(
        self,
        params: &DomainParameters<G, D>,
        token_id: &TokenId,
        public_key: &PublicKey<G>,
        commitment: &G,
    ) -> Result<VerifiedCiphertext<G>> {
        self.check_proof(params, token_id, public_key, commitment)?;
        Ok(VerifiedCiphertext(self))
    }
}

impl<G: AffineRepr> VerifiedCiphertext<G> {
    pub fn ciphertext(&self) -> &Ciphertext<G> {
        &self.0
    }

    pub fn into_inner(self) -> Ciphertext<G> {
        self.0
    }
}

impl<F: PrimeField> PrivateKey<F> {
    /// Recover the pseudonym `E2 - E1 * x`
    pub fn decrypt<G: AffineRepr<ScalarField = F>>(
        &self,
        ciphertext: &VerifiedCiphertext<G>,
    ) -> Pseudonym<G> {
        let decrypt_time = start_timer!(|| "Identity escrow decryption");
        let ct = &ciphertext.0;
        let pseudonym = (ct.E2.into_group() - ct.E1.mul_bigint(self.0.into_bigint())).into_affine();
        end_timer!(decrypt_time);
        Pseudonym(pseudonym)
    }
}

impl<G: AffineRepr> Pseudonym<G> {
    /// Pseudonym `ge * x_b` that a ciphertext of attribute `x_b` decrypts to
    pub fn from_attribute<D: Digest>(params: &DomainParameters<G, D>, x_b: &G::ScalarField) -> Self {
        Self(params.ge().mul_bigint(x_b.into_bigint()).into_affine())
    }
}

/// Verify several ciphertexts encrypted to the same auditor. Each item is a ciphertext with its token identifier and
/// attribute commitment. Returns the result of each verification in the same order.
pub fn verify_many<G: AffineRepr, D: Digest>(
    params: &DomainParameters<G, D>,
    public_key: &PublicKey<G>,
    items: &[(&Ciphertext<G>, &TokenId, &G)],
) -> Vec<bool> {
    cfg_iter!(items)
        .map(|(ciphertext, token_id, commitment)| {
            ciphertext.verify(params, token_id, public_key, commitment)
        })
        .collect()
}
