//! Keys of the auditor. The private key `x` is a non-zero scalar and the public key is `H = ge * x`.

use crate::{
    error::IdEscrowError, setup::DomainParameters, util::validate_group_element, Result,
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{PrimeField, Zero};
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, SerializationError, Valid, Validate,
};
use ark_std::{io::Read, rand::RngCore, vec::Vec};
use digest::Digest;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Private key of the auditor. Only the auditor holds it and it is only needed for decryption.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop, CanonicalSerialize)]
pub struct PrivateKey<F: PrimeField>(pub(crate) F);

impl<F: PrimeField> Valid for PrivateKey<F> {
    fn check(&self) -> Result<(), SerializationError> {
        self.0.check()?;
        if self.0.is_zero() {
            return Err(SerializationError::InvalidData);
        }
        Ok(())
    }
}

impl<F: PrimeField> CanonicalDeserialize for PrivateKey<F> {
    fn deserialize_with_mode<R: Read>(
        reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let sk = Self(F::deserialize_with_mode(reader, compress, Validate::No)?);
        if validate == Validate::Yes {
            sk.check()?;
        }
        Ok(sk)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct PublicKey<G: AffineRepr>(pub G);

impl<F: PrimeField> PrivateKey<F> {
    pub fn generate<R: RngCore>(rng: &mut R) -> Self {
        let mut x = F::rand(rng);
        while x.is_zero() {
            x = F::rand(rng);
        }
        Self(x)
    }

    pub fn new(x: F) -> Result<Self> {
        if x.is_zero() {
            return Err(IdEscrowError::ZeroPrivateKey);
        }
        Ok(Self(x))
    }

    pub fn scalar(&self) -> &F {
        &self.0
    }
}

impl<G: AffineRepr> PublicKey<G> {
    /// `H = ge * x`
    pub fn derive<D: Digest>(
        params: &DomainParameters<G, D>,
        private_key: &PrivateKey<G::ScalarField>,
    ) -> Self {
        Self(
            params
                .ge()
                .mul_bigint(private_key.0.into_bigint())
                .into_affine(),
        )
    }

    /// Check that this is the public key of the given private key
    pub fn verify_consistency<D: Digest>(
        &self,
        params: &DomainParameters<G, D>,
        private_key: &PrivateKey<G::ScalarField>,
    ) -> Result<()> {
        if private_key.0.is_zero() {
            return Err(IdEscrowError::ZeroPrivateKey);
        }
        if Self::derive(params, private_key) != *self {
            return Err(IdEscrowError::PublicKeyMismatch);
        }
        Ok(())
    }

    /// Check that the key is a non-identity element of the prime order subgroup. Should be done on any key
    /// received from elsewhere before encrypting to it.
    pub fn verify_well_formed(&self) -> Result<()> {
        validate_group_element(&self.0)?;
        if self.0.is_zero() {
            return Err(IdEscrowError::IdentityGroupElement);
        }
        Ok(())
    }
}

pub fn keygen<R: RngCore, G: AffineRepr, D: Digest>(
    rng: &mut R,
    params: &DomainParameters<G, D>,
) -> (PrivateKey<G::ScalarField>, PublicKey<G>) {
    let sk = PrivateKey::generate(rng);
    let pk = PublicKey::derive(params, &sk);
    (sk, pk)
}
