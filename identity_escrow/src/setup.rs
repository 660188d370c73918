//! Issuer parameters consumed by the scheme and the domain parameters derived from them.
//!
//! The escrow scheme does not own the credential issuer's parameters. It only needs the issuer's unique identifier,
//! the group, the hash function and the 2 bases `(g, g1)` over which the presentation layer commits to attributes.
//! These are accessed through [`IssuerParameters`]. [`IssuerSetup`] is a minimal implementation of it.

use ark_ec::AffineRepr;
use ark_std::{
    fmt,
    marker::PhantomData,
    string::{String, ToString},
    vec::Vec,
};
use digest::Digest;
use dock_crypto_utils::{concat_slices, hashing_utils::affine_group_elem_from_try_and_incr};

/// What the escrow scheme reads from the parameters of a credential issuer
pub trait IssuerParameters<G: AffineRepr> {
    /// Hash function of the issuer, used for the Fiat-Shamir challenge
    type Hash: Digest;

    /// Unique identifier of the issuer
    fn uid(&self) -> &[u8];

    /// Name of the group description, like "P-256" or "BLS12-381 G1"
    fn group_name(&self) -> &str;

    /// Bases `(g, g1)` of the Pedersen commitment `g * x_b + g1 * o_b` to an attribute `x_b`
    fn commitment_bases(&self) -> (G, G);
}

/// Issuer parameters where `g` is the group generator and `g1` is created by hashing a public label
pub struct IssuerSetup<G: AffineRepr, D: Digest> {
    pub uid: Vec<u8>,
    pub group_name: String,
    pub g: G,
    pub g1: G,
    _digest: PhantomData<fn() -> D>,
}

impl<G: AffineRepr, D: Digest> IssuerSetup<G, D> {
    pub fn new(uid: &[u8], group_name: &str, label: &[u8]) -> Self {
        let g1 = affine_group_elem_from_try_and_incr::<G, D>(&concat_slices![label, b" : g1"]);
        Self {
            uid: uid.to_vec(),
            group_name: group_name.to_string(),
            g: G::generator(),
            g1,
            _digest: PhantomData,
        }
    }
}

impl<G: AffineRepr, D: Digest> IssuerParameters<G> for IssuerSetup<G, D> {
    type Hash = D;

    fn uid(&self) -> &[u8] {
        &self.uid
    }

    fn group_name(&self) -> &str {
        &self.group_name
    }

    fn commitment_bases(&self) -> (G, G) {
        (self.g, self.g1)
    }
}

impl<G: AffineRepr, D: Digest> Clone for IssuerSetup<G, D> {
    fn clone(&self) -> Self {
        Self {
            uid: self.uid.clone(),
            group_name: self.group_name.clone(),
            g: self.g,
            g1: self.g1,
            _digest: PhantomData,
        }
    }
}

impl<G: AffineRepr, D: Digest> fmt::Debug for IssuerSetup<G, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuerSetup")
            .field("uid", &self.uid)
            .field("group_name", &self.group_name)
            .field("g", &self.g)
            .field("g1", &self.g1)
            .finish()
    }
}

/// Binds the scheme to one group, one hash function and one encryption generator, scoped to a single issuer.
pub struct DomainParameters<G: AffineRepr, D: Digest> {
    uid: Vec<u8>,
    group_name: String,
    /// Encryption generator, always the canonical generator of the group
    ge: G,
    g: G,
    g1: G,
    _digest: PhantomData<fn() -> D>,
}

impl<G: AffineRepr, D: Digest> DomainParameters<G, D> {
    pub fn new<I: IssuerParameters<G, Hash = D>>(issuer: &I) -> Self {
        let (g, g1) = issuer.commitment_bases();
        Self {
            uid: issuer.uid().to_vec(),
            group_name: issuer.group_name().to_string(),
            ge: G::generator(),
            g,
            g1,
            _digest: PhantomData,
        }
    }

    pub fn uid(&self) -> &[u8] {
        &self.uid
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Encryption generator `ge`
    pub fn ge(&self) -> &G {
        &self.ge
    }

    /// Bases `(g, g1)` of the attribute commitment
    pub fn commitment_bases(&self) -> (&G, &G) {
        (&self.g, &self.g1)
    }

    /// Whether these parameters were created for the given issuer
    pub fn is_for_issuer<I: IssuerParameters<G>>(&self, issuer: &I) -> bool {
        self.uid.as_slice() == issuer.uid()
    }
}

/// Only the issuer UID, group name and encryption generator are compared. The commitment bases come from the
/// issuer and are not part of the identity of the domain.
impl<G: AffineRepr, D: Digest> PartialEq for DomainParameters<G, D> {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid && self.group_name == other.group_name && self.ge == other.ge
    }
}

impl<G: AffineRepr, D: Digest> Eq for DomainParameters<G, D> {}

impl<G: AffineRepr, D: Digest> Clone for DomainParameters<G, D> {
    fn clone(&self) -> Self {
        Self {
            uid: self.uid.clone(),
            group_name: self.group_name.clone(),
            ge: self.ge,
            g: self.g,
            g1: self.g1,
            _digest: PhantomData,
        }
    }
}

impl<G: AffineRepr, D: Digest> fmt::Debug for DomainParameters<G, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainParameters")
            .field("uid", &self.uid)
            .field("group_name", &self.group_name)
            .field("ge", &self.ge)
            .field("g", &self.g)
            .field("g1", &self.g1)
            .finish()
    }
}
