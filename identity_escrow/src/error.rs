use ark_serialize::SerializationError;
use ark_std::{
    string::{String, ToString},
    vec::Vec,
};

#[derive(Debug)]
pub enum IdEscrowError {
    /// The token identifier binding a proof to one credential must not be empty
    EmptyTokenId,
    /// A group element failed validation, i.e. it is not on the curve or not in the prime order subgroup
    InvalidGroupElement,
    /// The auditor's public key cannot be the identity
    IdentityGroupElement,
    /// A scalar was not a canonical element of the scalar field
    InvalidFieldElement,
    /// Private key must be a non-zero scalar
    ZeroPrivateKey,
    /// The ciphertext and its inputs are well-formed but the proof does not verify
    InvalidProof,
    /// Public key is not `ge * x` for the given private key
    PublicKeyMismatch,
    /// A fixed randomness source was asked for a second bundle
    RandomnessExhausted,
    /// The presentation proof carries no committed attribute
    NoCommittedAttributes,
    /// Index of the committed attribute is out of bounds. Tuple is (index, number of items)
    CommittedIndexOutOfBounds(usize, usize),
    /// Wire object could not be parsed, e.g. a required field is missing or not valid base64
    MalformedWireObject(String),
    /// An encoded group or field element has unexpected bytes at its end
    TrailingBytes(usize),
    /// The issuer UID in the wire object differs from the one of the issuer it is bound to
    UidMismatch { expected: Vec<u8>, found: Vec<u8> },
    /// The encryption generator in the wire object is not the generator of the issuer's group
    UnexpectedEncryptionGenerator,
    Serialization(SerializationError),
}

impl From<SerializationError> for IdEscrowError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}

impl From<serde_json::Error> for IdEscrowError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedWireObject(e.to_string())
    }
}
