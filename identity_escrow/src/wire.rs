//! External representation of the scheme's objects.
//!
//! Reading an object happens in 2 phases. Phase 1 parses text into a `Wire*` struct whose fields are raw bytes
//! (base64 strings in JSON). No group is known at this point so nothing is decoded. Phase 2, [`BindToIssuer::bind`],
//! consumes the phase 1 object and decodes it in the group of the given issuer, validating every element. A phase 1
//! object can thus be bound at most once and a bound object cannot exist without going through phase 1.
//!
//! Group elements are encoded in compressed canonical form and scalars in canonical form, both as produced by
//! `CanonicalSerialize::serialize_compressed`.

use crate::{
    encryption::{Ciphertext, Proof},
    error::IdEscrowError,
    keys::{PrivateKey, PublicKey},
    setup::{DomainParameters, IssuerParameters},
    Result,
};
use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{end_timer, start_timer, string::String, vec::Vec};
use digest::Digest;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDomainParameters {
    /// Issuer UID
    #[serde_as(as = "Base64")]
    pub uidp: Vec<u8>,
    /// Encryption generator
    #[serde_as(as = "Base64")]
    pub ge: Vec<u8>,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePublicKey {
    #[serde(rename = "H")]
    #[serde_as(as = "Base64")]
    pub h: Vec<u8>,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePrivateKey {
    #[serde_as(as = "Base64")]
    pub x: Vec<u8>,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireProof {
    #[serde_as(as = "Base64")]
    pub c: Vec<u8>,
    #[serde(rename = "rXb")]
    #[serde_as(as = "Base64")]
    pub r_xb: Vec<u8>,
    #[serde(rename = "rR")]
    #[serde_as(as = "Base64")]
    pub r_r: Vec<u8>,
    #[serde(rename = "rOb")]
    #[serde_as(as = "Base64")]
    pub r_ob: Vec<u8>,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCiphertext {
    #[serde(rename = "E1")]
    #[serde_as(as = "Base64")]
    pub e1: Vec<u8>,
    #[serde(rename = "E2")]
    #[serde_as(as = "Base64")]
    pub e2: Vec<u8>,
    /// Label of the ciphertext, `null` when there is none
    #[serde_as(as = "Option<Base64>", no_default)]
    pub info: Option<Vec<u8>>,
    pub proof: WireProof,
}

/// Phase 2 of reading a wire object. Decodes it in the group of `issuer`.
pub trait BindToIssuer<G: AffineRepr, I: IssuerParameters<G>> {
    type Bound;

    fn bind(self, issuer: &I) -> Result<Self::Bound>;
}

/// Decode a complete canonical encoding, rejecting invalid elements and trailing bytes
fn decode<T: CanonicalDeserialize>(bytes: &[u8]) -> Result<T> {
    let mut reader = bytes;
    let value = T::deserialize_compressed(&mut reader)?;
    if !reader.is_empty() {
        return Err(IdEscrowError::TrailingBytes(reader.len()));
    }
    Ok(value)
}

fn encode<T: CanonicalSerialize>(value: &T) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(value.compressed_size());
    value.serialize_compressed(&mut bytes)?;
    Ok(bytes)
}

impl<G: AffineRepr, I: IssuerParameters<G>> BindToIssuer<G, I> for WireDomainParameters {
    type Bound = DomainParameters<G, I::Hash>;

    fn bind(self, issuer: &I) -> Result<Self::Bound> {
        if self.uidp.as_slice() != issuer.uid() {
            return Err(IdEscrowError::UidMismatch {
                expected: issuer.uid().to_vec(),
                found: self.uidp,
            });
        }
        let ge: G = decode(&self.ge)?;
        if ge != G::generator() {
            return Err(IdEscrowError::UnexpectedEncryptionGenerator);
        }
        Ok(DomainParameters::new(issuer))
    }
}

impl<G: AffineRepr, I: IssuerParameters<G>> BindToIssuer<G, I> for WirePublicKey {
    type Bound = PublicKey<G>;

    fn bind(self, _issuer: &I) -> Result<Self::Bound> {
        Ok(PublicKey(decode(&self.h)?))
    }
}

impl<G: AffineRepr, I: IssuerParameters<G>> BindToIssuer<G, I> for WirePrivateKey {
    type Bound = PrivateKey<G::ScalarField>;

    fn bind(self, _issuer: &I) -> Result<Self::Bound> {
        PrivateKey::new(decode(&self.x)?)
    }
}

impl<G: AffineRepr, I: IssuerParameters<G>> BindToIssuer<G, I> for WireProof {
    type Bound = Proof<G::ScalarField>;

    fn bind(self, _issuer: &I) -> Result<Self::Bound> {
        Ok(Proof {
            c: decode(&self.c)?,
            r_xb: decode(&self.r_xb)?,
            r_r: decode(&self.r_r)?,
            r_ob: decode(&self.r_ob)?,
        })
    }
}

impl<G: AffineRepr, I: IssuerParameters<G>> BindToIssuer<G, I> for WireCiphertext {
    type Bound = Ciphertext<G>;

    fn bind(self, issuer: &I) -> Result<Self::Bound> {
        let bind_time = start_timer!(|| "Binding wire ciphertext");
        let ciphertext = Ciphertext {
            E1: decode(&self.e1)?,
            E2: decode(&self.e2)?,
            label: self.info,
            proof: BindToIssuer::<G, I>::bind(self.proof, issuer)?,
        };
        end_timer!(bind_time);
        Ok(ciphertext)
    }
}

impl<G: AffineRepr, D: Digest> DomainParameters<G, D> {
    pub fn to_wire(&self) -> Result<WireDomainParameters> {
        Ok(WireDomainParameters {
            uidp: self.uid().to_vec(),
            ge: encode(self.ge())?,
        })
    }
}

impl<G: AffineRepr> PublicKey<G> {
    pub fn to_wire(&self) -> Result<WirePublicKey> {
        Ok(WirePublicKey { h: encode(&self.0)? })
    }
}

impl<F: PrimeField> PrivateKey<F> {
    /// Exposes the secret scalar. Only for storage under the auditor's control.
    pub fn to_wire(&self) -> Result<WirePrivateKey> {
        Ok(WirePrivateKey {
            x: encode(self.scalar())?,
        })
    }
}

impl<F: PrimeField> Proof<F> {
    pub fn to_wire(&self) -> Result<WireProof> {
        Ok(WireProof {
            c: encode(&self.c)?,
            r_xb: encode(&self.r_xb)?,
            r_r: encode(&self.r_r)?,
            r_ob: encode(&self.r_ob)?,
        })
    }
}

impl<G: AffineRepr> Ciphertext<G> {
    pub fn to_wire(&self) -> Result<WireCiphertext> {
        Ok(WireCiphertext {
            e1: encode(&self.E1)?,
            e2: encode(&self.E2)?,
            info: self.label.clone(),
            proof: self.proof.to_wire()?,
        })
    }
}

pub fn to_json<T: Serialize>(wire: &T) -> Result<String> {
    Ok(serde_json::to_string(wire)?)
}

/// Phase 1 of reading a wire object from JSON
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        encryption::TokenId,
        keys::keygen,
        setup::IssuerSetup,
        tests::test_serialization,
    };
    use ark_bls12_381::{Fr, G1Affine};
    use ark_ec::CurveGroup;
    use ark_secp256r1::Affine as P256Affine;
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        vec, UniformRand,
    };
    use blake2::Blake2b512;

    type Issuer = IssuerSetup<G1Affine, Blake2b512>;

    fn ciphertext(rng: &mut StdRng, issuer: &Issuer, label: Option<Vec<u8>>) -> Ciphertext<G1Affine> {
        let params = DomainParameters::new(issuer);
        let (_, pk) = keygen(rng, &params);
        let (x_b, o_b) = (Fr::rand(rng), Fr::rand(rng));
        let (g, g1) = params.commitment_bases();
        let commitment = (*g * x_b + *g1 * o_b).into_affine();
        Ciphertext::new(
            rng,
            &params,
            &pk,
            &TokenId::new(b"token".to_vec()).unwrap(),
            &commitment,
            &x_b,
            &o_b,
            label,
        )
        .unwrap()
    }

    #[test]
    fn wire_round_trips() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let issuer = Issuer::new(b"issuer-1", "BLS12-381 G1", b"test");
        let params = DomainParameters::new(&issuer);
        let (sk, pk) = keygen(&mut rng, &params);

        let wire_params = params.to_wire().unwrap();
        let json = to_json(&wire_params).unwrap();
        let bound: DomainParameters<G1Affine, Blake2b512> = from_json::<WireDomainParameters>(&json)
            .unwrap()
            .bind(&issuer)
            .unwrap();
        assert_eq!(bound, params);

        test_serialization!(PublicKey<G1Affine>, pk, WirePublicKey, &issuer);
        test_serialization!(PrivateKey<Fr>, sk, WirePrivateKey, &issuer);

        let ct = ciphertext(&mut rng, &issuer, Some(b"label".to_vec()));
        test_serialization!(Ciphertext<G1Affine>, ct, WireCiphertext, &issuer);
        let ct = ciphertext(&mut rng, &issuer, None);
        test_serialization!(Ciphertext<G1Affine>, ct, WireCiphertext, &issuer);
        let ct = ciphertext(&mut rng, &issuer, Some(vec![]));
        test_serialization!(Ciphertext<G1Affine>, ct, WireCiphertext, &issuer);
    }

    #[test]
    fn wire_field_names() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let issuer = Issuer::new(b"issuer-1", "BLS12-381 G1", b"test");

        let ct = ciphertext(&mut rng, &issuer, None);
        let json: serde_json::Value =
            serde_json::from_str(&to_json(&ct.to_wire().unwrap()).unwrap()).unwrap();
        for field in ["E1", "E2", "info", "proof"] {
            assert!(json.get(field).is_some(), "missing {}", field);
        }
        assert!(json["info"].is_null());
        for field in ["c", "rXb", "rR", "rOb"] {
            assert!(json["proof"].get(field).is_some(), "missing {}", field);
        }

        let ct = ciphertext(&mut rng, &issuer, Some(b"label".to_vec()));
        let json: serde_json::Value =
            serde_json::from_str(&to_json(&ct.to_wire().unwrap()).unwrap()).unwrap();
        assert_eq!(json["info"], "bGFiZWw=");

        let params = DomainParameters::new(&issuer);
        let json: serde_json::Value =
            serde_json::from_str(&to_json(&params.to_wire().unwrap()).unwrap()).unwrap();
        assert_eq!(json["uidp"], "aXNzdWVyLTE=");
        assert!(json.get("ge").is_some());
        let (_, pk) = keygen(&mut rng, &params);
        let json: serde_json::Value =
            serde_json::from_str(&to_json(&pk.to_wire().unwrap()).unwrap()).unwrap();
        assert!(json.get("H").is_some());
    }

    #[test]
    fn malformed_wire_objects() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let issuer = Issuer::new(b"issuer-1", "BLS12-381 G1", b"test");
        let ct = ciphertext(&mut rng, &issuer, None);
        let json = to_json(&ct.to_wire().unwrap()).unwrap();

        // Missing field
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value.as_object_mut().unwrap().remove("E1");
        assert!(matches!(
            from_json::<WireCiphertext>(&value.to_string()),
            Err(IdEscrowError::MalformedWireObject(_))
        ));
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["proof"].as_object_mut().unwrap().remove("rOb");
        assert!(matches!(
            from_json::<WireCiphertext>(&value.to_string()),
            Err(IdEscrowError::MalformedWireObject(_))
        ));

        // `info` must be present, `null` when there is no label
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["info"].is_null());
        value.as_object_mut().unwrap().remove("info");
        assert!(matches!(
            from_json::<WireCiphertext>(&value.to_string()),
            Err(IdEscrowError::MalformedWireObject(_))
        ));

        // Not base64
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["E2"] = serde_json::Value::String("not base64!".into());
        assert!(matches!(
            from_json::<WireCiphertext>(&value.to_string()),
            Err(IdEscrowError::MalformedWireObject(_))
        ));

        // Trailing bytes after a valid element
        let mut wire = ct.to_wire().unwrap();
        wire.e1.push(0);
        assert!(matches!(
            BindToIssuer::<G1Affine, Issuer>::bind(wire, &issuer),
            Err(IdEscrowError::TrailingBytes(1))
        ));

        // Truncated element
        let mut wire = ct.to_wire().unwrap();
        wire.proof.c.pop();
        assert!(matches!(
            BindToIssuer::<G1Affine, Issuer>::bind(wire, &issuer),
            Err(IdEscrowError::Serialization(_))
        ));

        // Point not on the curve
        let mut wire = ct.to_wire().unwrap();
        wire.e2 = vec![0x5a; wire.e2.len()];
        assert!(matches!(
            BindToIssuer::<G1Affine, Issuer>::bind(wire, &issuer),
            Err(IdEscrowError::Serialization(_))
        ));

        // Zero private key
        let wire = WirePrivateKey {
            x: encode(&Fr::from(0u64)).unwrap(),
        };
        assert!(matches!(
            BindToIssuer::<G1Affine, Issuer>::bind(wire, &issuer),
            Err(IdEscrowError::ZeroPrivateKey)
        ));
    }

    #[test]
    fn binding_to_wrong_issuer() {
        let issuer_1 = Issuer::new(b"issuer-1", "BLS12-381 G1", b"test");
        let issuer_2 = Issuer::new(b"issuer-2", "BLS12-381 G1", b"test");
        let wire = DomainParameters::new(&issuer_1).to_wire().unwrap();

        match BindToIssuer::<G1Affine, Issuer>::bind(wire.clone(), &issuer_2) {
            Err(IdEscrowError::UidMismatch { expected, found }) => {
                assert_eq!(expected, b"issuer-2".to_vec());
                assert_eq!(found, b"issuer-1".to_vec());
            }
            _ => panic!("binding to another issuer must fail"),
        }

        // Same UID but the generator is not the one of the issuer's group
        let mut wrong_generator = wire.clone();
        wrong_generator.ge = encode(&issuer_1.g1).unwrap();
        assert!(matches!(
            BindToIssuer::<G1Affine, Issuer>::bind(wrong_generator, &issuer_1),
            Err(IdEscrowError::UnexpectedEncryptionGenerator)
        ));

        // Same UID but an issuer over another group
        let p256_issuer =
            IssuerSetup::<P256Affine, Blake2b512>::new(b"issuer-1", "P-256", b"test");
        assert!(BindToIssuer::<P256Affine, _>::bind(wire.clone(), &p256_issuer).is_err());

        let bound: DomainParameters<G1Affine, Blake2b512> = wire.bind(&issuer_1).unwrap();
        assert!(bound.is_for_issuer(&issuer_1));
    }
}
