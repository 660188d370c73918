use ark_bls12_381::{Fr, G1Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_std::{
    rand::{rngs::StdRng, SeedableRng},
    UniformRand,
};
use blake2::Blake2b512;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use identity_escrow::{
    keygen, verify_many, Ciphertext, DomainParameters, IssuerParameters, IssuerSetup, TokenId,
};

macro_rules! bench_escrow {
    ($group_affine:ty, $group_name:expr, $c: ident) => {
        let mut rng = StdRng::seed_from_u64(0u64);
        let issuer =
            IssuerSetup::<$group_affine, Blake2b512>::new(b"issuer", $group_name, b"bench");
        let params = DomainParameters::new(&issuer);
        let (sk, pk) = keygen(&mut rng, &params);
        let (g, g1) = issuer.commitment_bases();
        let x_b = <$group_affine as AffineRepr>::ScalarField::rand(&mut rng);
        let o_b = <$group_affine as AffineRepr>::ScalarField::rand(&mut rng);
        let commitment = (g * x_b + g1 * o_b).into_affine();
        let token_id = TokenId::new(b"token".to_vec()).unwrap();

        $c.bench_function(&format!("Encrypt - {}", $group_name), |b| {
            b.iter(|| {
                Ciphertext::new(
                    &mut rng,
                    &params,
                    black_box(&pk),
                    black_box(&token_id),
                    black_box(&commitment),
                    black_box(&x_b),
                    black_box(&o_b),
                    None,
                )
                .unwrap()
            })
        });

        let ct = Ciphertext::new(
            &mut rng,
            &params,
            &pk,
            &token_id,
            &commitment,
            &x_b,
            &o_b,
            None,
        )
        .unwrap();

        $c.bench_function(&format!("Verify - {}", $group_name), |b| {
            b.iter(|| {
                ct.verify(
                    &params,
                    black_box(&token_id),
                    black_box(&pk),
                    black_box(&commitment),
                )
            })
        });

        let verified = ct
            .into_verified(&params, &token_id, &pk, &commitment)
            .unwrap();
        $c.bench_function(&format!("Decrypt - {}", $group_name), |b| {
            b.iter(|| sk.decrypt(black_box(&verified)))
        });
    };
}

fn escrow_benchmark(c: &mut Criterion) {
    bench_escrow!(G1Affine, "BLS12-381 G1", c);
    bench_escrow!(ark_secp256r1::Affine, "P-256", c);
}

fn verify_many_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    let issuer = IssuerSetup::<G1Affine, Blake2b512>::new(b"issuer", "BLS12-381 G1", b"bench");
    let params = DomainParameters::new(&issuer);
    let (_, pk) = keygen(&mut rng, &params);
    let (g, g1) = issuer.commitment_bases();

    let counts = [1, 4, 16, 64];
    let mut group = c.benchmark_group("Verify many");
    for count in counts {
        let mut cts = vec![];
        let mut token_ids = vec![];
        let mut commitments = vec![];
        for i in 0..count {
            let (x_b, o_b) = (Fr::rand(&mut rng), Fr::rand(&mut rng));
            let commitment = (g * x_b + g1 * o_b).into_affine();
            let token_id = TokenId::new((i as u32).to_le_bytes().to_vec()).unwrap();
            cts.push(
                Ciphertext::new(
                    &mut rng,
                    &params,
                    &pk,
                    &token_id,
                    &commitment,
                    &x_b,
                    &o_b,
                    None,
                )
                .unwrap(),
            );
            token_ids.push(token_id);
            commitments.push(commitment);
        }
        let items = (0..count)
            .map(|i| (&cts[i], &token_ids[i], &commitments[i]))
            .collect::<Vec<_>>();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{} ciphertexts", count)),
            &items,
            |b, items| b.iter(|| verify_many(&params, black_box(&pk), black_box(items))),
        );
    }
    group.finish();
}

criterion_group!(benches, escrow_benchmark, verify_many_benchmark);
criterion_main!(benches);
