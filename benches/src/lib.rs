//! Benchmarks live in `benches/`
