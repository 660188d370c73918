use crate::{error::IdEscrowError, Result};
use ark_ec::AffineRepr;

/// Fails unless `element` is on the curve and in the prime order subgroup
pub(crate) fn validate_group_element<G: AffineRepr>(element: &G) -> Result<()> {
    element
        .check()
        .map_err(|_| IdEscrowError::InvalidGroupElement)
}
