//! OS randomness for salts, nonces and key material.

use rand::rngs::OsRng;
use rand::RngCore;

use sovc_core::to_hex;

pub(crate) fn random_bytes<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// `N` random bytes, hex encoded (`2 * N` chars).
pub(crate) fn random_hex<const N: usize>() -> String {
    to_hex(&random_bytes::<N>())
}
