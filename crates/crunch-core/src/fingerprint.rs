//! Content+options fingerprint used to gate incremental builds.
//!
//! Uses FNV-1a 64-bit, a portable, well-defined hash, so `.hash` files are
//! reproducible across hosts and don't depend on an external crate for
//! ~10 lines of arithmetic.

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a 64-bit hash of a byte slice.
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Rolling fingerprint combinator: folds one contributor's hash into the
/// running value.
///
/// `h <- h XOR (H(v) + 0x9E3779B9 + (h << 6) + (h >> 2))`, using wrapping
/// arithmetic throughout so overflow never panics.
fn fold(running: u64, contributor_hash: u64) -> u64 {
    let mixed = contributor_hash
        .wrapping_add(0x9E37_79B9)
        .wrapping_add(running << 6)
        .wrapping_add(running >> 2);
    running ^ mixed
}

/// Computes the fingerprint over CLI argument tokens followed by every
/// discovered input file's raw bytes, in that order.
pub fn compute(args: &[String], file_contents: &[Vec<u8>]) -> u64 {
    let mut h = 0u64;
    for arg in args {
        h = fold(h, fnv1a64(arg.as_bytes()));
    }
    for contents in file_contents {
        h = fold(h, fnv1a64(contents));
    }
    h
}
