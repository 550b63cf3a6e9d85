//! Block representation helpers.

/// AES block size in bytes.
pub const BLOCK_BYTES: usize = 16;

/// AES block of 16 bytes.
pub type Block = [u8; BLOCK_BYTES];

/// XORs two blocks, writing the result into `dst`.
#[inline]
pub fn xor_in_place(dst: &mut Block, rhs: &Block) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}

/// Returns the block with its byte order reversed.
#[inline]
pub fn reverse(block: &Block) -> Block {
    let mut out = *block;
    out.reverse();
    out
}
