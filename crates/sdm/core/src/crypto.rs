//! AES-128 building blocks shared by key derivation and both MAC primitives
//!
//! Everything here operates on raw 16-byte arrays so callers can wipe their
//! intermediates with `zeroize`.

use aes::Aes128;
use cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray};
use cmac::{Cmac, Mac};

use crate::constants::{BLOCK_SIZE, SDMMAC_LENGTH};
use crate::types::KeyBytes;

/// A single AES block
pub type Block = [u8; BLOCK_SIZE];

/// Encrypt one block with AES-128 in ECB mode
///
/// # Arguments
///
/// * `key` - The AES key (16 bytes)
/// * `block` - The plaintext block (16 bytes)
///
/// # Returns
///
/// The ciphertext block (16 bytes)
pub(crate) fn encrypt_block(key: &KeyBytes, block: &Block) -> Block {
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut out = GenericArray::clone_from_slice(block);
    cipher.encrypt_block(&mut out);
    out.into()
}

/// Calculate the full AES-CMAC (NIST SP 800-38B) of `data`
pub(crate) fn aes_cmac(key: &KeyBytes, data: &[u8]) -> Block {
    let mut mac = <Cmac<Aes128> as Mac>::new(GenericArray::from_slice(key));
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Truncate a full MAC to the 8 bytes mirrored by the tag.
///
/// NTAG 424 keeps the bytes at odd positions 1, 3, ..., 15.
pub(crate) fn truncate_mac(full: &Block) -> [u8; SDMMAC_LENGTH] {
    core::array::from_fn(|i| full[2 * i + 1])
}

/// Multiply by x in GF(2^128), the CMAC subkey step
pub(crate) fn gf128_double(block: &Block) -> Block {
    let value = u128::from_be_bytes(*block);
    let carry = if value >> 127 == 1 { 0x87 } else { 0 };
    ((value << 1) ^ carry).to_be_bytes()
}

/// XOR `rhs` into `lhs`
pub(crate) fn xor_in_place(lhs: &mut Block, rhs: &[u8]) {
    for (a, b) in lhs.iter_mut().zip(rhs.iter()) {
        *a ^= *b;
    }
}
