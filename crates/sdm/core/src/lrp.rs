//! Leakage Resilient Primitive (NXP AN12304)
//!
//! LRP wraps AES-128 so that every evaluation walks a chain of keys selected
//! nibble by nibble from a small set of precomputed plaintexts. The master
//! key itself is never used to process attacker-influenced data.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::lrp::{DRAW, PLAINTEXT_COUNT, STEP, UPDATED_KEY_COUNT};
use crate::crypto::{Block, encrypt_block, gf128_double, xor_in_place};
use crate::types::KeyBytes;

/// LRP instance bound to one key and one updated key index
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Lrp {
    plaintexts: [Block; PLAINTEXT_COUNT],
    updated_key: Block,
}

impl Lrp {
    /// Create an LRP instance using updated key 0, as SDM does
    pub fn new(key: &KeyBytes) -> Self {
        Self {
            plaintexts: generate_plaintexts(key),
            updated_key: generate_updated_key(key, 0),
        }
    }

    /// Create an LRP instance using the updated key at `index`
    ///
    /// Returns `None` if `index` is not below the number of updated keys.
    pub fn with_updated_key(key: &KeyBytes, index: usize) -> Option<Self> {
        (index < UPDATED_KEY_COUNT).then(|| Self {
            plaintexts: generate_plaintexts(key),
            updated_key: generate_updated_key(key, index),
        })
    }

    /// Evaluate LRP on `input`, processing it one nibble at a time (high nibble first)
    ///
    /// With `finalize` set, the result is encrypted once more over the zero block.
    pub fn eval(&self, input: &[u8], finalize: bool) -> Block {
        let mut y = self.updated_key;
        for nibble in input.iter().flat_map(|b| [b >> 4, b & 0x0F]) {
            y = encrypt_block(&y, &self.plaintexts[usize::from(nibble)]);
        }
        if finalize {
            y = encrypt_block(&y, &Block::default());
        }
        y
    }

    /// Calculate the LRP-CMAC of `data`
    ///
    /// This is the CMAC mode of NIST SP 800-38B with the finalized LRP
    /// evaluation taking the place of the block cipher.
    pub fn cmac(&self, data: &[u8]) -> Block {
        let mut k1 = gf128_double(&self.eval(&Block::default(), true));
        let mut k2 = gf128_double(&k1);

        // Last block is the final 1..=16 bytes, or empty for empty input
        let split = data.len().saturating_sub(1) / 16 * 16;
        let (head, last) = data.split_at(split);

        let mut y = Block::default();
        for chunk in head.chunks_exact(16) {
            xor_in_place(&mut y, chunk);
            y = self.eval(&y, true);
        }

        if last.len() == 16 {
            xor_in_place(&mut y, last);
            xor_in_place(&mut y, &k1);
        } else {
            let mut padded = Block::default();
            padded[..last.len()].copy_from_slice(last);
            padded[last.len()] = 0x80;
            xor_in_place(&mut y, &padded);
            xor_in_place(&mut y, &k2);
        }

        k1.zeroize();
        k2.zeroize();

        self.eval(&y, true)
    }
}

impl core::fmt::Debug for Lrp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Lrp(..)")
    }
}

/// Generate the 16 plaintexts p_0..p_15 from the key
fn generate_plaintexts(key: &KeyBytes) -> [Block; PLAINTEXT_COUNT] {
    let mut h = encrypt_block(key, &STEP);
    let plaintexts = core::array::from_fn(|_| {
        let p = encrypt_block(&h, &DRAW);
        h = encrypt_block(&h, &STEP);
        p
    });
    h.zeroize();
    plaintexts
}

/// Generate the updated key at `index` from the key
fn generate_updated_key(key: &KeyBytes, index: usize) -> Block {
    let mut h = encrypt_block(key, &DRAW);
    for _ in 0..index {
        h = encrypt_block(&h, &STEP);
    }
    let updated = encrypt_block(&h, &DRAW);
    h.zeroize();
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const KEY: KeyBytes = hex!("567826B8DA8E768432A9548DBE4AA3A0");

    #[test]
    fn test_generate_plaintexts() {
        let p = generate_plaintexts(&KEY);
        assert_eq!(p[0], hex!("AC20D39F5341FE98DFCA21DA86BA7914"));
        assert_eq!(p[15], hex!("71B444AF257A93215311D758DD333247"));
    }

    #[test]
    fn test_generate_updated_keys() {
        assert_eq!(
            generate_updated_key(&KEY, 0),
            hex!("163D14ED24ED935373568EC521E96CF4")
        );
        assert_eq!(
            generate_updated_key(&KEY, 1),
            hex!("1C519C000208B95A39A65DB058327188")
        );
        assert_eq!(
            generate_updated_key(&KEY, 2),
            hex!("FE30AB50467E61783BFE6B5E0560160E")
        );
        assert_eq!(
            generate_updated_key(&KEY, 3),
            hex!("1D5C31D1632B6F2B2D5FA66C436913A5")
        );
    }

    #[test]
    fn test_eval() {
        let lrp = Lrp::with_updated_key(&KEY, 2).unwrap();
        assert_eq!(
            lrp.eval(&hex!("1359"), true),
            hex!("1BA2C0C578996BC497DD181C6885A9DD")
        );
    }

    #[test]
    fn test_updated_key_index_bounds() {
        assert!(Lrp::with_updated_key(&KEY, 3).is_some());
        assert!(Lrp::with_updated_key(&KEY, 4).is_none());
    }

    #[test]
    fn test_cmac() {
        let lrp = Lrp::new(&hex!("8195088CE6C393708EBBE6C7914ECB0B"));
        assert_eq!(
            lrp.cmac(&hex!("BBD5B85772C7")),
            hex!("AD8595E0B49C5C0DB18E77355F5AAFF6")
        );
    }

    #[test]
    fn test_cmac_block_boundaries() {
        let lrp = Lrp::new(&hex!("8195088CE6C393708EBBE6C7914ECB0B"));
        let data: [u8; 32] = core::array::from_fn(|i| i as u8);

        assert_eq!(
            lrp.cmac(&data[..16]),
            hex!("1050B16ADDC6BD30F8C1E38E927E69BA")
        );
        assert_eq!(
            lrp.cmac(&data[..20]),
            hex!("7ABD295F41082CCC247F4412EEA9A7EC")
        );
        assert_eq!(lrp.cmac(&data), hex!("739173ED5BCB86CDD5930F9CDF5AE2B8"));
    }
}
