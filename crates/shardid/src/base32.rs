//! Crockford base32 rendering for generated tokens.
//!
//! Tokens are fixed width and sort lexicographically in the same order as the
//! integers they encode. Only encoding is needed: tokens are opaque once they
//! are embedded in a composite ID.

const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const BITS_PER_CHAR: usize = 5;
const MASK: u16 = 0x1F;

/// Width of an encoded `u64`: `ceil(64 / 5)`.
pub const U64_CHARS: usize = 13;

/// Width of an encoded `u128`: `ceil(128 / 5)`.
pub const U128_CHARS: usize = 26;

/// Encodes big-endian `input` into `buf`, left-padding with zero bits so the
/// output fills `buf` exactly.
///
/// `buf.len() * 5` must be at least `input.len() * 8`.
fn encode_into(input: &[u8], buf: &mut [u8]) {
    let input_bits = input.len() * 8;
    let total_bits = buf.len() * BITS_PER_CHAR;
    debug_assert!(total_bits >= input_bits);

    let mut bits = total_bits - input_bits;
    let mut acc = 0_u16;
    let mut out = 0;
    for &b in input {
        acc = (acc << 8) | u16::from(b);
        bits += 8;
        while bits >= BITS_PER_CHAR {
            bits -= BITS_PER_CHAR;
            buf[out] = ALPHABET[((acc >> bits) & MASK) as usize];
            out += 1;
        }
    }
}

fn to_string(buf: &[u8]) -> String {
    // Every byte comes from `ALPHABET`, which is ASCII.
    buf.iter().map(|&b| char::from(b)).collect()
}

/// Encodes a `u64` as 13 Crockford base32 characters.
pub fn encode_u64(value: u64) -> String {
    let mut buf = [0_u8; U64_CHARS];
    encode_into(&value.to_be_bytes(), &mut buf);
    to_string(&buf)
}

/// Encodes a `u128` as 26 Crockford base32 characters.
pub fn encode_u128(value: u128) -> String {
    let mut buf = [0_u8; U128_CHARS];
    encode_into(&value.to_be_bytes(), &mut buf);
    to_string(&buf)
}
