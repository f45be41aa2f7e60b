//! GTIN-13 (EAN-13) barcode generation and validation.

use rand::Rng;

/// Internal-use GS1 prefix (200-299 range is reserved for in-store codes).
const INTERNAL_PREFIX: &str = "200";

/// Generates a 13-digit GTIN: `200` prefix + 9 random digits + check digit.
///
/// Uniqueness is **not** guaranteed; callers must verify against existing
/// catalog entries and retry on collision.
pub fn generate_gtin13() -> String {
    let mut rng = rand::thread_rng();
    let mut base = String::with_capacity(13);
    base.push_str(INTERNAL_PREFIX);
    for _ in 0..9 {
        base.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
    let check = check_digit(base.as_bytes());
    base.push(char::from(b'0' + check));
    base
}

/// Returns true for a 13-digit numeric string whose last digit satisfies the
/// EAN-13 weighted-sum equation.
pub fn is_valid_gtin13(code: &str) -> bool {
    let bytes = code.as_bytes();
    if bytes.len() != 13 || !bytes.iter().all(|b| b.is_ascii_digit()) {
        return false;
    }
    bytes[12] - b'0' == check_digit(&bytes[..12])
}

/// EAN-13 check digit over 12 ASCII digits: alternating weights 1/3,
/// check = (10 - sum mod 10) mod 10.
fn check_digit(base12: &[u8]) -> u8 {
    debug_assert_eq!(base12.len(), 12);
    let sum: u32 = base12
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 0 { d } else { 3 * d }
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}
