//! SKU generation from a product name.
//!
//! Formatting golden rules (ERP/marketplace integrations): only letters,
//! digits, dashes and underscores — no spaces, accents or symbols.
//!
//! Format: `TYPE-ABBR-COLOR-HEX`, e.g. `BR-PRZRC14-RH-3FA9C1`:
//! - `TYPE`: 2-letter product-type code detected from the name (`PR` generic);
//! - `ABBR`: abbreviation built from the remaining words;
//! - `COLOR`: 2-letter finish/color code (`SC` when none detected);
//! - `HEX`: 6 random uppercase hex chars (3 bytes).
//!
//! The hex suffix makes collisions unlikely but not impossible; uniqueness is
//! the persistence boundary's job (retry with a fresh SKU on conflict).

use comanda_core::{DomainError, DomainResult};
use rand::RngCore;

const RANDOM_HEX_BYTES: usize = 3;

const PRODUCT_TYPE_MAP: &[(&str, &str)] = &[
    ("BRINCO", "BR"),
    ("COLAR", "CL"),
    ("ANEL", "AN"),
    ("PULSEIRA", "PL"),
    ("CONJUNTO", "CJ"),
];

const PRODUCT_COLOR_MAP: &[(&str, &str)] = &[
    ("DOURADO", "DO"),
    ("OURO", "DO"),
    ("RODIO", "RH"),
    ("ROSE", "RO"),
];

const STOPWORDS: &[&str] = &["DE", "DA", "DO", "DAS", "DOS", "E", "COM", "PARA"];

/// Generates a SKU from a product name. Fails on empty/blank names.
pub fn generate_sku(product_name: &str) -> DomainResult<String> {
    let trimmed = product_name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(
            "product name is required to generate a SKU",
        ));
    }

    let normalized = normalize(trimmed);
    let words: Vec<&str> = normalized
        .split(|c: char| c == ' ' || c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .collect();

    let type_code = detect_product_type(&words).unwrap_or("PR");
    let color_code = detect_product_color(&words).unwrap_or("SC");
    let abbr = build_abbreviation(&words);
    let abbr = if abbr.is_empty() { "GEN".into() } else { abbr };
    let hex = random_hex();

    Ok(format!("{type_code}-{abbr}-{color_code}-{hex}"))
}

/// Uppercases and strips accents/cedillas/symbols, keeping only ASCII
/// letters, digits, whitespace, hyphen and underscore.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let ch = fold_accent(ch);
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            out.extend(ch.to_uppercase());
        } else if ch.is_whitespace() {
            out.push(' ');
        }
        // Anything else (symbols, emoji) is dropped.
    }
    out
}

/// Folds common Latin accented characters onto their base letter.
fn fold_accent(ch: char) -> char {
    match ch.to_lowercase().next().unwrap_or(ch) {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => fix_case(ch, 'a'),
        'é' | 'è' | 'ê' | 'ë' => fix_case(ch, 'e'),
        'í' | 'ì' | 'î' | 'ï' => fix_case(ch, 'i'),
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => fix_case(ch, 'o'),
        'ú' | 'ù' | 'û' | 'ü' => fix_case(ch, 'u'),
        'ç' => fix_case(ch, 'c'),
        'ñ' => fix_case(ch, 'n'),
        'ý' => fix_case(ch, 'y'),
        _ => ch,
    }
}

fn fix_case(original: char, base: char) -> char {
    if original.is_uppercase() {
        base.to_ascii_uppercase()
    } else {
        base
    }
}

fn detect_product_type(words: &[&str]) -> Option<&'static str> {
    words
        .iter()
        .find_map(|w| lookup(PRODUCT_TYPE_MAP, w))
}

fn detect_product_color(words: &[&str]) -> Option<&'static str> {
    for (i, w) in words.iter().enumerate() {
        // "RODIO NEGRO" is a distinct finish, not plain rhodium.
        if *w == "RODIO" && words.get(i + 1) == Some(&"NEGRO") {
            return Some("RN");
        }
        if let Some(code) = lookup(PRODUCT_COLOR_MAP, w) {
            return Some(code);
        }
    }
    None
}

fn lookup(map: &'static [(&str, &str)], word: &str) -> Option<&'static str> {
    map.iter().find(|(k, _)| *k == word).map(|(_, v)| *v)
}

fn is_type_word(word: &str) -> bool {
    lookup(PRODUCT_TYPE_MAP, word).is_some()
}

fn is_color_word(words: &[&str], idx: usize) -> bool {
    let w = words[idx];
    if w == "NEGRO" && idx > 0 && words[idx - 1] == "RODIO" {
        return true;
    }
    if w == "RODIO" && words.get(idx + 1) == Some(&"NEGRO") {
        return true;
    }
    lookup(PRODUCT_COLOR_MAP, w).is_some()
}

/// Builds the abbreviation segment: skips stopwords and the type/color words,
/// takes up to 3 letters plus any digits per word (`18K` contributes `K` and
/// `18`), and stops once 12 characters are collected.
fn build_abbreviation(words: &[&str]) -> String {
    let mut abbr = String::new();
    let mut i = 0;
    while i < words.len() {
        let w = words[i];
        if STOPWORDS.contains(&w) || is_type_word(w) {
            i += 1;
            continue;
        }
        if is_color_word(words, i) {
            // Consume "NEGRO" when it is the RODIO NEGRO pair.
            if w == "RODIO" && words.get(i + 1) == Some(&"NEGRO") {
                i += 1;
            }
            i += 1;
            continue;
        }

        let letters: String = w.chars().filter(char::is_ascii_alphabetic).take(3).collect();
        let digits: String = w.chars().filter(char::is_ascii_digit).collect();
        abbr.push_str(&letters);
        abbr.push_str(&digits);

        if abbr.len() >= 12 {
            break;
        }
        i += 1;
    }
    abbr
}

fn random_hex() -> String {
    let mut bytes = [0u8; RANDOM_HEX_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}
