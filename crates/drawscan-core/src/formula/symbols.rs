//! Symbol names and the characters they stand for.

use std::collections::HashMap;

use lazy_static::lazy_static;

use super::Script;

/// `\name` sequences and their symbols, upper case first.
pub const SYMBOL_LIBRARY: [(&str, char); 48] = [
    (r"\Alpha", 'Α'),
    (r"\Beta", 'Β'),
    (r"\Gamma", 'Γ'),
    (r"\Delta", 'Δ'),
    (r"\Epsilon", 'Ε'),
    (r"\Zeta", 'Ζ'),
    (r"\Eta", 'Η'),
    (r"\Theta", 'Θ'),
    (r"\Iota", 'Ι'),
    (r"\Kappa", 'Κ'),
    (r"\Lambda", 'Λ'),
    (r"\Mu", 'Μ'),
    (r"\Nu", 'Ν'),
    (r"\Xi", 'Ξ'),
    (r"\Omicron", 'Ο'),
    (r"\Pi", 'Π'),
    (r"\Rho", 'Ρ'),
    (r"\Sigma", 'Σ'),
    (r"\Tau", 'Τ'),
    (r"\Upsilon", 'Υ'),
    (r"\Phi", 'Φ'),
    (r"\Chi", 'Χ'),
    (r"\Psi", 'Ψ'),
    (r"\Omega", 'Ω'),
    (r"\alpha", 'α'),
    (r"\beta", 'β'),
    (r"\gamma", 'γ'),
    (r"\delta", 'δ'),
    (r"\epsilon", 'ε'),
    (r"\zeta", 'ζ'),
    (r"\eta", 'η'),
    (r"\theta", 'θ'),
    (r"\iota", 'ι'),
    (r"\kappa", 'κ'),
    (r"\lambda", 'λ'),
    (r"\mu", 'μ'),
    (r"\nu", 'ν'),
    (r"\xi", 'ξ'),
    (r"\omicron", 'ο'),
    (r"\pi", 'π'),
    (r"\rho", 'ρ'),
    (r"\sigma", 'σ'),
    (r"\tau", 'τ'),
    (r"\upsilon", 'υ'),
    (r"\phi", 'φ'),
    (r"\chi", 'χ'),
    (r"\psi", 'ψ'),
    (r"\omega", 'ω'),
];

lazy_static! {
    static ref SYMBOL_NAMES: HashMap<char, &'static str> =
        SYMBOL_LIBRARY.iter().map(|(name, symbol)| (*symbol, *name)).collect();

    static ref FROM_SUPERSCRIPT: HashMap<char, char> = script_bases()
        .filter_map(|base| superscript(base).map(|sup| (sup, base)))
        .collect();

    static ref FROM_SUBSCRIPT: HashMap<char, char> = script_bases()
        .filter_map(|base| subscript(base).map(|sub| (sub, base)))
        .collect();
}

fn script_bases() -> impl Iterator<Item = char> {
    ('0'..='9')
        .chain('a'..='z')
        .chain('A'..='Z')
        .chain("+-=()βγδθρφχ".chars())
}

/// The `\name` for a symbol in the library.
pub fn symbol_name(symbol: char) -> Option<&'static str> {
    SYMBOL_NAMES.get(&symbol).copied()
}

/// The character a Unicode superscript or subscript stands for, and its script.
pub fn from_script(ch: char) -> Option<(char, Script)> {
    FROM_SUPERSCRIPT
        .get(&ch)
        .map(|base| (*base, Script::Superscript))
        .or_else(|| FROM_SUBSCRIPT.get(&ch).map(|base| (*base, Script::Subscript)))
}

/// Unicode superscript form of a character, if there is one.
pub fn superscript(ch: char) -> Option<char> {
    let sup = match ch {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' | '−' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        'a' => 'ᵃ',
        'b' => 'ᵇ',
        'c' => 'ᶜ',
        'd' => 'ᵈ',
        'e' => 'ᵉ',
        'f' => 'ᶠ',
        'g' => 'ᵍ',
        'h' => 'ʰ',
        'i' => 'ⁱ',
        'j' => 'ʲ',
        'k' => 'ᵏ',
        'l' => 'ˡ',
        'm' => 'ᵐ',
        'n' => 'ⁿ',
        'o' => 'ᵒ',
        'p' => 'ᵖ',
        'r' => 'ʳ',
        's' => 'ˢ',
        't' => 'ᵗ',
        'u' => 'ᵘ',
        'v' => 'ᵛ',
        'w' => 'ʷ',
        'x' => 'ˣ',
        'y' => 'ʸ',
        'z' => 'ᶻ',
        'A' => 'ᴬ',
        'B' => 'ᴮ',
        'D' => 'ᴰ',
        'E' => 'ᴱ',
        'G' => 'ᴳ',
        'H' => 'ᴴ',
        'I' => 'ᴵ',
        'J' => 'ᴶ',
        'K' => 'ᴷ',
        'L' => 'ᴸ',
        'M' => 'ᴹ',
        'N' => 'ᴺ',
        'O' => 'ᴼ',
        'P' => 'ᴾ',
        'R' => 'ᴿ',
        'T' => 'ᵀ',
        'U' => 'ᵁ',
        'W' => 'ᵂ',
        'β' => 'ᵝ',
        'γ' => 'ᵞ',
        'δ' => 'ᵟ',
        'θ' => 'ᶿ',
        'φ' => 'ᵠ',
        'χ' => 'ᵡ',
        _ => return None,
    };
    Some(sup)
}

/// Unicode subscript form of a character, if there is one.
pub fn subscript(ch: char) -> Option<char> {
    let sub = match ch {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' | '−' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        'a' => 'ₐ',
        'e' => 'ₑ',
        'h' => 'ₕ',
        'i' => 'ᵢ',
        'j' => 'ⱼ',
        'k' => 'ₖ',
        'l' => 'ₗ',
        'm' => 'ₘ',
        'n' => 'ₙ',
        'o' => 'ₒ',
        'p' => 'ₚ',
        'r' => 'ᵣ',
        's' => 'ₛ',
        't' => 'ₜ',
        'u' => 'ᵤ',
        'v' => 'ᵥ',
        'x' => 'ₓ',
        'β' => 'ᵦ',
        'γ' => 'ᵧ',
        'ρ' => 'ᵨ',
        'φ' => 'ᵩ',
        'χ' => 'ᵪ',
        _ => return None,
    };
    Some(sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_names_are_unique() {
        let mut names: Vec<&str> = SYMBOL_LIBRARY.iter().map(|(n, _)| *n).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SYMBOL_LIBRARY.len());
        assert_eq!(SYMBOL_NAMES.len(), SYMBOL_LIBRARY.len());
    }

    #[test]
    fn test_symbol_name_lookup() {
        assert_eq!(symbol_name('π'), Some(r"\pi"));
        assert_eq!(symbol_name('Ω'), Some(r"\Omega"));
        assert_eq!(symbol_name('x'), None);
    }

    #[test]
    fn test_script_forms() {
        assert_eq!(superscript('2'), Some('²'));
        assert_eq!(subscript('2'), Some('₂'));
        assert_eq!(subscript('q'), None);
        assert_eq!(from_script('²'), Some(('2', Script::Superscript)));
        assert_eq!(from_script('ₓ'), Some(('x', Script::Subscript)));
        assert_eq!(from_script('x'), None);
    }
}
