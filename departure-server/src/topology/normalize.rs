//! Stop name normalization for fuzzy lookup.

use deunicode::deunicode_char;

/// Normalize a stop name for index and query use.
///
/// Lowercases, transliterates diacritics to ASCII, maps punctuation to
/// spaces, and collapses whitespace runs. The same function is applied when
/// building the registry's name index and when querying it, so the two
/// sides can never disagree.
///
/// # Examples
///
/// ```
/// use departure_server::topology::normalize_name;
///
/// assert_eq!(normalize_name("Gare de l'Est"), "gare de l est");
/// assert_eq!(normalize_name("  Hôtel-de-Ville "), "hotel de ville");
/// ```
pub fn normalize_name(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for c in input.chars() {
        match deunicode_char(c) {
            Some(ascii) => {
                for a in ascii.chars() {
                    if a.is_ascii_alphanumeric() {
                        out.extend(a.to_lowercase());
                    } else {
                        out.push(' ');
                    }
                }
            }
            None => out.push(' '),
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases() {
        assert_eq!(normalize_name("REPUBLIQUE"), "republique");
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(normalize_name("République"), "republique");
        assert_eq!(normalize_name("Égalité"), "egalite");
        assert_eq!(normalize_name("Müllerstraße"), "mullerstrasse");
    }

    #[test]
    fn punctuation_becomes_space() {
        assert_eq!(normalize_name("Gare de l'Est"), "gare de l est");
        assert_eq!(normalize_name("Hôtel-de-Ville"), "hotel de ville");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize_name("  Place   des  Fêtes  "), "place des fetes");
    }

    #[test]
    fn empty_input() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
        assert_eq!(normalize_name("--'--"), "");
    }

    #[test]
    fn idempotent() {
        let once = normalize_name("Gare de l'Est");
        assert_eq!(normalize_name(&once), once);
    }
}
