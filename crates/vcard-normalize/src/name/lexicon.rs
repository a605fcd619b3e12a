//! Word lists used by the name heuristics.

use vcard_model::fold_key;

/// Common Spanish (and frequently seen English) given names, accent-free and
/// lowercase.
pub const GIVEN_NAMES: &[&str] = &[
    "jose", "maria", "juan", "carlos", "luis", "ana", "pedro", "francisco", "miguel", "antonio",
    "manuel", "jesus", "raul", "eduardo", "alberto", "jorge", "roberto", "ricardo", "fernando",
    "rafael", "andres", "diego", "daniel", "alejandro", "javier", "sergio", "pablo", "enrique",
    "ramon", "sofia", "isabel", "carmen", "rosa", "laura", "patricia", "monica", "andrea",
    "cristina", "elena", "teresa", "beatriz", "silvia", "marta", "valeria", "gabriela",
    "carolina", "paula", "adriana", "natalia", "alexander", "david", "victor", "william",
    "stephanie", "melissa", "jessica", "michael", "kevin", "steven", "jonathan", "christopher",
    "oscar", "gustavo", "esteban", "tatiana", "viviana",
];

/// Words that link or prefix compound surnames.
pub const SURNAME_PARTICLES: &[&str] = &[
    "de", "del", "la", "los", "las", "y", "von", "van", "di", "da", "dos", "angeles",
];

/// Honorifics recognized at the front of a name.
pub const TITLES: &[&str] = &[
    "mr", "mrs", "ms", "miss", "mx", "dr", "prof", "professor", "rev", "hon", "sir", "dame",
    "sr", "sra", "srta", "don", "dona", "lic", "licda", "ing", "arq", "msc",
];

/// Generational and professional suffixes recognized at the end of a name.
pub const SUFFIXES: &[&str] = &[
    "jr", "sr", "ii", "iii", "iv", "v", "phd", "md", "dds", "esq", "cpa", "mba",
];

/// Lowercased, accent-stripped form used for every lexicon lookup.
pub fn fold_word(word: &str) -> String {
    fold_key(word)
}

fn bare(word: &str) -> String {
    fold_word(word)
        .trim_matches(|ch: char| ch == '.' || ch == ',')
        .to_string()
}

pub fn is_given_name(word: &str) -> bool {
    GIVEN_NAMES.contains(&fold_word(word).as_str())
}

pub fn is_surname_particle(word: &str) -> bool {
    SURNAME_PARTICLES.contains(&fold_word(word).as_str())
}

pub fn is_title(word: &str) -> bool {
    TITLES.contains(&bare(word).replace('.', "").as_str())
}

pub fn is_suffix(word: &str) -> bool {
    SUFFIXES.contains(&bare(word).replace('.', "").as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_case_and_accents() {
        assert!(is_given_name("MARÍA"));
        assert!(is_given_name("Jesús"));
        assert!(!is_given_name("Fernanda"));
        assert!(is_surname_particle("DEL"));
        assert!(is_surname_particle("Ángeles"));
    }

    #[test]
    fn titles_and_suffixes_ignore_punctuation() {
        assert!(is_title("Dr."));
        assert!(is_title("Doña"));
        assert!(is_suffix("Jr.,"));
        assert!(is_suffix("Ph.D."));
        assert!(!is_title("Smith"));
    }
}
