// SPDX-License-Identifier: Apache-2.0

/// ASCII fallback for the accented characters that actually show up in art
/// names; everything else outside the allow-list is dropped.
fn strip_diacritic(c: char) -> Option<char> {
    const TABLE: &[(char, char)] = &[
        ('á', 'a'), ('à', 'a'), ('â', 'a'), ('ã', 'a'), ('ä', 'a'),
        ('é', 'e'), ('è', 'e'), ('ê', 'e'), ('ë', 'e'),
        ('í', 'i'), ('ì', 'i'), ('î', 'i'), ('ï', 'i'),
        ('ó', 'o'), ('ò', 'o'), ('ô', 'o'), ('õ', 'o'), ('ö', 'o'),
        ('ú', 'u'), ('ù', 'u'), ('û', 'u'), ('ü', 'u'),
        ('ç', 'c'), ('ñ', 'n'),
        ('Á', 'A'), ('À', 'A'), ('Â', 'A'), ('Ã', 'A'), ('Ä', 'A'),
        ('É', 'E'), ('È', 'E'), ('Ê', 'E'), ('Ë', 'E'),
        ('Í', 'I'), ('Ì', 'I'), ('Î', 'I'), ('Ï', 'I'),
        ('Ó', 'O'), ('Ò', 'O'), ('Ô', 'O'), ('Õ', 'O'), ('Ö', 'O'),
        ('Ú', 'U'), ('Ù', 'U'), ('Û', 'U'), ('Ü', 'U'),
        ('Ç', 'C'), ('Ñ', 'N'),
    ];
    TABLE.iter().find(|(from, _)| *from == c).map(|(_, to)| *to)
}

/// Makes a storage-safe file name: diacritics transliterated, characters
/// outside `[A-Za-z0-9.\-_ ]` removed, runs of whitespace collapsed to one
/// space, ends trimmed.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;
    for c in name.chars() {
        let c = strip_diacritic(c).unwrap_or(c);
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
        // Anything else is silently dropped.
    }
    out
}
