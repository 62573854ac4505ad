//! Fuzzy title/artist matching and duration closeness.
//!
//! All comparisons operate on normalized text: lowercase, with everything
//! except letters, digits and CJK ideographs removed. Distances are counted
//! in Unicode scalar values, never bytes.

use unicode_general_category::{get_general_category, GeneralCategory};

/// Weight of the title in the combined score. The artist gets the rest.
const NAME_WEIGHT: f64 = 0.7;
const ARTIST_WEIGHT: f64 = 0.3;

/// Durations within this many seconds always match.
const DURATION_SLACK_SECS: i64 = 10;

/// Relative drift allowed for long tracks.
const DURATION_TOLERANCE: f64 = 0.15;

/// Lowercase and keep only letters, digits and CJK ideographs.
///
/// Letters are general category `L*`. Combining vowel signs and other marks
/// that merely carry the Alphabetic property are dropped.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|&c| is_letter(c) || c.is_numeric())
        .collect()
}

fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// Classic Levenshtein distance over chars with unit costs.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j + 1] + 1).min(cur[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[b.len()]
}

/// Similarity of two normalized strings in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let max_len = a.chars().count().max(b.chars().count());
    let distance = edit_distance(a, b);
    if distance >= max_len {
        return 0.0;
    }
    1.0 - distance as f64 / max_len as f64
}

/// Score a candidate against a reference title and artist.
///
/// Zero when either title normalizes to nothing. When either artist is
/// missing the title similarity stands alone.
pub fn combined_score(name: &str, artist: &str, cand_name: &str, cand_artist: &str) -> f64 {
    let name_a = normalize(name);
    let name_b = normalize(cand_name);
    if name_a.is_empty() || name_b.is_empty() {
        return 0.0;
    }
    let name_sim = similarity(&name_a, &name_b);

    let artist_a = normalize(artist);
    let artist_b = normalize(cand_artist);
    if artist_a.is_empty() || artist_b.is_empty() {
        return name_sim;
    }

    NAME_WEIGHT.mul_add(name_sim, ARTIST_WEIGHT * similarity(&artist_a, &artist_b))
}

/// Whether a candidate duration `b` is close enough to the reference `a`.
///
/// Unknown durations (`<= 0`) never disqualify.
pub fn duration_close(a: i64, b: i64) -> bool {
    if a <= 0 || b <= 0 {
        return true;
    }

    let diff = (a - b).abs();
    if diff <= DURATION_SLACK_SECS {
        return true;
    }

    let tolerance = ((a as f64 * DURATION_TOLERANCE) as i64).max(DURATION_SLACK_SECS);
    diff <= tolerance
}
