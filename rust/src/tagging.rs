//! Maximum-likelihood role tagging (Viterbi decoding).
//!
//! Independent of device selection. Transition probabilities are keyed by the
//! previous role, with [`START`] as the role before the first word and
//! [`END`] as the role after the last one. Emission probabilities are keyed by
//! word, then role.

use std::collections::HashMap;

pub const START: &str = "Start";
pub const END: &str = "End";

/// `transitions[from][to]`
pub type TransitionTable = HashMap<String, HashMap<String, f64>>;
/// `emissions[word][role]`
pub type EmissionTable = HashMap<String, HashMap<String, f64>>;

/// Error types for tagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggingError {
    /// Words were given but no roles to assign.
    NoRoles,
    MissingTransition { from: String, to: String },
    MissingEmission { word: String, role: String },
}

impl std::fmt::Display for TaggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoRoles => write!(f, "No roles to assign"),
            Self::MissingTransition { from, to } => {
                write!(f, "Missing transition probability {} -> {}", from, to)
            }
            Self::MissingEmission { word, role } => {
                write!(f, "Missing emission probability for {:?} as {}", word, role)
            }
        }
    }
}

impl std::error::Error for TaggingError {}

fn transition(table: &TransitionTable, from: &str, to: &str) -> Result<f64, TaggingError> {
    table
        .get(from)
        .and_then(|row| row.get(to))
        .copied()
        .ok_or_else(|| TaggingError::MissingTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
}

fn emission(table: &EmissionTable, word: &str, role: &str) -> Result<f64, TaggingError> {
    table
        .get(word)
        .and_then(|row| row.get(role))
        .copied()
        .ok_or_else(|| TaggingError::MissingEmission {
            word: word.to_string(),
            role: role.to_string(),
        })
}

/// Index and score of the best candidate; ties keep the first, and a NaN
/// score never replaces the current best.
fn best(
    candidates: impl Iterator<Item = Result<f64, TaggingError>>,
) -> Result<(usize, f64), TaggingError> {
    let mut best: Option<(usize, f64)> = None;
    for (index, score) in candidates.enumerate() {
        let score = score?;
        match best {
            Some((_, top)) if score > top => best = Some((index, score)),
            Some(_) => {}
            None => best = Some((index, score)),
        }
    }
    best.ok_or(TaggingError::NoRoles)
}

/// Most likely role sequence for `words`, one role per word.
pub fn viterbi(
    roles: &[String],
    words: &[String],
    transitions: &TransitionTable,
    emissions: &EmissionTable,
) -> Result<Vec<String>, TaggingError> {
    let Some(first) = words.first() else {
        return Ok(Vec::new());
    };
    if roles.is_empty() {
        return Err(TaggingError::NoRoles);
    }

    let r = roles.len();
    // trellis[j][i]: best probability of any path ending in roles[i] at word j
    let mut trellis: Vec<Vec<f64>> = Vec::with_capacity(words.len());
    let mut backpointers: Vec<Vec<usize>> = Vec::with_capacity(words.len());

    let mut column = Vec::with_capacity(r);
    for role in roles {
        column.push(transition(transitions, START, role)? * emission(emissions, first, role)?);
    }
    trellis.push(column);
    backpointers.push(vec![0; r]);

    for (j, word) in words.iter().enumerate().skip(1) {
        let previous = &trellis[j - 1];
        let mut column = Vec::with_capacity(r);
        let mut pointers = Vec::with_capacity(r);
        for role in roles {
            let emit = emission(emissions, word, role)?;
            let (from, score) = best(
                roles
                    .iter()
                    .zip(previous)
                    .map(|(prior, &p)| -> Result<f64, TaggingError> {
                        Ok(p * transition(transitions, prior, role)? * emit)
                    }),
            )?;
            column.push(score);
            pointers.push(from);
        }
        trellis.push(column);
        backpointers.push(pointers);
    }

    let last = &trellis[words.len() - 1];
    let (mut state, _) = best(
        roles
            .iter()
            .zip(last)
            .map(|(role, &p)| -> Result<f64, TaggingError> {
                Ok(p * transition(transitions, role, END)?)
            }),
    )?;

    let mut path = vec![String::new(); words.len()];
    for j in (0..words.len()).rev() {
        path[j] = roles[state].clone();
        state = backpointers[j][state];
    }
    Ok(path)
}

/// Map each word to its most likely role.
///
/// A word occurring more than once keeps the role of its last occurrence.
pub fn tag(
    roles: &[String],
    words: &[String],
    transitions: &TransitionTable,
    emissions: &EmissionTable,
) -> Result<HashMap<String, String>, TaggingError> {
    let path = viterbi(roles, words, transitions, emissions)?;
    Ok(words.iter().cloned().zip(path).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn table(rows: &[(&str, &[(&str, f64)])]) -> HashMap<String, HashMap<String, f64>> {
        rows.iter()
            .map(|(key, row)| {
                (
                    key.to_string(),
                    row.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
                )
            })
            .collect()
    }

    /// Classic healthy/fever model with an explicit end transition.
    fn weather_model() -> (Vec<String>, TransitionTable, EmissionTable) {
        let roles = strings(&["Healthy", "Fever"]);
        let transitions = table(&[
            ("Start", &[("Healthy", 0.6), ("Fever", 0.4)]),
            ("Healthy", &[("Healthy", 0.7), ("Fever", 0.3), ("End", 1.0)]),
            ("Fever", &[("Healthy", 0.4), ("Fever", 0.6), ("End", 1.0)]),
        ]);
        let emissions = table(&[
            ("normal", &[("Healthy", 0.5), ("Fever", 0.1)]),
            ("cold", &[("Healthy", 0.4), ("Fever", 0.3)]),
            ("dizzy", &[("Healthy", 0.1), ("Fever", 0.6)]),
        ]);
        (roles, transitions, emissions)
    }

    #[test]
    fn test_classic_sequence() {
        let (roles, transitions, emissions) = weather_model();
        let words = strings(&["normal", "cold", "dizzy"]);
        let path = viterbi(&roles, &words, &transitions, &emissions).unwrap();
        assert_eq!(path, strings(&["Healthy", "Healthy", "Fever"]));
    }

    #[test]
    fn test_tag_maps_words_to_roles() {
        let (roles, transitions, emissions) = weather_model();
        let words = strings(&["dizzy", "normal"]);
        let tags = tag(&roles, &words, &transitions, &emissions).unwrap();
        // Fever then Healthy: 0.4*0.6 * 0.4*0.5 = 0.048 beats the alternatives
        assert_eq!(tags.get("dizzy").map(String::as_str), Some("Fever"));
        assert_eq!(tags.get("normal").map(String::as_str), Some("Healthy"));
    }

    #[test]
    fn test_end_transition_changes_choice() {
        let roles = strings(&["A", "B"]);
        let transitions = table(&[
            ("Start", &[("A", 0.5), ("B", 0.5)]),
            ("A", &[("A", 0.5), ("B", 0.5), ("End", 0.1)]),
            ("B", &[("A", 0.5), ("B", 0.5), ("End", 0.9)]),
        ]);
        let emissions = table(&[("w", &[("A", 0.8), ("B", 0.2)])]);
        // A alone scores 0.4, B 0.1; after End: 0.04 vs 0.09
        let path = viterbi(&roles, &strings(&["w"]), &transitions, &emissions).unwrap();
        assert_eq!(path, strings(&["B"]));
    }

    #[test]
    fn test_ties_pick_first_role() {
        let roles = strings(&["X", "Y"]);
        let transitions = table(&[
            ("Start", &[("X", 0.5), ("Y", 0.5)]),
            ("X", &[("X", 0.5), ("Y", 0.5), ("End", 1.0)]),
            ("Y", &[("X", 0.5), ("Y", 0.5), ("End", 1.0)]),
        ]);
        let emissions = table(&[
            ("a", &[("X", 0.5), ("Y", 0.5)]),
            ("b", &[("X", 0.5), ("Y", 0.5)]),
        ]);
        let path = viterbi(&roles, &strings(&["a", "b"]), &transitions, &emissions).unwrap();
        assert_eq!(path, strings(&["X", "X"]));
    }

    #[test]
    fn test_repeated_word_keeps_last_role() {
        let roles = strings(&["X", "Y"]);
        let transitions = table(&[
            ("Start", &[("X", 0.9), ("Y", 0.1)]),
            ("X", &[("X", 0.1), ("Y", 0.9), ("End", 1.0)]),
            ("Y", &[("X", 0.5), ("Y", 0.5), ("End", 1.0)]),
        ]);
        let emissions = table(&[("w", &[("X", 0.5), ("Y", 0.5)])]);
        let words = strings(&["w", "w"]);

        // X then Y: 0.45 * 0.9 * 0.5 beats every other path
        let path = viterbi(&roles, &words, &transitions, &emissions).unwrap();
        assert_eq!(path, strings(&["X", "Y"]));

        let tags = tag(&roles, &words, &transitions, &emissions).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get("w").map(String::as_str), Some("Y"));
    }

    #[test]
    fn test_nan_score_never_wins() {
        let scores = [0.2, f64::NAN, 0.1];
        assert_eq!(best(scores.iter().map(|&s| Ok(s))), Ok((0, 0.2)));

        let scores = [0.2, f64::NAN, 0.3];
        assert_eq!(best(scores.iter().map(|&s| Ok(s))), Ok((2, 0.3)));

        assert_eq!(best(std::iter::empty()), Err(TaggingError::NoRoles));
    }

    #[test]
    fn test_empty_sentence() {
        let (roles, transitions, emissions) = weather_model();
        assert_eq!(viterbi(&roles, &[], &transitions, &emissions), Ok(vec![]));
        assert!(tag(&[], &[], &transitions, &emissions).unwrap().is_empty());
    }

    #[test]
    fn test_errors() {
        let (roles, transitions, emissions) = weather_model();

        assert_eq!(
            viterbi(&[], &strings(&["cold"]), &transitions, &emissions),
            Err(TaggingError::NoRoles)
        );

        let err = viterbi(&roles, &strings(&["sneeze"]), &transitions, &emissions).unwrap_err();
        assert_eq!(
            err,
            TaggingError::MissingEmission {
                word: "sneeze".to_string(),
                role: "Healthy".to_string()
            }
        );

        let mut no_end = transitions.clone();
        no_end.get_mut("Fever").unwrap().remove("End");
        let err = viterbi(&roles, &strings(&["cold"]), &no_end, &emissions).unwrap_err();
        assert_eq!(err.to_string(), "Missing transition probability Fever -> End");
    }
}
