//! Flashcard and quiz record construction.

use crate::repair::{extract_entries, fields};
use edugenie_core::{Flashcard, IdMinter, QuizQuestion};
use edugenie_error::{ParseError, ParseErrorKind, ParseResult};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

const FLASHCARD_FIELDS: &[&str] = &["front", "back"];
const QUIZ_FIELDS: &[&str] = &["question"];
const ANSWER_KEYS: &[&str] = &["correctAnswer", "correct_answer"];

/// Parses flashcards out of raw model output.
///
/// # Errors
///
/// Any [`extract_entries`] error, or [`ParseErrorKind::EmptyResultSet`]
/// when no usable card remains.
#[instrument(skip(raw), fields(length = raw.len()))]
pub fn parse_flashcards(raw: &str) -> ParseResult<Vec<Flashcard>> {
    let entries = extract_entries(raw, FLASHCARD_FIELDS)?;
    let minter = IdMinter::new("card");

    let cards: Vec<Flashcard> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            Flashcard::new(
                minter.mint(index),
                fields::text(entry, "front"),
                fields::text(entry, "back"),
            )
        })
        .collect();

    if cards.is_empty() {
        warn!("No valid flashcards in response");
        return Err(ParseError::new(ParseErrorKind::EmptyResultSet(
            "flashcards".to_string(),
        )));
    }

    debug!(count = cards.len(), "Parsed flashcards");
    Ok(cards)
}

/// Parses quiz questions out of raw model output.
///
/// A question without exactly four distinct options is dropped. A question
/// whose answer is not one of its options is repaired with
/// [`reconcile_answer`] or dropped.
///
/// # Errors
///
/// Any [`extract_entries`] error, or [`ParseErrorKind::EmptyResultSet`]
/// when no usable question remains.
#[instrument(skip(raw), fields(length = raw.len()))]
pub fn parse_quiz(raw: &str) -> ParseResult<Vec<QuizQuestion>> {
    let entries = extract_entries(raw, QUIZ_FIELDS)?;
    let minter = IdMinter::new("quiz");

    let mut questions = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let question = fields::text(entry, "question");
        let options = fields::string_list(entry, "options");
        let answer = fields::text_any(entry, ANSWER_KEYS);

        if !has_distinct_options(&options) {
            warn!(index, question = %question, options = options.len(), "Dropping question without four distinct options");
            continue;
        }
        let Some(correct) = reconcile_answer(&options, &answer) else {
            warn!(index, question = %question, answer = %answer, "Dropping question whose answer is not an option");
            continue;
        };
        if correct != answer {
            debug!(index, from = %answer, to = %correct, "Repaired answer");
        }

        let id = minter.mint(questions.len());
        questions.push(
            QuizQuestion::new(id, question, options, correct, fields::text(entry, "explanation"))

        );
    }

    if questions.is_empty() {
        warn!("No valid quiz questions in response");
        return Err(ParseError::new(ParseErrorKind::EmptyResultSet(
            "quiz questions".to_string(),
        )));
    }

    debug!(count = questions.len(), "Parsed quiz");
    Ok(questions)
}

/// True for exactly [`QuizQuestion::OPTION_COUNT`] options, none repeated
/// after trimming.
fn has_distinct_options(options: &[String]) -> bool {
    let distinct: HashSet<&str> = options.iter().map(|o| o.trim()).collect();
    options.len() == QuizQuestion::OPTION_COUNT && distinct.len() == options.len()
}

/// Finds the option an answer refers to.
///
/// Tries, in order: a verbatim match, a single match after trimming and ASCII
/// case folding, and an option letter (`A`-`D`, optionally followed by `)`,
/// `.` or `:`).
///
/// ```
/// use edugenie_models::repair::reconcile_answer;
///
/// let options: Vec<String> = ["Red", "Green", "Blue", "Cyan"].map(String::from).to_vec();
/// assert_eq!(reconcile_answer(&options, "Green").as_deref(), Some("Green"));
/// assert_eq!(reconcile_answer(&options, " blue ").as_deref(), Some("Blue"));
/// assert_eq!(reconcile_answer(&options, "D)").as_deref(), Some("Cyan"));
/// assert_eq!(reconcile_answer(&options, "Purple"), None);
/// ```
pub fn reconcile_answer(options: &[String], answer: &str) -> Option<String> {
    if options.iter().any(|o| o == answer) {
        return Some(answer.to_string());
    }

    let folded = answer.trim().to_ascii_lowercase();
    let mut matches = options
        .iter()
        .filter(|o| o.trim().to_ascii_lowercase() == folded);
    if let (Some(only), None) = (matches.next(), matches.next()) {
        return Some(only.clone());
    }

    option_letter(answer).and_then(|index| options.get(index).cloned())
}

fn option_letter(answer: &str) -> Option<usize> {
    let letter = answer.trim().trim_end_matches([')', '.', ':']);
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ ('A'..='D' | 'a'..='d')), None) => Some((c.to_ascii_uppercase() as u8 - b'A') as usize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        ["Nucleus", "Chloroplast", "Ribosome", "Vacuole"].map(String::from).to_vec()
    }

    #[test]
    fn letter_forms_resolve() {
        for answer in ["B", "b", "B)", "B.", "B:", " B "] {
            assert_eq!(reconcile_answer(&options(), answer).as_deref(), Some("Chloroplast"), "{answer}");
        }
        assert_eq!(reconcile_answer(&options(), "E"), None);
    }

    #[test]
    fn ambiguous_fold_falls_through() {
        let options: Vec<String> = ["Yes", "yes", "No", "Maybe"].map(String::from).to_vec();
        assert_eq!(reconcile_answer(&options, "YES"), None);
    }

    #[test]
    fn options_must_be_four_and_distinct() {
        assert!(has_distinct_options(&options()));
        assert!(!has_distinct_options(&options()[..3]));
        let repeated: Vec<String> = ["Nucleus", "Nucleus ", "Ribosome", "Vacuole"].map(String::from).to_vec();
        assert!(!has_distinct_options(&repeated));
    }

    #[test]
    fn letter_beyond_option_count_is_rejected() {
        let options: Vec<String> = ["True", "False"].map(String::from).to_vec();
        assert_eq!(reconcile_answer(&options, "C"), None);
    }
}
