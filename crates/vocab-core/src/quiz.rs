//! Multiple-choice quiz.

use crate::models::Word;
use crate::rating::{percentage, Rating};
use crate::shuffle::shuffled;
use rand::Rng;

/// Fewest words a section needs before a quiz can be built.
pub const MIN_QUIZ_WORDS: usize = 4;
/// Options shown per question, the correct one included.
pub const OPTION_COUNT: usize = 4;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    /// The original text being asked for.
    pub prompt: String,
    /// Translation of the prompt.
    pub correct_answer: String,
    /// Candidate translations in display order.
    pub options: Vec<String>,
}

impl QuizQuestion {
    /// Exact comparison; options come from a closed set so no normalization.
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }
}

/// Build one question per word, in random order.
///
/// Returns no questions when fewer than [`MIN_QUIZ_WORDS`] words are given.
pub fn build_questions<R: Rng + ?Sized>(words: &[Word], rng: &mut R) -> Vec<QuizQuestion> {
    if words.len() < MIN_QUIZ_WORDS {
        return Vec::new();
    }

    shuffled(words, rng)
        .into_iter()
        .map(|word| {
            let others: Vec<&Word> = words.iter().filter(|w| w.id != word.id).collect();
            let mut options: Vec<String> = shuffled(&others, rng)
                .into_iter()
                .take(OPTION_COUNT - 1)
                .map(|w| w.translation.clone())
                .collect();
            options.push(word.translation.clone());

            QuizQuestion {
                prompt: word.original,
                correct_answer: word.translation,
                options: shuffled(&options, rng),
            }
        })
        .collect()
}

/// Count correct answers; unanswered questions score nothing.
pub fn score(questions: &[QuizQuestion], answers: &[Option<String>]) -> usize {
    questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| a.as_deref().is_some_and(|a| q.is_correct(a)))
        .count()
}

/// Final result of a quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSummary {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub rating: Rating,
}

/// A quiz being played, one question at a time.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    answers: Vec<Option<String>>,
    current_index: usize,
}

impl QuizSession {
    /// Start a quiz, or `None` when the word list is too short.
    pub fn new<R: Rng + ?Sized>(words: &[Word], rng: &mut R) -> Option<Self> {
        Self::from_questions(build_questions(words, rng))
    }

    pub fn from_questions(questions: Vec<QuizQuestion>) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        let answers = vec![None; questions.len()];
        Some(Self {
            questions,
            answers,
            current_index: 0,
        })
    }

    /// Question on screen, `None` once finished.
    pub fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current_index)
    }

    /// 0-based index of the current question.
    pub fn position(&self) -> usize {
        self.current_index
    }

    // Never empty: `from_questions` refuses an empty list.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Answer locked in for the current question.
    pub fn selected(&self) -> Option<&str> {
        self.answers.get(self.current_index)?.as_deref()
    }

    /// Lock in an answer for the current question.
    ///
    /// Returns whether it was correct, or `None` if the question was
    /// already answered or the quiz is over.
    pub fn answer(&mut self, choice: &str) -> Option<bool> {
        let question = self.questions.get(self.current_index)?;
        let slot = &mut self.answers[self.current_index];
        if slot.is_some() {
            return None;
        }
        *slot = Some(choice.to_string());
        Some(question.is_correct(choice))
    }

    /// Answer by option index (0-based).
    pub fn answer_option(&mut self, index: usize) -> Option<bool> {
        let choice = self.current()?.options.get(index)?.clone();
        self.answer(&choice)
    }

    /// Move past an answered question. Returns false if it is still open.
    pub fn advance(&mut self) -> bool {
        if self.is_finished() || self.selected().is_none() {
            return false;
        }
        self.current_index += 1;
        true
    }

    pub fn is_finished(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    /// Correct answers so far.
    pub fn score(&self) -> usize {
        score(&self.questions, &self.answers)
    }

    pub fn summary(&self) -> QuizSummary {
        let score = self.score();
        let total = self.questions.len();
        let percentage = percentage(score, total);
        QuizSummary {
            score,
            total,
            percentage,
            rating: Rating::from_percentage(percentage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;
    use crate::shuffle::seeded;
    use std::collections::HashSet;

    fn words(n: usize) -> Vec<Word> {
        (0..n)
            .map(|i| Word::new(format!("word{}", i), format!("wort{}", i)))
            .collect()
    }

    #[test]
    fn test_too_few_words() {
        let mut rng = seeded(1);
        assert!(build_questions(&words(0), &mut rng).is_empty());
        assert!(build_questions(&words(3), &mut rng).is_empty());
        assert!(QuizSession::new(&words(3), &mut rng).is_none());
    }

    #[test]
    fn test_exactly_four_words() {
        let list = words(4);
        let questions = build_questions(&list, &mut seeded(9));
        assert_eq!(questions.len(), 4);

        let prompts: HashSet<&str> = questions.iter().map(|q| q.prompt.as_str()).collect();
        assert_eq!(prompts.len(), 4);

        for q in &questions {
            assert_eq!(q.options.len(), OPTION_COUNT);
            assert!(q.options.contains(&q.correct_answer));
            let distinct: HashSet<&String> = q.options.iter().collect();
            assert_eq!(distinct.len(), 4);
            let word = list.iter().find(|w| w.original == q.prompt).unwrap();
            assert_eq!(q.correct_answer, word.translation);
        }
    }

    #[test]
    fn test_each_word_asked_once() {
        let list = words(10);
        let questions = build_questions(&list, &mut seeded(5));
        let mut prompts: Vec<String> = questions.into_iter().map(|q| q.prompt).collect();
        prompts.sort();
        let mut expected: Vec<String> = list.into_iter().map(|w| w.original).collect();
        expected.sort();
        assert_eq!(prompts, expected);
    }

    #[test]
    fn test_distractors_come_from_other_words() {
        let list = words(8);
        for q in build_questions(&list, &mut seeded(11)) {
            let wrong: Vec<&String> = q.options.iter().filter(|o| **o != q.correct_answer).collect();
            assert_eq!(wrong.len(), 3);
        }
    }

    #[test]
    fn test_duplicate_translations_not_deduplicated() {
        let section = Section::new("Dupes")
            .with_word("a", "same")
            .with_word("b", "same")
            .with_word("c", "same")
            .with_word("d", "same");
        let questions = build_questions(&section.words, &mut seeded(2));
        assert_eq!(questions.len(), 4);
        assert!(questions.iter().all(|q| q.options.len() == 4));
    }

    #[test]
    fn test_seeded_build_is_reproducible() {
        let list = words(6);
        assert_eq!(
            build_questions(&list, &mut seeded(123)),
            build_questions(&list, &mut seeded(123))
        );
    }

    #[test]
    fn test_answer_is_exact_match() {
        let q = QuizQuestion {
            prompt: "hello".into(),
            correct_answer: "Hallo".into(),
            options: vec!["Hallo".into(), "Welt".into(), "Haus".into(), "Baum".into()],
        };
        assert!(q.is_correct("Hallo"));
        assert!(!q.is_correct("hallo"));
        assert!(!q.is_correct("Hallo "));
    }

    #[test]
    fn test_score() {
        let questions = build_questions(&words(4), &mut seeded(3));
        let answers = vec![
            Some(questions[0].correct_answer.clone()),
            Some("nope".to_string()),
            None,
            Some(questions[3].correct_answer.clone()),
        ];
        assert_eq!(score(&questions, &answers), 2);
    }

    #[test]
    fn test_session_locks_answers() {
        let mut session = QuizSession::new(&words(4), &mut seeded(4)).unwrap();
        assert!(!session.advance());

        let correct = session.current().unwrap().correct_answer.clone();
        assert_eq!(session.answer(&correct), Some(true));
        assert_eq!(session.answer("something else"), None);
        assert_eq!(session.selected(), Some(correct.as_str()));
        assert_eq!(session.score(), 1);
        assert!(session.advance());
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn test_session_runs_to_completion() {
        let mut session = QuizSession::new(&words(5), &mut seeded(8)).unwrap();
        let mut expected = 0;
        let mut i = 0;
        while !session.is_finished() {
            let q = session.current().unwrap().clone();
            if i % 2 == 0 {
                session.answer(&q.correct_answer);
                expected += 1;
            } else {
                let wrong = q.options.iter().find(|o| **o != q.correct_answer).unwrap().clone();
                session.answer(&wrong);
            }
            session.advance();
            i += 1;
        }
        assert!(session.current().is_none());
        assert_eq!(session.answer("late"), None);

        let summary = session.summary();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.score, expected);
        assert_eq!(summary.percentage, 60.0);
        assert_eq!(summary.rating, Rating::WellDone);
    }

    #[test]
    fn test_answer_option_by_index() {
        let mut session = QuizSession::new(&words(4), &mut seeded(6)).unwrap();
        let q = session.current().unwrap().clone();
        let idx = q.options.iter().position(|o| *o == q.correct_answer).unwrap();
        assert_eq!(session.answer_option(9), None);
        assert_eq!(session.answer_option(idx), Some(true));
    }
}
