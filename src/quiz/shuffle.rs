// src/quiz/shuffle.rs

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// How one question was shown: its id and the bank indices of its options
/// in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentedQuestion {
    pub id: i64,
    pub option_order: Vec<usize>,
}

/// The full layout handed to one quiz session.
///
/// Carrying the permutations instead of the shuffled text keeps the quiz
/// token small and lets the server rebuild exactly what the student saw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub questions: Vec<PresentedQuestion>,
}

impl Presentation {
    /// Rebuilds the shuffled questions from the bank.
    ///
    /// Returns `None` when the layout references an unknown question or an
    /// option order that is not a permutation of that question's options.
    pub fn apply(&self, bank: &[Question]) -> Option<Vec<Question>> {
        self.questions
            .iter()
            .map(|presented| {
                let question = bank.iter().find(|q| q.id == presented.id)?;
                if !is_permutation(&presented.option_order, question.options.len()) {
                    return None;
                }
                Some(reorder(question, &presented.option_order))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in order {
        match seen.get_mut(i) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

/// Builds a copy of `question` with options in `order` and the correct index
/// pointed at the same text.
///
/// If two options share the correct option's text, the first one in the new
/// order wins.
fn reorder(question: &Question, order: &[usize]) -> Question {
    let options: Vec<String> = order.iter().map(|&i| question.options[i].clone()).collect();

    let correct_option_index = question
        .correct_option()
        .and_then(|text| options.iter().position(|o| o == text))
        .unwrap_or(0);

    Question {
        id: question.id,
        question_text: question.question_text.clone(),
        options,
        correct_option_index,
    }
}

/// Shuffles the options of a single question (Fisher–Yates via
/// `SliceRandom::shuffle`). Returns the new question and the option order.
pub fn shuffle_options<R: Rng + ?Sized>(
    question: &Question,
    rng: &mut R,
) -> (Question, Vec<usize>) {
    let mut order: Vec<usize> = (0..question.options.len()).collect();
    order.shuffle(rng);
    (reorder(question, &order), order)
}

/// Shuffles question order and, independently, the options of every
/// question. The bank itself is left untouched.
pub fn shuffle_questions<R: Rng + ?Sized>(
    bank: &[Question],
    rng: &mut R,
) -> (Vec<Question>, Presentation) {
    let mut question_order: Vec<usize> = (0..bank.len()).collect();
    question_order.shuffle(rng);

    let mut questions = Vec::with_capacity(bank.len());
    let mut presented = Vec::with_capacity(bank.len());

    for i in question_order {
        let (question, option_order) = shuffle_options(&bank[i], rng);
        presented.push(PresentedQuestion {
            id: question.id,
            option_order,
        });
        questions.push(question);
    }

    (
        questions,
        Presentation {
            questions: presented,
        },
    )
}
