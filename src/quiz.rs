//! ChronoQuiz: two questions that recommend a destination.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, Destination, CRETACE, FLORENCE_1504, PARIS_1889};
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizAnswer {
    A,
    B,
    C,
}

impl QuizAnswer {
    pub fn destination_id(self) -> &'static str {
        match self {
            QuizAnswer::A => PARIS_1889,
            QuizAnswer::B => CRETACE,
            QuizAnswer::C => FLORENCE_1504,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizOption {
    pub value: QuizAnswer,
    pub label: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: &'static str,
    pub options: [QuizOption; 3],
}

pub const QUESTIONS: [QuizQuestion; 2] = [
    QuizQuestion {
        id: 1,
        question: "Quelle est votre envie du moment ?",
        options: [
            QuizOption { value: QuizAnswer::A, label: "Découverte & Innovation", icon: "💡" },
            QuizOption { value: QuizAnswer::B, label: "Nature Sauvage & Frissons", icon: "🦕" },
            QuizOption { value: QuizAnswer::C, label: "Art & Culture", icon: "🎨" },
        ],
    },
    QuizQuestion {
        id: 2,
        question: "Votre ambiance idéale ?",
        options: [
            QuizOption { value: QuizAnswer::A, label: "Foule festive et électrique", icon: "✨" },
            QuizOption { value: QuizAnswer::B, label: "Solitude et grands espaces", icon: "🌅" },
            QuizOption { value: QuizAnswer::C, label: "Raffinement et architecture", icon: "🏛️" },
        ],
    },
];

#[derive(Debug, Deserialize)]
pub struct QuizSubmission {
    /// One slot per question; `null` for a skipped question.
    pub answers: Vec<Option<QuizAnswer>>,
}

/// Counts answers; ties favour A, then B.
pub fn winning_answer(answers: &[Option<QuizAnswer>]) -> QuizAnswer {
    let (mut a, mut b, mut c) = (0usize, 0usize, 0usize);
    for answer in answers.iter().flatten() {
        match answer {
            QuizAnswer::A => a += 1,
            QuizAnswer::B => b += 1,
            QuizAnswer::C => c += 1,
        }
    }

    if b > a && b >= c {
        QuizAnswer::B
    } else if c > a && c > b {
        QuizAnswer::C
    } else {
        QuizAnswer::A
    }
}

pub fn recommend(submission: &QuizSubmission) -> Result<&'static Destination, AppError> {
    if submission.answers.len() > QUESTIONS.len() {
        return Err(AppError::InvalidQuiz(format!(
            "expected at most {} answers, got {}",
            QUESTIONS.len(),
            submission.answers.len()
        )));
    }
    let id = winning_answer(&submission.answers).destination_id();
    catalog::find(id).ok_or_else(|| AppError::UnknownDestination { id: id.to_string() })
}
