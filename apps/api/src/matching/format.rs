//! Format scoring: a rule-based check for standard resume sections and length.

use regex::Regex;
use std::sync::OnceLock;

const EXPERIENCE_POINTS: f64 = 35.0;
const EDUCATION_POINTS: f64 = 25.0;
const SKILLS_POINTS: f64 = 25.0;
const LENGTH_POINTS: f64 = 15.0;

/// Exclusive word-count bounds for the length bonus.
const MIN_WORDS: usize = 250;
const MAX_WORDS: usize = 1200;

static EXPERIENCE_RE: OnceLock<Regex> = OnceLock::new();
static EDUCATION_RE: OnceLock<Regex> = OnceLock::new();
static SKILLS_RE: OnceLock<Regex> = OnceLock::new();

fn experience_re() -> &'static Regex {
    EXPERIENCE_RE.get_or_init(|| {
        Regex::new(r"\b(experience|employment|work history)\b").expect("experience regex")
    })
}

fn education_re() -> &'static Regex {
    EDUCATION_RE.get_or_init(|| Regex::new(r"\b(education|academic)\b").expect("education regex"))
}

fn skills_re() -> &'static Regex {
    SKILLS_RE.get_or_init(|| {
        Regex::new(r"\b(skills|abilities|technologies|competencies)\b").expect("skills regex")
    })
}

/// Scores resume structure on a 0–100 scale.
///
/// Additive, case-insensitive:
/// - +35 experience / employment / work history
/// - +25 education / academic
/// - +25 skills / abilities / technologies / competencies
/// - +15 when the unlowered input has strictly between 250 and 1200 words
///
/// The rule maximum is exactly 100 and the total is capped there.
pub fn format_score(resume_text: &str) -> f64 {
    let text = resume_text.to_lowercase();
    let mut score = 0.0;

    if experience_re().is_match(&text) {
        score += EXPERIENCE_POINTS;
    }
    if education_re().is_match(&text) {
        score += EDUCATION_POINTS;
    }
    if skills_re().is_match(&text) {
        score += SKILLS_POINTS;
    }

    let word_count = resume_text.split_whitespace().count();
    if word_count > MIN_WORDS && word_count < MAX_WORDS {
        score += LENGTH_POINTS;
    }

    f64::min(score, 100.0)
}
