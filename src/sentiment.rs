use once_cell::sync::Lazy;
use std::collections::HashMap;

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

/// Normalization constant for `s / sqrt(s^2 + ALPHA)`; approximates the max
/// expected raw sum of a short post.
const ALPHA: f64 = 15.0;

/// Scale applied to a valence that directly follows an intensifier.
const INTENSIFIER_BOOST: f64 = 1.5;

/// Lexicon-based polarity scorer. Stateless; the lexicon is shared.
#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Lexicon valence for a single token (0 when unknown).
    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Returns (weighted valence sum, token count). Same weighting as
    /// [`polarity`](Self::polarity), before squashing.
    pub fn raw_score(&self, text: &str) -> (f64, usize) {
        let tokens: Vec<String> = tokenize(text).collect();
        (self.weighted_sum(&tokens), tokens.len())
    }

    /// Polarity in `[-1.0, 1.0]`; 0.0 for empty or word-less input.
    ///
    /// Sums valences (with negation and intensifiers) and squashes the sum
    /// with `s / sqrt(s^2 + ALPHA)`, which is strictly increasing in `s`.
    pub fn polarity(&self, text: &str) -> f64 {
        let tokens: Vec<String> = tokenize(text).collect();
        if tokens.is_empty() {
            return 0.0;
        }
        normalize(self.weighted_sum(&tokens))
    }

    /// Negation: a negator within the previous 1..=3 tokens flips the sign
    /// of a word's valence. An intensifier right before it scales it.
    fn weighted_sum(&self, tokens: &[String]) -> f64 {
        let mut sum = 0.0f64;
        for i in 0..tokens.len() {
            let base = self.word_score(tokens[i].as_str());
            if base == 0 {
                continue;
            }
            let mut v = base as f64;
            if i >= 1 && is_intensifier(tokens[i - 1].as_str()) {
                v *= INTENSIFIER_BOOST;
            }
            if is_negated(tokens, i) {
                v = -v;
            }
            sum += v;
        }
        sum
    }
}

fn normalize(sum: f64) -> f64 {
    if sum == 0.0 || !sum.is_finite() {
        return 0.0;
    }
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn is_negated(tokens: &[String], i: usize) -> bool {
    (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()))
}

/// Lower-case word tokens. Apostrophes stay inside words so that "isn't"
/// survives as a single negator.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|t| t.trim_matches(|c: char| c == '\'' || c == '\u{2019}'))
        .filter(|t| !t.is_empty())
        .map(|t| t.replace('\u{2019}', "'").to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "don't"
            | "doesn't"
            | "didn't"
            | "without"
    )
}

fn is_intensifier(tok: &str) -> bool {
    matches!(
        tok,
        "very" | "extremely" | "super" | "incredibly" | "hugely" | "massively" | "really"
    )
}
