// tests/scorer_properties.rs
use rand::{rngs::StdRng, Rng, SeedableRng};
use sentiment_sage::analyze::scoring::score_record;
use sentiment_sage::ingest::types::{NewsArticle, RedditPost, Tweet};
use sentiment_sage::SentimentAnalyzer;

const WORDS: &[&str] = &[
    "bitcoin", "great", "crash", "not", "very", "bullish", "bearish", "scam", "moon", "the",
    "hodl", "panic", "never", "good", "bad", "rekt", "pump", "dump", "extremely", "ATH",
    "isn't", "🚀", "¿qué?", "BTC", "", "\n", "!!!",
];

fn random_text(rng: &mut StdRng) -> String {
    let n = rng.random_range(0..60);
    (0..n)
        .map(|_| WORDS[rng.random_range(0..WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn polarity_is_always_within_bounds() {
    let a = SentimentAnalyzer::new();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..2_000 {
        let t = random_text(&mut rng);
        let p = a.polarity(&t);
        assert!((-1.0..=1.0).contains(&p), "{p} for {t:?}");
    }
}

#[test]
fn long_uniform_texts_stay_bounded() {
    let a = SentimentAnalyzer::new();
    let pos = "amazing ".repeat(10_000);
    let neg = "scam ".repeat(10_000);
    assert!(a.polarity(&pos) <= 1.0 && a.polarity(&pos) > 0.99);
    assert!(a.polarity(&neg) >= -1.0 && a.polarity(&neg) < -0.99);
}

#[test]
fn empty_records_are_neutral_for_every_source() {
    let a = SentimentAnalyzer::new();
    assert_eq!(score_record(&a, &Tweet::default()).sentiment, 0.0);
    assert_eq!(score_record(&a, &RedditPost::default()).sentiment, 0.0);
    assert_eq!(score_record(&a, &NewsArticle::default()).sentiment, 0.0);
}

#[test]
fn reddit_title_and_body_both_count() {
    let a = SentimentAnalyzer::new();
    let title_only = RedditPost {
        title: "good news".into(),
        ..Default::default()
    };
    let both = RedditPost {
        title: "good news".into(),
        selftext: "great gains".into(),
        ..Default::default()
    };
    assert!(score_record(&a, &both).sentiment > score_record(&a, &title_only).sentiment);
}
