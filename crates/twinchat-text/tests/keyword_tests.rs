use twinchat_core::types::IndexItem;
use twinchat_text::KeywordScorer;

fn item(id: &str, text: &str) -> IndexItem {
    IndexItem { id: id.to_string(), text: text.to_string(), embedding: vec![] }
}

fn corpus() -> Vec<IndexItem> {
    vec![
        item("growth", "Ran 50+ A/B tests that lifted activation by 25 percent"),
        item("community", "Built developer communities driving product-led growth"),
        item("mediscribe", "MediScribe is a medical grade transcription tool"),
        item("academy", "Launched the Postman Academy platform for developers"),
    ]
}

#[test]
fn exact_terms_score_matching_items_only() {
    let scorer = KeywordScorer::build(&corpus(), 0.2).expect("build");
    assert_eq!(scorer.len(), 4);
    let scores = scorer.query("transcription").expect("query");
    assert!(scores.get("mediscribe").copied().unwrap_or(0.0) > 0.0);
    assert!(!scores.contains_key("academy"));
}

#[test]
fn prefix_terms_match() {
    let scorer = KeywordScorer::build(&corpus(), 0.0).expect("build");
    let scores = scorer.query("transcri").expect("query");
    assert!(scores.contains_key("mediscribe"), "{scores:?}");
}

#[test]
fn fuzzy_terms_match_typos() {
    let scorer = KeywordScorer::build(&corpus(), 0.2).expect("build");
    let scores = scorer.query("acadamy").expect("query");
    assert!(scores.contains_key("academy"), "{scores:?}");
}

#[test]
fn exact_hit_outranks_fuzzy_hit() {
    let scorer = KeywordScorer::build(&corpus(), 0.2).expect("build");
    let scores = scorer.query("growth").expect("query");
    let exact = scores.get("community").copied().unwrap_or(0.0);
    assert!(exact > 0.0);
    for (id, s) in &scores {
        if id != "community" { assert!(exact >= *s, "{id} scored {s} over exact {exact}"); }
    }
}

#[test]
fn repeated_queries_are_deterministic() {
    let scorer = KeywordScorer::build(&corpus(), 0.2).expect("build");
    let a = scorer.query("developer growth platform").expect("query");
    let b = scorer.query("developer growth platform").expect("query");
    assert_eq!(a, b);
}

#[test]
fn stopword_only_and_empty_queries_yield_nothing() {
    let scorer = KeywordScorer::build(&corpus(), 0.2).expect("build");
    assert!(scorer.query("").expect("query").is_empty());
    assert!(scorer.query("the and of").expect("query").is_empty());
}

#[test]
fn empty_corpus_scores_nothing() {
    let scorer = KeywordScorer::build(&[], 0.2).expect("build");
    assert!(scorer.is_empty());
    assert!(scorer.query("growth").expect("query").is_empty());
}
