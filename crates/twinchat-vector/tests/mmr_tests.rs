use std::collections::{HashMap, HashSet};

use twinchat_core::types::{Candidate, IndexItem};
use twinchat_vector::similarity::l2_normalize;
use twinchat_vector::{CandidateScorer, MmrParams, MmrSelector};

/// Small deterministic generator so candidate sets vary without extra deps.
struct Lcg(u64);

impl Lcg {
    fn next_f32(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as f32 / (1u64 << 31) as f32) * 2.0 - 1.0
    }
}

fn random_candidates(rng: &mut Lcg, n: usize, dims: usize) -> Vec<Candidate> {
    (0..n)
        .map(|i| {
            let mut vector: Vec<f32> = (0..dims).map(|_| rng.next_f32()).collect();
            l2_normalize(&mut vector);
            Candidate {
                id: format!("c{i}"),
                text: format!("snippet {i}"),
                vector,
                semantic_score: rng.next_f32(),
                keyword_score: (rng.next_f32() + 1.0) / 2.0,
            }
        })
        .collect()
}

fn candidate(id: &str, vector: Vec<f32>, semantic: f32, keyword: f32) -> Candidate {
    Candidate { id: id.to_string(), text: id.to_string(), vector, semantic_score: semantic, keyword_score: keyword }
}

#[test]
fn output_size_uniqueness_and_first_pick() {
    let mut rng = Lcg(42);
    let params = MmrParams::default();
    let selector = MmrSelector::new(params);
    for n in 1..12 {
        let candidates = random_candidates(&mut rng, n, 8);
        let picked = selector.select(&candidates);
        assert_eq!(picked.len(), params.top_k.min(n));

        let ids: HashSet<&str> = picked.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), picked.len(), "duplicate ids in {picked:?}");

        let relevance = |c: &Candidate| params.lambda * c.semantic_score + params.keyword_weight * c.keyword_score;
        let best = candidates.iter().map(relevance).fold(f32::NEG_INFINITY, f32::max);
        assert!((relevance(&picked[0]) - best).abs() < 1e-6);
    }
}

#[test]
fn pure_relevance_matches_descending_sort() {
    let mut rng = Lcg(7);
    let selector = MmrSelector::new(MmrParams { lambda: 1.0, keyword_weight: 0.0, top_k: 4 });
    for n in [1usize, 3, 4, 9, 20] {
        let candidates = random_candidates(&mut rng, n, 6);
        let picked: Vec<String> = selector.select(&candidates).into_iter().map(|c| c.id).collect();

        let mut sorted = candidates.clone();
        sorted.sort_by(|a, b| b.semantic_score.partial_cmp(&a.semantic_score).unwrap_or(std::cmp::Ordering::Equal));
        let expected: Vec<String> = sorted.into_iter().take(4).map(|c| c.id).collect();
        assert_eq!(picked, expected);
    }
}

#[test]
fn near_duplicates_are_demoted() {
    // a and a2 are the same direction; b is orthogonal but slightly less relevant.
    let candidates = vec![
        candidate("a", vec![1.0, 0.0], 0.90, 0.0),
        candidate("a2", vec![1.0, 0.0], 0.89, 0.0),
        candidate("b", vec![0.0, 1.0], 0.80, 0.0),
    ];
    let selector = MmrSelector::new(MmrParams { lambda: 0.75, keyword_weight: 0.25, top_k: 2 });
    let ids: Vec<String> = selector.select(&candidates).into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn keyword_evidence_can_lift_a_candidate() {
    let candidates = vec![
        candidate("semantic", vec![1.0, 0.0], 0.60, 0.0),
        candidate("lexical", vec![0.0, 1.0], 0.55, 0.5),
    ];
    let selector = MmrSelector::new(MmrParams { lambda: 0.75, keyword_weight: 0.25, top_k: 1 });
    assert_eq!(selector.select(&candidates)[0].id, "lexical");
}

#[test]
fn ties_go_to_first_encountered() {
    let candidates = vec![
        candidate("first", vec![1.0, 0.0], 0.5, 0.0),
        candidate("second", vec![0.0, 1.0], 0.5, 0.0),
    ];
    let selector = MmrSelector::new(MmrParams { lambda: 1.0, keyword_weight: 0.0, top_k: 2 });
    let ids: Vec<String> = selector.select(&candidates).into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["first", "second"]);
}

#[test]
fn empty_and_nan_candidates() {
    let selector = MmrSelector::default();
    assert!(selector.select(&[]).is_empty());

    let candidates = vec![candidate("nan", vec![1.0], f32::NAN, 0.0), candidate("ok", vec![1.0], 0.1, 0.0)];
    let ids: Vec<String> = selector.select(&candidates).into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["ok"]);
}

#[test]
fn repeated_ids_are_selected_once() {
    let candidates = vec![
        candidate("dup", vec![1.0, 0.0], 0.9, 0.0),
        candidate("dup", vec![0.0, 1.0], 0.8, 0.0),
        candidate("other", vec![0.6, 0.8], 0.1, 0.0),
    ];
    let ids: Vec<String> = MmrSelector::default().select(&candidates).into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["dup", "other"]);
}

#[test]
fn scorer_fuses_cosine_and_scaled_keyword() {
    let items = vec![
        IndexItem { id: "x".into(), text: "x".into(), embedding: vec![1.0, 0.0] },
        IndexItem { id: "y".into(), text: "y".into(), embedding: vec![0.0, 1.0] },
        IndexItem { id: "z".into(), text: "z".into(), embedding: vec![0.0, 0.0] },
    ];
    let keywords: HashMap<String, f32> = [("y".to_string(), 4.0)].into_iter().collect();
    let candidates = CandidateScorer::default().score_all(&[2.0, 0.0], &items, &keywords);

    assert_eq!(candidates.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["x", "y", "z"]);
    assert!((candidates[0].semantic_score - 1.0).abs() < 1e-6);
    assert!(candidates[1].semantic_score.abs() < 1e-6);
    assert!((candidates[1].keyword_score - 0.4).abs() < 1e-6);
    assert_eq!(candidates[2].semantic_score, 0.0);
    assert_eq!(candidates[0].keyword_score, 0.0);

    let halved = CandidateScorer::new(20.0).score_all(&[2.0, 0.0], &items, &keywords);
    assert!((halved[1].keyword_score - 0.2).abs() < 1e-6);
}

#[test]
fn keyword_only_scoring_keeps_hits_and_ranks_by_keyword() {
    let items = vec![
        IndexItem { id: "a".into(), text: "a".into(), embedding: vec![1.0, 0.0] },
        IndexItem { id: "b".into(), text: "b".into(), embedding: vec![0.0, 1.0] },
        IndexItem { id: "c".into(), text: "c".into(), embedding: vec![0.6, 0.8] },
    ];
    let keywords: HashMap<String, f32> = [("c".to_string(), 6.0), ("a".to_string(), 2.0)].into_iter().collect();
    let candidates = CandidateScorer::default().score_keywords(&items, &keywords);

    assert_eq!(candidates.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["a", "c"]);
    assert!(candidates.iter().all(|c| c.semantic_score == 0.0));
    assert!((candidates[1].keyword_score - 0.6).abs() < 1e-6);

    let top: Vec<String> = MmrSelector::default().select(&candidates).into_iter().map(|c| c.id).collect();
    assert_eq!(top[0], "c");
    assert!(CandidateScorer::default().score_keywords(&items, &HashMap::new()).is_empty());
}
