mod common;

use proptest::prelude::*;
use ragsnip_retrieval::{search, window, Corpus, SearchOptions};

use common::{KeywordEmbedder, VOCAB};

fn line_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCAB.iter().copied().chain(["the", "and", "of"]).collect::<Vec<_>>()), 0..4)
        .prop_map(|words| words.join(" "))
}

fn source_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(line_strategy(), 1..30).prop_map(|lines| lines.join("\n"))
}

fn matches(query: &str, corpus: &Corpus, threshold: f32) -> Vec<(Option<String>, usize)> {
    let embedder = KeywordEmbedder::default();
    search(query, corpus, Some(&embedder), None, &SearchOptions::with_threshold(threshold))
        .expect("search")
        .into_iter()
        .map(|s| (s.source, s.index))
        .collect()
}

proptest! {
    #[test]
    fn lowering_threshold_never_drops_a_match(
        a in source_strategy(),
        b in source_strategy(),
        query in line_strategy(),
        t1 in -1.0f32..1.0,
        t2 in -1.0f32..1.0,
    ) {
        let (low, high) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        let corpus: Corpus = [("a", a), ("b", b)].into_iter().collect();
        let at_low = matches(&query, &corpus, low);
        for m in matches(&query, &corpus, high) {
            prop_assert!(at_low.contains(&m), "{:?} lost when lowering {} -> {}", m, high, low);
        }
    }

    #[test]
    fn minus_one_selects_every_segment(a in source_strategy(), query in line_strategy()) {
        let n = a.lines().count();
        let corpus: Corpus = [("a", a)].into_iter().collect();
        let found = matches(&query, &corpus, -1.0);
        prop_assert_eq!(found.len(), n);
        let indices: Vec<usize> = found.iter().map(|(_, i)| *i).collect();
        prop_assert_eq!(indices, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn punctuation_only_text_has_no_segments(text in "[. \t\n]{0,40}", threshold in -1.0f32..1.0) {
        prop_assert!(matches("cat", &Corpus::from(text), threshold).is_empty());
    }

    #[test]
    fn window_stays_in_bounds(len in 1usize..200, idx_seed in 0usize..200, radius in 0usize..20) {
        let idx = idx_seed % len;
        let range = window(idx, len, radius);
        prop_assert!(range.start <= idx && idx < range.end);
        prop_assert!(range.end <= len);
        prop_assert!(range.len() <= 2 * radius + 1);
        prop_assert_eq!(range.start, idx.saturating_sub(radius));
    }
}
