//! Debounce and staleness behaviour of the live match engine

use ebnf_analysis::{HighlightSink, LiveMatchEngine, MatchSegment, Phase, SampleRegistry};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

const GRAMMAR: &str = "pair = 'a', 'b' ;";

#[derive(Default)]
struct RecordingSink {
    shown: Mutex<Vec<(&'static str, Phase, Vec<MatchSegment>)>>,
}

impl RecordingSink {
    fn unmatched_applied(&self) -> Vec<Vec<MatchSegment>> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, phase, segments)| *phase == Phase::Unmatched && !segments.is_empty())
            .map(|(_, _, segments)| segments.clone())
            .collect()
    }

    fn last_matched(&self) -> Vec<MatchSegment> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(_, phase, _)| *phase == Phase::Matched)
            .map(|(_, _, segments)| segments.clone())
            .unwrap_or_default()
    }
}

impl HighlightSink<&'static str> for RecordingSink {
    fn show(&self, key: &&'static str, phase: Phase, segments: &[MatchSegment]) {
        self.shown
            .lock()
            .unwrap()
            .push((*key, phase, segments.to_vec()));
    }
}

fn engine(sink: &Arc<RecordingSink>) -> LiveMatchEngine<&'static str, RecordingSink> {
    LiveMatchEngine::with_debounce(Arc::clone(sink), Duration::from_millis(1000))
}

#[tokio::test(start_paused = true)]
async fn matched_segments_apply_immediately() {
    let sink = Arc::new(RecordingSink::default());
    let engine = engine(&sink);
    let mut registry = SampleRegistry::new();

    let buffer = registry.update("grammar.ebnf", "a b").clone();
    engine.refresh(&"grammar.ebnf", GRAMMAR, &buffer);

    assert_eq!(
        sink.last_matched(),
        vec![MatchSegment::matched(0..1), MatchSegment::matched(2..3)]
    );
    assert!(sink.unmatched_applied().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unmatched_segments_wait_for_the_debounce() {
    let sink = Arc::new(RecordingSink::default());
    let engine = engine(&sink);
    let mut registry = SampleRegistry::new();

    let buffer = registry.update("g", "a x").clone();
    engine.refresh(&"g", GRAMMAR, &buffer);
    assert_eq!(sink.last_matched(), vec![MatchSegment::matched(0..1)]);

    sleep(Duration::from_millis(999)).await;
    assert!(sink.unmatched_applied().is_empty());

    sleep(Duration::from_millis(2)).await;
    assert_eq!(
        sink.unmatched_applied(),
        vec![vec![MatchSegment::unmatched(1..3)]]
    );
}

#[tokio::test(start_paused = true)]
async fn stale_results_are_never_applied() {
    let sink = Arc::new(RecordingSink::default());
    let engine = engine(&sink);
    let mut registry = SampleRegistry::new();

    let buffer = registry.update("g", "a x").clone();
    engine.refresh(&"g", GRAMMAR, &buffer);

    sleep(Duration::from_millis(500)).await;
    registry.update("g", "a xy");

    sleep(Duration::from_millis(1500)).await;
    assert!(sink.unmatched_applied().is_empty());
}

#[tokio::test(start_paused = true)]
async fn a_new_refresh_supersedes_pending_work() {
    let sink = Arc::new(RecordingSink::default());
    let engine = engine(&sink);
    let mut registry = SampleRegistry::new();

    let first = registry.update("g", "x").clone();
    engine.refresh(&"g", GRAMMAR, &first);

    sleep(Duration::from_millis(600)).await;
    let second = registry.update("g", "a y").clone();
    engine.refresh(&"g", GRAMMAR, &second);

    sleep(Duration::from_millis(600)).await;
    assert!(sink.unmatched_applied().is_empty());

    sleep(Duration::from_millis(500)).await;
    assert_eq!(
        sink.unmatched_applied(),
        vec![vec![MatchSegment::unmatched(1..3)]]
    );
}

#[tokio::test(start_paused = true)]
async fn releasing_a_buffer_drops_pending_work() {
    let sink = Arc::new(RecordingSink::default());
    let engine = engine(&sink);
    let mut registry = SampleRegistry::new();

    let buffer = registry.update("g", "x").clone();
    engine.refresh(&"g", GRAMMAR, &buffer);
    registry.release(&"g");
    engine.forget(&"g");

    sleep(Duration::from_secs(5)).await;
    assert!(sink.unmatched_applied().is_empty());
    assert!(!engine.has_pending(&"g"));
}

#[tokio::test(start_paused = true)]
async fn keys_are_independent() {
    let sink = Arc::new(RecordingSink::default());
    let engine = engine(&sink);
    let mut registry = SampleRegistry::new();

    let one = registry.update("one", "x").clone();
    let two = registry.update("two", "y").clone();
    engine.refresh(&"one", GRAMMAR, &one);
    engine.refresh(&"two", GRAMMAR, &two);

    sleep(Duration::from_millis(1100)).await;
    let keys: Vec<&str> = sink
        .shown
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, phase, segments)| *phase == Phase::Unmatched && !segments.is_empty())
        .map(|(key, _, _)| *key)
        .collect();
    assert_eq!(keys.len(), 2);
    assert!(keys.contains(&"one") && keys.contains(&"two"));
}
