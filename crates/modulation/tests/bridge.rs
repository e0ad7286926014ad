//! Chord bridges between keys, end to end.

use modulation::{ModulationGraph, CHORD_BEATS};
use notation::{Key, Rational32};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn key(s: &str) -> Key {
    s.parse().unwrap()
}

#[test]
fn test_c_major_to_a_minor_is_direct() {
    let graph = ModulationGraph::shared();
    assert_eq!(
        graph.find_key_path(&key("c major"), &key("a minor")).unwrap(),
        Some(vec![key("c major"), key("a minor")])
    );

    let mut rng = StdRng::seed_from_u64(2024);
    let chords = graph
        .find_chord_path(&key("c major"), &key("a minor"), &mut rng)
        .unwrap()
        .unwrap();

    // start tonic, then vii°7 and tonic of A minor with no pivot between
    assert_eq!(chords.len(), 3);
    assert_eq!(chords[0].key(), &key("c major"));
    assert_eq!(chords[0].pitches(), key("c major").tonic_triad().voice(4));
    assert_eq!(chords[1].key(), &key("a minor"));
    assert_eq!(chords[1].pitches().len(), 4);
    assert_eq!(chords[2].key(), &key("a minor"));
    assert_eq!(chords[2].pitches(), key("a minor").tonic_triad().voice(4));
}

#[test]
fn test_bridge_packs_into_four_four() {
    let graph = ModulationGraph::shared();
    let mut rng = StdRng::seed_from_u64(5);
    let measures = graph
        .bridge(&key("c major"), &key("e- minor"), 4, &mut rng)
        .unwrap()
        .unwrap();

    // 9 chords: 8 in pairs plus a closing measure
    assert_eq!(measures.len(), 5);
    for (i, measure) in measures.iter().enumerate() {
        for element in measure {
            assert_eq!(element.measure_number(), Some(i as u32 + 1));
            assert_eq!(element.time_signature(), Some(4));
        }
    }
    for measure in &measures[..4] {
        let offsets: Vec<Rational32> = measure.iter().map(|e| e.beat_offset()).collect();
        assert_eq!(offsets, vec![Rational32::from_integer(1), Rational32::from_integer(3)]);
        assert!(measure
            .iter()
            .all(|e| e.duration() == Rational32::from_integer(CHORD_BEATS)));
    }
    let closing = &measures[4];
    assert_eq!(closing.len(), 1);
    assert_eq!(closing[0].duration(), Rational32::from_integer(4));
    assert_eq!(closing[0].key(), &key("e- minor"));
}

#[test]
fn test_same_seed_same_bridge() {
    let graph = ModulationGraph::shared();
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        graph
            .find_chord_path(&key("f major"), &key("b major"), &mut rng)
            .unwrap()
    };
    assert_eq!(run(9), run(9));
}
