//! Whole-graph properties of the common-chord graph.

use modulation::ModulationGraph;
use notation::Key;
use pretty_assertions::assert_eq;

#[test]
fn test_every_edge_is_symmetric() {
    let graph = ModulationGraph::shared();
    for key in Key::all() {
        for (neighbor, shared) in graph.neighbors(&key) {
            let back = graph
                .neighbors(&neighbor)
                .into_iter()
                .find(|(k, _)| *k == key)
                .map(|(_, triads)| triads.to_vec());
            assert_eq!(back, Some(shared.to_vec()), "{key} <-> {neighbor}");
        }
    }
}

#[test]
fn test_every_key_reaches_the_other_33() {
    let graph = ModulationGraph::shared();
    for key in Key::all() {
        let reachable = graph.reachable(&key);
        assert_eq!(reachable.len(), 33, "from {key}");
        assert!(!reachable.contains(&key));
    }
}

#[test]
fn test_every_pair_has_a_chord_path() {
    use rand::SeedableRng;
    let graph = ModulationGraph::shared();
    let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    for start in Key::all() {
        for end in Key::all() {
            let chords = graph
                .find_chord_path(&start, &end, &mut rng)
                .unwrap()
                .unwrap_or_else(|| panic!("no path {start} -> {end}"));
            assert_eq!(chords.first().unwrap().pitches(), start.tonic_triad().voice(4));
            assert_eq!(chords.last().unwrap().pitches(), end.tonic_triad().voice(4));
        }
    }
}

#[test]
fn test_shared_triads_are_diatonic_to_an_endpoint() {
    let graph = ModulationGraph::shared();
    for edge in graph.edges() {
        let from = &graph.node(&edge.from).unwrap().triads;
        let to = &graph.node(&edge.to).unwrap().triads;
        for triad in &edge.shared {
            assert!(from.contains(triad) || to.contains(triad));
            if edge.from.tonic != edge.to.tonic {
                assert!(from.contains(triad) && to.contains(triad));
            }
        }
    }
}
