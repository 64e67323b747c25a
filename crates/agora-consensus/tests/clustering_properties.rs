use std::collections::BTreeSet;

use agora_consensus::{ClusterConfig, ConsensusAnalyzer, VoteEvent, VoteMatrix};
use proptest::prelude::*;

/// Random sparse deliberations: up to 30 participants, 8 statements.
fn arb_events() -> impl Strategy<Value = Vec<VoteEvent>> {
    prop::collection::vec((0usize..30, 0usize..8, -1i64..=1), 1..200).prop_map(|rows| {
        rows.into_iter()
            .map(|(p, s, v)| VoteEvent::raw(format!("p{:02}", p), format!("s{}", s), v))
            .collect()
    })
}

fn arb_config() -> impl Strategy<Value = ClusterConfig> {
    prop_oneof![
        Just(ClusterConfig::default()),
        (1usize..8).prop_map(|k| ClusterConfig::default().with_fixed_count(k)),
    ]
}

proptest! {
    #[test]
    fn clusters_partition_participants(events in arb_events(), config in arb_config()) {
        let matrix = VoteMatrix::from_events(&events).unwrap();
        let result = ConsensusAnalyzer::new(config).analyze(&matrix);

        let expected: BTreeSet<&str> = matrix.participants().iter().map(String::as_str).collect();
        let mut seen = BTreeSet::new();
        for cluster in &result.clusters {
            prop_assert_eq!(cluster.member_count, cluster.member_ids.len());
            prop_assert!(!cluster.member_ids.is_empty());
            for member in &cluster.member_ids {
                prop_assert!(seen.insert(member.as_str()), "{} in two clusters", member);
            }
        }
        prop_assert_eq!(seen, expected);
        prop_assert_eq!(result.cluster_count, result.clusters.len());
        prop_assert_eq!(
            result.cluster_count,
            config.count.resolve(matrix.participant_count())
        );
    }

    #[test]
    fn ratios_stay_in_unit_interval(events in arb_events()) {
        let result = ConsensusAnalyzer::default().analyze_events(&events).unwrap();
        for s in &result.statements {
            prop_assert!((0.0..=1.0).contains(&s.agreement_ratio));
            prop_assert!((0.0..=1.0).contains(&s.divisiveness));
            prop_assert_eq!(s.total_votes, s.agree_count + s.disagree_count + s.pass_count);
        }
        for c in &result.clusters {
            prop_assert!((0.0..=1.0).contains(&c.avg_agreement));
        }
    }

    #[test]
    fn analysis_is_deterministic(events in arb_events()) {
        let analyzer = ConsensusAnalyzer::default();
        let first = analyzer.analyze_events(&events).unwrap();
        let second = analyzer.analyze_events(&events).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn duplicate_opinions_still_yield_k_clusters(agree in 3usize..20, disagree in 1usize..10, k in 1usize..5) {
        let events: Vec<VoteEvent> = (0..agree + disagree)
            .map(|p| VoteEvent::raw(format!("p{:02}", p), "s1", if p < agree { 1 } else { -1 }))
            .collect();
        let config = ClusterConfig::default().with_fixed_count(k);
        let result = ConsensusAnalyzer::new(config).analyze_events(&events).unwrap();
        prop_assert_eq!(result.cluster_count, k);
        prop_assert_eq!(result.total_participants, agree + disagree);
    }

    #[test]
    fn out_of_range_values_rejected(value in prop_oneof![i64::MIN..-1, 2i64..i64::MAX]) {
        let events = vec![VoteEvent::raw("p", "s", value)];
        prop_assert!(VoteMatrix::from_events(&events).is_err());
    }
}
