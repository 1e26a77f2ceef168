use srpg_notifier::config::RankFilter;
use srpg_notifier::leaderboard::RawRow;
use srpg_notifier::snapshot::{RankedPlayer, build_snapshot};

fn raw(id: &str, name: &str, region: &str, score: i64) -> RawRow {
    vec![
        "0".to_string(),
        name.to_string(),
        "x".to_string(),
        "eu".to_string(),
        region.to_string(),
        score.to_string(),
        "0".to_string(),
        "0".to_string(),
        id.to_string(),
    ]
}

fn everyone() -> RankFilter {
    RankFilter::new(Vec::<&str>::new(), ["fi", "se", "no"])
}

fn ids(snapshot: &[RankedPlayer]) -> Vec<&str> {
    snapshot.iter().map(|p| p.id.as_str()).collect()
}

#[test]
fn world_ranks_are_dense_and_descending() {
    let rows = vec![
        raw("a", "A", "fi", 10),
        raw("b", "B", "se", 50),
        raw("c", "C", "no", 30),
        raw("d", "D", "fi", 40),
    ];
    let snapshot = build_snapshot(&rows, &everyone()).expect("valid rows");

    assert_eq!(ids(&snapshot), vec!["b", "d", "c", "a"]);
    let world: Vec<u32> = snapshot.iter().map(|p| p.world_rank).collect();
    assert_eq!(world, vec![1, 2, 3, 4]);
    assert!(snapshot.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn ties_keep_source_order() {
    let rows = vec![
        raw("first", "First", "fi", 100),
        raw("top", "Top", "fi", 200),
        raw("second", "Second", "fi", 100),
        raw("third", "Third", "fi", 100),
    ];
    let snapshot = build_snapshot(&rows, &everyone()).expect("valid rows");
    assert_eq!(ids(&snapshot), vec!["top", "first", "second", "third"]);
}

#[test]
fn local_ranks_count_survivors_only() {
    let rows = vec![
        raw("us1", "Yank", "us", 500),
        raw("fi1", "Aino", "fi", 400),
        raw("bot", "RankBot", "fi", 350),
        raw("de1", "Hans", "de", 300),
        raw("fi2", "Eino", "FI", 200),
    ];
    let filter = RankFilter::new(["rankbot"], ["fi"]);
    let snapshot = build_snapshot(&rows, &filter).expect("valid rows");

    let summary: Vec<(&str, u32, u32)> = snapshot
        .iter()
        .map(|p| (p.id.as_str(), p.world_rank, p.local_rank))
        .collect();
    assert_eq!(summary, vec![("fi1", 2, 1), ("fi2", 5, 2)]);
}

#[test]
fn ignore_list_is_case_insensitive() {
    let rows = vec![raw("a", "SomeBot", "fi", 10), raw("b", "Person", "fi", 5)];
    let filter = RankFilter::new(["SOMEBOT"], ["fi"]);
    let snapshot = build_snapshot(&rows, &filter).expect("valid rows");
    assert_eq!(ids(&snapshot), vec!["b"]);
    assert_eq!(snapshot[0].world_rank, 2);
    assert_eq!(snapshot[0].local_rank, 1);
}

#[test]
fn no_survivors_yields_empty_snapshot() {
    let rows = vec![raw("a", "A", "us", 10), raw("b", "B", "de", 5)];
    let snapshot = build_snapshot(&rows, &RankFilter::new(Vec::<&str>::new(), ["fi"]))
        .expect("valid rows");
    assert!(snapshot.is_empty());
}

#[test]
fn empty_region_list_admits_nobody() {
    let rows = vec![raw("a", "A", "fi", 10)];
    let snapshot = build_snapshot(&rows, &RankFilter::default()).expect("valid rows");
    assert!(snapshot.is_empty());
}

#[test]
fn two_finnish_players_rank_in_score_order() {
    let rows = vec![raw("p1", "Alice", "fi", 1000), raw("p2", "Bob", "fi", 900)];
    let snapshot = build_snapshot(&rows, &RankFilter::new(Vec::<&str>::new(), ["fi"]))
        .expect("valid rows");
    assert_eq!(
        snapshot,
        vec![
            RankedPlayer {
                id: "p1".to_string(),
                name: "Alice".to_string(),
                region: "fi".to_string(),
                score: 1000,
                world_rank: 1,
                local_rank: 1,
            },
            RankedPlayer {
                id: "p2".to_string(),
                name: "Bob".to_string(),
                region: "fi".to_string(),
                score: 900,
                world_rank: 2,
                local_rank: 2,
            },
        ]
    );
}
