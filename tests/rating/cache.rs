use usab_rankings::cache::keys;
use usab_rankings::{
    AgeGroup, Bracket, DerivedCache, EventType, PerformanceFilter, PerformanceRow,
    PlayerPerformanceFilter,
};

use crate::support::{service, ANA, BEN};

#[test]
fn flush_forces_recompute_with_same_result() {
    let service = service();
    let bracket = Bracket::new(EventType::BS, AgeGroup::U15);

    let before = service.get_ranks(bracket).unwrap();
    let queries = service.store().query_count();

    let dropped = service.flush_cache().unwrap();
    assert!(dropped > 0);
    assert_eq!(service.cache_stats().unwrap().entries, 0);

    let after = service.get_ranks(bracket).unwrap();
    assert_eq!(before, after);
    assert!(service.store().query_count() > queries);
}

#[test]
fn stale_values_are_served_until_flushed() {
    let service = service();
    let bracket = Bracket::new(EventType::BS, AgeGroup::U15);
    assert_eq!(service.get_ranks(bracket).unwrap()[1].total_score, 35);

    service
        .store()
        .insert_performance(PerformanceRow {
            tournament_id: 3,
            tournament_player_id: 31,
            age_group: "U11".into(),
            event_type: "BS".into(),
            standing_level: "1-Winner".into(),
        })
        .unwrap();
    assert_eq!(service.get_ranks(bracket).unwrap()[0].total_score, 165);

    service.flush_cache().unwrap();
    assert_eq!(service.get_ranks(bracket).unwrap()[0].total_score, 210);
}

#[test]
fn flush_player_drops_only_that_player() {
    let service = service();
    let request = PlayerPerformanceFilter::default();
    service.get_player_performance(ANA, &request).unwrap();
    service.get_player_performance(BEN, &request).unwrap();

    assert_eq!(service.flush_player(ANA).unwrap(), 2);
    let cache = service.cache();
    assert_eq!(cache.get_raw(&keys::player_performances(ANA)).unwrap(), None);
    assert!(cache.get_raw(&keys::player_performances(BEN)).unwrap().is_some());
}

#[test]
fn flush_tournament_drops_its_listings() {
    let service = service();
    service.get_tournament_players(1).unwrap();
    service
        .get_tournament_performance(1, &PerformanceFilter::default())
        .unwrap();
    service.get_tournament_players(2).unwrap();

    assert_eq!(service.flush_tournament(1).unwrap(), 2);
    assert_eq!(service.flush_tournament(1).unwrap(), 0);
    assert!(service
        .cache()
        .get_raw(&keys::tournament_players(2))
        .unwrap()
        .is_some());
}

#[test]
fn stats_count_hits_and_misses() {
    let service = service();
    service.get_players().unwrap();
    let cold = service.cache_stats().unwrap();
    service.get_players().unwrap();
    let warm = service.cache_stats().unwrap();

    assert_eq!(warm.entries, cold.entries);
    assert_eq!(warm.hits, cold.hits + 1);
    assert_eq!(warm.misses, cold.misses);
}

#[test]
fn warm_precomputes_every_bracket() {
    let service = service();
    assert_eq!(service.warm().unwrap(), Bracket::all().count());

    let queries = service.store().query_count();
    for bracket in Bracket::all() {
        service.get_ranks(bracket).unwrap();
    }
    service.get_players().unwrap();
    service.get_tournaments().unwrap();
    assert_eq!(service.store().query_count(), queries);
}

#[test]
fn raw_listings_are_shared_across_score_versions() {
    let service = service();
    let v1 = PlayerPerformanceFilter {
        score_version: Some(1),
        ..Default::default()
    };
    let v2 = PlayerPerformanceFilter {
        score_version: Some(2),
        ..Default::default()
    };
    service.get_player_performance(ANA, &v1).unwrap();
    let queries = service.store().query_count();
    service.get_player_performance(ANA, &v2).unwrap();
    assert_eq!(service.store().query_count(), queries);
}
