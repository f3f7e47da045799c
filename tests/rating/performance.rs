use chrono::NaiveDate;
use usab_rankings::cache::keys;
use usab_rankings::{
    DerivedCache, EventType, AgeGroup, PerformanceFilter, PerformanceRow, PlayerPerformanceFilter,
    RatingError, ScoreEntry,
};

use crate::support::{score_entries, service, service_with, unscored_store, ANA, BEN, CY};

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

fn scores(request: PlayerPerformanceFilter) -> Vec<(i64, i64)> {
    service()
        .get_player_performance(ANA, &request)
        .unwrap()
        .iter()
        .map(|p| (p.tournament_id, p.score))
        .collect()
}

#[test]
fn player_results_use_current_version_highest_first() {
    assert_eq!(
        scores(PlayerPerformanceFilter::default()),
        vec![(2, 85), (1, 45), (3, 35), (1, 25)]
    );
}

#[test]
fn explicit_score_version_changes_points_only() {
    let request = PlayerPerformanceFilter {
        score_version: Some(1),
        ..Default::default()
    };
    assert_eq!(scores(request), vec![(2, 80), (1, 40), (3, 30), (1, 20)]);
}

#[test]
fn event_filter_ignores_stored_case() {
    let request = PlayerPerformanceFilter {
        filter: PerformanceFilter::default().event_type(EventType::BS),
        score_version: None,
    };
    assert_eq!(scores(request), vec![(2, 85), (1, 45), (3, 35)]);
}

#[test]
fn date_bounds_are_inclusive() {
    let from = PlayerPerformanceFilter {
        filter: PerformanceFilter::default().min_date(date("2024-07-21")),
        score_version: None,
    };
    assert_eq!(scores(from), vec![(2, 85), (3, 35)]);

    let until = PlayerPerformanceFilter {
        filter: PerformanceFilter::default().max_date(date("2024-07-21")),
        score_version: None,
    };
    assert_eq!(scores(until), vec![(2, 85), (1, 45), (1, 25)]);
}

#[test]
fn inverted_date_range_is_empty_not_an_error() {
    let request = PlayerPerformanceFilter {
        filter: PerformanceFilter::default()
            .min_date(date("2024-12-31"))
            .max_date(date("2024-01-01")),
        score_version: None,
    };
    assert!(scores(request).is_empty());
}

#[test]
fn unknown_player_has_no_results() {
    let results = service()
        .get_player_performance(999, &PlayerPerformanceFilter::default())
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn unknown_score_version_fails_player_results() {
    let request = PlayerPerformanceFilter {
        score_version: Some(7),
        ..Default::default()
    };
    let err = service().get_player_performance(ANA, &request).unwrap_err();
    assert_eq!(err, RatingError::InvalidVersion("7".into()));
}

#[test]
fn missing_score_entry_is_a_data_fault_and_not_cached() {
    let store = unscored_store();
    for entry in score_entries(1, 0) {
        store.insert_score(entry).unwrap();
    }
    store
        .insert_performance(PerformanceRow {
            tournament_id: 3,
            tournament_player_id: 31,
            age_group: "U13".into(),
            event_type: "XD".into(),
            standing_level: "9-Consolation".into(),
        })
        .unwrap();
    let service = service_with(store.clone());

    // The faulty row is filtered out of the response but still fails scoring.
    let request = PlayerPerformanceFilter {
        filter: PerformanceFilter::default().event_type(EventType::BS),
        score_version: None,
    };
    let err = service.get_player_performance(ANA, &request).unwrap_err();
    assert!(matches!(
        err,
        RatingError::DataIntegrity { version: 1, tournament_id: 3, ref standing_level, .. }
            if standing_level == "9-Consolation"
    ));
    assert_eq!(err.status_code(), 500);
    assert_eq!(
        service
            .cache()
            .get_raw(&keys::scored_player_performances(ANA, 1))
            .unwrap(),
        None
    );

    // Once the loader adds the entry, a flush makes the player scorable.
    store
        .insert_score(ScoreEntry {
            version: 1,
            tournament_type: "Local".into(),
            age_group: "U13".into(),
            standing_level: "9-Consolation".into(),
            ranking_points: 5,
        })
        .unwrap();
    service.flush_cache().unwrap();
    let results = service
        .get_player_performance(ANA, &PlayerPerformanceFilter::default())
        .unwrap();
    assert_eq!(results.len(), 5);
    assert_eq!(results.last().map(|p| p.score), Some(5));
}

#[test]
fn tournament_results_are_ordered_by_age_event_and_standing() {
    let results = service()
        .get_tournament_performance(1, &PerformanceFilter::default())
        .unwrap();
    let order: Vec<(i64, &str, &str)> = results
        .iter()
        .map(|p| (p.tournament_player_id, p.age_group.as_str(), p.event_type.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![(13, "U11", "GS"), (11, "U13", "BS"), (12, "U13", "BS"), (11, "U13", "XD")]
    );
}

#[test]
fn tournament_results_filter_by_event_and_age() {
    let service = service();

    let singles = service
        .get_tournament_performance(1, &PerformanceFilter::default().event_type(EventType::BS))
        .unwrap();
    let ids: Vec<i64> = singles.iter().map(|p| p.usab_id).collect();
    assert_eq!(ids, vec![ANA, BEN]);

    let u11 = service
        .get_tournament_performance(1, &PerformanceFilter::default().age_group(AgeGroup::U11))
        .unwrap();
    assert_eq!(u11.len(), 1);
    assert_eq!(u11[0].usab_id, CY);

    assert!(service
        .get_tournament_performance(42, &PerformanceFilter::default())
        .unwrap()
        .is_empty());
}

#[test]
fn players_exclude_unregistered_and_sort_by_id() {
    let service = service();
    let ids: Vec<i64> = service.get_players().unwrap().iter().map(|p| p.usab_id).collect();
    assert_eq!(ids, vec![ANA, BEN, CY]);

    assert_eq!(service.get_player(BEN).unwrap().player_name, "Ben Ito");
    let err = service.get_player(0).unwrap_err();
    assert!(matches!(err, RatingError::NotFound(_)));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn tournaments_list_most_recent_first() {
    let service = service();
    let ids: Vec<i64> = service
        .get_tournaments()
        .unwrap()
        .iter()
        .map(|t| t.tournament_id)
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);

    assert_eq!(service.get_tournament(2).unwrap().tournament_name, "Summer Regional");
    assert!(matches!(service.get_tournament(9), Err(RatingError::NotFound(_))));
}

#[test]
fn tournament_players_sort_by_entry_id() {
    let players = service().get_tournament_players(1).unwrap();
    let ids: Vec<(i64, i64)> = players
        .iter()
        .map(|p| (p.tournament_player_id, p.usab_id))
        .collect();
    assert_eq!(ids, vec![(11, ANA), (12, BEN), (13, CY)]);
}
