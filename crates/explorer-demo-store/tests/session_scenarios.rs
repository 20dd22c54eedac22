//! End-to-end flows through `DemoSession`.

use chrono::NaiveDate;
use explorer_demo_core::url::{DEMO_SEARCH_PREFIX, percent_encode_component};
use explorer_demo_core::{
    Collection, Config, MediaSource, NormalizeDefaults, NoticeLevel, Reference, ReferenceKind,
    SampleCatalog, builtin_default_collections,
};
use explorer_demo_store::{
    DemoSession, LookupRequest, LookupStatus, NavigateOutcome, StaticLookupService, plan_lookups,
};
use futures::executor::block_on;

fn defaults() -> NormalizeDefaults {
    NormalizeDefaults::at(
        NaiveDate::from_ymd_opt(2017, 3, 15).unwrap(),
        &Config::default(),
    )
}

fn search_path(json: &str) -> String {
    format!("{DEMO_SEARCH_PREFIX}{}", percent_encode_component(json))
}

fn fixtures() -> StaticLookupService {
    StaticLookupService::from_json_str(
        r#"{
            "sources": [{"media_id": 5, "name": "Example Daily"}],
            "collections": [{"tags_id": 9, "label": "Example Collection"}]
        }"#,
    )
    .unwrap()
}

#[test]
fn mixed_references_resolve_per_field() {
    let mut session = DemoSession::new(Config::default(), SampleCatalog::default());
    let path = search_path(
        r#"[{"index":0,"q":"a","sources":[{"media_id":5}]},{"index":1,"q":"b","collections":[{"tags_id":9}]}]"#,
    );
    let outcome = session.navigate_with(&path, &defaults()).unwrap();
    assert_eq!(outcome, NavigateOutcome::Loaded { count: 2 });

    let plan = plan_lookups(session.state());
    let generation = session.state().generation;
    assert_eq!(
        plan,
        vec![
            LookupRequest {
                generation,
                index: 0,
                kind: ReferenceKind::Sources,
                ids: vec![5],
            },
            LookupRequest {
                generation,
                index: 1,
                kind: ReferenceKind::Collections,
                ids: vec![9],
            },
        ]
    );

    let summary = block_on(session.resolve(&fixtures()));
    assert_eq!(summary.issued, 2);
    assert_eq!(summary.resolved, 2);

    let state = session.state();
    assert_eq!(state.lookup_status(), LookupStatus::Succeeded);
    let first = state.query(0).unwrap();
    assert_eq!(
        first.sources,
        vec![Reference::Resolved(MediaSource {
            media_id: 5,
            name: "Example Daily".into(),
            url: None,
        })]
    );
    assert_eq!(first.collections, builtin_default_collections());
    assert_eq!(first.q, "a");

    let second = state.query(1).unwrap();
    assert!(second.sources.is_empty());
    assert_eq!(
        second.collections,
        vec![Reference::Resolved(Collection {
            tags_id: 9,
            label: "Example Collection".into(),
            description: None,
        })]
    );
    assert_eq!(second.label, "b");

    assert_eq!(state.selected.as_ref(), Some(first));
}

#[test]
fn malformed_url_yields_single_notice_and_no_queries() {
    let mut session = DemoSession::new(Config::default(), SampleCatalog::default());
    let rx = session.subscribe();
    let result = session.navigate_with("#/queries/demo/search/not-json", &defaults());
    assert!(result.is_err());

    let state = session.state();
    assert!(state.queries.is_empty());
    assert_eq!(state.notices.len(), 1);
    assert_eq!(state.notices[0].level, NoticeLevel::Error);

    let published: Vec<_> = rx.try_iter().collect();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].notices.len(), 1);
}

#[test]
fn configured_default_collection_is_looked_up() {
    let config = Config {
        default_collection_ids: vec![9],
        ..Config::default()
    };
    let mut session = DemoSession::new(config.clone(), SampleCatalog::default());
    let defaults = NormalizeDefaults::at(NaiveDate::from_ymd_opt(2017, 3, 15).unwrap(), &config);
    session
        .navigate_with(&search_path(r#"[{"q":"climate"}]"#), &defaults)
        .unwrap();
    assert_eq!(session.state().lookup_status(), LookupStatus::Succeeded);
    assert_eq!(plan_lookups(session.state()).len(), 1);

    block_on(session.resolve(&fixtures()));
    let query = session.state().query(0).unwrap();
    assert_eq!(query.collections[0].resolved().unwrap().label, "Example Collection");
}

#[test]
fn subscribers_observe_resolution_progress() {
    let mut session = DemoSession::new(Config::default(), SampleCatalog::default());
    session
        .navigate_with(
            &search_path(r#"[{"q":"a","sources":[5]},{"q":"b","sources":[5]}]"#),
            &defaults(),
        )
        .unwrap();
    let rx = session.subscribe();
    block_on(session.resolve(&fixtures()));

    let statuses: Vec<_> = rx.try_iter().map(|s| s.lookup_status()).collect();
    assert_eq!(statuses.first(), Some(&LookupStatus::Pending));
    assert_eq!(statuses.last(), Some(&LookupStatus::Succeeded));
    // Started, two merges, then the selection.
    assert_eq!(statuses.len(), 4);
}
