// tests/session_race.rs
//
// Dashboard orchestration against controllable providers.
//
// Covered:
// - a superseded fetch never overwrites the newer category's results
// - failures clear results and end the loading state
// - window changes filter in place without refetching
// - empty responses render the uniform empty state for every variant

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::oneshot;

use market_scout::fetch_log::FetchOutcome;
use market_scout::retrieval::providers::FixtureProvider;
use market_scout::session::RequestToken;
use market_scout::{
    Category, CategoryRegistry, Dashboard, DashboardError, OpportunityProvider, OpportunityRecord,
    RenderVariant, RetrievalError, ViewBody, WindowSelector,
};

type Reply = Result<Vec<OpportunityRecord>, RetrievalError>;

/// Each category's fetch blocks until the test releases it.
struct GatedProvider {
    gates: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
}

#[async_trait]
impl OpportunityProvider for GatedProvider {
    async fn fetch_opportunities(&self, category: &str) -> Reply {
        let rx = self.gates.lock().unwrap().remove(category);
        match rx {
            Some(rx) => rx.await.unwrap_or(Err(RetrievalError::Shape("gate dropped"))),
            None => Err(RetrievalError::Status { status: 404 }),
        }
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

/// Answers fetches from a fixed script, in order.
struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
}

#[async_trait]
impl OpportunityProvider for ScriptedProvider {
    async fn fetch_opportunities(&self, _category: &str) -> Reply {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Vec::new()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn registry() -> Arc<CategoryRegistry> {
    Arc::new(
        CategoryRegistry::new(vec![
            Category::new("PFAS", RenderVariant::Default),
            Category::new("Mining", RenderVariant::Default),
            Category::new("Company Profile", RenderVariant::Profile),
            Category::new("Industry News", RenderVariant::LinkList),
        ])
        .unwrap(),
    )
}

fn old(title: &str) -> OpportunityRecord {
    OpportunityRecord::standard(title, Some(Utc.with_ymd_and_hms(2001, 3, 4, 5, 6, 7).unwrap()))
}

async fn wait_for_token(d: &Dashboard, token: u64) {
    for _ in 0..1000 {
        if d.snapshot().latest_token() == RequestToken(token) {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("fetch {token} never started");
}

#[tokio::test]
async fn superseded_fetch_is_discarded() {
    let (pfas_tx, pfas_rx) = oneshot::channel();
    let (mining_tx, mining_rx) = oneshot::channel();
    let provider = GatedProvider {
        gates: Mutex::new(HashMap::from([
            ("PFAS".to_string(), pfas_rx),
            ("Mining".to_string(), mining_rx),
        ])),
    };
    let d = Arc::new(Dashboard::new(registry(), Arc::new(provider)));

    let slow = tokio::spawn({
        let d = d.clone();
        async move { d.select_category("PFAS").await }
    });
    wait_for_token(&d, 1).await;

    let fast = tokio::spawn({
        let d = d.clone();
        async move { d.select_category("Mining").await }
    });
    // Category switch and the new fetch each advance the token.
    wait_for_token(&d, 3).await;
    assert!(d.snapshot().is_loading());

    mining_tx.send(Ok(vec![old("mining-result")])).unwrap();
    let vm = fast.await.unwrap().unwrap();
    assert_eq!(vm.category, "Mining");
    assert!(vm.refresh_enabled);

    // The older PFAS response lands afterwards and must be ignored.
    pfas_tx.send(Ok(vec![old("pfas-late")])).unwrap();
    let late_vm = slow.await.unwrap().unwrap();
    assert_eq!(late_vm.category, "Mining");

    let s = d.snapshot();
    assert_eq!(s.category().name, "Mining");
    assert!(!s.is_loading());
    let titles: Vec<&str> = s.records().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["mining-result"]);

    let log = d.fetch_log().snapshot_last_n(10);
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].category, "Mining");
    assert!(matches!(log[0].outcome, FetchOutcome::Applied { records: 1 }));
    assert_eq!(log[1].category, "PFAS");
    assert!(matches!(log[1].outcome, FetchOutcome::Superseded));
}

#[tokio::test]
async fn failure_clears_previous_results() {
    let provider = ScriptedProvider {
        replies: Mutex::new(VecDeque::from([
            Ok(vec![old("a"), old("b")]),
            Err(RetrievalError::Status { status: 500 }),
        ])),
    };
    let d = Dashboard::new(registry(), Arc::new(provider));

    let vm = d.refresh().await;
    assert!(matches!(vm.body, ViewBody::Cards { ref cards, .. } if cards.len() == 2));

    let vm = d.refresh().await;
    assert!(vm.is_empty_state());
    let ViewBody::Empty { message, .. } = &vm.body else {
        unreachable!()
    };
    assert_eq!(message, "No opportunities found for PFAS (All Time).");

    let s = d.snapshot();
    assert!(!s.is_loading());
    assert!(s.records().is_empty());
    assert!(matches!(
        d.fetch_log().snapshot_last_n(1)[0].outcome,
        FetchOutcome::Failed { .. }
    ));
}

#[tokio::test]
async fn window_change_filters_without_refetch() {
    let provider = ScriptedProvider {
        replies: Mutex::new(VecDeque::from([Ok(vec![old("a"), old("b")])])),
    };
    let d = Dashboard::new(registry(), Arc::new(provider));
    d.refresh().await;

    let vm = d.select_window(WindowSelector::Month);
    assert_eq!(vm.window, WindowSelector::Month);
    let ViewBody::Empty { heading, message } = &vm.body else {
        panic!("expected empty state, got {:?}", vm.body);
    };
    assert_eq!(heading, "No opportunities found");
    assert_eq!(message, "No opportunities found for PFAS (This Month).");
    assert_eq!(d.snapshot().records().len(), 2);

    let vm = d.select_window(WindowSelector::All);
    let ViewBody::Cards { summary, .. } = &vm.body else {
        panic!("expected cards");
    };
    assert_eq!(summary.count, 2);
    assert_eq!(d.fetch_log().len(), 1, "window changes must not refetch");
}

#[tokio::test]
async fn empty_responses_render_uniform_empty_state() {
    let provider = FixtureProvider::new()
        .with_body("Company Profile", "[]")
        .with_body("Industry News", "null");
    let d = Dashboard::new(registry(), Arc::new(provider));

    let vm = d.select_category("Company Profile").await.unwrap();
    assert!(!vm.show_window_controls);
    let ViewBody::Empty { message, .. } = &vm.body else {
        panic!("expected empty state, got {:?}", vm.body);
    };
    assert_eq!(message, "No opportunities found for Company Profile (All Time).");

    let vm = d.select_category("Industry News").await.unwrap();
    assert!(vm.is_empty_state());
}

#[tokio::test]
async fn unknown_category_leaves_session_alone() {
    let d = Dashboard::new(registry(), Arc::new(FixtureProvider::new()));
    let err = d.select_category("Graphene").await.unwrap_err();
    assert!(matches!(err, DashboardError::UnknownCategory(ref n) if n == "Graphene"));
    assert_eq!(d.snapshot().category().name, "PFAS");
    assert!(!d.has_fetched());
}
