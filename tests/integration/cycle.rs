//! Integration tests for one evaluation cycle

use std::sync::Arc;

use trendwatch::config::PartialCyclePolicy;
use trendwatch::db::StateKey;
use trendwatch::jobs::{run_cycle, CycleError};
use trendwatch::signals::decision::{ChangeDecision, SetDiff};

use crate::test_utils::{
    coins, context, downtrend, settings, uptrend, FakeCandleSource, RecordingNotifier,
    RecordingStore,
};

#[tokio::test]
async fn first_cycle_records_state_silently() {
    let source = Arc::new(
        FakeCandleSource::new()
            .with_coin("BTC", downtrend(60))
            .with_coin("ETH", uptrend(60)),
    );
    let notifier = Arc::new(RecordingNotifier::new());
    let store = Arc::new(RecordingStore::new());
    let ctx = context(
        source,
        notifier.clone(),
        store.clone(),
        settings(&["BTC", "ETH"], PartialCyclePolicy::Proceed),
    );

    let report = run_cycle(&ctx).await.expect("cycle succeeds");

    assert_eq!(report.qualifying_change, ChangeDecision::Bootstrap);
    assert_eq!(report.universe_change, ChangeDecision::Bootstrap);
    assert!(notifier.messages().is_empty());
    assert_eq!(store.get(StateKey::QualifyingCoins), Some(coins(&["BTC"])));
    assert_eq!(store.get(StateKey::CoinUniverse), Some(coins(&["BTC", "ETH"])));
    assert!(store.log().is_empty());
}

#[tokio::test]
async fn repeated_cycle_without_market_change_is_silent() {
    let source = Arc::new(
        FakeCandleSource::new()
            .with_coin("BTC", downtrend(60))
            .with_coin("ETH", uptrend(60)),
    );
    let notifier = Arc::new(RecordingNotifier::new());
    let store = Arc::new(RecordingStore::seeded(
        StateKey::QualifyingCoins,
        coins(&["ETH"]),
    ));
    store.seed(StateKey::CoinUniverse, coins(&["BTC", "ETH"]));
    let ctx = context(
        source,
        notifier.clone(),
        store.clone(),
        settings(&["BTC", "ETH"], PartialCyclePolicy::Proceed),
    );

    let first = run_cycle(&ctx).await.unwrap();
    let second = run_cycle(&ctx).await.unwrap();

    assert!(first.change_notified);
    assert_eq!(second.qualifying_change, ChangeDecision::Unchanged);
    assert_eq!(notifier.messages().len(), 1);

    let saves = store.saves();
    assert_eq!(saves.len(), 4);
    assert_eq!(saves[0], saves[2]);
    assert_eq!(saves[1], saves[3]);
}

#[tokio::test]
async fn removal_produces_one_message_with_remaining_alerts() {
    let source = Arc::new(
        FakeCandleSource::new()
            .with_coin("BTC", downtrend(60))
            .with_coin("ETH", uptrend(60)),
    );
    let notifier = Arc::new(RecordingNotifier::new());
    let store = Arc::new(RecordingStore::seeded(
        StateKey::QualifyingCoins,
        coins(&["BTC", "ETH"]),
    ));
    store.seed(StateKey::CoinUniverse, coins(&["BTC", "ETH"]));
    let ctx = context(
        source,
        notifier.clone(),
        store.clone(),
        settings(&["BTC", "ETH"], PartialCyclePolicy::Proceed),
    );

    let report = run_cycle(&ctx).await.unwrap();

    assert_eq!(
        report.qualifying_change,
        ChangeDecision::Changed(SetDiff {
            added: vec![],
            removed: vec!["ETH".to_string()],
        })
    );

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    let message = &messages[0];
    assert!(message.starts_with("🔻 MA(7) < MA(25) 1H (TEST)"));
    assert!(message.contains("➖ Removed: ETH"));
    assert!(!message.contains("➕ Added"));
    assert!(message.contains("Total: 1"));
    assert!(message.contains("\nBTC (15.10 00:00|36h)"));

    assert_eq!(store.get(StateKey::QualifyingCoins), Some(coins(&["BTC"])));
    let log = store.log();
    assert_eq!(log.len(), 1);
    assert!(log[0].text.starts_with("BTC ("));
}

#[tokio::test]
async fn losing_every_coin_reports_zero_total() {
    let source = Arc::new(FakeCandleSource::new().with_coin("BTC", uptrend(60)));
    let notifier = Arc::new(RecordingNotifier::new());
    let store = Arc::new(RecordingStore::seeded(
        StateKey::QualifyingCoins,
        coins(&["BTC"]),
    ));
    store.seed(StateKey::CoinUniverse, coins(&["BTC"]));
    let ctx = context(
        source,
        notifier.clone(),
        store.clone(),
        settings(&["BTC"], PartialCyclePolicy::Proceed),
    );

    let report = run_cycle(&ctx).await.unwrap();

    assert!(report.qualifying.is_empty());
    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("➖ Removed: BTC"));
    assert!(messages[0].ends_with("Total: 0"));
    assert_eq!(store.get(StateKey::QualifyingCoins), Some(coins(&[])));
    assert!(store.log().is_empty());
}

#[tokio::test]
async fn unlisted_and_empty_symbols_are_skipped() {
    let source = Arc::new(
        FakeCandleSource::new()
            .with_coin("BTC", downtrend(60))
            .with_coin("SEI", vec![]),
    );
    let notifier = Arc::new(RecordingNotifier::new());
    let store = Arc::new(RecordingStore::new());
    let ctx = context(
        source.clone(),
        notifier,
        store,
        settings(&["BTC", "XYZ", "SEI"], PartialCyclePolicy::Proceed),
    );

    let report = run_cycle(&ctx).await.unwrap();

    assert_eq!(report.checked, 1);
    assert_eq!(report.skipped, vec!["XYZ".to_string(), "SEI".to_string()]);
    assert!(report.failed.is_empty());
    assert_eq!(source.fetches(), vec!["BTC_USDT", "SEI_USDT"]);
    assert_eq!(report.qualifying, coins(&["BTC"]));
}

#[tokio::test]
async fn failed_fetch_is_skipped_under_proceed() {
    let source = Arc::new(
        FakeCandleSource::new()
            .with_failing_coin("BTC")
            .with_coin("ETH", downtrend(60)),
    );
    let notifier = Arc::new(RecordingNotifier::new());
    let store = Arc::new(RecordingStore::seeded(
        StateKey::QualifyingCoins,
        coins(&["SEI"]),
    ));
    store.seed(StateKey::CoinUniverse, coins(&["BTC", "ETH"]));
    let ctx = context(
        source,
        notifier.clone(),
        store.clone(),
        settings(&["BTC", "ETH"], PartialCyclePolicy::Proceed),
    );

    let report = run_cycle(&ctx).await.unwrap();

    assert_eq!(report.failed, vec!["BTC".to_string()]);
    assert_eq!(report.qualifying, coins(&["ETH"]));
    assert_eq!(notifier.messages().len(), 1);
    assert!(notifier.messages()[0].contains("➕ Added: ETH"));
    assert!(notifier.messages()[0].contains("➖ Removed: SEI"));
    assert_eq!(store.get(StateKey::QualifyingCoins), Some(coins(&["ETH"])));
}

#[tokio::test]
async fn failed_fetch_aborts_without_persisting_under_abort() {
    let source = Arc::new(
        FakeCandleSource::new()
            .with_coin("ETH", downtrend(60))
            .with_failing_coin("BTC"),
    );
    let notifier = Arc::new(RecordingNotifier::new());
    let store = Arc::new(RecordingStore::seeded(
        StateKey::QualifyingCoins,
        coins(&["SEI"]),
    ));
    let ctx = context(
        source,
        notifier.clone(),
        store.clone(),
        settings(&["ETH", "BTC"], PartialCyclePolicy::Abort),
    );

    let err = run_cycle(&ctx).await.unwrap_err();

    match err {
        CycleError::SymbolFetch { symbol, .. } => assert_eq!(symbol, "BTC_USDT"),
        other => panic!("expected symbol fetch error, got {}", other),
    }
    assert!(notifier.messages().is_empty());
    assert!(store.saves().is_empty());
    assert_eq!(store.get(StateKey::QualifyingCoins), Some(coins(&["SEI"])));
}

#[tokio::test]
async fn universe_failure_persists_nothing() {
    let source = Arc::new(FakeCandleSource::new().with_coin("BTC", downtrend(60)));
    source.fail_universe(true);
    let store = Arc::new(RecordingStore::new());
    let ctx = context(
        source.clone(),
        Arc::new(RecordingNotifier::new()),
        store.clone(),
        settings(&["BTC"], PartialCyclePolicy::Proceed),
    );

    let err = run_cycle(&ctx).await.unwrap_err();

    assert!(matches!(err, CycleError::Universe(_)));
    assert!(source.fetches().is_empty());
    assert!(store.saves().is_empty());
}

#[tokio::test]
async fn universe_change_sends_separate_message() {
    let source = Arc::new(
        FakeCandleSource::new()
            .with_coin("BTC", downtrend(60))
            .with_coin("SEI", uptrend(60)),
    );
    let notifier = Arc::new(RecordingNotifier::new());
    let store = Arc::new(RecordingStore::seeded(
        StateKey::QualifyingCoins,
        coins(&["BTC"]),
    ));
    store.seed(StateKey::CoinUniverse, coins(&["BTC", "MKR"]));
    let ctx = context(
        source,
        notifier.clone(),
        store.clone(),
        settings(&["BTC", "SEI"], PartialCyclePolicy::Proceed),
    );

    let report = run_cycle(&ctx).await.unwrap();

    assert_eq!(report.qualifying_change, ChangeDecision::Unchanged);
    assert_eq!(
        notifier.messages(),
        vec!["📋 Coin list changed\n➕ Added: SEI\n➖ Removed: MKR\nTotal: 2".to_string()]
    );
    assert_eq!(store.get(StateKey::CoinUniverse), Some(coins(&["BTC", "SEI"])));
}

#[tokio::test]
async fn undelivered_change_is_not_logged() {
    let source = Arc::new(FakeCandleSource::new().with_coin("BTC", downtrend(60)));
    let notifier = Arc::new(RecordingNotifier::failing());
    let store = Arc::new(RecordingStore::seeded(
        StateKey::QualifyingCoins,
        coins(&["SEI"]),
    ));
    store.seed(StateKey::CoinUniverse, coins(&["BTC"]));
    let ctx = context(
        source,
        notifier.clone(),
        store.clone(),
        settings(&["BTC"], PartialCyclePolicy::Proceed),
    );

    let report = run_cycle(&ctx).await.unwrap();

    assert!(report.qualifying_change.should_notify());
    assert!(!report.change_notified);
    assert_eq!(notifier.messages().len(), 1);
    assert!(store.log().is_empty());
    assert_eq!(store.get(StateKey::QualifyingCoins), Some(coins(&["BTC"])));
}

#[tokio::test]
async fn empty_previous_set_records_silently() {
    let source = Arc::new(FakeCandleSource::new().with_coin("BTC", downtrend(60)));
    let notifier = Arc::new(RecordingNotifier::new());
    let store = Arc::new(RecordingStore::seeded(StateKey::QualifyingCoins, coins(&[])));
    store.seed(StateKey::CoinUniverse, coins(&["BTC"]));
    let ctx = context(
        source,
        notifier.clone(),
        store.clone(),
        settings(&["BTC"], PartialCyclePolicy::Proceed),
    );

    let report = run_cycle(&ctx).await.unwrap();

    assert_eq!(report.qualifying_change, ChangeDecision::Bootstrap);
    assert!(!report.change_notified);
    assert!(notifier.messages().is_empty());
    assert_eq!(store.get(StateKey::QualifyingCoins), Some(coins(&["BTC"])));
    assert!(store.log().is_empty());
}

#[tokio::test]
async fn coin_list_save_failure_keeps_cycle_alive() {
    let source = Arc::new(
        FakeCandleSource::new()
            .with_coin("BTC", downtrend(60))
            .with_coin("ETH", uptrend(60)),
    );
    let notifier = Arc::new(RecordingNotifier::new());
    let store = Arc::new(RecordingStore::seeded(
        StateKey::QualifyingCoins,
        coins(&["ETH"]),
    ));
    store.seed(StateKey::CoinUniverse, coins(&["BTC"]));
    store.fail_saves_for(StateKey::CoinUniverse);
    let ctx = context(
        source,
        notifier.clone(),
        store.clone(),
        settings(&["BTC", "ETH"], PartialCyclePolicy::Proceed),
    );

    let report = run_cycle(&ctx).await.expect("coin list save failure is not fatal");

    assert!(report.change_notified);
    assert_eq!(notifier.messages().len(), 2);
    assert_eq!(store.get(StateKey::QualifyingCoins), Some(coins(&["BTC"])));
    assert_eq!(store.get(StateKey::CoinUniverse), Some(coins(&["BTC"])));
    assert_eq!(store.log().len(), 1);
}

#[tokio::test]
async fn qualifying_save_failure_fails_cycle() {
    let source = Arc::new(FakeCandleSource::new().with_coin("BTC", downtrend(60)));
    let store = Arc::new(RecordingStore::new());
    store.fail_saves_for(StateKey::QualifyingCoins);
    let ctx = context(
        source,
        Arc::new(RecordingNotifier::new()),
        store.clone(),
        settings(&["BTC"], PartialCyclePolicy::Proceed),
    );

    let err = run_cycle(&ctx).await.unwrap_err();

    assert!(matches!(err, CycleError::State(_)));
    assert!(store.saves().is_empty());
}
