//! Dispatcher routing and worker pool tests.

use chrono::{TimeZone, Utc};
use ohmytime_core::reply::{GENERIC_FAILURE_TEXT, NOTHING_FOUND_TEXT, welcome_text};
use ohmytime_core::{CoreError, Dispatcher, LocalTime, local_time};
use ohmytime_protocol::{BuildInfo, InlineOption, OutgoingMessage, ParseMode, Update};
use ohmytime_test_utils::{FailingSender, RecordingSender, StubIndex, record};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const CHAT: i64 = 42;

const PARIS_REPLY: &str = "Hey \u{1F916}, local time in your location *Paris(FR)*:\n\n\
                           \u{1F4C5} *Date:* 08 Mar 2024\n\n\
                           \u{23F1}\u{FE0F} *Time:* 00:05";

fn gazetteer() -> StubIndex {
    StubIndex::new(vec![
        record("2988507", "Paris", "FR", "Europe/Paris"),
        record("4409896", "Springfield", "US", "America/Chicago"),
        record("4951788", "Springfield", "US", "America/New_York"),
        record("4780886", "Springfield", "US", "America/New_York"),
        record("2636432", "Springfield", "GB", "Europe/London"),
        record("2208791", "Springfield", "NZ", "Pacific/Auckland"),
        record("0000001", "Nowhere", "XX", "Mars/Olympus"),
    ])
}

fn dispatcher(index: Arc<StubIndex>, sender: Arc<RecordingSender>) -> Dispatcher {
    Dispatcher::new(index, sender, &BuildInfo::default())
        .with_clock(Arc::new(|| Utc.with_ymd_and_hms(2024, 3, 7, 23, 5, 42).unwrap()))
}

/// The start command replies with the welcome text and never searches.
#[tokio::test]
async fn start_command_sends_welcome() {
    let index = Arc::new(gazetteer());
    let sender = Arc::new(RecordingSender::new());

    dispatcher(index.clone(), sender.clone())
        .handle_update(Update::command(1, CHAT, "start", "/start"))
        .await;

    let messages = sender.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].chat_id, CHAT);
    assert_eq!(
        messages[0].message,
        OutgoingMessage::markdown(welcome_text(&BuildInfo::default()))
    );
    assert!(index.searches().is_empty());
    assert!(index.fetches().is_empty());
}

/// Commands other than start are ignored.
#[tokio::test]
async fn unknown_command_is_ignored() {
    let index = Arc::new(gazetteer());
    let sender = Arc::new(RecordingSender::new());

    dispatcher(index.clone(), sender.clone())
        .handle_update(Update::command(1, CHAT, "help", "/help"))
        .await;

    assert!(sender.messages().is_empty());
    assert!(index.searches().is_empty());
}

/// Without an injected clock, replies use the current wall-clock time.
#[tokio::test]
async fn default_clock_uses_current_time() {
    let index = Arc::new(gazetteer());
    let sender = Arc::new(RecordingSender::new());
    let before = local_time("Europe/Paris", Utc::now()).expect("before");

    Dispatcher::new(index, sender.clone(), &BuildInfo::default())
        .handle_update(Update::plain(1, CHAT, "Paris"))
        .await;

    let after = local_time("Europe/Paris", Utc::now()).expect("after");
    let texts = sender.texts();
    assert_eq!(texts.len(), 1);
    let matches = |local: &LocalTime| {
        texts[0].ends_with(&format!(
            "*Date:* {}\n\n\u{23F1}\u{FE0F} *Time:* {}",
            local.date, local.clock
        ))
    };
    assert!(
        matches(&before) || matches(&after),
        "unexpected reply: {}",
        texts[0]
    );
}

/// A unique hit is answered with the local time straight away.
#[tokio::test]
async fn single_hit_replies_with_local_time() {
    let index = Arc::new(gazetteer());
    let sender = Arc::new(RecordingSender::new());

    dispatcher(index, sender.clone())
        .handle_update(Update::plain(1, CHAT, "Paris"))
        .await;

    let messages = sender.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message.parse_mode, ParseMode::Markdown);
    assert_eq!(messages[0].message.text, PARIS_REPLY);
    assert_eq!(messages[0].message.options, None);
}

/// Several hits produce one prompt with rows of options.
#[tokio::test]
async fn many_hits_reply_with_candidate_rows() {
    let index = Arc::new(gazetteer());
    let sender = Arc::new(RecordingSender::new());

    dispatcher(index, sender.clone())
        .handle_update(Update::plain(1, CHAT, "Springfield"))
        .await;

    let messages = sender.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].message.text.contains("Pick a location"));
    let rows = messages[0].message.options.clone().expect("options");
    assert_eq!(
        rows,
        vec![
            vec![
                InlineOption::new("Springfield(US)", "4409896"),
                InlineOption::new("Springfield(US)", "4951788"),
                InlineOption::new("Springfield(US)", "4780886"),
            ],
            vec![
                InlineOption::new("Springfield(GB)", "2636432"),
                InlineOption::new("Springfield(NZ)", "2208791"),
            ],
        ]
    );
}

/// No hits produce the nothing-found reply.
#[tokio::test]
async fn zero_hits_reply_nothing_found() {
    let index = Arc::new(gazetteer());
    let sender = Arc::new(RecordingSender::new());

    dispatcher(index.clone(), sender.clone())
        .handle_update(Update::plain(1, CHAT, "Atlantis"))
        .await;

    assert_eq!(sender.texts(), vec![NOTHING_FOUND_TEXT.to_string()]);
    assert!(index.fetches().is_empty());
}

/// Index failures produce the generic failure reply, not nothing-found.
#[tokio::test]
async fn search_failure_replies_generic_failure() {
    let index = Arc::new(gazetteer().failing_search());
    let sender = Arc::new(RecordingSender::new());

    dispatcher(index, sender.clone())
        .handle_update(Update::plain(1, CHAT, "Paris"))
        .await;

    assert_eq!(sender.texts(), vec![GENERIC_FAILURE_TEXT.to_string()]);
}

/// An unknown timezone on the record produces the generic failure reply.
#[tokio::test]
async fn invalid_timezone_replies_generic_failure() {
    let index = Arc::new(gazetteer());
    let sender = Arc::new(RecordingSender::new());

    dispatcher(index, sender.clone())
        .handle_update(Update::plain(1, CHAT, "Nowhere"))
        .await;

    assert_eq!(sender.texts(), vec![GENERIC_FAILURE_TEXT.to_string()]);
}

/// Selecting a candidate acknowledges the callback and replies with the time.
#[tokio::test]
async fn selection_acknowledges_then_replies() {
    let index = Arc::new(gazetteer());
    let sender = Arc::new(RecordingSender::new());

    dispatcher(index, sender.clone())
        .handle_update(Update::selection(1, CHAT, "cb-1", "2988507"))
        .await;

    assert_eq!(
        sender.acknowledgements(),
        vec![("cb-1".to_string(), "2988507".to_string())]
    );
    assert_eq!(sender.texts(), vec![PARIS_REPLY.to_string()]);
}

/// An unknown token is acknowledged once and answered with the generic failure.
#[tokio::test]
async fn unknown_selection_token_replies_generic_failure() {
    let index = Arc::new(gazetteer());
    let sender = Arc::new(RecordingSender::new());

    dispatcher(index.clone(), sender.clone())
        .handle_update(Update::selection(1, CHAT, "cb-9", "999999"))
        .await;

    assert_eq!(
        sender.acknowledgements(),
        vec![("cb-9".to_string(), "999999".to_string())]
    );
    assert_eq!(index.fetches(), vec!["999999".to_string()]);
    let messages = sender.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0].message,
        OutgoingMessage::text(GENERIC_FAILURE_TEXT)
    );
}

/// A failed acknowledgement does not block the time reply.
#[tokio::test]
async fn failed_acknowledge_still_replies() {
    let index = Arc::new(gazetteer());
    let sender = Arc::new(RecordingSender::failing_acknowledge());

    dispatcher(index, sender.clone())
        .handle_update(Update::selection(1, CHAT, "cb-1", "2988507"))
        .await;

    assert_eq!(sender.acknowledgements().len(), 1);
    assert_eq!(sender.texts(), vec![PARIS_REPLY.to_string()]);
}

/// Token from a candidate list resolves to the same record on selection.
#[tokio::test]
async fn candidate_token_round_trips_through_selection() {
    let index = Arc::new(gazetteer());
    let sender = Arc::new(RecordingSender::new());
    let dispatcher = dispatcher(index, sender.clone());

    dispatcher
        .handle_update(Update::plain(1, CHAT, "Springfield"))
        .await;
    let rows = sender.messages()[0].message.options.clone().expect("options");
    let chosen = rows[1][0].clone();
    dispatcher
        .handle_update(Update::selection(2, CHAT, "cb-2", chosen.token.clone()))
        .await;

    let texts = sender.texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[1].contains(&format!("*{}*", chosen.label)));
    assert!(texts[1].contains("*Time:* 23:05"));
}

/// Delivery failures are logged only and the pool keeps draining.
#[tokio::test]
async fn send_failures_do_not_stop_workers() {
    let index = Arc::new(gazetteer());
    let sender = Arc::new(FailingSender::new());
    let dispatcher = Dispatcher::new(index, sender.clone(), &BuildInfo::default());
    let (tx, rx) = mpsc::channel(8);
    tx.send(Update::plain(1, CHAT, "Paris")).await.expect("send");
    tx.send(Update::command(2, CHAT, "start", "/start"))
        .await
        .expect("send");
    drop(tx);

    dispatcher
        .run(rx, 1, CancellationToken::new())
        .await
        .expect("run");

    assert_eq!(sender.attempts(), 2);
}

/// Every update is handled exactly once and run returns when the stream closes.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn run_drains_stream_until_closed() {
    let index = Arc::new(gazetteer());
    let sender = Arc::new(RecordingSender::new());
    let (tx, rx) = mpsc::channel(32);
    for update_id in 0..20 {
        tx.send(Update::plain(update_id, update_id, "Paris"))
            .await
            .expect("send");
    }
    drop(tx);

    dispatcher(index.clone(), sender.clone())
        .run(rx, 4, CancellationToken::new())
        .await
        .expect("run");

    let mut chats: Vec<i64> = sender.messages().iter().map(|sent| sent.chat_id).collect();
    chats.sort_unstable();
    assert_eq!(chats, (0..20).collect::<Vec<i64>>());
    assert_eq!(index.searches().len(), 20);
}

/// Cancellation waits for in-flight handlers and claims nothing new.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cancellation_waits_for_in_flight_handlers() {
    let index = Arc::new(gazetteer().with_delay(Duration::from_millis(300)));
    let sender = Arc::new(RecordingSender::new());
    let (tx, rx) = mpsc::channel(8);
    for update_id in 0..6 {
        tx.send(Update::plain(update_id, update_id, "Paris"))
            .await
            .expect("send");
    }
    let cancel = CancellationToken::new();
    let dispatcher = dispatcher(index.clone(), sender.clone());
    let run = tokio::spawn({
        let cancel = cancel.clone();
        async move { dispatcher.run(rx, 3, cancel).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(index.searches().len(), 3);
    assert!(sender.messages().is_empty());
    cancel.cancel();
    run.await.expect("join").expect("run");

    let mut chats: Vec<i64> = sender.messages().iter().map(|sent| sent.chat_id).collect();
    chats.sort_unstable();
    chats.dedup();
    assert_eq!(chats.len(), 3);
    assert_eq!(sender.messages().len(), 3);
    assert_eq!(index.searches().len(), 3);
    drop(tx);
}

/// A pool without workers is rejected.
#[tokio::test]
async fn zero_workers_is_rejected() {
    let dispatcher = Dispatcher::new(
        Arc::new(gazetteer()),
        Arc::new(RecordingSender::new()),
        &BuildInfo::default(),
    );
    let (_tx, rx) = mpsc::channel(1);

    let err = dispatcher
        .run(rx, 0, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::NoWorkers));
}
