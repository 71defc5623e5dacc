//! Command routing and disambiguation flow integration tests
//! Run with: cargo test --test router_test

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use fetchbot::application::errors::FetchError;
use fetchbot::application::messaging::{ChatState, MessageParser, Reply, Router};
use fetchbot::application::texts;
use fetchbot::domain::entities::{BreedCatalog, Message};
use fetchbot::domain::traits::{BreedImageSource, FailureLog, ImageTarget};

/// What the stub source answers with.
#[derive(Clone)]
enum Outcome {
    Url(String),
    NotFound,
    Upstream(u16),
}

/// Image source stub that records every call.
struct StubSource {
    calls: Arc<Mutex<Vec<ImageTarget>>>,
    outcome: Outcome,
}

#[async_trait]
impl BreedImageSource for StubSource {
    async fn random_image(&self, target: &ImageTarget) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(target.clone());
        match &self.outcome {
            Outcome::Url(url) => Ok(url.clone()),
            Outcome::NotFound => Err(FetchError::NotFound),
            Outcome::Upstream(status) => Err(FetchError::Upstream { status: *status }),
        }
    }
}

/// Failure log stub that records every line.
struct RecordingLog {
    records: Arc<Mutex<Vec<(String, u16)>>>,
}

impl FailureLog for RecordingLog {
    fn record(&self, message_text: &str, status: u16) {
        self.records
            .lock()
            .unwrap()
            .push((message_text.to_string(), status));
    }
}

fn catalog() -> BreedCatalog {
    BreedCatalog::new(vec![
        ("terrier".to_string(), vec!["toy".to_string(), "yorkshire".to_string()]),
        ("shiba".to_string(), vec![]),
        ("bulldog".to_string(), vec!["english".to_string()]),
        (
            "poodle".to_string(),
            vec!["miniature".to_string(), "standard".to_string(), "toy".to_string()],
        ),
    ])
}

struct Harness {
    router: Router<StubSource>,
    calls: Arc<Mutex<Vec<ImageTarget>>>,
    records: Arc<Mutex<Vec<(String, u16)>>>,
    parser: MessageParser,
}

impl Harness {
    fn new(outcome: Outcome) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let records = Arc::new(Mutex::new(Vec::new()));
        let source = StubSource {
            calls: calls.clone(),
            outcome,
        };
        let log = RecordingLog {
            records: records.clone(),
        };
        Self {
            router: Router::new(catalog(), source, Box::new(log)),
            calls,
            records,
            parser: MessageParser::new("/"),
        }
    }

    fn message(&self, text: &str) -> Message {
        self.parser.parse("chat-1", text, None)
    }

    async fn send(&mut self, text: &str) -> Reply {
        let msg = self.message(text);
        self.router.handle(&msg).await
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn last_target(&self) -> Option<ImageTarget> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[tokio::test]
async fn start_and_help_reply_with_static_texts_and_no_fetch() {
    let mut h = Harness::new(Outcome::Url("https://img/1.jpg".to_string()));

    assert_eq!(h.send("/start").await, Reply::Text(texts::WELCOME.to_string()));
    assert_eq!(h.send("/help").await, Reply::Text(texts::HELP.to_string()));
    assert_eq!(h.call_count(), 0);
}

#[tokio::test]
async fn dog_fetches_any_breed() {
    let mut h = Harness::new(Outcome::Url("https://img/dog.jpg".to_string()));

    let reply = h.send("/dog").await;
    assert_eq!(reply, Reply::Photo("https://img/dog.jpg".to_string()));
    assert_eq!(h.call_count(), 1);
    assert_eq!(h.last_target(), Some(ImageTarget::Any));
}

#[tokio::test]
async fn all_renders_listing_without_fetching() {
    let mut h = Harness::new(Outcome::Url("https://img/dog.jpg".to_string()));

    let Reply::Text(listing) = h.send("/all").await else {
        panic!("expected text listing");
    };
    assert!(listing.contains("terrier"));
    assert!(listing.contains("   toy terrier"));
    assert!(listing.contains("   english bulldog"));
    assert_eq!(h.call_count(), 0);
}

#[tokio::test]
async fn breed_with_multiple_subs_prompts_and_never_fetches() {
    let mut h = Harness::new(Outcome::Url("https://img/dog.jpg".to_string()));

    let Reply::Keyboard { text, rows } = h.send("/breed terrier").await else {
        panic!("expected keyboard prompt");
    };
    assert_eq!(text, texts::SELECT_SUB_BREED);

    let labels: Vec<String> = rows
        .iter()
        .flatten()
        .map(|b| b.text.clone())
        .collect();
    assert_eq!(labels, vec!["toy terrier", "yorkshire terrier"]);
    assert_eq!(h.call_count(), 0);
    assert_eq!(
        h.router.chat_state("chat-1"),
        ChatState::AwaitingSubBreedChoice {
            breed: "terrier".to_string()
        }
    );
}

#[tokio::test]
async fn choice_count_matches_sub_breed_count_and_rows_hold_two() {
    let mut h = Harness::new(Outcome::Url("https://img/dog.jpg".to_string()));

    let Reply::Keyboard { rows, .. } = h.send("/breed poodle").await else {
        panic!("expected keyboard prompt");
    };
    let total: usize = rows.iter().map(|r| r.len()).sum();
    assert_eq!(total, 3);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].len(), 2);
    assert_eq!(rows[1].len(), 1);
}

#[tokio::test]
async fn breed_with_single_sub_fetches_the_breed_itself() {
    let mut h = Harness::new(Outcome::Url("https://img/bulldog.jpg".to_string()));

    let reply = h.send("/breed bulldog").await;
    assert_eq!(reply, Reply::Photo("https://img/bulldog.jpg".to_string()));
    assert_eq!(h.last_target(), Some(ImageTarget::Breed("bulldog".to_string())));
}

#[tokio::test]
async fn breed_without_subs_fetches_directly() {
    let mut h = Harness::new(Outcome::Url("https://img/shiba.jpg".to_string()));

    let reply = h.send("/breed shiba").await;
    assert_eq!(reply, Reply::Photo("https://img/shiba.jpg".to_string()));
    assert_eq!(h.last_target(), Some(ImageTarget::Breed("shiba".to_string())));
}

#[tokio::test]
async fn breed_argument_is_lowercased_before_lookup() {
    let mut h = Harness::new(Outcome::Url("https://img/shiba.jpg".to_string()));

    let reply = h.send("/breed SHIBA").await;
    assert_eq!(reply, Reply::Photo("https://img/shiba.jpg".to_string()));
    assert_eq!(h.last_target(), Some(ImageTarget::Breed("shiba".to_string())));
}

#[tokio::test]
async fn unknown_breed_is_not_found_with_zero_fetches() {
    let mut h = Harness::new(Outcome::Url("https://img/dog.jpg".to_string()));

    let reply = h.send("/breed unknownxyz").await;
    assert_eq!(reply, Reply::Text(texts::NOT_FOUND.to_string()));
    assert_eq!(h.call_count(), 0);
}

#[tokio::test]
async fn breed_arity_errors_yield_usage_text() {
    let mut h = Harness::new(Outcome::Url("https://img/dog.jpg".to_string()));

    assert_eq!(
        h.send("/breed").await,
        Reply::Text(texts::BREED_USAGE.to_string())
    );
    assert_eq!(
        h.send("/breed toy terrier").await,
        Reply::Text(texts::BREED_USAGE.to_string())
    );
    assert_eq!(h.call_count(), 0);
}

#[tokio::test]
async fn choice_resolves_to_composite_target() {
    let mut h = Harness::new(Outcome::Url("https://img/toy.jpg".to_string()));

    h.send("/breed terrier").await;
    let reply = h.send("toy terrier").await;

    assert_eq!(reply, Reply::Photo("https://img/toy.jpg".to_string()));
    assert_eq!(
        h.last_target(),
        Some(ImageTarget::SubBreed {
            breed: "terrier".to_string(),
            sub: "toy".to_string(),
        })
    );
    assert_eq!(h.last_target().unwrap().to_string(), "terrier-toy");
    assert_eq!(h.router.chat_state("chat-1"), ChatState::Idle);
}

#[tokio::test]
async fn malformed_choice_aborts_the_flow() {
    let mut h = Harness::new(Outcome::Url("https://img/dog.jpg".to_string()));

    h.send("/breed terrier").await;
    let reply = h.send("bogus").await;

    assert_eq!(reply, Reply::Text(texts::WRONG_INPUT.to_string()));
    assert_eq!(h.call_count(), 0);
    assert_eq!(h.router.chat_state("chat-1"), ChatState::Idle);

    // The flow is abandoned, not re-prompted: a fresh /breed works again.
    let reply = h.send("/breed shiba").await;
    assert_eq!(reply, Reply::Photo("https://img/dog.jpg".to_string()));
}

#[tokio::test]
async fn next_message_is_consumed_by_resolution_regardless_of_content() {
    let mut h = Harness::new(Outcome::NotFound);

    h.send("/breed terrier").await;
    // A command token still lands in the resolution handler, not the table.
    let reply = h.send("/dog").await;

    assert_eq!(reply, Reply::Text(texts::WRONG_INPUT.to_string()));
    assert_eq!(h.call_count(), 0);
    assert_eq!(h.router.chat_state("chat-1"), ChatState::Idle);
}

#[tokio::test]
async fn pending_flows_are_scoped_per_conversation() {
    let mut h = Harness::new(Outcome::Url("https://img/dog.jpg".to_string()));

    let prompt = h.message("/breed terrier");
    h.router.handle(&prompt).await;

    // Another conversation is unaffected by chat-1's pending choice.
    let other = h.parser.parse("chat-2", "/breed shiba", None);
    let reply = h.router.handle(&other).await;
    assert_eq!(reply, Reply::Photo("https://img/dog.jpg".to_string()));
    assert_eq!(
        h.router.chat_state("chat-1"),
        ChatState::AwaitingSubBreedChoice {
            breed: "terrier".to_string()
        }
    );
}

#[tokio::test]
async fn not_found_fetch_yields_text_and_no_photo() {
    let mut h = Harness::new(Outcome::NotFound);

    let reply = h.send("/breed shiba").await;
    assert_eq!(reply, Reply::Text(texts::NOT_FOUND.to_string()));
    assert_eq!(h.call_count(), 1);
    assert!(h.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn upstream_error_is_logged_and_silent() {
    let mut h = Harness::new(Outcome::Upstream(500));

    let reply = h.send("/dog").await;
    assert_eq!(reply, Reply::None);
    assert_eq!(h.call_count(), 1);

    let records = h.records.lock().unwrap();
    assert_eq!(records.as_slice(), &[("/dog".to_string(), 500)]);
}

#[tokio::test]
async fn unrecognized_input_is_ignored() {
    let mut h = Harness::new(Outcome::Url("https://img/dog.jpg".to_string()));

    assert_eq!(h.send("/frisbee").await, Reply::None);
    assert_eq!(h.send("hello there").await, Reply::None);
    assert_eq!(h.call_count(), 0);
}
