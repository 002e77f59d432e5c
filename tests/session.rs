//! Conversation state machine tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use timetravel_agency::agent::patterns::WELCOME_MESSAGE;
use timetravel_agency::agent::{CompletionBackend, Resolver};
use timetravel_agency::errors::{AppError, CompletionError};
use timetravel_agency::models::{ChatMessage, Sender, Turn};
use timetravel_agency::service::chat_service::{
    ChatListener, ChatService, ChatSession, SessionLimits,
};
use tokio::sync::Notify;

/// Holds every call until released, then echoes the last user turn.
#[derive(Default)]
struct Gated {
    release: Notify,
    calls: AtomicUsize,
}

impl CompletionBackend for Gated {
    async fn complete(&self, messages: &[Turn]) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        let last = messages.last().map(|t| t.content.clone()).unwrap_or_default();
        Ok(format!("écho: {last}"))
    }
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl ChatListener for Recorder {
    fn on_reply(&self, message: &ChatMessage) {
        self.events.lock().unwrap().push(format!("reply:{}", message.content));
    }

    fn on_composing_change(&self, composing: bool) {
        self.events.lock().unwrap().push(format!("composing:{composing}"));
    }
}

#[tokio::test]
async fn second_utterance_is_dropped_while_sending() {
    let backend = Arc::new(Resolver::new(Some(Gated::default())));
    let session = ChatSession::new(Arc::clone(&backend), "conv-1");

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.submit_utterance("Bonjour").await })
    };

    while !session.is_composing().await {
        tokio::task::yield_now().await;
    }

    let err = session.submit_utterance("Et le prix ?").await.unwrap_err();
    assert!(matches!(err, AppError::ConversationBusy { .. }));

    let gated = backend.backend().unwrap();
    while gated.calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
    gated.release.notify_one();

    let reply = first.await.unwrap().unwrap();
    assert_eq!(reply.content, "écho: Bonjour");
    assert_eq!(gated.calls.load(Ordering::SeqCst), 1);
    assert!(!session.is_composing().await);

    // Welcome, "Bonjour", reply: the rejected utterance never reached the transcript.
    let transcript = session.transcript().await;
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[0].content, WELCOME_MESSAGE);
    assert_eq!(transcript[1].sender, Sender::User);
    assert_eq!(transcript[2].sender, Sender::Agent);
}

#[tokio::test]
async fn listener_sees_composing_around_reply() {
    let resolver: Resolver<Gated> = Resolver::local_only();
    let recorder = Arc::new(Recorder::default());
    let session = ChatSession::new(Arc::new(resolver), "conv-1").with_listener(recorder.clone());

    let reply = session.submit_utterance("merci !").await.unwrap();

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(
        events,
        [
            "composing:true".to_string(),
            format!("reply:{}", reply.content),
            "composing:false".to_string(),
        ]
    );
}

#[tokio::test]
async fn rejected_utterance_emits_nothing() {
    let resolver: Resolver<Gated> = Resolver::local_only();
    let recorder = Arc::new(Recorder::default());
    let session = ChatSession::new(Arc::new(resolver), "conv-1").with_listener(recorder.clone());

    assert!(session.submit_utterance("  ").await.is_err());
    assert!(recorder.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn reset_while_sending_clears_history() {
    let backend = Arc::new(Resolver::new(Some(Gated::default())));
    let session = ChatSession::new(Arc::clone(&backend), "conv-1");

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.submit_utterance("Bonjour").await })
    };
    let gated = backend.backend().unwrap();
    while gated.calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    session.reset().await;
    gated.release.notify_one();
    first.await.unwrap().unwrap();

    assert_eq!(session.history_len().await, 0);
    assert_eq!(session.transcript().await.len(), 3);
}

#[tokio::test]
async fn service_keeps_conversations_apart() {
    let service = ChatService::new(Resolver::<Gated>::local_only());

    let a = service.session(Some("a".into())).await;
    let b = service.session(Some("b".into())).await;
    a.submit_utterance("Parlez-moi de Florence").await.unwrap();

    assert_eq!(a.transcript().await.len(), 3);
    assert_eq!(b.transcript().await.len(), 1);
    assert_eq!(service.get_messages("a").await.unwrap().len(), 3);
    assert!(service.get_messages("zzz").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn dropped_caller_does_not_wedge_the_conversation() {
    let backend = Arc::new(Resolver::new(Some(Gated::default())));
    let recorder = Arc::new(Recorder::default());
    let session = ChatSession::new(Arc::clone(&backend), "conv-1").with_listener(recorder.clone());

    let caller = {
        let session = session.clone();
        tokio::spawn(async move { session.submit_utterance("Bonjour").await })
    };
    let gated = backend.backend().unwrap();
    while gated.calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    // The caller goes away while the reply is still being composed.
    caller.abort();
    assert!(caller.await.unwrap_err().is_cancelled());
    gated.release.notify_one();

    tokio::time::timeout(Duration::from_secs(5), async {
        while session.is_composing().await {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("turn never returned to idle");

    assert_eq!(session.history_len().await, 2);
    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(events.last().map(String::as_str), Some("composing:false"));

    gated.release.notify_one();
    let reply = session.submit_utterance("Encore").await.unwrap();
    assert_eq!(reply.content, "écho: Encore");
    assert_eq!(session.transcript().await.len(), 5);
}

#[tokio::test]
async fn close_forgets_the_conversation() {
    let service = ChatService::new(Resolver::<Gated>::local_only());
    let session = service.session(Some("a".into())).await;
    session.submit_utterance("Bonjour").await.unwrap();

    assert!(service.close("a").await);
    assert!(!service.close("a").await);
    assert_eq!(service.session_count().await, 0);
    assert!(service.get_messages("a").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn full_registry_forgets_least_recently_used() {
    let limits = SessionLimits { max_sessions: 2, idle_timeout: Duration::from_secs(3600) };
    let service = ChatService::with_limits(Resolver::<Gated>::local_only(), limits);

    service.session(Some("a".into())).await;
    service.session(Some("b".into())).await;
    // Touching "a" makes "b" the oldest.
    service.find("a").await.unwrap();
    service.session(Some("c".into())).await;

    assert_eq!(service.session_count().await, 2);
    assert!(service.find("a").await.is_ok());
    assert!(service.find("b").await.is_err());
    assert!(service.find("c").await.is_ok());
}

#[tokio::test]
async fn idle_sessions_are_forgotten() {
    let limits = SessionLimits { max_sessions: 100, idle_timeout: Duration::from_millis(20) };
    let service = ChatService::with_limits(Resolver::<Gated>::local_only(), limits);

    for i in 0..10 {
        service.session(Some(format!("visitor-{i}"))).await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    service.session(Some("fresh".into())).await;

    assert_eq!(service.session_count().await, 1);
    assert!(service.find("fresh").await.is_ok());
}
