use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use gmail_send::api::models::{MessageHeader, MessageRecord, SendResult, UserInfo};
use gmail_send::api::{CurrentUser, MailTransport, MessageStore};
use gmail_send::error::{AppError, AppResult};
use gmail_send::mail::compose::SendEmailAction;
use gmail_send::mail::request::{
    AttachmentDescriptor, AttachmentMap, BodyType, Mailbox, MessageBody, SendRequest,
    TransportSendOptions,
};

struct FakeUser {
    fail: bool,
    calls: AtomicUsize,
}

impl FakeUser {
    fn ok() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CurrentUser for FakeUser {
    async fn resolve(&self) -> AppResult<UserInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::Auth("token expired".to_string()));
        }
        Ok(UserInfo {
            name: "Account Owner".to_string(),
            email: "owner@x.com".to_string(),
        })
    }
}

enum Lookup {
    Found(MessageRecord),
    NotFound,
    TransportDown,
}

struct FakeStore {
    lookup: Lookup,
    calls: AtomicUsize,
}

impl FakeStore {
    fn new(lookup: Lookup) -> Self {
        Self {
            lookup,
            calls: AtomicUsize::new(0),
        }
    }

    fn status_message(message_id_header: &str) -> Self {
        Self::new(Lookup::Found(MessageRecord {
            id: "18f2a".to_string(),
            thread_id: "t9".to_string(),
            headers: vec![
                MessageHeader::new("Subject", "Status"),
                MessageHeader::new(message_id_header, "m123"),
            ],
        }))
    }
}

#[async_trait]
impl MessageStore for FakeStore {
    async fn get_message(&self, id: &str) -> AppResult<MessageRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.lookup {
            Lookup::Found(record) => Ok(record.clone()),
            Lookup::NotFound => Err(AppError::NotFound(format!("message {id}"))),
            Lookup::TransportDown => Err(AppError::Transport("connection reset".to_string())),
        }
    }
}

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<TransportSendOptions>>,
    fail: bool,
}

impl RecordingTransport {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn only_sent(&self) -> TransportSendOptions {
        let sent = self.sent.lock().expect("lock sent");
        assert_eq!(sent.len(), 1, "expected exactly one send");
        sent[0].clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, options: &TransportSendOptions) -> AppResult<SendResult> {
        self.sent.lock().expect("lock sent").push(options.clone());
        if self.fail {
            return Err(AppError::Transport("invalid recipient".to_string()));
        }
        Ok(SendResult {
            id: "190aa".to_string(),
            thread_id: options.thread_id.clone(),
            label_ids: vec!["SENT".to_string()],
        })
    }
}

fn request() -> SendRequest {
    SendRequest {
        to: vec!["a@x.com".to_string()],
        subject: Some("Hi".to_string()),
        body: "hello".to_string(),
        body_type: BodyType::PlainText,
        ..SendRequest::default()
    }
}

#[tokio::test]
async fn plain_send_without_reply() {
    let user = FakeUser::ok();
    let store = FakeStore::new(Lookup::NotFound);
    let transport = RecordingTransport::default();

    let outcome = SendEmailAction::new(&user, &store, &transport)
        .run(request())
        .await
        .expect("send succeeds");

    assert_eq!(outcome.summary, "Successfully sent email to a@x.com");
    assert_eq!(outcome.response.id, "190aa");
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    assert_eq!(user.calls.load(Ordering::SeqCst), 1);

    let sent = transport.only_sent();
    assert_eq!(sent.from, Mailbox::named("Account Owner", "owner@x.com"));
    assert_eq!(sent.to, ["a@x.com"]);
    assert_eq!(sent.subject, "Hi");
    assert_eq!(sent.body, MessageBody::Text("hello".to_string()));
    assert_eq!(sent.in_reply_to, None);
    assert_eq!(sent.references, None);
    assert_eq!(sent.thread_id, None);
    assert!(sent.attachments.is_empty());
}

#[tokio::test]
async fn reply_uses_looked_up_thread_context() {
    let user = FakeUser::ok();
    let store = FakeStore::status_message("Message-Id");
    let transport = RecordingTransport::default();

    let mut request = request();
    request.in_reply_to = Some("18f2a".to_string());

    SendEmailAction::new(&user, &store, &transport)
        .run(request)
        .await
        .expect("send succeeds");

    let sent = transport.only_sent();
    assert_eq!(sent.subject, "Re: Status");
    assert_eq!(sent.in_reply_to.as_deref(), Some("m123"));
    assert_eq!(sent.references.as_deref(), Some("m123"));
    assert_eq!(sent.thread_id.as_deref(), Some("t9"));
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn reply_accepts_either_message_id_casing() {
    for header in ["Message-ID", "Message-Id", "message-id"] {
        let user = FakeUser::ok();
        let store = FakeStore::status_message(header);
        let transport = RecordingTransport::default();

        let mut request = request();
        request.in_reply_to = Some("18f2a".to_string());

        SendEmailAction::new(&user, &store, &transport)
            .run(request)
            .await
            .expect("send succeeds");

        assert_eq!(transport.only_sent().in_reply_to.as_deref(), Some("m123"));
    }
}

#[tokio::test]
async fn failed_lookup_degrades_to_literal_thread_id() {
    for lookup in [Lookup::NotFound, Lookup::TransportDown] {
        let user = FakeUser::ok();
        let store = FakeStore::new(lookup);
        let transport = RecordingTransport::default();

        let mut request = request();
        request.in_reply_to = Some("18f2a".to_string());

        let outcome = SendEmailAction::new(&user, &store, &transport)
            .run(request)
            .await
            .expect("send still succeeds");

        assert_eq!(outcome.response.thread_id.as_deref(), Some("18f2a"));
        let sent = transport.only_sent();
        assert_eq!(sent.subject, "Hi");
        assert_eq!(sent.thread_id.as_deref(), Some("18f2a"));
        assert_eq!(sent.in_reply_to, None);
        assert_eq!(sent.references, None);
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test]
async fn message_without_subject_header_degrades() {
    let user = FakeUser::ok();
    let store = FakeStore::new(Lookup::Found(MessageRecord {
        id: "18f2a".to_string(),
        thread_id: "t9".to_string(),
        headers: vec![MessageHeader::new("Message-ID", "m123")],
    }));
    let transport = RecordingTransport::default();

    let mut request = request();
    request.in_reply_to = Some("18f2a".to_string());

    SendEmailAction::new(&user, &store, &transport)
        .run(request)
        .await
        .expect("send succeeds");

    let sent = transport.only_sent();
    assert_eq!(sent.subject, "Hi");
    assert_eq!(sent.thread_id.as_deref(), Some("18f2a"));
    assert_eq!(sent.in_reply_to, None);
}

#[tokio::test]
async fn html_body_sets_only_html() {
    let user = FakeUser::ok();
    let store = FakeStore::new(Lookup::NotFound);
    let transport = RecordingTransport::default();

    let mut request = request();
    request.body = "<p>hello</p>".to_string();
    request.body_type = BodyType::Html;

    SendEmailAction::new(&user, &store, &transport)
        .run(request)
        .await
        .expect("send succeeds");

    let sent = transport.only_sent();
    assert_eq!(sent.body.html(), Some("<p>hello</p>"));
    assert_eq!(sent.body.text(), None);
}

#[tokio::test]
async fn attachments_are_normalized_in_order() {
    let user = FakeUser::ok();
    let store = FakeStore::new(Lookup::NotFound);
    let transport = RecordingTransport::default();

    let mut request = request();
    request.attachments = Some(AttachmentMap::from_iter([
        ("report.pdf", "https://x/a.pdf"),
        ("data.csv", "https://x/b.csv"),
    ]));

    SendEmailAction::new(&user, &store, &transport)
        .run(request)
        .await
        .expect("send succeeds");

    assert_eq!(
        transport.only_sent().attachments,
        [
            AttachmentDescriptor {
                filename: "report.pdf".to_string(),
                source: "https://x/a.pdf".to_string(),
                content_type: None,
            },
            AttachmentDescriptor {
                filename: "data.csv".to_string(),
                source: "https://x/b.csv".to_string(),
                content_type: None,
            },
        ]
    );
}

#[tokio::test]
async fn mime_type_override_applies_to_all_attachments() {
    let user = FakeUser::ok();
    let store = FakeStore::new(Lookup::NotFound);
    let transport = RecordingTransport::default();

    let mut request = request();
    request.mime_type = Some("application/json".to_string());
    request.attachments = Some(AttachmentMap::from_iter([
        ("report.pdf", "https://x/a.pdf"),
        ("photo.png", "https://x/b.png"),
    ]));

    SendEmailAction::new(&user, &store, &transport)
        .run(request)
        .await
        .expect("send succeeds");

    let sent = transport.only_sent();
    assert!(
        sent.attachments
            .iter()
            .all(|attachment| attachment.content_type.as_deref() == Some("application/json"))
    );
}

#[tokio::test]
async fn sender_and_reply_to_overrides() {
    let user = FakeUser::ok();
    let store = FakeStore::new(Lookup::NotFound);
    let transport = RecordingTransport::default();

    let mut request = request();
    request.from_name = Some("Support Desk".to_string());
    request.reply_to = Some("help@x.com".to_string());
    request.cc = vec!["c@x.com".to_string()];
    request.bcc = vec!["d@x.com".to_string()];
    request.to = vec!["a@x.com".to_string(), "b@x.com".to_string()];

    let outcome = SendEmailAction::new(&user, &store, &transport)
        .run(request)
        .await
        .expect("send succeeds");

    assert_eq!(outcome.summary, "Successfully sent email to a@x.com,b@x.com");
    let sent = transport.only_sent();
    assert_eq!(sent.from, Mailbox::named("Support Desk", "owner@x.com"));
    assert_eq!(sent.reply_to.as_deref(), Some("help@x.com"));
    assert_eq!(sent.cc, ["c@x.com"]);
    assert_eq!(sent.bcc, ["d@x.com"]);
}

#[tokio::test]
async fn summary_reports_recipients_as_given() {
    let user = FakeUser::ok();
    let store = FakeStore::new(Lookup::NotFound);
    let transport = RecordingTransport::default();

    let mut request = request();
    request.to = vec!["a@x.com".to_string(), String::new()];

    let outcome = SendEmailAction::new(&user, &store, &transport)
        .run(request)
        .await
        .expect("send succeeds");

    assert_eq!(outcome.summary, "Successfully sent email to a@x.com,");
    assert_eq!(transport.only_sent().to, ["a@x.com", ""]);
}

#[tokio::test]
async fn missing_required_fields_fail_before_any_call() {
    let user = FakeUser::ok();
    let store = FakeStore::new(Lookup::NotFound);
    let transport = RecordingTransport::default();
    let action = SendEmailAction::new(&user, &store, &transport);

    let mut no_recipients = request();
    no_recipients.to.clear();
    assert!(matches!(
        action.run(no_recipients).await,
        Err(AppError::Validation(_))
    ));

    let mut no_subject = request();
    no_subject.subject = None;
    assert!(matches!(
        action.run(no_subject).await,
        Err(AppError::Validation(_))
    ));

    assert_eq!(user.calls.load(Ordering::SeqCst), 0);
    assert!(transport.sent.lock().expect("lock sent").is_empty());
}

#[tokio::test]
async fn transport_failure_propagates() {
    let user = FakeUser::ok();
    let store = FakeStore::new(Lookup::NotFound);
    let transport = RecordingTransport::failing();

    let result = SendEmailAction::new(&user, &store, &transport)
        .run(request())
        .await;

    match result {
        Err(AppError::Transport(message)) => assert_eq!(message, "invalid recipient"),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert_eq!(transport.sent.lock().expect("lock sent").len(), 1);
}

#[tokio::test]
async fn current_user_failure_propagates_without_sending() {
    let user = FakeUser::failing();
    let store = FakeStore::new(Lookup::NotFound);
    let transport = RecordingTransport::default();

    let result = SendEmailAction::new(&user, &store, &transport)
        .run(request())
        .await;

    assert!(matches!(result, Err(AppError::Auth(_))));
    assert!(transport.sent.lock().expect("lock sent").is_empty());
}
