use super::*;
use crate::{
    test_support::{entries, FakeApi},
    view::{Pager, ScoreboardView},
};

fn controller_with(api: &Arc<FakeApi>) -> (Arc<SnapshotStore>, RegistrationController) {
    let store = SnapshotStore::new(api.clone());
    (Arc::clone(&store), RegistrationController::new(store))
}

#[tokio::test]
async fn successful_add_refreshes_the_board_once() {
    let api = FakeApi::with_board(entries(&[10.0]));
    let (store, registration) = controller_with(&api);

    let created = registration
        .add_participant("  Ann ", " p1 ")
        .await
        .expect("add");

    assert_eq!(created.participant, "Ann");
    assert_eq!(created.project, "p1");
    assert_eq!(api.fetches(), 1);
    assert_eq!(store.current().len(), 2);
}

#[tokio::test]
async fn duplicate_add_surfaces_server_message_without_refresh() {
    let api = FakeApi::with_board(entries(&[10.0]));
    api.reject_register(ScoreboardError::Conflict {
        status: 409,
        message: "Participant already exists.".into(),
    });
    let (store, registration) = controller_with(&api);
    store.fetch_scores().await.expect("fetch");
    let before = store.current();

    let err = registration
        .add_participant("Ann", "p1")
        .await
        .expect_err("duplicate");

    assert_eq!(err.user_message(), "Participant already exists.");
    assert_eq!(api.fetches(), 1);
    assert_eq!(*store.current(), *before);
}

#[tokio::test]
async fn empty_fields_are_rejected_before_any_request() {
    let api = FakeApi::with_board(Vec::new());
    let (_, registration) = controller_with(&api);

    for (name, project) in [("", "p1"), ("Ann", ""), ("   ", "p1")] {
        let err = registration
            .add_participant(name, project)
            .await
            .expect_err("validation");
        assert_eq!(err, ScoreboardError::validation(MISSING_FIELDS_MESSAGE));
    }

    assert_eq!(
        api.register_calls.load(std::sync::atomic::Ordering::SeqCst),
        0
    );
    assert_eq!(api.fetches(), 0);
}

#[tokio::test]
async fn successful_delete_refreshes_the_board_once() {
    let api = FakeApi::with_board(entries(&[10.0, 20.0]));
    let (store, registration) = controller_with(&api);

    registration
        .delete_participant(ParticipantId(1))
        .await
        .expect("delete");

    assert_eq!(api.fetches(), 1);
    assert_eq!(store.current().len(), 1);
}

#[tokio::test]
async fn failed_delete_leaves_the_board_untouched() {
    let api = FakeApi::with_board(entries(&[10.0]));
    let (store, registration) = controller_with(&api);

    let err = registration
        .delete_participant(ParticipantId(42))
        .await
        .expect_err("missing participant");

    assert_eq!(err.user_message(), "Participant not found.");
    assert_eq!(api.fetches(), 0);
    assert!(store.current().is_empty());
}

#[tokio::test]
async fn add_still_succeeds_when_the_follow_up_read_fails() {
    let api = FakeApi::with_board(Vec::new());
    api.fail_fetch(true);
    let (_, registration) = controller_with(&api);

    registration
        .add_participant("Ann", "p1")
        .await
        .expect("registration itself succeeded");

    assert_eq!(api.fetches(), 1);
}

#[tokio::test]
async fn list_distinguishes_unreachable_from_empty() {
    let api = FakeApi::with_board(Vec::new());
    let (_, registration) = controller_with(&api);

    assert_eq!(registration.list_participants().await, Some(Vec::new()));

    api.fail_list(true);
    assert_eq!(registration.list_participants().await, None);
}

#[tokio::test]
async fn submit_reports_form_messages() {
    let api = FakeApi::with_board(Vec::new());
    let (_, registration) = controller_with(&api);

    let ok = registration.submit("Ann", "p1").await;
    assert!(ok.is_success());
    assert_eq!(ok.text(), REGISTERED_MESSAGE);

    let missing = registration.submit("", "p1").await;
    assert_eq!(missing, FormMessage::Failure(MISSING_FIELDS_MESSAGE.into()));

    api.reject_register(ScoreboardError::Conflict {
        status: 409,
        message: String::new(),
    });
    let blank = registration.submit("Bo", "p2").await;
    assert_eq!(blank, FormMessage::Failure(GENERIC_FAILURE_MESSAGE.into()));
}

#[tokio::test]
async fn mutations_are_published() {
    let api = FakeApi::with_board(Vec::new());
    let (store, registration) = controller_with(&api);
    let mut events = store.subscribe_events();

    let created = registration.add_participant("Ann", "p1").await.expect("add");
    registration
        .delete_participant(created.id)
        .await
        .expect("delete");

    assert_eq!(
        events.recv().await.expect("event"),
        ScoreboardEvent::ParticipantAdded(created.clone())
    );
    assert_eq!(
        events.recv().await.expect("event"),
        ScoreboardEvent::SnapshotUpdated { entries: 1 }
    );
    assert_eq!(
        events.recv().await.expect("event"),
        ScoreboardEvent::ParticipantDeleted(created.id)
    );
}

#[tokio::test]
async fn deleting_last_row_of_page_two_leaves_an_empty_page() {
    let mut scores = vec![50.0; 10];
    scores.push(1.0);
    let api = FakeApi::with_board(entries(&scores));
    let (store, registration) = controller_with(&api);
    store.fetch_scores().await.expect("fetch");
    let mut pager = Pager::new();
    pager.next_page(2);
    assert_eq!(
        ScoreboardView::render(&store.current(), &pager).rows.len(),
        1
    );

    registration
        .delete_participant(ParticipantId(11))
        .await
        .expect("delete");

    let page = ScoreboardView::render(&store.current(), &pager);
    assert_eq!(page.current_page, 2);
    assert!(page.rows.is_empty());
    assert_eq!(page.total_pages, 1);
}
