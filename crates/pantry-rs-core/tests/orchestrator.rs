use pantry_rs_core::{
    GenerationPhase, IngredientStore, RatingWidget, RecipeOrchestrator, RecipeRatings,
};
use pantry_rs_inference::{FETCH_ERROR_TEXT, NO_RECIPE_TEXT};
use pantry_rs_protocol::{EventPayload, OutcomeKind, PromptVariant};
use pantry_rs_storage::{FileKeyValueStore, MemoryKeyValueStore};
use pantry_rs_test_utils::{
    EmptyInference, FailingInference, FixedInference, GatedInference, RecordingInference,
    RecordingSink,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn pancake_store() -> IngredientStore {
    IngredientStore::from_items(["egg", "flour", "milk", "sugar"])
}

#[tokio::test]
async fn pancakes_scenario_shows_recipe_and_records_history() {
    let mut orchestrator = RecipeOrchestrator::default();
    let client = FixedInference::new("## Pancakes\n- mix...");
    let store = pancake_store();

    let entry = orchestrator
        .generate(&store, &client)
        .await
        .expect("history entry")
        .clone();

    assert_eq!(entry.recipe, "## Pancakes\n- mix...");
    assert_eq!(entry.ingredients, vec!["egg", "flour", "milk", "sugar"]);
    assert_eq!(entry.outcome, OutcomeKind::Generated);
    assert_eq!(orchestrator.current_recipe(), Some("## Pancakes\n- mix..."));
    assert_eq!(orchestrator.history().len(), 1);
    assert!(!orchestrator.is_loading());
    assert_eq!(orchestrator.phase(), GenerationPhase::Shown);
}

#[tokio::test]
async fn failing_client_shows_fetch_error_and_still_records_history() {
    let mut orchestrator = RecipeOrchestrator::default();
    let store = pancake_store();

    orchestrator
        .generate(&store, &FailingInference)
        .await
        .expect("history entry");

    assert_eq!(orchestrator.current_recipe(), Some(FETCH_ERROR_TEXT));
    let latest = orchestrator.history().latest().expect("latest");
    assert_eq!(latest.recipe, FETCH_ERROR_TEXT);
    assert_eq!(latest.outcome, OutcomeKind::Failed);
    assert!(!orchestrator.is_loading());
}

#[tokio::test]
async fn empty_response_shows_apology() {
    let mut orchestrator = RecipeOrchestrator::default();
    orchestrator
        .generate(&pancake_store(), &EmptyInference)
        .await
        .expect("history entry");
    assert_eq!(orchestrator.current_recipe(), Some(NO_RECIPE_TEXT));
    assert_eq!(
        orchestrator.history().latest().map(|entry| entry.outcome),
        Some(OutcomeKind::NoContent)
    );
}

#[tokio::test]
async fn generation_is_disabled_below_four_ingredients() {
    let mut orchestrator = RecipeOrchestrator::default();
    let client = RecordingInference::new("recipe");
    let mut store = IngredientStore::new();
    for item in ["egg", "flour", "milk"] {
        store.add(item);
        assert!(orchestrator.generate(&store, &client).await.is_none());
    }
    assert_eq!(client.call_count(), 0);
    assert!(orchestrator.history().is_empty());

    store.add("sugar");
    assert!(orchestrator.generate(&store, &client).await.is_some());
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn second_trigger_while_loading_issues_no_request() {
    let mut orchestrator = RecipeOrchestrator::default();
    let client = RecordingInference::new("recipe");
    let store = pancake_store();

    let pending = orchestrator.begin(&store).expect("pending");
    assert!(orchestrator.begin(&store).is_none());
    assert!(orchestrator.generate(&store, &client).await.is_none());

    let completed = pending.dispatch(&client).await;
    orchestrator.complete(completed).expect("complete");
    assert_eq!(client.call_count(), 1);
    assert_eq!(orchestrator.history().len(), 1);
}

#[tokio::test]
async fn history_keeps_snapshot_taken_at_issue_time() {
    let mut orchestrator = RecipeOrchestrator::default();
    let client = GatedInference::new("## Soup");
    let mut store = pancake_store();

    let pending = orchestrator.begin(&store).expect("pending");
    let dispatch_client = client.clone();
    let handle = tokio::spawn(async move { pending.dispatch(&dispatch_client).await });

    assert!(store.edit(0, "duck egg"));
    assert!(store.delete(3));
    assert!(store.add("butter"));
    assert!(orchestrator.is_loading());
    assert_eq!(orchestrator.current_recipe(), None);

    client.release();
    let completed = handle.await.expect("join");
    let entry = orchestrator.complete(completed).expect("complete");

    assert_eq!(entry.ingredients, vec!["egg", "flour", "milk", "sugar"]);
    assert_eq!(entry.recipe, "## Soup");
    assert_eq!(store.as_slice(), ["duck egg", "flour", "milk", "butter"]);
}

#[tokio::test]
async fn new_request_clears_previous_recipe() {
    let mut orchestrator = RecipeOrchestrator::default();
    let store = pancake_store();
    orchestrator
        .generate(&store, &FixedInference::new("first"))
        .await
        .expect("first");
    assert_eq!(orchestrator.current_recipe(), Some("first"));

    let _pending = orchestrator.begin(&store).expect("pending");
    assert_eq!(orchestrator.current_recipe(), None);
}

#[tokio::test]
async fn payload_is_snapshot_plus_one_instruction() {
    let mut orchestrator = RecipeOrchestrator::default();
    let client = RecordingInference::new("recipe");
    orchestrator
        .generate(&pancake_store(), &client)
        .await
        .expect("entry");

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    let payload = &calls[0];
    assert_eq!(&payload[..4], ["egg", "flour", "milk", "sugar"]);
    let instructions: Vec<_> = PromptVariant::ALL
        .iter()
        .map(|variant| variant.instruction())
        .collect();
    assert!(instructions.contains(&payload[4].as_str()));
}

#[tokio::test]
async fn lifecycle_events_are_published() {
    let sink = RecordingSink::new();
    let mut orchestrator = RecipeOrchestrator::default().with_event_sink(Arc::new(sink.clone()));
    let entry_id = orchestrator
        .generate(&pancake_store(), &FixedInference::new("recipe"))
        .await
        .expect("entry")
        .id;

    let events = sink.events();
    assert_eq!(events.len(), 2);
    match &events[0].payload {
        EventPayload::GenerationStarted {
            request_id,
            ingredient_count,
            ..
        } => {
            assert_eq!(*request_id, entry_id);
            assert_eq!(*ingredient_count, 4);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(
        events[1].payload,
        EventPayload::GenerationCompleted {
            request_id: entry_id,
            outcome: OutcomeKind::Generated,
            history_len: 1,
        }
    );
}

#[test]
fn rating_survives_reopening_the_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("storage.json");

    {
        let ratings = RecipeRatings::new(Arc::new(FileKeyValueStore::open(&path).expect("open")));
        let mut widget = RatingWidget::new();
        widget.show(&ratings, "R1").expect("show");
        assert!(widget.select(&ratings, 5).expect("select"));
    }

    let ratings = RecipeRatings::new(Arc::new(FileKeyValueStore::open(&path).expect("reopen")));
    let mut widget = RatingWidget::new();
    assert_eq!(widget.show(&ratings, "R1").expect("show"), 5);
    assert_eq!(widget.show(&ratings, "R2").expect("show"), 0);
}

#[test]
fn saved_ingredients_round_trip_through_storage() {
    let kv = MemoryKeyValueStore::new();
    let store = pancake_store();
    store.save(&kv).expect("save");

    let mut restored = IngredientStore::new();
    assert!(restored.load(&kv).expect("load"));
    assert_eq!(restored, store);
}
