//! End-to-end story sessions through the public engine API.

use std::sync::Arc;

use story_engine::{
    EngineConfig, EngineError, MemoryClipboard, Outcome, ScriptedBackend, SkipReason, TreeEngine,
};
use story_tree::{locate, node_count, serialize, Beat, Genre, StoryNode};

type Engine = TreeEngine<Arc<ScriptedBackend>, Arc<MemoryClipboard>>;

const PREMISE: &str = "A gardener wins a contest by accident.";

fn engine_with(config: &EngineConfig) -> Engine {
    TreeEngine::new(
        Arc::new(ScriptedBackend::new()),
        Arc::new(MemoryClipboard::new()),
        config,
    )
}

async fn gardener() -> (Engine, Arc<StoryNode>) {
    let engine = engine_with(&EngineConfig::default());
    engine.backend().push_expansions(&["B1", "B2", "B3"]);
    let outcome = engine.start_story(PREMISE, Genre::Any).await;
    assert_eq!(outcome, Ok(Outcome::Applied));
    let tree = engine.snapshot().unwrap();
    (engine, tree)
}

#[tokio::test]
async fn test_gardener_story_expands_into_triad() {
    let (engine, tree) = gardener().await;

    assert_eq!(tree.text(), PREMISE);
    assert!(tree.is_expanded());
    assert!(tree.is_root());

    let texts: Vec<_> = tree.children().iter().map(|c| c.text()).collect();
    assert_eq!(texts, vec!["B1", "B2", "B3"]);
    for (child, beat) in tree.children().iter().zip(Beat::ALL) {
        assert_eq!(child.beat(), Some(beat));
        assert_eq!(child.parent_id(), Some(tree.id()));
        assert!(!child.is_expanded());
        assert!(!child.has_children());
    }

    assert!(engine.expanding().is_empty());
    assert!(engine.last_error().is_none());
}

#[tokio::test]
async fn test_toggle_existing_children_never_calls_backend() {
    let (engine, tree) = gardener().await;
    let root = tree.id().clone();

    assert_eq!(engine.toggle(&root).await, Ok(Outcome::Toggled));
    let collapsed = engine.snapshot().unwrap();
    assert!(!collapsed.is_expanded());
    assert_eq!(collapsed.children().len(), 3);

    assert_eq!(engine.toggle(&root).await, Ok(Outcome::Toggled));
    assert!(engine.snapshot().unwrap().is_expanded());

    assert_eq!(engine.backend().call_count(), 1);
}

#[tokio::test]
async fn test_regenerate_nudo_leaves_siblings_shared() {
    let (engine, tree) = gardener().await;
    let nudo = tree.children()[1].id().clone();
    engine.backend().push_sentence("B2-alt");

    assert_eq!(engine.regenerate(&nudo).await, Ok(Outcome::Applied));

    let after = engine.snapshot().unwrap();
    let regenerated = &after.children()[1];
    assert_eq!(regenerated.text(), "B2-alt");
    assert_eq!(regenerated.id(), &nudo);
    assert_eq!(regenerated.beat(), Some(Beat::Nudo));
    assert_eq!(regenerated.parent_id(), Some(tree.id()));
    assert!(Arc::ptr_eq(&after.children()[0], &tree.children()[0]));
    assert!(Arc::ptr_eq(&after.children()[2], &tree.children()[2]));

    // The prompt carries the parent sentence and the beat being replaced
    let prompt = engine.backend().prompts().pop().unwrap();
    assert!(prompt.contains(PREMISE));
    assert!(prompt.contains("NUDO"));
}

#[tokio::test]
async fn test_regenerate_discards_descendants() {
    let (engine, tree) = gardener().await;
    let inicio = tree.children()[0].id().clone();
    engine.backend().push_expansions(&["C1", "C2", "C3"]);
    engine.toggle(&inicio).await.unwrap();
    assert_eq!(node_count(&engine.snapshot().unwrap()), 7);

    engine.backend().push_sentence("B1-alt");
    engine.regenerate(&inicio).await.unwrap();

    let node = engine.node(&inicio).unwrap();
    assert_eq!(node.text(), "B1-alt");
    assert!(!node.has_children());
    assert!(!node.is_expanded());
    assert_eq!(node_count(&engine.snapshot().unwrap()), 4);
}

#[tokio::test]
async fn test_malformed_expansion_leaves_tree_unchanged() {
    let (engine, tree) = gardener().await;
    let desenlace = tree.children()[2].id().clone();
    engine
        .backend()
        .push_text(r#"{"expansions": ["only", "two"]}"#);

    let outcome = engine.toggle(&desenlace).await;

    assert_eq!(
        outcome,
        Err(EngineError::Validation(
            "Invalid response format: expected 3 expansions".to_string()
        ))
    );
    assert!(Arc::ptr_eq(&engine.snapshot().unwrap(), &tree));
    assert!(!engine.is_expanding(&desenlace));
    assert_eq!(
        engine.last_error().as_deref(),
        Some("Invalid response format: expected 3 expansions")
    );

    // The failure is not sticky: a later attempt succeeds
    engine.backend().push_expansions(&["D1", "D2", "D3"]);
    assert_eq!(engine.toggle(&desenlace).await, Ok(Outcome::Applied));
    assert!(engine.last_error().is_none());
}

#[tokio::test]
async fn test_fenced_reply_is_accepted() {
    let (engine, tree) = gardener().await;
    let nudo = tree.children()[1].id().clone();
    engine
        .backend()
        .push_text("```json\n{\"expansions\": [\"C1\", \"C2\", \"C3\"]}\n```");

    assert_eq!(engine.toggle(&nudo).await, Ok(Outcome::Applied));
    assert_eq!(engine.node(&nudo).unwrap().children()[1].text(), "C2");
}

#[tokio::test]
async fn test_transport_failure_reports_status() {
    let (engine, tree) = gardener().await;
    let inicio = tree.children()[0].id().clone();
    engine.backend().push_status(529, "overloaded");

    let outcome = engine.toggle(&inicio).await;

    assert!(matches!(
        outcome,
        Err(EngineError::Transport { status: 529, .. })
    ));
    assert_eq!(
        engine.last_error().as_deref(),
        Some("API request failed: 529 - overloaded")
    );
    assert!(engine.expanding().is_empty());
}

#[tokio::test]
async fn test_export_is_four_lines() {
    let (engine, tree) = gardener().await;

    let text = engine.export_text().unwrap();

    assert_eq!(text, serialize(&tree));
    assert_eq!(
        text,
        "[PREMISE] A gardener wins a contest by accident.\n  [INICIO] B1\n  [NUDO] B2\n  [DESENLACE] B3\n"
    );
}

#[tokio::test]
async fn test_copy_all_uses_configured_header() {
    let config = EngineConfig::from_toml_str(
        r#"
        default_genre = "mystery"

        [export]
        title = "Night Shift"
        rule_width = 10
        "#,
    )
    .unwrap();
    let engine = engine_with(&config);
    assert_eq!(engine.genre(), Genre::Mystery);
    engine.backend().push_expansions(&["B1", "B2", "B3"]);
    engine.start_story(PREMISE, engine.genre()).await.unwrap();

    assert_eq!(engine.copy_all().await, Ok(Outcome::Copied));

    let copied = engine.clipboard().contents().unwrap();
    assert!(copied.starts_with("Night Shift\n==========\n\n[PREMISE] "));
    assert!(copied.ends_with("  [DESENLACE] B3\n"));
    assert!(engine.backend().prompts()[0].contains("in the mystery genre"));
}

#[tokio::test]
async fn test_premise_cannot_be_regenerated() {
    let (engine, tree) = gardener().await;

    let outcome = engine.regenerate(tree.id()).await;

    assert!(matches!(outcome, Err(EngineError::Validation(_))));
    assert_eq!(engine.backend().call_count(), 1);
    assert!(Arc::ptr_eq(&engine.snapshot().unwrap(), &tree));
}

#[tokio::test]
async fn test_unknown_id_is_ignored() {
    let (engine, tree) = gardener().await;
    let missing = "root-does-not-exist".into();

    assert_eq!(
        engine.toggle(&missing).await,
        Ok(Outcome::Skipped(SkipReason::NotFound))
    );
    assert_eq!(
        engine.regenerate(&missing).await,
        Ok(Outcome::Skipped(SkipReason::NotFound))
    );
    assert!(locate(&engine.snapshot().unwrap(), &missing).is_none());
    assert!(Arc::ptr_eq(&engine.snapshot().unwrap(), &tree));
}
