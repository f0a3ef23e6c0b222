//! Grouping Flow Tests
//!
//! End-to-end tests over a real vault directory: filter rules loaded from and
//! persisted to disk, canvases read through the filesystem collaborators, and
//! results published through a grouping session.

#[cfg(test)]
mod grouping_flow_tests {
    use anyhow::Result;
    use opencanvas_core::models::{Position, OTHER_BUCKET};
    use opencanvas_core::services::{BroadcastDiagnostics, Diagnostic};
    use opencanvas_core::storage::{FsDocumentSource, JsonFilterStorage, VaultFileResolver};
    use opencanvas_core::{
        CanvasDocument, CanvasGrouper, CanvasSettings, FilterService, GroupingSession, NodeKind,
        NormalizeMode,
    };
    use serde_json::{json, Value};
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::time::{timeout, Duration};

    const BOARD: &str = "board.canvas";

    /// Helper to lay out a vault with one canvas, one note and a legacy filter file
    async fn create_vault() -> Result<TempDir> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        tokio::fs::create_dir_all(root.join("notes")).await?;
        tokio::fs::create_dir_all(root.join("data")).await?;
        tokio::fs::write(root.join("notes/todo.txt"), "buy milk").await?;
        tokio::fs::write(root.join("data/link-filters.json"), r#"{"GitHub": "github.com"}"#).await?;

        let board = json!({
            "nodes": [
                {"id": "t1", "type": "text", "text": "Plan", "x": 0, "y": 0, "width": 200, "height": 100},
                {"id": "f1", "type": "file", "file": "notes/todo.txt", "x": 250, "y": 0, "width": 200, "height": 100},
                {"id": "l1", "type": "link", "url": "https://github.com/rust-lang/rust", "x": 0, "y": 150, "width": 200, "height": 100},
                {"id": "l2", "type": "link", "url": "https://docs.rs/tokio", "x": 250, "y": 150, "width": 200, "height": 100, "color": "5"},
                {"id": "g1", "type": "group", "label": "Links", "x": -20, "y": 130, "width": 500, "height": 140}
            ],
            "edges": [
                {"id": "e1", "fromNode": "t1", "fromSide": "bottom", "toNode": "l1", "toSide": "top"}
            ]
        });
        tokio::fs::write(root.join(BOARD), serde_json::to_string_pretty(&board)?).await?;
        Ok(temp_dir)
    }

    fn grouper_for(root: &Path, settings: &CanvasSettings) -> CanvasGrouper {
        CanvasGrouper::from_settings(settings, Some(Arc::new(VaultFileResolver::new(root))))
    }

    #[tokio::test]
    async fn test_vault_grouping_with_persisted_filters() -> Result<()> {
        let vault = create_vault().await?;
        let root = vault.path();
        let settings = CanvasSettings::default();

        let filters = FilterService::new(Arc::new(JsonFilterStorage::new(
            root.join(&settings.link_filters_path),
        )));
        let rules = filters.load().await;
        assert_eq!(rules.len(), 1);

        let session = GroupingSession::new(Arc::new(grouper_for(root, &settings)));
        let source = FsDocumentSource::new(root);

        let grouped = session
            .refresh_from_source(&source, BOARD, &rules)
            .await
            .expect("first pass should publish");
        assert_eq!(grouped.text[0].id, "t1");
        assert_eq!(grouped.file[0].file_content.as_deref(), Some("buy milk"));
        assert_eq!(grouped.group[0].id, "g1");
        assert_eq!(grouped.link.get("GitHub").unwrap()[0].id, "l1");
        assert_eq!(grouped.link.other()[0].id, "l2");

        // Adding a filter rewrites the file in the list shape
        let rules = filters.add("Docs", "docs.rs").await;
        let written = tokio::fs::read_to_string(root.join("data/link-filters.json")).await?;
        let written: Value = serde_json::from_str(&written)?;
        assert_eq!(
            written,
            json!({"linkFilters": [
                {"title": "GitHub", "url": "github.com"},
                {"title": "Docs", "url": "docs.rs"}
            ]})
        );

        let grouped = session
            .refresh_from_source(&source, BOARD, &rules)
            .await
            .expect("second pass should publish");
        assert_eq!(grouped.link.get("Docs").unwrap()[0].id, "l2");
        assert!(grouped.link.other().is_empty());
        assert_eq!(session.latest().generation, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_edits_round_trip_through_grouping() -> Result<()> {
        let vault = create_vault().await?;
        let root = vault.path();
        let path = root.join(BOARD);

        let mut document = CanvasDocument::parse(&tokio::fs::read_to_string(&path).await?)?;
        let new_link =
            document.create_link("https://crates.io/crates/serde", Position { x: 500.0, y: 0.0 });
        document.update_link_url("l1", "https://example.org")?;
        assert!(document.update_node_text("l2", "not a text node").is_err());
        assert!(document.delete_node("t1"));
        assert!(document.edges().is_empty());
        tokio::fs::write(&path, document.to_json_pretty()?).await?;

        let settings = CanvasSettings::default();
        let rules = vec![opencanvas_core::FilterRule::new("GitHub", "github.com")];
        let grouped = grouper_for(root, &settings)
            .group_from_source(&FsDocumentSource::new(root), BOARD, &rules)
            .await;

        assert!(grouped.text.is_empty());
        // Buckets only exist once a link lands in them
        assert!(grouped.link.get("GitHub").is_none());
        let other: Vec<&str> = grouped.link.other().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(other, vec!["l1", "l2", new_link.as_str()]);

        let created = grouped.link.other().last().unwrap();
        assert_eq!(created.size.width, 200.0);
        assert_eq!(created.url(), Some("https://crates.io/crates/serde"));
        Ok(())
    }

    #[tokio::test]
    async fn test_diagnostics_are_broadcast() -> Result<()> {
        let vault = create_vault().await?;
        let root = vault.path();
        let document = json!({
            "nodes": [
                {"id": "f2", "type": "file", "file": "notes/missing.txt"},
                {"id": "s1", "type": "sticker"}
            ]
        })
        .to_string();

        let diagnostics = Arc::new(BroadcastDiagnostics::new());
        let mut rx = diagnostics.subscribe();
        let grouper =
            grouper_for(root, &CanvasSettings::default()).with_diagnostics(diagnostics.clone());

        let grouped = grouper.group(&document, &[]).await;
        assert_eq!(grouped.file.len(), 1);
        assert!(grouped.file[0].file_content.is_none());
        assert_eq!(grouped.len(), 1);

        let first = timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("diagnostic should be emitted within 1 second")?;
        assert!(matches!(first, Diagnostic::FileReadFailed { ref node_id, .. } if node_id == "f2"));

        let second = timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("diagnostic should be emitted within 1 second")?;
        assert_eq!(
            second,
            Diagnostic::UnknownNodeType {
                node_id: "s1".to_string(),
                node_type: "sticker".to_string(),
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_settings_drive_the_grouper() -> Result<()> {
        let vault = create_vault().await?;
        let root = vault.path();
        let settings_path = root.join("data/settings.json");

        let settings = CanvasSettings {
            normalize_mode: NormalizeMode::Open,
            file_content_extensions: vec!["md".to_string()],
            link_filters: vec![opencanvas_core::FilterRule::new("Docs", "docs.rs")],
            ..Default::default()
        };
        settings.save(&settings_path).await?;
        let loaded = CanvasSettings::load(&settings_path).await;
        assert_eq!(loaded, settings);

        let grouped = grouper_for(root, &loaded)
            .group_from_source(&FsDocumentSource::new(root), BOARD, &loaded.link_filters)
            .await;

        // txt is no longer allow-listed
        assert!(grouped.file[0].file_content.is_none());
        // Open mode keeps the group label as custom data
        assert_eq!(
            grouped.group[0].custom_data.as_ref().unwrap()["label"],
            json!("Links")
        );
        assert_eq!(grouped.link.get("Docs").unwrap()[0].id, "l2");
        assert_eq!(grouped.link.get(OTHER_BUCKET).unwrap()[0].id, "l1");
        assert_eq!(loaded.link_color(&grouped.link.get("Docs").unwrap()[0]), "cyan");
        Ok(())
    }

    #[tokio::test]
    async fn test_new_nodes_default_to_text_shape() -> Result<()> {
        let mut document = CanvasDocument::parse(r#"{"nodes": []}"#)?;
        let id = document.create_node(&NodeKind::Text, Position { x: 10.0, y: 20.0 });
        assert_eq!(id.len(), 16);

        document.update_node_text(&id, "hello")?;
        let grouped = CanvasGrouper::default().group_document(&document, &[]).await;
        assert_eq!(grouped.text[0].content.as_ref().and_then(|c| c.as_text()), Some("hello"));
        assert_eq!(grouped.text[0].position.x, 10.0);
        Ok(())
    }
}
