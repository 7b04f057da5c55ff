//! End-to-End Integration Tests for the translation pipeline
//!
//! These tests drive whole runs against a temporary `res` directory with the mock
//! provider, so they need no network access. The live test at the bottom talks to
//! the keyless Google endpoint and is ignored by default:
//!
//! ```bash
//! cargo test --lib integration_tests -- --ignored --nocapture
//! ```

#[cfg(test)]
mod tests {
    use crate::changes::StaticChangeTracker;
    use crate::error::Error;
    use crate::export::ExportTable;
    use crate::mt::error::{MtResult, TranslationFailure};
    use crate::mt::{
        GoogleTranslateProvider, MockMode, MockTranslator, Provider, ProviderRegistry,
        TranslationCache, TranslationOrchestrator,
    };
    use crate::resources::ResourceDir;
    use crate::run::{RunOptions, RunReport, TranslationRun};
    use crate::tree::{DirtySet, DocumentTreeTranslator, TreeOutcome};
    use crate::{Language, ValuesDocument};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    const SOURCE_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="app_name">My App</string>
    <string name="internal" translatable="false">debug</string>
</resources>
"#;

    const FRENCH_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="app_name">Mon Ancienne App</string>
</resources>
"#;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn read(root: &Path, relative: &str) -> String {
        std::fs::read_to_string(root.join(relative)).unwrap()
    }

    fn suffix_mock() -> Arc<MockTranslator> {
        Arc::new(MockTranslator::new(MockMode::Suffix).with_key("google"))
    }

    fn orchestrator_for(provider: Arc<dyn Provider>) -> Arc<TranslationOrchestrator> {
        let registry = Arc::new(ProviderRegistry::new(provider));
        Arc::new(TranslationOrchestrator::new(
            registry,
            Arc::new(TranslationCache::default()),
        ))
    }

    struct Fixture {
        dir: tempfile::TempDir,
        targets: Vec<Language>,
        dirty: DirtySet,
        overwrite: bool,
        export_dir: Option<std::path::PathBuf>,
    }

    impl Fixture {
        fn new(source: &str) -> Self {
            let dir = tempfile::tempdir().unwrap();
            write(dir.path(), "values/strings.xml", source);
            Self {
                dir,
                targets: Vec::new(),
                dirty: DirtySet::new(),
                overwrite: false,
                export_dir: None,
            }
        }

        fn root(&self) -> &Path {
            self.dir.path()
        }

        fn run(&self, orchestrator: Arc<TranslationOrchestrator>) -> TranslationRun {
            let export = match &self.export_dir {
                Some(dir) => ExportTable::with_output_dir(dir),
                None => ExportTable::new(),
            };
            TranslationRun::new(
                orchestrator,
                Arc::new(ResourceDir::new(self.root())),
                Arc::new(StaticChangeTracker::new(self.dirty.clone())),
                Box::new(export),
                RunOptions {
                    source_language: Language::ENGLISH,
                    targets: self.targets.clone(),
                    overwrite_existing: self.overwrite,
                },
            )
        }

        async fn execute(&self, orchestrator: Arc<TranslationOrchestrator>) -> RunReport {
            self.run(orchestrator)
                .execute(CancellationToken::new())
                .await
                .unwrap()
        }
    }

    // ============================================================================
    // TEST 1: Repeated translations hit the cache
    // ============================================================================

    #[tokio::test]
    async fn test_cache_idempotence() {
        let mock = suffix_mock();
        let orchestrator = orchestrator_for(mock.clone());

        let first = orchestrator
            .translate(&Language::ENGLISH, &Language::GERMAN, "Settings")
            .await
            .unwrap();
        let second = orchestrator
            .translate(&Language::ENGLISH, &Language::GERMAN, "Settings")
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_shared_across_entries() {
        let mut fixture = Fixture::new(
            r#"<resources>
    <string name="ok">OK</string>
    <string name="confirm">OK</string>
</resources>"#,
        );
        let mock = suffix_mock();
        fixture.targets = vec![Language::FRENCH];

        fixture.execute(orchestrator_for(mock.clone())).await;
        assert_eq!(mock.call_count(), 1);
        assert!(read(fixture.root(), "values-fr/strings.xml").contains("<string name=\"confirm\">OK_fr</string>"));
    }

    // ============================================================================
    // TEST 2: Merge keeps existing translations byte for byte
    // ============================================================================

    #[tokio::test]
    async fn test_merge_invariant() {
        let mut fixture = Fixture::new(
            r#"<resources>
    <string name="title">Title</string>
    <string name="body">Body</string>
</resources>"#,
        );
        write(
            fixture.root(),
            "values-fr/strings.xml",
            "<resources><string name=\"title\">Titre <b>gras</b> \\'ici\\'</string></resources>",
        );
        fixture.targets = vec![Language::FRENCH];

        let mock = suffix_mock();
        let report = fixture.execute(orchestrator_for(mock.clone())).await;

        let written = read(fixture.root(), "values-fr/strings.xml");
        assert!(written.contains("<string name=\"title\">Titre <b>gras</b> \\'ici\\'</string>"));
        assert!(written.contains("<string name=\"body\">Body_fr</string>"));
        assert_eq!(report.languages[0].reused, 1);
        assert_eq!(report.languages[0].retranslated, 1);
        assert_eq!(mock.call_count(), 1);
    }

    // ============================================================================
    // TEST 3: Overwrite retranslates everything
    // ============================================================================

    #[tokio::test]
    async fn test_overwrite_invariant() {
        let mut fixture = Fixture::new(SOURCE_XML);
        write(fixture.root(), "values-fr/strings.xml", FRENCH_XML);
        fixture.overwrite = true;

        let mock = suffix_mock();
        let report = fixture.execute(orchestrator_for(mock.clone())).await;

        let written = read(fixture.root(), "values-fr/strings.xml");
        assert!(written.contains("<string name=\"app_name\">My App_fr</string>"));
        assert!(!written.contains("Mon Ancienne App"));
        assert_eq!(report.languages[0].reused, 0);
    }

    // ============================================================================
    // TEST 4: Untranslatable entries are never sent and never written
    // ============================================================================

    #[tokio::test]
    async fn test_untranslatable_exclusion() {
        let mut fixture = Fixture::new(SOURCE_XML);
        fixture.targets = vec![Language::FRENCH, Language::GERMAN];

        let mock = suffix_mock();
        fixture.execute(orchestrator_for(mock.clone())).await;

        assert!(mock.requests().iter().all(|(_, _, text)| text != "debug"));
        for file in ["values-fr/strings.xml", "values-de/strings.xml"] {
            assert!(!read(fixture.root(), file).contains("internal"));
        }
    }

    // ============================================================================
    // TEST 5: Fallback provider uses its own translation code
    // ============================================================================

    #[tokio::test]
    async fn test_fallback_correctness() {
        let fallback = Arc::new(
            MockTranslator::new(MockMode::Suffix)
                .with_key("google")
                .with_languages(vec![
                    Language::ENGLISH,
                    Language::INDONESIAN.with_translation_code("id-x-fallback"),
                ]),
        );
        let primary = Arc::new(
            MockTranslator::new(MockMode::Suffix)
                .with_key("deepl")
                .with_languages(vec![
                    Language::ENGLISH,
                    Language::HEBREW.with_translation_code("HE"),
                ]),
        );
        let registry = Arc::new(ProviderRegistry::new(fallback.clone()));
        registry.register(primary.clone());
        registry.select("deepl").unwrap();
        let orchestrator =
            TranslationOrchestrator::new(registry, Arc::new(TranslationCache::default()));

        let result = orchestrator
            .translate(&Language::ENGLISH, &Language::INDONESIAN, "Hello")
            .await
            .unwrap();

        assert_eq!(result, "Hello_id-x-fallback");
        assert_eq!(primary.call_count(), 0);
        assert_eq!(
            fallback.requests(),
            vec![(
                "en".to_string(),
                "id-x-fallback".to_string(),
                "Hello".to_string()
            )]
        );
    }

    // ============================================================================
    // TEST 6: Output follows source order, not the old target order
    // ============================================================================

    #[tokio::test]
    async fn test_order_preservation() {
        let mut fixture = Fixture::new(
            r#"<resources>
    <string name="one">One</string>
    <string name="two">Two</string>
    <string name="three">Three</string>
</resources>"#,
        );
        write(
            fixture.root(),
            "values-fr/strings.xml",
            "<resources><string name=\"three\">Trois</string><string name=\"one\">Un</string></resources>",
        );
        fixture.targets = vec![Language::FRENCH];

        fixture.execute(orchestrator_for(suffix_mock())).await;

        let doc = ValuesDocument::parse(&read(fixture.root(), "values-fr/strings.xml")).unwrap();
        let names: Vec<_> = doc.entries().iter().filter_map(|entry| entry.name()).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
        let texts: Vec<_> = doc
            .entries()
            .iter()
            .filter(|entry| entry.is_element())
            .map(|entry| entry.inner_text())
            .collect();
        assert_eq!(texts, vec!["Un", "Two_fr", "Trois"]);
    }

    // ============================================================================
    // TEST 7 & 8: The app_name scenario, clean and dirty
    // ============================================================================

    #[tokio::test]
    async fn test_scenario_clean_reuses_old_translation() {
        let source = ValuesDocument::parse(SOURCE_XML).unwrap();
        let existing = ValuesDocument::parse(FRENCH_XML).unwrap();
        let mock = suffix_mock();
        let orchestrator = orchestrator_for(mock.clone());

        let outcome = DocumentTreeTranslator::new(&orchestrator, Language::ENGLISH)
            .translate(
                source.entries(),
                Some(existing.entries()),
                &Language::FRENCH,
                false,
                &DirtySet::new(),
            )
            .await
            .unwrap();

        let TreeOutcome::Complete(document) = outcome else {
            panic!("Expected a complete document");
        };
        let elements: Vec<_> = document
            .entries
            .iter()
            .filter(|entry| entry.is_element())
            .map(|entry| (entry.name(), entry.inner_text()))
            .collect();
        assert_eq!(
            elements,
            vec![(Some("app_name"), "Mon Ancienne App".to_string())]
        );
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_scenario_dirty_retranslates() {
        let mut mappings = std::collections::HashMap::new();
        mappings.insert(
            ("My App".to_string(), "fr".to_string()),
            "Mon App".to_string(),
        );
        let mock = Arc::new(MockTranslator::new(MockMode::Mappings(mappings)).with_key("google"));

        let mut fixture = Fixture::new(SOURCE_XML);
        write(fixture.root(), "values-fr/strings.xml", FRENCH_XML);
        fixture.dirty = ["app_name"].into_iter().collect();

        let report = fixture.execute(orchestrator_for(mock.clone())).await;

        let written = read(fixture.root(), "values-fr/strings.xml");
        assert!(written.contains("<string name=\"app_name\">Mon App</string>"));
        assert!(!written.contains("Mon Ancienne App"));
        assert_eq!(mock.call_count(), 1);
        assert_eq!(report.languages[0].retranslated, 1);
    }

    #[tokio::test]
    async fn test_written_translations_parse_on_the_next_run() {
        let mut mappings = std::collections::HashMap::new();
        mappings.insert(
            ("Research".to_string(), "fr".to_string()),
            "R&D <beta>".to_string(),
        );
        let mock = Arc::new(MockTranslator::new(MockMode::Mappings(mappings)).with_key("google"));

        let mut fixture =
            Fixture::new(r#"<resources><string name="lab">Research</string></resources>"#);
        fixture.targets = vec![Language::FRENCH];
        fixture.execute(orchestrator_for(mock.clone())).await;

        let written = read(fixture.root(), "values-fr/strings.xml");
        assert!(written.contains("<string name=\"lab\">R&amp;D &lt;beta&gt;</string>"));

        let report = fixture.execute(orchestrator_for(mock.clone())).await;
        assert_eq!(report.languages[0].reused, 1);
        assert_eq!(mock.call_count(), 1);
    }

    // ============================================================================
    // TEST 9: Run coordination
    // ============================================================================

    #[tokio::test]
    async fn test_targets_include_languages_on_disk() {
        let mut fixture = Fixture::new(SOURCE_XML);
        write(fixture.root(), "values-ja/strings.xml", "<resources/>");
        std::fs::create_dir_all(fixture.root().join("values-night")).unwrap();
        fixture.targets = vec![Language::FRENCH, Language::JAPANESE];

        let report = fixture.execute(orchestrator_for(suffix_mock())).await;

        let languages: Vec<_> = report.languages.iter().map(|l| l.language).collect();
        assert_eq!(languages, vec![Language::FRENCH, Language::JAPANESE]);
        assert!(read(fixture.root(), "values-ja/strings.xml").contains("My App_ja"));
    }

    #[tokio::test]
    async fn test_export_report_written() {
        let export_dir = tempfile::tempdir().unwrap();
        let mut fixture = Fixture::new(SOURCE_XML);
        fixture.targets = vec![Language::FRENCH, Language::GERMAN];
        fixture.export_dir = Some(export_dir.path().to_path_buf());

        let report = fixture.execute(orchestrator_for(suffix_mock())).await;

        let path = report.export_path.unwrap();
        let csv = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            csv,
            "Translate Output,Default,fr,de\r\napp_name,My App,My App_fr,My App_de\r\ninternal,debug\r\n"
        );
    }

    #[tokio::test]
    async fn test_nothing_to_translate() {
        let fixture = Fixture::new(
            r#"<resources><string name="internal" translatable="false">debug</string></resources>"#,
        );
        let result = fixture
            .run(orchestrator_for(suffix_mock()))
            .execute(CancellationToken::new())
            .await;
        assert!(matches!(result, Err(Error::MergeInput(_))));
    }

    #[tokio::test]
    async fn test_failure_aborts_run_without_export() {
        let export_dir = tempfile::tempdir().unwrap();
        let mut fixture = Fixture::new(SOURCE_XML);
        fixture.targets = vec![Language::FRENCH, Language::GERMAN];
        fixture.export_dir = Some(export_dir.path().to_path_buf());

        let mock = Arc::new(
            MockTranslator::new(MockMode::Error("quota exceeded".to_string())).with_key("google"),
        );
        let result = fixture
            .run(orchestrator_for(mock.clone()))
            .execute(CancellationToken::new())
            .await;

        match result {
            Err(Error::Translation(TranslationFailure::Provider { to, text, .. })) => {
                assert_eq!(to, "fr");
                assert_eq!(text, "My App");
            }
            other => panic!("Expected translation failure, got {:?}", other),
        }
        assert_eq!(mock.call_count(), 1);
        assert!(!fixture.root().join("values-fr").exists());
        assert_eq!(std::fs::read_dir(export_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_write_failure_is_reported_and_run_continues() {
        let mut fixture = Fixture::new(SOURCE_XML);
        // A file where the language directory should be
        std::fs::write(fixture.root().join("values-fr"), "blocked").unwrap();
        fixture.targets = vec![Language::FRENCH, Language::GERMAN];

        let report = fixture.execute(orchestrator_for(suffix_mock())).await;

        assert_eq!(report.languages.len(), 2);
        assert!(report.languages[0].write_error.is_some());
        assert!(report.languages[0].written_to.is_none());
        assert!(report.languages[1].write_error.is_none());
        assert!(read(fixture.root(), "values-de/strings.xml").contains("My App_de"));
    }

    /// Cancels the run as soon as it is asked to translate `trigger`.
    struct CancelOn {
        trigger: &'static str,
        cancel: CancellationToken,
        languages: Vec<Language>,
    }

    #[async_trait]
    impl Provider for CancelOn {
        fn key(&self) -> &str {
            "google"
        }

        fn name(&self) -> &str {
            "Cancelling"
        }

        fn supported_languages(&self) -> &[Language] {
            &self.languages
        }

        async fn translate(&self, _from: &Language, to: &Language, text: &str) -> MtResult<String> {
            if text == self.trigger {
                self.cancel.cancel();
            }
            Ok(format!("{}_{}", text, to.translation_code()))
        }
    }

    #[tokio::test]
    async fn test_cancellation_keeps_completed_languages() {
        let export_dir = tempfile::tempdir().unwrap();
        let mut fixture = Fixture::new(
            r#"<resources>
    <string name="first">First</string>
    <string name="last">Last</string>
</resources>"#,
        );
        fixture.targets = vec![Language::FRENCH, Language::GERMAN];
        fixture.export_dir = Some(export_dir.path().to_path_buf());

        let cancel = CancellationToken::new();
        let provider = Arc::new(CancelOn {
            trigger: "Last",
            cancel: cancel.clone(),
            languages: Language::all().to_vec(),
        });

        let report = fixture
            .run(orchestrator_for(provider))
            .execute(cancel)
            .await
            .unwrap();

        // French finished (the trigger was its last leaf), German never started
        assert!(report.cancelled);
        assert_eq!(report.languages.len(), 1);
        assert!(read(fixture.root(), "values-fr/strings.xml").contains("Last_fr"));
        assert!(!fixture.root().join("values-de").exists());

        let csv = std::fs::read_to_string(report.export_path.unwrap()).unwrap();
        assert!(csv.starts_with("Translate Output,Default,fr\r\n"));
    }

    #[tokio::test]
    async fn test_cancellation_mid_language_writes_nothing() {
        let mut fixture = Fixture::new(
            r#"<resources>
    <string name="first">First</string>
    <string name="last">Last</string>
</resources>"#,
        );
        fixture.targets = vec![Language::FRENCH];

        let cancel = CancellationToken::new();
        let provider = Arc::new(CancelOn {
            trigger: "First",
            cancel: cancel.clone(),
            languages: Language::all().to_vec(),
        });

        let report = fixture
            .run(orchestrator_for(provider))
            .execute(cancel)
            .await
            .unwrap();

        assert!(report.cancelled);
        assert!(report.languages.is_empty());
        assert!(!fixture.root().join("values-fr").exists());
    }

    #[tokio::test]
    async fn test_spawned_run_completes() {
        let mut fixture = Fixture::new(SOURCE_XML);
        fixture.targets = vec![Language::CHINESE_SIMPLIFIED];

        let handle = fixture.run(orchestrator_for(suffix_mock())).spawn();
        let report = handle.wait().await.unwrap();

        assert!(!report.cancelled);
        assert!(read(fixture.root(), "values-zh-rCN/strings.xml").contains("My App_zh-CN"));
    }

    #[tokio::test]
    async fn test_spawned_run_cancelled_before_start() {
        let mut fixture = Fixture::new(SOURCE_XML);
        fixture.targets = vec![Language::FRENCH];

        let mock = Arc::new(MockTranslator::with_delay(MockMode::Suffix, 50).with_key("google"));
        let handle = fixture.run(orchestrator_for(mock.clone())).spawn();
        handle.cancel();
        let report = handle.wait().await.unwrap();

        assert!(report.cancelled);
        assert_eq!(mock.call_count(), 0);
    }

    // ============================================================================
    // LIVE: keyless Google endpoint
    // ============================================================================

    #[tokio::test]
    #[ignore]
    async fn test_live_google_translation() {
        let provider = Arc::new(GoogleTranslateProvider::new().unwrap());
        let orchestrator = orchestrator_for(provider);

        let result = orchestrator
            .translate(&Language::ENGLISH, &Language::FRENCH, "Good morning")
            .await
            .unwrap();
        println!("Good morning → {}", result);
        assert!(!result.is_empty());
    }
}
