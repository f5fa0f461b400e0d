
use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use test_helpers::*;
use tonearm_core::{
    AlbumInfo, Choice, DecisionPolicy, ImportEvent, Item, ItemTags, StoreOpener, TrackInfo,
};
use tonearm_importer::activity::ActivityLog;
use tonearm_importer::commit::CommitStage;
use tonearm_importer::progress::ProgressStore;
use tonearm_importer::task::{DecidedAlbum, Decision, Task};
use tonearm_importer::{ImportConfig, ImportError, ImportPipeline, ResumePolicy};

fn config(library: &Path) -> ImportConfig {
    ImportConfig {
        library_path: library.to_path_buf(),
        ..ImportConfig::default()
    }
}

fn tags(artist: &str, album: &str, title: &str, track: u32) -> ItemTags {
    ItemTags {
        title: Some(title.to_string()),
        artist: Some(artist.to_string()),
        album: Some(album.to_string()),
        track_number: Some(track),
        ..ItemTags::default()
    }
}

/// Writable buffer for capturing the activity log.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Accepts every directory as the given candidate release.
struct AlbumPolicy(AlbumInfo);

#[async_trait]
impl DecisionPolicy for AlbumPolicy {
    async fn decide(
        &self,
        _path: &Path,
        items: &[Item],
        _outcome: Option<&tonearm_core::MatchOutcome>,
    ) -> tonearm_core::Result<Choice> {
        Ok(Choice::Album {
            info: self.0.clone(),
            items: items.to_vec(),
        })
    }
}

#[tokio::test]
async fn imports_as_is_and_clears_progress() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let incoming = temp.path().join("incoming");
    album_dir(&incoming, "Abbey Road", &["01.mp3", "02.mp3"]);

    let codec = MapCodec::default()
        .with("01.mp3", tags("The Beatles", "Abbey Road", "Come Together", 1))
        .with("02.mp3", tags("The Beatles", "Abbey Road", "Something", 2));
    let collection = SharedCollection::new();
    let matcher = StubMatcher(Some(make_outcome(Some("The Beatles"), Some("Abbey Road"))));
    let events = RecordingEvents::default();
    let library = temp.path().join("library");
    let progress = ProgressStore::new(temp.path().join("state.json"));

    let mut pipeline = ImportPipeline::new(
        collection.clone(),
        config(&library),
        &matcher,
        &FixedPolicy(Choice::AsIs),
        &codec,
        &events,
        progress.clone(),
    );
    let summary = pipeline
        .run(&[incoming.clone()], ResumePolicy::Never)
        .await
        .unwrap();

    assert_eq!(summary.albums_imported, 1);
    assert_eq!(summary.tracks_imported, 0);
    assert_eq!(summary.skipped, 0);

    let albums = collection.albums();
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].artist.as_deref(), Some("The Beatles"));
    assert_eq!(albums[0].title, "Abbey Road");

    // Items were copied into the library layout before insertion.
    let dest = library.join("The Beatles").join("Abbey Road");
    assert!(dest.join("01 Come Together.mp3").exists());
    assert!(dest.join("02 Something.mp3").exists());
    // Originals are preserved without deleteOriginals.
    assert!(incoming.join("Abbey Road").join("01.mp3").exists());

    assert!(matches!(
        events.events().as_slice(),
        [ImportEvent::AlbumImported { .. }]
    ));

    // The run completed, so the root's resume record is gone.
    let root = fs::canonicalize(&incoming).unwrap();
    assert_eq!(progress.get(&root), None);
}

#[tokio::test]
async fn as_is_duplicate_is_downgraded_to_skip() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let incoming = temp.path().join("incoming");
    album_dir(&incoming, "Abbey Road", &["01.mp3"]);

    let codec = MapCodec::default().with(
        "01.mp3",
        tags("The Beatles", "Abbey Road", "Come Together", 1),
    );
    let collection = SharedCollection::new();
    collection.seed_album("The Beatles", "Abbey Road");
    let matcher = StubMatcher(Some(make_outcome(Some("The Beatles"), Some("Abbey Road"))));
    let events = RecordingEvents::default();
    let buf = SharedBuf::default();

    let mut pipeline = ImportPipeline::new(
        collection.clone(),
        config(&temp.path().join("library")),
        &matcher,
        &FixedPolicy(Choice::AsIs),
        &codec,
        &events,
        ProgressStore::new(temp.path().join("state.json")),
    )
    .with_activity_log(ActivityLog::new(Box::new(buf.clone())));
    let summary = pipeline
        .run(&[incoming], ResumePolicy::Never)
        .await
        .unwrap();

    assert_eq!(summary.albums_imported, 0);
    assert_eq!(summary.skipped, 1);
    // Only the seeded album remains and nothing was announced.
    assert_eq!(collection.albums().len(), 1);
    assert!(events.events().is_empty());
    assert!(buf.text().contains("duplicate"));
}

#[tokio::test]
async fn candidate_duplicate_is_downgraded_to_skip() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let incoming = temp.path().join("incoming");
    album_dir(&incoming, "untagged", &["x.mp3"]);

    let codec = RecordingCodec::default();
    let collection = SharedCollection::new();
    collection.seed_album("Real Artist", "Real Album");
    let matcher = StubMatcher(None);
    let events = RecordingEvents::default();
    let buf = SharedBuf::default();
    // The operator picks a candidate whose release is already stored.
    let policy = AlbumPolicy(AlbumInfo {
        artist: "Real Artist".to_string(),
        album: "Real Album".to_string(),
        year: None,
        tracks: Vec::new(),
    });

    let mut pipeline = ImportPipeline::new(
        collection.clone(),
        config(&temp.path().join("library")),
        &matcher,
        &policy,
        &codec,
        &events,
        ProgressStore::new(temp.path().join("state.json")),
    )
    .with_activity_log(ActivityLog::new(Box::new(buf.clone())));
    let summary = pipeline
        .run(&[incoming], ResumePolicy::Never)
        .await
        .unwrap();

    assert_eq!(summary.albums_imported, 0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(collection.albums().len(), 1);
    assert!(events.events().is_empty());
    assert!(codec.written.lock().unwrap().is_empty());
    assert!(buf.text().contains("duplicate"));
}

#[tokio::test]
async fn duplicate_check_needs_an_artist() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let incoming = temp.path().join("incoming");
    album_dir(&incoming, "Abbey Road", &["01.mp3"]);

    let codec = MapCodec::default().with(
        "01.mp3",
        tags("The Beatles", "Abbey Road", "Come Together", 1),
    );
    let collection = SharedCollection::new();
    collection.seed_album("The Beatles", "Abbey Road");
    // The match has an album but no identifiable artist.
    let matcher = StubMatcher(Some(make_outcome(None, Some("Abbey Road"))));
    let events = RecordingEvents::default();

    let mut pipeline = ImportPipeline::new(
        collection.clone(),
        config(&temp.path().join("library")),
        &matcher,
        &FixedPolicy(Choice::AsIs),
        &codec,
        &events,
        ProgressStore::new(temp.path().join("state.json")),
    );
    let summary = pipeline
        .run(&[incoming], ResumePolicy::Never)
        .await
        .unwrap();

    assert_eq!(summary.albums_imported, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(collection.albums().len(), 2);
}

#[tokio::test]
async fn interrupted_run_resumes_where_it_stopped() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let incoming = temp.path().join("incoming");
    album_dir(&incoming, "a", &["a.mp3"]);
    album_dir(&incoming, "b", &["b.mp3"]);

    let codec = MapCodec::default()
        .with("a.mp3", tags("Ann", "Alpha", "One", 1))
        .with("b.mp3", tags("Ben", "Beta", "Two", 1));
    let collection = SharedCollection::new();
    let matcher = StubMatcher(None);
    let events = RecordingEvents::default();
    let library = temp.path().join("library");
    let progress = ProgressStore::new(temp.path().join("state.json"));

    // First run: the operator handles "a", then quits at "b".
    let script = ScriptedPolicy::new(vec![Choice::AsIs]);
    let mut pipeline = ImportPipeline::new(
        collection.clone(),
        config(&library),
        &matcher,
        &script,
        &codec,
        &events,
        progress.clone(),
    );
    let err = pipeline
        .run(&[incoming.clone()], ResumePolicy::Never)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::Aborted));

    let root = fs::canonicalize(&incoming).unwrap();
    assert_eq!(progress.get(&root), Some(root.join("a")));
    assert_eq!(collection.albums().len(), 1);

    // Second run resumes after "a" and only sees "b".
    let script = ScriptedPolicy::new(vec![Choice::AsIs]);
    let mut pipeline = ImportPipeline::new(
        collection.clone(),
        config(&library),
        &matcher,
        &script,
        &codec,
        &events,
        progress.clone(),
    );
    let summary = pipeline
        .run(&[incoming], ResumePolicy::Always)
        .await
        .unwrap();

    assert_eq!(summary.albums_imported, 1);
    let titles: Vec<_> = collection.albums().into_iter().map(|a| a.title).collect();
    assert_eq!(titles, vec!["Alpha".to_string(), "Beta".to_string()]);
    assert_eq!(progress.get(&root), None);
}

#[tokio::test]
async fn delete_originals_spares_files_already_in_place() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let library = fs::canonicalize(temp.path()).unwrap().join("library");
    // One file already sits at its library destination, one does not.
    let album = album_dir(
        &library.join("Queen"),
        "Opera",
        &["01 Song.mp3", "junk.mp3"],
    );

    let codec = MapCodec::default()
        .with("01 Song.mp3", tags("Queen", "Opera", "Song", 1))
        .with("junk.mp3", tags("Queen", "Opera", "Other", 2));
    let collection = SharedCollection::new();
    let matcher = StubMatcher(None);
    let events = RecordingEvents::default();

    let mut cfg = config(&library);
    cfg.delete_originals = true;
    let mut pipeline = ImportPipeline::new(
        collection.clone(),
        cfg,
        &matcher,
        &FixedPolicy(Choice::AsIs),
        &codec,
        &events,
        ProgressStore::new(temp.path().join("state.json")),
    );
    let summary = pipeline
        .run(&[library.clone()], ResumePolicy::Never)
        .await
        .unwrap();

    assert_eq!(summary.albums_imported, 1);
    // The in-place file survived; the relocated one's original is gone.
    assert!(album.join("01 Song.mp3").exists());
    assert!(album.join("02 Other.mp3").exists());
    assert!(!album.join("junk.mp3").exists());
}

#[tokio::test]
async fn failed_original_cleanup_is_not_checkpointed() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let root = fs::canonicalize(temp.path()).unwrap().join("incoming");
    let album = album_dir(&root, "album", &["song.mp3"]);
    let source = fs::canonicalize(album.join("song.mp3")).unwrap();

    // Two items share one original, so the cleanup pass deletes it for the
    // first and fails for the second.
    let items = vec![
        Item::with_tags(&source, tags("Queen", "Opera", "One", 1)),
        Item::with_tags(&source, tags("Queen", "Opera", "Two", 2)),
    ];
    let task = Task::Album(DecidedAlbum {
        root: root.clone(),
        path: album,
        items,
        decision: Decision::AsIs,
    });

    let codec = RecordingCodec::default();
    let collection = SharedCollection::new();
    let events = RecordingEvents::default();
    let progress = ProgressStore::new(temp.path().join("state.json"));
    let mut cfg = config(&temp.path().join("library"));
    cfg.delete_originals = true;

    let mut stage = CommitStage::new(
        collection.open().await.unwrap(),
        cfg,
        &codec,
        &events,
        None,
        progress.clone(),
    );
    let err = stage.process(task).await.unwrap_err();

    assert!(matches!(err, ImportError::Io(_)));
    // The failed task was not marked complete, so a re-run revisits it.
    assert_eq!(progress.get(&root), None);
}

#[tokio::test]
async fn roots_without_music_never_reach_the_operator() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let incoming = temp.path().join("incoming");
    fs::create_dir_all(incoming.join("docs")).unwrap();
    fs::write(incoming.join("docs").join("notes.txt"), b"text").unwrap();

    let codec = RecordingCodec::default();
    let collection = SharedCollection::new();
    let matcher = StubMatcher(None);
    let events = RecordingEvents::default();

    let mut pipeline = ImportPipeline::new(
        collection.clone(),
        config(&temp.path().join("library")),
        &matcher,
        &PanickingPolicy,
        &codec,
        &events,
        ProgressStore::new(temp.path().join("state.json")),
    );
    let summary = pipeline
        .run(&[incoming], ResumePolicy::Never)
        .await
        .unwrap();

    assert_eq!(summary.albums_imported, 0);
    assert_eq!(summary.tracks_imported, 0);
    assert_eq!(summary.skipped, 0);
    assert!(collection.albums().is_empty());
}

#[tokio::test]
async fn matched_album_writes_tags_and_fetches_art() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let incoming = temp.path().join("incoming");
    album_dir(&incoming, "untagged", &["x.mp3", "y.mp3"]);
    let art = temp.path().join("cover.jpg");
    fs::write(&art, b"image").unwrap();

    let codec = RecordingCodec::default();
    let collection = SharedCollection::new();
    let matcher = StubMatcher(Some(make_outcome(Some("Real Artist"), Some("Real Album"))));
    let events = RecordingEvents::default();
    let artwork = StubArt(Some(art.clone()));
    let policy = AlbumPolicy(AlbumInfo {
        artist: "Real Artist".to_string(),
        album: "Real Album".to_string(),
        year: Some(2001),
        tracks: vec![
            TrackInfo {
                title: "First".to_string(),
                artist: None,
                track_number: Some(1),
            },
            TrackInfo {
                title: "Second".to_string(),
                artist: None,
                track_number: Some(2),
            },
        ],
    });

    let library = temp.path().join("library");
    let mut pipeline = ImportPipeline::new(
        collection.clone(),
        config(&library),
        &matcher,
        &policy,
        &codec,
        &events,
        ProgressStore::new(temp.path().join("state.json")),
    )
    .with_artwork(&artwork);
    let summary = pipeline
        .run(&[incoming], ResumePolicy::Never)
        .await
        .unwrap();

    assert_eq!(summary.albums_imported, 1);
    let albums = collection.albums();
    assert_eq!(albums[0].artist.as_deref(), Some("Real Artist"));
    assert_eq!(albums[0].title, "Real Album");
    assert_eq!(albums[0].art_path, Some(art.clone()));

    // Tags were written to the relocated files.
    let written: Vec<PathBuf> = codec.written.lock().unwrap().clone();
    let dest = library.join("Real Artist").join("Real Album");
    assert_eq!(
        written,
        vec![dest.join("01 First.mp3"), dest.join("02 Second.mp3")]
    );

    match events.events().as_slice() {
        [ImportEvent::AlbumImported { album }] => {
            assert_eq!(album.art_path, Some(art));
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[tokio::test]
async fn operator_abort_stops_the_run() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let incoming = temp.path().join("incoming");
    album_dir(&incoming, "album", &["01.mp3"]);

    let codec = RecordingCodec::default();
    let collection = SharedCollection::new();
    let matcher = StubMatcher(None);
    let events = RecordingEvents::default();

    let mut pipeline = ImportPipeline::new(
        collection.clone(),
        config(&temp.path().join("library")),
        &matcher,
        &AbortingPolicy,
        &codec,
        &events,
        ProgressStore::new(temp.path().join("state.json")),
    );
    let err = pipeline
        .run(&[incoming], ResumePolicy::Never)
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::Aborted));
    assert!(collection.albums().is_empty());
}

#[tokio::test]
async fn simple_pathway_imports_every_directory_as_is() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let incoming = temp.path().join("incoming");
    album_dir(&incoming, "a", &["a.mp3"]);
    album_dir(&incoming, "b", &["b.mp3"]);

    let codec = MapCodec::default()
        .with("a.mp3", tags("Ann", "Alpha", "One", 1))
        .with("b.mp3", tags("Ben", "Beta", "Two", 1));
    let collection = SharedCollection::new();
    let matcher = StubMatcher(None);
    let events = RecordingEvents::default();
    let library = temp.path().join("library");
    let progress = ProgressStore::new(temp.path().join("state.json"));

    // The reduced pathway never prompts.
    let mut pipeline = ImportPipeline::new(
        collection.clone(),
        config(&library),
        &matcher,
        &PanickingPolicy,
        &codec,
        &events,
        progress.clone(),
    );
    let summary = pipeline
        .run_simple(&[incoming.clone()], ResumePolicy::Never)
        .await
        .unwrap();

    assert_eq!(summary.albums_imported, 2);
    let albums = collection.albums();
    assert_eq!(albums.len(), 2);
    assert_eq!(albums[0].artist.as_deref(), Some("Ann"));
    assert_eq!(albums[1].artist.as_deref(), Some("Ben"));
    assert!(library
        .join("Ann")
        .join("Alpha")
        .join("01 One.mp3")
        .exists());
    assert_eq!(events.events().len(), 2);

    let root = fs::canonicalize(&incoming).unwrap();
    assert_eq!(progress.get(&root), None);
}
