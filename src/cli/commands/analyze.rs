//! The analysis run: load both collections, rank them, format the report

use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::cache::{CacheStore, SystemClock};
use crate::cli::Cli;
use crate::config::{Config, Paths};
use crate::error::{Result, WastearrError};
use crate::media::{MediaItem, ScoredItem};
use crate::output::{self, ReportContext};
use crate::pipeline::{self, Filters};
use crate::sources::{self, MediaSource};

/// Handle an analysis run
pub fn analyze(cli: &Cli, config: &Config, paths: &Paths, width: usize) -> Result<String> {
    let kinds = cli.sources();

    let config = match cli.timeout {
        Some(secs) => config.clone().with_timeout(Duration::from_secs(secs)),
        None => config.clone(),
    };

    // Fail on missing credentials before touching the cache or the network
    for kind in &kinds {
        config.require_api_key(*kind)?;
    }
    let clients = kinds
        .iter()
        .map(|kind| sources::connect(*kind, &config))
        .collect::<Result<Vec<_>>>()?;

    let store = CacheStore::new(&paths.cache_dir, SystemClock);
    if cli.clear_cache {
        info!("Clearing cache: {}", store.dir().display());
        store.invalidate_all()?;
    }
    let cache = if cli.no_cache {
        info!("Bypassing cache");
        None
    } else {
        Some(&store)
    };

    let filters = cli.filters();
    let ranked = gather_and_rank(&clients, cache, &filters)?;

    let context = ReportContext {
        sources: &kinds,
        filters: &filters,
        width,
    };
    output::format_report(&ranked, &context, cli.output)
}

/// Load every source, then score, filter and order the union
pub fn gather_and_rank(
    sources: &[Box<dyn MediaSource>],
    cache: Option<&CacheStore>,
    filters: &Filters,
) -> Result<Vec<ScoredItem>> {
    let items = collect(sources, cache)?;
    info!("Processing {} items", items.len());
    Ok(pipeline::rank(items, filters))
}

/// Where a source's collection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Cache,
    Api,
}

/// Load every source concurrently.
///
/// If any source fails, every failure is reported together in source order
/// and no partial collection is returned.
pub fn collect(
    sources: &[Box<dyn MediaSource>],
    cache: Option<&CacheStore>,
) -> Result<Vec<MediaItem>> {
    let results: Vec<Result<(Vec<MediaItem>, Origin)>> = thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|source| scope.spawn(move || load_source(source.as_ref(), cache)))
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    });

    let mut items = Vec::new();
    let mut errors = Vec::new();
    let (mut hits, mut misses) = (0, 0);
    for result in results {
        match result {
            Ok((loaded, Origin::Cache)) => {
                hits += 1;
                items.extend(loaded);
            }
            Ok((loaded, Origin::Api)) => {
                misses += 1;
                items.extend(loaded);
            }
            Err(e) => errors.push(e),
        }
    }

    if let Some(err) = WastearrError::from_sources(errors) {
        return Err(err);
    }
    if cache.is_some() {
        info!("Cache stats: {} hits, {} misses", hits, misses);
    }
    Ok(items)
}

/// Get one collection from the cache, or fetch it and cache the result
fn load_source(
    source: &dyn MediaSource,
    cache: Option<&CacheStore>,
) -> Result<(Vec<MediaItem>, Origin)> {
    let kind = source.kind();
    let key = kind.cache_key();

    let Some(cache) = cache else {
        info!("Fetching {} data from API", kind.name());
        return Ok((source.fetch_collection()?, Origin::Api));
    };

    if let Some(entry) = cache.get(key) {
        return Ok((entry.items, Origin::Cache));
    }

    info!("Fetching {} data from API", kind.name());
    let fetched_at = cache.now();
    let items = source.fetch_collection()?;

    if let Err(e) = cache.put(key, &items, fetched_at) {
        warn!("Could not cache {} collection: {}", kind.name(), e);
    }

    Ok((items, Origin::Api))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FixedClock;
    use crate::media::ContentType;
    use crate::sources::SourceKind;
    use chrono::{DateTime, Duration as TimeDelta, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    const GIB: u64 = 1024 * 1024 * 1024;

    /// In-memory source that counts fetches
    struct FakeSource {
        kind: SourceKind,
        items: Vec<MediaItem>,
        fail: bool,
        fetches: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn new(kind: SourceKind, items: Vec<MediaItem>) -> Self {
            Self {
                kind,
                items,
                fail: false,
                fetches: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(kind: SourceKind) -> Self {
            Self {
                fail: true,
                ..Self::new(kind, Vec::new())
            }
        }
    }

    impl MediaSource for FakeSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        fn fetch_collection(&self) -> Result<Vec<MediaItem>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(WastearrError::connectivity(
                    self.kind.name(),
                    "http://localhost",
                    "connection failed",
                ));
            }
            Ok(self.items.clone())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn media(id: i64, title: &str, content_type: ContentType, size: u64, rating: f64) -> MediaItem {
        MediaItem {
            id,
            title: title.to_string(),
            content_type,
            year: Some(2015),
            rating: Some(rating),
            size_on_disk: size,
        }
    }

    fn series_source() -> FakeSource {
        FakeSource::new(
            SourceKind::Sonarr,
            vec![media(1, "Bloated Show", ContentType::Series, 8 * GIB, 4.0)],
        )
    }

    fn movie_source() -> FakeSource {
        FakeSource::new(
            SourceKind::Radarr,
            vec![
                media(2, "Bloated Movie", ContentType::Movie, 8 * GIB, 4.0),
                media(3, "Lean Classic", ContentType::Movie, GIB, 9.0),
            ],
        )
    }

    fn boxed(sources: Vec<FakeSource>) -> Vec<Box<dyn MediaSource>> {
        sources
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn MediaSource>)
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ranking Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_merged_ranking_spans_both_sources() {
        let ranked =
            gather_and_rank(&boxed(vec![series_source(), movie_source()]), None, &Filters::default())
                .unwrap();

        let titles: Vec<&str> = ranked.iter().map(|s| s.item.title.as_str()).collect();
        assert_eq!(titles.len(), 3);
        assert_eq!(titles[2], "Lean Classic");
        assert_ne!(ranked[0].waste_score, ranked[1].waste_score);
    }

    #[test]
    fn test_failure_in_one_source_aborts_the_run() {
        let result = gather_and_rank(
            &boxed(vec![series_source(), FakeSource::failing(SourceKind::Radarr)]),
            None,
            &Filters::default(),
        );

        let err = result.unwrap_err();
        assert!(matches!(err, WastearrError::Connectivity { .. }));
        assert!(err.to_string().contains("Radarr"));
    }

    #[test]
    fn test_every_failing_source_is_reported() {
        let err = gather_and_rank(
            &boxed(vec![
                FakeSource::failing(SourceKind::Sonarr),
                FakeSource::failing(SourceKind::Radarr),
            ]),
            None,
            &Filters::default(),
        )
        .unwrap_err();

        assert!(matches!(err, WastearrError::Sources(ref errors) if errors.len() == 2));
        assert_eq!(err.exit_code(), 4);

        let message = err.to_string();
        let sonarr = message.find("Cannot reach Sonarr").unwrap();
        let radarr = message.find("Cannot reach Radarr").unwrap();
        assert!(sonarr < radarr, "failures are listed in source order");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cache Interaction Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_cache_hit_skips_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path(), FixedClock(now()));

        let first = series_source();
        let first_fetches = Arc::clone(&first.fetches);
        collect(&boxed(vec![first]), Some(&store)).unwrap();
        assert_eq!(first_fetches.load(Ordering::SeqCst), 1);

        let second = series_source();
        let second_fetches = Arc::clone(&second.fetches);
        let items = collect(&boxed(vec![second]), Some(&store)).unwrap();

        assert_eq!(second_fetches.load(Ordering::SeqCst), 0);
        assert_eq!(items, series_source().items);
    }

    #[test]
    fn test_expired_cache_refetches() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path(), FixedClock(now()));
        collect(&boxed(vec![series_source()]), Some(&store)).unwrap();

        let later = CacheStore::new(temp_dir.path(), FixedClock(now() + TimeDelta::hours(73)));
        let source = series_source();
        let fetches = Arc::clone(&source.fetches);
        collect(&boxed(vec![source]), Some(&later)).unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(later.get("series").is_some(), "refetched collection is cached again");
    }

    #[test]
    fn test_no_cache_neither_reads_nor_writes() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path(), FixedClock(now()));
        store
            .put("movies", &[media(9, "Stale", ContentType::Movie, GIB, 1.0)], now())
            .unwrap();

        let source = movie_source();
        let fetches = Arc::clone(&source.fetches);
        let items = collect(&boxed(vec![source]), None).unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(items, movie_source().items);
        assert_eq!(store.get("movies").unwrap().items[0].title, "Stale");
        assert!(store.get("series").is_none());
    }

    #[test]
    fn test_failed_fetch_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path(), FixedClock(now()));

        let result = collect(&boxed(vec![FakeSource::failing(SourceKind::Sonarr)]), Some(&store));

        assert!(result.is_err());
        assert!(store.get("series").is_none());
    }

    #[test]
    fn test_unwritable_cache_does_not_fail_run() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file in the way").unwrap();
        let store = CacheStore::new(&blocker, FixedClock(now()));

        let items = collect(&boxed(vec![series_source()]), Some(&store)).unwrap();

        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_load_source_reports_origin() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path(), FixedClock(now()));

        let (_, first) = load_source(&series_source(), Some(&store)).unwrap();
        let (items, second) = load_source(&series_source(), Some(&store)).unwrap();
        let (_, uncached) = load_source(&series_source(), None).unwrap();

        assert_eq!(first, Origin::Api);
        assert_eq!(second, Origin::Cache);
        assert_eq!(uncached, Origin::Api);
        assert_eq!(items, series_source().items);
    }
}
