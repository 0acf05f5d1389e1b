//! Memoized robots/sitemap documents.
//!
//! A [`DocumentCache`] owns the current classification snapshot and every
//! document rendered from it, keyed by document kind and request origin. Each
//! snapshot gets a process-unique generation number; rendered documents carry
//! the generation they came from. Swapping the snapshot drops every rendered
//! document.
//!
//! Origins come from request headers, so the number of stored documents per
//! snapshot is capped by `RobotoConfig::cache_capacity`; past the cap,
//! documents for new origins are rendered on every request and never stored.

use crate::classifier::{classify_source, Classification, ClassifierOptions};
use crate::config::RobotoConfig;
use crate::error::Result;
use crate::generate::{self, DocumentKind};
use crate::origin::Origin;
use crate::registry::RouteSource;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, RwLock};
use tracing::{debug, info};

/// Monotonic counter for snapshot generations.
static GENERATION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A rendered document, cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    kind: DocumentKind,
    generation: u64,
    body: Arc<str>,
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Generation of the classification snapshot this document was rendered from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }
}

/// Render and hit counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub generation: u64,
    pub renders: u64,
    pub hits: u64,
    /// Renders that were not stored because the cache was full.
    pub uncached: u64,
    pub documents: usize,
}

type SlotKey = (DocumentKind, Option<Origin>);

/// One memoized document. The value is set at most once; `init` serializes
/// the first render so concurrent callers wait instead of rendering again.
#[derive(Default)]
struct Slot {
    value: OnceLock<Document>,
    init: Mutex<()>,
}

/// A classification snapshot and the documents rendered from it.
struct Snapshot {
    generation: u64,
    classification: Arc<Classification>,
    slots: DashMap<SlotKey, Arc<Slot>>,
    reserved: AtomicUsize,
}

impl Snapshot {
    fn new(classification: Classification) -> Self {
        Self {
            generation: GENERATION_COUNTER.fetch_add(1, Ordering::Relaxed) + 1,
            classification: Arc::new(classification),
            slots: DashMap::new(),
            reserved: AtomicUsize::new(0),
        }
    }

    /// The slot for `key`, created if there is room. `None` once `capacity`
    /// slots exist.
    fn slot(&self, key: SlotKey, capacity: usize) -> Option<Arc<Slot>> {
        // Release the shard read guard before `entry` takes the write guard.
        let existing = self.slots.get(&key).map(|slot| Arc::clone(slot.value()));
        if existing.is_some() {
            return existing;
        }

        match self.slots.entry(key) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                self.reserved
                    .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                        (n < capacity).then_some(n + 1)
                    })
                    .ok()?;
                Some(Arc::clone(entry.insert(Arc::default()).value()))
            }
        }
    }
}

/// Shared cache of generated documents.
///
/// Built once by the composition root and handed to request handlers behind
/// an `Arc`. Classification never happens on the request path; only the first
/// request for a (kind, origin) pair renders.
pub struct DocumentCache {
    config: RobotoConfig,
    snapshot: RwLock<Arc<Snapshot>>,
    renders: AtomicU64,
    hits: AtomicU64,
    uncached: AtomicU64,
}

impl DocumentCache {
    /// Wrap an existing classification.
    pub fn new(classification: Classification, config: RobotoConfig) -> Self {
        let snapshot = Snapshot::new(classification);
        info!(generation = snapshot.generation, "document cache ready");
        Self {
            config,
            snapshot: RwLock::new(Arc::new(snapshot)),
            renders: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            uncached: AtomicU64::new(0),
        }
    }

    /// Classify the host's routes and build a cache over the result.
    pub fn from_source(source: &dyn RouteSource, config: RobotoConfig) -> Result<Self> {
        let classification = classify_source(source, &ClassifierOptions::from(&config))?;
        Ok(Self::new(classification, config))
    }

    pub fn config(&self) -> &RobotoConfig {
        &self.config
    }

    /// The current classification snapshot.
    pub fn classification(&self) -> Arc<Classification> {
        Arc::clone(&self.current().classification)
    }

    /// Generation of the current snapshot.
    pub fn generation(&self) -> u64 {
        self.current().generation
    }

    pub fn robots_txt(&self, origin: Option<&Origin>) -> Result<Document> {
        self.get(DocumentKind::RobotsTxt, origin)
    }

    pub fn sitemap_xml(&self, origin: Option<&Origin>) -> Result<Document> {
        self.get(DocumentKind::SitemapXml, origin)
    }

    pub fn sitemap_txt(&self, origin: Option<&Origin>) -> Result<Document> {
        self.get(DocumentKind::SitemapTxt, origin)
    }

    /// Return the cached document, rendering it on first access.
    ///
    /// Render failures are returned to every waiting caller and are not
    /// stored; the next request renders again.
    pub fn get(&self, kind: DocumentKind, origin: Option<&Origin>) -> Result<Document> {
        let snapshot = self.current();
        let Some(slot) = snapshot.slot((kind, origin.cloned()), self.config.cache_capacity) else {
            self.uncached.fetch_add(1, Ordering::Relaxed);
            debug!(
                document = %kind,
                origin = ?origin.map(|o| o.to_string()),
                "document cache full; rendering without storing"
            );
            return self.render(&snapshot, kind, origin);
        };

        if let Some(document) = slot.value.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(document.clone());
        }

        let _guard = slot.init.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(document) = slot.value.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(document.clone());
        }

        let document = self.render(&snapshot, kind, origin)?;
        Ok(slot.value.get_or_init(|| document).clone())
    }

    fn render(
        &self,
        snapshot: &Snapshot,
        kind: DocumentKind,
        origin: Option<&Origin>,
    ) -> Result<Document> {
        let body = generate::render(
            kind,
            &snapshot.classification,
            origin,
            &self.config,
            Utc::now().date_naive(),
        )?;
        self.renders.fetch_add(1, Ordering::Relaxed);
        debug!(
            document = %kind,
            origin = ?origin.map(|o| o.to_string()),
            generation = snapshot.generation,
            bytes = body.len(),
            "rendered document"
        );

        Ok(Document {
            kind,
            generation: snapshot.generation,
            body: Arc::from(body),
        })
    }

    /// Replace the classification snapshot and drop every rendered document.
    ///
    /// Hosts that add, remove, or re-annotate routes at runtime call this
    /// after re-classifying. Returns the new generation.
    pub fn invalidate(&self, classification: Classification) -> u64 {
        let snapshot = Arc::new(Snapshot::new(classification));
        let generation = snapshot.generation;
        *self.snapshot.write().unwrap_or_else(|e| e.into_inner()) = snapshot;
        info!(generation, "document cache invalidated");
        generation
    }

    /// Re-enumerate the host's routes and invalidate on success.
    ///
    /// When enumeration fails the current snapshot stays in place.
    pub fn reload(&self, source: &dyn RouteSource) -> Result<u64> {
        let classification = classify_source(source, &ClassifierOptions::from(&self.config))?;
        Ok(self.invalidate(classification))
    }

    pub fn stats(&self) -> CacheStats {
        let snapshot = self.current();
        CacheStats {
            generation: snapshot.generation,
            renders: self.renders.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            uncached: self.uncached.load(Ordering::Relaxed),
            documents: snapshot
                .slots
                .iter()
                .filter(|entry| entry.value().value.get().is_some())
                .count(),
        }
    }

    fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(|e| e.into_inner()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::Directive;
    use crate::error::RobotoError;
    use crate::registry::FnSource;
    use crate::route::RouteDescriptor;
    use std::thread;

    fn routes() -> Vec<RouteDescriptor> {
        vec![
            RouteDescriptor::get("/foo/1").unwrap(),
            RouteDescriptor::get("/bar/1")
                .unwrap()
                .with_class_directive(Some(Directive::disallow())),
        ]
    }

    fn cache() -> DocumentCache {
        DocumentCache::from_source(&routes(), RobotoConfig::default()).unwrap()
    }

    fn origin(url: &str) -> Origin {
        Origin::from_url(url).unwrap()
    }

    #[test]
    fn test_renders_once_per_kind_and_origin() {
        let cache = cache();
        let local = origin("http://localhost:8080");

        let first = cache.robots_txt(Some(&local)).unwrap();
        let second = cache.robots_txt(Some(&local)).unwrap();
        assert_eq!(first, second);
        assert!(first.body().contains("Disallow: /bar/1"));
        assert!(first
            .body()
            .ends_with("Sitemap: http://localhost:8080/sitemap.xml\n"));

        let stats = cache.stats();
        assert_eq!(stats.renders, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.documents, 1);
    }

    #[test]
    fn test_documents_are_per_origin() {
        let cache = cache();
        let a = cache
            .sitemap_txt(Some(&origin("http://localhost:8080")))
            .unwrap();
        let b = cache
            .sitemap_txt(Some(&origin("https://example.com")))
            .unwrap();

        assert_eq!(a.body(), "http://localhost:8080/foo/1\n");
        assert_eq!(b.body(), "https://example.com:443/foo/1\n");
        assert_eq!(cache.stats().renders, 2);
    }

    #[test]
    fn test_document_metadata() {
        let cache = cache();
        let doc = cache.sitemap_xml(None).unwrap();
        assert_eq!(doc.kind(), DocumentKind::SitemapXml);
        assert_eq!(doc.content_type(), "application/xml");
        assert_eq!(doc.generation(), cache.generation());
        assert!(doc.body().contains("<loc>/foo/1</loc>"));
    }

    #[test]
    fn test_concurrent_first_access_renders_once() {
        let cache = Arc::new(cache());
        let local = origin("http://localhost:8080");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let local = local.clone();
                thread::spawn(move || cache.sitemap_xml(Some(&local)).unwrap())
            })
            .collect();

        let bodies: Vec<Document> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(bodies.windows(2).all(|w| w[0] == w[1]));

        let stats = cache.stats();
        assert_eq!(stats.renders, 1);
        assert_eq!(stats.hits, 15);
    }

    #[test]
    fn test_invalidate_swaps_snapshot() {
        let cache = cache();
        let local = origin("http://localhost:8080");
        let before = cache.sitemap_txt(Some(&local)).unwrap();

        let mut updated = routes();
        updated.push(RouteDescriptor::get("/foo/2").unwrap());
        let generation = cache.reload(&updated).unwrap();

        assert!(generation > before.generation());
        assert_eq!(cache.generation(), generation);
        assert_eq!(cache.stats().documents, 0);

        let after = cache.sitemap_txt(Some(&local)).unwrap();
        assert_eq!(
            after.body(),
            "http://localhost:8080/foo/1\nhttp://localhost:8080/foo/2\n"
        );
        assert_eq!(after.generation(), generation);
    }

    #[test]
    fn test_failed_reload_keeps_snapshot() {
        let cache = cache();
        let generation = cache.generation();

        let failing = FnSource(|| -> Result<Vec<RouteDescriptor>> {
            Err(RobotoError::route_source("controller registry unavailable"))
        });
        let err = cache.reload(&failing).unwrap_err();

        assert!(matches!(err, RobotoError::RouteSource(_)));
        assert_eq!(cache.generation(), generation);
        assert!(cache.classification().is_allowed("/foo/1"));
    }

    #[test]
    fn test_failed_source_fails_construction() {
        let failing = FnSource(|| -> Result<Vec<RouteDescriptor>> {
            Err(RobotoError::route_source("boom"))
        });
        assert!(DocumentCache::from_source(&failing, RobotoConfig::default()).is_err());
    }

    #[test]
    fn test_stored_documents_are_capped() {
        let config = RobotoConfig {
            cache_capacity: 4,
            ..Default::default()
        };
        let cache = DocumentCache::from_source(&routes(), config).unwrap();

        for i in 0..100 {
            let host = origin(&format!("http://host{i}.example"));
            let doc = cache.sitemap_txt(Some(&host)).unwrap();
            assert_eq!(doc.body(), format!("http://host{i}.example:80/foo/1\n"));
        }

        let stats = cache.stats();
        assert_eq!(stats.documents, 4);
        assert_eq!(stats.renders, 100);
        assert_eq!(stats.uncached, 96);

        // Origins stored before the cap keep hitting.
        cache.sitemap_txt(Some(&origin("http://host0.example"))).unwrap();
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().renders, 100);
    }

    #[test]
    fn test_zero_capacity_never_stores() {
        let config = RobotoConfig {
            cache_capacity: 0,
            ..Default::default()
        };
        let cache = DocumentCache::from_source(&routes(), config).unwrap();
        cache.robots_txt(None).unwrap();
        cache.robots_txt(None).unwrap();

        let stats = cache.stats();
        assert_eq!(stats.documents, 0);
        assert_eq!(stats.renders, 2);
    }

    #[test]
    fn test_generations_are_unique() {
        let a = cache();
        let b = cache();
        assert_ne!(a.generation(), b.generation());
    }
}
