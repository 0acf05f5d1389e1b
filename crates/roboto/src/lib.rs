//! Roboto: robots.txt and sitemap generation from an application's own route
//! table.
//!
//! The host registers its handlers (with optional allow/disallow directives at
//! group and handler scope), the classifier resolves every GET route into an
//! allowed set and a per-agent disallow map, and the [`DocumentCache`] renders
//! robots.txt, sitemap.xml and sitemap.txt on demand.
//!
//! ```
//! use roboto::{Directive, DocumentCache, Handler, HandlerGroup, Origin, RobotoConfig, RouteRegistry};
//!
//! let registry = RouteRegistry::new().with_group(
//!     HandlerGroup::new("AdminController")
//!         .directive(Directive::disallow())
//!         .handler(Handler::get("dashboard", "/admin")),
//! );
//! let cache = DocumentCache::from_source(&registry, RobotoConfig::default()).unwrap();
//! let origin = Origin::from_url("https://example.com").unwrap();
//! let robots = cache.robots_txt(Some(&origin)).unwrap();
//! assert!(robots.body().contains("Disallow: /admin"));
//! ```

pub mod cache;
pub mod classifier;
pub mod config;
pub mod directive;
pub mod error;
pub mod generate;
pub mod origin;
pub mod registry;
pub mod resolver;
pub mod route;

pub use cache::{CacheStats, Document, DocumentCache};
pub use classifier::{classify, classify_source, Classification, ClassifierOptions};
pub use config::{ChangeFrequency, RobotoConfig};
pub use directive::{Directive, DEFAULT_PRIORITY, WILDCARD_AGENT};
pub use error::{Result, RobotoError};
pub use generate::DocumentKind;
pub use origin::Origin;
pub use registry::{FnSource, Handler, HandlerGroup, RouteRegistry, RouteSource};
pub use resolver::{resolve, Resolution};
pub use route::{HttpMethod, RouteDescriptor};
