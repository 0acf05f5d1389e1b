use crate::handlers;
use axum::routing::get;
use axum::Router;
use roboto::DocumentCache;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Router serving robots.txt (at every configured path) and both sitemaps.
///
/// Paths come from the cache's config. The sitemaps are mounted first, so a
/// robots alias that collides with a sitemap path is the one skipped.
/// Duplicates and paths the router can't mount literally are skipped with a
/// warning.
pub fn robots_router(cache: Arc<DocumentCache>) -> Router {
    let config = cache.config();
    let mut mounted = HashSet::new();
    let mut router: Router<Arc<DocumentCache>> = Router::new();

    let routes = [
        (config.sitemap_xml_path.as_str(), get(handlers::sitemap_xml)),
        (config.sitemap_txt_path.as_str(), get(handlers::sitemap_txt)),
    ]
    .into_iter()
    .chain(
        config
            .robots_paths
            .iter()
            .map(|path| (path.as_str(), get(handlers::robots_txt))),
    );

    for (path, handler) in routes {
        if !mountable(path) {
            warn!(path, "skipping unmountable document path");
            continue;
        }
        if !mounted.insert(path.to_string()) {
            warn!(path, "skipping duplicate document path");
            continue;
        }
        router = router.route(path, handler);
    }

    info!(paths = ?mounted, "document routes mounted");
    router.with_state(cache)
}

fn mountable(path: &str) -> bool {
    path.starts_with('/') && !path.contains([':', '*', '{', '}'])
}

/// A running HTTP server with graceful shutdown.
pub struct Server {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Server {
    /// Bind `addr` and serve `app` on a background task.
    pub async fn bind(addr: SocketAddr, app: Router) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = served {
                warn!("server stopped with error: {e}");
            }
        });

        info!(%addr, "listening");
        Ok(Server {
            addr,
            shutdown: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(&mut self) -> Result<(), String> {
        if let Some(sender) = self.shutdown.take() {
            sender
                .send(())
                .map_err(|_| "failed to send server shutdown signal".to_string())
        } else {
            Ok(())
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;
    use roboto::RobotoConfig;

    async fn start(config: RobotoConfig) -> Server {
        let cache = Arc::new(DocumentCache::from_source(&demo::registry(), config).unwrap());
        let app = demo::router().merge(robots_router(cache));
        Server::bind("127.0.0.1:0".parse().unwrap(), app)
            .await
            .expect("start")
    }

    fn url(server: &Server, path: &str) -> String {
        format!("http://{}{path}", server.addr())
    }

    #[tokio::test]
    async fn test_binds_random_port() {
        let mut server = start(RobotoConfig::default()).await;
        assert_ne!(server.addr().port(), 0);
        server.shutdown().expect("shutdown");
        assert!(server.shutdown().is_ok());
    }

    #[tokio::test]
    async fn test_serves_robots_txt() {
        let mut server = start(RobotoConfig::default()).await;
        let response = reqwest::get(url(&server, "/robots.txt")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; charset=utf-8"
        );

        let body = response.text().await.unwrap();
        assert_eq!(
            body,
            format!(
                "User-agent: *\n\
                 Disallow: /bar/1\n\
                 Disallow: /bar/2\n\
                 \n\
                 User-agent: google\n\
                 Disallow: /baz/1\n\
                 \n\
                 Sitemap: http://{}/sitemap.xml\n",
                server.addr()
            )
        );
        server.shutdown().expect("shutdown");
    }

    #[tokio::test]
    async fn test_serves_sitemaps() {
        let mut server = start(RobotoConfig::default()).await;

        let response = reqwest::get(url(&server, "/sitemap.xml")).await.unwrap();
        assert_eq!(response.headers()["content-type"], "application/xml");
        let xml = response.text().await.unwrap();
        assert!(xml.contains(&format!("<loc>http://{}/foo/1</loc>", server.addr())));
        assert!(xml.contains(&format!("<loc>http://{}/bar/3</loc>", server.addr())));
        assert!(!xml.contains("/foo/3"));
        assert!(!xml.contains("/bar/1"));
        assert!(!xml.contains("/baz/1"));

        let txt = reqwest::get(url(&server, "/sitemap.txt"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(txt.lines().count(), 3);
        server.shutdown().expect("shutdown");
    }

    #[tokio::test]
    async fn test_legacy_aliases() {
        let mut server = start(RobotoConfig::default().with_legacy_robots_aliases()).await;
        let canonical = reqwest::get(url(&server, "/robots.txt"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();

        for alias in ["/robots", "/robot", "/robot.txt"] {
            let response = reqwest::get(url(&server, alias)).await.unwrap();
            assert_eq!(response.status(), 200, "{alias}");
            assert_eq!(response.text().await.unwrap(), canonical);
        }
        server.shutdown().expect("shutdown");
    }

    #[tokio::test]
    async fn test_unmounted_alias_is_not_found() {
        let mut server = start(RobotoConfig::default()).await;
        let response = reqwest::get(url(&server, "/robot.txt")).await.unwrap();
        assert_eq!(response.status(), 404);
        server.shutdown().expect("shutdown");
    }

    #[tokio::test]
    async fn test_colliding_and_bad_paths_are_skipped() {
        let config = RobotoConfig {
            robots_paths: vec![
                "/robots.txt".into(),
                "/robots.txt".into(),
                "robots".into(),
                "/:agent".into(),
                "/sitemap.xml".into(),
            ],
            ..Default::default()
        };
        let mut server = start(config).await;

        let response = reqwest::get(url(&server, "/sitemap.xml")).await.unwrap();
        assert_eq!(response.headers()["content-type"], "application/xml");
        assert!(response.text().await.unwrap().contains("<urlset"));

        let response = reqwest::get(url(&server, "/robots.txt")).await.unwrap();
        assert_eq!(response.headers()["content-type"], "text/plain; charset=utf-8");
        assert!(response.text().await.unwrap().starts_with("User-agent: *\n"));

        for unmounted in ["/robots", "/:agent"] {
            let response = reqwest::get(url(&server, unmounted)).await.unwrap();
            assert_eq!(response.status(), 404, "{unmounted}");
        }
        server.shutdown().expect("shutdown");
    }

    #[tokio::test]
    async fn test_demo_pages_still_served() {
        let mut server = start(RobotoConfig::default()).await;
        let body = reqwest::get(url(&server, "/bar/3"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "This is Bar3");
        server.shutdown().expect("shutdown");
    }
}
