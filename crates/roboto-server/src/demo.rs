//! Demo application: three handler groups exercising every directive rule.
//!
//! - `FooController`: no directives; `foo3` is POST-only and never listed.
//! - `BarController`: disallowed for everyone, except `bar3` which is allowed.
//! - `BazController`: disallowed for `google` only.

use axum::routing::{get, post};
use axum::Router;
use roboto::{Directive, Handler, HandlerGroup, RouteRegistry};

/// Route table of the demo application, as registered with the classifier.
pub fn registry() -> RouteRegistry {
    RouteRegistry::new()
        .with_group(
            HandlerGroup::new("FooController")
                .handler(Handler::get("foo1", "/foo/1"))
                .handler(Handler::get("foo2", "/foo/2"))
                .handler(Handler::post("foo3", "/foo/3")),
        )
        .with_group(
            HandlerGroup::new("BarController")
                .directive(Directive::disallow())
                .handler(Handler::get("bar1", "/bar/1"))
                .handler(Handler::get("bar2", "/bar/2"))
                .handler(Handler::get("bar3", "bar/3").directive(Directive::allow())),
        )
        .with_group(
            HandlerGroup::new("BazController")
                .directive(Directive::disallow_for(["google"]))
                .handler(Handler::get("baz1", "/baz/1")),
        )
}

/// The demo pages themselves.
pub fn router() -> Router {
    Router::new()
        .route("/foo/1", get(|| page("Foo1")))
        .route("/foo/2", get(|| page("Foo2")))
        .route("/foo/3", post(|| page("Foo3")))
        .route("/bar/1", get(|| page("Bar1")))
        .route("/bar/2", get(|| page("Bar2")))
        .route("/bar/3", get(|| page("Bar3")))
        .route("/baz/1", get(|| page("Baz1")))
}

async fn page(name: &'static str) -> String {
    format!("This is {name}")
}
