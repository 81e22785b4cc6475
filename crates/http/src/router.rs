//! Router builder for the biblio HTTP server

use axum::{routing::get, Router};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use biblio_kernel::ModuleRegistry;

/// Builder for constructing the main HTTP router
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Add a route to the router
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount a module's router under the given base path.
    ///
    /// A root base path merges the module routes directly; any other base
    /// path nests them under the normalized prefix.
    pub fn mount(mut self, base_path: &str, module_router: Router) -> Self {
        let base = normalize_base_path(base_path);
        self.router = if is_root_path(&base) {
            self.router.merge(module_router)
        } else {
            self.router.nest(&base, module_router)
        };
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Add CORS middleware
    pub fn with_cors(mut self) -> Self {
        self.router = self.router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
        self
    }

    /// Add request ID middleware
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        self
    }

    /// Add timeout middleware
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.router = self
            .router
            .layer(TimeoutLayer::new(Duration::from_millis(timeout_ms)));
        self
    }

    /// Add OpenAPI documentation by collecting specs from all modules
    pub fn with_openapi(mut self, registry: &ModuleRegistry, base_path: &str) -> Self {
        // Start with base OpenAPI spec
        let mut openapi_spec = serde_json::json!({
            "openapi": "3.0.0",
            "info": {
                "title": "Biblio API",
                "version": "1.0.0",
                "description": "Book catalog REST API"
            },
            "paths": {},
            "components": {
                "schemas": {}
            }
        });

        // Add common message response schema
        openapi_spec["components"]["schemas"]["Message"] = serde_json::json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string"
                }
            },
            "required": ["message"]
        });

        // Add server health endpoint
        openapi_spec["paths"]["/healthz"] = serde_json::json!({
            "get": {
                "summary": "Health check",
                "responses": {
                    "200": {
                        "description": "OK",
                        "content": {
                            "text/plain": {
                                "schema": {
                                    "type": "string"
                                }
                            }
                        }
                    }
                }
            }
        });

        // Collect OpenAPI specs from all modules
        for module in registry.modules() {
            if let Some(module_spec) = module.openapi() {
                // Merge paths from module, prefixed with the base path
                if let Some(paths) = module_spec.get("paths") {
                    if let Some(paths_obj) = paths.as_object() {
                        for (path, path_item) in paths_obj {
                            let prefixed_path = join_base_path(base_path, path);
                            openapi_spec["paths"][prefixed_path] = path_item.clone();
                        }
                    }
                }

                // Merge schemas from module
                if let Some(components) = module_spec.get("components") {
                    if let Some(schemas) = components.get("schemas") {
                        if let Some(schemas_obj) = schemas.as_object() {
                            for (schema_name, schema_def) in schemas_obj {
                                openapi_spec["components"]["schemas"][schema_name] =
                                    schema_def.clone();
                            }
                        }
                    }
                }
            }
        }

        // Deserialize our JSON spec into a proper utoipa OpenApi object
        // so SwaggerUI can serve it correctly
        let openapi_obj: utoipa::openapi::OpenApi = serde_json::from_value(openapi_spec.clone())
            .unwrap_or_else(|_| {
                utoipa::openapi::OpenApiBuilder::new()
                    .info(
                        utoipa::openapi::InfoBuilder::new()
                            .title("Biblio API")
                            .version("1.0.0")
                            .build(),
                    )
                    .build()
            });

        // Mount Swagger UI at /swagger-ui with the merged OpenAPI spec
        self.router = self.router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi_obj.clone()),
        );

        // Also serve the raw JSON spec at /docs/openapi.json for external consumers
        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { axum::Json(openapi_spec.clone()) }),
        );

        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a configured base path: ensure a leading slash and no
/// trailing slash, collapsing empty input to `/`.
pub fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Whether a normalized base path is the bare root.
pub fn is_root_path(base_path: &str) -> bool {
    base_path == "/"
}

/// Join a base path and a route path for OpenAPI display purposes.
fn join_base_path(base_path: &str, path: &str) -> String {
    let base = normalize_base_path(base_path);
    if is_root_path(&base) {
        path.to_string()
    } else if path == "/" {
        base
    } else {
        format!("{}{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    use biblio_kernel::Module;

    #[test]
    fn normalizes_base_paths() {
        assert_eq!(normalize_base_path("/"), "/");
        assert_eq!(normalize_base_path(""), "/");
        assert_eq!(normalize_base_path("/api"), "/api");
        assert_eq!(normalize_base_path("/api/"), "/api");
        assert_eq!(normalize_base_path("api"), "/api");
    }

    #[test]
    fn joins_base_paths_for_docs() {
        assert_eq!(join_base_path("/", "/"), "/");
        assert_eq!(join_base_path("/", "/{title}"), "/{title}");
        assert_eq!(join_base_path("/api", "/"), "/api");
        assert_eq!(join_base_path("/api", "/{title}"), "/api/{title}");
    }

    #[tokio::test]
    async fn routes_are_reachable() {
        let router = RouterBuilder::new()
            .route("/test", get(|| async { "test" }))
            .build();

        let response = router
            .oneshot(Request::get("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn root_mount_merges_module_routes() {
        let module_router = Router::new().route("/", get(|| async { "module" }));

        let router = RouterBuilder::new().mount("/", module_router).build();

        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn prefixed_mount_nests_module_routes() {
        let module_router = Router::new().route("/{title}", get(|| async { "module" }));

        let router = RouterBuilder::new().mount("/api", module_router).build();

        let response = router
            .oneshot(Request::get("/api/Dune").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn middleware_chain_builds() {
        let router = RouterBuilder::new()
            .route("/health", get(|| async { "ok" }))
            .with_tracing()
            .with_cors()
            .with_request_id()
            .with_timeout(5000)
            .build();

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    struct DocsModule;

    impl Module for DocsModule {
        fn name(&self) -> &'static str {
            "docs-test"
        }

        fn openapi(&self) -> Option<serde_json::Value> {
            Some(serde_json::json!({
                "paths": {
                    "/": { "get": { "summary": "List" } },
                    "/{title}": { "get": { "summary": "Fetch" } }
                },
                "components": {
                    "schemas": {
                        "Book": { "type": "object" }
                    }
                }
            }))
        }
    }

    #[tokio::test]
    async fn openapi_spec_merges_module_fragments() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(DocsModule));

        let router = RouterBuilder::new().with_openapi(&registry, "/api").build();

        let response = router
            .oneshot(
                Request::get("/docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let spec: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert!(spec["paths"].get("/healthz").is_some());
        assert!(spec["paths"].get("/api").is_some());
        assert!(spec["paths"].get("/api/{title}").is_some());
        assert!(spec["components"]["schemas"].get("Book").is_some());
        assert!(spec["components"]["schemas"].get("Message").is_some());
    }
}
