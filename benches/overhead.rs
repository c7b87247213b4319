use axum::http::Request;
use axum::{Router, routing::get};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tideguard::{SecurityConfig, SecurityPolicy, build_security_layer};
use tower::ServiceExt;

// Raw Axum hello world
fn raw_axum_hello() -> Router {
    Router::new().route("/hello", get(|| async { "Hello, World!" }))
}

// Hello world behind the strict security layer
fn guarded_hello() -> Router {
    let layer = build_security_layer(&SecurityConfig::strict())
        .unwrap()
        .unwrap();
    Router::new()
        .route("/hello", get(|| async { "Hello, World!" }))
        .layer(layer)
}

async fn make_request(router: &Router, uri: &str) {
    let req = Request::builder()
        .uri(uri)
        .header("host", "example.com")
        .body(axum::body::Body::empty())
        .unwrap();

    let _response = router.clone().oneshot(req).await.unwrap();
}

fn benchmark_hello_world(c: &mut Criterion) {
    let mut group = c.benchmark_group("hello_world");

    let raw_router = raw_axum_hello();
    let guarded_router = guarded_hello();

    let rt = tokio::runtime::Runtime::new().unwrap();

    group.bench_function("raw_axum", |b| {
        b.iter(|| {
            rt.block_on(make_request(black_box(&raw_router), "https://example.com/hello"));
        });
    });

    group.bench_function("tideguard_headers", |b| {
        b.iter(|| {
            rt.block_on(make_request(black_box(&guarded_router), "https://example.com/hello"));
        });
    });

    group.bench_function("tideguard_redirect", |b| {
        b.iter(|| {
            rt.block_on(make_request(black_box(&guarded_router), "/hello?x=1"));
        });
    });

    group.finish();
}

fn benchmark_exempt_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("exempt_matching");

    let patterns: Vec<String> = (0..20).map(|i| format!("^api/v{}/hooks/", i)).collect();
    let config = SecurityConfig::builder().redirect_exempts(patterns).build();
    let policy = SecurityPolicy::new(&config).unwrap();

    group.bench_function("miss_20_patterns", |b| {
        b.iter(|| policy.is_exempt(black_box("account/settings/profile")));
    });

    group.bench_function("hit_last_pattern", |b| {
        b.iter(|| policy.is_exempt(black_box("api/v19/hooks/stripe")));
    });

    group.finish();
}

criterion_group!(benches, benchmark_hello_world, benchmark_exempt_matching);
criterion_main!(benches);
