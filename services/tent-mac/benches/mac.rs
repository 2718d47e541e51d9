use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use tentapp_core::{Context, SignRequest};
use tentapp_mac::{canonical_request_string, compute_mac, Credential, MacAlgorithm, RequestSigner};

criterion_group!(benches, bench);
criterion_main!(benches);

pub fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("tent_mac");

    group.bench_function("canonical_request_string", |b| {
        b.iter(|| {
            canonical_request_string(
                1355000000,
                "0a1b2c3d4e5f6a7b",
                "GET",
                "https://api.example.test/posts?limit=10",
            )
            .expect("must success")
        })
    });

    group.bench_function("compute_mac", |b| {
        let s = "1355000000\n0a1b2c3d4e5f6a7b\nGET\n/posts\napi.example.test\n443\n\n";
        b.iter(|| compute_mac(MacAlgorithm::HmacSha256, b"secret", s))
    });

    group.bench_function("sign_request", |b| {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("must success");
        let cred = Credential::new("key_id", "key");
        let signer = RequestSigner::new();
        let ctx = Context::new();

        b.to_async(&runtime).iter(|| async {
            let (mut parts, _) = http::Request::get("https://api.example.test/posts")
                .body(())
                .expect("request must be valid")
                .into_parts();

            signer
                .sign_request(&ctx, &mut parts, Some(&cred))
                .await
                .expect("must success")
        })
    });

    group.finish();
}
