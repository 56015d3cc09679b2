//! Lookup flow against an in-memory resolver: validation, single call,
//! normalization, and error kinds passed through untouched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use toolbench_net::dns::{
    lookup, MxRecord, RawAnswer, RecordType, ResolveError, Resolver, SoaRecord,
};

#[derive(Default)]
struct FakeResolver {
    answers: HashMap<(String, RecordType), Result<RawAnswer, ResolveError>>,
    calls: AtomicUsize,
}

impl FakeResolver {
    fn with(mut self, domain: &str, t: RecordType, answer: Result<RawAnswer, ResolveError>) -> Self {
        self.answers.insert((domain.to_string(), t), answer);
        self
    }
}

impl Resolver for FakeResolver {
    async fn resolve(&self, domain: &str, record_type: RecordType) -> Result<RawAnswer, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .get(&(domain.to_string(), record_type))
            .cloned()
            .unwrap_or(Err(ResolveError::NotFound))
    }
}

fn mx(priority: u16, exchange: &str) -> MxRecord {
    MxRecord {
        priority,
        exchange: exchange.to_string(),
    }
}

#[tokio::test]
async fn mx_lookup_is_sorted_stably() {
    let resolver = FakeResolver::default().with(
        "example.com",
        RecordType::Mx,
        Ok(RawAnswer::Mail(vec![mx(20, "b"), mx(10, "a"), mx(10, "c")])),
    );

    let result = lookup(&resolver, "example.com.", RecordType::Mx).await.unwrap();

    assert_eq!(result.domain, "example.com");
    let exchanges: Vec<&str> = result.records.iter().map(|r| r.value.as_str()).collect();
    assert_eq!(exchanges, vec!["a", "c", "b"]);
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn soa_lookup_returns_single_row() {
    let resolver = FakeResolver::default().with(
        "example.com",
        RecordType::Soa,
        Ok(RawAnswer::Authority(SoaRecord {
            mname: "ns.example.com".into(),
            rname: "admin.example.com".into(),
            serial: 1,
            refresh: 2,
            retry: 3,
            expire: 4,
            minimum: 5,
        })),
    );

    let result = lookup(&resolver, "example.com", RecordType::Soa).await.unwrap();
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].value, "ns.example.com admin.example.com 1 2 3 4 5");
}

#[tokio::test]
async fn error_kinds_pass_through() {
    let resolver = FakeResolver::default()
        .with("nodata.example", RecordType::Txt, Err(ResolveError::NoData))
        .with(
            "broken.example",
            RecordType::A,
            Err(ResolveError::ServerFailure("SERVFAIL".into())),
        );

    assert_eq!(
        lookup(&resolver, "missing.example", RecordType::A).await.unwrap_err(),
        ResolveError::NotFound
    );
    assert_eq!(
        lookup(&resolver, "nodata.example", RecordType::Txt).await.unwrap_err(),
        ResolveError::NoData
    );
    assert!(matches!(
        lookup(&resolver, "broken.example", RecordType::A).await.unwrap_err(),
        ResolveError::ServerFailure(_)
    ));
}

#[tokio::test]
async fn empty_answer_is_no_data() {
    let resolver = FakeResolver::default().with(
        "empty.example",
        RecordType::Aaaa,
        Ok(RawAnswer::Addresses(Vec::new())),
    );

    let err = lookup(&resolver, "empty.example", RecordType::Aaaa).await.unwrap_err();
    assert_eq!(err, ResolveError::NoData);
}

#[tokio::test]
async fn invalid_domain_never_reaches_resolver() {
    let resolver = FakeResolver::default();

    let err = lookup(&resolver, "not a domain", RecordType::A).await.unwrap_err();
    assert!(matches!(err, ResolveError::InvalidDomain(_)));
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
}
