use crate::enrichment::{
    apply_snapshot, EnrichmentOutcome, EnrichmentService, EnrichmentServiceTrait,
};
use crate::errors::{DatabaseError, Error, MarketDataError};
use crate::stocks::Stock;
use crate::test_utils::InMemoryStockRepository;
use async_trait::async_trait;
use rust_decimal_macros::dec;
use screener_market_data::{MarketDataProvider, Snapshot};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// --- Mock provider ---
enum Reply {
    Snapshot(Snapshot),
    SymbolNotFound,
    Hang,
    /// Deletes the record mid-fetch, then answers with the snapshot.
    DeleteDuringFetch(InMemoryStockRepository, Snapshot),
}

struct MockProvider {
    reply: Reply,
    calls: AtomicUsize,
    symbols: Mutex<Vec<String>>,
}

impl MockProvider {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            symbols: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn fetch_snapshot(&self, symbol: &str) -> Result<Snapshot, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.symbols.lock().unwrap().push(symbol.to_string());
        match &self.reply {
            Reply::Snapshot(snapshot) => Ok(Snapshot {
                symbol: symbol.to_string(),
                ..snapshot.clone()
            }),
            Reply::SymbolNotFound => Err(MarketDataError::SymbolNotFound(symbol.to_string())),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Snapshot::empty(symbol, "MOCK"))
            }
            Reply::DeleteDuringFetch(repository, snapshot) => {
                for stock in repository.all() {
                    repository.remove(stock.id);
                }
                Ok(snapshot.clone())
            }
        }
    }
}

fn aapl_snapshot() -> Snapshot {
    Snapshot {
        two_hundred_day_average: Some(130.0),
        fifty_day_average: Some(140.0),
        previous_close: Some(150.0),
        forward_pe: Some(25.0),
        forward_eps: Some(6.0),
        dividend_yield: Some(0.005),
        ..Snapshot::empty("AAPL", "MOCK")
    }
}

fn setup(reply: Reply) -> (EnrichmentService, InMemoryStockRepository, Arc<MockProvider>) {
    let repository = InMemoryStockRepository::new();
    let provider = Arc::new(MockProvider::new(reply));
    let service = EnrichmentService::new(Arc::new(repository.clone()), provider.clone());
    (service, repository, provider)
}

#[tokio::test]
async fn test_enrich_populates_every_field() {
    let (service, repository, provider) = setup(Reply::Snapshot(aapl_snapshot()));
    repository.insert(Stock::bare(1, "AAPL"));

    let outcome = service.enrich(1).await.unwrap();

    assert_eq!(outcome, EnrichmentOutcome::Enriched { populated: 6 });
    let stock = repository.get(1).unwrap();
    assert_eq!(stock.symbol, "AAPL");
    assert_eq!(stock.price, Some(dec!(150)));
    assert_eq!(stock.ma50, Some(dec!(140)));
    assert_eq!(stock.ma200, Some(dec!(130)));
    assert_eq!(stock.forward_pe, Some(dec!(25)));
    assert_eq!(stock.forward_eps, Some(dec!(6)));
    assert_eq!(stock.dividend_yield, Some(dec!(0.5)));
    assert_eq!(*provider.symbols.lock().unwrap(), vec!["AAPL".to_string()]);
}

#[tokio::test]
async fn test_enrich_null_dividend_stays_absent() {
    let snapshot = Snapshot {
        dividend_yield: None,
        ..aapl_snapshot()
    };
    let (service, repository, _) = setup(Reply::Snapshot(snapshot));
    repository.insert(Stock::bare(1, "AAPL"));

    let outcome = service.enrich(1).await.unwrap();

    assert_eq!(outcome, EnrichmentOutcome::Enriched { populated: 5 });
    let stock = repository.get(1).unwrap();
    assert_eq!(stock.dividend_yield, None);
    assert_eq!(stock.price, Some(dec!(150)));
    assert_eq!(stock.forward_eps, Some(dec!(6)));
}

#[tokio::test]
async fn test_enrich_missing_record_is_a_noop() {
    let (service, repository, provider) = setup(Reply::Snapshot(aapl_snapshot()));

    let outcome = service.enrich(42).await.unwrap();

    assert_eq!(outcome, EnrichmentOutcome::Skipped);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    assert!(repository.all().is_empty());
}

#[tokio::test]
async fn test_enrich_record_removed_during_fetch_is_skipped() {
    let repository = InMemoryStockRepository::new();
    repository.insert(Stock::bare(1, "AAPL"));
    let provider = Arc::new(MockProvider::new(Reply::DeleteDuringFetch(
        repository.clone(),
        aapl_snapshot(),
    )));
    let service = EnrichmentService::new(Arc::new(repository.clone()), provider.clone());

    let outcome = service.enrich(1).await.unwrap();

    assert_eq!(outcome, EnrichmentOutcome::Skipped);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert!(repository.all().is_empty());
}

#[tokio::test]
async fn test_enrich_gateway_error_leaves_record_bare() {
    let (service, repository, _) = setup(Reply::SymbolNotFound);
    repository.insert(Stock::bare(1, "ZZZZ"));

    let err = service.enrich(1).await.unwrap_err();

    assert!(matches!(
        err,
        Error::MarketData(MarketDataError::SymbolNotFound(_))
    ));
    assert!(repository.get(1).unwrap().is_bare());
}

#[tokio::test(start_paused = true)]
async fn test_enrich_times_out_slow_gateway() {
    let (service, repository, _) = setup(Reply::Hang);
    let service = service.with_timeout(Duration::from_secs(5));
    repository.insert(Stock::bare(1, "SLOW"));

    let err = service.enrich(1).await.unwrap_err();

    assert!(matches!(
        err,
        Error::MarketData(MarketDataError::Timeout { ref provider }) if provider == "MOCK"
    ));
    assert!(repository.get(1).unwrap().is_bare());
}

#[tokio::test]
async fn test_enrich_persistence_failure_is_returned() {
    let (service, repository, _) = setup(Reply::Snapshot(aapl_snapshot()));
    repository.insert(Stock::bare(1, "AAPL"));
    repository.fail_writes();

    let err = service.enrich(1).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Database(DatabaseError::QueryFailed(_))
    ));
    assert!(repository.get(1).unwrap().is_bare());
}

#[tokio::test]
async fn test_enrich_empty_snapshot_changes_nothing() {
    let (service, repository, _) = setup(Reply::Snapshot(Snapshot::empty("NEW", "MOCK")));
    repository.insert(Stock::bare(1, "NEW"));

    let outcome = service.enrich(1).await.unwrap();

    assert_eq!(outcome, EnrichmentOutcome::Enriched { populated: 0 });
    assert!(repository.get(1).unwrap().is_bare());
}

#[test]
fn test_apply_snapshot_never_clears_existing_fields() {
    let mut stock = Stock {
        price: Some(dec!(99)),
        forward_pe: Some(dec!(12)),
        ..Stock::bare(1, "KO")
    };
    let snapshot = Snapshot {
        previous_close: Some(101.0),
        ..Snapshot::empty("KO", "MOCK")
    };

    let populated = apply_snapshot(&mut stock, &snapshot);

    assert_eq!(populated, 1);
    assert_eq!(stock.price, Some(dec!(101)));
    assert_eq!(stock.forward_pe, Some(dec!(12)));
}

#[test]
fn test_apply_snapshot_scales_dividend_yield() {
    let mut stock = Stock::bare(1, "VZ");
    let snapshot = Snapshot {
        dividend_yield: Some(0.0675),
        ..Snapshot::empty("VZ", "MOCK")
    };

    apply_snapshot(&mut stock, &snapshot);

    assert_eq!(stock.dividend_yield, Some(dec!(6.75)));
}

#[test]
fn test_apply_snapshot_drops_nan() {
    let mut stock = Stock::bare(1, "ODD");
    let snapshot = Snapshot {
        forward_pe: Some(f64::NAN),
        forward_eps: Some(-1.5),
        ..Snapshot::empty("ODD", "MOCK")
    };

    let populated = apply_snapshot(&mut stock, &snapshot);

    assert_eq!(populated, 1);
    assert_eq!(stock.forward_pe, None);
    assert_eq!(stock.forward_eps, Some(dec!(-1.5)));
}
