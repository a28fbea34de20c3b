// Test helpers are intentionally partially used
#![allow(dead_code)]

use anyhow::{bail, Result};
use chrono::Utc;
use parking_lot::Mutex;
use product_catalog::domain::{
    ManualClock, MetricsPtr, NewProduct, Product, ProductSession, ProductUpdate, Repository,
    RepositoryPtr, Sleeper, SortKey,
};
use product_catalog::{
    build_router, create_collector_metrics, AuthConfig, ConnectionAcquirer, Governance,
    RateLimitConfig, RetryPolicy, SlidingLogRateLimiter, UnboundedProductCache,
};
use reqwest::Client;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

pub const API_TOKEN: &str = "test-token";

// ============================================================================
// In-memory persistence
// ============================================================================

#[derive(Default)]
struct Store {
    next_id: i64,
    products: BTreeMap<i64, Product>,
}

/// Repository double with scriptable connection failures.
#[derive(Default)]
pub struct InMemoryRepository {
    store: Arc<Mutex<Store>>,
    /// Number of upcoming `connect` calls that fail.
    failures_remaining: AtomicU32,
    /// Every `connect` call fails while set.
    unavailable: Mutex<bool>,
    connect_calls: AtomicU32,
}

impl InMemoryRepository {
    // ---
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The next `n` connection attempts fail, then connections succeed again.
    pub fn fail_next_connects(&self, n: u32) {
        self.failures_remaining.store(n, Ordering::SeqCst);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock() = unavailable;
    }

    pub fn connect_calls(&self) -> u32 {
        self.connect_calls.load(Ordering::SeqCst)
    }

    /// Writes a row directly, bypassing the HTTP layer and the cache.
    pub fn insert(&self, name: &str, price: f64, quantity: i32) -> Product {
        // ---
        let mut store = self.store.lock();
        insert_into(
            &mut store,
            NewProduct {
                name: name.to_string(),
                description: String::new(),
                price,
                quantity,
            },
        )
    }

    pub fn stored(&self, id: i64) -> Option<Product> {
        self.store.lock().products.get(&id).cloned()
    }
}

fn insert_into(store: &mut Store, product: NewProduct) -> Product {
    // ---
    store.next_id += 1;
    let now = Utc::now();
    let product = Product {
        id: store.next_id,
        name: product.name,
        description: product.description,
        price: product.price,
        quantity: product.quantity,
        created_at: now,
        updated_at: now,
    };
    store.products.insert(product.id, product.clone());
    product
}

#[async_trait::async_trait]
impl Repository for InMemoryRepository {
    async fn connect(&self) -> Result<Box<dyn ProductSession>> {
        // ---
        self.connect_calls.fetch_add(1, Ordering::SeqCst);

        if *self.unavailable.lock() {
            bail!("connection refused");
        }
        let scripted_failure = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if scripted_failure {
            bail!("connection reset");
        }

        Ok(Box::new(InMemorySession {
            store: self.store.clone(),
        }))
    }
}

struct InMemorySession {
    store: Arc<Mutex<Store>>,
}

#[async_trait::async_trait]
impl ProductSession for InMemorySession {
    async fn ping(&mut self) -> Result<()> {
        Ok(())
    }

    async fn list_products(&mut self, sort: SortKey) -> Result<Vec<Product>> {
        // ---
        let mut products: Vec<Product> = self.store.lock().products.values().cloned().collect();
        products.sort_by(|a, b| {
            let order = match sort {
                SortKey::Id => a.id.cmp(&b.id),
                SortKey::Name => a.name.cmp(&b.name),
                SortKey::Price => a.price.total_cmp(&b.price),
                SortKey::Quantity => a.quantity.cmp(&b.quantity),
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            order.then(a.id.cmp(&b.id))
        });
        Ok(products)
    }

    async fn get_product(&mut self, id: i64) -> Result<Option<Product>> {
        Ok(self.store.lock().products.get(&id).cloned())
    }

    async fn create_product(&mut self, product: NewProduct) -> Result<Product> {
        Ok(insert_into(&mut self.store.lock(), product))
    }

    async fn update_product(&mut self, id: i64, update: ProductUpdate) -> Result<Option<Product>> {
        // ---
        let mut store = self.store.lock();
        let Some(product) = store.products.get_mut(&id) else {
            return Ok(None);
        };
        product.name = update.name;
        product.description = update.description;
        product.price = update.price;
        product.quantity = update.quantity;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&mut self, id: i64) -> Result<bool> {
        Ok(self.store.lock().products.remove(&id).is_some())
    }
}

// ============================================================================
// Governance doubles
// ============================================================================

/// Sleeper that returns immediately and remembers every requested pause.
#[derive(Default)]
pub struct RecordingSleeper {
    naps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn naps(&self) -> Vec<Duration> {
        self.naps.lock().clone()
    }
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.naps.lock().push(duration);
    }
}

// ============================================================================
// Test Setup
// ============================================================================

/// Everything a test needs to drive and inspect one router instance.
pub struct TestApp {
    pub repository: Arc<InMemoryRepository>,
    pub clock: Arc<ManualClock>,
    pub sleeper: Arc<RecordingSleeper>,
    pub metrics: MetricsPtr,
    pub governance: Governance,
    pub auth: AuthConfig,
}

impl TestApp {
    // ---
    /// Default limits (10 requests per 60 s, 3 connection attempts 1 s apart).
    pub fn new() -> Self {
        Self::with_metrics(|clock| create_collector_metrics(clock).expect("collector metrics"))
    }

    pub fn with_metrics(
        make_metrics: impl FnOnce(Arc<ManualClock>) -> MetricsPtr,
    ) -> Self {
        // ---
        let clock = Arc::new(ManualClock::new());
        let sleeper = Arc::new(RecordingSleeper::default());
        let metrics = make_metrics(clock.clone());

        let governance = Governance::new(
            metrics.clone(),
            Arc::new(SlidingLogRateLimiter::new(
                RateLimitConfig::default(),
                clock.clone(),
            )),
            Arc::new(UnboundedProductCache::new()),
            ConnectionAcquirer::new(RetryPolicy::default(), sleeper.clone()),
        );

        Self {
            repository: InMemoryRepository::new(),
            clock,
            sleeper,
            metrics,
            governance,
            auth: AuthConfig {
                api_token: API_TOKEN.to_string(),
            },
        }
    }

    pub fn router(&self) -> axum::Router {
        // ---
        let repository: RepositoryPtr = self.repository.clone();
        build_router(repository, self.governance.clone(), &self.auth)
    }

    /// Serves the router on an ephemeral loopback port.
    pub async fn spawn(&self) -> TestServer {
        // ---
        let app = self.router();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        TestServer {
            addr,
            client: Client::new(),
        }
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
}

impl TestServer {
    // ---
    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn get_json(&self, path: &str) -> (reqwest::StatusCode, serde_json::Value) {
        // ---
        let res = self.get(path).await;
        let status = res.status();
        let body = res.json().await.unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    pub async fn create(&self, body: serde_json::Value) -> reqwest::Response {
        // ---
        self.client
            .post(self.url("/products"))
            .bearer_auth(API_TOKEN)
            .json(&body)
            .send()
            .await
            .unwrap()
    }
}
