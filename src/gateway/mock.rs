//! # Mock Gateway
//!
//! Scripted [`CatalogGateway`] for testing the session layer without a service.
//!
//! Queue the calls you expect with the `expect_*` builders, run the code under
//! test, then call [`MockGateway::verify`]. Calls are matched strictly in order;
//! an unexpected call panics with the operation name so the failing test points
//! at the out-of-order request.
//!
//! ```ignore
//! let mock = MockGateway::new();
//! mock.expect_list_all().return_ok(vec![cap]);
//! mock.expect_delete(cap.id.clone()).return_err(RemoteError::from_status(500, "boom"));
//!
//! let mut controller = CatalogSessionController::new(mock.clone(), AlwaysConfirm);
//! // ...
//! mock.verify();
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{CatalogGateway, RemoteError};
use crate::model::{Product, ProductDraft, ProductId, SearchCriteria};

/// A request the mock received, kept for later assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    ListAll,
    Get(ProductId),
    Search(SearchCriteria),
    Create(ProductDraft),
    Update(ProductId, ProductDraft),
    Delete(ProductId),
}

enum Expectation {
    ListAll(Result<Vec<Product>, RemoteError>),
    Get {
        id: ProductId,
        response: Result<Product, RemoteError>,
    },
    Search(Result<Vec<Product>, RemoteError>),
    Create(Result<Product, RemoteError>),
    Update {
        id: ProductId,
        response: Result<Product, RemoteError>,
    },
    Delete {
        id: ProductId,
        response: Result<(), RemoteError>,
    },
}

impl Expectation {
    fn name(&self) -> &'static str {
        match self {
            Expectation::ListAll(_) => "list_all",
            Expectation::Get { .. } => "get",
            Expectation::Search(_) => "search",
            Expectation::Create(_) => "create",
            Expectation::Update { .. } => "update",
            Expectation::Delete { .. } => "delete",
        }
    }
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    calls: Vec<GatewayCall>,
}

/// A gateway that replays queued responses. Clones share the same queue.
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    /// Creates a mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_list_all(&self) -> ListingExpectationBuilder {
        ListingExpectationBuilder {
            state: self.state.clone(),
            search: false,
        }
    }

    pub fn expect_search(&self) -> ListingExpectationBuilder {
        ListingExpectationBuilder {
            state: self.state.clone(),
            search: true,
        }
    }

    pub fn expect_get(&self, id: impl Into<ProductId>) -> GetExpectationBuilder {
        GetExpectationBuilder {
            state: self.state.clone(),
            id: id.into(),
        }
    }

    pub fn expect_create(&self) -> CreateExpectationBuilder {
        CreateExpectationBuilder {
            state: self.state.clone(),
        }
    }

    pub fn expect_update(&self, id: impl Into<ProductId>) -> UpdateExpectationBuilder {
        UpdateExpectationBuilder {
            state: self.state.clone(),
            id: id.into(),
        }
    }

    pub fn expect_delete(&self, id: impl Into<ProductId>) -> DeleteExpectationBuilder {
        DeleteExpectationBuilder {
            state: self.state.clone(),
            id: id.into(),
        }
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Panics unless every queued expectation was consumed.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.expectations.is_empty() {
            let pending: Vec<_> = state.expectations.iter().map(Expectation::name).collect();
            panic!(
                "Not all expectations were met. {} remaining: {:?}",
                pending.len(),
                pending
            );
        }
    }

    fn next(&self, call: GatewayCall) -> Expectation {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());
        match state.expectations.pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected gateway call with no expectation left: {:?}", call),
        }
    }
}

#[async_trait]
impl CatalogGateway for MockGateway {
    async fn list_all(&self) -> Result<Vec<Product>, RemoteError> {
        match self.next(GatewayCall::ListAll) {
            Expectation::ListAll(response) => response,
            other => panic!("Expected {} but got list_all", other.name()),
        }
    }

    async fn get(&self, id: &ProductId) -> Result<Product, RemoteError> {
        match self.next(GatewayCall::Get(id.clone())) {
            Expectation::Get { id: expected, response } => {
                assert_eq!(&expected, id, "get called with unexpected id");
                response
            }
            other => panic!("Expected {} but got get", other.name()),
        }
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Product>, RemoteError> {
        match self.next(GatewayCall::Search(criteria.clone())) {
            Expectation::Search(response) => response,
            other => panic!("Expected {} but got search", other.name()),
        }
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, RemoteError> {
        match self.next(GatewayCall::Create(draft.clone())) {
            Expectation::Create(response) => response,
            other => panic!("Expected {} but got create", other.name()),
        }
    }

    async fn update(&self, id: &ProductId, draft: &ProductDraft) -> Result<Product, RemoteError> {
        match self.next(GatewayCall::Update(id.clone(), draft.clone())) {
            Expectation::Update { id: expected, response } => {
                assert_eq!(&expected, id, "update called with unexpected id");
                response
            }
            other => panic!("Expected {} but got update", other.name()),
        }
    }

    async fn delete(&self, id: &ProductId) -> Result<(), RemoteError> {
        match self.next(GatewayCall::Delete(id.clone())) {
            Expectation::Delete { id: expected, response } => {
                assert_eq!(&expected, id, "delete called with unexpected id");
                response
            }
            other => panic!("Expected {} but got delete", other.name()),
        }
    }
}

fn push(state: &Arc<Mutex<MockState>>, expectation: Expectation) {
    state.lock().unwrap().expectations.push_back(expectation);
}

/// Builder for `list_all` and `search` expectations.
pub struct ListingExpectationBuilder {
    state: Arc<Mutex<MockState>>,
    search: bool,
}

impl ListingExpectationBuilder {
    pub fn return_ok(self, products: Vec<Product>) {
        self.respond(Ok(products));
    }

    pub fn return_err(self, error: RemoteError) {
        self.respond(Err(error));
    }

    fn respond(self, response: Result<Vec<Product>, RemoteError>) {
        let expectation = if self.search {
            Expectation::Search(response)
        } else {
            Expectation::ListAll(response)
        };
        push(&self.state, expectation);
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder {
    state: Arc<Mutex<MockState>>,
    id: ProductId,
}

impl GetExpectationBuilder {
    pub fn return_ok(self, product: Product) {
        push(&self.state, Expectation::Get { id: self.id, response: Ok(product) });
    }

    pub fn return_err(self, error: RemoteError) {
        push(&self.state, Expectation::Get { id: self.id, response: Err(error) });
    }
}

/// Builder for `create` expectations.
pub struct CreateExpectationBuilder {
    state: Arc<Mutex<MockState>>,
}

impl CreateExpectationBuilder {
    pub fn return_ok(self, product: Product) {
        push(&self.state, Expectation::Create(Ok(product)));
    }

    pub fn return_err(self, error: RemoteError) {
        push(&self.state, Expectation::Create(Err(error)));
    }
}

/// Builder for `update` expectations.
pub struct UpdateExpectationBuilder {
    state: Arc<Mutex<MockState>>,
    id: ProductId,
}

impl UpdateExpectationBuilder {
    pub fn return_ok(self, product: Product) {
        push(&self.state, Expectation::Update { id: self.id, response: Ok(product) });
    }

    pub fn return_err(self, error: RemoteError) {
        push(&self.state, Expectation::Update { id: self.id, response: Err(error) });
    }
}

/// Builder for `delete` expectations.
pub struct DeleteExpectationBuilder {
    state: Arc<Mutex<MockState>>,
    id: ProductId,
}

impl DeleteExpectationBuilder {
    pub fn return_ok(self) {
        push(&self.state, Expectation::Delete { id: self.id, response: Ok(()) });
    }

    pub fn return_err(self, error: RemoteError) {
        push(&self.state, Expectation::Delete { id: self.id, response: Err(error) });
    }
}
