//! Generic listing screen: remote fetch + filter pipeline + table state.

use crate::api::{AdminClient, RequestSequencer};
use crate::error::Result;
use crate::session::Role;
use crate::table::{apply_filter, empty_rows, FilterCriteria, Order, Record, TableState};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Static description of one listing screen
pub trait ScreenSpec: Send + Sync + 'static {
    /// Record shape the backend sends
    type Dto: DeserializeOwned + Send;
    /// View model rendered as a row
    type Row: Record + From<Self::Dto> + Send + Sync;

    /// Human-readable screen name for logs
    const NAME: &'static str;
    const ROLE: Role;
    const ENDPOINT: &'static str;
    const DEFAULT_ORDER_BY: &'static str;
    const DEFAULT_ORDER: Order = Order::Asc;
}

/// List payloads arrive either bare or wrapped in a paging object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListPayload<T> {
    Plain(Vec<T>),
    Wrapped {
        #[serde(alias = "docs", alias = "rows", alias = "results")]
        items: Vec<T>,
    },
}

impl<T> ListPayload<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Plain(items) | ListPayload::Wrapped { items } => items,
        }
    }
}

/// Lifecycle of the screen's data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenStatus {
    Idle,
    Loading,
    Ready,
    Failed { message: String },
}

/// What happened to one `load()` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Records replaced with the response
    Applied { count: usize },
    /// A newer load was issued before this response arrived
    Discarded,
    /// The request failed; the message is shown as a banner
    Failed { message: String },
}

/// Snapshot of everything a front-end needs to render the screen
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenView<R> {
    pub rows: Vec<R>,
    pub total: usize,
    pub filtered_total: usize,
    pub page: usize,
    pub rows_per_page: usize,
    pub page_count: usize,
    pub empty_rows: usize,
    pub order: Order,
    pub order_by: String,
    pub dense: bool,
    pub selected: Vec<String>,
    pub status: ScreenStatus,
}

struct ScreenState<R> {
    records: Vec<R>,
    table: TableState,
    criteria: FilterCriteria,
    status: ScreenStatus,
}

/// One listing screen bound to a backend endpoint
///
/// State sits behind a lock that is never held across an await, so loads
/// may overlap; only the most recently issued one is applied.
pub struct ListingScreen<S: ScreenSpec> {
    client: AdminClient,
    sequencer: RequestSequencer,
    state: RwLock<ScreenState<S::Row>>,
}

impl<S: ScreenSpec> ListingScreen<S> {
    pub fn new(client: AdminClient) -> Self {
        Self::with_table(
            client,
            TableState::new(S::DEFAULT_ORDER_BY).with_order(S::DEFAULT_ORDER),
        )
    }

    pub fn with_table(client: AdminClient, table: TableState) -> Self {
        Self {
            client,
            sequencer: RequestSequencer::new(),
            state: RwLock::new(ScreenState {
                records: Vec::new(),
                table,
                criteria: FilterCriteria::new(),
                status: ScreenStatus::Idle,
            }),
        }
    }

    pub fn client(&self) -> &AdminClient {
        &self.client
    }

    /// Fetch the screen's records
    ///
    /// Session errors are returned so the caller can redirect; every other
    /// failure is kept as the screen's banner.
    pub async fn load(&self) -> Result<LoadOutcome> {
        let ticket = self.sequencer.issue();
        self.state.write().status = ScreenStatus::Loading;
        debug!(screen = S::NAME, ticket = ticket.value(), "Loading records");

        let result = self
            .client
            .get::<ListPayload<S::Dto>>(S::ROLE, S::ENDPOINT)
            .await;

        // Checked under the lock so a newer load cannot apply in between
        let mut state = self.state.write();
        if !self.sequencer.is_current(ticket) {
            debug!(screen = S::NAME, ticket = ticket.value(), "Discarding stale response");
            return Ok(LoadOutcome::Discarded);
        }

        match result {
            Ok(payload) => {
                state.records = payload.into_vec().into_iter().map(S::Row::from).collect();
                state.status = ScreenStatus::Ready;
                let count = state.records.len();
                info!(screen = S::NAME, count, "Records loaded");
                Ok(LoadOutcome::Applied { count })
            }
            Err(e) if e.is_session_error() => {
                state.records.clear();
                state.table.on_reset_selected();
                state.status = ScreenStatus::Idle;
                Err(e)
            }
            Err(e) => {
                let message = e.banner();
                warn!(screen = S::NAME, error = %e, "Failed to load records");
                state.status = ScreenStatus::Failed {
                    message: message.clone(),
                };
                Ok(LoadOutcome::Failed { message })
            }
        }
    }

    /// Manual retry affordance; re-issues the same fetch
    pub async fn retry(&self) -> Result<LoadOutcome> {
        self.load().await
    }

    /// Render snapshot of the current page
    pub fn view(&self) -> ScreenView<S::Row> {
        let state = self.state.read();
        let filtered = apply_filter(&state.records, &state.table.comparator(), &state.criteria);
        let table = &state.table;

        ScreenView {
            rows: table.page_slice(&filtered).to_vec(),
            total: state.records.len(),
            filtered_total: filtered.len(),
            page: table.page(),
            rows_per_page: table.rows_per_page(),
            page_count: table.page_count(filtered.len()),
            empty_rows: empty_rows(table.page(), table.rows_per_page(), filtered.len()),
            order: table.order(),
            order_by: table.order_by().to_string(),
            dense: table.dense(),
            selected: table.selected().to_vec(),
            status: state.status.clone(),
        }
    }

    /// Every record passing the current criteria, in display order
    pub fn filtered(&self) -> Vec<S::Row> {
        let state = self.state.read();
        apply_filter(&state.records, &state.table.comparator(), &state.criteria)
    }

    pub fn status(&self) -> ScreenStatus {
        self.state.read().status.clone()
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.state.read().criteria.clone()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.update_criteria(|criteria| criteria.query = query.into());
    }

    /// Exact-match filter; `""` or `"all"` disables it
    pub fn set_filter(&self, field: impl Into<String>, value: impl Into<String>) {
        self.update_criteria(|criteria| {
            criteria.exact.insert(field.into(), value.into());
        });
    }

    /// List-membership filter; `""` or `"all"` disables it
    pub fn set_membership_filter(&self, field: impl Into<String>, value: impl Into<String>) {
        self.update_criteria(|criteria| {
            criteria.membership.insert(field.into(), value.into());
        });
    }

    pub fn clear_filters(&self) {
        self.update_criteria(|criteria| *criteria = FilterCriteria::new());
    }

    // Criteria changes always return to the first page with nothing selected
    fn update_criteria(&self, f: impl FnOnce(&mut FilterCriteria)) {
        let mut state = self.state.write();
        f(&mut state.criteria);
        state.table.on_reset_page();
        state.table.on_reset_selected();
    }

    pub fn sort_by(&self, field: &str) {
        self.state.write().table.on_sort(field);
    }

    pub fn set_page(&self, page: usize) {
        self.state.write().table.on_change_page(page);
    }

    pub fn set_rows_per_page(&self, rows_per_page: usize) {
        self.state.write().table.on_change_rows_per_page(rows_per_page);
    }

    pub fn set_dense(&self, dense: bool) {
        self.state.write().table.on_change_dense(dense);
    }

    pub fn toggle_row(&self, id: &str) {
        self.state.write().table.on_select_row(id);
    }

    /// Select every row on the current page, or clear the selection
    pub fn toggle_all(&self, checked: bool) {
        let mut state = self.state.write();
        let filtered = apply_filter(&state.records, &state.table.comparator(), &state.criteria);
        let ids: Vec<String> = state
            .table
            .page_slice(&filtered)
            .iter()
            .map(|row| row.id().to_string())
            .collect();
        state.table.on_select_all_rows(checked, ids);
    }

    /// Optimistically update one record after a successful mutation
    pub fn patch(&self, id: &str, f: impl FnOnce(&mut S::Row)) -> bool {
        let mut state = self.state.write();
        match state.records.iter_mut().find(|row| row.id() == id) {
            Some(row) => {
                f(row);
                true
            }
            None => false,
        }
    }

    /// Optimistically drop one record that no longer belongs on this screen
    pub fn remove(&self, id: &str) -> bool {
        let mut state = self.state.write();
        let before = state.records.len();
        state.records.retain(|row| row.id() != id);
        if state.table.is_selected(id) {
            state.table.on_select_row(id);
        }
        state.records.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::players::PlayersScreen;
    use crate::session::{MemorySessionStore, SessionStore};
    use crate::token::test_support::token_expiring;
    use ca_config::ApiConfig;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn players_screen(server: &MockServer) -> Arc<ListingScreen<PlayersScreen>> {
        let store = Arc::new(MemorySessionStore::new());
        store.set(Role::Admin, &token_expiring(Utc::now(), 3600)).unwrap();
        let config = ApiConfig {
            host: format!("http://{}", server.address().ip()),
            port: server.address().port(),
            ..ApiConfig::default()
        };
        let client = AdminClient::new(&config, store).unwrap();
        Arc::new(ListingScreen::new(client))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_load_superseded_while_waiting_for_lock_is_discarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/players"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"_id": "p1"}]))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let screen = players_screen(&server).await;
        let loading = {
            let screen = Arc::clone(&screen);
            tokio::spawn(async move { screen.load().await })
        };

        while server.received_requests().await.unwrap_or_default().is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        // The response arrives while the state lock is held elsewhere
        let guard = screen.state.write();
        tokio::time::sleep(Duration::from_millis(600)).await;

        // A newer load is issued before the older one gets the lock
        screen.sequencer.issue();
        drop(guard);

        assert_eq!(loading.await.unwrap().unwrap(), LoadOutcome::Discarded);
        assert_eq!(screen.view().total, 0);
    }
}
