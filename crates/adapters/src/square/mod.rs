//! Square adapter.
//!
//! Talks to the Square Connect v2 API. Every operation is scoped to the
//! merchant's first active location, discovered once and cached.
//!
//! Catalog, labor and order writes use optimistic concurrency: the object is
//! read first and resubmitted with the `version` Square returned. A version
//! mismatch surfaces as `SQUARE_VERSION_CONFLICT` and is never retried.

mod conversions;
pub mod mapping;
mod types;

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use pos_bridge_core::{
    ApiResponse, ConnectionStatus, ConnectionTest, CurrencyCode, Employee, EmployeeId,
    InventoryItem, InventoryItemId, MenuItem, MenuItemId, MenuItemUpdate, NewMenuItem, NewOrder,
    Order, OrderId, OrderQuery, OrderStatus, PaymentMethod, PaymentRequest, PaymentResult,
    PosProvider, ReportPeriod, SalesData, Shift, ShiftId, ShiftQuery, Transaction,
    TransactionId, TransactionQuery, WebhookId, WebhookRegistration,
};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};
use uuid::Uuid;

use self::conversions::CatalogIndex;
use self::types::{
    BatchChangeInventoryRequest, BatchChangeInventoryResponse, BatchRetrieveInventoryCountsRequest,
    BatchRetrieveInventoryCountsResponse, CashDetails, CatalogObject, CreateOrderRequest,
    CreatePaymentRequest, CreateShiftRequest, CreateWebhookSubscriptionRequest,
    DateTimeFilter, DeleteCatalogObjectResponse, ErrorResponse, ExternalDetails, InventoryChange,
    InventoryCount, InventoryPhysicalCount, LaborShift, ListCatalogResponse,
    ListLocationsResponse, ListPaymentsResponse, ListRefundsResponse,
    ListTeamMemberWagesResponse, OrderResponse, OrderSearchFilter, OrderSearchQuery,
    OrderSearchSort, Payment, PaymentRefund, PaymentResponse, RefundPaymentRequest,
    RefundResponse, RetrieveCatalogObjectResponse, RetrieveTeamMemberResponse,
    SearchOrdersRequest, SearchOrdersResponse, SearchShiftsRequest, SearchShiftsResponse,
    SearchTeamMembersRequest, SearchTeamMembersResponse, ShiftFilter, ShiftResponse,
    ShiftSearchQuery, SortSpec, SquareOrder, StateFilter, TeamMember, TeamMemberFilter,
    TeamMemberQuery, TeamMemberWage, TimeRange, UpdateOrderRequest, UpdateShiftRequest,
    UpsertCatalogObjectRequest, UpsertCatalogObjectResponse, WebhookSubscription,
    WebhookSubscriptionResponse,
};
use crate::adapter::PosAdapter;
use crate::config::NormalizedConfig;
use crate::connection::ConnectionState;
use crate::error::{NotFoundExt, PosError, respond, validate_webhook};
use crate::http::{HttpClient, HttpError, bearer_headers};
use crate::reporting::aggregate_sales;

const PROVIDER: PosProvider = PosProvider::Square;

/// API version pinned in the `Square-Version` header.
pub const SQUARE_VERSION: &str = "2025-01-23";

/// Page size requested from list and search endpoints.
const PAGE_SIZE: u32 = 100;

/// Scan bound for reports, which must see every record in the window.
const SCAN_ALL: usize = usize::MAX;

const MENU_TYPES: &str = "ITEM,CATEGORY,MODIFIER_LIST";
const INVENTORY_TYPES: &str = "ITEM,CATEGORY";

const CANCEL_REASON_METADATA_KEY: &str = "cancel_reason";

/// The location every operation is scoped to.
#[derive(Debug, Clone)]
struct ActiveLocation {
    id: String,
    currency: CurrencyCode,
}

/// [`PosAdapter`] for Square.
#[derive(Debug)]
pub struct SquareAdapter {
    http: HttpClient,
    connection: ConnectionState,
    location: OnceCell<ActiveLocation>,
}

impl SquareAdapter {
    /// Create an adapter. Performs no network I/O.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` if the access token is not a valid header value or
    /// the HTTP client cannot be built.
    pub fn new(config: NormalizedConfig) -> Result<Self, HttpError> {
        let retry = config.retry_policy();
        let token = config
            .api_key
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .unwrap_or_default();
        let headers = bearer_headers(token, &[("square-version", SQUARE_VERSION)])?;

        Ok(Self {
            http: HttpClient::new(config.base_url, headers, config.timeout, retry)?,
            connection: ConnectionState::default(),
            location: OnceCell::new(),
        })
    }

    /// Record rate-limit headers and wrap the outcome in an envelope.
    async fn finish<T>(
        &self,
        operation: &'static str,
        started: Instant,
        result: Result<T, PosError>,
    ) -> ApiResponse<T> {
        self.connection
            .record_rate_limit(self.http.rate_limit().await)
            .await;
        respond(PROVIDER, operation, started, result)
    }

    async fn location(&self) -> Result<&ActiveLocation, PosError> {
        self.location
            .get_or_try_init(|| self.fetch_location())
            .await
    }

    async fn fetch_location(&self) -> Result<ActiveLocation, PosError> {
        let response: ListLocationsResponse = self.http.get("/v2/locations", &[]).await?;
        let location = response
            .locations
            .into_iter()
            .find(|l| l.status.as_deref().is_none_or(|s| s == "ACTIVE"))
            .ok_or_else(|| PosError::Rejected {
                code: "NO_ACTIVE_LOCATION",
                message: "merchant has no active location".to_string(),
            })?;
        debug!(location_id = %location.id, "Resolved Square location");
        Ok(ActiveLocation {
            currency: location
                .currency
                .as_deref()
                .and_then(CurrencyCode::from_code)
                .unwrap_or_default(),
            id: location.id,
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    async fn catalog(&self, types: &str) -> Result<Vec<CatalogObject>, PosError> {
        let mut objects = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut query = vec![("types", types.to_string())];
            if let Some(cursor) = cursor.take() {
                query.push(("cursor", cursor));
            }
            let page: ListCatalogResponse = self.http.get("/v2/catalog/list", &query).await?;
            objects.extend(page.objects);
            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }
        Ok(objects)
    }

    async fn retrieve_item(
        &self,
        id: &MenuItemId,
    ) -> Result<RetrieveCatalogObjectResponse, PosError> {
        let response: RetrieveCatalogObjectResponse = self
            .http
            .get(
                &format!("/v2/catalog/object/{id}"),
                &[("include_related_objects", "true".to_string())],
            )
            .await
            .or_not_found("MENU_ITEM", id)?;
        if response.object.item_data.is_none() || response.object.is_deleted == Some(true) {
            return Err(PosError::not_found("MENU_ITEM", id));
        }
        Ok(response)
    }

    async fn menu_item(&self, id: &MenuItemId) -> Result<MenuItem, PosError> {
        let response = self.retrieve_item(id).await?;
        conversions::menu_item(&response.object, &CatalogIndex::new(&response.related_objects))
    }

    async fn upsert(&self, object: CatalogObject) -> Result<CatalogObject, PosError> {
        let request = UpsertCatalogObjectRequest {
            idempotency_key: Uuid::new_v4().to_string(),
            object,
        };
        let response: UpsertCatalogObjectResponse = self
            .http
            .post("/v2/catalog/object", &request)
            .await
            .map_err(version_conflict)?;
        Ok(response.catalog_object)
    }

    /// Id of the category named `name`, creating it when missing.
    async fn category_id(&self, name: &str) -> Result<String, PosError> {
        let existing = self
            .catalog("CATEGORY")
            .await?
            .into_iter()
            .find(|c| {
                c.category_data
                    .as_ref()
                    .and_then(|d| d.name.as_deref())
                    .is_some_and(|n| n.eq_ignore_ascii_case(name.trim()))
            });
        if let Some(category) = existing {
            return Ok(category.id);
        }

        debug!(category = name, "Creating Square category");
        let created = self
            .upsert(CatalogObject {
                kind: "CATEGORY".to_string(),
                id: "#category".to_string(),
                category_data: Some(types::CatalogCategory {
                    name: Some(name.trim().to_string()),
                }),
                ..CatalogObject::default()
            })
            .await?;
        Ok(created.id)
    }

    async fn modify_item(
        &self,
        id: &MenuItemId,
        update: &MenuItemUpdate,
    ) -> Result<MenuItem, PosError> {
        if update.is_empty() {
            return Err(PosError::InvalidRequest(
                "update contains no fields".to_string(),
            ));
        }
        let currency = self.location().await?.currency;
        let mut object = self.retrieve_item(id).await?.object;
        let category_id = match &update.category {
            Some(name) => Some(self.category_id(name).await?),
            None => None,
        };
        conversions::apply_update(&mut object, update, category_id, currency)?;
        self.upsert(object).await?;
        self.menu_item(id).await
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    async fn counts(
        &self,
        location_id: &str,
        only: Option<&InventoryItemId>,
    ) -> Result<Vec<InventoryCount>, PosError> {
        let mut counts = Vec::new();
        let mut cursor = None;
        loop {
            let request = BatchRetrieveInventoryCountsRequest {
                location_ids: vec![location_id.to_string()],
                catalog_object_ids: only.map(|id| vec![id.to_string()]),
                states: vec!["IN_STOCK".to_string()],
                cursor,
            };
            let page: BatchRetrieveInventoryCountsResponse = self
                .http
                .post("/v2/inventory/counts/batch-retrieve", &request)
                .await?;
            counts.extend(page.counts);
            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }
        Ok(counts)
    }

    async fn inventory(&self, only: Option<&InventoryItemId>) -> Result<Vec<InventoryItem>, PosError> {
        let location = self.location().await?;
        let (objects, counts) = tokio::join!(
            self.catalog(INVENTORY_TYPES),
            self.counts(&location.id, only)
        );
        let (objects, counts) = (objects?, counts?);

        let index = CatalogIndex::new(&objects);
        let counts: HashMap<&str, &InventoryCount> = counts
            .iter()
            .map(|c| (c.catalog_object_id.as_str(), c))
            .collect();

        conversions::tracked_variations(&objects, &index)
            .into_iter()
            .filter(|(_, variation, _)| only.is_none_or(|id| variation.id == id.as_str()))
            .map(|(item, variation, category)| {
                conversions::inventory_item(
                    item,
                    variation,
                    category,
                    counts.get(variation.id.as_str()).copied(),
                )
            })
            .collect()
    }

    // =========================================================================
    // Labor
    // =========================================================================

    async fn team_members(&self, location_id: &str) -> Result<Vec<TeamMember>, PosError> {
        let mut members = Vec::new();
        let mut cursor = None;
        loop {
            let request = SearchTeamMembersRequest {
                query: TeamMemberQuery {
                    filter: TeamMemberFilter {
                        location_ids: vec![location_id.to_string()],
                    },
                },
                limit: PAGE_SIZE,
                cursor,
            };
            let page: SearchTeamMembersResponse =
                self.http.post("/v2/team-members/search", &request).await?;
            members.extend(page.team_members);
            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }
        Ok(members)
    }

    async fn wages(&self, team_member_id: Option<&str>) -> Result<Vec<TeamMemberWage>, PosError> {
        let mut wages = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut query = vec![("limit", PAGE_SIZE.to_string())];
            if let Some(id) = team_member_id {
                query.push(("team_member_id", id.to_string()));
            }
            if let Some(cursor) = cursor.take() {
                query.push(("cursor", cursor));
            }
            let page: ListTeamMemberWagesResponse =
                self.http.get("/v2/labor/team-member-wages", &query).await?;
            wages.extend(page.team_member_wages);
            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }
        Ok(wages)
    }

    async fn team_member(&self, id: &EmployeeId) -> Result<TeamMember, PosError> {
        let response: RetrieveTeamMemberResponse = self
            .http
            .get(&format!("/v2/team-members/{id}"), &[])
            .await
            .or_not_found("EMPLOYEE", id)?;
        Ok(response.team_member)
    }

    async fn search_shifts(
        &self,
        location_id: &str,
        query: &ShiftQuery,
    ) -> Result<Vec<LaborShift>, PosError> {
        let start = (query.start.is_some() || query.end.is_some()).then(|| TimeRange {
            start_at: query.start,
            end_at: query.end,
        });
        let mut request = SearchShiftsRequest {
            query: ShiftSearchQuery {
                filter: ShiftFilter {
                    location_ids: vec![location_id.to_string()],
                    team_member_ids: query
                        .employee_id
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                    start,
                },
                sort: SortSpec {
                    field: "START_AT",
                    order: "DESC",
                },
            },
            limit: PAGE_SIZE,
            cursor: None,
        };
        let mut shifts = Vec::new();
        loop {
            let page: SearchShiftsResponse =
                self.http.post("/v2/labor/shifts/search", &request).await?;
            shifts.extend(page.shifts);
            match page.cursor {
                Some(next) if !next.is_empty() => request.cursor = Some(next),
                _ => break,
            }
        }
        Ok(shifts)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    async fn search_orders(
        &self,
        location_id: &str,
        status: Option<OrderStatus>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<Order>, PosError> {
        let mut orders = Vec::new();
        let mut cursor = None;
        while orders.len() < limit {
            let request = SearchOrdersRequest {
                location_ids: vec![location_id.to_string()],
                query: OrderSearchQuery {
                    filter: OrderSearchFilter {
                        state_filter: status.map(|s| StateFilter {
                            states: vec![mapping::search_state(s).to_string()],
                        }),
                        date_time_filter: (start.is_some() || end.is_some()).then(|| {
                            DateTimeFilter {
                                created_at: TimeRange {
                                    start_at: start,
                                    end_at: end,
                                },
                            }
                        }),
                    },
                    sort: OrderSearchSort {
                        sort_field: "CREATED_AT",
                        sort_order: "DESC",
                    },
                },
                limit: PAGE_SIZE,
                return_entries: false,
                cursor,
            };
            let page: SearchOrdersResponse = self.http.post("/v2/orders/search", &request).await?;
            for square in &page.orders {
                let order = conversions::order(square)?;
                if status.is_none_or(|s| order.status == s) {
                    orders.push(order);
                }
            }
            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }
        orders.truncate(limit);
        Ok(orders)
    }

    async fn square_order(&self, id: &OrderId) -> Result<SquareOrder, PosError> {
        let response: OrderResponse = self
            .http
            .get(&format!("/v2/orders/{id}"), &[])
            .await
            .or_not_found("ORDER", id)?;
        Ok(response.order)
    }

    async fn put_order(&self, id: &OrderId, order: SquareOrder) -> Result<Order, PosError> {
        let request = UpdateOrderRequest {
            idempotency_key: Uuid::new_v4().to_string(),
            order,
        };
        let response: OrderResponse = self
            .http
            .put(&format!("/v2/orders/{id}"), &request)
            .await
            .map_err(version_conflict)?;
        conversions::order(&response.order)
    }

    // =========================================================================
    // Payments
    // =========================================================================

    async fn payments(
        &self,
        location_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        cap: usize,
    ) -> Result<Vec<Payment>, PosError> {
        let mut payments = Vec::new();
        let mut cursor: Option<String> = None;
        while payments.len() < cap {
            let mut query = time_window(location_id, start, end);
            if let Some(cursor) = cursor.take() {
                query.push(("cursor", cursor));
            }
            let page: ListPaymentsResponse = self.http.get("/v2/payments", &query).await?;
            payments.extend(page.payments);
            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }
        payments.truncate(cap);
        Ok(payments)
    }

    async fn refunds(
        &self,
        location_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        cap: usize,
    ) -> Result<Vec<PaymentRefund>, PosError> {
        let mut refunds = Vec::new();
        let mut cursor: Option<String> = None;
        while refunds.len() < cap {
            let mut query = time_window(location_id, start, end);
            if let Some(cursor) = cursor.take() {
                query.push(("cursor", cursor));
            }
            let page: ListRefundsResponse = self.http.get("/v2/refunds", &query).await?;
            refunds.extend(page.refunds);
            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }
        refunds.truncate(cap);
        Ok(refunds)
    }

    /// Payments and refunds in the window, merged newest first.
    async fn ledger(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        cap: usize,
    ) -> Result<Vec<Transaction>, PosError> {
        let location = self.location().await?;
        let (payments, refunds) = tokio::join!(
            self.payments(&location.id, start, end, cap),
            self.refunds(&location.id, start, end, cap)
        );
        let (payments, refunds) = (payments?, refunds?);

        let mut transactions: Vec<Transaction> = payments
            .iter()
            .map(conversions::payment_transaction)
            .collect();
        let methods: HashMap<&str, PaymentMethod> = transactions
            .iter()
            .map(|t| (t.id.as_str(), t.payment_method))
            .collect();
        let refunds: Vec<Transaction> = refunds
            .iter()
            .map(|r| {
                let method = r
                    .payment_id
                    .as_deref()
                    .and_then(|id| methods.get(id).copied());
                conversions::refund_transaction(r, method)
            })
            .collect();
        transactions.extend(refunds);
        transactions.sort_by(|a, b| b.processed_at.cmp(&a.processed_at));
        Ok(transactions)
    }

    async fn refund(
        &self,
        id: &TransactionId,
        amount: Option<Decimal>,
        reason: Option<&str>,
    ) -> Result<Transaction, PosError> {
        let currency = self.location().await?.currency;
        let response: PaymentResponse = self
            .http
            .get(&format!("/v2/payments/{id}"), &[])
            .await
            .or_not_found("TRANSACTION", id)?;
        let payment = response.payment;

        if payment.status.as_deref() != Some("COMPLETED") {
            return Err(PosError::Rejected {
                code: "TRANSACTION_NOT_REFUNDABLE",
                message: format!(
                    "payment {id} is {} and cannot be refunded",
                    payment.status.as_deref().unwrap_or("UNKNOWN")
                ),
            });
        }
        let balance = conversions::refundable_balance(&payment);
        let amount = amount.unwrap_or(balance);
        if amount <= Decimal::ZERO {
            return Err(PosError::InvalidRequest(format!(
                "refund amount must be positive (got {amount})"
            )));
        }
        if amount > balance {
            return Err(PosError::Rejected {
                code: "REFUND_EXCEEDS_BALANCE",
                message: format!("refund of {amount} exceeds refundable balance {balance}"),
            });
        }

        let request = RefundPaymentRequest {
            idempotency_key: Uuid::new_v4().to_string(),
            payment_id: payment.id.clone(),
            amount_money: conversions::to_money(amount, currency)?,
            reason: reason.map(ToString::to_string),
        };
        let response: RefundResponse = self.http.post("/v2/refunds", &request).await?;
        let method = conversions::payment_transaction(&payment).payment_method;
        Ok(conversions::refund_transaction(&response.refund, Some(method)))
    }
}

/// `location_id` plus optional `begin_time`/`end_time` list filters.
fn time_window(
    location_id: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("location_id", location_id.to_string()),
        ("sort_order", "DESC".to_string()),
        ("limit", PAGE_SIZE.to_string()),
    ];
    if let Some(start) = start {
        query.push(("begin_time", start.to_rfc3339()));
    }
    if let Some(end) = end {
        query.push(("end_time", end.to_rfc3339()));
    }
    query
}

/// First error from a Square error body.
fn vendor_error(body: &str) -> Option<types::SquareApiError> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|r| r.errors.into_iter().next())
}

/// Translate stale-version failures on versioned writes.
fn version_conflict(error: HttpError) -> PosError {
    match error {
        HttpError::Conflict(body) => PosError::VersionConflict(
            vendor_error(&body).map_or(body, |e| e.detail.unwrap_or(e.code)),
        ),
        HttpError::Status { body, .. } if body.contains("VERSION_MISMATCH") => {
            PosError::VersionConflict(
                vendor_error(&body).map_or(body, |e| e.detail.unwrap_or(e.code)),
            )
        }
        other => other.into(),
    }
}

/// Decline message and code, when `error` is a card decline.
fn decline(error: &HttpError) -> Option<(String, Option<String>)> {
    let HttpError::Status { status, body } = error else {
        return None;
    };
    let first = vendor_error(body);
    let is_decline =
        *status == 402 || first.as_ref().is_some_and(|e| e.category == "PAYMENT_METHOD_ERROR");
    if !is_decline {
        return None;
    }
    Some(first.map_or_else(
        || ("Payment declined".to_string(), None),
        |e| (e.detail.unwrap_or_else(|| e.code.clone()), Some(e.code)),
    ))
}

// =============================================================================
// Operations
// =============================================================================

impl SquareAdapter {
    async fn sales(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: ReportPeriod,
    ) -> Result<SalesData, PosError> {
        if start > end {
            return Err(PosError::InvalidRequest(format!(
                "start {start} is after end {end}"
            )));
        }
        let location = self.location().await?;
        let (orders, transactions) = tokio::join!(
            self.search_orders(&location.id, None, Some(start), Some(end), SCAN_ALL),
            self.ledger(Some(start), Some(end), SCAN_ALL)
        );
        Ok(aggregate_sales(period, start, end, &orders?, &transactions?))
    }

    async fn menu_items(&self) -> Result<Vec<MenuItem>, PosError> {
        let objects = self.catalog(MENU_TYPES).await?;
        let index = CatalogIndex::new(&objects);
        objects
            .iter()
            .filter(|o| o.item_data.is_some() && o.is_deleted != Some(true))
            .map(|o| conversions::menu_item(o, &index))
            .collect()
    }

    async fn create_item(&self, item: &NewMenuItem) -> Result<MenuItem, PosError> {
        let currency = self.location().await?.currency;
        let category_id = if item.category.trim().is_empty() {
            None
        } else {
            Some(self.category_id(&item.category).await?)
        };
        let object = conversions::new_catalog_item(item, category_id, currency)?;
        let created = self.upsert(object).await?;
        self.menu_item(&MenuItemId::new(created.id)).await
    }

    async fn delete_item(&self, id: &MenuItemId) -> Result<(), PosError> {
        self.retrieve_item(id).await?;
        let _: DeleteCatalogObjectResponse = self
            .http
            .delete(&format!("/v2/catalog/object/{id}"))
            .await
            .or_not_found("MENU_ITEM", id)?;
        Ok(())
    }

    async fn inventory_item(&self, id: &InventoryItemId) -> Result<InventoryItem, PosError> {
        self.inventory(Some(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| PosError::not_found("INVENTORY_ITEM", id))
    }

    async fn set_inventory_level(
        &self,
        id: &InventoryItemId,
        quantity: Decimal,
    ) -> Result<InventoryItem, PosError> {
        if quantity.is_sign_negative() {
            return Err(PosError::InvalidRequest(format!(
                "stock level cannot be negative (got {quantity})"
            )));
        }
        let location = self.location().await?;
        let request = BatchChangeInventoryRequest {
            idempotency_key: Uuid::new_v4().to_string(),
            changes: vec![InventoryChange {
                kind: "PHYSICAL_COUNT",
                physical_count: InventoryPhysicalCount {
                    catalog_object_id: id.to_string(),
                    state: "IN_STOCK",
                    location_id: location.id.clone(),
                    quantity: quantity.normalize().to_string(),
                    occurred_at: Utc::now(),
                },
            }],
            ignore_unchanged_counts: true,
        };
        let _: BatchChangeInventoryResponse = self
            .http
            .post("/v2/inventory/changes/batch-create", &request)
            .await
            .or_not_found("INVENTORY_ITEM", id)?;
        self.inventory_item(id).await
    }

    async fn employees(&self) -> Result<Vec<Employee>, PosError> {
        let location = self.location().await?;
        let (members, wages) = tokio::join!(self.team_members(&location.id), self.wages(None));
        let wages = wages?;
        let mut by_member: HashMap<&str, &TeamMemberWage> = HashMap::new();
        for wage in &wages {
            if let Some(member) = wage.team_member_id.as_deref() {
                by_member.entry(member).or_insert(wage);
            }
        }
        Ok(members?
            .iter()
            .map(|m| conversions::employee(m, by_member.get(m.id.as_str()).copied()))
            .collect())
    }

    async fn employee(&self, id: &EmployeeId) -> Result<Employee, PosError> {
        let (member, wages) = tokio::join!(self.team_member(id), self.wages(Some(id.as_str())));
        Ok(conversions::employee(&member?, wages?.first()))
    }

    async fn shifts(&self, query: &ShiftQuery) -> Result<Vec<Shift>, PosError> {
        let location = self.location().await?;
        self.search_shifts(&location.id, query)
            .await?
            .iter()
            .map(conversions::shift)
            .collect()
    }

    async fn clock_in(&self, employee_id: &EmployeeId) -> Result<Shift, PosError> {
        let location = self.location().await?;
        let member = self.team_member(employee_id).await?;
        if member.status.as_deref() == Some("INACTIVE") {
            return Err(PosError::Rejected {
                code: "EMPLOYEE_INACTIVE",
                message: format!("employee {employee_id} is inactive"),
            });
        }
        let query = ShiftQuery {
            employee_id: Some(employee_id.clone()),
            ..ShiftQuery::default()
        };
        let open = self
            .search_shifts(&location.id, &query)
            .await?
            .iter()
            .any(|s| s.end_at.is_none());
        if open {
            return Err(PosError::Rejected {
                code: "SHIFT_ALREADY_ACTIVE",
                message: format!("employee {employee_id} already has an open shift"),
            });
        }

        let request = CreateShiftRequest {
            idempotency_key: Uuid::new_v4().to_string(),
            shift: LaborShift {
                location_id: location.id.clone(),
                team_member_id: employee_id.to_string(),
                start_at: Utc::now(),
                ..LaborShift::default()
            },
        };
        let response: ShiftResponse = self.http.post("/v2/labor/shifts", &request).await?;
        conversions::shift(&response.shift)
    }

    async fn clock_out(&self, shift_id: &ShiftId) -> Result<Shift, PosError> {
        let response: ShiftResponse = self
            .http
            .get(&format!("/v2/labor/shifts/{shift_id}"), &[])
            .await
            .or_not_found("SHIFT", shift_id)?;
        let mut shift = response.shift;
        if shift.end_at.is_some() {
            return Err(PosError::Rejected {
                code: "SHIFT_NOT_ACTIVE",
                message: format!("shift {shift_id} has already ended"),
            });
        }
        shift.end_at = Some(Utc::now());
        let response: ShiftResponse = self
            .http
            .put(
                &format!("/v2/labor/shifts/{shift_id}"),
                &UpdateShiftRequest { shift },
            )
            .await
            .map_err(version_conflict)?;
        conversions::shift(&response.shift)
    }

    async fn orders(&self, query: &OrderQuery) -> Result<Vec<Order>, PosError> {
        let location = self.location().await?;
        self.search_orders(&location.id, query.status, query.start, query.end, query.limit)
            .await
    }

    async fn order(&self, id: &OrderId) -> Result<Order, PosError> {
        conversions::order(&self.square_order(id).await?)
    }

    async fn place_order(&self, order: &NewOrder) -> Result<Order, PosError> {
        let location = self.location().await?;
        let request = CreateOrderRequest {
            idempotency_key: Uuid::new_v4().to_string(),
            order: conversions::new_order(order, &location.id, location.currency)?,
        };
        let response: OrderResponse = self.http.post("/v2/orders", &request).await?;
        conversions::order(&response.order)
    }

    async fn set_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order, PosError> {
        let (state, fulfillment_state) = mapping::outbound_states(status).ok_or_else(|| {
            PosError::InvalidRequest(format!("Square orders cannot be set to {status}"))
        })?;
        let current = self.square_order(id).await?;
        let current_status = conversions::order(&current)?.status;
        if current_status == status {
            return conversions::order(&current);
        }
        if current_status.is_terminal() {
            return Err(PosError::Rejected {
                code: "INVALID_STATUS_TRANSITION",
                message: format!("order {id} is {current_status} and cannot become {status}"),
            });
        }

        let fulfillments = current
            .fulfillments
            .into_iter()
            .map(|mut f| {
                if let Some(next) = fulfillment_state {
                    f.state = Some(next.to_string());
                }
                f
            })
            .collect();
        let sparse = SquareOrder {
            location_id: current.location_id,
            version: current.version,
            state: Some(state.to_string()),
            fulfillments,
            ..SquareOrder::default()
        };
        self.put_order(id, sparse).await
    }

    async fn cancel(&self, id: &OrderId, reason: Option<&str>) -> Result<Order, PosError> {
        let current = self.square_order(id).await?;
        let current_status = conversions::order(&current)?.status;
        match current_status {
            OrderStatus::Cancelled => return conversions::order(&current),
            OrderStatus::Completed | OrderStatus::Refunded => {
                return Err(PosError::Rejected {
                    code: "ORDER_NOT_CANCELLABLE",
                    message: format!("order {id} is {current_status} and cannot be cancelled"),
                });
            }
            _ => {}
        }

        let mut metadata = current.metadata.unwrap_or_default();
        if let Some(reason) = reason {
            metadata.insert(CANCEL_REASON_METADATA_KEY.to_string(), reason.to_string());
        }
        let fulfillments = current
            .fulfillments
            .into_iter()
            .map(|mut f| {
                f.state = Some("CANCELED".to_string());
                f
            })
            .collect();
        let sparse = SquareOrder {
            location_id: current.location_id,
            version: current.version,
            state: Some("CANCELED".to_string()),
            fulfillments,
            metadata: (!metadata.is_empty()).then_some(metadata),
            ..SquareOrder::default()
        };
        self.put_order(id, sparse).await
    }

    async fn charge(&self, request: &PaymentRequest) -> Result<PaymentResult, PosError> {
        if request.amount <= Decimal::ZERO {
            return Err(PosError::InvalidRequest(format!(
                "payment amount must be positive (got {})",
                request.amount
            )));
        }
        let location = self.location().await?;
        let currency = location.currency;
        let tip = request.tip.unwrap_or(Decimal::ZERO);
        let (source_id, cash_details, external_details) = match request.method {
            PaymentMethod::Cash => (
                "CASH",
                Some(CashDetails {
                    buyer_supplied_money: conversions::to_money(request.amount + tip, currency)?,
                }),
                None,
            ),
            method => (
                "EXTERNAL",
                None,
                Some(ExternalDetails {
                    kind: mapping::external_payment_type(method),
                    source: "pos-bridge",
                }),
            ),
        };
        let tip_money = if tip > Decimal::ZERO {
            Some(conversions::to_money(tip, currency)?)
        } else {
            None
        };
        let body = CreatePaymentRequest {
            idempotency_key: Uuid::new_v4().to_string(),
            source_id,
            amount_money: conversions::to_money(request.amount, currency)?,
            tip_money,
            order_id: request.order_id.to_string(),
            location_id: location.id.clone(),
            buyer_email_address: request.customer.as_ref().and_then(|c| c.email.clone()),
            cash_details,
            external_details,
        };

        match self.http.post::<PaymentResponse, _>("/v2/payments", &body).await {
            Ok(response) => Ok(PaymentResult::approved(conversions::payment_transaction(
                &response.payment,
            ))),
            Err(error) => match decline(&error) {
                Some((message, code)) => {
                    debug!(decline_code = ?code, "Square declined payment");
                    Ok(PaymentResult::declined(message, code, None))
                }
                None => Err(error.into()),
            },
        }
    }

    async fn subscribe(&self, url: &str, events: &[String]) -> Result<WebhookRegistration, PosError> {
        validate_webhook(url, events)?;
        let request = CreateWebhookSubscriptionRequest {
            idempotency_key: Uuid::new_v4().to_string(),
            subscription: WebhookSubscription {
                id: None,
                name: Some("pos-bridge".to_string()),
                event_types: events.to_vec(),
                notification_url: url.to_string(),
                api_version: Some(SQUARE_VERSION.to_string()),
                created_at: None,
            },
        };
        let response: WebhookSubscriptionResponse = self
            .http
            .post("/v2/webhooks/subscriptions", &request)
            .await?;
        let subscription = response.subscription;
        let id = subscription
            .id
            .ok_or_else(|| PosError::Mapping("webhook subscription without id".to_string()))?;
        Ok(WebhookRegistration {
            id: WebhookId::new(id),
            url: subscription.notification_url,
            events: subscription.event_types,
            created_at: subscription.created_at.unwrap_or_else(Utc::now),
        })
    }
}

impl PosAdapter for SquareAdapter {
    fn provider(&self) -> PosProvider {
        PROVIDER
    }

    #[instrument(skip(self))]
    async fn connect(&self) -> ApiResponse<ConnectionStatus> {
        let started = Instant::now();
        let result = self
            .connection
            .connect_with(|| async { self.location().await.map(|_| ()) })
            .await;
        self.finish("CONNECT", started, result).await
    }

    #[instrument(skip(self))]
    async fn disconnect(&self) -> ApiResponse<ConnectionStatus> {
        let started = Instant::now();
        let status = self.connection.disconnect().await;
        respond(PROVIDER, "DISCONNECT", started, Ok(status))
    }

    async fn get_connection_status(&self) -> ApiResponse<ConnectionStatus> {
        respond(
            PROVIDER,
            "GET_CONNECTION_STATUS",
            Instant::now(),
            Ok(self.connection.snapshot().await),
        )
    }

    #[instrument(skip(self))]
    async fn test_connection(&self) -> ApiResponse<ConnectionTest> {
        let started = Instant::now();
        let result = self
            .http
            .get::<ListLocationsResponse>("/v2/locations", &[])
            .await
            .map(|_| ConnectionTest {
                latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            })
            .map_err(PosError::from);
        self.finish("TEST_CONNECTION", started, result).await
    }

    #[instrument(skip(self))]
    async fn get_sales_data(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: ReportPeriod,
    ) -> ApiResponse<SalesData> {
        let started = Instant::now();
        let result = self.sales(start, end, period).await;
        self.finish("GET_SALES_DATA", started, result).await
    }

    #[instrument(skip(self))]
    async fn get_transactions(&self, query: &TransactionQuery) -> ApiResponse<Vec<Transaction>> {
        let started = Instant::now();
        let result = self
            .ledger(query.start, query.end, query.offset.saturating_add(query.limit))
            .await
            .map(|all| all.into_iter().skip(query.offset).take(query.limit).collect());
        self.finish("GET_TRANSACTIONS", started, result).await
    }

    #[instrument(skip(self))]
    async fn get_menu_items(&self) -> ApiResponse<Vec<MenuItem>> {
        let started = Instant::now();
        let result = self.menu_items().await;
        self.finish("GET_MENU_ITEMS", started, result).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_menu_item(&self, id: &MenuItemId) -> ApiResponse<MenuItem> {
        let started = Instant::now();
        let result = self.menu_item(id).await;
        self.finish("GET_MENU_ITEM", started, result).await
    }

    #[instrument(skip(self, item), fields(name = %item.name))]
    async fn create_menu_item(&self, item: &NewMenuItem) -> ApiResponse<MenuItem> {
        let started = Instant::now();
        let result = self.create_item(item).await;
        self.finish("CREATE_MENU_ITEM", started, result).await
    }

    #[instrument(skip(self, update), fields(id = %id))]
    async fn update_menu_item(
        &self,
        id: &MenuItemId,
        update: &MenuItemUpdate,
    ) -> ApiResponse<MenuItem> {
        let started = Instant::now();
        let result = self.modify_item(id, update).await;
        self.finish("UPDATE_MENU_ITEM", started, result).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_menu_item(&self, id: &MenuItemId) -> ApiResponse<()> {
        let started = Instant::now();
        let result = self.delete_item(id).await;
        self.finish("DELETE_MENU_ITEM", started, result).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn update_menu_item_availability(
        &self,
        id: &MenuItemId,
        is_available: bool,
    ) -> ApiResponse<MenuItem> {
        let started = Instant::now();
        let update = MenuItemUpdate {
            is_available: Some(is_available),
            ..MenuItemUpdate::default()
        };
        let result = self.modify_item(id, &update).await;
        self.finish("UPDATE_MENU_ITEM_AVAILABILITY", started, result)
            .await
    }

    #[instrument(skip(self))]
    async fn get_inventory_items(&self) -> ApiResponse<Vec<InventoryItem>> {
        let started = Instant::now();
        let result = self.inventory(None).await;
        self.finish("GET_INVENTORY_ITEMS", started, result).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_inventory_item(&self, id: &InventoryItemId) -> ApiResponse<InventoryItem> {
        let started = Instant::now();
        let result = self.inventory_item(id).await;
        self.finish("GET_INVENTORY_ITEM", started, result).await
    }

    #[instrument(skip(self), fields(id = %id, quantity = %quantity))]
    async fn update_inventory_level(
        &self,
        id: &InventoryItemId,
        quantity: Decimal,
    ) -> ApiResponse<InventoryItem> {
        let started = Instant::now();
        let result = self.set_inventory_level(id, quantity).await;
        self.finish("UPDATE_INVENTORY_LEVEL", started, result).await
    }

    #[instrument(skip(self))]
    async fn get_employees(&self) -> ApiResponse<Vec<Employee>> {
        let started = Instant::now();
        let result = self.employees().await;
        self.finish("GET_EMPLOYEES", started, result).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_employee(&self, id: &EmployeeId) -> ApiResponse<Employee> {
        let started = Instant::now();
        let result = self.employee(id).await;
        self.finish("GET_EMPLOYEE", started, result).await
    }

    #[instrument(skip(self))]
    async fn get_employee_shifts(&self, query: &ShiftQuery) -> ApiResponse<Vec<Shift>> {
        let started = Instant::now();
        let result = self.shifts(query).await;
        self.finish("GET_EMPLOYEE_SHIFTS", started, result).await
    }

    #[instrument(skip(self), fields(employee_id = %employee_id))]
    async fn start_shift(&self, employee_id: &EmployeeId) -> ApiResponse<Shift> {
        let started = Instant::now();
        let result = self.clock_in(employee_id).await;
        self.finish("START_SHIFT", started, result).await
    }

    #[instrument(skip(self), fields(shift_id = %shift_id))]
    async fn end_shift(&self, shift_id: &ShiftId) -> ApiResponse<Shift> {
        let started = Instant::now();
        let result = self.clock_out(shift_id).await;
        self.finish("END_SHIFT", started, result).await
    }

    #[instrument(skip(self))]
    async fn get_orders(&self, query: &OrderQuery) -> ApiResponse<Vec<Order>> {
        let started = Instant::now();
        let result = self.orders(query).await;
        self.finish("GET_ORDERS", started, result).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_order(&self, id: &OrderId) -> ApiResponse<Order> {
        let started = Instant::now();
        let result = self.order(id).await;
        self.finish("GET_ORDER", started, result).await
    }

    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    async fn create_order(&self, order: &NewOrder) -> ApiResponse<Order> {
        let started = Instant::now();
        let result = self.place_order(order).await;
        self.finish("CREATE_ORDER", started, result).await
    }

    #[instrument(skip(self), fields(id = %id, status = %status))]
    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> ApiResponse<Order> {
        let started = Instant::now();
        let result = self.set_order_status(id, status).await;
        self.finish("UPDATE_ORDER_STATUS", started, result).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn cancel_order(&self, id: &OrderId, reason: Option<&str>) -> ApiResponse<Order> {
        let started = Instant::now();
        let result = self.cancel(id, reason).await;
        self.finish("CANCEL_ORDER", started, result).await
    }

    #[instrument(skip(self, request), fields(order_id = %request.order_id, amount = %request.amount))]
    async fn process_payment(&self, request: &PaymentRequest) -> ApiResponse<PaymentResult> {
        let started = Instant::now();
        let result = self.charge(request).await;
        self.finish("PROCESS_PAYMENT", started, result).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn refund_transaction(
        &self,
        id: &TransactionId,
        amount: Option<Decimal>,
        reason: Option<&str>,
    ) -> ApiResponse<Transaction> {
        let started = Instant::now();
        let result = self.refund(id, amount, reason).await;
        self.finish("REFUND_TRANSACTION", started, result).await
    }

    #[instrument(skip(self, events))]
    async fn register_webhook(
        &self,
        url: &str,
        events: &[String],
    ) -> ApiResponse<WebhookRegistration> {
        let started = Instant::now();
        let result = self.subscribe(url, events).await;
        self.finish("REGISTER_WEBHOOK", started, result).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn unregister_webhook(&self, id: &WebhookId) -> ApiResponse<()> {
        let started = Instant::now();
        let result = self
            .http
            .delete::<serde_json::Value>(&format!("/v2/webhooks/subscriptions/{id}"))
            .await
            .or_not_found("WEBHOOK", id)
            .map(|_| ());
        self.finish("UNREGISTER_WEBHOOK", started, result).await
    }
}
