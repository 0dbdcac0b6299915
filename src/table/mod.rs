use serde_json::Value;

use crate::api::{ApiClient, Page, PageQuery};
use crate::auth::{acciones, SessionHandle};
use crate::schema::CrudSchema;

pub mod draft;
pub mod render;
pub mod row;

pub use draft::Draft;
pub use render::{render_cell, CellRender, FALLBACK_TEXT};
pub use row::{Row, RowId};

/// Page size requested from every collection endpoint.
pub const PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
}

/// Modal sub-state, orthogonal to the list state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Creating,
    Editing,
    Viewing,
}

/// Generic table controller: one instance drives one CRUD screen described
/// by a [`CrudSchema`], delegating persistence to the API client.
///
/// The controller owns no long-lived state beyond the currently displayed
/// page and the in-progress form; every mutation re-fetches the current
/// page. Failures are logged and leave the previous state intact - retry is
/// always a user decision.
pub struct TableController<C> {
    schema: CrudSchema,
    client: C,
    session: SessionHandle,

    rows: Vec<Row>,
    page: i64,
    total_pages: i64,
    load_state: LoadState,

    modal: ModalState,
    draft: Draft,
    edit_target: Option<RowId>,
    pending_delete: Option<RowId>,

    // Monotonic fetch counter; responses from superseded fetches are dropped
    fetch_seq: u64,
}

impl<C: ApiClient> TableController<C> {
    pub fn new(schema: CrudSchema, client: C, session: SessionHandle) -> Self {
        Self {
            schema,
            client,
            session,
            rows: Vec::new(),
            page: 1,
            total_pages: 0,
            load_state: LoadState::Idle,
            modal: ModalState::Closed,
            draft: Draft::new(),
            edit_target: None,
            pending_delete: None,
            fetch_seq: 0,
        }
    }

    // ========================================
    // List + pagination
    // ========================================

    /// Fetch the current page and replace the cached rows wholesale.
    ///
    /// On failure the previous rows stay displayed; the error is only
    /// logged (surrounding pages may surface their own alerts).
    pub async fn refresh(&mut self) {
        let prior = self.load_state;
        let seq = self.begin_fetch();
        let query = PageQuery { page: self.page - 1, size: PAGE_SIZE };
        match self.client.get_page(&self.schema.endpoint, query).await {
            Ok(page) => self.apply_page(seq, page),
            Err(e) => {
                tracing::warn!(endpoint = %self.schema.endpoint, error = %e,
                    "list fetch failed, keeping previous rows");
                // Fall back to the state before the fetch: a failed first
                // fetch stays Idle so embedders can tell "never fetched"
                // from an empty loaded page
                self.load_state = prior;
            }
        }
    }

    /// Reserve a sequence number for a fetch that is about to be issued.
    pub fn begin_fetch(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.load_state = LoadState::Loading;
        self.fetch_seq
    }

    /// Apply a page response for the fetch identified by `seq`. Responses
    /// from fetches that have since been superseded are dropped, so a slow
    /// early response can never overwrite a newer one.
    pub fn apply_page(&mut self, seq: u64, page: Page) {
        if seq != self.fetch_seq {
            tracing::debug!(endpoint = %self.schema.endpoint, seq, latest = self.fetch_seq,
                "dropping stale page response");
            return;
        }
        self.total_pages = total_pages(page.total_count, page.items_per_page);
        self.rows = page.data;
        self.load_state = LoadState::Loaded;
    }

    /// Navigate to `page` (1-based), clamped to `[1, total_pages]`.
    /// Re-fetches only when the page actually changes.
    pub async fn go_to_page(&mut self, page: i64) {
        let clamped = page.clamp(1, self.total_pages.max(1));
        if clamped != self.page {
            self.page = clamped;
            self.refresh().await;
        }
    }

    pub async fn first_page(&mut self) {
        self.go_to_page(1).await;
    }

    pub async fn prev_page(&mut self) {
        self.go_to_page(self.page - 1).await;
    }

    pub async fn next_page(&mut self) {
        self.go_to_page(self.page + 1).await;
    }

    /// Jump to the already-computed last page; no extra round trip.
    pub async fn last_page(&mut self) {
        self.go_to_page(self.total_pages).await;
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    // ========================================
    // Create / edit / view modal
    // ========================================

    pub fn open_create(&mut self) {
        self.draft.clear();
        self.edit_target = None;
        self.modal = ModalState::Creating;
    }

    pub fn open_edit(&mut self, row: &Row) {
        self.draft = Draft::from_row(row);
        self.edit_target = row.id();
        self.modal = ModalState::Editing;
    }

    /// Read-only view of a row; no submit is offered in this mode.
    pub fn open_view(&mut self, row: &Row) {
        self.draft = Draft::from_row(row);
        self.edit_target = None;
        self.modal = ModalState::Viewing;
    }

    pub fn close_modal(&mut self) {
        self.draft.clear();
        self.edit_target = None;
        self.modal = ModalState::Closed;
    }

    /// Update one draft field and clear that field's validation error.
    pub fn set_field(&mut self, key: impl Into<String>, value: Value) {
        self.draft.set_field(key, value);
    }

    /// Validate the whole draft and, if clean, save it.
    ///
    /// Editing is detected by the presence of an edit target, not by any id
    /// heuristic on the draft. Success closes the modal and re-fetches the
    /// current page; failure keeps the modal and draft intact for retry.
    /// Returns whether a save went through.
    pub async fn submit(&mut self) -> bool {
        if !matches!(self.modal, ModalState::Creating | ModalState::Editing) {
            return false;
        }
        if !self.draft.validate(&self.schema) {
            return false;
        }

        let body = self.draft.body();
        let result = match &self.edit_target {
            Some(id) => self.client.put(&self.schema.endpoint, id, &body).await,
            None => self.client.post(&self.schema.endpoint, &body).await,
        };

        match result {
            Ok(_) => {
                self.close_modal();
                self.refresh().await;
                true
            }
            Err(e) => {
                tracing::warn!(endpoint = %self.schema.endpoint, error = %e, "save failed");
                false
            }
        }
    }

    // ========================================
    // Delete (two-step confirmation)
    // ========================================

    /// Arm the confirmation step for one row. Rows without an id are
    /// ignored - there is nothing to address the delete at.
    pub fn request_delete(&mut self, row: &Row) {
        match row.id() {
            Some(id) => self.pending_delete = Some(id),
            None => tracing::warn!(endpoint = %self.schema.endpoint, "delete requested for row without id"),
        }
    }

    /// Abandon the confirmation; list state is untouched and no call is made.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Issue the delete for the armed row, then re-fetch the current page.
    /// The page number is not decremented even if the page emptied.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };
        match self.client.delete(&self.schema.endpoint, &id).await {
            Ok(_) => {
                self.refresh().await;
                true
            }
            Err(e) => {
                tracing::warn!(endpoint = %self.schema.endpoint, error = %e, "delete failed");
                false
            }
        }
    }

    // ========================================
    // Permission-scoped action visibility
    // ========================================

    pub fn can_add(&self) -> bool {
        self.session.snapshot().has_grant(&self.schema.tabla, acciones::AGREGAR)
    }

    pub fn can_modify(&self) -> bool {
        self.session.snapshot().has_grant(&self.schema.tabla, acciones::MODIFICAR)
    }

    pub fn can_delete(&self) -> bool {
        self.session.snapshot().has_grant(&self.schema.tabla, acciones::ELIMINAR)
    }

    // ========================================
    // Rendering
    // ========================================

    /// Render instructions for one row, in column order.
    pub fn render_row(&self, row: &Row) -> Vec<CellRender> {
        self.schema.columns.iter().map(|column| render_cell(column, row)).collect()
    }

    // ========================================
    // Accessors
    // ========================================

    pub fn schema(&self) -> &CrudSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn total_pages(&self) -> i64 {
        self.total_pages
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn modal(&self) -> ModalState {
        self.modal
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn pending_delete(&self) -> Option<&RowId> {
        self.pending_delete.as_ref()
    }
}

/// `ceil(total_count / items_per_page)`, guarding against a zero or negative
/// server-declared page size.
fn total_pages(total_count: i64, items_per_page: i64) -> i64 {
    if items_per_page <= 0 {
        return 0;
    }
    (total_count + items_per_page - 1) / items_per_page
}
