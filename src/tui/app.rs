use std::collections::HashSet;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::api::HttpApi;
use crate::io::config_io;
use crate::io::prefs::{self, PrefStore};
use crate::io::session;
use crate::model::board::BoardSnapshot;
use crate::model::project::StatusFilter;
use crate::model::stage::StageRecord;
use crate::ops::reorder::move_and_reindex;
use crate::ops::token::{self, CardKind};
use crate::sync::worker::{SyncHandle, SyncOutcome, SyncRequest};
use crate::sync::{GesturePhase, ReorderTarget};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Move,
    Filter,
}

/// One visible row of the board tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardRow {
    Project {
        project: usize,
    },
    Product {
        project: usize,
        product: usize,
    },
    Stage {
        project: usize,
        product: usize,
        stage: usize,
    },
}

/// An in-progress move gesture: which card is held and which slot of its
/// sibling list it currently previews at. Nothing is committed until the
/// drop is confirmed; Esc abandons the gesture without touching state.
#[derive(Debug, Clone)]
pub struct MoveState {
    pub token: String,
    pub target: ReorderTarget,
    pub source_id: String,
    /// Sibling ids in their pre-gesture order
    pub sibling_ids: Vec<String>,
    /// Index the card started at
    pub origin: usize,
    /// Index the card currently previews at
    pub slot: usize,
}

/// Main application state. Owns the board snapshot and the preference sets;
/// the reorder engine and the sync coordinator never see the terminal.
pub struct App {
    /// Flat record list as last fetched (plus optimistic patches)
    pub records: Vec<StageRecord>,
    /// Tree derived from `records`, rebuilt when records or filter change
    pub board: BoardSnapshot,
    /// `board` with the in-progress move preview applied; what gets rendered
    pub view: BoardSnapshot,
    pub rows: Vec<BoardRow>,
    pub filter: StatusFilter,
    pub collapsed_projects: HashSet<String>,
    pub collapsed_products: HashSet<String>,
    pub prefs: PrefStore,
    pub sync: SyncHandle,
    pub mode: Mode,
    pub move_state: Option<MoveState>,
    pub gesture: GesturePhase,
    pub cursor: usize,
    pub scroll_offset: usize,
    pub filter_cursor: usize,
    pub show_help: bool,
    pub should_quit: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub status_message: Option<String>,
    pub theme: Theme,
}

impl App {
    pub fn new(prefs: PrefStore, sync: SyncHandle, theme: Theme) -> Self {
        let filter = prefs.load_status_filter();
        let collapsed_projects = prefs.load_set(prefs::COLLAPSED_PROJECTS);
        let collapsed_products = prefs.load_set(prefs::COLLAPSED_PRODUCTS);

        let mut app = App {
            records: Vec::new(),
            board: BoardSnapshot::default(),
            view: BoardSnapshot::default(),
            rows: Vec::new(),
            filter,
            collapsed_projects,
            collapsed_products,
            prefs,
            sync,
            mode: Mode::Navigate,
            move_state: None,
            gesture: GesturePhase::Idle,
            cursor: 0,
            scroll_offset: 0,
            filter_cursor: 0,
            show_help: false,
            should_quit: false,
            loading: false,
            error: None,
            status_message: None,
            theme,
        };
        app.rebuild_board();
        app
    }

    /// Re-derive the tree from the flat records and the filter
    pub fn rebuild_board(&mut self) {
        self.board = BoardSnapshot::build(&self.records, &self.filter);
        self.refresh_view();
    }

    /// Recompute the rendered board (move preview applied) and the visible
    /// row list. Called after every state change; the renderer only reads.
    pub fn refresh_view(&mut self) {
        let mut view = self.board.clone();
        if let Some(ms) = &self.move_state
            && ms.slot != ms.origin
        {
            let target_id = ms.sibling_ids[ms.slot].as_str();
            match &ms.target {
                ReorderTarget::Projects => {
                    view.projects = move_and_reindex(&view.projects, &ms.source_id, target_id);
                }
                ReorderTarget::Products { project_id } => {
                    if let Some(project) = view.project_mut(project_id) {
                        project.products =
                            move_and_reindex(&project.products, &ms.source_id, target_id);
                    }
                }
                ReorderTarget::Stages { product_id } => {
                    if let Some(product) = view.product_mut(product_id) {
                        product.stages =
                            move_and_reindex(&product.stages, &ms.source_id, target_id);
                    }
                }
            }
        }
        self.view = view;
        self.rows = build_rows(&self.view, &self.collapsed_projects, &self.collapsed_products);
        if self.cursor >= self.rows.len() {
            self.cursor = self.rows.len().saturating_sub(1);
        }
    }

    pub fn current_row(&self) -> Option<BoardRow> {
        self.rows.get(self.cursor).copied()
    }

    /// Token identifying the card on a given row
    pub fn row_token(&self, row: BoardRow) -> String {
        match row {
            BoardRow::Project { project } => {
                token::encode(CardKind::Project, &self.view.projects[project].id)
            }
            BoardRow::Product { project, product } => token::encode(
                CardKind::Product,
                &self.view.projects[project].products[product].id,
            ),
            BoardRow::Stage {
                project,
                product,
                stage,
            } => token::encode(
                CardKind::Stage,
                &self.view.projects[project].products[product].stages[stage].id,
            ),
        }
    }

    /// Put the cursor on the row carrying the given token, if visible
    pub fn follow_token(&mut self, wanted: &str) {
        for index in 0..self.rows.len() {
            if self.row_token(self.rows[index]) == wanted {
                self.cursor = index;
                return;
            }
        }
    }

    /// Queue a full board re-fetch; the server is the source of truth
    pub fn refetch(&mut self) {
        self.loading = true;
        self.sync.submit(SyncRequest::FetchBoard);
    }

    /// Drain completed sync outcomes. A failed persistence discards the
    /// optimistic state by re-fetching; a failed fetch leaves the current
    /// (possibly stale, still truthful) board alone and shows the error.
    pub fn pump_sync(&mut self) {
        for (seq, outcome) in self.sync.poll() {
            match outcome {
                SyncOutcome::Board(Ok(records)) => {
                    self.records = records;
                    self.loading = false;
                    self.rebuild_board();
                }
                SyncOutcome::Board(Err(e)) => {
                    self.loading = false;
                    self.error = Some(e.to_string());
                }
                SyncOutcome::Persisted { request: _, result } => {
                    if let GesturePhase::Persisting { seq: active } = self.gesture
                        && active == seq
                    {
                        self.gesture = GesturePhase::Idle;
                    }
                    if let Err(e) = result {
                        self.error = Some(e.to_string());
                        self.refetch();
                    }
                }
            }
        }
    }

    pub fn save_prefs(&self) {
        self.prefs
            .save_set(prefs::COLLAPSED_PROJECTS, &self.collapsed_projects);
        self.prefs
            .save_set(prefs::COLLAPSED_PRODUCTS, &self.collapsed_products);
        self.prefs.save_status_filter(&self.filter);
    }
}

/// Flatten the visible tree respecting the collapse sets
fn build_rows(
    board: &BoardSnapshot,
    collapsed_projects: &HashSet<String>,
    collapsed_products: &HashSet<String>,
) -> Vec<BoardRow> {
    let mut rows = Vec::new();
    for (pi, project) in board.projects.iter().enumerate() {
        rows.push(BoardRow::Project { project: pi });
        if collapsed_projects.contains(&project.id) {
            continue;
        }
        for (di, product) in project.products.iter().enumerate() {
            rows.push(BoardRow::Product {
                project: pi,
                product: di,
            });
            if collapsed_products.contains(&product.id) {
                continue;
            }
            for si in 0..product.stages.len() {
                rows.push(BoardRow::Stage {
                    project: pi,
                    product: di,
                    stage: si,
                });
            }
        }
    }
    rows
}

/// Run the TUI application
pub fn run(config_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = config_io::config_dir(config_dir)?;
    let config = config_io::read_config(&dir)?;
    let api = HttpApi::new(&config.server.base_url, config.auth.token.as_deref())?;
    let user = session::user_key(config.auth.token.as_deref());

    let prefs = PrefStore::new(&dir, &user);
    let sync = SyncHandle::start(api);
    let theme = Theme::from_config(&config.ui);

    let mut app = App::new(prefs, sync, theme);
    app.refetch();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app);

    // Persist UI preferences before exit
    app.save_prefs();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.pump_sync();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, BoardApi};
    use crate::model::product::ProductStatus;
    use crate::model::project::ProjectStatus;
    use tempfile::TempDir;

    struct NullApi;

    impl BoardApi for NullApi {
        fn fetch_board(&self) -> Result<Vec<StageRecord>, ApiError> {
            Ok(Vec::new())
        }
        fn reorder_stages(&self, _: &str, _: &[(String, i64)]) -> Result<(), ApiError> {
            Ok(())
        }
        fn reorder_products(&self, _: &[(String, i64)]) -> Result<(), ApiError> {
            Ok(())
        }
        fn reorder_projects(&self, _: &[(String, i64)]) -> Result<(), ApiError> {
            Ok(())
        }
        fn set_project_status(&self, _: &str, _: ProjectStatus) -> Result<(), ApiError> {
            Ok(())
        }
        fn set_product_status(
            &self,
            _: &str,
            _: &str,
            _: i64,
            _: ProductStatus,
            _: Option<i64>,
        ) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn rec(id: &str, order: i64, product: &str, project: &str) -> StageRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("stage {id}"),
            "order": order,
            "productId": product,
            "productName": product,
            "projectId": project,
            "projectName": project,
        }))
        .unwrap()
    }

    fn test_app(tmp: &TempDir) -> App {
        let prefs = PrefStore::new(tmp.path(), "t");
        let sync = SyncHandle::start(NullApi);
        let mut app = App::new(prefs, sync, Theme::default());
        app.records = vec![
            rec("s0", 0, "p1", "pr1"),
            rec("s1", 1, "p1", "pr1"),
            rec("t0", 0, "p2", "pr2"),
        ];
        app.rebuild_board();
        app
    }

    #[test]
    fn rows_respect_collapse_sets() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);
        // 2 projects + 2 products + 3 stages
        assert_eq!(app.rows.len(), 7);

        app.collapsed_projects.insert("pr1".to_string());
        app.refresh_view();
        // pr1 collapsed: its product and stages disappear
        assert_eq!(app.rows.len(), 4);

        app.collapsed_products.insert("p2".to_string());
        app.refresh_view();
        assert_eq!(app.rows.len(), 3);
    }

    #[test]
    fn move_preview_reorders_the_view_but_not_the_board() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);
        app.move_state = Some(MoveState {
            token: "s1".to_string(),
            target: ReorderTarget::Stages {
                product_id: "p1".to_string(),
            },
            source_id: "s1".to_string(),
            sibling_ids: vec!["s0".to_string(), "s1".to_string()],
            origin: 1,
            slot: 0,
        });
        app.refresh_view();

        let preview: Vec<&str> = app.view.product("p1").unwrap().stages.iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(preview, vec!["s1", "s0"]);
        let committed: Vec<&str> = app.board.product("p1").unwrap().stages.iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(committed, vec!["s0", "s1"]);
    }

    #[test]
    fn follow_token_finds_cards_across_levels() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);
        app.follow_token("product-p2");
        assert!(matches!(app.current_row(), Some(BoardRow::Product { .. })));
        app.follow_token("t0");
        assert!(matches!(app.current_row(), Some(BoardRow::Stage { .. })));
    }
}
