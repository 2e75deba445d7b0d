use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use atelier_api::{ApiError, StudioClient};
use atelier_board::{BoardState, PendingMove, RepoAccessMap, Task, TaskPatch};
use atelier_config::Settings;
use atelier_events::SocketHandle;

use crate::events::{AppEvent, EventHandler};
use crate::state::{BoardView, LoadError, Mode, NotesIntent, ToastKind};
use crate::ui;

/// The board view application for one project.
pub struct App {
    pub state: BoardView,
    client: StudioClient,
    settings: Settings,
    project_id: String,
    should_quit: bool,
    socket_relay: Option<tokio::task::JoinHandle<()>>,
}

impl App {
    pub fn new(settings: Settings, project_id: impl Into<String>) -> Result<Self> {
        let client = StudioClient::new(&settings)?;
        let session_email = settings.session.email.clone();
        Ok(Self {
            state: BoardView::new(session_email),
            client,
            settings,
            project_id: project_id.into(),
            should_quit: false,
            socket_relay: None,
        })
    }

    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        let mut event_handler = EventHandler::new(250); // 250ms tick rate

        self.load_board().await;
        self.open_socket(event_handler.sender()).await;

        while !self.should_quit {
            terminal.draw(|frame| {
                ui::render(frame, &self.state);
            })?;

            if let Some(event) = event_handler.next().await {
                match event {
                    AppEvent::Key(key) => self.handle_key_event(key, &event_handler.sender()),
                    AppEvent::Tick => self.state.prune_toasts(),
                    AppEvent::Board(board_event) => self.state.board.apply_event(&board_event),
                    AppEvent::MoveSettled { task_key, result } => {
                        self.settle_move(&task_key, result)
                    }
                    AppEvent::VerificationSettled { task_key, result } => {
                        self.settle_verification(&task_key, result)
                    }
                    AppEvent::Refresh => self.load_board().await,
                    AppEvent::Quit => self.quit(),
                }
            }
        }

        if let Some(relay) = self.socket_relay.take() {
            relay.abort();
        }
        Ok(())
    }

    /// Fetch the board snapshot and the repo membership map.
    async fn load_board(&mut self) {
        match self.client.board(&self.project_id).await {
            Ok(response) => {
                let board = BoardState::from_snapshot(response.normalize());
                let mut access = RepoAccessMap::new();
                if let Some(project) = &board.project {
                    for repo in &project.repos {
                        match self.client.repo_status(&self.project_id, repo.kind).await {
                            Ok(status) => access.set(repo.kind, status.status),
                            // Unknown membership stays NONE; the task is
                            // just not movable until a refresh.
                            Err(e) => debug!(repo = %repo.kind, error = %e, "repo status failed"),
                        }
                    }
                }
                self.state.set_board(board);
                self.state.access = access;
            }
            Err(ApiError::NotFound) => {
                self.state.loading = false;
                self.state.load_error = Some(LoadError::NotFound);
            }
            Err(e) => {
                self.state.loading = false;
                self.state.load_error = Some(LoadError::Failed(e.to_string()));
            }
        }
    }

    /// One socket per mounted board view, scoped to this project.
    async fn open_socket(&mut self, sender: UnboundedSender<AppEvent>) {
        match SocketHandle::connect(&self.settings.socket_url, &self.project_id).await {
            Ok(mut handle) => {
                self.socket_relay = Some(tokio::spawn(async move {
                    while let Some(event) = handle.next_event().await {
                        if sender.send(AppEvent::Board(event)).is_err() {
                            break;
                        }
                    }
                }));
            }
            Err(e) => {
                // Live updates degrade to manual refresh.
                self.state
                    .push_toast(ToastKind::Error, format!("Live updates unavailable: {e}"));
            }
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent, sender: &UnboundedSender<AppEvent>) {
        match self.state.mode.clone() {
            Mode::Browse => self.handle_browse_key(key, sender),
            Mode::EditNotes(intent) => self.handle_notes_key(key, intent, sender),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent, sender: &UnboundedSender<AppEvent>) {
        let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('r') => {
                let _ = sender.send(AppEvent::Refresh);
            }
            KeyCode::Char('h') | KeyCode::Left if !shifted => self.state.select_previous_column(),
            KeyCode::Char('l') | KeyCode::Right if !shifted => self.state.select_next_column(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next_task(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_previous_task(),
            KeyCode::Char('H') | KeyCode::Left => self.move_selected(-1, sender),
            KeyCode::Char('L') | KeyCode::Right => self.move_selected(1, sender),
            KeyCode::Char('s') => self.start_submit(),
            KeyCode::Char('a') => self.start_review(true),
            KeyCode::Char('x') => self.start_review(false),
            _ => {}
        }
    }

    fn handle_notes_key(
        &mut self,
        key: KeyEvent,
        intent: NotesIntent,
        sender: &UnboundedSender<AppEvent>,
    ) {
        match key.code {
            KeyCode::Esc => {
                self.state.notes.clear();
                self.state.mode = Mode::Browse;
            }
            KeyCode::Enter => {
                let notes = self.state.notes.take();
                self.state.mode = Mode::Browse;
                self.dispatch_verification(intent, notes, sender);
            }
            KeyCode::Backspace => {
                self.state.notes.backspace();
            }
            KeyCode::Char(c) => self.state.notes.insert_char(c),
            _ => {}
        }
    }

    /// The drag-and-drop analog: move the selected task one column over.
    fn move_selected(&mut self, direction: isize, sender: &UnboundedSender<AppEvent>) {
        let Some(task_key) = self.state.current_task_key() else {
            return;
        };
        let target_index = self.state.selected_column as isize + direction;
        if target_index < 0 || target_index as usize >= self.state.board.columns().len() {
            return;
        }
        let target_key = self.state.board.columns()[target_index as usize]
            .key()
            .to_string();

        match self
            .state
            .board
            .begin_move(&task_key, &target_key, &self.state.access)
        {
            Ok(pending) => self.dispatch_move(pending, sender),
            Err(denied) => {
                let kind = match denied {
                    atelier_board::MoveDenied::RepoAccessRequired(_) => ToastKind::Error,
                    _ => ToastKind::Info,
                };
                self.state.push_toast(kind, denied.to_string());
            }
        }
    }

    fn dispatch_move(&self, pending: PendingMove, sender: &UnboundedSender<AppEvent>) {
        let client = self.client.clone();
        let project_id = self.project_id.clone();
        let sender = sender.clone();
        tokio::spawn(async move {
            let result = client
                .persist_move(&project_id, &pending.task_key, pending.action, &pending.to)
                .await;
            let _ = sender.send(AppEvent::MoveSettled {
                task_key: pending.task_key,
                result,
            });
        });
    }

    fn settle_move(&mut self, task_key: &str, result: Result<Task, ApiError>) {
        match result {
            Ok(task) => {
                self.state.board.confirm_move(task_key, Some(task));
            }
            Err(e) => {
                // Results for moves no longer pending (board reloaded in
                // between) are dropped by revert_move returning false.
                if self.state.board.revert_move(task_key) {
                    match e.gating_repo() {
                        Some(repo) => self.state.push_toast(
                            ToastKind::Error,
                            format!("Join the {repo} repository to work on this task"),
                        ),
                        None => self.state.push_toast(ToastKind::Error, e.to_string()),
                    }
                }
            }
        }
    }

    fn start_submit(&mut self) {
        let Some(task) = self.state.current_task() else {
            return;
        };
        if !self.state.can_submit(task) {
            self.state
                .push_toast(ToastKind::Info, "Only the assignee can submit this task");
            return;
        }
        self.state.mode = Mode::EditNotes(NotesIntent::Submit {
            task_key: task.key().to_string(),
        });
    }

    fn start_review(&mut self, approve: bool) {
        let Some(task) = self.state.current_task() else {
            return;
        };
        if !self.state.can_review(task) {
            self.state.push_toast(
                ToastKind::Info,
                "Only the project owner can review submitted tasks",
            );
            return;
        }
        self.state.mode = Mode::EditNotes(NotesIntent::Review {
            task_key: task.key().to_string(),
            approve,
        });
    }

    fn dispatch_verification(
        &mut self,
        intent: NotesIntent,
        notes: String,
        sender: &UnboundedSender<AppEvent>,
    ) {
        let client = self.client.clone();
        let sender = sender.clone();
        tokio::spawn(async move {
            let (task_key, result) = match intent {
                NotesIntent::Submit { task_key } => {
                    let result = client.submit_verification(&task_key, &notes).await;
                    (task_key, result)
                }
                NotesIntent::Review { task_key, approve } => {
                    let result = client.review_verification(&task_key, approve, &notes).await;
                    (task_key, result)
                }
            };
            let _ = sender.send(AppEvent::VerificationSettled { task_key, result });
        });
    }

    fn settle_verification(&mut self, task_key: &str, result: Result<Task, ApiError>) {
        match result {
            Ok(task) => {
                // Same merge path as socket pushes.
                self.state
                    .board
                    .apply_event(&atelier_board::BoardEvent::TaskVerified(TaskPatch::from(
                        task,
                    )));
                self.state.push_toast(ToastKind::Info, "Verification updated");
            }
            Err(e) => {
                debug!(task = %task_key, error = %e, "verification call failed");
                self.state.push_toast(ToastKind::Error, e.to_string());
            }
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
