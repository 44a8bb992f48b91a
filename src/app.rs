use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::{
    action::Action,
    cli::Args,
    components::{Component, history::HistoryComponent},
    config::Config,
    domain::window::WindowMode,
    infra::{rpc::RpcBackend, source::WalletBackend},
    tui::{Event, Tui},
};

pub struct App {
    pub should_quit: bool,
    pub should_suspend: bool,
    pub config: Config,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
    pub tui: Tui,
    pub history_component: HistoryComponent,
    pub status_message: String,
    pub last_refresh: Option<u64>,
}

impl App {
    pub async fn new(args: &Args) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let config = Config::new(args.network.as_deref(), args.rpc_url.as_deref());

        let mut history_config = config.history;
        if let Some(page_size) = args.page_size {
            history_config.page_size = page_size;
        }

        let backend: Arc<dyn WalletBackend> = Arc::new(RpcBackend::connect(&config).await?);
        let mode = if args.scroll {
            WindowMode::Scroll { offset: 0 }
        } else {
            WindowMode::Paged { page: 0 }
        };
        let history_component = HistoryComponent::new(backend, history_config, mode);

        let tui = Tui::new()?
            .tick_rate(args.tick_rate)
            .frame_rate(args.frame_rate);

        Ok(Self {
            should_quit: false,
            should_suspend: false,
            config,
            action_tx,
            action_rx,
            tui,
            history_component,
            status_message: "Ready".to_string(),
            last_refresh: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;

        // Kick off the first filter epoch: count query plus first page fetch
        self.history_component.init();

        loop {
            // Handle events
            if let Some(event) = self.tui.next().await {
                self.handle_event(event)?;
            }

            // Handle actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.handle_action(action)?;
            }

            if self.should_suspend {
                self.tui.suspend()?;
                self.should_suspend = false;
                self.tui.resume()?;
            }

            if self.should_quit {
                break;
            }
        }

        self.tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Tick => {
                self.action_tx.send(Action::Tick)?;
            }
            Event::Render => {
                self.draw_ui()?;
            }
            Event::Key(key_event) => {
                self.handle_key_event(key_event)?;
            }
            Event::Resize(w, h) => {
                self.action_tx.send(Action::Resize(w, h))?;
            }
            Event::Init => {
                info!("Application initialized");
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.action_tx.send(Action::Quit)?;
            return Ok(());
        }

        // while the detail view is open, only quit keeps its global binding
        if self.history_component.detail_open() {
            match key.code {
                KeyCode::Char('q') if key.modifiers.is_empty() => {
                    self.action_tx.send(Action::Quit)?;
                }
                _ => {
                    self.history_component.handle_key_event(key)?;
                }
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                self.action_tx.send(Action::Quit)?;
            }
            KeyCode::Char('z') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.action_tx.send(Action::Suspend)?;
            }
            KeyCode::Char('?') if key.modifiers.is_empty() => {
                self.action_tx.send(Action::Help)?;
            }
            KeyCode::Char('f') if key.modifiers.is_empty() => {
                self.action_tx.send(Action::CycleFilter)?;
            }
            KeyCode::Char('r') if key.modifiers.is_empty() => {
                self.action_tx.send(Action::Retry)?;
            }
            _ => {
                self.history_component.handle_key_event(key)?;
            }
        }
        Ok(())
    }

    fn handle_action(&mut self, action: Action) -> Result<()> {
        debug!("Handling action: {:?}", action);
        match action {
            Action::Tick => {
                if self.history_component.poll() {
                    self.status_message = "Ready".to_string();
                }

                // Periodic background refresh, measured from the end of the
                // previous trigger
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs();
                let interval = self.config.history.refresh_interval_secs;
                let should_refresh = self
                    .last_refresh
                    .map(|last| now >= last + interval)
                    .unwrap_or(true);
                if should_refresh {
                    self.history_component.refresh();
                    self.last_refresh = Some(now);
                }
            }
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Suspend => {
                self.should_suspend = true;
            }
            Action::CycleFilter => {
                self.history_component.cycle_filter();
                self.status_message = "Filter changed".to_string();
            }
            Action::Retry => {
                self.history_component.retry();
            }
            Action::Help => {
                self.status_message =
                    "UP/DOWN select, n/p page, ENTER details, f filter, r retry, q quit"
                        .to_string();
            }
            Action::Error(msg) => {
                self.status_message = format!("Error: {msg}");
            }
            _ => {}
        }
        Ok(())
    }

    fn draw_ui(&mut self) -> Result<()> {
        let history_component = &mut self.history_component;
        let status_message = self.status_message.clone();
        let network = self.config.network.name.clone();

        self.tui.terminal.draw(|f| {
            let chunks = Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

            let title = Paragraph::new(Line::from(vec![
                Span::styled(
                    "Atrium Wallet",
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(" - Transaction History"),
            ]));
            f.render_widget(title, chunks[0]);

            history_component.draw(f, chunks[1]);

            let status = Paragraph::new(Line::from(vec![
                Span::styled(status_message, Style::default().fg(Color::DarkGray)),
                Span::raw("  "),
                Span::styled(format!("[{network}]"), Style::default().fg(Color::DarkGray)),
            ]));
            f.render_widget(status, chunks[2]);
        })?;
        Ok(())
    }
}
