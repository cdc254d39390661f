//! Application state and main loop

use crate::action::Action;
use crate::clipboard;
use crate::components::{Component, ViewerComponent};
use crate::ingest::{self, IngestEvent, InputSource};
use crate::keymap::Keymap;
use crate::tui::{self, Tui};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use logview_core::{Config, Feed};
use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;

/// Main application state
pub struct App {
    /// Whether the application should quit
    should_quit: bool,
    /// Records shared with the ingestion task
    feed: Feed,
    source: InputSource,
    viewer: ViewerComponent,
}

impl App {
    /// Build the app, resolving the configured keymap
    pub fn new(config: &Config, source: InputSource) -> Result<Self> {
        let keymap = Keymap::from_config(&config.keymap).wrap_err("invalid keymap")?;
        let feed = Feed::new();
        let viewer = ViewerComponent::new(
            feed.clone(),
            keymap,
            config.keymap.clone(),
            config.ui.clone(),
            source.describe(),
        );

        Ok(Self {
            should_quit: false,
            feed,
            source,
            viewer,
        })
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        // Open the input before taking over the terminal so errors print normally
        let reader = self
            .source
            .open()
            .await
            .wrap_err_with(|| format!("failed to open {}", self.source.describe()))?;

        tui::install_panic_hook();
        let mut terminal = tui::init()?;

        let result = self.main_loop(&mut terminal, reader).await;

        tui::restore()?;

        result
    }

    /// Main event loop
    async fn main_loop(
        &mut self,
        terminal: &mut Tui,
        reader: Box<dyn AsyncBufRead + Unpin + Send>,
    ) -> Result<()> {
        let (ingest_tx, mut ingest_rx) = mpsc::unbounded_channel();
        let ingest = ingest::spawn(reader, self.feed.clone(), ingest_tx);
        tracing::info!("Reading records from {}", self.source.describe());

        let mut events = EventStream::new();
        let mut input_open = true;
        let mut dirty = true;

        loop {
            if dirty {
                self.draw(terminal)?;
                dirty = false;
            }

            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = self.viewer.handle_key_event(key)? {
                            dirty |= self.handle_action(action);
                        }
                    }
                    Some(Ok(Event::Resize(w, h))) => {
                        dirty |= self.handle_action(Action::Resize(w, h));
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e).wrap_err("failed to read terminal events"),
                    None => break,
                },
                Some(event) = ingest_rx.recv(), if input_open => {
                    // Coalesce a burst of appends into a single frame
                    let mut next = Some(event);
                    while let Some(event) = next {
                        if matches!(event, IngestEvent::Closed | IngestEvent::Failed(_)) {
                            input_open = false;
                        }
                        dirty |= self.viewer.on_ingest(event);
                        next = ingest_rx.try_recv().ok();
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        ingest.abort();
        Ok(())
    }

    fn draw(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut result = Ok(());
        terminal.draw(|frame| {
            let area = frame.area();
            result = self.viewer.draw(frame, area);
        })?;
        result
    }

    /// Handle an action, returning whether a redraw is needed
    fn handle_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.should_quit = true;
                false
            }
            Action::Render => true,
            Action::Resize(w, h) => {
                tracing::debug!("Terminal resized to {}x{}", w, h);
                true
            }
            Action::Copy(text) => {
                clipboard::copy_record(text);
                false
            }
        }
    }
}
