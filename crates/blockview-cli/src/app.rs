use anyhow::Result;
use blockview_engine::{
    BlockDocument, EditorConfig, EditorPage, HeadingLevel, ListStyle, MemoryBackend, MountPoint,
    PageState, ToolbarCommand, render, to_text,
};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use pollster::block_on;
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const MOUNT_ID: &str = "editorjs-container";

/// Terminal rendition of the editor page: toolbar, live editor content and
/// the submitted snapshot
pub struct App {
    page: EditorPage<MemoryBackend>,
    mount: MountPoint,
    show_json: bool,
}

impl App {
    pub fn new(initial: BlockDocument) -> Self {
        let page = EditorPage::new(
            MemoryBackend::new(),
            EditorConfig::default().with_initial_data(initial),
        );
        let mut mount = MountPoint::new(MOUNT_ID);

        if let Err(e) = block_on(page.initialize(&mut mount)) {
            log::warn!("Editor page started without an editor: {e}");
        }
        block_on(page.refresh_live_content());

        Self {
            page,
            mount,
            show_json: false,
        }
    }

    /// Apply one key press. Returns `false` once the page should close.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let command = match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char(c @ '1'..='3') => {
                HeadingLevel::new(c as u8 - b'0').map(ToolbarCommand::InsertHeader)
            }
            KeyCode::Char('u') => Some(ToolbarCommand::InsertList(ListStyle::Unordered)),
            KeyCode::Char('o') => Some(ToolbarCommand::InsertList(ListStyle::Ordered)),
            KeyCode::Char('b') => Some(ToolbarCommand::InsertQuote),
            KeyCode::Char('s') => {
                // Failures land in the page banner
                let _ = block_on(self.page.submit());
                None
            }
            KeyCode::Char('c') => {
                block_on(self.page.clear());
                block_on(self.page.refresh_live_content());
                None
            }
            KeyCode::Char('j') => {
                self.show_json = !self.show_json;
                None
            }
            KeyCode::Char('r') if self.page.state() == PageState::Failed => {
                let _ = block_on(self.page.initialize(&mut self.mount));
                block_on(self.page.refresh_live_content());
                None
            }
            _ => None,
        };

        if let Some(command) = command {
            if self.page.toolbar_enabled() {
                block_on(self.page.dispatch(command));
                block_on(self.page.refresh_live_content());
            } else {
                log::debug!("{} ignored: toolbar disabled", command.label());
            }
        }
        true
    }

    /// Release the editor before the terminal is restored
    pub fn shutdown(&mut self) {
        block_on(self.page.teardown());
    }

    fn editor_lines(&self) -> Vec<String> {
        match self.page.state() {
            PageState::Uninitialized | PageState::Initializing => {
                vec!["Loading editor...".to_string()]
            }
            PageState::Failed => vec!["Editor unavailable. Press r to retry.".to_string()],
            PageState::Destroyed => Vec::new(),
            _ => to_text(&render(self.page.live_content().as_ref())),
        }
    }

    fn submitted_lines(&self) -> Vec<String> {
        if self.show_json {
            return match self.page.submitted_json() {
                Some(json) => json.lines().map(str::to_string).collect(),
                None => vec!["Nothing submitted yet".to_string()],
            };
        }
        let nodes = self.page.rendered_submission();
        if nodes.is_empty() {
            vec!["Nothing submitted yet".to_string()]
        } else {
            to_text(&nodes)
        }
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        draw(terminal, app)?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !app.handle_key(key.code)
        {
            return Ok(());
        }
    }
}

fn draw<B: Backend>(terminal: &mut Terminal<B>, app: &App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    terminal.draw(|f| ui(f, app))?;
    Ok(())
}

fn pane<'a>(title: &'a str, lines: &'a [String]) -> Paragraph<'a> {
    let text: Vec<Line> = lines
        .iter()
        .map(|line| Line::from(vec![Span::raw(line.as_str())]))
        .collect();
    Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
}

fn ui(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.area());

    // Toolbar
    let toolbar_style = if app.page.toolbar_enabled() {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let toolbar = Paragraph::new(Line::from(vec![Span::styled(
        "1/2/3: Header | u: Bullet List | o: Numbered List | b: Quote | s: Submit | c: Clear",
        toolbar_style,
    )]))
    .block(Block::default().borders(Borders::ALL).title("Toolbar"));
    f.render_widget(toolbar, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[1]);

    let editor_lines = app.editor_lines();
    f.render_widget(pane("Editor", &editor_lines), columns[0]);

    let submitted_lines = app.submitted_lines();
    let submitted_title = if app.show_json {
        "Submitted (JSON)"
    } else {
        "Submitted"
    };
    f.render_widget(pane(submitted_title, &submitted_lines), columns[1]);

    // Error banner takes the help line's place
    let footer = match app.page.error_banner() {
        Some(error) => Line::from(vec![Span::styled(
            error.to_string(),
            Style::default().fg(Color::White).bg(Color::Red),
        )]),
        None => Line::from(vec![
            Span::raw(format!("{:?} | ", app.page.state())),
            Span::raw("j: Toggle JSON | q: Quit"),
        ]),
    };
    f.render_widget(Paragraph::new(vec![footer]).block(Block::default()), rows[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockview_engine::BlockContent;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        draw(&mut terminal, app).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn starts_ready_with_initial_content() {
        let app = App::new(BlockDocument::welcome());

        assert_eq!(app.page.state(), PageState::Editing);
        assert_eq!(app.mount.widgets().len(), 1);
        assert!(screen(&app).contains("# Welcome to Editor.js!"));
        assert!(screen(&app).contains("Nothing submitted yet"));
    }

    #[test]
    fn keys_drive_toolbar_and_submit() {
        let mut app = App::new(BlockDocument::default());

        assert!(app.handle_key(KeyCode::Char('3')));
        assert!(app.handle_key(KeyCode::Char('o')));
        assert!(app.handle_key(KeyCode::Char('s')));

        let submitted = app.page.submitted().unwrap();
        assert_eq!(submitted.len(), 2);
        assert!(matches!(
            &submitted.blocks[0].content,
            BlockContent::Header(header) if header.level.get() == 3
        ));
        assert_eq!(app.page.state(), PageState::Saved);
    }

    #[test]
    fn json_toggle_shows_snapshot() {
        let mut app = App::new(BlockDocument::default());
        app.handle_key(KeyCode::Char('b'));
        app.handle_key(KeyCode::Char('s'));
        app.handle_key(KeyCode::Char('j'));

        let lines = app.submitted_lines();
        assert!(lines.iter().any(|line| line.contains("\"type\": \"quote\"")));
    }

    #[test]
    fn clear_resets_to_placeholder() {
        let mut app = App::new(BlockDocument::welcome());
        app.handle_key(KeyCode::Char('s'));
        app.handle_key(KeyCode::Char('c'));

        assert!(app.page.submitted().is_none());
        assert_eq!(
            app.editor_lines(),
            vec!["Start typing your new content here...", ""]
        );
    }

    #[test]
    fn failed_start_can_retry() {
        let backend = MemoryBackend::new();
        backend.faults().initialize.set(true);
        let page = EditorPage::new(backend, EditorConfig::default());
        let mut app = App {
            page,
            mount: MountPoint::new(MOUNT_ID),
            show_json: false,
        };
        let _ = block_on(app.page.initialize(&mut app.mount));
        assert_eq!(app.page.state(), PageState::Failed);
        assert!(screen(&app).contains("Failed to load editor"));

        app.page.backend().faults().initialize.set(false);
        app.handle_key(KeyCode::Char('r'));

        assert_eq!(app.page.state(), PageState::Editing);
    }

    #[test]
    fn quit_tears_down() {
        let mut app = App::new(BlockDocument::default());

        assert!(!app.handle_key(KeyCode::Char('q')));
        app.shutdown();

        assert_eq!(app.page.state(), PageState::Destroyed);
    }
}
