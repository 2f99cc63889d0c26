use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use docquiz::models::AppState;
use docquiz::session::{handle_quiz_input, QuizSession};
use docquiz::{ai_worker, export, extract, logger, ui};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

const EXPORT_DIR: &str = "exports";

fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    logger::init();

    // Startup-fatal: without the key every generation call would fail.
    if std::env::var("OPENROUTER_API_KEY").is_err() {
        eprintln!("OPENROUTER_API_KEY is not set. Add it to the environment or a .env file.");
        std::process::exit(1);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (req_tx, req_rx) = channel();
    let (resp_tx, resp_rx) = channel();
    let _worker = ai_worker::spawn_generation_worker(resp_tx, req_rx);

    let mut app_state = AppState::Menu;
    let documents = extract::find_documents();
    let mut selected_doc_index: usize = 0;
    let mut quiz_session: Option<QuizSession> = None;
    let mut status_message: Option<String> = None;

    loop {
        if let Some(session) = &mut quiz_session {
            while let Ok(response) = resp_rx.try_recv() {
                session.process_generation_response(response);
            }
            if app_state == AppState::Quiz && !session.quiz_running {
                app_state = AppState::Summary;
            }
        }

        terminal.draw(|f| match app_state {
            AppState::Menu => {
                ui::draw_menu(f, &documents, selected_doc_index, status_message.as_deref())
            }
            AppState::Quiz => {
                if let Some(session) = &quiz_session {
                    ui::draw_quiz(f, session);
                }
            }
            AppState::Summary => {
                if let Some(session) = &quiz_session {
                    ui::draw_summary(f, session, status_message.as_deref());
                }
            }
        })?;

        // Short poll so worker responses are drained promptly.
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            match app_state {
                AppState::Menu => match key.code {
                    KeyCode::Up => {
                        if selected_doc_index > 0 {
                            selected_doc_index -= 1;
                        }
                    }
                    KeyCode::Down => {
                        if selected_doc_index < documents.len().saturating_sub(1) {
                            selected_doc_index += 1;
                        }
                    }
                    KeyCode::Enter => {
                        if !documents.is_empty() {
                            let path = &documents[selected_doc_index];
                            match extract::extract_text(path) {
                                Ok(text) if !text.trim().is_empty() => {
                                    let name = path
                                        .file_name()
                                        .map(|n| n.to_string_lossy().to_string())
                                        .unwrap_or_default();
                                    let mut session =
                                        QuizSession::new(&name, &text, req_tx.clone());
                                    session.start();
                                    quiz_session = Some(session);
                                    status_message = None;
                                    app_state = AppState::Quiz;
                                }
                                Ok(_) => {
                                    status_message = Some(format!(
                                        "No text could be extracted from {}",
                                        path.display()
                                    ));
                                }
                                Err(e) => status_message = Some(e),
                            }
                        }
                    }
                    KeyCode::Char('q') => break,
                    _ => {}
                },
                AppState::Quiz => {
                    if let Some(session) = &mut quiz_session {
                        handle_quiz_input(session, key.code, &mut app_state);
                    }
                }
                AppState::Summary => match key.code {
                    KeyCode::Char('c') => {
                        if let Some(session) = &quiz_session {
                            status_message =
                                Some(match export::write_csv(Path::new(EXPORT_DIR), &session.history) {
                                    Ok(path) => format!("Saved {}", path.display()),
                                    Err(e) => format!("CSV export failed: {}", e),
                                });
                        }
                    }
                    KeyCode::Char('p') => {
                        if let Some(session) = &quiz_session {
                            status_message = Some(
                                match export::write_pdf(
                                    Path::new(EXPORT_DIR),
                                    &session.history,
                                    session.score,
                                ) {
                                    Ok(path) => format!("Saved {}", path.display()),
                                    Err(e) => format!("PDF export failed: {}", e),
                                },
                            );
                        }
                    }
                    KeyCode::Char('m') => {
                        quiz_session = None;
                        status_message = None;
                        app_state = AppState::Menu;
                    }
                    KeyCode::Char('q') => break,
                    _ => {}
                },
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
