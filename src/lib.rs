pub mod ai;
pub mod ai_worker;
pub mod export;
pub mod extract;
pub mod logger;
pub mod models;
pub mod parser;
pub mod session;
pub mod ui;

// Re-exports for convenience
pub use ai::{generate_question, ModelConfig, OpenRouterClient, DEFAULT_MODEL};
pub use export::{history_to_csv, render_pdf, write_csv, write_pdf};
pub use extract::{extract_text, find_documents};
pub use models::{AppState, HistoryEntry, Letter, Question};
pub use parser::parse_question;
pub use session::{handle_quiz_input, QuizSession};
pub use ui::{draw_menu, draw_quiz, draw_summary};
