use crate::models::{AppState, GenRequest, GenResponse, HistoryEntry, Letter, Question};
use crate::parser::parse_question;
use crossterm::event::KeyCode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;

// Process-unique request ids, so replies from an earlier session can never
// be mistaken for the current session's outstanding request.
static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Per-quiz mutable state. One instance per running quiz, owned by the UI
/// loop; all mutation goes through the transition methods below so the
/// guards cannot be bypassed by a rendering layer.
#[derive(Debug)]
pub struct QuizSession {
    pub document_name: String,
    pub document_text: String,
    pub quiz_running: bool,
    pub question_index: usize,
    pub current_question: Option<Question>,
    pub score: usize,
    pub history: Vec<HistoryEntry>,
    pub answer_submitted: bool,
    pub pending_choice: Option<Letter>,
    pub last_error: Option<String>,
    pending_request_id: Option<u64>,
    gen_tx: Sender<GenRequest>,
}

impl QuizSession {
    pub fn new(document_name: &str, document_text: &str, gen_tx: Sender<GenRequest>) -> Self {
        Self {
            document_name: document_name.to_string(),
            document_text: document_text.to_string(),
            quiz_running: false,
            question_index: 0,
            current_question: None,
            score: 0,
            history: Vec::new(),
            answer_submitted: false,
            pending_choice: None,
            last_error: None,
            pending_request_id: None,
            gen_tx,
        }
    }

    pub fn generation_in_progress(&self) -> bool {
        self.pending_request_id.is_some()
    }

    /// Begin a fresh quiz run. Valid only with document text available and
    /// no run already in progress; resets score, history and question index
    /// before requesting the first question.
    pub fn start(&mut self) {
        if self.quiz_running || self.document_text.trim().is_empty() {
            return;
        }

        self.quiz_running = true;
        self.question_index = 0;
        self.score = 0;
        self.history.clear();
        self.current_question = None;
        self.last_error = None;
        self.request_next_question();
    }

    /// Ask the generation worker for the next question. The session stays
    /// without a current question until the response is dispatched back via
    /// `process_generation_response`.
    pub fn request_next_question(&mut self) {
        if !self.quiz_running || self.pending_request_id.is_some() {
            return;
        }

        self.current_question = None;
        self.answer_submitted = false;
        self.pending_choice = None;

        let request_id = NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
        self.pending_request_id = Some(request_id);

        // A send error means the worker is gone; the quiz then ends through
        // the error path since no response can arrive.
        if self
            .gen_tx
            .send(GenRequest::Generate {
                request_id,
                document_text: self.document_text.clone(),
            })
            .is_err()
        {
            self.pending_request_id = None;
            self.fail("Question generation worker is not available.");
        }
    }

    /// Install the worker's reply. A malformed response is treated exactly
    /// like a transport failure: the quiz ends, no retry of the prompt.
    pub fn process_generation_response(&mut self, response: GenResponse) {
        let request_id = match &response {
            GenResponse::Generated { request_id, .. } => *request_id,
            GenResponse::Error { request_id, .. } => *request_id,
        };

        // Only the reply to this session's outstanding request counts;
        // anything else is a stale response from an earlier request or run.
        if self.pending_request_id != Some(request_id) {
            return;
        }
        self.pending_request_id = None;

        // The user may have ended the quiz while the request was in flight.
        if !self.quiz_running {
            return;
        }

        match response {
            GenResponse::Generated { raw, .. } => match parse_question(&raw) {
                Some(question) => {
                    self.current_question = Some(question);
                    self.question_index += 1;
                    self.answer_submitted = false;
                    self.pending_choice = None;
                }
                None => {
                    crate::logger::log(&format!("Unparseable model response: {}", raw));
                    self.fail("Failed to parse the question from the model response.");
                }
            },
            GenResponse::Error { error, .. } => self.fail(&error),
        }
    }

    /// Record a tentative choice; ignored once the answer is submitted or
    /// while no question is on screen.
    pub fn select_choice(&mut self, letter: Letter) {
        if self.answer_submitted || self.current_question.is_none() {
            return;
        }
        self.pending_choice = Some(letter);
    }

    /// Score the pending choice against the current question and append the
    /// history entry. Guarded so that a second call before the next question
    /// loads changes nothing.
    pub fn submit_answer(&mut self) {
        if self.answer_submitted {
            return;
        }
        let Some(question) = &self.current_question else {
            return;
        };
        let Some(chosen) = self.pending_choice else {
            return;
        };

        let correct = chosen == question.correct;
        if correct {
            self.score += 1;
        }

        let feedback = if correct {
            "Correct!".to_string()
        } else {
            format!(
                "Incorrect. Correct answer: {}) {}",
                question.correct,
                question.option(question.correct)
            )
        };

        self.history.push(HistoryEntry {
            question: question.text.clone(),
            options: question.options.clone(),
            chosen,
            correct: question.correct,
            feedback,
        });
        self.answer_submitted = true;
    }

    /// Move on after a submitted answer.
    pub fn next_question(&mut self) {
        if !self.answer_submitted {
            return;
        }
        self.request_next_question();
    }

    /// End the run, keeping score and history for the summary.
    pub fn end(&mut self) {
        self.quiz_running = false;
    }

    fn fail(&mut self, message: &str) {
        self.quiz_running = false;
        self.last_error = Some(message.to_string());
    }

    pub fn percent(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        (self.score * 100) as f64 / self.history.len() as f64
    }

    pub fn summary_verdict(&self) -> &'static str {
        let percent = self.percent();
        if percent == 100.0 {
            "Perfect score! You're a master of this topic!"
        } else if percent >= 75.0 {
            "Great job! A little review could make it perfect."
        } else {
            "Needs improvement. Review the material and try again!"
        }
    }
}

/// Map quiz-screen key events to state machine transitions. Each key is
/// exactly one named transition; the session guards make stray keys no-ops.
pub fn handle_quiz_input(session: &mut QuizSession, key: KeyCode, app_state: &mut AppState) {
    match key {
        KeyCode::Esc => {
            session.end();
            *app_state = AppState::Summary;
        }
        KeyCode::Char('e') => {
            session.end();
            *app_state = AppState::Summary;
        }
        KeyCode::Char(c) => {
            if let Some(letter) = Letter::from_char(c) {
                session.select_choice(letter);
            }
        }
        KeyCode::Up => {
            if let Some(current) = session.pending_choice
                && !session.answer_submitted
            {
                let index = current.index();
                if index > 0 {
                    session.select_choice(Letter::ALL[index - 1]);
                }
            }
        }
        KeyCode::Down => {
            if !session.answer_submitted && session.current_question.is_some() {
                match session.pending_choice {
                    Some(current) => {
                        let index = current.index();
                        if index < Letter::ALL.len() - 1 {
                            session.select_choice(Letter::ALL[index + 1]);
                        }
                    }
                    None => session.select_choice(Letter::A),
                }
            }
        }
        KeyCode::Enter => {
            if session.generation_in_progress() {
                return;
            }
            if session.answer_submitted {
                session.next_question();
            } else {
                session.submit_answer();
            }
        }
        _ => {}
    }

    if !session.quiz_running {
        *app_state = AppState::Summary;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{channel, Receiver};

    const VALID_RAW: &str =
        "Question: What is 2+2?\nA) 3\nB) 4\nC) 5\nD) 6\nExplanation: basic math.\nCorrect Answer: B";

    fn new_session() -> (QuizSession, Receiver<GenRequest>) {
        let (tx, rx) = channel();
        (QuizSession::new("notes.pdf", "some document text", tx), rx)
    }

    fn deliver(session: &mut QuizSession, raw: &str) {
        let request_id = session.pending_request_id.unwrap();
        session.process_generation_response(GenResponse::Generated {
            request_id,
            raw: raw.to_string(),
        });
    }

    fn answer(session: &mut QuizSession, letter: Letter) {
        session.select_choice(letter);
        session.submit_answer();
    }

    #[test]
    fn test_start_requests_first_question() {
        let (mut session, rx) = new_session();
        session.start();

        assert!(session.quiz_running);
        assert!(session.generation_in_progress());
        let GenRequest::Generate { document_text, .. } = rx.try_recv().unwrap();
        assert_eq!(document_text, "some document text");
    }

    #[test]
    fn test_start_requires_document_text() {
        let (tx, _rx) = channel();
        let mut session = QuizSession::new("empty.txt", "   ", tx);
        session.start();
        assert!(!session.quiz_running);
    }

    #[test]
    fn test_start_ignored_while_running() {
        let (mut session, rx) = new_session();
        session.start();
        deliver(&mut session, VALID_RAW);
        answer(&mut session, Letter::B);

        session.start();
        assert_eq!(session.score, 1);
        assert_eq!(session.history.len(), 1);
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn test_generation_response_installs_question() {
        let (mut session, _rx) = new_session();
        session.start();
        deliver(&mut session, VALID_RAW);

        assert!(!session.generation_in_progress());
        assert_eq!(session.question_index, 1);
        let q = session.current_question.as_ref().unwrap();
        assert_eq!(q.correct, Letter::B);
        assert!(session.pending_choice.is_none());
        assert!(!session.answer_submitted);
    }

    #[test]
    fn test_parse_failure_ends_quiz() {
        let (mut session, _rx) = new_session();
        session.start();
        deliver(&mut session, "Question: broken\nA) 1\nB) 2\nC) 3\nCorrect Answer: B");

        assert!(!session.quiz_running);
        assert!(session.current_question.is_none());
        assert!(session.last_error.is_some());
    }

    #[test]
    fn test_worker_error_ends_quiz() {
        let (mut session, _rx) = new_session();
        session.start();
        let request_id = session.pending_request_id.unwrap();
        session.process_generation_response(GenResponse::Error {
            request_id,
            error: "API Error 502: bad gateway".to_string(),
        });

        assert!(!session.quiz_running);
        assert_eq!(
            session.last_error.as_deref(),
            Some("API Error 502: bad gateway")
        );
    }

    #[test]
    fn test_response_after_end_is_dropped() {
        let (mut session, _rx) = new_session();
        session.start();
        session.end();
        deliver(&mut session, VALID_RAW);

        assert!(session.current_question.is_none());
        assert_eq!(session.question_index, 0);
    }

    #[test]
    fn test_reply_from_previous_session_is_ignored() {
        let (tx, rx) = channel();
        let mut first = QuizSession::new("a.pdf", "document A text", tx.clone());
        first.start();
        let GenRequest::Generate {
            request_id: stale_id,
            ..
        } = rx.try_recv().unwrap();
        first.end();
        drop(first);

        // A new quiz on a different document must not accept the reply
        // still in flight for the ended session.
        let mut second = QuizSession::new("b.pdf", "document B text", tx);
        second.start();
        second.process_generation_response(GenResponse::Generated {
            request_id: stale_id,
            raw: "Question: From document A?\nA) 1\nB) 2\nC) 3\nD) 4\nCorrect Answer: A"
                .to_string(),
        });

        assert!(second.current_question.is_none());
        assert!(second.generation_in_progress());
        assert!(second.quiz_running);

        // The real reply still installs normally.
        deliver(&mut second, VALID_RAW);
        assert_eq!(second.question_index, 1);
    }

    #[test]
    fn test_select_requires_current_question() {
        let (mut session, _rx) = new_session();
        session.start();
        session.select_choice(Letter::A);
        assert!(session.pending_choice.is_none());
    }

    #[test]
    fn test_submit_without_choice_is_noop() {
        let (mut session, _rx) = new_session();
        session.start();
        deliver(&mut session, VALID_RAW);
        session.submit_answer();

        assert_eq!(session.score, 0);
        assert!(session.history.is_empty());
        assert!(!session.answer_submitted);
    }

    #[test]
    fn test_submit_correct_answer_scores() {
        let (mut session, _rx) = new_session();
        session.start();
        deliver(&mut session, VALID_RAW);
        answer(&mut session, Letter::B);

        assert_eq!(session.score, 1);
        assert_eq!(session.history.len(), 1);
        let entry = &session.history[0];
        assert_eq!(entry.chosen, Letter::B);
        assert_eq!(entry.correct, Letter::B);
        assert_eq!(entry.feedback, "Correct!");
    }

    #[test]
    fn test_submit_wrong_answer_records_feedback() {
        let (mut session, _rx) = new_session();
        session.start();
        deliver(&mut session, VALID_RAW);
        answer(&mut session, Letter::D);

        assert_eq!(session.score, 0);
        assert_eq!(session.history[0].feedback, "Incorrect. Correct answer: B) 4");
    }

    #[test]
    fn test_submit_is_idempotent() {
        let (mut session, _rx) = new_session();
        session.start();
        deliver(&mut session, VALID_RAW);
        answer(&mut session, Letter::B);
        session.submit_answer();
        session.submit_answer();

        assert_eq!(session.score, 1);
        assert_eq!(session.history.len(), 1);
    }

    #[test]
    fn test_select_after_submit_ignored() {
        let (mut session, _rx) = new_session();
        session.start();
        deliver(&mut session, VALID_RAW);
        answer(&mut session, Letter::B);
        session.select_choice(Letter::D);

        assert_eq!(session.pending_choice, Some(Letter::B));
    }

    #[test]
    fn test_next_requires_submission() {
        let (mut session, rx) = new_session();
        session.start();
        deliver(&mut session, VALID_RAW);
        let _ = rx.try_iter().count();

        session.next_question();
        assert_eq!(rx.try_iter().count(), 0);
        assert!(session.current_question.is_some());
    }

    #[test]
    fn test_next_after_submit_requests_question() {
        let (mut session, rx) = new_session();
        session.start();
        deliver(&mut session, VALID_RAW);
        answer(&mut session, Letter::A);
        let _ = rx.try_iter().count();

        session.next_question();
        assert!(session.generation_in_progress());
        assert!(session.current_question.is_none());
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn test_end_keeps_history_and_score() {
        let (mut session, _rx) = new_session();
        session.start();
        deliver(&mut session, VALID_RAW);
        answer(&mut session, Letter::B);
        session.end();

        assert!(!session.quiz_running);
        assert_eq!(session.score, 1);
        assert_eq!(session.history.len(), 1);
    }

    #[test]
    fn test_score_matches_history() {
        let (mut session, _rx) = new_session();
        session.start();
        let choices = [Letter::B, Letter::A, Letter::B, Letter::C];
        for chosen in choices {
            deliver(&mut session, VALID_RAW);
            answer(&mut session, chosen);
            session.next_question();
        }

        assert_eq!(session.history.len(), 4);
        let correct_entries = session
            .history
            .iter()
            .filter(|e| e.chosen == e.correct)
            .count();
        assert_eq!(session.score, correct_entries);
        assert_eq!(session.score, 2);
    }

    #[test]
    fn test_percent_empty_history() {
        let (session, _rx) = new_session();
        assert_eq!(session.percent(), 0.0);
    }

    #[test]
    fn test_verdict_boundaries() {
        let run = |choices: &[Letter]| {
            let (mut session, _rx) = new_session();
            session.start();
            for &chosen in choices {
                deliver(&mut session, VALID_RAW);
                answer(&mut session, chosen);
                session.next_question();
            }
            (session.percent(), session.summary_verdict())
        };

        let (percent, verdict) = run(&[Letter::B, Letter::B]);
        assert_eq!(percent, 100.0);
        assert!(verdict.starts_with("Perfect score"));

        let (percent, verdict) = run(&[Letter::B, Letter::B, Letter::B, Letter::A]);
        assert_eq!(percent, 75.0);
        assert!(verdict.starts_with("Great job"));

        let (percent, verdict) = run(&[Letter::B, Letter::A]);
        assert_eq!(percent, 50.0);
        assert!(verdict.starts_with("Needs improvement"));
    }

    #[test]
    fn test_quiz_key_dispatch() {
        let (mut session, _rx) = new_session();
        let mut app_state = AppState::Quiz;
        session.start();
        deliver(&mut session, VALID_RAW);

        handle_quiz_input(&mut session, KeyCode::Char('b'), &mut app_state);
        assert_eq!(session.pending_choice, Some(Letter::B));

        handle_quiz_input(&mut session, KeyCode::Down, &mut app_state);
        assert_eq!(session.pending_choice, Some(Letter::C));
        handle_quiz_input(&mut session, KeyCode::Up, &mut app_state);
        assert_eq!(session.pending_choice, Some(Letter::B));

        handle_quiz_input(&mut session, KeyCode::Enter, &mut app_state);
        assert!(session.answer_submitted);
        assert_eq!(session.score, 1);
        assert_eq!(app_state, AppState::Quiz);

        handle_quiz_input(&mut session, KeyCode::Char('e'), &mut app_state);
        assert!(!session.quiz_running);
        assert_eq!(app_state, AppState::Summary);
    }

    #[test]
    fn test_enter_ignored_while_generating() {
        let (mut session, _rx) = new_session();
        let mut app_state = AppState::Quiz;
        session.start();

        handle_quiz_input(&mut session, KeyCode::Enter, &mut app_state);
        assert!(session.history.is_empty());
        assert_eq!(app_state, AppState::Quiz);
    }
}
