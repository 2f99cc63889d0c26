use crate::models::Letter;
use crate::session::QuizSession;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_quiz(f: &mut Frame, session: &QuizSession) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(6),
            Constraint::Min(4),
            Constraint::Length(3),
        ])
        .split(f.area());

    let progress = format!(
        "Question {} - {}",
        session.question_index.max(1),
        session.document_name
    );
    let header = Paragraph::new(progress)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let question_text = if session.generation_in_progress() {
        Text::from("Generating a question from the document...")
    } else if let Some(question) = &session.current_question {
        Text::from(question.text.as_str())
    } else {
        Text::from("")
    };
    let question = Paragraph::new(question_text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question, chunks[1]);

    let mut options_text = Text::default();
    if let Some(question) = &session.current_question {
        for letter in Letter::ALL {
            let style = option_style(session, letter);
            options_text.push_line(Line::from(Span::styled(
                format!("{}) {}", letter, question.option(letter)),
                style,
            )));
        }
    }
    let options = Paragraph::new(options_text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Options"));
    f.render_widget(options, chunks[2]);

    let feedback_text = if session.answer_submitted {
        let feedback = session
            .history
            .last()
            .map(|e| e.feedback.as_str())
            .unwrap_or("");
        let color = if feedback.starts_with("Correct") {
            Color::Green
        } else {
            Color::Red
        };
        Text::from(Line::from(Span::styled(
            feedback.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
    } else if session.current_question.is_some() {
        Text::from("Choose your answer, then press Enter to submit.")
    } else {
        Text::from("")
    };
    let feedback = Paragraph::new(feedback_text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Feedback"));
    f.render_widget(feedback, chunks[3]);

    let next_label = if session.answer_submitted {
        " Next Question  "
    } else {
        " Submit  "
    };
    let help_text = vec![Line::from(vec![
        Span::styled(
            "a-d/↑/↓",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Select  "),
        Span::styled(
            "Enter",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(next_label),
        Span::styled(
            "e",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" End Quiz"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[4]);
}

fn option_style(session: &QuizSession, letter: Letter) -> Style {
    let Some(question) = &session.current_question else {
        return Style::default();
    };

    if session.answer_submitted {
        if letter == question.correct {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else if session.pending_choice == Some(letter) {
            Style::default().fg(Color::Red)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    } else if session.pending_choice == Some(letter) {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}
