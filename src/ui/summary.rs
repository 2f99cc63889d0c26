use crate::models::{HistoryEntry, Letter};
use crate::session::QuizSession;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_summary(f: &mut Frame, session: &QuizSession, status: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title_text = format!("Final Results - {}", session.document_name);
    let title = Paragraph::new(title_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let mut summary_text = Text::default();
    if let Some(error) = &session.last_error {
        summary_text.push_line(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        summary_text.push_line(Line::from(""));
    }

    if session.history.is_empty() {
        summary_text.push_line(Line::from("No questions were answered."));
    } else {
        summary_text.push_line(Line::from(format!(
            "Score: {} out of {} ({:.2}%)",
            session.score,
            session.history.len(),
            session.percent()
        )));
        summary_text.push_line(Line::from(Span::styled(
            session.summary_verdict(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        summary_text.push_line(Line::from(""));

        for (i, entry) in session.history.iter().enumerate() {
            summary_text.push_line(Line::from(Span::styled(
                format!("Q{}: {}", i + 1, entry.question),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for letter in Letter::ALL {
                summary_text.push_line(Line::from(format!(
                    "  {} {}) {}",
                    history_marker(letter, entry),
                    letter,
                    entry.options[letter.index()]
                )));
            }
            summary_text.push_line(Line::from(format!("  Feedback: {}", entry.feedback)));
            summary_text.push_line(Line::from(""));
        }
    }

    let summary = Paragraph::new(summary_text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Quiz History"));
    f.render_widget(summary, chunks[1]);

    let status_line = Paragraph::new(status.unwrap_or(""))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status_line, chunks[2]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "c",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Export CSV  "),
        Span::styled(
            "p",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Export PDF  "),
        Span::styled(
            "m",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Main Menu  "),
        Span::styled(
            "q",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Quit"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

fn history_marker(letter: Letter, entry: &HistoryEntry) -> &'static str {
    if letter == entry.correct {
        "+"
    } else if letter == entry.chosen {
        "x"
    } else {
        "-"
    }
}
