use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, ConfigField};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(draft) = app.draft() else {
        return;
    };
    let topic = draft.topic();
    let config = draft.config();

    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(13),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let field_line = |label: &str, value: usize, field: ConfigField| {
        let focused = draft.field() == field;
        let style = if focused {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        Line::from(vec![
            Span::styled(if focused { "> " } else { "  " }, style),
            Span::styled(format!("{:<24}", label), style),
            Span::styled(format!("< {} >", value), style),
        ])
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "CONFIGURE YOUR QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(Span::styled(topic.title(), Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} questions available", topic.question_count),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        field_line("Start from question #", config.start, ConfigField::Start),
        field_line("Number of questions", config.count, ConfigField::Count),
        Line::from(""),
        Line::from(Span::styled(
            format!("Questions {} to {}", config.start, config.end()),
            Style::default().fg(Color::Green),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, chunks[1]);

    let controls = Paragraph::new(
        "tab switch field  ·  h/l adjust  ·  0-9 type  ·  enter start  ·  esc back",
    )
    .alignment(Alignment::Center)
    .fg(Color::DarkGray);
    frame.render_widget(controls, chunks[3]);
}
