use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0]);
    render_topics(frame, chunks[1], app);
    render_load_error(frame, chunks[2], app.load_error());
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let content = vec![
        Line::from(Span::styled(
            "QUIZ MAKER",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from("Select a quiz topic to get started".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_topics(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = Vec::with_capacity(app.topics().len() * 3);

    for (index, topic) in app.topics().iter().enumerate() {
        let is_selected = index == app.topic_cursor();
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(topic.title(), style),
            Span::styled(
                format!("  ({} questions)", topic.question_count),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("   {}", topic.description),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_load_error(frame: &mut Frame, area: Rect, error: Option<&str>) {
    let Some(error) = error else {
        return;
    };
    let widget = Paragraph::new(error)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .fg(Color::Red);
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k navigate  ·  enter select  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
