use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::QuestionResult;
use crate::summary::Summary;

use super::format_elapsed;

const QUESTION_PREVIEW_LENGTH: usize = 60;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(summary) = app.summary() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_score_card(frame, chunks[0], summary, app.session().elapsed_secs());
    render_breakdown(frame, chunks[1], app, summary);
    render_controls(frame, chunks[2]);
}

fn score_color(score: f64) -> Color {
    match score as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_card(frame: &mut Frame, area: Rect, summary: &Summary, elapsed_secs: u64) {
    let color = score_color(summary.score);

    let content = vec![
        Line::from(Span::styled(
            "QUIZ COMPLETE",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{:.0}%", summary.score),
            Style::default().fg(color).bold(),
        )),
        Line::from(Span::styled(
            summary.performance().message(),
            Style::default().fg(color),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{} correct", summary.correct),
                Style::default().fg(Color::Green),
            ),
            Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} incorrect", summary.incorrect),
                Style::default().fg(Color::Red),
            ),
            Span::styled(
                format!("  ·  {} total  ·  {}", summary.total, format_elapsed(elapsed_secs)),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_breakdown(frame: &mut Frame, area: Rect, app: &App, summary: &Summary) {
    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_line = 0;

    for (index, result) in summary.results.iter().enumerate() {
        let is_cursor = index == app.summary_cursor();
        if is_cursor {
            cursor_line = lines.len();
        }

        let (symbol, color) = if result.is_correct {
            ("+", Color::Green)
        } else {
            ("-", Color::Red)
        };
        let text_style = if is_cursor {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };

        let mut heading = vec![
            Span::styled(if is_cursor { ">" } else { " " }, text_style),
            Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
            Span::styled(
                format!("{:2}. ", index + 1),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(truncate_question(&result.question_text), text_style),
        ];
        if result.multiple_choice {
            heading.push(Span::styled(
                "  multiple choice",
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(heading));

        if app.is_expanded(&result.question_id) {
            lines.extend(detail_lines(result));
            lines.push(Line::from(""));
        }
    }

    let height = area.height.saturating_sub(1) as usize;
    let scroll = cursor_line.saturating_sub(height.saturating_sub(1));

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn detail_lines(result: &QuestionResult) -> Vec<Line<'_>> {
    let indent = "       ";
    let mut lines = vec![Line::from(Span::styled(
        format!("{}{}", indent, result.question_text),
        Style::default().fg(Color::White),
    ))];

    if !result.is_correct && !result.options.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("{}Answer options:", indent),
            Style::default().fg(Color::DarkGray),
        )));
        let picked = result.selected_option_ids();
        for option in &result.options {
            let is_correct = result.correct_answer_ids.contains(&option.id);
            let is_picked = picked.contains(&option.id);
            let (mark, style) = match (is_correct, is_picked) {
                (true, _) => ("+", Style::default().fg(Color::Green)),
                (false, true) => ("x", Style::default().fg(Color::Red)),
                (false, false) => (" ", Style::default().fg(Color::Gray)),
            };
            lines.push(Line::from(Span::styled(
                format!("{}{} {}. {}", indent, mark, option.label, option.text),
                style,
            )));
        }
    } else {
        let your_answer = if result.user_answer_texts.is_empty() {
            "(not answered)".to_string()
        } else {
            result.user_answer_texts.join(", ")
        };
        let color = if result.is_correct {
            Color::Green
        } else {
            Color::Red
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}Your answer: ", indent),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(your_answer, Style::default().fg(color)),
        ]));
        if !result.is_correct {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}Correct answer: ", indent),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    result.correct_answer_texts.join(", "),
                    Style::default().fg(Color::Green),
                ),
            ]));
        }
    }

    if !result.explanation.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("{}{}", indent, result.explanation),
            Style::default().fg(Color::Gray).italic(),
        )));
    }
    lines
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k move  ·  enter details  ·  r new quiz  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
