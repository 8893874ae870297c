use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, OptionStatus, Selection, entry_keys};
use crate::models::{Question, QuestionKind, QuestionResult, QuestionType};

use super::format_elapsed;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(question) = app.current_question() else {
        return;
    };
    let result = app.current_result();

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(if result.is_some() { 8 } else { 0 }),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_progress(frame, chunks[0], app);
    render_badge(frame, chunks[1], question);
    render_question_text(frame, chunks[2], &question.text);

    match &question.kind {
        QuestionKind::Standard { options, .. } => {
            let lines = options
                .iter()
                .enumerate()
                .map(|(index, option)| {
                    option_line(
                        app,
                        index,
                        &option.label,
                        &option.text,
                        app.option_status(&option.id),
                        question.is_multiple_choice(),
                    )
                })
                .collect::<Vec<_>>();
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[3]);
        }
        QuestionKind::Ordering { .. } | QuestionKind::Matching { .. } => {
            render_entries(frame, chunks[3], app, question)
        }
    }

    if let Some(result) = result {
        render_result_panel(frame, chunks[4], result);
    }
    render_controls(frame, chunks[5], app);
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let progress = Line::from(vec![
        Span::styled(
            format!("Question {} of {}", session.position() + 1, session.len()),
            Style::default().fg(Color::White).bold(),
        ),
        Span::styled(
            format!("   {} answered", session.answered_count()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Length(8)]).split(area);
    frame.render_widget(Paragraph::new(progress), chunks[0]);

    let timer = Paragraph::new(format_elapsed(session.elapsed_secs()))
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(timer, chunks[1]);
}

fn render_badge(frame: &mut Frame, area: Rect, question: &Question) {
    let badge = match question.question_type() {
        QuestionType::Standard if question.is_multiple_choice() => "Select all that apply",
        QuestionType::Standard => "Select one answer",
        QuestionType::Ordering => "Choose the answer for every step",
        QuestionType::Matching => "Match each scenario",
    };
    frame.render_widget(Paragraph::new(badge).fg(Color::Yellow), area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn option_line<'a>(
    app: &App,
    index: usize,
    label: &'a str,
    text: &'a str,
    status: OptionStatus,
    multiple_choice: bool,
) -> Line<'a> {
    let is_cursor = matches!(
        app.selection(),
        Selection::Options { cursor, .. } if *cursor == index
    ) && !app.is_current_answered();

    let picked = matches!(
        status,
        OptionStatus::Selected | OptionStatus::Correct | OptionStatus::WrongPick
    );
    let check = match (multiple_choice, picked) {
        (true, true) => "[x]",
        (true, false) => "[ ]",
        (false, true) => "(*)",
        (false, false) => "( )",
    };
    let (style, verdict) = match status {
        OptionStatus::Idle if is_cursor => (Style::default().fg(Color::Cyan).bold(), ""),
        OptionStatus::Idle => (Style::default().fg(Color::Gray), ""),
        OptionStatus::Selected => (Style::default().fg(Color::Cyan), ""),
        OptionStatus::Correct => (Style::default().fg(Color::Green).bold(), "  correct"),
        OptionStatus::Missed => (Style::default().fg(Color::Green), "  missed"),
        OptionStatus::WrongPick => (Style::default().fg(Color::Red), "  wrong"),
    };
    let marker = if is_cursor { ">" } else { " " };

    Line::from(vec![
        Span::styled(format!(" {} {} ", marker, check), style),
        Span::styled(format!("{}. ", label), style),
        Span::styled(text, style),
        Span::styled(verdict, style),
    ])
}

fn render_entries(frame: &mut Frame, area: Rect, app: &App, question: &Question) {
    let cursor = match app.selection() {
        Selection::Entries { cursor, .. } => Some(*cursor),
        _ => None,
    };
    let answered = app.is_current_answered();

    let mut lines: Vec<Line> = Vec::new();
    for (index, key) in entry_keys(question).into_iter().enumerate() {
        let label = entry_label(question, key);
        let is_cursor = cursor == Some(index) && !answered;
        let choice = app.chosen_for(key).unwrap_or("(choose)");

        let (style, verdict) = match app.entry_status(key) {
            Some(true) => (Style::default().fg(Color::Green), "  correct"),
            Some(false) => (Style::default().fg(Color::Red), "  wrong"),
            None if is_cursor => (Style::default().fg(Color::Cyan).bold(), ""),
            None => (Style::default().fg(Color::Gray), ""),
        };
        let marker = if is_cursor { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(label, style),
        ]));
        lines.push(Line::from(vec![
            Span::raw("     "),
            Span::styled(format!("< {} >", choice), style.bold()),
            Span::styled(verdict, style),
        ]));
    }

    if !answered {
        let total = question.entry_count();
        let done = match app.selection() {
            Selection::Entries { chosen, .. } => chosen.len(),
            _ => 0,
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {} of {} completed", done, total),
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn entry_label(question: &Question, key: u32) -> String {
    match &question.kind {
        QuestionKind::Matching { scenarios, .. } => scenarios
            .iter()
            .find(|scenario| scenario.id == key)
            .map(|scenario| format!("Scenario {}: {}", scenario.id, scenario.text))
            .unwrap_or_default(),
        _ => format!("Step {}", key),
    }
}

fn render_result_panel(frame: &mut Frame, area: Rect, result: &QuestionResult) {
    let (title, color) = if result.is_correct {
        ("Correct!", Color::Green)
    } else {
        ("Incorrect", Color::Red)
    };
    let label = if result.correct_answer_texts.len() > 1 {
        "Correct answers: "
    } else {
        "Correct answer: "
    };

    let mut lines = vec![
        Line::from(Span::styled(title, Style::default().fg(color).bold())),
        Line::from(vec![
            Span::styled(label, Style::default().fg(Color::DarkGray)),
            Span::styled(
                result.correct_answer_texts.join(", "),
                Style::default().fg(Color::White),
            ),
        ]),
    ];
    if !result.explanation.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            result.explanation.as_str(),
            Style::default().fg(Color::Gray),
        )));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(color)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, app: &App) {
    let hint = if app.is_current_answered() {
        if app.session().is_last_question() {
            "enter view results  ·  p previous  ·  q quit"
        } else {
            "enter next  ·  p previous  ·  q quit"
        }
    } else {
        match app.current_question().map(Question::question_type) {
            Some(QuestionType::Standard) => {
                "j/k navigate  ·  space select  ·  enter check  ·  p previous  ·  q quit"
            }
            _ => "j/k navigate  ·  h/l choose  ·  x clear  ·  enter check  ·  p previous  ·  q quit",
        }
    };

    let widget = Paragraph::new(hint)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::app::App;
    use crate::models::{MatchingScenario, Question, QuestionKind, QuizOption, Topic};
    use crate::ui::test_support::render_to_string;

    fn app_with(question: Question) -> App {
        let mut app = App::new(vec![Topic {
            id: "t".to_string(),
            name: "T".to_string(),
            description: String::new(),
            file_name: "t.json".to_string(),
            question_count: 1,
            icon: None,
        }]);
        app.choose_topic();
        app.start_quiz().unwrap();
        app.finish_load(Ok(vec![question]), &mut StdRng::seed_from_u64(4));
        app
    }

    #[test]
    fn test_standard_question_and_result_panel() {
        let mut app = app_with(Question {
            id: "1".to_string(),
            text: "Which service monitors resources?".to_string(),
            kind: QuestionKind::Standard {
                options: vec![QuizOption {
                    id: "a".to_string(),
                    label: "A".to_string(),
                    text: "CloudWatch".to_string(),
                }],
                correct_answers: vec!["a".to_string()],
                multiple_choice: false,
            },
            explanation: "CloudWatch collects metrics.".to_string(),
        });

        let text = render_to_string(&app, 90, 30);
        assert!(text.contains("Question 1 of 1"));
        assert!(text.contains("Select one answer"));
        assert!(text.contains("( ) A. CloudWatch"));
        assert!(text.contains("00:00:00"));

        app.toggle_option();
        assert!(app.submit());
        let text = render_to_string(&app, 90, 30);
        assert!(text.contains("Correct!"));
        assert!(text.contains("CloudWatch collects metrics."));
        assert!(text.contains("enter view results"));
    }

    #[test]
    fn test_matching_question_lists_scenarios() {
        let app = app_with(Question {
            id: "m".to_string(),
            text: "Match the storage".to_string(),
            kind: QuestionKind::Matching {
                scenarios: vec![MatchingScenario {
                    id: 1,
                    text: "Static website".to_string(),
                    correct_answer: "S3".to_string(),
                }],
                matching_options: vec!["S3".to_string(), "EBS".to_string()],
            },
            explanation: String::new(),
        });

        let text = render_to_string(&app, 90, 30);
        assert!(text.contains("Match each scenario"));
        assert!(text.contains("Scenario 1: Static website"));
        assert!(text.contains("< (choose) >"));
        assert!(text.contains("0 of 1 completed"));
    }
}
