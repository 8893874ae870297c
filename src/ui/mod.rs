mod configuration;
mod quiz;
mod summary;
mod topics;

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use crate::app::{App, Screen};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.screen() {
        Screen::TopicSelection => topics::render(frame, area, app),
        Screen::Configuration => configuration::render(frame, area, app),
        Screen::Loading => render_loading(frame, area, app),
        Screen::Quiz => quiz::render(frame, area, app),
        Screen::Summary => summary::render(frame, area, app),
    }
}

/// Formats seconds as `HH:MM:SS`.
pub fn format_elapsed(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

fn render_loading(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(5),
        Constraint::Percentage(40),
    ])
    .split(area);

    let topic = app
        .session()
        .topic()
        .map(|topic| topic.title())
        .unwrap_or_default();

    let content = vec![
        Line::from(Span::styled(topic, Style::default().fg(Color::Cyan).bold())),
        Line::from(""),
        Line::from(Span::styled(
            "Loading questions...",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from("q quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::{Terminal, backend::TestBackend};

    use crate::app::App;

    /// Renders `app` off-screen and returns the buffer as text.
    pub fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| super::render(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Topic;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00:00");
        assert_eq!(format_elapsed(61), "00:01:01");
        assert_eq!(format_elapsed(3 * 3600 + 25 * 60 + 9), "03:25:09");
    }

    #[test]
    fn test_loading_screen() {
        let topic = Topic {
            id: "aws".to_string(),
            name: "AWS Basics".to_string(),
            description: String::new(),
            file_name: "aws.json".to_string(),
            question_count: 4,
            icon: None,
        };
        let mut app = App::new(vec![topic]);
        app.choose_topic();
        app.start_quiz().unwrap();

        let text = test_support::render_to_string(&app, 60, 20);
        assert!(text.contains("AWS Basics"));
        assert!(text.contains("Loading questions..."));
    }
}
