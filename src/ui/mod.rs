use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{App, Popup, Section};
use crate::ideas::{Category, Idea};
use crate::theme::Theme;

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let theme = &app.theme;

    // Paint the whole screen so light mode is actually light
    f.render_widget(
        Block::default().style(Style::default().bg(theme.bg).fg(theme.text)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1),      // Title + theme hint
            Constraint::Length(3),      // Category bar
            Constraint::Length(1),      // Info line
            Constraint::Ratio(1, 2),    // Suggestions
            Constraint::Ratio(1, 2),    // Favorites
            Constraint::Length(1),      // Footer
        ])
        .split(area);

    draw_title(f, app, chunks[0]);
    draw_category_bar(f, app, chunks[1]);
    draw_info_line(f, app, chunks[2]);
    draw_ideas_box(f, app, chunks[3]);
    draw_favorites_box(f, app, chunks[4]);
    draw_footer(f, app, chunks[5]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f, theme),
        Popup::Input => draw_input_popup(f, app),
        Popup::Alert => draw_alert_popup(f, app),
    }
}

fn draw_title(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = Line::from(vec![
        Span::styled(
            "💖 Valentine's Date Night Idea Generator",
            Style::default().fg(theme.header).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   │ ", Style::default().fg(theme.inactive)),
        Span::styled("t", Style::default().fg(theme.accent)),
        Span::styled(format!(" {}", app.theme_mode.toggle_label()), Style::default().fg(theme.text_dim)),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_category_bar(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .title(Span::styled(" Category ", Style::default().fg(theme.inactive)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.inactive));

    let mut spans = Vec::new();
    for (i, category) in Category::REQUESTABLE.iter().enumerate() {
        let selected = *category == app.selected_category;
        let style = if selected {
            Style::default()
                .fg(theme.bg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text).bg(theme.bg_selected)
        };
        spans.push(Span::styled(format!(" {} ", i + 1), Style::default().fg(theme.accent)));
        spans.push(Span::styled(format!(" {} ", category.label()), style));
        spans.push(Span::raw("  "));
    }

    let bar = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(bar, area);
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    // Priority: loading > status message > ready
    let line = if app.is_loading() {
        Line::from(vec![
            Span::styled("Fetching ideas... 💡", Style::default().fg(theme.accent).add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else if let Some(ref status) = app.status_message {
        Line::from(vec![Span::styled(status, Style::default().fg(theme.warning))])
    } else {
        Line::from(vec![Span::styled("Ready", Style::default().fg(theme.text_dim))])
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn section_block<'a>(theme: &Theme, title: &'a str, is_active: bool) -> Block<'a> {
    let border_color = if is_active { theme.accent } else { theme.inactive };
    let title_style = if is_active {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.inactive)
    };

    Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
}

fn idea_rows<'a, I>(theme: &Theme, ideas: I, selected: Option<usize>, marker: impl Fn(&Idea) -> &'static str) -> Vec<Row<'a>>
where
    I: Iterator<Item = &'a Idea>,
{
    ideas
        .enumerate()
        .map(|(i, idea)| {
            let row_style = if Some(i) == selected {
                Style::default().bg(theme.bg_selected).fg(theme.text)
            } else {
                Style::default()
            };

            Row::new(vec![
                Span::styled(marker(idea), Style::default().fg(theme.accent_bright)),
                Span::styled(idea.text.as_str(), Style::default().fg(theme.text)),
                Span::styled(idea.category.label(), Style::default().fg(theme.text_dim)),
            ])
            .style(row_style)
        })
        .collect()
}

fn draw_ideas_box(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let is_active = app.section == Section::Ideas;
    let block = section_block(theme, " 💡 Ideas ", is_active);

    if app.ideas.is_empty() {
        let empty = Paragraph::new("No ideas yet! Select a category. 😊")
            .style(Style::default().fg(theme.text_dim))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let selected = is_active.then_some(app.selected_idea);
    let rows = idea_rows(theme, app.ideas.iter(), selected, |idea| {
        if app.favorites.contains(idea.id) { "❤" } else { " " }
    });

    let widths = [
        Constraint::Length(2),
        Constraint::Percentage(78),
        Constraint::Percentage(20),
    ];
    f.render_widget(Table::new(rows, widths).block(block), area);
}

fn draw_favorites_box(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let is_active = app.section == Section::Favorites;
    let title = format!(" 💾 Saved Favorites ({}) ", app.favorites.len());
    let block = section_block(theme, &title, is_active);

    if app.favorites.is_empty() {
        let empty = Paragraph::new("No favorites yet! 💕")
            .style(Style::default().fg(theme.text_dim))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let selected = is_active.then_some(app.selected_favorite);
    let rows = idea_rows(theme, app.favorites.iter(), selected, |_| "❤");

    let widths = [
        Constraint::Length(2),
        Constraint::Percentage(78),
        Constraint::Percentage(20),
    ];
    f.render_widget(Table::new(rows, widths).block(block), area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let hints: Vec<(&str, &str)> = match app.section {
        Section::Ideas => vec![
            ("1-4", "Category"),
            ("Enter", "Favorite"),
            ("i", "Add idea"),
            ("c", "Copy"),
            ("Tab", "Favorites"),
            ("h", "Help"),
        ],
        Section::Favorites => vec![
            ("↑↓", "Nav"),
            ("c", "Copy"),
            ("s", "Share"),
            ("d", "Del"),
            ("Tab", "Ideas"),
            ("h", "Help"),
        ],
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 4 } else if area.width < 80 { 5 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(theme.accent)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(theme.text_dim)),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_input_popup(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = f.area();
    let popup_area = centered_rect(if area.width < 80 { 90 } else { 60 }, 20, area);

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" Suggest your own date idea... ", Style::default().fg(theme.accent)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.bg));

    let content = Paragraph::new(vec![
        Line::from(Span::styled(format!("{}_", app.input_buffer), Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(theme.success).add_modifier(Modifier::BOLD)),
            Span::styled(" Submit Your Idea   ", Style::default().fg(theme.text_dim)),
            Span::styled("Esc", Style::default().fg(theme.danger)),
            Span::styled(" Cancel", Style::default().fg(theme.text_dim)),
        ]),
    ])
    .wrap(Wrap { trim: false })
    .block(block);

    f.render_widget(content, popup_area);
}

fn draw_alert_popup(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let popup_area = centered_rect(50, 25, f.area());

    f.render_widget(Clear, popup_area);

    let message = app.alert_message.as_deref().unwrap_or("Something went wrong");

    let alert = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(theme.danger))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
            Span::styled(" OK", Style::default().fg(theme.text_dim)),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Error ", Style::default().fg(theme.danger)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.danger))
            .style(Style::default().bg(theme.bg)),
    )
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    f.render_widget(alert, popup_area);
}

fn draw_help_popup(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 40 { 95 } else { 75 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(theme.header).add_modifier(Modifier::BOLD)))
    };
    let binding = |key: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", key), Style::default().fg(theme.accent)),
            Span::raw(action),
        ])
    };

    let help_text = vec![
        heading("═══ Ideas ═══"),
        binding("1-4", "Fetch ideas: All / Indoor / Outdoor / Budget"),
        binding("r", "Fetch again for the selected category"),
        binding("i", "Suggest your own idea"),
        binding("Enter/f", "Save the selected idea to favorites"),
        Line::from(""),
        heading("═══ Favorites ═══"),
        binding("c", "Copy the selected idea to the clipboard"),
        binding("s", "Share the selected idea by mail"),
        binding("d/Del", "Remove the selected favorite"),
        Line::from(""),
        heading("═══ General ═══"),
        binding("Tab", "Switch between Ideas and Favorites"),
        binding("↑/↓ j/k", "Move up/down in lists"),
        binding("t", "Toggle light/dark mode"),
        binding("q", "Quit"),
        Line::from(""),
        heading("═══ Command Line ═══"),
        binding("datenight --category outdoor", ""),
        Line::from(Span::styled("            Print ideas and exit", Style::default().fg(theme.text_dim))),
        binding("datenight --favorites", ""),
        Line::from(Span::styled("            Print saved favorites as JSON", Style::default().fg(theme.text_dim))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(theme.text_dim)),
            Span::styled("h", Style::default().fg(theme.accent)),
            Span::styled("/", Style::default().fg(theme.text_dim)),
            Span::styled("?", Style::default().fg(theme.accent)),
            Span::styled("/", Style::default().fg(theme.text_dim)),
            Span::styled("Esc", Style::default().fg(theme.accent)),
            Span::styled(" to close", Style::default().fg(theme.text_dim)),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" datenight Help ", Style::default().fg(theme.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent))
                .style(Style::default().bg(theme.bg)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::provider::{IdeaProvider, ProviderError};
    use crate::storage::LocalStore;
    use async_trait::async_trait;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    struct Silent;

    #[async_trait]
    impl IdeaProvider for Silent {
        async fn suggest(&self, _category: Category) -> Result<String, ProviderError> {
            Err(ProviderError::EmptyResponse)
        }
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_empty_states_render() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::with_parts(AppConfig::default(), LocalStore::new(dir.path()), Arc::new(Silent));
        let text = screen_text(&app);
        assert!(text.contains("No ideas yet!"));
        assert!(text.contains("No favorites yet!"));
        assert!(text.contains("Outdoor"));
    }

    #[test]
    fn test_ideas_render() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::with_parts(AppConfig::default(), LocalStore::new(dir.path()), Arc::new(Silent));
        app.input_buffer = "Ice skating".to_string();
        app.submit_user_idea();
        app.add_selected_to_favorites().unwrap();

        let text = screen_text(&app);
        assert!(text.contains("Ice skating"));
        assert!(text.contains("Saved Favorites (1)"));
        assert!(!text.contains("No favorites yet!"));
    }

    #[test]
    fn test_centered_rect_fits_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(50, 50, outer);
        assert_eq!(inner.width, 50);
        assert_eq!(inner.height, 25);
        assert!(inner.x >= 25 && inner.y >= 12);
    }
}
