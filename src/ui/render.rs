use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use ratatui_image::StatefulImage;

use crate::{
    app::state::{App, MENU, Screen},
    catalog::Channel,
    player::events::{PlaybackErrorKind, PlaybackPhase},
    player::widget::StreamPlaybackWidget,
    ui::{
        artwork::ImageCache, format_clock, loading::LoadingAnimation, theme::get_theme,
    },
};

const ROUNDED_BORDER: border::Set = border::ROUNDED;

fn block_with_title(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(ROUNDED_BORDER)
        .title(title)
}

pub fn render(f: &mut Frame, app: &App, spinner: &LoadingAnimation, image_cache: &mut ImageCache) {
    let theme = get_theme();
    let area = f.area();

    let background = Block::default().style(Style::default().bg(theme.bg));
    f.render_widget(background, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    draw_header(f, chunks[0]);

    match app.screen {
        Screen::Home => draw_home(f, chunks[1], app),
        Screen::Guide => draw_guide(f, chunks[1], app),
        Screen::Search => draw_search(f, chunks[1], app),
        Screen::LiveTv => draw_live_tv(f, chunks[1], app, spinner, image_cache),
    }

    draw_footer(f, chunks[2], app);
    draw_notifications(f, area, app);
}

fn draw_header(f: &mut Frame, area: Rect) {
    let theme = get_theme();
    let clock = format_clock(Local::now());

    let block = block_with_title(" 󰔂 ").border_style(theme.border_style(false));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    f.render_widget(
        Paragraph::new("Zappeur").style(theme.header_style()),
        halves[0],
    );
    f.render_widget(
        Paragraph::new(clock)
            .alignment(Alignment::Right)
            .style(theme.label_style()),
        halves[1],
    );
}

fn draw_home(f: &mut Frame, area: Rect, app: &App) {
    let theme = get_theme();

    let items: Vec<ListItem> = MENU
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_selected = i == app.selected_menu_index;
            let prefix = if is_selected { "> " } else { "  " };
            let available = if entry.screen.is_some() { "" } else { "  ·" };
            let style = if is_selected {
                theme.selection_style()
            } else if entry.screen.is_some() {
                theme.value_style()
            } else {
                theme.label_style()
            };
            ListItem::new(format!("{}{}{}", prefix, entry.title, available)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        block_with_title(" ● Menu ").border_style(theme.border_style(true)),
    );
    f.render_widget(list, area);
}

fn draw_guide(f: &mut Frame, area: Rect, app: &App) {
    let theme = get_theme();

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    // Channel column
    let items: Vec<ListItem> = app
        .catalog
        .channels
        .iter()
        .enumerate()
        .map(|(i, channel)| {
            let is_selected = i == app.guide_channel_index;
            let prefix = if is_selected { "> " } else { "  " };
            let style = if is_selected {
                theme.selection_style()
            } else {
                theme.value_style()
            };
            ListItem::new(format!("{}{:>2}  {}", prefix, channel.number, channel.name))
                .style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block_with_title(" ● Chaînes ").border_style(theme.border_style(true)));
    f.render_widget(list, halves[0]);

    // Schedule of the selected channel
    let selected = app.catalog.channels.get(app.guide_channel_index);
    let title = match selected {
        Some(c) => format!(" ● Programme: {} ", c.name),
        None => " ● Programme ".to_string(),
    };

    let now = Local::now().time();
    let programs = selected
        .map(|c| app.catalog.programs_for(&c.id))
        .unwrap_or_default();

    let items: Vec<ListItem> = programs
        .iter()
        .enumerate()
        .map(|(i, program)| {
            let is_selected = i == app.guide_program_index;
            let on_air = program.is_airing_at(now);

            let prefix = if on_air {
                "▶ "
            } else if is_selected {
                "> "
            } else {
                "  "
            };
            let style = if on_air {
                theme.current_style()
            } else if is_selected {
                theme.selection_style()
            } else {
                theme.value_style()
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{}  ", prefix, program.time_range()), style),
                Span::styled(program.title.clone(), style),
            ]))
        })
        .collect();

    let mut list_state = ListState::default().with_selected(Some(app.guide_program_index));
    let list =
        List::new(items).block(block_with_title(&title).border_style(theme.border_style(false)));
    f.render_stateful_widget(list, halves[1], &mut list_state);
}

fn draw_search(f: &mut Frame, area: Rect, app: &App) {
    let theme = get_theme();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let query = Paragraph::new(format!("{}█", app.search_query))
        .style(theme.value_style())
        .block(block_with_title(" ● Recherche ").border_style(theme.border_style(true)));
    f.render_widget(query, chunks[0]);

    if app.search_query.trim().is_empty() {
        let hint = Paragraph::new("Tapez pour chercher une chaîne ou un programme")
            .alignment(Alignment::Center)
            .style(theme.label_style())
            .block(block_with_title(" ● Résultats ").border_style(theme.border_style(false)));
        f.render_widget(hint, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = app
        .search_hits
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            let is_selected = i == app.selected_hit_index;
            let prefix = if is_selected { "> " } else { "  " };
            let style = if is_selected {
                theme.selection_style()
            } else {
                theme.value_style()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{}", prefix, hit.title), style),
                Span::styled(format!("  {}", hit.subtitle), theme.label_style()),
            ]))
        })
        .collect();

    let title = format!(" ● Résultats ({}) ", app.search_hits.len());
    let list =
        List::new(items).block(block_with_title(&title).border_style(theme.border_style(false)));
    f.render_widget(list, chunks[1]);
}

fn draw_live_tv(
    f: &mut Frame,
    area: Rect,
    app: &App,
    spinner: &LoadingAnimation,
    image_cache: &mut ImageCache,
) {
    let fullscreen = app
        .player
        .as_ref()
        .map(|p| p.is_full_screen())
        .unwrap_or(false);

    if fullscreen {
        draw_player(f, area, app, spinner, image_cache);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    draw_player(f, chunks[0], app, spinner, image_cache);
    draw_channel_list(f, chunks[1], app);
}

fn draw_channel_list(f: &mut Frame, area: Rect, app: &App) {
    let theme = get_theme();

    let items: Vec<ListItem> = app
        .catalog
        .channels
        .iter()
        .enumerate()
        .map(|(i, channel)| {
            let is_selected = i == app.selected_channel_index;
            let is_active = i == app.active_channel_index;

            let prefix = if is_active {
                "▶ "
            } else if is_selected {
                "> "
            } else {
                "  "
            };
            let style = if is_active {
                theme.current_style()
            } else if is_selected {
                theme.selection_style()
            } else {
                theme.value_style()
            };

            let country = channel.country.as_deref().unwrap_or("");
            let name = format!("{}{:>2}  {}", prefix, channel.number, channel.name);
            // Pad by displayed width, not byte length: accented channel
            // names would otherwise shift the country column.
            let padding = area.width.saturating_sub(
                name.chars().count() as u16 + country.chars().count() as u16 + 4,
            );

            ListItem::new(Line::from(vec![
                Span::styled(name, style),
                Span::styled(" ".repeat(padding as usize), style),
                Span::styled(country.to_string(), theme.label_style()),
            ]))
        })
        .collect();

    let mut list_state = ListState::default().with_selected(Some(app.selected_channel_index));
    let list = List::new(items)
        .block(block_with_title(" ● Chaînes ").border_style(theme.border_style(true)));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_player(
    f: &mut Frame,
    area: Rect,
    app: &App,
    spinner: &LoadingAnimation,
    image_cache: &mut ImageCache,
) {
    let theme = get_theme();

    let title = match app.active_channel() {
        Some(channel) => format!(" 󰑈 {} ", channel.name),
        None => " 󰑈 Direct ".to_string(),
    };
    let block = block_with_title(&title).border_style(theme.border_style(false));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(player) = app.player.as_ref() else {
        return;
    };

    match player.phase() {
        PlaybackPhase::Uninitialized => {}
        PlaybackPhase::Loading => {
            let text = format!("{} Chargement du flux...", spinner.current_frame());
            f.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .style(theme.label_style()),
                centered_line(inner),
            );
        }
        PlaybackPhase::Ready | PlaybackPhase::Paused => {
            draw_playback_surface(f, inner, app, player, image_cache);
        }
        PlaybackPhase::Error(error) => {
            let title = match error.kind {
                PlaybackErrorKind::SourceUnreachable => "Error loading stream",
                PlaybackErrorKind::PlaybackInterrupted => "Playback interrupted",
            };
            let lines = vec![
                Line::from(Span::styled(title, theme.error_style())),
                Line::from(Span::styled(error.to_string(), theme.value_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "Sélectionnez une autre chaîne pour réessayer",
                    theme.label_style(),
                )),
            ];
            f.render_widget(
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                centered_block(inner, 4),
            );
        }
        PlaybackPhase::Unsupported => {
            let lines = vec![
                Line::from(Span::styled(
                    "Lecture en direct indisponible",
                    theme.title_style(),
                )),
                Line::from(Span::styled(
                    "Cet environnement ne permet pas la lecture de flux vidéo.",
                    theme.label_style(),
                )),
            ];
            f.render_widget(
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                centered_block(inner, 2),
            );
        }
    }
}

fn draw_playback_surface(
    f: &mut Frame,
    area: Rect,
    app: &App,
    player: &StreamPlaybackWidget,
    image_cache: &mut ImageCache,
) {
    let theme = get_theme();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    draw_screen_surface(f, chunks[0], app, image_cache);

    // Controls bar, only while Ready/Paused
    let playing = *player.phase() == PlaybackPhase::Ready && !player.is_paused();
    let play_icon = if player.is_paused() { "" } else { "󰏤" };
    let mute_icon = if player.is_muted() { "󰝟" } else { "󰕾" };
    let fs_icon = if player.is_full_screen() { "󰊔" } else { "󰊓" };

    let controls = Line::from(vec![
        Span::styled(
            format!("{} ", play_icon),
            Style::new().fg(theme.playback_color(playing)),
        ),
        Span::styled(format!("  {} ", mute_icon), theme.value_style()),
        Span::styled(format!("  {} ", fs_icon), theme.value_style()),
        Span::styled("    DIRECT", theme.live_style()),
    ]);
    f.render_widget(
        Paragraph::new(controls).alignment(Alignment::Center),
        chunks[1],
    );
}

fn draw_screen_surface(f: &mut Frame, area: Rect, app: &App, image_cache: &mut ImageCache) {
    let theme = get_theme();
    let Some(channel) = app.active_channel() else {
        return;
    };

    // Channel logo, centered, when the terminal can draw it
    if image_cache.current_channel_id.as_deref() == Some(channel.id.as_str()) {
        if let Some(ref mut protocol) = image_cache.current_image {
            let logo_height = area.height.saturating_sub(2).clamp(1, 8);
            let logo_width = logo_height * 2;
            let centered = Rect {
                x: area.x + area.width.saturating_sub(logo_width) / 2,
                y: area.y + area.height.saturating_sub(logo_height) / 2,
                width: logo_width.min(area.width),
                height: logo_height.min(area.height),
            };
            f.render_stateful_widget(StatefulImage::default(), centered, protocol);
        }
    } else {
        f.render_widget(
            Paragraph::new(channel.name.as_str())
                .alignment(Alignment::Center)
                .style(theme.title_style()),
            centered_line(area),
        );
    }

    if app.show_info {
        draw_info_panel(f, area, app, channel);
    }
}

fn draw_info_panel(f: &mut Frame, area: Rect, app: &App, channel: &Channel) {
    let theme = get_theme();

    let height = 5.min(area.height);
    let panel = Rect {
        x: area.x,
        y: area.y + area.height - height,
        width: area.width,
        height,
    };
    f.render_widget(Clear, panel);

    let now = Local::now().time();
    let on_air = app
        .catalog
        .programs_for(&channel.id)
        .into_iter()
        .find(|p| p.is_airing_at(now))
        .cloned();

    let (title, description, time_range) = match on_air {
        Some(p) => (
            p.title.clone(),
            p.description.clone().unwrap_or_default(),
            p.time_range(),
        ),
        None => (
            channel.current_show.clone().unwrap_or_default(),
            channel.description.clone().unwrap_or_default(),
            String::new(),
        ),
    };

    let lines = vec![
        Line::from(Span::styled(title, theme.title_style())),
        Line::from(Span::styled(description, theme.value_style())),
        Line::from(Span::styled(time_range, Style::new().fg(theme.accent_alt))),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block_with_title("").border_style(theme.border_style(false))),
        panel,
    );
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = get_theme();
    let keybinds = match app.screen {
        Screen::Home => "↑↓/jk: Naviguer | Entrée: Ouvrir | q: Quitter",
        Screen::Guide => {
            "↑↓: Chaîne | ←→: Programme | Entrée: Regarder | Échap: Menu | q: Quitter"
        }
        Screen::Search => "Taper: Chercher | ↑↓: Naviguer | Entrée: Regarder | Échap: Menu",
        Screen::LiveTv => {
            "↑↓: Sélection | Entrée: Zapper | n/p: Chaîne ±1 | Espace: Pause | m: Muet | f: Plein écran | i: Infos | Échap: Menu"
        }
    };

    f.render_widget(
        Paragraph::new(keybinds)
            .style(theme.label_style())
            .block(block_with_title("").border_style(theme.border_style(false))),
        area,
    );
}

fn draw_notifications(f: &mut Frame, area: Rect, app: &App) {
    let theme = get_theme();
    let notifications = app.notifications.active_notifications();

    for (i, notification) in notifications.iter().rev().take(3).enumerate() {
        let text = format!(" {} {} ", notification.level.prefix(), notification.text);
        let width = (text.chars().count() as u16).min(area.width);
        let rect = Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y: area.y + 1 + i as u16,
            width,
            height: 1,
        };
        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(text).style(
                Style::new()
                    .bg(theme.bg_highlight)
                    .fg(match notification.level {
                        crate::ui::notifications::NotificationLevel::Error => theme.error,
                        crate::ui::notifications::NotificationLevel::Warning => theme.paused,
                        crate::ui::notifications::NotificationLevel::Info => theme.fg,
                    }),
            ),
            rect,
        );
    }
}

fn centered_line(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: 1,
    }
}

fn centered_block(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        x: area.x,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width: area.width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, mpsc};
    use std::time::Duration;

    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::catalog::Catalog;
    use crate::platform::PlatformCapabilities;
    use crate::player::probe::{ProbeError, StreamInfo, StreamProbe};
    use crate::player::source::StreamSource;

    struct PendingProbe;

    impl StreamProbe for PendingProbe {
        fn open(&self, _source: &StreamSource) -> Result<StreamInfo, ProbeError> {
            std::thread::sleep(Duration::from_secs(60));
            Err(ProbeError::BadPlaylist)
        }

        fn keepalive(&self, _source: &StreamSource) -> Result<(), ProbeError> {
            Ok(())
        }
    }

    fn channel(id: &str, number: &str, name: &str) -> Channel {
        Channel {
            id: id.into(),
            number: number.into(),
            name: name.into(),
            country: Some("France".into()),
            url: "https://host/live.m3u8".into(),
            logo: None,
            current_show: None,
            description: None,
            is_live: true,
        }
    }

    #[test]
    fn accented_channel_names_keep_the_country_column_aligned() {
        let catalog = Catalog {
            channels: vec![
                channel("plain", "1", "Canal Plus"),
                channel("accented", "2", "Télé Août"),
            ],
            programs: Vec::new(),
        };
        let (tx, _rx) = mpsc::channel();
        let app = App::new(
            catalog,
            PlatformCapabilities::native(),
            "https://corsproxy.io/".into(),
            Arc::new(PendingProbe),
            tx,
        );

        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal
            .draw(|f| draw_channel_list(f, f.area(), &app))
            .unwrap();

        // Inner cells only, borders excluded.
        let buffer = terminal.backend().buffer().clone();
        let row =
            |y: u16| -> String { (1..39).map(|x| buffer[(x, y)].symbol()).collect() };

        let first = row(1);
        let second = row(2);
        assert!(first.trim_end().ends_with("France"));
        assert!(second.trim_end().ends_with("France"));
        assert_eq!(
            first.trim_end().chars().count(),
            second.trim_end().chars().count()
        );
    }
}
