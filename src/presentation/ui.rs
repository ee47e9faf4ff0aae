use crate::application::{App, AppMode, ContextAction, MenuItem, SettingsField};
use crate::domain::GRID_SIZE;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table},
    Frame,
};

const LABEL_WIDTH: u16 = 4;
const CELL_WIDTH: u16 = 7;
const COLUMN_SPACING: u16 = 1;

pub fn render_ui(f: &mut Frame, app: &App) {
    let [header, body, status] = screen_chunks(f.area());

    render_header(f, app, header);
    match app.mode {
        AppMode::MainMenu | AppMode::Settings | AppMode::About => render_main_menu(f, app, body),
        _ => render_table(f, app, body),
    }
    render_status_bar(f, app, status);

    match app.mode {
        AppMode::Settings => render_settings_popup(f, app),
        AppMode::About => render_about_popup(f),
        AppMode::ContextMenu => render_context_menu(f, app),
        AppMode::Help => render_help_popup(f, app.help_scroll),
        _ => {}
    }
}

fn screen_chunks(area: Rect) -> [Rect; 3] {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .areas(area)
}

/// Maps a screen position to the table cell drawn there, if any.
///
/// `screen` is the whole terminal area, laid out the same way `render_ui` does.
pub fn cell_at(screen: Rect, x: u16, y: u16) -> Option<(usize, usize)> {
    let [_, body, _] = screen_chunks(screen);
    let inner = Rect {
        x: body.x + 1,
        y: body.y + 1,
        width: body.width.saturating_sub(2),
        height: body.height.saturating_sub(2),
    };

    let first_row_y = inner.y + 1;
    let first_col_x = inner.x + LABEL_WIDTH + COLUMN_SPACING;
    if y < first_row_y || x < first_col_x || y >= inner.bottom() || x >= inner.right() {
        return None;
    }

    let row = (y - first_row_y) as usize;
    let offset = x - first_col_x;
    let pitch = CELL_WIDTH + COLUMN_SPACING;
    if offset % pitch >= CELL_WIDTH {
        return None;
    }
    let col = (offset / pitch) as usize;

    (row < GRID_SIZE && col < GRID_SIZE).then_some((row, col))
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let text = match app.mode {
        AppMode::MainMenu | AppMode::Settings | AppMode::About => "tmap - Table Map Editor".to_string(),
        _ => {
            let sel = app.active_selection();
            format!(
                "tmap - Table Map Editor | Cell: ({}, {}) | Selection: {}x{} | Value: {}",
                app.selected_row,
                app.selected_col,
                sel.rows(),
                sel.cols(),
                app.display(app.selected_row, app.selected_col).text
            )
        }
    };
    f.render_widget(Paragraph::new(text).style(Style::default().fg(Color::Cyan)), area);
}

fn render_main_menu(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = MenuItem::ALL.iter().map(|item| ListItem::new(item.label())).collect();
    let menu_area = centered(area, 30, MenuItem::ALL.len() as u16 + 2);

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Main"))
        .highlight_style(Style::default().bg(Color::LightBlue).fg(Color::Black))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.menu_index));
    f.render_stateful_widget(list, menu_area, &mut state);
}

fn render_table(f: &mut Frame, app: &App, area: Rect) {
    let mut headers = vec![Cell::from("")];
    for col in 0..GRID_SIZE {
        let header_style = if col == app.selected_col {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        };
        headers.push(Cell::from(format!("{:>width$}", col, width = CELL_WIDTH as usize)).style(header_style));
    }

    let mut rows = Vec::with_capacity(GRID_SIZE);
    for row in 0..GRID_SIZE {
        let row_number_style = if row == app.selected_row {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let mut cells = vec![Cell::from(format!("{}", row)).style(row_number_style)];

        for col in 0..GRID_SIZE {
            let shown = app.display(row, col);
            let is_cursor = row == app.selected_row && col == app.selected_col;
            let text = if is_cursor && app.mode == AppMode::Editing {
                app.input.clone()
            } else {
                shown.text
            };

            let (r, g, b) = shown.color;
            let mut style = Style::default().bg(Color::Rgb(r, g, b)).fg(Color::Black);
            if is_cursor {
                style = Style::default().bg(Color::Blue).fg(Color::White);
            } else if app.is_cell_selected(row, col) {
                style = style.add_modifier(Modifier::REVERSED);
            }

            cells.push(Cell::from(format!("{:>width$}", text, width = CELL_WIDTH as usize)).style(style));
        }

        rows.push(Row::new(cells).height(1));
    }

    let mut widths = vec![Constraint::Length(LABEL_WIDTH)];
    widths.extend(std::iter::repeat_n(Constraint::Length(CELL_WIDTH), GRID_SIZE));
    let table = Table::new(rows, widths)
        .header(Row::new(headers).height(1))
        .block(Block::default().borders(Borders::ALL).title("Table View"))
        .column_spacing(COLUMN_SPACING);

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Editing => format!("Editing: {} (Enter to save, Esc to cancel)", app.input),
        AppMode::Prompt => {
            let hint = format!(
                "Enter Value [{} .. {}]: {} (Enter to apply, Esc to cancel)",
                app.settings.prompt_min, app.settings.prompt_max, app.input
            );
            match app.status_message {
                Some(ref status) => format!("{} | {}", status, hint),
                None => hint,
            }
        }
        _ => match app.status_message {
            Some(ref status) => status.clone(),
            None => match app.mode {
                AppMode::MainMenu => "↑↓: choose | Enter: open | q: quit".to_string(),
                AppMode::Settings => "↑↓: field | ←→: adjust | s: save | Esc: close".to_string(),
                AppMode::About => "Esc/Enter: close".to_string(),
                AppMode::ContextMenu => "↑↓: choose | Enter: run | Esc: close".to_string(),
                AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
                _ => "Enter: edit | e: value | +/-: step | i: interpolate | f: filter | c: clear | m: menu | ?: help | Esc: back".to_string(),
            },
        },
    };

    let style = match app.mode {
        AppMode::Editing | AppMode::Prompt => Style::default().fg(Color::Green),
        AppMode::Help | AppMode::About => Style::default().fg(Color::Cyan),
        AppMode::Settings => Style::default().fg(Color::Yellow),
        AppMode::ContextMenu => Style::default().fg(Color::Magenta),
        AppMode::MainMenu | AppMode::Table => Style::default(),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(input, area);
}

fn render_settings_popup(f: &mut Frame, app: &App) {
    let popup_area = centered(f.area(), 40, SettingsField::ALL.len() as u16 + 2);
    f.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = SettingsField::ALL
        .iter()
        .map(|field| ListItem::new(format!("{:<16}{:>10.2}", field.label(), field.value(&app.settings))))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Settings"))
        .highlight_style(Style::default().bg(Color::LightBlue).fg(Color::Black));
    let mut state = ListState::default().with_selected(Some(app.settings_index));
    f.render_stateful_widget(list, popup_area, &mut state);
}

fn render_about_popup(f: &mut Frame) {
    let popup_area = centered(f.area(), 48, 7);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(format!("tmap {}", env!("CARGO_PKG_VERSION"))),
        Line::from(""),
        Line::from("Edit, interpolate and smooth"),
        Line::from(format!("{0}x{0} numeric table maps.", GRID_SIZE)),
    ];
    let about = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("About"))
        .style(Style::default().fg(Color::White));
    f.render_widget(about, popup_area);
}

fn render_context_menu(f: &mut Frame, app: &App) {
    let popup_area = centered(f.area(), 20, ContextAction::ALL.len() as u16 + 2);
    f.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = ContextAction::ALL.iter().map(|action| ListItem::new(action.label())).collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Actions"))
        .highlight_style(Style::default().bg(Color::LightBlue).fg(Color::Black));
    let mut state = ListState::default().with_selected(Some(app.context_index));
    f.render_stateful_widget(list, popup_area, &mut state);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("tmap Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn get_help_text() -> &'static str {
    r#"TMAP TABLE EDITOR

=== THE TABLE ===
• 16 x 16 numeric cells, all starting at 0.00
• Values are shown with two decimals
• Cell color shifts from pale to red as the value grows

=== SELECTING ===
Arrow keys / hjkl    Move the cursor
Shift + arrows       Extend a selection from the cursor
Mouse drag           Select a rectangle
Esc                  Drop the selection, or go back to the main window
Without a selection the cursor cell is used.

=== EDITING ===
Enter / F2      Type a value into the cursor cell (non-numbers become 0)
e               Prompt for a value and set the whole selection
+ / -           Add / subtract the step (default 0.01)
c / Delete      Clear the selection to 0
i               Interpolate the selection from its corners
                Row or column: linear between the ends
                Rectangle: bilinear over the four corners
f               Smooth the whole table with a Gaussian filter
m / right click Open the action menu
Ctrl+Z / Ctrl+Y Undo / redo

=== SETTINGS ===
Step, filter sigma and color scale can be changed from the main
window. Press s in the settings window to save them.

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#
}
