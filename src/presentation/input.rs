use crate::application::{App, AppMode, ContextAction};
use crate::infrastructure::SettingsRepository;
use crate::presentation::cell_at;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::MainMenu => Self::handle_main_menu(app, key),
            AppMode::Table => Self::handle_table_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::Prompt => Self::handle_prompt_mode(app, key),
            AppMode::ContextMenu => Self::handle_context_menu(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::Settings => Self::handle_settings_mode(app, key),
            AppMode::About => Self::handle_about_mode(app, key),
        }
    }

    /// Mouse input for the table. `screen` is the full terminal area.
    pub fn handle_mouse_event(app: &mut App, event: MouseEvent, screen: Rect) {
        match app.mode {
            AppMode::Table => {}
            AppMode::ContextMenu => {
                if matches!(event.kind, MouseEventKind::Down(_)) {
                    app.mode = AppMode::Table;
                }
                return;
            }
            _ => return,
        }

        let hit = cell_at(screen, event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((row, col)) = hit {
                    app.status_message = None;
                    app.selected_row = row;
                    app.selected_col = col;
                    app.clear_selection();
                    app.start_selection();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((row, col)) = hit {
                    if app.selecting {
                        app.selected_row = row;
                        app.selected_col = col;
                        app.update_selection(row, col);
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                app.end_selection();
            }
            MouseEventKind::Down(MouseButton::Right) => {
                if let Some((row, col)) = hit {
                    if !app.is_cell_selected(row, col) {
                        app.clear_selection();
                        app.selected_row = row;
                        app.selected_col = col;
                    }
                    app.open_context_menu();
                }
            }
            _ => {}
        }
    }

    fn handle_main_menu(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.menu_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.menu_next(),
            KeyCode::Enter => app.activate_menu_item(),
            KeyCode::Char('q') => app.should_quit = true,
            _ => {}
        }
    }

    fn handle_table_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('z') => {
                    app.undo();
                    return;
                }
                KeyCode::Char('y') => {
                    app.redo();
                    return;
                }
                _ => {}
            }
        }

        let is_shift = modifiers.contains(KeyModifiers::SHIFT);
        app.status_message = None;

        match key {
            KeyCode::Up => app.move_cursor(-1, 0, is_shift),
            KeyCode::Down => app.move_cursor(1, 0, is_shift),
            KeyCode::Left => app.move_cursor(0, -1, is_shift),
            KeyCode::Right => app.move_cursor(0, 1, is_shift),
            KeyCode::Char('k') => app.move_cursor(-1, 0, false),
            KeyCode::Char('j') => app.move_cursor(1, 0, false),
            KeyCode::Char('h') => app.move_cursor(0, -1, false),
            KeyCode::Char('l') => app.move_cursor(0, 1, false),
            KeyCode::Enter | KeyCode::F(2) => app.start_editing(),
            KeyCode::Char('e') => app.start_prompt(),
            KeyCode::Char('+') | KeyCode::Char('=') => app.increment_selection(),
            KeyCode::Char('-') => app.decrement_selection(),
            KeyCode::Char('i') => app.interpolate_selection(),
            KeyCode::Char('f') => app.filter_grid(),
            KeyCode::Char('c') | KeyCode::Delete | KeyCode::Backspace => app.clear_selection_values(),
            KeyCode::Char('m') => app.open_context_menu(),
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Esc => {
                if app.get_selection_range().is_some() {
                    app.clear_selection();
                } else {
                    app.close_table();
                }
            }
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_editing(),
            KeyCode::Esc => app.cancel_editing(),
            _ => Self::edit_input(app, key),
        }
    }

    fn handle_prompt_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_prompt(),
            KeyCode::Esc => app.cancel_prompt(),
            _ => Self::edit_input(app, key),
        }
    }

    /// Line editing shared by the cell editor and the value prompt.
    fn edit_input(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    app.input.remove(app.cursor_position - 1);
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < app.input.len() {
                    app.input.remove(app.cursor_position);
                }
            }
            KeyCode::Left => {
                if app.cursor_position > 0 {
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Right => {
                if app.cursor_position < app.input.len() {
                    app.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.input.len();
            }
            KeyCode::Char(c) if c.is_ascii() => {
                app.input.insert(app.cursor_position, c);
                app.cursor_position += 1;
            }
            _ => {}
        }
    }

    fn handle_context_menu(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.context_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.context_next(),
            KeyCode::Enter => app.run_context_action(ContextAction::ALL[app.context_index]),
            KeyCode::Esc | KeyCode::Char('m') => app.mode = AppMode::Table,
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Table;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_settings_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.settings_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.settings_next(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => app.adjust_setting(-1.0),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') => app.adjust_setting(1.0),
            KeyCode::Char('s') => {
                let result = SettingsRepository::save_settings(&app.settings, &app.settings_path);
                app.set_settings_save_result(result);
            }
            KeyCode::Esc | KeyCode::Enter => {
                app.mode = AppMode::MainMenu;
                app.status_message = None;
            }
            _ => {}
        }
    }

    fn handle_about_mode(app: &mut App, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            app.mode = AppMode::MainMenu;
        }
    }
}
