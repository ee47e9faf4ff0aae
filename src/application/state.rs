//! Application state management for the table editor.
//!
//! This module contains the application context: the single editor
//! instance, the cursor and selection, the current UI mode and the
//! undo/redo history.

use crate::domain::{DisplayValue, DomainResult, Editor, GRID_SIZE, Grid, MAX_SIGMA, Selection, Settings, parse_edit};
use crate::infrastructure::SettingsError;
use std::collections::VecDeque;
use std::path::PathBuf;
use tracing::{info, warn};

const MAX_UNDO_STACK_SIZE: usize = 100;

/// Represents the current mode of the application.
///
/// The mode decides how input is interpreted and which popups are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Main window with the Table View / Settings / About / Exit menu
    MainMenu,
    /// Table navigation - arrows move the cursor, shortcuts available
    Table,
    /// Typing directly into the cursor cell
    Editing,
    /// Value prompt applied to the whole selection
    Prompt,
    /// Cell context menu is open
    ContextMenu,
    /// Help screen is displayed
    Help,
    /// Settings popup is open
    Settings,
    /// About popup is open
    About,
}

/// Entries of the main window menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    TableView,
    Settings,
    About,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [MenuItem::TableView, MenuItem::Settings, MenuItem::About, MenuItem::Exit];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::TableView => "Table View",
            MenuItem::Settings => "Settings",
            MenuItem::About => "About",
            MenuItem::Exit => "Exit",
        }
    }
}

/// Entries of the cell context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    Edit,
    Clear,
    Interpolate,
    Filter,
}

impl ContextAction {
    pub const ALL: [ContextAction; 4] = [
        ContextAction::Edit,
        ContextAction::Clear,
        ContextAction::Interpolate,
        ContextAction::Filter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ContextAction::Edit => "Edit",
            ContextAction::Clear => "Clear",
            ContextAction::Interpolate => "Interpolate",
            ContextAction::Filter => "Filter",
        }
    }
}

/// Settings that can be changed from the settings popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Step,
    Sigma,
    ColorScale,
}

impl SettingsField {
    pub const ALL: [SettingsField; 3] = [SettingsField::Step, SettingsField::Sigma, SettingsField::ColorScale];

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::Step => "Increment step",
            SettingsField::Sigma => "Filter sigma",
            SettingsField::ColorScale => "Color scale",
        }
    }

    pub fn value(self, settings: &Settings) -> f64 {
        match self {
            SettingsField::Step => settings.step,
            SettingsField::Sigma => settings.sigma,
            SettingsField::ColorScale => settings.color_scale,
        }
    }

    /// Moves the field by one notch in `direction` (+1 or -1), within its limits.
    fn adjust(self, settings: &mut Settings, direction: f64) {
        let (slot, notch, floor, ceiling) = match self {
            SettingsField::Step => (&mut settings.step, 0.01, 0.01, f64::MAX),
            SettingsField::Sigma => (&mut settings.sigma, 0.1, 0.1, MAX_SIGMA),
            SettingsField::ColorScale => (&mut settings.color_scale, 8.0, 1.0, f64::MAX),
        };
        let next = ((*slot + notch * direction) * 100.0).round() / 100.0;
        *slot = next.clamp(floor, ceiling);
    }
}

/// Main application state: the editor plus everything the UI needs.
///
/// # Examples
///
/// ```
/// use tmap::application::{App, AppMode};
///
/// let app = App::default();
/// assert_eq!(app.mode, AppMode::MainMenu);
/// assert_eq!(app.selected_row, 0);
/// assert_eq!(app.selected_col, 0);
/// ```
#[derive(Debug)]
pub struct App {
    /// The one table being edited
    pub editor: Editor,
    /// Active settings
    pub settings: Settings,
    /// Where settings are saved
    pub settings_path: PathBuf,
    /// Current application mode
    pub mode: AppMode,
    /// Highlighted main menu entry
    pub menu_index: usize,
    /// Highlighted context menu entry
    pub context_index: usize,
    /// Highlighted settings field
    pub settings_index: usize,
    /// Cursor row (zero-based)
    pub selected_row: usize,
    /// Cursor column (zero-based)
    pub selected_col: usize,
    /// Input buffer for cell editing and the value prompt
    pub input: String,
    /// Cursor position within the input buffer
    pub cursor_position: usize,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Grids captured before each change
    pub undo_stack: VecDeque<Grid>,
    /// Grids captured before each undo
    pub redo_stack: VecDeque<Grid>,
    /// Selection anchor (row, col)
    pub selection_start: Option<(usize, usize)>,
    /// Selection end (row, col)
    pub selection_end: Option<(usize, usize)>,
    /// Whether a selection is being extended
    pub selecting: bool,
    /// Set when the user chose Exit
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Settings::default(), PathBuf::from("tmap.json"))
    }
}

impl App {
    pub fn new(settings: Settings, settings_path: PathBuf) -> Self {
        Self {
            editor: Editor::new(),
            settings,
            settings_path,
            mode: AppMode::MainMenu,
            menu_index: 0,
            context_index: 0,
            settings_index: 0,
            selected_row: 0,
            selected_col: 0,
            input: String::new(),
            cursor_position: 0,
            help_scroll: 0,
            status_message: None,
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            selection_start: None,
            selection_end: None,
            selecting: false,
            should_quit: false,
        }
    }

    pub fn display(&self, row: usize, col: usize) -> DisplayValue {
        self.editor.display(row, col, self.settings.color_scale)
    }

    // Main window

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MenuItem::ALL.len();
    }

    pub fn menu_previous(&mut self) {
        self.menu_index = (self.menu_index + MenuItem::ALL.len() - 1) % MenuItem::ALL.len();
    }

    pub fn activate_menu_item(&mut self) {
        match MenuItem::ALL[self.menu_index] {
            MenuItem::TableView => {
                self.mode = AppMode::Table;
                self.status_message = None;
            }
            MenuItem::Settings => {
                self.mode = AppMode::Settings;
                self.settings_index = 0;
            }
            MenuItem::About => self.mode = AppMode::About,
            MenuItem::Exit => self.should_quit = true,
        }
    }

    /// Leaves the table and returns to the main window.
    pub fn close_table(&mut self) {
        self.clear_selection();
        self.mode = AppMode::MainMenu;
    }

    // Settings popup

    pub fn settings_next(&mut self) {
        self.settings_index = (self.settings_index + 1) % SettingsField::ALL.len();
    }

    pub fn settings_previous(&mut self) {
        self.settings_index = (self.settings_index + SettingsField::ALL.len() - 1) % SettingsField::ALL.len();
    }

    pub fn adjust_setting(&mut self, direction: f64) {
        SettingsField::ALL[self.settings_index].adjust(&mut self.settings, direction);
    }

    /// Processes the result of saving the settings file.
    pub fn set_settings_save_result(&mut self, result: Result<(), SettingsError>) {
        match result {
            Ok(()) => {
                self.status_message = Some(format!("Saved settings to {}", self.settings_path.display()));
            }
            Err(error) => {
                warn!(%error, "settings save failed");
                self.status_message = Some(format!("Save failed: {}", error));
            }
        }
    }

    // Cursor and selection

    /// Moves the cursor by (`rows`, `cols`), staying inside the table.
    ///
    /// With `extend` the selection grows from its anchor to the new cursor;
    /// without it any selection is dropped.
    pub fn move_cursor(&mut self, rows: isize, cols: isize, extend: bool) {
        if !extend {
            self.clear_selection();
        } else if !self.selecting {
            self.start_selection();
        }

        let last = GRID_SIZE as isize - 1;
        self.selected_row = (self.selected_row as isize + rows).clamp(0, last) as usize;
        self.selected_col = (self.selected_col as isize + cols).clamp(0, last) as usize;

        if extend {
            self.update_selection(self.selected_row, self.selected_col);
        }
    }

    /// Starts selection at the cursor
    pub fn start_selection(&mut self) {
        self.selection_start = Some((self.selected_row, self.selected_col));
        self.selection_end = Some((self.selected_row, self.selected_col));
        self.selecting = true;
    }

    /// Updates the selection end position
    pub fn update_selection(&mut self, row: usize, col: usize) {
        if self.selecting {
            self.selection_end = Some((row, col));
        }
    }

    /// Stops extending the selection but keeps it
    pub fn end_selection(&mut self) {
        self.selecting = false;
    }

    /// Clears the current selection
    pub fn clear_selection(&mut self) {
        self.selection_start = None;
        self.selection_end = None;
        self.selecting = false;
    }

    /// The explicitly selected rectangle, if any.
    pub fn get_selection_range(&self) -> Option<Selection> {
        match (self.selection_start, self.selection_end) {
            (Some(start), Some(end)) => Some(Selection::spanning(start, end)),
            _ => None,
        }
    }

    /// The rectangle operations act on: the selection, or the cursor cell.
    pub fn active_selection(&self) -> Selection {
        self.get_selection_range()
            .unwrap_or_else(|| Selection::cell(self.selected_row, self.selected_col))
    }

    pub fn is_cell_selected(&self, row: usize, col: usize) -> bool {
        self.get_selection_range().is_some_and(|sel| sel.contains(row, col))
    }

    // Undo / redo

    /// Runs `op` on the editor and records the previous grid if anything changed.
    fn apply<F>(&mut self, op: F) -> DomainResult<bool>
    where
        F: FnOnce(&mut Editor) -> DomainResult<()>,
    {
        let before = *self.editor.grid();
        op(&mut self.editor)?;
        if *self.editor.grid() == before {
            return Ok(false);
        }

        self.undo_stack.push_back(before);
        if self.undo_stack.len() > MAX_UNDO_STACK_SIZE {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
        Ok(true)
    }

    pub fn undo(&mut self) {
        if let Some(previous) = self.undo_stack.pop_back() {
            self.redo_stack.push_back(*self.editor.grid());
            self.editor.restore(previous);
            self.status_message = Some("Undo".to_string());
        }
    }

    pub fn redo(&mut self) {
        if let Some(next) = self.redo_stack.pop_back() {
            self.undo_stack.push_back(*self.editor.grid());
            self.editor.restore(next);
            self.status_message = Some("Redo".to_string());
        }
    }

    fn report(&mut self, result: DomainResult<bool>, done: String) {
        match result {
            Ok(true) => self.status_message = Some(done),
            Ok(false) => {}
            Err(error) => {
                warn!(%error, "operation rejected");
                self.status_message = Some(error.to_string());
            }
        }
    }

    // Grid operations on the active selection

    pub fn set_selection_value(&mut self, value: f64) {
        let sel = self.active_selection();
        let result = self.apply(|editor| {
            editor.set(sel, value);
            Ok(())
        });
        self.report(result, format!("Set {} cells to {:.2}", sel.rows() * sel.cols(), value));
    }

    pub fn increment_selection(&mut self) {
        let (sel, step) = (self.active_selection(), self.settings.step);
        let result = self.apply(|editor| {
            editor.increment(sel, step);
            Ok(())
        });
        self.report(result, format!("+{}", step));
    }

    pub fn decrement_selection(&mut self) {
        let (sel, step) = (self.active_selection(), self.settings.step);
        let result = self.apply(|editor| {
            editor.decrement(sel, step);
            Ok(())
        });
        self.report(result, format!("-{}", step));
    }

    pub fn clear_selection_values(&mut self) {
        let sel = self.active_selection();
        let result = self.apply(|editor| {
            editor.clear(sel);
            Ok(())
        });
        self.report(result, format!("Cleared {} cells", sel.rows() * sel.cols()));
    }

    pub fn interpolate_selection(&mut self) {
        let sel = self.active_selection();
        let result = self.apply(|editor| editor.interpolate(sel));
        self.report(result, format!("Interpolated {}x{} cells", sel.rows(), sel.cols()));
    }

    pub fn filter_grid(&mut self) {
        let sigma = self.settings.sigma;
        let result = self.apply(|editor| {
            editor.filter(sigma);
            Ok(())
        });
        self.report(result, format!("Filtered (sigma {:.2})", sigma));
    }

    // Direct cell editing

    /// Switches to editing the cursor cell, starting from its shown text.
    pub fn start_editing(&mut self) {
        self.mode = AppMode::Editing;
        self.input = self.display(self.selected_row, self.selected_col).text;
        self.cursor_position = self.input.len();
    }

    /// Writes the typed text into the cursor cell and moves down one row.
    ///
    /// Text that is not a number is stored as 0.
    pub fn finish_editing(&mut self) {
        let value = parse_edit(&self.input);
        let (row, col) = (self.selected_row, self.selected_col);
        let result = self.apply(|editor| {
            editor.set(Selection::cell(row, col), value);
            Ok(())
        });
        self.report(result, format!("Cell ({}, {}) = {:.2}", row, col, value));

        if self.selected_row < GRID_SIZE - 1 {
            self.selected_row += 1;
        }

        self.mode = AppMode::Table;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Table;
        self.input.clear();
        self.cursor_position = 0;
    }

    // Value prompt

    pub fn start_prompt(&mut self) {
        self.mode = AppMode::Prompt;
        self.input = "0.00".to_string();
        self.cursor_position = self.input.len();
        self.status_message = None;
    }

    /// Applies the prompt value to the active selection.
    ///
    /// The value is clamped to the prompt bounds and rounded to the prompt
    /// precision. Text that is not a number keeps the prompt open.
    pub fn finish_prompt(&mut self) {
        let Ok(raw) = self.input.trim().parse::<f64>() else {
            self.status_message = Some(format!("Not a number: {}", self.input));
            return;
        };

        let settings = &self.settings;
        let scale = 10f64.powi(settings.prompt_decimals as i32);
        let value = (raw.max(settings.prompt_min).min(settings.prompt_max) * scale).round() / scale;

        self.mode = AppMode::Table;
        self.input.clear();
        self.cursor_position = 0;
        self.set_selection_value(value);
    }

    pub fn cancel_prompt(&mut self) {
        self.cancel_editing();
    }

    // Context menu

    pub fn open_context_menu(&mut self) {
        self.mode = AppMode::ContextMenu;
        self.context_index = 0;
    }

    pub fn context_next(&mut self) {
        self.context_index = (self.context_index + 1) % ContextAction::ALL.len();
    }

    pub fn context_previous(&mut self) {
        self.context_index = (self.context_index + ContextAction::ALL.len() - 1) % ContextAction::ALL.len();
    }

    pub fn run_context_action(&mut self, action: ContextAction) {
        info!(action = action.label(), "context action");
        self.mode = AppMode::Table;
        match action {
            ContextAction::Edit => self.start_prompt(),
            ContextAction::Clear => self.clear_selection_values(),
            ContextAction::Interpolate => self.interpolate_selection(),
            ContextAction::Filter => self.filter_grid(),
        }
    }
}
