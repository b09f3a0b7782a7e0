//! Application state management for the terminal calculator.
//!
//! This module contains the main application state and mode management
//! for the terminal user interface. Every mutation of a row synchronously
//! recomputes the active sheet before the next event is handled.

use crate::domain::{Row, Sheet, SheetEvaluator, Workbook};

/// Represents the current mode of the application.
///
/// The application can be in different modes that determine how user input
/// is interpreted and what UI elements are displayed.
#[derive(Debug)]
pub enum AppMode {
    /// Normal navigation mode - arrow keys move selection, shortcuts available
    Normal,
    /// Row editing mode - user is typing into the selected row
    Editing,
    /// Sheet rename dialog is open
    RenameSheet,
    /// Help screen is displayed
    Help,
    /// CSV export dialog is open
    ExportCsv,
    /// CSV import dialog is open
    ImportCsv,
}

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(index, _)| index)
        .unwrap_or(s.len())
}

/// Inserts `c` at a character position. Buffers hold arbitrary text
/// (variable and sheet names are not limited to ASCII), so cursor
/// positions are character counts, not byte offsets.
pub fn insert_at_char(s: &mut String, char_pos: usize, c: char) {
    let at = byte_index(s, char_pos);
    s.insert(at, c);
}

/// Removes the character at a character position.
pub fn remove_at_char(s: &mut String, char_pos: usize) {
    let at = byte_index(s, char_pos);
    if at < s.len() {
        s.remove(at);
    }
}

/// Main application state containing the workbook and UI state.
///
/// # Examples
///
/// ```
/// use varcalc::application::App;
///
/// let app = App::default();
/// assert_eq!(app.active_sheet, 0);
/// assert_eq!(app.selected_row, 0);
/// ```
#[derive(Debug)]
pub struct App {
    /// All sheets plus the persisted window geometry
    pub workbook: Workbook,
    /// Index of the sheet being displayed
    pub active_sheet: usize,
    /// Currently selected row (zero-based)
    pub selected_row: usize,
    /// Top-most row visible in the viewport
    pub scroll_row: usize,
    /// Current application mode
    pub mode: AppMode,
    /// Current input buffer (for editing mode)
    pub input: String,
    /// Cursor position within the active input buffer, in characters
    pub cursor_position: usize,
    /// Row text as it was when editing started, restored on cancel
    pub edit_backup: String,
    /// Input buffer for the sheet rename dialog
    pub rename_input: String,
    /// Input buffer for CSV filename entry
    pub filename_input: String,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Viewport height in rows (for scrolling calculations)
    pub viewport_rows: usize,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Workbook::default())
    }
}

impl App {
    /// Creates the application state around a (possibly restored) workbook
    /// and recomputes every sheet so cached results are fresh.
    pub fn new(mut workbook: Workbook) -> Self {
        for sheet in &mut workbook.sheets {
            SheetEvaluator::recompute(sheet);
        }
        Self {
            workbook,
            active_sheet: 0,
            selected_row: 0,
            scroll_row: 0,
            mode: AppMode::Normal,
            input: String::new(),
            cursor_position: 0,
            edit_backup: String::new(),
            rename_input: String::new(),
            filename_input: String::new(),
            help_scroll: 0,
            status_message: None,
            viewport_rows: 20,
        }
    }

    pub fn sheet(&self) -> &Sheet {
        &self.workbook.sheets[self.active_sheet]
    }

    pub fn sheet_mut(&mut self) -> &mut Sheet {
        &mut self.workbook.sheets[self.active_sheet]
    }

    /// Recomputes the active sheet's results from the first row down.
    pub fn recompute_active(&mut self) {
        SheetEvaluator::recompute(self.sheet_mut());
    }

    /// Switches to editing mode for the currently selected row.
    ///
    /// Loads the row's text into the input buffer and positions the cursor
    /// at the end.
    pub fn start_editing(&mut self) {
        self.mode = AppMode::Editing;
        let text = self.sheet().rows[self.selected_row].text.clone();
        self.edit_backup = text.clone();
        self.cursor_position = char_len(&text);
        self.input = text;
        self.status_message = None;
    }

    /// Writes the edit buffer into the selected row and recomputes.
    ///
    /// Called after every buffer change so results track each keystroke.
    pub fn apply_edit(&mut self) {
        let row = self.selected_row;
        self.sheet_mut().rows[row].text = self.input.clone();
        self.recompute_active();
    }

    /// Leaves editing mode, keeping the edited text.
    pub fn finish_editing(&mut self) {
        self.apply_edit();
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Cancels editing, restoring the text the row had when editing began.
    pub fn cancel_editing(&mut self) {
        let row = self.selected_row;
        let backup = self.edit_backup.clone();
        self.sheet_mut().rows[row].text = backup;
        self.recompute_active();
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Appends a row at the end of the active sheet and starts editing it.
    pub fn add_row_at_end(&mut self) {
        let index = self.sheet_mut().push_row();
        self.selected_row = index;
        self.recompute_active();
        self.ensure_cursor_visible();
        self.start_editing();
    }

    /// Inserts a row below the selected one and starts editing it.
    pub fn insert_row_below(&mut self) {
        let index = {
            let selected = self.selected_row;
            self.sheet_mut().insert_row_after(selected)
        };
        self.selected_row = index;
        self.recompute_active();
        self.ensure_cursor_visible();
        self.start_editing();
    }

    /// Deletes the selected row. The sheet keeps at least one (empty) row;
    /// the selection clamps to the remaining rows.
    pub fn delete_selected_row(&mut self) {
        let selected = self.selected_row;
        self.sheet_mut().delete_row(selected);
        let last = self.sheet().rows.len() - 1;
        if self.selected_row > last {
            self.selected_row = last;
        }
        self.recompute_active();
        self.ensure_cursor_visible();
    }

    /// Backspace on an already-empty row deletes the row and moves editing
    /// to the previous one.
    pub fn delete_empty_row_and_edit_previous(&mut self) {
        let selected = self.selected_row;
        self.sheet_mut().delete_row(selected);
        self.selected_row = selected.saturating_sub(1).min(self.sheet().rows.len() - 1);
        self.recompute_active();
        self.ensure_cursor_visible();
        self.start_editing();
    }

    /// Adds a new sheet after the existing ones and switches to it.
    pub fn add_sheet(&mut self) {
        self.active_sheet = self.workbook.add_sheet();
        self.selected_row = 0;
        self.scroll_row = 0;
        self.status_message = None;
    }

    /// Deletes the active sheet. Deleting the only sheet is a no-op.
    pub fn delete_active_sheet(&mut self) {
        if !self.workbook.delete_sheet(self.active_sheet) {
            self.status_message = Some("Cannot delete the last sheet".to_string());
            return;
        }
        if self.active_sheet >= self.workbook.sheets.len() {
            self.active_sheet = self.workbook.sheets.len() - 1;
        }
        self.selected_row = 0;
        self.scroll_row = 0;
    }

    pub fn next_sheet(&mut self) {
        self.active_sheet = (self.active_sheet + 1) % self.workbook.sheets.len();
        self.selected_row = 0;
        self.scroll_row = 0;
    }

    pub fn previous_sheet(&mut self) {
        let count = self.workbook.sheets.len();
        self.active_sheet = (self.active_sheet + count - 1) % count;
        self.selected_row = 0;
        self.scroll_row = 0;
    }

    /// Opens the rename dialog pre-filled with the active sheet's name.
    pub fn start_rename_sheet(&mut self) {
        self.mode = AppMode::RenameSheet;
        self.rename_input = self.sheet().name.clone();
        self.cursor_position = char_len(&self.rename_input);
        self.status_message = None;
    }

    /// Applies the rename. An empty name keeps the old one.
    pub fn finish_rename_sheet(&mut self) {
        let new_name = self.rename_input.trim().to_string();
        if !new_name.is_empty() {
            self.sheet_mut().name = new_name;
        }
        self.mode = AppMode::Normal;
        self.rename_input.clear();
        self.cursor_position = 0;
    }

    pub fn cancel_rename_sheet(&mut self) {
        self.mode = AppMode::Normal;
        self.rename_input.clear();
        self.cursor_position = 0;
    }

    /// The clipboard-worthy text of the selected row's result.
    pub fn selected_result_text(&self) -> String {
        self.sheet().rows[self.selected_row].result.copy_text()
    }

    /// Processes the result of a clipboard copy.
    pub fn set_copy_result(&mut self, result: Result<(), String>) {
        self.status_message = Some(match result {
            Ok(()) => "Result copied to clipboard".to_string(),
            Err(error) => format!("Copy failed: {}", error),
        });
    }

    /// Switches to CSV export mode to prompt for a filename.
    pub fn start_csv_export(&mut self) {
        self.mode = AppMode::ExportCsv;
        self.filename_input = "sheet.csv".to_string();
        self.cursor_position = char_len(&self.filename_input);
        self.status_message = None;
    }

    pub fn get_csv_export_filename(&self) -> String {
        if self.filename_input.is_empty() {
            "sheet.csv".to_string()
        } else {
            self.filename_input.clone()
        }
    }

    /// Processes the result of a CSV export operation.
    pub fn set_csv_export_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(filename) => {
                self.status_message = Some(format!("Exported to {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Export failed: {}", error));
            }
        }

        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    /// Switches to CSV import mode to prompt for a filename.
    pub fn start_csv_import(&mut self) {
        self.mode = AppMode::ImportCsv;
        self.filename_input = "data.csv".to_string();
        self.cursor_position = char_len(&self.filename_input);
        self.status_message = None;
    }

    pub fn get_csv_import_filename(&self) -> String {
        if self.filename_input.is_empty() {
            "data.csv".to_string()
        } else {
            self.filename_input.clone()
        }
    }

    /// Processes the result of a CSV import operation.
    ///
    /// On success the imported texts replace the active sheet's rows and
    /// the sheet is recomputed.
    pub fn set_csv_import_result(&mut self, result: Result<Vec<String>, String>) {
        match result {
            Ok(texts) => {
                let count = texts.len();
                let sheet = self.sheet_mut();
                sheet.rows = texts.into_iter().map(Row::new).collect();
                if sheet.rows.is_empty() {
                    sheet.rows.push(Row::default());
                }
                self.selected_row = 0;
                self.scroll_row = 0;
                self.recompute_active();
                self.status_message = Some(format!("Imported {} rows", count));
            }
            Err(error) => {
                self.status_message = Some(format!("Import failed: {}", error));
            }
        }

        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    /// Records the last observed terminal size as the persisted geometry.
    pub fn update_geometry(&mut self, width: u16, height: u16) {
        self.workbook.geometry = format!("{}x{}", width, height);
    }

    /// Updates the viewport size for proper scrolling calculations.
    pub fn update_viewport_size(&mut self, rows: usize) {
        self.viewport_rows = rows.max(1);
    }

    /// Ensures the selected row is visible by adjusting scroll position.
    pub fn ensure_cursor_visible(&mut self) {
        if self.selected_row < self.scroll_row {
            self.scroll_row = self.selected_row;
        } else if self.selected_row >= self.scroll_row + self.viewport_rows {
            self.scroll_row = self.selected_row - (self.viewport_rows - 1);
        }
    }
}
