use crate::application::{char_len, insert_at_char, remove_at_char, App, AppMode};
use crate::domain::CsvExporter;
use crate::infrastructure::SystemClipboard;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key, modifiers),
            AppMode::RenameSheet => Self::handle_rename_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::ExportCsv => Self::handle_filename_input_mode(app, key, "csv_export"),
            AppMode::ImportCsv => Self::handle_filename_input_mode(app, key, "csv_import"),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('e') => {
                    app.start_csv_export();
                    return;
                }
                KeyCode::Char('i') | KeyCode::Char('l') => {
                    app.start_csv_import();
                    return;
                }
                _ => {}
            }
        }

        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                if app.selected_row > 0 {
                    app.selected_row -= 1;
                    app.ensure_cursor_visible();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.selected_row < app.sheet().rows.len() - 1 {
                    app.selected_row += 1;
                    app.ensure_cursor_visible();
                }
            }
            KeyCode::Enter | KeyCode::F(2) => {
                app.start_editing();
            }
            KeyCode::Char('o') => {
                app.insert_row_below();
            }
            KeyCode::Char('a') => {
                app.add_row_at_end();
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                app.delete_selected_row();
            }
            KeyCode::Tab => {
                app.next_sheet();
            }
            KeyCode::BackTab => {
                app.previous_sheet();
            }
            KeyCode::Char('+') => {
                app.add_sheet();
            }
            KeyCode::Char('x') => {
                app.delete_active_sheet();
            }
            KeyCode::Char('r') => {
                app.start_rename_sheet();
            }
            KeyCode::Char('y') => {
                let result = SystemClipboard::copy(&app.selected_result_text());
                app.set_copy_result(result);
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('v') = key {
                match SystemClipboard::paste() {
                    Ok(text) => {
                        for c in text.chars() {
                            insert_at_char(&mut app.input, app.cursor_position, c);
                            app.cursor_position += 1;
                        }
                        app.apply_edit();
                    }
                    Err(error) => {
                        app.status_message = Some(format!("Paste failed: {}", error));
                    }
                }
                return;
            }
        }

        match key {
            KeyCode::Enter => {
                app.finish_editing();
            }
            KeyCode::Esc => {
                app.cancel_editing();
            }
            KeyCode::Backspace => {
                if app.input.is_empty() {
                    // An already-empty row: delete it and step up
                    app.delete_empty_row_and_edit_previous();
                } else if app.cursor_position > 0 {
                    remove_at_char(&mut app.input, app.cursor_position - 1);
                    app.cursor_position -= 1;
                    app.apply_edit();
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < char_len(&app.input) {
                    remove_at_char(&mut app.input, app.cursor_position);
                    app.apply_edit();
                }
            }
            KeyCode::Left => {
                if app.cursor_position > 0 {
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Right => {
                if app.cursor_position < char_len(&app.input) {
                    app.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = char_len(&app.input);
            }
            KeyCode::Char(c) => {
                insert_at_char(&mut app.input, app.cursor_position, c);
                app.cursor_position += 1;
                app.apply_edit();
            }
            _ => {}
        }
    }

    fn handle_rename_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                app.finish_rename_sheet();
            }
            KeyCode::Esc => {
                app.cancel_rename_sheet();
            }
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    remove_at_char(&mut app.rename_input, app.cursor_position - 1);
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < char_len(&app.rename_input) {
                    remove_at_char(&mut app.rename_input, app.cursor_position);
                }
            }
            KeyCode::Left => {
                if app.cursor_position > 0 {
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Right => {
                if app.cursor_position < char_len(&app.rename_input) {
                    app.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = char_len(&app.rename_input);
            }
            KeyCode::Char(c) => {
                insert_at_char(&mut app.rename_input, app.cursor_position, c);
                app.cursor_position += 1;
            }
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
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

    fn handle_filename_input_mode(app: &mut App, key: KeyCode, mode: &str) {
        match key {
            KeyCode::Enter => {
                match mode {
                    "csv_export" => {
                        let filename = app.get_csv_export_filename();
                        let result = CsvExporter::export_to_csv(app.sheet(), &filename);
                        app.set_csv_export_result(result);
                    }
                    "csv_import" => {
                        let filename = app.get_csv_import_filename();
                        let result = CsvExporter::import_from_csv(&filename);
                        app.set_csv_import_result(result);
                    }
                    _ => {}
                }
            }
            KeyCode::Esc => {
                app.cancel_filename_input();
            }
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    remove_at_char(&mut app.filename_input, app.cursor_position - 1);
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < char_len(&app.filename_input) {
                    remove_at_char(&mut app.filename_input, app.cursor_position);
                }
            }
            KeyCode::Left => {
                if app.cursor_position > 0 {
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Right => {
                if app.cursor_position < char_len(&app.filename_input) {
                    app.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = char_len(&app.filename_input);
            }
            KeyCode::Char(c) => {
                insert_at_char(&mut app.filename_input, app.cursor_position, c);
                app.cursor_position += 1;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{App, AppMode};
    use crate::domain::RowResult;

    #[test]
    fn test_csv_export_key_binding() {
        let mut app = App::default();

        assert!(matches!(app.mode, AppMode::Normal));

        InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);

        assert!(matches!(app.mode, AppMode::ExportCsv));
        assert_eq!(app.filename_input, "sheet.csv");
    }

    #[test]
    fn test_csv_import_key_bindings() {
        let mut app = App::default();

        InputHandler::handle_key_event(&mut app, KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert!(matches!(app.mode, AppMode::ImportCsv));
        assert_eq!(app.filename_input, "data.csv");

        app.cancel_filename_input();

        InputHandler::handle_key_event(&mut app, KeyCode::Char('i'), KeyModifiers::CONTROL);
        assert!(matches!(app.mode, AppMode::ImportCsv));
    }

    #[test]
    fn test_typing_a_row_updates_its_result() {
        let mut app = App::default();

        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(matches!(app.mode, AppMode::Editing));

        for c in "x = 2 + 3".chars() {
            InputHandler::handle_key_event(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(
            app.sheet().rows[0].result,
            RowResult::Binding("x".to_string(), 5.0)
        );
    }

    #[test]
    fn test_backspace_on_empty_row_deletes_it() {
        let mut app = App::default();
        app.start_editing();
        app.input = "1 + 1".to_string();
        app.finish_editing();

        InputHandler::handle_key_event(&mut app, KeyCode::Char('o'), KeyModifiers::NONE);
        assert_eq!(app.sheet().rows.len(), 2);
        assert!(matches!(app.mode, AppMode::Editing));

        InputHandler::handle_key_event(&mut app, KeyCode::Backspace, KeyModifiers::NONE);

        assert_eq!(app.sheet().rows.len(), 1);
        assert_eq!(app.selected_row, 0);
        assert_eq!(app.input, "1 + 1");
    }

    #[test]
    fn test_tab_switches_sheets() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('+'), KeyModifiers::NONE);
        assert_eq!(app.active_sheet, 1);

        InputHandler::handle_key_event(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.active_sheet, 0);

        InputHandler::handle_key_event(&mut app, KeyCode::BackTab, KeyModifiers::NONE);
        assert_eq!(app.active_sheet, 1);
    }

    #[test]
    fn test_rename_sheet_key_flow() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('r'), KeyModifiers::NONE);
        assert!(matches!(app.mode, AppMode::RenameSheet));

        // Wipe the pre-filled name and type a new one
        for _ in 0.."Sheet1".len() {
            InputHandler::handle_key_event(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        }
        for c in "Budget".chars() {
            InputHandler::handle_key_event(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(app.sheet().name, "Budget");
        assert!(matches!(app.mode, AppMode::Normal));
    }

    #[test]
    fn test_delete_last_sheet_is_noop() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('x'), KeyModifiers::NONE);

        assert_eq!(app.workbook.sheets.len(), 1);
    }
}
