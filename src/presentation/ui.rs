use crate::application::{App, AppMode};
use crate::domain::comment_spans;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &mut App) {
    let area = f.area();
    app.update_geometry(area.width, area.height);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_sheet_bar(f, app, chunks[1]);
    render_rows(f, app, chunks[2]);
    render_status_bar(f, app, chunks[3]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!(
        "varcalc - Variable Calculator | Sheet: {} | Row: {}",
        app.sheet().name,
        app.selected_row + 1
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_sheet_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for (index, sheet) in app.workbook.sheets.iter().enumerate() {
        let style = if index == app.active_sheet {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        };
        spans.push(Span::styled(format!(" {} ", sheet.name), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("[+]", Style::default().fg(Color::DarkGray)));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_rows(f: &mut Frame, app: &mut App, area: Rect) {
    let visible_rows = area.height.saturating_sub(2) as usize;
    app.update_viewport_size(visible_rows);
    app.ensure_cursor_visible();

    let sheet = app.sheet();
    let mut items = Vec::new();

    for (index, row) in sheet
        .rows
        .iter()
        .enumerate()
        .skip(app.scroll_row)
        .take(visible_rows)
    {
        let number_style = if index == app.selected_row {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        };

        let mut spans = vec![
            Span::styled(format!("{:>3} ", index + 1), number_style),
            Span::raw(" "),
        ];
        spans.extend(row_text_spans(&row.text));
        spans.push(Span::styled(
            format!("  = {}", row.result.display()),
            result_style(row),
        ));

        let mut item = ListItem::new(Line::from(spans));
        if index == app.selected_row {
            item = item.style(Style::default().bg(Color::DarkGray));
        }
        items.push(item);
    }

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(app.sheet().name.clone()),
    );
    f.render_widget(list, area);
}

/// Splits a row's text so quoted comment segments render in green, the
/// same spans the evaluator strips before computing.
fn row_text_spans(text: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for (start, end) in comment_spans(text) {
        if start > cursor {
            spans.push(Span::raw(&text[cursor..start]));
        }
        spans.push(Span::styled(
            &text[start..end],
            Style::default().fg(Color::Green),
        ));
        cursor = end;
    }
    if cursor < text.len() {
        spans.push(Span::raw(&text[cursor..]));
    }

    spans
}

fn result_style(row: &crate::domain::Row) -> Style {
    match row.result {
        crate::domain::RowResult::Error => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Blue),
    }
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "Enter: edit | o: new row | d: delete row | Tab: next sheet | +: new sheet | x: delete sheet | r: rename | y: copy result | Ctrl+E/Ctrl+L: CSV | F1/?: help | q: quit".to_string()
            }
        }
        AppMode::Editing => format!("Editing: {} (Enter to save, Esc to cancel)", app.input),
        AppMode::RenameSheet => format!(
            "Rename sheet: {} (Enter to apply, Esc to cancel)",
            app.rename_input
        ),
        AppMode::Help => {
            "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string()
        }
        AppMode::ExportCsv => format!(
            "Export CSV as: {} (Enter to export, Esc to cancel)",
            app.filename_input
        ),
        AppMode::ImportCsv => format!(
            "Import CSV from: {} (Enter to import, Esc to cancel)",
            app.filename_input
        ),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::RenameSheet => Style::default().fg(Color::Yellow),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::ExportCsv => Style::default().fg(Color::Magenta),
            AppMode::ImportCsv => Style::default().fg(Color::Green),
        });
    f.render_widget(input, area);
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
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "varcalc Help (Line {}/{})",
                    start_line + 1,
                    help_lines.len()
                ))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> String {
    r#"VARCALC ROW LANGUAGE REFERENCE

=== BASIC CONCEPTS ===
• Each row is an assignment or a query expression
• Assignment: name = expression        x = 2 + 3
• Query: expression, optionally ending in ?    x * 2?
• Variables are visible to rows BELOW their assignment only
• The whole sheet recomputes top-to-bottom on every edit

=== EXPRESSIONS ===
+ - * /         Four arithmetic operators, usual precedence
( )             Parentheses override precedence
42, 3.14        Integer and decimal numbers
rate, 总价      Bare-word variable names (Unicode letters work)

=== COMMENTS ===
"like this"     Double-quoted text is a comment: shown in green,
                never evaluated.    2+2 "sanity check" → 4

=== RESULTS ===
?               Row is empty, nothing to compute
x → 5           Assignment bound x to 5
10              Query result
#ERROR          Unknown variable, bad syntax, or division by zero.
                Later rows still compute.

=== ROWS ===
Enter/F2        Edit the selected row
o               Insert a row below and edit it
a               Append a row at the end and edit it
d / Delete      Delete the selected row (last row becomes empty)
While editing:  Enter saves, Esc cancels, Backspace on an empty
                row deletes it and moves up, Ctrl+V pastes

=== SHEETS ===
Tab / Shift+Tab Switch sheet
+               New sheet
x               Delete sheet (the last one never deletes)
r               Rename sheet (empty name keeps the old one)
Each sheet has its own variables.

=== CLIPBOARD & CSV ===
y               Copy the selected row's result
                (for x → 5, copies just the 5)
Ctrl+E          Export the active sheet to CSV (text, result)
Ctrl+L          Import row texts from the first CSV column

=== PERSISTENCE ===
State is saved to state.json when you quit and restored at
startup. A missing or unreadable file starts a fresh workbook.

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#
        .to_string()
}
