use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum RowResult {
    Unknown,
    Error,
    Value(f64),
    Binding(String, f64),
}

impl RowResult {
    pub fn display(&self) -> String {
        match self {
            RowResult::Unknown => "?".to_string(),
            RowResult::Error => "#ERROR".to_string(),
            RowResult::Value(value) => value.to_string(),
            RowResult::Binding(name, value) => format!("{} → {}", name, value),
        }
    }

    /// The part worth copying to the clipboard: for a binding, just the value.
    pub fn copy_text(&self) -> String {
        match self {
            RowResult::Binding(_, value) => value.to_string(),
            other => other.display(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub text: String,
    pub result: RowResult,
}

impl Row {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            result: RowResult::Unknown,
        }
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new("")
    }
}

#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: vec![Row::default()],
        }
    }

    pub fn from_texts(name: impl Into<String>, texts: Vec<String>) -> Self {
        let mut sheet = Self {
            name: name.into(),
            rows: texts.into_iter().map(Row::new).collect(),
        };
        if sheet.rows.is_empty() {
            sheet.rows.push(Row::default());
        }
        sheet
    }

    pub fn push_row(&mut self) -> usize {
        self.rows.push(Row::default());
        self.rows.len() - 1
    }

    pub fn insert_row_after(&mut self, index: usize) -> usize {
        let at = (index + 1).min(self.rows.len());
        self.rows.insert(at, Row::default());
        at
    }

    /// Removes the row at `index`. The sheet never drops to zero rows:
    /// deleting the last remaining row leaves one empty row in place.
    pub fn delete_row(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
        }
        if self.rows.is_empty() {
            self.rows.push(Row::default());
        }
    }

    pub fn row_texts(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.text.clone()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct Workbook {
    pub geometry: String,
    pub sheets: Vec<Sheet>,
}

impl Default for Workbook {
    fn default() -> Self {
        Self {
            geometry: "900x600".to_string(),
            sheets: vec![Sheet::new("Sheet1")],
        }
    }
}

impl Workbook {
    pub fn add_sheet(&mut self) -> usize {
        let name = format!("Sheet{}", self.sheets.len() + 1);
        self.sheets.push(Sheet::new(name));
        self.sheets.len() - 1
    }

    /// Removes the sheet at `index`. Deleting the only sheet is a no-op;
    /// the workbook always holds at least one sheet.
    pub fn delete_sheet(&mut self, index: usize) -> bool {
        if self.sheets.len() <= 1 || index >= self.sheets.len() {
            return false;
        }
        self.sheets.remove(index);
        true
    }

    pub fn to_state(&self) -> WorkbookState {
        WorkbookState {
            window: WindowState {
                geometry: self.geometry.clone(),
            },
            tabs: self
                .sheets
                .iter()
                .map(|sheet| SheetState {
                    title: sheet.name.clone(),
                    contents: sheet.row_texts(),
                })
                .collect(),
        }
    }

    pub fn from_state(state: WorkbookState) -> Self {
        let mut workbook = Self {
            geometry: state.window.geometry,
            sheets: state
                .tabs
                .into_iter()
                .map(|tab| Sheet::from_texts(tab.title, tab.contents))
                .collect(),
        };
        if workbook.sheets.is_empty() {
            workbook.sheets.push(Sheet::new("Sheet1"));
        }
        workbook
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowState {
    pub geometry: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetState {
    pub title: String,
    pub contents: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbookState {
    pub window: WindowState,
    pub tabs: Vec<SheetState>,
}
