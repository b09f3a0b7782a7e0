use crate::domain::{Workbook, WorkbookState};
use std::fs;

/// Fixed snapshot path in the working directory.
pub const STATE_FILE: &str = "state.json";

pub struct StateRepository;

impl StateRepository {
    pub fn save_workbook(workbook: &Workbook, filename: &str) -> Result<String, String> {
        match serde_json::to_string_pretty(&workbook.to_state()) {
            Ok(json) => match fs::write(filename, &json) {
                Ok(_) => Ok(filename.to_string()),
                Err(e) => Err(e.to_string()),
            },
            Err(e) => Err(format!("Serialization failed: {}", e)),
        }
    }

    pub fn load_workbook(filename: &str) -> Result<Workbook, String> {
        match fs::read_to_string(filename) {
            Ok(content) => match serde_json::from_str::<WorkbookState>(&content) {
                Ok(state) => Ok(Workbook::from_state(state)),
                Err(e) => Err(format!("Invalid file format - {}", e)),
            },
            Err(e) => Err(e.to_string()),
        }
    }

    /// Startup restore: a missing or unreadable snapshot silently falls
    /// back to a fresh default workbook.
    pub fn load_or_default(filename: &str) -> Workbook {
        Self::load_workbook(filename).unwrap_or_default()
    }
}
