//! CSV export and import for calculator sheets.
//!
//! Export writes two columns per row: the raw row text and the rendered
//! result. Import reads the first column of each record back as row texts;
//! results are recomputed by the caller, never trusted from the file.

use super::models::Sheet;

pub struct CsvExporter;

impl CsvExporter {
    /// Writes `sheet` to `filename` as `text,result` records.
    pub fn export_to_csv(sheet: &Sheet, filename: &str) -> Result<String, String> {
        let mut writer = csv::Writer::from_path(filename).map_err(|e| e.to_string())?;

        for row in &sheet.rows {
            writer
                .write_record([row.text.as_str(), row.result.display().as_str()])
                .map_err(|e| e.to_string())?;
        }

        writer.flush().map_err(|e| e.to_string())?;
        Ok(filename.to_string())
    }

    /// Reads the first column of `filename` as an ordered list of row texts.
    pub fn import_from_csv(filename: &str) -> Result<Vec<String>, String> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(filename)
            .map_err(|e| e.to_string())?;

        let mut texts = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| e.to_string())?;
            texts.push(record.get(0).unwrap_or("").to_string());
        }

        Ok(texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SheetEvaluator;

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        let path_str = path.to_str().unwrap();

        let mut sheet = Sheet::from_texts(
            "Sheet1",
            vec![
                "x = 2 + 3".to_string(),
                "x * 2?".to_string(),
                "with, comma \"note\"".to_string(),
            ],
        );
        SheetEvaluator::recompute(&mut sheet);

        CsvExporter::export_to_csv(&sheet, path_str).unwrap();
        let texts = CsvExporter::import_from_csv(path_str).unwrap();

        assert_eq!(texts, sheet.row_texts());
    }

    #[test]
    fn test_import_missing_file_fails() {
        assert!(CsvExporter::import_from_csv("/nonexistent/nope.csv").is_err());
    }
}
