//! CSV-file-backed sheets.
//!
//! A workbook is a directory and each `<title>.csv` inside it is a sheet. The
//! file is loaded into a [`MemorySheet`] whose bounds are at least a
//! configured floor, so there is room to append rows the way a fresh remote
//! sheet would have. Every applied write batch or row deletion is saved back
//! to disk before the call returns.

use super::memory::MemorySheet;
use super::{CellRange, CellStore, RowHandle, SheetBounds, Workbook};
use crate::error::{Result, SheetrowError};
use sheetrow_engine::engine::Cell;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

const CSV_EXTENSION: &str = "csv";

/// One CSV file exposed as a cell store.
#[derive(Clone, Debug)]
pub struct CsvSheet {
    path: PathBuf,
    sheet: MemorySheet,
}

impl CsvSheet {
    /// Load `path`. The sheet is at least `floor` in size, larger if the file is.
    pub fn open(path: &Path, floor: SheetBounds) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let rows = parse_csv(&content)?;

        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let loaded = MemorySheet::from_rows(&title, &rows);
        let size = loaded.current_bounds();
        let bounds = SheetBounds::new(
            size.row_count.max(floor.row_count),
            size.col_count.max(floor.col_count),
        );
        debug!(path = %path.display(), rows = rows.len(), ?bounds, "loaded csv sheet");

        Ok(CsvSheet {
            path: path.to_path_buf(),
            sheet: loaded.with_bounds(bounds),
        })
    }

    /// Write the populated grid back to the file, replacing it atomically.
    pub fn save(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(render_csv(&self.sheet.rows()).as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        debug!(path = %self.path.display(), "saved csv sheet");
        Ok(())
    }
}

impl CellStore for CsvSheet {
    fn title(&self) -> &str {
        self.sheet.title()
    }

    fn bounds(&self) -> Result<SheetBounds> {
        self.sheet.bounds()
    }

    fn fetch_cells(&self, range: &CellRange) -> Result<Vec<Cell>> {
        self.sheet.fetch_cells(range)
    }

    fn fetch_row_handles(&self, offset: usize, limit: usize) -> Result<Vec<RowHandle>> {
        self.sheet.fetch_row_handles(offset, limit)
    }

    fn delete_row(&mut self, handle: RowHandle) -> Result<()> {
        self.sheet.delete_row(handle)?;
        self.save()
    }

    fn bulk_write(&mut self, cells: &[Cell]) -> Result<()> {
        self.sheet.bulk_write(cells)?;
        self.save()
    }
}

/// A directory of CSV sheets.
#[derive(Clone, Debug)]
pub struct CsvWorkbook {
    dir: PathBuf,
    floor: SheetBounds,
}

impl CsvWorkbook {
    pub fn open(dir: &Path, floor: SheetBounds) -> Result<Self> {
        if !dir.is_dir() {
            return Err(SheetrowError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("workbook directory not found: {}", dir.display()),
            )));
        }
        Ok(CsvWorkbook {
            dir: dir.to_path_buf(),
            floor,
        })
    }
}

impl Workbook for CsvWorkbook {
    type Sheet = CsvSheet;

    fn sheet_titles(&self) -> Result<Vec<String>> {
        let mut titles = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != CSV_EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) => titles.push(stem.to_string()),
                None => warn!(path = %path.display(), "skipping sheet with a non UTF-8 name"),
            }
        }
        titles.sort();
        Ok(titles)
    }

    fn open_sheet(&self, title: &str) -> Result<Option<CsvSheet>> {
        // Only titles listed from the directory resolve, so a title can never
        // point outside it.
        if !self.sheet_titles()?.iter().any(|known| known == title) {
            return Ok(None);
        }
        let path = self.dir.join(format!("{}.{}", title, CSV_EXTENSION));
        CsvSheet::open(&path, self.floor).map(Some)
    }
}

/// Parse CSV content into rows of fields.
///
/// Quoted fields may contain commas, doubled quotes and line breaks. Unquoted
/// fields are trimmed.
pub(crate) fn parse_csv(content: &str) -> Result<Vec<Vec<String>>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut line = 1;
    let mut quote_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    current.push(c);
                }
                _ => current.push(c),
            }
            continue;
        }

        match c {
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
                field_was_quoted = true;
                quote_line = line;
            }
            ',' => fields.push(finish_field(&mut current, &mut field_was_quoted)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(finish_field(&mut current, &mut field_was_quoted));
                rows.push(std::mem::take(&mut fields));
                line += 1;
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(SheetrowError::Parse {
            line: quote_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !current.is_empty() || field_was_quoted || !fields.is_empty() {
        fields.push(finish_field(&mut current, &mut field_was_quoted));
        rows.push(fields);
    }
    Ok(rows)
}

fn finish_field(current: &mut String, quoted: &mut bool) -> String {
    let field = std::mem::take(current);
    if std::mem::take(quoted) {
        field
    } else {
        field.trim().to_string()
    }
}

/// Render rows as CSV, one line per row.
pub fn render_csv(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        let fields: Vec<String> = row.iter().map(|field| escape_csv_field(field)).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Quote a field when it would not survive parsing as-is.
fn escape_csv_field(field: &str) -> String {
    let needs_quotes = field.contains([',', '"', '\n', '\r']) || field.trim() != field;
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
