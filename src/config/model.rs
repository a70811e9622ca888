use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::config::kind::{CellKind, CellTag, Scaling};
use crate::foundation::error::{GridError, GridResult};

/// JSON-facing root of a configuration file.
///
/// Keys are PascalCase (`Pages`, `Rows`, `CellType`, ...).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigDef {
    /// Pages in rotation order.
    pub pages: Vec<PageDef>,
}

/// One full grid of cells; the unit of rotation.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageDef {
    /// Display-irrelevant label, used in logs.
    #[serde(default)]
    pub name: String,
    /// Grid rows (>= 1).
    pub rows: u32,
    /// Grid columns (>= 1).
    pub cols: u32,
    /// TrueType font used by every text-bearing cell on the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_file: Option<PathBuf>,
    /// How long the page stays up when more than one page is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
    /// Cells in declaration order.
    #[serde(default)]
    pub cells: Vec<CellDef>,
}

/// Raw cell declaration as written in the configuration file.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CellDef {
    /// 1-based grid row.
    pub row: u32,
    /// 1-based grid column.
    pub col: u32,
    /// Rows covered; 0 is treated as 1.
    #[serde(default = "default_span")]
    pub rowspan: u32,
    /// Columns covered; 0 is treated as 1.
    #[serde(default = "default_span")]
    pub colspan: u32,
    /// Cell type tag.
    pub cell_type: CellTag,
    /// Seconds between renders, 0 = render once.
    #[serde(default)]
    pub refresh_secs: u64,
    /// Font size in points; defaults per cell type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_pts: Option<f32>,
    /// Literal text, or the label for `isalive`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Image path/URL, or `host:port` for `isalive`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Carousel image paths.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    /// Image scaling policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<Scaling>,
}

fn default_span() -> u32 {
    1
}

impl CellDef {
    /// Effective row span (at least 1).
    pub fn rowspan(&self) -> u32 {
        self.rowspan.max(1)
    }

    /// Effective column span (at least 1).
    pub fn colspan(&self) -> u32 {
        self.colspan.max(1)
    }
}

/// A loaded configuration plus the directory relative paths resolve against.
#[derive(Clone, Debug)]
pub struct Config {
    def: ConfigDef,
    base_dir: PathBuf,
}

impl Config {
    /// Parse a configuration from a JSON reader; relative paths resolve against `base_dir`.
    pub fn from_reader<R: std::io::Read>(r: R, base_dir: impl Into<PathBuf>) -> GridResult<Self> {
        let def: ConfigDef = serde_json::from_reader(r)
            .map_err(|e| GridError::config(format!("parse configuration JSON: {e}")))?;
        Ok(Self {
            def,
            base_dir: base_dir.into(),
        })
    }

    /// Parse a configuration file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> GridResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            GridError::config(format!("open configuration '{}': {e}", path.display()))
        })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_reader(BufReader::new(f), base_dir)
    }

    /// Build a configuration directly from its definition.
    pub fn from_def(def: ConfigDef, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            def,
            base_dir: base_dir.into(),
        }
    }

    /// Pages in rotation order.
    pub fn pages(&self) -> &[PageDef] {
        &self.def.pages
    }

    /// Directory that relative font and image paths resolve against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Check every structural invariant and pre-validate every cell of every page.
    pub fn validate(&self) -> GridResult<()> {
        let pages = &self.def.pages;
        if pages.is_empty() {
            return Err(GridError::config("configuration must contain at least one page"));
        }

        for (pi, page) in pages.iter().enumerate() {
            let label = page_label(page, pi);
            if page.rows == 0 || page.cols == 0 {
                return Err(GridError::config(format!(
                    "{label}: rows and cols must be >= 1 (got {}x{})",
                    page.rows, page.cols
                )));
            }
            if page.duration_secs == Some(0) {
                return Err(GridError::config(format!(
                    "{label}: DurationSecs must be > 0 when set"
                )));
            }

            let mut recurs = false;
            for (ci, cell) in page.cells.iter().enumerate() {
                if cell.row == 0 || cell.col == 0 {
                    return Err(GridError::config(format!(
                        "{label} cell {ci}: Row and Col are 1-based"
                    )));
                }
                let last_row = cell.row.saturating_add(cell.rowspan() - 1);
                let last_col = cell.col.saturating_add(cell.colspan() - 1);
                if last_row > page.rows || last_col > page.cols {
                    return Err(GridError::config(format!(
                        "{label} cell {ci}: spans past the {}x{} grid",
                        page.rows, page.cols
                    )));
                }

                let kind = CellKind::from_def(cell, &self.base_dir).map_err(|e| match e {
                    GridError::Config(msg) => GridError::config(format!("{label} cell {ci}: {msg}")),
                    other => other,
                })?;
                if kind.needs_font() && page.font_file.is_none() {
                    return Err(GridError::config(format!(
                        "{label} cell {ci}: '{}' cells need a FontFile on the page",
                        cell.cell_type
                    )));
                }
                recurs |= cell.refresh_secs > 0;
            }

            if pages.len() > 1 && page.duration_secs.is_none() && !recurs {
                return Err(GridError::config(format!(
                    "{label}: pages in a rotation need DurationSecs unless a cell refreshes"
                )));
            }
        }

        Ok(())
    }
}

pub(crate) fn page_label(page: &PageDef, index: usize) -> String {
    if page.name.is_empty() {
        format!("page #{index}")
    } else {
        format!("page '{}'", page.name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
