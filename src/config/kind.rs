use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::model::CellDef;
use crate::foundation::error::{GridError, GridResult};

/// Cell type tag as written in the configuration file.
///
/// Unknown tags fail JSON parsing, so an unrecognised `CellType` never reaches preparation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellTag {
    /// Wall clock, `HH:MM`.
    Time,
    /// Abbreviated weekday.
    Day,
    /// Day of month and abbreviated month.
    Datemonth,
    /// Weekday, day of month and month.
    Daydate,
    /// Literal text.
    Text,
    /// Host name of the machine.
    Hostname,
    /// Image file on the local filesystem.
    Localimage,
    /// Image fetched over HTTP(S).
    Urlimage,
    /// Rotating list of local image files.
    Carousel,
    /// TCP reachability indicator.
    Isalive,
}

impl fmt::Display for CellTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Time => "time",
            Self::Day => "day",
            Self::Datemonth => "datemonth",
            Self::Daydate => "daydate",
            Self::Text => "text",
            Self::Hostname => "hostname",
            Self::Localimage => "localimage",
            Self::Urlimage => "urlimage",
            Self::Carousel => "carousel",
            Self::Isalive => "isalive",
        };
        f.write_str(s)
    }
}

/// How a source image is mapped onto a cell rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scaling {
    /// Preserve aspect ratio and cover the whole cell, cropping the excess around the center.
    Fill,
    /// Preserve aspect ratio and fit inside the cell, leaving centered borders.
    Fit,
    /// Stretch each axis independently to the exact cell size.
    #[default]
    Resize,
}

/// Clock-family display patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockFormat {
    /// `09:41`
    Time,
    /// `Tue`
    Day,
    /// `5 Mar`
    DateMonth,
    /// `Tue 5 Mar`
    DayDate,
}

impl ClockFormat {
    /// `chrono` strftime pattern for this format.
    pub fn pattern(self) -> &'static str {
        match self {
            Self::Time => "%H:%M",
            Self::Day => "%a",
            Self::DateMonth => "%-d %b",
            Self::DayDate => "%a %-d %b",
        }
    }
}

/// A validated cell declaration: one variant per cell type, carrying only its own fields.
#[derive(Clone, Debug, PartialEq)]
pub enum CellKind {
    /// Time/date text refreshed from the local clock.
    Clock(ClockFormat),
    /// Fixed text.
    Text {
        /// Text to draw.
        text: String,
    },
    /// The machine's host name, looked up once when the page is prepared.
    Hostname,
    /// Image file on disk.
    LocalImage {
        /// Resolved file path.
        path: PathBuf,
        /// Scaling policy.
        scaling: Scaling,
    },
    /// Image downloaded on every tick.
    UrlImage {
        /// Absolute URL.
        url: String,
        /// Scaling policy.
        scaling: Scaling,
    },
    /// Image files shown one per tick, in order, wrapping around.
    Carousel {
        /// Resolved file paths (non-empty).
        paths: Vec<PathBuf>,
        /// Scaling policy.
        scaling: Scaling,
    },
    /// Green/red indicator for a TCP `host:port`.
    IsAlive {
        /// Probe target.
        addr: String,
        /// Label drawn over the indicator.
        label: String,
    },
}

impl CellKind {
    /// Validate a raw declaration and bind it to its variant.
    ///
    /// Relative image paths are resolved against `base_dir`.
    pub fn from_def(def: &CellDef, base_dir: &Path) -> GridResult<Self> {
        let tag = def.cell_type;
        let kind = match tag {
            CellTag::Time => Self::Clock(ClockFormat::Time),
            CellTag::Day => Self::Clock(ClockFormat::Day),
            CellTag::Datemonth => Self::Clock(ClockFormat::DateMonth),
            CellTag::Daydate => Self::Clock(ClockFormat::DayDate),
            CellTag::Text => Self::Text {
                text: required(def.text.as_deref(), tag, "Text")?.to_string(),
            },
            CellTag::Hostname => Self::Hostname,
            CellTag::Localimage => Self::LocalImage {
                path: resolve(base_dir, required(def.source.as_deref(), tag, "Source")?),
                scaling: def.scaling.unwrap_or_default(),
            },
            CellTag::Urlimage => Self::UrlImage {
                url: required(def.source.as_deref(), tag, "Source")?.to_string(),
                scaling: def.scaling.unwrap_or_default(),
            },
            CellTag::Carousel => {
                if def.sources.is_empty() {
                    return Err(GridError::config("'carousel' cells need a non-empty Sources list"));
                }
                Self::Carousel {
                    paths: def.sources.iter().map(|s| resolve(base_dir, s)).collect(),
                    scaling: def.scaling.unwrap_or_default(),
                }
            }
            CellTag::Isalive => {
                if def.refresh_secs == 0 {
                    return Err(GridError::config(
                        "'isalive' cells need a non-zero RefreshSecs (it is also the probe timeout)",
                    ));
                }
                let addr = required(def.source.as_deref(), tag, "Source")?.to_string();
                let label = def
                    .text
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .unwrap_or(&addr)
                    .to_string();
                Self::IsAlive { addr, label }
            }
        };
        Ok(kind)
    }

    /// Return `true` when rendering this cell draws glyphs.
    pub fn needs_font(&self) -> bool {
        match self {
            Self::Clock(_) | Self::Text { .. } | Self::Hostname | Self::IsAlive { .. } => true,
            Self::LocalImage { .. } | Self::UrlImage { .. } | Self::Carousel { .. } => false,
        }
    }

    /// Default font size in points for text-bearing variants.
    pub fn default_font_pts(&self) -> Option<f32> {
        match self {
            Self::Clock(ClockFormat::Time) => Some(128.0),
            Self::Clock(_) => Some(80.0),
            Self::Text { .. } | Self::Hostname | Self::IsAlive { .. } => Some(48.0),
            Self::LocalImage { .. } | Self::UrlImage { .. } | Self::Carousel { .. } => None,
        }
    }
}

fn required<'a>(value: Option<&'a str>, tag: CellTag, field: &str) -> GridResult<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(GridError::config(format!("'{tag}' cells need a {field}"))),
    }
}

fn resolve(base_dir: &Path, source: &str) -> PathBuf {
    let p = Path::new(source);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/kind.rs"]
mod tests;
