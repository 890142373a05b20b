//! Summary image layout and rendering.
//!
//! The summary is a fixed 1400×800 PNG listing the total number of stored
//! countries and the five with the highest estimated GDP. Rendering is
//! best effort: the refresh pipeline records a [`RenderError`] but never
//! fails because of one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use countries_types::Country;
use image::Rgba;

use crate::canvas::{Canvas, text_width};
use crate::query::gdp_descending;

/// Canvas width in pixels.
pub const WIDTH: u32 = 1400;

/// Canvas height in pixels.
pub const HEIGHT: u32 = 800;

/// How many countries the summary lists.
pub const TOP_N: usize = 5;

const BACKGROUND: Rgba<u8> = Rgba([30, 41, 59, 255]);
const BORDER: Rgba<u8> = Rgba([51, 65, 85, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const LIGHT_GRAY: Rgba<u8> = Rgba([203, 213, 225, 255]);
const GREEN: Rgba<u8> = Rgba([74, 222, 128, 255]);
const GRAY: Rgba<u8> = Rgba([148, 163, 184, 255]);

const FRAME_INSET: u32 = 40;
const FRAME_THICKNESS: u32 = 2;
const TITLE_Y: u32 = 110;
const TOTAL_Y: u32 = 190;
const HEADER_Y: u32 = 270;
const FIRST_ROW_Y: u32 = 340;
const ROW_SPACING: u32 = 60;
const NAME_X: u32 = 150;
const GDP_X: u32 = WIDTH - 400;
const FOOTER_Y: u32 = HEIGHT - 90;

/// Errors that can occur while rendering the summary image.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The cache directory could not be created.
    #[error("failed to create cache directory {}: {source}", .path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The PNG could not be encoded or written.
    #[error("failed to write summary image {}: {source}", .path.display())]
    Write {
        /// Target file.
        path: PathBuf,
        /// The underlying image error.
        source: image::ImageError,
    },

    /// The blocking render task panicked or was cancelled.
    #[error("render task failed: {0}")]
    Task(String),
}

/// One ranked line of the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    /// `"1. Nigeria"`.
    pub label: String,
    /// `"$1234.57"`.
    pub value: String,
}

/// Every string painted on the summary, in drawing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLayout {
    /// Heading.
    pub title: String,
    /// `"Total Countries in DB: N"`.
    pub total_line: String,
    /// Heading of the ranked list.
    pub header: String,
    /// Up to [`TOP_N`] ranked countries.
    pub rows: Vec<SummaryRow>,
    /// `"Last Refreshed: <timestamp>"`.
    pub footer: String,
}

impl SummaryLayout {
    /// Lay out the summary for `countries` refreshed at `refreshed_at`.
    pub fn build(countries: &[Country], refreshed_at: &str) -> Self {
        let rows = (1_usize..)
            .zip(top_by_gdp(countries, TOP_N))
            .map(|(rank, country)| SummaryRow {
                label: format!("{rank}. {}", country.name),
                value: format_usd(country.estimated_gdp),
            })
            .collect();

        Self {
            title: String::from("Countries API Summary"),
            total_line: format!("Total Countries in DB: {}", countries.len()),
            header: String::from("Top 5 Countries by Estimated GDP (USD):"),
            rows,
            footer: format!("Last Refreshed: {refreshed_at}"),
        }
    }

    /// Paint the layout onto a fresh canvas.
    pub fn paint(&self) -> Canvas {
        let mut canvas = Canvas::new(WIDTH, HEIGHT, BACKGROUND);

        canvas.stroke_rect(
            FRAME_INSET,
            FRAME_INSET,
            WIDTH - FRAME_INSET,
            HEIGHT - FRAME_INSET,
            BORDER,
            FRAME_THICKNESS,
        );

        draw_centered(&mut canvas, &self.title, TITLE_Y, WHITE);
        draw_centered(&mut canvas, &self.total_line, TOTAL_Y, LIGHT_GRAY);
        draw_centered(&mut canvas, &self.header, HEADER_Y, WHITE);

        let mut y = FIRST_ROW_Y;
        for row in &self.rows {
            canvas.draw_text(&row.label, NAME_X, y, LIGHT_GRAY);
            canvas.draw_text(&row.value, GDP_X, y, GREEN);
            y = y.saturating_add(ROW_SPACING);
        }

        draw_centered(&mut canvas, &self.footer, FOOTER_Y, GRAY);

        canvas
    }
}

/// Countries with a positive estimated GDP, highest first, at most `limit`.
pub fn top_by_gdp(countries: &[Country], limit: usize) -> Vec<&Country> {
    let mut ranked: Vec<&Country> = countries.iter().filter(|c| c.estimated_gdp > 0.0).collect();
    ranked.sort_by(|a, b| gdp_descending(a, b));
    ranked.truncate(limit);
    ranked
}

/// Format a USD amount with two decimals, e.g. `$1234.57`.
pub fn format_usd(amount: f64) -> String {
    format!("${amount:.2}")
}

fn draw_centered(canvas: &mut Canvas, text: &str, y: u32, color: Rgba<u8>) {
    let x = canvas.width().saturating_sub(text_width(text)) / 2;
    canvas.draw_text(text, x, y, color);
}

/// Writes the summary PNG to a fixed cache path.
#[derive(Debug, Clone)]
pub struct SummaryRenderer {
    path: PathBuf,
}

impl SummaryRenderer {
    /// Create a renderer that writes to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the PNG is written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Paint the summary and write it, replacing any previous image.
    ///
    /// Creates the parent directory when missing. Blocking; run it off the
    /// async executor.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::CreateDir`] or [`RenderError::Write`].
    pub fn render(&self, countries: &[Country], refreshed_at: &str) -> Result<PathBuf, RenderError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| RenderError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let layout = SummaryLayout::build(countries, refreshed_at);
        layout
            .paint()
            .save_png(&self.path)
            .map_err(|source| RenderError::Write {
                path: self.path.clone(),
                source,
            })?;

        tracing::info!(
            path = %self.path.display(),
            listed = layout.rows.len(),
            "Summary image written"
        );

        Ok(self.path.clone())
    }

    /// Read the last rendered PNG, or `None` if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns any I/O error other than the file being absent.
    pub async fn load(&self) -> std::io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
