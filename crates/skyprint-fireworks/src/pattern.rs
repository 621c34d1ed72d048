//! Painted pixel patterns: the input a firework reforms into

use serde::{Deserialize, Serialize};
use skyprint_core::{Result, Rgba8, SkyprintError};
use std::collections::HashMap;
use std::path::Path;

/// One painted cell. Identity is `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelCell {
    pub x: u8,
    pub y: u8,
    pub color: Rgba8,
}

impl PixelCell {
    pub fn new(x: u8, y: u8, color: Rgba8) -> Self {
        Self { x, y, color }
    }
}

/// On-disk shape of a pattern file
#[derive(Debug, Deserialize)]
struct PatternFile {
    width: u16,
    height: u16,
    #[serde(default)]
    cells: Vec<PixelCell>,
}

/// A sparse painted image: at most one cell per coordinate, all inside the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    width: u16,
    height: u16,
    cells: Vec<PixelCell>,
}

impl Pattern {
    /// Build a pattern. A later cell at an already-painted coordinate
    /// replaces the earlier color but keeps the earlier cell's position in
    /// the list.
    pub fn new(width: u16, height: u16, cells: impl IntoIterator<Item = PixelCell>) -> Result<Self> {
        let mut slots: HashMap<(u8, u8), usize> = HashMap::new();
        let mut unique: Vec<PixelCell> = Vec::new();

        for cell in cells {
            if u16::from(cell.x) >= width || u16::from(cell.y) >= height {
                return Err(SkyprintError::InvalidPattern(format!(
                    "cell ({}, {}) lies outside the {width}x{height} grid",
                    cell.x, cell.y
                )));
            }
            match slots.get(&(cell.x, cell.y)) {
                Some(&slot) => unique[slot].color = cell.color,
                None => {
                    slots.insert((cell.x, cell.y), unique.len());
                    unique.push(cell);
                }
            }
        }

        Ok(Self {
            width,
            height,
            cells: unique,
        })
    }

    /// A pattern with no painted cells
    pub fn empty(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: Vec::new(),
        }
    }

    /// Build a pattern from text rows. Row 0 is the top of the picture, so
    /// it maps to the highest `y`. `.` and space are unpainted; every other
    /// character must appear in `palette`.
    pub fn from_ascii(rows: &[&str], palette: &[(char, Rgba8)]) -> Result<Self> {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        if width > 256 || height > 256 {
            return Err(SkyprintError::InvalidPattern(format!(
                "{width}x{height} exceeds the 256x256 grid limit"
            )));
        }

        let mut cells = Vec::new();
        for (row, line) in rows.iter().enumerate() {
            let y = (height - 1 - row) as u8;
            for (x, ch) in line.chars().enumerate() {
                if ch == '.' || ch == ' ' {
                    continue;
                }
                let color = palette
                    .iter()
                    .find(|(key, _)| *key == ch)
                    .map(|(_, color)| *color)
                    .ok_or_else(|| {
                        SkyprintError::InvalidPattern(format!("no palette entry for '{ch}'"))
                    })?;
                cells.push(PixelCell::new(x as u8, y, color));
            }
        }

        Self::new(width as u16, height as u16, cells)
    }

    /// Parse a pattern from TOML (`width`, `height`, `[[cells]]`)
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: PatternFile = toml::from_str(s)?;
        Self::new(file.width, file.height, file.cells)
    }

    /// Load a pattern file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cells(&self) -> &[PixelCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
