// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Column-aligned tables for `keel history` and friends.

use crate::color::Paint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Plain,
    Muted,
    /// Colored by [`Paint::status`].
    Status,
}

#[derive(Debug, Clone)]
pub struct Column {
    header: &'static str,
    align: Align,
    style: CellStyle,
}

impl Column {
    pub fn left(header: &'static str) -> Self {
        Self {
            header,
            align: Align::Left,
            style: CellStyle::Plain,
        }
    }

    pub fn right(header: &'static str) -> Self {
        Self {
            align: Align::Right,
            ..Self::left(header)
        }
    }

    pub fn styled(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }
}

const SEP: &str = "  ";

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    paint: Paint,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            paint: Paint::detect(),
        }
    }

    pub fn with_paint(mut self, paint: Paint) -> Self {
        self.paint = paint;
        self
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Render header and rows; an empty table renders as "".
    ///
    /// Widths count characters of the raw text. Color is applied after
    /// padding, and a trailing left-aligned column is never padded.
    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .fold(col.header.len(), usize::max)
            })
            .collect();

        let mut out = String::new();
        let header: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let text = self.pad(i, col.header, widths[i]);
                self.paint.header(&text)
            })
            .collect();
        out.push_str(header.join(SEP).trim_end());
        out.push('\n');

        for row in &self.rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let raw = row.get(i).map(String::as_str).unwrap_or("");
                    let text = self.pad(i, raw, widths[i]);
                    match col.style {
                        CellStyle::Plain => text,
                        CellStyle::Muted => self.paint.muted(&text),
                        CellStyle::Status => self.paint.status(&text),
                    }
                })
                .collect();
            out.push_str(&cells.join(SEP));
            out.push('\n');
        }
        out
    }

    fn pad(&self, index: usize, text: &str, width: usize) -> String {
        let last = index + 1 == self.columns.len();
        match self.columns[index].align {
            Align::Left if last => text.to_string(),
            Align::Left => format!("{text:<width$}"),
            Align::Right => format!("{text:>width$}"),
        }
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
