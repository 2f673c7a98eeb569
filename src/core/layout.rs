//! Badge sheet layout: packs fixed-size badge cards into a grid of
//! `columns × rows_per_page` slots per page.
//!
//! Coordinates are in points, measured from the top-left corner of the
//! page (y grows downward). Converting to the renderer's own origin is the
//! renderer's job.

use crate::errors::{AppError, AppResult};
use crate::models::attendee::Attendee;
use serde::{Deserialize, Serialize};

/// Points per inch.
pub const PT_PER_INCH: f32 = 72.0;

/// Page and card geometry of a badge sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub card_width: f32,
    pub card_height: f32,
    pub columns: u32,
    pub margin_x: f32,
    pub margin_y: f32,
    pub vertical_spacing: f32,
}

impl Default for BadgeGeometry {
    /// US Letter with 2.3in × 3.4in cards, three per row, half-inch margins.
    fn default() -> Self {
        Self {
            page_width: 8.5 * PT_PER_INCH,
            page_height: 11.0 * PT_PER_INCH,
            card_width: 2.3 * PT_PER_INCH,
            card_height: 3.4 * PT_PER_INCH,
            columns: 3,
            margin_x: 0.5 * PT_PER_INCH,
            margin_y: 0.5 * PT_PER_INCH,
            vertical_spacing: 12.0,
        }
    }
}

impl BadgeGeometry {
    /// Every length must be a finite number.
    fn check_finite(&self) -> AppResult<()> {
        let fields = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("card_width", self.card_width),
            ("card_height", self.card_height),
            ("margin_x", self.margin_x),
            ("margin_y", self.margin_y),
            ("vertical_spacing", self.vertical_spacing),
        ];
        match fields.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, v)) => Err(AppError::GeometryInfeasible(format!(
                "{name} must be a finite number, got {v}"
            ))),
            None => Ok(()),
        }
    }

    fn printable_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin_x
    }

    /// `floor((H - 2·my + vs) / (ch + vs))`
    pub fn rows_per_page(&self) -> AppResult<u32> {
        self.check_finite()?;
        let usable = self.page_height - 2.0 * self.margin_y + self.vertical_spacing;
        let pitch = self.card_height + self.vertical_spacing;

        if !(self.card_height > 0.0 && pitch > 0.0) {
            return Err(AppError::GeometryInfeasible(format!(
                "card height {} with vertical spacing {} is not positive",
                self.card_height, self.vertical_spacing
            )));
        }

        let rows = (usable / pitch).floor();
        if !(rows >= 1.0) {
            return Err(AppError::GeometryInfeasible(format!(
                "page height {} with margins {} cannot hold a card of height {}",
                self.page_height, self.margin_y, self.card_height
            )));
        }

        Ok(rows as u32)
    }

    /// Left edges of the column slots: the row is justified so that the
    /// first card touches the left margin and the last one the right margin.
    pub fn column_origins(&self) -> AppResult<Vec<f32>> {
        self.check_finite()?;
        if self.columns == 0 {
            return Err(AppError::GeometryInfeasible(
                "at least one column per row is required".to_string(),
            ));
        }

        let n = self.columns as f32;
        let slack = self.printable_width() - n * self.card_width;

        if !(self.card_width > 0.0 && slack >= 0.0) {
            return Err(AppError::GeometryInfeasible(format!(
                "{} cards of width {} do not fit in a printable width of {}",
                self.columns,
                self.card_width,
                self.printable_width()
            )));
        }

        let spacing = if self.columns > 1 {
            slack / (n - 1.0)
        } else {
            0.0
        };

        Ok((0..self.columns)
            .map(|c| self.margin_x + c as f32 * (self.card_width + spacing))
            .collect())
    }

    fn row_origin(&self, row: u32) -> f32 {
        self.margin_y + row as f32 * (self.card_height + self.vertical_spacing)
    }
}

/// Where one attendee's card goes.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgePlacement<'a> {
    pub attendee: &'a Attendee,
    pub index: usize,
    pub page: usize,
    pub row: u32,
    pub col: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BadgePlacement<'_> {
    /// True for the first card of every page after the first.
    pub fn starts_new_page(&self, cards_per_page: usize) -> bool {
        self.index != 0 && self.index % cards_per_page == 0
    }
}

#[derive(Debug, Clone)]
pub struct BadgeLayout<'a> {
    pub rows_per_page: u32,
    pub cards_per_page: usize,
    pub placements: Vec<BadgePlacement<'a>>,
}

impl<'a> BadgeLayout<'a> {
    pub fn page_count(&self) -> usize {
        self.placements.last().map(|p| p.page + 1).unwrap_or(0)
    }

    pub fn page(&self, page: usize) -> impl Iterator<Item = &BadgePlacement<'a>> {
        self.placements.iter().filter(move |p| p.page == page)
    }
}

/// Assign every attendee, in input order, to a page slot.
pub fn layout_badges<'a>(
    attendees: &'a [Attendee],
    geometry: &BadgeGeometry,
) -> AppResult<BadgeLayout<'a>> {
    let rows_per_page = geometry.rows_per_page()?;
    let column_x = geometry.column_origins()?;
    let columns = geometry.columns as usize;
    let cards_per_page = columns * rows_per_page as usize;

    let placements = attendees
        .iter()
        .enumerate()
        .map(|(i, attendee)| {
            let pos_on_page = i % cards_per_page;
            let col = pos_on_page % columns;
            let row = (pos_on_page / columns) as u32;

            BadgePlacement {
                attendee,
                index: i,
                page: i / cards_per_page,
                row,
                col: col as u32,
                x: column_x[col],
                y: geometry.row_origin(row),
                width: geometry.card_width,
                height: geometry.card_height,
            }
        })
        .collect();

    Ok(BadgeLayout {
        rows_per_page,
        cards_per_page,
        placements,
    })
}
