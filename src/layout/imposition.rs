//! Imposition of identical pieces on a sheet
//!
//! Pieces are laid out in a plain grid, either all upright or all turned a
//! quarter, whichever fits more.

use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, Result};

/// Grid layout of pieces on one sheet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpositionPlan {
    pub pieces_per_sheet: u64,
    /// Columns along the sheet width
    pub across: u32,
    /// Rows along the sheet height
    pub down: u32,
    /// Pieces are turned a quarter
    pub rotated: bool,
    /// Piece size as laid on the sheet
    pub piece_width_cm: f64,
    pub piece_height_cm: f64,
    /// Unused share of the sheet area (0.0-100.0)
    pub waste_percentage: f64,
}

impl ImpositionPlan {
    /// Top-left corner of every piece, row by row
    pub fn positions(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        (0..self.down).flat_map(move |row| {
            (0..self.across).map(move |column| {
                (
                    f64::from(column) * self.piece_width_cm,
                    f64::from(row) * self.piece_height_cm,
                )
            })
        })
    }
}

/// Lay out `piece_width_cm` x `piece_height_cm` pieces on a sheet.
///
/// The upright layout wins ties. A sheet holding more than `u32::MAX` pieces
/// along one side is rejected as `InvalidDimension`.
pub fn impose(
    piece_width_cm: f64,
    piece_height_cm: f64,
    sheet_width_cm: f64,
    sheet_height_cm: f64,
) -> Result<ImpositionPlan> {
    for (parameter, value) in [
        ("piece_width_cm", piece_width_cm),
        ("piece_height_cm", piece_height_cm),
        ("sheet_width_cm", sheet_width_cm),
        ("sheet_height_cm", sheet_height_cm),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(QuoteError::invalid_dimension(parameter, value));
        }
    }

    let fit = |parameter: &str, along: f64, piece: f64| -> Result<u32> {
        let count = (along / piece).floor();
        if count > f64::from(u32::MAX) {
            return Err(QuoteError::invalid_dimension(parameter, piece));
        }
        Ok(count as u32)
    };
    let pieces = |(across, down): (u32, u32)| u64::from(across) * u64::from(down);

    let upright = (
        fit("piece_width_cm", sheet_width_cm, piece_width_cm)?,
        fit("piece_height_cm", sheet_height_cm, piece_height_cm)?,
    );
    let turned = (
        fit("piece_height_cm", sheet_width_cm, piece_height_cm)?,
        fit("piece_width_cm", sheet_height_cm, piece_width_cm)?,
    );

    let rotated = pieces(turned) > pieces(upright);
    let ((across, down), (laid_w, laid_h)) = if rotated {
        (turned, (piece_height_cm, piece_width_cm))
    } else {
        (upright, (piece_width_cm, piece_height_cm))
    };

    let pieces_per_sheet = pieces((across, down));
    let sheet_area = sheet_width_cm * sheet_height_cm;
    let used_area = pieces_per_sheet as f64 * piece_width_cm * piece_height_cm;

    Ok(ImpositionPlan {
        pieces_per_sheet,
        across,
        down,
        rotated,
        piece_width_cm: laid_w,
        piece_height_cm: laid_h,
        waste_percentage: (sheet_area - used_area) / sheet_area * 100.0,
    })
}
