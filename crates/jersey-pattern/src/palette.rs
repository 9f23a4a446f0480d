//! Editable color/proportion list behind the control panel.
//!
//! Every edit either applies in full or returns an error and leaves the
//! palette untouched.

use jersey_color::{ColorStop, Rgb};
use tracing::{debug, warn};

use crate::career::{PERCENT_TOLERANCE, check_percentage};
use crate::{Club, ParamsError, cumulative_positions, derive_color_stops};

/// Fewest stops an edit may leave behind.
pub const MIN_STOPS: usize = 2;

/// Most stops an edit may create.
pub const MAX_STOPS: usize = 4;

/// Upper bound on the share given to a newly added stop.
pub const NEW_STOP_PROPORTION: f32 = 10.0;

/// One color and its share of the ramp in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteEntry {
    /// Stop color.
    pub color: Rgb,
    /// Share of the ramp, 0-100.
    pub proportion: f32,
}

impl PaletteEntry {
    /// Creates an entry. Proportions are checked when the entry joins a
    /// [`Palette`].
    pub fn new(color: Rgb, proportion: f32) -> Self {
        Self { color, proportion }
    }
}

/// Ordered palette whose proportions sum to at most 100.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Creates a palette, rejecting invalid proportions or a total above 100.
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self, ParamsError> {
        if entries.is_empty() {
            return Err(ParamsError::NoStops);
        }
        for (index, entry) in entries.iter().enumerate() {
            check_percentage(index, entry.proportion)?;
        }
        let total: f32 = entries.iter().map(|e| e.proportion).sum();
        if total > 100.0 + PERCENT_TOLERANCE {
            return Err(ParamsError::SumExceeded { total });
        }
        Ok(Self { entries })
    }

    /// Recovers proportions from cumulative stop positions.
    ///
    /// Stops are read in position order; each proportion is the gap to the
    /// previous stop.
    pub fn from_stops(stops: &[ColorStop]) -> Self {
        let mut sorted: Vec<ColorStop> = stops.to_vec();
        sorted.sort_by(|a, b| a.position.total_cmp(&b.position));

        let mut previous = 0.0;
        let entries = sorted
            .into_iter()
            .map(|stop| {
                let position = if stop.position.is_finite() {
                    stop.position.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let proportion = ((position - previous) * 100.0).max(0.0);
                previous = position.max(previous);
                PaletteEntry::new(stop.color, proportion)
            })
            .collect();
        Self { entries }
    }

    /// Builds a palette straight from a career.
    pub fn from_clubs(clubs: &[Club]) -> Result<Self, ParamsError> {
        derive_color_stops(clubs)?;
        let entries = clubs
            .iter()
            .enumerate()
            .map(|(index, club)| {
                Rgb::from_hex(&club.color)
                    .map(|color| PaletteEntry::new(color, club.percentage))
                    .map_err(|source| ParamsError::InvalidColor { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// Entries in ramp order.
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the palette has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all proportions.
    pub fn total(&self) -> f32 {
        self.entries.iter().map(|e| e.proportion).sum()
    }

    /// Share not yet assigned to any entry.
    pub fn remaining(&self) -> f32 {
        (100.0 - self.total()).max(0.0)
    }

    /// Color stops at cumulative positions.
    ///
    /// Positions are not stretched to 1.0, so a palette rebuilt with
    /// [`Palette::from_stops`] keeps every proportion, including an
    /// unassigned remainder.
    pub fn color_stops(&self) -> Vec<ColorStop> {
        let proportions: Vec<f32> = self.entries.iter().map(|e| e.proportion).collect();
        cumulative_positions(&proportions)
            .into_iter()
            .zip(&self.entries)
            .map(|(position, entry)| ColorStop::new(position, entry.color))
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<(), ParamsError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(ParamsError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }

    /// Sets one entry's proportion.
    ///
    /// The value is clamped to 0-100. The edit is rejected when the other
    /// entries plus the new value would exceed 100.
    pub fn set_proportion(&mut self, index: usize, value: f32) -> Result<(), ParamsError> {
        self.check_index(index)?;
        if value.is_nan() {
            return Err(ParamsError::InvalidPercentage { index, value });
        }
        let value = value.clamp(0.0, 100.0);
        let others = self.total() - self.entries[index].proportion;
        let total = others + value;
        if total > 100.0 + PERCENT_TOLERANCE {
            warn!(index, total, others, "rejected proportion edit");
            return Err(ParamsError::TotalExceeded { total, others });
        }
        self.entries[index].proportion = value;
        debug!(index, value, "set proportion");
        Ok(())
    }

    /// Sets one entry's color.
    pub fn set_color(&mut self, index: usize, color: Rgb) -> Result<(), ParamsError> {
        self.check_index(index)?;
        self.entries[index].color = color;
        Ok(())
    }

    /// Sets one entry's color from a `#RRGGBB` string.
    pub fn set_color_hex(&mut self, index: usize, hex: &str) -> Result<(), ParamsError> {
        self.check_index(index)?;
        let color = Rgb::from_hex(hex)?;
        self.set_color(index, color)
    }

    /// Appends a color taking `min(10, remaining / 2)` percent.
    pub fn push(&mut self, color: Rgb) -> Result<(), ParamsError> {
        if self.entries.len() >= MAX_STOPS {
            warn!(max = MAX_STOPS, "rejected stop addition");
            return Err(ParamsError::TooManyStops { max: MAX_STOPS });
        }
        let proportion = NEW_STOP_PROPORTION.min(self.remaining() / 2.0);
        self.entries.push(PaletteEntry::new(color, proportion));
        debug!(proportion, len = self.entries.len(), "added stop");
        Ok(())
    }

    /// Removes an entry, keeping at least [`MIN_STOPS`].
    pub fn remove(&mut self, index: usize) -> Result<PaletteEntry, ParamsError> {
        self.check_index(index)?;
        if self.entries.len() <= MIN_STOPS {
            warn!(min = MIN_STOPS, "rejected stop removal");
            return Err(ParamsError::TooFewStops { min: MIN_STOPS });
        }
        Ok(self.entries.remove(index))
    }

    /// Moves an entry to a new slot; positions follow the new order.
    pub fn move_stop(&mut self, from: usize, to: usize) -> Result<(), ParamsError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }
}
