use serde::{Deserialize, Serialize};

/// Visibility of a single cell. Cells only ever move from [`Hidden`] to
/// [`Revealed`], never back.
///
/// [`Hidden`]: CellState::Hidden
/// [`Revealed`]: CellState::Revealed
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Revealed,
}

impl CellState {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// Display value attached to a coordinate handed to the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellView {
    Mine,
    Hint(u8),
}
