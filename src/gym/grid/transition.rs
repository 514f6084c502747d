use crate::gym::grid::{
    action::GridAction,
    spec::{GridSpec, Position},
};

/// Applies `action` at `pos` and returns the next cell.
///
/// The row moves by the action's vertical offset minus the wind of the **pre-step** column,
/// the column by the horizontal offset. Each axis is clamped to the grid independently, so
/// pushing against an edge is a no-op along that axis.
pub fn transition(spec: &GridSpec, pos: Position, action: GridAction) -> Position {
    let (d_row, d_col) = action.offset();
    let wind = spec.wind_at(pos.col) as i64;

    Position {
        row: clamp_axis(pos.row as i64 + d_row - wind, spec.rows),
        col: clamp_axis(pos.col as i64 + d_col, spec.cols),
    }
}

fn clamp_axis(value: i64, len: usize) -> usize {
    value.clamp(0, len as i64 - 1) as usize
}
