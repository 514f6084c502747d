use ndarray::Array1;

use crate::gym::{
    grid::spec::{GridSpec, Position},
    space::BoxSpace,
};

/// Turns the agent's cell into the observation handed back by `reset()` and `step()`.
pub trait ObservationEncoder {
    type Observation: Clone;

    fn encode(spec: &GridSpec, pos: Position) -> Self::Observation;

    fn space(spec: &GridSpec) -> BoxSpace;
}

/// Flattened one-hot vector of length `rows * cols`.
#[derive(Debug, Clone, Copy)]
pub struct OneHot;

impl ObservationEncoder for OneHot {
    type Observation = Array1<f32>;

    fn encode(spec: &GridSpec, pos: Position) -> Self::Observation {
        let mut grid = Array1::zeros(spec.n_cells());
        grid[pos.flat_index(spec.cols)] = 1.0;
        grid
    }

    fn space(spec: &GridSpec) -> BoxSpace {
        BoxSpace::new(0.0, 1.0, spec.n_cells())
    }
}

/// The raw `(row, col)` pair.
#[derive(Debug, Clone, Copy)]
pub struct Coordinates;

impl ObservationEncoder for Coordinates {
    type Observation = Position;

    fn encode(_spec: &GridSpec, pos: Position) -> Self::Observation {
        pos
    }

    fn space(spec: &GridSpec) -> BoxSpace {
        BoxSpace::new(0.0, spec.rows.max(spec.cols) as f64, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hot_marks_exactly_the_agent_cell() {
        let spec = GridSpec::berry_patch(4, true);
        let obs = OneHot::encode(&spec, Position::new(2, 3));

        assert_eq!(obs.len(), 16);
        assert_eq!(obs.sum(), 1.0);
        assert_eq!(obs[11], 1.0);
    }

    #[test]
    fn coordinates_pass_the_cell_through() {
        let spec = GridSpec::windy_gridworld();
        assert_eq!(Coordinates::encode(&spec, spec.start), Position::new(3, 0));
        assert_eq!(Coordinates::space(&spec).high, 10.0);
    }
}
