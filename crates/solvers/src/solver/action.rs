/// Control actions supported by the SDC solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Abandon the current interval, signal failure downstream, and stop.
    StopEarly,
}
