use std::fmt::Debug;

/// A value defined over the spatial degrees of freedom of a problem.
///
/// Solvers treat values as flat vectors of `f64` components. All arithmetic a
/// sweep needs (`axpy`, `scale`, norms) is derived from the component slices,
/// so implementing this trait only requires exposing them.
///
/// Values of one problem share a fixed dimension. Zero-valued placeholders are
/// allocated with [`SpatialValue::zeroed`], which keeps the dimension of the
/// value it is called on.
pub trait SpatialValue: Clone + Debug {
    /// Returns the components of this value.
    fn components(&self) -> &[f64];

    /// Returns the components of this value for in-place modification.
    fn components_mut(&mut self) -> &mut [f64];

    /// Returns the number of spatial degrees of freedom.
    fn dim(&self) -> usize {
        self.components().len()
    }

    /// Returns a value with the same dimension and all components zero.
    #[must_use]
    fn zeroed(&self) -> Self {
        let mut zero = self.clone();
        zero.components_mut().fill(0.0);
        zero
    }

    /// Computes `self += alpha * x` in place.
    ///
    /// Both values must have the same dimension.
    fn axpy(&mut self, alpha: f64, x: &Self) {
        debug_assert_eq!(self.dim(), x.dim(), "spatial dimensions differ");
        for (s, xi) in self.components_mut().iter_mut().zip(x.components()) {
            *s += alpha * xi;
        }
    }

    /// Multiplies every component by `alpha` in place.
    fn scale(&mut self, alpha: f64) {
        for s in self.components_mut() {
            *s *= alpha;
        }
    }

    /// Returns `self - other`.
    #[must_use]
    fn difference(&self, other: &Self) -> Self {
        let mut diff = self.clone();
        diff.axpy(-1.0, other);
        diff
    }

    /// Returns the largest absolute component (supremum norm).
    fn sup_norm(&self) -> f64 {
        self.components()
            .iter()
            .fold(0.0_f64, |acc, c| acc.max(c.abs()))
    }

    /// Returns the supremum norm of `self - other` without allocating.
    fn sup_distance(&self, other: &Self) -> f64 {
        self.components()
            .iter()
            .zip(other.components())
            .fold(0.0_f64, |acc, (a, b)| acc.max((a - b).abs()))
    }

    /// Returns true if every component is finite.
    fn is_finite(&self) -> bool {
        self.components().iter().all(|c| f64::is_finite(*c))
    }
}

impl SpatialValue for f64 {
    fn components(&self) -> &[f64] {
        std::slice::from_ref(self)
    }

    fn components_mut(&mut self) -> &mut [f64] {
        std::slice::from_mut(self)
    }
}

impl SpatialValue for Vec<f64> {
    fn components(&self) -> &[f64] {
        self
    }

    fn components_mut(&mut self) -> &mut [f64] {
        self
    }
}

impl<const N: usize> SpatialValue for [f64; N] {
    fn components(&self) -> &[f64] {
        self
    }

    fn components_mut(&mut self) -> &mut [f64] {
        self
    }
}
