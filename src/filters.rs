//! Laws texture-energy filter bank.
//!
//! Four fixed 1×5 base vectors encode local level, edge, spot and ripple
//! patterns. Outer products of base-vector pairs give 5×5 convolution masks;
//! cross pairs are symmetrized by averaging the two orderings, same pairs are
//! used directly. The result is a bank of nine kernels in a fixed channel
//! order that every downstream consumer relies on:
//!
//! | channel | pair | channel | pair | channel | pair |
//! |---|---|---|---|---|---|
//! | 0 | LE | 3 | EE | 6 | SS |
//! | 1 | LS | 4 | ES | 7 | SR |
//! | 2 | LR | 5 | ER | 8 | RR |
//!
//! Every kernel is a symmetric matrix: same-pair kernels are `vᵗ⊗v`, and
//! symmetrizing a cross pair averages a matrix with its transpose.
use nalgebra::{Matrix5, RowVector5};

/// Number of feature channels produced by the bank.
pub const CHANNELS: usize = 9;

/// A 5×5 Laws convolution mask.
pub type Kernel5 = Matrix5<f32>;

/// Level: weighted local average.
pub const L5_TAPS: [f32; 5] = [1.0, 4.0, 6.0, 4.0, 1.0];
/// Edge: first-derivative-like response.
pub const E5_TAPS: [f32; 5] = [-1.0, -2.0, 0.0, 2.0, 1.0];
/// Spot: center-surround response.
pub const S5_TAPS: [f32; 5] = [-1.0, 0.0, 2.0, 0.0, -1.0];
/// Ripple: high-frequency alternation.
pub const R5_TAPS: [f32; 5] = [1.0, -4.0, 6.0, -4.0, 1.0];

/// Outer product of two row vectors: `out[i][j] = a[i] * b[j]`.
#[inline]
pub fn outer(a: &RowVector5<f32>, b: &RowVector5<f32>) -> Kernel5 {
    a.transpose() * b
}

/// Symmetrized cross-pair mask: element-wise mean of the two outer-product
/// orderings, `(a⊗b + b⊗a) / 2`.
#[inline]
pub fn symmetric_pair(a: &RowVector5<f32>, b: &RowVector5<f32>) -> Kernel5 {
    (outer(a, b) + outer(b, a)) * 0.5
}

/// The nine Laws kernels in their fixed channel order.
#[derive(Clone, Debug)]
pub struct FilterBank {
    pub kernels: [Kernel5; CHANNELS],
}

/// Short channel names in bank order, for reports and debug exports.
pub const CHANNEL_NAMES: [&str; CHANNELS] =
    ["LE", "LS", "LR", "EE", "ES", "ER", "SS", "SR", "RR"];

impl FilterBank {
    /// Build the bank from the four Laws base vectors.
    pub fn laws() -> Self {
        let l5 = RowVector5::from_row_slice(&L5_TAPS);
        let e5 = RowVector5::from_row_slice(&E5_TAPS);
        let s5 = RowVector5::from_row_slice(&S5_TAPS);
        let r5 = RowVector5::from_row_slice(&R5_TAPS);

        Self {
            kernels: [
                symmetric_pair(&l5, &e5),
                symmetric_pair(&l5, &s5),
                symmetric_pair(&l5, &r5),
                outer(&e5, &e5),
                symmetric_pair(&e5, &s5),
                symmetric_pair(&e5, &r5),
                outer(&s5, &s5),
                symmetric_pair(&s5, &r5),
                outer(&r5, &r5),
            ],
        }
    }
}

impl Default for FilterBank {
    fn default() -> Self {
        Self::laws()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outer_product_matches_componentwise_definition() {
        let a = RowVector5::from_row_slice(&L5_TAPS);
        let b = RowVector5::from_row_slice(&E5_TAPS);
        let m = outer(&a, &b);
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(m[(i, j)], L5_TAPS[i] * E5_TAPS[j]);
            }
        }
    }

    #[test]
    fn outer_transpose_swaps_operands() {
        let a = RowVector5::from_row_slice(&S5_TAPS);
        let b = RowVector5::from_row_slice(&R5_TAPS);
        assert_eq!(outer(&a, &b).transpose(), outer(&b, &a));
    }

    #[test]
    fn symmetric_pair_is_elementwise_mean() {
        let a = RowVector5::from_row_slice(&E5_TAPS);
        let b = RowVector5::from_row_slice(&S5_TAPS);
        let ab = outer(&a, &b);
        let ba = outer(&b, &a);
        let m = symmetric_pair(&a, &b);
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(m[(i, j)], (ab[(i, j)] + ba[(i, j)]) / 2.0);
            }
        }
    }

    #[test]
    fn all_kernels_are_symmetric() {
        let bank = FilterBank::laws();
        for (c, k) in bank.kernels.iter().enumerate() {
            assert_eq!(
                k, &k.transpose(),
                "kernel {} ({}) should be symmetric",
                c, CHANNEL_NAMES[c]
            );
        }
    }

    #[test]
    fn bank_order_and_sample_coefficients() {
        let bank = FilterBank::laws();
        // LE[0][0] = (1*-1 + -1*1)/2 = -1
        assert_eq!(bank.kernels[0][(0, 0)], -1.0);
        // LE[2][3] = (6*2 + 0*4)/2 = 6
        assert_eq!(bank.kernels[0][(2, 3)], 6.0);
        // EE[0][0] = -1 * -1 = 1
        assert_eq!(bank.kernels[3][(0, 0)], 1.0);
        // EE[1][3] = -2 * 2 = -4
        assert_eq!(bank.kernels[3][(1, 3)], -4.0);
        // SS[2][2] = 2 * 2 = 4
        assert_eq!(bank.kernels[6][(2, 2)], 4.0);
        // RR[2][2] = 6 * 6 = 36
        assert_eq!(bank.kernels[8][(2, 2)], 36.0);
        // SR[0][1] = (-1*-4 + 1*0)/2 = 2
        assert_eq!(bank.kernels[7][(0, 1)], 2.0);
    }
}
