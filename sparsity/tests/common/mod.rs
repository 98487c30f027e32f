#![allow(dead_code)]

use std::collections::BTreeSet;

use sparsity::{PatternBuilder, SparsityPattern, SparsityStructure};

/// Five-point Laplacian couplings on a `width` x `width` grid of unknowns
///
/// Unknown `i * width + j` couples to its north, south, west and east
/// neighbours; the diagonal comes from the builder's diagonal policy.
pub fn five_point_builder(width: usize) -> PatternBuilder {
    let n = width * width;
    let mut builder = PatternBuilder::new(n, n, 5).unwrap();
    for i in 0..width {
        for j in 0..width {
            let row = i * width + j;
            if i > 0 {
                builder.add(row, row - width).unwrap();
            }
            if i + 1 < width {
                builder.add(row, row + width).unwrap();
            }
            if j > 0 {
                builder.add(row, row - 1).unwrap();
            }
            if j + 1 < width {
                builder.add(row, row + 1).unwrap();
            }
        }
    }
    builder
}

/// Compressed five-point pattern
pub fn five_point_stencil(width: usize) -> SparsityPattern {
    five_point_builder(width).compress().unwrap()
}

/// Every stored (row, col) pair
pub fn entry_set<S: SparsityStructure>(pattern: &S) -> BTreeSet<(usize, usize)> {
    pattern.iter().collect()
}

/// Column lists per row in stored order
pub fn rows_of<S: SparsityStructure>(pattern: &S) -> Vec<Vec<usize>> {
    (0..pattern.n_rows())
        .map(|row| pattern.row(row).iter().map(|&col| col as usize).collect())
        .collect()
}

/// Both directions of the index bijection hold
pub fn assert_bijection<S: SparsityStructure>(pattern: &S) {
    for index in 0..pattern.n_nonzero_elements() {
        let (row, col) = pattern.matrix_position(index).unwrap();
        assert_eq!(pattern.index_of(row, col), Some(index), "index {index}");
    }
    for row in 0..pattern.n_rows() {
        for col in 0..pattern.n_cols() {
            if let Some(index) = pattern.index_of(row, col) {
                assert_eq!(pattern.matrix_position(index), Some((row, col)));
            }
        }
    }
}
