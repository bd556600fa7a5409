pub mod construction;
pub mod optimizer;
pub mod plan;
pub mod tabu_search;

pub use optimizer::{
    optimize, optimize_batch, optimize_matrix, optimize_with, solve, OptimizeOptions,
};
