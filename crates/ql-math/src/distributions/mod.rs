//! Probability distributions.

pub mod normal;

pub use normal::{normal_cdf, normal_cdf_inverse, normal_pdf};
