//! Algorithms for cohort selection and case-control matching.

pub mod cohort;
pub mod matching;
