// Scoring engine: quantile boundaries, interpolated stat terms, rule brackets.

pub mod interp;
pub mod quantiles;
pub mod rules;
pub mod starter;
