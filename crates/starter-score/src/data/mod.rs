// Input side: dataset loading, name keys, and pitch-usage text.

pub mod names;
pub mod stats;
pub mod usage;
