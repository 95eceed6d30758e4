/// Data layer: core types, loading, and peak filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  X / Y columns + their header names
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply thresholds → PeakSubset, mean
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
