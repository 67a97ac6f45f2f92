/// Data layer: run discovery, column extraction, and series types.
///
/// Architecture:
/// ```text
///  run directories on disk
///        │
///        ▼
///   ┌──────────┐
///   │ discover  │  name patterns, exclusions, age → Vec<RunDir>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ extract   │  log file + column index → Vec<f64>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ TraceSet  │  one variable across runs, value bounds
///   └──────────┘
/// ```
pub mod discover;
pub mod extract;
pub mod model;
