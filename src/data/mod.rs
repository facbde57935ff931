/// Data layer: core types, loading, station indexing and layer splitting.
///
/// Architecture:
/// ```text
///  .xls workbook (grain-size sheet + Sample Info)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read sheets → join by sample # → SampleTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ stations  │  station name → contiguous sample numbers
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  layers   │  depth-interval gaps → Vec<SampleTable>
///   └──────────┘
/// ```

pub mod layers;
pub mod loader;
pub mod model;
pub mod stations;
