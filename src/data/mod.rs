/// Data layer: listing, grouping, analysis and export.
///
/// Architecture:
/// ```text
///   folder of *.TIF
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  list names, decode channels → ChannelImage
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  group    │  11-char sample key → Vec<SampleGroup>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ analysis  │  normalize 488/561 by 405 → IntensityRecord
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  <folder>_averages1.csv
///   └──────────┘
/// ```

pub mod analysis;
pub mod export;
pub mod group;
pub mod loader;
pub mod model;
