/// Data layer: core types, loading, summarising, filtering and export.
///
/// Architecture:
/// ```text
///        .csv bytes
///            │
///            ▼
///      ┌──────────┐
///      │  loader  │  parse + infer dtypes → Table
///      └──────────┘
///            │
///            ▼
///      ┌──────────┐
///      │  Table   │  typed columns + original row index
///      └──────────┘
///        │       │
///        ▼       ▼
///  ┌─────────┐ ┌──────────┐
///  │ summary │ │  filter  │  range predicates → narrowed Table
///  └─────────┘ └──────────┘
///                    │
///                    ▼
///              ┌──────────┐
///              │  export  │  narrowed Table → CSV bytes
///              └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
