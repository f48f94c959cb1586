//! Configuration section definitions.
//!
//! Each module corresponds to a section in `medialink.toml`:
//!
//! | Module     | TOML Section   | Purpose                               |
//! |------------|----------------|---------------------------------------|
//! | `content`  | `[content]`    | Content layout, naming conventions    |
//! | `store`    | `[store]`      | Object store project, buckets, auth   |

mod content;
mod store;

pub use content::ContentConfig;
pub use store::StoreConfig;
