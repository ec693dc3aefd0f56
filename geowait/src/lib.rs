pub mod cli;
pub mod config;
pub mod error;
pub mod finder;
pub mod lookup;
pub mod output;
pub mod sampler;
pub mod table;

pub use error::{DataError, DomainError, FindError};
pub use finder::{find, find_with_rng, Finder};
pub use lookup::lookup;
pub use sampler::{delay_from_uniform, sample_delay};
pub use table::{build_table, Columns, RawSamples, ScaleTable};
