//! Client-side table pipeline shared by every listing screen:
//! comparator → stable sort → filter → paginate → row selection.

mod comparator;
mod filter;
mod record;
mod state;

pub use comparator::{Comparator, Order};
pub use filter::{apply_filter, FilterCriteria};
pub use record::{FieldValue, Record};
pub use state::{empty_rows, TableState};
