//! # Simulator Components
//!
//! - `TitleBar`: stateless, props only (location, policy, toast)
//! - `PageList`: stateful, owns its selection
//!
//! Components receive external data as props, never by reaching into the
//! simulated host directly.

mod page_list;
mod title_bar;

pub use page_list::PageList;
pub use title_bar::TitleBar;
