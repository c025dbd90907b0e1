pub mod container;
pub mod controller;
pub mod router;
pub mod view;

pub use container::{Container, ContainerConfig};
pub use router::Router;
pub use view::{busy_indicator, HistoryView, EMPTY_STATE_TEXT};
