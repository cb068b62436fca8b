//! Commands module - service layer for RouteMaster operations

mod apply;
mod plan;
pub(crate) mod service;

pub use plan::plan;
pub use service::RouteMasterService;
