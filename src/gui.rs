use crate::filter::FilterState;

pub mod charts;
pub mod dashboard_viewer;

pub enum GuiEvent {
    Loaded { records: usize, companies: usize },
    FilterChanged { filter: FilterState, records: usize },
}
