use holding::Holding;

pub mod expansion;
pub mod group;
pub mod holding;
pub mod loader;
pub mod report;
pub mod tui;

#[derive(Debug)]
pub enum AppEvent {
    HoldingsFetched(anyhow::Result<Vec<Holding>>),
}
