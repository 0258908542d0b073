pub mod confidence;
pub mod indicators;
pub mod state;
