pub mod errors;
mod loc;
mod options;

pub use loc::Position;
pub use options::Options;
