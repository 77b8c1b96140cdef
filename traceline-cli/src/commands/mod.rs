//! CLI command implementations

pub mod align;
pub mod chunk;
pub mod decompose;
pub mod generate;
pub mod review;

pub use align::AlignArgs;
pub use chunk::ChunkArgs;
pub use decompose::DecomposeArgs;
pub use generate::GenerateArgs;
pub use review::ReviewArgs;
