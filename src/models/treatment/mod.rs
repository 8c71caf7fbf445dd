mod queries;
pub mod stage;
mod types;

pub use self::queries::*;
pub use self::stage::{StageProgress, resolve};
pub use self::types::*;
