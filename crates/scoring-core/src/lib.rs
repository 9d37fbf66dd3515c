pub mod config;
pub mod error;
pub mod lenient;
pub mod neutral;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::*;
pub use neutral::*;
pub use traits::*;
pub use types::*;
