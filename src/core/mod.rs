pub mod ambient;
pub mod image;
pub mod pacing;
pub mod profile;
pub mod rain;
pub mod reveal;
pub mod scramble;
pub mod typewriter;

pub use ambient::*;
pub use image::*;
pub use pacing::*;
pub use profile::*;
pub use rain::*;
pub use reveal::*;
pub use scramble::*;
pub use typewriter::*;
