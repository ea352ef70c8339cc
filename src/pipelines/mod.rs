pub mod interpret;
pub mod suggest;

pub use interpret::interpret;
pub use suggest::RecipePipeline;
