//! Query functions over `&mut PgConnection`, so callers can compose them
//! inside one transaction.

pub mod catalog;
pub mod edges;
pub mod follows;
pub mod images;
pub mod recipes;
pub mod users;

pub use edges::RecipeEdge;
