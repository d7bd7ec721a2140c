pub mod account;
pub mod error;
pub mod image;
pub mod pagination;
pub mod query;
pub mod recipe;
pub mod search;
pub mod short_link;
pub mod shopping_list;

pub use error::{ImageError, ValidationError, ValidationErrors};
pub use image::{decode_data_uri, DecodedImage};
pub use pagination::PageRequest;
pub use query::{EdgeScope, RecipeQuery};
pub use recipe::{IngredientLine, Limits, RecipeDraft, WriteMode};
pub use search::rank_by_name;
pub use shopping_list::{aggregate, render_report, CartLine, ShoppingListEntry};
