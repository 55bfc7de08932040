pub mod activity;
pub mod meal;
pub mod pantry;
pub mod product;
pub mod rate_limit;
pub mod recipe;
pub mod shopping;
pub mod user;

pub use activity::Activity;
pub use meal::{Meal, MealItemDetail, MealWithItems, NutritionTotals};
pub use pantry::PantryItem;
pub use product::Product;
pub use rate_limit::{RateLimitRecord, RateLimiter};
pub use recipe::Recipe;
pub use shopping::ShoppingListItem;
pub use user::User;
