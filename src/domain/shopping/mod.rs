//! Shopping Context

mod errors;
mod value_objects;

pub use errors::DomainError;
pub use value_objects::{
    ProductInfo, ProductRecord, Recommendation, SearchLimit, ShoppingQuery, Verdict,
};
