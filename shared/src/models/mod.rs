//! Catalog and party models
//!
//! Documents stored in the `Products`, `Customers` and `Sellers`
//! collections. Field names follow the persisted camelCase layout.

pub mod customer;
pub mod product;
pub mod seller;

pub use customer::{Customer, CustomerRef};
pub use product::{Product, ProductAddon, Variant};
pub use seller::SellerProfile;
