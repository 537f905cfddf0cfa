// storefront/src/models/mod.rs

//! Catalog, cart, wishlist and order types.

pub mod cart;
pub mod order;
pub mod product;
pub mod wishlist;

pub use cart::{Cart, CartLine, CartLineView, CartView, QuantityOperation};
pub use order::{Order, ShippingDetails};
pub use product::{Catalog, Product};
pub use wishlist::{Wishlist, WishlistEntry, WishlistEntryView, WishlistView};
