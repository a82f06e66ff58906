//! SureCart to Omnisend transformations.
//!
//! Every function here is pure: entities go in, Omnisend payloads come out.
//! Anything that needs a fetch (expanded discounts, refund context) is
//! resolved by the caller and passed down, so the same transformer serves
//! both the live webhook path and the batched backfill path.

pub mod address;
pub mod cart;
pub mod category;
pub mod checkout;
pub mod contact;
pub mod discount;
pub mod line_item;
pub mod order;
pub mod product;
pub mod tracking;

pub use order::RefundContext;
