//! Client-facing representations and the mapping from storage records.

pub mod dto;
pub mod mappers;

pub use dto::{
    CategoryResponse, ItemListResponse, ItemResponse, MediaResponse,
};
