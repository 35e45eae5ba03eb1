use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppError;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Deserialize, IntoParams)]
pub struct Pagination {
    #[param(default = 1, minimum = 1)]
    pub page: Option<u64>,
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub limit: Option<u64>,
}

impl Pagination {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(10)
    }
}

/// Converts a 1-based page number into the store's 0-based page index.
///
/// The resulting row offset must fit an `i64`, the widest offset the store accepts.
pub fn page_index(page_number: u64, page_size: u64) -> Result<u64, AppError> {
    if page_number == 0 {
        return Err(AppError::InvalidArgument(
            "Page number must be at least 1".to_string(),
        ));
    }
    if page_size == 0 {
        return Err(AppError::InvalidArgument(
            "Page size must be at least 1".to_string(),
        ));
    }
    if page_size > MAX_PAGE_SIZE {
        return Err(AppError::InvalidArgument(format!(
            "Page size must be at most {}",
            MAX_PAGE_SIZE
        )));
    }

    let index = page_number - 1;
    match index.checked_mul(page_size) {
        Some(offset) if offset <= i64::MAX as u64 => Ok(index),
        _ => Err(AppError::InvalidArgument(format!(
            "Page {} is out of range",
            page_number
        ))),
    }
}
