//! Market data access port trait.

use crate::domain::bar::Bar;
use crate::domain::error::TradesigError;
use chrono::NaiveDate;

pub trait DataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, TradesigError>;

    fn list_symbols(&self) -> Result<Vec<String>, TradesigError>;

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TradesigError>;
}
