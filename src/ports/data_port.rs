//! Data access port trait.

use crate::domain::cot_record::CotTable;
use crate::domain::error::CotError;

pub trait CotDataPort {
    /// Load the full positioning table, rows in source order.
    fn load_table(&self) -> Result<CotTable, CotError>;
}
