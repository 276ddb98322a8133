//! Table loading/saving port trait.

use std::io::Write;
use std::path::Path;

use polars::prelude::DataFrame;

use crate::domain::error::FintaError;

pub trait DataPort {
    /// Read a whole table into memory.
    fn load(&self, path: &Path) -> Result<DataFrame, FintaError>;

    /// Write `frame` with a header row; nulls become empty cells.
    fn write(&self, frame: &DataFrame, out: &mut dyn Write) -> Result<(), FintaError>;
}
