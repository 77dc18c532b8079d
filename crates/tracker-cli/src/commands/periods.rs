//! `periods`: 조회 기간 목록.

use anyhow::Result;
use std::io::Write;
use tracker_core::Period;

use crate::display;

pub fn periods(default: Period, out: &mut impl Write) -> Result<()> {
    write!(out, "{}", display::periods(default))?;
    Ok(())
}
