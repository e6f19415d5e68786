//! Exporting schedules.
//!
//! # Outputs
//!
//! | Writer | Format |
//! |--------|--------|
//! | [`write_ops_table`] | `job_id,op_index,machine_id,start,end,duration` rows |
//! | [`write_summary_table`] | one row per scenario with `C_job{j}` columns |
//! | [`save_gantt`] / [`gantt_svg`] | SVG Gantt chart |

mod gantt;
mod table;

pub use gantt::{gantt_svg, save_gantt};
pub use table::{write_ops_table, write_summary_table, SummaryRow};
