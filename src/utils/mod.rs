pub mod maths_utils;
pub mod time_utils;

pub use time_utils::{
    TimeUtils, epoch_ms_to_axis_label, format_duration,
    now_timestamp_ms, parse_timestamp_str, parse_timestamp_value,
};

pub(crate) use maths_utils::{calculate_percent_diff, remap, round2};
