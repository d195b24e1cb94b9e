pub mod combine;
pub mod comparison;
pub mod origin_aggregation;
pub mod search_buffer;
pub mod stats;
pub mod top_x;
