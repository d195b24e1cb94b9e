//! csv files exchanged between pipeline stages
mod combined_table;
mod csv_table;
mod parcel_row;
mod table_error;
mod tract_row;

pub use combined_table::{
    read_combined, write_combined, write_combined_before, COMBINED_COLUMNS, TOP_X_COLUMNS,
};
pub use csv_table::{
    format_float, format_list, header_lookup, parse_float, parse_list, read_origins, read_rows,
    write_rows,
};
pub use parcel_row::{ParcelAverageRow, ParcelRow};
pub use table_error::TableError;
pub use tract_row::TractRow;
