/// Default values for the generator, matching the data set the loader scripts expect.
/// Every one of these can be overridden from the config file or the CLI.

// Volume
pub const DEFAULT_TOTAL_TARGET: u64 = 5_000_000;
pub const DEFAULT_MIN_DRAW: u64 = 1;
pub const DEFAULT_MAX_DRAW: u64 = 1000;
pub const DEFAULT_MIN_QUANTITY: i64 = 1;
pub const DEFAULT_MAX_QUANTITY: i64 = 10;
pub const DEFAULT_PROGRESS_EVERY: usize = 1000;

// Date window (YYYY, MM, DD)
pub const DEFAULT_END_DATE: (i32, u32, u32) = (2026, 1, 31);
pub const DEFAULT_FLOOR_DATE: (i32, u32, u32) = (2016, 1, 1);

// File locations
pub const DEFAULT_CONFIG_FILE: &str = "sales_datagen.toml";
pub const DEFAULT_INPUT_PATH: &str = "metadata.txt";
pub const DEFAULT_SALES_OUTPUT: &str = "sales_data.csv";
pub const DEFAULT_INVENTORY_OUTPUT: &str = "inventory_logs_data.csv";

// Fixed column values written into every row
pub const ORDER_STATUS_DELIVERED: &str = "배송완료";
pub const PAYMENT_STATUS_PAID: &str = "입금완료";
pub const CHANGE_TYPE_OUTBOUND: &str = "출고";
pub const MEMO_SALE_REGISTERED: &str = "판매 등록";
pub const INVENTORY_LOG_TIME: &str = "09:00:00";

/// Date format used in the metadata file and in the `order_date` column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date format used as the `sales_id` prefix
pub const SALES_ID_DATE_FORMAT: &str = "%Y%m%d";
