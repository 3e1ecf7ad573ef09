pub mod banner_json;
pub mod draw_json;

pub use banner_json::{
    banner_schema_json, rate_table_json, validate_banner_json, RateTableResponse,
    TierRateTable, ValidateBannerResponse, ViolationReport,
};
pub use draw_json::{draw_json, DrawRequest, DrawResponse};
