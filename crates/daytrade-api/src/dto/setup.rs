use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use daytrade_db::models::Setup;
use daytrade_kpi::BoxTotals;
use daytrade_types::{MarketMode, format_currency};

use super::decimal_string;

/// Amounts accept `R$ 1.234,56`, `1234.56` and similar notations.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterSetupRequest {
    #[serde(default)]
    pub market_mode: MarketMode,
    pub box1: String,
    pub box2: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoxTotalsDto {
    pub committed_total: String,
    pub current_total: String,
    pub net_result: String,
    pub net_pct: String,
    /// `net_result` rendered for display, e.g. `-$1.234,56`.
    pub net_result_display: String,
}

impl From<BoxTotals> for BoxTotalsDto {
    fn from(totals: BoxTotals) -> Self {
        Self {
            committed_total: decimal_string(totals.committed_total),
            current_total: decimal_string(totals.current_total),
            net_result: decimal_string(totals.net_result),
            net_pct: decimal_string(totals.net_pct),
            net_result_display: format_currency(totals.net_result),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetupResponse {
    pub market_mode: MarketMode,
    pub box1_value: String,
    pub box2_value: String,
    pub box1_initial_fixed: String,
    pub box2_initial_fixed: String,
    pub totals: BoxTotalsDto,
}

impl From<Setup> for SetupResponse {
    fn from(setup: Setup) -> Self {
        Self {
            market_mode: setup.market_mode(),
            box1_value: decimal_string(setup.box1_value),
            box2_value: decimal_string(setup.box2_value),
            box1_initial_fixed: decimal_string(setup.box1_initial_fixed),
            box2_initial_fixed: decimal_string(setup.box2_initial_fixed),
            totals: BoxTotals::from_setup(&setup).into(),
        }
    }
}
