//! Venue settings DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::config::PricingConfig;

/// Pricing policy, money in minor currency units
#[derive(Debug, Serialize, ToSchema)]
pub struct PricingDto {
    pub price_per_seat: i64,
    pub deposit_percent: f64,
    pub minimum_deposit: i64,
    pub currency: String,
}

impl From<PricingConfig> for PricingDto {
    fn from(p: PricingConfig) -> Self {
        Self {
            price_per_seat: p.price_per_seat,
            deposit_percent: p.deposit_percent,
            minimum_deposit: p.minimum_deposit,
            currency: p.currency,
        }
    }
}

/// Current venue setup: bookable slots, seats per slot, pricing
#[derive(Debug, Serialize, ToSchema)]
pub struct VenueSettingsResponse {
    pub slots: Vec<String>,
    pub capacity_per_slot: u32,
    pub pricing: PricingDto,
}

/// Staff request to change seats per slot
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCapacityRequest {
    #[validate(range(min = 1, message = "capacity must be at least 1"))]
    pub capacity_per_slot: u32,
}

/// Staff request to replace the pricing policy
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePricingRequest {
    #[validate(range(min = 1, message = "price_per_seat must be positive"))]
    pub price_per_seat: i64,
    #[validate(range(min = 0.0, max = 1.0, message = "deposit_percent must be between 0 and 1"))]
    pub deposit_percent: f64,
    #[validate(range(min = 0, message = "minimum_deposit cannot be negative"))]
    pub minimum_deposit: i64,
    #[validate(length(min = 3, max = 3, message = "currency must be an ISO 4217 code"))]
    pub currency: String,
}
