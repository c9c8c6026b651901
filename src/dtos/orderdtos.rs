use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    lifecycle::transitions::OrderTransition,
    models::ordermodel::{Order, OrderPriority, OrderStatus},
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    #[validate(range(min = 0))]
    pub price: i64,
    pub priority: Option<OrderPriority>,
    pub executor_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TransitionOrderDto {
    pub next_status: OrderStatus,
    #[validate(length(max = 2000))]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PriorityOverrideDto {
    // None clears the override.
    pub priority: Option<OrderPriority>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrderQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
    pub status: Option<OrderStatus>,
    #[validate(length(max = 200))]
    pub search: Option<String>,
}

/// Detail response carries the actions this caller may invoke, straight
/// from the transition table.
#[derive(Debug, Serialize)]
pub struct OrderDetailDto {
    pub order: Order,
    pub available_transitions: Vec<OrderTransition>,
}
