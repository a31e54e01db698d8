//! Account HTTP handlers

use axum::{extract::State, Json};

use super::AuthenticatedUser;
use crate::error::ApiResult;
use crate::models::BalanceResponse;
use crate::services::CURRENCY;
use crate::state::AppState;

/// GET /api/account/balance - Balance of the authenticated caller
pub async fn get_balance(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<BalanceResponse>> {
    let balance = state.account_service.balance(&user.username).await?;

    Ok(Json(BalanceResponse {
        success: true,
        username: user.username,
        balance,
        currency: CURRENCY.to_string(),
    }))
}
