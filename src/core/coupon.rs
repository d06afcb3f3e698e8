//! Coupon evaluator - Eligibility, discount computation, and redemption.
//!
//! Eligibility answers *whether* a user may redeem a code and *why not*
//! when they may not; the reasons feed user-facing messaging. Redemption is
//! the write side and only ever runs inside the checkout transaction: the
//! guarded `times_used` increment and the unique index on
//! `(coupon_id, user_id)` close the races an application-level existence
//! check would leave open.

use crate::{
    entities::{Coupon, CouponUsage, coupon, coupon_usage},
    errors::{Error, Result, is_unique_violation},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    Condition, ConnectionTrait, PaginatorTrait, QueryOrder, Set, prelude::*,
    sea_query::{Expr, Func},
};
use thiserror::Error as ThisError;
use tracing::info;

use super::pricing::round_money;

/// Identity lookup the coupon evaluator needs from the account layer.
///
/// The storefront core never reads user records itself; callers hand in
/// whatever directory backs their deployment.
pub trait AccountDirectory {
    /// Whether the user has confirmed their email address.
    fn is_email_confirmed(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<bool>> + Send;
}

/// Why a coupon cannot be used, in terms a shopper can be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum CouponRejection {
    /// No active coupon carries this code
    #[error("no coupon exists for this code")]
    NotFound,
    /// The coupon is disabled, outside its validity window, or fully redeemed
    #[error("this coupon is no longer valid")]
    NotCurrentlyValid,
    /// The coupon requires a confirmed email address
    #[error("confirm your email address to use this coupon")]
    EmailConfirmationRequired,
    /// The user has already redeemed this coupon
    #[error("this coupon has already been used")]
    AlreadyUsed,
}

/// Outcome of evaluating a coupon for a user.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponEvaluation {
    /// The coupon may be applied
    Eligible(coupon::Model),
    /// The coupon may not be applied, and this is why
    Ineligible(CouponRejection),
}

/// Discount preview for the cart page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponPreview {
    /// The discount the coupon would grant on the given subtotal
    Applicable {
        /// The coupon that would be applied
        coupon_id: i64,
        /// Discount amount, already rounded
        discount: Decimal,
    },
    /// Why the coupon cannot be used
    Rejected(CouponRejection),
}

/// Finds an active coupon by code, matching case-insensitively.
pub async fn get_coupon_by_code<C>(db: &C, code: &str) -> Result<Option<coupon::Model>>
where
    C: ConnectionTrait,
{
    Coupon::find()
        .filter(
            Expr::expr(Func::upper(Expr::col(coupon::Column::Code)))
                .eq(code.trim().to_uppercase()),
        )
        .filter(coupon::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Whether the user already has a redemption recorded for the coupon.
pub async fn has_user_used_coupon<C>(db: &C, user_id: &str, coupon_id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    let used = CouponUsage::find()
        .filter(coupon_usage::Column::UserId.eq(user_id))
        .filter(coupon_usage::Column::CouponId.eq(coupon_id))
        .count(db)
        .await?;
    Ok(used > 0)
}

/// Evaluates whether `user_id` may redeem `code`, with the reason when not.
///
/// Checks, in order: the code resolves to an active coupon; the coupon is
/// currently valid (window and usage limit); the account is confirmed when
/// the coupon demands it; the user has not redeemed it before. The returned
/// evaluation is advisory - redemption re-checks the limit and the per-user
/// uniqueness under the checkout transaction.
pub async fn evaluate_coupon<C, A>(
    db: &C,
    accounts: &A,
    user_id: &str,
    code: &str,
) -> Result<CouponEvaluation>
where
    C: ConnectionTrait,
    A: AccountDirectory,
{
    let Some(found) = get_coupon_by_code(db, code).await? else {
        return Ok(CouponEvaluation::Ineligible(CouponRejection::NotFound));
    };

    if !found.is_currently_valid(Utc::now()) {
        return Ok(CouponEvaluation::Ineligible(
            CouponRejection::NotCurrentlyValid,
        ));
    }

    if found.require_confirmed_email && !accounts.is_email_confirmed(user_id).await? {
        return Ok(CouponEvaluation::Ineligible(
            CouponRejection::EmailConfirmationRequired,
        ));
    }

    if has_user_used_coupon(db, user_id, found.id).await? {
        return Ok(CouponEvaluation::Ineligible(CouponRejection::AlreadyUsed));
    }

    Ok(CouponEvaluation::Eligible(found))
}

/// Discount a coupon grants on a subtotal.
///
/// Zero when the subtotal is below the coupon's minimum order amount,
/// otherwise `subtotal * percent / 100` rounded to two digits.
#[must_use]
pub fn discount_for(coupon: &coupon::Model, sub_total: Decimal) -> Decimal {
    if let Some(minimum) = coupon.minimum_order_amount {
        if sub_total < minimum {
            return Decimal::ZERO;
        }
    }

    round_money(sub_total * coupon.discount_percent / Decimal::ONE_HUNDRED)
}

/// Previews the discount a code would grant on a subtotal, or the reason it
/// cannot be applied. This is the read-only counterpart of redemption, for
/// the cart page.
pub async fn preview_coupon<C, A>(
    db: &C,
    accounts: &A,
    user_id: &str,
    code: &str,
    sub_total: Decimal,
) -> Result<CouponPreview>
where
    C: ConnectionTrait,
    A: AccountDirectory,
{
    match evaluate_coupon(db, accounts, user_id, code).await? {
        CouponEvaluation::Eligible(found) => Ok(CouponPreview::Applicable {
            coupon_id: found.id,
            discount: discount_for(&found, sub_total),
        }),
        CouponEvaluation::Ineligible(reason) => Ok(CouponPreview::Rejected(reason)),
    }
}

/// Records a redemption: one usage row plus the guarded counter increment.
///
/// Must run inside the same transaction that creates the order, so an
/// aborted checkout leaves neither the usage row nor the increment behind.
/// The increment only succeeds while `times_used` is under the usage limit,
/// and the `(coupon_id, user_id)` unique index rejects a concurrent second
/// redemption by the same user; both failures surface as
/// [`Error::CouponNotApplicable`].
pub async fn redeem_coupon<C>(
    db: &C,
    user_id: &str,
    redeemed: &coupon::Model,
    order_id: i64,
    discount_amount: Decimal,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let updated = Coupon::update_many()
        .col_expr(
            coupon::Column::TimesUsed,
            Expr::col(coupon::Column::TimesUsed).add(1),
        )
        .filter(coupon::Column::Id.eq(redeemed.id))
        .filter(
            Condition::any()
                .add(coupon::Column::UsageLimit.is_null())
                .add(
                    Expr::col(coupon::Column::TimesUsed)
                        .lt(Expr::col(coupon::Column::UsageLimit)),
                ),
        )
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        return Err(Error::CouponNotApplicable(CouponRejection::NotCurrentlyValid));
    }

    let usage = coupon_usage::ActiveModel {
        coupon_id: Set(redeemed.id),
        user_id: Set(user_id.to_string()),
        order_id: Set(Some(order_id)),
        discount_amount: Set(discount_amount),
        used_at: Set(Utc::now()),
        ..Default::default()
    };

    match usage.insert(db).await {
        Ok(_) => {
            info!(
                coupon = %redeemed.code,
                order_id,
                user_id,
                "coupon redeemed"
            );
            Ok(())
        }
        Err(err) if is_unique_violation(&err) => {
            Err(Error::CouponNotApplicable(CouponRejection::AlreadyUsed))
        }
        Err(err) => Err(err.into()),
    }
}

/// Lists coupons that are active and inside their validity window, soonest
/// to expire first.
pub async fn get_active_coupons<C>(db: &C) -> Result<Vec<coupon::Model>>
where
    C: ConnectionTrait,
{
    let now = Utc::now();
    Coupon::find()
        .filter(coupon::Column::IsActive.eq(true))
        .filter(coupon::Column::ValidFrom.lte(now))
        .filter(coupon::Column::ValidUntil.gte(now))
        .order_by_asc(coupon::Column::ValidUntil)
        .all(db)
        .await
        .map_err(Into::into)
}
