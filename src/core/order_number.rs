//! Order number allocator - Unique, human-readable, per-day sequences.
//!
//! Numbers look like `MDM202608060001`: a store prefix, the calendar day,
//! and a four-digit sequence that restarts at 1 each day. Allocation runs a
//! compare-and-swap loop over the `order_sequences` counter row instead of
//! scanning for the highest existing number, so two checkouts landing on the
//! same instant cannot claim the same value: one conditional update wins,
//! the other observes zero rows affected and retries on the fresh counter.

use crate::{
    entities::{OrderSequence, order_sequence},
    errors::{Error, Result, is_unique_violation},
};
use sea_orm::{ConnectionTrait, Set, prelude::*, sea_query::Expr};

/// Attempts before giving up on a pathologically contended counter.
const MAX_ATTEMPTS: u32 = 16;

/// Allocates the next order number for the day of `now`.
///
/// Safe under concurrent allocation: the sequence is claimed with a
/// conditional `UPDATE ... WHERE last_value = <seen>` (or a conditional
/// insert for the first order of the day), and the loop retries whenever
/// another allocator got there first.
///
/// # Errors
/// Returns [`Error::ConcurrencyConflict`] when every attempt lost its race.
pub async fn allocate<C>(db: &C, prefix: &str, now: DateTimeUtc) -> Result<String>
where
    C: ConnectionTrait,
{
    let day = now.format("%Y%m%d").to_string();

    for _ in 0..MAX_ATTEMPTS {
        match OrderSequence::find_by_id(day.clone()).one(db).await? {
            Some(counter) => {
                let claimed = counter.last_value + 1;
                let updated = OrderSequence::update_many()
                    .col_expr(order_sequence::Column::LastValue, Expr::value(claimed))
                    .filter(order_sequence::Column::Day.eq(day.as_str()))
                    .filter(order_sequence::Column::LastValue.eq(counter.last_value))
                    .exec(db)
                    .await?;

                if updated.rows_affected == 1 {
                    return Ok(format_order_number(prefix, &day, claimed));
                }
            }
            None => {
                let first = order_sequence::ActiveModel {
                    day: Set(day.clone()),
                    last_value: Set(1),
                };

                match first.insert(db).await {
                    Ok(_) => return Ok(format_order_number(prefix, &day, 1)),
                    // Another allocator created today's row first; retry on it
                    Err(err) if is_unique_violation(&err) => {}
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }

    Err(Error::ConcurrencyConflict)
}

/// Formats `<prefix><YYYYMMDD><4-digit sequence>`.
///
/// Sequences past 9999 widen rather than wrap, keeping numbers unique on
/// days with more orders than four digits can hold.
fn format_order_number(prefix: &str, day: &str, sequence: i64) -> String {
    format!("{prefix}{day}{sequence:04}")
}
