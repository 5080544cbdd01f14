//! # Share Engine
//!
//! Pure allocation engine that partitions 100% of a project's equity (and,
//! separately, 100% of any profit) among a variable set of participants in
//! fixed roles, plus an optional non-participant property contribution.
//!
//! | Stage                      | Module        |
//! |----------------------------|---------------|
//! | Pool derivation            | [`pools`]     |
//! | Per-participant allocation | [`allocator`] |
//! | Banner validation          | [`validator`] |
//! | Shared data model          | [`types`]     |
//!
//! ## Architecture
//!
//! [`calculate`] is the single entry point: inputs flow through the pool
//! calculator, the participant allocator, and the validator into one
//! immutable [`CalculationResult`]. Every stage is a pure function over its
//! inputs; the engine holds no state between invocations, performs no I/O,
//! never blocks, and completes in O(participant count). It is safe to call
//! concurrently from independent requests with no cross-talk.
//!
//! Business-rule violations are data, not faults: the engine computes the
//! full structure and attaches blocking errors / advisory warnings as
//! [`Banners`]. Only structural precondition violations, currently the
//! participant cap, return an [`EngineError`].

pub mod allocator;
pub mod pools;
pub mod types;
pub mod validator;

#[cfg(test)]
mod test_scenarios;

use thiserror::Error;

pub use types::{
    Banners, CalculationInput, CalculationResult, Participant, ParticipantShare, Pools,
    ProjectEconomics, PropertyContribution, PropertyModel, Role, RoleBonusBudget, RowRole, Totals,
    MAX_PARTICIPANTS,
};

/// Structural precondition violations.
///
/// Distinct from business-rule banners: an `EngineError` is a request-level
/// fault and never part of a [`CalculationResult`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("too many participants: {count} exceeds the cap of {max}")]
    TooManyParticipants { count: usize, max: usize },
}

/// Run one full calculation over the given input.
pub fn calculate(input: &CalculationInput) -> Result<CalculationResult, EngineError> {
    if input.participants.len() > MAX_PARTICIPANTS {
        return Err(EngineError::TooManyParticipants {
            count: input.participants.len(),
            max: MAX_PARTICIPANTS,
        });
    }

    let pools = pools::derive_pools(&input.economics, &input.bonuses, input.property.as_ref());
    let allocation = allocator::allocate(
        &input.participants,
        &pools,
        input.property.as_ref(),
        &input.economics,
    );
    let banners = validator::validate(
        &pools,
        &input.participants,
        input.property.as_ref(),
        &input.economics,
        allocation.cash_total,
    );

    let totals = Totals {
        project_cost: input.economics.project_cost,
        sale_price: input.economics.sale_price,
        profit: input.economics.profit(),
        cash_total: allocation.cash_total,
        total_equity_pct_sum: allocation.rows.iter().map(|r| r.total_equity_pct).sum(),
        total_profit_pct_sum: allocation.rows.iter().map(|r| r.total_profit_pct).sum(),
    };

    Ok(CalculationResult {
        pools,
        totals,
        per_participant: allocation.rows,
        banners,
    })
}
