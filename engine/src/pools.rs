//! Pool calculator: derives the base / role / property pool split from the
//! project economics, the role bonus budgets, and the property contribution.
//!
//! Pure and total over its numeric domain: no clamping, no division, no side
//! effects. An overcommitted budget surfaces as a negative `base_pct`, which
//! the validator turns into a blocking banner.

use crate::types::{Pools, ProjectEconomics, PropertyContribution, PropertyModel, RoleBonusBudget};

/// Derive the pool split for one calculation.
///
/// A missing property contribution behaves as model A with zero value and
/// zero negotiated percentages.
pub fn derive_pools(
    economics: &ProjectEconomics,
    bonuses: &RoleBonusBudget,
    property: Option<&PropertyContribution>,
) -> Pools {
    let role_pct = bonuses.total();

    let (property_equity_pct, property_profit_effective_pct, profit_effective) = match property {
        Some(p) if p.model == PropertyModel::NegotiatedShare => {
            // The negotiated profit share only applies when there is an
            // actual property and an actual profit to share.
            let profit_effective = p.value > 0.0 && economics.is_profitable();
            let effective_pct = if profit_effective { p.profit_pct } else { 0.0 };
            (p.equity_pct, effective_pct, profit_effective)
        }
        // Model B: the property enters the base pool as cash; no carve-out.
        Some(_) => (0.0, 0.0, false),
        None => (0.0, 0.0, false),
    };

    let property_pct = property_equity_pct + property_profit_effective_pct;
    let base_pct = 100.0 - role_pct - property_pct;

    Pools {
        base_pct,
        role_pct,
        property_pct,
        developer_pct: bonuses.developer_pct,
        constructor_pct: bonuses.constructor_pct,
        investor_pct: bonuses.investor_pct,
        property_equity_pct,
        property_profit_effective_pct,
        profit_effective,
    }
}
