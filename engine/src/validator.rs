//! Validator / banner generator: turns the derived pools and allocation into
//! the ordered set of blocking errors and advisory warnings.
//!
//! Every rule is evaluated; nothing short-circuits. Errors mean the result
//! must not be displayed as a table; warnings never block computation or
//! display.

use crate::allocator::RoleCounts;
use crate::types::{
    Banners, Participant, Pools, ProjectEconomics, PropertyContribution, PropertyModel, Role,
};

/// Tolerance for floating-point comparisons against the 100% budget.
const BUDGET_EPS: f64 = 1e-9;

/// Per-person role share above which the advisory warning fires.
const HIGH_SHARE_PCT: f64 = 50.0;

/// Base pool percentage below which the pool counts as nearly exhausted.
const LOW_BASE_POOL_PCT: f64 = 5.0;

/// Property weight above which the advisory warning fires.
const HIGH_WEIGHT: f64 = 2.0;

/// Produce the ordered banners for one calculation.
pub fn validate(
    pools: &Pools,
    participants: &[Participant],
    property: Option<&PropertyContribution>,
    economics: &ProjectEconomics,
    cash_total: f64,
) -> Banners {
    let mut banners = Banners::default();

    // Blocking: the fixed pools overcommit the 100% total.
    let committed = pools.role_pct + pools.property_pct;
    if committed > 100.0 + BUDGET_EPS {
        let excess = committed - 100.0;
        if pools.property_pct > 0.0 {
            banners.errors.push(format!(
                "Share budget exceeds 100% by {excess:.2}%. Reduce role pools ({:.2}%) or the property pool ({:.2}%).",
                pools.role_pct, pools.property_pct
            ));
        } else {
            banners.errors.push(format!(
                "Share budget exceeds 100% by {excess:.2}%. Reduce role pools ({:.2}%).",
                pools.role_pct
            ));
        }
    }

    // Blocking: inverted model B profit bounds.
    if let Some(p) = property {
        if p.model == PropertyModel::ValuedContribution {
            if let (Some(min), Some(max)) = (p.profit_min_pct, p.profit_max_pct) {
                if min > max {
                    banners.errors.push(format!(
                        "Property profit bounds are invalid: min ({min:.2}%) is greater than max ({max:.2}%)."
                    ));
                }
            }
        }
    }

    // Advisory: a base pool exists on paper but nobody can receive it.
    if pools.base_pct > 0.0 && cash_total <= 0.0 {
        banners.warnings.push(
            "Base pool cannot be distributed: no cash contributors. Only role and property pools apply."
                .to_string(),
        );
    }

    // Advisory: a single member of a role would take more than half of total
    // equity.
    let counts = RoleCounts::of(participants);
    for role in Role::ALL {
        if counts.get(role) > 0 {
            let per_head = counts.per_head(role, pools.role_budget(role));
            if per_head > HIGH_SHARE_PCT {
                banners.warnings.push(format!(
                    "{} bonus grants {per_head:.2}% per person, more than half of total equity.",
                    role.as_str()
                ));
            }
        }
    }

    // Advisory: the fixed budgets consume nearly the whole equity.
    if pools.base_pct > 0.0 && pools.base_pct < LOW_BASE_POOL_PCT {
        banners.warnings.push(format!(
            "Base pool is down to {:.2}%; role and property budgets consume nearly the whole equity.",
            pools.base_pct
        ));
    }

    if let Some(p) = property {
        match p.model {
            PropertyModel::NegotiatedShare => {
                // Advisory: a negotiated profit share that cannot apply.
                if p.value > 0.0 && p.profit_pct > 0.0 && !economics.is_profitable() {
                    banners.warnings.push(
                        "Project is not profitable; the profit-based property share is 0%."
                            .to_string(),
                    );
                }
            }
            PropertyModel::ValuedContribution => {
                if !p.owner_name.trim().is_empty() && p.value <= 0.0 {
                    banners.warnings.push(
                        "Property owner name provided but the property value is 0 or missing."
                            .to_string(),
                    );
                }
                if p.weight > HIGH_WEIGHT {
                    banners.warnings.push(format!(
                        "Property weight ({:.2}) is above the recommended range (0.5 to 2.0).",
                        p.weight
                    ));
                }
            }
        }
    }

    // Advisory: contributions do not cover the project cost.
    if economics.project_cost > 0.0 && cash_total < economics.project_cost {
        let missing = economics.project_cost - cash_total;
        banners.warnings.push(format!(
            "Cash contributions ({cash_total:.2}) are less than the project cost ({:.2}); {missing:.2} more is needed.",
            economics.project_cost
        ));
    }

    banners
}
