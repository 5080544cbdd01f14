//! Participant allocator: distributes the base pool proportionally to cash
//! contributions, attaches per-head role bonuses and property shares, and
//! converts percentages into monetary values.

use crate::types::{
    Participant, ParticipantShare, Pools, ProjectEconomics, PropertyContribution, PropertyModel,
    Role, RowRole,
};

/// Outcome of the allocation step, before banner validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Rows in input order; the virtual property-owner row, if any, is last.
    pub rows: Vec<ParticipantShare>,
    /// Effective cash base the shares were derived from.
    pub cash_total: f64,
}

/// Number of participants holding each role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleCounts {
    pub developers: usize,
    pub constructors: usize,
    pub investors: usize,
}

impl RoleCounts {
    pub fn of(participants: &[Participant]) -> Self {
        let mut counts = RoleCounts::default();
        for p in participants {
            match p.role {
                Role::Developer => counts.developers += 1,
                Role::Constructor => counts.constructors += 1,
                Role::Investor => counts.investors += 1,
            }
        }
        counts
    }

    pub fn get(&self, role: Role) -> usize {
        match role {
            Role::Developer => self.developers,
            Role::Constructor => self.constructors,
            Role::Investor => self.investors,
        }
    }

    /// Equal split of the role's budget among its members; zero for an
    /// unstaffed role.
    pub fn per_head(&self, role: Role, budget_pct: f64) -> f64 {
        match self.get(role) {
            0 => 0.0,
            n => budget_pct / n as f64,
        }
    }
}

/// Cash contribution entering the base pool for one participant. Developers
/// never contribute cash, whatever payment is stored for them.
fn cash_contribution(p: &Participant) -> f64 {
    match p.role {
        Role::Developer => 0.0,
        Role::Constructor | Role::Investor => {
            if p.payment > 0.0 {
                p.payment
            } else {
                0.0
            }
        }
    }
}

/// Distribute the pools over the participant list.
pub fn allocate(
    participants: &[Participant],
    pools: &Pools,
    property: Option<&PropertyContribution>,
    economics: &ProjectEconomics,
) -> Allocation {
    let property = property.filter(|p| p.is_material());

    // Effective cash base. Under model B the property owner joins it as a
    // synthetic contributor worth `value * weight`.
    let property_contribution = match property {
        Some(p) if p.model == PropertyModel::ValuedContribution && p.value > 0.0 => {
            p.weighted_value()
        }
        _ => 0.0,
    };
    let cash_total: f64 =
        participants.iter().map(cash_contribution).sum::<f64>() + property_contribution;

    // Division by the cash base is guarded: a zero base yields zero shares
    // for everyone, never a fault. The guard is on `cash_total` alone so
    // proportionality holds independent of the base pool's sign.
    let base_share = |contribution: f64| -> f64 {
        if cash_total > 0.0 {
            contribution / cash_total * pools.base_pct
        } else {
            0.0
        }
    };

    let counts = RoleCounts::of(participants);
    let mut rows: Vec<ParticipantShare> = Vec::with_capacity(participants.len() + 1);

    for p in participants {
        let base_share_pct = base_share(cash_contribution(p));
        let role_share_pct = counts.per_head(p.role, pools.role_budget(p.role));
        let total_equity_pct = base_share_pct + role_share_pct;
        // Cash participants take profit in the same proportion as equity.
        let total_profit_pct = total_equity_pct;
        let (final_value, profit_value) = monetize(total_equity_pct, total_profit_pct, economics);
        rows.push(ParticipantShare {
            name: p.name.clone(),
            role: RowRole::from(p.role),
            payment: p.payment,
            base_share_pct,
            role_share_pct,
            property_share_pct: 0.0,
            total_equity_pct,
            total_profit_pct,
            final_value,
            profit_value,
        });
    }

    if let Some(p) = property {
        let (base_share_pct, property_share_pct, total_profit_pct) = match p.model {
            PropertyModel::NegotiatedShare => {
                // The owner takes the whole property pool. Profit
                // participation is only the profit-effective part, not the
                // negotiated equity.
                (0.0, pools.property_pct, pools.property_profit_effective_pct)
            }
            PropertyModel::ValuedContribution => {
                let base = base_share(p.weighted_value());
                (base, 0.0, clamp_profit(base, p, economics))
            }
        };
        let total_equity_pct = base_share_pct + property_share_pct;
        let (final_value, profit_value) = monetize(total_equity_pct, total_profit_pct, economics);
        rows.push(ParticipantShare {
            name: p.display_name().to_string(),
            role: RowRole::PropertyOwner,
            payment: p.value,
            base_share_pct,
            role_share_pct: 0.0,
            property_share_pct,
            total_equity_pct,
            total_profit_pct,
            final_value,
            profit_value,
        });
    }

    Allocation { rows, cash_total }
}

/// Model B profit bounds clamp the owner's computed profit percentage only;
/// no other row is rescaled. Inverted bounds are a blocking banner elsewhere
/// and leave the value untouched here.
fn clamp_profit(profit_pct: f64, p: &PropertyContribution, economics: &ProjectEconomics) -> f64 {
    if !economics.is_profitable() {
        return profit_pct;
    }
    if let (Some(min), Some(max)) = (p.profit_min_pct, p.profit_max_pct) {
        if min > max {
            return profit_pct;
        }
    }
    let mut bounded = profit_pct;
    if let Some(min) = p.profit_min_pct {
        bounded = bounded.max(min);
    }
    if let Some(max) = p.profit_max_pct {
        bounded = bounded.min(max);
    }
    bounded
}

fn monetize(equity_pct: f64, profit_pct: f64, economics: &ProjectEconomics) -> (f64, f64) {
    (
        equity_pct / 100.0 * economics.sale_price,
        profit_pct / 100.0 * economics.profit().max(0.0),
    )
}
