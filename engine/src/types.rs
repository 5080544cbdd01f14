//! # Types
//!
//! Shared data structures used across the allocation engine.
//!
//! ## Design decisions
//!
//! ### Roles as closed enumerations
//!
//! Participant roles form a fixed three-variant enum ([`Role`]). The property
//! owner is not a [`Participant`] but a virtual result row, so result rows
//! carry the wider [`RowRole`] enum instead. Every role branch in the engine
//! is an exhaustive `match`, which makes adding or removing a role a
//! compile-time-checked change.
//!
//! ### Precision boundary
//!
//! All percentages and monetary amounts are `f64` and accumulate at full
//! precision. Rounding to two decimals is a presentation concern and happens
//! only at the serialization boundary, so the sum of displayed rounded values
//! may differ from the displayed total by at most one cent.

use serde::{Deserialize, Serialize};

/// Engine-level cap on the number of participants per calculation.
pub const MAX_PARTICIPANTS: usize = 20;

/// Fixed role of a cash participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Developer,
    Constructor,
    Investor,
}

impl Role {
    /// All participant roles, in display order.
    pub const ALL: [Role; 3] = [Role::Developer, Role::Constructor, Role::Investor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Developer => "Developer",
            Role::Constructor => "Constructor",
            Role::Investor => "Investor",
        }
    }
}

/// Role attached to a result row. Extends [`Role`] with the virtual
/// property-owner row, which never appears in the participant list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowRole {
    Developer,
    Constructor,
    Investor,
    #[serde(rename = "Property Owner")]
    PropertyOwner,
}

impl RowRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowRole::Developer => "Developer",
            RowRole::Constructor => "Constructor",
            RowRole::Investor => "Investor",
            RowRole::PropertyOwner => "Property Owner",
        }
    }
}

impl From<Role> for RowRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Developer => RowRole::Developer,
            Role::Constructor => RowRole::Constructor,
            Role::Investor => RowRole::Investor,
        }
    }
}

/// A cash participant in the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Non-empty display name.
    pub name: String,
    pub role: Role,
    /// Cash contribution. Stored for Developers too, but forced to zero at
    /// the payload boundary and always ignored by pool math.
    pub payment: f64,
}

/// Which of the two mutually exclusive property-contribution models applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropertyModel {
    /// Model A: the owner receives a negotiated fixed equity/profit share,
    /// independent of the property's market value.
    #[default]
    #[serde(rename = "A")]
    NegotiatedShare,
    /// Model B: the property value enters the base pool like cash, scaled by
    /// a weight multiplier.
    #[serde(rename = "B")]
    ValuedContribution,
}

/// A non-participant property contribution (at most one per calculation).
///
/// Selecting a model zeroes out the fields meaningful only to the other one;
/// the payload boundary enforces that before the engine runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyContribution {
    /// May be empty; presented under a generic label in that case.
    pub owner_name: String,
    /// Market value of the contributed property.
    pub value: f64,
    pub model: PropertyModel,
    /// Model A: fixed percentage of total equity.
    pub equity_pct: f64,
    /// Model A: fixed percentage of total profit, applied only when the
    /// project is profitable.
    pub profit_pct: f64,
    /// Model B: multiplier scaling `value` before it enters the base pool.
    pub weight: f64,
    /// Model B: optional lower bound on the owner's profit percentage.
    pub profit_min_pct: Option<f64>,
    /// Model B: optional upper bound on the owner's profit percentage.
    pub profit_max_pct: Option<f64>,
}

impl PropertyContribution {
    /// Display name used for the result row and in banners.
    pub fn display_name(&self) -> &str {
        let trimmed = self.owner_name.trim();
        if trimmed.is_empty() {
            "Property Owner"
        } else {
            trimmed
        }
    }

    /// Whether the contribution produces a result row at all.
    pub fn is_material(&self) -> bool {
        match self.model {
            PropertyModel::NegotiatedShare => {
                self.value > 0.0 || self.equity_pct > 0.0 || self.profit_pct > 0.0
            }
            PropertyModel::ValuedContribution => self.value > 0.0,
        }
    }

    /// Effective cash-like contribution under model B.
    pub fn weighted_value(&self) -> f64 {
        self.value * self.weight
    }
}

/// Project cost and sale price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectEconomics {
    pub project_cost: f64,
    pub sale_price: f64,
}

impl ProjectEconomics {
    /// May be negative or zero: the project is then not profitable.
    pub fn profit(&self) -> f64 {
        self.sale_price - self.project_cost
    }

    pub fn is_profitable(&self) -> bool {
        self.profit() > 0.0
    }
}

/// Percentage of total equity reserved per role, split equally among the
/// role's members (never proportional to payment).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RoleBonusBudget {
    pub developer_pct: f64,
    pub constructor_pct: f64,
    pub investor_pct: f64,
}

impl RoleBonusBudget {
    pub fn for_role(&self, role: Role) -> f64 {
        match role {
            Role::Developer => self.developer_pct,
            Role::Constructor => self.constructor_pct,
            Role::Investor => self.investor_pct,
        }
    }

    pub fn total(&self) -> f64 {
        self.developer_pct + self.constructor_pct + self.investor_pct
    }
}

/// Complete input of one calculation, constructed fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub economics: ProjectEconomics,
    pub bonuses: RoleBonusBudget,
    pub property: Option<PropertyContribution>,
    pub participants: Vec<Participant>,
}

/// Derived pool percentages.
///
/// `base_pct` is not clamped and may be negative when the role and property
/// budgets overcommit the 100% total; the validator turns that into a
/// blocking banner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pools {
    pub base_pct: f64,
    pub role_pct: f64,
    pub property_pct: f64,
    /// Per-role breakdown of `role_pct`.
    pub developer_pct: f64,
    pub constructor_pct: f64,
    pub investor_pct: f64,
    /// Model A: negotiated equity portion of `property_pct`.
    pub property_equity_pct: f64,
    /// Model A: profit portion of `property_pct`; zero when the project is
    /// not profitable or the property has no value.
    pub property_profit_effective_pct: f64,
    /// Whether the profit-based property share applies.
    pub profit_effective: bool,
}

impl Pools {
    /// Budget reserved for one role.
    pub fn role_budget(&self, role: Role) -> f64 {
        match role {
            Role::Developer => self.developer_pct,
            Role::Constructor => self.constructor_pct,
            Role::Investor => self.investor_pct,
        }
    }
}

/// Allocation outcome for a single result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantShare {
    pub name: String,
    pub role: RowRole,
    pub payment: f64,
    pub base_share_pct: f64,
    pub role_share_pct: f64,
    pub property_share_pct: f64,
    pub total_equity_pct: f64,
    pub total_profit_pct: f64,
    /// `total_equity_pct` applied to the sale price.
    pub final_value: f64,
    /// `total_profit_pct` applied to the profit, floored at zero.
    pub profit_value: f64,
}

/// Project-level aggregates of one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub project_cost: f64,
    pub sale_price: f64,
    /// Raw `sale_price - project_cost`; negative when the project loses money.
    pub profit: f64,
    /// Effective cash base: qualifying payments plus, under model B, the
    /// weighted property value.
    pub cash_total: f64,
    pub total_equity_pct_sum: f64,
    pub total_profit_pct_sum: f64,
}

/// User-facing banners attached to a result.
///
/// Errors render the result non-authoritative: the presentation layer must
/// suppress the table and show only the banners. Warnings are advisory and
/// never block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Banners {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Banners {
    pub fn is_blocking(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Immutable outcome of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub pools: Pools,
    pub totals: Totals,
    /// Input order, with the virtual property-owner row last.
    pub per_participant: Vec<ParticipantShare>,
    pub banners: Banners,
}
