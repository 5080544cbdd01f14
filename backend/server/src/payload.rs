//! Wire payload types for the calculation API.
//!
//! Numeric fields arrive as JSON numbers or decimal strings; anything
//! unparseable or missing is coerced to zero rather than rejected. Only
//! structural problems are request-level faults: a missing participant list,
//! or a participant row without a role. Rows without a non-empty name are
//! skipped entirely.
//!
//! This module is also the presentation boundary: response values are rounded
//! to two decimals here and nowhere else.

use serde::{Deserialize, Deserializer, Serialize};

use share_engine::{
    Banners, CalculationInput, CalculationResult, Participant, ProjectEconomics,
    PropertyContribution, PropertyModel, Role, RoleBonusBudget, RowRole,
};

use crate::errors::{Result, ServerError};

// ─────────────────────────────────────────────────────────
// Lenient numeric parsing
// ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawNumber {
    fn parse(self) -> Option<f64> {
        match self {
            RawNumber::Number(n) if n.is_finite() => Some(n),
            RawNumber::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            _ => None,
        }
    }
}

/// Number, decimal string, or anything else; invalid or missing becomes 0.
fn lenient_f64<'de, D>(de: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(de)?;
    Ok(raw.and_then(RawNumber::parse).unwrap_or(0.0))
}

/// Like [`lenient_f64`] but keeps "absent" distinct from zero.
fn lenient_opt_f64<'de, D>(de: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(de)?;
    Ok(raw.and_then(RawNumber::parse))
}

// ─────────────────────────────────────────────────────────
// Request shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CalcRequest {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub project_cost: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sale_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub developer_bonus_pct: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub constructor_bonus_pct: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub investor_bonus_pct: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub property_value: f64,
    #[serde(default)]
    pub property_owner_name: String,
    /// "A" (negotiated share) or "B" (valued contribution); anything else
    /// falls back to "A".
    #[serde(default)]
    pub property_model: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub property_equity_pct: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub property_profit_pct: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub property_weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub property_profit_min_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub property_profit_max_pct: Option<f64>,
    /// Required: a payload without a participant list is structurally invalid.
    pub participants: Vec<ParticipantRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantRow {
    #[serde(default)]
    pub name: String,
    /// Required: a row without a recognised role is structurally invalid.
    pub role: Role,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub payment: f64,
}

/// Deserialize the raw JSON body into a [`CalcRequest`], mapping structural
/// problems to a request-level fault.
pub fn parse_request(body: serde_json::Value) -> Result<CalcRequest> {
    serde_json::from_value(body).map_err(|e| ServerError::Payload(e.to_string()))
}

impl CalcRequest {
    /// Convert the wire payload into engine input.
    ///
    /// Selecting a property model zeroes the fields meaningful only to the
    /// other one; money amounts are floored at zero.
    pub fn into_input(self) -> CalculationInput {
        let model = match self.property_model.as_deref().map(str::trim) {
            Some(m) if m.eq_ignore_ascii_case("b") => PropertyModel::ValuedContribution,
            _ => PropertyModel::NegotiatedShare,
        };

        let property = match model {
            PropertyModel::NegotiatedShare => PropertyContribution {
                owner_name: self.property_owner_name.trim().to_string(),
                value: self.property_value.max(0.0),
                model,
                equity_pct: self.property_equity_pct,
                profit_pct: self.property_profit_pct,
                weight: 1.0,
                profit_min_pct: None,
                profit_max_pct: None,
            },
            PropertyModel::ValuedContribution => PropertyContribution {
                owner_name: self.property_owner_name.trim().to_string(),
                value: self.property_value.max(0.0),
                model,
                equity_pct: 0.0,
                profit_pct: 0.0,
                weight: self.property_weight.unwrap_or(1.0).max(0.0),
                profit_min_pct: self.property_profit_min_pct,
                profit_max_pct: self.property_profit_max_pct,
            },
        };

        let participants = self
            .participants
            .into_iter()
            .filter_map(|row| {
                let name = row.name.trim().to_string();
                if name.is_empty() {
                    return None;
                }
                let payment = match row.role {
                    Role::Developer => 0.0,
                    Role::Constructor | Role::Investor => row.payment.max(0.0),
                };
                Some(Participant {
                    name,
                    role: row.role,
                    payment,
                })
            })
            .collect();

        CalculationInput {
            economics: ProjectEconomics {
                project_cost: self.project_cost.max(0.0),
                sale_price: self.sale_price.max(0.0),
            },
            bonuses: RoleBonusBudget {
                developer_pct: self.developer_bonus_pct,
                constructor_pct: self.constructor_bonus_pct,
                investor_pct: self.investor_bonus_pct,
            },
            property: Some(property),
            participants,
        }
    }
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolsOut {
    pub base_pct: f64,
    pub role_pct: f64,
    pub property_pct: f64,
    pub developer_pct: f64,
    pub constructor_pct: f64,
    pub investor_pct: f64,
    pub property_equity_pct: f64,
    pub property_profit_effective_pct: f64,
    pub profit_effective: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalsOut {
    pub project_cost: f64,
    pub sale_price: f64,
    pub profit: f64,
    pub cash_total: f64,
    pub total_equity_pct_sum: f64,
    pub total_profit_pct_sum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowOut {
    pub name: String,
    pub role: RowRole,
    pub payment: f64,
    pub base_share_pct: f64,
    pub role_share_pct: f64,
    pub property_share_pct: f64,
    pub total_equity_pct: f64,
    pub total_profit_pct: f64,
    pub final_value: f64,
    pub profit_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcResponse {
    pub pools: PoolsOut,
    pub totals: TotalsOut,
    pub results: Vec<RowOut>,
    pub banners: Banners,
}

/// Round half away from zero to two decimals.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

impl CalcResponse {
    pub fn from_result(result: &CalculationResult) -> Self {
        CalcResponse {
            pools: PoolsOut {
                base_pct: round2(result.pools.base_pct),
                role_pct: round2(result.pools.role_pct),
                property_pct: round2(result.pools.property_pct),
                developer_pct: round2(result.pools.developer_pct),
                constructor_pct: round2(result.pools.constructor_pct),
                investor_pct: round2(result.pools.investor_pct),
                property_equity_pct: round2(result.pools.property_equity_pct),
                property_profit_effective_pct: round2(
                    result.pools.property_profit_effective_pct,
                ),
                profit_effective: result.pools.profit_effective,
            },
            totals: TotalsOut {
                project_cost: round2(result.totals.project_cost),
                sale_price: round2(result.totals.sale_price),
                profit: round2(result.totals.profit),
                cash_total: round2(result.totals.cash_total),
                total_equity_pct_sum: round2(result.totals.total_equity_pct_sum),
                total_profit_pct_sum: round2(result.totals.total_profit_pct_sum),
            },
            results: result
                .per_participant
                .iter()
                .map(|r| RowOut {
                    name: r.name.clone(),
                    role: r.role,
                    payment: round2(r.payment),
                    base_share_pct: round2(r.base_share_pct),
                    role_share_pct: round2(r.role_share_pct),
                    property_share_pct: round2(r.property_share_pct),
                    total_equity_pct: round2(r.total_equity_pct),
                    total_profit_pct: round2(r.total_profit_pct),
                    final_value: round2(r.final_value),
                    profit_value: round2(r.profit_value),
                })
                .collect(),
            banners: result.banners.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
