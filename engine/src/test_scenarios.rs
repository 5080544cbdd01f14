//! End-to-end scenarios through [`calculate`], checked against hand-computed
//! expectations and the result invariants.

use crate::invariants;
use crate::types::{
    CalculationInput, Participant, ProjectEconomics, PropertyContribution, PropertyModel, Role,
    RoleBonusBudget, RowRole, MAX_PARTICIPANTS,
};
use crate::{calculate, EngineError};

const EPS: f64 = 1e-9;

fn participant(name: &str, role: Role, payment: f64) -> Participant {
    Participant {
        name: name.to_string(),
        role,
        payment,
    }
}

fn input(
    project_cost: f64,
    sale_price: f64,
    bonuses: RoleBonusBudget,
    property: Option<PropertyContribution>,
    participants: Vec<Participant>,
) -> CalculationInput {
    CalculationInput {
        economics: ProjectEconomics {
            project_cost,
            sale_price,
        },
        bonuses,
        property,
        participants,
    }
}

fn negotiated(value: f64, equity_pct: f64, profit_pct: f64) -> PropertyContribution {
    PropertyContribution {
        owner_name: "Olive".to_string(),
        value,
        model: PropertyModel::NegotiatedShare,
        equity_pct,
        profit_pct,
        weight: 1.0,
        profit_min_pct: None,
        profit_max_pct: None,
    }
}

fn valued(value: f64, weight: f64) -> PropertyContribution {
    PropertyContribution {
        owner_name: "Olive".to_string(),
        value,
        model: PropertyModel::ValuedContribution,
        equity_pct: 0.0,
        profit_pct: 0.0,
        weight,
        profit_min_pct: None,
        profit_max_pct: None,
    }
}

fn row<'a>(result: &'a crate::CalculationResult, name: &str) -> &'a crate::ParticipantShare {
    result
        .per_participant
        .iter()
        .find(|r| r.name == name)
        .unwrap_or_else(|| panic!("no row named {name}"))
}

#[test]
fn developer_and_investor_split() {
    let bonuses = RoleBonusBudget {
        developer_pct: 10.0,
        investor_pct: 5.0,
        ..Default::default()
    };
    let result = calculate(&input(
        100_000.0,
        150_000.0,
        bonuses,
        None,
        vec![
            participant("Dana", Role::Developer, 0.0),
            participant("Ivan", Role::Investor, 50_000.0),
        ],
    ))
    .unwrap();

    assert_eq!(result.pools.role_pct, 15.0);
    assert_eq!(result.pools.base_pct, 85.0);

    let investor = row(&result, "Ivan");
    assert!((investor.base_share_pct - 85.0).abs() < EPS);
    assert_eq!(investor.role_share_pct, 5.0);
    assert!((investor.total_equity_pct - 90.0).abs() < EPS);
    assert!((investor.final_value - 135_000.0).abs() < EPS);
    assert!((investor.profit_value - 45_000.0).abs() < EPS);

    let developer = row(&result, "Dana");
    assert!((developer.total_equity_pct - 10.0).abs() < EPS);

    assert!(result.banners.errors.is_empty());
    invariants::assert_all(&result);
}

#[test]
fn full_role_budget_is_not_an_error() {
    let bonuses = RoleBonusBudget {
        developer_pct: 10.0,
        investor_pct: 90.0,
        ..Default::default()
    };
    let result = calculate(&input(
        100_000.0,
        150_000.0,
        bonuses,
        None,
        vec![
            participant("Dana", Role::Developer, 0.0),
            participant("Ivan", Role::Investor, 50_000.0),
        ],
    ))
    .unwrap();

    assert_eq!(result.pools.role_pct, 100.0);
    assert_eq!(result.pools.base_pct, 0.0);
    assert!(result.banners.errors.is_empty());
    assert!((result.totals.total_equity_pct_sum - 100.0).abs() < EPS);
    invariants::assert_all(&result);
}

#[test]
fn overcommitted_budget_is_flagged_but_still_computed() {
    let bonuses = RoleBonusBudget {
        developer_pct: 60.0,
        constructor_pct: 30.0,
        investor_pct: 20.0,
    };
    let result = calculate(&input(
        100_000.0,
        150_000.0,
        bonuses,
        None,
        vec![
            participant("Dana", Role::Developer, 0.0),
            participant("Carl", Role::Constructor, 20_000.0),
            participant("Ivan", Role::Investor, 30_000.0),
        ],
    ))
    .unwrap();

    // Fail-soft: the full structure is returned alongside the error.
    assert!(result.banners.is_blocking());
    assert!(result.banners.errors[0].contains("exceeds 100%"));
    assert_eq!(result.pools.base_pct, -10.0);
    assert_eq!(result.per_participant.len(), 3);

    // Proportionality holds even with a negative base pool.
    invariants::assert_base_shares_proportional(&result);
    let carl = row(&result, "Carl");
    let ivan = row(&result, "Ivan");
    assert!(carl.base_share_pct < 0.0);
    assert!((carl.base_share_pct / ivan.base_share_pct - 2.0 / 3.0).abs() < 1e-6);
}

#[test]
fn valued_property_splits_base_pool_evenly() {
    let result = calculate(&input(
        100_000.0,
        150_000.0,
        RoleBonusBudget::default(),
        Some(valued(50_000.0, 1.0)),
        vec![participant("Ivan", Role::Investor, 50_000.0)],
    ))
    .unwrap();

    assert_eq!(result.pools.base_pct, 100.0);
    assert_eq!(result.pools.property_pct, 0.0);
    assert_eq!(result.totals.cash_total, 100_000.0);

    let investor = row(&result, "Ivan");
    let owner = row(&result, "Olive");
    assert!((investor.base_share_pct - 50.0).abs() < EPS);
    assert!((owner.base_share_pct - 50.0).abs() < EPS);
    assert_eq!(owner.role, RowRole::PropertyOwner);
    invariants::assert_all(&result);
}

#[test]
fn negotiated_property_with_profit() {
    let bonuses = RoleBonusBudget {
        investor_pct: 40.0,
        ..Default::default()
    };
    let result = calculate(&input(
        10_000.0,
        20_000.0,
        bonuses,
        Some(negotiated(5_000.0, 10.0, 5.0)),
        vec![participant("Ivan", Role::Investor, 10_000.0)],
    ))
    .unwrap();

    assert_eq!(result.pools.property_pct, 15.0);
    assert_eq!(result.pools.base_pct, 45.0);

    let owner = row(&result, "Olive");
    assert!((owner.total_equity_pct - 15.0).abs() < EPS);
    // Profit participation is the negotiated profit share only.
    assert!((owner.total_profit_pct - 5.0).abs() < EPS);

    let investor = row(&result, "Ivan");
    assert!((investor.base_share_pct - 45.0).abs() < EPS);
    assert!((investor.total_equity_pct - 85.0).abs() < EPS);

    assert!((result.totals.total_equity_pct_sum - 100.0).abs() < EPS);
    invariants::assert_all(&result);
}

#[test]
fn increasing_developer_bonus_monotonically_erodes_the_base_pool() {
    let mut previous_base = f64::INFINITY;
    for developer_pct in [0.0, 30.0, 60.0, 90.0, 105.0] {
        let bonuses = RoleBonusBudget {
            developer_pct,
            ..Default::default()
        };
        let result = calculate(&input(
            100_000.0,
            150_000.0,
            bonuses,
            None,
            vec![
                participant("Dana", Role::Developer, 0.0),
                participant("Ivan", Role::Investor, 50_000.0),
            ],
        ))
        .unwrap();

        assert!(result.pools.base_pct < previous_base);
        previous_base = result.pools.base_pct;

        if developer_pct > 100.0 {
            assert!(result.banners.is_blocking());
        } else {
            assert!(result.banners.errors.is_empty());
        }
    }
}

#[test]
fn developers_only_strand_the_base_pool() {
    let bonuses = RoleBonusBudget {
        developer_pct: 40.0,
        ..Default::default()
    };
    let result = calculate(&input(
        10_000.0,
        15_000.0,
        bonuses,
        None,
        vec![
            participant("Dana", Role::Developer, 0.0),
            participant("Dirk", Role::Developer, 0.0),
        ],
    ))
    .unwrap();

    assert_eq!(result.totals.cash_total, 0.0);
    for r in &result.per_participant {
        assert_eq!(r.base_share_pct, 0.0);
        assert_eq!(r.role_share_pct, 20.0);
    }
    assert!(result
        .banners
        .warnings
        .iter()
        .any(|w| w.contains("cannot be distributed")));
    invariants::assert_all(&result);
}

#[test]
fn profit_bound_clamp_is_flagged_assumption_owner_only() {
    // The min/max bounds act on the property owner's computed profit share
    // alone; the other rows keep their proportional shares and no
    // redistribution takes place.
    let mut property = valued(50_000.0, 1.0);
    property.profit_min_pct = Some(10.0);
    property.profit_max_pct = Some(30.0);

    let result = calculate(&input(
        100_000.0,
        150_000.0,
        RoleBonusBudget::default(),
        Some(property),
        vec![participant("Ivan", Role::Investor, 50_000.0)],
    ))
    .unwrap();

    let owner = row(&result, "Olive");
    let investor = row(&result, "Ivan");
    assert!((owner.total_equity_pct - 50.0).abs() < EPS);
    assert!((owner.total_profit_pct - 30.0).abs() < EPS);
    assert!((investor.total_profit_pct - 50.0).abs() < EPS);
    // Equity still reconciles; only the profit column is clamped.
    assert!((result.totals.total_equity_pct_sum - 100.0).abs() < EPS);
    assert!((result.totals.total_profit_pct_sum - 80.0).abs() < EPS);
}

#[test]
fn inverted_profit_bounds_error_and_skip_clamping() {
    let mut property = valued(50_000.0, 1.0);
    property.profit_min_pct = Some(40.0);
    property.profit_max_pct = Some(20.0);

    let result = calculate(&input(
        100_000.0,
        150_000.0,
        RoleBonusBudget::default(),
        Some(property),
        vec![participant("Ivan", Role::Investor, 50_000.0)],
    ))
    .unwrap();

    assert!(result.banners.is_blocking());
    assert!(result.banners.errors[0].contains("profit bounds"));
    let owner = row(&result, "Olive");
    assert!((owner.total_profit_pct - 50.0).abs() < EPS);
}

#[test]
fn unprofitable_project_zeroes_profit_values() {
    let result = calculate(&input(
        150_000.0,
        100_000.0,
        RoleBonusBudget::default(),
        None,
        vec![participant("Ivan", Role::Investor, 50_000.0)],
    ))
    .unwrap();

    assert_eq!(result.totals.profit, -50_000.0);
    for r in &result.per_participant {
        assert_eq!(r.profit_value, 0.0);
    }
    invariants::assert_all(&result);
}

#[test]
fn empty_participant_list_computes_to_nothing() {
    let result = calculate(&input(
        10_000.0,
        15_000.0,
        RoleBonusBudget::default(),
        None,
        vec![],
    ))
    .unwrap();

    assert!(result.per_participant.is_empty());
    assert_eq!(result.totals.cash_total, 0.0);
    assert!(result.banners.errors.is_empty());
}

#[test]
fn participant_cap_is_a_structural_fault() {
    let participants: Vec<Participant> = (0..=MAX_PARTICIPANTS)
        .map(|i| participant(&format!("P{i}"), Role::Investor, 1_000.0))
        .collect();
    let err = calculate(&input(
        10_000.0,
        15_000.0,
        RoleBonusBudget::default(),
        None,
        participants,
    ))
    .unwrap_err();

    assert_eq!(
        err,
        EngineError::TooManyParticipants {
            count: MAX_PARTICIPANTS + 1,
            max: MAX_PARTICIPANTS,
        }
    );
}

#[test]
fn invariants_hold_across_mixed_inputs() {
    let cases = vec![
        input(
            100_000.0,
            150_000.0,
            RoleBonusBudget {
                developer_pct: 10.0,
                constructor_pct: 8.0,
                investor_pct: 40.0,
            },
            None,
            vec![
                participant("Dana", Role::Developer, 0.0),
                participant("Carl", Role::Constructor, 3_000.0),
                participant("Ivan", Role::Investor, 5_000.0),
                participant("Iris", Role::Investor, 2_000.0),
            ],
        ),
        input(
            50_000.0,
            45_000.0,
            RoleBonusBudget {
                developer_pct: 20.0,
                ..Default::default()
            },
            Some(negotiated(10_000.0, 12.0, 6.0)),
            vec![
                participant("Dana", Role::Developer, 0.0),
                participant("Ivan", Role::Investor, 40_000.0),
            ],
        ),
        input(
            80_000.0,
            120_000.0,
            RoleBonusBudget {
                constructor_pct: 15.0,
                ..Default::default()
            },
            Some(valued(30_000.0, 1.5)),
            vec![
                participant("Carl", Role::Constructor, 25_000.0),
                participant("Cora", Role::Constructor, 25_000.0),
            ],
        ),
        input(0.0, 0.0, RoleBonusBudget::default(), None, vec![]),
    ];

    for case in &cases {
        let result = calculate(case).unwrap();
        invariants::assert_all(&result);
    }
}
