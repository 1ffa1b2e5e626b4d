//! Scenario tests for the projection engine
//!
//! Tests are organized by topic:
//! - `projection` - Deterministic year-by-year projection of a household
//! - `successions` - Deaths, ownership transfers and inheritance taxes
//! - `monte_carlo` - Random batches, statistics and replay
//! - `reporting` - CSV and chart output of complete runs

mod monte_carlo;
mod projection;

use jiff::civil::date;

use crate::assets::{
    Assets, FreeInvestment, InterestRate, InvestmentState, InvestmentType, Patrimoine,
    RealEstateAsset,
};
use crate::config::{AdultBuilder, ChildBuilder, Model, ModelConfig, Scenario};
use crate::expense::{LifeExpense, LifeExpenses, TimeSpan};
use crate::model::{Kpi, KpiKind};
use crate::ownership::{LifeInsuranceClause, Owner, Ownership};
use crate::person::{Family, Sex};

pub(crate) const FIRST_YEAR: i32 = 2030;

/// Retired couple with two grown-up children, a house held jointly, savings
/// and a life-insurance contract for the children.
///
/// Lionel dies in 2040 and Vanessa in 2052 with the configured ages.
pub(crate) fn household() -> Scenario {
    Scenario {
        family: Family::from_members(vec![
            AdultBuilder::new("Lionel", Sex::Male, date(1960, 3, 1))
                .age_of_death(80)
                .build(),
            AdultBuilder::new("Vanessa", Sex::Female, date(1962, 6, 1))
                .age_of_death(90)
                .build(),
            ChildBuilder::new("Arthur", Sex::Male, date(1990, 9, 1)).build(),
            ChildBuilder::new("Lou", Sex::Female, date(1993, 2, 1)).build(),
        ])
        .unwrap(),
        patrimoine: Patrimoine {
            assets: Assets {
                real_estates: vec![RealEstateAsset {
                    name: "House".to_string(),
                    ownership: Ownership::Undismembered {
                        full_owners: vec![Owner::new("Lionel", 50.0), Owner::new("Vanessa", 50.0)],
                    },
                    buying_year: 2000,
                    buying_price: 250_000.0,
                    estimated_value: 400_000.0,
                    selling_year: None,
                    selling_price: None,
                    is_inhabited: true,
                    rental: None,
                    yearly_local_taxes: 2_000.0,
                }],
                free_investments: vec![
                    FreeInvestment::new(
                        "Savings",
                        Ownership::full("Vanessa"),
                        InvestmentType::Other,
                        InterestRate::Market { stock_ratio: 0.3 },
                        InvestmentState {
                            investment: 1_500_000.0,
                            interest: 0.0,
                        },
                    ),
                    FreeInvestment::new(
                        "Life insurance",
                        Ownership::full("Lionel"),
                        InvestmentType::LifeInsurance {
                            clause: LifeInsuranceClause::full(vec![
                                Owner::new("Arthur", 50.0),
                                Owner::new("Lou", 50.0),
                            ]),
                            opening_date: Some(date(2010, 1, 1)),
                        },
                        InterestRate::Market { stock_ratio: 0.5 },
                        InvestmentState {
                            investment: 300_000.0,
                            interest: 50_000.0,
                        },
                    ),
                ],
                ..Default::default()
            },
            ..Default::default()
        },
        expenses: LifeExpenses {
            expenses: vec![LifeExpense::new("Daily", 15_000.0, true, TimeSpan::Permanent)],
        },
        kpis: vec![
            Kpi::new("Minimum", KpiKind::MinimumAssets, 100_000.0, 0.9),
            Kpi::new("At first death", KpiKind::AssetsAtFirstDeath, 0.0, 0.9),
            Kpi::new("At last death", KpiKind::AssetsAtLastDeath, 0.0, 0.9),
        ],
    }
}

pub(crate) fn model() -> Model {
    Model::from_config(ModelConfig::default()).unwrap()
}
