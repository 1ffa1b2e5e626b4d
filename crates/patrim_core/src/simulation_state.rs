use tracing::{debug, warn};

use crate::assets::{EconomyView, Ownable, Patrimoine};
use crate::config::{Model, Scenario};
use crate::error::{ModelError, Result, SimulationError};
use crate::expense::LifeExpenses;
use crate::model::{
    ALL_ADULTS, ALL_PERSONS, BalanceSheetLine, CashFlowLine, NamedValueTable, SocialAccounts,
};
use crate::ownership::{EvaluationMethod, Ownership, ValuationContext};
use crate::person::Family;
use crate::random::SimulationMode;
use crate::retirement::PensionContext;
use crate::succession::SuccessionManager;

/// Deficit left unfunded below which a year is still considered funded
pub const CASH_TOLERANCE: f64 = 1.0;

// Revenue categories
pub const WORK_INCOME: &str = "Work income";
pub const UNEMPLOYMENT: &str = "Unemployment";
pub const PENSIONS: &str = "Pensions";
pub const RENTS: &str = "Rents";
pub const SCPI_REVENUES: &str = "SCPI";
pub const SALES: &str = "Sales";
pub const LIQUIDATIONS: &str = "Liquidations";
pub const LOAN_PROCEEDS: &str = "Loans";

// Outflow categories
pub const TAXES: &str = "Taxes";
pub const INCOME_TAX: &str = "Income tax";
pub const LOCAL_TAXES: &str = "Local taxes";
pub const SUCCESSION_TAXES: &str = "Successions";
pub const EXPENSES: &str = "Expenses";
pub const DEBT_PAYMENTS: &str = "Debt payments";
pub const INVESTMENTS: &str = "Investments";
pub const FREE_INVESTMENTS: &str = "Free investments";

// Balance sheet categories
pub const REAL_ESTATE: &str = "Real estate";
pub const SCPI: &str = "SCPI";
pub const PERIODIC_INVESTMENTS: &str = "Periodic investments";
pub const LOANS: &str = "Loans";
pub const DEBTS: &str = "Debts";
pub const NET_WORTH: &str = "Net worth";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimTimeline {
    pub first_year: i32,
    pub last_year: i32,
    /// Next year to compute
    pub current_year: i32,
}

impl SimTimeline {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current_year > self.last_year
    }
}

/// Mutable state of one run, owned by that run only
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub timeline: SimTimeline,
    pub family: Family,
    pub patrimoine: Patrimoine,
    pub expenses: LifeExpenses,
    pub accounts: SocialAccounts,
    /// Inheritance taxes paid during the year following the deaths
    pub pending_succession_taxes: f64,
    pub ran_out_of_cash_in: Option<i32>,
}

/// Last year of `nb_years` starting at `first_year`
pub fn horizon_last_year(first_year: i32, nb_years: u32) -> Result<i32> {
    if nb_years == 0 {
        return Err(ModelError::OutOfBounds {
            first_year,
            last_year: first_year.saturating_sub(1),
        }
        .into());
    }
    i32::try_from(nb_years - 1)
        .ok()
        .and_then(|n| first_year.checked_add(n))
        .ok_or(SimulationError::Model(ModelError::HorizonOverflow {
            first_year,
            nb_years,
        }))
}

impl SimulationState {
    /// Fresh copy of `scenario` for a run over `[first_year, first_year + nb_years)`
    pub fn from_scenario(scenario: &Scenario, first_year: i32, nb_years: u32) -> Result<Self> {
        let last_year = horizon_last_year(first_year, nb_years)?;
        let mut patrimoine = scenario.patrimoine.clone();
        patrimoine.reset();
        Ok(Self {
            timeline: SimTimeline {
                first_year,
                last_year,
                current_year: first_year,
            },
            family: scenario.family.clone(),
            patrimoine,
            expenses: scenario.expenses.clone(),
            accounts: SocialAccounts::default(),
            pending_succession_taxes: 0.0,
            ran_out_of_cash_in: None,
        })
    }

    /// Horizon reached, money ran out, or every adult died before the
    /// current year
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.timeline.is_finished()
            || self.ran_out_of_cash_in.is_some()
            || self
                .family
                .nb_of_adults_alive(self.timeline.current_year - 1)
                == 0
    }

    /// Compute the current year and move to the next one
    pub fn step_year(&mut self, model: &Model, mode: SimulationMode) -> Result<()> {
        let year = self.timeline.current_year;
        self.compute_year(year, model, mode)
            .map_err(|e| e.in_year(year))?;
        self.timeline.current_year += 1;
        Ok(())
    }

    fn compute_year(&mut self, year: i32, model: &Model, mode: SimulationMode) -> Result<()> {
        let config = model.config();
        let inflation = config.economy.inflation(mode);
        let view = EconomyView {
            inflation,
            rates: config.economy.rates(year, mode, false)?,
        };
        let yearly_rates = config
            .economy
            .rates(year, mode, config.simulate_volatility)?;

        for investment in &mut self.patrimoine.assets.free_investments {
            let rate = investment.real_rate(&yearly_rates, inflation);
            investment.capitalize(rate);
        }

        let mut cash_flow = self.cash_flow(year, model, mode, &view)?;
        self.fund(&mut cash_flow, year, model);

        let unfunded = cash_flow.unfunded();
        self.accounts.balance_sheets.push(self.balance_sheet(year, model, &view));
        self.accounts.cash_flows.push(cash_flow);
        debug!(year, unfunded, "year computed");

        if unfunded < -CASH_TOLERANCE {
            warn!(year, deficit = -unfunded, "deficit could not be funded, stopping run");
            self.ran_out_of_cash_in = Some(year);
            return Ok(());
        }

        self.successions(year, model, view)
    }

    // =========================================================================
    // Cash flow
    // =========================================================================

    fn cash_flow(
        &self,
        year: i32,
        model: &Model,
        mode: SimulationMode,
        view: &EconomyView,
    ) -> Result<CashFlowLine> {
        let config = model.config();
        let fiscal = &config.fiscal;
        let assets = &self.patrimoine.assets;
        let mut taxable_income = 0.0;

        let mut work = NamedValueTable::new(WORK_INCOME);
        for (name, revenue) in self.family.work_incomes(year, fiscal) {
            work.add(&name, revenue.net);
            taxable_income += revenue.taxable;
        }

        let mut unemployment = NamedValueTable::new(UNEMPLOYMENT);
        for (name, revenue) in config.retirement.unemployment_revenues(&self.family, year, fiscal) {
            unemployment.add(&name, revenue.net);
            taxable_income += revenue.taxable;
        }

        let pension_ctx = PensionContext {
            devaluation_rate: config.socio_economy.pension_devaluation_rate(mode),
            additional_quarters: config.socio_economy.additional_quarters(mode),
        };
        let mut pensions = NamedValueTable::new(PENSIONS);
        for (name, revenue) in config
            .retirement
            .pensions(&self.family, year, &pension_ctx, fiscal)
        {
            pensions.add(&name, revenue.net);
            taxable_income += revenue.taxable;
        }

        let mut rents = NamedValueTable::new(RENTS);
        for real_estate in &assets.real_estates {
            let rent = real_estate.rent(year);
            rents.add(&real_estate.name, fiscal.rental_taxes.net(rent));
            taxable_income += fiscal.rental_taxes.taxable(rent);
        }

        let mut scpis = NamedValueTable::new(SCPI_REVENUES);
        for scpi in &assets.scpis {
            let revenue = scpi.revenue(year, fiscal);
            scpis.add(&scpi.name, revenue.net);
            taxable_income += revenue.taxable;
        }

        let mut sales = NamedValueTable::new(SALES);
        for sale in assets
            .real_estates
            .iter()
            .filter_map(|r| r.sale(year, fiscal).map(|s| (&r.name, s)))
            .chain(
                assets
                    .scpis
                    .iter()
                    .filter_map(|s| s.sale(year, fiscal).map(|sale| (&s.name, sale))),
            )
        {
            sales.add(sale.0, sale.1.net());
        }

        let mut liquidations = NamedValueTable::new(LIQUIDATIONS);
        for investment in &assets.periodic_investments {
            let net = investment
                .liquidation(year, view, fiscal)
                .map_or(0.0, |l| l.net());
            liquidations.add(&investment.name, net);
        }

        let mut proceeds = NamedValueTable::new(LOAN_PROCEEDS);
        for loan in &self.patrimoine.liabilities.loans {
            proceeds.add(&loan.name, loan.proceeds(year));
        }

        let income_tax = self
            .family
            .irpp(year, taxable_income, fiscal)?
            .map_or(0.0, |tax| tax.amount);
        let local_taxes: f64 = assets
            .real_estates
            .iter()
            .map(|r| r.local_taxes(year))
            .sum();
        let taxes = NamedValueTable::new(TAXES)
            .with(INCOME_TAX, -income_tax)
            .with(LOCAL_TAXES, -local_taxes)
            .with(SUCCESSION_TAXES, -self.pending_succession_taxes);

        let correction = config.expense_correction_factor
            * (1.0 + config.socio_economy.expenses_under_evaluation_rate(mode));
        let mut expenses = NamedValueTable::new(EXPENSES);
        for (category, value) in self.expenses.values_by_category(
            year,
            &self.family,
            self.family.nb_of_expense_members(year),
            correction,
        )? {
            expenses.add(category.label(), -value);
        }

        let mut debt_payments = NamedValueTable::new(DEBT_PAYMENTS);
        for loan in &self.patrimoine.liabilities.loans {
            debt_payments.add(&loan.name, -loan.yearly_payment(year));
        }

        let mut investments = NamedValueTable::new(INVESTMENTS);
        for investment in &assets.periodic_investments {
            investments.add(&investment.name, -investment.payment(year));
        }
        for real_estate in &assets.real_estates {
            investments.add(&real_estate.name, -real_estate.purchase(year));
        }
        for scpi in &assets.scpis {
            investments.add(&scpi.name, -scpi.purchase(year));
        }

        Ok(CashFlowLine {
            year,
            revenues: vec![
                work,
                unemployment,
                pensions,
                rents,
                scpis,
                sales,
                liquidations,
                proceeds,
            ],
            taxes,
            expenses,
            debt_payments,
            investments,
            free_investments: NamedValueTable::new(FREE_INVESTMENTS),
            withdrawal_taxes: 0.0,
            taxable_income,
        })
    }

    /// Invest a surplus in the first eligible free investment, or cover a
    /// deficit by withdrawing from the free investments in declaration order
    fn fund(&mut self, cash_flow: &mut CashFlowLine, year: i32, model: &Model) {
        let fiscal = &model.config().fiscal;
        let family = &self.family;
        let investments = &mut self.patrimoine.assets.free_investments;
        let mut flows = NamedValueTable::new(FREE_INVESTMENTS);
        for investment in investments.iter() {
            flows.add(&investment.name, 0.0);
        }

        let net = cash_flow.net_cash_flow();
        if net > 0.0 {
            let target = investments
                .iter_mut()
                .find(|i| can_receive_deposits(&i.ownership, family, year));
            match target {
                Some(investment) => {
                    investment.deposit(net);
                    flows.add(&investment.name, -net);
                }
                None => debug!(year, surplus = net, "no free investment to invest the surplus"),
            }
        } else if net < 0.0 {
            let mut remaining = -net;
            for investment in investments
                .iter_mut()
                .filter(|i| can_be_withdrawn(&i.ownership, family, year))
            {
                if remaining <= 0.0 {
                    break;
                }
                let withdrawal = investment.withdrawal(remaining, fiscal);
                if withdrawal.brut <= 0.0 {
                    continue;
                }
                remaining -= withdrawal.net();
                flows.add(&investment.name, withdrawal.net());
                cash_flow.withdrawal_taxes += withdrawal.taxes;
            }
        }
        cash_flow.free_investments = flows;
    }

    // =========================================================================
    // Balance sheet
    // =========================================================================

    fn balance_sheet(&self, year: i32, model: &Model, view: &EconomyView) -> BalanceSheetLine {
        let assets = &self.patrimoine.assets;
        let liabilities = &self.patrimoine.liabilities;

        let table = |name: &str, items: Vec<&dyn Ownable>| {
            items.into_iter().fold(NamedValueTable::new(name), |table, item| {
                table.with(item.name(), item.value(year, view))
            })
        };
        let asset_tables = vec![
            table(REAL_ESTATE, assets.real_estates.iter().map(|a| a as &dyn Ownable).collect()),
            table(SCPI, assets.scpis.iter().map(|a| a as &dyn Ownable).collect()),
            table(
                PERIODIC_INVESTMENTS,
                assets.periodic_investments.iter().map(|a| a as &dyn Ownable).collect(),
            ),
            table(
                FREE_INVESTMENTS,
                assets.free_investments.iter().map(|a| a as &dyn Ownable).collect(),
            ),
        ];
        let liability_tables = vec![
            table(LOANS, liabilities.loans.iter().map(|l| l as &dyn Ownable).collect()),
            table(DEBTS, liabilities.debts.iter().map(|l| l as &dyn Ownable).collect()),
        ];

        let ctx = ValuationContext {
            year,
            ages: &self.family,
            demembrement: &model.config().fiscal.demembrement,
        };
        let mut net_worth = NamedValueTable::new(NET_WORTH);
        let mut all_adults = 0.0;
        let mut all_persons = 0.0;
        for member in self.family.members() {
            let value = self.patrimoine.owned_value(
                member.name(),
                year,
                view,
                EvaluationMethod::Patrimoine,
                &ctx,
            );
            net_worth.add(member.name(), value);
            if member.is_adult() {
                all_adults += value;
            }
            all_persons += value;
        }
        net_worth.add(ALL_ADULTS, all_adults);
        net_worth.add(ALL_PERSONS, all_persons);

        BalanceSheetLine {
            year,
            assets: asset_tables,
            liabilities: liability_tables,
            net_worth,
        }
    }

    // =========================================================================
    // Successions
    // =========================================================================

    fn successions(&mut self, year: i32, model: &Model, view: EconomyView) -> Result<()> {
        self.pending_succession_taxes = 0.0;
        let decedents: Vec<String> = self
            .family
            .adults()
            .filter(|a| a.is_deceased(year))
            .map(|a| a.name().to_string())
            .collect();
        if decedents.is_empty() {
            return Ok(());
        }
        debug!(year, ?decedents, "managing successions");

        let manager = SuccessionManager {
            year,
            family: &self.family,
            fiscal: &model.config().fiscal,
            economy: view,
            correction_factor: model.config().missing_capital_correction_factor,
        };
        let outcome = manager.manage_successions(&decedents, &mut self.patrimoine)?;
        self.pending_succession_taxes = outcome.taxes();
        self.accounts.successions.extend(outcome.successions);
        self.accounts.missing_capital.extend(outcome.missing_capital);
        Ok(())
    }
}

fn is_living_adult(family: &Family, name: &str, year: i32) -> bool {
    family
        .member(name)
        .is_some_and(|m| m.is_adult() && m.is_alive(year))
}

/// Held in full by living adults only
fn can_receive_deposits(ownership: &Ownership, family: &Family, year: i32) -> bool {
    match ownership {
        Ownership::Undismembered { full_owners } => {
            !full_owners.is_empty()
                && full_owners
                    .iter()
                    .all(|o| is_living_adult(family, &o.name, year))
        }
        Ownership::Dismembered { .. } => false,
    }
}

/// Some right on it is held by a living adult
fn can_be_withdrawn(ownership: &Ownership, family: &Family, year: i32) -> bool {
    ownership
        .owner_names()
        .into_iter()
        .any(|name| is_living_adult(family, name, year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Assets, FreeInvestment, InterestRate, InvestmentState, InvestmentType};
    use crate::config::{AdultBuilder, ModelConfig};
    use crate::expense::{LifeExpense, TimeSpan};
    use crate::ownership::Owner;
    use crate::person::Sex;
    use jiff::civil::date;

    fn model() -> Model {
        Model::from_config(ModelConfig {
            simulate_volatility: false,
            ..Default::default()
        })
        .unwrap()
    }

    fn savings(name: &str, owner: &str, value: f64) -> FreeInvestment {
        FreeInvestment::new(
            name,
            Ownership::full(owner),
            InvestmentType::Other,
            InterestRate::Contractual { rate: 0.017 },
            InvestmentState {
                investment: value,
                interest: 0.0,
            },
        )
    }

    fn scenario(expense: f64, investments: Vec<FreeInvestment>) -> Scenario {
        Scenario {
            family: Family::from_members(vec![
                AdultBuilder::new("Lionel", Sex::Male, date(1950, 1, 1))
                    .age_of_death(95)
                    .build(),
            ])
            .unwrap(),
            patrimoine: Patrimoine {
                assets: Assets {
                    free_investments: investments,
                    ..Default::default()
                },
                ..Default::default()
            },
            expenses: LifeExpenses {
                expenses: vec![LifeExpense::new(
                    "Daily",
                    expense,
                    false,
                    TimeSpan::Permanent,
                )],
            },
            kpis: Vec::new(),
        }
    }

    #[test]
    fn test_deficit_withdrawn_in_declaration_order() {
        let scenario = scenario(
            10_000.0,
            vec![savings("First", "Lionel", 4_000.0), savings("Second", "Lionel", 50_000.0)],
        );
        let mut state = SimulationState::from_scenario(&scenario, 2030, 1).unwrap();
        state.step_year(&model(), SimulationMode::Deterministic).unwrap();

        let line = &state.accounts.cash_flows[0];
        assert_eq!(line.free_investments.value("First"), Some(4_000.0));
        assert!((line.free_investments.value("Second").unwrap() - 6_000.0).abs() < 1e-6);
        assert!(line.unfunded().abs() < 1e-6);
        assert!(state.ran_out_of_cash_in.is_none());
        assert!(state.is_finished());
    }

    #[test]
    fn test_unfunded_deficit_stops_run() {
        let scenario = scenario(10_000.0, vec![savings("Savings", "Lionel", 3_000.0)]);
        let mut state = SimulationState::from_scenario(&scenario, 2030, 5).unwrap();
        let model = model();
        while !state.is_finished() {
            state.step_year(&model, SimulationMode::Deterministic).unwrap();
        }
        assert_eq!(state.ran_out_of_cash_in, Some(2030));
        assert_eq!(state.accounts.cash_flows.len(), 1);
        assert_eq!(state.accounts.balance_sheets.len(), 1);
    }

    #[test]
    fn test_surplus_goes_to_first_eligible_investment() {
        let mut joint = savings("Joint", "Lionel", 0.0);
        joint.ownership = Ownership::Undismembered {
            full_owners: vec![Owner::new("Lionel", 50.0), Owner::new("Someone", 50.0)],
        };
        let mut scenario = scenario(0.0, vec![joint, savings("Own", "Lionel", 0.0)]);
        scenario.family = Family::from_members(vec![
            AdultBuilder::new("Lionel", Sex::Male, date(1980, 1, 1))
                .salary(50_000.0, 40_000.0, 39_000.0, 0.0)
                .build(),
        ])
        .unwrap();
        let mut state = SimulationState::from_scenario(&scenario, 2030, 1).unwrap();
        state.step_year(&model(), SimulationMode::Deterministic).unwrap();

        let line = &state.accounts.cash_flows[0];
        assert_eq!(line.free_investments.value("Joint"), Some(0.0));
        assert!(line.free_investments.value("Own").unwrap() < 0.0);
        assert!(line.unfunded().abs() < 1e-6);
        let sheet = &state.accounts.balance_sheets[0];
        assert!(sheet.net_worth_of("Lionel") > 0.0);
        assert_eq!(sheet.net_worth_of(ALL_ADULTS), sheet.net_worth_of(ALL_PERSONS));
    }

    #[test]
    fn test_empty_horizon_rejected() {
        let scenario = scenario(0.0, Vec::new());
        assert!(SimulationState::from_scenario(&scenario, 2030, 0).is_err());
    }

    #[test]
    fn test_horizon_last_year() {
        assert_eq!(horizon_last_year(2030, 1).unwrap(), 2030);
        assert_eq!(horizon_last_year(2030, 40).unwrap(), 2069);
        assert_eq!(horizon_last_year(i32::MAX, 1).unwrap(), i32::MAX);
        assert_eq!(
            horizon_last_year(i32::MIN, 0),
            Err(SimulationError::Model(ModelError::OutOfBounds {
                first_year: i32::MIN,
                last_year: i32::MIN,
            }))
        );
    }

    #[test]
    fn test_overflowing_horizon_rejected() {
        let scenario = scenario(0.0, Vec::new());
        let overflow = SimulationError::Model(ModelError::HorizonOverflow {
            first_year: i32::MAX - 1,
            nb_years: 10,
        });
        assert_eq!(
            SimulationState::from_scenario(&scenario, i32::MAX - 1, 10).err(),
            Some(overflow)
        );
        assert!(SimulationState::from_scenario(&scenario, 2030, u32::MAX).is_err());
    }
}
